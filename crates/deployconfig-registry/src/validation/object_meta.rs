use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::validation::{
    FieldErrors, FieldPath, ForbiddenSnafu, InvalidSnafu, RequiredSnafu, is_rfc_1123_label,
    is_rfc_1123_subdomain,
};

const FIELD_IMMUTABLE_MSG: &str = "field is immutable";

/// Validates name and namespace of a new object.
pub fn validate_object_meta(meta: &ObjectMeta, namespaced: bool, path: &FieldPath) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match meta.name.as_deref().filter(|name| !name.is_empty()) {
        None => errors.push(
            RequiredSnafu {
                path: path.child("name"),
                detail: "name or generateName is required",
            }
            .build(),
        ),
        Some(name) => {
            if let Err(name_errors) = is_rfc_1123_subdomain(name) {
                errors.extend(name_errors.into_iter().map(|error| {
                    InvalidSnafu {
                        path: path.child("name"),
                        value: name,
                        detail: error.to_string(),
                    }
                    .build()
                }));
            }
        }
    }

    let namespace = meta.namespace.as_deref().filter(|ns| !ns.is_empty());
    match (namespaced, namespace) {
        (true, None) => errors.push(
            RequiredSnafu {
                path: path.child("namespace"),
                detail: "namespace is required",
            }
            .build(),
        ),
        (true, Some(namespace)) => {
            if let Err(namespace_errors) = is_rfc_1123_label(namespace) {
                errors.extend(namespace_errors.into_iter().map(|error| {
                    InvalidSnafu {
                        path: path.child("namespace"),
                        value: namespace,
                        detail: error.to_string(),
                    }
                    .build()
                }));
            }
        }
        (false, Some(namespace)) => errors.push(
            ForbiddenSnafu {
                path: path.child("namespace"),
                detail: format!("not allowed on this type, got {namespace:?}"),
            }
            .build(),
        ),
        (false, None) => {}
    }

    errors
}

/// Validates the metadata of an update against the persisted metadata.
///
/// Name and namespace are immutable, and a resource version is required so
/// the storage layer can detect conflicting writes.
pub fn validate_object_meta_update(
    new: &ObjectMeta,
    old: &ObjectMeta,
    path: &FieldPath,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if new.name != old.name {
        errors.push(
            InvalidSnafu {
                path: path.child("name"),
                value: new.name.clone().unwrap_or_default(),
                detail: FIELD_IMMUTABLE_MSG,
            }
            .build(),
        );
    }

    if new.namespace != old.namespace {
        errors.push(
            InvalidSnafu {
                path: path.child("namespace"),
                value: new.namespace.clone().unwrap_or_default(),
                detail: FIELD_IMMUTABLE_MSG,
            }
            .build(),
        );
    }

    if new.resource_version.as_deref().is_none_or(str::is_empty) {
        errors.push(
            RequiredSnafu {
                path: path.child("resourceVersion"),
                detail: "must be specified for an update",
            }
            .build(),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn meta(name: Option<&str>, namespace: Option<&str>) -> ObjectMeta {
        ObjectMeta {
            name: name.map(ToOwned::to_owned),
            namespace: namespace.map(ToOwned::to_owned),
            resource_version: Some("1".to_owned()),
            ..ObjectMeta::default()
        }
    }

    #[rstest]
    #[case::valid(meta(Some("foo"), Some("default")), &[])]
    #[case::missing_name(meta(None, Some("default")), &["metadata.name"])]
    #[case::empty_name(meta(Some(""), Some("default")), &["metadata.name"])]
    #[case::invalid_name(meta(Some("Foo_Bar"), Some("default")), &["metadata.name"])]
    #[case::missing_namespace(meta(Some("foo"), None), &["metadata.namespace"])]
    #[case::invalid_namespace(meta(Some("foo"), Some("a.b")), &["metadata.namespace"])]
    #[case::nothing(meta(None, None), &["metadata.name", "metadata.namespace"])]
    fn namespaced_meta(#[case] object_meta: ObjectMeta, #[case] expected: &[&str]) {
        let errors = validate_object_meta(&object_meta, true, &FieldPath::new("metadata"));

        assert_eq!(errors.len(), expected.len(), "{errors}");
        for path in expected {
            assert!(errors.contains_path(path), "missing {path} in {errors}");
        }
    }

    #[test]
    fn cluster_scoped_meta_rejects_namespace() {
        let errors = validate_object_meta(
            &meta(Some("foo"), Some("default")),
            false,
            &FieldPath::new("metadata"),
        );
        assert!(errors.contains_path("metadata.namespace"));

        let errors =
            validate_object_meta(&meta(Some("foo"), None), false, &FieldPath::new("metadata"));
        assert!(errors.is_empty());
    }

    #[rstest]
    #[case::unchanged(meta(Some("foo"), Some("default")), &[])]
    #[case::renamed(meta(Some("bar"), Some("default")), &["metadata.name"])]
    #[case::moved(meta(Some("foo"), Some("other")), &["metadata.namespace"])]
    #[case::no_resource_version(
        ObjectMeta { resource_version: None, ..meta(Some("foo"), Some("default")) },
        &["metadata.resourceVersion"]
    )]
    fn meta_update(#[case] new: ObjectMeta, #[case] expected: &[&str]) {
        let old = meta(Some("foo"), Some("default"));

        let errors = validate_object_meta_update(&new, &old, &FieldPath::new("metadata"));

        assert_eq!(errors.len(), expected.len(), "{errors}");
        for path in expected {
            assert!(errors.contains_path(path), "missing {path} in {errors}");
        }
    }
}
