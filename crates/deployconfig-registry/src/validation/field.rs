use std::fmt::Display;

use snafu::Snafu;

/// The path to a field of an object, e.g. `spec.triggers[0].type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(root: &str) -> Self {
        Self(root.to_owned())
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}[{key}]", self.0))
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A problem with a single field of an object.
#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum FieldError {
    #[snafu(display("{path}: Required value: {detail}"))]
    Required { path: FieldPath, detail: String },

    #[snafu(display("{path}: Invalid value: {value:?}: {detail}"))]
    Invalid {
        path: FieldPath,
        value: String,
        detail: String,
    },

    #[snafu(display("{path}: Forbidden: {detail}"))]
    Forbidden { path: FieldPath, detail: String },

    #[snafu(display("{path}: Unsupported value: {value:?}: supported values: {}", supported.join(", ")))]
    NotSupported {
        path: FieldPath,
        value: String,
        supported: Vec<String>,
    },
}

impl FieldError {
    /// The field this error is about.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Required { path, .. }
            | Self::Invalid { path, .. }
            | Self::Forbidden { path, .. }
            | Self::NotSupported { path, .. } => path,
        }
    }
}

/// All problems found while validating an object. Empty if the object is
/// valid.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Returns whether any error is about the field at `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.0.iter().any(|error| error.path().to_string() == path)
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_slice() {
            [] => Ok(()),
            [error] => write!(f, "{error}"),
            errors => {
                write!(f, "[")?;
                for (i, error) in errors.iter().enumerate() {
                    let prefix = match i {
                        0 => "",
                        _ => ", ",
                    };
                    write!(f, "{prefix}{error}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl std::error::Error for FieldErrors {}

impl Extend<FieldError> for FieldErrors {
    fn extend<T: IntoIterator<Item = FieldError>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = FieldError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FieldErrors {
    type IntoIter = std::vec::IntoIter<FieldError>;
    type Item = FieldError;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type IntoIter = std::slice::Iter<'a, FieldError>;
    type Item = &'a FieldError;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        let path = FieldPath::new("spec")
            .child("triggers")
            .index(0)
            .child("imageChangeParams");
        assert_eq!(path.to_string(), "spec.triggers[0].imageChangeParams");

        let path = FieldPath::new("spec").child("selector").key("name");
        assert_eq!(path.to_string(), "spec.selector[name]");
    }

    #[test]
    fn display() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.to_string(), "");

        errors.push(
            RequiredSnafu {
                path: FieldPath::new("metadata").child("name"),
                detail: "name or generateName is required",
            }
            .build(),
        );
        assert_eq!(
            errors.to_string(),
            "metadata.name: Required value: name or generateName is required"
        );

        errors.push(
            InvalidSnafu {
                path: FieldPath::new("spec").child("replicas"),
                value: "-1",
                detail: "must be greater than or equal to 0",
            }
            .build(),
        );
        assert_eq!(
            errors.to_string(),
            "[metadata.name: Required value: name or generateName is required, spec.replicas: Invalid value: \"-1\": must be greater than or equal to 0]"
        );
        assert!(errors.contains_path("spec.replicas"));
        assert!(!errors.contains_path("spec"));
    }
}
