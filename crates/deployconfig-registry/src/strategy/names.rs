use rand::Rng;

/// Maximum length of an object name which also has to be a valid DNS label.
const MAX_NAME_LENGTH: usize = 63;
const RANDOM_SUFFIX_LENGTH: usize = 5;
const MAX_GENERATED_NAME_LENGTH: usize = MAX_NAME_LENGTH - RANDOM_SUFFIX_LENGTH;

// No vowels to avoid generating words, no look-alike characters.
const ALPHANUMS: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";

/// Appends a random suffix to `base`, truncating `base` so the generated
/// name stays within [`MAX_NAME_LENGTH`].
pub(crate) fn generate_name(base: &str) -> String {
    let base = match base.char_indices().nth(MAX_GENERATED_NAME_LENGTH) {
        Some((end, _)) => &base[..end],
        None => base,
    };

    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LENGTH)
        .map(|_| char::from(ALPHANUMS[rng.random_range(0..ALPHANUMS.len())]))
        .collect();

    format!("{base}{suffix}")
}
