//! Name normalization helpers.

/// Converts a camelCase name to its lowercase-hyphenated form.
///
/// Names that are already hyphenated pass through unchanged, so `scriptSrc`
/// and `script-src` normalize to the same key.
pub fn dasherize(name: &str) -> String {
    let mut dashed = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                dashed.push('-');
            }
            dashed.push(ch.to_ascii_lowercase());
        } else {
            dashed.push(ch);
        }
    }
    dashed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dasherize() {
        assert_eq!(dasherize("defaultSrc"), "default-src");
        assert_eq!(dasherize("script-src-attr"), "script-src-attr");
        assert_eq!(dasherize("upgradeInsecureRequests"), "upgrade-insecure-requests");
        assert_eq!(dasherize("Sandbox"), "sandbox");
        assert_eq!(dasherize(""), "");
    }
}
