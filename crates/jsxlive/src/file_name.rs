//! Filename rules for project files.
//!
//! A name is one or more ASCII word characters or hyphens followed by one of
//! `.js`, `.jsx`, `.ts` or `.tsx`. No directories, no dots in the stem.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FileOpError;

static FILE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-]+\.(jsx?|tsx?)$").expect("file name pattern is a valid regex")
});

pub fn is_valid_file_name(name: &str) -> bool {
    FILE_NAME_PATTERN.is_match(name)
}

pub fn validate_file_name(name: &str) -> Result<(), FileOpError> {
    if is_valid_file_name(name) {
        Ok(())
    } else {
        Err(FileOpError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_all_extensions() {
        for name in ["App.jsx", "utils.js", "types.ts", "Button.tsx", "my-helper_2.js"] {
            assert!(is_valid_file_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_rejects_bad_names() {
        for name in [
            "",
            ".jsx",
            "App",
            "App.css",
            "App.jsx.bak",
            "dir/App.jsx",
            "my file.js",
            "App.JSX",
            "min.util.js",
            "naïve.js",
        ] {
            assert!(!is_valid_file_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_validate_reports_name() {
        assert_eq!(
            validate_file_name("nope.txt"),
            Err(FileOpError::InvalidName("nope.txt".to_string()))
        );
    }
}
