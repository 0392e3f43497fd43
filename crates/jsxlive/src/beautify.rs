//! Crude reformatting of source text.
//!
//! Not a pretty-printer: breaks after every `{` and `;`, drops blank lines and
//! re-indents every line with two spaces. Braces inside strings are not special.

use std::sync::LazyLock;

use regex::Regex;

static BREAK_AFTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([{;])").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));
static LEADING_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s+").expect("valid regex"));

pub fn beautify(source: &str) -> String {
    let broken = BREAK_AFTER.replace_all(source, "$1\n");
    let collapsed = BLANK_LINES.replace_all(&broken, "\n");
    LEADING_WHITESPACE.replace_all(&collapsed, "  ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaks_after_braces_and_semicolons() {
        assert_eq!(
            beautify("function f() { a(); b(); }"),
            "function f() {\n  a();\n  b();\n  }"
        );
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(beautify("a\n\n\nb"), "a\nb");
        assert_eq!(beautify("a\n\n    b"), "a\n  b");
    }

    #[test]
    fn test_no_op_on_plain_line() {
        assert_eq!(beautify("const x = 1"), "const x = 1");
    }
}
