//! The HTML document loaded into the Preview Surface.
//!
//! The frame is sandboxed with scripts only ([`PREVIEW_SANDBOX`]), so it can
//! neither read the host's storage nor call into it. It talks back exclusively
//! through `postMessage`, see `jsxlive_protocol`.

use std::sync::LazyLock;

use jsxlive_protocol::{CONSOLE_READY, CONSOLE_SOURCE, PreviewRequest};
use regex::Regex;

use crate::config::EditorConfig;

/// `sandbox` attribute of the preview `<iframe>`.
pub const PREVIEW_SANDBOX: &str = "allow-scripts";

/// Title of the preview `<iframe>`.
pub const PREVIEW_TITLE: &str = "JSX Preview";

/// End tags are matched case-insensitively by HTML parsers.
static SCRIPT_END_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(script)").expect("valid regex"));

/// Wraps compiled script into a standalone document.
pub fn render_document(compiled_script: &str, config: &EditorConfig) -> String {
    let runtime_scripts: String = config
        .runtime_scripts
        .iter()
        .map(|url| {
            format!(
                "    <script crossorigin src=\"{}\"></script>\n",
                escape_attribute(url)
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8" />
{runtime_scripts}  </head>
  <body>
    <div id="{mount}"></div>
    <script>
      window.addEventListener("message", function(e) {{
        if (e.data && e.data.type === "{request}") {{
          window.parent.postMessage({{ source: "{source}", logs: "{ready}" }}, "*");
        }}
      }});
    </script>
    <script type="text/javascript">{script}</script>
  </body>
</html>
"#,
        mount = escape_attribute(&config.mount_element_id),
        request = PreviewRequest::RequestLogs.type_tag(),
        source = CONSOLE_SOURCE,
        ready = CONSOLE_READY,
        script = escape_inline_script(compiled_script),
    )
}

/// `</script` inside an inline script would end the element early.
/// `<\/script` means the same thing to JavaScript.
fn escape_inline_script(script: &str) -> String {
    SCRIPT_END_TAG.replace_all(script, r"<\/$1").into_owned()
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_contains_runtimes_in_order() {
        let config = EditorConfig::default();
        let document = render_document("console.log(1);", &config);
        let react = document.find("react@18/umd/react.development.js").unwrap();
        let react_dom = document.find("react-dom@18/umd/react-dom.development.js").unwrap();
        assert!(react < react_dom);
        assert!(document.starts_with("<!DOCTYPE html>"));
        assert!(document.contains(r#"<div id="root"></div>"#));
    }

    #[test]
    fn test_document_embeds_script_after_listener() {
        let document = render_document("var answer = 42;", &EditorConfig::default());
        let listener = document.find(r#"e.data.type === "request-logs""#).unwrap();
        let script = document.find("var answer = 42;").unwrap();
        assert!(listener < script);
        assert!(document.contains(r#"{ source: "iframe-console", logs: "Console Ready" }"#));
    }

    #[test]
    fn test_closing_script_tag_escaped() {
        let document = render_document(r#"var s = "</script>";"#, &EditorConfig::default());
        assert!(document.contains(r#"var s = "<\/script>";"#));
        assert_eq!(document.matches("</script>").count(), 4);
    }

    #[test]
    fn test_closing_script_tag_escaped_in_any_case() {
        let document = render_document(
            r#"var a = "</SCRIPT><h1>x</h1>"; var b = "</Script>";"#,
            &EditorConfig::default(),
        );
        assert!(document.contains(r#"var a = "<\/SCRIPT><h1>x</h1>";"#));
        assert!(document.contains(r#"var b = "<\/Script>";"#));
        assert_eq!(document.to_lowercase().matches("</script").count(), 4);
    }

    #[test]
    fn test_custom_mount_element() {
        let config = EditorConfig {
            mount_element_id: "app".to_string(),
            runtime_scripts: vec![],
            ..EditorConfig::default()
        };
        let document = render_document("", &config);
        assert!(document.contains(r#"<div id="app"></div>"#));
        assert!(!document.contains("crossorigin"));
    }
}
