//! The Build Step: project files -> one script -> transform -> preview document.
//!
//! There is no module system. Non-entry files are pasted in map order, the entry
//! file goes last, and the whole text is transformed in one call. A console
//! shim in front forwards `console.log` to the host. A render call at the end
//! mounts the entry component. Every build starts from scratch.

use std::rc::Rc;

use jsxlive_protocol::CONSOLE_SOURCE;

use crate::config::EditorConfig;
use crate::error::TransformError;
use crate::preview::render_document;
use crate::project::Project;

/// Options handed to the transform on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub presets: Vec<String>,
}

impl TransformOptions {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            presets: config.presets.clone(),
        }
    }
}

/// External JSX/TSX compiler.
pub trait Transform {
    fn transform(&self, source: &str, options: &TransformOptions) -> Result<String, TransformError>;
}

impl<T: Transform + ?Sized> Transform for &T {
    fn transform(&self, source: &str, options: &TransformOptions) -> Result<String, TransformError> {
        (**self).transform(source, options)
    }
}

impl<T: Transform + ?Sized> Transform for Rc<T> {
    fn transform(&self, source: &str, options: &TransformOptions) -> Result<String, TransformError> {
        (**self).transform(source, options)
    }
}

/// Result of the latest build. Output and error never coexist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BuildState {
    #[default]
    NotBuilt,
    Compiled(String),
    Failed(String),
}

impl BuildState {
    /// Preview document, empty unless the last build succeeded.
    pub fn compiled_output(&self) -> &str {
        match self {
            BuildState::Compiled(document) => document,
            BuildState::NotBuilt | BuildState::Failed(_) => "",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BuildState::Failed(message) => Some(message),
            BuildState::NotBuilt | BuildState::Compiled(_) => None,
        }
    }
}

fn console_shim() -> String {
    format!(
        r#"(function() {{
  var origLog = console.log;
  console.log = function() {{
    origLog.apply(console, arguments);
    window.parent.postMessage(
      {{ source: "{CONSOLE_SOURCE}", logs: [].slice.call(arguments).map(String).join(" ") }},
      "*"
    );
  }};
}})();"#
    )
}

fn render_call(config: &EditorConfig) -> String {
    format!(
        "ReactDOM.createRoot(document.getElementById('{}')).render(<{} />);",
        config.mount_element_id, config.entry_component
    )
}

/// Full source handed to the transform: shim, user files, render call.
pub fn assemble_source(project: &Project, config: &EditorConfig) -> String {
    let user_code = project
        .build_order()
        .map(|(_, source)| source)
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}\n{user_code}\n{}\n", console_shim(), render_call(config))
}

pub fn build<T: Transform + ?Sized>(
    project: &Project,
    transform: &T,
    config: &EditorConfig,
) -> BuildState {
    let source = assemble_source(project, config);
    let options = TransformOptions::from_config(config);
    match transform.transform(&source, &options) {
        Ok(script) => {
            log::debug!(
                "build succeeded: {} files, {} bytes of script",
                project.files().len(),
                script.len()
            );
            BuildState::Compiled(render_document(&script, config))
        }
        Err(error) => {
            log::debug!("build failed: {error}");
            BuildState::Failed(error.message)
        }
    }
}
