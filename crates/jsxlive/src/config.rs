//! Editor configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! storage_key = "jsxeditor_project_v2"
//! entry_file = "App.jsx"
//! auto_run = true
//! presets = ["react"]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::file_name::is_valid_file_name;

pub const DEFAULT_STORAGE_KEY: &str = "jsxeditor_project_v2";
pub const DEFAULT_ENTRY_FILE: &str = "App.jsx";
pub const DEFAULT_NEW_FILE_TEMPLATE: &str = "// New file";

const REACT_UMD_URL: &str = "https://unpkg.com/react@18/umd/react.development.js";
const REACT_DOM_UMD_URL: &str = "https://unpkg.com/react-dom@18/umd/react-dom.development.js";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Key under which the File Map is persisted
    pub storage_key: String,
    /// File that is always present, always bundled last and rendered
    pub entry_file: String,
    /// Component the render snippet mounts
    pub entry_component: String,
    /// Id of the element the preview document mounts into
    pub mount_element_id: String,
    /// Rebuild after every change
    pub auto_run: bool,
    /// Transform presets, passed to the transform unchanged
    pub presets: Vec<String>,
    /// Runtime scripts loaded by the preview document, in order
    pub runtime_scripts: Vec<String>,
    /// Content of a freshly added file
    pub new_file_template: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            entry_file: DEFAULT_ENTRY_FILE.to_string(),
            entry_component: "App".to_string(),
            mount_element_id: "root".to_string(),
            auto_run: true,
            presets: vec!["react".to_string()],
            runtime_scripts: vec![REACT_UMD_URL.to_string(), REACT_DOM_UMD_URL.to_string()],
            new_file_template: DEFAULT_NEW_FILE_TEMPLATE.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_file_name(&self.entry_file) {
            return Err(ConfigError::InvalidEntryFile(self.entry_file.clone()));
        }
        Ok(())
    }
}
