//! Editor state: File Store, build result, Console Log and Auto-Run.
//!
//! Every change to the files is written to storage right away. With Auto-Run on,
//! a change to the files, to the selected file or to the flag itself rebuilds the
//! preview synchronously. Builds are not debounced or cached.

use crate::beautify::beautify;
use crate::bundle::{BuildState, Transform, build};
use crate::config::EditorConfig;
use crate::console::{ConsoleLog, parse_console_message};
use crate::error::{FileOpError, ProjectError, StorageError};
use crate::examples::{DEFAULT_PROJECT, find_example};
use crate::project::{Project, ProjectFiles};
use crate::storage::{KeyValueStorage, ProjectStore};

/// The active file, ready to be offered as a plain-text download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    pub file_name: String,
    pub contents: String,
}

pub struct EditorSession<S, T> {
    config: EditorConfig,
    project: Project,
    store: ProjectStore<S>,
    transform: T,
    build: BuildState,
    console: ConsoleLog,
    auto_run: bool,
}

impl<S: KeyValueStorage, T: Transform> EditorSession<S, T> {
    /// Restores the saved project, or starts from the default one when nothing
    /// usable is stored.
    pub fn open(config: EditorConfig, storage: S, transform: T) -> Result<Self, ProjectError> {
        config.validate()?;
        let store = ProjectStore::new(storage, config.storage_key.clone());
        let project = Project::new(config.entry_file.clone(), restore_files(&store, &config))?;
        let mut session = Self {
            auto_run: config.auto_run,
            config,
            project,
            store,
            transform,
            build: BuildState::NotBuilt,
            console: ConsoleLog::new(),
        };
        session.persist();
        session.rebuild_if_auto();
        Ok(session)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn files(&self) -> &ProjectFiles {
        self.project.files()
    }

    pub fn active_file(&self) -> &str {
        self.project.active_file()
    }

    pub fn active_source(&self) -> &str {
        self.project.active_source()
    }

    pub fn build_state(&self) -> &BuildState {
        &self.build
    }

    pub fn compiled_output(&self) -> &str {
        self.build.compiled_output()
    }

    pub fn error(&self) -> Option<&str> {
        self.build.error()
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn auto_run(&self) -> bool {
        self.auto_run
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    pub fn edit_active(&mut self, source: impl Into<String>) {
        self.project.set_active_source(source);
        self.files_changed();
    }

    pub fn add_file(&mut self, name: &str) -> Result<(), FileOpError> {
        let template = self.config.new_file_template.clone();
        self.project.add_file(name, template)?;
        log::debug!("added {name}");
        self.files_changed();
        Ok(())
    }

    pub fn rename_file(&mut self, from: &str, to: &str) -> Result<(), FileOpError> {
        if from == to {
            return Ok(());
        }
        self.project.rename_file(from, to)?;
        log::debug!("renamed {from} to {to}");
        self.files_changed();
        Ok(())
    }

    pub fn delete_file(&mut self, name: &str) -> Result<(), FileOpError> {
        self.project.delete_file(name)?;
        log::debug!("deleted {name}");
        self.files_changed();
        Ok(())
    }

    pub fn select_file(&mut self, name: &str) -> Result<(), FileOpError> {
        self.project.select_file(name)?;
        self.rebuild_if_auto();
        Ok(())
    }

    pub fn beautify_active(&mut self) {
        let formatted = beautify(self.project.active_source());
        self.edit_active(formatted);
    }

    pub fn download_active(&self) -> FileDownload {
        FileDownload {
            file_name: self.project.active_file().to_string(),
            contents: self.project.active_source().to_string(),
        }
    }

    pub fn set_auto_run(&mut self, auto_run: bool) {
        if self.auto_run == auto_run {
            return;
        }
        self.auto_run = auto_run;
        self.rebuild_if_auto();
    }

    /// Builds now, regardless of Auto-Run. Clears the Console Log first so it
    /// only shows output of the new preview.
    pub fn run(&mut self) {
        self.console.clear();
        self.build = build(&self.project, &self.transform, &self.config);
        if let Some(error) = self.build.error() {
            log::warn!("build failed: {error}");
        }
    }

    /// Explicit save. Autosave already does this after every change.
    pub fn save_project(&self) -> Result<(), StorageError> {
        self.store.save(self.project.files())
    }

    /// Replaces all files with the saved ones.
    pub fn load_project(&mut self) -> Result<(), ProjectError> {
        let files = self.store.load()?.ok_or(ProjectError::NoSavedProject)?;
        self.project.replace_files(files)?;
        self.files_changed();
        Ok(())
    }

    /// Replaces all files with the default project and clears the Console Log.
    pub fn reset_project(&mut self) {
        let files = default_files(&self.config);
        if let Err(error) = self.project.replace_files(files) {
            log::error!("default project is unusable: {error}");
            return;
        }
        self.console.clear();
        self.files_changed();
    }

    /// Replaces all files with a built-in example and activates the entry file.
    pub fn load_example(&mut self, name: &str) -> Result<(), ProjectError> {
        let example =
            find_example(name).ok_or_else(|| ProjectError::UnknownExample(name.to_string()))?;
        self.project
            .reset_files(example.project_files_with_entry(&self.config.entry_file))?;
        log::debug!("loaded example {name}");
        self.files_changed();
        Ok(())
    }

    /// Handles a cross-context message. Returns whether it was a console line.
    pub fn receive_message(&mut self, data: &serde_json::Value) -> bool {
        match parse_console_message(data) {
            Some(line) => {
                self.console.push(line);
                true
            }
            None => false,
        }
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
    }

    fn files_changed(&mut self) {
        self.persist();
        self.rebuild_if_auto();
    }

    fn persist(&self) {
        if let Err(error) = self.save_project() {
            log::error!("Failed to store project files: {error}");
        }
    }

    fn rebuild_if_auto(&mut self) {
        if self.auto_run {
            self.run();
        }
    }
}

fn default_files(config: &EditorConfig) -> ProjectFiles {
    DEFAULT_PROJECT.project_files_with_entry(&config.entry_file)
}

fn restore_files<S: KeyValueStorage>(store: &ProjectStore<S>, config: &EditorConfig) -> ProjectFiles {
    match store.load() {
        Ok(Some(files)) if files.contains(&config.entry_file) => files,
        Ok(Some(_)) => {
            log::warn!(
                "Ignoring saved project without entry file {}",
                config.entry_file
            );
            default_files(config)
        }
        Ok(None) => default_files(config),
        Err(error) => {
            log::warn!("Ignoring saved project: {error}");
            default_files(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::bundle::TransformOptions;
    use crate::error::{ConfigError, TransformError};
    use crate::platform::memory::MemoryStorage;

    #[derive(Default)]
    struct CountingTransform {
        calls: Cell<usize>,
    }

    impl Transform for CountingTransform {
        fn transform(
            &self,
            source: &str,
            _options: &TransformOptions,
        ) -> Result<String, TransformError> {
            self.calls.set(self.calls.get() + 1);
            if source.contains("<<<") {
                Err(TransformError::new("Unexpected token"))
            } else {
                Ok(source.to_string())
            }
        }
    }

    type Session = EditorSession<Rc<MemoryStorage>, Rc<CountingTransform>>;

    fn open(config: EditorConfig) -> (Session, Rc<MemoryStorage>, Rc<CountingTransform>) {
        let storage = Rc::new(MemoryStorage::new());
        let transform = Rc::new(CountingTransform::default());
        let session = EditorSession::open(config, storage.clone(), transform.clone()).unwrap();
        (session, storage, transform)
    }

    #[test]
    fn test_open_builds_default_project() {
        let (session, storage, transform) = open(EditorConfig::default());
        assert_eq!(session.active_file(), "App.jsx");
        assert_eq!(transform.calls.get(), 1);
        assert!(session.compiled_output().contains("Hello JSX!"));
        assert!(storage.get("jsxeditor_project_v2").unwrap().is_some());
    }

    #[test]
    fn test_open_without_auto_run_does_not_build() {
        let config = EditorConfig {
            auto_run: false,
            ..EditorConfig::default()
        };
        let (mut session, _, transform) = open(config);
        session.edit_active("function App() { return null; }");
        assert_eq!(transform.calls.get(), 0);
        assert_eq!(*session.build_state(), BuildState::NotBuilt);
        session.run();
        assert_eq!(transform.calls.get(), 1);
    }

    #[test]
    fn test_select_file_rebuilds_when_auto() {
        let (mut session, _, transform) = open(EditorConfig::default());
        session.add_file("utils.js").unwrap();
        let calls = transform.calls.get();
        session.select_file("App.jsx").unwrap();
        assert_eq!(transform.calls.get(), calls + 1);
    }

    #[test]
    fn test_enabling_auto_run_builds() {
        let config = EditorConfig {
            auto_run: false,
            ..EditorConfig::default()
        };
        let (mut session, _, transform) = open(config);
        session.set_auto_run(true);
        assert_eq!(transform.calls.get(), 1);
        session.set_auto_run(true);
        assert_eq!(transform.calls.get(), 1);
    }

    #[test]
    fn test_run_clears_console() {
        let (mut session, _, _) = open(EditorConfig::default());
        session.receive_message(&json!({ "source": "iframe-console", "logs": "old" }));
        assert_eq!(session.console().len(), 1);
        session.run();
        assert!(session.console().is_empty());
    }

    #[test]
    fn test_failed_build_sets_error() {
        let (mut session, _, _) = open(EditorConfig::default());
        session.edit_active("<<<");
        assert_eq!(session.error(), Some("Unexpected token"));
        assert_eq!(session.compiled_output(), "");
        session.edit_active("function App() {}");
        assert_eq!(session.error(), None);
        assert!(!session.compiled_output().is_empty());
    }

    #[test]
    fn test_beautify_active() {
        let (mut session, _, _) = open(EditorConfig::default());
        session.edit_active("function App() { return 1; }");
        session.beautify_active();
        assert_eq!(session.active_source(), "function App() {\n  return 1;\n  }");
    }

    #[test]
    fn test_download_active() {
        let (mut session, _, _) = open(EditorConfig::default());
        session.add_file("utils.js").unwrap();
        assert_eq!(
            session.download_active(),
            FileDownload {
                file_name: "utils.js".to_string(),
                contents: "// New file".to_string(),
            }
        );
    }

    #[test]
    fn test_reset_clears_console_without_auto_run() {
        let config = EditorConfig {
            auto_run: false,
            ..EditorConfig::default()
        };
        let (mut session, _, transform) = open(config);
        session.add_file("utils.js").unwrap();
        session.receive_message(&json!({ "source": "iframe-console", "logs": "old" }));
        session.reset_project();
        assert!(session.console().is_empty());
        assert!(!session.files().contains("utils.js"));
        assert_eq!(transform.calls.get(), 0);
    }

    #[test]
    fn test_load_without_saved_project() {
        let (mut session, storage, _) = open(EditorConfig::default());
        storage.remove("jsxeditor_project_v2").unwrap();
        assert!(matches!(
            session.load_project(),
            Err(ProjectError::NoSavedProject)
        ));
    }

    #[test]
    fn test_custom_entry_file() {
        let config = EditorConfig {
            entry_file: "Main.tsx".to_string(),
            ..EditorConfig::default()
        };
        let (mut session, _, _) = open(config);
        assert_eq!(session.active_file(), "Main.tsx");
        session.load_example("Counter").unwrap();
        assert!(session.files().contains("Main.tsx"));
        assert!(!session.files().contains("App.jsx"));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = EditorConfig {
            entry_file: "App".to_string(),
            ..EditorConfig::default()
        };
        let result = EditorSession::open(
            config,
            MemoryStorage::new(),
            CountingTransform::default(),
        );
        assert!(matches!(
            result,
            Err(ProjectError::Config(ConfigError::InvalidEntryFile(_)))
        ));
    }
}
