//! The File Store: an ordered filename -> source map with one entry file.
//!
//! Invariants kept by every operation on [`Project`]:
//! - the entry file is present
//! - the active file names an existing entry of the map
//!
//! Rejected operations return a [`FileOpError`] and leave the project unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::FileOpError;
use crate::file_name::validate_file_name;

/// Project files in insertion order. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectFiles(IndexMap<String, String>);

impl ProjectFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, source)| (name.as_str(), source.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.0.insert(name.into(), source.into());
    }
}

impl<N: Into<String>, S: Into<String>> FromIterator<(N, S)> for ProjectFiles {
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, source)| (name.into(), source.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    files: ProjectFiles,
    active_file: String,
    entry_file: String,
}

impl Project {
    /// Opens `files` with the entry file active.
    pub fn new(entry_file: impl Into<String>, files: ProjectFiles) -> Result<Self, FileOpError> {
        let entry_file = entry_file.into();
        if !files.contains(&entry_file) {
            return Err(FileOpError::MissingEntry(entry_file));
        }
        Ok(Self {
            files,
            active_file: entry_file.clone(),
            entry_file,
        })
    }

    pub fn files(&self) -> &ProjectFiles {
        &self.files
    }

    pub fn entry_file(&self) -> &str {
        &self.entry_file
    }

    pub fn active_file(&self) -> &str {
        &self.active_file
    }

    pub fn is_entry(&self, name: &str) -> bool {
        name == self.entry_file
    }

    pub fn active_source(&self) -> &str {
        self.files.get(&self.active_file).unwrap_or_default()
    }

    /// Adds a new file and makes it active.
    pub fn add_file(&mut self, name: &str, source: impl Into<String>) -> Result<(), FileOpError> {
        validate_file_name(name)?;
        if self.files.contains(name) {
            return Err(FileOpError::AlreadyExists(name.to_string()));
        }
        self.files.insert(name, source);
        self.active_file = name.to_string();
        Ok(())
    }

    /// Moves `from` to `to`, keeping its content. The renamed file goes to the
    /// end of the iteration order and becomes active.
    ///
    /// Renaming a file to its own name does nothing.
    pub fn rename_file(&mut self, from: &str, to: &str) -> Result<(), FileOpError> {
        if self.is_entry(from) {
            return Err(FileOpError::CannotRenameEntry(from.to_string()));
        }
        if !self.files.contains(from) {
            return Err(FileOpError::NotFound(from.to_string()));
        }
        if from == to {
            return Ok(());
        }
        validate_file_name(to)?;
        if self.files.contains(to) {
            return Err(FileOpError::AlreadyExists(to.to_string()));
        }
        let Some(source) = self.files.0.shift_remove(from) else {
            return Err(FileOpError::NotFound(from.to_string()));
        };
        self.files.insert(to, source);
        self.active_file = to.to_string();
        Ok(())
    }

    /// Removes a file. The entry file becomes active.
    pub fn delete_file(&mut self, name: &str) -> Result<(), FileOpError> {
        if self.is_entry(name) {
            return Err(FileOpError::CannotDeleteEntry(name.to_string()));
        }
        if self.files.0.shift_remove(name).is_none() {
            return Err(FileOpError::NotFound(name.to_string()));
        }
        self.active_file = self.entry_file.clone();
        Ok(())
    }

    pub fn select_file(&mut self, name: &str) -> Result<(), FileOpError> {
        if !self.files.contains(name) {
            return Err(FileOpError::NotFound(name.to_string()));
        }
        self.active_file = name.to_string();
        Ok(())
    }

    pub fn set_active_source(&mut self, source: impl Into<String>) {
        let active = self.active_file.clone();
        self.files.insert(active, source);
    }

    /// Replaces every file. The active file survives if the new set still has it.
    pub fn replace_files(&mut self, files: ProjectFiles) -> Result<(), FileOpError> {
        if !files.contains(&self.entry_file) {
            return Err(FileOpError::MissingEntry(self.entry_file.clone()));
        }
        if !files.contains(&self.active_file) {
            self.active_file = self.entry_file.clone();
        }
        self.files = files;
        Ok(())
    }

    /// Replaces every file and activates the entry file.
    pub fn reset_files(&mut self, files: ProjectFiles) -> Result<(), FileOpError> {
        self.replace_files(files)?;
        self.active_file = self.entry_file.clone();
        Ok(())
    }

    /// Non-entry files in map order, then the entry file.
    pub fn build_order(&self) -> impl Iterator<Item = (&str, &str)> {
        let entry = self
            .files
            .get(&self.entry_file)
            .map(|source| (self.entry_file.as_str(), source));
        self.files
            .iter()
            .filter(|(name, _)| !self.is_entry(name))
            .chain(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(files: &[(&str, &str)]) -> Project {
        Project::new("App.jsx", files.iter().copied().collect()).unwrap()
    }

    fn names(project: &Project) -> Vec<&str> {
        project.files().names().collect()
    }

    #[test]
    fn test_new_requires_entry() {
        let files: ProjectFiles = [("utils.js", "")].into_iter().collect();
        assert_eq!(
            Project::new("App.jsx", files),
            Err(FileOpError::MissingEntry("App.jsx".to_string()))
        );
    }

    #[test]
    fn test_add_file_becomes_active() {
        let mut project = project(&[("App.jsx", "app")]);
        project.add_file("utils.js", "// New file").unwrap();
        assert_eq!(project.active_file(), "utils.js");
        assert_eq!(project.active_source(), "// New file");
        assert_eq!(names(&project), ["App.jsx", "utils.js"]);
    }

    #[test]
    fn test_add_file_rejects_invalid_and_duplicate() {
        let mut project = project(&[("App.jsx", "app")]);
        let before = project.clone();
        assert_eq!(
            project.add_file("notes.txt", ""),
            Err(FileOpError::InvalidName("notes.txt".to_string()))
        );
        assert_eq!(
            project.add_file("App.jsx", ""),
            Err(FileOpError::AlreadyExists("App.jsx".to_string()))
        );
        assert_eq!(project, before);
    }

    #[test]
    fn test_delete_entry_rejected() {
        let mut project = project(&[("App.jsx", "app"), ("utils.js", "u")]);
        assert_eq!(
            project.delete_file("App.jsx"),
            Err(FileOpError::CannotDeleteEntry("App.jsx".to_string()))
        );
        assert!(project.files().contains("App.jsx"));
    }

    #[test]
    fn test_delete_activates_entry() {
        let mut project = project(&[("App.jsx", "app"), ("utils.js", "u"), ("b.js", "b")]);
        project.select_file("utils.js").unwrap();
        project.delete_file("utils.js").unwrap();
        assert_eq!(project.active_file(), "App.jsx");
        assert_eq!(names(&project), ["App.jsx", "b.js"]);
    }

    #[test]
    fn test_delete_missing_file() {
        let mut project = project(&[("App.jsx", "app")]);
        assert_eq!(
            project.delete_file("ghost.js"),
            Err(FileOpError::NotFound("ghost.js".to_string()))
        );
    }

    #[test]
    fn test_rename_moves_key_to_end_and_keeps_content() {
        let mut project = project(&[("a.js", "a"), ("App.jsx", "app"), ("b.js", "b")]);
        project.rename_file("a.js", "c.js").unwrap();
        assert_eq!(names(&project), ["App.jsx", "b.js", "c.js"]);
        assert_eq!(project.files().get("c.js"), Some("a"));
        assert_eq!(project.active_file(), "c.js");
    }

    #[test]
    fn test_rename_rejections_leave_project_unchanged() {
        let mut project = project(&[("App.jsx", "app"), ("a.js", "a"), ("b.js", "b")]);
        let before = project.clone();
        assert_eq!(
            project.rename_file("a.js", "a.py"),
            Err(FileOpError::InvalidName("a.py".to_string()))
        );
        assert_eq!(
            project.rename_file("a.js", "b.js"),
            Err(FileOpError::AlreadyExists("b.js".to_string()))
        );
        assert_eq!(
            project.rename_file("App.jsx", "Main.jsx"),
            Err(FileOpError::CannotRenameEntry("App.jsx".to_string()))
        );
        assert_eq!(
            project.rename_file("ghost.js", "g.js"),
            Err(FileOpError::NotFound("ghost.js".to_string()))
        );
        assert_eq!(project, before);
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let mut project = project(&[("App.jsx", "app"), ("a.js", "a")]);
        let before = project.clone();
        project.rename_file("a.js", "a.js").unwrap();
        assert_eq!(project, before);
    }

    #[test]
    fn test_select_unknown_file() {
        let mut project = project(&[("App.jsx", "app")]);
        assert!(project.select_file("x.js").is_err());
        assert_eq!(project.active_file(), "App.jsx");
    }

    #[test]
    fn test_build_order_puts_entry_last() {
        let project = project(&[("b.js", "b"), ("App.jsx", "app"), ("a.js", "a")]);
        let order: Vec<_> = project.build_order().map(|(name, _)| name).collect();
        assert_eq!(order, ["b.js", "a.js", "App.jsx"]);
    }

    #[test]
    fn test_replace_files_keeps_active_when_present() {
        let mut project = project(&[("App.jsx", "app"), ("a.js", "a")]);
        project.select_file("a.js").unwrap();
        project
            .replace_files([("App.jsx", "new"), ("a.js", "new a")].into_iter().collect())
            .unwrap();
        assert_eq!(project.active_file(), "a.js");

        project
            .replace_files([("App.jsx", "newer")].into_iter().collect())
            .unwrap();
        assert_eq!(project.active_file(), "App.jsx");
    }

    #[test]
    fn test_replace_files_requires_entry() {
        let mut project = project(&[("App.jsx", "app")]);
        let result = project.replace_files([("a.js", "a")].into_iter().collect());
        assert_eq!(result, Err(FileOpError::MissingEntry("App.jsx".to_string())));
        assert_eq!(project.active_source(), "app");
    }

    #[test]
    fn test_set_active_source() {
        let mut project = project(&[("App.jsx", "app"), ("a.js", "a")]);
        project.select_file("a.js").unwrap();
        project.set_active_source("edited");
        assert_eq!(project.files().get("a.js"), Some("edited"));
        assert_eq!(names(&project), ["App.jsx", "a.js"]);
    }
}
