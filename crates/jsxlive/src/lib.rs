//! Core of a multi-file JSX/TSX live editor.
//!
//! Source files live in a [`project::Project`]. They are bundled into one
//! script, compiled by an external [`bundle::Transform`], and wrapped in a
//! preview document that runs inside a sandboxed frame. The frame reports
//! `console.log` output back through `postMessage`. [`session::EditorSession`]
//! ties these together with autosave and Auto-Run.

pub mod beautify;
pub mod bundle;
pub mod config;
pub mod console;
pub mod error;
pub mod examples;
pub mod file_name;
pub mod platform;
pub mod preview;
pub mod project;
pub mod session;
pub mod storage;

pub use jsxlive_protocol as protocol;
