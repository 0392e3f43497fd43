//! Message types for host page <-> preview frame communication.
//!
//! The preview runs inside a sandboxed `<iframe>` without same-origin access,
//! so the only channel back to the host is `window.parent.postMessage`.
//! Both directions carry small JSON-shaped objects:
//!
//! - host -> frame: `{ "type": "request-logs" }`
//! - frame -> host: `{ "source": "iframe-console", "logs": "<text>" }`

use serde::{Deserialize, Serialize};

/// Marker carried in the `source` field of every frame -> host message.
pub const CONSOLE_SOURCE: &str = "iframe-console";

/// Text the frame answers with when asked for its console.
pub const CONSOLE_READY: &str = "Console Ready";

/// Requests sent from the host page into the preview frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PreviewRequest {
    /// Ask the frame to announce that its console bridge is installed
    RequestLogs,
}

impl PreviewRequest {
    /// Value of the `type` tag as it appears on the wire.
    pub fn type_tag(&self) -> &'static str {
        match self {
            PreviewRequest::RequestLogs => "request-logs",
        }
    }
}

/// Console line forwarded from the preview frame to the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    pub source: String,
    pub logs: String,
}

impl ConsoleMessage {
    pub fn new(logs: impl Into<String>) -> Self {
        Self {
            source: CONSOLE_SOURCE.to_string(),
            logs: logs.into(),
        }
    }

    /// Readiness notice sent in reply to [`PreviewRequest::RequestLogs`].
    pub fn ready() -> Self {
        Self::new(CONSOLE_READY)
    }

    /// Other frames (devtools extensions, nested widgets) post messages too;
    /// only ours carry the marker.
    pub fn is_from_preview(&self) -> bool {
        self.source == CONSOLE_SOURCE
    }
}
