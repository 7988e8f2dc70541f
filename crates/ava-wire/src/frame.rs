//! ---
//! ava_section: "02-wire-data-model"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Telemetry wire formats and framing."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---

/// A transmit-ready WebSocket payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireFrame {
    /// JSON bundle, sent as a text frame.
    Text(String),
    /// Fixed packet, sent as a binary frame.
    Binary(Vec<u8>),
}

impl WireFrame {
    pub fn kind(&self) -> &'static str {
        match self {
            WireFrame::Text(_) => "text",
            WireFrame::Binary(_) => "binary",
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        match self {
            WireFrame::Text(text) => text.len(),
            WireFrame::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
