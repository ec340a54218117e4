//! # Live Session
//!
//! Wires an [`EditSession`] to a [`PreviewBridge`]: the host UI talks to this
//! type only.

use loupe_editor::{EditSession, EditorConfig, EditorError, HeadingPreset, StyleEdit, SyncReport};
use loupe_parser::ElementAddress;
use tracing::debug;

use crate::bridge::{preview_channel, ChannelTransport, PreviewBridge, PumpStats, SandboxEndpoint, Transport};
use crate::protocol::PreviewError;

pub struct LiveSession<T: Transport = ChannelTransport> {
    editor: EditSession,
    bridge: PreviewBridge<T>,
}

impl LiveSession<ChannelTransport> {
    /// Session plus the sandbox end of an in-process channel
    pub fn connect(config: EditorConfig) -> (Self, SandboxEndpoint) {
        let (bridge, endpoint) = preview_channel();
        (Self::new(config, bridge), endpoint)
    }
}

impl<T: Transport> LiveSession<T> {
    pub fn new(config: EditorConfig, bridge: PreviewBridge<T>) -> Self {
        Self {
            editor: EditSession::new(config),
            bridge,
        }
    }

    pub fn editor(&self) -> &EditSession {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditSession {
        &mut self.editor
    }

    pub fn bridge(&self) -> &PreviewBridge<T> {
        &self.bridge
    }

    pub fn source(&self) -> &str {
        self.editor.source()
    }

    /// The user typed new source; it is not rendered until the next
    /// [`update_preview`](Self::update_preview).
    pub fn set_source(&mut self, text: impl Into<String>) {
        self.editor.set_source(text);
    }

    pub fn update_preview(&mut self) {
        self.editor.update_preview(&mut self.bridge);
    }

    /// Take in everything the sandbox has sent so far.
    pub fn pump(&mut self) -> PumpStats {
        let stats = self.bridge.pump(self.editor.buffer_mut());
        if stats != PumpStats::default() {
            debug!(edits = stats.edits, statuses = stats.statuses, dropped = stats.dropped, "pumped preview messages");
        }
        stats
    }

    /// Whether edits are pending, as of the last pump
    pub fn can_sync(&self) -> bool {
        self.editor.can_sync()
    }

    /// Pump, then apply every pending edit and re-render.
    pub fn sync(&mut self) -> Result<SyncReport, EditorError> {
        self.pump();
        self.editor.sync(&mut self.bridge)
    }

    pub fn discard_pending(&mut self) -> usize {
        self.pump();
        self.editor.discard_pending()
    }

    pub fn select(&mut self, address: ElementAddress) -> Result<(), EditorError> {
        self.editor.select(address)
    }

    pub fn apply_style(&mut self) -> Result<StyleEdit, EditorError> {
        self.editor.apply_style()
    }

    pub fn apply_heading(&mut self, preset: HeadingPreset) -> Result<StyleEdit, EditorError> {
        self.editor.apply_heading(preset)
    }

    /// Last compile, runtime or transport error for the latest push
    pub fn preview_error(&self) -> Option<&PreviewError> {
        self.bridge.preview_error()
    }
}
