//! # Preview Bridge
//!
//! Pushes source to the sandbox and turns what comes back into pending
//! edits and render status. Inbound messages sit in the transport until the
//! host calls [`PreviewBridge::pump`], so nothing is consumed while a sync is
//! applying edits.

use loupe_editor::{EditBuffer, PreviewPort};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::protocol::{CompileResult, ErrorPhase, InboundMessage, OutboundMessage, PreviewError, PushFrame};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Preview channel closed")]
    Closed,

    #[error("Malformed message: {0}")]
    Malformed(String),
}

/// Carries JSON text between the editor and a sandbox.
pub trait Transport {
    fn send(&mut self, payload: String) -> Result<(), BridgeError>;

    /// Next queued inbound payload without waiting
    fn try_recv(&mut self) -> Result<Option<String>, BridgeError>;
}

/// Editor half of an in-process channel pair
#[derive(Debug)]
pub struct ChannelTransport {
    outbound: UnboundedSender<String>,
    inbound: UnboundedReceiver<String>,
}

impl ChannelTransport {
    pub async fn recv(&mut self) -> Option<String> {
        self.inbound.recv().await
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, payload: String) -> Result<(), BridgeError> {
        self.outbound.send(payload).map_err(|_| BridgeError::Closed)
    }

    fn try_recv(&mut self) -> Result<Option<String>, BridgeError> {
        match self.inbound.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(BridgeError::Closed),
        }
    }
}

/// Sandbox half of the channel pair; a host forwards it to the real page.
#[derive(Debug)]
pub struct SandboxEndpoint {
    frames: UnboundedReceiver<String>,
    messages: UnboundedSender<String>,
}

impl SandboxEndpoint {
    /// Wait for the next push. `None` once the bridge is dropped.
    pub async fn next_frame(&mut self) -> Option<PushFrame> {
        while let Some(payload) = self.frames.recv().await {
            if let Some(frame) = decode_frame(&payload) {
                return Some(frame);
            }
        }
        None
    }

    pub fn try_next_frame(&mut self) -> Option<PushFrame> {
        while let Ok(payload) = self.frames.try_recv() {
            if let Some(frame) = decode_frame(&payload) {
                return Some(frame);
            }
        }
        None
    }

    pub fn post(&self, message: &InboundMessage) -> Result<(), BridgeError> {
        let payload = serde_json::to_string(message).map_err(|err| BridgeError::Malformed(err.to_string()))?;
        self.post_raw(payload)
    }

    /// Forward a payload exactly as the page produced it
    pub fn post_raw(&self, payload: impl Into<String>) -> Result<(), BridgeError> {
        self.messages.send(payload.into()).map_err(|_| BridgeError::Closed)
    }
}

fn decode_frame(payload: &str) -> Option<PushFrame> {
    match serde_json::from_str(payload) {
        Ok(OutboundMessage::Push(frame)) => Some(frame),
        Err(err) => {
            warn!(error = %err, "dropping undecodable push frame");
            None
        }
    }
}

/// Create a connected bridge and sandbox endpoint.
pub fn preview_channel() -> (PreviewBridge<ChannelTransport>, SandboxEndpoint) {
    let (frames_tx, frames_rx) = mpsc::unbounded_channel();
    let (messages_tx, messages_rx) = mpsc::unbounded_channel();

    let transport = ChannelTransport {
        outbound: frames_tx,
        inbound: messages_rx,
    };
    let endpoint = SandboxEndpoint {
        frames: frames_rx,
        messages: messages_tx,
    };

    (PreviewBridge::new(transport), endpoint)
}

/// What one inbound message did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    EditRecorded,
    Rendered,
    Failed,
    Stale,
}

/// Counts from one [`PreviewBridge::pump`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub edits: usize,
    pub statuses: usize,
    pub dropped: usize,
}

#[derive(Debug)]
pub struct PreviewBridge<T: Transport = ChannelTransport> {
    transport: T,
    last_pushed: Option<u64>,
    last_result: Option<CompileResult>,
}

impl<T: Transport> PreviewBridge<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_pushed: None,
            last_result: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Send source for rendering. Never fails; a lost push becomes the
    /// preview error.
    pub fn push_source(&mut self, revision: u64, source: &str) {
        let message = OutboundMessage::Push(PushFrame {
            revision,
            source: source.to_string(),
        });

        let sent = serde_json::to_string(&message)
            .map_err(|err| BridgeError::Malformed(err.to_string()))
            .and_then(|payload| self.transport.send(payload));

        self.last_pushed = Some(revision);
        match sent {
            Ok(()) => {
                debug!(revision, "push sent");
                self.last_result = None;
            }
            Err(err) => {
                warn!(revision, error = %err, "push failed");
                self.last_result = Some(Err(PreviewError {
                    phase: ErrorPhase::Transport,
                    message: err.to_string(),
                }));
            }
        }
    }

    /// Revision of the most recent push
    pub fn last_pushed(&self) -> Option<u64> {
        self.last_pushed
    }

    /// `None` until the sandbox answers the latest push
    pub fn last_result(&self) -> Option<&CompileResult> {
        self.last_result.as_ref()
    }

    pub fn preview_error(&self) -> Option<&PreviewError> {
        match &self.last_result {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    pub fn handle(&mut self, message: InboundMessage, buffer: &mut EditBuffer) -> Handled {
        if let (Some(revision), Some(latest)) = (message.revision(), self.last_pushed) {
            if revision < latest {
                warn!(revision, latest, "ignoring stale preview status");
                return Handled::Stale;
            }
        }

        match message {
            InboundMessage::TextEdit { .. } => {
                if let Some(edit) = message.into_edit() {
                    buffer.record(edit);
                }
                Handled::EditRecorded
            }
            InboundMessage::Rendered { revision } => {
                debug!(?revision, "preview rendered");
                self.last_result = Some(Ok(()));
                Handled::Rendered
            }
            InboundMessage::Error { phase, message, revision } => {
                info!(?revision, %phase, %message, "preview reported an error");
                self.last_result = Some(Err(PreviewError { phase, message }));
                Handled::Failed
            }
        }
    }

    /// Decode and handle one raw payload. Malformed payloads are logged and
    /// dropped.
    pub fn receive_raw(&mut self, payload: &str, buffer: &mut EditBuffer) -> Result<Handled, BridgeError> {
        match serde_json::from_str::<InboundMessage>(payload) {
            Ok(message) => Ok(self.handle(message, buffer)),
            Err(err) => {
                warn!(error = %err, "dropping malformed preview message");
                Err(BridgeError::Malformed(err.to_string()))
            }
        }
    }

    /// Handle every message queued so far.
    pub fn pump(&mut self, buffer: &mut EditBuffer) -> PumpStats {
        let mut stats = PumpStats::default();

        loop {
            let payload = match self.transport.try_recv() {
                Ok(Some(payload)) => payload,
                Ok(None) => break,
                Err(err) => {
                    debug!(error = %err, "preview channel unavailable");
                    break;
                }
            };

            match self.receive_raw(&payload, buffer) {
                Ok(Handled::EditRecorded) => stats.edits += 1,
                Ok(Handled::Rendered | Handled::Failed) => stats.statuses += 1,
                Ok(Handled::Stale) | Err(_) => stats.dropped += 1,
            }
        }

        stats
    }
}

impl PreviewBridge<ChannelTransport> {
    /// Wait for one inbound message and handle it. `None` once the sandbox
    /// endpoint is dropped.
    pub async fn next_message(&mut self, buffer: &mut EditBuffer) -> Option<Result<Handled, BridgeError>> {
        let payload = self.transport.recv().await?;
        Some(self.receive_raw(&payload, buffer))
    }
}

impl<T: Transport> PreviewPort for PreviewBridge<T> {
    fn push(&mut self, revision: u64, source: &str) {
        self.push_source(revision, source);
    }
}
