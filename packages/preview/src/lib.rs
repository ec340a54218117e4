//! # Loupe Preview
//!
//! Connects an editing session to a sandboxed live preview.
//!
//! ```text
//! LiveSession ──push──▶ PreviewBridge ══Transport══▶ sandbox page
//!      ▲                     │                            │
//!      └──── EditBuffer ◀────┘◀── TEXT_EDIT / RENDERED / ERROR
//! ```
//!
//! The sandbox page ([`sandbox_document`]) and [`dom::enumerate_rendered`]
//! address rendered elements with the same rule the parser applies to
//! source, so an edit made in the preview names the element it came from.

pub mod bridge;
pub mod dom;
pub mod protocol;
pub mod sandbox;
pub mod session;

pub use bridge::{preview_channel, BridgeError, ChannelTransport, Handled, PreviewBridge, PumpStats, SandboxEndpoint, Transport};
pub use dom::{enumerate_rendered, instrument, RenderedNode};
pub use protocol::{CompileResult, ErrorPhase, InboundMessage, OutboundMessage, PreviewError, PushFrame};
pub use sandbox::{sandbox_document, SandboxOptions};
pub use session::LiveSession;
