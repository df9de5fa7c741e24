//! Cast Runtime - Session lifecycle, command correlation, and channels
//!
//! This crate drives one cast device session on top of an external
//! transport:
//!
//! - **Session**: Connect/launch/join/disconnect state machine
//! - **Correlator**: Matching `requestId`-tagged replies to pending commands
//! - **Channel registry**: Namespaced app channels multiplexed over a session
//! - **Transport boundary**: Typed outbound commands and inbound events
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   cast-rs    │  Capability façades (media, volume, web apps)
//! └──────┬───────┘
//!        │ AppChannel / Session API
//! ┌──────▼───────┐
//! │ cast-runtime │  This crate
//! │  ┌────────┐  │
//! │  │ State  │  │  Lifecycle transitions
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Corr   │  │  requestId correlation
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Chans  │  │  Namespace registry
//! │  └────────┘  │
//! └──────┬───────┘
//!        │ TransportCommand / TransportEvent
//! ┌──────▼───────┐
//! │  transport   │  Sockets, TLS, framing (external)
//! └──────────────┘
//! ```
//!
//! # Decoupling via CastTransport
//!
//! The session never performs I/O. It hands [`TransportCommand`]s to a
//! [`CastTransport`] and is fed [`TransportEvent`]s, so it can be driven by a
//! real connection or by a scripted receiver in tests.

pub mod channel;
pub mod channel_registry;
pub mod config;
pub mod correlator;
pub mod error;
pub mod events;
pub mod session;
pub mod state;
pub mod transport;

// Re-export key types at crate root
pub use channel::AppChannel;
pub use channel_registry::{ChannelRegistry, MessageHandler, Route};
pub use config::SessionConfig;
pub use correlator::{
	CommandKind, Continuation, CorrelationId, Correlator, PendingCommand, ResponseFuture,
	response_channel,
};
pub use error::{Error, Result};
pub use events::SessionEvent;
pub use session::{Session, validate_volume_level};
pub use state::SessionState;
pub use transport::{CastTransport, ChannelTransport, DeviceFault, TransportCommand, TransportEvent};
