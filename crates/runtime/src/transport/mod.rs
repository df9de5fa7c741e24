//! Boundary to the external cast transport.
//!
//! The runtime never touches sockets. Outbound work is expressed as
//! [`TransportCommand`]s handed to a [`CastTransport`]; everything the device
//! says comes back as [`TransportEvent`]s fed to
//! [`Session::handle_event`](crate::Session::handle_event) or
//! [`Session::run`](crate::Session::run).
//!
//! ```text
//! ┌──────────┐  TransportCommand   ┌───────────────┐
//! │ Session  │ ──────────────────► │ CastTransport │ ──► TLS / protobuf framing
//! │          │ ◄────────────────── │  (external)   │ ◄── receiver
//! └──────────┘  TransportEvent     └───────────────┘
//! ```

use std::sync::Arc;

use cast_protocol::{ApplicationInfo, Device, Volume};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::correlator::CorrelationId;
use crate::error::{Error, Result};

/// Outbound request to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
	/// Open the connection to the device.
	Connect { device: Arc<Device> },
	/// Close the connection. No reply is expected.
	Disconnect,
	/// Launch a receiver application (`relaunch` restarts it if running).
	LaunchApplication {
		request_id: CorrelationId,
		app_id: String,
		relaunch: bool,
	},
	/// Attach to an already running receiver application.
	JoinApplication { request_id: CorrelationId, app_id: String },
	/// Stop a receiver application. No reply is expected.
	StopApplication { session_id: String },
	/// Send a message on an app channel.
	Send {
		namespace: String,
		/// Transport id of the joined application.
		destination: String,
		payload: Value,
	},
	GetVolume { request_id: CorrelationId },
	SetVolume { request_id: CorrelationId, level: f64 },
	SetMute { request_id: CorrelationId, muted: bool },
}

impl TransportCommand {
	/// Correlation id of the command, for commands that expect a reply.
	pub fn request_id(&self) -> Option<CorrelationId> {
		match self {
			TransportCommand::LaunchApplication { request_id, .. }
			| TransportCommand::JoinApplication { request_id, .. }
			| TransportCommand::GetVolume { request_id }
			| TransportCommand::SetVolume { request_id, .. }
			| TransportCommand::SetMute { request_id, .. } => Some(*request_id),
			TransportCommand::Send { payload, .. } => {
				cast_protocol::request_id(payload).map(CorrelationId::new)
			}
			TransportCommand::Connect { .. }
			| TransportCommand::Disconnect
			| TransportCommand::StopApplication { .. } => None,
		}
	}
}

/// Failure reported by the device for a device-level primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFault {
	pub code: Option<i64>,
	pub reason: String,
}

impl DeviceFault {
	pub fn new(reason: impl Into<String>) -> Self {
		Self {
			code: None,
			reason: reason.into(),
		}
	}

	pub fn with_code(mut self, code: i64) -> Self {
		self.code = Some(code);
		self
	}
}

impl From<DeviceFault> for Error {
	fn from(fault: DeviceFault) -> Self {
		Error::DeviceError {
			code: fault.code,
			reason: fault.reason,
		}
	}
}

/// Asynchronous notification from the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
	Connected,
	ConnectFailed { code: Option<i64>, reason: String },
	/// The device or network closed the connection.
	DisconnectedByPeer { reason: Option<String> },
	/// A launch or join request was acknowledged.
	ApplicationJoined {
		request_id: CorrelationId,
		app: ApplicationInfo,
	},
	/// A launch or join request was refused.
	ApplicationRejected {
		request_id: CorrelationId,
		code: Option<i64>,
		reason: String,
	},
	/// The receiver application exited.
	ApplicationStopped { session_id: String },
	/// Inbound app-channel traffic.
	Message { namespace: String, payload: Value },
	/// Reply to a device-level primitive (volume get/set).
	DeviceReply {
		request_id: CorrelationId,
		result: std::result::Result<Volume, DeviceFault>,
	},
	/// Unsolicited receiver status push carrying the device volume.
	ReceiverStatus { volume: Volume },
}

/// Outbound half of the transport boundary.
///
/// `submit` must not block: implementations queue the command and return.
pub trait CastTransport: Send + Sync {
	fn submit(&self, command: TransportCommand) -> Result<()>;
}

/// [`CastTransport`] backed by an unbounded queue.
///
/// The receiving half is drained by whatever owns the real connection.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
	tx: mpsc::UnboundedSender<TransportCommand>,
}

impl ChannelTransport {
	pub fn new() -> (Self, mpsc::UnboundedReceiver<TransportCommand>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, rx)
	}
}

impl CastTransport for ChannelTransport {
	fn submit(&self, command: TransportCommand) -> Result<()> {
		self.tx.send(command).map_err(|_| {
			tracing::error!("Failed to queue command: outbound channel closed");
			Error::Transport("outbound channel closed".into())
		})
	}
}
