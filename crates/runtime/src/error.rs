//! Error types for the cast runtime.

use thiserror::Error;

use crate::state::SessionState;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a cast session.
///
/// Errors are `Clone` because a single teardown fans the same error out to
/// every pending command and to session observers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
	/// `connect` was called while a connection attempt is still in flight.
	#[error("Session is already connecting")]
	AlreadyConnecting,

	/// `connect` was called on a live session.
	#[error("Session is already connected (state: {0})")]
	AlreadyConnected(SessionState),

	/// The session is not in a state that allows the operation.
	#[error("Session not ready (state: {state})")]
	SessionNotReady { state: SessionState },

	/// The channel was closed between open and use.
	#[error("Channel closed: {namespace}")]
	ChannelClosed { namespace: String },

	/// The receiver refused to launch or join the application.
	#[error("Launch of '{app_id}' rejected: {reason}")]
	LaunchRejected { app_id: String, reason: String },

	/// A media command was issued without an active media session.
	#[error("No active media session")]
	NoActiveMedia,

	/// Invalid argument provided to a method.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// The session was torn down while the command was pending.
	#[error("Session terminated")]
	SessionTerminated,

	/// Opaque failure reported by the device or transport.
	#[error("Device error: {reason}{}", code.map(|c| format!(" (code {c})")).unwrap_or_default())]
	DeviceError { code: Option<i64>, reason: String },

	/// Timeout waiting for a command to resolve.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// A state transition outside the session transition table.
	#[error("Invalid session transition: {from} -> {to}")]
	InvalidTransition { from: SessionState, to: SessionState },

	/// The transport refused an outbound command.
	#[error("Transport error: {0}")]
	Transport(String),

	/// Malformed or unexpected protocol payload.
	#[error("Protocol error: {0}")]
	Protocol(String),
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Protocol(err.to_string())
	}
}

impl Error {
	/// Returns true if the error came from session teardown.
	pub fn is_terminated(&self) -> bool {
		matches!(self, Error::SessionTerminated)
	}

	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout(_))
	}

	/// Returns true if the operation was refused because of session state.
	pub fn is_not_ready(&self) -> bool {
		matches!(
			self,
			Error::SessionNotReady { .. } | Error::ChannelClosed { .. } | Error::NoActiveMedia
		)
	}

	/// Returns the device error code, if this is a device error with one.
	pub fn device_code(&self) -> Option<i64> {
		match self {
			Error::DeviceError { code, .. } => *code,
			_ => None,
		}
	}
}
