//! Notifications broadcast to session observers.

use cast_protocol::{ApplicationInfo, MediaStatus, Volume};

use crate::error::Error;
use crate::state::SessionState;

/// Event delivered through [`Session::subscribe`](crate::Session::subscribe).
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
	StateChanged { from: SessionState, to: SessionState },
	/// A receiver application was launched or joined.
	ApplicationJoined(ApplicationInfo),
	/// The joined application exited or was stopped.
	ApplicationStopped { app_id: String },
	/// A new media status snapshot replaced the previous one.
	MediaStatus(MediaStatus),
	/// The media session went idle with a reason (finished, error, ...).
	MediaEnded,
	ReceiverVolume(Volume),
	/// The device or network tore the session down.
	PeerDisconnected { reason: Option<String> },
	/// Session-wide failure not tied to a caller's command.
	Error(Error),
}

impl SessionEvent {
	pub fn is_state_change(&self) -> bool {
		matches!(self, SessionEvent::StateChanged { .. })
	}
}
