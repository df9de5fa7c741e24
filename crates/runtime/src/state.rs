//! Session lifecycle states and the transition table.
//!
//! ```text
//! Disconnected ──► Connecting ──► Connected ──► AppLaunching ──► AppJoined
//!                                     ▲                              │
//!                                     └──────── app stopped ─────────┘
//!
//! Connecting | Connected | AppLaunching | AppJoined ──► Disconnecting ──► Disconnected
//! any non-terminal state ──► Failed ──► Connecting
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a cast session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionState {
	#[default]
	Disconnected,
	Connecting,
	Connected,
	AppLaunching,
	AppJoined,
	Disconnecting,
	Failed,
}

impl SessionState {
	/// All states, in lifecycle order.
	pub const ALL: [SessionState; 7] = [
		SessionState::Disconnected,
		SessionState::Connecting,
		SessionState::Connected,
		SessionState::AppLaunching,
		SessionState::AppJoined,
		SessionState::Disconnecting,
		SessionState::Failed,
	];

	/// Returns true if `self -> to` is in the transition table.
	pub fn can_transition_to(self, to: SessionState) -> bool {
		use SessionState::*;

		match (self, to) {
			(Disconnected | Failed, Connecting) => true,
			(Connecting, Connected) => true,
			(Connected, AppLaunching) => true,
			(AppLaunching, AppJoined) => true,
			(AppJoined, Connected) => true,
			(Connecting | Connected | AppLaunching | AppJoined, Disconnecting) => true,
			(Disconnecting, Disconnected) => true,
			(from, Failed) => !from.is_terminal(),
			_ => false,
		}
	}

	/// Terminal states hold no transport connection and no pending work.
	pub fn is_terminal(self) -> bool {
		matches!(self, SessionState::Disconnected | SessionState::Failed)
	}

	/// True while the transport connection to the device is up.
	pub fn is_connected(self) -> bool {
		matches!(
			self,
			SessionState::Connected | SessionState::AppLaunching | SessionState::AppJoined
		)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			SessionState::Disconnected => "Disconnected",
			SessionState::Connecting => "Connecting",
			SessionState::Connected => "Connected",
			SessionState::AppLaunching => "AppLaunching",
			SessionState::AppJoined => "AppJoined",
			SessionState::Disconnecting => "Disconnecting",
			SessionState::Failed => "Failed",
		}
	}
}

impl fmt::Display for SessionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
