//! Session configuration.

use cast_protocol::namespace;
use serde::{Deserialize, Serialize};

/// Default capacity of the observer broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Options for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
	/// Namespace of the app channel opened on every join, alongside media.
	pub app_namespace: String,
	/// Events buffered per observer before lagging observers drop events.
	pub event_capacity: usize,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			app_namespace: namespace::CONNECT_SDK.to_string(),
			event_capacity: DEFAULT_EVENT_CAPACITY,
		}
	}
}

impl SessionConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.app_namespace = namespace.into();
		self
	}

	/// Sets the observer buffer size. Zero is raised to one.
	pub fn with_event_capacity(mut self, capacity: usize) -> Self {
		self.event_capacity = capacity.max(1);
		self
	}
}
