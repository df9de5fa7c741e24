//! Service configuration.

use cast_protocol::namespace;
use cast_runtime::{Result, SessionConfig};
use serde::{Deserialize, Serialize};

/// Options for a [`CastService`](crate::CastService).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```ignore
/// let config = CastConfig::from_json(r#"{"webAppId": "5CB45E5A"}"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CastConfig {
	/// Receiver application used by `play_media` when none is given.
	pub web_app_id: String,
	/// Namespace of the web-app message channel.
	pub app_namespace: String,
	/// Observer broadcast capacity.
	pub event_capacity: usize,
}

impl Default for CastConfig {
	fn default() -> Self {
		let session = SessionConfig::default();
		Self {
			web_app_id: namespace::DEFAULT_MEDIA_RECEIVER_APP_ID.to_string(),
			app_namespace: session.app_namespace,
			event_capacity: session.event_capacity,
		}
	}
}

impl CastConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn with_web_app_id(mut self, app_id: impl Into<String>) -> Self {
		self.web_app_id = app_id.into();
		self
	}

	pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.app_namespace = namespace.into();
		self
	}

	pub fn with_event_capacity(mut self, capacity: usize) -> Self {
		self.event_capacity = capacity;
		self
	}

	/// The runtime half of the configuration.
	pub fn session_config(&self) -> SessionConfig {
		SessionConfig::new()
			.with_app_namespace(self.app_namespace.clone())
			.with_event_capacity(self.event_capacity)
	}
}
