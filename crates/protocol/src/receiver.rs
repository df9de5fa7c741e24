//! Receiver platform types: running applications and device volume.

use serde::{Deserialize, Serialize};

/// Volume as reported by the receiver or a media session.
///
/// Both fields are optional on the wire: a `SET_VOLUME` carries only the
/// field being changed, and some receivers omit `muted` from status.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Volume {
	/// Level in `[0.0, 1.0]`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub level: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub muted: Option<bool>,
}

impl Volume {
	pub fn level(level: f64) -> Self {
		Self {
			level: Some(level),
			muted: None,
		}
	}

	pub fn muted(muted: bool) -> Self {
		Self {
			level: None,
			muted: Some(muted),
		}
	}
}

/// A namespace an application declares it listens on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppNamespace {
	pub name: String,
}

/// A receiver application the session has launched or joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
	pub app_id: String,
	#[serde(default)]
	pub display_name: String,
	/// Receiver-side session id, used to stop the application.
	pub session_id: String,
	/// Destination id for app-channel traffic.
	pub transport_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status_text: Option<String>,
	#[serde(default)]
	pub namespaces: Vec<AppNamespace>,
}

impl ApplicationInfo {
	/// Returns true if the application declared `namespace`.
	///
	/// Applications that declare nothing are assumed to accept any namespace.
	pub fn supports_namespace(&self, namespace: &str) -> bool {
		self.namespaces.is_empty() || self.namespaces.iter().any(|ns| ns.name == namespace)
	}
}
