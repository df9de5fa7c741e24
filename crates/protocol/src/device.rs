//! Device descriptor for a discovered cast receiver.

use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Capability bit flags advertised by a receiver (the `ca` TXT record field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceCapabilities(u32);

impl DeviceCapabilities {
	pub const NONE: Self = Self(0);
	pub const VIDEO_OUT: Self = Self(1 << 0);
	pub const VIDEO_IN: Self = Self(1 << 1);
	pub const AUDIO_OUT: Self = Self(1 << 2);
	pub const AUDIO_IN: Self = Self(1 << 3);
	pub const MULTIZONE_GROUP: Self = Self(1 << 5);

	/// Builds a flag set from the raw advertised bits.
	pub const fn from_bits(bits: u32) -> Self {
		Self(bits)
	}

	pub const fn bits(self) -> u32 {
		self.0
	}

	/// Returns true if every flag in `other` is set.
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	pub const fn union(self, other: Self) -> Self {
		Self(self.0 | other.0)
	}
}

impl std::ops::BitOr for DeviceCapabilities {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		self.union(rhs)
	}
}

/// Identity and address of a physical cast device.
///
/// Produced by discovery and owned by the caller. A session only holds a
/// shared reference to it and never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
	/// Stable receiver id (the `id` TXT record field).
	pub id: String,
	/// Human-readable name shown in device pickers.
	pub friendly_name: String,
	/// Address of the receiver's control endpoint (usually port 8009).
	pub address: SocketAddr,
	/// Advertised capability flags.
	#[serde(default)]
	pub capabilities: DeviceCapabilities,
	/// Model name, when the receiver advertises one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub model_name: Option<String>,
}

impl Device {
	pub fn new(id: impl Into<String>, friendly_name: impl Into<String>, address: SocketAddr) -> Self {
		Self {
			id: id.into(),
			friendly_name: friendly_name.into(),
			address,
			capabilities: DeviceCapabilities::NONE,
			model_name: None,
		}
	}

	pub fn with_capabilities(mut self, capabilities: DeviceCapabilities) -> Self {
		self.capabilities = capabilities;
		self
	}

	pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
		self.model_name = Some(model_name.into());
		self
	}
}

impl fmt::Display for Device {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({}) at {}", self.friendly_name, self.id, self.address)
	}
}
