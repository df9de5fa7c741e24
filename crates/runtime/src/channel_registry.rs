//! Registry of open app channels, keyed by namespace.
//!
//! Each open channel carries a generation number. A handle remembers the
//! generation it was opened with, so a handle to a channel that was closed
//! and later re-opened under the same namespace still reports
//! [`Error::ChannelClosed`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::state::SessionState;

/// Handler for inbound messages on one channel: `(namespace, payload)`.
pub type MessageHandler = Arc<dyn Fn(&str, &Value) + Send + Sync>;

struct ChannelEntry {
	generation: u64,
	handler: Option<MessageHandler>,
}

/// Where an inbound message should go.
pub enum Route {
	/// The channel is open and has a handler.
	Handler(MessageHandler),
	/// The channel is open but nobody registered a handler.
	Unhandled,
	/// No open channel for the namespace.
	Unregistered,
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Route::Handler(_) => f.write_str("Handler"),
			Route::Unhandled => f.write_str("Unhandled"),
			Route::Unregistered => f.write_str("Unregistered"),
		}
	}
}

/// Open channels of one session.
pub struct ChannelRegistry {
	next_generation: u64,
	channels: HashMap<Arc<str>, ChannelEntry>,
}

impl Default for ChannelRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl ChannelRegistry {
	pub fn new() -> Self {
		Self {
			next_generation: 1,
			channels: HashMap::new(),
		}
	}

	/// Opens `namespace`, or returns the already-open channel.
	///
	/// Requires the session to be in [`SessionState::AppJoined`].
	pub fn open(&mut self, namespace: &str, state: SessionState) -> Result<(Arc<str>, u64)> {
		if state != SessionState::AppJoined {
			return Err(Error::SessionNotReady { state });
		}
		if namespace.is_empty() {
			return Err(Error::InvalidArgument("channel namespace is empty".into()));
		}

		if let Some((key, entry)) = self.channels.get_key_value(namespace) {
			return Ok((Arc::clone(key), entry.generation));
		}

		let key: Arc<str> = Arc::from(namespace);
		let generation = self.next_generation;
		self.next_generation += 1;
		self.channels.insert(
			Arc::clone(&key),
			ChannelEntry {
				generation,
				handler: None,
			},
		);
		tracing::debug!(namespace, generation, "Opened channel");
		Ok((key, generation))
	}

	/// Checks that the channel a handle refers to is still open.
	pub fn ensure_open(&self, namespace: &str, generation: u64) -> Result<()> {
		match self.channels.get(namespace) {
			Some(entry) if entry.generation == generation => Ok(()),
			_ => Err(Error::ChannelClosed {
				namespace: namespace.to_string(),
			}),
		}
	}

	/// Generation of the open channel for `namespace`, if any.
	pub fn generation(&self, namespace: &str) -> Option<u64> {
		self.channels.get(namespace).map(|entry| entry.generation)
	}

	/// Installs (or replaces) the inbound handler of an open channel.
	pub fn set_handler(&mut self, namespace: &str, generation: u64, handler: MessageHandler) -> Result<()> {
		match self.channels.get_mut(namespace) {
			Some(entry) if entry.generation == generation => {
				entry.handler = Some(handler);
				Ok(())
			}
			_ => Err(Error::ChannelClosed {
				namespace: namespace.to_string(),
			}),
		}
	}

	/// Closes one channel. Returns false if the handle was already stale.
	pub fn close(&mut self, namespace: &str, generation: u64) -> bool {
		if self.ensure_open(namespace, generation).is_err() {
			return false;
		}
		self.channels.remove(namespace);
		tracing::debug!(namespace, generation, "Closed channel");
		true
	}

	/// Closes every channel, returning the namespaces that were open.
	pub fn close_all(&mut self) -> Vec<Arc<str>> {
		let closed: Vec<Arc<str>> = self.channels.drain().map(|(namespace, _)| namespace).collect();
		if !closed.is_empty() {
			tracing::debug!(count = closed.len(), "Closed all channels");
		}
		closed
	}

	/// Looks up the delivery route for an inbound message.
	pub fn route(&self, namespace: &str) -> Route {
		match self.channels.get(namespace) {
			Some(ChannelEntry {
				handler: Some(handler),
				..
			}) => Route::Handler(Arc::clone(handler)),
			Some(_) => Route::Unhandled,
			None => Route::Unregistered,
		}
	}

	pub fn is_open(&self, namespace: &str) -> bool {
		self.channels.contains_key(namespace)
	}

	/// Namespaces of all open channels.
	pub fn namespaces(&self) -> Vec<Arc<str>> {
		self.channels.keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.channels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.channels.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MEDIA: &str = "urn:x-cast:com.google.cast.media";
	const BRIDGE: &str = "urn:x-cast:com.connectsdk";

	#[test]
	fn test_open_requires_joined_application() {
		let mut registry = ChannelRegistry::new();

		for state in SessionState::ALL.into_iter().filter(|s| *s != SessionState::AppJoined) {
			assert_eq!(
				registry.open(MEDIA, state).unwrap_err(),
				Error::SessionNotReady { state }
			);
		}
		assert!(registry.is_empty());
	}

	#[test]
	fn test_open_is_idempotent() {
		let mut registry = ChannelRegistry::new();

		let (first, generation) = registry.open(MEDIA, SessionState::AppJoined).unwrap();
		let (second, again) = registry.open(MEDIA, SessionState::AppJoined).unwrap();

		assert_eq!(first, second);
		assert_eq!(generation, again);
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_stale_handle_after_reopen() {
		let mut registry = ChannelRegistry::new();

		let (_, old) = registry.open(MEDIA, SessionState::AppJoined).unwrap();
		assert!(registry.close(MEDIA, old));
		let (_, new) = registry.open(MEDIA, SessionState::AppJoined).unwrap();

		assert_ne!(old, new);
		assert!(matches!(
			registry.ensure_open(MEDIA, old),
			Err(Error::ChannelClosed { .. })
		));
		assert!(registry.ensure_open(MEDIA, new).is_ok());
		assert!(!registry.close(MEDIA, old));
		assert!(registry.is_open(MEDIA));
	}

	#[test]
	fn test_close_all() {
		let mut registry = ChannelRegistry::new();
		registry.open(MEDIA, SessionState::AppJoined).unwrap();
		registry.open(BRIDGE, SessionState::AppJoined).unwrap();

		let mut closed: Vec<String> = registry.close_all().iter().map(|ns| ns.to_string()).collect();
		closed.sort();

		assert_eq!(closed, vec![BRIDGE.to_string(), MEDIA.to_string()]);
		assert!(registry.is_empty());
		assert!(matches!(registry.route(MEDIA), Route::Unregistered));
	}

	#[test]
	fn test_routing() {
		let mut registry = ChannelRegistry::new();
		let (_, generation) = registry.open(BRIDGE, SessionState::AppJoined).unwrap();

		assert!(matches!(registry.route(BRIDGE), Route::Unhandled));
		assert!(matches!(registry.route(MEDIA), Route::Unregistered));

		registry
			.set_handler(BRIDGE, generation, Arc::new(|_: &str, _: &Value| {}))
			.unwrap();
		assert!(matches!(registry.route(BRIDGE), Route::Handler(_)));

		assert!(registry.set_handler(MEDIA, 99, Arc::new(|_: &str, _: &Value| {})).is_err());
	}

	#[test]
	fn test_empty_namespace_rejected() {
		let mut registry = ChannelRegistry::new();
		assert!(matches!(
			registry.open("", SessionState::AppJoined),
			Err(Error::InvalidArgument(_))
		));
	}
}
