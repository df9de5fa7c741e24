//! Handles to open app channels.

use std::fmt;
use std::sync::{Arc, Weak};

use serde_json::Value;

use crate::correlator::CommandKind;
use crate::error::{Error, Result};
use crate::session::SessionShared;
use crate::state::SessionState;

/// A namespaced message stream on the joined receiver application.
///
/// Holds only a weak reference to its session: once the session is dropped
/// every operation fails with [`Error::SessionNotReady`]. Once the channel is
/// closed (by the caller, by the application exiting or by a disconnect)
/// operations fail with [`Error::ChannelClosed`] or
/// [`Error::SessionNotReady`], even if the namespace is later re-opened.
#[derive(Clone)]
pub struct AppChannel {
	namespace: Arc<str>,
	generation: u64,
	session: Weak<SessionShared>,
}

impl fmt::Debug for AppChannel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AppChannel")
			.field("namespace", &self.namespace)
			.field("generation", &self.generation)
			.finish_non_exhaustive()
	}
}

impl AppChannel {
	pub(crate) fn new(namespace: Arc<str>, generation: u64, session: Weak<SessionShared>) -> Self {
		Self {
			namespace,
			generation,
			session,
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	fn session(&self) -> Result<Arc<SessionShared>> {
		self.session.upgrade().ok_or(Error::SessionNotReady {
			state: SessionState::Disconnected,
		})
	}

	/// Returns true while this handle's channel is still open.
	pub fn is_open(&self) -> bool {
		self.session
			.upgrade()
			.is_some_and(|session| session.is_open_on(&self.namespace, self.generation))
	}

	/// Sends `payload` without waiting for a reply.
	pub fn send(&self, payload: Value) -> Result<()> {
		self.session()?.send_on(&self.namespace, self.generation, payload)
	}

	/// Sends a correlated request and waits for the reply carrying its
	/// `requestId`.
	///
	/// `payload` must be a JSON object; the request id is stamped onto it.
	/// Error replies (`LOAD_FAILED`, `INVALID_REQUEST`, ...) resolve to
	/// [`Error::DeviceError`].
	pub async fn request(&self, kind: CommandKind, payload: Value) -> Result<Value> {
		let response = self
			.session()?
			.request_on(&self.namespace, self.generation, kind, payload)?;
		response.await
	}

	/// Installs the handler for uncorrelated inbound messages.
	///
	/// The handler runs outside the session lock and may call back into the
	/// session.
	pub fn on_message<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&str, &Value) + Send + Sync + 'static,
	{
		self.session()?
			.set_handler_on(&self.namespace, self.generation, Arc::new(handler))
	}

	/// Closes the channel, failing its pending requests with
	/// [`Error::ChannelClosed`]. Returns false if it was already closed.
	pub fn close(&self) -> bool {
		match self.session.upgrade() {
			Some(session) => session.close_on(&self.namespace, self.generation),
			None => false,
		}
	}
}
