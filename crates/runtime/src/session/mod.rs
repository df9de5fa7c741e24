//! The cast session: one device, one lifecycle, one lock.
//!
//! A [`Session`] owns the state machine, the command correlator and the
//! channel registry for a single device. All three live behind one
//! `parking_lot::Mutex`, so every caller operation and every transport event
//! is applied atomically.
//!
//! Observer events raised while the lock is held are queued and broadcast
//! once it is released. Channel message handlers also run after release, so
//! they may call back into the session.
//!
//! # Example
//!
//! ```ignore
//! let (transport, commands) = ChannelTransport::new();
//! let session = Session::new(Arc::new(transport));
//! tokio::spawn({
//!     let session = session.clone();
//!     async move { session.run(transport_events).await }
//! });
//!
//! session.connect(device).await?;
//! let app = session.launch_application("CC1AD845", false).await?;
//! ```

use std::sync::Arc;

use cast_protocol::{
	ApplicationInfo, Device, MediaReply, MediaStatus, Volume, error_reply, namespace, request_id,
	stamp_request_id,
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};

use crate::channel::AppChannel;
use crate::channel_registry::{ChannelRegistry, MessageHandler, Route};
use crate::config::SessionConfig;
use crate::correlator::{CommandKind, CorrelationId, Correlator, ResponseFuture, response_channel};
use crate::error::{Error, Result};
use crate::events::SessionEvent;
use crate::state::SessionState;
use crate::transport::{CastTransport, TransportCommand, TransportEvent};

/// Validates a volume level, which must lie in `[0.0, 1.0]`.
///
/// Out-of-range and non-finite values are rejected rather than clamped.
pub fn validate_volume_level(level: f64) -> Result<f64> {
	if level.is_finite() && (0.0..=1.0).contains(&level) {
		Ok(level)
	} else {
		Err(Error::InvalidArgument(format!(
			"volume level {level} outside [0.0, 1.0]"
		)))
	}
}

/// Launch or join waiting for the receiver's answer.
#[derive(Debug)]
struct PendingLaunch {
	id: CorrelationId,
	app_id: String,
}

/// Inbound message to hand to a channel handler once the lock is released.
struct Delivery {
	handler: MessageHandler,
	namespace: String,
	payload: Value,
}

struct SessionInner {
	state: SessionState,
	device: Option<Arc<Device>>,
	joined: Option<ApplicationInfo>,
	connect_request: Option<CorrelationId>,
	launch: Option<PendingLaunch>,
	correlator: Correlator,
	channels: ChannelRegistry,
	media_status: Option<MediaStatus>,
	receiver_volume: Option<Volume>,
	app_namespace: Arc<str>,
	pending_events: Vec<SessionEvent>,
}

impl SessionInner {
	fn new(app_namespace: Arc<str>) -> Self {
		Self {
			state: SessionState::Disconnected,
			device: None,
			joined: None,
			connect_request: None,
			launch: None,
			correlator: Correlator::new(),
			channels: ChannelRegistry::new(),
			media_status: None,
			receiver_volume: None,
			app_namespace,
			pending_events: Vec::new(),
		}
	}

	fn emit(&mut self, event: SessionEvent) {
		self.pending_events.push(event);
	}

	fn transition(&mut self, to: SessionState) -> Result<()> {
		let from = self.state;
		if !from.can_transition_to(to) {
			return Err(Error::InvalidTransition { from, to });
		}
		self.state = to;
		tracing::debug!(%from, %to, "Session state changed");
		self.emit(SessionEvent::StateChanged { from, to });
		Ok(())
	}

	/// Transition driven by a transport event; an invalid one is logged.
	fn advance(&mut self, to: SessionState) {
		if let Err(err) = self.transition(to) {
			tracing::warn!(%err, "Ignoring transition");
		}
	}

	/// Closes every channel and fails every pending command with `cause`.
	fn teardown(&mut self, cause: Error) {
		let closed = self.channels.close_all();
		let cancelled = self.correlator.cancel_all(cause);
		tracing::debug!(channels = closed.len(), cancelled, "Session torn down");

		self.connect_request = None;
		self.launch = None;
		self.joined = None;
		self.media_status = None;
		self.device = None;
	}

	/// Moves to `Failed`, tearing the session down and notifying observers.
	fn fail(&mut self, cause: Error, transport: &dyn CastTransport) {
		if self.state.is_terminal() {
			return;
		}
		tracing::warn!(%cause, state = %self.state, "Session failed");
		self.teardown(Error::SessionTerminated);
		if let Err(err) = transport.submit(TransportCommand::Disconnect) {
			tracing::warn!(%err, "Failed to release transport after session failure");
		}
		self.advance(SessionState::Failed);
		self.emit(SessionEvent::Error(cause));
	}

	/// `Disconnecting -> Disconnected` with full teardown.
	fn close(&mut self) -> Result<()> {
		self.transition(SessionState::Disconnecting)?;
		self.teardown(Error::SessionTerminated);
		self.transition(SessionState::Disconnected)
	}

	/// Drops the joined application: `AppJoined -> Connected`.
	///
	/// Commands pending on its channels fail with [`Error::ChannelClosed`].
	fn leave_application(&mut self) {
		let Some(app) = self.joined.take() else {
			return;
		};
		for namespace in self.channels.close_all() {
			let error = Error::ChannelClosed {
				namespace: namespace.to_string(),
			};
			self.correlator.cancel_namespace(&namespace, error);
		}
		self.media_status = None;
		self.advance(SessionState::Connected);
		tracing::debug!(app_id = %app.app_id, "Left application");
		self.emit(SessionEvent::ApplicationStopped { app_id: app.app_id });
	}

	fn require_joined(&self) -> Result<&ApplicationInfo> {
		match (&self.joined, self.state) {
			(Some(app), SessionState::AppJoined) => Ok(app),
			_ => Err(Error::SessionNotReady { state: self.state }),
		}
	}

	fn require_channel(&self, namespace: &str, generation: u64) -> Result<&ApplicationInfo> {
		let app = self.require_joined()?;
		self.channels.ensure_open(namespace, generation)?;
		Ok(app)
	}

	fn apply(&mut self, event: TransportEvent, transport: &dyn CastTransport) -> Option<Delivery> {
		match event {
			TransportEvent::Connected => self.on_connected(),
			TransportEvent::ConnectFailed { code, reason } => self.on_connect_failed(code, reason, transport),
			TransportEvent::DisconnectedByPeer { reason } => self.on_peer_disconnect(reason),
			TransportEvent::ApplicationJoined { request_id, app } => self.on_application_joined(request_id, app),
			TransportEvent::ApplicationRejected {
				request_id,
				code,
				reason,
			} => self.on_application_rejected(request_id, code, reason, transport),
			TransportEvent::ApplicationStopped { session_id } => self.on_application_stopped(&session_id),
			TransportEvent::Message { namespace, payload } => return self.on_message(namespace, payload),
			TransportEvent::DeviceReply { request_id, result } => {
				match result {
					Ok(volume) => {
						self.update_receiver_volume(volume);
						match serde_json::to_value(volume) {
							Ok(value) => self.correlator.resolve_success(request_id, value),
							Err(err) => self.correlator.resolve_failure(request_id, err.into()),
						};
					}
					Err(fault) => {
						self.correlator.resolve_failure(request_id, fault.into());
					}
				}
			}
			TransportEvent::ReceiverStatus { volume } => self.update_receiver_volume(volume),
		}
		None
	}

	fn on_connected(&mut self) {
		if self.state != SessionState::Connecting {
			tracing::warn!(state = %self.state, "Unexpected connected event (ignored)");
			return;
		}
		self.advance(SessionState::Connected);
		if let Some(id) = self.connect_request.take() {
			self.correlator.resolve_success(id, Value::Null);
		}
	}

	fn on_connect_failed(&mut self, code: Option<i64>, reason: String, transport: &dyn CastTransport) {
		if self.state != SessionState::Connecting {
			tracing::warn!(state = %self.state, %reason, "Unexpected connect failure (ignored)");
			return;
		}
		let error = Error::DeviceError { code, reason };
		if let Some(id) = self.connect_request.take() {
			self.correlator.resolve_failure(id, error.clone());
		}
		self.fail(error, transport);
	}

	fn on_peer_disconnect(&mut self, reason: Option<String>) {
		if self.state.is_terminal() {
			tracing::debug!(?reason, "Peer disconnect on idle session (ignored)");
			return;
		}
		tracing::debug!(?reason, "Disconnected by peer");
		if let Err(err) = self.close() {
			tracing::warn!(%err, "Peer disconnect teardown");
		}
		self.emit(SessionEvent::PeerDisconnected { reason });
	}

	fn on_application_joined(&mut self, request_id: CorrelationId, app: ApplicationInfo) {
		let matches = self.state == SessionState::AppLaunching
			&& self.launch.as_ref().is_some_and(|launch| launch.id == request_id);
		if !matches {
			tracing::warn!(id = %request_id, app_id = %app.app_id, "Application joined without matching launch (ignored)");
			return;
		}
		self.launch = None;
		self.media_status = None;
		self.advance(SessionState::AppJoined);

		let app_namespace = Arc::clone(&self.app_namespace);
		for ns in [&*app_namespace, namespace::MEDIA] {
			if let Err(err) = self.channels.open(ns, self.state) {
				tracing::warn!(%err, namespace = ns, "Failed to open default channel");
			}
		}

		tracing::debug!(app_id = %app.app_id, transport_id = %app.transport_id, "Application joined");
		match serde_json::to_value(&app) {
			Ok(value) => self.correlator.resolve_success(request_id, value),
			Err(err) => self.correlator.resolve_failure(request_id, err.into()),
		};
		self.joined = Some(app.clone());
		self.emit(SessionEvent::ApplicationJoined(app));
	}

	fn on_application_rejected(
		&mut self,
		request_id: CorrelationId,
		code: Option<i64>,
		reason: String,
		transport: &dyn CastTransport,
	) {
		let launch = match self.launch.take() {
			Some(launch) if launch.id == request_id && self.state == SessionState::AppLaunching => launch,
			other => {
				self.launch = other;
				tracing::warn!(id = %request_id, %reason, "Launch rejection without matching launch (ignored)");
				return;
			}
		};
		let error = Error::LaunchRejected {
			app_id: launch.app_id,
			reason: match code {
				Some(code) => format!("{reason} (code {code})"),
				None => reason,
			},
		};
		self.correlator.resolve_failure(request_id, error.clone());
		self.fail(error, transport);
	}

	fn on_application_stopped(&mut self, session_id: &str) {
		let is_joined = self
			.joined
			.as_ref()
			.is_some_and(|app| app.session_id == session_id);
		if !is_joined {
			tracing::debug!(session_id, "Stop of an application we did not join (ignored)");
			return;
		}
		self.leave_application();
	}

	fn on_message(&mut self, channel: String, payload: Value) -> Option<Delivery> {
		// Status on a closed media channel belongs to an app we left.
		if channel == namespace::MEDIA && self.channels.is_open(namespace::MEDIA) {
			self.update_media_status(&payload);
		}

		if let Some(id) = request_id(&payload).map(CorrelationId::new) {
			if self.correlator.is_pending(id) {
				match error_reply(&payload) {
					Some(reply) => {
						let error = Error::DeviceError {
							code: reply.detailed_error_code,
							reason: reply.describe(),
						};
						self.correlator.resolve_failure(id, error);
					}
					None => {
						self.correlator.resolve_success(id, payload);
					}
				}
				return None;
			}
			tracing::warn!(%id, namespace = %channel, "Reply for unknown or already resolved command (ignored)");
		}

		match self.channels.route(&channel) {
			Route::Handler(handler) => Some(Delivery {
				handler,
				namespace: channel,
				payload,
			}),
			Route::Unhandled => {
				tracing::trace!(namespace = %channel, "No handler for channel message");
				None
			}
			Route::Unregistered => {
				tracing::warn!(namespace = %channel, "Message on unregistered channel (dropped)");
				None
			}
		}
	}

	fn update_media_status(&mut self, payload: &Value) {
		let reply = match MediaReply::parse(payload) {
			Ok(Some(reply)) => reply,
			Ok(None) => return,
			Err(err) => {
				tracing::warn!(%err, "Malformed media status (ignored)");
				return;
			}
		};
		match reply.into_first() {
			Some(mut status) => {
				// Receivers only send `media` when it changes.
				if status.media.is_none() {
					if let Some(previous) = self
						.media_status
						.take()
						.filter(|previous| previous.media_session_id == status.media_session_id)
					{
						status.media = previous.media;
					}
				}
				let ended = !status.is_active();
				tracing::debug!(
					media_session_id = status.media_session_id,
					player_state = %status.player_state,
					"Media status"
				);
				self.media_status = Some(status.clone());
				self.emit(SessionEvent::MediaStatus(status));
				if ended {
					self.emit(SessionEvent::MediaEnded);
				}
			}
			None => {
				if self.media_status.take().is_some() {
					self.emit(SessionEvent::MediaEnded);
				}
			}
		}
	}

	fn update_receiver_volume(&mut self, volume: Volume) {
		self.receiver_volume = Some(volume);
		self.emit(SessionEvent::ReceiverVolume(volume));
	}
}

pub(crate) struct SessionShared {
	inner: Mutex<SessionInner>,
	transport: Arc<dyn CastTransport>,
	events: broadcast::Sender<SessionEvent>,
	config: SessionConfig,
}

impl SessionShared {
	/// Runs `f` under the session lock, then broadcasts queued events.
	fn with_inner<R>(&self, f: impl FnOnce(&mut SessionInner, &dyn CastTransport) -> R) -> R {
		let (result, events) = {
			let mut inner = self.inner.lock();
			let result = f(&mut inner, self.transport.as_ref());
			(result, std::mem::take(&mut inner.pending_events))
		};
		for event in events {
			// No subscribers is fine.
			let _ = self.events.send(event);
		}
		result
	}

	pub(crate) fn send_on(&self, namespace: &Arc<str>, generation: u64, payload: Value) -> Result<()> {
		self.with_inner(|inner, transport| {
			let app = inner.require_channel(namespace, generation)?;
			transport.submit(TransportCommand::Send {
				namespace: namespace.to_string(),
				destination: app.transport_id.clone(),
				payload,
			})
		})
	}

	pub(crate) fn request_on(
		&self,
		namespace: &Arc<str>,
		generation: u64,
		kind: CommandKind,
		mut payload: Value,
	) -> Result<ResponseFuture> {
		self.with_inner(|inner, transport| {
			let destination = inner.require_channel(namespace, generation)?.transport_id.clone();
			if !payload.is_object() {
				return Err(Error::InvalidArgument(
					"correlated payload must be a JSON object".into(),
				));
			}

			let (continuation, response) = response_channel();
			let id = inner
				.correlator
				.issue(kind, Some(Arc::clone(namespace)), continuation);
			stamp_request_id(&mut payload, id.as_u64());

			let command = TransportCommand::Send {
				namespace: namespace.to_string(),
				destination,
				payload,
			};
			if let Err(err) = transport.submit(command) {
				inner.correlator.resolve_failure(id, err.clone());
				return Err(err);
			}
			Ok(response)
		})
	}

	pub(crate) fn set_handler_on(&self, namespace: &str, generation: u64, handler: MessageHandler) -> Result<()> {
		self.with_inner(|inner, _| inner.channels.set_handler(namespace, generation, handler))
	}

	pub(crate) fn close_on(&self, namespace: &str, generation: u64) -> bool {
		self.with_inner(|inner, _| {
			if !inner.channels.close(namespace, generation) {
				return false;
			}
			let error = Error::ChannelClosed {
				namespace: namespace.to_string(),
			};
			inner.correlator.cancel_namespace(namespace, error);
			if namespace == cast_protocol::namespace::MEDIA {
				inner.media_status = None;
			}
			true
		})
	}

	pub(crate) fn is_open_on(&self, namespace: &str, generation: u64) -> bool {
		self.inner.lock().channels.ensure_open(namespace, generation).is_ok()
	}
}

/// Handle to a cast session. Clones share the same session.
#[derive(Clone)]
pub struct Session {
	shared: Arc<SessionShared>,
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.shared.inner.lock();
		f.debug_struct("Session")
			.field("state", &inner.state)
			.field("device", &inner.device.as_ref().map(|d| d.id.as_str()))
			.field("joined", &inner.joined.as_ref().map(|a| a.app_id.as_str()))
			.field("pending", &inner.correlator.len())
			.finish()
	}
}

impl Session {
	/// Creates a disconnected session with the default configuration.
	pub fn new(transport: Arc<dyn CastTransport>) -> Self {
		Self::with_config(transport, SessionConfig::default())
	}

	pub fn with_config(transport: Arc<dyn CastTransport>, config: SessionConfig) -> Self {
		let (events, _) = broadcast::channel(config.event_capacity.max(1));
		let inner = SessionInner::new(Arc::from(config.app_namespace.as_str()));
		Self {
			shared: Arc::new(SessionShared {
				inner: Mutex::new(inner),
				transport,
				events,
				config,
			}),
		}
	}

	pub fn config(&self) -> &SessionConfig {
		&self.shared.config
	}

	pub fn state(&self) -> SessionState {
		self.shared.inner.lock().state
	}

	/// The device of the live (or connecting) session.
	pub fn device(&self) -> Option<Arc<Device>> {
		self.shared.inner.lock().device.clone()
	}

	pub fn joined_application(&self) -> Option<ApplicationInfo> {
		self.shared.inner.lock().joined.clone()
	}

	/// Latest media status snapshot, if the receiver has pushed one.
	pub fn media_status(&self) -> Option<MediaStatus> {
		self.shared.inner.lock().media_status.clone()
	}

	/// The active media session, for issuing media commands against.
	///
	/// Fails with [`Error::SessionNotReady`] outside `AppJoined` and with
	/// [`Error::NoActiveMedia`] when nothing is loaded or playback has ended.
	pub fn active_media(&self) -> Result<MediaStatus> {
		let inner = self.shared.inner.lock();
		inner.require_joined()?;
		inner
			.media_status
			.as_ref()
			.filter(|status| status.is_active())
			.cloned()
			.ok_or(Error::NoActiveMedia)
	}

	/// Last device volume reported by the receiver.
	pub fn receiver_volume(&self) -> Option<Volume> {
		self.shared.inner.lock().receiver_volume
	}

	/// Number of commands still awaiting resolution.
	pub fn pending_commands(&self) -> usize {
		self.shared.inner.lock().correlator.len()
	}

	/// Namespaces of all open channels.
	pub fn open_channels(&self) -> Vec<Arc<str>> {
		self.shared.inner.lock().channels.namespaces()
	}

	/// Registers an observer for session events.
	pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
		self.shared.events.subscribe()
	}

	/// Connects to `device` and waits for the transport to report the outcome.
	///
	/// Valid from `Disconnected` and `Failed`; a terminated session is
	/// replaced by a fresh one.
	pub async fn connect(&self, device: Arc<Device>) -> Result<()> {
		let response = self.shared.with_inner(|inner, transport| {
			match inner.state {
				SessionState::Connecting => return Err(Error::AlreadyConnecting),
				state if state.is_connected() => return Err(Error::AlreadyConnected(state)),
				SessionState::Disconnected | SessionState::Failed => {}
				state => return Err(Error::SessionNotReady { state }),
			}

			inner.transition(SessionState::Connecting)?;
			inner.receiver_volume = None;
			inner.device = Some(Arc::clone(&device));
			tracing::debug!(device = %device, "Connecting");

			let (continuation, response) = response_channel();
			let id = inner.correlator.issue(CommandKind::Connect, None, continuation);
			inner.connect_request = Some(id);

			if let Err(err) = transport.submit(TransportCommand::Connect { device }) {
				inner.fail(err.clone(), transport);
				return Err(err);
			}
			Ok(response)
		})?;
		response.await.map(|_| ())
	}

	/// Tears the session down: closes every channel, fails every pending
	/// command with [`Error::SessionTerminated`] and returns to
	/// `Disconnected`. A no-op on an already terminated session.
	pub fn disconnect(&self) -> Result<()> {
		self.shared.with_inner(|inner, transport| {
			if inner.state.is_terminal() {
				tracing::debug!(state = %inner.state, "Disconnect on terminated session (no-op)");
				return Ok(());
			}
			if let Err(err) = transport.submit(TransportCommand::Disconnect) {
				tracing::warn!(%err, "Failed to send disconnect");
			}
			inner.close()
		})
	}

	/// Launches `app_id` on the receiver and joins it.
	///
	/// With `relaunch` the receiver restarts the application if it is
	/// already running.
	pub async fn launch_application(&self, app_id: &str, relaunch: bool) -> Result<ApplicationInfo> {
		self.start_application(app_id, Some(relaunch)).await
	}

	/// Joins `app_id` if it is already running on the receiver.
	pub async fn join_application(&self, app_id: &str) -> Result<ApplicationInfo> {
		self.start_application(app_id, None).await
	}

	async fn start_application(&self, app_id: &str, relaunch: Option<bool>) -> Result<ApplicationInfo> {
		if app_id.is_empty() {
			return Err(Error::InvalidArgument("application id is empty".into()));
		}

		let response = self.shared.with_inner(|inner, transport| {
			if inner.state != SessionState::Connected {
				return Err(Error::SessionNotReady { state: inner.state });
			}
			inner.transition(SessionState::AppLaunching)?;

			let kind = match relaunch {
				Some(_) => CommandKind::Launch,
				None => CommandKind::Join,
			};
			let (continuation, response) = response_channel();
			let id = inner.correlator.issue(kind, None, continuation);
			inner.launch = Some(PendingLaunch {
				id,
				app_id: app_id.to_string(),
			});

			let command = match relaunch {
				Some(relaunch) => TransportCommand::LaunchApplication {
					request_id: id,
					app_id: app_id.to_string(),
					relaunch,
				},
				None => TransportCommand::JoinApplication {
					request_id: id,
					app_id: app_id.to_string(),
				},
			};
			tracing::debug!(%id, app_id, ?kind, "Starting application");
			if let Err(err) = transport.submit(command) {
				inner.fail(err.clone(), transport);
				return Err(err);
			}
			Ok(response)
		})?;

		let value = response.await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Stops the joined application and returns to `Connected`.
	pub fn stop_application(&self) -> Result<()> {
		self.shared.with_inner(|inner, transport| {
			let session_id = inner.require_joined()?.session_id.clone();
			if let Err(err) = transport.submit(TransportCommand::StopApplication { session_id }) {
				tracing::warn!(%err, "Failed to send application stop");
			}
			inner.leave_application();
			Ok(())
		})
	}

	/// Opens (or returns the already open) channel for `namespace`.
	pub fn open_channel(&self, namespace: &str) -> Result<AppChannel> {
		self.shared.with_inner(|inner, _| {
			let (namespace, generation) = inner.channels.open(namespace, inner.state)?;
			Ok(AppChannel::new(namespace, generation, Arc::downgrade(&self.shared)))
		})
	}

	/// Handle to an open channel, without opening it.
	pub fn channel(&self, namespace: &str) -> Option<AppChannel> {
		let inner = self.shared.inner.lock();
		let generation = inner.channels.generation(namespace)?;
		Some(AppChannel::new(
			Arc::from(namespace),
			generation,
			Arc::downgrade(&self.shared),
		))
	}

	/// Reads the device volume.
	pub async fn device_volume(&self) -> Result<Volume> {
		self.device_request(|request_id| TransportCommand::GetVolume { request_id })
			.await
	}

	/// Sets the device volume level; `level` must be in `[0.0, 1.0]`.
	pub async fn set_device_volume(&self, level: f64) -> Result<Volume> {
		let level = validate_volume_level(level)?;
		self.device_request(|request_id| TransportCommand::SetVolume { request_id, level })
			.await
	}

	pub async fn set_device_mute(&self, muted: bool) -> Result<Volume> {
		self.device_request(|request_id| TransportCommand::SetMute { request_id, muted })
			.await
	}

	async fn device_request(&self, build: impl FnOnce(CorrelationId) -> TransportCommand) -> Result<Volume> {
		let response = self.shared.with_inner(|inner, transport| {
			if !inner.state.is_connected() {
				return Err(Error::SessionNotReady { state: inner.state });
			}
			let (continuation, response) = response_channel();
			let id = inner.correlator.issue(CommandKind::Volume, None, continuation);
			if let Err(err) = transport.submit(build(id)) {
				inner.correlator.resolve_failure(id, err.clone());
				return Err(err);
			}
			Ok(response)
		})?;

		let value = response.await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Applies one transport event.
	pub fn handle_event(&self, event: TransportEvent) {
		let delivery = self
			.shared
			.with_inner(|inner, transport| inner.apply(event, transport));

		if let Some(Delivery {
			handler,
			namespace,
			payload,
		}) = delivery
		{
			handler(&namespace, &payload);
		}
	}

	/// Applies transport events until the stream ends.
	///
	/// The end of the stream on a live session counts as a peer disconnect.
	pub async fn run(&self, mut events: mpsc::UnboundedReceiver<TransportEvent>) {
		while let Some(event) = events.recv().await {
			self.handle_event(event);
		}
		tracing::debug!("Transport event stream ended");
		self.handle_event(TransportEvent::DisconnectedByPeer {
			reason: Some("transport closed".into()),
		});
	}
}
