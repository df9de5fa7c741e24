//! The cast service: one session plus its capability façades.

use std::sync::Arc;

use cast_protocol::{ApplicationInfo, Device, MediaStatus, namespace};
use cast_runtime::{
	AppChannel, CastTransport, Error, Result, Session, SessionEvent, SessionState, TransportEvent,
};
use tokio::sync::{broadcast, mpsc};

use crate::capabilities::{Capability, capabilities_for};
use crate::config::CastConfig;
use crate::media_control::CastMediaControl;
use crate::media_player::CastMediaPlayer;
use crate::volume::CastVolumeControl;
use crate::web_app::CastWebAppLauncher;

/// Cast device service.
///
/// Owns one [`Session`] and hands out the capability façades that drive it.
/// Clones share the session.
#[derive(Debug, Clone)]
pub struct CastService {
	session: Session,
	config: Arc<CastConfig>,
}

impl CastService {
	pub fn new(transport: Arc<dyn CastTransport>) -> Self {
		Self::with_config(transport, CastConfig::default())
	}

	pub fn with_config(transport: Arc<dyn CastTransport>, config: CastConfig) -> Self {
		Self {
			session: Session::with_config(transport, config.session_config()),
			config: Arc::new(config),
		}
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	pub fn config(&self) -> &CastConfig {
		&self.config
	}

	pub fn state(&self) -> SessionState {
		self.session.state()
	}

	pub async fn connect(&self, device: Arc<Device>) -> Result<()> {
		self.session.connect(device).await
	}

	pub fn disconnect(&self) -> Result<()> {
		self.session.disconnect()
	}

	/// Observer for media status, state changes and unsolicited errors.
	pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
		self.session.subscribe()
	}

	pub fn handle_event(&self, event: TransportEvent) {
		self.session.handle_event(event);
	}

	pub async fn run(&self, events: mpsc::UnboundedReceiver<TransportEvent>) {
		self.session.run(events).await;
	}

	/// The media namespace channel of the joined application.
	pub fn media_channel(&self) -> Option<AppChannel> {
		self.session.channel(namespace::MEDIA)
	}

	pub fn media_status(&self) -> Option<MediaStatus> {
		self.session.media_status()
	}

	pub fn media_player(&self) -> CastMediaPlayer {
		CastMediaPlayer::new(self.session.clone(), self.config.web_app_id.clone())
	}

	pub fn media_control(&self) -> CastMediaControl {
		CastMediaControl::new(self.session.clone())
	}

	pub fn volume_control(&self) -> CastVolumeControl {
		CastVolumeControl::new(self.session.clone())
	}

	pub fn web_app_launcher(&self) -> CastWebAppLauncher {
		CastWebAppLauncher::new(self.session.clone(), self.config.app_namespace.clone())
	}

	/// Capabilities of the connected device; empty when disconnected.
	pub fn capabilities(&self) -> Vec<Capability> {
		self.session
			.device()
			.map(|device| capabilities_for(&device))
			.unwrap_or_default()
	}

	pub fn has_capability(&self, capability: Capability) -> bool {
		self.capabilities().contains(&capability)
	}
}

/// Makes `app_id` the joined application.
///
/// A different joined application is stopped first. With `relaunch` the
/// application is launched again even if it is already joined.
pub(crate) async fn ensure_application(session: &Session, app_id: &str, relaunch: bool) -> Result<ApplicationInfo> {
	if let Some(app) = session.joined_application() {
		if app.app_id == app_id && !relaunch {
			return Ok(app);
		}
		tracing::debug!(from = %app.app_id, to = app_id, "Switching application");
		session.stop_application()?;
	}
	session.launch_application(app_id, relaunch).await
}

/// The media channel, or the reason it is unavailable.
pub(crate) fn media_channel(session: &Session) -> Result<AppChannel> {
	session.channel(namespace::MEDIA).ok_or_else(|| match session.state() {
		SessionState::AppJoined => Error::ChannelClosed {
			namespace: namespace::MEDIA.to_string(),
		},
		state => Error::SessionNotReady { state },
	})
}
