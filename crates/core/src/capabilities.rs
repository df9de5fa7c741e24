//! Capability traits and the capability listing of a device.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use cast_protocol::{Device, DeviceCapabilities, MediaInformation, PlayerState};
use cast_runtime::Result;
use serde_json::Value;

use crate::media_player::MediaLaunch;
use crate::web_app::WebAppSession;

/// Loading media onto the receiver.
#[async_trait]
pub trait MediaPlayer: Send + Sync {
	/// Loads `media` in `app_id` (the configured web app when `None`),
	/// launching the application first if it is not the joined one.
	async fn play_media(&self, media: MediaInformation, app_id: Option<&str>) -> Result<MediaLaunch>;

	/// Shows a still image.
	async fn display_image(&self, url: &str, mime_type: &str, title: &str) -> Result<MediaLaunch>;

	/// Stops the application a launch belongs to.
	async fn close_media(&self, launch: &MediaLaunch) -> Result<()>;
}

/// Transport control of the active media session.
///
/// Commands fail with `NoActiveMedia` when nothing is loaded and with
/// `SessionNotReady` when no application is joined.
#[async_trait]
pub trait MediaControl: Send + Sync {
	async fn play(&self) -> Result<()>;
	async fn pause(&self) -> Result<()>;
	async fn stop(&self) -> Result<()>;
	async fn seek(&self, position: Duration) -> Result<()>;
	/// Sets the stream volume; `level` must be in `[0.0, 1.0]`.
	async fn set_volume(&self, level: f64) -> Result<()>;

	async fn position(&self) -> Result<Duration>;
	/// `None` for live streams and media without a known length.
	async fn duration(&self) -> Result<Option<Duration>>;
	async fn play_state(&self) -> Result<PlayerState>;
}

/// Volume and mute, routed to the media session when one is active and to
/// the device otherwise.
#[async_trait]
pub trait VolumeControl: Send + Sync {
	async fn volume(&self) -> Result<f64>;
	async fn set_volume(&self, level: f64) -> Result<()>;
	async fn mute(&self) -> Result<bool>;
	async fn set_mute(&self, muted: bool) -> Result<()>;
}

/// Launching and joining receiver web apps.
#[async_trait]
pub trait WebAppLauncher: Send + Sync {
	async fn launch_web_app(&self, app_id: &str) -> Result<WebAppSession> {
		self.launch_web_app_with_relaunch(app_id, false).await
	}

	async fn launch_web_app_with_relaunch(&self, app_id: &str, relaunch: bool) -> Result<WebAppSession>;

	async fn join_web_app(&self, app_id: &str) -> Result<WebAppSession>;

	async fn close_web_app(&self, session: &WebAppSession) -> Result<()>;

	/// Sends a message to a web app without waiting for a reply.
	async fn send_web_app_message(&self, session: &WebAppSession, message: Value) -> Result<()> {
		session.send_json(message)
	}
}

/// A single advertised capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
	DisplayImage,
	PlayVideo,
	PlayAudio,
	CloseMedia,
	Play,
	Pause,
	Stop,
	Seek,
	Position,
	Duration,
	PlayState,
	VolumeGet,
	VolumeSet,
	MuteGet,
	MuteSet,
	WebAppLaunch,
	WebAppJoin,
	WebAppClose,
	WebAppMessage,
}

impl Capability {
	/// Dotted capability name, e.g. `MediaPlayer.Play.Video`.
	pub fn as_str(self) -> &'static str {
		match self {
			Capability::DisplayImage => "MediaPlayer.Display.Image",
			Capability::PlayVideo => "MediaPlayer.Play.Video",
			Capability::PlayAudio => "MediaPlayer.Play.Audio",
			Capability::CloseMedia => "MediaPlayer.Close",
			Capability::Play => "MediaControl.Play",
			Capability::Pause => "MediaControl.Pause",
			Capability::Stop => "MediaControl.Stop",
			Capability::Seek => "MediaControl.Seek",
			Capability::Position => "MediaControl.Position",
			Capability::Duration => "MediaControl.Duration",
			Capability::PlayState => "MediaControl.PlayState",
			Capability::VolumeGet => "VolumeControl.Get",
			Capability::VolumeSet => "VolumeControl.Set",
			Capability::MuteGet => "VolumeControl.Mute.Get",
			Capability::MuteSet => "VolumeControl.Mute.Set",
			Capability::WebAppLaunch => "WebAppLauncher.Launch",
			Capability::WebAppJoin => "WebAppLauncher.Join",
			Capability::WebAppClose => "WebAppLauncher.Close",
			Capability::WebAppMessage => "WebAppLauncher.Message.Send",
		}
	}
}

impl fmt::Display for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

const MEDIA_CONTROL: [Capability; 8] = [
	Capability::CloseMedia,
	Capability::Play,
	Capability::Pause,
	Capability::Stop,
	Capability::Seek,
	Capability::Position,
	Capability::Duration,
	Capability::PlayState,
];

const ALWAYS: [Capability; 8] = [
	Capability::VolumeGet,
	Capability::VolumeSet,
	Capability::MuteGet,
	Capability::MuteSet,
	Capability::WebAppLaunch,
	Capability::WebAppJoin,
	Capability::WebAppClose,
	Capability::WebAppMessage,
];

/// Capabilities of `device`, sorted.
///
/// A device that reports no flags is treated as a full video receiver.
pub fn capabilities_for(device: &Device) -> Vec<Capability> {
	let mut flags = device.capabilities;
	if flags == DeviceCapabilities::NONE {
		flags = DeviceCapabilities::VIDEO_OUT | DeviceCapabilities::AUDIO_OUT;
	}

	let mut capabilities = ALWAYS.to_vec();
	if flags.contains(DeviceCapabilities::VIDEO_OUT) {
		capabilities.extend([Capability::PlayVideo, Capability::DisplayImage]);
	}
	if flags.contains(DeviceCapabilities::AUDIO_OUT) {
		capabilities.push(Capability::PlayAudio);
	}
	if flags.contains(DeviceCapabilities::VIDEO_OUT) || flags.contains(DeviceCapabilities::AUDIO_OUT) {
		capabilities.extend(MEDIA_CONTROL);
	}
	capabilities.sort();
	capabilities
}
