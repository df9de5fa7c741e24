//! cast: Capability façades over a single cast device session
//!
//! This crate exposes one cast device as four narrow capabilities (media
//! player, media control, volume control, and web-app launcher) on top of
//! the `cast-runtime` session. Connection management, application launch
//! and message channels are handled underneath; callers only see
//! `Result`-returning async methods.
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use cast::{CastService, ChannelTransport, Device, MediaControl, MediaInformation, MediaPlayer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (transport, commands) = ChannelTransport::new();
//!     let service = CastService::new(Arc::new(transport));
//!     // Hand `commands` to the connection and feed its events to `service.run(..)`.
//!
//!     let device = Device::new("living-room", "Living Room", "192.168.1.20:8009".parse()?);
//!     service.connect(Arc::new(device)).await?;
//!
//!     let media = MediaInformation::new("https://example.com/movie.mp4", "video/mp4");
//!     service.media_player().play_media(media, None).await?;
//!     service.media_control().pause().await?;
//!
//!     service.disconnect()?;
//!     Ok(())
//! }
//! ```

pub mod capabilities;
pub mod config;
pub mod media_control;
pub mod media_player;
pub mod service;
pub mod volume;
pub mod web_app;

pub use capabilities::{
	Capability, MediaControl, MediaPlayer, VolumeControl, WebAppLauncher, capabilities_for,
};
pub use cast_protocol::{
	ApplicationInfo, Device, DeviceCapabilities, Image, MediaInformation, MediaMetadata,
	MediaStatus, PlayerState, StreamType, Volume, namespace,
};
pub use cast_runtime::{
	AppChannel, CastTransport, ChannelTransport, DeviceFault, Error, Result, Session,
	SessionConfig, SessionEvent, SessionState, TransportCommand, TransportEvent,
};
pub use config::CastConfig;
pub use media_control::CastMediaControl;
pub use media_player::{CastMediaPlayer, MediaLaunch};
pub use service::CastService;
pub use volume::CastVolumeControl;
pub use web_app::{CastWebAppLauncher, WebAppSession};
