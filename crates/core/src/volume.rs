use async_trait::async_trait;
use cast_protocol::{MediaRequest, Volume, namespace};
use cast_runtime::{Error, Result, Session, validate_volume_level};

use crate::capabilities::VolumeControl;
use crate::media_control::{fetch_media_status, media_command};

/// [`VolumeControl`] for a cast session.
///
/// With an active media session the stream volume is used, through
/// `SET_VOLUME` on the media channel. Otherwise the device volume
/// primitives of the transport are used.
#[derive(Debug, Clone)]
pub struct CastVolumeControl {
	session: Session,
}

impl CastVolumeControl {
	pub(crate) fn new(session: Session) -> Self {
		Self { session }
	}

	fn media_active(&self) -> bool {
		self.session.channel(namespace::MEDIA).is_some() && self.session.active_media().is_ok()
	}

	async fn current(&self) -> Result<Volume> {
		if self.media_active() {
			Ok(fetch_media_status(&self.session).await?.volume)
		} else {
			self.session.device_volume().await
		}
	}

	async fn apply(&self, volume: Volume) -> Result<()> {
		if self.media_active() {
			tracing::debug!(?volume, "Setting stream volume");
			return media_command(&self.session, move |media_session_id| MediaRequest::SetVolume {
				media_session_id,
				volume,
			})
			.await;
		}

		tracing::debug!(?volume, "Setting device volume");
		if let Some(level) = volume.level {
			self.session.set_device_volume(level).await?;
		}
		if let Some(muted) = volume.muted {
			self.session.set_device_mute(muted).await?;
		}
		Ok(())
	}
}

#[async_trait]
impl VolumeControl for CastVolumeControl {
	async fn volume(&self) -> Result<f64> {
		self.current()
			.await?
			.level
			.ok_or_else(|| Error::Protocol("volume reply carried no level".into()))
	}

	async fn set_volume(&self, level: f64) -> Result<()> {
		let level = validate_volume_level(level)?;
		self.apply(Volume::level(level)).await
	}

	async fn mute(&self) -> Result<bool> {
		Ok(self.current().await?.muted.unwrap_or(false))
	}

	async fn set_mute(&self, muted: bool) -> Result<()> {
		self.apply(Volume::muted(muted)).await
	}
}
