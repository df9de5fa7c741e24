use std::time::Duration;

use async_trait::async_trait;
use cast_protocol::{MediaReply, MediaRequest, MediaStatus, PlayerState, Volume};
use cast_runtime::{CommandKind, Error, Result, Session, validate_volume_level};

use crate::capabilities::MediaControl;
use crate::service::media_channel;

/// [`MediaControl`] over the media namespace.
#[derive(Debug, Clone)]
pub struct CastMediaControl {
	session: Session,
}

impl CastMediaControl {
	pub(crate) fn new(session: Session) -> Self {
		Self { session }
	}

	/// Issues `build(media_session_id)` against the active media session.
	async fn command(&self, build: impl FnOnce(i64) -> MediaRequest + Send) -> Result<()> {
		media_command(&self.session, build).await
	}
}

pub(crate) async fn media_command(
	session: &Session,
	build: impl FnOnce(i64) -> MediaRequest + Send,
) -> Result<()> {
	let active = session.active_media()?;
	let request = build(active.media_session_id).to_value()?;
	media_channel(session)?
		.request(CommandKind::Media, request)
		.await?;
	Ok(())
}

/// Asks the receiver for a fresh media status.
///
/// Works without a cached snapshot; an empty reply means nothing is loaded.
pub(crate) async fn fetch_media_status(session: &Session) -> Result<MediaStatus> {
	let channel = media_channel(session)?;
	let media_session_id = session.media_status().map(|status| status.media_session_id);
	let request = MediaRequest::GetStatus { media_session_id }.to_value()?;
	let reply = channel.request(CommandKind::Media, request).await?;

	MediaReply::parse(&reply)?
		.and_then(MediaReply::into_first)
		.ok_or(Error::NoActiveMedia)
}

#[async_trait]
impl MediaControl for CastMediaControl {
	async fn play(&self) -> Result<()> {
		self.command(|media_session_id| MediaRequest::Play { media_session_id })
			.await
	}

	async fn pause(&self) -> Result<()> {
		self.command(|media_session_id| MediaRequest::Pause { media_session_id })
			.await
	}

	async fn stop(&self) -> Result<()> {
		self.command(|media_session_id| MediaRequest::Stop { media_session_id })
			.await
	}

	async fn seek(&self, position: Duration) -> Result<()> {
		let current_time = position.as_secs_f64();
		self.command(move |media_session_id| MediaRequest::Seek {
			media_session_id,
			current_time,
		})
		.await
	}

	async fn set_volume(&self, level: f64) -> Result<()> {
		let level = validate_volume_level(level)?;
		self.command(move |media_session_id| MediaRequest::SetVolume {
			media_session_id,
			volume: Volume::level(level),
		})
		.await
	}

	async fn position(&self) -> Result<Duration> {
		Ok(fetch_media_status(&self.session).await?.position())
	}

	async fn duration(&self) -> Result<Option<Duration>> {
		let status = fetch_media_status(&self.session).await?;
		// The reply may omit `media`; the session keeps it from earlier pushes.
		Ok(status.duration().or_else(|| {
			self.session
				.media_status()
				.filter(|cached| cached.media_session_id == status.media_session_id)
				.and_then(|cached| cached.duration())
		}))
	}

	async fn play_state(&self) -> Result<PlayerState> {
		Ok(fetch_media_status(&self.session).await?.player_state)
	}
}
