use async_trait::async_trait;
use cast_protocol::{
	ApplicationInfo, Image, MediaInformation, MediaMetadata, MediaReply, MediaRequest, StreamType,
};
use cast_runtime::{CommandKind, Error, Result, Session};
use serde::{Deserialize, Serialize};

use crate::capabilities::MediaPlayer;
use crate::service::{ensure_application, media_channel};

/// Outcome of a successful load: where the media is playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaLaunch {
	pub app: ApplicationInfo,
	pub media_session_id: i64,
}

/// [`MediaPlayer`] over the media namespace.
#[derive(Debug, Clone)]
pub struct CastMediaPlayer {
	session: Session,
	web_app_id: String,
}

impl CastMediaPlayer {
	pub(crate) fn new(session: Session, web_app_id: String) -> Self {
		Self { session, web_app_id }
	}
}

#[async_trait]
impl MediaPlayer for CastMediaPlayer {
	async fn play_media(&self, media: MediaInformation, app_id: Option<&str>) -> Result<MediaLaunch> {
		let app_id = app_id.unwrap_or(&self.web_app_id);
		let app = ensure_application(&self.session, app_id, false).await?;

		tracing::debug!(content_id = %media.content_id, app_id, "Loading media");
		let request = MediaRequest::load(media).to_value()?;
		let reply = media_channel(&self.session)?
			.request(CommandKind::Media, request)
			.await?;

		let status = MediaReply::parse(&reply)?
			.and_then(MediaReply::into_first)
			.ok_or_else(|| Error::Protocol("load reply carried no media status".into()))?;

		Ok(MediaLaunch {
			app,
			media_session_id: status.media_session_id,
		})
	}

	async fn display_image(&self, url: &str, mime_type: &str, title: &str) -> Result<MediaLaunch> {
		let media = MediaInformation::new(url, mime_type)
			.with_stream_type(StreamType::None)
			.with_metadata(MediaMetadata::photo(title).with_image(Image::new(url)));
		self.play_media(media, None).await
	}

	async fn close_media(&self, launch: &MediaLaunch) -> Result<()> {
		match self.session.joined_application() {
			Some(app) if app.session_id == launch.app.session_id => self.session.stop_application(),
			_ => {
				tracing::debug!(app_id = %launch.app.app_id, "Media application already closed");
				Ok(())
			}
		}
	}
}
