//! Media namespace messages (`urn:x-cast:com.google.cast.media`).
//!
//! Requests are serialized without a `requestId`; the runtime stamps the
//! correlation id onto the JSON object when it issues the command.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::message_type;
use crate::receiver::Volume;

/// How the receiver should treat the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamType {
	/// Not a stream (e.g. a still image).
	None,
	#[default]
	Buffered,
	Live,
}

/// Artwork attached to media metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub height: Option<u32>,
}

impl Image {
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			width: None,
			height: None,
		}
	}
}

/// Descriptive metadata shown by the receiver while media plays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
	pub metadata_type: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtitle: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub images: Vec<Image>,
}

impl MediaMetadata {
	pub const GENERIC: u32 = 0;
	pub const MOVIE: u32 = 1;
	pub const TV_SHOW: u32 = 2;
	pub const MUSIC_TRACK: u32 = 3;
	pub const PHOTO: u32 = 4;

	pub fn generic(title: impl Into<String>) -> Self {
		Self {
			metadata_type: Self::GENERIC,
			title: Some(title.into()),
			..Default::default()
		}
	}

	pub fn photo(title: impl Into<String>) -> Self {
		Self {
			metadata_type: Self::PHOTO,
			title: Some(title.into()),
			..Default::default()
		}
	}

	pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
		self.subtitle = Some(subtitle.into());
		self
	}

	pub fn with_image(mut self, image: Image) -> Self {
		self.images.push(image);
		self
	}
}

/// The media descriptor passed to `LOAD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInformation {
	/// URL (or app-specific id) of the content.
	pub content_id: String,
	/// MIME type, e.g. `video/mp4`.
	pub content_type: String,
	#[serde(default)]
	pub stream_type: StreamType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<MediaMetadata>,
	/// Stream duration in seconds, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub duration: Option<f64>,
}

impl MediaInformation {
	pub fn new(content_id: impl Into<String>, content_type: impl Into<String>) -> Self {
		Self {
			content_id: content_id.into(),
			content_type: content_type.into(),
			stream_type: StreamType::Buffered,
			metadata: None,
			duration: None,
		}
	}

	pub fn with_stream_type(mut self, stream_type: StreamType) -> Self {
		self.stream_type = stream_type;
		self
	}

	pub fn with_metadata(mut self, metadata: MediaMetadata) -> Self {
		self.metadata = Some(metadata);
		self
	}

	pub fn with_duration(mut self, duration: Duration) -> Self {
		self.duration = Some(duration.as_secs_f64());
		self
	}
}

/// Player state reported in a media status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerState {
	#[default]
	Idle,
	Playing,
	Paused,
	Buffering,
	/// A state this crate does not know about.
	#[serde(other)]
	Unknown,
}

impl PlayerState {
	pub fn as_str(&self) -> &'static str {
		match self {
			PlayerState::Idle => "IDLE",
			PlayerState::Playing => "PLAYING",
			PlayerState::Paused => "PAUSED",
			PlayerState::Buffering => "BUFFERING",
			PlayerState::Unknown => "UNKNOWN",
		}
	}
}

impl fmt::Display for PlayerState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Why the player went idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdleReason {
	Cancelled,
	Interrupted,
	Finished,
	Error,
	#[serde(other)]
	Unknown,
}

fn default_playback_rate() -> f64 {
	1.0
}

/// Snapshot of one media session on the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStatus {
	pub media_session_id: i64,
	#[serde(default)]
	pub player_state: PlayerState,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub idle_reason: Option<IdleReason>,
	/// Playback position in seconds.
	#[serde(default)]
	pub current_time: f64,
	#[serde(default = "default_playback_rate")]
	pub playback_rate: f64,
	/// Present on the first status after a load and whenever media changes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub media: Option<MediaInformation>,
	/// Stream volume (distinct from the device volume).
	#[serde(default)]
	pub volume: Volume,
}

impl MediaStatus {
	/// Current playback position.
	pub fn position(&self) -> Duration {
		Duration::try_from_secs_f64(self.current_time).unwrap_or_default()
	}

	/// Stream duration, if the receiver reported a finite one.
	pub fn duration(&self) -> Option<Duration> {
		self.media
			.as_ref()
			.and_then(|media| media.duration)
			.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
	}

	/// A session that went idle with a reason has ended; commands against it
	/// are rejected by the receiver.
	pub fn is_active(&self) -> bool {
		!(self.player_state == PlayerState::Idle && self.idle_reason.is_some())
	}
}

/// Outbound media command, serialized with its `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
	tag = "type",
	rename_all = "SCREAMING_SNAKE_CASE",
	rename_all_fields = "camelCase"
)]
pub enum MediaRequest {
	Load {
		media: MediaInformation,
		autoplay: bool,
		current_time: f64,
	},
	Play {
		media_session_id: i64,
	},
	Pause {
		media_session_id: i64,
	},
	Stop {
		media_session_id: i64,
	},
	Seek {
		media_session_id: i64,
		current_time: f64,
	},
	SetVolume {
		media_session_id: i64,
		volume: Volume,
	},
	GetStatus {
		#[serde(skip_serializing_if = "Option::is_none")]
		media_session_id: Option<i64>,
	},
}

impl MediaRequest {
	/// Loads `media` and starts playback from the beginning.
	pub fn load(media: MediaInformation) -> Self {
		MediaRequest::Load {
			media,
			autoplay: true,
			current_time: 0.0,
		}
	}

	/// Serializes the request into the JSON object sent on the wire.
	pub fn to_value(&self) -> Result<Value, serde_json::Error> {
		serde_json::to_value(self)
	}
}

/// A `MEDIA_STATUS` message, either a reply or an unsolicited push.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaReply {
	#[serde(default)]
	pub request_id: u64,
	#[serde(default)]
	pub status: Vec<MediaStatus>,
}

impl MediaReply {
	pub const TYPE: &'static str = "MEDIA_STATUS";

	/// Parses `payload` if it is a `MEDIA_STATUS` message.
	///
	/// Returns `Ok(None)` for any other message type.
	pub fn parse(payload: &Value) -> Result<Option<Self>, serde_json::Error> {
		if message_type(payload) != Some(Self::TYPE) {
			return Ok(None);
		}
		Self::deserialize(payload).map(Some)
	}

	/// The first (and in practice only) media session in the reply.
	pub fn into_first(self) -> Option<MediaStatus> {
		self.status.into_iter().next()
	}
}
