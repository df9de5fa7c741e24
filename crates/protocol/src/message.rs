//! Envelope helpers shared by every namespaced JSON message.
//!
//! Every message is a JSON object with a `type` discriminator. Requests that
//! expect a reply carry a non-zero integer `requestId`, echoed back by the
//! receiver on the reply. Unsolicited pushes use `requestId: 0` or omit it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the correlation field on the wire.
pub const REQUEST_ID: &str = "requestId";

/// Message types the receiver uses to reject a correlated request.
const ERROR_TYPES: &[&str] = &[
	"LOAD_FAILED",
	"LOAD_CANCELLED",
	"INVALID_PLAYER_STATE",
	"INVALID_REQUEST",
	"LAUNCH_ERROR",
];

/// Returns the `type` discriminator of a message, if present.
pub fn message_type(payload: &Value) -> Option<&str> {
	payload.get("type").and_then(Value::as_str)
}

/// Returns the correlation id carried by a reply.
///
/// A missing, non-integer or zero `requestId` means the message is an
/// unsolicited push.
pub fn request_id(payload: &Value) -> Option<u64> {
	payload
		.get(REQUEST_ID)
		.and_then(Value::as_u64)
		.filter(|id| *id != 0)
}

/// Writes `id` into the `requestId` field of an outbound message.
///
/// Returns false when the payload is not a JSON object and so cannot carry
/// a correlation id.
pub fn stamp_request_id(payload: &mut Value, id: u64) -> bool {
	match payload.as_object_mut() {
		Some(object) => {
			object.insert(REQUEST_ID.to_string(), Value::from(id));
			true
		}
		None => false,
	}
}

/// A receiver-side rejection of a correlated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReply {
	/// The rejecting message type, e.g. `LOAD_FAILED`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Free-form reason (`INVALID_REQUEST` and `LAUNCH_ERROR` carry one).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
	/// Numeric detail code, when the receiver supplies one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detailed_error_code: Option<i64>,
}

impl ErrorReply {
	/// Human-readable description combining the type and reason.
	pub fn describe(&self) -> String {
		match &self.reason {
			Some(reason) => format!("{}: {}", self.kind, reason),
			None => self.kind.clone(),
		}
	}
}

/// Interprets a reply as an error, if its type is one of the rejection types.
pub fn error_reply(payload: &Value) -> Option<ErrorReply> {
	let kind = message_type(payload)?;
	if !ERROR_TYPES.contains(&kind) {
		return None;
	}
	Some(ErrorReply {
		kind: kind.to_string(),
		reason: payload
			.get("reason")
			.and_then(Value::as_str)
			.map(str::to_string),
		detailed_error_code: payload.get("detailedErrorCode").and_then(Value::as_i64),
	})
}
