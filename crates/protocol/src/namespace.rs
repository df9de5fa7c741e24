//! Well-known channel namespaces and receiver application ids.

/// Virtual connection management between sender and receiver endpoints.
pub const CONNECTION: &str = "urn:x-cast:com.google.cast.tp.connection";

/// Keep-alive PING/PONG traffic.
pub const HEARTBEAT: &str = "urn:x-cast:com.google.cast.tp.heartbeat";

/// Receiver platform: application launch/stop and device volume.
pub const RECEIVER: &str = "urn:x-cast:com.google.cast.receiver";

/// Media control channel spoken by media-capable receiver applications.
pub const MEDIA: &str = "urn:x-cast:com.google.cast.media";

/// App-to-app bridge channel used by Connect SDK receiver applications.
pub const CONNECT_SDK: &str = "urn:x-cast:com.connectsdk";

/// Application id of the stock Default Media Receiver.
pub const DEFAULT_MEDIA_RECEIVER_APP_ID: &str = "CC1AD845";

/// Returns true for namespaces owned by the receiver platform rather than an
/// application. These are never exposed as app channels.
pub fn is_platform(namespace: &str) -> bool {
	matches!(namespace, CONNECTION | HEARTBEAT | RECEIVER)
}
