//! Wire types for the cast receiver protocol.
//!
//! This crate contains the serde-serializable types exchanged with a cast
//! receiver over its namespaced JSON channels. These types represent the
//! "protocol layer": the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization and
//!   small accessors
//! - **1:1 with protocol**: Field names follow the receiver's camelCase JSON
//! - **Stable**: Changes only when the wire protocol changes
//!
//! Session lifecycle, correlation and channel bookkeeping live in
//! `cast-runtime`; the capability API lives in `cast-rs`.

pub mod device;
pub mod media;
pub mod message;
pub mod namespace;
pub mod receiver;

pub use device::{Device, DeviceCapabilities};
pub use media::{
	IdleReason, Image, MediaInformation, MediaMetadata, MediaReply, MediaRequest, MediaStatus,
	PlayerState, StreamType,
};
pub use message::{ErrorReply, error_reply, message_type, request_id, stamp_request_id};
pub use receiver::{AppNamespace, ApplicationInfo, Volume};
