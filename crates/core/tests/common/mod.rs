//! Scripted receiver driving a `CastService` in tests.
//!
//! The fake drains the outbound command queue on a background task and
//! answers each command the way a cast receiver running the Default Media
//! Receiver would.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use cast::{
	ApplicationInfo, CastConfig, CastService, ChannelTransport, Device, DeviceCapabilities,
	TransportCommand, TransportEvent, Volume, namespace,
};
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

pub fn device() -> Arc<Device> {
	Arc::new(
		Device::new("chromecast-1", "Living Room TV", "192.168.1.20:8009".parse().unwrap())
			.with_capabilities(DeviceCapabilities::VIDEO_OUT | DeviceCapabilities::AUDIO_OUT)
			.with_model_name("Chromecast"),
	)
}

/// Knobs and observations shared with the fake receiver task.
#[derive(Default)]
pub struct ReceiverScript {
	pub refuse_connect: bool,
	pub rejected_apps: HashSet<String>,
	/// Reply to media requests with `LOAD_FAILED` instead of a status.
	pub fail_loads: bool,
	pub commands: Vec<TransportCommand>,
}

struct MediaState {
	session_id: i64,
	player_state: &'static str,
	idle_reason: Option<&'static str>,
	current_time: f64,
	media: Value,
	volume: Volume,
}

struct FakeReceiver {
	service: CastService,
	script: Arc<Mutex<ReceiverScript>>,
	launches: u32,
	running: Option<ApplicationInfo>,
	media: Option<MediaState>,
	next_media_session: i64,
	device_volume: Volume,
}

/// Starts a service wired to a fake receiver.
pub fn start() -> (CastService, Arc<Mutex<ReceiverScript>>) {
	start_with(CastConfig::default(), ReceiverScript::default())
}

pub fn start_with(config: CastConfig, script: ReceiverScript) -> (CastService, Arc<Mutex<ReceiverScript>>) {
	let (transport, commands) = ChannelTransport::new();
	let service = CastService::with_config(Arc::new(transport), config);
	let script = Arc::new(Mutex::new(script));

	let receiver = FakeReceiver {
		service: service.clone(),
		script: Arc::clone(&script),
		launches: 0,
		running: None,
		media: None,
		next_media_session: 1,
		device_volume: Volume {
			level: Some(0.25),
			muted: Some(false),
		},
	};
	tokio::spawn(receiver.serve(commands));

	(service, script)
}

/// Starts a service and connects it.
pub async fn connected() -> (CastService, Arc<Mutex<ReceiverScript>>) {
	init_tracing();
	let (service, script) = start();
	service.connect(device()).await.unwrap();
	(service, script)
}

/// Lets the receiver task drain commands that expect no reply.
pub async fn settle() {
	for _ in 0..16 {
		tokio::task::yield_now().await;
	}
}

/// Commands the service submitted so far.
pub fn sent(script: &Arc<Mutex<ReceiverScript>>) -> Vec<TransportCommand> {
	script.lock().unwrap().commands.clone()
}

/// Payloads sent on `ns`, in order.
pub fn sent_on(script: &Arc<Mutex<ReceiverScript>>, ns: &str) -> Vec<Value> {
	sent(script)
		.into_iter()
		.filter_map(|command| match command {
			TransportCommand::Send { namespace, payload, .. } if namespace == ns => Some(payload),
			_ => None,
		})
		.collect()
}

impl FakeReceiver {
	async fn serve(mut self, mut commands: UnboundedReceiver<TransportCommand>) {
		while let Some(command) = commands.recv().await {
			self.script.lock().unwrap().commands.push(command.clone());
			for event in self.answer(command) {
				self.service.handle_event(event);
			}
		}
	}

	fn answer(&mut self, command: TransportCommand) -> Vec<TransportEvent> {
		match command {
			TransportCommand::Connect { .. } => {
				if self.script.lock().unwrap().refuse_connect {
					vec![TransportEvent::ConnectFailed {
						code: Some(61),
						reason: "connection refused".into(),
					}]
				} else {
					vec![TransportEvent::Connected]
				}
			}
			TransportCommand::Disconnect => {
				self.running = None;
				self.media = None;
				Vec::new()
			}
			TransportCommand::LaunchApplication { request_id, app_id, .. }
			| TransportCommand::JoinApplication { request_id, app_id } => {
				if self.script.lock().unwrap().rejected_apps.contains(&app_id) {
					return vec![TransportEvent::ApplicationRejected {
						request_id,
						code: None,
						reason: "NOT_FOUND".into(),
					}];
				}
				self.launches += 1;
				let app = ApplicationInfo {
					app_id,
					display_name: "Receiver App".into(),
					session_id: format!("session-{}", self.launches),
					transport_id: format!("web-{}", self.launches),
					status_text: None,
					namespaces: Vec::new(),
				};
				self.running = Some(app.clone());
				self.media = None;
				vec![TransportEvent::ApplicationJoined { request_id, app }]
			}
			TransportCommand::StopApplication { session_id } => {
				self.running = None;
				self.media = None;
				vec![TransportEvent::ApplicationStopped { session_id }]
			}
			TransportCommand::Send { namespace: ns, payload, .. } if ns == namespace::MEDIA => {
				self.answer_media(payload).into_iter().collect()
			}
			TransportCommand::Send { namespace: ns, payload, .. } => {
				let reply = match payload.get("requestId") {
					Some(id) => json!({"type": "ECHO", "requestId": id, "message": payload}),
					None => json!({"type": "ECHO", "message": payload}),
				};
				vec![TransportEvent::Message {
					namespace: ns,
					payload: reply,
				}]
			}
			TransportCommand::GetVolume { request_id } => vec![TransportEvent::DeviceReply {
				request_id,
				result: Ok(self.device_volume),
			}],
			TransportCommand::SetVolume { request_id, level } => {
				self.device_volume.level = Some(level);
				vec![TransportEvent::DeviceReply {
					request_id,
					result: Ok(self.device_volume),
				}]
			}
			TransportCommand::SetMute { request_id, muted } => {
				self.device_volume.muted = Some(muted);
				vec![TransportEvent::DeviceReply {
					request_id,
					result: Ok(self.device_volume),
				}]
			}
		}
	}

	fn answer_media(&mut self, request: Value) -> Option<TransportEvent> {
		let request_id = request.get("requestId").cloned().unwrap_or(json!(0));
		let kind = request.get("type").and_then(Value::as_str).unwrap_or_default();

		if self.script.lock().unwrap().fail_loads && kind == "LOAD" {
			return Some(media_message(json!({
				"type": "LOAD_FAILED",
				"requestId": request_id,
				"detailedErrorCode": 104,
			})));
		}

		match kind {
			"LOAD" => {
				let session_id = self.next_media_session;
				self.next_media_session += 1;
				self.media = Some(MediaState {
					session_id,
					player_state: "PLAYING",
					idle_reason: None,
					current_time: request.get("currentTime").and_then(Value::as_f64).unwrap_or(0.0),
					media: request.get("media").cloned().unwrap_or(Value::Null),
					volume: Volume {
						level: Some(1.0),
						muted: Some(false),
					},
				});
			}
			"PLAY" | "PAUSE" | "STOP" | "SEEK" | "SET_VOLUME" => {
				let Some(media) = self.media.as_mut() else {
					return Some(media_message(json!({
						"type": "INVALID_REQUEST",
						"requestId": request_id,
						"reason": "INVALID_MEDIA_SESSION_ID",
					})));
				};
				match kind {
					"PLAY" => media.player_state = "PLAYING",
					"PAUSE" => media.player_state = "PAUSED",
					"STOP" => {
						media.player_state = "IDLE";
						media.idle_reason = Some("CANCELLED");
					}
					"SEEK" => {
						media.current_time = request["currentTime"].as_f64().unwrap_or(0.0);
					}
					_ => {
						let volume = &request["volume"];
						if let Some(level) = volume["level"].as_f64() {
							media.volume.level = Some(level);
						}
						if let Some(muted) = volume["muted"].as_bool() {
							media.volume.muted = Some(muted);
						}
					}
				}
			}
			"GET_STATUS" => {}
			_ => return None,
		}

		Some(media_message(json!({
			"type": "MEDIA_STATUS",
			"requestId": request_id,
			"status": self.media_status(kind == "LOAD"),
		})))
	}

	fn media_status(&self, include_media: bool) -> Value {
		let Some(media) = &self.media else {
			return json!([]);
		};
		let mut status = json!({
			"mediaSessionId": media.session_id,
			"playerState": media.player_state,
			"currentTime": media.current_time,
			"playbackRate": 1,
			"volume": media.volume,
		});
		if let Some(reason) = media.idle_reason {
			status["idleReason"] = json!(reason);
		}
		if include_media {
			status["media"] = media.media.clone();
		}
		json!([status])
	}
}

fn media_message(payload: Value) -> TransportEvent {
	TransportEvent::Message {
		namespace: namespace::MEDIA.into(),
		payload,
	}
}
