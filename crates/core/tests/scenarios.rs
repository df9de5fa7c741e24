mod common;

use std::time::Duration;

use cast::{
	Capability, Error, MediaControl, MediaInformation, MediaMetadata, MediaPlayer, PlayerState,
	SessionEvent, SessionState, StreamType, TransportCommand, WebAppLauncher, namespace,
};
use common::{ReceiverScript, connected, device, sent, sent_on, settle, start_with};

fn movie() -> MediaInformation {
	MediaInformation::new("https://example.com/big-buck-bunny.mp4", "video/mp4")
		.with_metadata(MediaMetadata::generic("Big Buck Bunny"))
		.with_duration(Duration::from_secs(596))
}

#[tokio::test]
async fn launch_play_disconnect_then_not_ready() -> anyhow::Result<()> {
	let (service, script) = connected().await;

	let launch = service.media_player().play_media(movie(), Some("appX")).await?;
	assert_eq!(launch.app.app_id, "appX");
	assert_eq!(service.state(), SessionState::AppJoined);

	let control = service.media_control();
	control.play().await?;
	assert_eq!(control.play_state().await?, PlayerState::Playing);

	service.disconnect()?;
	assert_eq!(service.state(), SessionState::Disconnected);

	for result in [
		control.play().await,
		control.pause().await,
		control.seek(Duration::from_secs(5)).await,
	] {
		assert!(matches!(result, Err(Error::SessionNotReady { .. })), "{result:?}");
	}

	settle().await;
	assert_eq!(sent(&script).last(), Some(&TransportCommand::Disconnect));
	Ok(())
}

#[tokio::test]
async fn refused_connection_never_opens_channels() {
	common::init_tracing();
	let (service, _script) = start_with(
		Default::default(),
		ReceiverScript {
			refuse_connect: true,
			..Default::default()
		},
	);

	let err = service.connect(device()).await.unwrap_err();
	assert_eq!(err.device_code(), Some(61));
	assert_eq!(service.state(), SessionState::Failed);
	assert!(service.media_channel().is_none());
	assert!(service.session().open_channels().is_empty());

	assert_eq!(
		service.web_app_launcher().launch_web_app("appX").await.unwrap_err(),
		Error::SessionNotReady {
			state: SessionState::Failed
		}
	);
}

#[tokio::test]
async fn play_media_uses_configured_web_app() -> anyhow::Result<()> {
	let (service, script) = connected().await;

	let launch = service.media_player().play_media(movie(), None).await?;

	assert_eq!(launch.app.app_id, namespace::DEFAULT_MEDIA_RECEIVER_APP_ID);
	assert_eq!(launch.media_session_id, 1);
	let loads = sent_on(&script, namespace::MEDIA);
	assert_eq!(loads.len(), 1);
	assert_eq!(loads[0]["type"], "LOAD");
	assert_eq!(loads[0]["media"]["contentId"], "https://example.com/big-buck-bunny.mp4");
	assert_eq!(loads[0]["autoplay"], true);
	Ok(())
}

#[tokio::test]
async fn play_media_switches_application() -> anyhow::Result<()> {
	let (service, script) = connected().await;
	let web_app = service.web_app_launcher().launch_web_app("appX").await?;

	let launch = service.media_player().play_media(movie(), None).await?;

	assert_eq!(launch.app.app_id, namespace::DEFAULT_MEDIA_RECEIVER_APP_ID);
	assert!(!web_app.is_connected());
	assert!(sent(&script).contains(&TransportCommand::StopApplication {
		session_id: web_app.app().session_id.clone()
	}));
	Ok(())
}

#[tokio::test]
async fn play_media_reuses_joined_application() -> anyhow::Result<()> {
	let (service, script) = connected().await;
	let player = service.media_player();

	let first = player.play_media(movie(), None).await?;
	let second = player.play_media(movie(), None).await?;

	assert_eq!(first.app, second.app);
	assert_eq!(second.media_session_id, 2);
	let launches = sent(&script)
		.iter()
		.filter(|command| matches!(command, TransportCommand::LaunchApplication { .. }))
		.count();
	assert_eq!(launches, 1);
	Ok(())
}

#[tokio::test]
async fn load_failure_surfaces_device_error() -> anyhow::Result<()> {
	common::init_tracing();
	let (service, _script) = start_with(
		Default::default(),
		ReceiverScript {
			fail_loads: true,
			..Default::default()
		},
	);
	service.connect(device()).await?;

	let err = service.media_player().play_media(movie(), None).await.unwrap_err();

	assert_eq!(
		err,
		Error::DeviceError {
			code: Some(104),
			reason: "LOAD_FAILED".into()
		}
	);
	assert_eq!(service.state(), SessionState::AppJoined);
	Ok(())
}

#[tokio::test]
async fn media_control_requires_active_media() -> anyhow::Result<()> {
	let (service, _script) = connected().await;
	let control = service.media_control();

	assert!(matches!(
		control.play().await,
		Err(Error::SessionNotReady {
			state: SessionState::Connected
		})
	));

	service.web_app_launcher().launch_web_app("CC1AD845").await?;
	assert_eq!(control.pause().await, Err(Error::NoActiveMedia));
	assert_eq!(control.position().await, Err(Error::NoActiveMedia));
	Ok(())
}

#[tokio::test]
async fn media_volume_rejects_out_of_range_levels() -> anyhow::Result<()> {
	let (service, script) = connected().await;
	service.media_player().play_media(movie(), None).await?;
	let control = service.media_control();
	settle().await;
	let before = sent(&script).len();

	for level in [-0.1, 1.5, f64::NAN] {
		assert!(matches!(
			control.set_volume(level).await,
			Err(Error::InvalidArgument(_))
		));
	}

	settle().await;
	assert_eq!(sent(&script).len(), before);
	Ok(())
}

#[tokio::test]
async fn media_queries_and_transport_control() -> anyhow::Result<()> {
	let (service, script) = connected().await;
	let mut events = service.subscribe();
	service.media_player().play_media(movie(), None).await?;
	let control = service.media_control();

	control.seek(Duration::from_secs(42)).await?;
	assert_eq!(control.position().await?, Duration::from_secs(42));
	assert_eq!(control.duration().await?, Some(Duration::from_secs(596)));

	control.pause().await?;
	assert_eq!(control.play_state().await?, PlayerState::Paused);
	assert_eq!(service.media_status().unwrap().player_state, PlayerState::Paused);

	control.stop().await?;
	assert_eq!(control.play_state().await?, PlayerState::Idle);
	assert_eq!(control.play().await, Err(Error::NoActiveMedia));

	let media_types: Vec<String> = sent_on(&script, namespace::MEDIA)
		.iter()
		.map(|payload| payload["type"].as_str().unwrap_or_default().to_string())
		.collect();
	assert_eq!(
		media_types,
		["LOAD", "SEEK", "GET_STATUS", "GET_STATUS", "PAUSE", "GET_STATUS", "STOP", "GET_STATUS"]
	);

	let received: Vec<SessionEvent> = std::iter::from_fn(|| events.try_recv().ok()).collect();
	assert!(received.contains(&SessionEvent::MediaEnded));
	Ok(())
}

#[tokio::test]
async fn display_image_loads_photo() -> anyhow::Result<()> {
	let (service, script) = connected().await;

	service
		.media_player()
		.display_image("https://example.com/cat.jpg", "image/jpeg", "Cat")
		.await?;

	let load = &sent_on(&script, namespace::MEDIA)[0];
	assert_eq!(load["media"]["streamType"], "NONE");
	assert_eq!(load["media"]["metadata"]["metadataType"], MediaMetadata::PHOTO);
	assert_eq!(load["media"]["metadata"]["images"][0]["url"], "https://example.com/cat.jpg");
	assert_eq!(
		service.media_status().unwrap().media.unwrap().stream_type,
		StreamType::None
	);
	Ok(())
}

#[tokio::test]
async fn close_media_returns_to_connected() -> anyhow::Result<()> {
	let (service, _script) = connected().await;
	let player = service.media_player();
	let launch = player.play_media(movie(), None).await?;

	player.close_media(&launch).await?;
	assert_eq!(service.state(), SessionState::Connected);
	assert!(service.media_channel().is_none());

	// Closing again is a no-op.
	player.close_media(&launch).await?;
	Ok(())
}

#[tokio::test]
async fn rejected_launch_fails_session() {
	common::init_tracing();
	let (service, _script) = start_with(
		Default::default(),
		ReceiverScript {
			rejected_apps: ["missing".to_string()].into(),
			..Default::default()
		},
	);
	service.connect(device()).await.unwrap();
	let mut events = service.subscribe();

	let err = service
		.media_player()
		.play_media(movie(), Some("missing"))
		.await
		.unwrap_err();

	assert!(matches!(err, Error::LaunchRejected { ref app_id, .. } if app_id == "missing"));
	assert_eq!(service.state(), SessionState::Failed);
	let failed = std::iter::from_fn(|| events.try_recv().ok())
		.any(|event| matches!(event, SessionEvent::Error(Error::LaunchRejected { .. })));
	assert!(failed);
}

#[tokio::test]
async fn capabilities_follow_device_flags() {
	let (service, _script) = connected().await;

	assert!(service.has_capability(Capability::PlayVideo));
	assert!(service.has_capability(Capability::VolumeSet));
	assert!(service.has_capability(Capability::WebAppLaunch));

	service.disconnect().unwrap();
	assert!(service.capabilities().is_empty());
}
