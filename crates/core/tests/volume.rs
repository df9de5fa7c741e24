mod common;

use cast::{Error, MediaInformation, MediaPlayer, TransportCommand, VolumeControl, namespace};
use common::{connected, sent, sent_on, start};

#[tokio::test]
async fn out_of_range_levels_are_rejected() {
	let (service, script) = connected().await;
	let volume = service.volume_control();
	let before = sent(&script).len();

	for level in [-0.1, 1.5] {
		assert!(matches!(
			volume.set_volume(level).await,
			Err(Error::InvalidArgument(_))
		));
	}

	assert_eq!(sent(&script).len(), before);
}

#[tokio::test]
async fn device_volume_round_trip() -> anyhow::Result<()> {
	let (service, script) = connected().await;
	let volume = service.volume_control();

	assert_eq!(volume.volume().await?, 0.25);
	volume.set_volume(0.5).await?;
	assert_eq!(volume.volume().await?, 0.5);

	assert!(!volume.mute().await?);
	volume.set_mute(true).await?;
	assert!(volume.mute().await?);

	let commands = sent(&script);
	assert!(commands.iter().any(|command| matches!(
		command,
		TransportCommand::SetVolume { level, .. } if *level == 0.5
	)));
	assert!(sent_on(&script, namespace::MEDIA).is_empty());
	Ok(())
}

#[tokio::test]
async fn active_media_takes_stream_volume() -> anyhow::Result<()> {
	let (service, script) = connected().await;
	service
		.media_player()
		.play_media(
			MediaInformation::new("https://example.com/song.mp3", "audio/mpeg"),
			None,
		)
		.await?;
	let volume = service.volume_control();

	assert_eq!(volume.volume().await?, 1.0);
	volume.set_volume(0.5).await?;
	assert_eq!(volume.volume().await?, 0.5);
	volume.set_mute(true).await?;
	assert!(volume.mute().await?);

	let set_volumes: Vec<_> = sent_on(&script, namespace::MEDIA)
		.into_iter()
		.filter(|payload| payload["type"] == "SET_VOLUME")
		.collect();
	assert_eq!(set_volumes.len(), 2);
	assert_eq!(set_volumes[0]["volume"]["level"], 0.5);
	assert_eq!(set_volumes[1]["volume"]["muted"], true);
	assert!(set_volumes[1]["volume"].get("level").is_none());
	assert!(
		!sent(&script)
			.iter()
			.any(|command| matches!(command, TransportCommand::SetVolume { .. }))
	);

	// The device volume is untouched.
	assert_eq!(service.session().device_volume().await?.level, Some(0.25));
	Ok(())
}

#[tokio::test]
async fn closed_media_channel_falls_back_to_device() -> anyhow::Result<()> {
	let (service, script) = connected().await;
	service
		.media_player()
		.play_media(
			MediaInformation::new("https://example.com/song.mp3", "audio/mpeg"),
			None,
		)
		.await?;
	assert!(service.media_channel().expect("media channel").close());
	let volume = service.volume_control();

	assert_eq!(volume.volume().await?, 0.25);
	volume.set_volume(0.5).await?;
	assert_eq!(volume.volume().await?, 0.5);

	assert!(sent(&script).iter().any(|command| matches!(
		command,
		TransportCommand::SetVolume { level, .. } if *level == 0.5
	)));
	assert!(
		!sent_on(&script, namespace::MEDIA)
			.iter()
			.any(|payload| payload["type"] == "SET_VOLUME")
	);
	Ok(())
}

#[tokio::test]
async fn volume_requires_connection() {
	common::init_tracing();
	let (service, _script) = start();

	assert!(matches!(
		service.volume_control().volume().await,
		Err(Error::SessionNotReady { .. })
	));
	assert!(matches!(
		service.volume_control().set_volume(0.5).await,
		Err(Error::SessionNotReady { .. })
	));
}
