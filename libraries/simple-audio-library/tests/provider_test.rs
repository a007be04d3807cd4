//! Integration tests for the filesystem track provider

use base64::{engine::general_purpose::STANDARD, Engine as _};
use simple_audio_core::{CoreError, MediaRef, TrackProvider};
use simple_audio_library::{LibraryConfig, LibraryProvider};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// 16-bit mono PCM WAV with `samples` frames of silence
fn wav(sample_rate: u32, samples: u32) -> Vec<u8> {
    let data_len = samples * 2;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(44 + data_len as usize, 0);
    out
}

fn config_for(music: &Path, state: &Path) -> LibraryConfig {
    LibraryConfig {
        music_dir: music.to_path_buf(),
        state_file: state.join("state.json"),
        ..LibraryConfig::default()
    }
}

fn music_dir(temp: &TempDir) -> std::path::PathBuf {
    let music = temp.path().join("Music");
    fs::create_dir_all(music.join("Live")).unwrap();
    fs::write(music.join("bravo.mp3"), b"ID3 fake mp3").unwrap();
    fs::write(music.join("Alpha.OGG"), b"OggS fake ogg").unwrap();
    fs::write(music.join("cover.jpg"), b"not audio").unwrap();
    fs::write(music.join("Live").join("charlie.wav"), wav(8000, 8000)).unwrap();
    music
}

#[tokio::test]
async fn test_playlist_is_sorted_and_filtered() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);

    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();
    let playlist = library.get_playlist().await.unwrap();

    let titles: Vec<_> = playlist.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha.OGG", "bravo.mp3", "charlie.wav"]);
    for (position, track) in playlist.iter().enumerate() {
        assert_eq!(track.index, position);
        assert!(track.media.is_none(), "playlist entries are not resolved");
    }
    assert_eq!(playlist[1].size_bytes, Some(12));
}

#[tokio::test]
async fn test_missing_music_dir_is_empty_library() {
    let temp = TempDir::new().unwrap();

    let library = LibraryProvider::open(&config_for(&temp.path().join("absent"), temp.path()))
        .await
        .unwrap();

    assert!(library.is_empty());
    assert!(library.get_playlist().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_load_track_returns_base64_payload() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();

    let track = library.load_track(1).await.unwrap();

    assert_eq!(track.title, "bravo.mp3");
    match track.media {
        Some(MediaRef::Payload { data, mime }) => {
            assert_eq!(mime, "audio/mpeg");
            assert_eq!(STANDARD.decode(data).unwrap(), b"ID3 fake mp3");
        }
        other => panic!("expected payload, got {other:?}"),
    }

    let ogg = library.load_track(0).await.unwrap();
    assert!(matches!(ogg.media, Some(MediaRef::Payload { ref mime, .. }) if mime == "audio/ogg"));
}

#[tokio::test]
async fn test_load_track_out_of_range() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();

    let err = library.load_track(3).await.unwrap_err();

    assert!(matches!(err, CoreError::TrackOutOfRange { index: 3, len: 3 }));
}

#[tokio::test]
async fn test_deleted_file_fails_to_load() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();
    fs::remove_file(music.join("bravo.mp3")).unwrap();

    let err = library.load_track(1).await.unwrap_err();

    assert!(matches!(err, CoreError::Io(_)));
}

#[tokio::test]
async fn test_session_state_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let config = config_for(&music, temp.path());

    {
        let library = LibraryProvider::open(&config).await.unwrap();
        assert_eq!(library.get_initial_track().await.unwrap(), 0);
        assert_eq!(library.get_volume().await.unwrap(), 1.0);
        assert!(!library.get_repeat().await.unwrap());

        library.set_initial_track(2).await.unwrap();
        library.set_volume(1.7).await.unwrap();
        library.set_repeat(true).await.unwrap();
    }

    let library = LibraryProvider::open(&config).await.unwrap();
    assert_eq!(library.get_initial_track().await.unwrap(), 2);
    assert_eq!(library.get_volume().await.unwrap(), 1.0);
    assert!(library.get_repeat().await.unwrap());
}

#[tokio::test]
async fn test_nan_volume_is_rejected() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();
    library.set_volume(0.4).await.unwrap();

    let err = library.set_volume(f64::NAN).await.unwrap_err();

    assert!(matches!(err, CoreError::InvalidInput(_)));
    assert_eq!(library.get_volume().await.unwrap(), 0.4);
}

#[tokio::test]
async fn test_corrupt_state_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    fs::write(temp.path().join("state.json"), b"\x00garbage").unwrap();

    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();

    assert_eq!(library.get_initial_track().await.unwrap(), 0);
    assert_eq!(library.get_volume().await.unwrap(), 1.0);
}

#[tokio::test]
async fn test_metadata_reads_stream_properties() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();

    let track = library.get_track_metadata(2).await.unwrap();

    assert_eq!(track.index, 2);
    assert_eq!(track.title, "charlie.wav", "untagged file keeps its file name");
    let technical = track.technical.expect("technical info");
    assert_eq!(technical.sample_rate, Some(8000));
    assert_eq!(technical.channels, Some(1));
    assert_eq!(technical.bit_depth, Some(16));
    let duration = track.duration_ms.expect("duration");
    assert!((990..=1010).contains(&duration), "duration {duration}ms");
    assert!(track.cover.is_none());
    assert!(track.media.is_none());
}

#[tokio::test]
async fn test_metadata_out_of_range() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();

    assert!(matches!(
        library.get_track_metadata(9).await,
        Err(CoreError::TrackOutOfRange { index: 9, .. })
    ));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = LibraryConfig {
        max_depth: Some(0),
        ..config_for(temp.path(), temp.path())
    };

    assert!(LibraryProvider::open(&config).await.is_err());
}

#[tokio::test]
async fn test_resolving_a_track_does_not_move_the_initial_track() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let config = config_for(&music, temp.path());

    {
        let library = LibraryProvider::open(&config).await.unwrap();
        library.set_initial_track(2).await.unwrap();
        // Resolved but never applied by the player
        library.load_track(1).await.unwrap();
    }

    let library = LibraryProvider::open(&config).await.unwrap();
    assert_eq!(library.get_initial_track().await.unwrap(), 2);
}

#[tokio::test]
async fn test_initial_track_out_of_range_is_rejected() {
    let temp = TempDir::new().unwrap();
    let music = music_dir(&temp);
    let library = LibraryProvider::open(&config_for(&music, temp.path()))
        .await
        .unwrap();

    let err = library.set_initial_track(3).await.unwrap_err();

    assert!(matches!(err, CoreError::TrackOutOfRange { index: 3, len: 3 }));
    assert_eq!(library.get_initial_track().await.unwrap(), 0);
}
