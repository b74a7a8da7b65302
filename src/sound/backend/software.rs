//! In-process software backend
//!
//! Preloads every sound into memory and plays it through rodio. The
//! `OutputStream` is not `Send`, so it lives on a dedicated output thread
//! that receives play requests over a channel. Each request gets its own
//! sink, which lets overlapping cues mix instead of cutting each other off.
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::SoundBackend;
use crate::error::SoundError;

type SoundData = Arc<[u8]>;

enum OutputCommand {
    Play { id: String, data: SoundData },
    Drain { done: Sender<()> },
    Shutdown,
}

pub struct SoftwareBackend {
    sounds_root: PathBuf,
    sounds: RwLock<HashMap<String, SoundData>>,
    commands: Sender<OutputCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
    volume: Arc<Mutex<f32>>,
}

impl SoftwareBackend {
    /// Create a backend that resolves sound paths against `sounds_root`
    pub fn new<P: AsRef<Path>>(sounds_root: P) -> Result<Self, SoundError> {
        let (tx, rx) = unbounded();
        let volume = Arc::new(Mutex::new(1.0));

        let worker_volume = Arc::clone(&volume);
        let worker = std::thread::Builder::new()
            .name("sound-output".to_string())
            .spawn(move || run_output(rx, worker_volume))
            .map_err(SoundError::ThreadSpawnFailed)?;

        Ok(Self {
            sounds_root: sounds_root.as_ref().to_path_buf(),
            sounds: RwLock::new(HashMap::new()),
            commands: tx,
            worker: Mutex::new(Some(worker)),
            volume,
        })
    }

    /// Set the volume applied to every cue (0.0 to 1.0)
    pub fn with_volume(self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn set_volume(&self, volume: f32) {
        *self.volume.lock() = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        *self.volume.lock()
    }

    fn read_sound(&self, path: &str) -> Result<SoundData, Box<dyn std::error::Error + Send + Sync>> {
        let full_path = self.sounds_root.join(path);
        if !full_path.exists() {
            return Err(format!("Sound file not found: {}", full_path.display()).into());
        }

        let data: SoundData = std::fs::read(&full_path)?.into();

        // Decode once up front so a bad file fails at load time
        let decoder = Decoder::new(Cursor::new(Arc::clone(&data)))?;
        let _ = decoder.count();

        Ok(data)
    }
}

impl SoundBackend for SoftwareBackend {
    fn load_sound(&self, id: &str, path: &str) -> Result<(), SoundError> {
        let data = self.read_sound(path).map_err(|source| SoundError::LoadFailed {
            id: id.to_string(),
            path: path.to_string(),
            source,
        })?;

        tracing::info!("Preloaded sound '{}': {} ({} bytes)", id, path, data.len());
        self.sounds.write().insert(id.to_string(), data);
        Ok(())
    }

    fn play(&self, id: &str) -> Result<(), SoundError> {
        let data = self
            .sounds
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SoundError::NotLoaded(id.to_string()))?;

        self.commands
            .send(OutputCommand::Play {
                id: id.to_string(),
                data,
            })
            .map_err(|_| SoundError::OutputUnavailable)
    }

    fn loaded_count(&self) -> usize {
        self.sounds.read().len()
    }

    fn wait_idle(&self, timeout: Duration) -> bool {
        let (done, finished) = bounded(1);
        if self.commands.send(OutputCommand::Drain { done }).is_err() {
            // Output thread is gone, nothing can be playing
            return true;
        }
        match finished.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}

impl Drop for SoftwareBackend {
    fn drop(&mut self) {
        let _ = self.commands.send(OutputCommand::Shutdown);
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}

/// Output thread: owns the audio device for the lifetime of the backend
fn run_output(commands: Receiver<OutputCommand>, volume: Arc<Mutex<f32>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!("No audio output device, sounds are disabled: {}", e);
            return;
        }
    };
    tracing::debug!("Audio output stream opened");

    let mut sinks: Vec<Sink> = Vec::new();
    while let Ok(command) = commands.recv() {
        match command {
            OutputCommand::Play { id, data } => {
                sinks.retain(|sink| !sink.empty());
                let level = *volume.lock();
                match play_data(&handle, data, level) {
                    Ok(sink) => sinks.push(sink),
                    Err(e) => tracing::debug!("Failed to play sound '{}': {}", id, e),
                }
            }
            OutputCommand::Drain { done } => {
                for sink in sinks.drain(..) {
                    sink.sleep_until_end();
                }
                let _ = done.send(());
            }
            OutputCommand::Shutdown => break,
        }
    }

    tracing::debug!("Audio output thread stopped");
}

fn play_data(
    handle: &OutputStreamHandle,
    data: SoundData,
    volume: f32,
) -> Result<Sink, Box<dyn std::error::Error>> {
    let source = Decoder::new(Cursor::new(data))?;
    let sink = Sink::try_new(handle)?;
    sink.set_volume(volume);
    sink.append(source);
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sound-cues-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("sounds")).unwrap();
        dir
    }

    #[test]
    fn test_load_fails_with_missing_file() {
        let root = temp_root("missing");
        let backend = SoftwareBackend::new(&root).unwrap();

        let err = backend.load_sound("move", "sounds/move.mp3").unwrap_err();
        match err {
            SoundError::LoadFailed { id, path, .. } => {
                assert_eq!(id, "move");
                assert_eq!(path, "sounds/move.mp3");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.loaded_count(), 0);

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_play_unloaded_sound() {
        let backend = SoftwareBackend::new(std::env::temp_dir()).unwrap();
        assert!(matches!(
            backend.play("capture"),
            Err(SoundError::NotLoaded(id)) if id == "capture"
        ));
    }

    #[test]
    fn test_volume_clamping() {
        let backend = SoftwareBackend::new(std::env::temp_dir())
            .unwrap()
            .with_volume(1.5);
        assert_eq!(backend.volume(), 1.0);

        backend.set_volume(-0.5);
        assert_eq!(backend.volume(), 0.0);

        backend.set_volume(0.4);
        assert_eq!(backend.volume(), 0.4);
    }

    /// 10ms of 8kHz mono silence
    fn write_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..80 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_load_and_play_valid_sound() {
        let root = temp_root("valid");
        write_wav(&root.join("sounds/dong.wav"));
        let backend = SoftwareBackend::new(&root).unwrap();

        backend.load_sound("dong", "sounds/dong.wav").unwrap();
        assert_eq!(backend.loaded_count(), 1);

        // Without an output device play reports OutputUnavailable, never NotLoaded
        let result = backend.play("dong");
        assert!(!matches!(result, Err(SoundError::NotLoaded(_))));
        assert!(backend.wait_idle(Duration::from_secs(5)));

        drop(backend);
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_load_fails_with_non_audio_file() {
        let root = temp_root("garbage");
        std::fs::write(root.join("sounds/clock.mp3"), "this is not audio data ".repeat(64)).unwrap();
        let backend = SoftwareBackend::new(&root).unwrap();

        let err = backend.load_sound("clock", "sounds/clock.mp3").unwrap_err();
        assert!(matches!(err, SoundError::LoadFailed { ref id, .. } if id == "clock"));
        assert_eq!(backend.loaded_count(), 0);

        drop(backend);
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_wait_idle_with_nothing_playing() {
        let backend = SoftwareBackend::new(std::env::temp_dir()).unwrap();
        assert!(backend.wait_idle(Duration::from_secs(5)));
    }
}
