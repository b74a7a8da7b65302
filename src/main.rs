use std::io::BufRead;
use std::time::Duration;

use anyhow::Context;
use sysinfo::System;

use sound_cues::config::Config;
use sound_cues::error::AppResult;
use sound_cues::sound::{select_backend, CueDispatcher, Platform, SoundCue, ThrottledCue};

const LOG_TARGET_STARTUP: &str = "sound_cues::startup";

/// Upper bound on waiting for queued cues before exiting
const PLAYBACK_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/SoundCues/logs/`, one file per day
/// (`sound-cues.YYYY-MM-DD.log`). Debug builds also log to the console.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = Config::app_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "sound-cues.log");

    // Configure filter (info level by default)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

fn log_runtime_environment(platform: Platform) {
    let version = env!("CARGO_PKG_VERSION");
    let os_name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| "Unknown OS".to_string());
    let kernel = System::kernel_version().unwrap_or_else(|| "Unknown Kernel".to_string());

    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting sound-cues v{} on {} ({})",
        version,
        platform,
        std::env::consts::ARCH
    );
    tracing::info!(target: LOG_TARGET_STARTUP, "Operating System: {} (kernel {})", os_name, kernel);
}

/// Result of one console command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Group argv words into commands. `throttled` takes the word after it, so
/// `sound-cues throttled move dong` runs `throttled move` then `dong`.
fn commands_from_args(args: &[String]) -> Vec<String> {
    let mut words = args.iter().flat_map(|arg| arg.split_whitespace());
    let mut commands = Vec::new();
    while let Some(word) = words.next() {
        let command = match word {
            "throttled" => match words.next() {
                Some(name) => format!("throttled {}", name),
                None => word.to_string(),
            },
            _ => word.to_string(),
        };
        commands.push(command);
    }
    commands
}

fn run_command(dispatcher: &CueDispatcher, line: &str) -> Flow {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (None, _) => {}
        (Some("quit" | "exit"), _) => return Flow::Quit,
        (Some("on"), _) => dispatcher.on_sound_setting_changed(true),
        (Some("off"), _) => dispatcher.on_sound_setting_changed(false),
        (Some("throttled"), Some(name)) => match name.parse::<SoundCue>().and_then(ThrottledCue::try_from) {
            Ok(cue) => dispatcher.throttled_play(cue),
            Err(e) => eprintln!("{}", e),
        },
        (Some("throttled"), None) => eprintln!("Usage: throttled <move|capture>"),
        (Some(name), _) => match name.parse::<SoundCue>() {
            Ok(cue) => dispatcher.play(cue),
            Err(e) => eprintln!("{}", e),
        },
    }
    Flow::Continue
}

fn main() -> AppResult<()> {
    initialize_tracing();

    let platform = match std::env::var("SOUND_CUES_PLATFORM") {
        Ok(name) => name.parse::<Platform>()?,
        Err(_) => Platform::current(),
    };
    log_runtime_environment(platform);

    let config = Config::load().context("Failed to load configuration")?;
    let sounds_root = config.sounds_root()?;

    let backend = select_backend(platform, &sounds_root, config.volume, None)
        .context("Failed to create sound backend")?;
    let dispatcher = CueDispatcher::new(backend, config.throttle_window());
    dispatcher
        .initialize(platform, &config)
        .with_context(|| format!("Failed to load sounds from {}", sounds_root.display()))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        for command in commands_from_args(&args) {
            if let Flow::Quit = run_command(&dispatcher, &command) {
                break;
            }
        }
        // Let queued cues finish before the output stream goes away
        if !dispatcher.wait_for_playback(PLAYBACK_DRAIN_TIMEOUT) {
            tracing::warn!("Gave up waiting for sounds to finish");
        }
        return Ok(());
    }

    println!("Cues: move capture explosion lowtime dong berserk clock confirmation");
    println!("Commands: <cue> | throttled <move|capture> | on | off | quit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;
        if let Flow::Quit = run_command(&dispatcher, line.trim()) {
            break;
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use sound_cues::sound::SoundBackend;
    use sound_cues::SoundError;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingBackend {
        plays: Mutex<Vec<String>>,
    }

    impl SoundBackend for RecordingBackend {
        fn load_sound(&self, _id: &str, _path: &str) -> Result<(), SoundError> {
            Ok(())
        }

        fn play(&self, id: &str) -> Result<(), SoundError> {
            self.plays.lock().push(id.to_string());
            Ok(())
        }

        fn loaded_count(&self) -> usize {
            0
        }
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_throttled_takes_next_argument() {
        assert_eq!(
            commands_from_args(&args(&["throttled", "move", "dong", "throttled", "capture"])),
            vec!["throttled move", "dong", "throttled capture"]
        );
        assert_eq!(
            commands_from_args(&args(&["throttled move", "off"])),
            vec!["throttled move", "off"]
        );
        assert_eq!(commands_from_args(&args(&["throttled"])), vec!["throttled"]);
    }

    #[test]
    fn test_separate_throttled_args_play_once() {
        let backend = Arc::new(RecordingBackend::default());
        let dispatcher = CueDispatcher::new(backend.clone(), Duration::from_secs(60));
        dispatcher.initialize(Platform::Desktop, &true).unwrap();

        for command in commands_from_args(&args(&["throttled", "move", "throttled", "move"])) {
            assert_eq!(run_command(&dispatcher, &command), Flow::Continue);
        }

        assert_eq!(*backend.plays.lock(), vec!["move"]);
    }

    #[test]
    fn test_console_commands() {
        let backend = Arc::new(RecordingBackend::default());
        let dispatcher = CueDispatcher::new(backend.clone(), Duration::from_secs(60));
        dispatcher.initialize(Platform::Desktop, &true).unwrap();

        run_command(&dispatcher, "off");
        run_command(&dispatcher, "dong");
        run_command(&dispatcher, "on");
        run_command(&dispatcher, "clock");
        run_command(&dispatcher, "throttled explosion");
        run_command(&dispatcher, "nonsense");
        assert_eq!(run_command(&dispatcher, "quit"), Flow::Quit);

        assert_eq!(*backend.plays.lock(), vec!["clock"]);
    }
}
