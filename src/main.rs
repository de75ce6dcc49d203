//! Stripwave - audio-reactive LED strip driver
//!
//! Listens to an audio input (or replays a WAV file), renders one color
//! frame per audio buffer and streams it to a UDP strip controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{never, select, tick, unbounded, Receiver};

use stripwave::audio::{AudioCapture, BarAnalyzer, WavReplay};
use stripwave::cli::Args;
use stripwave::control::{self, Command};
use stripwave::logging;
use stripwave::transport::UdpSink;
use stripwave::{ActiveVisualizer, FramePipeline, PipelineStats};

/// Whatever is producing audio buffers; dropping it stops the pipeline
enum Engine {
    Live(AudioCapture),
    Replay(std::thread::JoinHandle<()>),
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    if args.list_devices {
        let devices =
            AudioCapture::list_input_devices().context("Failed to list input devices")?;
        for name in devices {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut config = args.load_config().context("Failed to load configuration")?;

    let replay = match &args.replay {
        Some(path) => {
            let replay = WavReplay::open(path)
                .with_context(|| format!("Failed to open replay file {}", path.display()))?;
            replay.apply_to(&mut config.capture);
            Some(replay)
        }
        None => None,
    };

    config.validate().context("Invalid configuration")?;

    let sink = UdpSink::connect(&config.strip.sink)
        .with_context(|| format!("Failed to open sink {}", config.strip.sink))?;
    let analyzer = BarAnalyzer::new(
        &config.analyzer,
        config.strip.bar_count,
        config.capture.sample_rate_hz,
        config.capture.channels as usize,
    );
    // Handles used after the pipeline moves onto the audio thread
    let stats = Arc::new(PipelineStats::default());
    let pipeline = FramePipeline::with_stats(
        &config,
        analyzer,
        sink,
        ActiveVisualizer::new(config.visualizer.active),
        Arc::clone(&stats),
    );
    let active = pipeline.active();
    let stop = Arc::new(AtomicBool::new(false));

    let (replay_done, engine): (Receiver<usize>, Engine) = match replay {
        Some(replay) => {
            let (done_tx, done_rx) = crossbeam_channel::bounded(1);
            let handle = replay
                .spawn(
                    pipeline,
                    config.capture.clone(),
                    Arc::clone(&stop),
                    done_tx,
                )
                .context("Failed to start replay thread")?;
            (done_rx, Engine::Replay(handle))
        }
        None => {
            let capture = AudioCapture::start(&config.capture, pipeline)
                .context("Failed to start audio capture")?;
            (never(), Engine::Live(capture))
        }
    };

    let (command_tx, command_rx) = unbounded();
    control::spawn_stdin_reader(command_tx).context("Failed to start command reader")?;

    let stats_ticker = match config.stats_interval() {
        Some(interval) => tick(interval),
        None => never(),
    };

    tracing::info!(
        "Running: {} LEDs, {} bars, visualizer {} (type 'help' for commands)",
        config.strip.led_count,
        config.strip.bar_count,
        active.get()
    );

    let closed_input = never();
    let mut input_open = true;

    loop {
        let commands = if input_open { &command_rx } else { &closed_input };

        select! {
            recv(commands) -> command => match command {
                Ok(Command::Switch(kind)) => {
                    let previous = active.set(kind);
                    tracing::info!("Visualizer: {} -> {}", previous, kind);
                }
                Ok(Command::Stats) => println!("{}", stats.snapshot()),
                Ok(Command::Help) => println!("{}", control::HELP),
                Ok(Command::Quit) => break,
                Err(_) => {
                    // stdin closed; keep running until quit or replay end
                    input_open = false;
                }
            },
            recv(stats_ticker) -> _ => {
                tracing::info!("Stats: {}", stats.snapshot());
            },
            recv(replay_done) -> _ => break,
        }
    }

    stop.store(true, Ordering::Relaxed);
    match engine {
        Engine::Live(capture) => {
            tracing::debug!("Closing input {}", capture.device_name());
            drop(capture);
        }
        Engine::Replay(handle) => {
            if handle.join().is_err() {
                tracing::error!("Replay thread panicked");
            }
        }
    }

    tracing::info!("Stopped: {}", stats.snapshot());
    Ok(())
}
