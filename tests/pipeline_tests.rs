//! End-to-end cycles through the real analyzer, visualizers and sinks.

use std::f64::consts::PI;
use std::io::Write;
use std::net::UdpSocket;
use std::time::Duration;

use stripwave::audio::BarAnalyzer;
use stripwave::error::TransportError;
use stripwave::params::AppConfig;
use stripwave::transport::{TransportSink, UdpSink};
use stripwave::{ActiveVisualizer, CycleOutcome, Error, FramePipeline, VisualizerKind};
use tempfile::NamedTempFile;

#[derive(Default)]
struct MemorySink {
    frames: Vec<Vec<u8>>,
}

impl TransportSink for MemorySink {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.frames.push(frame.to_vec());
        Ok(())
    }
}

/// Interleaved stereo sine at `amplitude`, same signal on both channels
fn stereo_sine(hz: f64, amplitude: f64, frames: usize, sample_rate: u32) -> Vec<f32> {
    (0..frames)
        .flat_map(|i| {
            let s = (amplitude * (2.0 * PI * hz * i as f64 / sample_rate as f64).sin()) as f32;
            [s, s]
        })
        .collect()
}

fn analyzer_for(config: &AppConfig) -> BarAnalyzer {
    BarAnalyzer::new(
        &config.analyzer,
        config.strip.bar_count,
        config.capture.sample_rate_hz,
        config.capture.channels as usize,
    )
}

#[test]
fn silence_then_tone_brightens_the_loudness_meter() {
    let config = AppConfig::default();
    let mut pipeline = FramePipeline::new(
        &config,
        analyzer_for(&config),
        MemorySink::default(),
        ActiveVisualizer::new(VisualizerKind::AverageLoudness),
    );
    let frames = config.capture.frames_per_buffer as usize;

    let silence = vec![0.0f32; config.capture.samples_per_buffer()];
    assert_eq!(pipeline.process(&silence), CycleOutcome::Sent);

    let tone = stereo_sine(440.0, 0.8, frames, config.capture.sample_rate_hz);
    for _ in 0..4 {
        assert_eq!(pipeline.process(&tone), CycleOutcome::Sent);
    }

    let sent = &pipeline.sink().frames;
    assert_eq!(sent.len(), 5);
    assert!(sent.iter().all(|f| f.len() == config.strip.frame_len()));
    assert!(sent[0].iter().all(|&b| b == 0), "silence must be dark");

    let last = &sent[4];
    assert!(last[0] > 0, "tone should light the strip");
    // loudness meter is pure red
    assert!(last.chunks(3).all(|px| px[1] == 0 && px[2] == 0));
}

#[test]
fn integer_samples_drive_the_same_frames_as_float() {
    let config = AppConfig::default();
    let frames = config.capture.frames_per_buffer as usize;
    let float_block = stereo_sine(1000.0, 0.5, frames, config.capture.sample_rate_hz);
    let int_block: Vec<i16> = float_block
        .iter()
        .map(|&s| (s * i16::MAX as f32) as i16)
        .collect();

    let mut from_float = FramePipeline::new(
        &config,
        analyzer_for(&config),
        MemorySink::default(),
        ActiveVisualizer::new(VisualizerKind::Rainbow),
    );
    let mut from_int = FramePipeline::new(
        &config,
        analyzer_for(&config),
        MemorySink::default(),
        ActiveVisualizer::new(VisualizerKind::Rainbow),
    );

    from_float.process(&float_block);
    from_int.process(&int_block);

    let a = &from_float.sink().frames[0];
    let b = &from_int.sink().frames[0];
    let max_diff = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (x as i16 - y as i16).abs())
        .max()
        .unwrap_or(0);
    assert!(max_diff <= 2, "frames differ by {}", max_diff);
}

#[test]
fn odd_block_is_skipped_and_pipeline_recovers() {
    let config = AppConfig::default();
    let mut pipeline = FramePipeline::new(
        &config,
        analyzer_for(&config),
        MemorySink::default(),
        ActiveVisualizer::default(),
    );

    assert_eq!(pipeline.process(&[0.1f32; 5]), CycleOutcome::Skipped);
    assert_eq!(pipeline.process(&[0.1f32; 6]), CycleOutcome::Sent);

    let stats = pipeline.stats().snapshot();
    assert_eq!(stats.cycles, 2);
    assert_eq!(stats.skipped_cycles, 1);
    assert_eq!(stats.frames_sent, 1);
    assert_eq!(pipeline.sink().frames.len(), 1);
}

#[test]
fn frames_arrive_over_udp() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    let mut config = AppConfig::default();
    config.strip.led_count = 60;
    config.strip.bar_count = 30;
    config.strip.sink = receiver.local_addr().unwrap().to_string();
    config.validate().unwrap();

    let sink = UdpSink::connect(&config.strip.sink).unwrap();
    let mut pipeline = FramePipeline::new(
        &config,
        analyzer_for(&config),
        sink,
        ActiveVisualizer::new(VisualizerKind::BassIntensity),
    );

    let tone = stereo_sine(
        80.0,
        0.9,
        config.capture.frames_per_buffer as usize,
        config.capture.sample_rate_hz,
    );
    assert_eq!(pipeline.process(&tone), CycleOutcome::Sent);

    let mut buf = [0u8; 1024];
    let len = receiver.recv(&mut buf).unwrap();
    assert_eq!(len, 60 * 3);
    assert_eq!(&buf[..len], pipeline.leds().as_bytes());
    // one flood color across the strip
    assert!(buf[..len].chunks(3).all(|px| px == &buf[..3]));
}

/// Feed `buffers` consecutive blocks of one continuous stereo tone to the bass meter
fn bass_meter_after(hz: f64, buffers: usize) -> FramePipeline<BarAnalyzer, MemorySink> {
    let config = AppConfig::default();
    let mut pipeline = FramePipeline::new(
        &config,
        analyzer_for(&config),
        MemorySink::default(),
        ActiveVisualizer::new(VisualizerKind::BassIntensity),
    );
    let frames = config.capture.frames_per_buffer as usize;
    let tone = stereo_sine(hz, 0.8, frames * buffers, config.capture.sample_rate_hz);
    for block in tone.chunks(config.capture.samples_per_buffer()) {
        assert_eq!(pipeline.process(block), CycleOutcome::Sent);
    }
    pipeline
}

#[test]
fn bass_meter_follows_low_tones_only() {
    // 75 bars: the left channel owns 0..38, so bass is its lowest 9 bars (~50-175 Hz)
    let mid = bass_meter_after(450.0, 12);
    let spectrum = mid.analyzer().spectrum();
    assert_eq!(spectrum.channels(), 2);
    assert_eq!(spectrum.channel(0).len(), 38);
    // the tone is loud, just not bass
    assert!(spectrum.bars().iter().copied().fold(0.0, f64::max) > 0.3);
    let frame = mid.sink().frames.last().unwrap();
    assert!(frame.iter().all(|&b| b <= 2), "450 Hz lit the bass meter: {:?}", &frame[..3]);

    let low = bass_meter_after(80.0, 12);
    let frame = low.sink().frames.last().unwrap();
    assert!(frame.chunks(3).all(|px| px == &frame[..3]));
    let [r, g, b] = [frame[0], frame[1], frame[2]];
    assert!(r >= 240, "80 Hz left the bass meter dim: {:?}", [r, g, b]);
    // orange: red over green, no blue
    assert!(g > 0 && g < r);
    assert_eq!(b, 0);
}

#[test]
fn config_file_round_trip_through_validation() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
stats_interval_secs = 0

[strip]
led_count = 300
bar_count = 150
sink = "127.0.0.1:1337"

[audio]
channels = 1
frames_per_buffer = 735

[visualizer]
active = "loudness"
peak_smoothing = 0.5
"#
    )
    .unwrap();

    let config = AppConfig::load(file.path()).unwrap();
    config.validate().unwrap();
    assert_eq!(config.strip.frame_len(), 900);
    assert_eq!(config.capture.channels, 1);
    assert_eq!(config.visualizer.active, VisualizerKind::AverageLoudness);
    assert_eq!(config.stats_interval(), None);
}

#[test]
fn invalid_config_is_rejected_before_start() {
    let mut config = AppConfig::default();
    config.strip.led_count = 1;
    assert!(matches!(config.validate(), Err(Error::Config(_))));

    let mut config = AppConfig::default();
    config.strip.led_count = 30_000;
    assert!(matches!(config.validate(), Err(Error::Config(_))));

    let mut config = AppConfig::default();
    config.visualizer.peak_smoothing = 0.0;
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}
