//! Live audio capture driving the frame pipeline.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample};

use super::SpectrumAnalyzer;
use crate::error::{Error, Result};
use crate::params::CaptureConfig;
use crate::pipeline::FramePipeline;
use crate::transport::TransportSink;

/// Running input stream; dropping it stops the pipeline
pub struct AudioCapture {
    /// Audio input stream (kept alive)
    _stream: cpal::Stream,

    device_name: String,
}

impl AudioCapture {
    /// Names of the host's input devices
    pub fn list_input_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| Error::Audio(format!("Failed to enumerate input devices: {}", e)))?;
        Ok(devices.filter_map(|device| device.name().ok()).collect())
    }

    /// Open the configured input and start feeding `pipeline`.
    ///
    /// The pipeline moves into the stream callback; grab its stats and
    /// visualizer handles before calling this.
    pub fn start<A, S>(config: &CaptureConfig, pipeline: FramePipeline<A, S>) -> Result<Self>
    where
        A: SpectrumAnalyzer + 'static,
        S: TransportSink + 'static,
    {
        let host = cpal::default_host();
        let device = select_device(&host, config.device.as_deref())?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let sample_format = device
            .default_input_config()
            .map_err(|e| Error::Audio(format!("Failed to get input config: {}", e)))?
            .sample_format();

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate_hz),
            buffer_size: cpal::BufferSize::Fixed(config.frames_per_buffer),
        };

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32, A, S>(&device, &stream_config, pipeline),
            SampleFormat::I16 => build_stream::<i16, A, S>(&device, &stream_config, pipeline),
            SampleFormat::U16 => build_stream::<u16, A, S>(&device, &stream_config, pipeline),
            other => Err(Error::Audio(format!(
                "Unsupported input sample format {:?}",
                other
            ))),
        }?;

        stream
            .play()
            .map_err(|e| Error::Audio(format!("Failed to start input stream: {}", e)))?;

        tracing::info!(
            "Audio: {} @ {}Hz, {} ch, {} frames/buffer ({:?})",
            device_name,
            config.sample_rate_hz,
            config.channels,
            config.frames_per_buffer,
            sample_format
        );

        Ok(Self {
            _stream: stream,
            device_name,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

/// Named device if given, otherwise the host default
fn select_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device> {
    match name {
        Some(wanted) => host
            .input_devices()
            .map_err(|e| Error::Audio(format!("Failed to enumerate input devices: {}", e)))?
            .find(|device| device.name().map(|n| n == wanted).unwrap_or(false))
            .ok_or_else(|| Error::Audio(format!("No input device named '{}'", wanted))),
        None => host
            .default_input_device()
            .ok_or_else(|| Error::Audio("No audio input device found".to_string())),
    }
}

fn build_stream<T, A, S>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut pipeline: FramePipeline<A, S>,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f64: FromSample<T>,
    A: SpectrumAnalyzer + 'static,
    S: TransportSink + 'static,
{
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                pipeline.process(data);
            },
            |err| tracing::error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| Error::Audio(format!("Failed to build input stream: {}", e)))
}
