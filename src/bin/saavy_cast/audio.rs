//! Sound card output fed from the console listener's ring.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, RingBuffer};
use saavy_cast::{BLOCK_SIZE, SAMPLE_RATE};
use tracing::{error, info};

/// Ring capacity between engine and device, in samples (~16 blocks).
const RING_SAMPLES: usize = BLOCK_SIZE * 16;

pub fn ring() -> (rtrb::Producer<f32>, Consumer<f32>) {
    RingBuffer::new(RING_SAMPLES)
}

/// Open the default output device at the engine rate. The returned stream
/// must be kept alive for playback to continue.
pub fn start_output(mut ring: Consumer<f32>) -> EyreResult<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let default_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let channels = default_config.channels() as usize;
    let config = cpal::StreamConfig {
        channels: default_config.channels(),
        sample_rate: cpal::SampleRate(SAMPLE_RATE as u32),
        buffer_size: cpal::BufferSize::Default,
    };

    info!(
        device = device.name().unwrap_or_default(),
        channels,
        sample_rate = SAMPLE_RATE,
        "opening audio output"
    );

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _| {
                // Mono to all channels; silence on underrun.
                for frame in data.chunks_mut(channels) {
                    let sample = ring.pop().unwrap_or(0.0);
                    frame.fill(sample);
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;
    Ok(stream)
}
