//! PCM playback on the default output device.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use shared::error::{Error, Result};
use shared::types::AudioSample;

pub struct AudioPlayer;

impl AudioPlayer {
    pub fn new() -> Self {
        Self
    }

    /// Play the sample to completion. Blocking; run on a blocking task.
    pub fn play_blocking(&self, sample: &AudioSample) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("nenhum dispositivo de saída disponível".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| Error::Audio(format!("configuração de saída: {}", e)))?;

        if supported.sample_format() != SampleFormat::F32 {
            return Err(Error::Audio(format!(
                "formato de saída não suportado: {:?}",
                supported.sample_format()
            )));
        }

        let out_rate = supported.sample_rate().0;
        let out_channels = supported.channels() as usize;
        let stream_config: cpal::StreamConfig = supported.into();

        let mono = sample.to_mono().resample(out_rate)?;
        let data: Arc<Vec<f32>> = Arc::new(
            mono.data
                .iter()
                .map(|&s| s as f32 / i16::MAX as f32)
                .collect(),
        );
        let total = data.len();
        let position = Arc::new(AtomicUsize::new(0));

        let data_cb = Arc::clone(&data);
        let position_cb = Arc::clone(&position);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |output: &mut [f32], _| {
                    for frame in output.chunks_mut(out_channels) {
                        let idx = position_cb.fetch_add(1, Ordering::Relaxed);
                        let value = data_cb.get(idx).copied().unwrap_or(0.0);
                        for slot in frame.iter_mut() {
                            *slot = value;
                        }
                    }
                },
                |err| tracing::warn!("erro na reprodução de áudio: {}", err),
                None,
            )
            .map_err(|e| Error::Audio(format!("falha ao abrir a saída de áudio: {}", e)))?;

        stream
            .play()
            .map_err(|e| Error::Audio(format!("falha ao iniciar a reprodução: {}", e)))?;

        // wait until every sample was consumed, with a duration-based cap
        let expected = Duration::from_secs_f32(total as f32 / out_rate as f32);
        let deadline = Instant::now() + expected + Duration::from_millis(500);
        while position.load(Ordering::Relaxed) < total && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }

        Ok(())
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}
