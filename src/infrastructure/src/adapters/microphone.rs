//! Blocking microphone capture with simple RMS-based end-pointing.
//!
//! The capture waits up to `timeout` for speech to start, then records
//! until a trailing silence or `max_phrase` elapses. Callers run this on
//! a blocking task.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use shared::error::ListenError;
use shared::types::AudioSample;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct MicrophoneConfig {
    /// RMS level above which a chunk counts as voice.
    pub silence_threshold: f32,
    /// Trailing silence that ends the phrase.
    pub silence_end: Duration,
}

impl Default for MicrophoneConfig {
    fn default() -> Self {
        Self {
            silence_threshold: 0.015,
            silence_end: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Microphone {
    config: MicrophoneConfig,
}

impl Microphone {
    pub fn new(config: MicrophoneConfig) -> Self {
        Self { config }
    }

    pub fn capture(
        &self,
        timeout: Duration,
        max_phrase: Duration,
    ) -> Result<AudioSample, ListenError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| ListenError::Transport("nenhum microfone encontrado".to_string()))?;
        let supported = device
            .default_input_config()
            .map_err(|e| ListenError::Transport(format!("configuração do microfone: {}", e)))?;

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();
        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.into();

        let buffer: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);

        let err_fn = |err: cpal::StreamError| tracing::warn!("erro no fluxo de áudio: {}", err);

        let stream = match sample_format {
            SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _| {
                    let mut sink = sink.lock().expect("audio buffer poisoned");
                    sink.extend(data.iter().map(|&s| {
                        (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
                    }));
                },
                err_fn,
                None,
            ),
            SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _| {
                    sink.lock().expect("audio buffer poisoned").extend_from_slice(data);
                },
                err_fn,
                None,
            ),
            SampleFormat::U16 => device.build_input_stream(
                &stream_config,
                move |data: &[u16], _| {
                    let mut sink = sink.lock().expect("audio buffer poisoned");
                    sink.extend(data.iter().map(|&s| (s as i32 - 32_768) as i16));
                },
                err_fn,
                None,
            ),
            other => {
                return Err(ListenError::Transport(format!(
                    "formato de amostra não suportado: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| ListenError::Transport(format!("falha ao abrir o microfone: {}", e)))?;

        stream
            .play()
            .map_err(|e| ListenError::Transport(format!("falha ao iniciar a captura: {}", e)))?;

        let outcome = self.wait_for_phrase(&buffer, sample_rate, channels, timeout, max_phrase);
        drop(stream);
        outcome
    }

    fn wait_for_phrase(
        &self,
        buffer: &Arc<Mutex<Vec<i16>>>,
        sample_rate: u32,
        channels: u16,
        timeout: Duration,
        max_phrase: Duration,
    ) -> Result<AudioSample, ListenError> {
        let started = Instant::now();
        let mut consumed = 0usize;
        let mut speech_start: Option<Instant> = None;
        let mut last_voice = Instant::now();

        loop {
            std::thread::sleep(POLL_INTERVAL);

            let chunk_rms = {
                let data = buffer.lock().expect("audio buffer poisoned");
                let chunk = &data[consumed.min(data.len())..];
                consumed = data.len();
                if chunk.is_empty() {
                    0.0
                } else {
                    AudioSample::new(chunk.to_vec(), sample_rate, channels as u8).rms_level()
                }
            };
            let voiced = chunk_rms > self.config.silence_threshold;

            match speech_start {
                None => {
                    if voiced {
                        speech_start = Some(Instant::now());
                        last_voice = Instant::now();
                    } else if started.elapsed() > timeout {
                        return Err(ListenError::Timeout);
                    }
                }
                Some(start) => {
                    if voiced {
                        last_voice = Instant::now();
                    }
                    if last_voice.elapsed() > self.config.silence_end
                        || start.elapsed() > max_phrase
                    {
                        break;
                    }
                }
            }
        }

        let data = std::mem::take(&mut *buffer.lock().expect("audio buffer poisoned"));
        Ok(AudioSample::new(data, sample_rate, channels as u8))
    }
}
