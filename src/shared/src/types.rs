use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Raw PCM audio captured from a microphone or produced by a TTS engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSample {
    pub data: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u8,
}

impl AudioSample {
    pub fn new(data: Vec<i16>, sample_rate: u32, channels: u8) -> Self {
        Self {
            data,
            sample_rate,
            channels,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.data.len() as f32 / self.sample_rate as f32 / self.channels as f32
    }

    pub fn samples_per_channel(&self) -> usize {
        self.data.len() / self.channels.max(1) as usize
    }

    /// Convert audio to mono by averaging channels.
    pub fn to_mono(&self) -> AudioSample {
        if self.channels <= 1 {
            return self.clone();
        }

        let samples_per_channel = self.samples_per_channel();
        let mut mono_data = Vec::with_capacity(samples_per_channel);

        for frame_idx in 0..samples_per_channel {
            let mut sum: i32 = 0;
            for ch in 0..self.channels as usize {
                sum += self.data[frame_idx * self.channels as usize + ch] as i32;
            }
            mono_data.push((sum / self.channels as i32) as i16);
        }

        AudioSample::new(mono_data, self.sample_rate, 1)
    }

    /// Convert to the 16 kHz mono layout the recognizer expects.
    pub fn to_16khz_mono(&self) -> Result<AudioSample> {
        self.to_mono().resample(16_000)
    }

    /// Resample using linear interpolation.
    pub fn resample(&self, target_sample_rate: u32) -> Result<AudioSample> {
        if self.sample_rate == target_sample_rate {
            return Ok(self.clone());
        }
        if self.data.is_empty() {
            return Ok(AudioSample::new(
                Vec::new(),
                target_sample_rate,
                self.channels,
            ));
        }

        let ratio = target_sample_rate as f32 / self.sample_rate as f32;
        let new_length = (self.data.len() as f32 * ratio) as usize;
        let mut resampled = Vec::with_capacity(new_length);

        for i in 0..new_length {
            let src_idx = i as f32 / ratio;
            let idx_floor = src_idx.floor() as usize;
            let idx_ceil = (idx_floor + 1).min(self.data.len() - 1);
            let fraction = src_idx - idx_floor as f32;

            let sample = self.data[idx_floor] as f32 * (1.0 - fraction)
                + self.data[idx_ceil] as f32 * fraction;
            resampled.push(sample as i16);
        }

        Ok(AudioSample::new(resampled, target_sample_rate, self.channels))
    }

    /// RMS level, used for voice activity detection.
    pub fn rms_level(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .data
            .iter()
            .map(|&s| {
                let f = s as f64 / i16::MAX as f64;
                f * f
            })
            .sum();
        ((sum / self.data.len() as f64) as f32).sqrt()
    }
}
