//! Speech synthesis through the Piper binary with a pt-BR voice model,
//! played back on the default output device.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use async_trait::async_trait;
use domain::services::SpeechOutput;
use shared::error::{Error, Result};
use shared::types::AudioSample;
use uuid::Uuid;

use super::player::AudioPlayer;

pub struct PiperVoice {
    bin: PathBuf,
    model: PathBuf,
    player: Arc<AudioPlayer>,
}

impl PiperVoice {
    pub fn new(bin: &Path, model: &Path) -> Result<Self> {
        if !model.exists() {
            return Err(Error::Configuration(format!(
                "modelo de voz Piper não encontrado em {}",
                model.display()
            )));
        }

        tracing::info!("síntese de voz pronta: {}", model.display());
        Ok(Self {
            bin: bin.to_path_buf(),
            model: model.to_path_buf(),
            player: Arc::new(AudioPlayer::new()),
        })
    }
}

fn synthesize_blocking(bin: &Path, model: &Path, text: &str) -> Result<AudioSample> {
    let temp_path = std::env::temp_dir().join(format!("isa_tts_{}.wav", Uuid::new_v4()));

    let mut child = Command::new(bin)
        .arg("--model")
        .arg(model)
        .arg("--output_file")
        .arg(&temp_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Audio(format!("falha ao iniciar o Piper: {}", e)))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| Error::Audio(format!("falha ao enviar texto ao Piper: {}", e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| Error::Audio(format!("falha ao aguardar o Piper: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Audio(format!(
            "Piper falhou: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let bytes = std::fs::read(&temp_path)
        .map_err(|e| Error::Audio(format!("falha ao ler o WAV gerado: {}", e)))?;
    let _ = std::fs::remove_file(&temp_path);

    parse_wav(&bytes)
}

/// Minimal RIFF/WAVE parser for the 16-bit PCM files Piper writes.
fn parse_wav(bytes: &[u8]) -> Result<AudioSample> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(Error::Audio("arquivo WAV inválido".to_string()));
    }

    let mut channels: u8 = 1;
    let mut sample_rate: u32 = 22_050;
    let mut offset = 12usize;

    while offset + 8 <= bytes.len() {
        let chunk_id = &bytes[offset..offset + 4];
        let chunk_size = u32::from_le_bytes([
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]) as usize;
        let body = offset + 8;

        if chunk_id == b"fmt " && body + 8 <= bytes.len() {
            channels = u16::from_le_bytes([bytes[body + 2], bytes[body + 3]]) as u8;
            sample_rate = u32::from_le_bytes([
                bytes[body + 4],
                bytes[body + 5],
                bytes[body + 6],
                bytes[body + 7],
            ]);
        } else if chunk_id == b"data" {
            let end = (body + chunk_size).min(bytes.len());
            let data: Vec<i16> = bytes[body..end]
                .chunks_exact(2)
                .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            return Ok(AudioSample::new(data, sample_rate, channels.max(1)));
        }

        offset = body + chunk_size + (chunk_size % 2);
    }

    Err(Error::Audio("WAV sem bloco de dados".to_string()))
}

#[async_trait]
impl SpeechOutput for PiperVoice {
    async fn speak(&self, text: &str) -> Result<()> {
        let bin = self.bin.clone();
        let model = self.model.clone();
        let player = Arc::clone(&self.player);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let sample = synthesize_blocking(&bin, &model, &text)?;
            player.play_blocking(&sample)
        })
        .await
        .map_err(|e| Error::Audio(format!("tarefa de fala abortada: {}", e)))?
    }
}
