//! Speech input: microphone capture plus offline recognition with a
//! Portuguese Vosk model.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::services::SpeechInput;
use shared::error::{Error, ListenError, Result};
use vosk::{CompleteResult, Model, Recognizer};

use super::microphone::{Microphone, MicrophoneConfig};

const RECOGNIZER_SAMPLE_RATE: f32 = 16_000.0;

pub struct VoiceListener {
    model: Arc<Model>,
    microphone: Microphone,
}

impl VoiceListener {
    pub fn new(model_path: &Path) -> Result<Self> {
        let model = Model::new(model_path.to_string_lossy().as_ref()).ok_or_else(|| {
            Error::Configuration(format!(
                "modelo Vosk não encontrado em {}",
                model_path.display()
            ))
        })?;

        tracing::info!("modelo de reconhecimento carregado: {}", model_path.display());
        Ok(Self {
            model: Arc::new(model),
            microphone: Microphone::new(MicrophoneConfig::default()),
        })
    }
}

#[async_trait]
impl SpeechInput for VoiceListener {
    async fn listen(
        &self,
        timeout: Duration,
        max_phrase: Duration,
    ) -> std::result::Result<String, ListenError> {
        let model = Arc::clone(&self.model);
        let microphone = self.microphone.clone();

        tokio::task::spawn_blocking(move || {
            let audio = microphone.capture(timeout, max_phrase)?;
            let audio = audio
                .to_16khz_mono()
                .map_err(|e| ListenError::Transport(e.to_string()))?;

            let mut recognizer = Recognizer::new(&model, RECOGNIZER_SAMPLE_RATE).ok_or_else(
                || ListenError::Transport("falha ao criar o reconhecedor".to_string()),
            )?;

            recognizer
                .accept_waveform(&audio.data)
                .map_err(|e| ListenError::Transport(format!("{:?}", e)))?;

            match recognizer.final_result() {
                CompleteResult::Single(result) if !result.text.trim().is_empty() => {
                    Ok(result.text.trim().to_string())
                }
                _ => Err(ListenError::Unrecognized),
            }
        })
        .await
        .map_err(|e| ListenError::Transport(format!("tarefa de escuta abortada: {}", e)))?
    }
}
