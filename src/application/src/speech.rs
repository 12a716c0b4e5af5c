//! Speech output queue: an unbounded FIFO drained by exactly one worker
//! task. One utterance is fully spoken before the next is dequeued, so
//! replies come out in enqueue order. There is no cancellation; whatever
//! is queued will be spoken unless the process exits first.

use std::sync::Arc;

use domain::services::SpeechOutput;
use tokio::sync::mpsc::{self, UnboundedSender};

#[derive(Clone)]
pub struct SpeechQueue {
    tx: UnboundedSender<String>,
}

impl SpeechQueue {
    /// Spawn the worker and hand back the producer side.
    pub fn start(voice: Arc<dyn SpeechOutput>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if text.trim().is_empty() {
                    continue;
                }
                if let Err(err) = voice.speak(&text).await {
                    tracing::warn!("falha ao sintetizar fala: {}", err);
                }
            }
        });

        Self { tx }
    }

    /// Fire-and-forget; never blocks the producer. Returns `false` only
    /// when the worker is gone.
    pub fn enqueue(&self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }
}
