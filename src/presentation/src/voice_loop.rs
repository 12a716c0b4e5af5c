//! Continuous microphone front end: listen, dispatch, pause, repeat.

use std::sync::Arc;
use std::time::Duration;

use application::Dispatcher;
use domain::services::SpeechInput;
use shared::error::ListenError;

pub async fn run(
    dispatcher: Arc<Dispatcher>,
    listener: Arc<dyn SpeechInput>,
    timeout: Duration,
    max_phrase: Duration,
) {
    dispatcher.announce("Modo voz ativado. Iniciando escuta...");

    loop {
        if dispatcher.shutdown_requested() {
            break;
        }

        match listener.listen(timeout, max_phrase).await {
            Ok(text) => {
                tracing::info!("Você disse: {}", text);
                let outcome = dispatcher.handle(&text).await;
                if !outcome.display_text.is_empty() {
                    println!("ISA: {}", outcome.display_text);
                }
            }
            Err(ListenError::Timeout) => {
                dispatcher.announce("Tempo de escuta esgotado. Nenhuma frase detectada.");
            }
            Err(ListenError::Unrecognized) => {
                dispatcher.announce("Não foi possível entender o áudio.");
            }
            Err(ListenError::Transport(err)) => {
                tracing::error!("erro no microfone: {}. Desativando o modo voz.", err);
                break;
            }
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    dispatcher.announce("Modo voz desativado.");
}
