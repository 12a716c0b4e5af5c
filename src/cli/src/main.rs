use std::sync::Arc;

use anyhow::Context;
use application::{DispatchSettings, Dispatcher, SpeechQueue};
use clap::{Parser, Subcommand};
use domain::services::SpeechInput;
use infrastructure::adapters::{PiperVoice, VoiceListener};
use infrastructure::browser::WebDriverLauncher;
use infrastructure::config::Config;
use infrastructure::gemini::{GeminiChat, SYSTEM_PROMPT_ASSISTANT, SYSTEM_PROMPT_URL};
use infrastructure::opener::ShellUrlOpener;
use infrastructure::system::ShellSystemControl;
use presentation::web::AppState;
use presentation::{repl, voice_loop, web};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "isa", version, about = "ISA - assistente virtual por voz e texto")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP front end (default)
    Serve {
        /// Port to listen on (overrides ISA_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Continuous microphone loop
    Voice,
    /// Interactive text prompt
    Repl,
    /// Dispatch a single utterance and exit
    Once {
        /// The utterance, e.g. `isa once abra o bloco de notas`
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let settings = DispatchSettings {
        ai_open: config.ai_open,
        brief_replies: config.brief_replies,
        screenshot_path: config.screenshot_path.clone(),
        ..DispatchSettings::default()
    };

    let speech = match PiperVoice::new(&config.piper_bin, &config.piper_model) {
        Ok(voice) => Some(SpeechQueue::start(Arc::new(voice))),
        Err(err) => {
            tracing::warn!("saída de voz desativada: {}", err);
            None
        }
    };

    let dispatcher = Arc::new(Dispatcher::new(
        settings,
        Arc::new(WebDriverLauncher::new(config.webdriver_url.clone())),
        Arc::new(ShellUrlOpener::new()),
        Arc::new(ShellSystemControl::new()),
        speech,
    ));

    connect_language_model(&dispatcher, &config).await;

    let listener: Option<Arc<dyn SpeechInput>> = match VoiceListener::new(&config.vosk_model) {
        Ok(listener) => Some(Arc::new(listener)),
        Err(err) => {
            tracing::warn!("entrada de voz desativada: {}", err);
            None
        }
    };

    dispatcher.announce(&format!(
        "{}! Sou a assistente virtual ISA, como posso lhe ajudar?",
        shared::text::greeting_now()
    ));

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let state = AppState::new(Arc::clone(&dispatcher), listener, config);
            web::serve(state, port).await?;
        }
        Command::Voice => {
            let listener = listener.context(
                "modo voz requer o modelo Vosk (veja ISA_VOSK_MODEL) e um microfone",
            )?;
            voice_loop::run(
                Arc::clone(&dispatcher),
                listener,
                config.listen_timeout,
                config.max_phrase,
            )
            .await;
        }
        Command::Repl => {
            repl::run(Arc::clone(&dispatcher)).await?;
        }
        Command::Once { text } => {
            let outcome = dispatcher.handle(&text.join(" ")).await;
            if !outcome.display_text.is_empty() {
                println!("{}", outcome.display_text);
            }
            dispatcher.await_pending_open().await;
        }
    }

    Ok(())
}

async fn connect_language_model(dispatcher: &Arc<Dispatcher>, config: &Config) {
    let Some(key) = &config.api_key else {
        tracing::warn!(
            "GEMINI_API_KEY não encontrada. Funcionalidade de IA desativada."
        );
        return;
    };

    let prompt = if config.ai_open {
        SYSTEM_PROMPT_URL
    } else {
        SYSTEM_PROMPT_ASSISTANT
    };

    match GeminiChat::new(key, &config.model, prompt, config.history_window) {
        Ok(chat) => {
            dispatcher.connect_chat(Arc::new(chat)).await;
            tracing::info!("Gemini conectado com sucesso.");
        }
        Err(err) => {
            tracing::warn!("erro ao inicializar o Gemini: {}. IA desativada.", err);
        }
    }
}
