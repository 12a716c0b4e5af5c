//! Environment-driven configuration. A `.env` file is honored when
//! present; every value has a working default so the assistant starts
//! with nothing configured (the language model stays disconnected until
//! a key shows up, possibly pasted in at runtime).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub port: u16,
    /// GUI-variant behavior: resolve "abra ..." through the model.
    pub ai_open: bool,
    pub brief_replies: bool,
    pub webdriver_url: String,
    pub vosk_model: PathBuf,
    pub piper_bin: PathBuf,
    pub piper_model: PathBuf,
    pub screenshot_path: PathBuf,
    pub listen_timeout: Duration,
    pub max_phrase: Duration,
    /// Chat history window, in (user, model) turn pairs.
    pub history_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            port: 5000,
            ai_open: false,
            brief_replies: true,
            webdriver_url: "http://localhost:9515".to_string(),
            vosk_model: PathBuf::from("models/vosk-model-small-pt-0.3"),
            piper_bin: PathBuf::from("piper"),
            piper_model: PathBuf::from("models/pt_BR-faber-medium.onnx"),
            screenshot_path: PathBuf::from("static/print_last.png"),
            listen_timeout: Duration::from_secs(7),
            max_phrase: Duration::from_secs(15),
            history_window: 32,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(key) = env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                config.api_key = Some(key.trim().to_string());
            }
        }
        if let Ok(model) = env::var("ISA_MODEL") {
            config.model = model;
        }
        if let Some(port) = env_parse("ISA_PORT") {
            config.port = port;
        }
        if let Some(flag) = env::var("ISA_AI_OPEN").ok().as_deref().map(parse_flag) {
            config.ai_open = flag;
        }
        if let Some(flag) = env::var("ISA_BRIEF_REPLIES").ok().as_deref().map(parse_flag) {
            config.brief_replies = flag;
        }
        if let Ok(url) = env::var("ISA_WEBDRIVER_URL") {
            config.webdriver_url = url;
        }
        if let Ok(path) = env::var("ISA_VOSK_MODEL") {
            config.vosk_model = PathBuf::from(path);
        }
        if let Ok(path) = env::var("ISA_PIPER_BIN") {
            config.piper_bin = PathBuf::from(path);
        }
        if let Ok(path) = env::var("ISA_PIPER_MODEL") {
            config.piper_model = PathBuf::from(path);
        }
        if let Ok(path) = env::var("ISA_SCREENSHOT_PATH") {
            config.screenshot_path = PathBuf::from(path);
        }
        if let Some(secs) = env_parse("ISA_LISTEN_TIMEOUT") {
            config.listen_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse("ISA_MAX_PHRASE") {
            config.max_phrase = Duration::from_secs(secs);
        }
        if let Some(window) = env_parse("ISA_HISTORY_WINDOW") {
            config.history_window = window;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "sim" | "on"
    )
}
