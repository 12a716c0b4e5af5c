//! Service traits for the capabilities the assistant consumes. Speech
//! recognition, TTS, browser automation and language-model inference are
//! external collaborators; the dispatcher only sees these seams.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use shared::error::{ListenError, Result};

use crate::entities::VolumeAction;

/// One live browser-automation session. At most one exists at a time;
/// the session state enforces that invariant.
#[async_trait]
pub trait BrowserControl: Send + Sync {
    /// Run a script in the page context.
    async fn run_script(&self, script: &str) -> Result<()>;

    /// Try each CSS selector in order, type `term` into the first match
    /// and submit. Returns `false` when no selector matched anything.
    async fn submit_search(&self, selectors: &[&str], term: &str) -> Result<bool>;

    /// Release the session. Idempotent; errors are swallowed and logged.
    async fn close(&mut self);
}

/// Opens a URL in a fresh automation session.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, url: &str) -> Result<Box<dyn BrowserControl>>;
}

/// Native fallbacks for opening a URL when automation is unavailable.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    /// Shell out to a short list of well-known browser binaries.
    async fn open_with_known_browsers(&self, url: &str) -> Result<()>;

    /// Generic OS "open this URL" call.
    async fn open_with_default(&self, url: &str) -> Result<()>;
}

/// OS utilities consumed by the system executor.
#[async_trait]
pub trait SystemControl: Send + Sync {
    async fn volume(&self, action: VolumeAction) -> Result<()>;

    /// Current screen brightness in percent.
    async fn brightness(&self) -> Result<u32>;

    async fn set_brightness(&self, percent: u32) -> Result<()>;

    /// Capture the full screen to `path`, overwriting any prior file.
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Launch a fixed system command, detached.
    async fn launch_command(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Fuzzy-launch an installed application. `Ok(false)` means nothing
    /// matched, so the caller may retry the text as a site open.
    async fn launch_by_name(&self, name: &str) -> Result<bool>;
}

/// A connected language-model chat session. The implementation owns the
/// conversation history.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn send(&self, text: &str) -> Result<String>;
}

/// Blocking microphone capture plus recognition.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    async fn listen(
        &self,
        timeout: Duration,
        max_phrase: Duration,
    ) -> std::result::Result<String, ListenError>;
}

/// Synchronous speech synthesis and playback of one utterance.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}
