//! Process-lifetime session state. One explicit struct owned by the
//! dispatcher instead of globals, with locks so concurrent front-end
//! requests stay safe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use domain::services::{BrowserControl, LanguageModel};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct SessionState {
    /// At most one live automation session. Installing a new handle
    /// closes the previous one first.
    pub(crate) browser: Mutex<Option<Box<dyn BrowserControl>>>,
    chat: Mutex<Option<Arc<dyn LanguageModel>>>,
    /// Last background URL-open task, kept so callers can await it.
    open_task: Mutex<Option<JoinHandle<()>>>,
    shutdown: AtomicBool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn browser_is_open(&self) -> bool {
        self.browser.lock().await.is_some()
    }

    pub async fn install_browser(&self, handle: Box<dyn BrowserControl>) {
        let mut guard = self.browser.lock().await;
        if let Some(mut previous) = guard.take() {
            previous.close().await;
        }
        *guard = Some(handle);
    }

    /// Release the current session if any. Calling with no session is a
    /// no-op, not an error.
    pub async fn close_browser(&self) {
        let mut guard = self.browser.lock().await;
        if let Some(mut handle) = guard.take() {
            handle.close().await;
        }
    }

    pub async fn chat(&self) -> Option<Arc<dyn LanguageModel>> {
        self.chat.lock().await.clone()
    }

    pub async fn set_chat(&self, model: Arc<dyn LanguageModel>) {
        *self.chat.lock().await = Some(model);
    }

    pub async fn chat_connected(&self) -> bool {
        self.chat.lock().await.is_some()
    }

    pub(crate) async fn track_open_task(&self, task: JoinHandle<()>) {
        *self.open_task.lock().await = Some(task);
    }

    /// Await the most recent background open, if one is still tracked.
    pub async fn await_pending_open(&self) {
        let task = self.open_task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}
