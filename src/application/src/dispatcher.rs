//! Entry point of the command pipeline: normalize, classify against the
//! ordered rule table, run the matching executor, deliver the result to
//! the log and the speech queue.

use std::path::PathBuf;
use std::sync::Arc;

use domain::entities::{ActionResult, Intent, Utterance};
use domain::services::{BrowserLauncher, LanguageModel, SystemControl, UrlOpener};

use crate::executors::open::OpenDeps;
use crate::executors::{browser, chat, open, system};
use crate::rules::{classify, RuleContext};
use crate::speech::SpeechQueue;
use crate::state::SessionState;

const MSG_FAREWELL: &str =
    "Encerrando a aplicação e fechando o navegador, se estiver aberto. Até logo!";

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// GUI-variant behavior: let the model resolve "abra ..." URLs.
    pub ai_open: bool,
    /// Wrap chat prompts in the one-short-sentence template.
    pub brief_replies: bool,
    /// Replies at or above this many characters are not vocalized.
    pub speak_limit: usize,
    pub scroll_step: i64,
    pub screenshot_path: PathBuf,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            ai_open: false,
            brief_replies: true,
            speak_limit: 200,
            scroll_step: 800,
            screenshot_path: PathBuf::from("static/print_last.png"),
        }
    }
}

/// What the front end gets back from one dispatched utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleOutcome {
    pub display_text: String,
    pub was_spoken: bool,
}

pub struct Dispatcher {
    state: Arc<SessionState>,
    settings: DispatchSettings,
    deps: OpenDeps,
    system: Arc<dyn SystemControl>,
    speech: Option<SpeechQueue>,
}

impl Dispatcher {
    pub fn new(
        settings: DispatchSettings,
        launcher: Arc<dyn BrowserLauncher>,
        opener: Arc<dyn UrlOpener>,
        system: Arc<dyn SystemControl>,
        speech: Option<SpeechQueue>,
    ) -> Self {
        Self {
            state: Arc::new(SessionState::new()),
            settings,
            deps: OpenDeps { launcher, opener },
            system,
            speech,
        }
    }

    pub fn state(&self) -> Arc<SessionState> {
        Arc::clone(&self.state)
    }

    pub async fn connect_chat(&self, model: Arc<dyn LanguageModel>) {
        self.state.set_chat(model).await;
    }

    pub async fn chat_connected(&self) -> bool {
        self.state.chat_connected().await
    }

    pub fn shutdown_requested(&self) -> bool {
        self.state.shutdown_requested()
    }

    /// Await the last background URL open, mainly for tests and
    /// orderly shutdown.
    pub async fn await_pending_open(&self) {
        self.state.await_pending_open().await;
    }

    /// Log and vocalize a system-initiated message (greeting, status).
    pub fn announce(&self, text: &str) {
        tracing::info!("Assistente: {}", text);
        if let Some(queue) = &self.speech {
            queue.enqueue(text);
        }
    }

    /// Dispatch one utterance end to end.
    pub async fn handle(&self, raw: &str) -> HandleOutcome {
        let utterance = Utterance::new(raw);
        if utterance.is_empty() {
            return HandleOutcome {
                display_text: String::new(),
                was_spoken: false,
            };
        }

        tracing::info!("Comando: {}", utterance.text);

        let ctx = RuleContext {
            browser_open: self.state.browser_is_open().await,
            ai_open: self.settings.ai_open,
        };
        let intent = classify(&utterance.text, &ctx);
        tracing::debug!(?intent, "comando classificado");

        let result = self.execute(intent, &utterance).await;
        self.sink(result)
    }

    async fn execute(&self, intent: Intent, utterance: &Utterance) -> ActionResult {
        match intent {
            Intent::Browser(command) => {
                browser::run(&self.state, command, self.settings.scroll_step).await
            }
            Intent::SiteSearch { term } => {
                open::site_search(&self.state, &self.deps, &term).await
            }
            Intent::AiOpen => open::ai_open(&self.state, &self.deps, &utterance.text).await,
            Intent::OpenAppOrSite { candidate } => {
                open::open_app_or_site(&self.state, &self.deps, self.system.as_ref(), &candidate)
                    .await
            }
            Intent::OpenSite { term } => open::open_site(&self.state, &self.deps, &term).await,
            Intent::Volume(action) => system::volume(self.system.as_ref(), action).await,
            Intent::Brightness(direction) => {
                system::brightness(self.system.as_ref(), direction).await
            }
            Intent::Screenshot => {
                system::screenshot(self.system.as_ref(), &self.settings.screenshot_path).await
            }
            Intent::Quit => self.quit().await,
            Intent::Chat => {
                chat::ask(&self.state, &utterance.text, self.settings.brief_replies).await
            }
        }
    }

    async fn quit(&self) -> ActionResult {
        self.state.close_browser().await;
        self.state.request_shutdown();
        ActionResult::spoken(MSG_FAREWELL)
    }

    fn sink(&self, result: ActionResult) -> HandleOutcome {
        if !result.is_empty() {
            tracing::info!("Assistente: {}", result.display_text);
        }

        let mut was_spoken = false;
        if result.speak
            && !result.is_empty()
            && result.display_text.chars().count() < self.settings.speak_limit
        {
            if let Some(queue) = &self.speech {
                was_spoken = queue.enqueue(result.display_text.replace('*', ""));
            }
        }

        HandleOutcome {
            display_text: result.display_text,
            was_spoken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::entities::VolumeAction;
    use domain::services::{BrowserControl, SpeechOutput};
    use shared::error::{Error, Result};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct MockBrowser {
        scripts: Arc<Mutex<Vec<String>>>,
        closed: Arc<AtomicUsize>,
        has_search_bar: bool,
    }

    #[async_trait]
    impl BrowserControl for MockBrowser {
        async fn run_script(&self, script: &str) -> Result<()> {
            self.scripts.lock().unwrap().push(script.to_string());
            Ok(())
        }

        async fn submit_search(&self, _selectors: &[&str], _term: &str) -> Result<bool> {
            Ok(self.has_search_bar)
        }

        async fn close(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct MockLauncher {
        should_fail: bool,
        launched: Arc<Mutex<Vec<String>>>,
        closed: Arc<AtomicUsize>,
        scripts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl BrowserLauncher for MockLauncher {
        async fn launch(&self, url: &str) -> Result<Box<dyn BrowserControl>> {
            if self.should_fail {
                return Err(Error::Browser("driver ausente".to_string()));
            }
            self.launched.lock().unwrap().push(url.to_string());
            Ok(Box::new(MockBrowser {
                scripts: Arc::clone(&self.scripts),
                closed: Arc::clone(&self.closed),
                has_search_bar: true,
            }))
        }
    }

    struct MockOpener {
        native: Arc<Mutex<Vec<String>>>,
        fail_known_browsers: bool,
    }

    #[async_trait]
    impl UrlOpener for MockOpener {
        async fn open_with_known_browsers(&self, url: &str) -> Result<()> {
            if self.fail_known_browsers {
                return Err(Error::System("sem navegadores".to_string()));
            }
            self.native.lock().unwrap().push(format!("browser:{}", url));
            Ok(())
        }

        async fn open_with_default(&self, url: &str) -> Result<()> {
            self.native.lock().unwrap().push(format!("default:{}", url));
            Ok(())
        }
    }

    struct MockSystem {
        events: Arc<Mutex<Vec<String>>>,
        brightness: Arc<Mutex<u32>>,
        knows_apps: bool,
    }

    #[async_trait]
    impl SystemControl for MockSystem {
        async fn volume(&self, action: VolumeAction) -> Result<()> {
            self.events.lock().unwrap().push(format!("volume:{:?}", action));
            Ok(())
        }

        async fn brightness(&self) -> Result<u32> {
            Ok(*self.brightness.lock().unwrap())
        }

        async fn set_brightness(&self, percent: u32) -> Result<()> {
            *self.brightness.lock().unwrap() = percent;
            self.events
                .lock()
                .unwrap()
                .push(format!("brightness:{}", percent));
            Ok(())
        }

        async fn screenshot(&self, path: &Path) -> Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("screenshot:{}", path.display()));
            Ok(())
        }

        async fn launch_command(&self, program: &str, _args: &[&str]) -> Result<()> {
            self.events.lock().unwrap().push(format!("cmd:{}", program));
            Ok(())
        }

        async fn launch_by_name(&self, name: &str) -> Result<bool> {
            self.events.lock().unwrap().push(format!("fuzzy:{}", name));
            Ok(self.knows_apps)
        }
    }

    struct MockModel {
        reply: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LanguageModel for MockModel {
        async fn send(&self, _text: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct Harness {
        dispatcher: Dispatcher,
        launched: Arc<Mutex<Vec<String>>>,
        native: Arc<Mutex<Vec<String>>>,
        events: Arc<Mutex<Vec<String>>>,
        brightness: Arc<Mutex<u32>>,
        closed: Arc<AtomicUsize>,
    }

    fn harness(settings: DispatchSettings, launcher_fails: bool, knows_apps: bool) -> Harness {
        let launched = Arc::new(Mutex::new(Vec::new()));
        let native = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let brightness = Arc::new(Mutex::new(50));
        let closed = Arc::new(AtomicUsize::new(0));
        let scripts = Arc::new(Mutex::new(Vec::new()));

        let dispatcher = Dispatcher::new(
            settings,
            Arc::new(MockLauncher {
                should_fail: launcher_fails,
                launched: Arc::clone(&launched),
                closed: Arc::clone(&closed),
                scripts,
            }),
            Arc::new(MockOpener {
                native: Arc::clone(&native),
                fail_known_browsers: false,
            }),
            Arc::new(MockSystem {
                events: Arc::clone(&events),
                brightness: Arc::clone(&brightness),
                knows_apps,
            }),
            None,
        );

        Harness {
            dispatcher,
            launched,
            native,
            events,
            brightness,
            closed,
        }
    }

    #[tokio::test]
    async fn opening_twice_keeps_at_most_one_handle() {
        let h = harness(DispatchSettings::default(), false, false);

        h.dispatcher.handle("acesse youtube").await;
        h.dispatcher.await_pending_open().await;
        assert!(h.dispatcher.state().browser_is_open().await);
        assert_eq!(h.closed.load(Ordering::SeqCst), 0);

        h.dispatcher.handle("acesse o site da globo").await;
        h.dispatcher.await_pending_open().await;
        assert!(h.dispatcher.state().browser_is_open().await);
        // the first session was released when the second opened
        assert_eq!(h.closed.load(Ordering::SeqCst), 1);
        assert_eq!(
            *h.launched.lock().unwrap(),
            vec!["https://youtube.com", "https://ge.globo.com"]
        );
    }

    #[tokio::test]
    async fn closing_without_a_session_is_a_no_op() {
        let h = harness(DispatchSettings::default(), false, false);
        let state = h.dispatcher.state();
        state.close_browser().await;
        state.close_browser().await;
        assert_eq!(h.closed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn in_page_search_needs_an_open_session() {
        let h = harness(DispatchSettings::default(), false, false);

        // no session: the same text falls through to the offline chat
        let outcome = h.dispatcher.handle("pesquisar por gatos").await;
        assert_eq!(outcome.display_text, crate::executors::chat::MSG_OFFLINE);

        h.dispatcher.handle("acesse youtube").await;
        h.dispatcher.await_pending_open().await;

        let outcome = h.dispatcher.handle("pesquisar por gatos").await;
        assert_eq!(outcome.display_text, "Pesquisa no site executada.");
    }

    #[tokio::test]
    async fn scroll_commands_reach_the_page() {
        let h = harness(DispatchSettings::default(), false, false);
        let scripts = Arc::new(Mutex::new(Vec::new()));
        h.dispatcher
            .state()
            .install_browser(Box::new(MockBrowser {
                scripts: Arc::clone(&scripts),
                closed: Arc::clone(&h.closed),
                has_search_bar: false,
            }))
            .await;

        h.dispatcher.handle("rolar para baixo").await;
        h.dispatcher.handle("pode subir").await;

        assert_eq!(
            *scripts.lock().unwrap(),
            vec!["window.scrollBy(0, 800);", "window.scrollBy(0, -800);"]
        );
    }

    #[tokio::test]
    async fn notepad_launch_never_falls_through_to_a_site() {
        let h = harness(DispatchSettings::default(), false, false);

        let outcome = h.dispatcher.handle("abra o bloco de notas").await;

        assert_eq!(outcome.display_text, "Abrindo o Bloco de Notas.");
        assert_eq!(*h.events.lock().unwrap(), vec!["cmd:gedit"]);
        assert!(h.launched.lock().unwrap().is_empty());
        assert!(h.native.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_app_falls_back_to_site_open() {
        let h = harness(DispatchSettings::default(), false, false);

        let outcome = h.dispatcher.handle("abra o spotify").await;
        h.dispatcher.await_pending_open().await;

        assert_eq!(outcome.display_text, "Acessando spotify");
        assert_eq!(*h.events.lock().unwrap(), vec!["fuzzy:spotify"]);
        assert_eq!(
            *h.launched.lock().unwrap(),
            vec!["https://www.google.com/search?q=spotify"]
        );
    }

    #[tokio::test]
    async fn known_app_stops_the_fallback_chain() {
        let h = harness(DispatchSettings::default(), false, true);

        let outcome = h.dispatcher.handle("abra o spotify").await;

        assert_eq!(outcome.display_text, "Abrindo spotify...");
        assert!(h.launched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn automation_failure_uses_native_browsers() {
        let h = harness(DispatchSettings::default(), true, false);

        h.dispatcher.handle("acesse youtube").await;
        h.dispatcher.await_pending_open().await;

        assert!(!h.dispatcher.state().browser_is_open().await);
        assert_eq!(
            *h.native.lock().unwrap(),
            vec!["browser:https://youtube.com"]
        );
    }

    #[tokio::test]
    async fn offline_chat_makes_no_calls() {
        let h = harness(DispatchSettings::default(), false, false);

        let outcome = h.dispatcher.handle("qual a capital do brasil").await;

        assert_eq!(outcome.display_text, crate::executors::chat::MSG_OFFLINE);
        assert!(h.launched.lock().unwrap().is_empty());
        assert!(h.native.lock().unwrap().is_empty());
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn connected_chat_returns_the_model_reply() {
        let h = harness(DispatchSettings::default(), false, false);
        let calls = Arc::new(AtomicUsize::new(0));
        h.dispatcher
            .connect_chat(Arc::new(MockModel {
                reply: "Brasília.".to_string(),
                calls: Arc::clone(&calls),
            }))
            .await;

        let outcome = h.dispatcher.handle("qual a capital do brasil").await;

        assert_eq!(outcome.display_text, "Brasília.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn brightness_clamps_at_the_top() {
        let h = harness(DispatchSettings::default(), false, false);
        *h.brightness.lock().unwrap() = 95;

        h.dispatcher.handle("aumentar o brilho").await;
        assert_eq!(*h.brightness.lock().unwrap(), 100);

        // repeated "up" never exceeds 100
        h.dispatcher.handle("aumentar o brilho").await;
        assert_eq!(*h.brightness.lock().unwrap(), 100);
    }

    #[tokio::test]
    async fn brightness_clamps_at_the_bottom() {
        let h = harness(DispatchSettings::default(), false, false);
        *h.brightness.lock().unwrap() = 5;

        h.dispatcher.handle("diminuir o brilho").await;
        assert_eq!(*h.brightness.lock().unwrap(), 0);

        h.dispatcher.handle("diminuir o brilho").await;
        assert_eq!(*h.brightness.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn inert_volume_produces_an_empty_unspoken_result() {
        let h = harness(DispatchSettings::default(), false, false);

        let outcome = h.dispatcher.handle("volume").await;

        assert_eq!(outcome.display_text, "");
        assert!(!outcome.was_spoken);
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn volume_up_reaches_the_mixer() {
        let h = harness(DispatchSettings::default(), false, false);

        let outcome = h.dispatcher.handle("aumentar o volume").await;

        assert_eq!(outcome.display_text, "Áudio ajustado.");
        assert_eq!(*h.events.lock().unwrap(), vec!["volume:Up"]);
    }

    #[tokio::test]
    async fn screenshot_targets_the_fixed_path() {
        let dir = std::env::temp_dir().join(format!("isa-test-{}", std::process::id()));
        let path = dir.join("static/print_last.png");
        let mut settings = DispatchSettings::default();
        settings.screenshot_path = path.clone();

        let h = harness(settings, false, false);
        let outcome = h.dispatcher.handle("tira um print").await;

        assert_eq!(outcome.display_text, "Print salvo.");
        assert_eq!(
            *h.events.lock().unwrap(),
            vec![format!("screenshot:{}", path.display())]
        );
        assert!(path.parent().map(Path::exists).unwrap_or(false));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn quit_closes_the_browser_and_requests_shutdown() {
        let h = harness(DispatchSettings::default(), false, false);
        h.dispatcher.handle("acesse youtube").await;
        h.dispatcher.await_pending_open().await;

        let outcome = h.dispatcher.handle("pode sair").await;

        assert!(outcome.display_text.starts_with("Encerrando"));
        assert!(h.dispatcher.shutdown_requested());
        assert!(!h.dispatcher.state().browser_is_open().await);
        assert_eq!(h.closed.load(Ordering::SeqCst), 1);
    }

    struct RecordingVoice {
        spoken: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SpeechOutput for RecordingVoice {
        async fn speak(&self, text: &str) -> Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn short_replies_are_spoken_long_ones_are_not() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let queue = SpeechQueue::start(Arc::new(RecordingVoice {
            spoken: Arc::clone(&spoken),
        }));

        let dispatcher = Dispatcher::new(
            DispatchSettings::default(),
            Arc::new(MockLauncher {
                should_fail: true,
                launched: Arc::new(Mutex::new(Vec::new())),
                closed: Arc::new(AtomicUsize::new(0)),
                scripts: Arc::new(Mutex::new(Vec::new())),
            }),
            Arc::new(MockOpener {
                native: Arc::new(Mutex::new(Vec::new())),
                fail_known_browsers: false,
            }),
            Arc::new(MockSystem {
                events: Arc::new(Mutex::new(Vec::new())),
                brightness: Arc::new(Mutex::new(50)),
                knows_apps: false,
            }),
            Some(queue),
        );

        let calls = Arc::new(AtomicUsize::new(0));
        dispatcher
            .connect_chat(Arc::new(MockModel {
                reply: "**Olá**, tudo bem?".to_string(),
                calls: Arc::clone(&calls),
            }))
            .await;

        let outcome = dispatcher.handle("oi, tudo bem?").await;
        assert!(outcome.was_spoken);

        tokio::time::sleep(Duration::from_millis(50)).await;
        // markdown markers are stripped before vocalizing
        assert_eq!(*spoken.lock().unwrap(), vec!["Olá, tudo bem?"]);

        dispatcher
            .connect_chat(Arc::new(MockModel {
                reply: "a".repeat(250),
                calls,
            }))
            .await;
        let outcome = dispatcher.handle("me conte uma história").await;
        assert!(!outcome.was_spoken);
    }
}
