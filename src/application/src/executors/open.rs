//! URL resolution and the open fallback chains.
//!
//! Opening runs on a background task tracked by the session state, so
//! the dispatcher never blocks waiting for a browser window. The chain
//! is: automation launch (closing any prior session first), then the
//! well-known browser binaries, then the generic OS open call.

use std::sync::Arc;

use domain::entities::ActionResult;
use domain::services::{BrowserLauncher, SystemControl, UrlOpener};

use crate::state::SessionState;

pub const URL_PREFIXES: &[&str] = &["http://", "https://"];

/// Well-known services resolved to canonical URLs before the generic rules.
const KNOWN_SITES: &[(&str, &str)] = &[
    ("youtube", "https://youtube.com"),
    ("globo", "https://ge.globo.com"),
    ("whatsapp", "https://web.whatsapp.com"),
    ("google", "https://www.google.com"),
];

/// Fixed system utilities launched by direct command before any fuzzy
/// application lookup.
const SYSTEM_UTILITIES: &[(&str, &str, &str)] = &[
    ("terminal", "x-terminal-emulator", "Terminal aberto."),
    ("prompt", "x-terminal-emulator", "Terminal aberto."),
    ("config", "gnome-control-center", "Configurações abertas."),
    ("calculadora", "gnome-calculator", "Abrindo a Calculadora."),
    ("bloco de notas", "gedit", "Abrindo o Bloco de Notas."),
];

const MSG_AI_OFFLINE: &str = "A IA não está conectada. Verifique sua chave de API.";
const MSG_AI_ERROR: &str = "Houve um erro de comunicação com a IA ao buscar o site.";
const MSG_UNKNOWN_OPEN: &str = "Desculpe, não sei como abrir isso.";

pub struct OpenDeps {
    pub launcher: Arc<dyn BrowserLauncher>,
    pub opener: Arc<dyn UrlOpener>,
}

/// Map a candidate to an openable URL.
pub fn resolve(candidate: &str) -> String {
    let candidate = candidate.trim();

    for (name, url) in KNOWN_SITES {
        if candidate.contains(name) {
            return (*url).to_string();
        }
    }

    let lower = candidate.to_lowercase();
    if URL_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return candidate.to_string();
    }

    if candidate.contains('.') || lower.starts_with("www.") {
        return format!("https://{}", candidate);
    }

    search_url(candidate)
}

pub fn search_url(term: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(term)
    )
}

/// Dispatch the actual open on a tracked background task.
pub async fn open_url(state: &Arc<SessionState>, deps: &OpenDeps, url: &str) {
    let url = url.to_string();
    let state_task = Arc::clone(state);
    let launcher = Arc::clone(&deps.launcher);
    let opener = Arc::clone(&deps.opener);

    let task = tokio::spawn(async move {
        state_task.close_browser().await;

        match launcher.launch(&url).await {
            Ok(handle) => {
                state_task.install_browser(handle).await;
                tracing::info!("navegador de automação aberto em {}", url);
                return;
            }
            Err(err) => {
                tracing::warn!("automação indisponível ({}), usando navegador nativo", err);
            }
        }

        if opener.open_with_known_browsers(&url).await.is_ok() {
            return;
        }
        if let Err(err) = opener.open_with_default(&url).await {
            tracing::error!(
                "não foi possível abrir a URL em nenhum navegador: {}",
                err
            );
        }
    });

    state.track_open_task(task).await;
}

pub async fn site_search(state: &Arc<SessionState>, deps: &OpenDeps, term: &str) -> ActionResult {
    let url = search_url(term);
    open_url(state, deps, &url).await;
    ActionResult::spoken(format!("Pesquisando '{}' no Google...", term))
}

pub async fn open_site(state: &Arc<SessionState>, deps: &OpenDeps, term: &str) -> ActionResult {
    if term.trim().is_empty() {
        return ActionResult::spoken(MSG_UNKNOWN_OPEN);
    }
    let url = resolve(term);
    open_url(state, deps, &url).await;
    ActionResult::spoken(format!("Acessando {}", term.trim()))
}

/// App launch first; a miss falls back to opening the same text as a
/// site. The order is user-visible.
pub async fn open_app_or_site(
    state: &Arc<SessionState>,
    deps: &OpenDeps,
    system: &dyn SystemControl,
    candidate: &str,
) -> ActionResult {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return ActionResult::spoken(MSG_UNKNOWN_OPEN);
    }

    for (keyword, program, confirmation) in SYSTEM_UTILITIES {
        if candidate.contains(keyword) {
            return match system.launch_command(program, &[]).await {
                Ok(()) => ActionResult::spoken(*confirmation),
                Err(err) => {
                    tracing::error!("falha ao abrir {}: {}", program, err);
                    ActionResult::spoken(MSG_UNKNOWN_OPEN)
                }
            };
        }
    }

    match system.launch_by_name(candidate).await {
        Ok(true) => ActionResult::spoken(format!("Abrindo {}...", candidate)),
        Ok(false) => open_site(state, deps, candidate).await,
        Err(err) => {
            tracing::warn!("busca de aplicativo falhou ({}), tentando site", err);
            open_site(state, deps, candidate).await
        }
    }
}

/// GUI-variant open: the language model resolves the URL.
pub async fn ai_open(state: &Arc<SessionState>, deps: &OpenDeps, utterance: &str) -> ActionResult {
    let Some(model) = state.chat().await else {
        return ActionResult::spoken(MSG_AI_OFFLINE);
    };

    match model.send(utterance).await {
        Ok(reply) => {
            let candidate = reply.trim().to_string();
            let lower = candidate.to_lowercase();
            if URL_PREFIXES.iter().any(|p| lower.starts_with(p)) || candidate.contains('.') {
                let url = resolve(&candidate);
                open_url(state, deps, &url).await;
                ActionResult::spoken(format!("Tentando abrir: {}", url))
            } else {
                // the model asked for more information
                ActionResult::spoken(candidate)
            }
        }
        Err(err) => {
            tracing::error!("erro do modelo ao buscar URL: {}", err);
            ActionResult::spoken(MSG_AI_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_services_short_circuit() {
        assert_eq!(resolve("youtube"), "https://youtube.com");
        assert_eq!(resolve("whatsapp"), "https://web.whatsapp.com");
        assert_eq!(resolve("o canal da globo"), "https://ge.globo.com");
    }

    #[test]
    fn scheme_prefixed_candidates_pass_through() {
        assert_eq!(
            resolve("https://minhafaculdade.com/portal"),
            "https://minhafaculdade.com/portal"
        );
    }

    #[test]
    fn bare_domains_gain_the_secure_scheme() {
        assert_eq!(resolve("minhafaculdade.com"), "https://minhafaculdade.com");
        assert_eq!(resolve("www.wikipedia"), "https://www.wikipedia");
    }

    #[test]
    fn plain_phrases_become_search_queries() {
        let url = resolve("receitas de bolo");
        assert_eq!(
            url,
            "https://www.google.com/search?q=receitas%20de%20bolo"
        );
    }
}
