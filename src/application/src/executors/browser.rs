//! Actions against the live browser-automation session.

use domain::entities::{ActionResult, BrowserCommand};

use crate::state::SessionState;

pub const MSG_NOTHING_OPEN: &str =
    "Nenhum site está aberto ou o navegador não foi inicializado. Use 'abra o site...' primeiro.";
const MSG_CLOSING: &str = "Fechando o navegador.";
const MSG_UNKNOWN: &str =
    "Comando de interação no site não reconhecido. Tente 'rolar para baixo' ou 'pesquisar por [termo]'.";
const MSG_ASK_TERM: &str = "Por qual termo você gostaria de pesquisar?";
const MSG_SEARCH_DONE: &str = "Pesquisa no site executada.";
const MSG_NO_SEARCH_BAR: &str =
    "Não consegui encontrar uma barra de pesquisa padrão nesta página.";
const MSG_INTERACTION_ERROR: &str = "Erro durante a interação com o site.";

/// Best-guess search inputs, tried in priority order.
const SEARCH_SELECTORS: &[&str] = &[
    r#"input[type="text"][name*="q"]"#,
    r#"input[type="search"]"#,
    r#"input[id*="search"]"#,
    r#"input[class*="search"]"#,
];

pub async fn run(state: &SessionState, command: BrowserCommand, scroll_step: i64) -> ActionResult {
    let mut guard = state.browser.lock().await;

    if guard.is_none() {
        return ActionResult::spoken(MSG_NOTHING_OPEN);
    }

    if command == BrowserCommand::Close {
        if let Some(mut handle) = guard.take() {
            handle.close().await;
        }
        return ActionResult::spoken(MSG_CLOSING);
    }

    let Some(handle) = guard.as_mut() else {
        return ActionResult::spoken(MSG_NOTHING_OPEN);
    };

    match command {
        BrowserCommand::ScrollDown => {
            let script = format!("window.scrollBy(0, {});", scroll_step);
            match handle.run_script(&script).await {
                Ok(()) => ActionResult::spoken("Rolando a página para baixo."),
                Err(err) => interaction_error(err),
            }
        }
        BrowserCommand::ScrollUp => {
            let script = format!("window.scrollBy(0, -{});", scroll_step);
            match handle.run_script(&script).await {
                Ok(()) => ActionResult::spoken("Rolando a página para cima."),
                Err(err) => interaction_error(err),
            }
        }
        BrowserCommand::SearchInPage { term } => {
            let term = term.trim();
            if term.is_empty() {
                return ActionResult::spoken(MSG_ASK_TERM);
            }
            match handle.submit_search(SEARCH_SELECTORS, term).await {
                Ok(true) => ActionResult::spoken(MSG_SEARCH_DONE),
                Ok(false) => ActionResult::spoken(MSG_NO_SEARCH_BAR),
                Err(err) => interaction_error(err),
            }
        }
        BrowserCommand::Unknown => ActionResult::spoken(MSG_UNKNOWN),
        BrowserCommand::Close => ActionResult::spoken(MSG_CLOSING),
    }
}

fn interaction_error(err: shared::Error) -> ActionResult {
    tracing::error!("erro na interação com o site: {}", err);
    ActionResult::spoken(MSG_INTERACTION_ERROR)
}
