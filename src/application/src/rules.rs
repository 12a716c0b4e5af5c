//! Ordered intent rules. Classification walks the table top to bottom and
//! the first matching rule wins; the order is part of the observable
//! behavior, not an optimization.

use domain::entities::{BrightnessDirection, BrowserCommand, Intent, VolumeAction};
use shared::text::{after_phrase, contains_any, remove_words, word_count};

/// Facts about the session a rule may depend on.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub browser_open: bool,
    /// GUI-variant behavior: resolve "abra ..." through the language
    /// model. Off by default, in which case those utterances fall into
    /// the local open rule.
    pub ai_open: bool,
}

pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&str, &RuleContext) -> bool,
    pub build: fn(&str) -> Intent,
}

const BROWSER_TRIGGERS: &[&str] = &["rolar", "subir", "descer", "fechar navegador", "pesquisar por"];
const SEARCH_TRIGGERS: &[&str] = &["pesquise", "procure", "busque"];
const SEARCH_STOPWORDS: &[&str] = &[
    "pesquise", "procure", "busque", "por", "sobre", "e", "o", "a", "no", "na",
];
const OPEN_TRIGGERS: &[&str] = &["abra", "abrir"];
const SITE_WORDS: &[&str] = &["site", "página", "url"];
const QUIT_TRIGGERS: &[&str] = &["sair", "encerrar", "desligar aplicação"];

pub static RULES: &[Rule] = &[
    Rule {
        name: "browser-interaction",
        matches: matches_browser,
        build: build_browser,
    },
    Rule {
        name: "site-search",
        matches: matches_site_search,
        build: build_site_search,
    },
    Rule {
        name: "ai-open",
        matches: matches_ai_open,
        build: build_ai_open,
    },
    Rule {
        name: "open-app-or-site",
        matches: matches_open,
        build: build_open_app_or_site,
    },
    Rule {
        name: "open-site",
        matches: matches_open_site,
        build: build_open_site,
    },
    Rule {
        name: "volume",
        matches: matches_volume,
        build: build_volume,
    },
    Rule {
        name: "brightness",
        matches: matches_brightness,
        build: build_brightness,
    },
    Rule {
        name: "screenshot",
        matches: matches_screenshot,
        build: build_screenshot,
    },
    Rule {
        name: "quit",
        matches: matches_quit,
        build: build_quit,
    },
];

/// First matching rule wins; everything else falls through to chat.
pub fn classify(text: &str, ctx: &RuleContext) -> Intent {
    for rule in RULES {
        if (rule.matches)(text, ctx) {
            return (rule.build)(text);
        }
    }
    Intent::Chat
}

fn matches_browser(text: &str, ctx: &RuleContext) -> bool {
    ctx.browser_open && contains_any(text, BROWSER_TRIGGERS)
}

fn build_browser(text: &str) -> Intent {
    let command = if text.contains("fechar navegador") {
        BrowserCommand::Close
    } else if let Some(term) = after_phrase(text, "pesquisar por") {
        BrowserCommand::SearchInPage {
            term: term.to_string(),
        }
    } else if text.contains("rolar para baixo") || text.contains("descer") {
        BrowserCommand::ScrollDown
    } else if text.contains("rolar para cima") || text.contains("subir") {
        BrowserCommand::ScrollUp
    } else {
        BrowserCommand::Unknown
    };
    Intent::Browser(command)
}

fn matches_site_search(text: &str, _ctx: &RuleContext) -> bool {
    contains_any(text, SEARCH_TRIGGERS)
}

fn build_site_search(text: &str) -> Intent {
    let term = remove_words(text, SEARCH_STOPWORDS);
    let term = if term.is_empty() {
        text.to_string()
    } else {
        term
    };
    Intent::SiteSearch { term }
}

fn matches_ai_open(text: &str, ctx: &RuleContext) -> bool {
    ctx.ai_open
        && contains_any(text, OPEN_TRIGGERS)
        && (contains_any(text, SITE_WORDS) || word_count(text) <= 4)
}

fn build_ai_open(_text: &str) -> Intent {
    Intent::AiOpen
}

fn matches_open(text: &str, _ctx: &RuleContext) -> bool {
    contains_any(text, OPEN_TRIGGERS)
}

fn matches_open_site(text: &str, _ctx: &RuleContext) -> bool {
    text.contains("acesse") || text.contains("site")
}

fn matches_volume(text: &str, _ctx: &RuleContext) -> bool {
    text.contains("volume")
}

fn matches_brightness(text: &str, _ctx: &RuleContext) -> bool {
    text.contains("brilho") || text.contains("luz")
}

fn matches_screenshot(text: &str, _ctx: &RuleContext) -> bool {
    text.contains("print") || text.contains("captura")
}

fn build_screenshot(_text: &str) -> Intent {
    Intent::Screenshot
}

fn matches_quit(text: &str, _ctx: &RuleContext) -> bool {
    contains_any(text, QUIT_TRIGGERS)
}

fn build_quit(_text: &str) -> Intent {
    Intent::Quit
}

fn build_open_app_or_site(text: &str) -> Intent {
    let candidate = remove_words(text, OPEN_TRIGGERS);
    let candidate = shared::text::strip_leading_article(&candidate).to_string();
    Intent::OpenAppOrSite { candidate }
}

fn build_open_site(text: &str) -> Intent {
    let term = text.replace("o site", " ");
    let term = remove_words(&term, &["acesse", "site", "abra", "abrir"]);
    let term = shared::text::strip_leading_article(&term).to_string();
    Intent::OpenSite { term }
}

fn build_volume(text: &str) -> Intent {
    let action = if text.contains("aumentar") || text.contains("sobe") {
        Some(VolumeAction::Up)
    } else if text.contains("diminuir") || text.contains("baixa") {
        Some(VolumeAction::Down)
    } else if text.contains("mudo") {
        Some(VolumeAction::Mute)
    } else {
        None
    };
    Intent::Volume(action)
}

fn build_brightness(text: &str) -> Intent {
    let direction = if text.contains("aumentar") {
        Some(BrightnessDirection::Up)
    } else if text.contains("diminuir") {
        Some(BrightnessDirection::Down)
    } else {
        None
    };
    Intent::Brightness(direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(browser_open: bool) -> RuleContext {
        RuleContext {
            browser_open,
            ai_open: false,
        }
    }

    #[test]
    fn in_page_search_requires_an_open_browser() {
        let with_browser = classify("pesquisar por gatos", &ctx(true));
        assert_eq!(
            with_browser,
            Intent::Browser(BrowserCommand::SearchInPage {
                term: "gatos".to_string()
            })
        );

        // identical text with no session falls through every rule
        let without_browser = classify("pesquisar por gatos", &ctx(false));
        assert_eq!(without_browser, Intent::Chat);
    }

    #[test]
    fn scroll_directions_map_to_browser_commands() {
        assert_eq!(
            classify("rolar para baixo", &ctx(true)),
            Intent::Browser(BrowserCommand::ScrollDown)
        );
        assert_eq!(
            classify("pode subir a página", &ctx(true)),
            Intent::Browser(BrowserCommand::ScrollUp)
        );
        assert_eq!(
            classify("rolar", &ctx(true)),
            Intent::Browser(BrowserCommand::Unknown)
        );
    }

    #[test]
    fn site_search_strips_stopwords() {
        let intent = classify("pesquise por receitas de bolo", &ctx(false));
        assert_eq!(
            intent,
            Intent::SiteSearch {
                term: "receitas de bolo".to_string()
            }
        );
    }

    #[test]
    fn open_rule_extracts_candidate() {
        let intent = classify("abra o bloco de notas", &ctx(false));
        assert_eq!(
            intent,
            Intent::OpenAppOrSite {
                candidate: "bloco de notas".to_string()
            }
        );
    }

    #[test]
    fn ai_open_only_applies_when_enabled() {
        let enabled = RuleContext {
            browser_open: false,
            ai_open: true,
        };
        assert_eq!(classify("abra o site da globo", &enabled), Intent::AiOpen);
        assert_eq!(classify("abra youtube", &enabled), Intent::AiOpen);

        // disabled: the same text lands on the local open rule
        assert!(matches!(
            classify("abra o site da globo", &ctx(false)),
            Intent::OpenAppOrSite { .. }
        ));
    }

    #[test]
    fn ai_open_skips_long_appless_commands() {
        let enabled = RuleContext {
            browser_open: false,
            ai_open: true,
        };
        let intent = classify("abra o bloco de notas para mim agora", &enabled);
        assert!(matches!(intent, Intent::OpenAppOrSite { .. }));
    }

    #[test]
    fn acesse_routes_to_open_site() {
        let intent = classify("acesse o site da globo", &ctx(false));
        assert_eq!(
            intent,
            Intent::OpenSite {
                term: "da globo".to_string()
            }
        );
    }

    #[test]
    fn volume_subactions_and_inert_case() {
        assert_eq!(
            classify("aumentar o volume", &ctx(false)),
            Intent::Volume(Some(VolumeAction::Up))
        );
        assert_eq!(
            classify("baixa o volume", &ctx(false)),
            Intent::Volume(Some(VolumeAction::Down))
        );
        assert_eq!(
            classify("volume no mudo", &ctx(false)),
            Intent::Volume(Some(VolumeAction::Mute))
        );
        assert_eq!(classify("volume", &ctx(false)), Intent::Volume(None));
    }

    #[test]
    fn brightness_subactions_and_inert_case() {
        assert_eq!(
            classify("aumentar o brilho", &ctx(false)),
            Intent::Brightness(Some(BrightnessDirection::Up))
        );
        assert_eq!(
            classify("diminuir a luz", &ctx(false)),
            Intent::Brightness(Some(BrightnessDirection::Down))
        );
        assert_eq!(classify("brilho", &ctx(false)), Intent::Brightness(None));
    }

    #[test]
    fn screenshot_and_quit_keywords() {
        assert_eq!(classify("tira um print", &ctx(false)), Intent::Screenshot);
        assert_eq!(classify("captura de tela", &ctx(false)), Intent::Screenshot);
        assert_eq!(classify("pode sair", &ctx(false)), Intent::Quit);
        assert_eq!(classify("desligar aplicação", &ctx(false)), Intent::Quit);
    }

    #[test]
    fn unmatched_text_falls_back_to_chat() {
        assert_eq!(classify("qual a capital do brasil", &ctx(false)), Intent::Chat);
    }

    #[test]
    fn browser_rule_outranks_site_search() {
        // "pesquisar por" contains no general search trigger, but a
        // combined utterance must stay on the browser rule when a
        // session is open
        let intent = classify("pesquisar por bolos", &ctx(true));
        assert!(matches!(intent, Intent::Browser(_)));
    }
}
