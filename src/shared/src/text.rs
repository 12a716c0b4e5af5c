//! Small text helpers shared by the rule table and the executors.

use chrono::{Local, Timelike};

/// Lowercase and trim a raw utterance. Total: never fails, never panics.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Remove every whole word present in `words`, collapsing whitespace.
pub fn remove_words(text: &str, words: &[&str]) -> String {
    text.split_whitespace()
        .filter(|token| !words.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip a leading "o " or "a " article.
pub fn strip_leading_article(text: &str) -> &str {
    let trimmed = text.trim_start();
    for article in ["o ", "a "] {
        if let Some(rest) = trimmed.strip_prefix(article) {
            return rest.trim_start();
        }
    }
    trimmed
}

/// Everything after the first occurrence of `phrase`, trimmed.
pub fn after_phrase<'a>(text: &'a str, phrase: &str) -> Option<&'a str> {
    text.find(phrase)
        .map(|idx| text[idx + phrase.len()..].trim())
}

/// Time-of-day greeting, matching local convention.
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "BOM DIA",
        12..=17 => "BOA TARDE",
        _ => "BOA NOITE",
    }
}

pub fn greeting_now() -> &'static str {
    greeting_for_hour(Local::now().hour())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Abra o YouTube  "), "abra o youtube");
    }

    #[test]
    fn remove_words_filters_whole_tokens() {
        let out = remove_words("pesquise por receitas de bolo", &["pesquise", "por"]);
        assert_eq!(out, "receitas de bolo");
    }

    #[test]
    fn remove_words_does_not_touch_substrings() {
        // "porta" contains "por" but must survive whole-word filtering
        let out = remove_words("procure a porta", &["procure", "a", "por"]);
        assert_eq!(out, "porta");
    }

    #[test]
    fn leading_article_is_stripped_once() {
        assert_eq!(strip_leading_article("o bloco de notas"), "bloco de notas");
        assert_eq!(strip_leading_article("a calculadora"), "calculadora");
        assert_eq!(strip_leading_article("youtube"), "youtube");
    }

    #[test]
    fn after_phrase_returns_trimmed_tail() {
        assert_eq!(after_phrase("pesquisar por gatos", "pesquisar por"), Some("gatos"));
        assert_eq!(after_phrase("pesquisar por", "pesquisar por"), Some(""));
        assert_eq!(after_phrase("rolar para baixo", "pesquisar por"), None);
    }

    #[test]
    fn greeting_follows_day_periods() {
        assert_eq!(greeting_for_hour(5), "BOM DIA");
        assert_eq!(greeting_for_hour(11), "BOM DIA");
        assert_eq!(greeting_for_hour(12), "BOA TARDE");
        assert_eq!(greeting_for_hour(17), "BOA TARDE");
        assert_eq!(greeting_for_hour(18), "BOA NOITE");
        assert_eq!(greeting_for_hour(3), "BOA NOITE");
    }
}
