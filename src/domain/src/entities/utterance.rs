use serde::{Deserialize, Serialize};
use shared::text::normalize;

/// One user request, created per dispatch and discarded afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    pub raw: String,
    pub text: String,
}

impl Utterance {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let text = normalize(&raw);
        Self { raw, text }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utterance_keeps_raw_and_normalized_forms() {
        let u = Utterance::new("  Abra o Site  ");
        assert_eq!(u.raw, "  Abra o Site  ");
        assert_eq!(u.text, "abra o site");
        assert!(!u.is_empty());
    }
}
