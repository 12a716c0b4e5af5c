use serde::{Deserialize, Serialize};

/// Uniform output of every executor, consumed by the response sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub display_text: String,
    pub speak: bool,
}

impl ActionResult {
    /// A reply that should also be vocalized.
    pub fn spoken(text: impl Into<String>) -> Self {
        Self {
            display_text: text.into(),
            speak: true,
        }
    }

    /// A reply that is only displayed.
    pub fn quiet(text: impl Into<String>) -> Self {
        Self {
            display_text: text.into(),
            speak: false,
        }
    }

    /// An inert outcome: nothing displayed, nothing spoken.
    pub fn silent() -> Self {
        Self {
            display_text: String::new(),
            speak: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_text.is_empty()
    }
}
