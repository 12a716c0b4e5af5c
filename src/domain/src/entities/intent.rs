use serde::{Deserialize, Serialize};

/// The classified purpose of one utterance. Derived fresh from each
/// request by the ordered rule table; carries any extracted argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Interaction with the live browser session.
    Browser(BrowserCommand),
    /// Search-engine query built from the utterance.
    SiteSearch { term: String },
    /// Delegate URL resolution to the language model (GUI variant only).
    AiOpen,
    /// Try an installed application first, then fall back to a site.
    OpenAppOrSite { candidate: String },
    /// Explicit site open ("acesse ...").
    OpenSite { term: String },
    /// `None` means the utterance mentioned volume without a direction:
    /// the intent is inert and produces an empty result.
    Volume(Option<VolumeAction>),
    Brightness(Option<BrightnessDirection>),
    Screenshot,
    Quit,
    /// Fallback: forward to the language model when one is connected.
    Chat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowserCommand {
    ScrollDown,
    ScrollUp,
    Close,
    SearchInPage { term: String },
    /// A browser keyword matched but no sub-action did; the executor
    /// answers with a usage hint.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeAction {
    Up,
    Down,
    Mute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrightnessDirection {
    Up,
    Down,
}
