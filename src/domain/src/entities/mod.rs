pub mod action_result;
pub mod intent;
pub mod utterance;

pub use action_result::ActionResult;
pub use intent::{BrightnessDirection, BrowserCommand, Intent, VolumeAction};
pub use utterance::Utterance;
