pub mod dispatcher;
pub mod executors;
pub mod rules;
pub mod speech;
pub mod state;

pub use dispatcher::{DispatchSettings, Dispatcher, HandleOutcome};
pub use speech::SpeechQueue;
pub use state::SessionState;
