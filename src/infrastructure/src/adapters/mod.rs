pub mod microphone;
pub mod piper;
pub mod player;
pub mod voice;

pub use piper::PiperVoice;
pub use voice::VoiceListener;
