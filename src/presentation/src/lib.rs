pub mod repl;
pub mod voice_loop;
pub mod web;
