//! Interactive text front end on stdin.

use std::io::Write;
use std::sync::Arc;

use application::Dispatcher;
use colored::Colorize;
use shared::error::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(dispatcher: Arc<Dispatcher>) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        if dispatcher.shutdown_requested() {
            break;
        }

        print!("{} ", "você>".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let outcome = dispatcher.handle(line).await;
        if !outcome.display_text.is_empty() {
            println!("{} {}", "isa>".cyan().bold(), outcome.display_text);
        }
    }

    Ok(())
}
