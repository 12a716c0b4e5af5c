//! Native URL opening, used when automation is unavailable.

use std::process::Stdio;

use async_trait::async_trait;
use domain::services::UrlOpener;
use shared::error::{Error, Result};
use tokio::process::Command;

const KNOWN_BROWSERS: &[&str] = &["google-chrome", "firefox"];

pub struct ShellUrlOpener;

impl ShellUrlOpener {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellUrlOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlOpener for ShellUrlOpener {
    async fn open_with_known_browsers(&self, url: &str) -> Result<()> {
        for browser in KNOWN_BROWSERS {
            match Command::new(browser)
                .arg(url)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(_child) => {
                    tracing::info!("abrindo {} com {}", url, browser);
                    return Ok(());
                }
                Err(err) => {
                    tracing::debug!("{} indisponível: {}", browser, err);
                }
            }
        }
        Err(Error::System(
            "nenhum navegador conhecido disponível".to_string(),
        ))
    }

    async fn open_with_default(&self, url: &str) -> Result<()> {
        Command::new("xdg-open")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| tracing::info!("abrindo {} com o navegador padrão", url))
            .map_err(|e| Error::System(format!("falha no xdg-open: {}", e)))
    }
}
