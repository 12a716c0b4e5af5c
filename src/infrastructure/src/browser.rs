//! WebDriver-backed browser automation. Connecting assumes a running
//! chromedriver-compatible server; failures surface as `Error::Browser`
//! so the open executor can fall through to a native browser.

use async_trait::async_trait;
use domain::services::{BrowserControl, BrowserLauncher};
use shared::error::{Error, Result};
use thirtyfour::prelude::*;
use thirtyfour::Key;

pub struct WebDriverLauncher {
    server_url: String,
}

impl WebDriverLauncher {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self, url: &str) -> Result<Box<dyn BrowserControl>> {
        let caps = DesiredCapabilities::chrome();
        let driver = WebDriver::new(&self.server_url, caps)
            .await
            .map_err(|e| Error::Browser(format!("driver indisponível: {}", e)))?;

        if let Err(err) = driver.maximize_window().await {
            tracing::debug!("não foi possível maximizar a janela: {}", err);
        }

        if let Err(err) = driver.goto(url).await {
            let _ = driver.quit().await;
            return Err(Error::Browser(format!("falha ao navegar: {}", err)));
        }

        tracing::info!("sessão de automação aberta em {}", url);
        Ok(Box::new(WebDriverSession {
            driver: Some(driver),
        }))
    }
}

pub struct WebDriverSession {
    driver: Option<WebDriver>,
}

impl WebDriverSession {
    fn driver(&self) -> Result<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| Error::Browser("sessão já encerrada".to_string()))
    }
}

#[async_trait]
impl BrowserControl for WebDriverSession {
    async fn run_script(&self, script: &str) -> Result<()> {
        self.driver()?
            .execute(script, Vec::new())
            .await
            .map(|_| ())
            .map_err(|e| Error::Browser(format!("falha ao executar script: {}", e)))
    }

    async fn submit_search(&self, selectors: &[&str], term: &str) -> Result<bool> {
        let driver = self.driver()?;

        for selector in selectors {
            let Ok(element) = driver.find(By::Css(*selector)).await else {
                continue;
            };
            element
                .send_keys(term)
                .await
                .map_err(|e| Error::Browser(format!("falha ao digitar o termo: {}", e)))?;
            element
                .send_keys(Key::Enter + "")
                .await
                .map_err(|e| Error::Browser(format!("falha ao submeter a pesquisa: {}", e)))?;
            return Ok(true);
        }

        Ok(false)
    }

    async fn close(&mut self) {
        if let Some(driver) = self.driver.take() {
            if let Err(err) = driver.quit().await {
                tracing::debug!("erro ao encerrar a sessão do navegador: {}", err);
            }
        }
    }
}
