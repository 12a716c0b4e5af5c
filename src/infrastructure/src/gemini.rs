//! Gemini chat client over the REST API, modeled on the shape of the
//! other HTTP clients in this workspace: reqwest with a pooled client,
//! serde request/response types, errors mapped at the boundary.
//!
//! The client owns the conversation history. It grows per exchange and
//! is windowed to the last N turn pairs so a long-lived process does not
//! accumulate context forever.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use domain::services::LanguageModel;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};
use tokio::sync::Mutex;

pub const SYSTEM_PROMPT_ASSISTANT: &str =
    "Você é uma assistente pessoal inteligente chamada ISA. Responda sempre em português.";

/// GUI-variant prompt: the model answers open/search requests with a
/// bare URL the dispatcher can act on.
pub const SYSTEM_PROMPT_URL: &str = "Você é um assistente inteligente. Sua função principal é \
    responder a perguntas gerais. Se o usuário pedir para 'abrir um site' ou 'pesquisar algo', \
    retorne a URL COMPLETA (incluindo https://) ou o termo de busca sem qualquer texto adicional.";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct GenerateRequest {
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

pub struct GeminiChat {
    client: Client,
    endpoint: String,
    api_key: String,
    system_prompt: String,
    history: Mutex<VecDeque<Content>>,
    window: usize,
}

impl GeminiChat {
    pub fn new(api_key: &str, model: &str, system_prompt: &str, window: usize) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Configuration(
                "chave de API vazia".to_string(),
            ));
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(format!("falha ao criar cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}:generateContent", API_BASE, model),
            api_key: api_key.trim().to_string(),
            system_prompt: system_prompt.to_string(),
            history: Mutex::new(VecDeque::new()),
            window,
        })
    }

    async fn generate(&self, contents: Vec<Content>) -> Result<String> {
        let request = GenerateRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: self.system_prompt.clone(),
                }],
            },
            contents,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(format!("falha na chamada ao Gemini: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("resposta ilegível do Gemini: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Network(format!(
                "Gemini retornou {}: {}",
                status, body
            )));
        }

        extract_reply(&body)
    }
}

fn extract_reply(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)?;
    let reply = parsed
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .unwrap_or_default();

    if reply.trim().is_empty() {
        return Err(Error::Network("resposta vazia do Gemini".to_string()));
    }
    Ok(reply.trim().to_string())
}

/// Keep only the most recent `window` (user, model) pairs.
fn trim_history(history: &mut VecDeque<Content>, window: usize) {
    while history.len() > window * 2 {
        history.pop_front();
    }
}

#[async_trait]
impl LanguageModel for GeminiChat {
    async fn send(&self, text: &str) -> Result<String> {
        let mut history = self.history.lock().await;
        history.push_back(Content::user(text));
        let contents: Vec<Content> = history.iter().cloned().collect();

        match self.generate(contents).await {
            Ok(reply) => {
                history.push_back(Content::model(&reply));
                trim_history(&mut history, self.window);
                Ok(reply)
            }
            Err(err) => {
                // drop the unanswered turn so a retry does not duplicate it
                history.pop_back();
                Err(err)
            }
        }
    }
}
