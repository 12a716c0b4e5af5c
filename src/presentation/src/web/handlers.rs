//! JSON handlers for the assistant API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use infrastructure::gemini::{GeminiChat, SYSTEM_PROMPT_ASSISTANT, SYSTEM_PROMPT_URL};
use infrastructure::status;

use super::state::AppState;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<title>ISA</title>
<style>
  body { font-family: sans-serif; max-width: 640px; margin: 2rem auto; }
  #log { border: 1px solid #ccc; height: 320px; overflow-y: auto; padding: .5rem; }
  #log p { margin: .25rem 0; }
  .isa { color: #06659d; }
  form { display: flex; gap: .5rem; margin-top: .5rem; }
  input { flex: 1; padding: .4rem; }
</style>
</head>
<body>
<h1>ISA</h1>
<div id="status"></div>
<div id="log"></div>
<form id="form">
  <input id="msg" placeholder="Digite um comando..." autocomplete="off">
  <button type="submit">Enviar</button>
  <button type="button" id="mic">🎤</button>
</form>
<script>
const log = (who, text) => {
  const p = document.createElement('p');
  p.innerHTML = `<b class="${who === 'ISA' ? 'isa' : ''}">${who}:</b> ${text}`;
  document.getElementById('log').appendChild(p);
  p.scrollIntoView();
};
const send = async (msg) => {
  log('Você', msg);
  const res = await fetch('/api/chat', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({msg})
  });
  const data = await res.json();
  if (data.response) log('ISA', data.response);
};
document.getElementById('form').addEventListener('submit', (e) => {
  e.preventDefault();
  const input = document.getElementById('msg');
  if (input.value.trim()) send(input.value.trim());
  input.value = '';
});
document.getElementById('mic').addEventListener('click', async () => {
  log('ISA', 'Escutando...');
  const res = await fetch('/api/listen', {method: 'POST'});
  const data = await res.json();
  if (data.success) send(data.text);
  else log('ISA', 'Não consegui te ouvir. Pode repetir?');
});
setInterval(async () => {
  const res = await fetch('/api/status');
  const s = await res.json();
  document.getElementById('status').textContent =
    `CPU ${s.cpu.toFixed(0)}% · RAM ${s.ram.toFixed(0)}% · Bateria ${s.bat}%`;
}, 3000);
</script>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn status() -> Json<status::SystemStatus> {
    Json(status::read().await)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub msg: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let outcome = state.dispatcher.handle(&request.msg).await;
    Json(ChatResponse {
        response: outcome.display_text,
    })
}

pub async fn listen(State(state): State<AppState>) -> Json<Value> {
    let Some(listener) = state.listener.clone() else {
        return Json(json!({ "success": false, "error": "microfone indisponível" }));
    };

    let (timeout, max_phrase) = {
        let config = state.config.read().await;
        (config.listen_timeout, config.max_phrase)
    };

    match listener.listen(timeout, max_phrase).await {
        Ok(text) => Json(json!({ "success": true, "text": text })),
        Err(err) => {
            tracing::debug!("escuta sem resultado: {}", err);
            Json(json!({ "success": false }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiKeyRequest {
    pub key: String,
}

/// Runtime fallback for a missing key: store it in process state and
/// connect the chat session on the spot.
pub async fn set_api_key(
    State(state): State<AppState>,
    Json(request): Json<ApiKeyRequest>,
) -> (StatusCode, Json<Value>) {
    let key = request.key.trim().to_string();
    if key.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": "A chave não pode estar vazia." })),
        );
    }

    let (model, ai_open, window) = {
        let config = state.config.read().await;
        (config.model.clone(), config.ai_open, config.history_window)
    };
    let prompt = if ai_open {
        SYSTEM_PROMPT_URL
    } else {
        SYSTEM_PROMPT_ASSISTANT
    };

    match GeminiChat::new(&key, &model, prompt, window) {
        Ok(chat) => {
            state.config.write().await.api_key = Some(key);
            state.dispatcher.connect_chat(Arc::new(chat)).await;
            tracing::info!("Gemini conectado com sucesso.");
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ok",
                    "message": "Chave de API salva temporariamente. IA conectada."
                })),
            )
        }
        Err(err) => {
            tracing::error!("erro ao inicializar o Gemini: {}", err);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "status": "error", "message": "Erro ao conectar a IA." })),
            )
        }
    }
}
