//! General-conversation fallback through the language model.

use domain::entities::ActionResult;

use crate::state::SessionState;

pub const MSG_OFFLINE: &str = "Estou offline.";
pub const MSG_APOLOGY: &str = "Desculpe, houve um erro ao processar sua pergunta com a IA.";

/// Forward the utterance to the connected model; with no session the
/// fixed offline reply is returned and no network call is made.
pub async fn ask(state: &SessionState, text: &str, brief_replies: bool) -> ActionResult {
    let Some(model) = state.chat().await else {
        return ActionResult::spoken(MSG_OFFLINE);
    };

    let prompt = if brief_replies {
        format!(
            "Você é uma assistente pessoal. Responda em 1 frase curta: {}",
            text
        )
    } else {
        text.to_string()
    };

    match model.send(&prompt).await {
        Ok(reply) => ActionResult::spoken(reply),
        Err(err) => {
            tracing::error!("erro na consulta à IA: {}", err);
            ActionResult::spoken(MSG_APOLOGY)
        }
    }
}
