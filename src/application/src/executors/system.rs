//! Volume, brightness and screenshot actions.

use std::path::Path;

use domain::entities::{ActionResult, BrightnessDirection, VolumeAction};
use domain::services::SystemControl;

const MSG_AUDIO: &str = "Áudio ajustado.";
const MSG_AUDIO_FAILED: &str = "Não consegui ajustar o volume.";
const MSG_BRIGHTNESS: &str = "Brilho ajustado.";
const MSG_BRIGHTNESS_FAILED: &str = "Não controlei o brilho (Monitor não suportado).";
const MSG_SCREENSHOT: &str = "Print salvo.";
const MSG_SCREENSHOT_FAILED: &str = "Não consegui salvar o print.";

pub const BRIGHTNESS_STEP: u32 = 10;

pub async fn volume(system: &dyn SystemControl, action: Option<VolumeAction>) -> ActionResult {
    let Some(action) = action else {
        // keyword matched but no sub-action: the intent is inert
        return ActionResult::silent();
    };

    match system.volume(action).await {
        Ok(()) => ActionResult::spoken(MSG_AUDIO),
        Err(err) => {
            tracing::error!("falha no ajuste de volume: {}", err);
            ActionResult::spoken(MSG_AUDIO_FAILED)
        }
    }
}

pub async fn brightness(
    system: &dyn SystemControl,
    direction: Option<BrightnessDirection>,
) -> ActionResult {
    let Some(direction) = direction else {
        return ActionResult::silent();
    };

    let adjusted = adjust_brightness(system, direction).await;
    match adjusted {
        Ok(()) => ActionResult::spoken(MSG_BRIGHTNESS),
        Err(err) => {
            tracing::warn!("brilho não ajustável: {}", err);
            ActionResult::spoken(MSG_BRIGHTNESS_FAILED)
        }
    }
}

async fn adjust_brightness(
    system: &dyn SystemControl,
    direction: BrightnessDirection,
) -> shared::Result<()> {
    let current = system.brightness().await?;
    let target = match direction {
        BrightnessDirection::Up => (current + BRIGHTNESS_STEP).min(100),
        BrightnessDirection::Down => current.saturating_sub(BRIGHTNESS_STEP),
    };
    system.set_brightness(target).await
}

/// Full-screen capture to the fixed path, overwriting any prior file.
pub async fn screenshot(system: &dyn SystemControl, path: &Path) -> ActionResult {
    if let Some(dir) = path.parent() {
        if let Err(err) = tokio::fs::create_dir_all(dir).await {
            tracing::error!("não foi possível criar {}: {}", dir.display(), err);
            return ActionResult::spoken(MSG_SCREENSHOT_FAILED);
        }
    }

    match system.screenshot(path).await {
        Ok(()) => ActionResult::spoken(MSG_SCREENSHOT),
        Err(err) => {
            tracing::error!("falha na captura de tela: {}", err);
            ActionResult::spoken(MSG_SCREENSHOT_FAILED)
        }
    }
}
