//! OS utilities behind the `SystemControl` seam: mixer volume,
//! backlight brightness, screenshots and application launching, all via
//! the standard desktop command-line tools.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use domain::entities::VolumeAction;
use domain::services::SystemControl;
use shared::error::{Error, Result};
use tokio::process::Command;

use crate::app_launcher::DesktopLauncher;

/// Mixer step applied per volume command.
const VOLUME_STEP: &str = "5%";

/// Screen capture tools tried in order; the first one present wins.
const SCREENSHOT_TOOLS: &[(&str, &[&str])] = &[
    ("gnome-screenshot", &["-f"]),
    ("scrot", &["-o"]),
    ("import", &["-window", "root"]),
];

pub struct ShellSystemControl {
    launcher: DesktopLauncher,
}

impl ShellSystemControl {
    pub fn new() -> Self {
        Self {
            launcher: DesktopLauncher::new(),
        }
    }
}

impl Default for ShellSystemControl {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_checked(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| Error::System(format!("{} indisponível: {}", program, e)))?;

    if !output.status.success() {
        return Err(Error::System(format!(
            "{} falhou: {}",
            program,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn parse_number(output: &str) -> Result<u64> {
    output
        .trim()
        .parse()
        .map_err(|_| Error::System(format!("saída numérica inválida: {:?}", output.trim())))
}

fn percent(current: u64, max: u64) -> u32 {
    if max == 0 {
        return 0;
    }
    ((current * 100) / max) as u32
}

#[async_trait]
impl SystemControl for ShellSystemControl {
    async fn volume(&self, action: VolumeAction) -> Result<()> {
        let args: Vec<String> = match action {
            VolumeAction::Up => vec![
                "set-sink-volume".into(),
                "@DEFAULT_SINK@".into(),
                format!("+{}", VOLUME_STEP),
            ],
            VolumeAction::Down => vec![
                "set-sink-volume".into(),
                "@DEFAULT_SINK@".into(),
                format!("-{}", VOLUME_STEP),
            ],
            VolumeAction::Mute => vec![
                "set-sink-mute".into(),
                "@DEFAULT_SINK@".into(),
                "toggle".into(),
            ],
        };

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_checked("pactl", &args).await.map(|_| ())
    }

    async fn brightness(&self) -> Result<u32> {
        let current = parse_number(&run_checked("brightnessctl", &["get"]).await?)?;
        let max = parse_number(&run_checked("brightnessctl", &["max"]).await?)?;
        Ok(percent(current, max))
    }

    async fn set_brightness(&self, percent: u32) -> Result<()> {
        run_checked("brightnessctl", &["set", &format!("{}%", percent)])
            .await
            .map(|_| ())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let target = path.to_string_lossy().into_owned();

        for (tool, base_args) in SCREENSHOT_TOOLS {
            let mut args: Vec<&str> = base_args.to_vec();
            args.push(&target);
            match run_checked(tool, &args).await {
                Ok(_) => return Ok(()),
                Err(err) => tracing::debug!("{} não capturou a tela: {}", tool, err),
            }
        }

        Err(Error::System(
            "nenhuma ferramenta de captura de tela disponível".to_string(),
        ))
    }

    async fn launch_command(&self, program: &str, args: &[&str]) -> Result<()> {
        Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| tracing::info!("programa iniciado: {}", program))
            .map_err(|e| Error::System(format!("falha ao iniciar {}: {}", program, e)))
    }

    async fn launch_by_name(&self, name: &str) -> Result<bool> {
        self.launcher.launch(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_output_parses_with_whitespace() {
        assert_eq!(parse_number(" 1200\n").unwrap(), 1200);
        assert!(parse_number("n/a").is_err());
    }

    #[test]
    fn percent_is_derived_from_raw_levels() {
        assert_eq!(percent(600, 1200), 50);
        assert_eq!(percent(1200, 1200), 100);
        assert_eq!(percent(0, 1200), 0);
        assert_eq!(percent(5, 0), 0);
    }
}
