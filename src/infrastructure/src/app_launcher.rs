//! Fuzzy launch of installed applications from their desktop entries.

use std::fs;
use std::path::PathBuf;
use std::process::Stdio;

use shared::error::{Error, Result};
use tokio::process::Command;

/// Minimum similarity for a fuzzy match to count as "found".
const MATCH_THRESHOLD: f64 = 0.82;

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopEntry {
    pub name: String,
    pub exec: String,
}

pub struct DesktopLauncher {
    dirs: Vec<PathBuf>,
}

impl DesktopLauncher {
    pub fn new() -> Self {
        let mut dirs = vec![
            PathBuf::from("/usr/share/applications"),
            PathBuf::from("/usr/local/share/applications"),
        ];
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/applications"));
        }
        Self { dirs }
    }

    /// Try to launch the application whose name best matches `query`.
    /// `Ok(false)` means nothing was close enough; the caller decides
    /// what to try next.
    pub async fn launch(&self, query: &str) -> Result<bool> {
        let dirs = self.dirs.clone();
        let entries = tokio::task::spawn_blocking(move || scan_entries(&dirs))
            .await
            .map_err(|e| Error::System(format!("falha na varredura de aplicativos: {}", e)))?;

        let Some(entry) = best_match(query, &entries) else {
            tracing::debug!("nenhum aplicativo parecido com '{}'", query);
            return Ok(false);
        };

        tracing::info!("iniciando aplicativo: {}", entry.name);
        Command::new("sh")
            .arg("-c")
            .arg(&entry.exec)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::System(format!("falha ao iniciar {}: {}", entry.name, e)))?;

        Ok(true)
    }
}

impl Default for DesktopLauncher {
    fn default() -> Self {
        Self::new()
    }
}

fn scan_entries(dirs: &[PathBuf]) -> Vec<DesktopEntry> {
    let mut entries = Vec::new();
    for dir in dirs {
        let Ok(read_dir) = fs::read_dir(dir) else {
            continue;
        };
        for file in read_dir.flatten() {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some("desktop") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                if let Some(entry) = parse_desktop_entry(&content) {
                    entries.push(entry);
                }
            }
        }
    }
    entries
}

fn parse_desktop_entry(content: &str) -> Option<DesktopEntry> {
    let mut name = None;
    let mut exec = None;
    let mut in_main_section = false;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_main_section = line == "[Desktop Entry]";
            continue;
        }
        if !in_main_section {
            continue;
        }
        if let Some(value) = line.strip_prefix("NoDisplay=") {
            if value.trim() == "true" {
                return None;
            }
        } else if let Some(value) = line.strip_prefix("Name=") {
            name.get_or_insert_with(|| value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Exec=") {
            exec.get_or_insert_with(|| clean_exec(value));
        }
    }

    Some(DesktopEntry {
        name: name?,
        exec: exec?,
    })
}

/// Strip the desktop-entry field codes (%u, %F, ...) the spawned shell
/// would otherwise receive literally.
fn clean_exec(exec: &str) -> String {
    exec.split_whitespace()
        .filter(|token| !token.starts_with('%'))
        .collect::<Vec<_>>()
        .join(" ")
}

fn best_match<'a>(query: &str, entries: &'a [DesktopEntry]) -> Option<&'a DesktopEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(&DesktopEntry, f64)> = None;
    for entry in entries {
        let name = entry.name.to_lowercase();
        let score = if name == query {
            1.0
        } else if name.contains(&query) || query.contains(&name) {
            0.95
        } else {
            strsim::jaro_winkler(&name, &query)
        };

        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((entry, score));
        }
    }

    best.filter(|(_, score)| *score >= MATCH_THRESHOLD)
        .map(|(entry, _)| entry)
}
