use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::{HISTORY_FILE, MOVIES_FILE};

pub const NEVER_UPDATED: &str = "Not updated yet";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date de dernière mise à jour de chaque fichier de données.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateStatus {
    entries: BTreeMap<String, String>,
}

impl Default for UpdateStatus {
    fn default() -> Self {
        let entries = [HISTORY_FILE, MOVIES_FILE]
            .iter()
            .map(|f| (f.to_string(), NEVER_UPDATED.to_string()))
            .collect();
        Self { entries }
    }
}

impl UpdateStatus {
    /// Charge le fichier de statut, ou l'initialise s'il n'existe pas encore.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            let status = Self::default();
            status.save(path)?;
            return Ok(status);
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {:?}", path))?;
        let status = serde_json::from_str(&json)
            .with_context(|| format!("Statut invalide dans {:?}", path))?;
        Ok(status)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
        Ok(())
    }

    pub fn touch(&mut self, file: &str) {
        let now = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.entries.insert(file.to_string(), now);
    }

    pub fn last_update(&self, file: &str) -> &str {
        self.entries.get(file).map(String::as_str).unwrap_or("Unknown")
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entries() {
        let status = UpdateStatus::default();
        assert_eq!(status.last_update(HISTORY_FILE), NEVER_UPDATED);
        assert_eq!(status.last_update(MOVIES_FILE), NEVER_UPDATED);
        assert_eq!(status.last_update("autre.csv"), "Unknown");
    }

    #[test]
    fn test_load_or_init_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        let status = UpdateStatus::load_or_init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(status, UpdateStatus::default());
    }

    #[test]
    fn test_touch_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        let mut status = UpdateStatus::load_or_init(&path).unwrap();
        status.touch(HISTORY_FILE);
        status.save(&path).unwrap();

        let reloaded = UpdateStatus::load_or_init(&path).unwrap();
        let stamp = reloaded.last_update(HISTORY_FILE);
        assert_ne!(stamp, NEVER_UPDATED);
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_reads_flat_json_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        std::fs::write(&path, r#"{"loto.csv": "2024-05-01 10:00:00"}"#).unwrap();
        let status = UpdateStatus::load_or_init(&path).unwrap();
        assert_eq!(status.last_update(HISTORY_FILE), "2024-05-01 10:00:00");
    }
}
