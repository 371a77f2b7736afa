use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{format_numbers, parse_numbers, Draw, Game};

pub const HISTORY_FILE: &str = "loto.csv";
pub const MOVIES_FILE: &str = "movies_platform.csv";
pub const STATUS_FILE: &str = "status.json";

/// `$PIYANGO_DATA_DIR`, sinon `./data`.
pub fn data_dir() -> PathBuf {
    match std::env::var_os("PIYANGO_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let mut path = std::env::current_dir().unwrap_or_default();
            path.push("data");
            path
        }
    }
}

pub fn history_path() -> PathBuf {
    data_dir().join(HISTORY_FILE)
}

pub fn movies_path() -> PathBuf {
    data_dir().join(MOVIES_FILE)
}

pub fn status_path() -> PathBuf {
    data_dir().join(STATUS_FILE)
}

#[derive(Debug, Serialize, Deserialize)]
struct DrawRecord {
    game: String,
    year: i32,
    month: String,
    month_idx: u8,
    draw_nr: u32,
    numbers: String,
}

impl DrawRecord {
    fn into_draw(self) -> Result<Draw> {
        Ok(Draw {
            game: self.game.parse()?,
            year: self.year,
            month: self.month,
            month_idx: self.month_idx,
            draw_nr: self.draw_nr,
            numbers: parse_numbers(&self.numbers)?,
        })
    }

    fn from_draw(draw: &Draw) -> Self {
        Self {
            game: draw.game.slug().to_string(),
            year: draw.year,
            month: draw.month.clone(),
            month_idx: draw.month_idx,
            draw_nr: draw.draw_nr,
            numbers: format_numbers(&draw.numbers),
        }
    }
}

/// Charge l'historique complet. Une ligne illisible est une erreur fatale :
/// le scoring ne doit jamais tourner sur un historique partiel.
pub fn load_history(path: &Path) -> Result<Vec<Draw>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut draws = Vec::new();
    for (i, record) in reader.deserialize::<DrawRecord>().enumerate() {
        let record = record.with_context(|| format!("Erreur lecture ligne {}", i + 1))?;
        let draw = record
            .into_draw()
            .with_context(|| format!("Erreur parsing ligne {}", i + 1))?;
        draws.push(draw);
    }

    info!(path = %path.display(), draws = draws.len(), "historique chargé");
    Ok(draws)
}

/// Lit un fichier de nouveaux tirages en ignorant les lignes invalides,
/// comme le ferait un import tolérant.
pub fn read_new_draws(path: &Path) -> Result<(Vec<Draw>, u32)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut draws = Vec::new();
    let mut errors = 0;
    for (i, record) in reader.deserialize::<DrawRecord>().enumerate() {
        let parsed = record
            .map_err(anyhow::Error::from)
            .and_then(DrawRecord::into_draw)
            .and_then(|d| crate::models::validate_draw(&d).map(|_| d));
        match parsed {
            Ok(draw) => draws.push(draw),
            Err(e) => {
                warn!(line = i + 1, error = %e, "ligne ignorée");
                errors += 1;
            }
        }
    }
    Ok((draws, errors))
}

pub fn save_history(path: &Path, draws: &[Draw]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    for draw in draws {
        writer.serialize(DrawRecord::from_draw(draw))?;
    }
    writer.flush().context("Échec de l'écriture")?;
    info!(path = %path.display(), draws = draws.len(), "historique sauvegardé");
    Ok(())
}

pub fn filter_game(draws: &[Draw], game: Game) -> Vec<Draw> {
    draws.iter().filter(|d| d.game == game).cloned().collect()
}

pub struct MergeResult {
    pub draws: Vec<Draw>,
    pub inserted: u32,
    pub skipped: u32,
}

/// Ajoute `new` à la suite de `old`; en cas de doublon sur
/// (jeu, année, mois, numéro de tirage) la première occurrence est gardée.
pub fn merge_draws(old: Vec<Draw>, new: Vec<Draw>) -> MergeResult {
    let mut seen: HashSet<(Game, i32, String, u32)> = HashSet::new();
    let mut draws = Vec::with_capacity(old.len() + new.len());

    for draw in old {
        if seen.insert((draw.game, draw.year, draw.month.clone(), draw.draw_nr)) {
            draws.push(draw);
        }
    }

    let mut inserted = 0;
    let mut skipped = 0;
    for draw in new {
        if seen.insert((draw.game, draw.year, draw.month.clone(), draw.draw_nr)) {
            draws.push(draw);
            inserted += 1;
        } else {
            skipped += 1;
        }
    }

    MergeResult { draws, inserted, skipped }
}

/// Dernier tirage de chaque jeu, trié par jeu.
pub fn latest_per_game(draws: &[Draw]) -> Vec<Draw> {
    Game::ALL
        .iter()
        .filter_map(|&game| {
            draws
                .iter()
                .filter(|d| d.game == game)
                .max_by_key(|d| (d.year, d.month_idx, d.draw_nr))
                .cloned()
        })
        .collect()
}

/// (année max, mois max de cette année) : point de reprise d'une mise à jour.
pub fn resume_point(draws: &[Draw]) -> Option<(i32, u8)> {
    let year = draws.iter().map(|d| d.year).max()?;
    let month = draws
        .iter()
        .filter(|d| d.year == year)
        .map(|d| d.month_idx)
        .max()?;
    Some((year, month))
}
