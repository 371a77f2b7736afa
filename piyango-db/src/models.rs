use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Game {
    SayisalLoto,
    OnNumara,
    SuperLoto,
    SansTopu,
}

impl Game {
    pub const ALL: [Game; 4] = [Game::SayisalLoto, Game::OnNumara, Game::SuperLoto, Game::SansTopu];

    pub fn slug(&self) -> &'static str {
        match self {
            Game::SayisalLoto => "sayisal-loto",
            Game::OnNumara => "on-numara",
            Game::SuperLoto => "super-loto",
            Game::SansTopu => "sans-topu",
        }
    }

    /// Nombre de numéros prédits pour ce jeu.
    pub fn top_k(&self) -> usize {
        match self {
            Game::SayisalLoto => 7,
            Game::OnNumara => 10,
            Game::SuperLoto => 6,
            Game::SansTopu => 6,
        }
    }

    /// Plage officielle des numéros (1..=pool_size). Le scoring ne s'en sert
    /// que si l'appelant demande explicitement la plage complète.
    pub fn pool_size(&self) -> u8 {
        match self {
            Game::SayisalLoto => 90,
            Game::OnNumara => 80,
            Game::SuperLoto => 60,
            Game::SansTopu => 34,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "sayisal-loto" => Ok(Game::SayisalLoto),
            "on-numara" => Ok(Game::OnNumara),
            "super-loto" => Ok(Game::SuperLoto),
            "sans-topu" => Ok(Game::SansTopu),
            other => bail!("Jeu inconnu : '{}'", other),
        }
    }
}

/// Un tirage tel que stocké dans `loto.csv`. L'ordre des lignes fait office
/// d'index de séquence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub game: Game,
    pub year: i32,
    pub month: String,
    pub month_idx: u8,
    pub draw_nr: u32,
    pub numbers: Vec<u8>,
}

/// Décode la colonne `numbers`, écrite sous la forme `[1, 2, 3]`.
pub fn parse_numbers(raw: &str) -> Result<Vec<u8>> {
    let inner = raw
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .with_context(|| format!("Liste de numéros invalide : '{}'", raw))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("Impossible de parser le numéro '{}'", s))
        })
        .collect()
}

pub fn format_numbers(numbers: &[u8]) -> String {
    let body = numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", body)
}

pub fn validate_draw(draw: &Draw) -> Result<()> {
    if draw.numbers.is_empty() {
        bail!("Tirage {} ({}) sans numéros", draw.draw_nr, draw.game);
    }
    for &n in &draw.numbers {
        if n == 0 {
            bail!("Numéro 0 interdit (tirage {}, {})", draw.draw_nr, draw.game);
        }
    }
    for i in 0..draw.numbers.len() {
        for j in (i + 1)..draw.numbers.len() {
            if draw.numbers[i] == draw.numbers[j] {
                bail!("Numéro en double : {}", draw.numbers[i]);
            }
        }
    }
    if !(1..=12).contains(&draw.month_idx) {
        bail!("Mois hors limites : {}", draw.month_idx);
    }
    Ok(())
}
