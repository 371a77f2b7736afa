mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use piyango_bandit::{predict, score_arms, ArmRange};
use piyango_db::models::{Draw, Game};
use piyango_db::movies::{genres, load_movies, platforms, MovieFilter};
use piyango_db::status::UpdateStatus;
use piyango_db::store::{
    data_dir, filter_game, history_path, latest_per_game, load_history, movies_path,
    resume_point, status_path,
};
use crate::display::{
    display_draws, display_facets, display_import_summary, display_latest, display_movies,
    display_prediction, display_scores, display_status,
};

#[derive(Parser)]
#[command(name = "piyango", about = "Tableau de bord loto : prédictions UCB et films")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prédire les numéros d'un jeu
    Predict {
        /// Jeu
        #[arg(short, long)]
        game: Game,

        /// Scorer toute la plage officielle du jeu au lieu du maximum observé
        #[arg(long)]
        full_range: bool,
    },

    /// Afficher les scores UCB de chaque numéro
    Scores {
        /// Jeu
        #[arg(short, long)]
        game: Game,

        /// Scorer toute la plage officielle du jeu au lieu du maximum observé
        #[arg(long)]
        full_range: bool,
    },

    /// Fusionner un fichier CSV de nouveaux tirages dans l'historique
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Dernier tirage connu de chaque jeu
    Latest,

    /// Lister les derniers tirages d'un jeu
    List {
        /// Jeu
        #[arg(short, long)]
        game: Game,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Dates de dernière mise à jour des fichiers
    Status,

    /// Parcourir les films disponibles en streaming
    Movies {
        /// Année minimale
        #[arg(long)]
        from: Option<i32>,

        /// Année maximale
        #[arg(long)]
        to: Option<i32>,

        /// Plateforme de streaming
        #[arg(short, long)]
        platform: Option<String>,

        /// Genre (répétable, tous doivent correspondre)
        #[arg(short, long)]
        genre: Vec<String>,

        /// Recherche dans le titre
        #[arg(short, long)]
        search: Option<String>,

        /// Nombre maximum de films affichés
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Lister les plateformes et genres disponibles
        #[arg(long)]
        facets: bool,
    },

    /// Afficher le répertoire des données
    DataDir,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Predict { game, full_range } => cmd_predict(&history_path(), game, full_range),
        Command::Scores { game, full_range } => cmd_scores(&history_path(), game, full_range),
        Command::Import { file } => cmd_import(&file),
        Command::Latest => cmd_latest(&history_path()),
        Command::List { game, last } => cmd_list(&history_path(), game, last),
        Command::Status => cmd_status(),
        Command::Movies { from, to, platform, genre, search, limit, facets } => {
            let filter = MovieFilter {
                years: year_range(from, to),
                platform,
                genres: genre,
                search,
            };
            cmd_movies(&movies_path(), &filter, limit, facets)
        }
        Command::DataDir => {
            println!("{}", data_dir().display());
            Ok(())
        }
    }
}

fn year_range(from: Option<i32>, to: Option<i32>) -> Option<(i32, i32)> {
    match (from, to) {
        (None, None) => None,
        (from, to) => Some((from.unwrap_or(i32::MIN), to.unwrap_or(i32::MAX))),
    }
}

fn arm_range(game: Game, full_range: bool) -> ArmRange {
    if full_range {
        ArmRange::Fixed(game.pool_size())
    } else {
        ArmRange::Observed
    }
}

/// Historique d'un seul jeu. Un jeu absent de l'historique est une erreur :
/// le scoring n'a aucun bras à évaluer.
fn game_history(path: &Path, game: Game) -> Result<Vec<Draw>> {
    if !path.exists() {
        bail!("{:?} n'existe pas encore. Lancez d'abord : piyango import", path);
    }
    let draws = filter_game(&load_history(path)?, game);
    if draws.is_empty() {
        bail!("Aucun tirage pour {} dans {:?}", game, path);
    }
    Ok(draws)
}

fn cmd_predict(path: &Path, game: Game, full_range: bool) -> Result<()> {
    let history = game_history(path, game)?;
    let numbers = predict(game, &history, arm_range(game, full_range))
        .with_context(|| format!("Échec de la prédiction pour {}", game))?;
    display_prediction(game, &numbers);
    Ok(())
}

fn cmd_scores(path: &Path, game: Game, full_range: bool) -> Result<()> {
    let history = game_history(path, game)?;
    let scores = score_arms(&history, arm_range(game, full_range))
        .with_context(|| format!("Échec du scoring pour {}", game))?;
    display_scores(game, &scores, history.len());
    Ok(())
}

fn cmd_import(file: &Path) -> Result<()> {
    let result = import::import_csv(&history_path(), &status_path(), file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_latest(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("{} n'existe pas encore.", path.display());
        return Ok(());
    }
    let draws = load_history(path)?;
    display_latest(&latest_per_game(&draws), resume_point(&draws));
    Ok(())
}

fn cmd_list(path: &Path, game: Game, last: usize) -> Result<()> {
    let history = game_history(path, game)?;
    let mut recent: Vec<Draw> = history.into_iter().rev().take(last).collect();
    recent.sort_by(|a, b| (b.year, b.month_idx, b.draw_nr).cmp(&(a.year, a.month_idx, a.draw_nr)));
    display_draws(&recent);
    Ok(())
}

fn cmd_status() -> Result<()> {
    let status = UpdateStatus::load_or_init(&status_path())?;
    display_status(&status);
    Ok(())
}

fn cmd_movies(path: &Path, filter: &MovieFilter, limit: usize, facets: bool) -> Result<()> {
    let movies = load_movies(path)?;
    if facets {
        display_facets(&platforms(&movies), &genres(&movies));
    }
    let found = filter.apply(&movies);
    display_movies(&found, limit);
    Ok(())
}
