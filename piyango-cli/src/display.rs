use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use piyango_bandit::ArmScore;
use piyango_db::models::{Draw, Game};
use piyango_db::movies::Movie;
use piyango_db::status::UpdateStatus;

pub fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_prediction(game: Game, numbers: &[u8]) {
    println!("\n🎉 Numéros prédits pour {} :\n", game);
    println!("    {}\n", join_numbers(numbers));
}

pub fn display_scores(game: Game, scores: &[ArmScore], draws: usize) {
    println!("\n🔢 Scores UCB : {} ({} tirages)\n", game, draws);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Sorties", "Score"]);

    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    for (rank, s) in sorted.iter().enumerate() {
        let score = if s.score.is_infinite() {
            "∞".to_string()
        } else {
            format!("{:.4}", s.score)
        };
        let color = if rank < game.top_k() { Color::Green } else { Color::White };
        table.add_row(vec![
            Cell::new(format!("{:2}", s.number)).fg(color),
            Cell::new(s.count.to_string()),
            Cell::new(score),
        ]);
    }
    println!("{table}");
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Jeu", "Année", "Mois", "Tirage", "Numéros"]);

    for draw in draws {
        table.add_row(vec![
            draw.game.to_string(),
            draw.year.to_string(),
            draw.month.clone(),
            draw.draw_nr.to_string(),
            join_numbers(&draw.numbers),
        ]);
    }

    println!("{table}");
}

pub fn display_latest(latest: &[Draw], resume: Option<(i32, u8)>) {
    println!("\n📄 Derniers tirages par jeu\n");
    display_draws(latest);
    if let Some((year, month)) = resume {
        println!("\nReprise de la mise à jour : {}/{:02}", year, month);
    }
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
    println!("  Tirages en base   : {}", result.total_draws);
}

pub fn display_status(status: &UpdateStatus) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Fichier", "Dernière mise à jour"]);

    for (file, updated) in status.entries() {
        table.add_row(vec![file, updated]);
    }
    println!("{table}");
}

pub fn display_facets(platforms: &[String], genres: &[String]) {
    println!("\n📂 Plateformes : {}", platforms.join(", "));
    println!("📂 Genres      : {}", genres.join(", "));
}

pub fn display_movies(movies: &[&Movie], limit: usize) {
    println!("\n🎞️ {} films trouvés\n", movies.len());
    if movies.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Titre", "Année", "Genres", "Note", "Votes", "Streaming", "IMDb"]);

    for movie in movies.iter().take(limit) {
        table.add_row(vec![
            movie.original_title.clone(),
            movie.start_year.map(|y| y.to_string()).unwrap_or_else(|| "—".to_string()),
            movie.genres.clone(),
            movie.average_rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "—".to_string()),
            movie.num_votes.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string()),
            movie.streaming.clone(),
            movie.imdb_url(),
        ]);
    }
    println!("{table}");

    if movies.len() > limit {
        println!("… {} autres films (augmentez --limit)", movies.len() - limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_numbers() {
        assert_eq!(join_numbers(&[3, 4, 5]), "3 - 4 - 5");
        assert_eq!(join_numbers(&[42]), "42");
        assert_eq!(join_numbers(&[]), "");
    }
}
