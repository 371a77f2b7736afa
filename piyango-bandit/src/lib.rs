pub mod ucb;

use piyango_db::models::{Draw, Game};
use tracing::info;

pub use ucb::{rank_arms, score_arms, ArmRange, ArmScore, ScoreError};

/// Prédiction pour un jeu : les `game.top_k()` numéros au meilleur score UCB.
/// `history` doit déjà être filtré sur `game`.
pub fn predict(game: Game, history: &[Draw], arms: ArmRange) -> Result<Vec<u8>, ScoreError> {
    let numbers = rank_arms(history, game.top_k(), arms)?;
    info!(%game, draws = history.len(), ?numbers, "prédiction UCB");
    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draws(game: Game, n: usize) -> Vec<Draw> {
        (0..n)
            .map(|i| Draw {
                game,
                year: 2024,
                month: "Şubat".to_string(),
                month_idx: 2,
                draw_nr: i as u32,
                numbers: (1..=game.top_k() as u8).map(|k| (k + i as u8) % 30 + 1).collect(),
            })
            .collect()
    }

    #[test]
    fn test_predict_uses_game_top_k() {
        for game in Game::ALL {
            let h = draws(game, 40);
            let numbers = predict(game, &h, ArmRange::Observed).unwrap();
            assert_eq!(numbers.len(), game.top_k(), "{}", game);
        }
    }

    #[test]
    fn test_predict_full_range_prefers_unseen() {
        let h = draws(Game::SuperLoto, 10);
        let numbers = predict(Game::SuperLoto, &h, ArmRange::Fixed(Game::SuperLoto.pool_size())).unwrap();
        assert_eq!(numbers, vec![1, 17, 18, 19, 20, 21]);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let h = draws(Game::OnNumara, 25);
        let a = predict(Game::OnNumara, &h, ArmRange::Observed).unwrap();
        let b = predict(Game::OnNumara, &h, ArmRange::Observed).unwrap();
        assert_eq!(a, b);
    }
}
