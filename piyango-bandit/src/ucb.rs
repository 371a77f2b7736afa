//! Score UCB (Upper Confidence Bound) par numéro.
//!
//! Chaque numéro possible est un bras. Un tirage qui contient le numéro compte
//! comme un tirage du bras avec une récompense de 1; il n'existe pas de
//! récompense nulle. La moyenne `reward / count` vaut donc toujours 1.0 et le
//! classement ne dépend que du terme de confiance
//! `sqrt(2 ln(total) / count)` : un numéro vu moins souvent (mais au moins une
//! fois) passe devant un numéro fréquent, et un numéro jamais vu vaut `+inf`.
//! Ce comportement est celui attendu en sortie; ne pas le « corriger » en UCB1
//! classique.

use piyango_db::models::Draw;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("historique vide : aucun tirage ne contient de numéro")]
    EmptyHistory,

    #[error("numéro {number} invalide dans le tirage #{draw}")]
    InvalidNumber { draw: usize, number: u8 },

    #[error("numéro {number} hors de la plage 1..={arms}")]
    ArmOutOfRange { number: u8, arms: u8 },
}

/// Nombre de bras à scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArmRange {
    /// 1..=max observé dans l'historique. Un numéro au-delà du maximum
    /// historique n'existe pas et ne peut jamais être proposé.
    #[default]
    Observed,
    /// 1..=n, fourni par l'appelant (plage officielle du jeu).
    Fixed(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmScore {
    pub number: u8,
    pub count: u32,
    pub reward: f64,
    pub score: f64,
}

/// Statistiques et score de chaque bras, dans l'ordre des numéros (1..=N).
pub fn score_arms(history: &[Draw], arms: ArmRange) -> Result<Vec<ArmScore>, ScoreError> {
    let mut max_number = 0u8;
    for (t, draw) in history.iter().enumerate() {
        for &n in &draw.numbers {
            if n == 0 {
                return Err(ScoreError::InvalidNumber { draw: t, number: n });
            }
            max_number = max_number.max(n);
        }
    }
    if max_number == 0 {
        return Err(ScoreError::EmptyHistory);
    }

    let num_arms = match arms {
        ArmRange::Observed => max_number,
        ArmRange::Fixed(n) if n < max_number => {
            return Err(ScoreError::ArmOutOfRange { number: max_number, arms: n });
        }
        ArmRange::Fixed(n) => n,
    };
    let num_arms = usize::from(num_arms);

    let mut counts = vec![0u32; num_arms];
    let mut rewards = vec![0.0f64; num_arms];
    for draw in history {
        for &n in &draw.numbers {
            let idx = (n - 1) as usize;
            counts[idx] += 1;
            rewards[idx] += 1.0;
        }
    }

    // Somme des occurrences, pas le nombre de tirages.
    let total_draws: u32 = counts.iter().sum();
    let log_total = (total_draws as f64).ln();

    let scores: Vec<ArmScore> = (0..num_arms)
        .map(|i| {
            let score = if counts[i] > 0 {
                let count = counts[i] as f64;
                let avg_reward = rewards[i] / count;
                let confidence = (2.0 * log_total / count).sqrt();
                avg_reward + confidence
            } else {
                f64::INFINITY
            };
            ArmScore {
                number: (i + 1) as u8,
                count: counts[i],
                reward: rewards[i],
                score,
            }
        })
        .collect();

    debug!(arms = num_arms, total_draws, "scores UCB calculés");
    Ok(scores)
}

/// Les `top_k` meilleurs numéros, score décroissant. À score égal, l'ordre
/// croissant des numéros est conservé (tri stable).
pub fn rank_arms(history: &[Draw], top_k: usize, arms: ArmRange) -> Result<Vec<u8>, ScoreError> {
    let mut scores = score_arms(history, arms)?;
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(scores.into_iter().take(top_k).map(|s| s.number).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use piyango_db::models::Game;

    fn history(draws: &[&[u8]]) -> Vec<Draw> {
        draws
            .iter()
            .enumerate()
            .map(|(i, numbers)| Draw {
                game: Game::SayisalLoto,
                year: 2024,
                month: "Ocak".to_string(),
                month_idx: 1,
                draw_nr: i as u32 + 1,
                numbers: numbers.to_vec(),
            })
            .collect()
    }

    #[test]
    fn test_rare_numbers_ranked_first() {
        let h = history(&[&[1, 2, 3], &[1, 2, 4], &[5]]);
        let mut top = rank_arms(&h, 3, ArmRange::Observed).unwrap();
        top.sort();
        assert_eq!(top, vec![3, 4, 5]);
    }

    #[test]
    fn test_score_values() {
        let h = history(&[&[1, 2, 3], &[1, 2, 4], &[5]]);
        let scores = score_arms(&h, ArmRange::Observed).unwrap();
        assert_eq!(scores.len(), 5);
        let total = 7f64;
        let expected_twice = 1.0 + (2.0 * total.ln() / 2.0).sqrt();
        let expected_once = 1.0 + (2.0 * total.ln()).sqrt();
        assert!((scores[0].score - expected_twice).abs() < 1e-12);
        assert!((scores[4].score - expected_once).abs() < 1e-12);
        assert_eq!(scores[0].count, 2);
        assert!((scores[0].reward - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_numbers_are_infinite() {
        let h = history(&[&[1, 2, 10]]);
        let scores = score_arms(&h, ArmRange::Observed).unwrap();
        assert_eq!(scores.len(), 10);
        for s in &scores[2..9] {
            assert!(s.score.is_infinite(), "numéro {} : {}", s.number, s.score);
        }
        let ranked = rank_arms(&h, 10, ArmRange::Observed).unwrap();
        assert_eq!(ranked, vec![3, 4, 5, 6, 7, 8, 9, 1, 2, 10]);
    }

    #[test]
    fn test_single_occurrence_has_no_bonus() {
        // ln(1) = 0 : le terme de confiance disparaît.
        let h = history(&[&[4]]);
        let scores = score_arms(&h, ArmRange::Observed).unwrap();
        assert!((scores[3].score - 1.0).abs() < 1e-12);
        assert_eq!(rank_arms(&h, 6, ArmRange::Observed).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_history_errors() {
        assert_eq!(rank_arms(&[], 6, ArmRange::Observed), Err(ScoreError::EmptyHistory));
        let h = history(&[&[], &[]]);
        assert_eq!(rank_arms(&h, 6, ArmRange::Observed), Err(ScoreError::EmptyHistory));
    }

    #[test]
    fn test_zero_number_errors() {
        let h = history(&[&[1, 2], &[3, 0]]);
        assert_eq!(
            score_arms(&h, ArmRange::Observed),
            Err(ScoreError::InvalidNumber { draw: 1, number: 0 })
        );
    }

    #[test]
    fn test_fixed_range_extends_arms() {
        let h = history(&[&[1, 2, 3]]);
        let scores = score_arms(&h, ArmRange::Fixed(6)).unwrap();
        assert_eq!(scores.len(), 6);
        assert_eq!(rank_arms(&h, 3, ArmRange::Fixed(6)).unwrap(), vec![4, 5, 6]);
    }

    #[test]
    fn test_fixed_range_too_small() {
        let h = history(&[&[1, 12]]);
        assert_eq!(
            score_arms(&h, ArmRange::Fixed(10)),
            Err(ScoreError::ArmOutOfRange { number: 12, arms: 10 })
        );
    }
}
