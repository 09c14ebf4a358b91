use std::collections::BTreeSet;

use lotobench_model::models::{column_values, Draw, Number, SubGame};
use lotobench_model::{Error, Result};

use super::PredictionAlgorithm;

/// Teste si les `length` dernières valeurs d'une colonne suivent une
/// progression arithmétique (différence commune ajustée par moyenne des
/// écarts consécutifs). Si la somme des résidus absolus tient sous
/// l'epsilon, extrapole le terme suivant ; sinon la colonne ne contribue
/// rien.
pub struct ArithmeticSequence {
    length: usize,
    epsilon: f64,
}

impl ArithmeticSequence {
    pub fn new(length: usize, epsilon: f64) -> Result<Self> {
        if length < 3 {
            return Err(Error::InvalidArgument(format!(
                "longueur de progression {} < 3",
                length
            )));
        }
        if epsilon < 0.0 {
            return Err(Error::InvalidArgument(format!("epsilon négatif : {}", epsilon)));
        }
        Ok(Self { length, epsilon })
    }
}

impl PredictionAlgorithm for ArithmeticSequence {
    fn name(&self) -> &str {
        "ArithmeticSequence"
    }

    fn predict(
        &mut self,
        sub_game: &SubGame,
        previous: &[Draw],
        desired_count: usize,
    ) -> Result<BTreeSet<Number>> {
        let mut predicted = BTreeSet::new();

        for k in 0..sub_game.number_count {
            if predicted.len() >= desired_count {
                break;
            }
            let series = column_values(previous, k);
            if series.len() < self.length {
                continue;
            }

            let tail = &series[series.len() - self.length..];
            let diffs: Vec<f64> = tail.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
            let common = diffs.iter().sum::<f64>() / diffs.len() as f64;
            let residual: f64 = diffs.iter().map(|d| (d - common).abs()).sum();

            if residual <= self.epsilon {
                let next = tail[tail.len() - 1] + common.round() as Number;
                predicted.insert(sub_game.clamp(next));
            }
        }

        Ok(predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{make_test_history, make_test_sub_game};
    use lotobench_model::models::SubGame;

    fn single_column(values: &[Number], max: Number) -> (SubGame, Vec<Draw>) {
        let sub = SubGame::new("mini", 0, 1, max, 1).unwrap();
        let draws = values
            .iter()
            .map(|&v| Draw::new(vec![v], &sub).unwrap())
            .collect();
        (sub, draws)
    }

    #[test]
    fn test_exact_progression_extrapolates() {
        let (sub, draws) = single_column(&[2, 5, 8, 11], 30);
        let mut algo = ArithmeticSequence::new(4, 0.0).unwrap();
        let predicted = algo.predict(&sub, &draws, 1).unwrap();
        assert_eq!(predicted.into_iter().collect::<Vec<_>>(), vec![14]);
    }

    #[test]
    fn test_residual_above_epsilon_contributes_nothing() {
        // Écarts 3, 3, 9 : différence commune 5, résidus |3-5|+|3-5|+|9-5| = 8.
        let (sub, draws) = single_column(&[2, 5, 8, 17], 30);
        let mut algo = ArithmeticSequence::new(4, 2.0).unwrap();
        assert!(algo.predict(&sub, &draws, 1).unwrap().is_empty());
    }

    #[test]
    fn test_noisy_progression_within_epsilon() {
        // Écarts 3, 4, 3 : différence commune 10/3, résidus ≈ 0.89.
        let (sub, draws) = single_column(&[2, 5, 9, 12], 30);
        let mut algo = ArithmeticSequence::new(4, 1.0).unwrap();
        let predicted = algo.predict(&sub, &draws, 1).unwrap();
        // 12 + round(10/3) = 15
        assert_eq!(predicted.into_iter().collect::<Vec<_>>(), vec![15]);
    }

    #[test]
    fn test_extrapolation_clamped() {
        let (sub, draws) = single_column(&[4, 6, 8, 10], 10);
        let mut algo = ArithmeticSequence::new(4, 0.0).unwrap();
        let predicted = algo.predict(&sub, &draws, 1).unwrap();
        assert_eq!(predicted.into_iter().collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_descending_progression() {
        let (sub, draws) = single_column(&[20, 15, 10], 30);
        let mut algo = ArithmeticSequence::new(3, 0.0).unwrap();
        let predicted = algo.predict(&sub, &draws, 1).unwrap();
        assert_eq!(predicted.into_iter().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_history_too_short() {
        let sub = make_test_sub_game();
        let draws = make_test_history(2, &sub);
        let mut algo = ArithmeticSequence::new(4, 1.0).unwrap();
        assert!(algo.predict(&sub, &draws, 3).unwrap().is_empty());
    }

    #[test]
    fn test_constructor_validation() {
        assert!(ArithmeticSequence::new(2, 1.0).is_err());
        assert!(ArithmeticSequence::new(4, -0.5).is_err());
        assert!(ArithmeticSequence::new(3, 0.0).is_ok());
    }
}
