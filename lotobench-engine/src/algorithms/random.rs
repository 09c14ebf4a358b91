use std::collections::BTreeSet;

use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lotobench_model::models::{Draw, Number, SubGame};
use lotobench_model::Result;

use super::PredictionAlgorithm;

/// Seed déterministe dérivé de la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// Ligne de base : tirage uniforme sans remise dans [min, max]. Aucun
/// biais, c'est la référence à battre. Le seed est explicite pour rendre
/// les exécutions reproductibles.
pub struct Random {
    rng: StdRng,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl PredictionAlgorithm for Random {
    fn name(&self) -> &str {
        "Random"
    }

    fn predict(
        &mut self,
        sub_game: &SubGame,
        _previous: &[Draw],
        desired_count: usize,
    ) -> Result<BTreeSet<Number>> {
        let target = desired_count.min(sub_game.number_span());
        let mut predicted = BTreeSet::new();
        while predicted.len() < target {
            let n = self
                .rng
                .random_range(sub_game.min_number..=sub_game.max_number);
            predicted.insert(n);
        }
        Ok(predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{make_test_history, make_test_sub_game};

    #[test]
    fn test_random_bounds() {
        let sub = make_test_sub_game();
        let draws = make_test_history(5, &sub);
        let mut algo = Random::new(42);
        let predicted = algo.predict(&sub, &draws, 3).unwrap();
        assert_eq!(predicted.len(), 3);
        assert!(predicted.iter().all(|&n| sub.contains(n)));
    }

    #[test]
    fn test_random_desired_capped_at_span() {
        let sub = make_test_sub_game();
        let mut algo = Random::new(42);
        // span = 10 : demander 50 numéros distincts est impossible.
        let predicted = algo.predict(&sub, &[], 50).unwrap();
        assert_eq!(predicted.len(), 10);
    }

    #[test]
    fn test_random_same_seed_same_sequence() {
        let sub = make_test_sub_game();
        let a = Random::new(123).predict(&sub, &[], 3).unwrap();
        let b = Random::new(123).predict(&sub, &[], 3).unwrap();
        assert_eq!(a, b, "même seed, même prédiction");
    }

    #[test]
    fn test_date_seed_format() {
        let seed = date_seed();
        assert_eq!(seed.to_string().len(), 8, "seed devrait avoir 8 chiffres : {seed}");
    }
}
