use std::collections::BTreeSet;

use lotobench_model::models::{Draw, Number, SubGame};
use lotobench_model::{Error, Result};

use super::PredictionAlgorithm;
use crate::pattern::{find_row_patterns, sort_row_patterns, Metric};

/// Recherche de motifs sur tirages entiers : la fenêtre de référence est
/// la queue de l'historique (les `pattern_size` derniers tirages), le pool
/// est tout l'historique. Les successeurs des meilleures correspondances
/// fournissent les numéros prédits.
pub struct RowPattern {
    pattern_size: usize,
    value_epsilon: Number,
    pattern_epsilon: i64,
}

impl RowPattern {
    pub fn new(pattern_size: usize, value_epsilon: Number, pattern_epsilon: i64) -> Result<Self> {
        if pattern_size < 1 {
            return Err(Error::InvalidArgument("pattern_size < 1".into()));
        }
        if value_epsilon < 0 || pattern_epsilon < 0 {
            return Err(Error::InvalidArgument(format!(
                "epsilon négatif : value={}, pattern={}",
                value_epsilon, pattern_epsilon
            )));
        }
        Ok(Self { pattern_size, value_epsilon, pattern_epsilon })
    }
}

impl PredictionAlgorithm for RowPattern {
    fn name(&self) -> &str {
        "RowPattern"
    }

    fn predict(
        &mut self,
        sub_game: &SubGame,
        previous: &[Draw],
        desired_count: usize,
    ) -> Result<BTreeSet<Number>> {
        let mut predicted = BTreeSet::new();
        if previous.len() <= self.pattern_size {
            return Ok(predicted);
        }

        let reference = &previous[previous.len() - self.pattern_size..];
        let mut matches = find_row_patterns(
            previous,
            reference,
            self.value_epsilon,
            self.pattern_epsilon,
            Metric::Absolute,
        )?;
        sort_row_patterns(&mut matches);

        'matches: for m in &matches {
            for &n in &m.successor.numbers {
                if predicted.len() >= desired_count {
                    break 'matches;
                }
                predicted.insert(sub_game.clamp(n));
            }
        }

        Ok(predicted)
    }
}
