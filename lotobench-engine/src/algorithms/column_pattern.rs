use std::collections::BTreeSet;

use lotobench_model::models::{column_values, Draw, Number, SubGame};
use lotobench_model::{Error, Result};

use super::{column_quota, PredictionAlgorithm};
use crate::pattern::{find_patterns, sort_patterns, Metric};

/// Recherche de motifs par colonne : chaque emplacement de numéro est
/// traité comme une série scalaire indépendante. Accumulation en carrés,
/// pour écarter les fenêtres dont un seul écart domine.
pub struct ColumnPattern {
    pattern_size: usize,
    value_epsilon: Number,
    pattern_epsilon: i64,
}

impl ColumnPattern {
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

impl PredictionAlgorithm for ColumnPattern {
    fn name(&self) -> &str {
        "ColumnPattern"
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

        let quota = column_quota(desired_count, sub_game.number_count);

        'columns: for k in 0..sub_game.number_count {
            let series = column_values(previous, k);
            let reference = &series[series.len() - self.pattern_size..];
            let mut matches = find_patterns(
                &series,
                reference,
                self.value_epsilon,
                self.pattern_epsilon,
                Metric::Squared,
            )?;
            sort_patterns(&mut matches);

            for m in matches.iter().take(quota) {
                if predicted.len() >= desired_count {
                    break 'columns;
                }
                predicted.insert(sub_game.clamp(m.successor));
            }
        }

        Ok(predicted)
    }
}
