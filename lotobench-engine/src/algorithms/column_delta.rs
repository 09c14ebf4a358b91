use std::collections::BTreeSet;

use lotobench_model::models::{column_deltas, Draw, Number, SubGame};
use lotobench_model::{Error, Result};

use super::{column_quota, PredictionAlgorithm};
use crate::pattern::{find_patterns, sort_patterns, Metric};

/// Recherche de motifs sur les premières différences de chaque colonne.
/// Le successeur d'une fenêtre de deltas est un delta : il s'applique à la
/// dernière valeur de la colonne, et le résultat est ramené dans
/// [min, max] plutôt qu'écarté.
pub struct ColumnDeltaPattern {
    pattern_size: usize,
    value_epsilon: Number,
    pattern_epsilon: i64,
}

impl ColumnDeltaPattern {
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

impl PredictionAlgorithm for ColumnDeltaPattern {
    fn name(&self) -> &str {
        "ColumnDeltaPattern"
    }

    fn predict(
        &mut self,
        sub_game: &SubGame,
        previous: &[Draw],
        desired_count: usize,
    ) -> Result<BTreeSet<Number>> {
        let mut predicted = BTreeSet::new();
        // Il faut pattern_size deltas + un successeur, donc au moins
        // pattern_size + 2 tirages.
        if previous.len() < self.pattern_size + 2 {
            return Ok(predicted);
        }

        let quota = column_quota(desired_count, sub_game.number_count);

        'columns: for k in 0..sub_game.number_count {
            let deltas = column_deltas(previous, k);
            let reference = &deltas[deltas.len() - self.pattern_size..];
            let mut matches = find_patterns(
                &deltas,
                reference,
                self.value_epsilon,
                self.pattern_epsilon,
                Metric::Absolute,
            )?;
            sort_patterns(&mut matches);

            let last = previous[previous.len() - 1].numbers[k];
            for m in matches.iter().take(quota) {
                if predicted.len() >= desired_count {
                    break 'columns;
                }
                predicted.insert(sub_game.clamp(last + m.successor));
            }
        }

        Ok(predicted)
    }
}
