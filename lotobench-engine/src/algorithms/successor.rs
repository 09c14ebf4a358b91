use std::collections::{BTreeSet, HashMap};

use lotobench_model::models::{Draw, Number, SubGame};
use lotobench_model::Result;

use super::{column_quota, PredictionAlgorithm};

/// Fréquences de succession par colonne : pour chaque valeur observée, le
/// multiensemble des valeurs qui l'ont immédiatement suivie dans
/// l'échantillon. La prédiction relit la table à partir de la dernière
/// valeur de chaque colonne.
pub struct SuccessorFrequency {
    tables: Vec<HashMap<Number, HashMap<Number, u32>>>,
}

impl SuccessorFrequency {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }
}

impl Default for SuccessorFrequency {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionAlgorithm for SuccessorFrequency {
    fn name(&self) -> &str {
        "SuccessorFrequency"
    }

    fn initialize(&mut self, sub_game: &SubGame, sample: &[Draw]) -> Result<()> {
        self.tables = vec![HashMap::new(); sub_game.number_count];
        for pair in sample.windows(2) {
            for k in 0..sub_game.number_count {
                let current = pair[0].numbers[k];
                let next = pair[1].numbers[k];
                *self.tables[k]
                    .entry(current)
                    .or_default()
                    .entry(next)
                    .or_insert(0) += 1;
            }
        }
        Ok(())
    }

    fn predict(
        &mut self,
        sub_game: &SubGame,
        previous: &[Draw],
        desired_count: usize,
    ) -> Result<BTreeSet<Number>> {
        let mut predicted = BTreeSet::new();
        let last = match previous.last() {
            Some(draw) => draw,
            None => return Ok(predicted),
        };

        let quota = column_quota(desired_count, sub_game.number_count);

        'columns: for (k, table) in self.tables.iter().enumerate() {
            let successors = match table.get(&last.numbers[k]) {
                Some(s) => s,
                // Aucune transition observée depuis cette valeur : la
                // colonne ne contribue rien.
                None => continue,
            };

            // Fréquence décroissante, numéro croissant à égalité, pour un
            // ordre de sélection déterministe.
            let mut ranked: Vec<(Number, u32)> =
                successors.iter().map(|(&n, &c)| (n, c)).collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

            for (n, _) in ranked.into_iter().take(quota) {
                if predicted.len() >= desired_count {
                    break 'columns;
                }
                predicted.insert(n);
            }
        }

        Ok(predicted)
    }
}
