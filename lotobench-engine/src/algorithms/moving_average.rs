use std::collections::BTreeSet;

use lotobench_model::models::{column_values, Draw, Number, SubGame};
use lotobench_model::{Error, Result};

use super::{column_quota, PredictionAlgorithm};

/// Prédit, par colonne, la valeur qui restaurerait une moyenne glissante
/// cible. La cible est dérivée analytiquement de la position de la
/// colonne : l'espérance approchée de la k-ième statistique d'ordre sur
/// [min, max], soit min + (k+1)·(max−min)/(c+1).
///
/// La fenêtre se dégrade : si le complément de moyenne sur la fenêtre la
/// plus longue tombe sous le minimum légal, on essaie une fenêtre plus
/// courte, puis on se rabat sur le minimum de la colonne. Les voisins de
/// la valeur calculée (±1, ±2, ...) complètent le quota.
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Result<Self> {
        if window < 2 {
            return Err(Error::InvalidArgument(format!(
                "fenêtre de moyenne {} < 2",
                window
            )));
        }
        Ok(Self { window })
    }

    fn target_average(sub_game: &SubGame, k: usize) -> f64 {
        let span = (sub_game.max_number - sub_game.min_number) as f64;
        sub_game.min_number as f64
            + (k as f64 + 1.0) * span / (sub_game.number_count as f64 + 1.0)
    }

    /// Valeur de base pour une colonne : complément de moyenne sur la
    /// fenêtre la plus longue qui reste légale, sinon le minimum.
    fn base_value(&self, sub_game: &SubGame, series: &[Number], k: usize) -> Number {
        let target = Self::target_average(sub_game, k);
        for w in (2..=self.window).rev() {
            if series.len() < w - 1 {
                continue;
            }
            let tail_sum: f64 = series[series.len() - (w - 1)..]
                .iter()
                .map(|&v| v as f64)
                .sum();
            let candidate = (target * w as f64 - tail_sum).round() as Number;
            if candidate >= sub_game.min_number {
                return candidate.min(sub_game.max_number);
            }
        }
        sub_game.min_number
    }
}

impl PredictionAlgorithm for MovingAverage {
    fn name(&self) -> &str {
        "MovingAverage"
    }

    fn predict(
        &mut self,
        sub_game: &SubGame,
        previous: &[Draw],
        desired_count: usize,
    ) -> Result<BTreeSet<Number>> {
        let mut predicted = BTreeSet::new();
        if previous.is_empty() {
            return Ok(predicted);
        }

        let quota = column_quota(desired_count, sub_game.number_count);

        'columns: for k in 0..sub_game.number_count {
            let series = column_values(previous, k);
            let base = self.base_value(sub_game, &series, k);

            let mut added = 0usize;
            if predicted.len() >= desired_count {
                break 'columns;
            }
            if predicted.insert(base) {
                added += 1;
            }

            // Voisins alternés autour de la base jusqu'au quota de la
            // colonne, tant qu'il reste des voisins légaux.
            let mut offset: Number = 1;
            while added < quota {
                let above = base + offset;
                let below = base - offset;
                if above > sub_game.max_number && below < sub_game.min_number {
                    break;
                }
                if above <= sub_game.max_number {
                    if predicted.len() >= desired_count {
                        break 'columns;
                    }
                    if predicted.insert(above) {
                        added += 1;
                    }
                }
                if added < quota && below >= sub_game.min_number {
                    if predicted.len() >= desired_count {
                        break 'columns;
                    }
                    if predicted.insert(below) {
                        added += 1;
                    }
                }
                offset += 1;
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

    #[test]
    fn test_below_minimum_falls_back_to_column_minimum() {
        // Colonne saturée au maximum : tout complément de moyenne est très
        // négatif, quelle que soit la fenêtre. La base doit retomber sur le
        // minimum de la colonne, jamais sous la borne.
        let sub = SubGame::new("mini", 0, 1, 10, 3).unwrap();
        let draws: Vec<Draw> = (0..6)
            .map(|_| Draw::new(vec![10, 10, 10], &sub).unwrap())
            .collect();
        let mut algo = MovingAverage::new(5).unwrap();
        let predicted = algo.predict(&sub, &draws, 3).unwrap();
        assert!(predicted.contains(&1), "fallback sur min attendu : {:?}", predicted);
        assert!(predicted.iter().all(|&n| sub.contains(n)));
    }

    #[test]
    fn test_restores_target_average() {
        // Une seule colonne sur [1, 9] : cible = 1 + 1·8/2 = 5. Avec un
        // historique constant à 5, le complément de moyenne est 5.
        let sub = SubGame::new("mini", 0, 1, 9, 1).unwrap();
        let draws: Vec<Draw> = (0..6).map(|_| Draw::new(vec![5], &sub).unwrap()).collect();
        let mut algo = MovingAverage::new(4).unwrap();
        let predicted = algo.predict(&sub, &draws, 1).unwrap();
        assert_eq!(predicted.into_iter().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_neighbors_fill_quota() {
        let sub = SubGame::new("mini", 0, 1, 9, 1).unwrap();
        let draws: Vec<Draw> = (0..6).map(|_| Draw::new(vec![5], &sub).unwrap()).collect();
        let mut algo = MovingAverage::new(4).unwrap();
        // desired=3 sur une colonne : base 5 puis voisins 6 et 4.
        let predicted = algo.predict(&sub, &draws, 3).unwrap();
        assert_eq!(predicted.into_iter().collect::<Vec<_>>(), vec![4, 5, 6]);
    }

    #[test]
    fn test_short_history_degrades_window() {
        // Un seul tirage : seule la fenêtre w=2 a assez de données.
        let sub = SubGame::new("mini", 0, 1, 9, 1).unwrap();
        let draws = vec![Draw::new(vec![3], &sub).unwrap()];
        let mut algo = MovingAverage::new(5).unwrap();
        let predicted = algo.predict(&sub, &draws, 1).unwrap();
        // Cible 5 : complément sur w=2 → round(10 - 3) = 7.
        assert_eq!(predicted.into_iter().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_empty_history() {
        let sub = make_test_sub_game();
        let mut algo = MovingAverage::new(3).unwrap();
        assert!(algo.predict(&sub, &[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_bounds_on_cyclic_history() {
        let sub = make_test_sub_game();
        let draws = make_test_history(30, &sub);
        let mut algo = MovingAverage::new(5).unwrap();
        let predicted = algo.predict(&sub, &draws, sub.number_count).unwrap();
        assert!(predicted.len() <= sub.number_count);
        assert!(predicted.iter().all(|&n| sub.contains(n)));
    }

    #[test]
    fn test_constructor_validation() {
        assert!(MovingAverage::new(1).is_err());
        assert!(MovingAverage::new(2).is_ok());
    }
}
