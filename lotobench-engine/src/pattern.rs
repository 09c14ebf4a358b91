use lotobench_model::models::{Draw, Number};
use lotobench_model::{Error, Result};

/// Accumulation de la dissimilarité : somme des écarts absolus, ou somme
/// des carrés (pénalise davantage un seul grand écart que plusieurs petits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Absolute,
    Squared,
}

impl Metric {
    fn cost(self, diff: i64) -> i64 {
        match self {
            Metric::Absolute => diff.abs(),
            Metric::Squared => diff * diff,
        }
    }
}

/// Fenêtre historique retenue par la recherche scalaire : position de
/// départ, dissimilarité accumulée, et la valeur qui suit immédiatement la
/// fenêtre (le successeur, c'est-à-dire la quantité prédite).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub position: usize,
    pub score: i64,
    /// Somme signée des écarts : le sens net de la déviation (fenêtre
    /// au-dessus ou au-dessous de la référence).
    pub drift: i64,
    pub successor: Number,
}

/// Équivalent ligne entière : le successeur est le tirage complet qui suit
/// la fenêtre retenue.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPattern {
    pub position: usize,
    pub score: i64,
    pub drift: i64,
    pub successor: Draw,
}

fn check_epsilons(value_epsilon: Number, pattern_epsilon: i64) -> Result<()> {
    if value_epsilon < 0 {
        return Err(Error::InvalidArgument(format!(
            "value_epsilon négatif : {}",
            value_epsilon
        )));
    }
    if pattern_epsilon < 0 {
        return Err(Error::InvalidArgument(format!(
            "pattern_epsilon négatif : {}",
            pattern_epsilon
        )));
    }
    Ok(())
}

/// Recherche par fenêtre glissante dans une série scalaire.
///
/// Pour chaque position où une fenêtre de la taille de `reference` tient
/// ET possède un successeur, compare élément par élément. Un seul écart
/// absolu au-delà de `value_epsilon` rejette la fenêtre immédiatement ;
/// le cumul au-delà de `pattern_epsilon` aussi. Les deux courts-circuits
/// décident de ce qui compte comme correspondance, pas seulement du coût.
///
/// Aucune fenêtre survivante : liste vide, pas une erreur. Résultat non
/// ordonné ; trier avec [`sort_patterns`].
pub fn find_patterns(
    pool: &[Number],
    reference: &[Number],
    value_epsilon: Number,
    pattern_epsilon: i64,
    metric: Metric,
) -> Result<Vec<Pattern>> {
    check_epsilons(value_epsilon, pattern_epsilon)?;
    if reference.is_empty() {
        return Err(Error::InvalidArgument("fenêtre de référence vide".into()));
    }
    if reference.len() > pool.len() {
        return Err(Error::InvalidArgument(format!(
            "fenêtre de référence ({}) plus longue que le pool ({})",
            reference.len(),
            pool.len()
        )));
    }

    let size = reference.len();
    let mut patterns = Vec::new();

    'candidates: for i in 0..pool.len() - size {
        let mut score = 0i64;
        let mut drift = 0i64;
        for (j, &expected) in reference.iter().enumerate() {
            let diff = (pool[i + j] - expected) as i64;
            if diff.abs() > value_epsilon as i64 {
                continue 'candidates;
            }
            score += metric.cost(diff);
            drift += diff;
            if score > pattern_epsilon {
                continue 'candidates;
            }
        }
        patterns.push(Pattern {
            position: i,
            score,
            drift,
            successor: pool[i + size],
        });
    }

    Ok(patterns)
}

/// Variante sur tirages entiers : la fenêtre est une suite de lignes, la
/// dissimilarité s'accumule sur tous les éléments de toutes les lignes.
pub fn find_row_patterns(
    pool: &[Draw],
    reference: &[Draw],
    value_epsilon: Number,
    pattern_epsilon: i64,
    metric: Metric,
) -> Result<Vec<RowPattern>> {
    check_epsilons(value_epsilon, pattern_epsilon)?;
    if reference.is_empty() {
        return Err(Error::InvalidArgument("fenêtre de référence vide".into()));
    }
    if reference.len() > pool.len() {
        return Err(Error::InvalidArgument(format!(
            "fenêtre de référence ({}) plus longue que le pool ({})",
            reference.len(),
            pool.len()
        )));
    }

    let size = reference.len();
    let mut patterns = Vec::new();

    'candidates: for i in 0..pool.len() - size {
        let mut score = 0i64;
        let mut drift = 0i64;
        for (r, reference_row) in reference.iter().enumerate() {
            let row = &pool[i + r];
            if row.numbers.len() != reference_row.numbers.len() {
                return Err(Error::InvalidArgument(format!(
                    "largeurs de lignes incohérentes : {} vs {}",
                    row.numbers.len(),
                    reference_row.numbers.len()
                )));
            }
            for (&actual, &expected) in row.numbers.iter().zip(reference_row.numbers.iter()) {
                let diff = (actual - expected) as i64;
                if diff.abs() > value_epsilon as i64 {
                    continue 'candidates;
                }
                score += metric.cost(diff);
                drift += diff;
                if score > pattern_epsilon {
                    continue 'candidates;
                }
            }
        }
        patterns.push(RowPattern {
            position: i,
            score,
            drift,
            successor: pool[i + size].clone(),
        });
    }

    Ok(patterns)
}

/// Tri stable par dissimilarité croissante (meilleure correspondance en tête).
pub fn sort_patterns(patterns: &mut [Pattern]) {
    patterns.sort_by_key(|p| p.score);
}

pub fn sort_row_patterns(patterns: &mut [RowPattern]) {
    patterns.sort_by_key(|p| p.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotobench_model::models::SubGame;

    #[test]
    fn test_find_patterns_basic() {
        // Pool [5,6,2,5,8,3], référence [5,5] :
        // - fenêtre [5,6] (écarts 0,1, cumul 1) retenue, successeur 2
        // - fenêtre [5,8] rejetée au contrôle par élément (|8-5|=3 > 1),
        //   avant même le contrôle de cumul
        let pool = vec![5, 6, 2, 5, 8, 3];
        let reference = vec![5, 5];
        let patterns = find_patterns(&pool, &reference, 1, 2, Metric::Absolute).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].position, 0);
        assert_eq!(patterns[0].score, 1);
        assert_eq!(patterns[0].drift, 1, "déviation nette vers le haut");
        assert_eq!(patterns[0].successor, 2);
    }

    #[test]
    fn test_find_patterns_pattern_epsilon_cutoff() {
        // Chaque écart passe le contrôle par élément mais le cumul dépasse.
        let pool = vec![6, 6, 9];
        let reference = vec![5, 5];
        let patterns = find_patterns(&pool, &reference, 1, 1, Metric::Absolute).unwrap();
        assert!(patterns.is_empty(), "cumul 2 > pattern_epsilon 1");
    }

    #[test]
    fn test_find_patterns_squared() {
        let pool = vec![7, 5, 9];
        let reference = vec![5, 5];
        // Écarts (2, 0) : cumul absolu 2, cumul carré 4.
        let absolute = find_patterns(&pool, &reference, 2, 2, Metric::Absolute).unwrap();
        assert_eq!(absolute.len(), 1);
        let squared = find_patterns(&pool, &reference, 2, 2, Metric::Squared).unwrap();
        assert!(squared.is_empty(), "4 > 2 en carré");
    }

    #[test]
    fn test_find_patterns_no_successor_window_excluded() {
        // La dernière fenêtre qui tient n'a pas de successeur : ignorée.
        let pool = vec![5, 5];
        let reference = vec![5, 5];
        let patterns = find_patterns(&pool, &reference, 0, 0, Metric::Absolute).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_find_patterns_epsilon_bounds_hold() {
        let pool: Vec<i32> = (0..40).map(|i| (i * 7 + 3) % 10).collect();
        let reference = vec![3, 0, 7];
        let value_epsilon = 2;
        let pattern_epsilon = 4;
        let patterns =
            find_patterns(&pool, &reference, value_epsilon, pattern_epsilon, Metric::Absolute)
                .unwrap();
        for p in &patterns {
            assert!(p.score <= pattern_epsilon, "score {} > {}", p.score, pattern_epsilon);
            for (j, &expected) in reference.iter().enumerate() {
                let diff = (pool[p.position + j] - expected).abs();
                assert!(diff <= value_epsilon, "écart {} > {}", diff, value_epsilon);
            }
        }
    }

    #[test]
    fn test_find_patterns_negative_epsilon() {
        let pool = vec![1, 2, 3];
        assert!(find_patterns(&pool, &[1], -1, 0, Metric::Absolute).is_err());
        assert!(find_patterns(&pool, &[1], 0, -1, Metric::Absolute).is_err());
    }

    #[test]
    fn test_find_patterns_reference_too_long() {
        let pool = vec![1, 2];
        let reference = vec![1, 2, 3];
        assert!(find_patterns(&pool, &reference, 1, 1, Metric::Absolute).is_err());
    }

    #[test]
    fn test_find_patterns_empty_reference() {
        assert!(find_patterns(&[1, 2], &[], 1, 1, Metric::Absolute).is_err());
    }

    #[test]
    fn test_sort_patterns_stable_and_idempotent() {
        let mut patterns = vec![
            Pattern { position: 0, score: 3, drift: 3, successor: 1 },
            Pattern { position: 1, score: 1, drift: -1, successor: 2 },
            Pattern { position: 2, score: 3, drift: 1, successor: 3 },
            Pattern { position: 3, score: 0, drift: 0, successor: 4 },
        ];
        sort_patterns(&mut patterns);
        let once = patterns.clone();
        sort_patterns(&mut patterns);
        assert_eq!(patterns, once, "le tri doit être idempotent");
        // Stabilité : à score égal, l'ordre d'origine est conservé.
        assert_eq!(patterns[2].position, 0);
        assert_eq!(patterns[3].position, 2);
    }

    fn make_rows(values: &[[i32; 2]]) -> Vec<Draw> {
        let sub = SubGame::new("mini", 0, 1, 20, 2).unwrap();
        values
            .iter()
            .map(|v| Draw::new(v.to_vec(), &sub).unwrap())
            .collect()
    }

    #[test]
    fn test_find_row_patterns_basic() {
        let pool = make_rows(&[[1, 2], [2, 3], [9, 9], [1, 2], [2, 4], [5, 5]]);
        let reference = make_rows(&[[1, 2], [2, 3]]);
        let patterns = find_row_patterns(&pool, &reference, 1, 2, Metric::Absolute).unwrap();
        // Position 0 : écart nul, successeur [9,9].
        // Position 3 : [1,2],[2,4] → écarts (0,0,0,1), cumul 1, successeur [5,5].
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].position, 0);
        assert_eq!(patterns[0].successor.numbers, vec![9, 9]);
        assert_eq!(patterns[1].position, 3);
        assert_eq!(patterns[1].score, 1);
    }

    #[test]
    fn test_find_row_patterns_element_rejection() {
        let pool = make_rows(&[[1, 9], [2, 3], [4, 4]]);
        let reference = make_rows(&[[1, 2]]);
        let patterns = find_row_patterns(&pool, &reference, 1, 10, Metric::Absolute).unwrap();
        // [1,9] rejetée (|9-2|=7), [2,3] retenue (écarts 1,1).
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].position, 1);
        assert_eq!(patterns[0].successor.numbers, vec![4, 4]);
    }

    #[test]
    fn test_find_row_patterns_reference_too_long() {
        let pool = make_rows(&[[1, 2]]);
        let reference = make_rows(&[[1, 2], [3, 4]]);
        assert!(find_row_patterns(&pool, &reference, 1, 1, Metric::Absolute).is_err());
    }
}
