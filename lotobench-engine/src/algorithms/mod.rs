pub mod arithmetic;
pub mod column_delta;
pub mod column_pattern;
pub mod moving_average;
pub mod random;
pub mod row_pattern;
pub mod successor;

use std::collections::BTreeSet;

use lotobench_model::models::{Draw, Number, SubGame};
use lotobench_model::Result;

/// Contrat polymorphe de la famille d'heuristiques de prédiction.
pub trait PredictionAlgorithm {
    fn name(&self) -> &str;

    /// Ajustement unique sur l'échantillon historique. Sans effet pour les
    /// variantes sans état.
    fn initialize(&mut self, _sub_game: &SubGame, _sample: &[Draw]) -> Result<()> {
        Ok(())
    }

    /// `previous` = tous les tirages strictement antérieurs à la cible.
    /// Retourne au plus `desired_count` numéros distincts dans [min, max].
    /// Un manque de correspondances n'est pas une erreur : l'ensemble peut
    /// être incomplet, voire vide.
    fn predict(
        &mut self,
        sub_game: &SubGame,
        previous: &[Draw],
        desired_count: usize,
    ) -> Result<BTreeSet<Number>>;
}

/// Paramètres partagés de la famille. Les valeurs par défaut correspondent
/// aux réglages de la ligne de commande.
#[derive(Debug, Clone)]
pub struct AlgorithmParams {
    pub pattern_size: usize,
    pub value_epsilon: Number,
    pub pattern_epsilon: i64,
    pub sequence_length: usize,
    pub sequence_epsilon: f64,
    pub average_window: usize,
    pub seed: u64,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            pattern_size: 3,
            value_epsilon: 2,
            pattern_epsilon: 6,
            sequence_length: 4,
            sequence_epsilon: 2.0,
            average_window: 5,
            seed: 42,
        }
    }
}

/// Instancie la famille complète dans un ordre stable (celui du rapport).
pub fn all_algorithms(params: &AlgorithmParams) -> Result<Vec<Box<dyn PredictionAlgorithm>>> {
    Ok(vec![
        Box::new(random::Random::new(params.seed)),
        Box::new(successor::SuccessorFrequency::new()),
        Box::new(row_pattern::RowPattern::new(
            params.pattern_size,
            params.value_epsilon,
            params.pattern_epsilon,
        )?),
        Box::new(column_pattern::ColumnPattern::new(
            params.pattern_size,
            params.value_epsilon,
            params.pattern_epsilon,
        )?),
        Box::new(column_delta::ColumnDeltaPattern::new(
            params.pattern_size,
            params.value_epsilon,
            params.pattern_epsilon,
        )?),
        Box::new(arithmetic::ArithmeticSequence::new(
            params.sequence_length,
            params.sequence_epsilon,
        )?),
        Box::new(moving_average::MovingAverage::new(params.average_window)?),
    ])
}

/// Quota de propositions par colonne pour les variantes multi-colonnes :
/// desired / nombre de colonnes, minimum 1. L'insertion dans l'ensemble
/// partagé s'arrête dès que `desired` numéros distincts sont réunis.
pub fn column_quota(desired_count: usize, column_count: usize) -> usize {
    if column_count == 0 {
        return 0;
    }
    (desired_count / column_count).max(1)
}

/// Historique synthétique cyclique pour les tests : la colonne k du tirage
/// t vaut min + (t + k) mod span. Chaque colonne est une rampe périodique,
/// ce qui donne des transitions et des motifs répétés exploitables.
pub fn make_test_history(n: usize, sub_game: &SubGame) -> Vec<Draw> {
    let span = sub_game.number_span() as Number;
    (0..n)
        .map(|t| {
            let numbers: Vec<Number> = (0..sub_game.number_count)
                .map(|k| sub_game.min_number + ((t + k) as Number % span))
                .collect();
            Draw::new(numbers, sub_game).expect("tirage de test invalide")
        })
        .collect()
}

pub fn make_test_sub_game() -> SubGame {
    SubGame::new("test", 0, 1, 10, 3).expect("sous-jeu de test invalide")
}
