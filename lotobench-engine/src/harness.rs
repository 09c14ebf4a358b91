use lotobench_model::models::{DrawHistory, Game, SubGame};
use lotobench_model::{Error, Result};

use crate::algorithms::{all_algorithms, AlgorithmParams, PredictionAlgorithm};

/// Histogramme de réussite d'un algorithme sur un sous-jeu : la case h
/// compte les tirages de test dont exactement h numéros tirés figuraient
/// dans l'ensemble prédit.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationCell {
    pub algorithm: String,
    pub sub_game: String,
    pub histogram: Vec<u32>,
    pub test_count: u32,
}

impl EvaluationCell {
    pub fn percentage(&self, hits: usize) -> f64 {
        if self.test_count == 0 {
            return 0.0;
        }
        self.histogram.get(hits).copied().unwrap_or(0) as f64 / self.test_count as f64 * 100.0
    }
}

/// Taille de l'échantillon d'ajustement : 2/3 de l'historique, le reste
/// est tenu à l'écart pour le test.
pub fn sample_len(total: usize) -> usize {
    total * 2 / 3
}

/// Évalue une famille d'algorithmes sur un sous-jeu.
///
/// Machine à états : initialisation sur l'échantillon, puis marche avant
/// sur les tirages tenus à l'écart — à chaque pas, `previous` grandit
/// jusqu'au tirage cible exclu. Aucune fuite du futur.
pub fn evaluate_sub_game(
    sub_game: &SubGame,
    history: &DrawHistory,
    algorithms: &mut [Box<dyn PredictionAlgorithm>],
) -> Result<Vec<EvaluationCell>> {
    let draws = &history.draws;
    if draws.len() < 3 {
        return Err(Error::InvalidArgument(format!(
            "historique trop court pour '{}' : {} tirages (minimum 3)",
            sub_game.name,
            draws.len()
        )));
    }

    let split = sample_len(draws.len());
    let sample = &draws[..split];

    let mut cells: Vec<EvaluationCell> = algorithms
        .iter()
        .map(|a| EvaluationCell {
            algorithm: a.name().to_string(),
            sub_game: sub_game.name.clone(),
            histogram: vec![0; sub_game.number_count + 1],
            test_count: 0,
        })
        .collect();

    for algo in algorithms.iter_mut() {
        algo.initialize(sub_game, sample)?;
    }

    for t in split..draws.len() {
        let previous = &draws[..t];
        let target = &draws[t];
        for (a, algo) in algorithms.iter_mut().enumerate() {
            let predicted = algo.predict(sub_game, previous, sub_game.number_count)?;
            let hits = target
                .numbers
                .iter()
                .filter(|n| predicted.contains(n))
                .count();
            cells[a].histogram[hits] += 1;
            cells[a].test_count += 1;
        }
    }

    Ok(cells)
}

/// Évalue la famille complète sur tous les sous-jeux. Chaque sous-jeu
/// reçoit des instances fraîches (l'initialisation est par sous-jeu) et un
/// seed décalé pour que la ligne de base ne rejoue pas la même séquence.
pub fn evaluate_game(
    game: &Game,
    histories: &[DrawHistory],
    params: &AlgorithmParams,
) -> Result<Vec<EvaluationCell>> {
    if histories.len() != game.sub_games.len() {
        return Err(Error::InvalidArgument(format!(
            "{} historiques pour {} sous-jeux",
            histories.len(),
            game.sub_games.len()
        )));
    }

    let mut cells = Vec::new();
    for sub in &game.sub_games {
        let mut sub_params = params.clone();
        sub_params.seed = params.seed.wrapping_add(sub.index as u64);
        let mut algorithms = all_algorithms(&sub_params)?;
        cells.extend(evaluate_sub_game(sub, &histories[sub.index], &mut algorithms)?);
    }
    Ok(cells)
}
