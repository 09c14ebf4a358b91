use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{Number, SubGame};

/// Énumère toutes les combinaisons croissantes de `number_count` numéros
/// dans [min, max]. Itératif avec un vecteur d'indices explicite : pas de
/// récursion, la profondeur ne dépend pas de la taille du pool.
pub struct CombinationIter {
    min: Number,
    span: usize,
    count: usize,
    indices: Vec<usize>,
    done: bool,
}

impl CombinationIter {
    pub fn new(sub_game: &SubGame) -> Self {
        let span = sub_game.number_span();
        let count = sub_game.number_count;
        Self {
            min: sub_game.min_number,
            span,
            count,
            indices: (0..count).collect(),
            done: count > span,
        }
    }
}

impl Iterator for CombinationIter {
    type Item = Vec<Number>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let combo: Vec<Number> = self
            .indices
            .iter()
            .map(|&i| self.min + i as Number)
            .collect();

        // Avance : incrémente l'indice le plus à droite qui a encore de la
        // marge, puis tasse les suivants juste derrière lui.
        let mut j = self.count;
        loop {
            if j == 0 {
                self.done = true;
                break;
            }
            j -= 1;
            if self.indices[j] < self.span - self.count + j {
                self.indices[j] += 1;
                for k in (j + 1)..self.count {
                    self.indices[k] = self.indices[k - 1] + 1;
                }
                break;
            }
        }

        Some(combo)
    }
}

pub fn enumerate_draws(sub_game: &SubGame) -> CombinationIter {
    CombinationIter::new(sub_game)
}

/// C(span, count), en u128 intermédiaire pour limiter les débordements.
pub fn combination_count(sub_game: &SubGame) -> u64 {
    let n = sub_game.number_span() as u128;
    let k = sub_game.number_count as u128;
    if k > n {
        return 0;
    }
    let mut result: u128 = 1;
    for i in 1..=k {
        result = result * (n - k + i) / i;
    }
    result as u64
}

fn cache_path(sub_game: &SubGame, cache_dir: &Path) -> PathBuf {
    cache_dir.join(format!("{}_combinations.json", sub_game.name))
}

/// Cache get-or-compute : relit le fichier s'il existe, sinon énumère et
/// écrit. Artefact purement régénérable, jamais requis pour la justesse.
pub fn load_or_enumerate(sub_game: &SubGame, cache_dir: &Path) -> Result<Vec<Vec<Number>>> {
    let path = cache_path(sub_game, cache_dir);

    if path.exists() {
        let json = fs::read_to_string(&path)?;
        let combos: Vec<Vec<Number>> = serde_json::from_str(&json)?;
        if combos.iter().any(|c| c.len() != sub_game.number_count) {
            return Err(Error::Format(format!(
                "cache corrompu : {}",
                path.display()
            )));
        }
        return Ok(combos);
    }

    let combos: Vec<Vec<Number>> = enumerate_draws(sub_game).collect();
    fs::create_dir_all(cache_dir)?;
    fs::write(&path, serde_json::to_string(&combos)?)?;
    Ok(combos)
}
