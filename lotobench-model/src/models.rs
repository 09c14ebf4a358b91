use crate::error::{Error, Result};

/// Un numéro tiré. Signé : les projections en deltas (différences entre
/// tirages consécutifs) produisent des valeurs négatives.
pub type Number = i32;

/// Partition du jeu modélisée indépendamment (ex. boules vs étoiles).
/// Immuable une fois construite, possédée exclusivement par le [`Game`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubGame {
    pub name: String,
    pub index: usize,
    pub min_number: Number,
    pub max_number: Number,
    pub number_count: usize,
}

impl SubGame {
    pub fn new(
        name: &str,
        index: usize,
        min_number: Number,
        max_number: Number,
        number_count: usize,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("nom de sous-jeu vide".into()));
        }
        if min_number >= max_number {
            return Err(Error::InvalidArgument(format!(
                "bornes invalides pour '{}' : min={} >= max={}",
                name, min_number, max_number
            )));
        }
        if number_count == 0 {
            return Err(Error::InvalidArgument(format!(
                "largeur de tirage nulle pour '{}'",
                name
            )));
        }
        Ok(Self {
            name: name.trim().to_string(),
            index,
            min_number,
            max_number,
            number_count,
        })
    }

    /// Nombre de valeurs distinctes jouables : max - min + 1.
    pub fn number_span(&self) -> usize {
        (self.max_number - self.min_number + 1) as usize
    }

    pub fn contains(&self, n: Number) -> bool {
        n >= self.min_number && n <= self.max_number
    }

    /// Ramène une valeur issue d'arithmétique de deltas dans [min, max].
    pub fn clamp(&self, n: Number) -> Number {
        n.max(self.min_number).min(self.max_number)
    }
}

/// Suite ordonnée de sous-jeux (ordre = fichier de définition), construite
/// une seule fois au chargement, lecture seule ensuite.
#[derive(Debug, Clone)]
pub struct Game {
    pub sub_games: Vec<SubGame>,
    pub total_number_count: usize,
}

impl Game {
    pub fn new(sub_games: Vec<SubGame>) -> Result<Self> {
        if sub_games.is_empty() {
            return Err(Error::InvalidArgument("jeu sans sous-jeu".into()));
        }
        for (i, sub) in sub_games.iter().enumerate() {
            if sub.index != i {
                return Err(Error::InvalidArgument(format!(
                    "index de sous-jeu incohérent : '{}' porte {} en position {}",
                    sub.name, sub.index, i
                )));
            }
        }
        let total_number_count = sub_games.iter().map(|s| s.number_count).sum();
        Ok(Self { sub_games, total_number_count })
    }

    pub fn sub_game(&self, name: &str) -> Option<&SubGame> {
        self.sub_games.iter().find(|s| s.name == name)
    }
}

/// Un tirage historique : suite de numéros de longueur fixe, chaque
/// élément dans les bornes du sous-jeu propriétaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub numbers: Vec<Number>,
}

impl Draw {
    pub fn new(numbers: Vec<Number>, sub_game: &SubGame) -> Result<Self> {
        if numbers.len() != sub_game.number_count {
            return Err(Error::InvalidArgument(format!(
                "tirage de largeur {} pour '{}' (attendu {})",
                numbers.len(),
                sub_game.name,
                sub_game.number_count
            )));
        }
        for &n in &numbers {
            if !sub_game.contains(n) {
                return Err(Error::InvalidArgument(format!(
                    "numéro {} hors limites ({}-{}) pour '{}'",
                    n, sub_game.min_number, sub_game.max_number, sub_game.name
                )));
            }
        }
        Ok(Self { numbers })
    }
}

/// Historique chronologique des tirages d'un sous-jeu (le plus ancien en
/// premier). Ajout pendant le chargement uniquement, lecture seule pendant
/// l'évaluation.
#[derive(Debug, Clone)]
pub struct DrawHistory {
    pub sub_game_index: usize,
    pub draws: Vec<Draw>,
}

impl DrawHistory {
    pub fn new(sub_game_index: usize) -> Self {
        Self { sub_game_index, draws: Vec::new() }
    }

    pub fn push(&mut self, draw: Draw) {
        self.draws.push(draw);
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

/// Projection paresseuse de la k-ième colonne : vue dérivée, sans
/// possession, recalculée à la demande.
pub fn column(draws: &[Draw], index: usize) -> impl Iterator<Item = Number> + '_ {
    draws.iter().map(move |d| d.numbers[index])
}

pub fn column_values(draws: &[Draw], index: usize) -> Vec<Number> {
    column(draws, index).collect()
}

/// Premières différences de la k-ième colonne : delta[t] = col[t+1] - col[t].
pub fn column_deltas(draws: &[Draw], index: usize) -> Vec<Number> {
    let values = column_values(draws, index);
    values.windows(2).map(|w| w[1] - w[0]).collect()
}
