use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Taxonomie d'erreurs partagée par tout le workspace.
///
/// `Format` : fichier d'entrée malformé, fatal au chargement complet.
/// `InvalidArgument` : paramètre ou dimension invalide, levé immédiatement
/// à la frontière de l'appel, jamais corrigé en silence.
///
/// Un résultat vide (aucun motif trouvé, aucune prédiction) n'est PAS une
/// erreur : il se représente par une liste ou un ensemble vide.
#[derive(Debug, Error)]
pub enum Error {
    #[error("format invalide : {0}")]
    Format(String),

    #[error("argument invalide : {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
