use std::io::Write;

use lotobench_model::models::Game;
use lotobench_model::{Error, Result};

use crate::harness::EvaluationCell;

/// En-tête du rapport : une colonne par paire (sous-jeu, nombre de
/// réussites), dans l'ordre des sous-jeux.
/// `Algorithm, boules_0, ..., boules_5, etoiles_0, ..., etoiles_2`
pub fn report_header(game: &Game) -> Vec<String> {
    let mut header = vec!["Algorithm".to_string()];
    for sub in &game.sub_games {
        for hits in 0..=sub.number_count {
            header.push(format!("{}_{}", sub.name, hits));
        }
    }
    header
}

/// Reconstruit la disposition (nom de sous-jeu, largeur de tirage) depuis
/// un en-tête de rapport. Propriété aller-retour : l'en-tête produit par
/// [`report_header`] se relit en la disposition du jeu d'origine.
pub fn parse_header(fields: &[String]) -> Result<Vec<(String, usize)>> {
    let mut fields_iter = fields.iter();
    match fields_iter.next() {
        Some(first) if first == "Algorithm" => {}
        _ => return Err(Error::Format("en-tête de rapport sans colonne Algorithm".into())),
    }

    let mut layout: Vec<(String, usize)> = Vec::new();
    for field in fields_iter {
        let (name, hits) = field
            .rsplit_once('_')
            .ok_or_else(|| Error::Format(format!("colonne de rapport invalide : '{}'", field)))?;
        let hits: usize = hits
            .parse()
            .map_err(|_| Error::Format(format!("colonne de rapport invalide : '{}'", field)))?;

        match layout.last_mut() {
            Some((last_name, last_hits)) if last_name.as_str() == name => {
                if hits != *last_hits + 1 {
                    return Err(Error::Format(format!(
                        "colonnes de '{}' non consécutives : {} après {}",
                        name, hits, last_hits
                    )));
                }
                *last_hits = hits;
            }
            _ => {
                if hits != 0 {
                    return Err(Error::Format(format!(
                        "le sous-jeu '{}' ne commence pas à 0",
                        name
                    )));
                }
                if layout.iter().any(|(n, _)| n == name) {
                    return Err(Error::Format(format!(
                        "sous-jeu '{}' fragmenté dans l'en-tête",
                        name
                    )));
                }
                layout.push((name.to_string(), 0));
            }
        }
    }

    if layout.is_empty() {
        return Err(Error::Format("en-tête de rapport sans sous-jeu".into()));
    }
    Ok(layout)
}

/// Écrit le rapport tabulaire : une ligne par algorithme, une cellule par
/// (sous-jeu, nombre de réussites), en pourcentage des tirages de test.
pub fn write_report<W: Write>(writer: W, game: &Game, cells: &[EvaluationCell]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(report_header(game))?;

    // Ordre des lignes : ordre de première apparition des algorithmes.
    let mut algorithms: Vec<&str> = Vec::new();
    for cell in cells {
        if !algorithms.contains(&cell.algorithm.as_str()) {
            algorithms.push(&cell.algorithm);
        }
    }

    for algorithm in algorithms {
        let mut row = vec![algorithm.to_string()];
        for sub in &game.sub_games {
            let cell = cells
                .iter()
                .find(|c| c.algorithm == algorithm && c.sub_game == sub.name)
                .ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "cellule manquante : {} / {}",
                        algorithm, sub.name
                    ))
                })?;
            for hits in 0..=sub.number_count {
                row.push(format!("{:.2}", cell.percentage(hits)));
            }
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
