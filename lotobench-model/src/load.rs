use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, Result};
use crate::models::{Draw, DrawHistory, Game, Number, SubGame};

/// En-tête attendu du fichier de définition de jeu.
pub const GAME_HEADER: [&str; 4] = ["SubGame", "MinNumber", "MaxNumber", "NumberCount"];

pub fn load_game(path: &Path) -> Result<Game> {
    let file = File::open(path)?;
    load_game_from_reader(file)
}

/// Charge la définition de jeu depuis un flux tabulaire.
/// Tout champ manquant, nul ou désordonné (min >= max) est fatal.
pub fn load_game_from_reader<R: Read>(reader: R) -> Result<Game> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    check_game_header(&headers)?;

    let mut sub_games = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 2; // ligne 1 = en-tête
        if record.len() != GAME_HEADER.len() {
            return Err(Error::Format(format!(
                "ligne {} : {} champs (attendu {})",
                row,
                record.len(),
                GAME_HEADER.len()
            )));
        }

        let name = &record[0];
        if name.is_empty() {
            return Err(Error::Format(format!("ligne {} : nom de sous-jeu vide", row)));
        }
        if sub_games.iter().any(|s: &SubGame| s.name == name) {
            return Err(Error::Format(format!("ligne {} : sous-jeu '{}' dupliqué", row, name)));
        }

        let min = parse_field(&record, 1, row)?;
        let max = parse_field(&record, 2, row)?;
        let count = parse_field(&record, 3, row)?;
        if count <= 0 {
            return Err(Error::Format(format!(
                "ligne {} : largeur de tirage {} invalide",
                row, count
            )));
        }

        let sub = SubGame::new(name, sub_games.len(), min, max, count as usize)
            .map_err(|e| Error::Format(format!("ligne {} : {}", row, e)))?;
        sub_games.push(sub);
    }

    if sub_games.is_empty() {
        return Err(Error::Format("aucun sous-jeu défini".into()));
    }
    Game::new(sub_games)
}

fn check_game_header(headers: &StringRecord) -> Result<()> {
    let matches = headers.len() == GAME_HEADER.len()
        && headers.iter().zip(GAME_HEADER.iter()).all(|(a, b)| a == *b);
    if !matches {
        return Err(Error::Format(format!(
            "en-tête de définition invalide : attendu '{}'",
            GAME_HEADER.join(",")
        )));
    }
    Ok(())
}

fn parse_field(record: &StringRecord, idx: usize, row: usize) -> Result<Number> {
    let raw = record
        .get(idx)
        .ok_or_else(|| Error::Format(format!("ligne {} : champ {} manquant", row, idx)))?;
    raw.parse::<Number>()
        .map_err(|_| Error::Format(format!("ligne {} : '{}' n'est pas un entier", row, raw)))
}

/// En-tête de l'historique : une colonne par emplacement de numéro,
/// concaténées dans l'ordre des sous-jeux (`boules_1`, ..., `etoiles_2`).
pub fn draws_header(game: &Game) -> Vec<String> {
    let mut header = Vec::with_capacity(game.total_number_count);
    for sub in &game.sub_games {
        for k in 1..=sub.number_count {
            header.push(format!("{}_{}", sub.name, k));
        }
    }
    header
}

pub fn load_draws(path: &Path, game: &Game) -> Result<Vec<DrawHistory>> {
    let file = File::open(path)?;
    load_draws_from_reader(file, game)
}

/// Charge l'historique complet. Une ligne invalide interrompt tout le
/// chargement : aucun tirage partiel n'est conservé.
pub fn load_draws_from_reader<R: Read>(reader: R, game: &Game) -> Result<Vec<DrawHistory>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.len() != game.total_number_count {
        return Err(Error::Format(format!(
            "en-tête d'historique : {} colonnes (attendu {})",
            headers.len(),
            game.total_number_count
        )));
    }

    let mut histories: Vec<DrawHistory> = game
        .sub_games
        .iter()
        .map(|s| DrawHistory::new(s.index))
        .collect();

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 2;
        if record.len() != game.total_number_count {
            return Err(Error::Format(format!(
                "ligne {} : {} colonnes (attendu {})",
                row,
                record.len(),
                game.total_number_count
            )));
        }

        let mut offset = 0usize;
        for sub in &game.sub_games {
            let mut numbers = Vec::with_capacity(sub.number_count);
            for k in 0..sub.number_count {
                let raw = &record[offset + k];
                let n = raw.parse::<Number>().map_err(|_| {
                    Error::Format(format!("ligne {} : '{}' n'est pas un entier", row, raw))
                })?;
                numbers.push(n);
            }
            offset += sub.number_count;

            let draw = Draw::new(numbers, sub)
                .map_err(|e| Error::Format(format!("ligne {} : {}", row, e)))?;
            histories[sub.index].push(draw);
        }
    }

    Ok(histories)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_CSV: &str = "\
SubGame,MinNumber,MaxNumber,NumberCount
boules,1,50,5
etoiles,1,12,2
";

    #[test]
    fn test_load_game_ok() {
        let game = load_game_from_reader(GAME_CSV.as_bytes()).unwrap();
        assert_eq!(game.sub_games.len(), 2);
        assert_eq!(game.total_number_count, 7);
        assert_eq!(game.sub_games[0].name, "boules");
        assert_eq!(game.sub_games[1].min_number, 1);
        assert_eq!(game.sub_games[1].max_number, 12);
    }

    #[test]
    fn test_load_game_bad_header() {
        let csv = "Nom,Min,Max,Largeur\nboules,1,50,5\n";
        assert!(matches!(
            load_game_from_reader(csv.as_bytes()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_load_game_min_ge_max() {
        let csv = "SubGame,MinNumber,MaxNumber,NumberCount\nboules,50,1,5\n";
        assert!(matches!(
            load_game_from_reader(csv.as_bytes()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_load_game_zero_count() {
        let csv = "SubGame,MinNumber,MaxNumber,NumberCount\nboules,1,50,0\n";
        assert!(matches!(
            load_game_from_reader(csv.as_bytes()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_load_game_not_integer() {
        let csv = "SubGame,MinNumber,MaxNumber,NumberCount\nboules,un,50,5\n";
        assert!(matches!(
            load_game_from_reader(csv.as_bytes()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_load_game_duplicate_name() {
        let csv = "SubGame,MinNumber,MaxNumber,NumberCount\nboules,1,50,5\nboules,1,12,2\n";
        assert!(matches!(
            load_game_from_reader(csv.as_bytes()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_load_game_empty() {
        let csv = "SubGame,MinNumber,MaxNumber,NumberCount\n";
        assert!(matches!(
            load_game_from_reader(csv.as_bytes()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_draws_header_layout() {
        let game = load_game_from_reader(GAME_CSV.as_bytes()).unwrap();
        let header = draws_header(&game);
        assert_eq!(header.len(), 7);
        assert_eq!(header[0], "boules_1");
        assert_eq!(header[4], "boules_5");
        assert_eq!(header[5], "etoiles_1");
        assert_eq!(header[6], "etoiles_2");
    }

    #[test]
    fn test_load_draws_ok() {
        let game = load_game_from_reader(GAME_CSV.as_bytes()).unwrap();
        let csv = "\
boules_1,boules_2,boules_3,boules_4,boules_5,etoiles_1,etoiles_2
1,2,3,4,5,1,2
10,20,30,40,50,11,12
";
        let histories = load_draws_from_reader(csv.as_bytes(), &game).unwrap();
        assert_eq!(histories.len(), 2);
        assert_eq!(histories[0].len(), 2);
        assert_eq!(histories[1].len(), 2);
        assert_eq!(histories[0].draws[1].numbers, vec![10, 20, 30, 40, 50]);
        assert_eq!(histories[1].draws[0].numbers, vec![1, 2]);
    }

    #[test]
    fn test_load_draws_wrong_column_count() {
        let game = load_game_from_reader(GAME_CSV.as_bytes()).unwrap();
        let csv = "a,b,c\n1,2,3\n";
        assert!(matches!(
            load_draws_from_reader(csv.as_bytes(), &game),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_load_draws_zero_rejected() {
        // Un 0 pour un sous-jeu dont min=1 doit être fatal, sans tirage
        // partiel conservé.
        let game = load_game_from_reader(GAME_CSV.as_bytes()).unwrap();
        let csv = "\
boules_1,boules_2,boules_3,boules_4,boules_5,etoiles_1,etoiles_2
1,2,3,4,5,1,2
0,2,3,4,5,1,2
";
        let result = load_draws_from_reader(csv.as_bytes(), &game);
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_load_draws_out_of_range() {
        let game = load_game_from_reader(GAME_CSV.as_bytes()).unwrap();
        let csv = "\
boules_1,boules_2,boules_3,boules_4,boules_5,etoiles_1,etoiles_2
1,2,3,4,51,1,2
";
        assert!(matches!(
            load_draws_from_reader(csv.as_bytes(), &game),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_load_draws_empty_history() {
        let game = load_game_from_reader(GAME_CSV.as_bytes()).unwrap();
        let csv = "boules_1,boules_2,boules_3,boules_4,boules_5,etoiles_1,etoiles_2\n";
        let histories = load_draws_from_reader(csv.as_bytes(), &game).unwrap();
        assert!(histories.iter().all(|h| h.is_empty()));
    }
}
