use std::collections::BTreeSet;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use lotobench_engine::harness::EvaluationCell;
use lotobench_model::combinations::combination_count;
use lotobench_model::load::draws_header;
use lotobench_model::models::{DrawHistory, Game, Number};

pub fn display_game(game: &Game) {
    println!("\n🎰 Définition du jeu\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Sous-jeu", "Min", "Max", "Largeur", "Étendue", "Combinaisons"]);

    for sub in &game.sub_games {
        table.add_row(vec![
            sub.name.clone(),
            sub.min_number.to_string(),
            sub.max_number.to_string(),
            sub.number_count.to_string(),
            sub.number_span().to_string(),
            combination_count(sub).to_string(),
        ]);
    }
    println!("{table}");
    println!("\nTotal : {} numéros par tirage", game.total_number_count);
    println!("En-tête d'historique attendu : {}", draws_header(game).join(","));
}

pub fn display_draws(game: &Game, histories: &[DrawHistory], last: usize) {
    let total = histories.first().map(|h| h.len()).unwrap_or(0);
    if total == 0 {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    let mut header = vec!["#".to_string()];
    header.extend(game.sub_games.iter().map(|s| s.name.clone()));
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    let start = total.saturating_sub(last);
    for t in start..total {
        let mut row = vec![format!("{}", t + 1)];
        for sub in &game.sub_games {
            let numbers = &histories[sub.index].draws[t].numbers;
            row.push(
                numbers
                    .iter()
                    .map(|n| format!("{:2}", n))
                    .collect::<Vec<_>>()
                    .join(" - "),
            );
        }
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_report(game: &Game, cells: &[EvaluationCell]) {
    println!("\n📊 Taux de réussite par heuristique (% des tirages de test)");

    for sub in &game.sub_games {
        println!("\n── {} ──", sub.name);

        let mut table = Table::new();
        let mut header = vec![Cell::new("Heuristique")];
        for hits in 0..=sub.number_count {
            header.push(Cell::new(format!("{} réussite(s)", hits)));
        }
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);

        for cell in cells.iter().filter(|c| c.sub_game == sub.name) {
            let mut row = vec![Cell::new(&cell.algorithm)];
            for hits in 0..=sub.number_count {
                let pct = cell.percentage(hits);
                // Vert dès qu'une heuristique place au moins un numéro.
                let color = if hits > 0 && pct > 0.0 {
                    Color::Green
                } else {
                    Color::White
                };
                row.push(Cell::new(format!("{:.2}", pct)).fg(color));
            }
            table.add_row(row);
        }
        println!("{table}");
    }
}

pub fn display_predictions(algorithm: &str, predictions: &[(String, BTreeSet<Number>)]) {
    println!("\n🎯 Prédiction ({algorithm})\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Sous-jeu", "Numéros"]);

    for (name, numbers) in predictions {
        let numbers_str = if numbers.is_empty() {
            "—".to_string()
        } else {
            numbers
                .iter()
                .map(|n| format!("{:2}", n))
                .collect::<Vec<_>>()
                .join(" - ")
        };
        table.add_row(vec![name.clone(), numbers_str]);
    }
    println!("{table}");
}
