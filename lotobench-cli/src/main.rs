mod display;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use lotobench_engine::algorithms::{
    all_algorithms, arithmetic::ArithmeticSequence, column_delta::ColumnDeltaPattern,
    column_pattern::ColumnPattern, moving_average::MovingAverage, random::date_seed,
    random::Random, row_pattern::RowPattern, successor::SuccessorFrequency, AlgorithmParams,
    PredictionAlgorithm,
};
use lotobench_engine::harness::evaluate_sub_game;
use lotobench_engine::report::write_report;
use lotobench_model::combinations::{combination_count, load_or_enumerate};
use lotobench_model::load::{load_draws, load_game};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AlgorithmKind {
    Random,
    Successor,
    RowPattern,
    ColumnPattern,
    ColumnDelta,
    Arithmetic,
    MovingAverage,
}

#[derive(Parser)]
#[command(name = "lotobench", about = "Banc d'évaluation d'heuristiques de prédiction de loterie")]
struct Cli {
    /// Fichier de définition du jeu
    #[arg(short, long, default_value = "assets/game.csv", global = true)]
    game: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Évaluer toutes les heuristiques sur les tirages tenus à l'écart
    Evaluate {
        /// Fichier d'historique des tirages
        #[arg(short, long, default_value = "assets/draws.csv")]
        draws: PathBuf,

        /// Fichier de sortie du rapport (CSV)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Prédire le prochain tirage avec une heuristique
    Predict {
        /// Fichier d'historique des tirages
        #[arg(short, long, default_value = "assets/draws.csv")]
        draws: PathBuf,

        /// Heuristique à utiliser
        #[arg(short, long, default_value = "successor")]
        algorithm: AlgorithmKind,

        /// Nombre de numéros demandés (défaut : largeur du sous-jeu)
        #[arg(short, long)]
        count: Option<usize>,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Lister les derniers tirages
    List {
        /// Fichier d'historique des tirages
        #[arg(short, long, default_value = "assets/draws.csv")]
        draws: PathBuf,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Afficher la définition du jeu
    Game,

    /// Énumérer toutes les combinaisons possibles d'un sous-jeu
    Enumerate {
        /// Nom du sous-jeu
        sub_game: String,

        /// Répertoire du cache de combinaisons
        #[arg(long, default_value = "cache")]
        cache_dir: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct Tuning {
    /// Taille de la fenêtre de référence des recherches de motifs
    #[arg(long, default_value = "3")]
    pattern_size: usize,

    /// Écart absolu toléré par élément
    #[arg(long, default_value = "2")]
    value_epsilon: i32,

    /// Dissimilarité cumulée tolérée par fenêtre
    #[arg(long, default_value = "6")]
    pattern_epsilon: i64,

    /// Longueur de progression arithmétique testée
    #[arg(long, default_value = "4")]
    sequence_length: usize,

    /// Résidu toléré pour la progression arithmétique
    #[arg(long, default_value = "2.0")]
    sequence_epsilon: f64,

    /// Fenêtre maximale de la moyenne glissante
    #[arg(long, default_value = "5")]
    average_window: usize,

    /// Seed pour la reproductibilité (défaut : date du jour YYYYMMDD)
    #[arg(long)]
    seed: Option<u64>,
}

impl Tuning {
    fn params(&self) -> AlgorithmParams {
        AlgorithmParams {
            pattern_size: self.pattern_size,
            value_epsilon: self.value_epsilon,
            pattern_epsilon: self.pattern_epsilon,
            sequence_length: self.sequence_length,
            sequence_epsilon: self.sequence_epsilon,
            average_window: self.average_window,
            seed: self.seed.unwrap_or_else(|| {
                let ds = date_seed();
                println!("(Seed du jour : {ds})");
                ds
            }),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let game = load_game(&cli.game)
        .with_context(|| format!("Impossible de charger le jeu {:?}", cli.game))?;

    match cli.command {
        Command::Evaluate { draws, output, tuning } => {
            cmd_evaluate(&game, &draws, output.as_deref(), &tuning.params())
        }
        Command::Predict { draws, algorithm, count, tuning } => {
            cmd_predict(&game, &draws, algorithm, count, &tuning.params())
        }
        Command::List { draws, last } => cmd_list(&game, &draws, last),
        Command::Game => {
            display::display_game(&game);
            Ok(())
        }
        Command::Enumerate { sub_game, cache_dir } => cmd_enumerate(&game, &sub_game, &cache_dir),
    }
}

fn cmd_evaluate(
    game: &lotobench_model::models::Game,
    draws_path: &std::path::Path,
    output: Option<&std::path::Path>,
    params: &AlgorithmParams,
) -> Result<()> {
    let histories = load_draws(draws_path, game)
        .with_context(|| format!("Impossible de charger l'historique {:?}", draws_path))?;

    let family_size = all_algorithms(params)?.len();
    println!(
        "Évaluation de {} heuristiques sur {} sous-jeux...",
        family_size,
        game.sub_games.len()
    );

    let pb = ProgressBar::new((family_size * game.sub_games.len()) as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("=> "));

    let mut cells = Vec::new();
    for sub in &game.sub_games {
        // Instances fraîches par sous-jeu, seed décalé pour la ligne de base.
        let mut sub_params = params.clone();
        sub_params.seed = params.seed.wrapping_add(sub.index as u64);

        for algorithm in all_algorithms(&sub_params)? {
            pb.set_message(format!("{} ({})", algorithm.name(), sub.name));
            let mut single = [algorithm];
            cells.extend(evaluate_sub_game(sub, &histories[sub.index], &mut single)?);
            pb.inc(1);
        }
    }
    pb.finish_with_message("Évaluation terminée");

    display::display_report(game, &cells);

    if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("Impossible de créer {:?}", path))?;
        write_report(file, game, &cells)?;
        println!("\nRapport écrit dans : {}", path.display());
    }

    Ok(())
}

fn build_algorithm(
    kind: AlgorithmKind,
    params: &AlgorithmParams,
) -> Result<Box<dyn PredictionAlgorithm>> {
    let algorithm: Box<dyn PredictionAlgorithm> = match kind {
        AlgorithmKind::Random => Box::new(Random::new(params.seed)),
        AlgorithmKind::Successor => Box::new(SuccessorFrequency::new()),
        AlgorithmKind::RowPattern => Box::new(RowPattern::new(
            params.pattern_size,
            params.value_epsilon,
            params.pattern_epsilon,
        )?),
        AlgorithmKind::ColumnPattern => Box::new(ColumnPattern::new(
            params.pattern_size,
            params.value_epsilon,
            params.pattern_epsilon,
        )?),
        AlgorithmKind::ColumnDelta => Box::new(ColumnDeltaPattern::new(
            params.pattern_size,
            params.value_epsilon,
            params.pattern_epsilon,
        )?),
        AlgorithmKind::Arithmetic => Box::new(ArithmeticSequence::new(
            params.sequence_length,
            params.sequence_epsilon,
        )?),
        AlgorithmKind::MovingAverage => Box::new(MovingAverage::new(params.average_window)?),
    };
    Ok(algorithm)
}

fn cmd_predict(
    game: &lotobench_model::models::Game,
    draws_path: &std::path::Path,
    kind: AlgorithmKind,
    count: Option<usize>,
    params: &AlgorithmParams,
) -> Result<()> {
    let histories = load_draws(draws_path, game)
        .with_context(|| format!("Impossible de charger l'historique {:?}", draws_path))?;

    if histories.iter().all(|h| h.is_empty()) {
        bail!("Historique vide : rien à prédire");
    }

    let mut predictions = Vec::new();
    let mut name = String::new();
    for sub in &game.sub_games {
        let mut algorithm = build_algorithm(kind, params)?;
        name = algorithm.name().to_string();
        let draws = &histories[sub.index].draws;
        algorithm.initialize(sub, draws)?;
        let predicted = algorithm.predict(sub, draws, count.unwrap_or(sub.number_count))?;
        predictions.push((sub.name.clone(), predicted));
    }

    display::display_predictions(&name, &predictions);
    Ok(())
}

fn cmd_list(
    game: &lotobench_model::models::Game,
    draws_path: &std::path::Path,
    last: usize,
) -> Result<()> {
    let histories = load_draws(draws_path, game)
        .with_context(|| format!("Impossible de charger l'historique {:?}", draws_path))?;
    display::display_draws(game, &histories, last);
    Ok(())
}

fn cmd_enumerate(
    game: &lotobench_model::models::Game,
    sub_game_name: &str,
    cache_dir: &std::path::Path,
) -> Result<()> {
    let sub = match game.sub_game(sub_game_name) {
        Some(s) => s,
        None => bail!(
            "Sous-jeu inconnu : '{}'. Disponibles : {}",
            sub_game_name,
            game.sub_games
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    println!(
        "Énumération des combinaisons de '{}' ({} parmi {})...",
        sub.name,
        sub.number_count,
        sub.number_span()
    );

    let combos = load_or_enumerate(sub, cache_dir)
        .with_context(|| format!("Échec de l'énumération pour '{}'", sub.name))?;

    println!(
        "{} combinaisons (attendu : {}), cache : {}",
        combos.len(),
        combination_count(sub),
        cache_dir.join(format!("{}_combinations.json", sub.name)).display()
    );
    Ok(())
}
