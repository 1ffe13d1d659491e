use crate::cli::{Args, Command};
use std::path::Path;
use tracing::{info, warn};

use tabellone::config::Config;
use tabellone::error::AppError;
use tabellone::models::{Bracket, CategoryExecutionState, Match, Participant, ScoreSheet};
use tabellone::results::CompetitionResults;
use tabellone::store::{
    ExecutionService, JsonCatalog, SqliteExecutionStore, draw_letter,
};

pub type Service = ExecutionService<SqliteExecutionStore, JsonCatalog>;

const RULE: &str = "────────────────────────────────────";

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-database, --set-catalog,
/// --set-log-file, --clear-log-file) and saves the result.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_default();

    if let Some(database_path) = &args.new_database_path {
        config.database_path = database_path.clone();
    }
    if let Some(catalog_path) = &args.new_catalog_path {
        config.catalog_path = catalog_path.clone();
    }
    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Opens the database and catalog named by the flags or the config
pub async fn open_service(args: &Args, config: &Config) -> Result<Service, AppError> {
    let database_path = args.database.as_ref().unwrap_or(&config.database_path);
    let catalog_path = args.catalog.as_ref().unwrap_or(&config.catalog_path);

    let store = SqliteExecutionStore::open(Path::new(database_path))?;
    let catalog = if Path::new(catalog_path).exists() {
        JsonCatalog::load(Path::new(catalog_path)).await?
    } else {
        warn!("Category catalog not found at {catalog_path}, continuing without categories");
        JsonCatalog::default()
    };
    Ok(ExecutionService::new(store, catalog))
}

/// Runs one subcommand against the service and prints its outcome
pub fn run_command(service: &Service, command: &Command) -> Result<(), AppError> {
    match command {
        Command::Start {
            category,
            competition,
            letter,
        } => {
            let letter = match letter {
                Some(letter) => letter.clone(),
                None => {
                    let drawn = draw_letter(&mut rand::rng());
                    info!("Drew letter {drawn} for competition {competition}");
                    drawn
                }
            };
            let outcome = service.start(*category, *competition, &letter)?;
            let state = service.get(outcome.id)?;
            if outcome.created {
                println!("Started execution {}", outcome.id);
            } else {
                println!("Execution {} was already started", outcome.id);
            }
            print_execution(&state);
        }
        Command::Show { execution, json } => {
            let state = service.get(*execution)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print_execution(&state);
            }
        }
        Command::Assign {
            execution,
            match_id,
            slot,
            athlete,
        } => {
            let state = service.assign_player(*execution, match_id, *slot, *athlete)?;
            print_execution(&state);
        }
        Command::Score {
            execution,
            match_id,
            athlete,
            value,
        } => {
            let state = service.set_score(*execution, match_id, *athlete, *value)?;
            print_execution(&state);
        }
        Command::Winner {
            execution,
            match_id,
            athlete,
        } => {
            let state = service.set_winner(*execution, match_id, *athlete)?;
            print_execution(&state);
        }
        Command::Judge {
            execution,
            athlete,
            judge,
            value,
        } => {
            let judge_index = usize::from(*judge).saturating_sub(1);
            let state = service.set_judge_score(*execution, *athlete, judge_index, value)?;
            print_execution(&state);
        }
        Command::Commission { execution, names } => {
            let state = service.set_commission(*execution, names.clone())?;
            print_execution(&state);
        }
        Command::Results { competition, json } => {
            let results = service.results(*competition)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_results(&results);
            }
        }
    }
    Ok(())
}

fn name_of(participant: &Participant) -> String {
    if participant.club.is_empty() {
        participant.display_name()
    } else {
        format!("{} ({})", participant.display_name(), participant.club)
    }
}

fn describe_slot(m: &Match, slot: usize) -> String {
    match &m.players[slot] {
        Some(p) => match m.scores.get(&p.athlete_id) {
            Some(score) => format!("{} {score}", name_of(p)),
            None => name_of(p),
        },
        None if m.from.get(slot).is_some_and(Option::is_some) => "(in attesa)".to_string(),
        None => "-".to_string(),
    }
}

fn print_bracket(bracket: &Bracket) {
    for (round, matches) in bracket.rounds.iter().enumerate() {
        println!("{RULE}");
        println!("{}", bracket.round_label(round));
        for m in &matches.matches {
            let winner = m
                .winner
                .as_ref()
                .map(|w| format!("  -> {}", w.display_name()))
                .unwrap_or_default();
            println!(
                "  {:<6} {}  vs  {}{}",
                m.id,
                describe_slot(m, 0),
                describe_slot(m, 1),
                winner
            );
        }
    }
}

fn print_score_sheet(state: &CategoryExecutionState, sheet: &ScoreSheet) {
    println!("{RULE}");
    println!("Punteggi");
    for (athlete_id, judges) in sheet.rows() {
        let name = state
            .participant(*athlete_id)
            .map(name_of)
            .unwrap_or_else(|| athlete_id.to_string());
        let cells: Vec<String> = judges
            .iter()
            .map(|v| v.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".to_string()))
            .collect();
        let average = sheet
            .average(*athlete_id)
            .map(|a| format!("{a:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<30} [{}]  media {}", name, cells.join(" "), average);
    }
}

/// Prints an execution in the terminal
pub fn print_execution(state: &CategoryExecutionState) {
    println!(
        "\nEsecuzione {}  categoria {}  competizione {}",
        state.id, state.category_id, state.competition_id
    );
    println!("Lettera estratta: {}   Stato: {}", state.extracted_letter, state.status.as_str());
    if let Some(commission) = state.commission.as_ref().filter(|c| !c.is_empty()) {
        println!("Commissione: {}", commission.join(", "));
    }

    if let Some(bracket) = &state.bracket {
        print_bracket(bracket);
    }
    if let Some(sheet) = &state.scores {
        print_score_sheet(state, sheet);
    }

    println!("{RULE}");
    println!("Classifica");
    if state.classification.is_empty() {
        println!("  (non disponibile)");
    }
    for entry in &state.classification {
        let name = state
            .participant(entry.athlete_id)
            .map(name_of)
            .unwrap_or_else(|| entry.athlete_id.to_string());
        println!("  {}. {}", entry.position, name);
    }
}

/// Prints the competition results in the terminal
pub fn print_results(results: &CompetitionResults) {
    println!("\nMedagliere atleti");
    println!("{RULE}");
    for (i, a) in results.athletes.iter().enumerate() {
        println!(
            "{:>3}. {:<28} {:<20} {:<14} {:>2}O {:>2}A {:>2}B  {:>3} pt",
            i + 1,
            format!("{} {}", a.last_name, a.first_name),
            a.club,
            a.bucket.to_string(),
            a.gold,
            a.silver,
            a.bronze,
            a.points
        );
    }

    println!("\nClassifica società");
    println!("{RULE}");
    for (i, club) in results.clubs.entries.iter().enumerate() {
        let marker = if i < results.clubs.podium().len() { "*" } else { " " };
        println!(
            "{marker}{:>2}. {:<28} {:>2}O {:>2}A {:>2}B  {:>3} pt",
            i + 1,
            club.club,
            club.gold,
            club.silver,
            club.bronze,
            club.points
        );
    }

    println!("\nMigliori per fascia");
    println!("{RULE}");
    for leaders in &results.best_per_bucket {
        let names: Vec<String> = leaders
            .athletes
            .iter()
            .map(|a| format!("{} {}", a.last_name, a.first_name))
            .collect();
        println!(
            "  {:<16} {:<5} {:>3} pt  {}",
            leaders.bucket.to_string(),
            leaders.gender.as_str(),
            leaders.points,
            names.join(", ")
        );
    }
}
