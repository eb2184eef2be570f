use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Strength program progression tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog program id (overrides the configured default)
    #[arg(long, global = true)]
    program: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current weight and stage for every slot (default)
    Status,

    /// Show the replayed history and stats for one exercise
    History {
        /// Exercise id (e.g. squat, bench)
        #[arg(long)]
        exercise: String,
    },

    /// Export one exercise's history to CSV
    Export {
        /// Exercise id
        #[arg(long)]
        exercise: String,

        /// Output CSV path
        #[arg(long)]
        out: PathBuf,
    },

    /// List the built-in programs
    Programs,

    /// Validate a program definition
    Validate {
        /// Stored definition JSON to validate (defaults to the active program)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let program_id = cli
        .program
        .unwrap_or_else(|| config.data.default_program.clone());

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&data_dir, &program_id, &config),
        Some(Commands::History { exercise }) => {
            cmd_history(&data_dir, &program_id, &exercise, &config)
        }
        Some(Commands::Export { exercise, out }) => {
            cmd_export(&data_dir, &program_id, &exercise, &out)
        }
        Some(Commands::Programs) => cmd_programs(),
        Some(Commands::Validate { file }) => cmd_validate(&data_dir, &program_id, file.as_deref()),
    }
}

/// Resolve the active program definition
///
/// A `program.json` in the data directory overrides the catalog; either
/// way the definition must pass validation before any replay runs — a
/// malformed definition blocks progression display entirely rather than
/// rendering wrong numbers.
fn load_active_program(data_dir: &Path, program_id: &str) -> Result<ProgramDefinition> {
    let override_path = data_dir.join("program.json");
    let definition = if override_path.exists() {
        load_program(&override_path)?
    } else {
        get_default_catalog()
            .programs
            .get(program_id)
            .cloned()
            .ok_or_else(|| {
                Error::Other(format!(
                    "Unknown program '{}'. Run `liftlog programs` to list the catalog.",
                    program_id
                ))
            })?
    };

    let errors = definition.validate();
    if !errors.is_empty() {
        eprintln!("Program definition validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Validation(format!(
            "program '{}' failed validation",
            definition.id
        )));
    }

    Ok(definition)
}

fn load_instance(data_dir: &Path) -> Result<(StartWeights, ResultLog)> {
    let start_weights = load_start_weights(&data_dir.join("start_weights.json"))?;
    let results = load_result_log(&data_dir.join("results.json"))?;
    Ok((start_weights, results))
}

/// Exercise display names, falling back to raw ids when hydration fails
fn exercise_names(definition: &ProgramDefinition) -> std::collections::HashMap<String, String> {
    match hydrate_program(definition) {
        HydrationOutcome::Hydrated(days) => days
            .into_iter()
            .flat_map(|d| d.slots)
            .map(|s| (s.exercise_id, s.exercise_name))
            .collect(),
        HydrationOutcome::Failed { missing } => {
            eprintln!(
                "Warning: could not resolve exercise names for {:?}; showing ids",
                missing
            );
            std::collections::HashMap::new()
        }
    }
}

fn cmd_status(data_dir: &Path, program_id: &str, config: &Config) -> Result<()> {
    let definition = load_active_program(data_dir, program_id)?;
    let (start_weights, results) = load_instance(data_dir)?;

    let states = current_states(&definition, &start_weights, &results)?;
    let names = exercise_names(&definition);
    let unit = &config.display.weight_unit;

    println!("{} — {} recorded results", definition.name, results.len());
    println!();

    for day in &definition.days {
        println!("{}", day.name);
        for slot in &day.slots {
            // Every slot has state after a replay; guard anyway for
            // display robustness
            let Some(state) = states.get(&slot.id) else {
                continue;
            };
            let name = names
                .get(&slot.exercise_id)
                .map(String::as_str)
                .unwrap_or(&slot.exercise_id);
            let stage = slot.stages[state.stage];
            println!(
                "  [{:?}] {:<20} {:>6} {}  stage {}/{} ({}x{})",
                slot.tier,
                name,
                state.weight,
                unit,
                state.stage + 1,
                slot.stages.len(),
                stage.sets,
                stage.reps,
            );
        }
    }

    Ok(())
}

fn cmd_history(data_dir: &Path, program_id: &str, exercise: &str, config: &Config) -> Result<()> {
    let definition = load_active_program(data_dir, program_id)?;
    let (start_weights, results) = load_instance(data_dir)?;

    let snapshots = replay(&definition, &start_weights, &results)?;
    let series = exercise_series(&snapshots, exercise);

    if series.is_empty() {
        println!("No history for exercise '{}'", exercise);
        return Ok(());
    }

    let names = exercise_names(&definition);
    let name = names
        .get(exercise)
        .map(String::as_str)
        .unwrap_or(exercise);
    let unit = &config.display.weight_unit;

    println!("{} — {}", definition.name, name);
    println!();
    println!("{:>7}  {:<6} {:>8}  {:>5}  result", "workout", "day", "weight", "stage");
    for snapshot in &series {
        let result = match snapshot.result {
            Some(Outcome::Success) => "success",
            Some(Outcome::Fail) => "fail",
            None => "-",
        };
        println!(
            "{:>7}  {:<6} {:>6} {}  {:>5}  {}",
            snapshot.workout_index,
            snapshot.day_name,
            snapshot.weight,
            unit,
            snapshot.stage_display,
            result,
        );
    }

    let stats = calculate_stats(&series);
    println!();
    println!(
        "Recorded: {} ({} success / {} fail, {}% success rate)",
        stats.total, stats.successes, stats.fails, stats.rate
    );
    println!(
        "Weight: {} -> {} {} (gained {})",
        stats.start_weight, stats.current_weight, unit, stats.gained
    );
    println!("Current stage: {}", stats.current_stage);

    Ok(())
}

fn cmd_export(data_dir: &Path, program_id: &str, exercise: &str, out: &Path) -> Result<()> {
    let definition = load_active_program(data_dir, program_id)?;
    let (start_weights, results) = load_instance(data_dir)?;

    let snapshots = replay(&definition, &start_weights, &results)?;
    let series = exercise_series(&snapshots, exercise);
    let count = write_series_csv(out, &series)?;

    println!("Exported {} rows to {}", count, out.display());
    Ok(())
}

fn cmd_programs() -> Result<()> {
    let catalog = get_default_catalog();

    let mut programs: Vec<_> = catalog.programs.values().collect();
    programs.sort_by(|a, b| a.id.cmp(&b.id));

    for program in programs {
        println!(
            "{:<12} {} — {} days/cycle, {} workouts, {}x/week",
            program.id,
            program.name,
            program.days.len(),
            program.total_workouts,
            program.workouts_per_week,
        );
    }

    Ok(())
}

fn cmd_validate(data_dir: &Path, program_id: &str, file: Option<&Path>) -> Result<()> {
    let definition = match file {
        Some(path) => load_program(path)?,
        None => {
            // Validation errors are the point here, so bypass the
            // fail-on-invalid loader and fetch the raw definition
            let override_path = data_dir.join("program.json");
            if override_path.exists() {
                load_program(&override_path)?
            } else {
                get_default_catalog()
                    .programs
                    .get(program_id)
                    .cloned()
                    .ok_or_else(|| Error::Other(format!("Unknown program '{}'", program_id)))?
            }
        }
    };

    let errors = definition.validate();
    if errors.is_empty() {
        println!("Program '{}' is valid", definition.id);
        Ok(())
    } else {
        println!("Program '{}' has {} validation errors:", definition.id, errors.len());
        for error in &errors {
            println!("  - {}", error);
        }
        Err(Error::Validation(format!(
            "program '{}' failed validation",
            definition.id
        )))
    }
}
