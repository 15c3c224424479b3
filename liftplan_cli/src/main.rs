use clap::{Parser, Subcommand};
use liftplan_core::config::DataConfig;
use liftplan_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftplan")]
#[command(about = "Workout program generator and importer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a program (and optionally save it)
    Generate {
        /// Split type (push_pull_legs, upper_lower, full_body, bro_split, custom)
        #[arg(long, default_value = "full_body")]
        split: SplitType,

        /// Available equipment tags, comma separated or repeated
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<String>,

        /// Session length in minutes (30, 45, 60, 75, 90)
        #[arg(long)]
        duration: Option<u32>,

        /// Experience level (beginner, intermediate, advanced)
        #[arg(long, default_value = "beginner")]
        experience: Experience,

        /// Goal (strength, hypertrophy, endurance, general_fitness)
        #[arg(long, default_value = "general_fitness")]
        goal: Goal,

        /// Training days per week (3-6)
        #[arg(long)]
        days: Option<u32>,

        /// Muscle groups to emphasise
        #[arg(long, value_delimiter = ',')]
        focus: Vec<String>,

        /// Label describing a custom split
        #[arg(long)]
        custom_label: Option<String>,

        /// Skip the generation service and use the built-in templates
        #[arg(long)]
        offline: bool,

        /// Print the program as JSON
        #[arg(long)]
        json: bool,

        /// Save the program as routines after confirmation
        #[arg(long)]
        save: bool,

        /// Do not ask for confirmation before saving
        #[arg(long, requires = "save")]
        yes: bool,
    },

    /// List saved programs
    Programs,

    /// Delete every routine of a saved program
    DeleteProgram {
        /// Program grouping key (see `programs`)
        key: String,
    },

    /// Export a saved program to CSV
    Export {
        /// Program grouping key (see `programs`)
        key: String,

        /// Output file
        #[arg(long, short)]
        output: PathBuf,
    },

    /// List catalog exercises
    Catalog,

    /// Write a config file with the default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        liftplan_core::logging::init_with_level("debug");
    } else {
        liftplan_core::logging::init();
    }

    if let Commands::InitConfig { force } = cli.command {
        let path = cli.config.unwrap_or_else(Config::default_config_path);
        return cmd_init_config(&path, force);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Generate {
            split,
            equipment,
            duration,
            experience,
            goal,
            days,
            focus,
            custom_label,
            offline,
            json,
            save,
            yes,
        } => {
            let equipment = if equipment.is_empty() {
                config.defaults.equipment.clone()
            } else {
                equipment
            };
            let mut params = GenerationParams::new(
                split,
                equipment,
                duration.unwrap_or(config.defaults.duration),
                experience,
                goal,
                days.unwrap_or(config.defaults.days_per_week),
            )
            .with_focus_areas(focus);
            if let Some(label) = custom_label {
                params = params.with_custom_split(label);
            }

            cmd_generate(&data_dir, &config, &params, offline, json, save, yes).await
        }
        Commands::Programs => cmd_programs(&data_dir),
        Commands::DeleteProgram { key } => cmd_delete_program(&data_dir, &key),
        Commands::Export { key, output } => cmd_export(&data_dir, &key, &output),
        Commands::Catalog => cmd_catalog(&data_dir),
        Commands::InitConfig { .. } => Ok(()),
    }
}

async fn cmd_generate(
    data_dir: &Path,
    config: &Config,
    params: &GenerationParams,
    offline: bool,
    json: bool,
    save: bool,
    yes: bool,
) -> Result<()> {
    params.validate()?;

    let generator = if offline {
        ProgramGenerator::offline()
    } else {
        ProgramGenerator::from_config(&config.generator)
    };

    let outcome = generator.generate_with_source(params).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.program)?);
    } else {
        display_program(&outcome);
    }

    if !save {
        return Ok(());
    }

    // Keep stdout pure JSON when --json is set
    if !yes && !confirm("Save this program to your routines?", json)? {
        if json {
            eprintln!("Not saved.");
        } else {
            println!("Not saved.");
        }
        return Ok(());
    }

    let mut catalog = JsonlCatalogStore::open(DataConfig::catalog_path(data_dir))?;
    let mut routines = JsonlRoutineStore::new(DataConfig::routines_path(data_dir));

    // Store errors leave earlier routines in place; the program can be saved again.
    let records = reconcile_and_save(&outcome.program, &mut catalog, &mut routines)?;

    let key = records
        .first()
        .map(|r| r.program_id.clone())
        .unwrap_or_default();
    if json {
        eprintln!("Saved {} routines ({})", records.len(), key);
    } else {
        println!("\n✓ Saved {} routines", records.len());
        println!("  Program key: {}", key);
    }

    Ok(())
}

fn cmd_programs(data_dir: &Path) -> Result<()> {
    let routines = JsonlRoutineStore::new(DataConfig::routines_path(data_dir));
    let programs = routines.list_programs()?;

    if programs.is_empty() {
        println!("No saved programs.");
        return Ok(());
    }

    for program in &programs {
        let created = ProgramGroupingKey::parse(&program.program_id)
            .and_then(|k| k.created_at())
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{}  ({} routines, created {})",
            program.display_name(),
            program.routines.len(),
            created
        );
        println!("  key: {}", program.program_id);
        for routine in &program.routines {
            println!("    - {} ({} exercises)", routine.name, routine.exercises.len());
        }
    }

    Ok(())
}

fn cmd_delete_program(data_dir: &Path, key: &str) -> Result<()> {
    let mut routines = JsonlRoutineStore::new(DataConfig::routines_path(data_dir));
    let removed = routines.delete_program(key)?;

    if removed == 0 {
        return Err(Error::Other(format!("No program found with key '{}'", key)));
    }

    println!("✓ Deleted {} routines", removed);
    Ok(())
}

fn cmd_export(data_dir: &Path, key: &str, output: &Path) -> Result<()> {
    let routines = JsonlRoutineStore::new(DataConfig::routines_path(data_dir)).routines_for(key)?;
    if routines.is_empty() {
        return Err(Error::Other(format!("No program found with key '{}'", key)));
    }

    let catalog = JsonlCatalogStore::open(DataConfig::catalog_path(data_dir))?.lookup_all()?;
    let rows = liftplan_core::export::write_program_csv(&routines, &catalog, output)?;

    println!("✓ Exported {} exercises to {}", rows, output.display());
    Ok(())
}

fn cmd_catalog(data_dir: &Path) -> Result<()> {
    let catalog = JsonlCatalogStore::open(DataConfig::catalog_path(data_dir))?;
    let exercises = catalog.lookup_all()?;

    let errors = liftplan_core::catalog::validate(&exercises);
    for error in &errors {
        tracing::warn!("Catalog: {}", error);
    }

    for exercise in &exercises {
        println!(
            "{:>4}  {:<32} {}",
            exercise.id, exercise.name, exercise.muscle_group
        );
    }
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save_to(path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}

fn display_program(outcome: &GenerationOutcome) {
    let program = &outcome.program;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", program.name);
    println!("╰─────────────────────────────────────────╯");
    if !program.description.is_empty() {
        println!("  {}", program.description);
    }
    println!(
        "  {} days, {} exercises",
        program.workouts.len(),
        program.exercise_count()
    );
    if outcome.source == ProgramSource::Fallback {
        println!("  (built from templates)");
    }

    for workout in &program.workouts {
        println!();
        println!(
            "  {}  [{}; ~{} min]",
            workout.name, workout.focus, workout.estimated_duration
        );

        if workout.exercises.is_empty() {
            println!("    (no exercises for the selected equipment)");
        }
        for exercise in &workout.exercises {
            println!(
                "    → {}: {} x {} (rest {}s)",
                exercise.name, exercise.sets, exercise.reps, exercise.rest_seconds
            );
            if let Some(ref notes) = exercise.notes {
                println!("      {}", notes);
            }
        }
    }

    println!();
}

fn confirm(question: &str, to_stderr: bool) -> Result<bool> {
    if to_stderr {
        eprint!("{} [y/N] ", question);
        io::stderr().flush()?;
    } else {
        print!("{} [y/N] ", question);
        io::stdout().flush()?;
    }

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
