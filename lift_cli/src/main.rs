use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use lift_core::units::{format_weight, to_lbs};
use lift_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Workout logger with progression recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommendations for every exercise of today's workout (default)
    Today {
        /// Override the scheduled day (push, pull, legs, upper, lower, full)
        #[arg(long)]
        day: Option<String>,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommendation for the next session of one exercise
    Next {
        exercise: String,

        #[arg(long)]
        json: bool,
    },

    /// Record a session for one exercise
    Log {
        exercise: String,

        /// Reps performed per set, e.g. 5,5,4
        #[arg(long, value_delimiter = ',', required = true)]
        reps: Vec<u32>,

        /// Weight used for every set (defaults to the recommended weight)
        #[arg(long)]
        weight: Option<f64>,

        /// RPE per set, or one value for all sets
        #[arg(long, value_delimiter = ',')]
        rpe: Vec<f64>,

        /// Day type to file the workout under (defaults to the scheduled day)
        #[arg(long)]
        day: Option<String>,

        /// Show what would be logged without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Past sessions for one exercise
    History {
        exercise: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// List catalog exercises
    Exercises {
        #[arg(long)]
        day: Option<String>,
    },

    /// Export the session log as CSV, one row per set
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

struct App {
    config: Config,
    catalog: Catalog,
    wal_path: PathBuf,
}

impl App {
    fn workouts(&self) -> Result<Vec<WorkoutSession>> {
        load_workouts(&self.wal_path)
    }

    fn history(&self, workouts: &[WorkoutSession], exercise_id: &str) -> Vec<SessionRecord> {
        history_for_exercise(workouts, exercise_id, self.config.progression.history_window)
    }

    fn recommend(&self, def: &ExerciseDefinition, history: &History) -> Recommendation {
        recommend_with(def, history, &self.config.progression)
    }

    fn unit(&self) -> WeightUnit {
        self.config.display.unit
    }
}

fn main() -> Result<()> {
    lift_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    let mut catalog = get_default_catalog().clone();
    catalog.extend_with(&config.exercises);
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let app = App {
        config,
        catalog,
        wal_path: data_dir.join("wal").join("sessions.wal"),
    };

    match cli.command {
        Some(Commands::Today { day, json }) => cmd_today(&app, day.as_deref(), json),
        Some(Commands::Next { exercise, json }) => cmd_next(&app, &exercise, json),
        Some(Commands::Log {
            exercise,
            reps,
            weight,
            rpe,
            day,
            dry_run,
        }) => cmd_log(&app, &exercise, &reps, weight, &rpe, day.as_deref(), dry_run),
        Some(Commands::History { exercise, limit }) => cmd_history(&app, &exercise, limit),
        Some(Commands::Exercises { day }) => cmd_exercises(&app, day.as_deref()),
        Some(Commands::Export { out }) => cmd_export(&app, &out),
        None => cmd_today(&app, None, false),
    }
}

fn resolve_day(day: Option<&str>, workouts: &[WorkoutSession]) -> Result<DayType> {
    match day {
        Some(name) => name.parse(),
        None => Ok(recommend_day_type(Local::now().date_naive(), workouts)),
    }
}

fn cmd_today(app: &App, day: Option<&str>, json: bool) -> Result<()> {
    let workouts = app.workouts()?;
    let day = resolve_day(day, &workouts)?;

    let recommendations: Vec<(&ExerciseDefinition, Recommendation)> = app
        .catalog
        .exercises_for_day(day)
        .into_iter()
        .map(|def| {
            let history = app.history(&workouts, &def.id);
            (def, app.recommend(def, &history))
        })
        .collect();

    if json {
        let recs: Vec<&Recommendation> = recommendations.iter().map(|(_, rec)| rec).collect();
        println!("{}", serde_json::to_string_pretty(&recs)?);
        return Ok(());
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} DAY", day.as_str().to_uppercase());
    println!("╰─────────────────────────────────────────╯");

    if recommendations.is_empty() {
        println!("\n  Rest day. Recover well.\n");
        return Ok(());
    }

    for (def, rec) in &recommendations {
        display_recommendation(def, rec, app.unit());
    }
    println!();
    Ok(())
}

fn cmd_next(app: &App, exercise: &str, json: bool) -> Result<()> {
    let def = app.catalog.require(exercise)?;
    let workouts = app.workouts()?;
    let history = app.history(&workouts, &def.id);
    let rec = app.recommend(def, &history);

    if json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
    } else {
        display_recommendation(def, &rec, app.unit());
        display_metadata(&rec, app.unit());
        println!();
    }
    Ok(())
}

fn expand_rpe(rpe: &[f64], set_count: usize) -> Result<Vec<Option<f64>>> {
    if let Some(bad) = rpe.iter().find(|v| !(0.0..=10.0).contains(*v)) {
        return Err(Error::InvalidInput(format!(
            "RPE must be between 0 and 10, got {}",
            bad
        )));
    }
    match rpe.len() {
        0 => Ok(vec![None; set_count]),
        1 => Ok(vec![Some(rpe[0]); set_count]),
        n if n == set_count => Ok(rpe.iter().copied().map(Some).collect()),
        n => Err(Error::InvalidInput(format!(
            "Got {} RPE values for {} sets",
            n, set_count
        ))),
    }
}

fn cmd_log(
    app: &App,
    exercise: &str,
    reps: &[u32],
    weight: Option<f64>,
    rpe: &[f64],
    day: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let def = app.catalog.require(exercise)?;
    if let Some(w) = weight {
        if !w.is_finite() || w < 0.0 {
            return Err(Error::InvalidInput(format!(
                "Weight must be a non-negative number, got {}",
                w
            )));
        }
    }
    let rpe = expand_rpe(rpe, reps.len())?;

    let workouts = app.workouts()?;
    let day_type = resolve_day(day, &workouts)?;
    let mut history = app.history(&workouts, &def.id);
    let rec = app.recommend(def, &history);

    let sets: Vec<PerformedSet> = reps
        .iter()
        .zip(rpe)
        .enumerate()
        .map(|(i, (&reps, rpe))| {
            let planned = rec.plan.get(i).map(|p| p.weight).unwrap_or(rec.weight);
            PerformedSet {
                reps,
                weight: weight.map(|w| to_lbs(w, app.unit())).unwrap_or(planned),
                rpe,
            }
        })
        .collect();

    let entry = ExerciseEntry {
        exercise_id: def.id.clone(),
        target: rec.as_target(),
        sets,
    };
    let session = WorkoutSession {
        id: uuid::Uuid::new_v4(),
        performed_at: Utc::now(),
        day_type,
        exercises: vec![entry],
    };

    let record = session.exercises[0].to_record(session.performed_at);
    let summary = summarize_session(&def.rep_scheme, &record);

    println!("\n  {} ({})", def.name, day_type);
    for (i, set) in record.performed_sets.iter().enumerate() {
        println!("    Set {}: {}", i + 1, format_set(set, app.unit()));
    }
    println!(
        "  {}",
        if summary.met_target {
            "Target met"
        } else {
            "Target missed"
        }
    );

    if dry_run {
        println!("\n[Dry run - not logging session]");
        return Ok(());
    }

    let mut sink = JsonlSink::new(&app.wal_path);
    sink.append(&session)?;
    tracing::info!("Logged {} for {}", session.id, def.id);
    println!("\n✓ Session logged!");

    history.push(record);
    let skip = history
        .len()
        .saturating_sub(app.config.progression.history_window);
    let next = app.recommend(def, &history[skip..]);
    println!("\nNext time:");
    display_recommendation(def, &next, app.unit());
    println!();
    Ok(())
}

fn cmd_history(app: &App, exercise: &str, limit: usize) -> Result<()> {
    let def = app.catalog.require(exercise)?;
    let workouts = app.workouts()?;
    let records = history_for_exercise(&workouts, &def.id, limit);

    if records.is_empty() {
        println!("No sessions logged for {}.", def.name);
        return Ok(());
    }

    println!("\n  {} - last {} sessions", def.name, records.len());
    for record in &records {
        let summary = summarize_session(&def.rep_scheme, record);
        let sets: Vec<String> = record
            .performed_sets
            .iter()
            .map(|s| format_set(s, app.unit()))
            .collect();
        println!(
            "  {}  {}  {}",
            record.performed_at.with_timezone(&Local).format("%Y-%m-%d"),
            if summary.met_target { "✓" } else { "✗" },
            sets.join(", ")
        );
    }
    println!();
    Ok(())
}

fn cmd_exercises(app: &App, day: Option<&str>) -> Result<()> {
    let days = match day {
        Some(name) => vec![name.parse::<DayType>()?],
        None => DayType::TRAINING_DAYS.to_vec(),
    };

    for day in days {
        println!("{}:", day);
        for def in app.catalog.exercises_for_day(day) {
            println!(
                "  {:<32} {:<34} {}",
                def.id,
                def.name,
                def.rep_scheme.label()
            );
        }
    }
    Ok(())
}

fn cmd_export(app: &App, out: &Path) -> Result<()> {
    let workouts = app.workouts()?;
    let count = export_csv(&workouts, out)?;
    println!("✓ Exported {} sets to {}", count, out.display());
    Ok(())
}

fn format_set(set: &PerformedSet, unit: WeightUnit) -> String {
    let mut text = format!("{} × {}", set.reps, format_weight(set.weight, unit));
    if let Some(rpe) = set.rpe {
        text.push_str(&format!(" @{}", rpe));
    }
    text
}

fn format_reps(reps: u32) -> String {
    if reps == 0 {
        "max".to_string()
    } else {
        reps.to_string()
    }
}

fn display_recommendation(def: &ExerciseDefinition, rec: &Recommendation, unit: WeightUnit) {
    println!();
    println!("  {} ({})", def.name, def.id);

    let uniform = rec
        .plan
        .iter()
        .all(|p| p.reps == rec.reps && p.weight == rec.weight);
    if uniform {
        println!(
            "    → {} × {} @ {}",
            rec.sets,
            format_reps(rec.reps),
            format_weight(rec.weight, unit)
        );
    } else {
        for (i, set) in rec.plan.iter().enumerate() {
            println!(
                "    → Set {}: {} @ {}",
                i + 1,
                format_reps(set.reps),
                format_weight(set.weight, unit)
            );
        }
    }
    println!("    {}", rec.reason);
}

fn display_metadata(rec: &Recommendation, unit: WeightUnit) {
    let meta = &rec.metadata;
    println!();
    println!("    Increment:      {}", format_weight(meta.increment, unit));
    println!("    Rounding:       {}", format_weight(meta.rounding, unit));
    println!("    Failure streak: {}", meta.failure_streak);
    if let Some(rpe) = meta.last_average_rpe {
        println!("    Last avg RPE:   {:.1}", rpe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_rpe() {
        assert_eq!(expand_rpe(&[], 3).unwrap(), vec![None, None, None]);
        assert_eq!(expand_rpe(&[8.0], 2).unwrap(), vec![Some(8.0), Some(8.0)]);
        assert_eq!(
            expand_rpe(&[7.0, 9.0], 2).unwrap(),
            vec![Some(7.0), Some(9.0)]
        );
        assert!(expand_rpe(&[7.0, 9.0], 3).is_err());
        assert!(expand_rpe(&[11.0], 1).is_err());
    }

    #[test]
    fn test_format_set() {
        let set = PerformedSet {
            reps: 5,
            weight: 135.0,
            rpe: Some(8.5),
        };
        assert_eq!(format_set(&set, WeightUnit::Lb), "5 × 135 lb @8.5");
    }
}
