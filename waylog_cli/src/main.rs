use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use uuid::Uuid;
use waylog_core::*;

#[derive(Parser)]
#[command(name = "waylog")]
#[command(about = "Map-anchored workout logger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive logging session (default)
    Session {
        /// Position override, latitude
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Position override, longitude
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },

    /// Print the stored workouts
    List,

    /// Export stored workouts to CSV
    Export {
        /// Output file (defaults to workouts.csv in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Clear all stored workouts
    Reset,
}

fn main() -> Result<()> {
    // Initialize logging
    waylog_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Session { lat, lng }) => cmd_session(data_dir, lat.zip(lng), &config),
        Some(Commands::List) => cmd_list(data_dir),
        Some(Commands::Export { output }) => cmd_export(data_dir, output),
        Some(Commands::Reset) => cmd_reset(data_dir),
        None => {
            // Default to "session" command
            cmd_session(data_dir, None, &config)
        }
    }
}

/// Map widget rendered as terminal narration
struct ConsoleMap;

impl MapWidget for ConsoleMap {
    fn init(&mut self, center: Coordinates, zoom: u8, tiles: &TileLayer) -> Result<()> {
        println!("🗺  Map centered on {} (zoom {})", center, zoom);
        println!("   {}", tiles.attribution);
        Ok(())
    }

    fn add_marker(&mut self, at: Coordinates, popup: &MarkerPopup) -> Result<()> {
        println!("📍 {} at {}", popup.content, at);
        Ok(())
    }

    fn pan_to(&mut self, center: Coordinates, zoom: u8, animate: bool) -> Result<()> {
        if animate {
            println!("🗺  Panning to {} (zoom {})", center, zoom);
        } else {
            println!("🗺  Jumped to {} (zoom {})", center, zoom);
        }
        Ok(())
    }
}

/// Blocking notifications printed to the terminal
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&mut self, message: &str) {
        println!("⚠ {}", message);
    }
}

fn cmd_session(data_dir: PathBuf, position: Option<(f64, f64)>, config: &Config) -> Result<()> {
    std::fs::create_dir_all(&data_dir)?;
    let snapshot = store::snapshot_path(&data_dir);

    let mut controller = Controller::new(
        ConsoleMap,
        ConsoleNotifier,
        snapshot,
        config.map.default_zoom,
        config.map.tiles.clone(),
    )?;

    // One-shot position request: explicit override, else fix file / home
    match position {
        Some((lat, lng)) => {
            controller.start(&FixedPosition(Coordinates::new(lat, lng)))?;
        }
        None => {
            let provider = SessionLocation::new(&data_dir, config.location.home_coordinates());
            controller.start(&provider)?;
        }
    }

    println!();
    print_session_help();
    prompt()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            prompt()?;
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match command {
            "click" => handle_click(&mut controller, &args)?,
            "save" => handle_save(&mut controller, &args)?,
            "select" => handle_select(&mut controller, &args)?,
            "list" => print_workouts(controller.workouts()),
            "help" => print_session_help(),
            "quit" | "exit" => break,
            other => {
                tracing::debug!("Unknown session command: {}", other);
                println!("Unknown command '{}' — try 'help'.", other);
            }
        }

        prompt()?;
    }

    println!("Session ended.");
    Ok(())
}

fn handle_click(
    controller: &mut Controller<ConsoleMap, ConsoleNotifier>,
    args: &[&str],
) -> Result<()> {
    let [lat, lng] = args else {
        println!("Usage: click LAT LNG");
        return Ok(());
    };
    let (Ok(lat), Ok(lng)) = (lat.parse::<f64>(), lng.parse::<f64>()) else {
        println!("Usage: click LAT LNG");
        return Ok(());
    };

    controller.handle(Event::MapClick(Coordinates::new(lat, lng)))?;

    if controller.phase() == Phase::FormOpen {
        println!("Workout form open — distance first:");
        println!("  save running DISTANCE_KM DURATION_MIN CADENCE_SPM");
        println!("  save cycling DISTANCE_KM DURATION_MIN ELEVATION_M");
    }
    Ok(())
}

fn handle_save(
    controller: &mut Controller<ConsoleMap, ConsoleNotifier>,
    args: &[&str],
) -> Result<()> {
    let [kind, distance, duration, extra] = args else {
        println!("Usage: save KIND DISTANCE DURATION CADENCE|ELEVATION");
        return Ok(());
    };
    let kind: WorkoutKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            println!("⚠ {}", e);
            return Ok(());
        }
    };

    let before = controller.workouts().len();
    let submission =
        FormSubmission::new(kind, coerce(distance), coerce(duration), coerce(extra));
    controller.handle(Event::FormSubmitted(submission))?;

    if controller.workouts().len() > before {
        println!("✓ Workout saved!");
        if let Some(workout) = controller.workouts().last() {
            println!("  {}", workout_line(workout));
        }
    } else if controller.phase() != Phase::FormOpen {
        println!("No form open — click the map first.");
    }
    Ok(())
}

fn handle_select(
    controller: &mut Controller<ConsoleMap, ConsoleNotifier>,
    args: &[&str],
) -> Result<()> {
    let [id] = args else {
        println!("Usage: select WORKOUT_ID");
        return Ok(());
    };
    let Ok(id) = Uuid::parse_str(id) else {
        println!("'{}' is not a workout id — see 'list'.", id);
        return Ok(());
    };
    controller.handle(Event::EntrySelected { id })
}

/// Loose form-field coercion: bad text becomes NaN and is rejected by
/// form validation, not by the parser.
fn coerce(input: &str) -> f64 {
    input.parse().unwrap_or(f64::NAN)
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

fn print_session_help() {
    println!("Commands:");
    println!("  click LAT LNG                            pick a point on the map");
    println!("  save KIND DISTANCE DURATION EXTRA        submit the open form");
    println!("  select WORKOUT_ID                        re-center on an entry");
    println!("  list                                     show logged workouts");
    println!("  quit                                     end the session");
}

fn workout_line(workout: &Workout) -> String {
    let metrics = match workout.details {
        WorkoutDetails::Running { cadence, pace } => {
            format!("{:.1} min/km, {} spm", pace, cadence)
        }
        WorkoutDetails::Cycling { elevation, speed } => {
            format!("{:.1} km/h, {:.0} m", speed, elevation)
        }
    };
    format!(
        "{} {} — {} km, {} min, {} [{}]",
        workout.kind().icon(),
        workout.description,
        workout.distance_km,
        workout.duration_min,
        metrics,
        workout.id
    )
}

fn print_workouts(workouts: &[Workout]) {
    if workouts.is_empty() {
        println!("No workouts logged yet.");
        return;
    }
    for workout in workouts {
        println!("{}", workout_line(workout));
    }
}

fn cmd_list(data_dir: PathBuf) -> Result<()> {
    let workouts = store::load_workouts(&store::snapshot_path(&data_dir))?;
    print_workouts(&workouts);
    Ok(())
}

fn cmd_export(data_dir: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let workouts = store::load_workouts(&store::snapshot_path(&data_dir))?;
    let output = output.unwrap_or_else(|| data_dir.join("workouts.csv"));

    let count = export_csv(&workouts, &output)?;
    println!("✓ Exported {} workouts", count);
    println!("  CSV: {}", output.display());
    Ok(())
}

fn cmd_reset(data_dir: PathBuf) -> Result<()> {
    if store::clear_workouts(&store::snapshot_path(&data_dir))? {
        println!("✓ Cleared stored workouts");
    } else {
        println!("No stored workouts to clear.");
    }
    Ok(())
}
