mod error;

use clap::{Parser, Subcommand};
use error::{AppError, AppResult};
use pf_project::PlantDef;
use pf_sim::{
    Action, Field, FieldValue, PlantHandle, PlantSnapshot, RunOptions, ScheduledCommand,
    SimulationClock, TankAddress, run_ticks,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PaintFlow CLI - Paint mixing plant simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a plant file
    Validate {
        /// Path to the plant YAML or JSON file
        plant_path: PathBuf,
    },
    /// Write the reference six-station plant as YAML
    DefaultConfig {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List device names of every tank
    Devices {
        /// Path to the plant YAML or JSON file
        plant_path: PathBuf,
    },
    /// Run a batch simulation as fast as possible
    Run {
        /// Path to the plant YAML or JSON file
        plant_path: PathBuf,
        /// Number of ticks to simulate
        #[arg(long, default_value_t = 60)]
        ticks: u64,
        /// Time step in seconds (defaults to the plant's clock.dt_s)
        #[arg(long)]
        dt: Option<f64>,
        /// Set an outlet before the first tick, e.g. station1/cyan=0.5
        #[arg(long = "set", value_name = "STATION/TANK=FRACTION")]
        set: Vec<String>,
        /// Fill a supply tank before the first tick
        #[arg(long, value_name = "STATION/TANK")]
        fill: Vec<String>,
        /// Flush a tank before the first tick
        #[arg(long, value_name = "STATION/TANK")]
        flush: Vec<String>,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the plant on the real-time clock and watch fields
    Serve {
        /// Path to the plant YAML or JSON file
        plant_path: PathBuf,
        /// Stop after this many ticks
        #[arg(long, default_value_t = 10)]
        ticks: u64,
        /// Wall-clock period in milliseconds (defaults to the plant's clock.period_s)
        #[arg(long)]
        period_ms: Option<u64>,
        /// Field to print after each tick, e.g. epfl/station1/mixer/level
        #[arg(long, value_name = "ADDRESS")]
        watch: Vec<String>,
        /// Set an outlet before the clock starts, e.g. station1/cyan=0.5
        #[arg(long = "set", value_name = "STATION/TANK=FRACTION")]
        set: Vec<String>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { plant_path } => cmd_validate(&plant_path),
        Commands::DefaultConfig { output } => cmd_default_config(output.as_deref()),
        Commands::Devices { plant_path } => cmd_devices(&plant_path),
        Commands::Run {
            plant_path,
            ticks,
            dt,
            set,
            fill,
            flush,
            json,
        } => {
            let mut initial = Vec::new();
            for arg in &set {
                initial.push(parse_set(arg)?);
            }
            for arg in &fill {
                initial.push(parse_target(arg, Action::Fill)?);
            }
            for arg in &flush {
                initial.push(parse_target(arg, Action::Flush)?);
            }
            cmd_run(&plant_path, ticks, dt, &initial, json)
        }
        Commands::Serve {
            plant_path,
            ticks,
            period_ms,
            watch,
            set,
        } => {
            let initial = set
                .iter()
                .map(|arg| parse_set(arg))
                .collect::<AppResult<Vec<_>>>()?;
            cmd_serve(&plant_path, ticks, period_ms, &watch, &initial)
        }
    }
}

fn load_plant(path: &Path) -> AppResult<PlantDef> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    info!(path = %path.display(), json = is_json, "loading plant file");
    let def = if is_json {
        pf_project::load_json(path)?
    } else {
        pf_project::load_yaml(path)?
    };
    Ok(def)
}

/// `station/tank=fraction`
fn parse_set(arg: &str) -> AppResult<(String, String, Action)> {
    let (target, value) = arg
        .split_once('=')
        .ok_or_else(|| AppError::Usage(format!("expected STATION/TANK=FRACTION, got '{arg}'")))?;
    let fraction: f64 = value
        .trim()
        .parse()
        .map_err(|_| AppError::Usage(format!("'{value}' is not a number")))?;
    parse_target(target, Action::SetOpening(fraction))
}

fn parse_target(arg: &str, action: Action) -> AppResult<(String, String, Action)> {
    let address = TankAddress::parse(arg.trim())?;
    Ok((address.station, address.tank, action))
}

fn cmd_validate(plant_path: &Path) -> AppResult<()> {
    println!("Validating plant: {}", plant_path.display());
    let def = load_plant(plant_path)?;
    pf_project::build_plant(&def)?;
    println!(
        "✓ Plant '{}' is valid ({} stations, {} scheduled commands)",
        def.name,
        def.stations.len(),
        def.schedule.len()
    );
    Ok(())
}

fn cmd_default_config(output: Option<&Path>) -> AppResult<()> {
    let def = pf_project::reference_plant();
    match output {
        Some(path) => {
            pf_project::save_yaml(path, &def)?;
            println!("✓ Wrote reference plant to {}", path.display());
        }
        None => print!("{}", serde_yaml::to_string(&def)?),
    }
    Ok(())
}

fn cmd_devices(plant_path: &Path) -> AppResult<()> {
    let def = load_plant(plant_path)?;
    let plant = pf_project::build_plant(&def)?;
    for name in plant.device_names(&def.prefix) {
        println!("{name}");
    }
    Ok(())
}

fn cmd_run(
    plant_path: &Path,
    ticks: u64,
    dt: Option<f64>,
    initial: &[(String, String, Action)],
    json: bool,
) -> AppResult<()> {
    let def = load_plant(plant_path)?;
    let mut plant = pf_project::build_plant(&def)?;

    let mut schedule: Vec<ScheduledCommand> = initial
        .iter()
        .map(|(station, tank, action)| ScheduledCommand {
            tick: 0,
            station: station.clone(),
            tank: tank.clone(),
            action: *action,
        })
        .collect();
    schedule.extend(pf_project::schedule(&def));

    let opts = RunOptions {
        dt: dt.unwrap_or(def.clock.dt_s),
        ticks,
        record_every: ticks,
    };

    let started = Instant::now();
    let record = run_ticks(&mut plant, &opts, &schedule)?;
    let elapsed = started.elapsed();

    let last = record
        .last()
        .ok_or_else(|| AppError::Simulation("run recorded no snapshots".to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(last)?);
        return Ok(());
    }

    println!(
        "✓ Ran {} ticks of {:.3} s in {:.3} s wall time",
        ticks,
        opts.dt,
        elapsed.as_secs_f64()
    );
    println!(
        "  Commands applied: {}, rejected: {}, alarms: {}",
        record.applied.len(),
        record.rejected.len(),
        record.alarms.len()
    );
    for (entry, err) in &record.rejected {
        println!("  ! tick {} {}/{}: {}", entry.tick, entry.station, entry.tank, err);
    }
    for alarm in &record.alarms {
        println!("  ! tick {}: {}", alarm.tick, alarm);
    }
    println!();
    print_readings(last);
    Ok(())
}

fn print_readings(snapshot: &PlantSnapshot) {
    println!("t = {:.3} s (tick {})", snapshot.time_s, snapshot.tick);
    println!(
        "  {:<12} {:<8} {:>9} {:>7} {:>8} {:>6}  {}",
        "station", "tank", "level l", "fill", "out l/s", "open", "colour"
    );
    for station in &snapshot.stations {
        for reading in &station.tanks {
            println!(
                "  {:<12} {:<8} {:>9.2} {:>6.1}% {:>8.3} {:>6.2}  {}",
                station.name,
                reading.tank,
                reading.level,
                reading.capacity_fraction * 100.0,
                reading.outflow,
                reading.open_fraction,
                reading.color_hex
            );
        }
    }
}

fn cmd_serve(
    plant_path: &Path,
    ticks: u64,
    period_ms: Option<u64>,
    watch: &[String],
    initial: &[(String, String, Action)],
) -> AppResult<()> {
    let def = load_plant(plant_path)?;
    let mut plant = pf_project::build_plant(&def)?;
    for (station, tank, action) in initial {
        plant.submit(station, tank, *action)?;
    }

    let mut addresses = Vec::new();
    for text in watch {
        let address = TankAddress::parse(text)?;
        if address.prefix.as_deref().is_some_and(|p| p != def.prefix) {
            return Err(AppError::Usage(format!(
                "'{text}' does not belong to plant prefix '{}'",
                def.prefix
            )));
        }
        plant.topology().resolve(&address.station, &address.tank)?;
        addresses.push(address);
    }
    if addresses.is_empty() {
        addresses = plant
            .topology()
            .station_names()
            .map(|station| TankAddress::new(station, "mixer"))
            .collect();
    }

    let mut options = pf_project::clock_options(&def)?;
    if let Some(ms) = period_ms {
        options.period = Duration::from_millis(ms);
    }
    options.max_ticks = Some(ticks);
    let poll = options.period / 4;

    println!(
        "Serving '{}' for {} ticks every {} ms",
        def.name,
        ticks,
        options.period.as_millis()
    );

    let (clock, handle) = SimulationClock::spawn(plant, options)?;
    let reader = {
        let handle = handle.clone();
        thread::Builder::new()
            .name("pf-watch".to_string())
            .spawn(move || watch_loop(&handle, &addresses, &def.prefix, poll))?
    };

    let plant = clock.join()?;
    reader
        .join()
        .map_err(|_| AppError::Simulation("watch thread panicked".to_string()))??;

    println!();
    print_readings(&plant.snapshot());
    Ok(())
}

/// Print watched fields whenever a new tick is published, until the clock stops.
fn watch_loop(
    handle: &PlantHandle,
    addresses: &[TankAddress],
    prefix: &str,
    poll: Duration,
) -> AppResult<()> {
    let mut last_tick = None;
    loop {
        let running = handle.is_running();
        let Some(snapshot) = handle.try_snapshot() else {
            thread::sleep(poll);
            continue;
        };
        if last_tick != Some(snapshot.tick) {
            last_tick = Some(snapshot.tick);
            let mut line = format!("tick {:>4}  t={:>7.2}s", snapshot.tick, snapshot.time_s);
            for address in addresses {
                let reading = snapshot
                    .find(&address.station, &address.tank)
                    .ok_or_else(|| AppError::Usage(format!("no tank at '{address}'")))?;
                let field = address.field.unwrap_or(Field::Level);
                let value = FieldValue::from_reading(reading, field);
                line.push_str(&format!(
                    "  {prefix}/{}/{}/{field}={value}",
                    address.station, address.tank
                ));
            }
            println!("{line}");
            let _ = io::stdout().flush();
        }
        if !running {
            return Ok(());
        }
        thread::sleep(poll);
    }
}
