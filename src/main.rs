use ccmp_tools::config::Config;
use ccmp_tools::io;
use ccmp_tools::md::{read_trajectory_with_defaults, SiestaSimulation};
use ccmp_tools::utils::{logger, report};
use ccmp_tools::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "ccmp",
    about = "Inspect SIESTA trajectories, parameter files and MD property tables",
    version,
    propagate_version = true
)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read any registered file and describe its content
    Read {
        path: PathBuf,

        /// Reader namespace, e.g. "siesta" (default from config, "" = any)
        #[arg(short, long, value_name = "NS")]
        application: Option<String>,
    },

    /// Assemble a trajectory from a snapshot file and optional companions
    Trajectory {
        path: PathBuf,

        /// Per-step property table (.MDE)
        #[arg(short = 'p', long, value_name = "FILE")]
        properties: Option<PathBuf>,

        /// Simulation parameters (.fdf)
        #[arg(short = 'f', long, value_name = "FILE")]
        parameters: Option<PathBuf>,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },

    /// Discover the files of a SIESTA run directory and summarize it
    Simulation {
        dir: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// List registered readers
    Formats,

    /// Show the configuration, or write the defaults with --init
    Config {
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (config, config_msg) = Config::load();

    let level = logger::bump_level(logger::parse_level(&config.log_level), cli.verbose);
    if let Err(e) = logger::init(level) {
        eprintln!("logger already initialized: {}", e);
    }
    log::info!("{}", config_msg);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Read { path, application } => {
            let application = application.unwrap_or_else(|| config.default_application.clone());
            let content = io::read(&path, &application)?;
            print!("{}", report::content_report(&content, &path.display().to_string()));
        }

        Command::Trajectory {
            path,
            properties,
            parameters,
            json,
        } => {
            let trajectory = read_trajectory_with_defaults(
                &path,
                properties.as_deref(),
                parameters.as_deref(),
                &config.parameter_map(),
            )?;
            print_trajectory(&trajectory, &path.display().to_string(), json)?;
        }

        Command::Simulation { dir, json } => {
            let sim = SiestaSimulation::discover(&dir)?;
            let trajectory = sim.trajectory_with_defaults(&config.parameter_map())?;
            print_trajectory(&trajectory, &sim.trajectory_path.display().to_string(), json)?;
        }

        Command::Formats => {
            for key in io::registry().keys() {
                println!("{}", key);
            }
        }

        Command::Config { init } => {
            if init {
                let path = Config::default().save()?;
                println!("Config written to {}", path.display());
            } else {
                println!("# {}", Config::get_path().display());
                println!("{}", serde_json::to_string_pretty(config)?);
            }
        }
    }
    Ok(())
}

fn print_trajectory(trajectory: &ccmp_tools::Trajectory, name: &str, json: bool) -> Result<()> {
    if json {
        let summary = report::summarize(trajectory);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", report::trajectory_report(trajectory, name));
    }
    Ok(())
}
