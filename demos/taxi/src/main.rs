use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use weave::StdError;
use weave_base::bootstrap;

/// Taxi fleet service layer wired with weave
#[derive(Parser, Debug)]
#[command(name = "taxi")]
#[command(version)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON files merged over the configuration, in order
    #[arg(long = "config-override", global = true)]
    config_override: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every contract with the component bound to it
    Bindings,
    /// Seed an in-memory fleet and run a scripted shift
    Demo {
        /// Print the resulting fleet as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run(cli: Cli) -> Result<(), StdError> {
    let config = taxi::load_config(cli.config.as_deref(), &cli.config_override)?;
    let injectors = bootstrap(&config)?;
    let injector = injectors.for_root(taxi::ROOT)?;
    let lines = match cli.command {
        Commands::Bindings => taxi::bindings(&injector),
        Commands::Demo { json } => {
            let mut lines = taxi::demo::run(&injector)?;
            if json {
                lines.push(taxi::demo::fleet(&injector)?);
            }
            lines
        }
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
