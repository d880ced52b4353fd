use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gateway_routes::config::{ConfigBuilder, ConfigError, FileSource};
use gateway_routes::derive_route_key;
use gateway_routes::observability::logging;

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and check gateway route configuration", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "gateway_routes=warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and resolve a configuration file, reporting every error
    Check { file: PathBuf },
    /// Print the resolved runtime configuration as JSON
    Show { file: PathBuf },
    /// Print the route key for an upstream template and methods
    Key {
        template: String,
        methods: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&cli.log, false) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Check { file } => {
            match ConfigBuilder::new(FileSource::new(&file)).create() {
                Ok(runtime) => {
                    println!("OK: {} route(s) in {}", runtime.routes().len(), file.display());
                    for route in runtime.routes() {
                        println!("  {} -> {}", route.route_key(), route.downstream_path_template());
                    }
                    Ok(())
                }
                Err(ConfigError::Validation(report)) => {
                    println!("{} configuration error(s) in {}:", report.len(), file.display());
                    println!("{}", report);
                    Err("configuration rejected".into())
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Show { file } => {
            let runtime = ConfigBuilder::new(FileSource::new(&file)).create()?;
            println!("{}", serde_json::to_string_pretty(&runtime)?);
            Ok(())
        }
        Commands::Key { template, methods } => {
            println!("{}", derive_route_key(&template, &methods));
            Ok(())
        }
    }
}
