//! postcheck CLI - contract checks for a JSON posts API

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use postcheck_core::Config;
use postcheck_runner::{Runner, Scenario, scenarios};

#[derive(Parser)]
#[command(name = "postcheck")]
#[command(about = "Contract checks for a JSON posts API with per-scenario log trails")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose diagnostics on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenarios against the API
    Run {
        /// Config file (default: .postcheck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the base URL (must end with '/')
        #[arg(long)]
        base_url: Option<String>,

        /// Override the directory receiving per-scenario log files
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Override the request timeout in seconds (0 disables it)
        #[arg(long)]
        timeout: Option<f64>,

        /// Run only the named scenario (repeatable)
        #[arg(short, long = "scenario")]
        scenarios: Vec<String>,
    },

    /// List available scenarios
    List,

    /// Initialize config file
    Init,

    /// Export JSON Schema for the run report
    Schema,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run {
            config,
            base_url,
            log_dir,
            timeout,
            scenarios: names,
        } => {
            let mut cfg = if let Some(path) = config {
                Config::load(&path)?
            } else {
                Config::load_default()?
            };
            if let Some(url) = base_url {
                cfg.base_url = url;
            }
            if let Some(dir) = log_dir {
                cfg.log_dir = dir;
            }
            if let Some(secs) = timeout {
                cfg.timeout_secs = Some(secs);
            }

            let selected = select_scenarios(&names)?;
            std::fs::create_dir_all(&cfg.log_dir)?;

            if cli.output == OutputFormat::Terminal {
                eprintln!("Config:");
                eprintln!("  base_url: {}", cfg.base_url);
                eprintln!("  log_dir:  {}", cfg.log_dir.display());
                match cfg.timeout() {
                    Some(t) => eprintln!("  timeout:  {:.1}s", t.as_secs_f64()),
                    None => eprintln!("  timeout:  none"),
                }
                eprintln!();
            }

            tracing::info!(scenarios = selected.len(), base_url = %cfg.base_url, "starting run");
            let runner = Runner::from_config(&cfg)?;
            let report = runner.run(&selected);

            match cli.output {
                OutputFormat::Terminal => println!("{}", report.to_terminal()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Silent => {}
            }

            Ok(report.exit_code())
        }

        Commands::List => {
            let all = scenarios::all();
            match cli.output {
                OutputFormat::Json => {
                    let listing: Vec<_> = all
                        .iter()
                        .map(|s| {
                            serde_json::json!({
                                "name": s.name,
                                "method": s.method.as_str(),
                                "path": s.path,
                                "description": s.description,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&listing)?);
                }
                OutputFormat::Terminal => {
                    let width = all.iter().map(|s| s.name.len()).max().unwrap_or(0);
                    for s in &all {
                        println!("  {:<width$}  {}", s.name, s.description);
                    }
                }
                OutputFormat::Silent => {}
            }
            Ok(0)
        }

        Commands::Init => {
            let config_path = Path::new(".postcheck.toml");
            if config_path.exists() {
                eprintln!("{} already exists", config_path.display());
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {}", config_path.display());
            println!("\nEdit the file to configure:");
            println!("  - base_url: API under test");
            println!("  - timeout_secs: request timeout");
            println!("  - log_dir: where per-scenario log files go");
            Ok(0)
        }

        Commands::Schema => {
            println!("{}", postcheck_core::verdict::generate_schema());
            Ok(0)
        }
    }
}

/// All scenarios when `names` is empty, otherwise the named ones in the
/// order given.
fn select_scenarios(names: &[String]) -> Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(scenarios::all());
    }
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        match scenarios::find(name) {
            Some(s) => selected.push(s),
            None => {
                let known: Vec<_> = scenarios::all().iter().map(|s| s.name).collect();
                bail!("unknown scenario '{name}' (known: {})", known.join(", "));
            }
        }
    }
    Ok(selected)
}
