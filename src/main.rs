//! vulnscan - Vulnerability Scanner CLI
//!
//! Scans a source file for vulnerabilities and optionally forwards the
//! result to the Telegram notifier.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vulnscan::{
    config::{Config, DecisionMode},
    notifier::TelegramNotifier,
    report::{create_reporter, OutputFormat},
    Scanner,
};

/// Lexical vulnerability classifier for source files
#[derive(Parser)]
#[command(name = "vulnscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum ModeArg {
    Classifier,
    Patterns,
}

impl From<ModeArg> for DecisionMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Classifier => DecisionMode::Classifier,
            ModeArg::Patterns => DecisionMode::Patterns,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a source file
    Scan {
        /// File to scan
        file: PathBuf,

        /// Decision policy
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Directory holding the trained model artifacts
        #[arg(long)]
        model_dir: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "json")]
        format: FormatArg,

        /// Forward the result to the Telegram notifier
        #[arg(long)]
        notify: bool,
    },

    /// Send a scan result to the Telegram notifier
    Notify {
        /// Name of the analyzed file
        file_name: String,

        /// Raw JSON scan result
        result_json: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 if cli.quiet => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level.to_string())),
        )
        .init();

    // Load configuration
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Scan {
            file,
            mode,
            model_dir,
            format,
            notify,
        } => {
            // Override with CLI options
            if let Some(mode) = mode {
                config.decision.mode = mode.into();
            }
            if let Some(dir) = model_dir {
                config.model.dir = dir;
            }

            if !file.exists() {
                error!("input file not found: {}", file.display());
                std::process::exit(1);
            }

            let mode = config.decision.mode;
            let notifier_config = config.notifier.clone();
            let scanner = Scanner::new(config)?;
            let result = scanner.scan_file(&file)?;

            let reporter = create_reporter(format.into(), mode);
            let report = reporter.generate(&result);
            println!("{}", report);

            if notify {
                let json = create_reporter(OutputFormat::Json, mode).generate(&result);
                let notifier = TelegramNotifier::new(&notifier_config)?;
                notifier.notify(&file.display().to_string(), &json)?;
                info!("alert sent");
            }
        }

        Commands::Notify {
            file_name,
            result_json,
        } => {
            let notifier = TelegramNotifier::new(&config.notifier)?;
            notifier.notify(&file_name, &result_json)?;
            info!("alert sent");
        }
    }

    Ok(())
}
