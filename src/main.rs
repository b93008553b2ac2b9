// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use subtrans::app_config::{self, Config};
use subtrans::app_controller::Controller;
use subtrans::errors::TranslationError;
use subtrans::language_utils;
use subtrans::session::Session;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an SRT subtitle file
    Translate(TranslateArgs),

    /// Check that the session file holds a usable token
    Validate {
        /// Session file path (defaults to the configured one)
        #[arg(short, long)]
        session: Option<PathBuf>,

        /// Configuration file path
        #[arg(long = "config", default_value = "conf.json")]
        config_path: PathBuf,
    },

    /// Generate shell completions for subtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input SRT file
    #[arg(short, long, value_name = "INPUT")]
    input: PathBuf,

    /// Output SRT file (defaults to <stem>_translated.srt next to the input)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Target language code (e.g. 'zh-TW', 'ja', 'fr')
    #[arg(short = 'l', long)]
    target_language: Option<String>,

    /// Cues per request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Context cues shown on each side of a batch
    #[arg(short, long)]
    context_size: Option<usize>,

    /// Model name to request
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(long = "config", default_value = "conf.json")]
    config_path: PathBuf,

    /// Session file path
    #[arg(long)]
    session: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force: bool,
}

/// subtrans - batch SRT subtitle translation
#[derive(Parser, Debug)]
#[command(name = "subtrans")]
#[command(version)]
#[command(about = "Translate SRT subtitles with a language model")]
#[command(long_about = "subtrans translates SRT subtitle files in batches, showing the model a few
neighbouring lines for context and keeping the original text wherever a translation fails.

EXAMPLES:
    subtrans translate -i movie.srt                  # Translate into the configured language
    subtrans translate -i movie.srt -l ja -f         # Translate into Japanese, overwrite output
    subtrans translate -i movie.srt -b 20 -c 3       # Smaller batches, more context
    subtrans validate --session chatgpt.session.json # Check the session token
    subtrans completions bash > subtrans.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically. Command line flags
    override values from the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger; the effective level is adjusted with log::set_max_level
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());

            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialise logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtrans", &mut std::io::stdout());
            Ok(())
        }
        Commands::Validate { session, config_path } => run_validate(session, config_path),
        Commands::Translate(args) => run_translate(args).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

// @loads: Config file with CLI overrides applied
fn load_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(batch_size) = options.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(context_size) = options.context_size {
        config.context_size = context_size;
    }
    if let Some(model) = &options.model {
        config.provider.model = model.clone();
    }
    if let Some(session) = &options.session {
        config.session_file = session.to_string_lossy().to_string();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(log_level) = &options.log_level {
        log::set_max_level(app_config::LogLevel::from(log_level.clone()).to_level_filter());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    info!("Input: {}", options.input.display());
    info!("Target language: {} ({})", language_utils::get_display_name(&config.target_language), config.target_language);
    info!("Batch size: {}, context: {}", config.batch_size, config.context_size);

    let controller = Controller::with_config(config)?;

    let cancel_flag = controller.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current batch");
            cancel_flag.store(true, Ordering::SeqCst);
        }
    });

    match controller.run(&options.input, options.output, options.force).await {
        Ok(report) => {
            info!("{}", report.summary);
            info!("Output: {}", report.output_path.display());
            Ok(())
        }
        Err(e) => {
            if let Some(TranslationError::Cancelled { completed_batches, total_batches }) = e.downcast_ref() {
                warn!("Cancelled after {}/{} batches, no output written", completed_batches, total_batches);
            }
            Err(e)
        }
    }
}

fn run_validate(session_path: Option<PathBuf>, config_path: PathBuf) -> Result<()> {
    let path = match session_path {
        Some(path) => path,
        None => PathBuf::from(Config::load_or_default(&config_path)?.session_file),
    };

    let session = Session::load(&path)?;
    let remaining = session.validate(Utc::now())?;

    info!("Session: {}", path.display());
    info!("Provider: {}", session.provider().unwrap_or("unknown"));
    match session.account_id() {
        Some(account_id) => info!("Account: {}", account_id),
        None => warn!("No account id in session"),
    }
    match remaining {
        Some(remaining) => info!("Expires in {}h {}m", remaining.num_hours(), remaining.num_minutes() % 60),
        None => info!("No readable expiry, assuming the token is valid"),
    }
    info!("Session is valid");

    Ok(())
}
