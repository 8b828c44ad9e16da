//! CLI command definitions and argument parsing.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// NutriScan - Analyze nutrition labels with OCR and an LLM.
#[derive(Debug, Parser)]
#[command(name = "nutriscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Color theme
    #[arg(long, value_enum, global = true)]
    pub theme: Option<ThemeArg>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Perplexity API key
    #[arg(long, env = "PERPLEXITY_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (nutrient lines only)
    Quiet,
}

/// Theme options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ThemeArg {
    /// Colors for light terminals
    Light,
    /// Colors for dark terminals
    Dark,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a nutrition label
    Analyze(AnalyzeArgs),

    /// Parse an analysis reply that was already obtained
    Parse(ParseArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("input").required(true).args(["image", "text_file", "stdin"])))]
pub struct AnalyzeArgs {
    /// Photo or scan of the label (read with tesseract)
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// File with label text that was already recognized
    #[arg(short, long)]
    pub text_file: Option<PathBuf>,

    /// Read label text from stdin
    #[arg(long)]
    pub stdin: bool,

    /// OCR language (tesseract language code)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Ask follow-up questions after the analysis
    #[arg(long)]
    pub chat: bool,
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "stdin"])))]
pub struct ParseArgs {
    /// File containing the reply text
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read the reply from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Citation URL to attach (repeatable)
    #[arg(long = "citation")]
    pub citations: Vec<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ThemeArg> for crate::config::Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Light => crate::config::Theme::Light,
            ThemeArg::Dark => crate::config::Theme::Dark,
        }
    }
}
