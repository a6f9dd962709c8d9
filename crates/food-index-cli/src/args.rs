use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "food-index")]
#[command(about = "Browse and edit an indexed food composition catalog")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.food-index)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Binary data file (overrides data.path from config)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
            Shell::Elvish => Self::Elvish,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all categories
    Categories,

    /// List the foods of a category in alphabetical order
    Foods {
        /// Category name (exact, case-sensitive)
        category: String,
    },

    /// List the foods of a category by energy, highest first
    ByEnergy {
        /// Category name (exact, case-sensitive)
        category: String,
    },

    /// List the foods of a category by protein, highest first
    ByProtein {
        /// Category name (exact, case-sensitive)
        category: String,
    },

    /// List foods whose energy (kcal) lies in [min, max]
    EnergyRange {
        /// Category name (exact, case-sensitive)
        category: String,

        /// Lower bound, inclusive
        #[arg(allow_negative_numbers = true)]
        min: f64,

        /// Upper bound, inclusive
        #[arg(allow_negative_numbers = true)]
        max: f64,
    },

    /// List foods whose protein (g) lies in [min, max]
    ProteinRange {
        /// Category name (exact, case-sensitive)
        category: String,

        /// Lower bound, inclusive
        #[arg(allow_negative_numbers = true)]
        min: f64,

        /// Upper bound, inclusive
        #[arg(allow_negative_numbers = true)]
        max: f64,
    },

    /// Remove a category and all of its foods
    RemoveCategory {
        /// Category name (exact, case-sensitive)
        name: String,

        /// Show what would be removed without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove one food from a category
    RemoveFood {
        /// Category name (exact, case-sensitive)
        category: String,

        /// Food number
        #[arg(allow_negative_numbers = true)]
        id: i32,

        /// Show what would be removed without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert a JSON export into the binary data file
    Import {
        /// JSON file (array of objects with Numero, Descricao, ...)
        json: PathBuf,

        /// Output file (default: the configured data file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show category and food counts
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., index.removal)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., index.removal)
        key: String,

        /// Value to set (e.g., "surgical")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Create config file with the default template
    Init,
}
