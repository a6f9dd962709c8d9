use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use food_index_core::config::Config;
use food_index_core::{read_json_records, save_records, CatalogError, Result};

mod args;
mod output;
mod session;

use args::{Cli, Commands, ConfigAction, Shell};
use output::print_foods;
use session::{require_category, Session};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);
    let data = cli.data.as_deref();

    let result = match cli.command {
        Some(Commands::Categories) => handle_categories(&base_dir, data),
        Some(Commands::Foods { category }) => {
            handle_listing(&base_dir, data, &category, Listing::Alphabetical)
        }
        Some(Commands::ByEnergy { category }) => {
            handle_listing(&base_dir, data, &category, Listing::EnergyDesc)
        }
        Some(Commands::ByProtein { category }) => {
            handle_listing(&base_dir, data, &category, Listing::ProteinDesc)
        }
        Some(Commands::EnergyRange { category, min, max }) => {
            handle_listing(&base_dir, data, &category, Listing::EnergyRange(min, max))
        }
        Some(Commands::ProteinRange { category, min, max }) => {
            handle_listing(&base_dir, data, &category, Listing::ProteinRange(min, max))
        }
        Some(Commands::RemoveCategory { name, dry_run }) => {
            handle_remove_category(&base_dir, data, &name, dry_run)
        }
        Some(Commands::RemoveFood {
            category,
            id,
            dry_run,
        }) => handle_remove_food(&base_dir, data, &category, id, dry_run),
        Some(Commands::Import { json, output }) => {
            handle_import(&base_dir, data, &json, output.as_deref())
        }
        Some(Commands::Stats) => handle_stats(&base_dir, data),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("FOOD_INDEX_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".food-index"))
        .unwrap_or_else(|| PathBuf::from(".food-index"))
}

fn handle_completions(shell: Shell) {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    clap_complete::generate(
        clap_complete::Shell::from(shell),
        &mut command,
        bin_name,
        &mut io::stdout(),
    );
}

fn handle_categories(base_dir: &Path, data: Option<&Path>) -> Result<()> {
    let catalog = Session::open(base_dir, data)?.load()?;

    if catalog.is_empty() {
        println!("{}", "No categories.".yellow());
        return Ok(());
    }

    println!();
    println!("{}", "=== CATEGORIES ===".bold());
    for (position, name) in catalog.category_names().enumerate() {
        println!("{:>3}. {}", position + 1, name.cyan());
    }
    println!();
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Listing {
    Alphabetical,
    EnergyDesc,
    ProteinDesc,
    EnergyRange(f64, f64),
    ProteinRange(f64, f64),
}

impl Listing {
    fn title(self, category: &str) -> String {
        match self {
            Self::Alphabetical => format!("FOODS: {category}"),
            Self::EnergyDesc => format!("BY ENERGY (highest first): {category}"),
            Self::ProteinDesc => format!("BY PROTEIN (highest first): {category}"),
            Self::EnergyRange(min, max) => {
                format!("ENERGY BETWEEN {min:.1} AND {max:.1} kcal: {category}")
            }
            Self::ProteinRange(min, max) => {
                format!("PROTEIN BETWEEN {min:.1} AND {max:.1} g: {category}")
            }
        }
    }

    /// Shown instead of a table when nothing matches.
    fn empty_message(self) -> String {
        match self {
            Self::Alphabetical | Self::EnergyDesc | Self::ProteinDesc => {
                "No foods in this category.".to_string()
            }
            Self::EnergyRange(min, max) => {
                format!("No foods with energy between {min:.1} and {max:.1} kcal.")
            }
            Self::ProteinRange(min, max) => {
                format!("No foods with protein between {min:.1} and {max:.1} g.")
            }
        }
    }
}

fn handle_listing(
    base_dir: &Path,
    data: Option<&Path>,
    category: &str,
    listing: Listing,
) -> Result<()> {
    let catalog = Session::open(base_dir, data)?.load()?;
    let category = require_category(&catalog, category)?;
    let title = listing.title(category.name());
    let empty = listing.empty_message();

    match listing {
        Listing::Alphabetical => print_foods(&title, &empty, category.list_alphabetical()),
        Listing::EnergyDesc => print_foods(&title, &empty, category.list_by_energy_desc()),
        Listing::ProteinDesc => print_foods(&title, &empty, category.list_by_protein_desc()),
        Listing::EnergyRange(min, max) => {
            print_foods(&title, &empty, category.range_by_energy(min, max))
        }
        Listing::ProteinRange(min, max) => {
            print_foods(&title, &empty, category.range_by_protein(min, max))
        }
    };
    Ok(())
}

fn handle_remove_category(
    base_dir: &Path,
    data: Option<&Path>,
    name: &str,
    dry_run: bool,
) -> Result<()> {
    let session = Session::open(base_dir, data)?;
    let mut catalog = session.load()?;

    let removed = catalog
        .remove_category(name)
        .ok_or_else(|| CatalogError::CategoryNotFound {
            name: name.to_string(),
        })?;

    if dry_run {
        println!(
            "{} category {} ({} foods)",
            "[DRY-RUN] Would remove".yellow(),
            removed.name().cyan(),
            removed.len()
        );
        return Ok(());
    }

    session.save(&catalog)?;
    println!(
        "{} category {} ({} foods)",
        "Removed:".green(),
        removed.name().cyan(),
        removed.len()
    );
    Ok(())
}

fn handle_remove_food(
    base_dir: &Path,
    data: Option<&Path>,
    category: &str,
    id: i32,
    dry_run: bool,
) -> Result<()> {
    let session = Session::open(base_dir, data)?;
    let mut catalog = session.load()?;

    require_category(&catalog, category)?;
    let removed = catalog
        .remove_food(category, id)
        .ok_or_else(|| CatalogError::FoodNotFound {
            category: category.to_string(),
            id,
        })?;

    if dry_run {
        println!(
            "{} {} {}",
            "[DRY-RUN] Would remove".yellow(),
            removed.id,
            removed.description
        );
        return Ok(());
    }

    session.save(&catalog)?;
    println!("{} {} {}", "Removed:".green(), removed.id, removed.description);
    Ok(())
}

fn handle_import(
    base_dir: &Path,
    data: Option<&Path>,
    json: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let session = Session::open(base_dir, data)?;
    let target = output.unwrap_or(session.data_path.as_path());

    let records = read_json_records(json)?;
    save_records(&records, target)?;

    println!(
        "{} {} foods from {} into {}",
        "Imported:".green(),
        records.len(),
        json.display(),
        target.display()
    );
    Ok(())
}

fn handle_stats(base_dir: &Path, data: Option<&Path>) -> Result<()> {
    let session = Session::open(base_dir, data)?;
    let catalog = session.load()?;

    println!();
    println!("{} {}", "Base dir:".bold(), session.base_dir.display());
    println!("{} {}", "Data file:".bold(), session.data_path.display());
    println!(
        "{} {}",
        "Removal strategy:".bold(),
        catalog.removal_strategy().as_str()
    );
    println!();
    for category in catalog.categories() {
        println!(
            "  {} {:>5}",
            format!("{:<45}", category.name()).cyan(),
            category.len()
        );
    }
    println!();
    println!("{} categories, {} foods", catalog.len(), catalog.food_count());
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Path => println!("{}", Config::path(base_dir).display()),
        ConfigAction::Init => {
            let path = Config::path(base_dir);
            if Config::init(base_dir)? {
                println!("{} {}", "Created:".green(), path.display());
            } else {
                println!("{} {} (left unchanged)", "Exists:".yellow(), path.display());
            }
        }
        ConfigAction::List => {
            let entries = Config::load(base_dir)?.list();
            let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
            for (key, value) in entries {
                println!("{} = {}", format!("{key:<width$}").cyan(), value);
            }
        }
        ConfigAction::Get { key } => {
            let value = Config::load(base_dir)?
                .get(&key)
                .ok_or_else(|| CatalogError::ConfigKeyNotFound { key: key.clone() })?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            let previous = config.get(&key);
            config.set(&key, &value)?;
            let path = config.save(base_dir)?;
            let current = config.get(&key).unwrap_or(value);
            match previous.filter(|old| *old != current) {
                Some(old) => println!("{} {key}: {old} -> {current}", "Updated:".green()),
                None => println!("{} {key} = {current}", "Unchanged:".green()),
            }
            tracing::info!(path = %path.display(), key = %key, "config updated");
        }
    }
    Ok(())
}
