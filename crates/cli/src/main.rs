use anyhow::{Context, Result};
use catalog_model::{ManifestCatalog, ModelCatalog, ModelRecord};
use catalog_selector::Selector;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog-select")]
#[command(about = "Select models from a catalog manifest using dependency-aware expressions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List selected models with their metadata
    List(SelectArgs),

    /// Print resolved model names, one per line
    Resolve(SelectArgs),
}

#[derive(Args)]
struct SelectArgs {
    /// Path to the catalog manifest (JSON)
    #[arg(long, default_value = "manifest.json")]
    manifest: PathBuf,

    /// Model selection, e.g. 'tag:marketing,+downstream_model'.
    /// Omitted: the whole catalog. Empty string: nothing.
    #[arg(long)]
    select: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::List(args) => run_list(args, cli.verbose),
        Commands::Resolve(args) => run_resolve(args),
    };

    if let Err(err) = result {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn load_models(args: &SelectArgs) -> Result<Vec<ModelRecord>> {
    ManifestCatalog::new(&args.manifest)
        .list_models()
        .with_context(|| format!("Failed to load manifest {}", args.manifest.display()))
}

/// Matching records in name order. No `--select` means the whole catalog,
/// the command's own default; the engine itself treats empty as nothing.
fn selected<'a>(
    models: &'a [ModelRecord],
    select: Option<&str>,
) -> Result<Vec<&'a ModelRecord>> {
    let mut records = match select {
        Some(expression) => Selector::new(models)?.select(expression)?,
        None => models.iter().collect(),
    };
    records.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(records)
}

fn run_list(args: &SelectArgs, verbose: bool) -> Result<()> {
    let models = load_models(args)?;
    let records = selected(&models, args.select.as_deref())?;
    let using = args.select.as_deref().unwrap_or("*");

    if records.is_empty() {
        println!("No models selected using '{using}'");
        return Ok(());
    }

    println!("Selected {} model(s) using '{using}':", records.len());
    for (idx, model) in records.iter().enumerate() {
        println!(
            "{}. {} ({}, {})",
            idx + 1,
            model.name,
            model.materialization.as_deref().unwrap_or("unknown"),
            model.schema.as_deref().unwrap_or("unknown"),
        );
        if verbose {
            if let Some(description) = &model.description {
                println!("   Description: {description}");
            }
            if let Some(path) = &model.path {
                println!("   Path: {path}");
            }
            if !model.tags.is_empty() {
                println!("   Tags: {}", model.tags.join(", "));
            }
            println!();
        }
    }

    Ok(())
}

fn run_resolve(args: &SelectArgs) -> Result<()> {
    let models = load_models(args)?;

    for record in selected(&models, args.select.as_deref())? {
        println!("{}", record.name);
    }

    Ok(())
}
