use anyhow::Context;
use clap::Parser;
use offset_planner::core::enricher::enrich;
use offset_planner::core::search::SelectionSearch;
use offset_planner::core::ConfigProvider;
use offset_planner::domain::model::ProjectRecord;
use offset_planner::utils::{logger, validation::Validate};
use offset_planner::{LocalStorage, OffsetPipeline, PlannerEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-planner")]
#[command(about = "Offset planner driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "planner.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the search seed from config
    #[arg(long)]
    seed: Option<u64>,

    /// Show what would be planned without searching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based offset planner");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Some(seed) = args.seed {
        config.search.seed = Some(seed);
        tracing::info!("🔧 Search seed overridden to: {}", seed);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no search will run");
        return perform_dry_run(&config);
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::current_dir();
    let pipeline = OffsetPipeline::new(storage, config);
    let engine = PlannerEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Planning completed successfully!");
            println!("✅ Planning completed successfully!");
            println!("📁 Report saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Planning failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let minimums = config.group_minimums();

    println!("📋 Configuration Summary:");
    println!("  Source: {}", config.input.file);
    println!("  Target: {}", config.output.target);
    println!("  Budget: {}", config.money());
    println!("  Min continents: {}", config.constraints.min_continents);
    for (group, percent) in minimums.constrained() {
        println!("  Min {} share: {}%", group, percent);
    }
    match config.report.target_years {
        Some(years) => println!("  Report years: {}", years),
        None => println!("  Report years: none"),
    }
    println!("  Iterations: {}", config.iterations());
    if let Some(seed) = config.search.seed {
        println!("  Seed: {}", seed);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let request = config.plan_request();

    println!("🔍 Dry Run Analysis:");
    println!();

    let raw = std::fs::read(config.source_path())
        .with_context(|| format!("reading source file {}", config.source_path()))?;
    let records: Vec<ProjectRecord> = serde_json::from_slice(&raw)
        .with_context(|| format!("parsing projects from {}", config.source_path()))?;

    println!("📡 Source Analysis:");
    println!("  Records: {}", records.len());

    let projects = enrich(&records, &request.time_units)?;
    let search = SelectionSearch::new(
        &projects,
        request.money,
        request.constraints,
        request.search.clone(),
    );
    let affordable = search
        .pool()
        .iter()
        .filter(|project| project.price <= search.budget())
        .count();

    println!("  Searchable projects: {}", search.pool().len());
    println!("  Affordable within budget: {}", affordable);

    println!();
    println!("⚙️ Search:");
    println!("  Iterations: {}", request.search.iterations);
    match request.search.workers {
        Some(workers) => println!("  Workers: {}", workers),
        None => println!("  Workers: one per CPU"),
    }
    if let Some(limit) = request.search.time_limit {
        println!("  Time limit: {}s", limit.as_secs());
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
