//! Trace Classifier - handwritten digit recognition by stroke direction
//!
//! Encodes, classifies and evaluates recorded digit traces.

use std::path::{Path, PathBuf};
use trace_classifier::app::cli::{ClassifierKind, Cli, Commands, ConfigAction};
use trace_classifier::app::config::Config;
use trace_classifier::classify::{Classifier, RandomClassifier};
use trace_classifier::encoding::CollectingSink;
use trace_classifier::evaluation::{EvaluationRun, Harness};
use trace_classifier::trace::repository::load_trace;
use trace_classifier::FileTraceRepository;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Some(path) = &cli.config {
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
        }
    }
    let config_path = Config::resolve_path(cli.config.clone());
    let config = Config::load_or_default(&config_path)?;

    match cli.command {
        Commands::Encode { trace, explain } => {
            run_encode(&trace, explain, &config)?;
        }
        Commands::Classify { trace, explain } => {
            run_classify(&trace, explain, &config)?;
        }
        Commands::Evaluate {
            corpus,
            classifier,
            seed,
            parallel,
            json,
            show_failures,
        } => {
            let dir = corpus.unwrap_or_else(|| config.evaluation.corpus_dir.clone());
            let seed = seed.unwrap_or(config.evaluation.seed);
            let parallel = parallel || config.evaluation.parallel;
            run_evaluate(&dir, classifier, seed, parallel, json, show_failures, &config)?;
        }
        Commands::Init { force } => {
            run_init(force, &config_path, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, &config_path, &config)?;
        }
    }

    Ok(())
}

fn run_encode(path: &Path, explain: bool, config: &Config) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Trace file not found: {:?}", path);
    }

    let trace = load_trace(path)?;
    let encoder = config.classifier.build_encoder()?;
    let mut sink = CollectingSink::new();
    let encoded = encoder.encode_with(&trace, &mut sink)?;

    if explain {
        print_segments(&sink);
    }
    println!("{}", encoded);

    Ok(())
}

fn run_classify(path: &Path, explain: bool, config: &Config) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Trace file not found: {:?}", path);
    }

    let trace = load_trace(path)?;
    let classifier = config.build_classifier()?;

    let result = if explain {
        let mut sink = CollectingSink::new();
        let result = classifier.classify_with(&trace, &mut sink)?;
        print_segments(&sink);
        if let Some(encoded) = sink.encoded.first() {
            println!("Encoded: {}", encoded);
        }
        if let Some((label, pattern)) = sink.matches.first() {
            println!("Matched digit {} with {:?}", label, pattern);
        }
        result
    } else {
        classifier.classify(&trace)?
    };

    match result {
        Some(label) => println!("{}", label),
        None => println!("unrecognized"),
    }

    Ok(())
}

fn print_segments(sink: &CollectingSink) {
    println!("{:>4}  {:>18}  {:>18}  {:>8}  {:>3}", "#", "from", "to", "angle", "dir");
    for (i, segment) in sink.segments.iter().enumerate() {
        println!(
            "{:>4}  {:>18}  {:>18}  {:>8.2}  {:>3}",
            i,
            format!("({:.1}, {:.1})", segment.from.x, segment.from.y),
            format!("({:.1}, {:.1})", segment.to.x, segment.to.y),
            segment.angle,
            segment.direction
        );
    }
}

fn run_evaluate(
    dir: &Path,
    kind: ClassifierKind,
    seed: u64,
    parallel: bool,
    json: bool,
    show_failures: bool,
    config: &Config,
) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Trace repository not found: {:?}", dir);
    }

    let mut repository = FileTraceRepository::new(dir);
    let loaded = repository.pull()?;
    info!("Loaded {} traces from {:?}", loaded, dir);

    let classifier: Box<dyn Classifier> = match kind {
        ClassifierKind::Pattern => Box::new(config.build_classifier()?),
        ClassifierKind::Random => Box::new(RandomClassifier::new(seed)),
    };

    let harness = Harness::new(&repository);
    let run = if parallel {
        harness.run_parallel(classifier.as_ref())
    } else {
        harness.run(classifier.as_ref())
    };

    if !run.summary.has_data() {
        warn!("No traces to evaluate in {:?}", dir);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&run.summary)?);
    } else {
        print_summary(&run);
    }

    if show_failures {
        print_failures(&run);
    }

    Ok(())
}

fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(p) => format!("{:.1}%", p),
        None => "n/a".to_string(),
    }
}

fn print_summary(run: &EvaluationRun<'_>) {
    let summary = &run.summary;

    println!("\nClassifier: {}", run.classifier);
    println!(
        "  Passed: {}/{} ({})",
        summary.passed_count(),
        summary.total_count(),
        format_percentage(summary.passed_percentage())
    );
    println!(
        "  Failed: {} ({}), unrecognized {}, errors {}",
        summary.failed_count(),
        format_percentage(summary.failed_percentage()),
        summary.unrecognized_count(),
        summary.error_count()
    );

    println!("\nPer digit:");
    for (label, score) in summary.labels() {
        let confusion: Vec<String> = score
            .confusion
            .iter()
            .map(|(wrong, count)| format!("{}x{}", wrong, count))
            .collect();

        println!(
            "  {}: {}/{} ({}) unrecognized {} errors {}{}",
            label,
            score.passed,
            score.total,
            format_percentage(score.passed_percentage()),
            score.unrecognized,
            score.errors,
            if confusion.is_empty() {
                String::new()
            } else {
                format!("  confused with {}", confusion.join(", "))
            }
        );
    }
}

fn print_failures(run: &EvaluationRun<'_>) {
    println!("\nFailures:");
    for case in run.failures() {
        let actual = case
            .outcome()
            .map(|o| o.code().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  expected {} got {:>2}  (trace {} on {}, {} points)",
            case.expected,
            actual,
            case.trace.ms(),
            case.trace.date(),
            case.trace.len()
        );
    }
}

fn run_init(force: bool, config_path: &PathBuf, config: &Config) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save(config_path)?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    Ok(())
}

fn run_config(action: ConfigAction, config_path: &PathBuf, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Configuration ({:?}):\n", config_path);
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Get { key } => match config.get(&key)? {
            Some(value) => println!("{} = {}", key, value),
            None => anyhow::bail!("Configuration key '{}' not found", key),
        },
        ConfigAction::Reset { force } => {
            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save(config_path)?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}
