//! CLI binary for degap: inspect control structure, find curriculum gaps, and
//! generate the intermediate examples that close them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use degap_core::config::DegapConfig;
use degap_core::corpus::collect_samples;
use degap_core::storage::ResultDir;
use degap_curriculum::{GenerationSpec, detect_gaps};
use degap_gen::provider::api_key_env;
use degap_gen::{LlmProvider, Outcome, RunConfig, create_provider, generate_element, run_degap};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "degap", about = "Curriculum gap detection for teaching examples")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Generation provider: ollama, openai, anthropic (overrides config)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model name (overrides config)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Base URL for Ollama or an OpenAI-compatible server (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the control structure of one source file
    Analyze {
        /// Source file to analyze
        file: PathBuf,

        /// Print one structural path per line instead of the depth listing
        #[arg(long)]
        paths: bool,
    },

    /// Report the new structural elements each corpus sample introduces
    DetectGaps {
        /// Corpus glob relative to the project root (overrides config)
        #[arg(long)]
        pattern: Option<String>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate one example program for the given elements
    Generate {
        /// Required elements, comma-separated (e.g. "for,for/if")
        #[arg(value_delimiter = ',')]
        elements: Vec<String>,

        /// Elements the program may use, comma-separated
        #[arg(long, value_delimiter = ',')]
        allow: Vec<String>,

        /// Explicit forbidden list, comma-separated (defaults to every other keyword)
        #[arg(long, value_delimiter = ',')]
        forbid: Option<Vec<String>>,

        /// Total attempts before giving up
        #[arg(long, default_value = "3")]
        max_attempts: usize,
    },

    /// Detect gaps and generate intermediate examples for each of them
    Run {
        /// Corpus glob relative to the project root (overrides config)
        #[arg(long)]
        pattern: Option<String>,

        /// Output directory for generated examples (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Total attempts per element (overrides config)
        #[arg(long)]
        max_attempts: Option<usize>,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let mut config = DegapConfig::load(&project_root)?;
    if let Some(provider) = &cli.provider {
        config.generation.provider.clone_from(provider);
    }
    if let Some(model) = &cli.model {
        config.generation.model.clone_from(model);
    }
    if let Some(base_url) = &cli.base_url {
        config.generation.base_url.clone_from(base_url);
    }
    tracing::debug!("project root {}, generation {:?}", project_root.display(), config.generation);

    match cli.command {
        Commands::Analyze { file, paths } => cmd_analyze(&project_root, &config, &file, paths),
        Commands::DetectGaps { pattern, json } => {
            cmd_detect_gaps(&project_root, &config, pattern, json)
        }
        Commands::Generate {
            elements,
            allow,
            forbid,
            max_attempts,
        } => cmd_generate(&config, elements, allow, forbid, max_attempts),
        Commands::Run {
            pattern,
            output,
            max_attempts,
        } => cmd_run(&project_root, &config, pattern, output, max_attempts),
    }
}

/// Build the configured provider, reading the API key from the environment.
fn build_provider(config: &DegapConfig) -> Result<Box<dyn LlmProvider>> {
    let generation = &config.generation;
    let api_key = api_key_env(&generation.provider).and_then(|var| std::env::var(var).ok());
    let provider = create_provider(
        &generation.provider,
        api_key.as_deref(),
        Some(generation.model.as_str()),
        Some(generation.base_url.as_str()),
        Duration::from_secs(generation.timeout_secs),
    )?;
    eprintln!(
        "Using provider {} (model {})",
        generation.provider,
        provider.model_name()
    );
    Ok(provider)
}

fn cmd_analyze(project_root: &Path, config: &DegapConfig, file: &Path, paths: bool) -> Result<()> {
    let path = project_root.join(file);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let vocab = config.vocabulary();

    if paths {
        let tree = degap_parser::parse_control_tree(&source, &vocab)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        for p in tree.paths() {
            println!("{}", p);
        }
    } else {
        let found = degap_parser::structures::control_structures(&source, &vocab)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        for occurrence in found {
            println!(
                "{}{} (line {})",
                "  ".repeat(occurrence.depth),
                occurrence.kind,
                occurrence.line
            );
        }
    }
    Ok(())
}

fn cmd_detect_gaps(
    project_root: &Path,
    config: &DegapConfig,
    pattern: Option<String>,
    json: bool,
) -> Result<()> {
    let pattern = pattern.unwrap_or_else(|| config.corpus.pattern.clone());
    let samples = collect_samples(project_root, &pattern)?;
    if samples.is_empty() {
        eprintln!("No samples match '{}' in {}", pattern, project_root.display());
        return Ok(());
    }

    let analysis = detect_gaps(&samples, &config.vocabulary())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }
    for record in &analysis.records {
        let elements: Vec<&str> = record.new_elements.iter().map(String::as_str).collect();
        println!(
            "{}: {} new: {} elements: [{}]",
            record.index,
            record.display_id(),
            record.gap_size(),
            elements.join(", ")
        );
    }
    eprintln!(
        "{} sample(s), {} gap(s)",
        analysis.records.len(),
        analysis.gap_count()
    );
    Ok(())
}

fn cmd_generate(
    config: &DegapConfig,
    elements: Vec<String>,
    allow: Vec<String>,
    forbid: Option<Vec<String>>,
    max_attempts: usize,
) -> Result<()> {
    let required: Vec<String> = elements
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();
    if required.is_empty() {
        anyhow::bail!("at least one element to generate is required");
    }
    let allowed = allow
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    let vocab = config.vocabulary();
    let mut spec = GenerationSpec::new(required, allowed, &vocab);
    if let Some(forbid) = forbid {
        let forbid = forbid
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        spec = spec.with_forbidden(forbid);
    }

    eprintln!("Required:  {:?}", spec.required);
    eprintln!("Allowed:   {:?}", spec.allowed);
    eprintln!("Forbidden: {:?}", spec.forbidden);

    let provider = build_provider(config)?;
    let result = generate_element(
        provider.as_ref(),
        &spec,
        &vocab,
        max_attempts,
        &config.generation.language,
    );

    for note in &result.feedback {
        eprintln!("  {}", note);
    }
    match result.outcome {
        Outcome::Accepted => {
            eprintln!(
                "Code meets the requirements (attempt {}).",
                result.attempts
            );
            if let Some(code) = &result.code {
                println!("{}", code);
            }
        }
        Outcome::Exhausted => {
            eprintln!(
                "Failed to generate code that meets the requirements after {} attempt(s).",
                result.attempts
            );
            eprintln!("  Missing:   {:?}", result.validation.missing);
            eprintln!("  Forbidden: {:?}", result.validation.forbidden_used);
            eprintln!("  All paths: {:?}", result.validation.all_paths);
        }
    }
    Ok(())
}

fn cmd_run(
    project_root: &Path,
    config: &DegapConfig,
    pattern: Option<String>,
    output: Option<PathBuf>,
    max_attempts: Option<usize>,
) -> Result<()> {
    let pattern = pattern.unwrap_or_else(|| config.corpus.pattern.clone());
    let samples = collect_samples(project_root, &pattern)?;
    if samples.is_empty() {
        eprintln!("No samples match '{}' in {}", pattern, project_root.display());
        return Ok(());
    }

    let vocab = config.vocabulary();
    let analysis = detect_gaps(&samples, &vocab)?;
    eprintln!(
        "Analyzed {} sample(s): {} gap(s) to close",
        analysis.records.len(),
        analysis.gap_count()
    );

    let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let result_dir = ResultDir::prepare(&project_root.join(output_dir), &config.generation.language)?;

    let provider = build_provider(config)?;
    let run_config = RunConfig {
        provider: provider.as_ref(),
        vocab: &vocab,
        output: &result_dir,
        max_attempts: max_attempts.unwrap_or(config.generation.max_attempts),
        language: &config.generation.language,
        on_exhausted: config.generation.on_exhausted,
        show_progress: true,
    };
    let report = run_degap(&analysis, &run_config)?;

    println!("{}", report);
    for element in report.needs_manual_authoring() {
        eprintln!(
            "  needs a hand-written example: {} (before {})",
            element.artifact.display(),
            element.insert_before
        );
    }
    eprintln!(
        "Report written to {}",
        result_dir.root().join(degap_core::storage::REPORT_FILE).display()
    );
    Ok(())
}
