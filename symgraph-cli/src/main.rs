//! File-driven front-end: reads a jobs JSON file, resolves the batch, writes a results JSON
//! file, and optionally fills the placeholders of a generated script template.

use anyhow::Context as _;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use symgraph_resolver::{resolve_batch, ResolverConfig, Task};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "symgraph", version)]
struct Cli {
    /// Input jobs JSON (an array of task records).
    #[arg(long)]
    jobs: PathBuf,

    /// Output results JSON path.
    #[arg(long, default_value = "cas_results.json")]
    out: PathBuf,

    /// Template whose `[[CAS:<id>]]` placeholders are filled with the typeset results.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Where to write the substituted template. Defaults to the template path with a `final`
    /// extension.
    #[arg(long, requires = "template")]
    filled: Option<PathBuf>,

    /// Print a per-task summary (id, operation, expression, typeset result) to stdout.
    #[arg(long)]
    summary: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // a missing jobs file is not an error: the upstream stage produced no jobs for this run
    if !cli.jobs.exists() {
        fs::write(&cli.out, "[]\n")
            .with_context(|| format!("failed to write {}", cli.out.display()))?;
        info!(path = %cli.out.display(), "no jobs file; wrote empty results");
        return Ok(ExitCode::SUCCESS);
    }

    let raw = fs::read_to_string(&cli.jobs)
        .with_context(|| format!("failed to read {}", cli.jobs.display()))?;
    let tasks: Vec<Task> =
        serde_json::from_str(&raw).context("jobs file is not a valid task array")?;

    let resolution = match resolve_batch(tasks, &ResolverConfig::default()) {
        Ok(resolution) => resolution,
        Err(err) => {
            err.report_to_stderr();
            return Ok(ExitCode::FAILURE);
        },
    };

    let json = serde_json::to_string_pretty(resolution.results())
        .context("failed to serialize results")?;
    fs::write(&cli.out, format!("{}\n", json))
        .with_context(|| format!("failed to write {}", cli.out.display()))?;
    info!(results = resolution.results().len(), path = %cli.out.display(), "results written");

    if let Some(template_path) = &cli.template {
        let template = fs::read_to_string(template_path)
            .with_context(|| format!("failed to read {}", template_path.display()))?;
        match resolution.fill_template(&template) {
            Ok(filled) => {
                let target = cli
                    .filled
                    .clone()
                    .unwrap_or_else(|| template_path.with_extension("final"));
                fs::write(&target, filled)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                info!(path = %target.display(), "template substituted");
            },
            Err(err) => {
                err.report_to_stderr();
                return Ok(ExitCode::FAILURE);
            },
        }
    }

    if cli.summary {
        print!("{}", resolution.summary());
    }

    Ok(ExitCode::SUCCESS)
}
