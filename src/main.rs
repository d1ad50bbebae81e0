use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use simdconv::{execute_task_with, simd, BinaryMatrixFile, ConvolveStrategy, Task};

/// Valid-mode 2D integer convolution over task directories.
///
/// Each task directory holds `a.bin` (input) and `b.bin` (kernel) and receives
/// `out.bin`.
#[derive(Parser)]
#[command(name = "simdconv")]
#[command(author, version, about)]
struct Cli {
    /// Task directories, run in order
    tasks: Vec<PathBuf>,

    /// File listing one task directory per line ('#' starts a comment)
    #[arg(long, value_name = "FILE")]
    task_list: Option<PathBuf>,

    /// Convolution kernel: `naive` (alias `scalar`) or `simd`
    #[arg(long, value_name = "KERNEL", default_value_t = ConvolveStrategy::Naive)]
    kernel: ConvolveStrategy,
}

fn parse_task_list(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

fn read_task_list(path: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read task list {}", path.display()))?;
    Ok(parse_task_list(&content))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut dirs = cli.tasks;
    if let Some(list) = &cli.task_list {
        dirs.extend(read_task_list(list)?);
    }
    if dirs.is_empty() {
        bail!("no tasks given: pass task directories or --task-list");
    }

    let strategy = cli.kernel;
    debug!(backend = simd::active_backend(), %strategy, tasks = dirs.len(), "starting");

    for dir in dirs {
        let task = Task::new(dir);
        let report = execute_task_with(&BinaryMatrixFile, &task, strategy)
            .with_context(|| format!("task {} failed", task.dir().display()))?;
        println!("{report}");
    }

    info!("all tasks finished");

    Ok(())
}
