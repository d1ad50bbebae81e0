//! Task orchestration: read two operands, convolve, time, write, release.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::convolve::{convolve_with, ConvolveStrategy};
use crate::error::{Result, TaskPhase};
use crate::io::{BinaryMatrixFile, MatrixStore};

/// Resolves the three resources a task works with.
pub trait TaskPaths {
    fn a_matrix_path(&self) -> PathBuf;
    fn b_matrix_path(&self) -> PathBuf;
    fn output_matrix_path(&self) -> PathBuf;

    /// Short name used in logs and reports.
    fn label(&self) -> String {
        self.output_matrix_path().display().to_string()
    }
}

/// A task directory holding `a.bin` and `b.bin` and receiving `out.bin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    dir: PathBuf,
}

impl Task {
    pub const A_FILE: &'static str = "a.bin";
    pub const B_FILE: &'static str = "b.bin";
    pub const OUTPUT_FILE: &'static str = "out.bin";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TaskPaths for Task {
    fn a_matrix_path(&self) -> PathBuf {
        self.dir.join(Self::A_FILE)
    }

    fn b_matrix_path(&self) -> PathBuf {
        self.dir.join(Self::B_FILE)
    }

    fn output_matrix_path(&self) -> PathBuf {
        self.dir.join(Self::OUTPUT_FILE)
    }

    fn label(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Outcome of a successful task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub label: String,
    pub output_shape: (usize, usize),
    /// Wall time of the convolution alone. Reading and writing are excluded.
    pub elapsed: Duration,
    pub started_at: DateTime<Local>,
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime: {:.6}", self.elapsed.as_secs_f64())
    }
}

/// Runs `task` against the binary file store with the naive kernel.
pub fn execute_task(task: &Task) -> Result<TaskReport> {
    execute_task_with(&BinaryMatrixFile, task, ConvolveStrategy::Naive)
}

/// Runs one task end to end.
///
/// Each failure is returned as [`SimdconvError::Task`](crate::error::SimdconvError::Task)
/// naming the phase that failed. Operands already loaded are released before
/// returning, and no output is written unless the convolution succeeded.
pub fn execute_task_with<S, T>(store: &S, task: &T, strategy: ConvolveStrategy) -> Result<TaskReport>
where
    S: MatrixStore + ?Sized,
    T: TaskPaths + ?Sized,
{
    let label = task.label();
    let started_at = Local::now();

    let result = run(store, task, strategy);
    match result {
        Ok((output_shape, elapsed)) => {
            let report = TaskReport {
                label,
                output_shape,
                elapsed,
                started_at,
            };
            info!(
                task = %report.label,
                started_at = %report.started_at.to_rfc3339(),
                rows = output_shape.0,
                cols = output_shape.1,
                %strategy,
                runtime_secs = elapsed.as_secs_f64(),
                "task finished"
            );
            Ok(report)
        }
        Err(err) => {
            warn!(task = %label, error = %err, "task failed");
            Err(err)
        }
    }
}

/// Operands and output are released in acquisition order (A, B, output) on
/// every path, including failures.
fn run<S, T>(store: &S, task: &T, strategy: ConvolveStrategy) -> Result<((usize, usize), Duration)>
where
    S: MatrixStore + ?Sized,
    T: TaskPaths + ?Sized,
{
    let a = store
        .read(&task.a_matrix_path())
        .map_err(|err| err.during(TaskPhase::ReadA))?;
    let mut b = match store.read(&task.b_matrix_path()) {
        Ok(b) => b,
        Err(err) => {
            drop(a);
            return Err(err.during(TaskPhase::ReadB));
        }
    };

    debug!(a = ?a.shape(), b = ?b.shape(), "operands loaded");

    let timer = Instant::now();
    let output = match convolve_with(&a, &mut b, strategy) {
        Ok(output) => output,
        Err(err) => {
            drop(a);
            drop(b);
            return Err(err.during(TaskPhase::Convolve));
        }
    };
    let elapsed = timer.elapsed();

    let written = store.write(&task.output_matrix_path(), &output);
    let shape = output.shape();

    drop(a);
    drop(b);
    drop(output);

    written.map_err(|err| err.during(TaskPhase::Write))?;

    Ok((shape, elapsed))
}
