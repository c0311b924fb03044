//! Per-frame scheduling of pair tasks on a bounded worker pool.
//!
//! Every frame starts one task per main assignment. Whenever a task finishes
//! it hands its slot to the next pending remainder singleton, so at most
//! `n_workers` tasks run at once. The frame returns only after every task has
//! terminated.

use crate::error::{PcfError, PcfResult};
use crate::pcf::histogram::PairAccumulator;
use crate::pcf::kernel::{PairKernel, TaskSummary};
use crate::pcf::partition::{partition, WorkAssignment, WorkPlan};
use rayon::{Scope, ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Main,
    Remainder,
}

#[derive(Debug)]
struct TaskOutcome {
    kind: TaskKind,
    assignment: WorkAssignment,
    result: PcfResult<TaskSummary>,
}

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: usize,
    pub main_tasks: usize,
    pub remainder_tasks: usize,
    /// First-molecule indices visited, sorted.
    pub first_indices: Vec<usize>,
    pub pairs: usize,
}

/// Build the worker pool used for every frame of a run.
pub fn build_worker_pool(n_workers: usize) -> PcfResult<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(n_workers)
        .thread_name(|i| format!("pcf-worker-{}", i))
        .build()
        .map_err(|e| PcfError::Config(format!("failed to create worker pool: {}", e)))
}

pub struct FrameOrchestrator {
    pool: ThreadPool,
    plan: WorkPlan,
    n_molecules: usize,
}

impl FrameOrchestrator {
    pub fn new(n_molecules: usize, n_workers: usize) -> PcfResult<Self> {
        let plan = partition(n_molecules, n_workers)?;
        let pool = build_worker_pool(n_workers)?;
        debug!(
            "Partitioned {} molecules over {} workers: {} per worker, {} remainder",
            n_molecules,
            n_workers,
            plan.stride_count(),
            plan.remainder.len()
        );
        Ok(Self {
            pool,
            plan,
            n_molecules,
        })
    }

    /// Run every pair task of one frame and wait for all of them.
    ///
    /// The first task error aborts the frame: no further remainder tasks are
    /// started, running tasks stop at their next molecule, and the error is
    /// returned once the pool has drained.
    pub fn run_frame<A: PairAccumulator>(
        &self,
        frame: usize,
        kernel: &PairKernel<'_>,
        accumulator: &A,
    ) -> PcfResult<FrameReport> {
        if kernel.n_molecules() != self.n_molecules {
            return Err(PcfError::PlanMismatch(format!(
                "frame {} holds {} molecules but work was planned for {}",
                frame,
                kernel.n_molecules(),
                self.n_molecules
            )));
        }

        let abort = AtomicBool::new(false);
        let next_remainder = AtomicUsize::new(0);
        let ctx = FrameContext {
            kernel,
            accumulator,
            abort: &abort,
            next_remainder: &next_remainder,
            remainder: &self.plan.remainder,
        };
        let (tx, rx) = mpsc::channel();

        let ctx = &ctx;
        self.pool.scope(move |scope| {
            for &assignment in &self.plan.main {
                let tx = tx.clone();
                scope.spawn(move |scope| ctx.execute(scope, assignment, TaskKind::Main, tx));
            }
        });

        let mut report = FrameReport {
            frame,
            ..FrameReport::default()
        };
        let mut failure = None;
        for outcome in rx.try_iter() {
            match outcome.kind {
                TaskKind::Main => report.main_tasks += 1,
                TaskKind::Remainder => report.remainder_tasks += 1,
            }
            match outcome.result {
                Ok(summary) => {
                    report.first_indices.extend(summary.first_indices);
                    report.pairs += summary.pairs;
                }
                Err(err) => {
                    warn!(
                        "Pair task starting at molecule {} failed in frame {}: {}",
                        outcome.assignment.start, frame, err
                    );
                    failure.get_or_insert(err);
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }
        report.first_indices.sort_unstable();
        Ok(report)
    }
}

struct FrameContext<'a, A> {
    kernel: &'a PairKernel<'a>,
    accumulator: &'a A,
    abort: &'a AtomicBool,
    next_remainder: &'a AtomicUsize,
    remainder: &'a [WorkAssignment],
}

impl<'a, A: PairAccumulator> FrameContext<'a, A> {
    fn execute<'scope>(
        &'scope self,
        scope: &Scope<'scope>,
        assignment: WorkAssignment,
        kind: TaskKind,
        tx: Sender<TaskOutcome>,
    ) where
        'a: 'scope,
    {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.kernel.run(assignment, self.accumulator, self.abort)
        }))
        .unwrap_or_else(|payload| {
            Err(PcfError::WorkerPanicked {
                start: assignment.start,
                message: panic_message(payload.as_ref()),
            })
        });

        if result.is_err() {
            self.abort.store(true, Ordering::SeqCst);
        }
        // The receiver outlives the scope, so a send cannot fail here.
        let _ = tx.send(TaskOutcome {
            kind,
            assignment,
            result,
        });

        if self.abort.load(Ordering::SeqCst) {
            return;
        }
        let slot = self.next_remainder.fetch_add(1, Ordering::SeqCst);
        if let Some(&next) = self.remainder.get(slot) {
            scope.spawn(move |scope| self.execute(scope, next, TaskKind::Remainder, tx));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
