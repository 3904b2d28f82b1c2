//! Applies the continuity oracle to a whole collection of topologies on a
//! fixed pool of worker threads.
//!
//! Workers share two FIFO queues: they steal one topology at a time from the
//! task queue until it reports empty, and push verdicts onto the result
//! queue. The pool scope is the join barrier; results are drained once every
//! worker has returned.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use crossbeam_deque::{Injector, Steal};
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::{
    algebra::operation::Operation,
    config::FilterConfig,
    continuity::oracle,
    error::{Error, Result},
    lattices::subset::BaseSet,
    topology::finite::{Topology, TopologySet},
};

/// Result of filtering one collection.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Topologies the operation is continuous with.
    pub compatible: TopologySet,
    /// Topologies whose evaluation failed, with the failure message. They are
    /// in neither the compatible set nor considered incompatible.
    pub unknown: Vec<(Topology, String)>,
}

enum Verdict {
    Compatible(Topology),
    Unknown(Topology, String),
}

/// Worker pool that keeps the topologies an operation is continuous with.
pub struct ParallelFilter<'a, O: ?Sized> {
    base: &'a BaseSet,
    operation: &'a O,
    config: FilterConfig,
}

impl<'a, O> ParallelFilter<'a, O>
where
    O: Operation + ?Sized,
{
    pub fn new(base: &'a BaseSet, operation: &'a O, config: FilterConfig) -> Self {
        Self {
            base,
            operation,
            config,
        }
    }

    pub fn run(&self, topologies: &TopologySet) -> Result<FilterOutcome> {
        let mut outcome = FilterOutcome::default();

        let mut ordered: Vec<&Topology> = topologies.iter().collect();
        ordered.sort_by_key(|t| std::cmp::Reverse(t.len()));

        // The discrete topology is compatible with every operation; skip the
        // oracle for it when it is present and strictly the largest.
        let mut rest = ordered.as_slice();
        if let Some((largest, tail)) = ordered.split_first() {
            let strictly_largest = tail.first().map_or(true, |next| next.len() < largest.len());
            if largest.base() == self.base && largest.is_discrete() && strictly_largest {
                outcome.compatible.insert((*largest).clone());
                rest = tail;
            }
        }

        let tasks = Injector::new();
        for topology in rest {
            tasks.push((*topology).clone());
        }
        let results = Injector::new();

        let workers = self.config.workers.max(1);
        info!(
            topologies = topologies.len(),
            queued = rest.len(),
            workers,
            operation = self.operation.name(),
            arity = self.operation.arity(),
            "filtering topologies"
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("toposearch-filter-{i}"))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;

        let (base, operation) = (self.base, self.operation);
        pool.scope(|scope| {
            for worker in 0..workers {
                let (tasks, results) = (&tasks, &results);
                scope.spawn(move |_| work(worker, tasks, results, base, operation));
            }
        });

        loop {
            match results.steal() {
                Steal::Success(Verdict::Compatible(topology)) => {
                    outcome.compatible.insert(topology);
                }
                Steal::Success(Verdict::Unknown(topology, message)) => {
                    outcome.unknown.push((topology, message));
                }
                Steal::Empty => break,
                Steal::Retry => continue,
            }
        }

        info!(
            compatible = outcome.compatible.len(),
            unknown = outcome.unknown.len(),
            "filtering complete"
        );
        Ok(outcome)
    }
}

fn work<O>(
    worker: usize,
    tasks: &Injector<Topology>,
    results: &Injector<Verdict>,
    base: &BaseSet,
    operation: &O,
) where
    O: Operation + ?Sized,
{
    let mut evaluated = 0usize;
    loop {
        let topology = match tasks.steal() {
            Steal::Success(topology) => topology,
            Steal::Empty => break,
            Steal::Retry => continue,
        };
        evaluated += 1;

        let verdict =
            panic::catch_unwind(AssertUnwindSafe(|| oracle::check(base, &topology, operation)));
        match verdict {
            Ok(Ok(true)) => results.push(Verdict::Compatible(topology)),
            Ok(Ok(false)) => {}
            Ok(Err(err)) => {
                warn!(worker, %topology, error = %err, "evaluation failed");
                results.push(Verdict::Unknown(topology, err.to_string()));
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(worker, %topology, panic = %message, "evaluation panicked");
                results.push(Verdict::Unknown(topology, message));
            }
        }
    }
    debug!(worker, evaluated, "worker finished");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// The topologies in `topologies` that `operation` is continuous with, using
/// one worker per hardware thread.
///
/// Topologies whose evaluation fails are logged and left out.
pub fn filter_compatible<O>(
    base: &BaseSet,
    topologies: &TopologySet,
    operation: &O,
) -> Result<TopologySet>
where
    O: Operation + ?Sized,
{
    ParallelFilter::new(base, operation, FilterConfig::default())
        .run(topologies)
        .map(|outcome| outcome.compatible)
}
