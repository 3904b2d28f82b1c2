use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use toposearch::{
    algebra::{builtin, Operation},
    config::{EnumerationConfig, FilterConfig},
    continuity::ParallelFilter,
    lattices::subset::BaseSet,
    topology::{enumerate_topologies_with, ordered_by_cardinality},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OperationKind {
    /// max(x, y)
    Max,
    /// min(x, y)
    Min,
    /// min(x + y, n - 1)
    BoundedSum,
    /// min(x·y mod n + z·t mod n, n - 1)
    BoundedSumOfProducts,
}

#[derive(Debug, Parser)]
#[command(
    name = "toposearch",
    about = "Enumerate the topologies on {0..n-1} and keep those an operation is continuous with"
)]
struct Cli {
    /// Number of points in the base set
    #[arg(short = 'n', long, default_value_t = 4)]
    size: usize,

    #[arg(short, long, value_enum, default_value = "max")]
    operation: OperationKind,

    /// Worker threads for filtering (default: available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Abort enumeration after this many search nodes
    #[arg(long)]
    node_budget: Option<u64>,

    /// Also report which compatible topologies are compatible with min
    #[arg(long)]
    bicompatible: bool,

    /// Print every compatible topology
    #[arg(long)]
    list: bool,
}

fn operation(kind: OperationKind, size: usize) -> toposearch::Result<Box<dyn Operation>> {
    let top = size.saturating_sub(1);
    let op: Box<dyn Operation> = match kind {
        OperationKind::Max => Box::new(builtin::max(2)?),
        OperationKind::Min => Box::new(builtin::min(2)?),
        OperationKind::BoundedSum => Box::new(builtin::bounded_sum(top)?),
        OperationKind::BoundedSumOfProducts => {
            Box::new(builtin::bounded_sum_of_products(size, top)?)
        }
    };
    Ok(op)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    let base = BaseSet::new(cli.size)?;
    let mut enumeration = EnumerationConfig::default();
    if let Some(budget) = cli.node_budget {
        enumeration = enumeration.with_node_budget(budget);
    }
    let mut filtering = FilterConfig::default();
    if let Some(workers) = cli.workers {
        filtering = filtering.with_workers(workers);
    }

    let start = Instant::now();
    let topologies = enumerate_topologies_with(cli.size, enumeration)
        .with_context(|| format!("enumerating topologies on {} points", cli.size))?;
    info!(elapsed = ?start.elapsed(), count = topologies.len(), "topologies found");

    let op = operation(cli.operation, cli.size)?;
    info!(operation = op.name(), arity = op.arity(), "filtering by continuity");
    let start = Instant::now();
    let outcome = ParallelFilter::new(&base, op.as_ref(), filtering).run(&topologies)?;
    info!(elapsed = ?start.elapsed(), count = outcome.compatible.len(), "compatible topologies found");

    println!("topologies:  {}", topologies.len());
    println!("compatible:  {}", outcome.compatible.len());
    if !outcome.unknown.is_empty() {
        println!("unknown:     {}", outcome.unknown.len());
    }

    if cli.bicompatible {
        let min = builtin::min(2)?;
        let both = ParallelFilter::new(&base, &min, filtering).run(&outcome.compatible)?;
        println!("also min:    {}", both.compatible.len());
    }

    if cli.list {
        for topology in ordered_by_cardinality(&outcome.compatible) {
            println!("{topology}");
        }
    }

    Ok(())
}
