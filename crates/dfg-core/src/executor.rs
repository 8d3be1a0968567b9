//! Hand-off of resolved operations to whatever carries them out.

use crate::error::Result;
use crate::plan::{Operation, OperationKind};

/// Carries out one operation at a time, in plan order.
pub trait Executor {
    fn execute(&mut self, op: &Operation) -> Result<()>;
}

/// Run `ops` in order, stopping at the first failure. Returns how many ran.
pub fn run_plan(ops: &[Operation], executor: &mut dyn Executor) -> Result<usize> {
    for (i, op) in ops.iter().enumerate() {
        tracing::debug!(step = i + 1, total = ops.len(), %op, "executing");
        executor.execute(op)?;
    }
    Ok(ops.len())
}

/// Dry-run executor: logs every operation and remembers it.
#[derive(Debug, Default)]
pub struct LogExecutor {
    executed: Vec<Operation>,
}

impl LogExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed(&self) -> &[Operation] {
        &self.executed
    }
}

impl Executor for LogExecutor {
    fn execute(&mut self, op: &Operation) -> Result<()> {
        match op.kind {
            OperationKind::Copy => tracing::info!(
                from = %op.source,
                to = %op.destination,
                "copy"
            ),
            kind => tracing::info!(
                %kind,
                module = %op.source,
                args = ?op.args,
                "run module script"
            ),
        }
        self.executed.push(op.clone());
        Ok(())
    }
}
