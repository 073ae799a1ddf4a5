//! Running operation scripts against an engine.

use tracing::{info, instrument, warn};

use crate::application::ApplicationResult;
use crate::domain::{DomainError, DomainResult, MoveRecord, Operation, OrgEngine};

/// Result of one scripted operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub operation: Operation,
    pub result: Result<MoveRecord, DomainError>,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        self.result.is_ok()
    }
}

/// Dispatch a single operation to the engine.
pub fn apply_operation(engine: &mut OrgEngine, op: Operation) -> DomainResult<MoveRecord> {
    match op {
        Operation::Move {
            employee,
            supervisor,
        } => engine.move_employee(employee, supervisor),
        Operation::Undo => engine.undo(),
        Operation::Redo => engine.redo(),
    }
}

/// Apply `ops` in order and collect one outcome per attempted operation.
///
/// Rejections are recorded and the script continues, unless `strict` is set,
/// in which case the script stops after the first rejection. Internal
/// consistency failures always abort with an error.
#[instrument(level = "debug", skip(engine, ops), fields(ops = ops.len()))]
pub fn run_script(
    engine: &mut OrgEngine,
    ops: &[Operation],
    strict: bool,
) -> ApplicationResult<Vec<Outcome>> {
    let mut outcomes = Vec::with_capacity(ops.len());

    for &op in ops {
        let result = apply_operation(engine, op);
        match &result {
            Ok(record) => info!("{op}: applied {record}"),
            Err(e) if e.is_rejection() => warn!("{op}: rejected: {e}"),
            Err(e) => return Err(e.clone().into()),
        }
        let rejected = result.is_err();
        outcomes.push(Outcome {
            operation: op,
            result,
        });
        if rejected && strict {
            break;
        }
    }

    Ok(outcomes)
}
