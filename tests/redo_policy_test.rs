//! Tests for what a new move does to pending redo entries.
//!
//! Discard (default): a move after an undo clears the redo stack.
//! Retain: redo entries survive and are re-checked when redone.

use rstest::{fixture, rstest};

use orgchart::domain::{DomainError, OrgBuilder, OrgEngine, RedoPolicy};
use orgchart::util::testing;

fn build(policy: RedoPolicy) -> OrgEngine {
    testing::init_test_setup();
    OrgBuilder::new(1, "CEO")
        .employee(2, "CTO", 1)
        .employee(3, "CFO", 1)
        .employee(4, "Platform Lead", 2)
        .employee(5, "SRE", 4)
        .employee(6, "Controller", 3)
        .employee(7, "Backend Dev", 4)
        .policy(policy)
        .build()
        .unwrap()
}

#[fixture]
fn discard() -> OrgEngine {
    build(RedoPolicy::Discard)
}

#[fixture]
fn retain() -> OrgEngine {
    build(RedoPolicy::Retain)
}

// ============================================================
// Discard
// ============================================================

#[rstest]
fn given_discard_when_move_after_undo_then_redo_is_empty(mut discard: OrgEngine) {
    discard.move_employee(2, 3).unwrap();
    discard.undo().unwrap();
    assert_eq!(discard.redo_stack().len(), 1);

    discard.move_employee(3, 2).unwrap();
    assert!(discard.redo_stack().is_empty());
    assert_eq!(discard.redo().unwrap_err(), DomainError::NothingToRedo);
    assert_eq!(discard.supervisor_of(3), Some(2));
    discard.check_invariants().unwrap();
}

#[rstest]
fn given_discard_when_rejected_move_after_undo_then_redo_kept(mut discard: OrgEngine) {
    discard.move_employee(5, 3).unwrap();
    discard.undo().unwrap();

    // Rejections change nothing, including the redo stack
    discard.move_employee(4, 5).unwrap_err();
    assert_eq!(discard.redo_stack().len(), 1);
    discard.redo().unwrap();
    assert_eq!(discard.supervisor_of(5), Some(3));
}

// ============================================================
// Retain
// ============================================================

#[rstest]
fn given_retain_when_stale_redo_would_cycle_then_rejected_and_kept(mut retain: OrgEngine) {
    retain.move_employee(2, 3).unwrap();
    retain.undo().unwrap();
    retain.move_employee(3, 2).unwrap();
    let before = retain.snapshot().unwrap();

    assert_eq!(
        retain.redo().unwrap_err(),
        DomainError::WouldCreateCycle {
            employee: 2,
            supervisor: 3
        }
    );
    assert_eq!(retain.snapshot().unwrap(), before);
    assert_eq!(retain.redo_stack().len(), 1);
    assert_eq!(retain.history().len(), 1);
    retain.check_invariants().unwrap();
}

#[rstest]
fn given_retain_when_stale_redo_still_valid_then_applied(mut retain: OrgEngine) {
    let original = retain.snapshot().unwrap();
    retain.move_employee(5, 3).unwrap();
    retain.undo().unwrap();
    retain.move_employee(7, 6).unwrap();

    retain.redo().unwrap();
    assert_eq!(retain.supervisor_of(5), Some(3));
    assert_eq!(retain.supervisor_of(7), Some(6));
    assert_eq!(retain.history().len(), 2);

    retain.undo().unwrap();
    retain.undo().unwrap();
    assert_eq!(retain.snapshot().unwrap(), original);
    retain.check_invariants().unwrap();
}

#[rstest]
fn given_retain_when_redo_after_employee_moved_elsewhere_then_records_actual_origin(
    mut retain: OrgEngine,
) {
    retain.move_employee(5, 3).unwrap();
    retain.undo().unwrap();
    retain.move_employee(5, 6).unwrap();

    let record = retain.redo().unwrap();
    assert_eq!(record.from, 6);
    assert_eq!(record.to, 3);

    retain.undo().unwrap();
    assert_eq!(retain.supervisor_of(5), Some(6));
    retain.undo().unwrap();
    assert_eq!(retain.supervisor_of(5), Some(4));
    assert_eq!(retain.subordinates(4), Some(vec![5, 7]));
}

#[rstest]
fn given_policy_switch_when_moving_then_new_policy_applies(mut retain: OrgEngine) {
    retain.move_employee(5, 3).unwrap();
    retain.undo().unwrap();
    retain.set_policy(RedoPolicy::Discard);
    retain.move_employee(7, 6).unwrap();
    assert!(retain.redo_stack().is_empty());
}

#[rstest]
fn given_stale_entry_when_switching_to_discard_then_redo_still_checks_cycles(
    mut retain: OrgEngine,
) {
    retain.move_employee(2, 3).unwrap();
    retain.undo().unwrap();
    retain.move_employee(3, 2).unwrap();
    retain.set_policy(RedoPolicy::Discard);
    let before = retain.snapshot().unwrap();

    assert_eq!(
        retain.redo().unwrap_err(),
        DomainError::WouldCreateCycle {
            employee: 2,
            supervisor: 3
        }
    );
    assert_eq!(retain.snapshot().unwrap(), before);
    assert!(retain.employee_exists(2));
    assert_eq!(retain.redo_stack().len(), 1);
    retain.check_invariants().unwrap();
}
