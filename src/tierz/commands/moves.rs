use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{ItemId, Move};
use crate::planner::DropTarget;
use crate::session::{MoveOutcome, Session};
use crate::store::backend::StorageBackend;

pub fn run<B: StorageBackend>(session: &mut Session<B>, mv: &Move) -> Result<CmdResult> {
    let outcome = session.submit(mv)?;
    Ok(report(session, outcome))
}

pub fn drop<B: StorageBackend>(
    session: &mut Session<B>,
    item: &ItemId,
    target: &DropTarget,
) -> Result<CmdResult> {
    let outcome = session.submit_drop(item, target)?;
    Ok(report(session, outcome))
}

fn report<B: StorageBackend>(session: &Session<B>, outcome: MoveOutcome) -> CmdResult {
    let mut result = CmdResult::default();
    let arrangement = session.arrangement();

    match outcome {
        MoveOutcome::Rejected(err) => {
            result.add_message(CmdMessage::info(err.to_string()));
        }
        MoveOutcome::Unchanged => {
            result.add_message(CmdMessage::info("Nothing to move."));
        }
        MoveOutcome::Committed { mv, deltas, .. } => {
            let affected = deltas
                .iter()
                .filter_map(|d| arrangement.item(&d.item_id))
                .collect();
            result = result.with_affected_items(affected);
            let name = arrangement
                .item(&mv.item_id)
                .map(|i| i.name)
                .unwrap_or_else(|| mv.item_id.to_string());
            result.add_message(CmdMessage::success(format!(
                "Moved {} to {} #{}",
                name,
                mv.target_tier,
                mv.target_position + 1
            )));
        }
        MoveOutcome::Reconciled { error, .. } | MoveOutcome::Refused { error } => {
            result.add_message(CmdMessage::error(error.message.clone()));
            result.error = Some(error);
        }
    }

    if session.is_stale() {
        result.add_message(CmdMessage::warning(
            "Could not reload the stored arrangement; showing unsaved changes.",
        ));
    }
    result.with_rows(session.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::adapter::PersistenceAdapter;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::{sample_catalog, sample_tiers};

    fn open() -> Session<MemBackend> {
        Session::open(PersistenceAdapter::new(
            MemBackend::new(),
            sample_catalog(),
            sample_tiers(),
        ))
    }

    #[test]
    fn reports_moved_item_and_shifted_siblings() {
        let mut session = open();
        let result = run(&mut session, &Move::new("X".into(), "C".into(), 1)).unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(result.messages[0].content, "Moved X shop to C #2");
        let affected: Vec<&str> = result.affected_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(affected, vec!["Y", "X"]);
        assert_eq!(result.rows.len(), 5);
    }

    #[test]
    fn clamped_move_reports_final_slot() {
        let mut session = open();
        let result = run(&mut session, &Move::new("P1".into(), "A".into(), 40)).unwrap();
        assert_eq!(result.messages[0].content, "Moved P1 shop to A #3");
    }

    #[test]
    fn rejected_move_is_informational() {
        let mut session = open();
        let result = run(&mut session, &Move::new("Z".into(), "EX".into(), 0)).unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Info);
        assert!(result.messages[0].content.contains("only accepts"));
        assert!(result.affected_items.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn failed_commit_surfaces_descriptor() {
        let mut session = open();
        session.adapter().backend().set_fail_after_writes(Some(1));
        let result = run(&mut session, &Move::new("P3".into(), "A".into(), 0)).unwrap();

        assert!(result.has_errors());
        let error = result.error.unwrap();
        assert!(error.retryable);
        let a = &result.rows[1];
        assert_eq!(a.items[0].id.as_str(), "P1");
    }

    #[test]
    fn unreadable_store_reports_refusal() {
        let mut session = open();
        session.adapter().backend().set_simulate_read_error(true);
        session.reload();

        let result = run(&mut session, &Move::new("P3".into(), "A".into(), 0)).unwrap();
        assert!(result.has_errors());
        assert!(result.error.unwrap().retryable);
        assert_eq!(result.rows[1].items[0].id.as_str(), "P1");
    }

    #[test]
    fn drop_onto_tier_appends() {
        let mut session = open();
        let result = drop(&mut session, &"Z".into(), &DropTarget::Tier("D".into())).unwrap();
        assert_eq!(result.messages[0].content, "Moved Z shop to D #1");
        assert!(result.rows[3].items.is_empty());
    }
}
