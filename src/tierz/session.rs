//! # Session
//!
//! Owns the live [`Arrangement`] and sequences every change through it:
//!
//! ```text
//! intent ─▶ plan ─▶ apply (optimistic) ─▶ commit ─┬─▶ ok: done
//!                                                 └─▶ err: reload, report
//! ```
//!
//! Moves are processed one at a time, in the order they are submitted.
//! A commit failure is not rolled back move by move: the session reloads the
//! stored arrangement and replaces its own. If that reload fails as well, the
//! optimistic state is kept and the session is marked stale.
//!
//! Invalid gestures (pin violations, unknown references) are rejected before
//! anything changes and are reported as [`MoveOutcome::Rejected`], never as
//! errors.
//!
//! Deltas only carry the records a move touches, so they are planned against
//! an arrangement that matches the store record for record. A session running
//! on seed data, on a load that had to correct stored records, or on stale
//! optimistic state re-fetches first, writing the corrections back if needed.
//! When the store cannot be read the move is [`MoveOutcome::Refused`].

use crate::arrangement::Arrangement;
use crate::error::{ErrorDescriptor, Result, TierzError};
use crate::model::{Delta, ItemId, Move, RenderRoot, TierRow};
use crate::planner::{self, DropTarget, PinRules};
use crate::store::adapter::{LoadOutcome, LoadSource, PersistenceAdapter, SeedReport};
use crate::store::backend::StorageBackend;
use crate::store::RepairReport;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const RENDER_ROOT_ID: &str = "tier-list";

#[derive(Debug)]
pub enum MoveOutcome {
    /// Failed validation; nothing changed.
    Rejected(TierzError),
    /// The move resolved to the current placement, or to nothing at all.
    Unchanged,
    Committed { mv: Move, deltas: Vec<Delta>, batch: Uuid },
    /// The commit failed and the arrangement was reloaded from the store.
    Reconciled { mv: Move, error: ErrorDescriptor },
    /// The arrangement could not be matched to the store; nothing was written.
    Refused { error: ErrorDescriptor },
}

pub struct Session<B: StorageBackend> {
    adapter: PersistenceAdapter<B>,
    rules: PinRules,
    arrangement: Arrangement,
    source: LoadSource,
    last_updated: Option<DateTime<Utc>>,
    revision: u64,
    stale: bool,
    /// The arrangement is exactly what the store holds.
    synced: bool,
    last_error: Option<ErrorDescriptor>,
}

impl<B: StorageBackend> Session<B> {
    /// Opens a session, seeding the store first if it holds nothing yet.
    pub fn open(adapter: PersistenceAdapter<B>) -> Self {
        if adapter.is_empty() {
            match adapter.seed(false) {
                Ok(report) => tracing::info!(items = report.items, "seeded empty store"),
                Err(err) => tracing::warn!(error = %err, "could not seed empty store"),
            }
        }
        let outcome = adapter.load();
        let rules = adapter.rules();
        let mut session = Self {
            adapter,
            rules,
            arrangement: outcome.arrangement.clone(),
            source: LoadSource::Store,
            last_updated: None,
            revision: 0,
            stale: false,
            synced: false,
            last_error: None,
        };
        session.replace(outcome);
        session
    }

    pub fn adapter(&self) -> &PersistenceAdapter<B> {
        &self.adapter
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn rules(&self) -> &PinRules {
        &self.rules
    }

    pub fn view(&self) -> Vec<TierRow> {
        self.arrangement.view()
    }

    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Set when a failed commit could not be reconciled with the store.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn last_error(&self) -> Option<&ErrorDescriptor> {
        self.last_error.as_ref()
    }

    pub fn render_root(&self) -> RenderRoot {
        RenderRoot {
            id: RENDER_ROOT_ID.to_string(),
            revision: self.revision,
        }
    }

    pub fn submit(&mut self, mv: &Move) -> Result<MoveOutcome> {
        if let Err(err) = self.sync() {
            return Ok(self.refuse(err));
        }
        let plan = match planner::plan(&self.arrangement, &self.rules, mv) {
            Ok(plan) => plan,
            Err(err) if err.is_validation() => {
                tracing::debug!(error = %err, "move rejected");
                return Ok(MoveOutcome::Rejected(err));
            }
            Err(err) => return Err(err),
        };
        if plan.is_noop() {
            return Ok(MoveOutcome::Unchanged);
        }

        self.arrangement.apply_deltas(&plan.deltas)?;
        self.revision += 1;

        match self.adapter.commit(&plan.deltas) {
            Ok(batch) => {
                self.last_error = None;
                self.last_updated = Some(Utc::now());
                Ok(MoveOutcome::Committed {
                    mv: plan.mv,
                    deltas: plan.deltas,
                    batch: batch.unwrap_or_else(Uuid::nil),
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "commit failed, reloading arrangement");
                let error = ErrorDescriptor::from(&err);
                self.reconcile();
                self.last_error = Some(error.clone());
                Ok(MoveOutcome::Reconciled { mv: plan.mv, error })
            }
        }
    }

    /// Resolves a drop and submits the resulting move.
    pub fn submit_drop(&mut self, item: &ItemId, target: &DropTarget) -> Result<MoveOutcome> {
        if let Err(err) = self.sync() {
            return Ok(self.refuse(err));
        }
        match planner::resolve_drop(&self.arrangement, item, target) {
            Ok(Some(mv)) => self.submit(&mv),
            Ok(None) => Ok(MoveOutcome::Unchanged),
            Err(err) if err.is_validation() => {
                tracing::debug!(error = %err, "drop rejected");
                Ok(MoveOutcome::Rejected(err))
            }
            Err(err) => Err(err),
        }
    }

    /// Replaces the arrangement with the stored one. Keeps the current
    /// arrangement and marks the session stale if the store cannot be read.
    pub fn reconcile(&mut self) {
        match self.adapter.fetch() {
            Ok(outcome) => self.replace(outcome),
            Err(err) => {
                tracing::warn!(error = %err, "reload failed, arrangement is stale");
                self.stale = true;
                self.synced = false;
            }
        }
    }

    /// Brings the arrangement in line with the store so deltas planned
    /// against it land on the stored positions.
    fn sync(&mut self) -> Result<()> {
        if self.synced {
            return Ok(());
        }
        let outcome = self.adapter.fetch().map_err(unreadable)?;
        let outcome = if outcome.report.is_clean() {
            outcome
        } else {
            let report = self.adapter.repair()?;
            tracing::info!(
                rewritten = report.rewritten,
                removed = report.removed,
                "wrote load corrections before move"
            );
            self.adapter.fetch().map_err(unreadable)?
        };
        self.replace(outcome);
        if !self.synced {
            return Err(TierzError::Persistence(
                "stored arrangement still needs corrections".to_string(),
            ));
        }
        Ok(())
    }

    fn refuse(&mut self, err: TierzError) -> MoveOutcome {
        tracing::warn!(error = %err, "move refused, store out of reach");
        let error = ErrorDescriptor::from(&err);
        self.last_error = Some(error.clone());
        MoveOutcome::Refused { error }
    }

    /// Reloads with fallback, as on open.
    pub fn reload(&mut self) {
        let outcome = self.adapter.load();
        self.replace(outcome);
    }

    fn replace(&mut self, outcome: LoadOutcome) {
        if outcome.arrangement != self.arrangement {
            self.revision += 1;
        }
        self.synced = !outcome.is_fallback() && outcome.report.is_clean();
        self.arrangement = outcome.arrangement;
        self.source = outcome.source;
        self.last_updated = outcome.last_updated;
        self.stale = false;
    }

    pub fn seed(&mut self, force: bool) -> Result<SeedReport> {
        let report = self.adapter.seed(force)?;
        self.reload();
        Ok(report)
    }

    pub fn repair(&mut self) -> Result<RepairReport> {
        let report = self.adapter.repair()?;
        self.reload();
        Ok(report)
    }
}

fn unreadable(err: TierzError) -> TierzError {
    match err {
        TierzError::Load(reason) => TierzError::Persistence(format!("store unreadable: {}", reason)),
        other => other.into_persistence(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{ItemRecord, TierId};
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::{ids, sample_catalog, sample_tiers};

    fn open() -> Session<MemBackend> {
        Session::open(PersistenceAdapter::new(
            MemBackend::new(),
            sample_catalog(),
            sample_tiers(),
        ))
    }

    fn tier_ids(session: &Session<MemBackend>, tier: &str) -> Vec<String> {
        ids(&session
            .arrangement()
            .items_in_tier(&TierId::from(tier))
            .unwrap())
    }

    fn record(id: &str, tier: &str, position: usize) -> ItemRecord {
        ItemRecord {
            item_id: ItemId::from(id),
            name: id.to_string(),
            tier_id: TierId::from(tier),
            position,
            updated_at: Utc::now(),
        }
    }

    /// A seeded store whose tier A was reordered to `[P3, P1, P2]`.
    fn reordered_adapter() -> PersistenceAdapter<MemBackend> {
        let adapter = PersistenceAdapter::new(MemBackend::new(), sample_catalog(), sample_tiers());
        adapter.seed(false).unwrap();
        let backend = adapter.backend();
        backend.put_raw(record("P3", "A", 0));
        backend.put_raw(record("P1", "A", 1));
        backend.put_raw(record("P2", "A", 2));
        adapter
    }

    #[test]
    fn open_seeds_empty_store() {
        let session = open();
        assert_eq!(*session.source(), LoadSource::Store);
        assert_eq!(session.adapter().backend().committed_batches(), 1);
        assert_eq!(tier_ids(&session, "A"), vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn committed_move_bumps_revision() {
        let mut session = open();
        let before = session.render_root();
        let outcome = session
            .submit(&Move::new("P3".into(), "A".into(), 0))
            .unwrap();

        assert!(matches!(outcome, MoveOutcome::Committed { ref deltas, .. } if deltas.len() == 3));
        assert_eq!(tier_ids(&session, "A"), vec!["P3", "P1", "P2"]);
        assert_eq!(session.render_root().revision, before.revision + 1);
        assert_eq!(session.render_root().id, RENDER_ROOT_ID);
    }

    #[test]
    fn noop_move_does_not_commit() {
        let mut session = open();
        let batches = session.adapter().backend().committed_batches();
        let outcome = session
            .submit(&Move::new("P2".into(), "A".into(), 1))
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Unchanged));
        assert_eq!(session.adapter().backend().committed_batches(), batches);
    }

    #[test]
    fn pin_violations_are_rejected_quietly() {
        let mut session = open();
        let revision = session.revision();

        let outcome = session
            .submit(&Move::new("Mita".into(), "B".into(), 0))
            .unwrap();
        assert!(matches!(
            outcome,
            MoveOutcome::Rejected(TierzError::AnchorImmovable { .. })
        ));
        let outcome = session
            .submit(&Move::new("X".into(), "EX".into(), 0))
            .unwrap();
        assert!(matches!(
            outcome,
            MoveOutcome::Rejected(TierzError::TierRestricted { .. })
        ));

        assert_eq!(session.revision(), revision);
        assert_eq!(tier_ids(&session, "EX"), vec!["Mita"]);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn failed_commit_reconciles_from_store() {
        let mut session = open();
        session.adapter().backend().set_fail_after_writes(Some(0));

        let outcome = session
            .submit(&Move::new("X".into(), "C".into(), 1))
            .unwrap();
        let MoveOutcome::Reconciled { error, .. } = outcome else {
            panic!("expected reconciliation");
        };
        assert_eq!(error.kind, ErrorKind::Persistence);
        assert!(error.retryable);

        assert_eq!(tier_ids(&session, "B"), vec!["X", "Y"]);
        assert_eq!(tier_ids(&session, "C"), vec!["Z"]);
        assert!(!session.is_stale());
        assert_eq!(session.last_error(), Some(&error));
    }

    #[test]
    fn failed_reload_keeps_optimistic_state_and_marks_stale() {
        let mut session = open();
        let backend = session.adapter().backend();
        backend.set_fail_after_writes(Some(0));
        backend.set_simulate_read_error(true);

        session
            .submit(&Move::new("X".into(), "C".into(), 1))
            .unwrap();
        assert!(session.is_stale());
        assert_eq!(tier_ids(&session, "C"), vec!["Z", "X"]);
    }

    #[test]
    fn drop_outside_is_noop() {
        let mut session = open();
        let outcome = session
            .submit_drop(&"P1".into(), &DropTarget::Outside)
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Unchanged));
    }

    #[test]
    fn drop_on_item_moves_and_persists() {
        let mut session = open();
        session
            .submit_drop(&"P1".into(), &DropTarget::Item("P3".into()))
            .unwrap();
        assert_eq!(tier_ids(&session, "A"), vec!["P2", "P1", "P3"]);

        session.reload();
        assert_eq!(tier_ids(&session, "A"), vec!["P2", "P1", "P3"]);
    }

    #[test]
    fn open_falls_back_on_unreadable_store() {
        let backend = MemBackend::new();
        backend.set_simulate_read_error(true);
        let session = Session::open(PersistenceAdapter::new(
            backend,
            sample_catalog(),
            sample_tiers(),
        ));
        assert!(matches!(session.source(), LoadSource::Fallback { .. }));
        assert_eq!(session.arrangement().len(), 7);
    }

    #[test]
    fn fallback_session_refetches_before_committing() {
        let adapter = reordered_adapter();
        adapter.backend().set_simulate_read_error(true);
        let mut session = Session::open(adapter);
        assert!(matches!(session.source(), LoadSource::Fallback { .. }));
        assert_eq!(tier_ids(&session, "A"), vec!["P1", "P2", "P3"]);

        session.adapter().backend().set_simulate_read_error(false);
        let outcome = session
            .submit(&Move::new("P1".into(), "A".into(), 0))
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Committed { .. }));
        assert_eq!(*session.source(), LoadSource::Store);
        assert_eq!(tier_ids(&session, "A"), vec!["P1", "P3", "P2"]);

        let stored = session.adapter().fetch().unwrap();
        assert!(stored.report.is_clean());
        assert_eq!(stored.arrangement, *session.arrangement());
    }

    #[test]
    fn unreadable_store_refuses_moves() {
        let adapter = reordered_adapter();
        adapter.backend().set_simulate_read_error(true);
        let mut session = Session::open(adapter);
        let batches = session.adapter().backend().committed_batches();

        let outcome = session
            .submit(&Move::new("P3".into(), "A".into(), 0))
            .unwrap();
        let MoveOutcome::Refused { error } = outcome else {
            panic!("expected refusal");
        };
        assert_eq!(error.kind, ErrorKind::Persistence);
        assert!(error.retryable);
        assert!(error.message.contains("Simulated read error"));

        let outcome = session
            .submit_drop(&"P1".into(), &DropTarget::Item("P3".into()))
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Refused { .. }));

        assert_eq!(session.adapter().backend().committed_batches(), batches);
        assert_eq!(tier_ids(&session, "A"), vec!["P1", "P2", "P3"]);
        assert_eq!(session.revision(), 0);
        assert_eq!(session.last_error(), Some(&error));
    }

    #[test]
    fn corrected_load_is_written_back_before_move() {
        let adapter = PersistenceAdapter::new(MemBackend::new(), sample_catalog(), sample_tiers());
        adapter.seed(false).unwrap();
        adapter.backend().put_raw(record("P2", "A", 4));
        adapter.backend().put_raw(record("P3", "A", 9));
        let mut session = Session::open(adapter);
        assert_eq!(tier_ids(&session, "A"), vec!["P1", "P2", "P3"]);

        let outcome = session
            .submit(&Move::new("P3".into(), "A".into(), 0))
            .unwrap();
        assert!(matches!(outcome, MoveOutcome::Committed { .. }));
        // seed, corrections, move
        assert_eq!(session.adapter().backend().committed_batches(), 3);

        let stored = session.adapter().fetch().unwrap();
        assert!(stored.report.is_clean());
        assert_eq!(tier_ids(&session, "A"), vec!["P3", "P1", "P2"]);
        assert_eq!(stored.arrangement, *session.arrangement());
    }
}
