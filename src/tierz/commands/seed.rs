use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::backend::StorageBackend;

pub fn run<B: StorageBackend>(session: &mut Session<B>, force: bool) -> Result<CmdResult> {
    let report = session.seed(force)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Seeded {} items into {} tiers at {}.",
        report.items,
        report.tiers,
        session.adapter().backend().location()
    )));
    if report.removed > 0 {
        result.add_message(CmdMessage::info(format!(
            "  - Removed {} record(s) not in the catalog.",
            report.removed
        )));
    }
    Ok(result.with_rows(session.view()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Move;
    use crate::store::adapter::PersistenceAdapter;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::{sample_catalog, sample_tiers};

    #[test]
    fn force_seed_restores_default_arrangement() {
        let mut session = Session::open(PersistenceAdapter::new(
            MemBackend::new(),
            sample_catalog(),
            sample_tiers(),
        ));
        session
            .submit(&Move::new("P3".into(), "A".into(), 0))
            .unwrap();

        assert!(run(&mut session, false).is_err());

        let result = run(&mut session, true).unwrap();
        assert!(result.messages[0].content.starts_with("Seeded 7 items into 5 tiers"));
        let a: Vec<&str> = result.rows[1].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(a, vec!["P1", "P2", "P3"]);
    }
}
