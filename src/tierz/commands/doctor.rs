use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::backend::StorageBackend;

pub fn run<B: StorageBackend>(session: &mut Session<B>) -> Result<CmdResult> {
    let report = session.repair()?;
    let mut result = CmdResult::default();

    if report.rewritten == 0 && report.removed == 0 {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        if report.rewritten > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Rewrote {} item placement(s) to close gaps or restore pinning.",
                report.rewritten
            )));
        }
        if report.removed > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} record(s) for unknown or retired items.",
                report.removed
            )));
        }
    }

    if let Err(err) = session.arrangement().check_invariants(session.rules()) {
        result.add_message(CmdMessage::error(format!(
            "Arrangement still inconsistent: {}",
            err
        )));
    }
    Ok(result)
}
