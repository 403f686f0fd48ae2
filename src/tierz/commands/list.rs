use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::adapter::LoadSource;
use crate::store::backend::StorageBackend;

pub fn run<B: StorageBackend>(session: &Session<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default().with_rows(session.view());
    result.last_updated = session.last_updated();

    if let LoadSource::Fallback { reason } = session.source() {
        result.add_message(CmdMessage::warning(format!(
            "Showing the default arrangement: {}",
            reason
        )));
    }
    if session.is_stale() {
        result.add_message(CmdMessage::warning(
            "The arrangement may be out of date with the store.",
        ));
    }
    Ok(result)
}
