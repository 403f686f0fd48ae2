use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{ItemId, TierId};
use crate::session::Session;
use crate::store::backend::StorageBackend;

/// Placement choices for moving `item` into `tier`.
pub fn run<B: StorageBackend>(
    session: &Session<B>,
    item: &ItemId,
    tier: &TierId,
) -> Result<CmdResult> {
    let arrangement = session.arrangement();
    let options = arrangement.position_options(item, tier)?;

    let mut result = CmdResult::default();
    if let Err(err) = session.rules().check(item, tier, tier) {
        result.add_message(CmdMessage::warning(err.to_string()));
    } else {
        result.options = options;
    }
    Ok(result)
}
