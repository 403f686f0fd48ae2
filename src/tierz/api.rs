//! # API Facade
//!
//! The single entry point for every tierz operation, whatever the UI.
//!
//! The facade:
//! - **dispatches** to the command functions in [`crate::commands`];
//! - **normalizes inputs**: user-typed item keys (id or name) and tier names
//!   become [`ItemId`] / [`TierId`];
//! - **returns structured types** (`Result<CmdResult>`), never strings for a
//!   terminal.
//!
//! Move intents go through the [`Session`], which owns the arrangement and
//! the plan, apply, commit and reconcile sequence.
//!
//! ## Generic Over StorageBackend
//!
//! `TierzApi<B: StorageBackend>`:
//! - Production: `TierzApi<FsBackend>`
//! - Testing: `TierzApi<MemBackend>`

use crate::catalog::{Catalog, CatalogFile};
use crate::commands;
use crate::config::TierzConfig;
use crate::error::{ErrorDescriptor, Result};
use crate::export::ExportFormat;
use crate::model::{ItemId, Move, RenderRoot, TierId};
use crate::session::Session;
use crate::store::adapter::PersistenceAdapter;
use crate::store::backend::StorageBackend;
use crate::tiers::TierRegistry;
use std::path::Path;

pub struct TierzApi<B: StorageBackend> {
    session: Session<B>,
    paths: commands::TierzPaths,
}

impl<B: StorageBackend> TierzApi<B> {
    /// Opens the arrangement with the catalog named in `config.json`, or the
    /// bundled one.
    pub fn open(backend: B, paths: commands::TierzPaths) -> Result<Self> {
        let config = TierzConfig::load(&paths.data_dir)?;
        let file = match &config.catalog_path {
            Some(path) => {
                let path = paths.data_dir.join(path);
                tracing::debug!(path = %path.display(), "loading custom catalog");
                CatalogFile::load(path)?
            }
            None => CatalogFile::bundled(),
        };
        let (catalog, tiers) = file.into_parts()?;
        Ok(Self::with_catalog(backend, catalog, tiers, paths))
    }

    pub fn with_catalog(
        backend: B,
        catalog: Catalog,
        tiers: TierRegistry,
        paths: commands::TierzPaths,
    ) -> Self {
        let adapter = PersistenceAdapter::new(backend, catalog, tiers);
        Self {
            session: Session::open(adapter),
            paths,
        }
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    pub fn paths(&self) -> &commands::TierzPaths {
        &self.paths
    }

    /// Item by id or case-insensitive name. Unknown keys pass through as ids
    /// and are reported as not found by the operation using them.
    pub fn resolve_item(&self, key: &str) -> ItemId {
        self.session
            .adapter()
            .catalog()
            .find(key)
            .map(|e| e.id.clone())
            .unwrap_or_else(|| ItemId::new(key.trim()))
    }

    pub fn resolve_tier(&self, name: &str) -> TierId {
        self.session
            .adapter()
            .tiers()
            .find_by_name(name)
            .map(|t| t.id.clone())
            .unwrap_or_else(|| TierId::new(name.trim()))
    }

    pub fn view(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.session)
    }

    /// Moves `item` to zero-based `position` of `tier`.
    pub fn request_move(
        &mut self,
        item: &str,
        tier: &str,
        position: usize,
    ) -> Result<commands::CmdResult> {
        let mv = Move::new(self.resolve_item(item), self.resolve_tier(tier), position);
        commands::moves::run(&mut self.session, &mv)
    }

    pub fn request_drop(&mut self, item: &str, target: DropTarget) -> Result<commands::CmdResult> {
        let item = self.resolve_item(item);
        commands::moves::drop(&mut self.session, &item, &target)
    }

    pub fn position_options(&self, item: &str, tier: &str) -> Result<commands::CmdResult> {
        commands::options::run(
            &self.session,
            &self.resolve_item(item),
            &self.resolve_tier(tier),
        )
    }

    /// Exports in `format`, or the configured default format.
    pub fn export(
        &self,
        format: Option<ExportFormat>,
        output: Option<&Path>,
    ) -> Result<commands::CmdResult> {
        let format = match format {
            Some(format) => format,
            None => TierzConfig::load(&self.paths.data_dir)?.export_format,
        };
        commands::export::run(&self.session, format, output)
    }

    pub fn export_archive(&self, dir: &Path) -> Result<commands::CmdResult> {
        commands::export::archive(&self.session, dir)
    }

    pub fn seed(&mut self, force: bool) -> Result<commands::CmdResult> {
        commands::seed::run(&mut self.session, force)
    }

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.session)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn render_root(&self) -> RenderRoot {
        self.session.render_root()
    }

    pub fn last_error(&self) -> Option<&ErrorDescriptor> {
        self.session.last_error()
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::planner::DropTarget;
pub use commands::{CmdMessage, CmdResult, MessageLevel, TierzPaths};
