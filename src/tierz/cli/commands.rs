//! # CLI Layer
//!
//! Parses arguments, builds the [`AppContext`], calls one `TierzApi` method
//! and prints its `CmdResult`. Nothing here decides what a move does.
//!
//! - `run()`: main dispatch, called by `main.rs`
//! - `init_context()`: resolves the data directory and opens the API
//! - `handle_*()`: per-command handlers

use super::logging::init_cli_logger;
use super::render::{print_config, print_messages, print_options, print_rows};
use super::setup::{Cli, Commands, DropArgs, FormatArg};
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use tierz::api::{ConfigAction, DropTarget, TierzApi, TierzPaths};
use tierz::error::{Result, TierzError};
use tierz::store::fs_backend::FsBackend;

const DATA_DIR_ENV: &str = "TIERZ_DATA_DIR";

struct AppContext {
    api: TierzApi<FsBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let command = match cli.command {
        // config does not need the arrangement
        Some(Commands::Config { key, value }) => return handle_config(data_dir, key, value),
        other => other,
    };

    let mut ctx = init_context(data_dir)?;

    match command {
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Move {
            item,
            tier,
            position,
        }) => handle_move(&mut ctx, item, tier, position),
        Some(Commands::Drop { item, target }) => handle_drop(&mut ctx, item, target),
        Some(Commands::Options { item, tier }) => handle_options(&ctx, item, tier),
        Some(Commands::Export {
            format,
            output,
            bundle,
        }) => handle_export(&ctx, format, output, bundle),
        Some(Commands::Seed { force }) => handle_seed(&mut ctx, force),
        Some(Commands::Doctor) => handle_doctor(&mut ctx),
        Some(Commands::Config { .. }) => Ok(()),
    }
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("dev", "tierz", "tierz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            TierzError::Api(format!(
                "Could not determine a data directory; pass --data-dir or set {}",
                DATA_DIR_ENV
            ))
        })
}

fn init_context(data_dir: PathBuf) -> Result<AppContext> {
    let backend = FsBackend::new(data_dir.clone());
    let api = TierzApi::open(backend, TierzPaths::new(data_dir))?;
    Ok(AppContext { api })
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.view()?;
    print_rows(&result.rows, result.last_updated);
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(
    ctx: &mut AppContext,
    item: String,
    tier: String,
    position: Option<usize>,
) -> Result<()> {
    let result = match position {
        Some(0) => {
            return Err(TierzError::Api("Positions start at 1".to_string()));
        }
        Some(n) => ctx.api.request_move(&item, &tier, n - 1)?,
        None => {
            let tier = ctx.api.resolve_tier(&tier);
            ctx.api.request_drop(&item, DropTarget::Tier(tier))?
        }
    };
    print_messages(&result.messages);
    if result.error.is_some() {
        print_rows(&result.rows, None);
    }
    Ok(())
}

fn handle_drop(ctx: &mut AppContext, item: String, target: DropArgs) -> Result<()> {
    let target = match target {
        DropArgs { on: Some(onto), .. } => DropTarget::Item(ctx.api.resolve_item(&onto)),
        DropArgs { tier: Some(tier), .. } => DropTarget::Tier(ctx.api.resolve_tier(&tier)),
        DropArgs { outside: true, .. } => DropTarget::Outside,
        DropArgs { .. } => {
            return Err(TierzError::Api(
                "drop needs one of --on, --tier or --outside".to_string(),
            ));
        }
    };
    let result = ctx.api.request_drop(&item, target)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_options(ctx: &AppContext, item: String, tier: String) -> Result<()> {
    let result = ctx.api.position_options(&item, &tier)?;
    print_options(&item, &tier, &result.options);
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(
    ctx: &AppContext,
    format: Option<FormatArg>,
    output: Option<PathBuf>,
    bundle: Option<PathBuf>,
) -> Result<()> {
    let result = match bundle {
        Some(dir) => ctx.api.export_archive(&dir)?,
        None => ctx.api.export(format.map(Into::into), output.as_deref())?,
    };
    if let Some(text) = &result.output {
        print!("{}", text);
        if !text.ends_with('\n') {
            println!();
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_seed(ctx: &mut AppContext, force: bool) -> Result<()> {
    let result = ctx.api.seed(force)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(data_dir: PathBuf, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let result = tierz::commands::config::run(&TierzPaths::new(data_dir), action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
