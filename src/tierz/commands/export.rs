use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TierzError};
use crate::export::{self, ExportFormat};
use crate::session::Session;
use crate::store::backend::StorageBackend;
use chrono::Utc;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Renders the arrangement. With `output` the text is written to that file,
/// otherwise it is returned in `CmdResult::output`.
pub fn run<B: StorageBackend>(
    session: &Session<B>,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<CmdResult> {
    let content = export::render(&session.render_root(), &session.view(), format)?;
    let mut result = CmdResult::default();

    match output {
        Some(path) => {
            fs::write(path, content).map_err(TierzError::Io)?;
            result.add_message(CmdMessage::success(format!(
                "Exported {} to {}",
                format,
                path.display()
            )));
            result.export_path = Some(path.to_path_buf());
        }
        None => result.output = Some(content),
    }
    Ok(result)
}

/// Writes a `tierz-<timestamp>.tar.gz` bundle with every format into `dir`.
pub fn archive<B: StorageBackend>(session: &Session<B>, dir: &Path) -> Result<CmdResult> {
    let filename = format!("tierz-{}.tar.gz", Utc::now().format("%Y-%m-%d_%H-%M-%S"));
    let path: PathBuf = dir.join(filename);
    let file = File::create(&path).map_err(TierzError::Io)?;

    export::write_archive(file, &session.render_root(), &session.view())?;
    tracing::info!(path = %path.display(), "wrote export bundle");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported to {}",
        path.display()
    )));
    result.export_path = Some(path);
    Ok(result)
}
