//! # Export
//!
//! Text renderings of the arrangement, for sharing a tier list outside the
//! app. Image capture is left to whatever rasterizes the view; it identifies
//! what it captured through a [`RenderRoot`].
//!
//! A bundle is a gzipped tarball holding every format at once:
//!
//! ```text
//! tierz/tier-list.md
//! tierz/tier-list.txt
//! tierz/tier-list.json
//! ```

use crate::error::{Result, TierzError};
use crate::model::{RenderRoot, TierRow};
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Markdown, ExportFormat::Text, ExportFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Text => "text",
            ExportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "Unknown export format: {} (expected markdown, text or json)",
                other
            )),
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    root: &'a RenderRoot,
    exported_at: DateTime<Utc>,
    tiers: Vec<ExportTier<'a>>,
}

#[derive(Serialize)]
struct ExportTier<'a> {
    id: &'a str,
    color: &'a str,
    items: Vec<&'a str>,
}

pub fn render(root: &RenderRoot, rows: &[TierRow], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Markdown => Ok(markdown(rows)),
        ExportFormat::Text => Ok(text(rows)),
        ExportFormat::Json => json(root, rows),
    }
}

fn names(row: &TierRow) -> Vec<&str> {
    row.items.iter().map(|i| i.name.as_str()).collect()
}

fn markdown(rows: &[TierRow]) -> String {
    let mut out = String::from("# Tier list\n\n| Tier | Items |\n| --- | --- |\n");
    for row in rows {
        let items = names(row).join(", ").replace('|', "\\|");
        out.push_str(&format!("| **{}** | {} |\n", row.tier.id, items));
    }
    out
}

fn text(rows: &[TierRow]) -> String {
    let width = rows
        .iter()
        .map(|r| r.tier.id.as_str().width())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        let id = row.tier.id.as_str();
        let pad = " ".repeat(width - id.width());
        let line = format!("{}{} | {}", id, pad, names(row).join(", "));
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn json(root: &RenderRoot, rows: &[TierRow]) -> Result<String> {
    let doc = ExportDocument {
        root,
        exported_at: Utc::now(),
        tiers: rows
            .iter()
            .map(|row| ExportTier {
                id: row.tier.id.as_str(),
                color: &row.tier.color,
                items: names(row),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&doc).map_err(TierzError::Serialization)
}

/// Writes every format into a gzipped tar archive.
pub fn write_archive<W: Write>(writer: W, root: &RenderRoot, rows: &[TierRow]) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for format in ExportFormat::ALL {
        let content = render(root, rows, format)?;
        let entry_name = format!("tierz/tier-list.{}", format.extension());

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(Utc::now().timestamp().max(0) as u64);
        header.set_cksum();

        tar.append_data(&mut header, entry_name, content.as_bytes())
            .map_err(TierzError::Io)?;
    }

    tar.into_inner()
        .map_err(TierzError::Io)?
        .finish()
        .map_err(TierzError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_arrangement;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn root() -> RenderRoot {
        RenderRoot {
            id: "tier-list".into(),
            revision: 3,
        }
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("TEXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("png".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.to_string(), "json");
    }

    #[test]
    fn markdown_lists_tiers_in_rank_order() {
        let rows = sample_arrangement().view();
        let md = render(&root(), &rows, ExportFormat::Markdown).unwrap();
        let ex = md.find("**EX**").unwrap();
        let a = md.find("**A**").unwrap();
        assert!(ex < a);
        assert!(md.contains("| **A** | P1 shop, P2 shop, P3 shop |"));
        assert!(md.contains("| **D** |  |"));
    }

    #[test]
    fn text_aligns_tier_column() {
        let rows = sample_arrangement().view();
        let txt = render(&root(), &rows, ExportFormat::Text).unwrap();
        assert!(txt.contains("EX | Mita shop\n"));
        assert!(txt.contains("B  | X shop, Y shop\n"));
        assert!(txt.contains("D  |\n"));
    }

    #[test]
    fn json_carries_render_root() {
        let rows = sample_arrangement().view();
        let out = render(&root(), &rows, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["root"]["revision"], 3);
        assert_eq!(value["tiers"][0]["id"], "EX");
        assert_eq!(value["tiers"][1]["items"][2], "P3 shop");
    }

    #[test]
    fn archive_holds_every_format() {
        let rows = sample_arrangement().view();
        let mut buf = Vec::new();
        write_archive(&mut buf, &root(), &rows).unwrap();
        assert_eq!(&buf[..2], &[0x1f, 0x8b]);

        let mut archive = tar::Archive::new(GzDecoder::new(buf.as_slice()));
        let mut found = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let path = entry.path().unwrap().display().to_string();
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            assert!(body.contains("Mita shop"));
            found.push(path);
        }
        assert_eq!(
            found,
            vec![
                "tierz/tier-list.md",
                "tierz/tier-list.txt",
                "tierz/tier-list.json"
            ]
        );
    }
}
