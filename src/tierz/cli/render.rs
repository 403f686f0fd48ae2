use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use tierz::api::{CmdMessage, MessageLevel};
use tierz::config::TierzConfig;
use tierz::model::{Tier, TierRow};
use timeago::Formatter;
use unicode_width::UnicodeWidthStr;

const LINE_WIDTH: usize = 100;
const SEPARATOR: &str = " │ ";
const PIN_MARKER: &str = "⚲";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_rows(rows: &[TierRow], last_updated: Option<DateTime<Utc>>) {
    print!("{}", render_rows(rows));
    if let Some(ts) = last_updated {
        println!("{}", format!("updated {}", format_time_ago(ts)).dimmed());
    }
}

/// One block per tier: the tier label, then numbered items wrapped to the line width.
pub(super) fn render_rows(rows: &[TierRow]) -> String {
    let label_width = rows
        .iter()
        .map(|r| label(&r.tier).width())
        .max()
        .unwrap_or(0);
    let indent = " ".repeat(label_width + SEPARATOR.width());
    let available = LINE_WIDTH.saturating_sub(indent.width());

    let mut out = String::new();
    for row in rows {
        let text = label(&row.tier);
        let pad = " ".repeat(label_width - text.width());
        out.push_str(&format!("{}{}{}", tier_color(&row.tier, &text), pad, SEPARATOR.dimmed()));

        let mut used = 0;
        for item in &row.items {
            let entry = format!("{} {}", item.position + 1, item.name);
            let width = entry.width() + 2;
            if used > 0 && used + width > available {
                out.push('\n');
                out.push_str(&indent);
                used = 0;
            }
            out.push_str(&format!("{} {}  ", (item.position + 1).to_string().dimmed(), item.name));
            used += width;
        }
        // trailing spaces from the last entry
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }
    out
}

fn label(tier: &Tier) -> String {
    if tier.pinned_only {
        format!("{} {}", tier.id, PIN_MARKER)
    } else {
        tier.id.to_string()
    }
}

fn tier_color(tier: &Tier, text: &str) -> ColoredString {
    match parse_hex(&tier.color) {
        Some((r, g, b)) => text.truecolor(r, g, b).bold(),
        None => text.bold(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub(super) fn print_options(item: &str, tier: &str, options: &[usize]) {
    if options.is_empty() {
        return;
    }
    let list: Vec<String> = options.iter().map(|n| n.to_string()).collect();
    println!("{} in {}: {}", item, tier.bold(), list.join(" "));
}

pub(super) fn print_config(config: &TierzConfig) {
    for key in tierz::config::KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key.bold(), value);
        }
    }
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
