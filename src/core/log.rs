use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;

const OP_WIDTH_LIMIT: usize = 60;

fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern"));
    re.replace_all(s, "").into_owned()
}

/// Colour for an audit operation, grouped by entity.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "init" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "create_user" | "bootstrap_admin" => Colour::Cyan,
        "provision_rollback_failed" => Colour::Red,
        other if other.ends_with("_del") => Colour::Red,
        other if other.ends_with("_add") || other.ends_with("_create") => Colour::Green,
        other if other.ends_with("_submit") => Colour::Yellow,
        other if other.starts_with("defect_") => Colour::Yellow,
        _ => Colour::White,
    }
}

fn truncate_visible(s: &str, max: usize) -> String {
    let visible = strip_ansi(s);
    if visible.chars().count() > max {
        let mut t: String = visible.chars().take(max - 3).collect();
        t.push_str("...");
        t
    } else {
        visible
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_target = |operation: &str, target: &str| {
            if target.is_empty() {
                operation.to_string()
            } else {
                format!("{operation} ({target})")
            }
        };

        let op_w = entries
            .iter()
            .map(|e| op_target(&e.operation, &e.target).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_LIMIT);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        println!("📜 Internal log:\n");

        for e in &entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or_else(|_| e.date.clone());

            let color = color_for_operation(&e.operation);
            let plain = truncate_visible(&op_target(&e.operation, &e.target), OP_WIDTH_LIMIT);

            // only the operation word is coloured
            let shown = match plain.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(plain.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&shown).chars().count()));

            println!(
                "{:>id_w$}: {} | {}{} => {}",
                e.id,
                date,
                shown,
                padding,
                e.message,
                id_w = id_w
            );
        }

        Ok(())
    }
}
