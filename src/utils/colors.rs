/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Grid cell for a compliance day:
/// defect → red `D`, checked → green `✓`, empty → grey `·`.
pub fn grid_cell(checked: bool, has_active_defect: bool) -> String {
    match (checked, has_active_defect) {
        (true, true) => format!("{RED}D{RESET}"),
        (true, false) => format!("{GREEN}✓{RESET}"),
        _ => format!("{GREY}·{RESET}"),
    }
}

/// Colour for a timeliness label (`on time`, `late`, `missing`).
pub fn color_for_timeliness(label: &str) -> &'static str {
    match label {
        "on time" => GREEN,
        "late" => YELLOW,
        "missing" => RED,
        _ => RESET,
    }
}

/// Returns GREY for empty optional values and RESET otherwise.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
