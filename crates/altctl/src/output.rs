//! Color/table helpers for CLI output, respecting `--color`/`NO_COLOR`
//! (spec §6). Kept deliberately thin: table rendering belongs here,
//! stack orchestration logic does not.

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};

pub fn print_success(message: &str, color: bool) {
    if color {
        println!("{} {}", "✓".green().bold(), message);
    } else {
        println!("OK {message}");
    }
}

pub fn print_warning(message: &str, color: bool) {
    if color {
        println!("{} {}", "⚠".yellow().bold(), message);
    } else {
        println!("WARN {message}");
    }
}

pub fn print_error(message: &str, color: bool) {
    if color {
        eprintln!("{} {}", "✗".red().bold(), message);
    } else {
        eprintln!("ERROR {message}");
    }
}

pub fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(headers.into_iter().map(|h| Cell::new(h).set_alignment(CellAlignment::Center)));
    table
}
