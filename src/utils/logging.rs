// file: src/utils/logging.rs
// description: Tracing subscriber initialization with optional ANSI coloring

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// Prints a `<mark>`-highlighted fragment for a terminal.
pub fn format_highlight(fragment: &str) -> String {
    let mut output = String::with_capacity(fragment.len());
    let mut rest = fragment;

    while let Some(start) = rest.find("<mark>") {
        output.push_str(&rest[..start]);
        let after = &rest[start + "<mark>".len()..];
        match after.find("</mark>") {
            Some(end) => {
                output.push_str(&after[..end].yellow().bold().to_string());
                rest = &after[end + "</mark>".len()..];
            }
            None => {
                output.push_str(after);
                rest = "";
            }
        }
    }
    output.push_str(rest);

    output
}
