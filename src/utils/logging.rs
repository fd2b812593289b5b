// file: src/utils/logging.rs
// description: Tracing subscriber initialization on stderr with optional ANSI coloring

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logs go to stderr; stdout is reserved for MCP frames and command output.
/// `RUST_LOG` overrides the level chosen by `verbose`.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
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

#[derive(Debug, Clone, Copy)]
enum Status {
    Resolved,
    Rejected,
    Empty,
}

fn status_line(status: Status, msg: &str) -> String {
    match status {
        Status::Resolved => format!("{} {}", "✓".green().bold(), msg.green()),
        Status::Rejected => format!("{} {}", "✗".red().bold(), msg.red()),
        Status::Empty => format!("{} {}", "⚠".yellow().bold(), msg.yellow()),
    }
}

/// An address that resolved, printed with the location it resolved to.
pub fn format_resolved(address: &str, location: &str) -> String {
    status_line(Status::Resolved, &format!("{} -> {}", address, location))
}

/// A validation or lookup failure, printed as the guidance message itself.
pub fn format_rejected(msg: &str) -> String {
    status_line(Status::Rejected, msg)
}

pub fn format_empty(what: &str) -> String {
    status_line(Status::Empty, &format!("No {} found", what))
}

/// Listing header with the number of entries that follow.
pub fn format_section(title: &str, count: usize) -> String {
    format!("{} {}", title.cyan().bold(), format!("({})", count).dimmed())
}
