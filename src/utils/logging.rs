// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored CLI message helpers

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(colored_output: bool, verbose: bool) {
    colored::control::set_override(colored_output);

    let level = if verbose { "contact_enrich=debug" } else { "contact_enrich=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
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

pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

/// `label: value` with the sentinel dimmed.
pub fn format_field(label: &str, value: &str) -> String {
    let rendered = if crate::models::is_found(value) {
        value.normal()
    } else {
        value.dimmed()
    };
    format!("{:>14} {}", format!("{}:", label).bold(), rendered)
}
