use std::io::Write;

use ach_core::style::ColorTheme;
use colored::Colorize;

/// Installs the logger. `RUST_LOG` takes precedence over `level`.
pub fn init(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let level = record.level();
            let tag = format!("[{}]", level).color(level.color()).bold();
            writeln!(buf, "{} {}", tag, record.args())
        })
        .init();
}
