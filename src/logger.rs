use std::io::{IsTerminal, Write};
use std::time::Instant;

use anstyle::{AnsiColor, Reset, RgbColor, Style};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;

const ACCENT: Style = Style::new().fg_color(Some(anstyle::Color::Rgb(RgbColor(207, 106, 76))));
const WARNING: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)));
const ERROR: Style = Style::new()
    .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Red)))
    .bold();
const DIM: Style = Style::new().dimmed();

struct ChordLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: LevelFilter,
    color: bool,
    start: Instant,
}

impl Log for ChordLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        eprintln!(
            "{}",
            format_line(record.level(), record.target(), &message, self.color)
        );

        if let Some(ref file) = self.file {
            let elapsed = self.start.elapsed().as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {} - {message}",
                record.level(),
                record.target(),
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Render one stderr line. Info lines carry the command echo and macro
/// notices, so they get the arrow prefix.
#[must_use]
pub fn format_line(level: Level, target: &str, message: &str, color: bool) -> String {
    let paint = |style: Style, text: &str| {
        if color {
            format!("{style}{text}{Reset}")
        } else {
            text.to_string()
        }
    };
    match level {
        Level::Info => format!("{} {message}", paint(ACCENT, "❱")),
        Level::Warn => format!("{} {message}", paint(WARNING, "warning:")),
        Level::Error => format!("{} {message}", paint(ERROR, "error:")),
        Level::Debug | Level::Trace => {
            paint(DIM, &format!("[{}] {target}: {message}", level.as_str()))
        }
    }
}

/// Install the global logger. `RUST_LOG`, when set to a level, overrides
/// `default_filter`.
///
/// # Errors
///
/// Returns `SetLoggerError` if a logger is already installed.
pub fn init(
    default_filter: LevelFilter,
    log_file: Option<std::fs::File>,
) -> Result<(), SetLoggerError> {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default_filter);

    let logger = ChordLogger {
        file: log_file.map(Mutex::new),
        filter,
        color: std::io::stderr().is_terminal(),
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(())
}
