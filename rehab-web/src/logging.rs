//! Logging setup
//!
//! Installs a global tracing subscriber once. In the browser each event is
//! written to the developer console; native builds (tests, tools) write to
//! stdout. Timestamps are left to the console.

use std::io;
use std::sync::{Mutex, PoisonError};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};

static LOG_LEVEL: Mutex<Option<LevelFilter>> = Mutex::new(None);

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Parse a level name such as "info" or "DEBUG"
pub fn parse_level(name: &str) -> Result<LevelFilter, LoggingError> {
    name.trim()
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::UnknownLevel(name.to_string()))
}

/// Initialize tracing at `level`. Subsequent calls are no-ops and return
/// the level that is actually active.
pub fn init(level: &str) -> Result<LevelFilter, LoggingError> {
    let mut active = LOG_LEVEL.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(current) = *active {
        return Ok(current);
    }

    let filter = parse_level(level)?;
    let subscriber = fmt::Subscriber::builder()
        .with_max_level(filter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(ConsoleMakeWriter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    *active = Some(filter);

    tracing::info!(%filter, "Logging initialized");
    Ok(filter)
}

/// Hands out one `ConsoleWriter` per event
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::default()
    }
}

/// Buffers one formatted event and writes it as a single line on drop
#[derive(Default)]
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn line(&self) -> String {
        String::from_utf8_lossy(&self.buf).trim_end().to_string()
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        console_line(&self.line());
    }
}

#[cfg(target_arch = "wasm32")]
pub fn console_line(line: &str) {
    web_sys::console::log_1(&line.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn console_line(line: &str) {
    println!("{line}");
}
