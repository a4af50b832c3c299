//! Browser console sink for `tracing`.
//!
//! Each formatted event is buffered and handed to the matching
//! `console.*` method when the writer is dropped, so warnings show up as
//! warnings in devtools. Outside wasm the lines go to stderr.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::FmtSubscriber;

/// Install a console-backed global subscriber. Returns false if one was
/// already set (a second `init()` from JS, or a host-installed subscriber).
pub fn install_subscriber(max_level: Level) -> bool {
    FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        // no SystemTime clock on wasm32-unknown-unknown
        .without_time()
        .try_init()
        .is_ok()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// One event's worth of formatted output
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self { level, buf: Vec::new() }
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
        if let Some(line) = console_line(&self.buf) {
            emit(self.level, &line);
        }
    }
}

/// Formatted event without its trailing newline; None when empty
fn console_line(buf: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buf);
    let line = text.trim_end_matches(['\n', '\r']);
    (!line.is_empty()).then(|| line.to_owned())
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let value = JsValue::from_str(line);
    if level == Level::ERROR {
        console::error_1(&value);
    } else if level == Level::WARN {
        console::warn_1(&value);
    } else if level == Level::INFO {
        console::info_1(&value);
    } else {
        console::debug_1(&value);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{line}");
}
