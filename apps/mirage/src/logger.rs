//! `log` backend that forwards records to the host's log sink.

use std::ffi::{CString, c_char};
use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::RwLock;

use mirage_platform_windows::win_api;

/// Host log callback. `level` uses the host's numbering (1 error, 2 warning, 3 info, 4 debug).
pub type LogSink = unsafe extern "C" fn(level: i32, message: *const c_char);

/// Environment variable overriding the level filter.
pub const LOG_ENV: &str = "MIRAGE_LOG";

static SINK: RwLock<Option<LogSink>> = parking_lot::const_rwlock(None);
static LOGGER: HostLogger = HostLogger;

struct HostLogger;

impl Log for HostLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = format!("{}", record.args());
        match *SINK.read() {
            Some(sink) => {
                let text = CString::new(message.replace('\0', " ")).unwrap_or_default();
                unsafe { sink(host_level(record.level()), text.as_ptr()) };
            }
            None => win_api::output_debug_string(&format!(
                "[mirage] {:<5} {message}\n",
                record.level()
            )),
        }
    }

    fn flush(&self) {}
}

/// Install the logger (once per process) and point it at `sink`.
pub fn init(sink: Option<LogSink>) {
    *SINK.write() = sink;
    // Already installed on a second add-on load; only the sink changes.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_filter(std::env::var(LOG_ENV).ok().as_deref()));
}

/// Drop the host sink; later records go to the debugger output.
pub fn detach() {
    *SINK.write() = None;
}

fn level_filter(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

fn host_level(level: Level) -> i32 {
    match level {
        Level::Error => 1,
        Level::Warn => 2,
        Level::Info => 3,
        Level::Debug | Level::Trace => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_info() {
        assert_eq!(level_filter(None), LevelFilter::Info);
        assert_eq!(level_filter(Some("verbose-ish")), LevelFilter::Info);
    }

    #[test]
    fn env_value_raises_level() {
        assert_eq!(level_filter(Some("debug")), LevelFilter::Debug);
        assert_eq!(level_filter(Some(" TRACE ")), LevelFilter::Trace);
    }

    #[test]
    fn host_levels() {
        assert_eq!(host_level(Level::Error), 1);
        assert_eq!(host_level(Level::Warn), 2);
        assert_eq!(host_level(Level::Info), 3);
        assert_eq!(host_level(Level::Trace), 4);
    }
}
