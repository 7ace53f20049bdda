//! Injected logging for model construction and alignment.
//!
//! Builders and the engine never call the global `log` macros directly; they
//! write through a [`Tracer`] handed to them, so a test can capture (or
//! silence) exactly the records one construction produced.

use core::fmt;

use log::{Level, Log, Metadata, Record};

const TARGET: &str = "c4_align";

/// A logger that drops every record.
struct SilentLog;

impl Log for SilentLog {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        false
    }

    fn log(&self, _: &Record<'_>) {}

    fn flush(&self) {}
}

static SILENT: SilentLog = SilentLog;

/// A borrowed handle to a [`log::Log`] implementation.
#[derive(Clone, Copy)]
pub struct Tracer<'a> {
    logger: &'a dyn Log,
}

impl<'a> Tracer<'a> {
    /// Route records to `logger`.
    pub fn new(logger: &'a dyn Log) -> Self {
        Self { logger }
    }

    /// Log at `level` if the underlying logger accepts it.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(TARGET).build();
        if self.logger.enabled(&metadata) {
            self.logger.log(
                &Record::builder()
                    .metadata(metadata)
                    .args(args)
                    .build(),
            );
        }
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }
}

impl Tracer<'static> {
    /// Forward to whatever logger the process installed (e.g. `env_logger`).
    pub fn global() -> Self {
        Self::new(log::logger())
    }

    /// Discard everything.
    pub fn silent() -> Self {
        Self::new(&SILENT)
    }
}

impl Default for Tracer<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tracer")
    }
}
