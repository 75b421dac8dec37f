//! Per-scenario file logger
//!
//! Every scenario gets its own [`TestLogger`], backed by a private
//! `tracing` dispatcher that writes to a file named after the scenario.
//! Nothing is installed globally, so loggers never leak into each other
//! and re-running a scenario simply truncates its file.
//!
//! ```text
//! 10/19/2026 03:04:05 PM  get_single_post    INFO:  Request URL = https://…/posts/1
//! ```

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

use crate::exchange::{Exchange, render_headers};

/// `strftime` pattern for log timestamps (12-hour clock, locale independent).
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Formats one event as `<timestamp>  <name>    <LEVEL>:  <message>`.
struct LineFormat {
    name: String,
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        write!(
            writer,
            "{timestamp}  {}    {}:  ",
            self.name,
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log sink dedicated to one scenario run.
pub struct TestLogger {
    name: String,
    path: PathBuf,
    dispatch: Dispatch,
}

impl TestLogger {
    /// Create (or truncate) `dir/<name>` and return a logger writing to it
    /// at debug verbosity.
    ///
    /// # Errors
    ///
    /// Returns error if the name is not a plain file name or the file
    /// cannot be created.
    pub fn create(name: &str, dir: &Path) -> Result<Self, LoggerError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(LoggerError::InvalidName(name.to_string()));
        }

        let path = dir.join(name);
        let file =
            File::create(&path).map_err(|e| LoggerError::Io(path.clone(), e.to_string()))?;

        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .event_format(LineFormat {
                name: name.to_string(),
            });
        let subscriber = tracing_subscriber::registry()
            .with(LevelFilter::DEBUG)
            .with(layer);

        Ok(Self {
            name: name.to_string(),
            path,
            dispatch: Dispatch::new(subscriber),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn debug(&self, message: &str) {
        let message = single_line(message);
        tracing::dispatcher::with_default(&self.dispatch, || tracing::debug!("{message}"));
    }

    pub fn info(&self, message: &str) {
        let message = single_line(message);
        tracing::dispatcher::with_default(&self.dispatch, || tracing::info!("{message}"));
    }

    pub fn warn(&self, message: &str) {
        let message = single_line(message);
        tracing::dispatcher::with_default(&self.dispatch, || tracing::warn!("{message}"));
    }

    /// Write the full exchange as six info lines: request URL, request
    /// headers, request body, status code, response headers, response body.
    pub fn log_exchange(&self, exchange: &Exchange) {
        let request = &exchange.request;
        let response = &exchange.response;

        self.info(&format!("Request URL = {}", request.url));
        self.info(&format!(
            "Request headers = {}",
            render_headers(&request.headers)
        ));
        self.info(&format!(
            "Request body = {}",
            request.body.as_deref().unwrap_or("None")
        ));
        self.info(&format!("Response Code = {}", response.status_code));
        self.info(&format!(
            "Response Headers = {}",
            render_headers(&response.headers)
        ));
        self.info(&format!("Response = {}", response.body));
    }
}

/// One event, one physical line: escape CR and LF.
fn single_line(message: &str) -> Cow<'_, str> {
    if message.contains(['\r', '\n']) {
        Cow::Owned(message.replace('\r', "\\r").replace('\n', "\\n"))
    } else {
        Cow::Borrowed(message)
    }
}

impl fmt::Debug for TestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestLogger")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid logger name: {0:?}")]
    InvalidName(String),
    #[error("Cannot create log file {0}: {1}")]
    Io(PathBuf, String),
}
