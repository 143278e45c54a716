// SPDX-FileCopyrightText: 2024 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt::{self, Write};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

static LOG_SINK: LazyLock<RwLock<Option<mpsc::UnboundedSender<LogEntry>>>> =
    LazyLock::new(|| RwLock::new(None));

/// Log record forwarded to the application layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub msg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

/// Tracing layer which forwards logs to the registered sink
pub(super) fn layer<S>() -> impl Layer<S>
where
    S: Subscriber,
    for<'span> S: LookupSpan<'span>,
{
    ForwardLayer
}

pub fn set_log_sink(sink: mpsc::UnboundedSender<LogEntry>) {
    let prev_sink = {
        let mut guard = LOG_SINK.write();
        // Note: The previous sink MUST NOT be dropped before the `guard` is released. The
        // `RwLock` is not reentrant, and logging while it is held deadlocks.
        guard.replace(sink)
    };
    if prev_sink.is_some() {
        warn!("replacing existing log sink");
    }
}

struct ForwardLayer;

impl ForwardLayer {
    fn log(&self, level: tracing::Level, target: String, msg: String) {
        let entry = LogEntry {
            time: Utc::now(),
            level: level.into(),
            target,
            msg,
        };
        if let Some(sink) = LOG_SINK.read().as_ref() {
            let _ = sink.send(entry);
        }
    }
}

impl<S> Layer<S> for ForwardLayer
where
    S: Subscriber + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !ctx.enabled(metadata) {
            return;
        }
        let mut fields = EntryFields {
            target: metadata.target().to_owned(),
            msg: String::new(),
        };
        event.record(&mut fields);
        self.log(*metadata.level(), fields.target, fields.msg);
    }
}

/// Target and rendered message of a single event.
///
/// The message comes first, followed by the structured values as `name=value` pairs. Events
/// bridged from the `log` crate carry their real target in `log.target`.
struct EntryFields {
    target: String,
    msg: String,
}

impl EntryFields {
    fn push(&mut self, name: &str, value: impl fmt::Display) {
        let buf = match name {
            "message" => &mut self.msg,
            "log.target" => {
                self.target.clear();
                &mut self.target
            }
            name if name.starts_with("log.") => return,
            name => {
                self.msg.push(' ');
                self.msg.push_str(name);
                self.msg.push('=');
                &mut self.msg
            }
        };
        // writing into a `String` never fails
        let _ = write!(buf, "{value}");
    }
}

impl Visit for EntryFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field.name(), format_args!("{value:?}"));
    }
}

/// Serializes tests which register a log sink.
#[cfg(test)]
pub(super) static SINK_TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// Receives forwarded entries until one with the given message shows up.
#[cfg(test)]
pub(super) fn find_entry(
    rx: &mut mpsc::UnboundedReceiver<LogEntry>,
    msg: &str,
) -> Option<LogEntry> {
    std::iter::from_fn(|| rx.try_recv().ok()).find(|entry| entry.msg == msg)
}
