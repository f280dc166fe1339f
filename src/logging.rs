//! Tracing subscriber setup and the flat key=value line format

use std::fmt;

use anyhow::Context;
use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingSection};

/// Directives appended to the configured level to keep transport chatter out.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,tower_http=info";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// An unrecognised level falls back to `info` and is reported once the
/// subscriber is up.
pub fn init_tracing(config: &LoggingSection) -> anyhow::Result<()> {
    let level = parse_level(&config.level);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(filter_directives(level.unwrap_or(LevelFilter::INFO)))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::KeyValue => registry
            .with(tracing_subscriber::fmt::layer().event_format(KeyValueFormat))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
    .context("failed to install tracing subscriber")?;

    if level.is_none() {
        tracing::warn!(level = %config.level, "Unrecognised log level; using info");
    }

    Ok(())
}

/// Parse a level name, accepting the `warning`/`critical` spellings too.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let level = level.trim().to_ascii_lowercase();
    let level = match level.as_str() {
        "" => return None,
        "warning" => "warn",
        "critical" | "fatal" => "error",
        other => other,
    };
    level.parse().ok()
}

fn filter_directives(level: LevelFilter) -> String {
    format!("{},{}", level, QUIET_DEPENDENCIES)
}

/// One line per event:
/// `timestamp="..." level="INFO" logger="target" message="..." key="value"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyValueFormat;

impl<S, N> FormatEvent<S, N> for KeyValueFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        let mut pairs = vec![
            ("timestamp", Utc::now().format(TIMESTAMP_FORMAT).to_string()),
            ("level", metadata.level().to_string()),
            ("logger", metadata.target().to_string()),
            ("message", visitor.message),
        ];
        pairs.extend(visitor.fields);

        writeln!(writer, "{}", render_pairs(&pairs))
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}

/// Join pairs as `key="value"`, escaping embedded quotes and backslashes.
pub fn render_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            format!("{}=\"{}\"", key, escaped)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
