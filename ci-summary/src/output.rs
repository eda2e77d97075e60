// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{Args, ValueEnum};
use owo_colors::{OwoColorize, Style, style};
use std::{
    fmt,
    io::{self, BufWriter, Write},
};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
    warn,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub(crate) mod clap_styles {
    use clap::builder::{
        Styles,
        styling::{AnsiColor, Effects},
    };

    pub(crate) const fn style() -> Styles {
        Styles::styled()
            .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
            .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
            .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
            .placeholder(AnsiColor::Cyan.on_default())
            .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
    }
}

/// The environment variable used to filter log output.
pub(crate) const LOG_ENV: &str = "CI_SUMMARY_LOG";

/// Log events with this target are printed without a level prefix.
pub(crate) const NO_HEADING_TARGET: &str = "ci_summary::no_heading";

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Verbose output
    #[arg(long, short, global = true, env = "CI_SUMMARY_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN",
        env = "CI_SUMMARY_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    pub(crate) fn init(self) -> OutputContext {
        let OutputOpts { verbose, color } = self;

        color.init(verbose);

        OutputContext { color }
    }
}

#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns general stderr styles for the current output context.
    pub fn stderr_styles(&self) -> StderrStyles {
        let mut styles = StderrStyles::default();

        if self.color.should_colorize(supports_color::Stream::Stderr) {
            styles.colorize();
        }

        styles
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

static INIT_LOGGER: std::sync::Once = std::sync::Once::new();

impl Color {
    pub(crate) fn init(self, verbose: bool) {
        // Pass the styles in as a stylesheet to ensure we use the latest supports-color here.
        let mut log_styles = LogStyles::default();
        if self.should_colorize(supports_color::Stream::Stderr) {
            log_styles.colorize();
        }

        INIT_LOGGER.call_once(|| {
            let default_level = if verbose {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            };
            let (targets, invalid_filter) = log_targets(
                std::env::var_os(LOG_ENV).and_then(|value| value.into_string().ok()),
                default_level,
            );

            let layer = tracing_subscriber::fmt::layer()
                .event_format(SimpleFormatter { styles: log_styles })
                .with_writer(std::io::stderr)
                .with_filter(targets);

            tracing_subscriber::registry().with(layer).init();

            if let Some(value) = invalid_filter {
                warn!("ignoring invalid {LOG_ENV} value `{value}`, using default log level");
            }
        });
    }

    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

/// Computes log targets from the value of the log environment variable.
///
/// Returns the targets, along with the value if it could not be parsed.
fn log_targets(value: Option<String>, default_level: LevelFilter) -> (Targets, Option<String>) {
    let default_targets = Targets::new().with_default(default_level);
    match value {
        // If the level string is empty, use the standard level filter instead.
        None => (default_targets, None),
        Some(value) if value.is_empty() => (default_targets, None),
        Some(value) => match value.parse() {
            Ok(targets) => (targets, None),
            Err(_) => (default_targets, Some(value)),
        },
    }
}

struct SimpleFormatter {
    styles: LogStyles,
}

impl<S, N> FormatEvent<S, N> for SimpleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        if metadata.target() != NO_HEADING_TARGET {
            let (label, level_style) = match *metadata.level() {
                Level::ERROR => ("error", self.styles.error),
                Level::WARN => ("warning", self.styles.warning),
                Level::INFO => ("info", self.styles.note),
                Level::DEBUG => ("debug", self.styles.note),
                Level::TRACE => ("trace", self.styles.note),
            };
            write!(writer, "{}: ", label.style(level_style))?;
        }

        let mut visitor = MessageVisitor {
            writer: &mut writer,
            error: None,
        };

        event.record(&mut visitor);

        if let Some(error) = visitor.error {
            return Err(error);
        }

        writeln!(writer)
    }
}

static MESSAGE_FIELD: &str = "message";

struct MessageVisitor<'writer, 'a> {
    writer: &'a mut format::Writer<'writer>,
    error: Option<fmt::Error>,
}

impl Visit for MessageVisitor<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD
            && let Err(error) = write!(self.writer, "{value:?}")
        {
            self.error = Some(error);
        }
    }
}

#[derive(Debug, Default)]
struct LogStyles {
    error: Style,
    warning: Style,
    note: Style,
}

impl LogStyles {
    fn colorize(&mut self) {
        self.error = style().red().bold();
        self.warning = style().yellow().bold();
        self.note = style().bold();
    }
}

#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
}

impl StderrStyles {
    fn colorize(&mut self) {
        self.bold = style().bold();
    }
}

/// Where the summary markup goes when there's no summary file.
#[derive(Default)]
pub enum OutputWriter {
    /// Write to stdout.
    #[default]
    Normal,
    /// Capture output in tests.
    #[cfg(test)]
    Test {
        /// Captured stdout.
        stdout: Vec<u8>,
    },
}

impl OutputWriter {
    pub(crate) fn stdout_writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Normal => Box::new(BufWriter::new(io::stdout())),
            #[cfg(test)]
            Self::Test { stdout } => Box::new(stdout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_targets_from_env() {
        let (targets, invalid) = log_targets(None, LevelFilter::INFO);
        assert_eq!(targets.default_level(), Some(LevelFilter::INFO));
        assert_eq!(invalid, None);

        let (targets, invalid) = log_targets(Some(String::new()), LevelFilter::DEBUG);
        assert_eq!(targets.default_level(), Some(LevelFilter::DEBUG));
        assert_eq!(invalid, None);

        let (targets, invalid) = log_targets(Some("trace".to_owned()), LevelFilter::INFO);
        assert_eq!(targets.default_level(), Some(LevelFilter::TRACE));
        assert_eq!(invalid, None);

        let (targets, invalid) =
            log_targets(Some("ci_summary=notalevel".to_owned()), LevelFilter::INFO);
        assert_eq!(targets.default_level(), Some(LevelFilter::INFO));
        assert_eq!(invalid.as_deref(), Some("ci_summary=notalevel"));
    }

    #[test]
    fn test_writer_captures_stdout() {
        let mut output_writer = OutputWriter::Test { stdout: Vec::new() };
        output_writer
            .stdout_writer()
            .write_all(b"<h1>Summary</h1>")
            .unwrap();

        let OutputWriter::Test { stdout } = output_writer else {
            unreachable!("output writer is a test writer");
        };
        assert_eq!(stdout, b"<h1>Summary</h1>");
    }

    #[test]
    fn color_never_does_not_colorize() {
        assert!(!Color::Never.should_colorize(supports_color::Stream::Stderr));
        assert!(Color::Always.should_colorize(supports_color::Stream::Stderr));
    }
}
