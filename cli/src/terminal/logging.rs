use colored::*;
use indicatif::ProgressStyle;
use radar_common::logging::SUCCESS_TARGET;
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::filter::{EnvFilter, filter_fn};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use super::print::PRINT_TARGET;

const PROGRESS_TEMPLATE: &str = "{spinner:.blue} {span_name} [{bar:32.green/bright_black}] {pos}/{len} {msg}";

pub struct RadarFormatter;

impl<S, N> FormatEvent<S, N> for RadarFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() != PRINT_TARGET {
            let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
                match *meta.level() {
                    Level::INFO if meta.target() == SUCCESS_TARGET => ("[+]", |s| s.green().bold()),
                    Level::TRACE => ("[ ]", |s| s.dimmed()),
                    Level::DEBUG => ("[?]", |s| s.blue()),
                    Level::INFO => ("[*]", |s| s.cyan().bold()),
                    Level::WARN => ("[!]", |s| s.yellow().bold()),
                    Level::ERROR => ("[-]", |s| s.red().bold()),
                };
            write!(writer, "{} ", color_func(symbol.into()))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

fn default_directive(quiet: u8) -> &'static str {
    match quiet {
        0 => "info",
        _ => "warn",
    }
}

/// Installs the global subscriber.
///
/// Log lines go to stderr and `radar::print` lines to stdout, both through
/// the indicatif writers so an active progress bar is redrawn underneath them.
pub fn init_logging(quiet: u8) {
    let indicatif_layer = IndicatifLayer::new().with_progress_style(progress_style());

    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet)));
    if let Ok(directive) = format!("{PRINT_TARGET}=off").parse() {
        filter = filter.add_directive(directive);
    }

    let log_layer = tracing_subscriber::fmt::layer()
        .event_format(RadarFormatter)
        .with_writer(indicatif_layer.get_stderr_writer())
        .with_filter(filter);

    let print_layer = tracing_subscriber::fmt::layer()
        .event_format(RadarFormatter)
        .with_writer(indicatif_layer.get_stdout_writer())
        .with_filter(filter_fn(|meta| meta.target() == PRINT_TARGET));

    let _ = tracing_subscriber::registry()
        .with(log_layer)
        .with(print_layer)
        .with(indicatif_layer)
        .try_init();
}

pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░")
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}
