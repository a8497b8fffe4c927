//! Target report output formatting
//!
//! Text for operators, JSON for other tools, CSV with one row per origin pair
//! for plotting the intersection geometry.

use std::fmt;
use std::str::FromStr;

use crate::api::types::TargetReport;
use crate::core::TargetState;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Renders a report as a string
pub trait ReportFormatter {
    fn format_report(&self, report: &TargetReport) -> String;
}

/// Build the formatter for a format with its default options
pub fn formatter_for(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}

/// Human-readable text formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// Single line per target
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    fn state_line(state: TargetState) -> &'static str {
        match state {
            TargetState::Empty => "no origins yet",
            TargetState::Underdetermined => "need a second origin",
            TargetState::Measured => "measured",
            // Distinct from "not enough data": more origins on the same line won't help
            TargetState::Indeterminate => "all bearings parallel, re-sight from a new angle",
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format_report(&self, report: &TargetReport) -> String {
        let mut output = String::new();

        if self.compact {
            output.push_str(&format!("{} [{}]: ", report.title, report.id));
            match report.estimated_position {
                Some(p) => output.push_str(&format!("{:.6}°, {:.6}°", p.latitude, p.longitude)),
                None => output.push_str(Self::state_line(report.state)),
            }
            if let Some(h) = report.estimated_elevation_m {
                output.push_str(&format!(", {:+.1} m", h));
            }
            return output;
        }

        output.push_str(&format!("Target: {} [{}]\n", report.title, report.id));
        output.push_str(&format!("  State:     {}\n", Self::state_line(report.state)));
        if let Some(p) = report.estimated_position {
            output.push_str(&format!("  Latitude:  {:.6}°\n", p.latitude));
            output.push_str(&format!("  Longitude: {:.6}°\n", p.longitude));
        }
        if let Some(h) = report.estimated_elevation_m {
            output.push_str(&format!("  Height:    {:+.1} m\n", h));
        }
        if let Some(spread) = report.diagnostics.spread_m {
            output.push_str(&format!(
                "  Spread:    {:.1} m ({} points, {} rejected)\n",
                spread,
                report.diagnostics.used_points,
                report.diagnostics.rejected_points.len()
            ));
        }

        output.push_str(&format!("Origins ({}):\n", report.origins.len()));
        for origin in &report.origins {
            output.push_str(&format!(
                "  #{} {:.6}°, {:.6}° heading {:.1}° tilt {:.1}°",
                origin.index,
                origin.position.latitude,
                origin.position.longitude,
                origin.heading_deg,
                origin.tilt_deg
            ));
            if let Some(range) = origin.range_m {
                output.push_str(&format!(" range {:.1} m", range));
            }
            if !origin.title.is_empty() {
                output.push_str(&format!(" ({})", origin.title));
            }
            output.push('\n');
        }

        output.push_str(&format!("Pairs ({}):\n", report.pairs.len()));
        for pair in &report.pairs {
            match pair.intersection {
                Some(p) => output.push_str(&format!(
                    "  {}-{}: {:.6}°, {:.6}°\n",
                    pair.i, pair.j, p.latitude, p.longitude
                )),
                None => output.push_str(&format!("  {}-{}: degenerate\n", pair.i, pair.j)),
            }
        }

        output
    }
}

/// JSON formatter
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl JsonFormatter {
    /// Several reports as one JSON array
    pub fn format_reports(&self, reports: &[TargetReport]) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(reports)
        } else {
            serde_json::to_string(reports)
        };
        result.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &TargetReport) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        result.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

/// CSV formatter, one row per origin pair
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header() -> &'static str {
        "target_id,i,j,latitude,longitude"
    }
}

impl ReportFormatter for CsvFormatter {
    fn format_report(&self, report: &TargetReport) -> String {
        let mut output = String::new();
        if self.include_header {
            output.push_str(Self::header());
            output.push('\n');
        }
        for pair in &report.pairs {
            match pair.intersection {
                Some(p) => output.push_str(&format!(
                    "{},{},{},{:.6},{:.6}\n",
                    report.id, pair.i, pair.j, p.latitude, p.longitude
                )),
                None => output.push_str(&format!("{},{},{},,\n", report.id, pair.i, pair.j)),
            }
        }
        output
    }
}
