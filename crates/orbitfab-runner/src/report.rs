//! Human-readable formatting of tick lines and bottleneck tables.

use std::fmt::Write as _;

use orbitfab_core::bottleneck::BottleneckSummary;

use crate::run::TickRecord;

/// Largest number of significant figures [`format_sig_figs`] prints.
pub const MAX_SIG_FIGS: i32 = 4;

/// Format `value` with at most [`MAX_SIG_FIGS`] significant figures and no
/// trailing fractional zeros. `1200.0` prints as `1200`, `0.25` as `0.25`,
/// `12345.0` as `12350`.
pub fn format_sig_figs(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (MAX_SIG_FIGS - 1 - magnitude).max(0);
    let rounded = if decimals == 0 {
        let step = 10f64.powi(magnitude + 1 - MAX_SIG_FIGS);
        (value / step).round() * step
    } else {
        value
    };

    let formatted = format!("{:.*}", decimals as usize, rounded);
    if formatted.contains('.') {
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        formatted
    }
}

/// Format `value` with a fixed number of decimal places.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

// ---------------------------------------------------------------------------
// Health bands
// ---------------------------------------------------------------------------

/// How a stage's utilization reads at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Healthy,
    Constrained,
    Starved,
}

impl Band {
    pub const HEALTHY_AT: f64 = 1.0;
    pub const CONSTRAINED_AT: f64 = 0.5;

    pub fn classify(utilization: f64) -> Band {
        if utilization >= Self::HEALTHY_AT {
            Band::Healthy
        } else if utilization >= Self::CONSTRAINED_AT {
            Band::Constrained
        } else {
            Band::Starved
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Healthy => "healthy",
            Band::Constrained => "constrained",
            Band::Starved => "starved",
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One line summarizing a tick.
pub fn tick_line(record: &TickRecord) -> String {
    let mut line = format!(
        "tick {:>4}  day {:>7}  units +{} (total {})  launch +{}  cash {}",
        record.index,
        format_sig_figs(record.day),
        format_sig_figs(record.units_completed),
        format_sig_figs(record.units_built_total),
        format_sig_figs(record.launch_capacity_created),
        format_sig_figs(record.cash),
    );
    if let Some(stage) = record.tightest {
        let _ = write!(line, "  tightest {stage}");
    }
    line
}

/// The final per-stage table.
pub fn bottleneck_table(summaries: &[BottleneckSummary]) -> String {
    let mut out = format!(
        "{:<8} {:>10} {:>10} {:>6}  {:<12} {}\n",
        "stage", "actual/mo", "target/mo", "util", "band", "short on"
    );
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>10} {:>6}  {:<12} {}",
            s.stage.name(),
            format_sig_figs(s.actual_per_month),
            format_sig_figs(s.required_per_month),
            format_decimal(s.utilization, 2),
            Band::classify(s.utilization).label(),
            s.limiting_resource.map_or("-", |r| r.name()),
        );
    }
    out
}
