//! Named lookback windows and their backend encoding.
//!
//! A preset is resolved against the clock every time it is used, so two
//! searches with the same preset never share an end instant.

use chrono::{DateTime, TimeDelta, Utc};

/// Named, fixed-duration lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRangePreset {
    #[default]
    Last15Minutes,
    Last30Minutes,
    LastHour,
    Last3Hours,
    Last6Hours,
    Last12Hours,
    Last24Hours,
    Last7Days,
    Last30Days,
}

impl TimeRangePreset {
    /// All presets in display order.
    pub const ALL: [TimeRangePreset; 9] = [
        TimeRangePreset::Last15Minutes,
        TimeRangePreset::Last30Minutes,
        TimeRangePreset::LastHour,
        TimeRangePreset::Last3Hours,
        TimeRangePreset::Last6Hours,
        TimeRangePreset::Last12Hours,
        TimeRangePreset::Last24Hours,
        TimeRangePreset::Last7Days,
        TimeRangePreset::Last30Days,
    ];

    /// Display label, also accepted by [`TimeRangePreset::from_label`].
    pub fn label(self) -> &'static str {
        match self {
            TimeRangePreset::Last15Minutes => "Last 15 minutes",
            TimeRangePreset::Last30Minutes => "Last 30 minutes",
            TimeRangePreset::LastHour => "Last 1 hour",
            TimeRangePreset::Last3Hours => "Last 3 hours",
            TimeRangePreset::Last6Hours => "Last 6 hours",
            TimeRangePreset::Last12Hours => "Last 12 hours",
            TimeRangePreset::Last24Hours => "Last 24 hours",
            TimeRangePreset::Last7Days => "Last 7 days",
            TimeRangePreset::Last30Days => "Last 30 days",
        }
    }

    /// Short form used on the command line (`15m`, `1h`, `7d`, ...).
    pub fn short_code(self) -> &'static str {
        match self {
            TimeRangePreset::Last15Minutes => "15m",
            TimeRangePreset::Last30Minutes => "30m",
            TimeRangePreset::LastHour => "1h",
            TimeRangePreset::Last3Hours => "3h",
            TimeRangePreset::Last6Hours => "6h",
            TimeRangePreset::Last12Hours => "12h",
            TimeRangePreset::Last24Hours => "24h",
            TimeRangePreset::Last7Days => "7d",
            TimeRangePreset::Last30Days => "30d",
        }
    }

    pub fn duration(self) -> TimeDelta {
        match self {
            TimeRangePreset::Last15Minutes => TimeDelta::minutes(15),
            TimeRangePreset::Last30Minutes => TimeDelta::minutes(30),
            TimeRangePreset::LastHour => TimeDelta::hours(1),
            TimeRangePreset::Last3Hours => TimeDelta::hours(3),
            TimeRangePreset::Last6Hours => TimeDelta::hours(6),
            TimeRangePreset::Last12Hours => TimeDelta::hours(12),
            TimeRangePreset::Last24Hours => TimeDelta::hours(24),
            TimeRangePreset::Last7Days => TimeDelta::days(7),
            TimeRangePreset::Last30Days => TimeDelta::days(30),
        }
    }

    /// Look a preset up by label or short code, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL.into_iter().find(|preset| {
            preset.label().eq_ignore_ascii_case(wanted)
                || preset.short_code().eq_ignore_ascii_case(wanted)
        })
    }

    /// Like [`TimeRangePreset::from_label`], but unknown names fall back to the default.
    pub fn from_label_or_default(label: &str) -> Self {
        Self::from_label(label).unwrap_or_else(|| {
            log::warn!(
                "Unknown time range '{}', using '{}'",
                label,
                Self::default().label()
            );
            Self::default()
        })
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|preset| *preset == self)
            .unwrap_or_default()
    }

    /// Next preset (cycling).
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous preset (cycling).
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Resolve against the current clock.
    pub fn resolve(self) -> ResolvedTimeRange {
        ResolvedTimeRange::ending_at(Utc::now(), self)
    }
}

impl std::fmt::Display for TimeRangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TimeRangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| {
            let codes: Vec<&str> = Self::ALL.iter().map(|p| p.short_code()).collect();
            format!("unknown time range '{}' (expected one of {})", s, codes.join(", "))
        })
    }
}

/// Concrete `[start, end)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ResolvedTimeRange {
    /// Window of `preset`'s length ending at `end`.
    pub fn ending_at(end: DateTime<Utc>, preset: TimeRangePreset) -> Self {
        Self {
            start: end - preset.duration(),
            end,
        }
    }

    pub fn start_for_backend(&self) -> String {
        format_for_backend(self.start)
    }

    pub fn end_for_backend(&self) -> String {
        format_for_backend(self.end)
    }
}

/// Resolve a preset by name. Unknown names resolve the default preset.
pub fn resolve(preset_name: &str) -> ResolvedTimeRange {
    TimeRangePreset::from_label_or_default(preset_name).resolve()
}

/// Millisecond-precision UTC timestamp with a trailing `Z`.
///
/// Sub-millisecond digits are cut, never rounded: `.123999` becomes `.123`.
pub fn format_for_backend(instant: DateTime<Utc>) -> String {
    let micros = instant.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    format!("{}Z", &micros[..micros.len() - 3])
}
