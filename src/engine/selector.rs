use {
    crate::domain::Candle,
    chrono::{DateTime, Utc},
    strum_macros::Display,
};

/// Which bar of a lookup window stands for "the price at this instant".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, clap::ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum SelectionPolicy {
    /// First bar the service returned, whatever its time.
    #[default]
    First,
    /// First bar starting at or after the target, else the first bar.
    AtOrAfter,
}

impl SelectionPolicy {
    /// `None` only for an empty series.
    pub fn select<'a>(&self, series: &'a [Candle], target: DateTime<Utc>) -> Option<&'a Candle> {
        let first = series.first()?;
        match self {
            SelectionPolicy::First => Some(first),
            SelectionPolicy::AtOrAfter => series
                .iter()
                .find(|c| c.start_time().is_some_and(|start| start >= target))
                .or(Some(first)),
        }
    }
}
