//! Historical closing prices and their monthly resampling

use jiff::ToSpan;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A single closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: Date,
    pub close: f64,
}

/// Calendar month key used to align return series across tickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i16,
    pub month: i8,
}

impl YearMonth {
    #[must_use]
    pub const fn new(year: i16, month: i8) -> Self {
        Self { year, month }
    }

    #[must_use]
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

/// How much history to request from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Lookback {
    /// Everything the provider has
    #[default]
    Max,
    /// The trailing number of years, measured back from the latest observation
    Years(u16),
    /// Observations on or after a fixed date
    Since(Date),
}

/// Time-ordered closing prices for one ticker.
///
/// Points are sorted by date on construction; when a date appears twice the
/// later entry wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl From<Vec<PricePoint>> for PriceHistory {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

impl From<PriceHistory> for Vec<PricePoint> {
    fn from(history: PriceHistory) -> Self {
        history.points
    }
}

impl PriceHistory {
    #[must_use]
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        // Stable sort keeps input order for equal dates so the later entry is last
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    /// Build from `(date, close)` pairs
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Date, f64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, close)| PricePoint { date, close })
                .collect(),
        )
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.points.first().map(|p| p.date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.points.last().map(|p| p.date)
    }

    /// Restrict the history to a lookback window
    #[must_use]
    pub fn within(&self, lookback: Lookback) -> Self {
        let cutoff = match lookback {
            Lookback::Max => return self.clone(),
            Lookback::Since(date) => date,
            Lookback::Years(years) => match self.last_date() {
                Some(last) => last.saturating_sub(i64::from(years).years()),
                None => return self.clone(),
            },
        };
        Self {
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| p.date >= cutoff)
                .collect(),
        }
    }

    /// Month-end closes from the first to the last observed month.
    ///
    /// The last valid observation in each calendar month is used. Months with
    /// no observation inside the observed range carry the previous close
    /// forward. Non-finite and non-positive closes are skipped.
    #[must_use]
    pub fn month_end_closes(&self) -> Vec<(YearMonth, f64)> {
        let mut observed: Vec<(YearMonth, f64)> = Vec::new();
        for point in &self.points {
            if !point.close.is_finite() || point.close <= 0.0 {
                continue;
            }
            let key = YearMonth::of(point.date);
            match observed.last_mut() {
                Some((month, close)) if *month == key => *close = point.close,
                _ => observed.push((key, point.close)),
            }
        }

        let mut filled = Vec::with_capacity(observed.len());
        let mut iter = observed.into_iter();
        let Some(first) = iter.next() else {
            return filled;
        };
        filled.push(first);
        for (month, close) in iter {
            let (mut cursor, prev_close) = filled[filled.len() - 1];
            cursor = cursor.next();
            while cursor < month {
                filled.push((cursor, prev_close));
                cursor = cursor.next();
            }
            filled.push((month, close));
        }
        filled
    }

    /// Simple monthly returns keyed by the month in which each return ends
    #[must_use]
    pub fn monthly_returns(&self) -> Vec<(YearMonth, f64)> {
        self.month_end_closes()
            .windows(2)
            .map(|w| (w[1].0, w[1].1 / w[0].1 - 1.0))
            .collect()
    }
}
