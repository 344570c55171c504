// src/models/stats.rs

//! Data extracted from one dashboard page.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::{AppError, Result};

/// Ordered label → raw text mapping, in the order the page renders it.
///
/// Values are kept as page text because counts may carry thousands
/// separators; see [`Count::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    entries: Vec<(String, String)>,
}

/// Overall table: status label → raw count.
pub type OverallStats = RawRecord;

/// One department row: column name → raw cell text.
pub type DepartmentRecord = RawRecord;

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. A repeated label keeps its position and takes the new
    /// value.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, v)) => *v = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (label, value) in iter {
            record.insert(label, value);
        }
        record
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Everything the pipeline needs from one fetch of the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub report_date: NaiveDate,
    pub overall: OverallStats,
    pub departments: Vec<DepartmentRecord>,
}

/// A non-negative case count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Count(i64);

impl Count {
    /// Build a count from a stored value.
    pub fn new(value: i64) -> Result<Self> {
        if value < 0 {
            return Err(AppError::parse("count", format!("{value} is negative")));
        }
        Ok(Self(value))
    }

    /// Normalize page text such as `"12,345"` into a count.
    ///
    /// The thousands separator and any whitespace are stripped first. Anything
    /// left that is not a plain non-negative integer is a parse error.
    pub fn parse(raw: &str, thousands_separator: char) -> Result<Self> {
        let digits: String = raw
            .chars()
            .filter(|c| *c != thousands_separator && !c.is_whitespace())
            .collect();

        if digits.is_empty() {
            return Err(AppError::parse("count", format!("'{raw}' has no digits")));
        }

        let value: u64 = digits
            .parse()
            .map_err(|e| AppError::parse("count", format!("'{raw}' is not a count: {e}")))?;
        let value = i64::try_from(value)
            .map_err(|_| AppError::parse("count", format!("'{raw}' is out of range")))?;
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Count {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_strips_thousands_separator() {
        assert_eq!(Count::parse("12,345", ',').unwrap().get(), 12345);
        assert_eq!(Count::parse(" 1,234,567 ", ',').unwrap().get(), 1_234_567);
        assert_eq!(Count::parse("0", ',').unwrap().get(), 0);
    }

    #[test]
    fn count_honours_locale_separator() {
        assert_eq!(Count::parse("12.345", '.').unwrap().get(), 12345);
        assert!(Count::parse("12.345", ',').is_err());
    }

    #[test]
    fn count_rejects_non_numeric_text() {
        for raw in ["", " , ", "n/a", "-5", "12a", "1.5"] {
            let err = Count::parse(raw, ',').unwrap_err();
            assert!(err.is_parse(), "{raw:?} should be a parse error");
        }
    }

    #[test]
    fn count_new_rejects_negative() {
        assert!(Count::new(-1).is_err());
        assert_eq!(Count::new(7).unwrap().get(), 7);
    }

    #[test]
    fn record_keeps_page_order_and_overwrites_duplicates() {
        let mut record = RawRecord::new();
        record.insert("Confirmados", "10");
        record.insert("Decesos", "2");
        record.insert("Confirmados", "11");

        assert_eq!(record.len(), 2);
        assert_eq!(record.labels().collect::<Vec<_>>(), ["Confirmados", "Decesos"]);
        assert_eq!(record.get("Confirmados"), Some("11"));
        assert_eq!(record.get("Recuperados"), None);
    }

    #[test]
    fn record_serializes_as_ordered_map() {
        let record: RawRecord = [("b", "1"), ("a", "2")].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"b":"1","a":"2"}"#);
    }
}
