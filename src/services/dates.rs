// src/services/dates.rs

//! Long-form localized date parsing (`jueves, 01 de abril de 2021`).

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::PageLocale;
use crate::utils::clean_text;

/// Parser for `<weekday>, <day> <connector> <month> <connector> <year>`
/// in a given locale.
#[derive(Debug, Clone)]
pub struct LongDateFormat {
    locale: PageLocale,
    pattern: Regex,
}

impl LongDateFormat {
    pub fn new(locale: PageLocale) -> Result<Self> {
        let connector = regex::escape(locale.date_connector.trim());
        let pattern = format!(
            r"(?i)^(?P<weekday>[^,\s]+),\s*(?P<day>\d{{1,2}})\s+{connector}\s+(?P<month>[^\s\d]+)\s+{connector}\s+(?P<year>\d{{4}})$"
        );
        let pattern = Regex::new(&pattern)
            .map_err(|e| AppError::config(format!("Invalid date pattern for locale: {e}")))?;
        Ok(Self { locale, pattern })
    }

    pub fn locale(&self) -> &PageLocale {
        &self.locale
    }

    /// Parse a date as rendered on the page.
    pub fn parse(&self, text: &str) -> Result<NaiveDate> {
        let text = clean_text(text);
        let caps = self.pattern.captures(&text).ok_or_else(|| {
            AppError::parse(
                "report_date",
                format!("'{text}' is not a long-form date"),
            )
        })?;

        let weekday = &caps["weekday"];
        if !self.locale.is_weekday(weekday) {
            return Err(AppError::parse(
                "report_date",
                format!("unknown weekday '{weekday}' in '{text}'"),
            ));
        }

        let month_name = &caps["month"];
        let month = self.locale.month_number(month_name).ok_or_else(|| {
            AppError::parse(
                "report_date",
                format!("unknown month '{month_name}' in '{text}'"),
            )
        })?;

        let day: u32 = caps["day"]
            .parse()
            .map_err(|e| AppError::parse("report_date", format!("bad day in '{text}': {e}")))?;
        let year: i32 = caps["year"]
            .parse()
            .map_err(|e| AppError::parse("report_date", format!("bad year in '{text}': {e}")))?;

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            AppError::parse("report_date", format!("'{text}' is not a calendar date"))
        })?;

        let index = date.weekday().num_days_from_monday() as usize;
        if let Some(expected) = self.locale.weekdays.get(index) {
            if expected.to_lowercase() != weekday.to_lowercase() {
                log::warn!("Page says '{weekday}' but {date} is a {expected}; keeping the date");
            }
        }

        Ok(date)
    }
}

/// Parse a long-form date in the given locale.
pub fn parse_long_date(text: &str, locale: &PageLocale) -> Result<NaiveDate> {
    LongDateFormat::new(locale.clone())?.parse(text)
}
