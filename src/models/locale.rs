// src/models/locale.rs

//! Language settings for the text rendered on the dashboard.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Weekday and month names plus number formatting used by the page.
///
/// Passed explicitly to the date and count parsers, so two configs with
/// different languages never interfere with each other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLocale {
    /// Weekday names, Monday first
    #[serde(default = "defaults::weekdays")]
    pub weekdays: Vec<String>,

    /// Month names, January first
    #[serde(default = "defaults::months")]
    pub months: Vec<String>,

    /// Word joining day, month and year (`01 de abril de 2021`)
    #[serde(default = "defaults::date_connector")]
    pub date_connector: String,

    /// Thousands separator stripped from counts
    #[serde(default = "defaults::thousands_separator")]
    pub thousands_separator: char,
}

impl PageLocale {
    /// Spanish, as rendered by the Bolivian dashboard.
    pub fn spanish() -> Self {
        Self {
            weekdays: defaults::weekdays(),
            months: defaults::months(),
            date_connector: defaults::date_connector(),
            thousands_separator: defaults::thousands_separator(),
        }
    }

    /// 1-based month number for a month name, ignoring case.
    pub fn month_number(&self, name: &str) -> Option<u32> {
        let name = name.to_lowercase();
        self.months
            .iter()
            .position(|m| m.to_lowercase() == name)
            .map(|i| i as u32 + 1)
    }

    /// Whether `name` is one of the configured weekday names, ignoring case.
    pub fn is_weekday(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.weekdays.iter().any(|w| w.to_lowercase() == name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.weekdays.len() != 7 {
            return Err(AppError::validation(format!(
                "locale.weekdays needs 7 names, got {}",
                self.weekdays.len()
            )));
        }
        if self.months.len() != 12 {
            return Err(AppError::validation(format!(
                "locale.months needs 12 names, got {}",
                self.months.len()
            )));
        }
        if self.date_connector.trim().is_empty() {
            return Err(AppError::validation("locale.date_connector is empty"));
        }
        if self.thousands_separator.is_ascii_digit() {
            return Err(AppError::validation(
                "locale.thousands_separator cannot be a digit",
            ));
        }
        Ok(())
    }
}

impl Default for PageLocale {
    fn default() -> Self {
        Self::spanish()
    }
}

mod defaults {
    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    pub fn weekdays() -> Vec<String> {
        names(&[
            "lunes",
            "martes",
            "miércoles",
            "jueves",
            "viernes",
            "sábado",
            "domingo",
        ])
    }
    pub fn months() -> Vec<String> {
        names(&[
            "enero",
            "febrero",
            "marzo",
            "abril",
            "mayo",
            "junio",
            "julio",
            "agosto",
            "septiembre",
            "octubre",
            "noviembre",
            "diciembre",
        ])
    }
    pub fn date_connector() -> String {
        "de".into()
    }
    pub fn thousands_separator() -> char {
        ','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lookup_is_case_insensitive() {
        let locale = PageLocale::spanish();
        assert_eq!(locale.month_number("abril"), Some(4));
        assert_eq!(locale.month_number("Diciembre"), Some(12));
        assert_eq!(locale.month_number("april"), None);
    }

    #[test]
    fn weekday_lookup_handles_accents() {
        let locale = PageLocale::spanish();
        assert!(locale.is_weekday("Miércoles"));
        assert!(locale.is_weekday("SÁBADO"));
        assert!(!locale.is_weekday("thursday"));
    }

    #[test]
    fn validate_rejects_short_month_list() {
        let mut locale = PageLocale::spanish();
        locale.months.pop();
        assert!(locale.validate().is_err());
        assert!(PageLocale::spanish().validate().is_ok());
    }
}
