//! Milestone and holiday cell text

use chrono::NaiveDate;
use wallplan_core::{Holiday, Milestone};

use crate::styles::CellStyleKind;

/// Name of the first holiday on `date` for the given country, if any.
pub fn holiday_name<'a>(
    date: NaiveDate,
    country_code: &str,
    holidays: &'a [Holiday],
) -> Option<&'a str> {
    holidays
        .iter()
        .find(|h| h.date == date && h.country_code == country_code)
        .map(|h| h.name.as_str())
}

/// Milestone cell text for `date`: all descriptions joined with ", " and
/// prefixed with "MS: ", or `None` when the day has no milestones.
pub fn milestone_text(date: NaiveDate, milestones: &[Milestone]) -> Option<String> {
    let descriptions: Vec<&str> = milestones
        .iter()
        .filter(|m| m.date == date)
        .map(|m| m.description.as_str())
        .collect();

    if descriptions.is_empty() {
        None
    } else {
        Some(format!("MS: {}", descriptions.join(", ")))
    }
}

/// Holiday cell text and its style group for `date`.
///
/// When both countries have a holiday the label reads
/// `"{code1}&{code2}: {name1}"` - the first country's name wins the
/// display.
pub fn holiday_text(
    date: NaiveDate,
    first_country: Option<&str>,
    second_country: Option<&str>,
    holidays: &[Holiday],
) -> Option<(String, CellStyleKind)> {
    let first = first_country.and_then(|code| {
        holiday_name(date, code, holidays).map(|name| (code, name))
    });
    let second = second_country.and_then(|code| {
        holiday_name(date, code, holidays).map(|name| (code, name))
    });

    match (first, second) {
        (Some((code1, name1)), Some((code2, _))) => Some((
            format!("{}&{}: {}", code1, code2, name1),
            CellStyleKind::Holiday12,
        )),
        (Some((code, name)), None) => {
            Some((format!("{}: {}", code, name), CellStyleKind::Holiday1))
        }
        (None, Some((code, name))) => {
            Some((format!("{}: {}", code, name), CellStyleKind::Holiday2))
        }
        (None, None) => None,
    }
}
