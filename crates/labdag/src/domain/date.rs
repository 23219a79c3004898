//! Target date parsing.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};

/// Human-readable list of accepted target date formats.
pub const TARGET_DATE_FORMATS: &str =
    "YYYY-MM-DD, M/D/YYYY, M-D-YYYY, M/D/YY, M-D-YY, M/D or M-D (current year)";

/// Smallest two-digit year read as 19YY.
const TWO_DIGIT_YEAR_PIVOT: u32 = 69;

/// Parse a target date as typed at the shell.
///
/// US month-first forms use `/` or `-` as separator. Two-digit years follow
/// the POSIX `%y` pivot: 69-99 are 1969-1999, 00-68 are 2000-2068. When the
/// year is omitted, the year of `today` is used.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the text matches no accepted form or
/// names a day that does not exist (e.g. `2/30/2024`).
pub fn parse_target_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let text = input.trim();
    let invalid = || Error::InvalidDate(input.to_string());

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if text.split('-').next().is_some_and(|year| year.len() == 4) {
            return Ok(date);
        }
    }

    let parts: Vec<&str> = text.split(['/', '-']).collect();
    let number = |part: &str| -> Result<u32> {
        if part.is_empty() || part.len() > 4 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse().map_err(|_| invalid())
    };

    let (month, day, year) = match parts.as_slice() {
        [month, day] => (number(month)?, number(day)?, today.year()),
        [month, day, year] => {
            let value = number(year)?;
            let year = match year.len() {
                2 if value >= TWO_DIGIT_YEAR_PIVOT => 1900 + value,
                2 => 2000 + value,
                4 => value,
                _ => return Err(invalid()),
            };
            let year = i32::try_from(year).map_err(|_| invalid())?;
            (number(month)?, number(day)?, year)
        }
        _ => return Err(invalid()),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2024-01-30", ymd(2024, 1, 30))]
    #[case("01/30/2024", ymd(2024, 1, 30))]
    #[case("1/30/2024", ymd(2024, 1, 30))]
    #[case("01-30-2024", ymd(2024, 1, 30))]
    #[case("2/1/24", ymd(2024, 2, 1))]
    #[case("02-15-25", ymd(2025, 2, 15))]
    #[case("3/20", ymd(2024, 3, 20))]
    #[case("12-31", ymd(2024, 12, 31))]
    #[case(" 2/29/2024 ", ymd(2024, 2, 29))]
    #[case("6/1/68", ymd(2068, 6, 1))]
    #[case("6/1/69", ymd(1969, 6, 1))]
    #[case("12-31-99", ymd(1999, 12, 31))]
    #[case("1/1/00", ymd(2000, 1, 1))]
    fn test_accepts(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_target_date(input, today()).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("tomorrow")]
    #[case("2/30/2024")]
    #[case("13/01/2024")]
    #[case("1/2/345")]
    #[case("1/2/3/4")]
    #[case("a/b")]
    #[case("2/29/2023")]
    fn test_rejects(#[case] input: &str) {
        let err = parse_target_date(input, today()).unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }
}
