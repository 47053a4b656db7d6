//! Month-end and tenor date arithmetic for the contract period
//!
//! Everything downstream (rate curve keys, scenario rows, chart ordering)
//! hangs off the settlement calendar built here, so ordering and
//! month-boundary behavior live in this one place.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::contract::Tenor;
use crate::error::ValidationError;

/// A calendar month identified by (year, month)
///
/// Orders chronologically via the derived `Ord` on (year, month), which is
/// what every consumer must use instead of sorting formatted labels:
/// "2025년 9월" sorts after "2025년 10월" lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Display label matching the reference deployment's chart axis,
    /// e.g. "2025년 3월" (no zero padding)
    pub fn label(&self) -> String {
        format!("{}년 {}월", self.year, self.month)
    }

    /// Zero-padded "YYYY-MM" key, safe for lexicographic sorting
    pub fn sort_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Last calendar day of this month (leap-year aware)
    pub fn end_of_month(&self) -> NaiveDate {
        end_of_month(self.year, self.month)
    }

    /// The following calendar month, rolling the year at December
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Serialized as the zero-padded "YYYY-MM" key so month keys stay usable as
// JSON map keys and sort correctly as strings.
impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.sort_key())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let parsed = text.split_once('-').and_then(|(year, month)| {
            let year: i32 = year.parse().ok()?;
            let month: u32 = month.parse().ok()?;
            (1..=12).contains(&month).then_some(MonthKey { year, month })
        });
        parsed.ok_or_else(|| de::Error::custom(format!("invalid month key {text:?}")))
    }
}

/// Last calendar day of the given month
pub fn end_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .expect("month is a valid calendar month")
}

/// Add a tenor to a start date, producing the contract end date
///
/// Month tenors use calendar-month addition with the day-of-month clamped to
/// the target month's last valid day (Jan 31 + 1 month = Feb 28/29). Day
/// tenors add calendar days directly. The two are not interchangeable for
/// month-length tenors.
pub fn add_tenor(start: NaiveDate, tenor: Tenor) -> Result<NaiveDate, ValidationError> {
    match tenor {
        Tenor::Days(0) | Tenor::Months(0) => Err(ValidationError::ZeroTenor),
        Tenor::Days(days) => start
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(ValidationError::DateOutOfRange),
        Tenor::Months(months) => start
            .checked_add_months(Months::new(months))
            .ok_or(ValidationError::DateOutOfRange),
    }
}

/// The ordered sequence of settlement months covering a contract
///
/// Runs from the month containing the start date through the month
/// containing the end date, one entry per month, no gaps. Built once per
/// recompute pass; every chart ordering and month selector is bounded by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementCalendar {
    months: Vec<MonthKey>,
    expiry: MonthKey,
}

impl SettlementCalendar {
    pub fn build(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let expiry = MonthKey::from_date(end_date);
        let mut months = Vec::new();
        let mut current = MonthKey::from_date(start_date);
        while current <= expiry {
            months.push(current);
            current = current.next();
        }
        Self { months, expiry }
    }

    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn first(&self) -> Option<MonthKey> {
        self.months.first().copied()
    }

    pub fn last(&self) -> Option<MonthKey> {
        self.months.last().copied()
    }

    pub fn contains(&self, key: MonthKey) -> bool {
        self.first().is_some_and(|f| f <= key) && self.last().is_some_and(|l| key <= l)
    }

    /// True iff `key` is the month containing the contract end date
    pub fn is_expiry_month(&self, key: MonthKey) -> bool {
        key == self.expiry
    }

    pub fn expiry_month(&self) -> MonthKey {
        self.expiry
    }

    /// Chart labels in chronological order
    ///
    /// This is the explicit category sort order handed to any consumer doing
    /// non-chronological (categorical) sorting.
    pub fn labels(&self) -> Vec<String> {
        self.months.iter().map(MonthKey::label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_of_month_leap_year() {
        assert_eq!(end_of_month(2024, 2), date(2024, 2, 29));
        assert_eq!(end_of_month(2025, 2), date(2025, 2, 28));
        assert_eq!(end_of_month(2025, 12), date(2025, 12, 31));
        assert_eq!(end_of_month(2025, 4), date(2025, 4, 30));
    }

    #[test]
    fn test_add_tenor_month_clamps_to_month_end() {
        assert_eq!(
            add_tenor(date(2025, 1, 31), Tenor::Months(1)).unwrap(),
            date(2025, 2, 28)
        );
        assert_eq!(
            add_tenor(date(2024, 1, 31), Tenor::Months(1)).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            add_tenor(date(2025, 3, 15), Tenor::Months(6)).unwrap(),
            date(2025, 9, 15)
        );
    }

    #[test]
    fn test_add_tenor_days_vs_months_differ() {
        // A "2-month" tenor must not drift the way 60 days does
        let start = date(2025, 1, 15);
        assert_eq!(add_tenor(start, Tenor::Months(2)).unwrap(), date(2025, 3, 15));
        assert_eq!(add_tenor(start, Tenor::Days(60)).unwrap(), date(2025, 3, 16));
    }

    #[test]
    fn test_add_tenor_rejects_zero() {
        assert_eq!(
            add_tenor(date(2025, 1, 1), Tenor::Days(0)),
            Err(ValidationError::ZeroTenor)
        );
        assert_eq!(
            add_tenor(date(2025, 1, 1), Tenor::Months(0)),
            Err(ValidationError::ZeroTenor)
        );
    }

    #[test]
    fn test_calendar_is_contiguous_and_increasing() {
        let cal = SettlementCalendar::build(date(2025, 1, 15), date(2025, 7, 15));
        assert_eq!(cal.len(), 7);
        assert_eq!(cal.first().unwrap(), MonthKey::new(2025, 1));
        assert_eq!(cal.last().unwrap(), MonthKey::new(2025, 7));
        for pair in cal.months().windows(2) {
            assert_eq!(pair[0].next(), pair[1]);
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_calendar_rolls_year_boundary() {
        let cal = SettlementCalendar::build(date(2025, 11, 10), date(2026, 2, 10));
        let months: Vec<MonthKey> = cal.months().to_vec();
        assert_eq!(
            months,
            vec![
                MonthKey::new(2025, 11),
                MonthKey::new(2025, 12),
                MonthKey::new(2026, 1),
                MonthKey::new(2026, 2),
            ]
        );
        assert!(cal.is_expiry_month(MonthKey::new(2026, 2)));
        assert!(!cal.is_expiry_month(MonthKey::new(2025, 12)));
    }

    #[test]
    fn test_calendar_contains_bounds() {
        let cal = SettlementCalendar::build(date(2025, 3, 1), date(2025, 6, 30));
        assert!(cal.contains(MonthKey::new(2025, 3)));
        assert!(cal.contains(MonthKey::new(2025, 6)));
        assert!(!cal.contains(MonthKey::new(2025, 2)));
        assert!(!cal.contains(MonthKey::new(2025, 7)));
    }

    #[test]
    fn test_month_key_labels() {
        let key = MonthKey::new(2025, 3);
        assert_eq!(key.label(), "2025년 3월");
        assert_eq!(key.sort_key(), "2025-03");
        assert_eq!(MonthKey::new(2025, 10).label(), "2025년 10월");
    }

    #[test]
    fn test_month_key_serde_round_trip() {
        let key = MonthKey::new(2025, 7);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2025-07\"");
        assert_eq!(serde_json::from_str::<MonthKey>(&json).unwrap(), key);
        assert!(serde_json::from_str::<MonthKey>("\"2025-13\"").is_err());
    }

    #[test]
    fn test_month_key_ordering_across_year() {
        // Lexicographic label ordering would get this wrong
        assert!(MonthKey::new(2025, 9) < MonthKey::new(2025, 10));
        assert!(MonthKey::new(2025, 12) < MonthKey::new(2026, 1));
        assert!(MonthKey::new(2025, 12).sort_key() < MonthKey::new(2026, 1).sort_key());
    }
}
