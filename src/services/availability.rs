use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::db::queries;

/// The daily booking template: every slot label a day offers,
/// independent of actual reservations. 12:00-14:00 is the lunch break.
pub const SLOT_TEMPLATE: [&str; 9] = [
    "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00", "17:00", "18:00",
];

#[derive(Debug, Clone, PartialEq)]
pub struct DayAvailability {
    pub available_times: Vec<String>,
    pub booked_times: Vec<String>,
}

/// Parse a client-supplied date down to day granularity.
///
/// Accepts a plain `YYYY-MM-DD` as well as RFC 3339 / ISO datetime
/// forms, whose time-of-day is discarded.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    None
}

/// Compute which template slots are still bookable on `date`.
///
/// Slots held by pending or confirmed bookings are taken; cancelled
/// bookings do not count. Template order is preserved in the output.
pub fn for_date(conn: &Connection, date: NaiveDate) -> anyhow::Result<DayAvailability> {
    let booked_times = queries::booked_times_for_date(conn, date)?;

    let available_times = SLOT_TEMPLATE
        .iter()
        .filter(|slot| !booked_times.iter().any(|t| t == *slot))
        .map(|slot| slot.to_string())
        .collect();

    Ok(DayAvailability {
        available_times,
        booked_times,
    })
}

pub fn is_template_slot(time: &str) -> bool {
    SLOT_TEMPLATE.contains(&time)
}
