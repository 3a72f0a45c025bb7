//! `Date:` header normalization.
//!
//! The archive spans decades of news software, each with its own idea of a
//! date. Values are matched against an ordered table of known layouts; the
//! first layout that parses wins and the result is converted to UTC.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::error::PostError;

/// Leading day-of-week expected by a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Weekday {
    None,
    /// `Tue, `
    Short,
    /// `Tuesday, `
    Long,
}

/// How a layout expresses the time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// No zone at all; the time is taken as UTC.
    None,
    /// Numeric offset (`-0700`) parsed by the format's `%z`.
    Numeric,
    /// Numeric offset followed by a parenthesized name: `-0700 (PDT)`.
    NumericNamed,
    /// Trailing zone abbreviation: `GMT`, `EST`, `MET`.
    Named,
    /// Trailing literal that carries no offset (`LOCAL`, `UNDEFINED`, `+`).
    Literal(&'static str),
    /// A bare calendar date at midnight UTC.
    DateOnly,
}

struct Layout {
    weekday: Weekday,
    /// chrono format for the value after the weekday and before any zone name.
    format: &'static str,
    zone: Zone,
}

/// Known layouts, in match order. chrono's `%d` takes one or two digits, so
/// each entry covers both the padded and unpadded day.
const LAYOUTS: &[Layout] = &[
    // Thu, 24 Mar 2011 20:09:09 -0700 (PDT)
    Layout { weekday: Weekday::Short, format: "%d %b %Y %H:%M:%S %z", zone: Zone::NumericNamed },
    // 09 Oct 2007 02:46:48 GMT
    Layout { weekday: Weekday::None, format: "%d %b %Y %H:%M:%S", zone: Zone::Named },
    // 02 Aug 2003 00:26:31 +0200
    Layout { weekday: Weekday::None, format: "%d %b %Y %H:%M:%S %z", zone: Zone::Numeric },
    // Tue, 4 Sep 2012 20:37:24 +0200
    Layout { weekday: Weekday::Short, format: "%d %b %Y %H:%M:%S %z", zone: Zone::Numeric },
    // Sun, 28 Dec 2008 22:43:09 GMT
    Layout { weekday: Weekday::Short, format: "%d %b %Y %H:%M:%S", zone: Zone::Named },
    // 15 Feb 01 17:44:09 GMT
    Layout { weekday: Weekday::None, format: "%d %b %y %H:%M:%S", zone: Zone::Named },
    // Sat, 17 Feb 01 23:14:55
    Layout { weekday: Weekday::Short, format: "%d %b %y %H:%M:%S", zone: Zone::None },
    // 15 Dec 00 15:28:22 +0100
    Layout { weekday: Weekday::None, format: "%d %b %y %H:%M:%S %z", zone: Zone::Numeric },
    // 2000/11/28
    Layout { weekday: Weekday::None, format: "%Y/%m/%d", zone: Zone::DateOnly },
    // 25 Mar 95 19:26:17
    Layout { weekday: Weekday::None, format: "%d %b %y %H:%M:%S", zone: Zone::None },
    // Sat, 25 Mar 95 22:34:21 -0500
    Layout { weekday: Weekday::Short, format: "%d %b %y %H:%M:%S %z", zone: Zone::Numeric },
    // Mon, 27 Mar 1995 14:54:12
    Layout { weekday: Weekday::Short, format: "%d %b %Y %H:%M:%S", zone: Zone::None },
    // Sat, 18 Mar 95 21:05:28 PDT
    Layout { weekday: Weekday::Short, format: "%d %b %y %H:%M:%S", zone: Zone::Named },
    // Sun, 19 Mar 1995 08:37:28 LOCAL
    Layout { weekday: Weekday::Short, format: "%d %b %Y %H:%M:%S", zone: Zone::Literal("LOCAL") },
    // Sat, 11 Mar 1995 12:17:31 UNDEFINED
    Layout { weekday: Weekday::Short, format: "%d %b %Y %H:%M:%S", zone: Zone::Literal("UNDEFINED") },
    // 5 Feb 1995 11:01 -0500
    Layout { weekday: Weekday::None, format: "%d %b %Y %H:%M %z", zone: Zone::Numeric },
    // Thu, 12 Jan 1995 23:01
    Layout { weekday: Weekday::Short, format: "%d %b %Y %H:%M", zone: Zone::None },
    // 17 Dec 1994 01:04 CST
    Layout { weekday: Weekday::None, format: "%d %b %Y %H:%M", zone: Zone::Named },
    // 12 Oct 94 16:11:03 +
    Layout { weekday: Weekday::None, format: "%d %b %y %H:%M:%S", zone: Zone::Literal("+") },
    // Tue, 31 May 1994  13:46 MET
    Layout { weekday: Weekday::Short, format: "%d %b %Y %H:%M", zone: Zone::Named },
    // Mon, 23 May 94 15:51:27 -0700 (PDT)
    Layout { weekday: Weekday::Short, format: "%d %b %y %H:%M:%S %z", zone: Zone::NumericNamed },
    // Thu, 02 Dec 93 19:50:54 EST
    Layout { weekday: Weekday::Short, format: "%d %b %y %H:%M:%S", zone: Zone::Named },
    // Monday, 12 Jul 1993 14:46:15 EDT
    Layout { weekday: Weekday::Long, format: "%d %b %Y %H:%M:%S", zone: Zone::Named },
    // Monday, 12 Jul 93 14:46:15 EDT
    Layout { weekday: Weekday::Long, format: "%d %b %y %H:%M:%S", zone: Zone::Named },
];

const SHORT_DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const LONG_DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Offsets for zone abbreviations seen in news headers, in seconds east of UTC.
/// Well-formed abbreviations missing from this table are taken as UTC.
const NAMED_ZONES: &[(&str, i32)] = &[
    ("UT", 0),
    ("UTC", 0),
    ("GMT", 0),
    ("WET", 0),
    ("BST", 3600),
    ("WEST", 3600),
    ("CET", 3600),
    ("MET", 3600),
    ("MEZ", 3600),
    ("CEST", 2 * 3600),
    ("MEST", 2 * 3600),
    ("EET", 2 * 3600),
    ("EEST", 3 * 3600),
    ("HKT", 8 * 3600),
    ("JST", 9 * 3600),
    ("KST", 9 * 3600),
    ("AEST", 10 * 3600),
    ("AEDT", 11 * 3600),
    ("NZST", 12 * 3600),
    ("NZDT", 13 * 3600),
    ("ADT", -3 * 3600),
    ("AST", -4 * 3600),
    ("EDT", -4 * 3600),
    ("EST", -5 * 3600),
    ("CDT", -5 * 3600),
    ("CST", -6 * 3600),
    ("MDT", -6 * 3600),
    ("MST", -7 * 3600),
    ("PDT", -7 * 3600),
    ("PST", -8 * 3600),
    ("AKDT", -8 * 3600),
    ("AKST", -9 * 3600),
    ("HST", -10 * 3600),
];

/// Parse a `Date:` header value and normalize it to UTC.
///
/// Exhausting the layout table is an error naming the raw value; there is no
/// fallback date.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, PostError> {
    let value = value.trim();
    // space-padded variants collapse onto the single-space layouts
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    match LAYOUTS.iter().find_map(|layout| layout.parse(&collapsed)) {
        Some(date) => Ok(date),
        None => {
            warn!(date = value, "Could not parse date");
            Err(PostError::UnknownDateLayout(value.to_string()))
        }
    }
}

impl Layout {
    fn parse(&self, value: &str) -> Option<DateTime<Utc>> {
        let rest = strip_weekday(value, self.weekday)?;

        let date = match self.zone {
            Zone::None => to_utc(naive(rest, self.format)?),
            Zone::Numeric => with_offset(rest, self.format)?,
            Zone::NumericNamed => {
                let (time, comment) = rest.rsplit_once(" (")?;
                let name = comment.strip_suffix(')')?;
                if !is_zone_name(name) {
                    return None;
                }
                with_offset(time, self.format)?
            }
            Zone::Named => {
                let (time, name) = rest.rsplit_once(' ')?;
                let offset = zone_offset(name)?;
                let local = naive(time, self.format)?;
                offset
                    .from_local_datetime(&local)
                    .single()?
                    .with_timezone(&Utc)
            }
            Zone::Literal(literal) => {
                let time = rest.strip_suffix(literal)?.strip_suffix(' ')?;
                to_utc(naive(time, self.format)?)
            }
            Zone::DateOnly => {
                let day = NaiveDate::parse_from_str(rest, self.format).ok()?;
                to_utc(day.and_hms_opt(0, 0, 0)?)
            }
        };

        // chrono's %Y accepts short years; a two-digit year belongs to a %y layout
        if self.format.contains("%Y") && date.year() < 1000 {
            return None;
        }
        Some(date)
    }
}

fn naive(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format).ok()
}

fn with_offset(value: &str, format: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, format)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

/// Remove the day-of-week prefix a layout expects.
///
/// The day name is only checked for shape, never against the date: plenty of
/// old posts carry the wrong weekday.
fn strip_weekday(value: &str, weekday: Weekday) -> Option<&str> {
    let names: &[&str] = match weekday {
        Weekday::None => return Some(value),
        Weekday::Short => &SHORT_DAYS,
        Weekday::Long => &LONG_DAYS,
    };
    names.iter().find_map(|name| {
        let head = value.get(..name.len())?;
        if !head.eq_ignore_ascii_case(name) {
            return None;
        }
        value[name.len()..].strip_prefix(", ")
    })
}

/// A zone abbreviation: three capitals, or four to five ending in `T`.
fn is_zone_name(name: &str) -> bool {
    let upper = name.bytes().all(|b| b.is_ascii_uppercase());
    match name.len() {
        2 => name == "UT",
        3 => upper,
        4 | 5 => upper && name.ends_with('T'),
        _ => false,
    }
}

fn zone_offset(name: &str) -> Option<FixedOffset> {
    if !is_zone_name(name) {
        return None;
    }
    let seconds = match NAMED_ZONES.iter().find(|(zone, _)| *zone == name) {
        Some((_, seconds)) => *seconds,
        None => {
            debug!(zone = name, "Unknown zone abbreviation, assuming UTC");
            0
        }
    };
    FixedOffset::east_opt(seconds)
}
