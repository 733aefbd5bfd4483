//! Ephemeris time (TDB seconds past J2000) and calendar picture strings.
//!
//! Picture strings follow the SPICE `timout` vocabulary: `YYYY`, `MON`, `Mon`,
//! `MM`, `DD`, `DOY`, `HR`, `MN`, `SC`, a fraction `.###` (1 to 9 digits), and
//! trailing `::TDB`, `::UTC`, `::RND`, `::TRNC` markers. Everything else is
//! copied literally. Only the TDB calendar is evaluated here; UTC needs the
//! leap-second kernel and goes through the SPICE session instead.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use thiserror::Error;

use crate::constants::SECONDS_PER_DAY;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const MAX_FRACTION_DIGITS: usize = 9;

/// Errors raised while parsing or formatting calendar strings.
#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("malformed time string `{input}`: {reason}")]
    MalformedTime { input: String, reason: String },
    #[error("invalid calendar pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("time system {0} requires the SPICE leap-second kernel")]
    UnsupportedTimeSystem(TimeSystem),
    #[error("epoch {0} is outside the representable calendar range")]
    OutOfRange(f64),
}

/// Time scale named by a calendar string or picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSystem {
    Tdb,
    Utc,
}

impl fmt::Display for TimeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tdb => write!(f, "TDB"),
            Self::Utc => write!(f, "UTC"),
        }
    }
}

/// How fractional seconds beyond the pattern's precision are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Truncate,
    Round,
}

/// Converts an ephemeris time into display text.
pub trait EpochFormatter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn format_epoch(&self, et: f64) -> Result<String, Self::Error>;
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Year,
    MonthUpper,
    MonthTitle,
    MonthNumber,
    Day,
    DayOfYear,
    Hour,
    Minute,
    Second,
    Fraction(usize),
    Literal(String),
}

/// Parsed SPICE-style picture string.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarPattern {
    source: String,
    tokens: Vec<Token>,
    system: TimeSystem,
    rounding: Rounding,
}

impl CalendarPattern {
    pub fn parse(pattern: &str) -> Result<Self, TimeError> {
        let invalid = |reason: &str| TimeError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let (body, markers) = match pattern.find("::") {
            Some(idx) => (pattern[..idx].trim_end(), Some(&pattern[idx..])),
            None => (pattern, None),
        };

        let mut system = TimeSystem::Utc;
        let mut rounding = Rounding::Truncate;
        if let Some(markers) = markers {
            for marker in markers.split("::").map(str::trim).filter(|m| !m.is_empty()) {
                match marker.to_ascii_uppercase().as_str() {
                    "TDB" => system = TimeSystem::Tdb,
                    "UTC" => system = TimeSystem::Utc,
                    "RND" => rounding = Rounding::Round,
                    "TRNC" => rounding = Rounding::Truncate,
                    _ => return Err(invalid(&format!("unknown marker `::{marker}`"))),
                }
            }
        }

        let mut tokens: Vec<Token> = Vec::new();
        let mut rest = body;
        while !rest.is_empty() {
            let (token, len) = if rest.starts_with("YYYY") {
                (Token::Year, 4)
            } else if rest.starts_with("MON") {
                (Token::MonthUpper, 3)
            } else if rest.starts_with("Mon") {
                (Token::MonthTitle, 3)
            } else if rest.starts_with("MM") {
                (Token::MonthNumber, 2)
            } else if rest.starts_with("DOY") {
                (Token::DayOfYear, 3)
            } else if rest.starts_with("DD") {
                (Token::Day, 2)
            } else if rest.starts_with("HR") {
                (Token::Hour, 2)
            } else if rest.starts_with("MN") {
                (Token::Minute, 2)
            } else if rest.starts_with("SC") {
                (Token::Second, 2)
            } else if rest.starts_with(".#") {
                let digits = rest[1..].chars().take_while(|c| *c == '#').count();
                if digits > MAX_FRACTION_DIGITS {
                    return Err(invalid("at most 9 fractional digits are supported"));
                }
                (Token::Fraction(digits), digits + 1)
            } else {
                let ch = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                (Token::Literal(rest[..ch].to_string()), ch)
            };
            match (tokens.last_mut(), token) {
                (Some(Token::Literal(prev)), Token::Literal(next)) => prev.push_str(&next),
                (_, token) => tokens.push(token),
            }
            rest = &rest[len..];
        }

        if tokens.iter().filter(|t| matches!(t, Token::Fraction(_))).count() > 1 {
            return Err(invalid("more than one fractional-second field"));
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
            system,
            rounding,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn time_system(&self) -> TimeSystem {
        self.system
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Number of fractional-second digits emitted by the pattern.
    pub fn fraction_digits(&self) -> usize {
        self.tokens
            .iter()
            .find_map(|t| match t {
                Token::Fraction(d) => Some(*d),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Render `et` on the TDB calendar.
    pub fn format(&self, et: f64) -> Result<String, TimeError> {
        if self.system != TimeSystem::Tdb {
            return Err(TimeError::UnsupportedTimeSystem(self.system));
        }
        let digits = self.fraction_digits();
        let scale = 10_i64.pow(digits as u32);
        let scaled = et * scale as f64;
        if !scaled.is_finite() || scaled.abs() >= 9.0e18 {
            return Err(TimeError::OutOfRange(et));
        }
        let units = match self.rounding {
            Rounding::Round => scaled.round(),
            // Absorb representation error so that a parsed `.123` does not print as `.122`.
            Rounding::Truncate => (scaled + scaled.abs().max(1.0) * 4.0 * f64::EPSILON).floor(),
        } as i64;
        let whole = units.div_euclid(scale);
        let fraction = units.rem_euclid(scale);
        let datetime = j2000()
            .checked_add_signed(TimeDelta::try_seconds(whole).ok_or(TimeError::OutOfRange(et))?)
            .ok_or(TimeError::OutOfRange(et))?;

        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Year => out.push_str(&format!("{:04}", datetime.year())),
                Token::MonthUpper => out.push_str(MONTHS[datetime.month0() as usize]),
                Token::MonthTitle => {
                    let upper = MONTHS[datetime.month0() as usize];
                    out.push_str(&upper[..1]);
                    out.push_str(&upper[1..].to_ascii_lowercase());
                }
                Token::MonthNumber => out.push_str(&format!("{:02}", datetime.month())),
                Token::Day => out.push_str(&format!("{:02}", datetime.day())),
                Token::DayOfYear => out.push_str(&format!("{:03}", datetime.ordinal())),
                Token::Hour => out.push_str(&format!("{:02}", datetime.hour())),
                Token::Minute => out.push_str(&format!("{:02}", datetime.minute())),
                Token::Second => out.push_str(&format!("{:02}", datetime.second())),
                Token::Fraction(d) => out.push_str(&format!(".{:0width$}", fraction, width = *d)),
                Token::Literal(text) => out.push_str(text),
            }
        }
        Ok(out)
    }
}

impl std::str::FromStr for CalendarPattern {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl EpochFormatter for CalendarPattern {
    type Error = TimeError;

    fn format_epoch(&self, et: f64) -> Result<String, Self::Error> {
        self.format(et)
    }
}

/// J2000 reference epoch, 2000 JAN 01 12:00:00 TDB.
pub fn j2000() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

/// Ephemeris time of a TDB calendar date.
pub fn datetime_to_et(datetime: NaiveDateTime) -> f64 {
    let delta = datetime - j2000();
    let whole = delta.num_seconds();
    let nanos = (delta - TimeDelta::seconds(whole)).num_nanoseconds().unwrap_or(0);
    whole as f64 + nanos as f64 * 1e-9
}

/// TDB calendar date of an ephemeris time, to the nearest nanosecond.
pub fn et_to_datetime(et: f64) -> Result<NaiveDateTime, TimeError> {
    let nanos = (et * 1e9).round();
    if !nanos.is_finite() || nanos.abs() >= 9.0e18 {
        return Err(TimeError::OutOfRange(et));
    }
    j2000()
        .checked_add_signed(TimeDelta::nanoseconds(nanos as i64))
        .ok_or(TimeError::OutOfRange(et))
}

/// Whole days between two ephemeris times.
pub fn days_between(from_et: f64, to_et: f64) -> f64 {
    (to_et - from_et) / SECONDS_PER_DAY
}

/// Report the time system named by a calendar string, if any.
///
/// Strings without an explicit marker are read as TDB.
pub fn time_system_of(input: &str) -> Option<TimeSystem> {
    let last = input.split_whitespace().last()?;
    match last
        .trim_matches(|c| c == '(' || c == ')')
        .to_ascii_uppercase()
        .as_str()
    {
        "TDB" => Some(TimeSystem::Tdb),
        "UTC" | "Z" => Some(TimeSystem::Utc),
        _ => None,
    }
}

/// Parse a TDB calendar string into ephemeris seconds past J2000.
///
/// Accepted shapes: `2004 MAY 2`, `2004 MAY 06 20:15:00.000`, `2004-05-02T12:00:00`,
/// `2004-05-02 12:00`, and day-of-year `2004-123T00:00:00`, each optionally
/// followed by `TDB` or `(TDB)`.
pub fn parse_tdb(input: &str) -> Result<f64, TimeError> {
    let malformed = |reason: &str| TimeError::MalformedTime {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let mut fields: Vec<&str> = input.split_whitespace().collect();
    match time_system_of(input) {
        Some(TimeSystem::Tdb) => {
            fields.pop();
        }
        Some(other) => return Err(TimeError::UnsupportedTimeSystem(other)),
        None => {}
    }
    if fields.is_empty() {
        return Err(malformed("empty time string"));
    }

    let (date, clock) = if fields[0].contains('-') {
        let (date, clock) = match fields[0].split_once('T') {
            Some((date, clock)) => (date, Some(clock)),
            None => (fields[0], fields.get(1).copied()),
        };
        let expected = if fields[0].contains('T') { 1 } else { clock.map_or(1, |_| 2) };
        if fields.len() != expected {
            return Err(malformed("unexpected trailing fields"));
        }
        (parse_iso_date(date).ok_or_else(|| malformed("invalid ISO date"))?, clock)
    } else {
        if fields.len() < 3 || fields.len() > 4 {
            return Err(malformed("expected `YYYY MON DD [HR:MN:SC]`"));
        }
        let year: i32 = fields[0].parse().map_err(|_| malformed("invalid year"))?;
        let month = parse_month(fields[1]).ok_or_else(|| malformed("invalid month"))?;
        let day: u32 = fields[2]
            .trim_end_matches(',')
            .parse()
            .map_err(|_| malformed("invalid day"))?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| malformed("day out of range for month"))?;
        (date, fields.get(3).copied())
    };

    let (time, nanos) = match clock {
        Some(clock) => parse_clock(clock).ok_or_else(|| malformed("invalid time of day"))?,
        None => (NaiveTime::MIN, 0),
    };

    let whole = (date.and_time(time) - j2000()).num_seconds();
    Ok(whole as f64 + nanos as f64 * 1e-9)
}

fn parse_month(text: &str) -> Option<u32> {
    let upper = text.to_ascii_uppercase();
    if upper.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| upper.starts_with(m))
        .map(|idx| idx as u32 + 1)
}

fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
        }
        [year, doy] if doy.len() == 3 => NaiveDate::from_yo_opt(year.parse().ok()?, doy.parse().ok()?),
        _ => None,
    }
}

fn parse_clock(text: &str) -> Option<(NaiveTime, u32)> {
    let mut parts = text.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
    let (second, nanos) = match parts.next() {
        Some(sec) => {
            let (whole, frac) = sec.split_once('.').unwrap_or((sec, ""));
            if !frac.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let digits: String = frac.chars().take(MAX_FRACTION_DIGITS).collect();
            let nanos = if digits.is_empty() {
                0
            } else {
                digits.parse::<u32>().ok()? * 10_u32.pow((MAX_FRACTION_DIGITS - digits.len()) as u32)
            };
            (whole.parse::<u32>().ok()?, nanos)
        }
        None => (0, 0),
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second).map(|t| (t, nanos))
}
