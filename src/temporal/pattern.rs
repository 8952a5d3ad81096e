//! Pattern engine for the date/time grammars accepted from senders
//!
//! Patterns use the familiar letter syntax (`yyyy`, `MM`, `dd`, `HH`, `mm`, `ss`,
//! `S`, `n`, `Z`, `xx`, `xxx`) with `'quoted'` literals and `[optional]` sections.
//! Matching is single pass: an optional section that fails consumes nothing and
//! restores the fields it had set, while a section that matched is never
//! revisited. A field read twice with different values fails the section, and a
//! pattern only matches when the whole input is consumed.
//!
//! Field widths:
//!
//! | Letters | Width |
//! |---|---|
//! | `yyyy`, `uuuu` | exactly four digits |
//! | `yy` | two digits, years 2000-2099 |
//! | `MM`, `dd`, `HH`, `mm`, `ss` | exactly two digits |
//! | `M`, `d`, `H` | one or two digits |
//! | `S` repeated n times | exactly n fraction digits |
//! | `n` repeated k times | exactly k digits, read as raw nanoseconds |
//! | `Z`, `ZZZ`, `xx` | offset `+HHMM` |
//! | `xxx` | offset `+HH:MM` |

use crate::core::TemporalValue;
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    Fixed(usize),
    Range(usize, usize),
}

impl Width {
    fn bounds(self) -> (usize, usize) {
        match self {
            Self::Fixed(n) => (n, n),
            Self::Range(min, max) => (min, max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    YearOfEra,
    ProlepticYear,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    Number(Field, Width),
    ReducedYear,
    Fraction(usize),
    Nanos(usize),
    Offset { colon: bool },
    Literal(String),
    Optional(Vec<Element>),
}

/// Field values collected while matching a pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ParsedFields {
    year_of_era: Option<i64>,
    proleptic_year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    hour: Option<i64>,
    minute: Option<i64>,
    second: Option<i64>,
    nano: Option<i64>,
    offset_seconds: Option<i64>,
}

impl ParsedFields {
    fn slot(&mut self, field: Field) -> &mut Option<i64> {
        match field {
            Field::YearOfEra => &mut self.year_of_era,
            Field::ProlepticYear => &mut self.proleptic_year,
            Field::Month => &mut self.month,
            Field::Day => &mut self.day,
            Field::Hour => &mut self.hour,
            Field::Minute => &mut self.minute,
            Field::Second => &mut self.second,
        }
    }

    /// Store a value, failing when the slot already holds a different one
    fn set(slot: &mut Option<i64>, value: i64) -> Option<()> {
        match slot {
            Some(existing) if *existing != value => None,
            _ => {
                *slot = Some(value);
                Some(())
            }
        }
    }

    /// Build the most precise value the fields support
    fn resolve(&self) -> Option<TemporalValue> {
        let year = match (self.year_of_era, self.proleptic_year) {
            (Some(a), Some(b)) if a != b => return None,
            (Some(y), _) | (None, Some(y)) => i32::try_from(y).ok()?,
            (None, None) => return None,
        };
        let month = u32::try_from(self.month?).ok().filter(|m| (1..=12).contains(m))?;
        let day = u32::try_from(self.day?).ok().filter(|d| (1..=31).contains(d))?;
        // day-of-month beyond the month's length is clamped to its last day
        let date = NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)?))?;

        let Some(hour) = self.hour else {
            return Some(TemporalValue::Date(date));
        };
        let time = NaiveTime::from_hms_nano_opt(
            u32::try_from(hour).ok()?,
            u32::try_from(self.minute.unwrap_or(0)).ok()?,
            u32::try_from(self.second.unwrap_or(0)).ok()?,
            u32::try_from(self.nano.unwrap_or(0)).ok().filter(|n| *n < 1_000_000_000)?,
        )?;
        let local = date.and_time(time);

        match self.offset_seconds {
            Some(seconds) => {
                let offset = FixedOffset::east_opt(i32::try_from(seconds).ok()?)?;
                local
                    .and_local_timezone(offset)
                    .single()
                    .map(TemporalValue::OffsetDateTime)
            }
            None => Some(TemporalValue::LocalDateTime(local)),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    next.pred_opt().map(|last| last.day())
}

/// A compiled date/time pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimePattern {
    source: String,
    elements: Vec<Element>,
}

impl DateTimePattern {
    /// Compile a pattern string.
    ///
    /// Letters without a date/time meaning are treated as literals, an unclosed
    /// `[` closes at the end of the pattern and a stray `]` is a literal.
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut pos = 0;
        let mut elements = Vec::new();
        while pos < chars.len() {
            elements.extend(compile_sequence(&chars, &mut pos, false));
        }
        Self {
            source: pattern.to_string(),
            elements,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Match the whole of `text`, returning the resolved value
    pub fn parse(&self, text: &str) -> Option<TemporalValue> {
        let input = text.as_bytes();
        let mut fields = ParsedFields::default();
        let end = parse_sequence(&self.elements, input, 0, &mut fields)?;
        if end != input.len() {
            return None;
        }
        fields.resolve()
    }
}

fn compile_sequence(chars: &[char], pos: &mut usize, nested: bool) -> Vec<Element> {
    let mut elements = Vec::new();
    while *pos < chars.len() {
        let c = chars[*pos];
        match c {
            '[' => {
                *pos += 1;
                elements.push(Element::Optional(compile_sequence(chars, pos, true)));
            }
            ']' if nested => {
                *pos += 1;
                return elements;
            }
            '\'' => {
                *pos += 1;
                let mut literal = String::new();
                while *pos < chars.len() {
                    if chars[*pos] == '\'' {
                        if chars.get(*pos + 1) == Some(&'\'') {
                            literal.push('\'');
                            *pos += 2;
                            continue;
                        }
                        *pos += 1;
                        break;
                    }
                    literal.push(chars[*pos]);
                    *pos += 1;
                }
                if literal.is_empty() {
                    literal.push('\'');
                }
                elements.push(Element::Literal(literal));
            }
            c if c.is_ascii_alphabetic() => {
                let start = *pos;
                while *pos < chars.len() && chars[*pos] == c {
                    *pos += 1;
                }
                elements.push(letter_element(c, *pos - start));
            }
            other => {
                *pos += 1;
                elements.push(Element::Literal(other.to_string()));
            }
        }
    }
    elements
}

fn letter_element(letter: char, count: usize) -> Element {
    let small = |count: usize| match count {
        1 => Width::Range(1, 2),
        n => Width::Fixed(n),
    };
    let year = |count: usize| match count {
        4 => Width::Fixed(4),
        n => Width::Range(n, 9),
    };
    match letter {
        'y' if count == 2 => Element::ReducedYear,
        'y' => Element::Number(Field::YearOfEra, year(count)),
        'u' => Element::Number(Field::ProlepticYear, year(count)),
        'M' => Element::Number(Field::Month, small(count)),
        'd' => Element::Number(Field::Day, small(count)),
        'H' => Element::Number(Field::Hour, small(count)),
        'm' => Element::Number(Field::Minute, small(count)),
        's' => Element::Number(Field::Second, small(count)),
        'S' => Element::Fraction(count),
        'n' => Element::Nanos(count),
        'Z' => Element::Offset { colon: false },
        'x' => Element::Offset { colon: count >= 3 },
        other => Element::Literal(std::iter::repeat_n(other, count).collect()),
    }
}

/// Read between `min` and `max` ASCII digits, greedily
fn read_digits(input: &[u8], pos: usize, min: usize, max: usize) -> Option<(i64, usize)> {
    let available = input[pos.min(input.len())..]
        .iter()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if available < min {
        return None;
    }
    let value = input[pos..pos + available]
        .iter()
        .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'));
    Some((value, pos + available))
}

fn parse_offset(input: &[u8], pos: usize, colon: bool) -> Option<(i64, usize)> {
    let sign = match input.get(pos)? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let (hours, mut next) = read_digits(input, pos + 1, 2, 2)?;
    if colon {
        if input.get(next) != Some(&b':') {
            return None;
        }
        next += 1;
    }
    let (minutes, next) = read_digits(input, next, 2, 2)?;
    if hours > 18 || minutes > 59 {
        return None;
    }
    Some((sign * (hours * 3600 + minutes * 60), next))
}

fn parse_sequence(
    elements: &[Element],
    input: &[u8],
    mut pos: usize,
    fields: &mut ParsedFields,
) -> Option<usize> {
    for element in elements {
        pos = match element {
            Element::Optional(inner) => {
                let snapshot = fields.clone();
                match parse_sequence(inner, input, pos, fields) {
                    Some(next) => next,
                    None => {
                        *fields = snapshot;
                        pos
                    }
                }
            }
            Element::Literal(text) => {
                if !input.get(pos..)?.starts_with(text.as_bytes()) {
                    return None;
                }
                pos + text.len()
            }
            Element::Number(field, width) => {
                let (min, max) = width.bounds();
                let (value, next) = read_digits(input, pos, min, max)?;
                ParsedFields::set(fields.slot(*field), value)?;
                next
            }
            Element::ReducedYear => {
                let (value, next) = read_digits(input, pos, 2, 2)?;
                ParsedFields::set(&mut fields.year_of_era, 2000 + value)?;
                next
            }
            Element::Fraction(digits) => {
                let (value, next) = read_digits(input, pos, *digits, *digits)?;
                let scale = 10i64.pow(9u32.saturating_sub(*digits as u32));
                ParsedFields::set(&mut fields.nano, value * scale)?;
                next
            }
            Element::Nanos(digits) => {
                let (value, next) = read_digits(input, pos, *digits, *digits)?;
                ParsedFields::set(&mut fields.nano, value)?;
                next
            }
            Element::Offset { colon } => {
                let (seconds, next) = parse_offset(input, pos, *colon)?;
                ParsedFields::set(&mut fields.offset_seconds, seconds)?;
                next
            }
        };
    }
    Some(pos)
}
