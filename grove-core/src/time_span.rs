use crate::consume_while;
use std::fmt::Write;
use time::Duration;

const NANOS_PER_TICK: i32 = 100;

fn number(input: &mut &str, max_digits: usize) -> Option<i64> {
    let digits = consume_while(input, char::is_ascii_digit);
    if digits.is_empty() || digits.len() > max_digits {
        return None;
    }
    digits.parse().ok()
}

fn skip(input: &mut &str, separator: char) -> bool {
    if let Some(rest) = input.strip_prefix(separator) {
        *input = rest;
        true
    } else {
        false
    }
}

/// Parses the TimeSpan text form `[-][d.]hh:mm[:ss[.fffffff]]`, a bare number counts days.
///
/// Returns `None` when the text is not a well formed span.
pub fn parse_time_span(value: &str) -> Option<Duration> {
    let mut input = value.trim();
    let negative = skip(&mut input, '-');
    let first = number(&mut input, 8)?;
    let (days, hours) = if skip(&mut input, '.') {
        (first, number(&mut input, 2)?)
    } else if input.is_empty() {
        let days = Duration::days(first);
        return Some(if negative { -days } else { days });
    } else {
        (0, first)
    };
    if !skip(&mut input, ':') {
        return None;
    }
    let minutes = number(&mut input, 2)?;
    let seconds = if skip(&mut input, ':') {
        number(&mut input, 2)?
    } else {
        0
    };
    let nanoseconds = if skip(&mut input, '.') {
        let digits = consume_while(&mut input, char::is_ascii_digit);
        if digits.is_empty() || digits.len() > 7 {
            return None;
        }
        digits.parse::<i64>().ok()? * 10i64.pow(9 - digits.len() as u32)
    } else {
        0
    };
    if !input.is_empty() || hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }
    let total = Duration::days(days)
        + Duration::hours(hours)
        + Duration::minutes(minutes)
        + Duration::seconds(seconds)
        + Duration::nanoseconds(nanoseconds);
    Some(if negative { -total } else { total })
}

/// Writes the span as `[-][d.]hh:mm:ss[.fffffff]`.
pub fn format_time_span(value: &Duration) -> String {
    let mut out = String::with_capacity(20);
    if value.is_negative() {
        out.push('-');
    }
    let value = value.abs();
    let days = value.whole_days();
    if days > 0 {
        let _ = write!(out, "{}.", days);
    }
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        value.whole_hours() % 24,
        value.whole_minutes() % 60,
        value.whole_seconds() % 60
    );
    let ticks = value.subsec_nanoseconds() / NANOS_PER_TICK;
    if ticks > 0 {
        let _ = write!(out, ".{:07}", ticks);
    }
    out
}
