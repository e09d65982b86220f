//! Signed Duration Parser
//!
//! Parses relative offsets such as `-1h`, `-1h30m`, `1.5h` or `300ms`.
//!
//! # Grammar
//!
//! ```text
//! duration  := sign? ( "0" | component+ )
//! sign      := "+" | "-"
//! component := digits? ( "." digits? )? unit
//! unit      := "ns" | "us" | "µs" | "μs" | "ms" | "s" | "m" | "h"
//! ```
//!
//! A component needs at least one digit on either side of the decimal point.

use chrono::Duration;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, one_of},
    combinator::{all_consuming, opt, value},
    error::{Error, ErrorKind},
    multi::many1,
    sequence::preceded,
    IResult,
};

const NANOS_PER_MICRO: i128 = 1_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;

/// Fraction digits beyond this are ignored; they are below nanosecond precision.
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse a signed duration, returning `None` when the input is not one.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let unsigned = input.strip_prefix(['-', '+']).unwrap_or(input);
    if unsigned == "0" {
        return Some(Duration::zero());
    }

    let (_, (sign, components)) = all_consuming(signed_components)(input).ok()?;

    let mut total: i128 = 0;
    for nanos in components {
        total = total.checked_add(nanos)?;
    }
    if sign == Some('-') {
        total = -total;
    }
    let nanos = i64::try_from(total).ok()?;

    Some(Duration::nanoseconds(nanos))
}

fn signed_components(input: &str) -> IResult<&str, (Option<char>, Vec<i128>)> {
    let (input, sign) = opt(one_of("+-"))(input)?;
    let (input, components) = many1(component)(input)?;
    Ok((input, (sign, components)))
}

/// One `<number><unit>` pair, as nanoseconds.
fn component(input: &str) -> IResult<&str, i128> {
    let start = input;
    let (input, whole) = digit0(input)?;
    let (input, fraction) = opt(preceded(char('.'), digit0))(input)?;
    let fraction = fraction.unwrap_or("");

    if whole.is_empty() && fraction.is_empty() {
        return Err(nom::Err::Error(Error::new(start, ErrorKind::Digit)));
    }

    let (input, unit) = unit(input)?;
    let nanos = scale(whole, fraction, unit)
        .ok_or_else(|| nom::Err::Failure(Error::new(start, ErrorKind::TooLarge)))?;

    Ok((input, nanos))
}

fn unit(input: &str) -> IResult<&str, i128> {
    alt((
        value(1, tag("ns")),
        value(NANOS_PER_MICRO, alt((tag("us"), tag("µs"), tag("μs")))),
        value(NANOS_PER_MILLI, tag("ms")),
        value(NANOS_PER_SECOND, tag("s")),
        value(NANOS_PER_MINUTE, tag("m")),
        value(NANOS_PER_HOUR, tag("h")),
    ))(input)
}

fn scale(whole: &str, fraction: &str, unit: i128) -> Option<i128> {
    let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit)?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let numerator: i128 = fraction.parse().ok()?;
        let denominator = 10i128.checked_pow(fraction.len() as u32)?;
        nanos = nanos.checked_add(numerator.checked_mul(unit)? / denominator)?;
    }

    Some(nanos)
}
