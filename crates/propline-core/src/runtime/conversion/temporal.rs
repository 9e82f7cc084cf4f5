// crates/propline-core/src/runtime/conversion/temporal.rs
// ============================================================================
// Module: Temporal Converters
// Description: Date, time, date-time, and duration conversion.
// Purpose: Parse temporal literals with default or per-method patterns.
// Dependencies: time
// ============================================================================

//! ## Overview
//! [`DateTimeConverter`] parses with a default pattern per target unless the
//! invoked method declares its own format in `time` format-description
//! syntax (e.g. `[day]/[month]/[year]`). Offset date-times default to
//! RFC 3339. Failures name the pattern that was attempted.
//! [`DurationConverter`] accepts ISO-8601 durations with days and smaller
//! units (`P1DT2H30M`, `PT0.5S`) or a plain integer number of milliseconds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::Time;
use time::format_description;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;

use crate::core::types::TypeDescriptor;
use crate::core::value::PropertyValue;
use crate::interfaces::ConversionError;
use crate::interfaces::ConversionResult;
use crate::interfaces::Converter;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default date pattern.
pub const DEFAULT_DATE_FORMAT: &str = "[year]-[month]-[day]";

/// Default time pattern.
pub const DEFAULT_TIME_FORMAT: &str = "[hour]:[minute]:[second]";

/// Default date-time pattern.
pub const DEFAULT_DATE_TIME_FORMAT: &str = "[year]-[month]-[day]T[hour]:[minute]:[second]";

/// Label used in diagnostics for the RFC 3339 default.
const RFC3339_LABEL: &str = "RFC 3339";

/// Seconds per day.
const SECONDS_PER_DAY: u64 = 86_400;

// ============================================================================
// SECTION: Date-Time Converter
// ============================================================================

/// Converter for `date`, `time`, `datetime`, and `offset_datetime` targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

/// Compiles a format description, reporting a conversion failure when invalid.
fn compile<'f>(
    pattern: &'f str,
    target: &TypeDescriptor,
    value: &str,
) -> Result<Vec<BorrowedFormatItem<'f>>, ConversionError> {
    format_description::parse_borrowed::<2>(pattern).map_err(|err| ConversionError::Malformed {
        target: target.to_string(),
        value: value.to_string(),
        reason: format!("invalid date-time format '{pattern}': {err}"),
        source: Some(Box::new(err)),
    })
}

/// Builds the failure for text that does not match `pattern`.
fn mismatch(
    target: &TypeDescriptor,
    value: &str,
    pattern: &str,
    err: time::error::Parse,
) -> ConversionError {
    ConversionError::Malformed {
        target: target.to_string(),
        value: value.to_string(),
        reason: format!("does not match pattern '{pattern}': {err}"),
        source: Some(Box::new(err)),
    }
}

impl Converter for DateTimeConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        matches!(
            target,
            TypeDescriptor::Date
                | TypeDescriptor::Time
                | TypeDescriptor::DateTime
                | TypeDescriptor::OffsetDateTime
        )
    }

    fn convert(
        &self,
        ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        let custom = ctx.method().date_time_format();
        let converted = match target {
            TypeDescriptor::Date => {
                let pattern = custom.unwrap_or(DEFAULT_DATE_FORMAT);
                let items = compile(pattern, target, value)?;
                Date::parse(value, items.as_slice())
                    .map(PropertyValue::Date)
                    .map_err(|err| mismatch(target, value, pattern, err))?
            }
            TypeDescriptor::Time => {
                let pattern = custom.unwrap_or(DEFAULT_TIME_FORMAT);
                let items = compile(pattern, target, value)?;
                Time::parse(value, items.as_slice())
                    .map(PropertyValue::Time)
                    .map_err(|err| mismatch(target, value, pattern, err))?
            }
            TypeDescriptor::DateTime => {
                let pattern = custom.unwrap_or(DEFAULT_DATE_TIME_FORMAT);
                let items = compile(pattern, target, value)?;
                PrimitiveDateTime::parse(value, items.as_slice())
                    .map(PropertyValue::DateTime)
                    .map_err(|err| mismatch(target, value, pattern, err))?
            }
            TypeDescriptor::OffsetDateTime => match custom {
                Some(pattern) => {
                    let items = compile(pattern, target, value)?;
                    OffsetDateTime::parse(value, items.as_slice())
                        .map(PropertyValue::OffsetDateTime)
                        .map_err(|err| mismatch(target, value, pattern, err))?
                }
                None => OffsetDateTime::parse(value, &Rfc3339)
                    .map(PropertyValue::OffsetDateTime)
                    .map_err(|err| mismatch(target, value, RFC3339_LABEL, err))?,
            },
            _ => return Ok(ConversionResult::Skip),
        };
        Ok(ConversionResult::Converted(converted))
    }
}

// ============================================================================
// SECTION: Duration Converter
// ============================================================================

/// Converter for `duration` targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationConverter;

impl Converter for DurationConverter {
    fn can_convert_to(&self, target: &TypeDescriptor) -> bool {
        matches!(target, TypeDescriptor::Duration)
    }

    fn convert(
        &self,
        _ctx: &InvocationContext<'_>,
        value: &str,
        target: &TypeDescriptor,
    ) -> Result<ConversionResult, ConversionError> {
        let parsed = if is_digits(value) {
            parse_whole(value).map(Duration::from_millis)
        } else {
            parse_iso_duration(value)
        };
        parsed
            .map(|duration| ConversionResult::Converted(PropertyValue::Duration(duration)))
            .map_err(|reason| ConversionError::malformed(target, value, reason))
    }
}

/// Returns true when `text` is a non-empty run of ASCII digits.
fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

/// Parses an unsigned whole number.
fn parse_whole(text: &str) -> Result<u64, String> {
    if !is_digits(text) {
        return Err(format!("'{text}' is not an unsigned integer"));
    }
    text.parse::<u64>().map_err(|err| err.to_string())
}

/// Parses seconds with an optional fraction of up to nine digits.
fn parse_seconds(text: &str) -> Result<(u64, u32), String> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let seconds = parse_whole(whole)?;
    if fraction.is_empty() {
        return Ok((seconds, 0));
    }
    if fraction.len() > 9 || !is_digits(fraction) {
        return Err(format!("invalid fractional seconds '{fraction}'"));
    }
    let padded = format!("{fraction:0<9}");
    let nanos = padded.parse::<u32>().map_err(|err| err.to_string())?;
    Ok((seconds, nanos))
}

/// Multiplies and accumulates seconds, rejecting overflow.
fn accumulate(total: u64, amount: u64, factor: u64) -> Result<u64, String> {
    amount
        .checked_mul(factor)
        .and_then(|scaled| total.checked_add(scaled))
        .ok_or_else(|| "duration overflows".to_string())
}

/// Parses an ISO-8601 duration restricted to days, hours, minutes, and seconds.
fn parse_iso_duration(text: &str) -> Result<Duration, String> {
    let body = text
        .strip_prefix(['P', 'p'])
        .ok_or_else(|| "expected an ISO-8601 duration or integer milliseconds".to_string())?;
    let (date_part, time_part) = match body.split_once(['T', 't']) {
        Some((date_part, time_part)) => (date_part, Some(time_part)),
        None => (body, None),
    };
    let mut seconds = 0_u64;
    let mut nanos = 0_u32;
    let mut components = 0_usize;
    if !date_part.is_empty() {
        let days = date_part
            .strip_suffix(['D', 'd'])
            .ok_or_else(|| format!("unsupported date component '{date_part}'"))?;
        seconds = accumulate(seconds, parse_whole(days)?, SECONDS_PER_DAY)?;
        components += 1;
    }
    if let Some(mut rest) = time_part {
        if rest.is_empty() {
            return Err("time designator 'T' must be followed by a component".to_string());
        }
        let mut last_rank = 0_u8;
        while !rest.is_empty() {
            let split = rest
                .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                .ok_or_else(|| format!("component '{rest}' is missing a unit"))?;
            let (number, tail) = rest.split_at(split);
            let mut chars = tail.chars();
            let Some(unit) = chars.next() else {
                return Err(format!("component '{rest}' is missing a unit"));
            };
            rest = chars.as_str();
            let rank = match unit.to_ascii_uppercase() {
                'H' => 1,
                'M' => 2,
                'S' => 3,
                other => return Err(format!("unsupported time unit '{other}'")),
            };
            if rank <= last_rank {
                return Err("time components must appear once, in H, M, S order".to_string());
            }
            last_rank = rank;
            match rank {
                1 => seconds = accumulate(seconds, parse_whole(number)?, 3_600)?,
                2 => seconds = accumulate(seconds, parse_whole(number)?, 60)?,
                _ => {
                    let (whole, fraction) = parse_seconds(number)?;
                    seconds = accumulate(seconds, whole, 1)?;
                    nanos = fraction;
                }
            }
            components += 1;
        }
    }
    if components == 0 {
        return Err("duration has no components".to_string());
    }
    Ok(Duration::new(seconds, nanos))
}
