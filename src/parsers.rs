//! This module implements the canonical text form of a `Duration`.

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::Sign;

/// The number of fractional second digits to write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
    /// Write the fewest digits that represent the value exactly.
    #[default]
    Auto,
    /// Write exactly this many digits, truncating or padding as needed.
    Digit(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattableDateDuration {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattableTimeDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// The fraction of a second, in nanoseconds.
    pub subseconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattableDuration {
    pub precision: Precision,
    pub sign: Sign,
    pub date: Option<FormattableDateDuration>,
    pub time: FormattableTimeDuration,
}

impl FormattableDuration {
    fn writes_seconds(&self) -> bool {
        let time = &self.time;
        let unit_below_minute = self.date.is_none() && time.hours == 0 && time.minutes == 0;
        time.seconds != 0
            || time.subseconds != 0
            || unit_below_minute
            || matches!(self.precision, Precision::Digit(_))
    }

    fn fraction_digits(&self) -> usize {
        let (_, index) = u32_to_digits(self.time.subseconds);
        match self.precision {
            Precision::Digit(digit) => usize::from(digit.min(9)),
            Precision::Auto => index,
        }
    }
}

impl Writeable for FormattableDuration {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.sign == Sign::Negative {
            sink.write_char('-')?;
        }
        sink.write_char('P')?;
        if let Some(date) = self.date {
            checked_write_u64_with_suffix(date.years, 'Y', sink)?;
            checked_write_u64_with_suffix(date.months, 'M', sink)?;
            checked_write_u64_with_suffix(date.weeks, 'W', sink)?;
            checked_write_u64_with_suffix(date.days, 'D', sink)?;
        }

        let time = &self.time;
        let write_second = self.writes_seconds();
        if time.hours != 0 || time.minutes != 0 || write_second {
            sink.write_char('T')?;
        }
        checked_write_u64_with_suffix(time.hours, 'H', sink)?;
        checked_write_u64_with_suffix(time.minutes, 'M', sink)?;
        if write_second {
            time.seconds.write_to(sink)?;
            let precision = self.fraction_digits();
            if precision > 0 {
                sink.write_char('.')?;
                let (digits, _) = u32_to_digits(time.subseconds);
                write_digit_slice_to_precision(digits, 0, precision, sink)?;
            }
            sink.write_char('S')?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let mut hint = LengthHint::exact(1);
        if self.sign == Sign::Negative {
            hint += 1;
        }
        if let Some(date) = self.date {
            for value in [date.years, date.months, date.weeks, date.days] {
                if value != 0 {
                    hint += value.writeable_length_hint() + 1;
                }
            }
        }

        let time = &self.time;
        let write_second = self.writes_seconds();
        if time.hours != 0 || time.minutes != 0 || write_second {
            hint += 1;
        }
        for value in [time.hours, time.minutes] {
            if value != 0 {
                hint += value.writeable_length_hint() + 1;
            }
        }
        if write_second {
            hint += time.seconds.writeable_length_hint() + 1;
            let precision = self.fraction_digits();
            if precision > 0 {
                hint += precision + 1;
            }
        }
        hint
    }
}

impl_display_with_writeable!(FormattableDuration);

/// Splits a nanosecond value into its nine fractional second digits.
///
/// Returns the digits along with the count of digits up to the last non-zero digit.
pub fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut output = [0; 9];
    let mut precision = 0;
    let mut i = 9;
    while i != 0 {
        let v = (value % 10) as u8;
        value /= 10;
        if precision == 0 && v != 0 {
            precision = i;
        }
        output[i - 1] = v;
        i -= 1;
    }

    (output, precision)
}

pub fn write_digit_slice_to_precision<W: core::fmt::Write + ?Sized>(
    digits: [u8; 9],
    base: usize,
    precision: usize,
    sink: &mut W,
) -> core::fmt::Result {
    for digit in digits.iter().take(precision).skip(base) {
        digit.write_to(sink)?;
    }
    Ok(())
}

fn checked_write_u64_with_suffix<W: core::fmt::Write + ?Sized>(
    val: u64,
    suffix: char,
    sink: &mut W,
) -> core::fmt::Result {
    if val == 0 {
        return Ok(());
    }
    val.write_to(sink)?;
    sink.write_char(suffix)
}
