use core::{cell::RefCell, cmp::Ordering, str::FromStr};

use super::{
    add_duration, adjust_rounded_duration_days, calculate_offset_shift, duration_sign,
    is_valid_duration, round_duration, to_limited_temporal_duration, to_partial_duration,
    to_temporal_duration, DateDuration, Duration, DurationLike, DurationLikeObject,
    PartialDuration, TimeDuration,
};
use crate::{
    components::{calendar::IsoCalendar, tz::TzProtocol, tz::UtcOffset, PlainDate, ZonedDateTime},
    iso::{IsoDate, IsoDateTime, IsoTime},
    options::{
        RelativeTo, RoundingIncrement, RoundingMode, RoundingOptions, TemporalUnit,
        ToStringRoundingOptions,
    },
    parsers::Precision,
    primitive::FiniteF64,
    ErrorKind, Sign, TemporalResult, MAX_SAFE_INTEGER,
};

const HOUR: i128 = 3_600_000_000_000;

/// A zone at -05:00 that moves to -04:00 at 2020-03-08T02:00 local time.
#[derive(Debug, Clone)]
struct SpringForward;

impl SpringForward {
    fn transition() -> i128 {
        local_ns(2020, 3, 8, 2) + 5 * HOUR
    }
}

impl TzProtocol for SpringForward {
    fn get_offset_nanos_for(&self, epoch_ns: i128) -> TemporalResult<i128> {
        if epoch_ns < Self::transition() {
            Ok(-5 * HOUR)
        } else {
            Ok(-4 * HOUR)
        }
    }
}

fn local_ns(year: i32, month: u8, day: u8, hour: u8) -> i128 {
    IsoDateTime::new_unchecked(
        IsoDate::new(year, month, day).unwrap(),
        IsoTime::new(hour, 0, 0, 0, 0, 0).unwrap(),
    )
    .as_nanoseconds()
}

/// 2020-03-07T12:00-05:00, the day before the offset transition.
fn zoned_anchor() -> ZonedDateTime<IsoCalendar, SpringForward> {
    ZonedDateTime::try_new(local_ns(2020, 3, 7, 12) + 5 * HOUR, IsoCalendar, SpringForward)
        .unwrap()
}

fn plain(year: i32, month: u8, day: u8) -> PlainDate<IsoCalendar> {
    PlainDate::new(year, month, day, IsoCalendar).unwrap()
}

fn no_anchor() -> Option<RelativeTo<'static, IsoCalendar, UtcOffset>> {
    None
}

fn date(years: f64, months: f64, weeks: f64, days: f64) -> Duration {
    Duration::new(years, months, weeks, days, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap()
}

fn time(hours: f64, minutes: f64, seconds: f64, milliseconds: f64) -> Duration {
    Duration::new(0.0, 0.0, 0.0, 0.0, hours, minutes, seconds, milliseconds, 0.0, 0.0).unwrap()
}

fn round_options(
    largest_unit: Option<TemporalUnit>,
    smallest_unit: Option<TemporalUnit>,
    rounding_mode: Option<RoundingMode>,
) -> RoundingOptions {
    RoundingOptions {
        largest_unit,
        smallest_unit,
        rounding_mode,
        increment: None,
    }
}

// ==== Validation and construction ====

#[test]
fn non_finite_fields_are_invalid() {
    let mut fields = [0f64; 10];
    fields[4] = f64::NAN;
    assert!(!is_valid_duration(&fields));
    fields[4] = f64::INFINITY;
    assert!(!is_valid_duration(&fields));
    fields[4] = f64::NEG_INFINITY;
    assert!(!is_valid_duration(&fields));

    let err = Duration::new(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn mixed_signs_are_invalid() {
    let fields = [1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    assert!(!is_valid_duration(&fields));
    assert!(Duration::new(1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_err());
    assert!(Duration::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 1.0).is_err());
}

#[test]
fn magnitude_is_bounded_by_safe_integer() {
    let mut fields = [0f64; 10];
    fields[9] = MAX_SAFE_INTEGER;
    assert!(is_valid_duration(&fields));
    fields[9] = MAX_SAFE_INTEGER + 1.0;
    assert!(!is_valid_duration(&fields));
    fields[9] = -(MAX_SAFE_INTEGER + 1.0);
    assert!(!is_valid_duration(&fields));
}

#[test]
fn sign_of_fields() {
    assert_eq!(duration_sign(&[0f64; 10]), Sign::Zero);
    let mut fields = [0f64; 10];
    fields[0] = -1.0;
    assert_eq!(duration_sign(&fields), Sign::Negative);
    fields[0] = 0.0;
    fields[9] = 3.0;
    assert_eq!(duration_sign(&fields), Sign::Positive);

    assert!(Duration::default().is_zero());
    assert_eq!(date(0.0, 0.0, -2.0, 0.0).sign(), Sign::Negative);
}

#[test]
fn construction_preserves_fields() {
    let fields = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    let duration = Duration::new(
        fields[0], fields[1], fields[2], fields[3], fields[4], fields[5], fields[6], fields[7],
        fields[8], fields[9],
    )
    .unwrap();
    assert_eq!(duration.fields(), fields);
    assert_eq!(duration.years(), 1.0);
    assert_eq!(duration.weeks(), 3.0);
    assert_eq!(duration.minutes(), 6.0);
    assert_eq!(duration.nanoseconds(), 10.0);

    // Unbalanced values are kept as given.
    let unbalanced = time(0.0, 0.0, 0.0, 90_000.0);
    assert_eq!(unbalanced.milliseconds(), 90_000.0);
}

#[test]
fn construction_rejects_fractional_fields() {
    let err = Duration::new(0.0, 0.0, 0.0, 0.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let err = DateDuration::new(0.5, 0.0, 0.0, 0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let err = TimeDuration::new(0.0, 0.0, 1.5, 0.0, 0.0, 0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let partial = PartialDuration {
        hours: Some(FiniteF64::try_from(1.5).unwrap()),
        ..Default::default()
    };
    let err = Duration::from_partial_duration(partial).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    let err = Duration::default().with(&partial).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    // A fractional string component is carried into the smaller units instead.
    let parsed = Duration::from_str("PT1.5H").unwrap();
    assert_eq!(parsed, time(1.0, 30.0, 0.0, 0.0));
}

#[test]
fn default_largest_unit() {
    assert_eq!(
        Duration::default().default_largest_unit(),
        TemporalUnit::Nanosecond
    );
    assert_eq!(date(0.0, 1.0, 0.0, 5.0).default_largest_unit(), TemporalUnit::Month);
    assert_eq!(time(0.0, 0.0, 1.0, 1.0).default_largest_unit(), TemporalUnit::Second);
}

#[test]
fn negated_and_abs() {
    let duration = Duration::new(0.0, 1.0, 0.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 4.0).unwrap();
    let negated = duration.negated();
    assert_eq!(
        negated.fields(),
        [0.0, -1.0, 0.0, -2.0, -3.0, 0.0, 0.0, 0.0, 0.0, -4.0]
    );
    assert_eq!(negated.sign(), Sign::Negative);
    assert_eq!(negated.abs(), duration);
    // Zero fields do not become negative zero.
    assert!(negated.years().is_sign_positive());
}

// ==== Balancing ====

#[test]
fn balance_one_day_into_hours() {
    let (days, balanced) = TimeDuration::balance(1.0, &TimeDuration::default(), TemporalUnit::Hour)
        .unwrap();
    assert_eq!(days, 0.0);
    assert_eq!(balanced, TimeDuration::new(24.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap());
}

#[test]
fn balance_cascades_to_largest_unit() {
    let time = TimeDuration::new(0.0, 0.0, 0.0, 0.0, 0.0, 90_061_001_001_001.0).unwrap();
    let (days, balanced) = TimeDuration::balance(0.0, &time, TemporalUnit::Day).unwrap();
    assert_eq!(days, 1.0);
    assert_eq!(balanced, TimeDuration::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0).unwrap());

    let (days, balanced) = TimeDuration::balance(0.0, &time, TemporalUnit::Second).unwrap();
    assert_eq!(days, 0.0);
    assert_eq!(balanced, TimeDuration::new(0.0, 0.0, 90_061.0, 1.0, 1.0, 1.0).unwrap());

    let negative = time.negated();
    let (_, balanced) = TimeDuration::balance(0.0, &negative, TemporalUnit::Minute).unwrap();
    assert_eq!(
        balanced,
        TimeDuration::new(0.0, -1501.0, -1.0, -1.0, -1.0, -1.0).unwrap()
    );
}

#[test]
fn balance_rejects_overflowing_days() {
    let days = MAX_SAFE_INTEGER;
    let time = TimeDuration::new(48.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
    let err = TimeDuration::balance(days, &time, TemporalUnit::Day).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

// ==== Offset shift ====

#[test]
fn offset_shift_across_transition() {
    let zdt = zoned_anchor();
    let relative_to = Some(RelativeTo::ZonedDateTime(&zdt));

    let shift =
        calculate_offset_shift(relative_to, &DateDuration::new(0.0, 0.0, 0.0, 1.0).unwrap())
            .unwrap();
    assert_eq!(shift, -HOUR);

    // No date portion means no movement and no shift.
    let shift = calculate_offset_shift(relative_to, &DateDuration::default()).unwrap();
    assert_eq!(shift, 0);

    // Plain anchors never shift.
    let anchor = plain(2020, 3, 7);
    let shift = calculate_offset_shift::<IsoCalendar, SpringForward>(
        Some(RelativeTo::PlainDate(&anchor)),
        &DateDuration::new(0.0, 0.0, 0.0, 1.0).unwrap(),
    )
    .unwrap();
    assert_eq!(shift, 0);
}

// ==== Combiner ====

#[test]
fn add_exact_time_durations() {
    let one_hour = time(1.0, 0.0, 0.0, 0.0);
    let result = one_hour.add(&one_hour).unwrap();
    assert_eq!(result, time(2.0, 0.0, 0.0, 0.0));

    let result = time(20.0, 0.0, 0.0, 0.0)
        .add(&Duration::new(0.0, 0.0, 0.0, 1.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap())
        .unwrap();
    assert_eq!(
        result,
        Duration::new(0.0, 0.0, 0.0, 2.0, 6.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap()
    );

    let result = time(5.0, 0.0, 0.0, 0.0)
        .subtract(&time(2.0, 30.0, 0.0, 0.0))
        .unwrap();
    assert_eq!(result, time(2.0, 30.0, 0.0, 0.0));
}

#[test]
fn add_calendar_units_requires_anchor() {
    let one_month = date(0.0, 1.0, 0.0, 0.0);
    let one_hour = time(1.0, 0.0, 0.0, 0.0);

    let err = one_month.add(&one_hour).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    let err = one_hour.add(&one_month).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    let err = add_duration(&one_hour, &one_month, no_anchor()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn add_months_relative_to_plain_date() {
    let anchor = plain(2020, 1, 31);
    let one_month = date(0.0, 1.0, 0.0, 0.0);

    // January 31st + 1 month is constrained to February 29th, and March 29th is
    // one month and 29 days after January 31st.
    let result = one_month
        .add_relative(&one_month, RelativeTo::<_, UtcOffset>::PlainDate(&anchor))
        .unwrap();
    assert_eq!(result, date(0.0, 1.0, 0.0, 29.0));

    // March 31st - 1 month is February 29th, which is not a whole month after January 31st.
    let result = date(0.0, 2.0, 0.0, 0.0)
        .subtract_relative(&one_month, RelativeTo::<_, UtcOffset>::PlainDate(&anchor))
        .unwrap();
    assert_eq!(result, date(0.0, 0.0, 0.0, 29.0));

    let anchor = plain(2020, 1, 1);
    let result = date(0.0, 2.0, 0.0, 0.0)
        .subtract_relative(&one_month, RelativeTo::<_, UtcOffset>::PlainDate(&anchor))
        .unwrap();
    assert_eq!(result, date(0.0, 1.0, 0.0, 0.0));
}

#[test]
fn add_relative_to_zoned_date_time() {
    let zdt = zoned_anchor();
    let relative_to = RelativeTo::ZonedDateTime(&zdt);

    // The calendar day across the transition is 23 hours long.
    let result = date(0.0, 0.0, 0.0, 1.0)
        .add_relative(&time(1.0, 0.0, 0.0, 0.0), relative_to)
        .unwrap();
    assert_eq!(
        result,
        Duration::new(0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap()
    );

    let result = time(20.0, 0.0, 0.0, 0.0)
        .add_relative(&time(5.0, 0.0, 0.0, 0.0), relative_to)
        .unwrap();
    assert_eq!(result, time(25.0, 0.0, 0.0, 0.0));
}

// ==== Rounder ====

#[test]
fn half_even_rounds_to_even_seconds() {
    let increment = RoundingIncrement::ONE;
    let two_and_a_half = time(0.0, 0.0, 2.0, 500.0);
    let rounded = round_duration(
        &two_and_a_half,
        increment,
        TemporalUnit::Second,
        RoundingMode::HalfEven,
        no_anchor(),
    )
    .unwrap();
    assert_eq!(rounded.duration, time(0.0, 0.0, 2.0, 0.0));
    assert_eq!(rounded.remainder, 0.5);

    let one_and_a_half = time(0.0, 0.0, 1.0, 500.0);
    let rounded = round_duration(
        &one_and_a_half,
        increment,
        TemporalUnit::Second,
        RoundingMode::HalfEven,
        no_anchor(),
    )
    .unwrap();
    assert_eq!(rounded.duration, time(0.0, 0.0, 2.0, 0.0));
    assert_eq!(rounded.remainder, -0.5);

    let options = round_options(None, Some(TemporalUnit::Second), Some(RoundingMode::HalfEven));
    assert_eq!(
        two_and_a_half.round(options, no_anchor()).unwrap(),
        time(0.0, 0.0, 2.0, 0.0)
    );
    assert_eq!(
        one_and_a_half.round(options, no_anchor()).unwrap(),
        time(0.0, 0.0, 2.0, 0.0)
    );
}

#[test]
fn rounding_modes_by_direction() {
    let positive = time(0.0, 0.0, 1.0, 200.0);
    let negative = positive.negated();
    let round = |duration: &Duration, mode| {
        round_duration(
            duration,
            RoundingIncrement::ONE,
            TemporalUnit::Second,
            mode,
            no_anchor(),
        )
        .unwrap()
        .duration
        .seconds()
    };

    assert_eq!(round(&positive, RoundingMode::Ceil), 2.0);
    assert_eq!(round(&negative, RoundingMode::Ceil), -1.0);
    assert_eq!(round(&positive, RoundingMode::Floor), 1.0);
    assert_eq!(round(&negative, RoundingMode::Floor), -2.0);
    assert_eq!(round(&positive, RoundingMode::Expand), 2.0);
    assert_eq!(round(&negative, RoundingMode::Expand), -2.0);
    assert_eq!(round(&positive, RoundingMode::Trunc), 1.0);
    assert_eq!(round(&negative, RoundingMode::Trunc), -1.0);

    let half = time(0.0, 0.0, -1.0, -500.0);
    assert_eq!(round(&half, RoundingMode::HalfCeil), -1.0);
    assert_eq!(round(&half, RoundingMode::HalfFloor), -2.0);
    assert_eq!(round(&half, RoundingMode::HalfTrunc), -1.0);
    assert_eq!(round(&half, RoundingMode::HalfExpand), -2.0);
}

#[test]
fn time_rounding_keeps_coarser_fields() {
    let duration = Duration::new(0.0, 0.0, 0.0, 1.0, 2.0, 30.0, 45.0, 0.0, 0.0, 0.0).unwrap();
    let rounded = round_duration(
        &duration,
        RoundingIncrement::ONE,
        TemporalUnit::Minute,
        RoundingMode::HalfExpand,
        no_anchor(),
    )
    .unwrap();
    assert_eq!(
        rounded.duration,
        Duration::new(0.0, 0.0, 0.0, 1.0, 2.0, 31.0, 0.0, 0.0, 0.0, 0.0).unwrap()
    );
    assert_eq!(rounded.remainder, -0.25);

    let increment = RoundingIncrement::try_new(15).unwrap();
    let rounded = round_duration(
        &duration,
        increment,
        TemporalUnit::Minute,
        RoundingMode::Trunc,
        no_anchor(),
    )
    .unwrap();
    assert_eq!(rounded.duration.minutes(), 30.0);
    assert_eq!(rounded.duration.hours(), 2.0);
}

#[test]
fn invalid_increment_is_a_range_error() {
    let duration = time(5.0, 0.0, 0.0, 0.0);
    let err = round_duration(
        &duration,
        RoundingIncrement::try_new(24).unwrap(),
        TemporalUnit::Hour,
        RoundingMode::Trunc,
        no_anchor(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let err = round_duration(
        &duration,
        RoundingIncrement::ONE,
        TemporalUnit::Auto,
        RoundingMode::Trunc,
        no_anchor(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn calendar_rounding_requires_anchor() {
    let err = round_duration(
        &date(0.0, 1.0, 0.0, 15.0),
        RoundingIncrement::ONE,
        TemporalUnit::Month,
        RoundingMode::HalfExpand,
        no_anchor(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let options = round_options(None, Some(TemporalUnit::Year), None);
    let err = date(1.0, 6.0, 0.0, 0.0).round(options, no_anchor()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn round_months_relative_to_plain_date() {
    let anchor = plain(2020, 1, 1);
    let relative_to = Some(RelativeTo::<_, UtcOffset>::PlainDate(&anchor));
    let duration = date(0.0, 1.0, 0.0, 15.0);

    // February 2020 has 29 days, so 15 days is just over half a month.
    let options = round_options(None, Some(TemporalUnit::Month), None);
    assert_eq!(
        duration.round(options, relative_to).unwrap(),
        date(0.0, 2.0, 0.0, 0.0)
    );

    let options = round_options(None, Some(TemporalUnit::Month), Some(RoundingMode::Floor));
    assert_eq!(
        duration.round(options, relative_to).unwrap(),
        date(0.0, 1.0, 0.0, 0.0)
    );

    let rounded = round_duration(
        &duration,
        RoundingIncrement::ONE,
        TemporalUnit::Month,
        RoundingMode::Floor,
        relative_to,
    )
    .unwrap();
    assert!((rounded.remainder - 15.0 / 29.0).abs() < 1e-12);
}

#[test]
fn round_years_relative_to_plain_date() {
    let anchor = plain(2020, 1, 1);
    let relative_to = Some(RelativeTo::<_, UtcOffset>::PlainDate(&anchor));
    // Six months of 2021 is 181 of its 365 days.
    let duration = date(1.0, 6.0, 0.0, 0.0);

    let options = round_options(None, Some(TemporalUnit::Year), None);
    assert_eq!(
        duration.round(options, relative_to).unwrap(),
        date(1.0, 0.0, 0.0, 0.0)
    );

    let options = round_options(None, Some(TemporalUnit::Year), Some(RoundingMode::Ceil));
    assert_eq!(
        duration.round(options, relative_to).unwrap(),
        date(2.0, 0.0, 0.0, 0.0)
    );
}

#[test]
fn round_weeks_relative_to_plain_date() {
    let anchor = plain(2020, 1, 1);
    let rounded = round_duration(
        &date(0.0, 0.0, 0.0, 10.0),
        RoundingIncrement::ONE,
        TemporalUnit::Week,
        RoundingMode::Trunc,
        Some(RelativeTo::<_, UtcOffset>::PlainDate(&anchor)),
    )
    .unwrap();
    assert_eq!(rounded.duration, date(0.0, 0.0, 1.0, 0.0));
    assert!((rounded.remainder - 3.0 / 7.0).abs() < 1e-12);
}

#[test]
fn round_balances_up_to_largest_unit() {
    let anchor = plain(2020, 1, 1);
    let relative_to = Some(RelativeTo::<_, UtcOffset>::PlainDate(&anchor));

    let options = round_options(Some(TemporalUnit::Day), None, None);
    assert_eq!(
        date(0.0, 2.0, 0.0, 0.0).round(options, relative_to).unwrap(),
        date(0.0, 0.0, 0.0, 60.0)
    );

    let options = round_options(Some(TemporalUnit::Month), None, None);
    assert_eq!(
        date(0.0, 0.0, 0.0, 60.0).round(options, relative_to).unwrap(),
        date(0.0, 2.0, 0.0, 0.0)
    );

    let options = round_options(Some(TemporalUnit::Hour), None, None);
    assert_eq!(
        time(0.0, 90.0, 0.0, 0.0).round(options, no_anchor()).unwrap(),
        time(1.0, 30.0, 0.0, 0.0)
    );
}

#[test]
fn round_folds_years_into_month_and_week_largest_units() {
    let anchor = plain(2020, 1, 1);
    let relative_to = Some(RelativeTo::<_, UtcOffset>::PlainDate(&anchor));

    let options = round_options(Some(TemporalUnit::Month), None, None);
    assert_eq!(
        date(1.0, 2.0, 0.0, 0.0).round(options, relative_to).unwrap(),
        date(0.0, 14.0, 0.0, 0.0)
    );

    // One month from 2020-01-01 is 31 days; with the existing week that is 38 days.
    let options = round_options(Some(TemporalUnit::Week), None, None);
    assert_eq!(
        date(0.0, 1.0, 1.0, 0.0).round(options, relative_to).unwrap(),
        date(0.0, 0.0, 5.0, 3.0)
    );

    let options = round_options(Some(TemporalUnit::Month), None, None);
    let err = date(1.0, 2.0, 0.0, 0.0)
        .round(options, no_anchor())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn round_rejects_smaller_largest_unit() {
    let options = round_options(Some(TemporalUnit::Minute), Some(TemporalUnit::Hour), None);
    let err = time(1.0, 0.0, 0.0, 0.0).round(options, no_anchor()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let options = round_options(None, None, None);
    let err = time(1.0, 0.0, 0.0, 0.0).round(options, no_anchor()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn round_across_a_short_day() {
    let zdt = zoned_anchor();
    let duration = time(24.0, 0.0, 0.0, 0.0);
    let options = round_options(Some(TemporalUnit::Day), Some(TemporalUnit::Hour), None);

    // The following calendar day is only 23 hours long.
    let result = duration
        .round(options, Some(RelativeTo::ZonedDateTime(&zdt)))
        .unwrap();
    assert_eq!(
        result,
        Duration::new(0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap()
    );

    let result = duration.round(options, no_anchor()).unwrap();
    assert_eq!(result, date(0.0, 0.0, 0.0, 1.0));
}

#[test]
fn adjust_folds_a_full_day_into_days() {
    let zdt = zoned_anchor();
    let relative_to = Some(RelativeTo::ZonedDateTime(&zdt));
    let duration = time(24.0, 0.0, 0.0, 0.0);

    let adjusted = adjust_rounded_duration_days(
        &duration,
        RoundingIncrement::ONE,
        TemporalUnit::Hour,
        RoundingMode::HalfExpand,
        relative_to,
    )
    .unwrap();
    assert_eq!(
        adjusted,
        Duration::new(0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap()
    );

    // Less than the 23 hour day is left untouched.
    let short = time(22.0, 0.0, 0.0, 0.0);
    let adjusted = adjust_rounded_duration_days(
        &short,
        RoundingIncrement::ONE,
        TemporalUnit::Hour,
        RoundingMode::HalfExpand,
        relative_to,
    )
    .unwrap();
    assert_eq!(adjusted, short);
}

#[test]
fn adjust_only_applies_to_zoned_time_rounding() {
    let zdt = zoned_anchor();
    let duration = time(24.0, 0.0, 0.0, 0.0);

    let unchanged = adjust_rounded_duration_days(
        &duration,
        RoundingIncrement::ONE,
        TemporalUnit::Day,
        RoundingMode::HalfExpand,
        Some(RelativeTo::ZonedDateTime(&zdt)),
    )
    .unwrap();
    assert_eq!(unchanged, duration);

    let unchanged = adjust_rounded_duration_days(
        &duration,
        RoundingIncrement::ONE,
        TemporalUnit::Nanosecond,
        RoundingMode::HalfExpand,
        Some(RelativeTo::ZonedDateTime(&zdt)),
    )
    .unwrap();
    assert_eq!(unchanged, duration);

    let unchanged = adjust_rounded_duration_days(
        &duration,
        RoundingIncrement::ONE,
        TemporalUnit::Hour,
        RoundingMode::HalfExpand,
        no_anchor(),
    )
    .unwrap();
    assert_eq!(unchanged, duration);
}

// ==== Total and compare ====

#[test]
fn total_of_exact_time() {
    let duration = time(36.0, 0.0, 0.0, 0.0);
    assert_eq!(duration.total(TemporalUnit::Day, no_anchor()).unwrap(), 1.5);
    assert_eq!(duration.total(TemporalUnit::Hour, no_anchor()).unwrap(), 36.0);
    assert_eq!(
        duration.total(TemporalUnit::Minute, no_anchor()).unwrap(),
        2160.0
    );

    let err = duration.total(TemporalUnit::Auto, no_anchor()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn total_of_calendar_units() {
    let anchor = plain(2020, 1, 1);
    let relative_to = Some(RelativeTo::<_, UtcOffset>::PlainDate(&anchor));

    // January has 31 days, then 14 of February's 29.
    let total = date(0.0, 0.0, 0.0, 45.0)
        .total(TemporalUnit::Month, relative_to)
        .unwrap();
    assert!((total - (1.0 + 14.0 / 29.0)).abs() < 1e-12);

    let total = date(1.0, 0.0, 0.0, 0.0)
        .total(TemporalUnit::Day, relative_to)
        .unwrap();
    assert_eq!(total, 366.0);

    let err = date(0.0, 0.0, 0.0, 45.0)
        .total(TemporalUnit::Month, no_anchor())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn total_folds_coarser_units_into_months_and_weeks() {
    let anchor = plain(2020, 1, 1);
    let relative_to = Some(RelativeTo::<_, UtcOffset>::PlainDate(&anchor));

    let total = date(1.0, 0.0, 0.0, 0.0)
        .total(TemporalUnit::Month, relative_to)
        .unwrap();
    assert_eq!(total, 12.0);

    let total = date(-1.0, 0.0, 0.0, 0.0)
        .total(TemporalUnit::Month, relative_to)
        .unwrap();
    assert_eq!(total, -12.0);

    // January 2020 has 31 days.
    let total = date(0.0, 1.0, 0.0, 0.0)
        .total(TemporalUnit::Week, relative_to)
        .unwrap();
    assert!((total - 31.0 / 7.0).abs() < 1e-12);
}

#[test]
fn total_of_fractional_string_input_is_exact() {
    let duration = Duration::from_str("PT1.5H").unwrap();
    let total = duration.total(TemporalUnit::Minute, no_anchor()).unwrap();
    assert_eq!(total, 90.0);
    assert_eq!(
        duration.compare(&time(1.0, 0.0, 0.0, 0.0), no_anchor()).unwrap(),
        Ordering::Greater
    );

    let options = round_options(
        None,
        Some(TemporalUnit::Second),
        Some(RoundingMode::HalfEven),
    );
    assert_eq!(
        time(0.0, 0.0, 1.0, 500.0).round(options, no_anchor()).unwrap(),
        time(0.0, 0.0, 2.0, 0.0)
    );
}

#[test]
fn compare_exact_time() {
    let one_day = date(0.0, 0.0, 0.0, 1.0);
    let hours = time(24.0, 0.0, 0.0, 0.0);
    assert_eq!(one_day.compare(&hours, no_anchor()).unwrap(), Ordering::Equal);
    assert_eq!(
        time(1.0, 0.0, 0.0, 1.0)
            .compare(&time(1.0, 0.0, 0.0, 0.0), no_anchor())
            .unwrap(),
        Ordering::Greater
    );
    assert_eq!(
        hours.negated().compare(&hours, no_anchor()).unwrap(),
        Ordering::Less
    );
}

#[test]
fn compare_calendar_units() {
    let one_month = date(0.0, 1.0, 0.0, 0.0);
    let thirty_days = date(0.0, 0.0, 0.0, 30.0);

    let february = plain(2020, 2, 1);
    assert_eq!(
        one_month
            .compare(
                &thirty_days,
                Some(RelativeTo::<_, UtcOffset>::PlainDate(&february))
            )
            .unwrap(),
        Ordering::Less
    );

    let january = plain(2020, 1, 1);
    assert_eq!(
        one_month
            .compare(
                &thirty_days,
                Some(RelativeTo::<_, UtcOffset>::PlainDate(&january))
            )
            .unwrap(),
        Ordering::Greater
    );

    let err = one_month.compare(&thirty_days, no_anchor()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn compare_across_a_short_day() {
    let zdt = zoned_anchor();
    let relative_to = Some(RelativeTo::ZonedDateTime(&zdt));
    let one_day = date(0.0, 0.0, 0.0, 1.0);

    assert_eq!(
        one_day
            .compare(&time(24.0, 0.0, 0.0, 0.0), relative_to)
            .unwrap(),
        Ordering::Less
    );
    assert_eq!(
        one_day
            .compare(&time(23.0, 0.0, 0.0, 0.0), relative_to)
            .unwrap(),
        Ordering::Equal
    );
}

// ==== Formatter ====

#[test]
fn canonical_text_form() {
    assert_eq!(Duration::default().to_string(), "PT0S");
    assert_eq!(date(1.0, 2.0, 0.0, 0.0).to_string(), "P1Y2M");
    assert_eq!(
        Duration::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0)
            .unwrap()
            .to_string(),
        "P1Y2M3W4DT5H6M7.00800901S"
    );
    assert_eq!(time(0.0, 0.0, -1.0, -500.0).to_string(), "-PT1.5S");
    // Sub-second fields carry into the seconds.
    assert_eq!(time(0.0, 0.0, 0.0, 61_500.0).to_string(), "PT61.5S");
}

#[test]
fn text_form_of_large_seconds_is_exact() {
    let duration = Duration::new(
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        9_007_199_254_740_991.0,
        999.0,
        0.0,
        0.0,
    )
    .unwrap();
    assert_eq!(duration.to_string(), "PT9007199254740991.999S");

    let millis = time(0.0, 0.0, 0.0, 9_007_199_254_740_991.0);
    assert_eq!(millis.to_string(), "PT9007199254740.991S");

    // Fractional days are reported instead of being truncated.
    let fractional = Duration::from_day_and_time(1.5, &TimeDuration::default());
    let err = fractional
        .as_temporal_string(ToStringRoundingOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn text_form_with_precision() {
    let duration = Duration::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 234.0, 567.0, 0.0).unwrap();

    let mut options = ToStringRoundingOptions::default();
    assert_eq!(duration.as_temporal_string(options).unwrap(), "PT1.234567S");

    options.precision = Precision::Digit(2);
    assert_eq!(duration.as_temporal_string(options).unwrap(), "PT1.23S");

    options.precision = Precision::Digit(9);
    assert_eq!(
        duration.as_temporal_string(options).unwrap(),
        "PT1.234567000S"
    );

    options.precision = Precision::Digit(0);
    assert_eq!(duration.as_temporal_string(options).unwrap(), "PT1S");

    options.precision = Precision::Auto;
    options.smallest_unit = Some(TemporalUnit::Millisecond);
    options.rounding_mode = Some(RoundingMode::Ceil);
    assert_eq!(duration.as_temporal_string(options).unwrap(), "PT1.235S");

    options.smallest_unit = Some(TemporalUnit::Hour);
    let err = duration.as_temporal_string(options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    options.smallest_unit = None;
    options.precision = Precision::Digit(10);
    assert!(duration.as_temporal_string(options).is_err());
}

// ==== Parsing ====

#[test]
fn parse_duration_strings() {
    let duration = Duration::from_str("P1Y2M3W4DT5H6M7.123456789S").unwrap();
    assert_eq!(
        duration.fields(),
        [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 123.0, 456.0, 789.0]
    );

    let duration = Duration::from_str("-PT1.5H").unwrap();
    assert_eq!(duration, time(-1.0, -30.0, 0.0, 0.0));

    let duration = Duration::from_str("PT0.5M").unwrap();
    assert_eq!(duration, time(0.0, 0.0, 30.0, 0.0));

    let duration = Duration::from_str("-P1D").unwrap();
    assert_eq!(duration, date(0.0, 0.0, 0.0, -1.0));

    assert!(Duration::from_str("not a duration").is_err());
}

#[test]
fn parse_then_format() {
    for s in ["P1Y2M3DT4H", "-P2W", "PT1H30M", "PT0.000001S", "P1DT0.5S"] {
        assert_eq!(Duration::from_str(s).unwrap().to_string(), s);
    }
}

// ==== Coercers ====

#[derive(Default)]
struct DurationObject {
    properties: Vec<(&'static str, f64)>,
    reads: RefCell<Vec<String>>,
}

impl DurationObject {
    fn new(properties: &[(&'static str, f64)]) -> Self {
        Self {
            properties: properties.to_vec(),
            reads: RefCell::default(),
        }
    }
}

impl DurationLikeObject for DurationObject {
    fn get_property(&self, name: &str) -> TemporalResult<Option<f64>> {
        self.reads.borrow_mut().push(name.to_string());
        Ok(self
            .properties
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value))
    }
}

#[test]
fn partial_duration_reads_fields_alphabetically() {
    let object = DurationObject::new(&[("months", 2.0), ("days", 3.0)]);
    let partial = to_partial_duration(&object).unwrap();
    assert_eq!(
        partial,
        PartialDuration {
            months: Some(FiniteF64::from(2)),
            days: Some(FiniteF64::from(3)),
            ..Default::default()
        }
    );
    assert_eq!(
        *object.reads.borrow(),
        [
            "days",
            "hours",
            "microseconds",
            "milliseconds",
            "minutes",
            "months",
            "nanoseconds",
            "seconds",
            "weeks",
            "years"
        ]
    );
}

#[test]
fn partial_duration_errors() {
    let empty = DurationObject::new(&[("unrelated", 1.0)]);
    let err = to_partial_duration(&empty).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);

    let infinite = DurationObject::new(&[("hours", f64::INFINITY)]);
    let err = to_partial_duration(&infinite).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let fractional = DurationObject::new(&[("hours", 1.5)]);
    let err = to_partial_duration(&fractional).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn to_temporal_duration_from_each_source() {
    let object = DurationObject::new(&[("hours", 1.0), ("minutes", 30.0)]);
    let from_object = to_temporal_duration(DurationLike::Object(&object)).unwrap();
    assert_eq!(from_object, time(1.0, 30.0, 0.0, 0.0));

    let from_string = to_temporal_duration(DurationLike::from("PT1H30M")).unwrap();
    assert_eq!(from_string, from_object);

    let from_duration = to_temporal_duration(DurationLike::from(from_object)).unwrap();
    assert_eq!(from_duration, from_object);

    let mixed = DurationObject::new(&[("hours", 1.0), ("minutes", -30.0)]);
    let err = to_temporal_duration(DurationLike::Object(&mixed)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn limited_duration_rejects_disallowed_units() {
    let disallowed = [
        TemporalUnit::Year,
        TemporalUnit::Month,
        TemporalUnit::Week,
        TemporalUnit::Day,
    ];
    let err = to_limited_temporal_duration(DurationLike::from("P1D"), &disallowed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let allowed = to_limited_temporal_duration(DurationLike::from("PT25H"), &disallowed).unwrap();
    assert_eq!(allowed, time(25.0, 0.0, 0.0, 0.0));
}

#[test]
fn with_merges_over_existing_fields() {
    let duration = date(1.0, 0.0, 0.0, 5.0);
    let partial = PartialDuration {
        months: Some(FiniteF64::from(2)),
        days: Some(FiniteF64::from(0)),
        ..Default::default()
    };
    assert_eq!(duration.with(&partial).unwrap(), date(1.0, 2.0, 0.0, 0.0));

    let err = duration.with(&PartialDuration::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);

    let negative = PartialDuration {
        hours: Some(FiniteF64::from(-1)),
        ..Default::default()
    };
    let err = duration.with(&negative).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    // Absent fields default to zero.
    assert_eq!(
        Duration::from_partial_duration(partial).unwrap(),
        date(0.0, 2.0, 0.0, 0.0)
    );
}
