use std::fmt::{Display, Formatter};

use super::constant::Constant;
use super::expression::{Expression, IntoExpression};

/// Units accepted by `timestamp_add` and `timestamp_subtract`.
///
/// A unit may also be given as a string or expression; unknown names are
/// rejected by the backend when the pipeline runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Microsecond => "microsecond",
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IntoExpression for TimeUnit {
    fn into_expression(self) -> Expression {
        Expression::Constant(Constant::new(self.as_str()))
    }
}

/// Granularities accepted by `timestamp_truncate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeGranularity {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Weeks starting on Sunday.
    Week,
    WeekMonday,
    WeekTuesday,
    WeekWednesday,
    WeekThursday,
    WeekFriday,
    WeekSaturday,
    WeekSunday,
    IsoWeek,
    Month,
    Quarter,
    Year,
    IsoYear,
}

impl TimeGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeGranularity::Microsecond => "microsecond",
            TimeGranularity::Millisecond => "millisecond",
            TimeGranularity::Second => "second",
            TimeGranularity::Minute => "minute",
            TimeGranularity::Hour => "hour",
            TimeGranularity::Day => "day",
            TimeGranularity::Week => "week",
            TimeGranularity::WeekMonday => "week(monday)",
            TimeGranularity::WeekTuesday => "week(tuesday)",
            TimeGranularity::WeekWednesday => "week(wednesday)",
            TimeGranularity::WeekThursday => "week(thursday)",
            TimeGranularity::WeekFriday => "week(friday)",
            TimeGranularity::WeekSaturday => "week(saturday)",
            TimeGranularity::WeekSunday => "week(sunday)",
            TimeGranularity::IsoWeek => "isoweek",
            TimeGranularity::Month => "month",
            TimeGranularity::Quarter => "quarter",
            TimeGranularity::Year => "year",
            TimeGranularity::IsoYear => "isoyear",
        }
    }
}

impl Display for TimeGranularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IntoExpression for TimeGranularity {
    fn into_expression(self) -> Expression {
        Expression::Constant(Constant::new(self.as_str()))
    }
}
