//! Surcharge rules engine.
//!
//! Rules are data: each rule carries a multiplicative factor and a list of
//! applicability predicates; it applies when any predicate matches. The
//! predicates are tagged variants so the rule set stays exhaustively
//! testable.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::holidays::is_public_holiday;

/// Keywords marking an airport location, English and Dutch.
const AIRPORT_KEYWORDS: [&str; 2] = ["airport", "luchthaven"];

/// Trips shorter than this (but longer than zero) count as short trips.
const SHORT_TRIP_MAX_KM: Decimal = dec!(3);

/// Inclusive start, exclusive end. Must not wrap midnight; use
/// [`Applicability::HourWindow`] for wrapping windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// Which free-text location a keyword predicate inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Pickup,
    Destination,
}

/// One applicability predicate of a surcharge rule.
#[derive(Debug, Clone)]
pub enum Applicability {
    /// Hour-of-day window, wrapping past midnight when start > end.
    /// `{start: 22, end: 6}` matches 22:00 up to 05:59.
    HourWindow { start: u32, end: u32 },
    /// Explicit same-day time ranges.
    TimeRanges(Vec<TimeRange>),
    /// Day-of-week set.
    Days(Vec<Weekday>),
    /// Pickup date is a public holiday.
    PublicHoliday,
    /// Location text contains an airport keyword (case-insensitive).
    AirportKeyword { field: LocationField },
    /// Measured distance is positive but under the short-trip threshold.
    ShortTrip,
    /// Weekday AND time-range combination.
    RushHour {
        days: Vec<Weekday>,
        ranges: Vec<TimeRange>,
    },
}

/// Everything a predicate may inspect. The pickup instant has already been
/// converted to the configured local timezone.
#[derive(Debug, Clone)]
pub struct SurchargeContext<'a> {
    pub pickup_local: NaiveDateTime,
    pub pickup_text: &'a str,
    pub destination_text: &'a str,
    pub distance_km: Decimal,
}

impl Applicability {
    pub fn matches(&self, ctx: &SurchargeContext<'_>) -> bool {
        match self {
            Applicability::HourWindow { start, end } => {
                let hour = ctx.pickup_local.hour();
                if start <= end {
                    (*start..*end).contains(&hour)
                } else {
                    hour >= *start || hour < *end
                }
            }
            Applicability::TimeRanges(ranges) => {
                let t = ctx.pickup_local.time();
                ranges.iter().any(|r| r.contains(t))
            }
            Applicability::Days(days) => days.contains(&ctx.pickup_local.weekday()),
            Applicability::PublicHoliday => is_public_holiday(ctx.pickup_local.date()),
            Applicability::AirportKeyword { field } => {
                let text = match field {
                    LocationField::Pickup => ctx.pickup_text,
                    LocationField::Destination => ctx.destination_text,
                };
                let lowered = text.to_lowercase();
                AIRPORT_KEYWORDS.iter().any(|kw| lowered.contains(kw))
            }
            Applicability::ShortTrip => {
                ctx.distance_km > Decimal::ZERO && ctx.distance_km < SHORT_TRIP_MAX_KM
            }
            Applicability::RushHour { days, ranges } => {
                let t = ctx.pickup_local.time();
                days.contains(&ctx.pickup_local.weekday()) && ranges.iter().any(|r| r.contains(t))
            }
        }
    }

    /// Stable tag reported on surcharge lines.
    pub fn label(&self) -> &'static str {
        match self {
            Applicability::HourWindow { .. } => "hour_window",
            Applicability::TimeRanges(_) => "time_range",
            Applicability::Days(_) => "day_of_week",
            Applicability::PublicHoliday => "public_holiday",
            Applicability::AirportKeyword { .. } => "airport",
            Applicability::ShortTrip => "short_trip",
            Applicability::RushHour { .. } => "rush_hour",
        }
    }
}

/// A named surcharge with its applicability predicates.
#[derive(Debug, Clone)]
pub struct SurchargeRule {
    pub name: String,
    pub description: String,
    /// Multiplicative: 1.15 adds 15% of base + distance fare.
    pub factor: Decimal,
    /// Any-of semantics.
    pub when: Vec<Applicability>,
}

impl SurchargeRule {
    /// The label of the first matching predicate, if the rule applies.
    pub fn applies(&self, ctx: &SurchargeContext<'_>) -> Option<&'static str> {
        self.when
            .iter()
            .find(|predicate| predicate.matches(ctx))
            .map(Applicability::label)
    }
}

/// The built-in surcharge table.
pub fn builtin_rules() -> Vec<SurchargeRule> {
    let weekdays = vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];
    let rush_ranges = vec![
        TimeRange::new(time(7, 0), time(9, 0)),
        TimeRange::new(time(16, 0), time(19, 0)),
    ];

    vec![
        SurchargeRule {
            name: "night".to_string(),
            description: "Night rate between 22:00 and 06:00".to_string(),
            factor: dec!(1.20),
            when: vec![Applicability::HourWindow { start: 22, end: 6 }],
        },
        SurchargeRule {
            name: "weekend".to_string(),
            description: "Weekend rate on Saturday and Sunday".to_string(),
            factor: dec!(1.10),
            when: vec![Applicability::Days(vec![Weekday::Sat, Weekday::Sun])],
        },
        SurchargeRule {
            name: "holiday".to_string(),
            description: "Public holiday rate".to_string(),
            factor: dec!(1.25),
            when: vec![Applicability::PublicHoliday],
        },
        SurchargeRule {
            name: "airport".to_string(),
            description: "Airport pickup".to_string(),
            factor: dec!(1.15),
            when: vec![Applicability::AirportKeyword {
                field: LocationField::Pickup,
            }],
        },
        SurchargeRule {
            name: "short_trip".to_string(),
            description: "Trips under 3 km".to_string(),
            factor: dec!(1.15),
            when: vec![Applicability::ShortTrip],
        },
        SurchargeRule {
            name: "rush_hour".to_string(),
            description: "Weekday rush hour".to_string(),
            factor: dec!(1.10),
            when: vec![Applicability::RushHour {
                days: weekdays,
                ranges: rush_ranges,
            }],
        },
    ]
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn ctx(pickup_local: NaiveDateTime) -> SurchargeContext<'static> {
        SurchargeContext {
            pickup_local,
            pickup_text: "",
            destination_text: "",
            distance_km: dec!(10),
        }
    }

    fn rule_named<'r>(rules: &'r [SurchargeRule], name: &str) -> &'r SurchargeRule {
        rules.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_hour_window_wraps_midnight() {
        let night = Applicability::HourWindow { start: 22, end: 6 };
        // 2026-03-04 is a Wednesday
        assert!(night.matches(&ctx(at(2026, 3, 4, 23, 0))));
        assert!(night.matches(&ctx(at(2026, 3, 4, 2, 30))));
        assert!(night.matches(&ctx(at(2026, 3, 4, 22, 0))));
        assert!(!night.matches(&ctx(at(2026, 3, 4, 6, 0))));
        assert!(!night.matches(&ctx(at(2026, 3, 4, 12, 0))));
    }

    #[test]
    fn test_hour_window_non_wrapping() {
        let afternoon = Applicability::HourWindow { start: 12, end: 18 };
        assert!(afternoon.matches(&ctx(at(2026, 3, 4, 12, 0))));
        assert!(afternoon.matches(&ctx(at(2026, 3, 4, 17, 59))));
        assert!(!afternoon.matches(&ctx(at(2026, 3, 4, 18, 0))));
    }

    #[test]
    fn test_weekend_days() {
        let rules = builtin_rules();
        let weekend = rule_named(&rules, "weekend");
        // 2026-03-07 is a Saturday, 2026-03-09 a Monday
        assert!(weekend.applies(&ctx(at(2026, 3, 7, 14, 0))).is_some());
        assert!(weekend.applies(&ctx(at(2026, 3, 9, 14, 0))).is_none());
    }

    #[test]
    fn test_holiday_rule() {
        let rules = builtin_rules();
        let holiday = rule_named(&rules, "holiday");
        assert!(holiday.applies(&ctx(at(2026, 7, 21, 10, 0))).is_some());
        assert!(holiday.applies(&ctx(at(2026, 7, 22, 10, 0))).is_none());
    }

    #[test]
    fn test_airport_keyword_both_languages_case_insensitive() {
        let rules = builtin_rules();
        let airport = rule_named(&rules, "airport");

        let mut context = ctx(at(2026, 3, 4, 12, 0));
        context.pickup_text = "Brussels AIRPORT, Zaventem";
        assert_eq!(airport.applies(&context), Some("airport"));

        context.pickup_text = "Luchthaven Zaventem, vertrekhal";
        assert!(airport.applies(&context).is_some());

        // Destination keyword does not trigger the pickup rule
        context.pickup_text = "Grote Markt 1";
        context.destination_text = "Brussels Airport";
        assert!(airport.applies(&context).is_none());
    }

    #[test]
    fn test_airport_keyword_destination_field_is_expressible() {
        let dropoff = Applicability::AirportKeyword {
            field: LocationField::Destination,
        };
        let mut context = ctx(at(2026, 3, 4, 12, 0));
        context.destination_text = "luchthaven Charleroi";
        assert!(dropoff.matches(&context));
    }

    #[test]
    fn test_short_trip_bounds() {
        let short = Applicability::ShortTrip;
        let mut context = ctx(at(2026, 3, 4, 12, 0));

        context.distance_km = dec!(2.99);
        assert!(short.matches(&context));

        context.distance_km = dec!(3);
        assert!(!short.matches(&context), "threshold itself is excluded");

        context.distance_km = Decimal::ZERO;
        assert!(!short.matches(&context), "zero distance is not a short trip");
    }

    #[test]
    fn test_time_ranges_match_within_same_day() {
        let lunch = Applicability::TimeRanges(vec![TimeRange::new(time(11, 30), time(14, 0))]);
        assert!(lunch.matches(&ctx(at(2026, 3, 4, 11, 30))));
        assert!(lunch.matches(&ctx(at(2026, 3, 4, 13, 59))));
        assert!(!lunch.matches(&ctx(at(2026, 3, 4, 14, 0))), "end is exclusive");
        assert!(!lunch.matches(&ctx(at(2026, 3, 4, 9, 0))));
    }

    #[test]
    fn test_rush_hour_needs_weekday_and_time() {
        let rules = builtin_rules();
        let rush = rule_named(&rules, "rush_hour");

        // Wednesday 08:00 - in
        assert!(rush.applies(&ctx(at(2026, 3, 4, 8, 0))).is_some());
        // Wednesday 10:00 - out of range
        assert!(rush.applies(&ctx(at(2026, 3, 4, 10, 0))).is_none());
        // Saturday 08:00 - not a weekday
        assert!(rush.applies(&ctx(at(2026, 3, 7, 8, 0))).is_none());
        // Wednesday 18:59 - evening range
        assert!(rush.applies(&ctx(at(2026, 3, 4, 18, 59))).is_some());
    }

    #[test]
    fn test_any_of_semantics() {
        let rule = SurchargeRule {
            name: "mixed".to_string(),
            description: "either weekend or night".to_string(),
            factor: dec!(1.05),
            when: vec![
                Applicability::Days(vec![Weekday::Sat]),
                Applicability::HourWindow { start: 22, end: 6 },
            ],
        };
        // Wednesday night: second predicate matches
        assert_eq!(rule.applies(&ctx(at(2026, 3, 4, 23, 0))), Some("hour_window"));
        // Saturday noon: first predicate matches
        assert_eq!(rule.applies(&ctx(at(2026, 3, 7, 12, 0))), Some("day_of_week"));
        // Wednesday noon: neither
        assert!(rule.applies(&ctx(at(2026, 3, 4, 12, 0))).is_none());
    }
}
