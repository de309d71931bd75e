use chrono::{ DateTime, Datelike, Months, Utc };
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;
const MINUTES_PER_DAY: i64 = 1_440;
const MINUTES_PER_MONTH: i64 = 43_200;
const MINUTES_PER_TWO_MONTHS: i64 = 86_400;
const LAST_NUMBERED_DAY: i64 = 30;

/// Date bucket shown above a run of history entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DayLabel {
    Today,
    Yesterday,
    DaysAgo(i64),
    Distant(String),
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Today => write!(f, "Today"),
            DayLabel::Yesterday => write!(f, "Yesterday"),
            DayLabel::DaysAgo(days) => write!(f, "{} days ago", days),
            DayLabel::Distant(phrase) => write!(f, "{}", phrase),
        }
    }
}

/// Whole days elapsed between `then` and `now`.
///
/// Unknown instants and instants after `now` count as `now`.
pub fn days_ago(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let then = then.filter(|t| *t <= now).unwrap_or(now);
    (now - then).num_seconds() / SECONDS_PER_DAY
}

pub fn day_label(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DayLabel {
    match days_ago(then, now) {
        0 => DayLabel::Today,
        1 => DayLabel::Yesterday,
        days if days <= LAST_NUMBERED_DAY => DayLabel::DaysAgo(days),
        // days_ago > 0 here, so `then` is a real past instant
        _ => DayLabel::Distant(relative_phrase(then.unwrap_or(now), now)),
    }
}

fn plural(count: i64, one: &str, many: &str) -> String {
    if count == 1 { format!("1 {}", one) } else { format!("{} {}", count, many) }
}

fn rounded_div(value: i64, by: i64) -> i64 {
    ((value as f64) / (by as f64)).round() as i64
}

/// Full calendar months from `earlier` to `later`. A month only counts once
/// `later` has reached the same day-of-month and time-of-day again.
pub fn calendar_months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    if later <= earlier {
        return 0;
    }
    let raw =
        (later.year() as i64 - earlier.year() as i64) * 12 +
        (later.month() as i64 - earlier.month() as i64);
    if raw < 1 {
        return 0;
    }
    let rewound = later.checked_sub_months(Months::new(raw as u32));
    match rewound {
        Some(r) if r < earlier => raw - 1,
        _ => raw,
    }
}

/// Distance from `then` to `now` in words, suffixed with "ago".
pub fn relative_phrase(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!("{} ago", distance_in_words(then, now))
}

fn distance_in_words(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = rounded_div(seconds, 60);

    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 45 {
        return plural(minutes, "minute", "minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_PER_DAY {
        return format!("about {} hours", rounded_div(minutes, 60));
    }
    if minutes < 2_520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_PER_MONTH {
        return plural(rounded_div(minutes, MINUTES_PER_DAY), "day", "days");
    }
    if minutes < MINUTES_PER_TWO_MONTHS {
        let months = rounded_div(minutes, MINUTES_PER_MONTH);
        return format!("about {}", plural(months, "month", "months"));
    }

    let months = calendar_months_between(then, now);
    if months < 12 {
        return plural(rounded_div(minutes, MINUTES_PER_MONTH), "month", "months");
    }

    let years = months / 12;
    let into_year = months % 12;
    if into_year < 3 {
        format!("about {}", plural(years, "year", "years"))
    } else if into_year < 9 {
        format!("over {}", plural(years, "year", "years"))
    } else {
        format!("almost {} years", years + 1)
    }
}
