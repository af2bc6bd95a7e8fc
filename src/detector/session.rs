//! Session labeling: resolve a market's exchange timezone, convert the
//! instant of detection into local wall-clock time, and classify it into
//! {pre, regular, post, closed} (spec.md §4.2, §9). This is the one module
//! allowed to know about timezones and trading-session boundaries; no other
//! module derives a session label from a formatted time string.
//!
//! The boundary calendar itself is configuration, not code (spec.md §9 open
//! question b: "the session calendar is data... loading contract is not
//! specified"). We hardcode the conventional Reg/T/NYSE and KRX hours as the
//! documented default until an external calendar feed is wired in; weekends
//! always classify as `closed`.

use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::models::{Market, SessionLabel};

struct SessionBounds {
    pre_open: NaiveTime,
    regular_open: NaiveTime,
    regular_close: NaiveTime,
    post_close: NaiveTime,
}

fn bounds_for(market: Market) -> SessionBounds {
    match market {
        Market::Us => SessionBounds {
            pre_open: NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
            regular_open: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            regular_close: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            post_close: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        },
        Market::Kr => SessionBounds {
            pre_open: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            regular_open: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            regular_close: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
            post_close: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        },
    }
}

/// Classify `at_utc` into a session label for `market`. Returns the
/// resolved IANA timezone name alongside the label so callers can store
/// both on the PriceEvent without re-deriving the mapping.
pub fn classify(market: Market, at_utc: DateTime<Utc>) -> (SessionLabel, &'static str) {
    let tz_name = market.exchange_timezone();
    let tz: Tz = tz_name.parse().expect("exchange_timezone names are valid IANA zones");
    let local = at_utc.with_timezone(&tz);

    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return (SessionLabel::Closed, tz_name);
    }

    let bounds = bounds_for(market);
    let time = local.time().with_nanosecond(0).unwrap_or(local.time());

    let label = if time < bounds.pre_open {
        SessionLabel::Closed
    } else if time < bounds.regular_open {
        SessionLabel::Pre
    } else if time < bounds.regular_close {
        SessionLabel::Regular
    } else if time < bounds.post_close {
        SessionLabel::Post
    } else {
        SessionLabel::Closed
    };

    (label, tz_name)
}
