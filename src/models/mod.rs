//! Entity contracts (spec.md §3). Storage form is free; these are the
//! shapes the Store hands back on every read and the HTTP layer serializes
//! verbatim (modulo the `UserResponse`-style sanitization the auth module
//! applies to `User`).

mod brief;
mod compare;
mod event;
mod feedback;
mod notification;
mod report;
mod threshold;
mod user;
mod watchlist;

pub use brief::*;
pub use compare::*;
pub use event::*;
pub use feedback::*;
pub use notification::*;
pub use report::*;
pub use threshold::*;
pub use user::*;
pub use watchlist::*;

use serde::{Deserialize, Serialize};

/// Markets this system tracks. Fixed to the two the spec names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    Kr,
    Us,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Kr => "KR",
            Market::Us => "US",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "KR" => Some(Market::Kr),
            "US" => Some(Market::Us),
            _ => None,
        }
    }

    /// Exchange timezone used for session-label math (§4.2, §9 — timezone
    /// math lives in one module; this is the only place Market maps to a tz).
    pub fn exchange_timezone(&self) -> &'static str {
        match self {
            Market::Kr => "Asia/Seoul",
            Market::Us => "America/New_York",
        }
    }
}
