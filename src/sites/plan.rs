//! Subscription plans.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// Free accounts may keep adding websites until they own this many.
pub const FREE_PLAN_WEBSITE_LIMIT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    Free,
    Trial,
    Pro,
}

impl Plan {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Trial => "TRIAL",
            Self::Pro => "PRO",
        }
    }

    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }

    /// Whether an account on this plan that owns `total` websites may add another.
    #[must_use]
    pub const fn can_add_websites(self, total: usize) -> bool {
        !self.is_free() || total < FREE_PLAN_WEBSITE_LIMIT
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "FREE" => Ok(Self::Free),
            "TRIAL" => Ok(Self::Trial),
            "PRO" => Ok(Self::Pro),
            other => Err(format!("unknown plan: {other}")),
        }
    }
}
