//! Website records as read from storage and as returned to clients.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user's website. `position` orders the list: higher values come first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub position: i32,
    pub hidden: bool,
    pub has_custom_domain: bool,
    pub status: Option<String>,
}

impl Website {
    #[must_use]
    pub const fn domain_type(&self) -> DomainType {
        if self.has_custom_domain {
            DomainType::Custom
        } else {
            DomainType::Sub
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainType {
    Custom,
    Sub,
}

impl DomainType {
    /// Groups are always returned in this order.
    pub const ALL: [Self; 2] = [Self::Custom, Self::Sub];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Custom => "Custom Domain Websites",
            Self::Sub => "Sub Domain Websites",
        }
    }
}

/// A website plus the response-only `$disabled` flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListedWebsite {
    #[serde(flatten)]
    pub website: Website,
    #[serde(rename = "$disabled")]
    pub disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    fn website(has_custom_domain: bool) -> Website {
        Website {
            id: 1,
            title: "Portfolio".to_string(),
            slug: "portfolio".to_string(),
            description: None,
            position: 0,
            hidden: false,
            has_custom_domain,
            status: None,
        }
    }

    #[test]
    fn domain_type_follows_custom_domain_flag() {
        assert_eq!(website(true).domain_type(), DomainType::Custom);
        assert_eq!(website(false).domain_type(), DomainType::Sub);
    }

    #[test]
    fn listed_website_flattens_with_dollar_disabled() -> Result<()> {
        let listed = ListedWebsite {
            website: website(false),
            disabled: true,
        };
        let value = serde_json::to_value(&listed)?;
        let disabled = value
            .get("$disabled")
            .and_then(serde_json::Value::as_bool)
            .context("missing $disabled")?;
        assert!(disabled);
        assert_eq!(
            value.get("hasCustomDomain").and_then(serde_json::Value::as_bool),
            Some(false)
        );
        assert_eq!(
            value.get("title").and_then(serde_json::Value::as_str),
            Some("Portfolio")
        );
        Ok(())
    }
}
