use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::storage::ProfileChanges;
use crate::sites::Plan;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: String,
    pub locale: Option<String>,
    pub avatar: Option<String>,
    pub created_date: String,
    pub completed_onboarding: bool,
    pub two_factor_enabled: bool,
    pub brand_color: String,
    pub plan: Plan,
}

/// Website ids in display order; the first id gets the highest position.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WebsiteOrderRequest {
    pub ids: Vec<i64>,
}

/// Partial profile update. Absent fields are left untouched; `theme: null`
/// clears the theme.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_branding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub theme: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_onboarding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Distinguish an explicit `null` from an absent field.
fn present_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateProfileRequest {
    /// Convert into storage changes, substituting the normalized username.
    pub(crate) fn into_changes(self, username: Option<String>) -> ProfileChanges {
        ProfileChanges {
            username,
            name: self.name,
            bio: self.bio,
            avatar: self.avatar,
            time_zone: self.time_zone,
            week_start: self.week_start,
            hide_branding: self.hide_branding,
            brand_color: self.brand_color,
            theme: self.theme,
            completed_onboarding: self.completed_onboarding,
            locale: self.locale,
        }
    }
}
