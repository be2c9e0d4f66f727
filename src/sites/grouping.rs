//! Builds the website listing shown on the sites page.
//!
//! Websites are split by domain type (custom domain first, then sub-domain),
//! each group sorted by `position` descending with ties broken by ascending
//! id. On the free plan only the first website of each group stays enabled;
//! the rest are annotated with `$disabled`.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use utoipa::ToSchema;

use super::{
    plan::Plan,
    website::{DomainType, ListedWebsite, Website},
};

/// The account whose websites are being listed.
#[derive(Clone, Debug)]
pub struct Owner {
    pub name: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub plan: Plan,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileSummary {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetadata {
    pub website_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebsiteGroup {
    pub profile: ProfileSummary,
    pub metadata: GroupMetadata,
    pub websites: Vec<ListedWebsite>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSummary {
    pub can_add_events: bool,
    pub plan: Plan,
    pub total_website_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteListing {
    pub viewer: ViewerSummary,
    pub website_groups: Vec<WebsiteGroup>,
    pub profiles: Vec<ProfileSummary>,
}

/// Sort in display order: `position` descending, then id ascending.
pub fn sort_websites(websites: &mut [Website]) {
    websites.sort_by_key(|website| (Reverse(website.position), website.id));
}

#[must_use]
pub fn build_listing(owner: &Owner, mut websites: Vec<Website>) -> WebsiteListing {
    sort_websites(&mut websites);
    let total_website_count = websites.len();

    let mut custom = Vec::new();
    let mut sub = Vec::new();
    for website in websites {
        match website.domain_type() {
            DomainType::Custom => custom.push(website),
            DomainType::Sub => sub.push(website),
        }
    }

    let website_groups = DomainType::ALL
        .into_iter()
        .map(|domain_type| {
            let members = match domain_type {
                DomainType::Custom => std::mem::take(&mut custom),
                DomainType::Sub => std::mem::take(&mut sub),
            };
            build_group(owner, domain_type, members)
        })
        .collect();

    WebsiteListing {
        viewer: ViewerSummary {
            can_add_events: owner.plan.can_add_websites(total_website_count),
            plan: owner.plan,
            total_website_count,
        },
        website_groups,
        profiles: vec![ProfileSummary {
            name: owner.name.clone(),
            slug: owner.username.clone(),
            image: owner.avatar.clone(),
        }],
    }
}

fn build_group(owner: &Owner, domain_type: DomainType, websites: Vec<Website>) -> WebsiteGroup {
    let websites: Vec<ListedWebsite> = websites
        .into_iter()
        .enumerate()
        .map(|(index, website)| ListedWebsite {
            website,
            disabled: owner.plan.is_free() && index > 0,
        })
        .collect();

    WebsiteGroup {
        profile: ProfileSummary {
            name: Some(domain_type.label().to_string()),
            slug: owner.username.clone(),
            image: owner.avatar.clone(),
        },
        metadata: GroupMetadata {
            website_count: websites.len(),
        },
        websites,
    }
}
