//! Website domain rules with no I/O.
//!
//! Everything here is pure so the listing and reordering rules can be tested
//! without a database:
//!
//! - [`plan`]: subscription tiers and the website-count limit they imply.
//! - [`website`]: the persisted website shape and its response annotation.
//! - [`grouping`]: partitioning a user's websites by domain type, ordering, and
//!   the free-tier `$disabled` marking.
//! - [`ordering`]: turning a submitted id list into positions.
//! - [`username`]: username slugification.

pub mod grouping;
pub mod ordering;
pub mod plan;
pub mod username;
pub mod website;

pub use grouping::{build_listing, sort_websites, Owner, WebsiteGroup, WebsiteListing};
pub use ordering::{assign_positions, ensure_owned, OrderError, PositionUpdate};
pub use plan::Plan;
pub use username::slugify;
pub use website::{DomainType, ListedWebsite, Website};
