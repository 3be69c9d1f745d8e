//! List filtering for the bounty and tip management views.
//!
//! Title search is a case-insensitive substring match; enum filters are exact.
//! All criteria must match. Input order is preserved.

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

use crate::net::types::{Bounty, BountyCategory, Priority, Tip, TipCategory, TipStatus};

fn title_matches(title: &str, needle: &str) -> bool {
    needle.is_empty() || title.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BountyFilter {
    pub search: String,
    pub category: Option<BountyCategory>,
    pub priority: Option<Priority>,
}

impl BountyFilter {
    #[must_use]
    pub fn matches(&self, bounty: &Bounty) -> bool {
        title_matches(&bounty.title, &self.search)
            && self.category.is_none_or(|c| bounty.category == c)
            && self.priority.is_none_or(|p| bounty.priority == p)
    }

    #[must_use]
    pub fn apply(&self, bounties: Vec<Bounty>) -> Vec<Bounty> {
        bounties.into_iter().filter(|b| self.matches(b)).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TipFilter {
    pub search: String,
    pub status: Option<TipStatus>,
    pub category: Option<TipCategory>,
}

impl TipFilter {
    #[must_use]
    pub fn matches(&self, tip: &Tip) -> bool {
        title_matches(&tip.title, &self.search)
            && self.status.is_none_or(|s| tip.status == s)
            && self.category.is_none_or(|c| tip.category == c)
    }

    #[must_use]
    pub fn apply(&self, tips: Vec<Tip>) -> Vec<Tip> {
        tips.into_iter().filter(|t| self.matches(t)).collect()
    }
}
