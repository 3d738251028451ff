//! Filter/search engine over an in-memory complaint collection.
//!
//! [`filter`] is a pure function; [`ComplaintBrowser`] pairs a fetched
//! collection with the current query and re-applies the filter on every read,
//! so the visible set always equals a fresh application over the latest
//! collection and query.

use std::str::FromStr;

use georesolve_shared::constants::FILTER_ALL;
use georesolve_shared::{Complaint, Status, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    fn admits(&self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == FILTER_ALL {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == FILTER_ALL {
            Self::All
        } else {
            Self::Only(s.to_string())
        }
    }
}

/// Conjunction of a free-text, a status and a category predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintQuery {
    /// Case-insensitive substring of title or description. Empty matches all.
    pub text: String,
    pub status: StatusFilter,
    pub category: CategoryFilter,
}

impl ComplaintQuery {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.admits(complaint.status)
            && self.category.admits(&complaint.category)
            && text_matches(&self.text, complaint)
    }
}

fn text_matches(text: &str, complaint: &Complaint) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    complaint.title.to_lowercase().contains(&needle)
        || complaint.description.to_lowercase().contains(&needle)
}

/// Apply `query` to `complaints`, keeping source order.
pub fn filter(complaints: &[Complaint], query: &ComplaintQuery) -> Vec<Complaint> {
    complaints
        .iter()
        .filter(|c| query.matches(c))
        .cloned()
        .collect()
}

/// A fetched snapshot plus the query the user is editing.
#[derive(Debug, Clone, Default)]
pub struct ComplaintBrowser {
    complaints: Vec<Complaint>,
    query: ComplaintQuery,
}

impl ComplaintBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot wholesale after a fetch.
    pub fn replace(&mut self, complaints: Vec<Complaint>) {
        self.complaints = complaints;
    }

    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    pub fn query(&self) -> &ComplaintQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: ComplaintQuery) {
        self.query = query;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.query.status = status;
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
    }

    pub fn visible(&self) -> Vec<Complaint> {
        filter(&self.complaints, &self.query)
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} complaints",
            self.visible().len(),
            self.complaints.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_complaint;

    fn collection() -> Vec<Complaint> {
        let mut lamp = sample_complaint("Broken streetlight", "Street Lighting", Status::Pending, 40);
        lamp.description = "Dark corner near the POTHOLE repair site".into();
        vec![
            sample_complaint("Pothole on MG Road", "Roads", Status::Pending, 50),
            lamp,
            sample_complaint("Garbage pile", "Sanitation", Status::InProgress, 30),
            sample_complaint("Cracked road divider", "Roads", Status::Resolved, 20),
            sample_complaint("Pothole near school", "Roads", Status::Pending, 10),
        ]
    }

    fn titles(complaints: &[Complaint]) -> Vec<&str> {
        complaints.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_identity_query_returns_everything() {
        let all = collection();
        let query = ComplaintQuery {
            text: String::new(),
            status: "all".parse().unwrap(),
            category: CategoryFilter::from("all"),
        };
        assert_eq!(filter(&all, &query), all);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let all = collection();
        let query = ComplaintQuery {
            text: "pot".into(),
            status: StatusFilter::Only(Status::Pending),
            category: CategoryFilter::All,
        };
        let once = filter(&all, &query);
        assert_eq!(filter(&once, &query), once);
    }

    #[test]
    fn test_text_matches_title_or_description_case_insensitively() {
        let all = collection();
        let query = ComplaintQuery {
            text: "PotHole".into(),
            ..Default::default()
        };
        assert_eq!(
            titles(&filter(&all, &query)),
            ["Pothole on MG Road", "Broken streetlight", "Pothole near school"]
        );
    }

    #[test]
    fn test_dimensions_are_conjunctive() {
        let all = collection();
        let query = ComplaintQuery {
            text: String::new(),
            status: StatusFilter::Only(Status::Pending),
            category: CategoryFilter::from("Roads"),
        };
        let result = filter(&all, &query);
        assert_eq!(titles(&result), ["Pothole on MG Road", "Pothole near school"]);
        assert!(result
            .iter()
            .all(|c| c.status == Status::Pending && c.category == "Roads"));
    }

    #[test]
    fn test_widening_status_is_monotonic() {
        let mut browser = ComplaintBrowser::new();
        browser.replace(collection());
        browser.set_category(CategoryFilter::from("Roads"));
        browser.set_status(StatusFilter::Only(Status::Pending));
        let narrow = browser.visible();

        browser.set_status(StatusFilter::All);
        let wide = browser.visible();
        assert!(wide.len() >= narrow.len());
        assert!(narrow.iter().all(|c| wide.contains(c)));
        assert_eq!(browser.summary(), "Showing 3 of 5 complaints");
    }

    #[test]
    fn test_browser_tracks_replaced_collection() {
        let mut browser = ComplaintBrowser::new();
        browser.set_text("garbage");
        assert!(browser.visible().is_empty());

        browser.replace(collection());
        assert_eq!(titles(&browser.visible()), ["Garbage pile"]);
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("in_progress".parse::<StatusFilter>().unwrap(), StatusFilter::Only(Status::InProgress));
        assert!("open".parse::<StatusFilter>().is_err());
    }
}
