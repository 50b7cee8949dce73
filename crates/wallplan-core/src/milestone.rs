//! User-entered milestone record

use chrono::NaiveDate;

/// A named date entered by the user. Several milestones may share a date;
/// the planner joins their descriptions when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Milestone {
    /// Free-text description
    pub description: String,
    /// Date the milestone falls on
    pub date: NaiveDate,
}

impl Milestone {
    /// Create a new milestone
    pub fn new<S: Into<String>>(description: S, date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            date,
        }
    }
}
