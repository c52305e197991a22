//! Label synchronisation planning.
//!
//! Given the labels already on a pull request, a [`LabelPlan`] lists what
//! has to be added and which configured labels no longer apply. Labels that
//! the rule table does not know about are left alone.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::classifier::LabelAssignment;

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelPlan {
    /// Assigned labels that are not present yet.
    pub add: Vec<String>,
    /// Configured labels that are present but no longer assigned.
    pub remove: Vec<String>,
    /// Assigned labels that are already present.
    pub keep: Vec<String>,
}

impl LabelPlan {
    pub fn new<'a, C, L>(assignment: &LabelAssignment, current: C, configured: L) -> Self
    where
        C: IntoIterator<Item = &'a str>,
        L: IntoIterator<Item = &'a str>,
    {
        let current: BTreeSet<&str> = current.into_iter().collect();
        let configured: BTreeSet<&str> = configured.into_iter().collect();

        let (keep, add): (Vec<&str>, Vec<&str>) =
            assignment.iter().partition(|label| current.contains(label));

        let remove: Vec<String> = current
            .iter()
            .filter(|label| configured.contains(*label) && !assignment.contains(label))
            .map(|label| label.to_string())
            .collect();

        let plan = Self {
            add: add.into_iter().map(str::to_string).collect(),
            remove,
            keep: keep.into_iter().map(str::to_string).collect(),
        };
        debug!(
            add = plan.add.len(),
            remove = plan.remove.len(),
            keep = plan.keep.len(),
            "Planned label changes"
        );
        plan
    }

    /// True when the pull request already carries exactly the right labels.
    pub fn is_noop(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}
