//! Filter & projection: the read-only view of the collection shown to users.

use crate::models::{Filter, Topic};

/// Returns the stable-order subsequence of `topics` accepted by `filter`.
///
/// `Filter::All` yields the collection unchanged. An empty result is a normal
/// outcome and is rendered as a placeholder, never reported as an error.
pub fn project(topics: &[Topic], filter: Filter) -> Vec<Topic> {
    topics
        .iter()
        .filter(|topic| filter.matches(topic))
        .cloned()
        .collect()
}
