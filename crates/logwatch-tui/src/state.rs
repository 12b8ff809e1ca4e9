//! Client-side state shared across screens: the error-list filters and the
//! per-resource request generations.

use std::collections::HashMap;

use logwatch_api::{ErrorQuery, ErrorStatus, Severity};

use crate::action::{RequestId, Resource};

/// Filters applied to every error-list fetch.
///
/// The errors screen edits it, the app owns the copy that fetches read.
/// `None` means "any" and goes over the wire as an empty parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub status: Option<ErrorStatus>,
    pub severity: Option<Severity>,
    pub container: Option<String>,
}

impl FilterState {
    /// Build the list query for `page`.
    pub fn to_query(&self, page: u32, per_page: u32) -> ErrorQuery {
        ErrorQuery {
            page,
            per_page,
            search: self.search.clone(),
            status: self.status.clone(),
            severity: self.severity.clone(),
            container: self.container.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Any → New → Investigating → Resolved → Any.
    pub fn cycle_status(&mut self) {
        self.status = cycle(&ErrorStatus::ALL, self.status.as_ref()).cloned();
    }

    /// Any → Critical → Error → Warning → Any.
    pub fn cycle_severity(&mut self) {
        self.severity = cycle(&Severity::ALL, self.severity.as_ref()).cloned();
    }

    /// Step through the known container names, then back to any.
    pub fn cycle_container(&mut self, options: &[String]) {
        self.container = cycle(options, self.container.as_ref()).cloned();
    }
}

/// Next entry after `current` in `options`; `None` after the last one.
/// A value missing from `options` restarts at the first entry.
fn cycle<'a, T: PartialEq>(options: &'a [T], current: Option<&T>) -> Option<&'a T> {
    match current {
        None => options.first(),
        Some(value) => match options.iter().position(|o| o == value) {
            Some(idx) => options.get(idx + 1),
            None => options.first(),
        },
    }
}

/// Monotonic generation per resource. Issuing a request bumps the
/// counter; a response is applied only if its generation is still current.
///
/// The last settled generation is kept too, so a resource whose newest
/// request has not answered yet reads as pending.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generations: HashMap<Resource, u64>,
    settled: HashMap<Resource, u64>,
}

impl RequestTracker {
    /// Start a new request for `resource`, superseding any in flight.
    pub fn begin(&mut self, resource: Resource) -> RequestId {
        let generation = self.generations.entry(resource).or_insert(0);
        *generation += 1;
        RequestId {
            resource,
            generation: *generation,
        }
    }

    /// True if no newer request for the same resource has been issued.
    pub fn is_current(&self, request: RequestId) -> bool {
        self.generations.get(&request.resource).copied() == Some(request.generation)
    }

    /// Record that `request` answered, successfully or not.
    pub fn finish(&mut self, request: RequestId) {
        let settled = self.settled.entry(request.resource).or_insert(0);
        *settled = (*settled).max(request.generation);
    }

    /// True while the newest request for `resource` has not answered.
    pub fn is_pending(&self, resource: Resource) -> bool {
        let issued = self.generations.get(&resource).copied().unwrap_or(0);
        let settled = self.settled.get(&resource).copied().unwrap_or(0);
        issued > settled
    }
}
