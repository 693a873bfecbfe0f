use std::time::{Duration, Instant};
use tracing::debug;

use crate::active_filters::{self, FilterTag};
use crate::catalog::Catalog;
use crate::filter::FilterCriteria;
use crate::models::{CompanyType, MentorRecord, RatingSort, Role, Slot};
use crate::notify::{NoResultsSignal, Toast, NO_RESULTS_MESSAGE};
use crate::query;

/// A user action against the mentor list.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetSearchTerm(String),
    ToggleRole(Role),
    ToggleCompanyType(CompanyType),
    ToggleSlot(Slot),
    ToggleRatingSort(RatingSort),
    RemoveFilter { facet: String, value: String },
    ResetAll,
}

/// Owns the filter criteria for the mentor list and everything derived from it.
///
/// Inputs only send intents; the visible list, tags and toast are read back
/// after each dispatch.
pub struct MentorsScreen {
    catalog: Catalog,
    criteria: FilterCriteria,
    evaluated_revision: Option<u64>,
    visible: Vec<i64>,
    signal: NoResultsSignal,
    toast: Option<Toast>,
    toast_duration: Duration,
}

impl MentorsScreen {
    pub fn new(catalog: Catalog, toast_duration: Duration) -> Self {
        let mut screen = Self {
            catalog,
            criteria: FilterCriteria::new(),
            evaluated_revision: None,
            visible: Vec::new(),
            signal: NoResultsSignal::new(),
            toast: None,
            toast_duration,
        };
        screen.refresh(Instant::now());
        screen
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn dispatch(&mut self, intent: Intent, now: Instant) {
        self.apply(intent);
        self.refresh(now);
    }

    /// Applies every intent, then evaluates once.
    pub fn dispatch_batch(&mut self, intents: impl IntoIterator<Item = Intent>, now: Instant) {
        for intent in intents {
            self.apply(intent);
        }
        self.refresh(now);
    }

    fn apply(&mut self, intent: Intent) {
        debug!(?intent, "dispatch");
        match intent {
            Intent::SetSearchTerm(term) => self.criteria.set_search_term(term),
            Intent::ToggleRole(role) => self.criteria.toggle_role(role),
            Intent::ToggleCompanyType(company_type) => {
                self.criteria.toggle_company_type(company_type)
            }
            Intent::ToggleSlot(slot) => self.criteria.toggle_slot(slot),
            Intent::ToggleRatingSort(sort) => self.criteria.toggle_rating_sort(sort),
            Intent::RemoveFilter { facet, value } => self.criteria.remove_filter(&facet, &value),
            Intent::ResetAll => self.criteria.reset_all(),
        }
    }

    fn refresh(&mut self, now: Instant) {
        if self.evaluated_revision == Some(self.criteria.revision()) {
            return;
        }

        let result = query::evaluate(self.catalog.mentors(), &self.criteria);
        self.visible = result.ids();
        self.evaluated_revision = Some(self.criteria.revision());
        debug!(
            revision = self.criteria.revision(),
            visible = self.visible.len(),
            "re-evaluated mentor list"
        );

        if self.signal.observe(result.is_empty) {
            self.toast = Some(Toast::new(NO_RESULTS_MESSAGE, now, self.toast_duration));
        } else if !result.is_empty {
            self.toast = None;
        }
    }

    pub fn visible(&self) -> Vec<&MentorRecord> {
        self.visible
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn tags(&self) -> Vec<FilterTag> {
        active_filters::active_tags(&self.criteria)
    }

    pub fn dismiss_tag(&mut self, tag: &FilterTag, now: Instant) {
        active_filters::dismiss(&mut self.criteria, tag);
        self.refresh(now);
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Drops the toast once its display time has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }
}
