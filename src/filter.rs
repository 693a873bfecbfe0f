use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::models::{CompanyType, RatingSort, Role, Slot};

/// Identifies one filter dimension. The string forms are the identifiers
/// accepted by `FilterCriteria::remove_filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetType {
    Roles,
    Companies,
    Slots,
    Ratings,
}

impl FacetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetType::Roles => "roles",
            FacetType::Companies => "companies",
            FacetType::Slots => "slots",
            FacetType::Ratings => "ratings",
        }
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "roles" => Ok(FacetType::Roles),
            "companies" => Ok(FacetType::Companies),
            "slots" => Ok(FacetType::Slots),
            "ratings" => Ok(FacetType::Ratings),
            _ => Err(()),
        }
    }
}

/// Current search term and facet selections for one screen.
///
/// Multi-select facets keep selection order. Single-select facets hold at
/// most one value, and re-selecting the active value clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    search_term: String,
    selected_roles: Vec<Role>,
    selected_company_types: Vec<CompanyType>,
    selected_slot: Option<Slot>,
    selected_rating_sort: Option<RatingSort>,
    revision: u64,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_roles(&self) -> &[Role] {
        &self.selected_roles
    }

    pub fn selected_company_types(&self) -> &[CompanyType] {
        &self.selected_company_types
    }

    pub fn selected_slot(&self) -> Option<Slot> {
        self.selected_slot
    }

    pub fn selected_rating_sort(&self) -> Option<RatingSort> {
        self.selected_rating_sort
    }

    /// Bumped on every change; equal revisions mean equal criteria.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_active_filters(&self) -> bool {
        !self.selected_roles.is_empty()
            || !self.selected_company_types.is_empty()
            || self.selected_slot.is_some()
            || self.selected_rating_sort.is_some()
    }

    /// Stored verbatim; trimming happens at evaluation time.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search_term {
            self.search_term = term;
            self.touch();
        }
    }

    pub fn toggle_role(&mut self, role: Role) {
        toggle_multi(&mut self.selected_roles, role);
        self.touch();
    }

    pub fn toggle_company_type(&mut self, company_type: CompanyType) {
        toggle_multi(&mut self.selected_company_types, company_type);
        self.touch();
    }

    pub fn toggle_slot(&mut self, slot: Slot) {
        toggle_single(&mut self.selected_slot, slot);
        self.touch();
    }

    pub fn toggle_rating_sort(&mut self, sort: RatingSort) {
        toggle_single(&mut self.selected_rating_sort, sort);
        self.touch();
    }

    /// Removes one selected value. Single-select facets are cleared whatever
    /// `value` is. Unknown facets and unselected values leave the criteria unchanged.
    pub fn remove_filter(&mut self, facet: &str, value: &str) {
        let Ok(facet) = facet.parse::<FacetType>() else {
            debug!(facet, value, "ignoring removal for unknown facet");
            return;
        };

        let removed = match facet {
            FacetType::Roles => remove_multi(&mut self.selected_roles, Role::from_value(value)),
            FacetType::Companies => remove_multi(
                &mut self.selected_company_types,
                CompanyType::from_value(value),
            ),
            FacetType::Slots => self.selected_slot.take().is_some(),
            FacetType::Ratings => self.selected_rating_sort.take().is_some(),
        };

        if removed {
            self.touch();
        } else {
            debug!(%facet, value, "ignoring removal of unselected value");
        }
    }

    pub fn reset_all(&mut self) {
        if self.search_term.is_empty() && !self.has_active_filters() {
            return;
        }
        self.search_term.clear();
        self.selected_roles.clear();
        self.selected_company_types.clear();
        self.selected_slot = None;
        self.selected_rating_sort = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

fn toggle_multi<T: PartialEq>(selected: &mut Vec<T>, value: T) {
    if let Some(pos) = selected.iter().position(|v| *v == value) {
        selected.remove(pos);
    } else {
        selected.push(value);
    }
}

fn toggle_single<T: PartialEq + Copy>(selected: &mut Option<T>, value: T) {
    *selected = if *selected == Some(value) { None } else { Some(value) };
}

fn remove_multi<T: PartialEq>(selected: &mut Vec<T>, value: Option<T>) -> bool {
    let Some(value) = value else { return false };
    match selected.iter().position(|v| *v == value) {
        Some(pos) => {
            selected.remove(pos);
            true
        }
        None => false,
    }
}
