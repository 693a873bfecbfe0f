use crate::filter::{FacetType, FilterCriteria};

/// One removable chip for a selected facet value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTag {
    pub facet: FacetType,
    pub value: &'static str,
    pub label: &'static str,
}

/// Tags for every selected value: roles and company types in selection
/// order, then slot, then rating sort. Empty when nothing is selected.
pub fn active_tags(criteria: &FilterCriteria) -> Vec<FilterTag> {
    let roles = criteria.selected_roles().iter().map(|r| FilterTag {
        facet: FacetType::Roles,
        value: r.as_str(),
        label: r.label(),
    });
    let companies = criteria.selected_company_types().iter().map(|c| FilterTag {
        facet: FacetType::Companies,
        value: c.as_str(),
        label: c.label(),
    });
    let slot = criteria.selected_slot().map(|s| FilterTag {
        facet: FacetType::Slots,
        value: s.as_str(),
        label: s.label(),
    });
    let rating = criteria.selected_rating_sort().map(|r| FilterTag {
        facet: FacetType::Ratings,
        value: r.as_str(),
        label: r.label(),
    });

    roles.chain(companies).chain(slot).chain(rating).collect()
}

/// Handles a click on a tag's remove control.
pub fn dismiss(criteria: &mut FilterCriteria, tag: &FilterTag) {
    criteria.remove_filter(tag.facet.as_str(), tag.value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyType, RatingSort, Role, Slot};

    #[test]
    fn test_no_selection_renders_nothing() {
        let mut criteria = FilterCriteria::new();
        criteria.set_search_term("rose");
        assert!(active_tags(&criteria).is_empty());
    }

    #[test]
    fn test_tags_follow_facet_then_selection_order() {
        let mut criteria = FilterCriteria::new();
        criteria.toggle_rating_sort(RatingSort::HighToLow);
        criteria.toggle_slot(Slot::ThisWeek);
        criteria.toggle_company_type(CompanyType::Startups);
        criteria.toggle_role(Role::DsAiMl);
        criteria.toggle_role(Role::SeSde);

        let labels: Vec<&str> = active_tags(&criteria).iter().map(|t| t.label).collect();
        assert_eq!(labels, ["DS/AI/ML", "SE/SDE", "Startups", "This week", "High to low"]);
    }

    #[test]
    fn test_single_select_contributes_at_most_one_tag() {
        let mut criteria = FilterCriteria::new();
        criteria.toggle_slot(Slot::ThisWeek);
        criteria.toggle_slot(Slot::Anytime);

        let tags = active_tags(&criteria);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].facet, FacetType::Slots);
        assert_eq!(tags[0].value, "anytime");
    }

    #[test]
    fn test_dismiss_removes_exactly_that_tag() {
        let mut criteria = FilterCriteria::new();
        criteria.toggle_role(Role::SeSde);
        criteria.toggle_role(Role::Design);
        criteria.toggle_rating_sort(RatingSort::LowToHigh);

        let tags = active_tags(&criteria);
        dismiss(&mut criteria, &tags[0]);
        dismiss(&mut criteria, &tags[2]);

        let remaining = active_tags(&criteria);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].value, "design");
        assert_eq!(criteria.selected_rating_sort(), None);
    }
}
