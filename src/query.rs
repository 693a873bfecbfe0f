use crate::filter::FilterCriteria;
use crate::models::{MentorRecord, RatingSort};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    pub mentors: Vec<&'a MentorRecord>,
    pub is_empty: bool,
}

impl QueryResult<'_> {
    pub fn ids(&self) -> Vec<i64> {
        self.mentors.iter().map(|m| m.id).collect()
    }
}

/// Filters and orders `mentors` by `criteria`.
///
/// Facets combine with AND, values within a facet with OR. Without a rating
/// sort the input order is kept; with one, ties keep their input order.
pub fn evaluate<'a>(mentors: &'a [MentorRecord], criteria: &FilterCriteria) -> QueryResult<'a> {
    let term = criteria.search_term().trim().to_lowercase();

    let mut results: Vec<&MentorRecord> = mentors
        .iter()
        .filter(|m| term.is_empty() || matches_text(m, &term))
        .filter(|m| {
            let roles = criteria.selected_roles();
            roles.is_empty() || roles.iter().any(|r| r.as_str() == m.role)
        })
        .filter(|m| {
            let types = criteria.selected_company_types();
            types.is_empty() || types.iter().any(|t| t.as_str() == m.company_type)
        })
        .filter(|m| match criteria.selected_slot() {
            Some(slot) => slot.as_str() == m.availability,
            None => true,
        })
        .collect();

    // sort_by is stable
    match criteria.selected_rating_sort() {
        Some(RatingSort::LowToHigh) => results.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
        Some(RatingSort::HighToLow) => results.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        None => {}
    }

    let is_empty = results.is_empty();
    QueryResult {
        mentors: results,
        is_empty,
    }
}

fn matches_text(mentor: &MentorRecord, term: &str) -> bool {
    [&mentor.name, &mentor.company, &mentor.title, &mentor.bio]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{mentor, Catalog};
    use crate::models::{CompanyType, Role, Slot};
    use std::collections::BTreeSet;

    fn names(result: &QueryResult) -> Vec<String> {
        result.mentors.iter().map(|m| m.name.clone()).collect()
    }

    #[test]
    fn test_no_criteria_returns_catalog_order() {
        let catalog = Catalog::sample().unwrap();
        let result = evaluate(catalog.mentors(), &FilterCriteria::new());
        assert_eq!(result.ids(), vec![1, 2, 3, 4]);
        assert!(!result.is_empty);
    }

    #[test]
    fn test_role_filter_keeps_catalog_order() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.toggle_role(Role::SeSde);

        let result = evaluate(catalog.mentors(), &criteria);
        assert_eq!(names(&result), ["Jonny Rose", "Dev Jain", "Rishi Mehta"]);
        assert!(!result.is_empty);
    }

    #[test]
    fn test_company_filter_with_low_to_high_sort() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.toggle_company_type(CompanyType::Faang);
        criteria.toggle_rating_sort(RatingSort::LowToHigh);

        let result = evaluate(catalog.mentors(), &criteria);
        assert_eq!(names(&result), ["Dev Jain", "Jonny Rose"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.set_search_term("google");

        let result = evaluate(catalog.mentors(), &criteria);
        assert_eq!(names(&result), ["Jonny Rose"]);
        assert!(!result.is_empty);

        criteria.set_search_term("  MISTRY ");
        let result = evaluate(catalog.mentors(), &criteria);
        assert_eq!(names(&result), ["Heet Mistry"]);
    }

    #[test]
    fn test_search_matches_bio_and_title() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.set_search_term("goldman");
        assert_eq!(evaluate(catalog.mentors(), &criteria).ids(), vec![3]);

        criteria.set_search_term("software engineering");
        assert_eq!(evaluate(catalog.mentors(), &criteria).ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unmatched_search_is_empty() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.set_search_term("nonexistentxyz");

        let result = evaluate(catalog.mentors(), &criteria);
        assert!(result.mentors.is_empty());
        assert!(result.is_empty);
    }

    #[test]
    fn test_blank_search_means_no_text_filter() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.set_search_term("   ");
        assert_eq!(evaluate(catalog.mentors(), &criteria).ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.set_search_term("pm");
        criteria.toggle_rating_sort(RatingSort::HighToLow);

        let first = evaluate(catalog.mentors(), &criteria);
        let second = evaluate(catalog.mentors(), &criteria);
        assert_eq!(first, second);
    }

    #[test]
    fn test_disjunction_within_facet() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.toggle_role(Role::SeSde);
        criteria.toggle_role(Role::DsAiMl);

        let ids = evaluate(catalog.mentors(), &criteria).ids();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let unique: BTreeSet<i64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_conjunction_across_facets_is_intersection() {
        let catalog = Catalog::sample().unwrap();

        let mut text = FilterCriteria::new();
        text.set_search_term("amazon");
        let mut role = FilterCriteria::new();
        role.toggle_role(Role::SeSde);
        let mut both = FilterCriteria::new();
        both.set_search_term("amazon");
        both.toggle_role(Role::SeSde);

        let text_ids: BTreeSet<i64> = evaluate(catalog.mentors(), &text).ids().into_iter().collect();
        let role_ids: BTreeSet<i64> = evaluate(catalog.mentors(), &role).ids().into_iter().collect();
        let expected: Vec<i64> = text_ids.intersection(&role_ids).copied().collect();

        assert_eq!(evaluate(catalog.mentors(), &both).ids(), expected);
        assert_eq!(expected, vec![1, 2]);
    }

    #[test]
    fn test_slot_filter_is_exact() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.toggle_slot(Slot::NextWeek);
        assert_eq!(evaluate(catalog.mentors(), &criteria).ids(), vec![1, 4]);
    }

    #[test]
    fn test_rating_sort_is_stable_for_ties() {
        let mentors = vec![
            mentor(1, "A", "se-sde", "faang", "anytime", 4.0),
            mentor(2, "B", "se-sde", "faang", "anytime", 5.0),
            mentor(3, "C", "se-sde", "faang", "anytime", 4.0),
            mentor(4, "D", "se-sde", "faang", "anytime", 5.0),
            mentor(5, "E", "se-sde", "faang", "anytime", 4.0),
        ];
        let mut criteria = FilterCriteria::new();
        criteria.toggle_rating_sort(RatingSort::HighToLow);
        assert_eq!(evaluate(&mentors, &criteria).ids(), vec![2, 4, 1, 3, 5]);

        criteria.toggle_rating_sort(RatingSort::LowToHigh);
        assert_eq!(evaluate(&mentors, &criteria).ids(), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_sort_never_removes_records() {
        let catalog = Catalog::sample().unwrap();
        let mut criteria = FilterCriteria::new();
        criteria.toggle_rating_sort(RatingSort::HighToLow);
        assert_eq!(evaluate(catalog.mentors(), &criteria).ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_out_of_vocabulary_records_only_visible_unfiltered() {
        let mentors = vec![
            mentor(1, "Known", "se-sde", "faang", "anytime", 4.0),
            mentor(2, "Odd", "astronaut", "space", "someday", 4.0),
        ];

        assert_eq!(evaluate(&mentors, &FilterCriteria::new()).ids(), vec![1, 2]);

        for role in Role::ALL {
            let mut criteria = FilterCriteria::new();
            criteria.toggle_role(*role);
            assert!(!evaluate(&mentors, &criteria).ids().contains(&2));
        }
        let mut criteria = FilterCriteria::new();
        criteria.toggle_slot(Slot::Anytime);
        assert_eq!(evaluate(&mentors, &criteria).ids(), vec![1]);
    }
}
