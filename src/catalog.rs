use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::models::{CompanyType, MentorRecord, Role, Slot};

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

/// Read-only, ordered set of mentors. Cloning shares the same records.
#[derive(Debug, Clone)]
pub struct Catalog {
    mentors: Arc<[MentorRecord]>,
}

#[derive(Deserialize)]
struct CatalogFile {
    mentors: Vec<MentorRecord>,
}

/// A record field whose value lies outside the fixed filter vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyWarning {
    pub mentor_id: i64,
    pub field: &'static str,
    pub value: String,
}

impl Catalog {
    pub fn new(mentors: Vec<MentorRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for mentor in &mentors {
            if mentor.id <= 0 {
                return Err(CatalogError::InvalidId(mentor.id));
            }
            if !seen.insert(mentor.id) {
                return Err(CatalogError::DuplicateId(mentor.id));
            }
            if !(0.0..=5.0).contains(&mentor.rating) {
                return Err(CatalogError::RatingOutOfRange {
                    id: mentor.id,
                    rating: mentor.rating,
                });
            }
        }

        let catalog = Self {
            mentors: mentors.into(),
        };
        for w in catalog.vocabulary_warnings() {
            warn!(
                mentor_id = w.mentor_id,
                field = w.field,
                value = %w.value,
                "value outside filter vocabulary; mentor is unreachable by that filter"
            );
        }
        Ok(catalog)
    }

    /// Accepts `{"mentors": [...]}` or a bare array. Errors keep serde's line
    /// and column of the offending record.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let mentors = if raw.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<MentorRecord>>(raw)?
        } else {
            serde_json::from_str::<CatalogFile>(raw)?.mentors
        };
        Self::new(mentors)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), mentors = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Built-in sample mentors shipped with the binary.
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_CATALOG).context("Built-in sample catalog is invalid")
    }

    /// Loads the catalog at `path`, or the sample catalog when no path is configured.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p)
                .with_context(|| format!("Failed to open catalog {}", p.display())),
            None => Self::sample(),
        }
    }

    pub fn mentors(&self) -> &[MentorRecord] {
        &self.mentors
    }

    pub fn get(&self, id: i64) -> Option<&MentorRecord> {
        self.mentors.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.mentors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentors.is_empty()
    }

    pub fn vocabulary_warnings(&self) -> Vec<VocabularyWarning> {
        let mut warnings = Vec::new();
        for m in self.mentors.iter() {
            if Role::from_value(&m.role).is_none() {
                warnings.push(VocabularyWarning {
                    mentor_id: m.id,
                    field: "role",
                    value: m.role.clone(),
                });
            }
            if CompanyType::from_value(&m.company_type).is_none() {
                warnings.push(VocabularyWarning {
                    mentor_id: m.id,
                    field: "companyType",
                    value: m.company_type.clone(),
                });
            }
            if Slot::from_value(&m.availability).is_none() {
                warnings.push(VocabularyWarning {
                    mentor_id: m.id,
                    field: "availability",
                    value: m.availability.clone(),
                });
            }
        }
        warnings
    }
}

#[cfg(test)]
pub(crate) fn mentor(id: i64, name: &str, role: &str, company_type: &str, slot: &str, rating: f64) -> MentorRecord {
    MentorRecord {
        id,
        name: name.to_string(),
        title: "Engineer".to_string(),
        company: format!("Company {}", id),
        bio: String::new(),
        role: role.to_string(),
        company_type: company_type.to_string(),
        availability: slot.to_string(),
        rating,
        is_verified: false,
        reviews: 0,
        sessions: 0,
        services: Vec::new(),
        testimonials: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_loads_in_order() {
        let catalog = Catalog::sample().unwrap();
        let names: Vec<&str> = catalog.mentors().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Jonny Rose", "Dev Jain", "Rishi Mehta", "Heet Mistry"]);
        assert!(catalog.vocabulary_warnings().is_empty());
        assert_eq!(catalog.get(1).unwrap().services.len(), 5);
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn test_clones_share_records() {
        let catalog = Catalog::sample().unwrap();
        let other = catalog.clone();
        assert!(std::ptr::eq(catalog.mentors(), other.mentors()));
    }

    #[test]
    fn test_bare_array_is_accepted() {
        let json = r#"[{
            "id": 7, "name": "A", "title": "T", "company": "C", "bio": "",
            "role": "design", "companyType": "others", "availability": "anytime",
            "rating": 3.5
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(7).unwrap().reviews, 0);
    }

    #[test]
    fn test_malformed_record_error_names_field_and_line() {
        let json = r#"{"mentors": [
  {"id": 1, "name": "A", "title": "T", "company": "C",
   "bio": "", "role": "design", "companyType": "others",
   "availability": "anytime"}
]}"#;
        let err = Catalog::from_json(json).unwrap_err().to_string();
        assert!(err.contains("missing field `rating`"), "{}", err);
        assert!(err.contains("line 4"), "{}", err);

        let bare = r#"[
  {"id": "seven"}
]"#;
        let err = Catalog::from_json(bare).unwrap_err().to_string();
        assert!(err.contains("invalid type"), "{}", err);
        assert!(err.contains("line 2"), "{}", err);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            mentor(1, "A", "se-sde", "faang", "anytime", 4.0),
            mentor(1, "B", "se-sde", "faang", "anytime", 4.0),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn test_invalid_id_and_rating_rejected() {
        let result = Catalog::new(vec![mentor(0, "A", "se-sde", "faang", "anytime", 4.0)]);
        assert!(matches!(result, Err(CatalogError::InvalidId(0))));

        let result = Catalog::new(vec![mentor(1, "A", "se-sde", "faang", "anytime", 5.5)]);
        assert!(matches!(result, Err(CatalogError::RatingOutOfRange { id: 1, .. })));
    }

    #[test]
    fn test_out_of_vocabulary_values_are_kept_and_reported() {
        let catalog = Catalog::new(vec![
            mentor(1, "A", "astronaut", "faang", "someday", 4.0),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 1);

        let fields: Vec<&str> = catalog.vocabulary_warnings().iter().map(|w| w.field).collect();
        assert_eq!(fields, ["role", "availability"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, SAMPLE_CATALOG).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 4);

        let missing = Catalog::load(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(CatalogError::Io { .. })));
    }
}
