use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorRecord {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub company: String,
    pub bio: String,
    pub role: String,         // "se-sde", "ds-ai-ml", "product", "design", "devops"
    pub company_type: String, // "faang", "startups", "mncs", "others"
    pub availability: String, // "this-week", "next-week", "anytime"
    pub rating: f64,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub sessions: u32,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

impl MentorRecord {
    pub fn service(&self, id: i64) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub rating: f64,
    pub content: String,
    /// `None` for anonymous reviewers.
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Price in whole rupees.
    pub amount: u32,
    #[serde(flatten)]
    pub kind: ServiceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServiceKind {
    #[serde(rename = "call")]
    Call { duration_minutes: u32 },
    #[serde(rename = "dm")]
    PriorityDm { reply_within_days: u32 },
    #[serde(rename = "package")]
    Package { duration: String },
    #[serde(rename = "webinar")]
    Webinar { date: NaiveDate },
    #[serde(rename = "product")]
    DigitalProduct { thumbnail: Thumbnail },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub title: String,
    pub description: String,
}

impl ServiceKind {
    pub fn type_label(&self) -> &'static str {
        match self {
            ServiceKind::Call { .. } => "1:1 call",
            ServiceKind::PriorityDm { .. } => "Priority DM",
            ServiceKind::Package { .. } => "Package",
            ServiceKind::Webinar { .. } => "Webinar",
            ServiceKind::DigitalProduct { .. } => "Digital product",
        }
    }

    pub fn detail_label(&self) -> String {
        match self {
            ServiceKind::Call { duration_minutes } => format!("{} min", duration_minutes),
            ServiceKind::PriorityDm { reply_within_days: 1 } => "In 1 day".to_string(),
            ServiceKind::PriorityDm { reply_within_days } => format!("In {} days", reply_within_days),
            ServiceKind::Package { duration } => duration.clone(),
            ServiceKind::Webinar { date } => format!(
                "On {}{} {}",
                date.day(),
                ordinal_suffix(date.day()),
                date.format("%b")
            ),
            ServiceKind::DigitalProduct { thumbnail } => thumbnail.title.clone(),
        }
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

// --- Facet vocabularies ---
//
// Vocabularies are fixed; they are never derived from the catalog.

macro_rules! vocabulary {
    ($name:ident, $kind:literal, { $($variant:ident => ($value:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_value(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                let value = s.trim().to_lowercase();
                Self::from_value(&value).ok_or_else(|| {
                    let known: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                    unknown_value_error($kind, s, &known)
                })
            }
        }
    };
}

vocabulary!(Role, "role", {
    SeSde => ("se-sde", "SE/SDE"),
    DsAiMl => ("ds-ai-ml", "DS/AI/ML"),
    Product => ("product", "Product Management"),
    Design => ("design", "Design"),
    DevOps => ("devops", "DevOps/Cloud"),
});

vocabulary!(CompanyType, "company type", {
    Faang => ("faang", "FAANG"),
    Startups => ("startups", "Startups"),
    Mncs => ("mncs", "MNCs"),
    Others => ("others", "Others"),
});

vocabulary!(Slot, "slot", {
    ThisWeek => ("this-week", "This week"),
    NextWeek => ("next-week", "Next week"),
    Anytime => ("anytime", "Anytime"),
});

vocabulary!(RatingSort, "rating sort", {
    LowToHigh => ("low-to-high", "Low to high"),
    HighToLow => ("high-to-low", "High to low"),
});

fn unknown_value_error(kind: &str, input: &str, known: &[&str]) -> anyhow::Error {
    match closest_match(input, known) {
        Some(guess) => anyhow!(
            "Unknown {} '{}'. Did you mean '{}'? Available: {}",
            kind,
            input,
            guess,
            known.join(", ")
        ),
        None => anyhow!("Unknown {} '{}'. Available: {}", kind, input, known.join(", ")),
    }
}

/// Closest candidate by Jaro-Winkler similarity, if any is reasonably close.
pub fn closest_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input = input.trim().to_lowercase();
    candidates
        .iter()
        .map(|c| (*c, strsim::jaro_winkler(&input, c)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_round_trip_values() {
        for role in Role::ALL {
            assert_eq!(Role::from_value(role.as_str()), Some(*role));
        }
        assert_eq!("FAANG".parse::<CompanyType>().unwrap(), CompanyType::Faang);
        assert_eq!(" anytime ".parse::<Slot>().unwrap(), Slot::Anytime);
        assert_eq!(RatingSort::HighToLow.label(), "High to low");
    }

    #[test]
    fn test_unknown_value_suggests_closest() {
        let err = "se-sdee".parse::<Role>().unwrap_err().to_string();
        assert!(err.contains("Did you mean 'se-sde'"));

        let err = "qqqq".parse::<Slot>().unwrap_err().to_string();
        assert!(!err.contains("Did you mean"));
        assert!(err.contains("this-week, next-week, anytime"));
    }

    #[test]
    fn test_service_kind_labels() {
        let call = ServiceKind::Call { duration_minutes: 30 };
        assert_eq!(call.type_label(), "1:1 call");
        assert_eq!(call.detail_label(), "30 min");

        let dm = ServiceKind::PriorityDm { reply_within_days: 1 };
        assert_eq!(dm.detail_label(), "In 1 day");

        let webinar = ServiceKind::Webinar {
            date: NaiveDate::from_ymd_opt(2025, 10, 28).unwrap(),
        };
        assert_eq!(webinar.detail_label(), "On 28th Oct");

        let webinar = ServiceKind::Webinar {
            date: NaiveDate::from_ymd_opt(2025, 11, 22).unwrap(),
        };
        assert_eq!(webinar.detail_label(), "On 22nd Nov");
    }

    #[test]
    fn test_service_deserializes_tagged_kind() {
        let json = r#"{
            "id": 2,
            "title": "Resume Review",
            "description": "I'll refine your resume.",
            "amount": 100,
            "type": "dm",
            "replyWithinDays": 1
        }"#;
        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.kind, ServiceKind::PriorityDm { reply_within_days: 1 });

        let json = r#"{
            "id": 4,
            "title": "Interview tips",
            "description": "Webinar",
            "amount": 1000,
            "type": "webinar",
            "date": "2025-10-28"
        }"#;
        let service: Service = serde_json::from_str(json).unwrap();
        assert!(matches!(service.kind, ServiceKind::Webinar { .. }));
    }
}
