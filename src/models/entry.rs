use serde::{Deserialize, Serialize};

use super::Category;

/// Waitlist sign-up, unique by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub email: String,
    pub timestamp: String,
}

/// Free-text feedback from a site visitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub email: String,
    pub feedback: String,
    pub timestamp: String,
}

/// Application submitted through the carer onboarding wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub abn: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifications: Option<String>,
    pub availability: String,
    pub timestamp: String,
}

/// A stored record of any category
///
/// Serializes as the bare inner entry, so a JSON table holds plain objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Waitlist(WaitlistEntry),
    Feedback(FeedbackEntry),
    Onboarding(OnboardingApplication),
}

impl Record {
    pub fn category(&self) -> Category {
        match self {
            Record::Waitlist(_) => Category::Waitlist,
            Record::Feedback(_) => Category::Feedback,
            Record::Onboarding(_) => Category::Onboarding,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Record::Waitlist(e) => &e.email,
            Record::Feedback(e) => &e.email,
            Record::Onboarding(e) => &e.email,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Record::Waitlist(e) => &e.timestamp,
            Record::Feedback(e) => &e.timestamp,
            Record::Onboarding(e) => &e.timestamp,
        }
    }

    /// Cells in the column order of `Category::header`
    pub fn to_row(&self) -> Vec<String> {
        match self {
            Record::Waitlist(e) => vec![e.email.clone(), e.timestamp.clone()],
            Record::Feedback(e) => vec![e.email.clone(), e.feedback.clone(), e.timestamp.clone()],
            Record::Onboarding(e) => vec![
                e.first_name.clone(),
                e.last_name.clone(),
                e.email.clone(),
                e.phone.clone(),
                e.abn.clone(),
                e.address.clone(),
                e.experience.clone().unwrap_or_default(),
                e.qualifications.clone().unwrap_or_default(),
                e.availability.clone(),
                e.timestamp.clone(),
            ],
        }
    }

    /// Rebuild a record from a typed sheet row
    ///
    /// Short rows are padded with empty cells; rows without an email are skipped.
    pub fn from_row(category: Category, row: &[String]) -> Option<Record> {
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        let optional = |i: usize| row.get(i).filter(|c| !c.is_empty()).cloned();

        let record = match category {
            Category::Waitlist => Record::Waitlist(WaitlistEntry {
                email: cell(0),
                timestamp: cell(1),
            }),
            Category::Feedback => Record::Feedback(FeedbackEntry {
                email: cell(0),
                feedback: cell(1),
                timestamp: cell(2),
            }),
            Category::Onboarding => Record::Onboarding(OnboardingApplication {
                first_name: cell(0),
                last_name: cell(1),
                email: cell(2),
                phone: cell(3),
                abn: cell(4),
                address: cell(5),
                experience: optional(6),
                qualifications: optional(7),
                availability: cell(8),
                timestamp: cell(9),
            }),
        };

        if record.email().trim().is_empty() {
            return None;
        }
        Some(record)
    }

    /// Parse a whole JSON table for one category
    pub fn parse_table(category: Category, json: &str) -> serde_json::Result<Vec<Record>> {
        Ok(match category {
            Category::Waitlist => serde_json::from_str::<Vec<WaitlistEntry>>(json)?
                .into_iter()
                .map(Record::Waitlist)
                .collect(),
            Category::Feedback => serde_json::from_str::<Vec<FeedbackEntry>>(json)?
                .into_iter()
                .map(Record::Feedback)
                .collect(),
            Category::Onboarding => serde_json::from_str::<Vec<OnboardingApplication>>(json)?
                .into_iter()
                .map(Record::Onboarding)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_record_serializes_untagged() {
        let record = Record::Feedback(FeedbackEntry {
            email: "a@b.com".to_string(),
            feedback: "Great service".to_string(),
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["feedback"], "Great service");
        assert!(json.get("Feedback").is_none());
    }

    #[test]
    fn test_onboarding_uses_camel_case() {
        let json = r#"[{
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "phone": "0400 000 000",
            "abn": "51 824 753 556",
            "address": "1 Example St",
            "availability": "Weekdays",
            "timestamp": "2024-05-01T10:00:00.000Z"
        }]"#;

        let records = Record::parse_table(Category::Onboarding, json).unwrap();
        assert_eq!(records.len(), 1);
        match &records[0] {
            Record::Onboarding(app) => {
                assert_eq!(app.first_name, "Ada");
                assert!(app.experience.is_none());
            }
            other => panic!("unexpected record: {:?}", other),
        }

        let out = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(out["lastName"], "Lovelace");
        assert!(out.get("experience").is_none());
    }

    #[test]
    fn test_row_roundtrip_pads_short_rows() {
        let record = Record::from_row(Category::Feedback, &strings(&["a@b.com", "Nice"])).unwrap();
        assert_eq!(record.timestamp(), "");
        assert_eq!(record.to_row(), strings(&["a@b.com", "Nice", ""]));
    }

    #[test]
    fn test_row_without_email_is_skipped() {
        assert!(Record::from_row(Category::Waitlist, &strings(&["", "2024"])).is_none());
        assert!(Record::from_row(Category::Waitlist, &[]).is_none());
    }

    #[test]
    fn test_onboarding_row_order_matches_header() {
        let row = strings(&[
            "Ada", "Lovelace", "ada@example.com", "0400", "123", "1 St", "", "Cert III", "Weekends",
            "2024-05-01T10:00:00.000Z",
        ]);
        let record = Record::from_row(Category::Onboarding, &row).unwrap();
        assert_eq!(record.email(), "ada@example.com");
        assert_eq!(record.to_row(), row);
        assert_eq!(record.to_row().len(), Category::Onboarding.header().len());
    }
}
