use serde::Deserialize;

use super::{Category, FeedbackEntry, OnboardingApplication, Record, WaitlistEntry};
use crate::constants::*;
use crate::error::{AppError, Result};

/// Onboarding wizard fields as they arrive from the client
///
/// Every field is optional here so that missing values surface as
/// validation messages instead of extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub abn: Option<String>,
    pub address: Option<String>,
    pub experience: Option<String>,
    pub qualifications: Option<String>,
    pub availability: Option<String>,
}

/// Untrusted input for `store::append`
#[derive(Debug, Clone)]
pub enum Submission {
    Waitlist { email: Option<String> },
    Feedback { email: Option<String>, feedback: Option<String> },
    Onboarding(OnboardingForm),
}

impl Submission {
    pub fn category(&self) -> Category {
        match self {
            Submission::Waitlist { .. } => Category::Waitlist,
            Submission::Feedback { .. } => Category::Feedback,
            Submission::Onboarding(_) => Category::Onboarding,
        }
    }

    /// Validate the input and stamp it with the server-assigned timestamp
    pub fn into_record(self, timestamp: String) -> Result<Record> {
        match self {
            Submission::Waitlist { email } => Ok(Record::Waitlist(WaitlistEntry {
                email: validate_email(email)?,
                timestamp,
            })),
            Submission::Feedback { email, feedback } => {
                let email = validate_email(email)?;
                let feedback = feedback.unwrap_or_default().trim().to_string();
                if feedback.chars().count() < MIN_FEEDBACK_CHARS {
                    return Err(AppError::InvalidInput(ERR_FEEDBACK_TOO_SHORT.to_string()));
                }
                Ok(Record::Feedback(FeedbackEntry {
                    email,
                    feedback,
                    timestamp,
                }))
            }
            Submission::Onboarding(form) => Ok(Record::Onboarding(OnboardingApplication {
                first_name: required("First name", form.first_name)?,
                last_name: required("Last name", form.last_name)?,
                email: validate_email(form.email)?,
                phone: required("Phone", form.phone)?,
                abn: required("ABN", form.abn)?,
                address: required("Address", form.address)?,
                experience: optional(form.experience),
                qualifications: optional(form.qualifications),
                availability: required("Availability", form.availability)?,
                timestamp,
            })),
        }
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!("{} is required", field))),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim and sanity-check an email address (`local@domain.tld`)
pub fn validate_email(value: Option<String>) -> Result<String> {
    let email = value.unwrap_or_default().trim().to_string();
    if email.is_empty() {
        return Err(AppError::InvalidInput(ERR_EMAIL_REQUIRED.to_string()));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::InvalidInput(ERR_EMAIL_INVALID.to_string()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2024-05-01T10:00:00.000Z";

    fn feedback(text: &str) -> Submission {
        Submission::Feedback {
            email: Some("a@b.com".to_string()),
            feedback: Some(text.to_string()),
        }
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(Some("  a@b.com ".to_string())).unwrap(),
            "a@b.com"
        );
        assert!(validate_email(None).is_err());
        assert!(validate_email(Some("   ".to_string())).is_err());
        assert!(validate_email(Some("no-at-sign".to_string())).is_err());
        assert!(validate_email(Some("@b.com".to_string())).is_err());
        assert!(validate_email(Some("a@b".to_string())).is_err());
        assert!(validate_email(Some("a@@b.com".to_string())).is_err());
        assert!(validate_email(Some("a b@c.com".to_string())).is_err());
    }

    #[test]
    fn test_feedback_minimum_length() {
        // Exactly five characters after trimming is accepted
        let record = feedback("  abcde  ").into_record(TS.to_string()).unwrap();
        match record {
            Record::Feedback(entry) => assert_eq!(entry.feedback, "abcde"),
            other => panic!("unexpected record: {:?}", other),
        }

        // Four characters padded with whitespace is rejected
        let err = feedback("   abcd    ").into_record(TS.to_string()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == ERR_FEEDBACK_TOO_SHORT));

        let missing = Submission::Feedback {
            email: Some("a@b.com".to_string()),
            feedback: None,
        };
        assert!(missing.into_record(TS.to_string()).is_err());
    }

    #[test]
    fn test_waitlist_record_uses_given_timestamp() {
        let record = Submission::Waitlist {
            email: Some("new@example.com".to_string()),
        }
        .into_record(TS.to_string())
        .unwrap();

        assert_eq!(record.email(), "new@example.com");
        assert_eq!(record.timestamp(), TS);
    }

    #[test]
    fn test_onboarding_required_fields() {
        let mut form = OnboardingForm {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("0400 000 000".to_string()),
            abn: Some("51 824 753 556".to_string()),
            address: Some("1 Example St".to_string()),
            experience: Some("   ".to_string()),
            qualifications: None,
            availability: Some("Weekdays".to_string()),
        };

        let record = Submission::Onboarding(form.clone())
            .into_record(TS.to_string())
            .unwrap();
        match record {
            Record::Onboarding(app) => {
                assert_eq!(app.first_name, "Ada");
                assert!(app.experience.is_none());
                assert!(app.qualifications.is_none());
            }
            other => panic!("unexpected record: {:?}", other),
        }

        form.abn = Some("".to_string());
        let err = Submission::Onboarding(form)
            .into_record(TS.to_string())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "ABN is required"));
    }
}
