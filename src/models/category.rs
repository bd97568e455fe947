use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::error::AppError;

/// Record kind, determining which backing table a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Waitlist,
    Feedback,
    Onboarding,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Waitlist, Category::Feedback, Category::Onboarding];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Waitlist => "waitlist",
            Category::Feedback => "feedback",
            Category::Onboarding => "onboarding",
        }
    }

    /// Position in `Category::ALL`, used to index per-category state
    pub fn index(self) -> usize {
        match self {
            Category::Waitlist => 0,
            Category::Feedback => 1,
            Category::Onboarding => 2,
        }
    }

    pub fn sheet_name(self) -> &'static str {
        match self {
            Category::Waitlist => WAITLIST_SHEET,
            Category::Feedback => FEEDBACK_SHEET,
            Category::Onboarding => ONBOARDING_SHEET,
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Column headers, in storage order
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Category::Waitlist => &WAITLIST_HEADER,
            Category::Feedback => &FEEDBACK_HEADER,
            Category::Onboarding => &ONBOARDING_HEADER,
        }
    }

    pub fn redirect_url(self) -> &'static str {
        match self {
            Category::Waitlist => WAITLIST_REDIRECT,
            Category::Feedback => FEEDBACK_REDIRECT,
            Category::Onboarding => ONBOARDING_REDIRECT,
        }
    }

    /// Whether this category is accepted by the submit and export endpoints
    pub fn is_form_category(self) -> bool {
        matches!(self, Category::Waitlist | Category::Feedback)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "waitlist" => Ok(Category::Waitlist),
            "feedback" => Ok(Category::Feedback),
            "onboarding" => Ok(Category::Onboarding),
            other => Err(AppError::InvalidCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!("waitlist".parse::<Category>().unwrap(), Category::Waitlist);
        assert_eq!(" feedback ".parse::<Category>().unwrap(), Category::Feedback);
        assert_eq!("onboarding".parse::<Category>().unwrap(), Category::Onboarding);

        let err = "newsletter".parse::<Category>().unwrap_err();
        assert!(matches!(err, AppError::InvalidCategory(ref c) if c == "newsletter"));

        // Tags are case-sensitive on the wire
        assert!("Waitlist".parse::<Category>().is_err());
    }

    #[test]
    fn test_index_matches_all() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_form_categories() {
        assert!(Category::Waitlist.is_form_category());
        assert!(Category::Feedback.is_form_category());
        assert!(!Category::Onboarding.is_form_category());
    }
}
