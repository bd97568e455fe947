//! Heuristic classification of untyped rows found in catch-all sheets.
//!
//! Older versions of the site wrote every submission into the spreadsheet's
//! default sheet with one of these shapes:
//!
//! | cells | layout                                  | kind     |
//! |-------|-----------------------------------------|----------|
//! | 2     | `email, timestamp`                      | waitlist |
//! | 3     | `email, feedback, timestamp`            | feedback |
//! | 3     | `email, "waitlist", timestamp`          | waitlist |
//! | 4     | `email, "feedback", feedback, timestamp`| feedback |
//!
//! A literal tag in the second cell wins; otherwise the width decides. A bare
//! feedback row whose text is exactly "waitlist" is therefore read as a
//! waitlist entry. The rule is kept as-is.

use super::{FeedbackEntry, WaitlistEntry};
use crate::constants::{TEST_ROW_MARKER, TEST_ROW_PREFIX};

/// Destination of a legacy row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Waitlist(WaitlistEntry),
    Feedback(FeedbackEntry),
}

/// Whether the row's first cell marks a connectivity test record
pub fn is_test_row(row: &[String]) -> bool {
    match row.first() {
        Some(cell) => {
            let cell = cell.trim().to_ascii_lowercase();
            cell == TEST_ROW_MARKER || cell.starts_with(TEST_ROW_PREFIX)
        }
        None => false,
    }
}

pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Classify a legacy row, filling a missing timestamp with `now`
///
/// Returns a human-readable message when the row cannot be moved.
pub fn classify_row(row: &[String], now: &str) -> Result<Classified, String> {
    let cell = |i: usize| row.get(i).map(|c| c.trim()).unwrap_or("");
    let timestamp = |i: usize| {
        let value = cell(i);
        if value.is_empty() {
            now.to_string()
        } else {
            value.to_string()
        }
    };

    let email = cell(0);
    if email.is_empty() {
        return Err("missing email in first column".to_string());
    }

    let tag = cell(1).to_ascii_lowercase();
    let is_feedback = match tag.as_str() {
        "waitlist" => false,
        "feedback" => true,
        _ => row.len() >= 3,
    };
    let tagged = tag == "waitlist" || tag == "feedback";
    // Columns after the tag shift right by one
    let offset = if tagged { 2 } else { 1 };

    if is_feedback {
        let feedback = cell(offset);
        if feedback.is_empty() {
            return Err("missing feedback text".to_string());
        }
        Ok(Classified::Feedback(FeedbackEntry {
            email: email.to_string(),
            feedback: feedback.to_string(),
            timestamp: timestamp(offset + 1),
        }))
    } else {
        Ok(Classified::Waitlist(WaitlistEntry {
            email: email.to_string(),
            timestamp: timestamp(offset),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2024-06-01T00:00:00.000Z";

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn waitlist(email: &str, timestamp: &str) -> Classified {
        Classified::Waitlist(WaitlistEntry {
            email: email.to_string(),
            timestamp: timestamp.to_string(),
        })
    }

    fn feedback(email: &str, text: &str, timestamp: &str) -> Classified {
        Classified::Feedback(FeedbackEntry {
            email: email.to_string(),
            feedback: text.to_string(),
            timestamp: timestamp.to_string(),
        })
    }

    #[test]
    fn test_two_columns_is_waitlist() {
        assert_eq!(
            classify_row(&row(&["a@b.com", "2024-01-01"]), NOW).unwrap(),
            waitlist("a@b.com", "2024-01-01")
        );
    }

    #[test]
    fn test_three_columns_is_feedback() {
        assert_eq!(
            classify_row(&row(&["a@b.com", "Lovely carers", "2024-01-01"]), NOW).unwrap(),
            feedback("a@b.com", "Lovely carers", "2024-01-01")
        );
    }

    #[test]
    fn test_tag_overrides_width() {
        assert_eq!(
            classify_row(&row(&["a@b.com", "waitlist", "2024-01-01"]), NOW).unwrap(),
            waitlist("a@b.com", "2024-01-01")
        );
        assert_eq!(
            classify_row(&row(&["a@b.com", "Feedback", "Quick replies", "2024-01-02"]), NOW)
                .unwrap(),
            feedback("a@b.com", "Quick replies", "2024-01-02")
        );
        // Tagged feedback with only three cells still reads text positionally
        assert_eq!(
            classify_row(&row(&["a@b.com", "feedback", "Quick replies"]), NOW).unwrap(),
            feedback("a@b.com", "Quick replies", NOW)
        );
    }

    #[test]
    fn test_feedback_text_equal_to_tag_is_read_as_waitlist() {
        // Indistinguishable from a tagged waitlist row; the tag wins
        assert_eq!(
            classify_row(&row(&["a@b.com", "waitlist", "2024-01-01"]), NOW).unwrap(),
            waitlist("a@b.com", "2024-01-01")
        );
    }

    #[test]
    fn test_missing_timestamp_uses_now() {
        assert_eq!(
            classify_row(&row(&["a@b.com"]), NOW).unwrap(),
            waitlist("a@b.com", NOW)
        );
        assert_eq!(
            classify_row(&row(&["a@b.com", "Great help", ""]), NOW).unwrap(),
            feedback("a@b.com", "Great help", NOW)
        );
    }

    #[test]
    fn test_unusable_rows() {
        assert!(classify_row(&row(&["", "2024-01-01"]), NOW).is_err());
        assert!(classify_row(&row(&["a@b.com", "feedback", ""]), NOW).is_err());
        assert!(classify_row(&row(&["a@b.com", "", "2024-01-01"]), NOW).is_err());
    }

    #[test]
    fn test_connectivity_rows() {
        assert!(is_test_row(&row(&["TEST", "2024-01-01"])));
        assert!(is_test_row(&row(&[" test "])));
        assert!(is_test_row(&row(&["Test connection 2024-01-01"])));
        assert!(!is_test_row(&row(&["tester@example.com", "2024-01-01"])));
        assert!(!is_test_row(&[]));
    }

    #[test]
    fn test_blank_rows() {
        assert!(is_blank(&[]));
        assert!(is_blank(&row(&["", "  "])));
        assert!(!is_blank(&row(&["", "x"])));
    }
}
