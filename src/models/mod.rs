pub mod category;
pub mod entry;
pub mod legacy;
pub mod submission;

pub use category::Category;
pub use entry::{FeedbackEntry, OnboardingApplication, Record, WaitlistEntry};
pub use legacy::{classify_row, is_blank, is_test_row, Classified};
pub use submission::{OnboardingForm, Submission};

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a timestamp as ISO-8601 UTC with millisecond precision (`...T08:15:30.123Z`)
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Server-assigned timestamp for a record written now
pub fn timestamp_now() -> String {
    iso_timestamp(Utc::now())
}
