/// Minimum length of feedback text after trimming
pub const MIN_FEEDBACK_CHARS: usize = 5;

// =============================================================================
// Sheet Names & Headers
// =============================================================================

pub const WAITLIST_SHEET: &str = "Waitlist";
pub const FEEDBACK_SHEET: &str = "Feedback";
pub const ONBOARDING_SHEET: &str = "Onboarding";

pub const WAITLIST_HEADER: [&str; 2] = ["Email", "Timestamp"];
pub const FEEDBACK_HEADER: [&str; 3] = ["Email", "Feedback", "Timestamp"];
pub const ONBOARDING_HEADER: [&str; 10] = [
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "ABN",
    "Address",
    "Experience",
    "Qualifications",
    "Availability",
    "Timestamp",
];

/// First-cell value that marks a connectivity test row in a catch-all sheet
pub const TEST_ROW_MARKER: &str = "test";

/// Prefix (lowercase) of longer connectivity test markers, e.g. "Test connection 2024-05-01"
pub const TEST_ROW_PREFIX: &str = "test connection";

// =============================================================================
// Redirects
// =============================================================================

pub const WAITLIST_REDIRECT: &str = "/thank-you/waitlist";
pub const FEEDBACK_REDIRECT: &str = "/thank-you/feedback";
pub const ONBOARDING_REDIRECT: &str = "/thank-you/onboarding";

// =============================================================================
// Google API
// =============================================================================

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Lifetime requested for service-account assertions (seconds)
pub const JWT_LIFETIME_SECS: i64 = 3600;

/// Refresh cached access tokens this many seconds before they expire
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

// =============================================================================
// Messages
// =============================================================================

pub const MSG_WAITLIST_JOINED: &str = "You're on the waitlist! We'll be in touch soon.";
pub const MSG_FEEDBACK_RECEIVED: &str = "Thank you for your feedback!";
pub const MSG_ONBOARDING_RECEIVED: &str = "Application received. We'll review it shortly.";
pub const MSG_ALREADY_ON_WAITLIST: &str = "This email is already on the waitlist.";

pub const ERR_EMAIL_REQUIRED: &str = "Email is required";
pub const ERR_EMAIL_INVALID: &str = "Please enter a valid email address";
pub const ERR_FEEDBACK_TOO_SHORT: &str = "Feedback must be at least 5 characters";
