pub mod admin;
pub mod export;
pub mod health;
pub mod onboarding;
pub mod organize;
pub mod submit;

pub use admin::admin_stats;
pub use export::export_records;
pub use health::health_check;
pub use onboarding::{onboarding_get, onboarding_post};
pub use organize::organize_sheets;
pub use submit::{submit, SubmitResponse};
