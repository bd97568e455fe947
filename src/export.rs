//! CSV export of stored form records.

use crate::error::{AppError, Result};
use crate::models::{Category, Record};
use crate::store::RecordStore;

/// Quote a CSV field, doubling embedded quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Render records as CSV: bare header, every data field quoted, `\n` line ends
pub fn render_csv(category: Category, records: &[Record]) -> String {
    let mut out = category.header().join(",");
    out.push('\n');

    for record in records.iter().filter(|r| r.category() == category) {
        let fields: Vec<String> = record.to_row().iter().map(|f| quote(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Export every waitlist or feedback record as CSV
pub async fn export(store: &dyn RecordStore, category: Category) -> Result<String> {
    if !category.is_form_category() {
        return Err(AppError::InvalidCategory(category.to_string()));
    }

    if !store.table_exists(category).await? {
        return Err(AppError::NotFound(format!("No {} data found", category)));
    }

    let records = store.list_all(category).await?;
    if records.is_empty() {
        return Err(AppError::NotFound(format!("No {} data found", category)));
    }

    tracing::info!("Exporting {} {} records", records.len(), category);
    Ok(render_csv(category, &records))
}
