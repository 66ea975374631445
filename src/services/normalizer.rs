use std::collections::HashSet;
use crate::error::AppError;
use crate::models::Dataset;
use crate::services::excel::utils::unique_column_name;

/// Trims header whitespace. Rows are left untouched.
pub fn normalize_columns(mut dataset: Dataset) -> Result<Dataset, AppError> {
    let mut existing_names = HashSet::new();
    let trimmed: Vec<String> = dataset
        .frame
        .get_column_names()
        .iter()
        .enumerate()
        .map(|(idx, name)| unique_column_name(name.trim(), idx, &mut existing_names))
        .collect();

    dataset.frame.set_column_names(&trimmed)?;
    tracing::debug!("Normalized columns: {:?}", trimmed);
    Ok(dataset)
}
