use std::collections::HashSet;
use std::io::Cursor;
use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use polars::prelude::*;
use crate::error::AppError;
use crate::models::Dataset;
use super::types::ColumnKind;
use super::utils::{cell_to_f64, cell_to_text, detect_column_type, unique_column_name};

/// Decodes one named sheet of an xlsx payload into a [`Dataset`].
pub fn read_sheet(file_data: Bytes, sheet_name: &str) -> Result<Dataset, AppError> {
    let start = std::time::Instant::now();
    let cursor = Cursor::new(file_data);

    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e| {
            tracing::error!("Failed to open Excel file: {}", e);
            AppError::FileProcessingError(format!("Failed to open Excel file: {}", e))
        })?;

    let sheet_names = workbook.sheet_names().to_vec();
    if !sheet_names.iter().any(|name| name == sheet_name) {
        return Err(AppError::FileProcessingError(format!(
            "Sheet {} not found, available sheets: {:?}",
            sheet_name, sheet_names
        )));
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| AppError::FileProcessingError(format!("Failed to read worksheet {}: {}", sheet_name, e)))?;
    let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();

    let frame = create_dataframe(&rows)?;
    tracing::info!(
        "Read sheet {} ({} rows x {} columns) in {:?}",
        sheet_name,
        frame.height(),
        frame.width(),
        start.elapsed()
    );

    Ok(Dataset::new(frame, sheet_name))
}

/// First row is the header. Fully empty rows are dropped.
pub fn create_dataframe(rows: &[Vec<Data>]) -> Result<DataFrame, AppError> {
    let header = rows
        .first()
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .ok_or_else(|| AppError::FileProcessingError("Sheet has no header row".to_string()))?;

    let mut existing_names = HashSet::new();
    let headers: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let text = cell_to_text(cell).unwrap_or_default();
            unique_column_name(&text, idx, &mut existing_names)
        })
        .collect();

    let body: Vec<&Vec<Data>> = rows
        .iter()
        .skip(1)
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .collect();

    let mut columns = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let values: Vec<Data> = body
            .iter()
            .map(|row| row.get(col_idx).cloned().unwrap_or(Data::Empty))
            .collect();

        let series = match detect_column_type(&values) {
            ColumnKind::Numeric => {
                let nums: Vec<Option<f64>> = values.iter().map(cell_to_f64).collect();
                Series::new(header, nums)
            }
            ColumnKind::Text => {
                let strings: Vec<Option<String>> = values.iter().map(cell_to_text).collect();
                Series::new(header, strings)
            }
        };
        columns.push(series);
    }

    DataFrame::new(columns)
        .map_err(|e| AppError::DataFrameError(format!("Failed to create DataFrame: {}", e)))
}
