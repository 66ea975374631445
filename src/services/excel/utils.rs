use std::collections::HashSet;
use bytes::Bytes;
use reqwest::Client;
use crate::error::AppError;
use chrono::{Duration, NaiveDate};
use calamine::Data;
use super::types::{ColumnKind, TYPE_DETECTION_ROWS};

/// Keeps the header text as-is, only making blanks and repeats addressable.
pub fn unique_column_name(name: &str, index: usize, existing_names: &mut HashSet<String>) -> String {
    let base_name = if name.trim().is_empty() {
        format!("column_{}", index)
    } else {
        name.to_string()
    };

    // If the name already exists, add a numeric suffix
    let mut cleaned = base_name.clone();
    let mut counter = 1;
    while !existing_names.insert(cleaned.clone()) {
        cleaned = format!("{}_{}", base_name, counter);
        counter += 1;
    }

    cleaned
}

pub async fn load_file_from_url(client: &Client, url: &str, max_file_size: usize) -> Result<Bytes, AppError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::HttpError(format!("Failed to fetch file: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::HttpError(
            format!("Failed to fetch file. Status: {}", response.status())
        ));
    }

    if let Some(length) = response.content_length() {
        check_file_size(length as usize, max_file_size)?;
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::HttpError(format!("Failed to read response bytes: {}", e)))?;
    check_file_size(bytes.len(), max_file_size)?;

    Ok(bytes)
}

pub fn check_file_size(size: usize, max_file_size: usize) -> Result<(), AppError> {
    if size > max_file_size {
        return Err(AppError::FileProcessingError(format!(
            "File is {}KB, larger than the {}KB limit",
            size / 1024,
            max_file_size / 1024
        )));
    }
    Ok(())
}

pub fn detect_column_type(values: &[Data]) -> ColumnKind {
    let mut numeric_count = 0;
    let mut total_count = 0;

    for value in values
        .iter()
        .filter(|v| !matches!(v, Data::Empty))
        .take(TYPE_DETECTION_ROWS)
    {
        total_count += 1;
        if matches!(value, Data::Float(_) | Data::Int(_)) {
            numeric_count += 1;
        }
    }

    if total_count == 0 {
        return ColumnKind::Text;
    }

    let numeric_ratio = numeric_count as f64 / total_count as f64;
    if numeric_ratio > 0.5 {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

pub fn cell_to_f64(value: &Data) -> Option<f64> {
    match value {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        _ => None,
    }
}

pub fn cell_to_text(value: &Data) -> Option<String> {
    match value {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(d) => {
            let serial = d.as_f64();
            Some(excel_serial_to_string(serial).unwrap_or_else(|| serial.to_string()))
        }
        other => Some(other.to_string()),
    }
}

/// Excel serials count days from 1899-12-30.
pub fn excel_serial_to_string(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let moment = epoch.checked_add_signed(Duration::try_milliseconds(millis)?)?;

    if millis % 86_400_000 == 0 {
        Some(moment.format("%Y-%m-%d").to_string())
    } else {
        Some(moment.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}
