use polars::prelude::*;
use serde::Serialize;
use crate::error::AppError;
use crate::models::{CountrySalesSummary, Dataset, SegmentSummary};
use super::format::{count, currency, escape_html, percent};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>\n<thead><tr>");
        for header in &self.headers {
            html.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>");
        html
    }
}

pub fn segment_table(rows: &[SegmentSummary]) -> Table {
    Table {
        headers: vec!["Segment".into(), "Profit".into(), "Percentage".into()],
        rows: rows
            .iter()
            .map(|r| vec![r.segment.clone(), currency(r.profit), percent(r.percentage)])
            .collect(),
    }
}

pub fn country_sales_table(rows: &[CountrySalesSummary]) -> Table {
    Table {
        headers: vec![
            "Country".into(),
            "Sales".into(),
            "Units Sold".into(),
            "Bubble Size".into(),
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.country.clone(),
                    currency(r.sales),
                    count(r.units_sold),
                    format!("{:.2}", r.bubble_size),
                ]
            })
            .collect(),
    }
}

/// Echo of the loaded sheet, cell values as they were read.
pub fn dataset_table(dataset: &Dataset) -> Result<Table, AppError> {
    let columns = dataset
        .frame
        .get_columns()
        .iter()
        .map(column_cells)
        .collect::<PolarsResult<Vec<_>>>()?;

    let rows = (0..dataset.row_count())
        .map(|idx| columns.iter().map(|cells| cells[idx].clone()).collect())
        .collect();

    Ok(Table {
        headers: dataset.column_names(),
        rows,
    })
}

fn column_cells(series: &Series) -> PolarsResult<Vec<String>> {
    match series.dtype() {
        DataType::Float64 => Ok(series
            .f64()?
            .into_iter()
            .map(|v| v.map(|x| x.to_string()).unwrap_or_default())
            .collect()),
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()),
        _ => (0..series.len())
            .map(|idx| {
                series.get(idx).map(|v| match v {
                    AnyValue::Null => String::new(),
                    other => other.to_string(),
                })
            })
            .collect(),
    }
}
