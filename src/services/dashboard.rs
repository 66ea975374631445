use crate::error::AppError;
use crate::models::{
    CountryMaps, Dashboard, Dataset, Section, COUNTRY, PROFIT, SALES, SEGMENT, UNITS_SOLD,
};
use crate::services::{aggregator, excel, normalizer};
use crate::AppState;

/// Fetches, decodes and normalizes the configured sheet.
pub async fn load_dataset(state: &AppState) -> Result<Dataset, AppError> {
    let start = std::time::Instant::now();
    let config = &state.config;

    tracing::info!("Downloading file from {}", config.source_url);
    let file_data =
        excel::load_file_from_url(&state.http, &config.source_url, config.max_file_size).await?;
    tracing::info!(
        "File downloaded, size: {}KB, took: {:?}",
        file_data.len() / 1024,
        start.elapsed()
    );

    let sheet_name = config.sheet_name.clone();
    let dataset = tokio::task::spawn_blocking(move || excel::read_sheet(file_data, &sheet_name))
        .await
        .map_err(|e| AppError::Internal(format!("Spreadsheet decoding task failed: {}", e)))??;

    normalizer::normalize_columns(dataset)
}

/// Runs every aggregation over a loaded dataset.
pub fn build_dashboard(dataset: &Dataset) -> Result<Dashboard, AppError> {
    let start = std::time::Instant::now();

    let segments = match missing_notice(dataset, &[SEGMENT, PROFIT]) {
        Some(notice) => Section::Skipped { notice },
        None => Section::Ready {
            data: aggregator::profit_by_segment(dataset)?,
        },
    };

    let country_maps = match missing_notice(dataset, &[SALES, UNITS_SOLD])
        .or_else(|| missing_notice(dataset, &[COUNTRY]))
    {
        Some(notice) => Section::Skipped { notice },
        None => Section::Ready {
            data: country_maps(dataset)?,
        },
    };

    tracing::info!(
        "Aggregated {} rows from {} in {:?}",
        dataset.row_count(),
        dataset.sheet_name,
        start.elapsed()
    );

    Ok(Dashboard {
        sheet_name: dataset.sheet_name.clone(),
        loaded_at: dataset.loaded_at,
        row_count: dataset.row_count(),
        segments,
        country_maps,
    })
}

fn country_maps(dataset: &Dataset) -> Result<CountryMaps, AppError> {
    let sales = aggregator::sales_by_country(dataset)?;
    let profit = match missing_notice(dataset, &[PROFIT]) {
        Some(notice) => Section::Skipped { notice },
        None => Section::Ready {
            data: aggregator::profit_by_country(dataset)?,
        },
    };

    Ok(CountryMaps { sales, profit })
}

fn missing_notice(dataset: &Dataset, required: &[&str]) -> Option<String> {
    let missing = dataset.missing_columns(required);
    if missing.is_empty() {
        return None;
    }

    let quoted: Vec<String> = required.iter().map(|name| format!("'{}'", name)).collect();
    tracing::warn!("Skipping section, missing columns: {:?}", missing);
    Some(format!("Columns {} not found.", quoted.join(" and/or ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use crate::services::renderer::{render_page, tables::Table, PageContent};
    use crate::session::CircleSize;

    fn financial_sample() -> Dataset {
        let frame = df! {
            "Segment" => &["Government", "Midmarket", "Government", "Enterprise"],
            "Country" => &["Canada", "France", "Germany", "Canada"],
            "Units Sold" => &[1618.5, 1321.0, 2178.0, 888.0],
            "Sales" => &[32370.0, 26420.0, 32670.0, 93240.0],
            "Profit" => &[16185.0, 13210.0, 10890.0, -4440.0],
        }
        .unwrap();
        Dataset::new(frame, "Sheet1")
    }

    #[test]
    fn full_dataset_fills_every_section() {
        let dashboard = build_dashboard(&financial_sample()).unwrap();

        let segments = dashboard.segments.ready().unwrap();
        let names: Vec<&str> = segments.rows.iter().map(|r| r.segment.as_str()).collect();
        assert_eq!(names, vec!["Government", "Midmarket"]);
        assert_eq!(segments.total_profit, 40285.0);

        let maps = dashboard.country_maps.ready().unwrap();
        assert_eq!(maps.sales.len(), 3);
        assert_eq!(maps.sales[0].country, "Canada");
        assert_eq!(maps.sales[0].sales, 125610.0);
        assert_eq!(maps.sales[0].bubble_size, 50.0);

        let profit = maps.profit.ready().unwrap();
        assert_eq!(profit[0].profit, 11745.0);
        assert_eq!(profit[1].bubble_size, 50.0);
        assert_eq!(profit[2].bubble_size, 5.0);
        assert_eq!(dashboard.row_count, 4);
    }

    #[test]
    fn missing_units_sold_omits_both_maps() {
        let frame = financial_sample().frame.drop("Units Sold").unwrap();
        let dashboard = build_dashboard(&Dataset::new(frame, "Sheet1")).unwrap();

        assert!(dashboard.segments.ready().is_some());
        assert_eq!(
            dashboard.country_maps.notice(),
            Some("Columns 'Sales' and/or 'Units Sold' not found.")
        );
    }

    #[test]
    fn missing_country_omits_both_maps() {
        let frame = financial_sample().frame.drop("Country").unwrap();
        let dashboard = build_dashboard(&Dataset::new(frame, "Sheet1")).unwrap();

        assert!(dashboard.segments.ready().is_some());
        assert!(dashboard.country_maps.ready().is_none());
        assert_eq!(
            dashboard.country_maps.notice(),
            Some("Columns 'Country' not found.")
        );

        let raw = Table { headers: vec![], rows: vec![] };
        let html = render_page(
            PageContent::Loaded { raw, dashboard: &dashboard },
            CircleSize::default(),
        )
        .unwrap();
        assert!(html.contains("Columns &#39;Country&#39; not found."));
        assert!(!html.contains("id=\"country-sales-map\""));
        assert!(!html.contains("Sales and Units Sold by Country"));
        assert!(!html.contains("id=\"country-profit-map\""));
    }

    #[test]
    fn missing_profit_skips_segment_and_profit_map_only() {
        let frame = financial_sample().frame.drop("Profit").unwrap();
        let dashboard = build_dashboard(&Dataset::new(frame, "Sheet1")).unwrap();

        assert_eq!(
            dashboard.segments.notice(),
            Some("Columns 'Segment' and/or 'Profit' not found.")
        );
        let maps = dashboard.country_maps.ready().unwrap();
        assert_eq!(maps.sales.len(), 3);
        assert_eq!(maps.profit.notice(), Some("Columns 'Profit' not found."));
    }

    #[test]
    fn untrimmed_headers_do_not_match() {
        let frame = df! {
            "Segment" => &["Government"],
            " Profit " => &[1.0],
        }
        .unwrap();
        let raw = Dataset::new(frame, "Sheet1");

        let before = build_dashboard(&raw).unwrap();
        assert!(before.segments.notice().is_some());

        let after = build_dashboard(&normalizer::normalize_columns(raw).unwrap()).unwrap();
        assert!(after.segments.ready().is_some());
    }
}
