//! Group-by aggregations feeding the dashboard sections.
//!
//! Groups are ordered by key, rows with an empty key are dropped and null
//! measures count as zero.

use polars::prelude::*;
use crate::error::AppError;
use crate::models::{
    CountryProfitSummary, CountrySalesSummary, Dataset, SegmentReport, SegmentSummary, COUNTRY,
    PROFIT, SALES, SEGMENT, UNITS_SOLD,
};

pub const MIN_BUBBLE_SIZE: f64 = 5.0;
pub const MAX_BUBBLE_SIZE: f64 = 50.0;

/// Sums `measures` per distinct value of `key`.
pub fn grouped_sums(
    frame: &DataFrame,
    key: &str,
    measures: &[&str],
) -> Result<Vec<(String, Vec<f64>)>, AppError> {
    let aggregations: Vec<Expr> = measures
        .iter()
        .map(|m| col(m).cast(DataType::Float64).sum().alias(m))
        .collect();

    let grouped = frame
        .clone()
        .lazy()
        .group_by([col(key).cast(DataType::String)])
        .agg(aggregations)
        .collect()?;

    let keys = grouped.column(key)?.str()?;
    let sums = measures
        .iter()
        .map(|m| grouped.column(m).and_then(|s| s.f64()))
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut groups: Vec<(String, Vec<f64>)> = (0..grouped.height())
        .filter_map(|idx| {
            let name = keys.get(idx)?;
            let values = sums.iter().map(|ca| ca.get(idx).unwrap_or(0.0)).collect();
            Some((name.to_string(), values))
        })
        .collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(groups)
}

/// Share of `total` in percent; a non-positive total yields 0.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Linear map of `value` from `[min, max]` into the bubble range, clamped at the ends.
///
/// A degenerate domain (`min == max`) maps to the middle of the range.
pub fn interpolate(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || !min.is_finite() || !max.is_finite() {
        return MIN_BUBBLE_SIZE;
    }
    if max <= min {
        return (MIN_BUBBLE_SIZE + MAX_BUBBLE_SIZE) / 2.0;
    }
    let ratio = ((value - min) / (max - min)).clamp(0.0, 1.0);
    MIN_BUBBLE_SIZE + ratio * (MAX_BUBBLE_SIZE - MIN_BUBBLE_SIZE)
}

pub fn bubble_sizes(values: &[f64]) -> Vec<f64> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    values.iter().map(|v| interpolate(*v, min, max)).collect()
}

pub fn profit_by_segment(dataset: &Dataset) -> Result<SegmentReport, AppError> {
    let positive: Vec<(String, f64)> = grouped_sums(&dataset.frame, SEGMENT, &[PROFIT])?
        .into_iter()
        .map(|(segment, sums)| (segment, sums[0]))
        .filter(|(_, profit)| *profit > 0.0)
        .collect();

    let total_profit: f64 = positive.iter().map(|(_, profit)| profit).sum();
    let rows = positive
        .into_iter()
        .map(|(segment, profit)| SegmentSummary {
            segment,
            profit,
            percentage: percentage(profit, total_profit),
        })
        .collect();

    Ok(SegmentReport { rows, total_profit })
}

pub fn sales_by_country(dataset: &Dataset) -> Result<Vec<CountrySalesSummary>, AppError> {
    let groups = grouped_sums(&dataset.frame, COUNTRY, &[SALES, UNITS_SOLD])?;
    let sales: Vec<f64> = groups.iter().map(|(_, sums)| sums[0]).collect();
    let sizes = bubble_sizes(&sales);

    Ok(groups
        .into_iter()
        .zip(sizes)
        .map(|((country, sums), bubble_size)| CountrySalesSummary {
            country,
            sales: sums[0],
            units_sold: sums[1],
            bubble_size,
        })
        .collect())
}

pub fn profit_by_country(dataset: &Dataset) -> Result<Vec<CountryProfitSummary>, AppError> {
    let groups = grouped_sums(&dataset.frame, COUNTRY, &[PROFIT])?;
    let profits: Vec<f64> = groups.iter().map(|(_, sums)| sums[0]).collect();
    let sizes = bubble_sizes(&profits);

    Ok(groups
        .into_iter()
        .zip(sizes)
        .map(|((country, sums), bubble_size)| CountryProfitSummary {
            country,
            profit: sums[0],
            bubble_size,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(frame: DataFrame) -> Dataset {
        Dataset::new(frame, "Sheet1")
    }

    #[test]
    fn segment_example_keeps_only_profitable_groups() {
        let frame = df! {
            "Segment" => &["A", "B", "A"],
            "Profit" => &[100.0, -20.0, 50.0],
        }
        .unwrap();

        let report = profit_by_segment(&dataset(frame)).unwrap();

        assert_eq!(
            report.rows,
            vec![SegmentSummary {
                segment: "A".to_string(),
                profit: 150.0,
                percentage: 100.0,
            }]
        );
        assert_eq!(report.total_profit, 150.0);
    }

    #[test]
    fn zero_profit_segments_are_excluded() {
        let frame = df! {
            "Segment" => &["Government", "Channel Partners", "Midmarket", "Midmarket"],
            "Profit" => &[30.0, 0.0, 10.0, -10.0],
        }
        .unwrap();

        let report = profit_by_segment(&dataset(frame)).unwrap();
        let names: Vec<&str> = report.rows.iter().map(|r| r.segment.as_str()).collect();

        assert_eq!(names, vec!["Government"]);
        assert!(report.rows.iter().all(|r| r.profit > 0.0));
    }

    #[test]
    fn percentages_add_up_to_one_hundred() {
        let frame = df! {
            "Segment" => &["Enterprise", "Government", "Midmarket", "Small Business", "Government"],
            "Profit" => &[1234.56, 789.01, 3.3, 4500.0, 17.25],
        }
        .unwrap();

        let report = profit_by_segment(&dataset(frame)).unwrap();
        let sum: f64 = report.rows.iter().map(|r| r.percentage).sum();

        assert_eq!(report.rows.len(), 4);
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn no_profitable_segment_yields_empty_report() {
        let frame = df! {
            "Segment" => &["A", "B"],
            "Profit" => &[-1.0, 0.0],
        }
        .unwrap();

        let report = profit_by_segment(&dataset(frame)).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.total_profit, 0.0);
        assert_eq!(percentage(10.0, 0.0), 0.0);
    }

    #[test]
    fn null_segments_are_dropped_and_groups_sorted() {
        let frame = df! {
            "Segment" => &[Some("Midmarket"), None, Some("Enterprise")],
            "Profit" => &[Some(5.0), Some(100.0), None],
        }
        .unwrap();

        let groups = grouped_sums(&frame, "Segment", &["Profit"]).unwrap();
        assert_eq!(
            groups,
            vec![
                ("Enterprise".to_string(), vec![0.0]),
                ("Midmarket".to_string(), vec![5.0]),
            ]
        );
    }

    #[test]
    fn country_example_maps_to_range_endpoints() {
        let frame = df! {
            "Country" => &["X", "Y"],
            "Sales" => &[10.0, 90.0],
            "Units Sold" => &[1.0, 2.0],
        }
        .unwrap();

        let rows = sales_by_country(&dataset(frame)).unwrap();

        assert_eq!(rows[0].country, "X");
        assert_eq!(rows[0].bubble_size, 5.0);
        assert_eq!(rows[1].country, "Y");
        assert_eq!(rows[1].bubble_size, 50.0);
    }

    #[test]
    fn country_sales_sum_both_measures() {
        let frame = df! {
            "Country" => &["Canada", "France", "Canada", "Mexico"],
            "Sales" => &[100.0, 400.0, 150.0, 175.0],
            "Units Sold" => &[10.0, 40.0, 5.5, 20.0],
        }
        .unwrap();

        let rows = sales_by_country(&dataset(frame)).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].country, "Canada");
        assert_eq!(rows[0].sales, 250.0);
        assert_eq!(rows[0].units_sold, 15.5);
        assert_eq!(rows[1].bubble_size, 50.0);
        assert!(rows.iter().all(|r| (5.0..=50.0).contains(&r.bubble_size)));
        assert_eq!(rows[2].bubble_size, 5.0);
    }

    #[test]
    fn identical_totals_use_the_range_midpoint() {
        let frame = df! {
            "Country" => &["Germany", "Mexico", "Germany"],
            "Profit" => &[20.0, 40.0, 20.0],
        }
        .unwrap();

        let rows = profit_by_country(&dataset(frame)).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.bubble_size == 27.5));
        assert!(rows.iter().all(|r| r.profit == 40.0));
    }

    #[test]
    fn negative_profit_still_sizes_within_range() {
        let frame = df! {
            "Country" => &["A", "B", "C"],
            "Profit" => &[-50.0, 25.0, 100.0],
        }
        .unwrap();

        let rows = profit_by_country(&dataset(frame)).unwrap();

        assert_eq!(rows[0].bubble_size, 5.0);
        assert_eq!(rows[1].bubble_size, 27.5);
        assert_eq!(rows[2].bubble_size, 50.0);
    }

    #[test]
    fn interpolation_handles_non_finite_input() {
        assert_eq!(interpolate(f64::NAN, 0.0, 10.0), MIN_BUBBLE_SIZE);
        assert_eq!(interpolate(5.0, 0.0, 10.0), 27.5);
        assert_eq!(interpolate(20.0, 0.0, 10.0), MAX_BUBBLE_SIZE);
        assert!(bubble_sizes(&[]).is_empty());
    }
}
