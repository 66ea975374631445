//! Plotly figure objects for the dashboard charts.
//!
//! Country markers are placed by Plotly's `country names` location mode, so
//! names it cannot resolve simply produce no marker.

use serde_json::{json, Value};
use crate::models::{CountryProfitSummary, CountrySalesSummary, SegmentSummary};

pub const MAP_HEIGHT: u32 = 800;
const COLOR_SCALE: &str = "Plasma";

pub fn segment_pie(rows: &[SegmentSummary]) -> Value {
    let labels: Vec<&str> = rows.iter().map(|r| r.segment.as_str()).collect();
    let values: Vec<f64> = rows.iter().map(|r| r.profit).collect();

    json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
            "textposition": "inside",
            "textinfo": "percent+label",
            "hovertemplate": "%{label}: $%{value:,.2f}<extra></extra>",
        }],
        "layout": {
            "title": { "text": "Profit by Segment" },
        },
    })
}

pub fn country_sales_map(rows: &[CountrySalesSummary]) -> Value {
    let countries: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    let sizes: Vec<f64> = rows.iter().map(|r| r.bubble_size).collect();
    let units: Vec<f64> = rows.iter().map(|r| r.units_sold).collect();
    let custom: Vec<[f64; 2]> = rows.iter().map(|r| [r.sales, r.units_sold]).collect();

    json!({
        "data": [{
            "type": "scattergeo",
            "locationmode": "country names",
            "locations": countries,
            "hovertext": countries,
            "customdata": custom,
            "hovertemplate": "<b>%{hovertext}</b><br>Sales=$%{customdata[0]:,.2f}<br>Units Sold=%{customdata[1]:,.0f}<extra></extra>",
            "marker": {
                "size": sizes,
                "sizemode": "diameter",
                "color": units,
                "colorscale": COLOR_SCALE,
                "showscale": true,
                "colorbar": { "title": { "text": "Units Sold" } },
            },
        }],
        "layout": map_layout("Sales and Units Sold by Country"),
    })
}

pub fn country_profit_map(rows: &[CountryProfitSummary]) -> Value {
    let countries: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    let sizes: Vec<f64> = rows.iter().map(|r| r.bubble_size).collect();
    let profits: Vec<f64> = rows.iter().map(|r| r.profit).collect();

    json!({
        "data": [{
            "type": "scattergeo",
            "locationmode": "country names",
            "locations": countries,
            "hovertext": countries,
            "customdata": profits,
            "hovertemplate": "<b>%{hovertext}</b><br>Profit=$%{customdata:,.2f}<extra></extra>",
            "marker": {
                "size": sizes,
                "sizemode": "diameter",
                "color": profits,
                "colorscale": COLOR_SCALE,
                "showscale": true,
                "colorbar": { "title": { "text": "Profit" } },
            },
        }],
        "layout": map_layout("Profit by Country"),
    })
}

fn map_layout(title: &str) -> Value {
    json!({
        "title": { "text": title },
        "height": MAP_HEIGHT,
        "autosize": true,
        "geo": {
            "showframe": false,
            "showcoastlines": true,
            "visible": false,
            "resolution": 50,
            "showland": true,
            "showlakes": true,
            "subunitcolor": "white",
            "landcolor": "rgb(217, 217, 217)",
            "countrycolor": "rgb(217, 217, 217)",
            "lakecolor": "rgb(255, 255, 255)",
            "projection": { "type": "mercator" },
            "scope": "world",
            "domain": { "x": [0, 1], "y": [0, 1] },
        },
    })
}
