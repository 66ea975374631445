use serde_json::{Map, Value};
use crate::error::AppError;
use crate::models::{CountryMaps, Dashboard, Section, SegmentReport};
use crate::session::CircleSize;
use super::figures;
use super::format::{currency, escape_html};
use super::tables::{country_sales_table, segment_table, Table};

pub const PAGE_TITLE: &str = "Financial Analysis";
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// What a render pass has to show.
pub enum PageContent<'a> {
    LoadFailed(&'a AppError),
    Loaded { raw: Table, dashboard: &'a Dashboard },
}

/// Charts are collected as Plotly figures keyed by their container id.
struct PageBuilder {
    body: String,
    figures: Map<String, Value>,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            body: String::new(),
            figures: Map::new(),
        }
    }

    fn heading(&mut self, level: u8, text: &str) {
        self.body
            .push_str(&format!("<h{level}>{}</h{level}>\n", escape_html(text)));
    }

    fn paragraph(&mut self, text: &str) {
        self.body.push_str(&format!("<p>{}</p>\n", escape_html(text)));
    }

    fn notice(&mut self, text: &str) {
        self.body
            .push_str(&format!("<p class=\"notice\">{}</p>\n", escape_html(text)));
    }

    fn error(&mut self, text: &str) {
        self.body
            .push_str(&format!("<div class=\"error\">{}</div>\n", escape_html(text)));
    }

    fn table(&mut self, table: &Table) {
        self.body.push_str("<div class=\"table\">\n");
        self.body.push_str(&table.to_html());
        self.body.push_str("\n</div>\n");
    }

    fn chart(&mut self, id: &str, figure: Value) {
        self.body
            .push_str(&format!("<div class=\"chart\" id=\"{}\"></div>\n", id));
        self.figures.insert(id.to_string(), figure);
    }

    fn raw(&mut self, html: &str) {
        self.body.push_str(html);
    }

    fn finish(self) -> Result<String, AppError> {
        // `</` would close the script element early.
        let figures = serde_json::to_string(&Value::Object(self.figures))?.replace("</", "<\\/");
        Ok(TEMPLATE
            .replace("__TITLE__", PAGE_TITLE)
            .replace("__PLOTLY__", PLOTLY_CDN)
            .replace("__FIGURES__", &figures)
            .replace("__BODY__", &self.body))
    }
}

pub fn render_page(content: PageContent<'_>, circle_size: CircleSize) -> Result<String, AppError> {
    let mut page = PageBuilder::new();

    match content {
        PageContent::LoadFailed(err) => {
            page.error(&format!("Failed to load the file: {}", err));
        }
        PageContent::Loaded { raw, dashboard } => {
            page.heading(2, &dashboard.sheet_name);
            page.paragraph(&format!(
                "{} rows loaded at {}",
                dashboard.row_count,
                dashboard.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            page.table(&raw);

            render_segments(&mut page, &dashboard.segments);
            render_circle_size(&mut page, circle_size);
            render_country_maps(&mut page, &dashboard.country_maps);
        }
    }

    page.finish()
}

fn render_segments(page: &mut PageBuilder, section: &Section<SegmentReport>) {
    match section {
        Section::Ready { data } => {
            page.heading(1, "Profit by Segment (USD)");
            page.chart("segment-pie", figures::segment_pie(&data.rows));
            page.paragraph(&format!(
                "Total profit (positive segments only): {}",
                currency(data.total_profit)
            ));
            page.heading(3, "Profit and Percentage by Segment");
            page.table(&segment_table(&data.rows));
        }
        Section::Skipped { notice } => page.notice(notice),
    }
}

fn render_circle_size(page: &mut PageBuilder, circle_size: CircleSize) {
    page.raw(&format!(
        concat!(
            "<div class=\"circle-size\">Circle size: <strong>{}</strong>\n",
            "<form method=\"post\" action=\"/circle-size/decrease\"><button type=\"submit\">-</button></form>\n",
            "<form method=\"post\" action=\"/circle-size/increase\"><button type=\"submit\">+</button></form>\n",
            "</div>\n"
        ),
        circle_size.value()
    ));
}

fn render_country_maps(page: &mut PageBuilder, section: &Section<CountryMaps>) {
    let Some(maps) = section.ready() else {
        if let Some(notice) = section.notice() {
            page.notice(notice);
        }
        return;
    };

    page.heading(1, "Map: Sales and Units Sold by Country");
    page.chart("country-sales-map", figures::country_sales_map(&maps.sales));
    page.heading(3, "Sales and Units Sold by Country");
    page.table(&country_sales_table(&maps.sales));

    match &maps.profit {
        Section::Ready { data } => {
            page.heading(1, "Map: Profit by Country");
            page.chart("country-profit-map", figures::country_profit_map(data));
        }
        Section::Skipped { notice } => page.notice(notice),
    }
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__</title>
<script src="__PLOTLY__"></script>
<style>
  body { font-family: system-ui, sans-serif; margin: 0 auto; padding: 1rem 2rem; max-width: 100%; }
  .table { max-height: 480px; overflow: auto; margin-bottom: 1.5rem; }
  table { border-collapse: collapse; font-size: 0.9rem; }
  th, td { border: 1px solid #ddd; padding: 0.25rem 0.6rem; text-align: right; }
  th { background: #f4f4f4; position: sticky; top: 0; }
  td:first-child, th:first-child { text-align: left; }
  .chart { width: 100%; }
  .notice { color: #555; font-style: italic; }
  .error { background: #fde8e8; border: 1px solid #f5b5b5; color: #8a1c1c; padding: 0.75rem 1rem; border-radius: 4px; }
  .circle-size { display: flex; gap: 0.5rem; align-items: center; margin: 1rem 0; }
  .circle-size form { margin: 0; }
</style>
</head>
<body>
__BODY__
<script>
const FIGURES = __FIGURES__;
for (const [id, figure] of Object.entries(FIGURES)) {
  Plotly.newPlot(id, figure.data, figure.layout, { responsive: true });
}
</script>
</body>
</html>
"##;
