use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use crate::session::result::{ItemReport, SessionReport};

fn item_table(rows: &[ItemReport]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Kana (Roman)").fg(Color::Cyan),
        Cell::new("Total").fg(Color::Cyan),
        Cell::new("Incorrect").fg(Color::Cyan),
        Cell::new("Selection Weight").fg(Color::Cyan),
        Cell::new("P95").fg(Color::Cyan),
        Cell::new("P50").fg(Color::Cyan),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(format!("{} ({})", row.key, row.answer)),
            Cell::new(row.total),
            Cell::new(row.incorrect),
            Cell::new(format!("{:.2}", row.weight)),
            Cell::new(format!("{:?}", row.p95)),
            Cell::new(format!("{:?}", row.p50)),
        ]);
    }
    table
}

/// Text rendering of the end-of-session summary.
pub fn render(report: Option<&SessionReport>) -> String {
    let mut out = String::from("\nComplete!\n");
    let Some(report) = report else {
        return out;
    };

    out.push_str(&report.score_line());
    out.push('\n');
    out.push_str(&report.times_line());
    out.push('\n');

    if !report.missed.is_empty() {
        out.push_str("Most missed:\n");
        out.push_str(&item_table(&report.missed).to_string());
        out.push('\n');
    }
    out.push_str("Results:\n");
    out.push_str(&item_table(&report.items).to_string());
    out.push('\n');
    out
}

pub fn render_json(report: Option<&SessionReport>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&report)
}
