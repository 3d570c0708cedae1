use super::ui;
use crate::core::analytics::month_label;
use crate::core::ingest::IngestReport;
use crate::core::{MetricsSnapshot, ReferenceClock, aggregate};
use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;

/// Machine-readable summary: the metrics plus how many records were dropped.
#[derive(Serialize)]
struct JsonSummary<'a> {
    metrics: &'a MetricsSnapshot,
    rejected: usize,
}

impl MetricsSnapshot {
    pub fn display_as_table(&self, currency: &str, clock: &ReferenceClock) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

        let growth_label = format!(
            "Growth ({} vs {})",
            month_label(clock.current_month),
            month_label(clock.current_month.pred())
        );

        table.add_row(vec![
            Cell::new(format!("Total revenue ({currency})")),
            ui::amount_cell(self.total_revenue),
        ]);
        table.add_row(vec![
            Cell::new("Average domain value"),
            ui::amount_cell(self.average_domain_value),
        ]);
        table.add_row(vec![
            Cell::new(growth_label),
            ui::change_cell(self.monthly_growth_percent),
        ]);
        table.add_row(vec![
            Cell::new("Expired revenue"),
            ui::amount_cell(self.expired_revenue),
        ]);
        table.add_row(vec![
            Cell::new("Redemption revenue"),
            ui::amount_cell(self.redemption_revenue),
        ]);
        table.add_row(vec![
            Cell::new("Renewable revenue"),
            ui::amount_cell(self.renewable_revenue()),
        ]);
        for (label, count) in [
            ("Active", self.active_count),
            ("Expiring 0-7d", self.expiring_7_days),
            ("Expiring 8-30d", self.expiring_30_days),
            ("Expired", self.expired_count),
            ("Redemption", self.redemption_count),
        ] {
            table.add_row(vec![Cell::new(label), ui::count_cell(count)]);
        }

        let mut output = format!(
            "Domains as of {}\n\n",
            ui::style_text(&clock.today().to_string(), ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\nTotal Records: {}",
            ui::style_text(&self.record_count.to_string(), ui::StyleType::TotalValue)
        ));
        output
    }
}

fn render(report: &IngestReport, clock: &ReferenceClock, currency: &str, json: bool) -> Result<String> {
    let snapshot = aggregate(&report.records, clock);

    if json {
        let summary = JsonSummary {
            metrics: &snapshot,
            rejected: report.rejected,
        };
        return Ok(serde_json::to_string_pretty(&summary)?);
    }

    let mut output = snapshot.display_as_table(currency, clock);
    if let Some(note) = ui::skipped_note(report.rejected) {
        output.push_str(&format!("\n\n{note}"));
    }
    Ok(output)
}

pub fn run(report: &IngestReport, clock: &ReferenceClock, currency: &str, json: bool) -> Result<()> {
    println!("{}", render(report, clock, currency, json)?);
    Ok(())
}
