use super::ui;
use crate::core::analytics::days_until_expiry;
use crate::core::ingest::IngestReport;
use crate::core::{DomainRecord, ReferenceClock, classify};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

fn display_records(records: &[DomainRecord], currency: &str, clock: &ReferenceClock) -> String {
    let mut sorted: Vec<&DomainRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.expiry_date
            .cmp(&b.expiry_date)
            .then_with(|| a.domain.cmp(&b.domain))
    });

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Domain"),
        ui::header_cell(&format!("Amount ({currency})")),
        ui::header_cell("Registered"),
        ui::header_cell("Expires"),
        ui::header_cell("Days Left"),
        ui::header_cell("Status"),
    ]);

    let mut estimated = false;
    for record in sorted {
        // Estimated registration dates are marked with an asterisk
        let registered = match record.registration_date {
            Some(date) if record.registration_estimated => {
                estimated = true;
                format!("{date}*")
            }
            Some(date) => date.to_string(),
            None => "N/A".to_string(),
        };

        table.add_row(vec![
            Cell::new(&record.domain),
            ui::amount_cell(record.amount),
            Cell::new(registered),
            Cell::new(record.expiry_date),
            Cell::new(days_until_expiry(record, clock)).set_alignment(CellAlignment::Right),
            ui::lifecycle_cell(classify(record, clock)),
        ]);
    }

    let mut output = table.to_string();
    if estimated {
        output.push_str(&format!(
            "\n{}",
            ui::style_text("* estimated registration date", ui::StyleType::Subtle)
        ));
    }
    output
}

fn render(report: &IngestReport, clock: &ReferenceClock, currency: &str) -> String {
    let mut output = if report.records.is_empty() {
        "No domain records found.".to_string()
    } else {
        display_records(&report.records, currency, clock)
    };
    if let Some(note) = ui::skipped_note(report.rejected) {
        output.push_str(&format!("\n{note}"));
    }
    output
}

pub fn run(report: &IngestReport, clock: &ReferenceClock, currency: &str) -> Result<()> {
    println!("{}", render(report, clock, currency));
    Ok(())
}
