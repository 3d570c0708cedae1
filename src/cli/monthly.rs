use super::ui;
use crate::core::ingest::IngestReport;
use crate::core::{MetricsSnapshot, ReferenceClock, aggregate};
use anyhow::Result;
use comfy_table::{Attribute, Cell};

fn display_monthly_series(
    snapshot: &MetricsSnapshot,
    currency: &str,
    clock: &ReferenceClock,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Registrations"),
        ui::header_cell(&format!("Revenue ({currency})")),
        ui::header_cell(&format!("Expiring ({currency})")),
    ]);

    for entry in &snapshot.monthly_series {
        let month = if entry.month == clock.current_month {
            Cell::new(entry.label).add_attribute(Attribute::Bold)
        } else {
            Cell::new(entry.label)
        };
        table.add_row(vec![
            month,
            ui::count_cell(entry.registrations),
            ui::amount_cell(entry.revenue),
            ui::amount_cell(entry.expiring_revenue),
        ]);
    }

    let registrations: usize = snapshot.monthly_series.iter().map(|m| m.registrations).sum();
    let revenue: f64 = snapshot.monthly_series.iter().map(|m| m.revenue).sum();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        ui::count_cell(registrations),
        ui::amount_cell(revenue),
        ui::amount_cell(snapshot.total_revenue),
    ]);

    let mut output = format!(
        "Registrations in {}\n\n",
        ui::style_text(&clock.current_year.to_string(), ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\nMonth-over-month growth: {}",
        ui::style_text(
            &format!("{:.2}%", snapshot.monthly_growth_percent),
            ui::StyleType::TotalLabel
        )
    ));
    output
}

fn render(report: &IngestReport, clock: &ReferenceClock, currency: &str) -> String {
    let snapshot = aggregate(&report.records, clock);
    let mut output = display_monthly_series(&snapshot, currency, clock);
    if let Some(note) = ui::skipped_note(report.rejected) {
        output.push_str(&format!("\n{note}"));
    }
    output
}

pub fn run(report: &IngestReport, clock: &ReferenceClock, currency: &str) -> Result<()> {
    println!("{}", render(report, clock, currency));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DomainRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_monthly_table_lists_every_month() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let clock = ReferenceClock::new(now);
        let records = vec![DomainRecord {
            domain: "a.com".to_string(),
            amount: 19.99,
            currency: "USD".to_string(),
            registration_date: NaiveDate::from_ymd_opt(2025, 2, 14),
            registration_estimated: false,
            expiry_date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
        }];

        let output = display_monthly_series(&aggregate(&records, &clock), "USD", &clock);
        for label in [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ] {
            assert!(output.contains(label), "missing {label}");
        }
        assert!(output.contains("19.99"));
        assert!(output.contains("Registrations in"));
        assert!(output.contains("-100.00%"));
    }

    #[test]
    fn test_monthly_reports_skipped_records() {
        let clock = ReferenceClock::new(
            NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let report = IngestReport {
            records: vec![],
            rejected: 1,
        };
        assert!(render(&report, &clock, "USD").contains("Skipped 1 invalid records"));

        let clean = IngestReport {
            records: vec![],
            rejected: 0,
        };
        assert!(!render(&clean, &clock, "USD").contains("Skipped"));
    }
}
