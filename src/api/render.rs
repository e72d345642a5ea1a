use serde::Serialize;

use crate::core::{BreakevenReport, Strategy};

const AGE_HEADER: &str = "Age";
const VALUE_AXIS_TITLE: &str = "Cumulative Benefits";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub age: u32,
    pub early: String,
    pub late: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartTrace {
    pub strategy: Strategy,
    pub label: String,
    pub monthly_benefit: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub ages: Vec<u32>,
    pub traces: Vec<ChartTrace>,
}

pub fn format_currency(value: f64) -> String {
    format!("{value:.2}")
}

pub fn table_rows(report: &BreakevenReport) -> Vec<TableRow> {
    report
        .series
        .points()
        .map(|point| TableRow {
            age: point.age,
            early: format_currency(point.early),
            late: format_currency(point.late),
        })
        .collect()
}

pub fn chart_traces(report: &BreakevenReport) -> ChartData {
    ChartData {
        x_title: AGE_HEADER,
        y_title: VALUE_AXIS_TITLE,
        ages: report.series.ages(),
        traces: Strategy::ALL
            .iter()
            .map(|&strategy| ChartTrace {
                strategy,
                label: report.parameters.label(strategy),
                monthly_benefit: report.benefit(strategy).monthly_amount,
                values: report.series.values(strategy).to_vec(),
            })
            .collect(),
    }
}

/// Plain-text table with right-aligned columns, one row per age.
pub fn render_table(report: &BreakevenReport) -> String {
    let rows = table_rows(report);
    let headers = [
        AGE_HEADER.to_string(),
        report.parameters.column_header(Strategy::Early),
        report.parameters.column_header(Strategy::Late),
    ];

    let mut widths = headers.each_ref().map(|h| h.len());
    for row in &rows {
        widths[0] = widths[0].max(row.age.to_string().len());
        widths[1] = widths[1].max(row.early.len());
        widths[2] = widths[2].max(row.late.len());
    }

    let mut out = String::new();
    push_line(&mut out, &headers, widths);
    let rule = widths.map(|w| "-".repeat(w));
    push_line(&mut out, &rule, widths);
    for row in rows {
        push_line(
            &mut out,
            &[row.age.to_string(), row.early, row.late],
            widths,
        );
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 3], widths: [usize; 3]) {
    let line = format!(
        "{:>w0$}  {:>w1$}  {:>w2$}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Parameters, compute_breakeven};

    fn sample_report() -> BreakevenReport {
        compute_breakeven(&Parameters {
            benefit_at_fra: 2_000.0,
            annual_return_rate: 0.0,
            early_age: 62,
            late_age: 67,
            max_age: 70,
        })
        .expect("valid parameters")
    }

    #[test]
    fn table_rows_format_two_decimals() {
        let rows = table_rows(&sample_report());
        assert_eq!(rows.len(), 9);
        assert_eq!(
            rows[0],
            TableRow {
                age: 62,
                early: "16800.00".to_string(),
                late: "0.00".to_string(),
            }
        );
        assert_eq!(rows[5].age, 67);
        assert_eq!(rows[5].late, "24000.00");
    }

    #[test]
    fn format_currency_rounds_to_cents() {
        assert_eq!(format_currency(17_341.139_678_852), "17341.14");
        assert_eq!(format_currency(0.0), "0.00");
    }

    #[test]
    fn chart_traces_label_by_claiming_age() {
        let chart = chart_traces(&sample_report());
        assert_eq!(chart.ages, (62..=70).collect::<Vec<_>>());
        assert_eq!(chart.traces.len(), 2);
        assert_eq!(chart.traces[0].label, "Claim at 62");
        assert_eq!(chart.traces[1].label, "Claim at 67");
        assert_eq!(chart.traces[1].strategy, Strategy::Late);
        assert_eq!(chart.traces[0].values.len(), chart.ages.len());
        assert_eq!(chart.traces[0].monthly_benefit, 1_400.0);
        assert_eq!(chart.traces[1].monthly_benefit, 2_000.0);
    }

    #[test]
    fn render_table_has_headers_and_one_line_per_age() {
        let text = render_table(&sample_report());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 9);
        assert!(lines[0].contains("Cumulative Benefit (Age 62)"));
        assert!(lines[0].contains("Cumulative Benefit (Age 67)"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].trim_start().starts_with("62"));
        assert!(lines[2].ends_with("0.00"));
        assert!(lines[10].contains("151200.00"));
        assert!(lines[10].ends_with("96000.00"));
    }
}
