//! Annual summaries of a projected calendar

use std::collections::BTreeMap;
use std::fmt::Write;

use flowcast_core::Calendar;
use flowcast_core::model::ItemType;
use flowcast_core::money::round_money;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearReport {
    pub year: i16,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    /// Net amount of every source paid in the year
    pub by_source: BTreeMap<String, Decimal>,
    pub assets: BTreeMap<String, Decimal>,
    pub liabilities: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub scenario: String,
    pub years: Vec<YearReport>,
}

/// Summarize every year of `calendar`, or only `year` when given.
pub fn build_report(scenario: &str, calendar: &Calendar, year: Option<i16>) -> Report {
    let positions = calendar.assets_and_liabilities();

    let years = calendar
        .years()
        .into_iter()
        .filter(|y| year.is_none_or(|wanted| wanted == *y))
        .map(|year| {
            let mut report = YearReport {
                year,
                income: Decimal::ZERO,
                expenses: Decimal::ZERO,
                net: calendar.annual_cash_flow_total(year),
                by_source: BTreeMap::new(),
                assets: BTreeMap::new(),
                liabilities: BTreeMap::new(),
            };
            for instance in calendar.cash_flows().iter().filter(|i| i.cash_flow_year() == year) {
                match instance.item_type() {
                    ItemType::Income => report.income += instance.amount(),
                    ItemType::Expense => report.expenses += instance.amount(),
                    ItemType::Transfer => {}
                }
                *report
                    .by_source
                    .entry(instance.source_id().to_string())
                    .or_insert(Decimal::ZERO) += instance.amount();
            }
            if let Some(position) = positions.get(&year) {
                report.assets = position
                    .assets
                    .iter()
                    .map(|(id, value)| (id.to_string(), *value))
                    .collect();
                report.liabilities = position
                    .liabilities
                    .iter()
                    .map(|(id, value)| (id.to_string(), *value))
                    .collect();
            }
            report
        })
        .collect();

    Report {
        scenario: scenario.to_string(),
        years,
    }
}

/// Format a currency value with thousands separators
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_money(value.abs());
    let text = format!("{rounded:.2}");
    let (dollars, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in dollars.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let dollars: String = grouped.chars().rev().collect();

    let sign = if value.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${dollars}.{cents}")
}

const LABEL_WIDTH: usize = 28;
const VALUE_WIDTH: usize = 18;

fn row(out: &mut String, label: &str, value: Decimal) {
    // Writing to a String cannot fail
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}", format_currency(value));
}

/// Plain-text rendering, one block per year.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scenario: {}", report.scenario);
    if report.years.is_empty() {
        out.push_str("No cash flows projected.\n");
        return out;
    }

    for year in &report.years {
        let _ = writeln!(out, "\n{}", year.year);
        row(&mut out, "Income", year.income);
        row(&mut out, "Expenses", year.expenses);
        row(&mut out, "Net", year.net);

        if !year.by_source.is_empty() {
            out.push_str("  Sources\n");
            for (source, amount) in &year.by_source {
                row(&mut out, &format!("  {source}"), *amount);
            }
        }
        if !year.assets.is_empty() {
            out.push_str("  Year-end assets\n");
            for (account, value) in &year.assets {
                row(&mut out, &format!("  {account}"), *value);
            }
        }
        if !year.liabilities.is_empty() {
            out.push_str("  Year-end liabilities\n");
            for (loan, value) in &year.liabilities {
                row(&mut out, &format!("  {loan}"), *value);
            }
        }
    }
    out
}
