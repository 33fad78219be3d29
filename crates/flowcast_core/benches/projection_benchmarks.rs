//! Criterion benchmarks for flowcast_core projections
//!
//! Run with: cargo bench -p flowcast_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use flowcast_core::config::{FrequencyBuilder, ScenarioBuilder, ScenarioConfig};
use flowcast_core::model::{
    AlimonyCapPolicy, Pass, SourceDefinition, TaxBracket, TaxTable, TaxYearTable,
};
use flowcast_core::{Scenario, project, project_scenarios};
use jiff::civil::{Date, date};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn federal(first_year: i16, years: i16) -> TaxTable {
    let brackets = TaxYearTable::new(vec![
        TaxBracket::new(Decimal::ZERO, dec!(0.10)),
        TaxBracket::new(dec!(11600), dec!(0.12)),
        TaxBracket::new(dec!(47150), dec!(0.22)),
        TaxBracket::new(dec!(100525), dec!(0.24)),
        TaxBracket::new(dec!(191950), dec!(0.32)),
    ])
    .expect("valid brackets");
    (first_year..first_year + years).fold(TaxTable::new("federal".into()), |table, year| {
        table.with_year(year, brackets.clone())
    })
}

/// A household with salary, bonus, RSUs, rent, a mortgage, alimony and tax over `years` years.
fn household(years: i16) -> ScenarioConfig {
    let start = date(2025, 1, 1);
    let end: Date = date(2025 + years - 1, 12, 31);

    ScenarioBuilder::new(format!("Household {years}y"))
        .person("alice", "Alice")
        .person("bob", "Bob")
        .company("acme", "Acme Corp")
        .company("bank", "First Bank")
        .government("irs", "IRS")
        .account("checking", "Checking", "alice", start, dec!(25000))
        .account("bob-checking", "Checking", "bob", start, Decimal::ZERO)
        .job("alice-acme", "acme", "alice", "checking")
        .security("acme-stock", "Acme Common")
        .price("acme-stock", start, dec!(150))
        .tax_table(federal(2025, years + 1))
        .frequency(FrequencyBuilder::biweekly("pay", start, end, date(2025, 1, 4)))
        .frequency(FrequencyBuilder::monthly("month", start, end).first_payment(date(2025, 1, 31)))
        .frequency(FrequencyBuilder::annual("bonus-year", start, end).first_payment(date(2026, 3, 15)))
        .frequency(FrequencyBuilder::vesting(
            "rsu-vest",
            start,
            date(2028, 12, 31),
            [(12, dec!(0.25)), (12, dec!(0.25)), (12, dec!(0.25)), (12, dec!(0.25))],
        ))
        .salary("alice-salary", "alice-acme", "pay", dec!(180000), Pass::BaseCashFlows)
        .rsu("alice-rsu", "alice-acme", "rsu-vest", "acme-stock", dec!(400), Pass::BaseCashFlows)
        .bonus_pct("alice-bonus", "alice-acme", "bonus-year", "alice-salary", dec!(0.15), Pass::DerivedIncome)
        .expense("rent", "alice", "month", dec!(36000), "checking", Pass::BaseCashFlows)
        .source(SourceDefinition::Liability {
            id: "mortgage".into(),
            pass: Pass::BaseCashFlows,
            lender: "bank".into(),
            borrower: "alice".into(),
            frequency: "month".into(),
            starting_balance: dec!(400000),
            annual_rate: dec!(0.055),
            payment: dec!(2800),
            impounds: dec!(450),
            term: None,
            default_sink: "checking".into(),
        })
        .source(SourceDefinition::Alimony {
            id: "alimony".into(),
            pass: Pass::DerivedExpenses,
            payor: "alice".into(),
            payee: "bob".into(),
            base_frequency: "month".into(),
            smith_ostler_frequency: "month".into(),
            base_income: dec!(120000),
            base_alimony: dec!(18000),
            smith_ostler_rate: dec!(0.4),
            max_alimony: Some(dec!(40000)),
            cap_policy: AlimonyCapPolicy::Clamp,
            default_sink: "checking".into(),
        })
        .source(SourceDefinition::IncomeTax {
            id: "alice-tax".into(),
            pass: Pass::Taxes,
            payor: "alice".into(),
            payee: "irs".into(),
            frequency: "month".into(),
            tax_table: "federal".into(),
            default_sink: "checking".into(),
        })
        .build()
}

fn bench_period_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("periods");
    let start = date(2015, 1, 1);
    let end = date(2034, 12, 31);

    let frequencies = [
        FrequencyBuilder::biweekly("biweekly", start, end, date(2015, 1, 3)).build(),
        FrequencyBuilder::monthly("monthly", start, end).build(),
        FrequencyBuilder::semi_monthly("semi_monthly", start, end, 15, 31).build(),
        FrequencyBuilder::quarterly("quarterly", start, end).build(),
    ];
    for frequency in &frequencies {
        group.bench_function(frequency.id.as_str(), |b| b.iter(|| black_box(frequency).periods()));
    }
    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for years in [1i16, 5, 20] {
        let scenario = Scenario::link(&household(years)).expect("scenario links");
        group.bench_with_input(BenchmarkId::new("years", years), &scenario, |b, scenario| {
            b.iter(|| project(black_box(scenario), &scenario.prices, Vec::new()))
        });
    }
    group.finish();
}

fn bench_link(c: &mut Criterion) {
    let config = household(20);
    c.bench_function("link_20y", |b| b.iter(|| Scenario::link(black_box(&config))));
}

fn bench_many_scenarios(c: &mut Criterion) {
    let scenarios: Vec<Scenario> = (1..=16)
        .map(|years| Scenario::link(&household(years)).expect("scenario links"))
        .collect();
    c.bench_function("project_16_scenarios", |b| {
        b.iter(|| project_scenarios(black_box(&scenarios)))
    });
}

criterion_group!(
    benches,
    bench_period_generation,
    bench_projection,
    bench_link,
    bench_many_scenarios
);
criterion_main!(benches);
