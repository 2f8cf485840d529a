#![deny(warnings)]

//! Headless CLI: runs a rent-sharing scenario and prints the fiscal split.

use anyhow::Result;
use rent_core::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    scenario: Option<String>,
    price: Option<Decimal>,
    json: bool,
}

fn parse_args() -> Args {
    let mut scenario: Option<String> = None;
    let mut price: Option<Decimal> = None;
    let mut json = false;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => scenario = it.next(),
            "--price" => price = it.next().and_then(|s| s.parse().ok()),
            "--json" => json = true,
            _ => {}
        }
    }
    Args {
        scenario,
        price,
        json,
    }
}

/// Built-in nine-year demo horizon under the 2003 mining code schedule.
fn demo_scenario() -> rent_data::Scenario {
    let horizon: [(i32, i64, i64, i64); 9] = [
        (2013, 110_000, 5_200_000, 1_400_000),
        (2014, 118_000, 5_500_000, 1_400_000),
        (2015, 124_000, 5_700_000, 1_300_000),
        (2016, 131_000, 5_900_000, 1_300_000),
        (2017, 127_000, 6_100_000, 1_200_000),
        (2018, 121_000, 6_200_000, 1_200_000),
        (2019, 114_000, 6_000_000, 1_100_000),
        (2020, 0, 2_800_000, 1_100_000),
        (2021, 96_000, 5_800_000, 1_000_000),
    ];
    let records = horizon
        .iter()
        .map(|&(year, qty, opex, dep)| YearRecord {
            year,
            quantity_oz: Decimal::new(qty, 0),
            opex: Decimal::new(opex, 0),
            depreciation: Decimal::new(dep, 0),
            tax_rate: Decimal::new(275, 3),
        })
        .collect();
    rent_data::Scenario {
        name: "demo-mine".to_string(),
        royalty_schedule: RoyaltySchedule {
            regime: "code-2003".to_string(),
            tiers: vec![
                RoyaltyTier {
                    price_floor: Decimal::ZERO,
                    rate: Decimal::new(3, 2),
                },
                RoyaltyTier {
                    price_floor: Decimal::new(1000, 0),
                    rate: Decimal::new(4, 2),
                },
                RoyaltyTier {
                    price_floor: Decimal::new(1300, 0),
                    rate: Decimal::new(5, 2),
                },
            ],
        },
        default_price: Decimal::new(1300, 0),
        records,
    }
}

#[derive(Serialize)]
struct RunOutput {
    scenario: String,
    regime: String,
    price: Decimal,
    results: Vec<YearResult>,
    aggregate: AggregateResult,
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(scenario = ?args.scenario, price = ?args.price, json = args.json, "starting CLI");

    let scenario = match &args.scenario {
        Some(path) => rent_data::load_scenario(path)?,
        None => demo_scenario(),
    };
    let price = args.price.unwrap_or(scenario.default_price);
    let prices = PriceAssumption::Flat(price);
    let results = rent_fiscal::run(&scenario.records, &prices, &scenario.royalty_schedule)?;
    let aggregate = rent_fiscal::aggregate(&results);

    if args.json {
        let out = RunOutput {
            scenario: scenario.name,
            regime: scenario.royalty_schedule.regime,
            price,
            results,
            aggregate,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Scenario {} | regime {} | price {} USD/oz | years {}",
        scenario.name,
        scenario.royalty_schedule.regime,
        price,
        results.len()
    );
    println!("year | revenue | royalty | taxable | tax | state share | investor flow");
    for r in &results {
        println!(
            "{} | {} | {} | {} | {} | {} | {}",
            r.year,
            r.revenue.round_dp(2),
            r.royalty.round_dp(2),
            r.taxable_profit.round_dp(2),
            r.corporate_tax.round_dp(2),
            r.state_share.round_dp(2),
            r.investor_flow.round_dp(2)
        );
    }
    println!(
        "KPI | revenue: ${} | state: ${} | investor: ${} | effective state rate: {}%",
        aggregate.total_revenue.round_dp(2),
        aggregate.total_state_share.round_dp(2),
        aggregate.total_investor_flow.round_dp(2),
        (aggregate.effective_state_rate * Decimal::new(100, 0)).round_dp(2)
    );

    Ok(())
}
