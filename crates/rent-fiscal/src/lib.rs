#![deny(warnings)]

//! Fiscal engine: per-year gold rent-sharing splits and their aggregation.
//!
//! Given a production record, a resolved gold price, and a royalty schedule,
//! [`compute_year`] derives how one year's revenue divides between the state
//! and the investor. [`run`] applies it across a multi-year horizon and
//! [`aggregate`] reduces the results to portfolio totals.
//!
//! All computation is in `rust_decimal::Decimal`, so the conservation
//! identity `state_share + investor_flow + opex == revenue` holds exactly,
//! not within a float tolerance.

use rent_core::{
    AggregateResult, PriceAssumption, RoyaltySchedule, ValidationError, YearRecord, YearResult,
};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Errors produced by the fiscal engine. All are caller errors: computation
/// itself cannot fail once inputs are accepted.
#[derive(Debug, Error, PartialEq)]
pub enum FiscalError {
    /// A record, price, or schedule violated a domain invariant.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    /// The price assumption has no entry for a simulated year.
    #[error("no price assumption for year {0}")]
    MissingPrice(i32),
    /// Two input records carry the same fiscal year.
    #[error("duplicate record for year {0}")]
    DuplicateYear(i32),
}

/// Compute the fiscal split for a single year.
///
/// The cascade, in order:
/// - revenue = quantity_oz * price
/// - royalty = revenue * schedule rate at `price`
/// - taxable_profit = revenue - opex - depreciation - royalty (no floor)
/// - corporate_tax = max(taxable_profit, 0) * tax_rate (losses are not refunded)
/// - state_share = royalty + corporate_tax
/// - investor_flow = revenue - opex - royalty - corporate_tax
///
/// Depreciation shrinks the tax base but is not a cash outflow, so it is
/// absent from `investor_flow`.
pub fn compute_year(
    record: &YearRecord,
    price: Decimal,
    schedule: &RoyaltySchedule,
) -> Result<YearResult, FiscalError> {
    rent_core::validate_record(record)?;
    rent_core::validate_price(price)?;
    rent_core::validate_schedule(schedule)?;

    let revenue = record.quantity_oz * price;
    let royalty = revenue * schedule.rate_for(price);
    let taxable_profit = revenue - record.opex - record.depreciation - royalty;
    let corporate_tax = taxable_profit.max(Decimal::ZERO) * record.tax_rate;
    let state_share = royalty + corporate_tax;
    let investor_flow = revenue - record.opex - royalty - corporate_tax;

    Ok(YearResult {
        year: record.year,
        revenue,
        royalty,
        taxable_profit,
        corporate_tax,
        state_share,
        investor_flow,
    })
}

/// Run the fiscal cascade over a horizon of year records.
///
/// Results come back in the same order as `records`. Each year is
/// independent: no state carries over between years, so the horizon can be
/// computed in parallel when the `parallel` feature is enabled without
/// changing any output.
pub fn run(
    records: &[YearRecord],
    prices: &PriceAssumption,
    schedule: &RoyaltySchedule,
) -> Result<Vec<YearResult>, FiscalError> {
    rent_core::validate_schedule(schedule)?;

    // Validate and resolve prices sequentially so the first offending year
    // is reported the same way regardless of the compute backend.
    let mut seen = BTreeSet::new();
    let mut priced: Vec<(&YearRecord, Decimal)> = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.year) {
            return Err(FiscalError::DuplicateYear(record.year));
        }
        rent_core::validate_record(record)?;
        let price = prices
            .price_for(record.year)
            .ok_or(FiscalError::MissingPrice(record.year))?;
        rent_core::validate_price(price)?;
        priced.push((record, price));
    }

    debug!(
        years = records.len(),
        regime = %schedule.regime,
        "running fiscal cascade"
    );

    #[cfg(feature = "parallel")]
    let results: Result<Vec<YearResult>, FiscalError> = priced
        .par_iter()
        .map(|(record, price)| compute_year(record, *price, schedule))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Result<Vec<YearResult>, FiscalError> = priced
        .iter()
        .map(|(record, price)| compute_year(record, *price, schedule))
        .collect();

    results
}

/// Reduce a sequence of year results to portfolio totals.
///
/// The effective state rate is total state share over total revenue, zero
/// when the horizon produced no revenue at all.
pub fn aggregate(results: &[YearResult]) -> AggregateResult {
    let mut total_revenue = Decimal::ZERO;
    let mut total_state_share = Decimal::ZERO;
    let mut total_investor_flow = Decimal::ZERO;
    for r in results {
        total_revenue += r.revenue;
        total_state_share += r.state_share;
        total_investor_flow += r.investor_flow;
    }
    let effective_state_rate = if total_revenue > Decimal::ZERO {
        total_state_share / total_revenue
    } else {
        Decimal::ZERO
    };
    AggregateResult {
        total_revenue,
        total_state_share,
        total_investor_flow,
        effective_state_rate,
    }
}
