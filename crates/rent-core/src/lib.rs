#![deny(warnings)]

//! Core domain model and invariants for the mining rent-sharing simulator.
//!
//! This crate defines the serializable input and output types shared across
//! the simulation with validation helpers to guarantee basic invariants:
//! per-year production records, price assumptions, the price-tiered royalty
//! schedule, and the per-year / aggregate result contracts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Production and cost inputs for one fiscal year of mine operation.
///
/// Records are immutable once supplied; ascending `year` defines the
/// simulation timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Fiscal year, unique within a simulation run.
    pub year: i32,
    /// Ounces of gold recovered that year (>= 0).
    pub quantity_oz: Decimal,
    /// Operating expenditure in USD (>= 0).
    pub opex: Decimal,
    /// Allowable depreciation/amortization charge in USD (>= 0),
    /// precomputed by the data provider.
    pub depreciation: Decimal,
    /// Statutory corporate income tax rate in [0, 1].
    pub tax_rate: Decimal,
}

/// Gold-price assumption for a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PriceAssumption {
    /// One price in USD/oz applied uniformly to every year.
    Flat(Decimal),
    /// Year-keyed price series; every simulated year must be present.
    PerYear(BTreeMap<i32, Decimal>),
}

impl PriceAssumption {
    /// Resolve the price for a given year. `None` when a year-keyed series
    /// has no entry for `year`.
    pub fn price_for(&self, year: i32) -> Option<Decimal> {
        match self {
            PriceAssumption::Flat(price) => Some(*price),
            PriceAssumption::PerYear(series) => series.get(&year).copied(),
        }
    }
}

/// One tier of a progressive royalty schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoyaltyTier {
    /// Lowest gold price (USD/oz) at which this tier applies.
    pub price_floor: Decimal,
    /// Royalty rate on gross revenue in [0, 1] while this tier applies.
    pub rate: Decimal,
}

/// Price-tiered royalty schedule of a fiscal regime.
///
/// The schedule is configuration data, versioned by `regime`, never baked
/// into the engine: tiers are ordered by strictly ascending `price_floor`,
/// starting at zero, and the tier with the highest floor not exceeding the
/// year's price supplies the rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoyaltySchedule {
    /// Human-readable regime version label, e.g. "code-2003".
    pub regime: String,
    /// Tiers in strictly ascending `price_floor` order.
    pub tiers: Vec<RoyaltyTier>,
}

impl RoyaltySchedule {
    /// Royalty rate applicable at `price`: the rate of the tier with the
    /// highest `price_floor` not exceeding `price`.
    ///
    /// Assumes a schedule accepted by [`validate_schedule`]; on an empty
    /// schedule this returns zero rather than panicking.
    pub fn rate_for(&self, price: Decimal) -> Decimal {
        self.tiers
            .iter()
            .take_while(|tier| tier.price_floor <= price)
            .last()
            .map(|tier| tier.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Fiscal outcome of one simulated year. All monetary fields are USD.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearResult {
    /// Fiscal year the result belongs to.
    pub year: i32,
    /// Gross revenue: quantity_oz * price.
    pub revenue: Decimal,
    /// Royalty levied on revenue (>= 0, <= revenue).
    pub royalty: Decimal,
    /// Corporate-tax base: revenue - opex - depreciation - royalty.
    /// Reported as-is; may be negative in a loss year.
    pub taxable_profit: Decimal,
    /// Corporate income tax (>= 0; zero whenever taxable profit <= 0).
    pub corporate_tax: Decimal,
    /// Government take: royalty + corporate tax.
    pub state_share: Decimal,
    /// Net cash retained by the operator: revenue - opex - royalty - tax.
    /// Depreciation is a tax shield only and is excluded here.
    pub investor_flow: Decimal,
}

/// Portfolio-level reduction of a year-result sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Sum of revenue over the simulated horizon.
    pub total_revenue: Decimal,
    /// Sum of the government take.
    pub total_state_share: Decimal,
    /// Sum of the investor net cash flow.
    pub total_investor_flow: Decimal,
    /// total_state_share / total_revenue; zero when there was no revenue.
    pub effective_state_rate: Decimal,
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Gold quantity must be non-negative.
    #[error("negative gold quantity in year {0}")]
    NegativeQuantity(i32),
    /// Monetary inputs must be non-negative.
    #[error("negative {field} in year {year}")]
    NegativeMoney { year: i32, field: &'static str },
    /// Corporate tax rate must lie within [0, 1].
    #[error("tax rate outside [0,1] in year {0}")]
    TaxRateOutOfRange(i32),
    /// Gold price must be strictly positive.
    #[error("gold price must be > 0")]
    NonPositivePrice,
    /// A royalty schedule needs at least one tier.
    #[error("royalty schedule has no tiers")]
    EmptySchedule,
    /// The first tier must start at price 0 so every price maps to a rate.
    #[error("first royalty tier must start at price 0")]
    ScheduleBaseNotZero,
    /// Tier price floors must be strictly ascending.
    #[error("royalty tier floors must be strictly ascending")]
    UnorderedTiers,
    /// Royalty rates are revenue fractions within [0, 1].
    #[error("royalty rate outside [0,1] in tier at floor {0}")]
    RoyaltyRateOutOfRange(Decimal),
}

/// Validate a per-year production record.
pub fn validate_record(record: &YearRecord) -> Result<(), ValidationError> {
    if record.quantity_oz < Decimal::ZERO {
        return Err(ValidationError::NegativeQuantity(record.year));
    }
    if record.opex < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney {
            year: record.year,
            field: "opex",
        });
    }
    if record.depreciation < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney {
            year: record.year,
            field: "depreciation",
        });
    }
    if record.tax_rate < Decimal::ZERO || record.tax_rate > Decimal::ONE {
        return Err(ValidationError::TaxRateOutOfRange(record.year));
    }
    Ok(())
}

/// Validate a resolved per-year gold price.
pub fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice);
    }
    Ok(())
}

/// Validate a royalty schedule: non-empty, base tier at price 0, floors
/// strictly ascending, every rate within [0, 1].
pub fn validate_schedule(schedule: &RoyaltySchedule) -> Result<(), ValidationError> {
    let Some(first) = schedule.tiers.first() else {
        return Err(ValidationError::EmptySchedule);
    };
    if first.price_floor != Decimal::ZERO {
        return Err(ValidationError::ScheduleBaseNotZero);
    }
    let mut prev_floor: Option<Decimal> = None;
    for tier in &schedule.tiers {
        if let Some(prev) = prev_floor {
            if tier.price_floor <= prev {
                return Err(ValidationError::UnorderedTiers);
            }
        }
        if tier.rate < Decimal::ZERO || tier.rate > Decimal::ONE {
            return Err(ValidationError::RoyaltyRateOutOfRange(tier.price_floor));
        }
        prev_floor = Some(tier.price_floor);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(year: i32) -> YearRecord {
        YearRecord {
            year,
            quantity_oz: Decimal::new(100_000, 0),
            opex: Decimal::new(5_000_000, 0),
            depreciation: Decimal::new(1_000_000, 0),
            tax_rate: Decimal::new(275, 3), // 0.275
        }
    }

    fn reference_schedule() -> RoyaltySchedule {
        RoyaltySchedule {
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
        }
    }

    #[test]
    fn serde_roundtrip_year_record() {
        let r = record(2013);
        let s = serde_json::to_string(&r).unwrap();
        let back: YearRecord = serde_json::from_str(&s).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn serde_roundtrip_schedule() {
        let schedule = reference_schedule();
        let s = serde_json::to_string_pretty(&schedule).unwrap();
        let back: RoyaltySchedule = serde_json::from_str(&s).unwrap();
        assert_eq!(back.regime, "code-2003");
        assert_eq!(back.tiers.len(), 3);
        assert_eq!(back, schedule);
    }

    #[test]
    fn valid_record_passes() {
        validate_record(&record(2013)).unwrap();
    }

    #[test]
    fn negative_fields_rejected() {
        let mut r = record(2014);
        r.quantity_oz = Decimal::new(-1, 0);
        assert_eq!(
            validate_record(&r),
            Err(ValidationError::NegativeQuantity(2014))
        );

        let mut r = record(2014);
        r.opex = Decimal::new(-1, 0);
        assert_eq!(
            validate_record(&r),
            Err(ValidationError::NegativeMoney {
                year: 2014,
                field: "opex"
            })
        );

        let mut r = record(2014);
        r.depreciation = Decimal::new(-1, 0);
        assert_eq!(
            validate_record(&r),
            Err(ValidationError::NegativeMoney {
                year: 2014,
                field: "depreciation"
            })
        );
    }

    #[test]
    fn tax_rate_bounds() {
        let mut r = record(2015);
        r.tax_rate = Decimal::new(-1, 2);
        assert_eq!(
            validate_record(&r),
            Err(ValidationError::TaxRateOutOfRange(2015))
        );
        r.tax_rate = Decimal::new(101, 2);
        assert_eq!(
            validate_record(&r),
            Err(ValidationError::TaxRateOutOfRange(2015))
        );
        r.tax_rate = Decimal::ONE;
        validate_record(&r).unwrap();
        r.tax_rate = Decimal::ZERO;
        validate_record(&r).unwrap();
    }

    #[test]
    fn price_must_be_positive() {
        assert_eq!(
            validate_price(Decimal::ZERO),
            Err(ValidationError::NonPositivePrice)
        );
        assert_eq!(
            validate_price(Decimal::new(-1300, 0)),
            Err(ValidationError::NonPositivePrice)
        );
        validate_price(Decimal::new(1, 2)).unwrap();
    }

    #[test]
    fn schedule_validation() {
        validate_schedule(&reference_schedule()).unwrap();

        let empty = RoyaltySchedule {
            regime: "empty".into(),
            tiers: vec![],
        };
        assert_eq!(validate_schedule(&empty), Err(ValidationError::EmptySchedule));

        let no_base = RoyaltySchedule {
            regime: "no-base".into(),
            tiers: vec![RoyaltyTier {
                price_floor: Decimal::new(1000, 0),
                rate: Decimal::new(4, 2),
            }],
        };
        assert_eq!(
            validate_schedule(&no_base),
            Err(ValidationError::ScheduleBaseNotZero)
        );

        let mut unordered = reference_schedule();
        unordered.tiers[2].price_floor = Decimal::new(1000, 0);
        assert_eq!(
            validate_schedule(&unordered),
            Err(ValidationError::UnorderedTiers)
        );

        let mut bad_rate = reference_schedule();
        bad_rate.tiers[1].rate = Decimal::new(15, 1); // 1.5
        assert_eq!(
            validate_schedule(&bad_rate),
            Err(ValidationError::RoyaltyRateOutOfRange(Decimal::new(1000, 0)))
        );
    }

    #[test]
    fn rate_for_selects_highest_floor_not_exceeding_price() {
        let schedule = reference_schedule();
        assert_eq!(
            schedule.rate_for(Decimal::new(99_999, 2)), // 999.99
            Decimal::new(3, 2)
        );
        assert_eq!(schedule.rate_for(Decimal::new(1000, 0)), Decimal::new(4, 2));
        assert_eq!(schedule.rate_for(Decimal::new(1299, 0)), Decimal::new(4, 2));
        assert_eq!(schedule.rate_for(Decimal::new(1300, 0)), Decimal::new(5, 2));
        assert_eq!(schedule.rate_for(Decimal::new(2500, 0)), Decimal::new(5, 2));
    }

    #[test]
    fn price_assumption_resolution() {
        let flat = PriceAssumption::Flat(Decimal::new(1300, 0));
        assert_eq!(flat.price_for(2013), Some(Decimal::new(1300, 0)));
        assert_eq!(flat.price_for(2099), Some(Decimal::new(1300, 0)));

        let mut series = BTreeMap::new();
        series.insert(2013, Decimal::new(1411, 0));
        series.insert(2014, Decimal::new(1266, 0));
        let keyed = PriceAssumption::PerYear(series);
        assert_eq!(keyed.price_for(2014), Some(Decimal::new(1266, 0)));
        assert_eq!(keyed.price_for(2015), None);
    }

    proptest! {
        #[test]
        fn in_range_tax_rates_validate(milli in 0i64..=1000) {
            let mut r = record(2016);
            r.tax_rate = Decimal::new(milli, 3);
            prop_assert!(validate_record(&r).is_ok());
        }

        #[test]
        fn non_negative_inputs_validate(qty in 0i64..10_000_000,
                                        opex in 0i64..1_000_000_000,
                                        dep in 0i64..1_000_000_000) {
            let r = YearRecord {
                year: 2017,
                quantity_oz: Decimal::new(qty, 1),
                opex: Decimal::new(opex, 0),
                depreciation: Decimal::new(dep, 0),
                tax_rate: Decimal::new(275, 3),
            };
            prop_assert!(validate_record(&r).is_ok());
        }

        #[test]
        fn positive_prices_validate(cents in 1i64..1_000_000) {
            prop_assert!(validate_price(Decimal::new(cents, 2)).is_ok());
        }
    }
}
