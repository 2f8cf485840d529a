use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

fn build_horizon(n_years: usize) -> (Vec<rent_core::YearRecord>, rent_core::RoyaltySchedule) {
    let schedule = rent_core::RoyaltySchedule {
        regime: "code-2003".into(),
        tiers: vec![
            rent_core::RoyaltyTier {
                price_floor: Decimal::ZERO,
                rate: Decimal::new(3, 2),
            },
            rent_core::RoyaltyTier {
                price_floor: Decimal::new(1000, 0),
                rate: Decimal::new(4, 2),
            },
            rent_core::RoyaltyTier {
                price_floor: Decimal::new(1300, 0),
                rate: Decimal::new(5, 2),
            },
        ],
    };
    let mut records = Vec::with_capacity(n_years);
    for i in 0..n_years {
        records.push(rent_core::YearRecord {
            year: 2000 + i as i32,
            quantity_oz: Decimal::new(80_000 + (i as i64 % 7) * 5_000, 0),
            opex: Decimal::new(4_000_000 + (i as i64 % 5) * 300_000, 0),
            depreciation: Decimal::new(1_000_000, 0),
            tax_rate: Decimal::new(275, 3),
        });
    }
    (records, schedule)
}

fn bench_run(c: &mut Criterion) {
    let (records, schedule) = build_horizon(200);
    let prices = rent_core::PriceAssumption::Flat(Decimal::new(1300, 0));
    c.bench_function("fiscal cascade 200y", |b| {
        b.iter(|| {
            let results = rent_fiscal::run(&records, &prices, &schedule).unwrap();
            let _ = black_box(rent_fiscal::aggregate(&results));
        })
    });
}

criterion_group!(benches, bench_run);
criterion_main!(benches);
