//! Property-Based Test Generators
//!
//! Provides proptest strategies for claim records, filter criteria, sort
//! requests and search text.

use chrono::{Duration, TimeZone, Utc};
use domain_claims::{
    ClaimField, ClaimRecord, ClaimStatus, FilterSpec, OneOrMany, SortOrder, SortSpec,
};
use proptest::option;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::ClaimRecordBuilder;
use crate::fixtures::{HOSPITALS, PROVIDERS};

/// Strategy for generating claim statuses
pub fn status_strategy() -> impl Strategy<Value = ClaimStatus> + Clone {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

/// Strategy for generating hospital names from the fixture set
pub fn hospital_strategy() -> impl Strategy<Value = String> + Clone {
    prop::sample::select(HOSPITALS.to_vec()).prop_map(str::to_string)
}

/// Strategy for generating costs with cents (0.00 to 99,999.99)
pub fn cost_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating date bounds in the accepted formats, plus junk
pub fn date_bound_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (2020i32..2026, 1u32..13, 1u32..29).prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
        (2020i32..2026, 1u32..13, 1u32..29, 0u32..24)
            .prop_map(|(y, m, d, h)| format!("{y:04}-{m:02}-{d:02}T{h:02}:00:00Z")),
        "[a-z]{1,8}",
    ]
}

/// Strategy for generating search text, biased toward regex metacharacters
pub fn search_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t]{1,4}",
        "[a-zA-Z0-9 ]{1,12}",
        r"[a-z.*+?^${}()|\[\]\\]{1,12}",
    ]
}

/// Strategy for generating a one-or-many criterion
pub fn one_or_many_strategy<T, S>(inner: S) -> impl Strategy<Value = OneOrMany<T>>
where
    T: Clone + std::fmt::Debug + 'static,
    S: Strategy<Value = T> + Clone + 'static,
{
    prop_oneof![
        inner.clone().prop_map(OneOrMany::One),
        prop::collection::vec(inner, 0..4).prop_map(OneOrMany::Many),
    ]
}

/// Strategy for generating arbitrary filter criteria
pub fn filter_spec_strategy() -> impl Strategy<Value = FilterSpec> {
    (
        option::of(100_000i64..100_030),
        option::of(one_or_many_strategy(hospital_strategy())),
        option::of(one_or_many_strategy(status_strategy())),
        option::of(prop::sample::select(PROVIDERS.to_vec()).prop_map(str::to_string)),
        option::of(cost_strategy()),
        option::of(cost_strategy()),
        option::of(date_bound_strategy()),
        option::of(date_bound_strategy()),
    )
        .prop_map(
            |(claim, hospital, status, provider, cost_from, cost_to, date_from, date_to)| FilterSpec {
                claim,
                hospital,
                status,
                provider,
                cost_from,
                cost_to,
                service_date_from: date_from,
                service_date_to: date_to,
                ..Default::default()
            },
        )
}

/// Strategy for generating sort requests, sometimes absent
pub fn sort_spec_strategy() -> impl Strategy<Value = Option<SortSpec>> {
    option::of(
        (
            prop::sample::select(ClaimField::ALL.to_vec()),
            prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)],
        )
            .prop_map(|(field, order)| SortSpec::new(field, order)),
    )
}

/// Strategy for generating claim records
pub fn claim_record_strategy() -> impl Strategy<Value = ClaimRecord> {
    (
        100_000i64..100_100,
        hospital_strategy(),
        prop::sample::select(PROVIDERS.to_vec()),
        status_strategy(),
        cost_strategy(),
        0i64..730,
    )
        .prop_map(|(claim, hospital, provider, status, cost, days)| {
            let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
            ClaimRecordBuilder::new()
                .with_claim(claim)
                .with_hospital(hospital)
                .with_provider(provider)
                .with_status(status)
                .with_cost(cost)
                .with_service_date(base + Duration::days(days))
                .build()
        })
}

/// Strategy for generating small claim datasets
pub fn claim_dataset_strategy(max: usize) -> impl Strategy<Value = Vec<ClaimRecord>> {
    prop::collection::vec(claim_record_strategy(), 0..max)
}
