//! Comprehensive tests for domain_claims

use std::sync::Arc;

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::PageParams;

use domain_claims::query::{apply_pipeline, is_paginated, matches, SEARCH_FIELDS};
use domain_claims::{
    build_pipeline, compile_filters, ClaimField, ClaimRecord, ClaimStatus, ClaimsQueryService,
    ClaimsServiceConfig, ExportService, FailPoint, FilterSpec, InMemoryClaimsStore, OneOrMany,
    SortSpec, Stage, DEFAULT_COLLECTION,
};
use test_utils::{
    claim_dataset_strategy, filter_spec_strategy, search_strategy, sort_spec_strategy,
    ClaimFixtures, DateFixtures,
};

fn service_over(store: InMemoryClaimsStore) -> (ClaimsQueryService, Arc<InMemoryClaimsStore>) {
    let store = Arc::new(store);
    let service = ClaimsQueryService::new(store.clone(), ClaimsServiceConfig::default());
    (service, store)
}

fn claim_numbers(rows: &[ClaimRecord]) -> Vec<i64> {
    rows.iter().map(|r| r.claim).collect()
}

// ============================================================================
// Listing Tests
// ============================================================================

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_page_envelope() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let page = service
            .list_claims(PageParams::new(1, 10), &FilterSpec::new(), None, "")
            .await
            .unwrap();

        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.data.len(), 10);
        // Newest service date first by default
        assert_eq!(page.data[0].claim, 100_024);
        assert_eq!(page.data[9].claim, 100_015);
    }

    #[tokio::test]
    async fn test_last_partial_page() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let page = service
            .list_claims(PageParams::new(3, 10), &FilterSpec::new(), None, "")
            .await
            .unwrap();

        assert_eq!(
            claim_numbers(&page.data),
            vec![100_004, 100_003, 100_002, 100_001, 100_000]
        );
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let page = service
            .list_claims(PageParams::new(4, 10), &FilterSpec::new(), None, "")
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_no_matches_still_reports_one_page() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let page = service
            .list_claims(
                PageParams::default(),
                &FilterSpec::new().hospital("Nowhere"),
                None,
                "",
            )
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_hospital_filter() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let page = service
            .list_claims(
                PageParams::new(1, 25),
                &FilterSpec::new().hospital("Calvary"),
                None,
                "",
            )
            .await
            .unwrap();

        assert_eq!(page.total_count, 7);
        assert_eq!(page.total_pages, 1);
        assert!(page.data.iter().all(|c| c.hospital == "Calvary"));
    }

    #[tokio::test]
    async fn test_status_set_filter() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));
        let filters = FilterSpec::new().statuses([ClaimStatus::Paid, ClaimStatus::Assessed]);

        let total = service.count_claims(&filters, "").await.unwrap();

        assert_eq!(total, 10);
    }

    #[tokio::test]
    async fn test_cost_range_is_inclusive() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));
        let filters = FilterSpec::new().cost_between(Some(dec!(1000)), Some(dec!(1500)));

        let page = service
            .list_claims(PageParams::new(1, 25), &filters, Some(&SortSpec::asc(ClaimField::Cost)), "")
            .await
            .unwrap();

        assert_eq!(page.total_count, 6);
        assert_eq!(page.data.first().unwrap().cost, dec!(1000));
        assert_eq!(page.data.last().unwrap().cost, dec!(1500));
    }

    #[tokio::test]
    async fn test_service_date_range() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));
        let filters = FilterSpec::new().service_date_between(Some("2024-01-10"), Some("2024-01-12"));

        let page = service
            .list_claims(PageParams::default(), &filters, None, "")
            .await
            .unwrap();

        assert_eq!(claim_numbers(&page.data), vec![100_011, 100_010, 100_009]);
    }

    #[tokio::test]
    async fn test_sort_ascending_by_cost() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let page = service
            .list_claims(
                PageParams::new(1, 3),
                &FilterSpec::new(),
                Some(&SortSpec::asc(ClaimField::Cost)),
                "",
            )
            .await
            .unwrap();

        assert_eq!(claim_numbers(&page.data), vec![100_000, 100_001, 100_002]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let upper = service.count_claims(&FilterSpec::new(), "Patient 1").await.unwrap();
        let lower = service.count_claims(&FilterSpec::new(), "patient 1").await.unwrap();

        assert_eq!(upper, 10);
        assert_eq!(lower, 10);
    }

    #[tokio::test]
    async fn test_provider_substring() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let total = service
            .count_claims(&FilterSpec::new().provider("dr. smith"), "")
            .await
            .unwrap();

        assert_eq!(total, 9);
    }

    #[tokio::test]
    async fn test_search_matches_metacharacters_literally() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::with_metacharacters()));

        let page = service
            .list_claims(PageParams::default(), &FilterSpec::new(), None, "test.search+weird?chars")
            .await
            .unwrap();

        assert_eq!(claim_numbers(&page.data), vec![900_001]);

        let brackets = service
            .count_claims(&FilterSpec::new(), "(left) [minor]")
            .await
            .unwrap();
        assert_eq!(brackets, 1);

        let pipe = service.count_claims(&FilterSpec::new(), "AGR|2024").await.unwrap();
        assert_eq!(pipe, 1);
    }

    #[tokio::test]
    async fn test_provider_dot_is_literal() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::with_metacharacters()));

        // "Dr. Smith" must not match "Dr Smith"
        let total = service
            .count_claims(&FilterSpec::new().provider("Dr. Smith"), "")
            .await
            .unwrap();

        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = Arc::new(ClaimFixtures::store(ClaimFixtures::standard()));
        let service = ClaimsQueryService::new(store, ClaimsServiceConfig::new("archived_claims"));

        let page = service
            .list_claims(PageParams::default(), &FilterSpec::new(), None, "")
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_count_filter_matches_pipeline_filter() {
        let (service, store) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));
        let filters = FilterSpec::new()
            .hospital("Calvary")
            .cost_between(Some(dec!(200)), None);

        service
            .list_claims(PageParams::new(2, 2), &filters, None, "patient")
            .await
            .unwrap();

        let handle = store.handle(DEFAULT_COLLECTION).unwrap();
        let pipelines = handle.recorded_pipelines().await;
        let counts = handle.recorded_counts().await;

        assert_eq!(pipelines.len(), 1);
        assert_eq!(counts.len(), 1);
        match &pipelines[0][0] {
            Stage::Match(filter) => assert_eq!(filter, &counts[0]),
            other => panic!("expected a match stage first, got {other:?}"),
        }
        assert!(matches!(pipelines[0].last(), Some(Stage::Limit(2))));
    }

    #[tokio::test]
    async fn test_count_failure_fails_the_call() {
        let (service, store) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));
        store
            .handle(DEFAULT_COLLECTION)
            .unwrap()
            .fail_on(FailPoint::Count)
            .await;

        let result = service
            .list_claims(PageParams::default(), &FilterSpec::new(), None, "")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_pipeline_failure_fails_the_call() {
        let (service, store) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));
        store
            .handle(DEFAULT_COLLECTION)
            .unwrap()
            .fail_on(FailPoint::Pipeline)
            .await;

        let result = service
            .list_claims(PageParams::default(), &FilterSpec::new(), None, "")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_writes_are_visible_to_the_next_call() {
        let (service, store) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        store
            .handle(DEFAULT_COLLECTION)
            .unwrap()
            .insert(ClaimFixtures::random(5))
            .await;
        let page = service
            .list_claims(PageParams::new(1, 10), &FilterSpec::new(), None, "")
            .await
            .unwrap();

        assert_eq!(page.total_count, 30);
        assert_eq!(page.total_pages, 3);
    }
}

// ============================================================================
// Filter Options Tests
// ============================================================================

mod options_tests {
    use super::*;

    #[tokio::test]
    async fn test_distinct_options() {
        let (service, _) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        let options = service.distinct_options().await.unwrap().sorted();

        assert_eq!(
            options.hospitals,
            vec!["Calvary", "Launceston General", "Royal Hobart", "St Vincent"]
        );
        assert_eq!(options.providers, vec!["Dr. Jones", "Dr. Nguyen", "Dr. Smith"]);
        assert_eq!(
            options.statuses,
            vec!["Assessed", "Cancelled", "Paid", "Received", "Verified"]
        );
    }

    #[tokio::test]
    async fn test_distinct_options_ignore_filters() {
        let (service, store) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));

        service
            .list_claims(PageParams::default(), &FilterSpec::new().hospital("Calvary"), None, "")
            .await
            .unwrap();
        let options = service.distinct_options().await.unwrap();

        assert_eq!(options.hospitals.len(), 4);
        assert_eq!(store.handle(DEFAULT_COLLECTION).unwrap().recorded_counts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_failure_propagates() {
        let (service, store) = service_over(ClaimFixtures::store(ClaimFixtures::standard()));
        store
            .handle(DEFAULT_COLLECTION)
            .unwrap()
            .fail_on(FailPoint::Distinct)
            .await;

        assert!(service.distinct_options().await.is_err());
    }
}

// ============================================================================
// Export Tests
// ============================================================================

mod export_tests {
    use super::*;

    fn export_over(store: &Arc<InMemoryClaimsStore>) -> ExportService {
        ExportService::new(store.clone(), ClaimsServiceConfig::default())
    }

    #[tokio::test]
    async fn test_export_returns_every_match() {
        let store = Arc::new(ClaimFixtures::store(ClaimFixtures::standard()));

        let rows = export_over(&store)
            .export_claims(&FilterSpec::new().hospital("Calvary"), None, "")
            .await
            .unwrap();

        assert_eq!(
            claim_numbers(&rows),
            vec![100_024, 100_020, 100_016, 100_012, 100_008, 100_004, 100_000]
        );
    }

    #[tokio::test]
    async fn test_export_has_no_skip_or_limit() {
        let store = Arc::new(ClaimFixtures::store(ClaimFixtures::standard()));

        let rows = export_over(&store)
            .export_claims(&FilterSpec::new(), Some(&SortSpec::asc(ClaimField::Claim)), "")
            .await
            .unwrap();

        assert_eq!(rows.len(), 25);
        assert_eq!(rows[0].claim, 100_000);

        let pipelines = store
            .handle(DEFAULT_COLLECTION)
            .unwrap()
            .recorded_pipelines()
            .await;
        assert!(pipelines.iter().all(|stages| !is_paginated(stages)));
    }

    #[tokio::test]
    async fn test_export_empty_collection() {
        let store = Arc::new(InMemoryClaimsStore::new());

        let rows = export_over(&store)
            .export_claims(&FilterSpec::new(), None, "anything")
            .await
            .unwrap();

        assert!(rows.is_empty());
    }
}

// ============================================================================
// Evaluation Tests
// ============================================================================

mod eval_tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = compile_filters(&FilterSpec::new(), "");
        assert!(ClaimFixtures::standard().iter().all(|c| matches(c, &filter)));
    }

    #[test]
    fn test_unset_contract_type_never_matches() {
        let filters = FilterSpec {
            contract_type: Some(OneOrMany::One("Corporate".to_string())),
            ..Default::default()
        };
        let filter = compile_filters(&filters, "");

        assert!(ClaimFixtures::standard().iter().all(|c| !matches(c, &filter)));
    }

    #[test]
    fn test_apply_pipeline_orders_then_pages() {
        let stages = build_pipeline(
            &FilterSpec::new(),
            Some(&SortSpec::asc(ClaimField::ServiceDate)),
            5,
            3,
            "",
        );
        let rows = apply_pipeline(ClaimFixtures::standard(), &stages);

        assert_eq!(claim_numbers(&rows), vec![100_005, 100_006, 100_007]);
    }

    #[test]
    fn test_date_bound_is_inclusive() {
        let day = DateFixtures::service_date() + Duration::days(3);
        let bound = day.to_rfc3339();
        let filters = FilterSpec::new().service_date_between(Some(&bound), Some(&bound));
        let filter = compile_filters(&filters, "");

        let matched: Vec<_> = ClaimFixtures::standard()
            .into_iter()
            .filter(|c| matches(c, &filter))
            .collect();
        assert_eq!(claim_numbers(&matched), vec![100_003]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn search_oracle(record: &ClaimRecord, search: &str) -> bool {
    if search.trim().is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    SEARCH_FIELDS.iter().any(|field| {
        let haystack = match field {
            ClaimField::Patient => &record.patient,
            ClaimField::Diagnosis => &record.diagnosis,
            ClaimField::Provider => &record.provider,
            ClaimField::Hospital => &record.hospital,
            ClaimField::Agreement => &record.agreement,
            _ => unreachable!(),
        };
        haystack.to_lowercase().contains(&needle)
    })
}

proptest! {
    #[test]
    fn prop_compilation_is_deterministic(
        filters in filter_spec_strategy(),
        sort in sort_spec_strategy(),
        search in search_strategy(),
        skip in 0u64..100,
        limit in 0u64..100,
    ) {
        prop_assert_eq!(compile_filters(&filters, &search), compile_filters(&filters, &search));
        prop_assert_eq!(
            build_pipeline(&filters, sort.as_ref(), skip, limit, &search),
            build_pipeline(&filters, sort.as_ref(), skip, limit, &search)
        );
    }

    #[test]
    fn prop_stage_order_is_fixed(
        filters in filter_spec_strategy(),
        sort in sort_spec_strategy(),
        search in search_strategy(),
        skip in 0u64..100,
        limit in 0u64..100,
    ) {
        let rank = |stage: &Stage| match stage {
            Stage::Match(_) => 0,
            Stage::Sort(_) => 1,
            Stage::Skip(_) => 2,
            Stage::Limit(_) => 3,
        };
        let stages = build_pipeline(&filters, sort.as_ref(), skip, limit, &search);
        let ranks: Vec<_> = stages.iter().map(rank).collect();

        prop_assert!(ranks.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(ranks.contains(&1));
        prop_assert_eq!(ranks.contains(&2), skip > 0);
        prop_assert_eq!(ranks.contains(&3), limit > 0);
    }

    #[test]
    fn prop_search_matches_literal_substring(
        records in claim_dataset_strategy(20),
        search in search_strategy(),
    ) {
        let filter = compile_filters(&FilterSpec::new(), &search);
        for record in &records {
            prop_assert_eq!(matches(record, &filter), search_oracle(record, &search));
        }
    }

    #[test]
    fn prop_single_value_and_singleton_set_agree(
        records in claim_dataset_strategy(20),
        hospital in test_utils::hospital_strategy(),
    ) {
        let one = compile_filters(&FilterSpec::new().hospital(hospital.clone()), "");
        let many = compile_filters(&FilterSpec::new().hospitals([hospital]), "");
        for record in &records {
            prop_assert_eq!(matches(record, &one), matches(record, &many));
        }
    }

    #[test]
    fn prop_page_envelope_is_consistent(
        records in claim_dataset_strategy(40),
        filters in filter_spec_strategy(),
        page in 1i64..6,
        limit in 1i64..15,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let expected_total = {
            let filter = compile_filters(&filters, "");
            records.iter().filter(|r| matches(r, &filter)).count() as u64
        };
        let (service, _) = service_over(ClaimFixtures::store(records));
        let params = PageParams::new(page, limit);

        let result = runtime
            .block_on(service.list_claims(params, &filters, None, ""))
            .unwrap();

        let remaining = expected_total.saturating_sub(params.skip());
        prop_assert_eq!(result.total_count, expected_total);
        prop_assert_eq!(result.data.len() as u64, remaining.min(params.limit()));
        prop_assert_eq!(result.total_pages, expected_total.div_ceil(params.limit()).max(1));
    }
}
