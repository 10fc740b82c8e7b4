//! Pagination tests
//!
//! Window resolution, the page envelope and the conditional count query:
//! - the envelope is returned only with page/offset and a resolved limit
//! - a full window triggers exactly one count query, a short one none
//! - the count query reuses the request's filter
//! - page and offset arithmetic saturates instead of overflowing

mod common;

use common::{counted, fixture, ids, options, request};
use docquery::crud::GetManyResponse;
use serde_json::json;

// =============================================================================
// Page Envelope
// =============================================================================

#[test]
fn test_first_page_of_ten() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({})));

    let response = service
        .get_many(&request(json!({"limit": 3, "page": 1})))
        .unwrap();

    let page = response.page_info().expect("paginated");
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.count, 3);
    assert_eq!(page.total, 10);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_count, 4);
    assert_eq!(ids(&page.data), vec![1000, 1001, 1002]);
    assert_eq!(service.store().counts(), 1);
}

#[test]
fn test_short_last_page_skips_count() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({})));

    let response = service
        .get_many(&request(json!({"limit": 3, "page": 4})))
        .unwrap();

    let page = response.page_info().expect("paginated");
    assert_eq!(ids(&page.data), vec![1009]);
    assert_eq!(page.total, 10);
    assert_eq!(page.page, 4);
    assert_eq!(page.page_count, 4);
    assert_eq!(service.store().counts(), 0);
    assert_eq!(service.store().finds(), 1);
}

#[test]
fn test_offset_computes_page() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({"query": {"limit": 2}})));

    let response = service.get_many(&request(json!({"offset": 4}))).unwrap();

    let page = response.page_info().expect("paginated");
    assert_eq!(ids(&page.data), vec![1004, 1005]);
    assert_eq!(page.page, 3);
    assert_eq!(page.page_count, 5);
}

#[test]
fn test_empty_result_page() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({})));

    let response = service
        .get_many(&request(json!({
            "filter": [{"field": "name", "operator": "eq", "value": "nobody"}],
            "limit": 5,
            "page": 1
        })))
        .unwrap();

    let page = response.page_info().expect("paginated");
    assert!(page.data.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.page_count, 1);
}

#[test]
fn test_page_past_the_end_reports_skip_as_total() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({})));

    let response = service
        .get_many(&request(json!({"limit": 3, "page": 6})))
        .unwrap();

    // an empty window is short, so no count runs and skip stands in for it
    let page = response.page_info().expect("paginated");
    assert!(page.data.is_empty());
    assert_eq!(page.count, 0);
    assert_eq!(page.total, 15);
    assert_eq!(page.page, 6);
    assert_eq!(page.page_count, 5);
    assert_eq!(service.store().counts(), 0);
}

// =============================================================================
// Extreme Windows
// =============================================================================

#[test]
fn test_max_page_returns_empty_window() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({})));

    let response = service
        .get_many(&request(json!({"limit": 10, "page": u64::MAX})))
        .unwrap();

    let page = response.page_info().expect("paginated");
    assert!(page.data.is_empty());
    assert_eq!(page.total, u64::MAX);
    assert_eq!(page.page, u64::MAX / 10 + 1);
    assert_eq!(page.page_count, u64::MAX / 10 + 1);
}

#[test]
fn test_max_offset_returns_empty_window() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({})));

    let response = service
        .get_many(&request(json!({"limit": 10, "offset": u64::MAX})))
        .unwrap();

    let page = response.page_info().expect("paginated");
    assert!(page.data.is_empty());
    assert_eq!(page.total, u64::MAX);
    assert_eq!(service.store().counts(), 0);
}

// =============================================================================
// Bare Sequences
// =============================================================================

#[test]
fn test_limit_without_page_is_bare() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({})));

    let response = service.get_many(&request(json!({"limit": 5}))).unwrap();

    assert!(matches!(response, GetManyResponse::Bare(_)));
    assert_eq!(response.data().len(), 5);
    assert_eq!(service.store().counts(), 0);
}

#[test]
fn test_offset_without_limit_is_bare() {
    let f = fixture();
    let service = counted(f.companies.clone(), options(json!({})));

    let response = service.get_many(&request(json!({"offset": 3}))).unwrap();

    assert!(!response.is_paginated());
    assert_eq!(
        ids(response.data()),
        vec![1003, 1004, 1005, 1006, 1007, 1008, 1009]
    );
}

// =============================================================================
// Limit Resolution
// =============================================================================

#[test]
fn test_caller_limit_clamped_to_max() {
    let f = fixture();
    let service = counted(f.users.clone(), options(json!({"query": {"maxLimit": 4}})));

    let response = service
        .get_many(&request(json!({"limit": 100, "page": 1})))
        .unwrap();

    let page = response.page_info().expect("paginated");
    assert_eq!(page.count, 4);
    assert_eq!(page.total, 20);
    assert_eq!(page.page_count, 5);
}

#[test]
fn test_max_limit_bounds_unlimited_listing() {
    let f = fixture();
    let service = counted(f.users.clone(), options(json!({"query": {"maxLimit": 7}})));

    let response = service.get_many(&request(json!({}))).unwrap();
    assert!(!response.is_paginated());
    assert_eq!(response.data().len(), 7);
}

// =============================================================================
// Count Query Criteria
// =============================================================================

#[test]
fn test_count_reuses_filter() {
    let f = fixture();
    let service = counted(f.users.clone(), options(json!({})));

    let response = service
        .get_many(&request(json!({
            "filter": [{"field": "isActive", "operator": "eq", "value": true}],
            "sort": [{"field": "_id", "order": "DESC"}],
            "limit": 5,
            "page": 1
        })))
        .unwrap();

    let page = response.page_info().expect("paginated");
    assert_eq!(ids(&page.data), vec![19, 17, 15, 13, 11]);
    assert_eq!(page.total, 10);
    assert_eq!(page.page_count, 2);
    assert_eq!(service.store().counts(), 1);
}
