//! Integration tests for stats aggregations
//!
//! Tax rates t1..t8 are 10, 10, 20, 20, 20, 40, 50, 90; t9 (7) sits outside
//! the id filter used below.

mod common;

use std::cell::Cell;

use common::{assert_close, ids, shop};
use shopdal::{
    Connection, Context, Criteria, DalError, EntityRepository, ExecuteError, PlanError, RowSet,
    SqlQuery, SqliteConnection, StatsAggregation, StatsResult,
};

const RATED: [&str; 8] = ["t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8"];

fn tax_criteria(stats: StatsAggregation) -> Criteria {
    let mut criteria = Criteria::with_ids(RATED);
    criteria.add_aggregation(stats);
    criteria
}

#[test]
fn test_stats_all_statistics() {
    let (schema, conn) = shop();
    let repository = EntityRepository::new(&schema, "tax", &conn).unwrap();

    let criteria = tax_criteria(StatsAggregation::new("tax.taxRate", "rate_agg"));
    let result = repository.aggregate(&criteria, &Context::default()).unwrap();

    let aggregation = result.get("rate_agg").expect("aggregation result");
    assert_eq!(aggregation.len(), 1);

    let stats = aggregation.get::<StatsResult>(None).expect("ungrouped row");
    assert_eq!(stats.key, None);
    assert_eq!(stats.min, Some(10.0));
    assert_eq!(stats.max, Some(90.0));
    assert_eq!(stats.count, Some(8));
    assert_close(stats.avg, 32.5);
    assert_close(stats.sum, 260.0);
}

#[test]
fn test_stats_unrequested_statistics_are_null() {
    let (schema, conn) = shop();
    let repository = EntityRepository::new(&schema, "tax", &conn).unwrap();

    // Each statistic alone, and every pair of complementary flags
    let configurations = [
        (true, false, false, false, false),
        (false, true, false, false, false),
        (false, false, true, false, false),
        (false, false, false, true, false),
        (false, false, false, false, true),
        (true, false, true, false, true),
        (false, true, false, true, false),
    ];

    for (min, max, avg, sum, count) in configurations {
        let stats = StatsAggregation::empty("taxRate", "rate_agg")
            .with_min(min)
            .with_max(max)
            .with_avg(avg)
            .with_sum(sum)
            .with_count(count);
        let result = repository.aggregate(&tax_criteria(stats), &Context::default()).unwrap();
        let row = result
            .get("rate_agg")
            .and_then(|r| r.get::<StatsResult>(None))
            .expect("ungrouped row");

        assert_eq!(row.min, min.then_some(10.0));
        assert_eq!(row.max, max.then_some(90.0));
        assert_eq!(row.avg.is_some(), avg);
        assert_eq!(row.sum.is_some(), sum);
        assert_eq!(row.count, count.then_some(8));
    }
}

#[test]
fn test_stats_without_fetch_fails_fast() {
    let (schema, conn) = shop();
    let repository = EntityRepository::new(&schema, "tax", &conn).unwrap();

    let mut criteria = tax_criteria(StatsAggregation::new("taxRate", "valid"));
    criteria.add_aggregation(StatsAggregation::empty("taxRate", "rate_agg"));

    let err = repository.aggregate(&criteria, &Context::default()).unwrap_err();
    assert!(matches!(err, DalError::Plan(PlanError::StatsWithoutFetch { ref name }) if name == "rate_agg"));
    assert_eq!(err.to_string(), "StatsAggregation configured without fetch: 'rate_agg'");
}

/// Connection that counts the queries it runs
struct CountingConnection<'a> {
    inner: &'a SqliteConnection,
    fetches: Cell<usize>,
}

impl Connection for CountingConnection<'_> {
    fn fetch(&self, query: &SqlQuery) -> Result<RowSet, ExecuteError> {
        self.fetches.set(self.fetches.get() + 1);
        self.inner.fetch(query)
    }
}

#[test]
fn test_stats_without_fetch_fails_before_any_query() {
    let (schema, conn) = shop();
    let counting = CountingConnection {
        inner: &conn,
        fetches: Cell::new(0),
    };
    let repository = EntityRepository::new(&schema, "tax", &counting).unwrap();

    // The valid aggregation comes first and still must not run
    let mut criteria = tax_criteria(StatsAggregation::new("taxRate", "valid"));
    criteria.add_aggregation(StatsAggregation::empty("taxRate", "rate_agg"));
    let err = repository.aggregate(&criteria, &Context::default()).unwrap_err();
    assert!(matches!(err, DalError::Plan(PlanError::StatsWithoutFetch { .. })));
    assert_eq!(counting.fetches.get(), 0);

    let valid = tax_criteria(StatsAggregation::new("taxRate", "valid"));
    repository.aggregate(&valid, &Context::default()).unwrap();
    assert_eq!(counting.fetches.get(), 1);
}

#[test]
fn test_stats_over_empty_selection() {
    let (schema, conn) = shop();
    let repository = EntityRepository::new(&schema, "tax", &conn).unwrap();

    let mut criteria = Criteria::with_ids(["missing"]);
    criteria.add_aggregation(StatsAggregation::new("taxRate", "rate_agg"));
    let result = repository.aggregate(&criteria, &Context::default()).unwrap();
    let row = result
        .get("rate_agg")
        .and_then(|r| r.get::<StatsResult>(None))
        .expect("ungrouped row");

    assert_eq!(row.count, Some(0));
    assert_eq!(row.min, None);
    assert_eq!(row.sum, None);
}

#[test]
fn test_stats_over_json_accessor() {
    let (schema, conn) = shop();
    let repository = EntityRepository::new(&schema, "product", &conn).unwrap();

    let mut criteria = Criteria::new();
    criteria.add_aggregation(StatsAggregation::new("product.price.gross", "price_agg"));
    let result = repository.aggregate(&criteria, &Context::default()).unwrap();
    let row = result
        .get("price_agg")
        .and_then(|r| r.get::<StatsResult>(None))
        .unwrap();

    assert_eq!(row.min, Some(10.0));
    assert_eq!(row.max, Some(200.0));
    assert_eq!(row.count, Some(7));
    assert_close(row.sum, 400.0);
}

#[test]
fn test_stats_through_to_many_filter_counts_each_row_once() {
    let (schema, conn) = shop();
    let repository = EntityRepository::new(&schema, "product", &conn).unwrap();

    // p-a, p-b and p-c sit in two of these categories each
    let mut criteria = Criteria::new();
    criteria.add_filter(shopdal::Filter::equals_any("categories.id", ids(&["c1", "c2", "c3", "c4"])));
    criteria.add_aggregation(StatsAggregation::new("price.gross", "price_agg"));
    let result = repository.aggregate(&criteria, &Context::default()).unwrap();
    let row = result
        .get("price_agg")
        .and_then(|r| r.get::<StatsResult>(None))
        .unwrap();

    assert_eq!(row.count, Some(6));
    assert_eq!(row.min, Some(10.0));
    assert_eq!(row.max, Some(90.0));
    assert_close(row.sum, 200.0);
    assert_close(row.avg, 200.0 / 6.0);
}

#[test]
fn test_stats_results_serialize_with_nulls() {
    let (schema, conn) = shop();
    let repository = EntityRepository::new(&schema, "tax", &conn).unwrap();

    let criteria = tax_criteria(StatsAggregation::empty("taxRate", "rate_agg").with_max(true));
    let result = repository.aggregate(&criteria, &Context::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let row = &json["results"][0]["rows"][0];
    assert_eq!(json["results"][0]["name"], "rate_agg");
    assert_eq!(json["results"][0]["type"], "stats");
    assert_eq!(row["max"], serde_json::json!(90.0));
    assert!(row["min"].is_null());
    assert!(row["count"].is_null());
}

#[test]
fn test_stats_with_negated_to_many_filter() {
    let (schema, conn) = shop();
    let repository = EntityRepository::new(&schema, "product", &conn).unwrap();

    // Leaves p-d (50), p-e (90), p-f (20) and p-g (200)
    let mut criteria = Criteria::new();
    criteria.add_filter(shopdal::Filter::not(vec![shopdal::Filter::equals("categories.id", "c1")]));
    criteria.add_aggregation(StatsAggregation::new("price.gross", "price_agg"));
    let result = repository.aggregate(&criteria, &Context::default()).unwrap();
    let row = result
        .get("price_agg")
        .and_then(|r| r.get::<StatsResult>(None))
        .unwrap();

    assert_eq!(row.count, Some(4));
    assert_eq!(row.min, Some(20.0));
    assert_eq!(row.max, Some(200.0));
    assert_close(row.sum, 360.0);
}
