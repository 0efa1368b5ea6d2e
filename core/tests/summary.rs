//! Portfolio summary and economics config tests.

use chrono::NaiveDateTime;
use olist_core::config::EconomicsConfig;
use olist_core::features::SellerProfile;
use olist_core::records::TIMESTAMP_FORMAT;
use olist_core::scenario::ScenarioEngine;
use olist_core::summary::PortfolioSummary;

fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).expect("test timestamp")
}

/// Profile priced exactly the way the aggregator prices one.
fn priced_profile(
    id: &str,
    sales: f64,
    months: f64,
    cost_of_reviews: f64,
    quantity: u64,
    config: &EconomicsConfig,
) -> SellerProfile {
    let revenues = config.commission_rate * sales + config.subscription_fee_per_month * months;
    SellerProfile {
        seller_id: id.into(),
        city: "sao paulo".into(),
        state: "SP".into(),
        delay_to_carrier: 1.0,
        wait_time: 8.0,
        date_first_sale: ts("2020-01-01 00:00:00"),
        date_last_sale: ts("2020-12-01 00:00:00"),
        months_on_olist: months,
        n_orders: quantity.max(1),
        quantity,
        quantity_per_order: 1.0,
        sales,
        share_of_one_stars: 0.1,
        share_of_five_stars: 0.5,
        review_score: 4.0,
        cost_of_reviews,
        revenues,
        profits: revenues - cost_of_reviews,
    }
}

#[test]
fn revenue_split_sums_to_total_revenue() {
    let config = EconomicsConfig::default();
    let profiles = vec![
        priced_profile("a", 10_000.0, 11.0, 300.0, 120, &config),
        priced_profile("b", 2_500.0, 4.0, 150.0, 30, &config),
        priced_profile("c", 800.0, 1.0, 0.0, 9, &config),
    ];
    let summary = PortfolioSummary::compute(&profiles, &config);

    assert_eq!(summary.n_sellers, 3);
    assert_eq!(summary.n_items, 159);

    let expected_commission = config.commission_rate * 13_300.0;
    let expected_subscription = config.subscription_fee_per_month * 16.0;
    assert!(
        (summary.commission_revenue - expected_commission).abs() < 1e-9,
        "commission = {}",
        summary.commission_revenue
    );
    assert!((summary.subscription_revenue - expected_subscription).abs() < 1e-9);
    assert!(
        (summary.commission_revenue + summary.subscription_revenue - summary.total_revenue).abs()
            < 1e-6,
        "split {} + {} should reassemble total {}",
        summary.commission_revenue,
        summary.subscription_revenue,
        summary.total_revenue
    );

    assert!((summary.review_cost - 450.0).abs() < 1e-9);
    assert!((summary.gross_profit - (summary.total_revenue - 450.0)).abs() < 1e-9);
    assert!(
        (summary.net_profit - (summary.gross_profit - summary.it_cost)).abs() < 1e-9,
        "net profit closes the waterfall"
    );
}

/// The waterfall and a keep-everyone scenario are two groupings of the
/// same numbers.
#[test]
fn summary_agrees_with_keep_everyone_scenario() {
    let config = EconomicsConfig::default();
    let profiles: Vec<SellerProfile> = (0..25)
        .map(|i| {
            priced_profile(
                &format!("s{i:02}"),
                500.0 + 37.0 * i as f64,
                f64::from(i % 7),
                30.0 * f64::from(i % 3),
                5 + i as u64,
                &config,
            )
        })
        .collect();

    let summary = PortfolioSummary::compute(&profiles, &config);
    let engine = ScenarioEngine::new(&profiles, &config);
    let full = engine.totals(0).expect("in-bounds");

    assert_eq!(summary.n_sellers, full.n_sellers);
    assert_eq!(summary.n_items, full.n_items);
    assert!((summary.total_revenue - full.revenue).abs() < 1e-6);
    assert!((summary.review_cost - full.review_cost).abs() < 1e-6);
    assert!((summary.gross_profit - full.gross_profit).abs() < 1e-6);
    assert!((summary.it_cost - full.it_cost).abs() < 1e-9);
    assert!((summary.net_profit - full.net_profit).abs() < 1e-6);
}

#[test]
fn default_config_matches_the_published_model() {
    let config = EconomicsConfig::default();
    assert_eq!(config.commission_rate, 0.1);
    assert_eq!(config.subscription_fee_per_month, 80.0);
    assert_eq!(config.it_cost_per_sqrt_seller, 3157.27);
    assert_eq!(config.it_cost_per_sqrt_item, 978.23);

    assert_eq!(config.review_cost(1), 100.0);
    assert_eq!(config.review_cost(2), 50.0);
    assert_eq!(config.review_cost(3), 40.0);
    assert_eq!(config.review_cost(4), 0.0);
    assert_eq!(config.review_cost(5), 0.0);
    assert_eq!(config.review_cost(9), 0.0, "unmapped scores cost nothing");
}

#[test]
fn partial_config_json_keeps_remaining_defaults() {
    let config: EconomicsConfig =
        serde_json::from_str(r#"{ "commission_rate": 0.15 }"#).expect("valid override");
    assert_eq!(config.commission_rate, 0.15);
    assert_eq!(config.subscription_fee_per_month, 80.0);
    assert_eq!(config.review_cost(1), 100.0);
}

#[test]
fn it_cost_follows_the_sqrt_law() {
    let config = EconomicsConfig::default();
    let expected = 3157.27 * 2.0 + 978.23 * 3.0;
    assert!(
        (config.it_cost(4, 9) - expected).abs() < 1e-9,
        "it_cost(4, 9) = {}",
        config.it_cost(4, 9)
    );
    assert_eq!(config.it_cost(0, 0), 0.0);
    assert!(
        config.it_cost(5, 9) > config.it_cost(4, 9),
        "cost grows with seller count"
    );
    assert!(
        config.it_cost(4, 16) > config.it_cost(4, 9),
        "cost grows with item count"
    );
}
