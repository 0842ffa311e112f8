//! Adapters fed from JSON the way dashboard screens ship their data.
//!
//! Each fixture goes record → items → reducer and checks the final total,
//! the emitted kinds, and the error surface for malformed records.

use wfall_adapters::{
    CashFlowStatement, CorridorInput, CostPerOrder, IntoWaterfall, PnlStatement, TariffMarginRow,
    WeeklyCashForecast,
};
use wfall_core::{ItemKind, Scenario, WaterfallError};

fn kinds<T: IntoWaterfall>(record: &T) -> Vec<ItemKind> {
    record.to_items().unwrap().iter().map(|i| i.kind).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// Cash flow
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn cash_flow_statement_from_json() {
    let statement: CashFlowStatement = serde_json::from_str(
        r#"{
            "openingBalance": 187500,
            "movements": [
                { "label": "DTC Sales", "amount": 108000, "direction": "in" },
                { "label": "Payroll", "amount": 25000, "direction": "out",
                  "description": "Two biweekly runs" },
                { "label": "Inventory", "amount": -61500 }
            ]
        }"#,
    )
    .unwrap();

    let w = statement.reduce().unwrap();
    assert_eq!(w.final_total, 209_000.0);
    assert_eq!(w.segments[0].label, "Starting Cash");
    assert_eq!(w.segments[4].label, "Ending Cash");
    assert_eq!(w.segments[2].description.as_deref(), Some("Two biweekly runs"));
}

#[test]
fn cash_flow_missing_amount_names_the_movement() {
    let statement: CashFlowStatement = serde_json::from_str(
        r#"{ "openingBalance": 1, "movements": [{ "label": "Refunds" }] }"#,
    )
    .unwrap();
    let err = statement.to_items().unwrap_err();
    assert_eq!(
        err.to_string(),
        "cash-flow adapter: movement 1 ('Refunds'): missing required field 'amount'"
    );
}

// ═════════════════════════════════════════════════════════════════════════
// Weekly cash + corridor
// ═════════════════════════════════════════════════════════════════════════

const WEEKLY_JSON: &str = r#"{
    "openingBalance": 50000,
    "horizon": 4,
    "subtotalEvery": 2,
    "weeks": [
        { "week": 3, "inflow": 12000, "outflow": 9000 },
        { "week": 1, "inflow": 10000, "outflow": 8000 },
        { "week": 2, "inflow": 11000, "outflow": 15000 },
        { "week": 4, "inflow": 9000, "outflow": 7000 }
    ]
}"#;

#[test]
fn weekly_forecast_orders_buckets_and_adds_subtotals() {
    let forecast: WeeklyCashForecast = serde_json::from_str(WEEKLY_JSON).unwrap();
    let items = forecast.to_items().unwrap();
    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Opening Cash",
            "W1 in",
            "W1 out",
            "W2 in",
            "W2 out",
            "Through W2",
            "W3 in",
            "W3 out",
            "W4 in",
            "W4 out",
            "Week 4 Cash",
        ]
    );
    assert_eq!(forecast.reduce().unwrap().final_total, 53_000.0);
}

#[test]
fn corridor_defaults_bracket_the_base_case() {
    let corridor: CorridorInput =
        serde_json::from_str(&format!(r#"{{ "forecast": {WEEKLY_JSON} }}"#)).unwrap();
    let overlay = corridor.overlay(1.1).unwrap();

    let total = |s: Scenario| overlay.band(s).unwrap().final_total;
    assert_eq!(total(Scenario::Base), 53_000.0);
    assert!(total(Scenario::Best) > total(Scenario::Base));
    assert!(total(Scenario::Worst) < total(Scenario::Base));

    for band in &overlay.bands {
        for t in band.waterfall.running_totals() {
            assert!(overlay.domain.contains(t));
        }
    }
}

#[test]
fn corridor_rejects_negative_factor() {
    let corridor: CorridorInput = serde_json::from_str(&format!(
        r#"{{ "forecast": {WEEKLY_JSON}, "worst": {{ "inflow": -0.5, "outflow": 1.0 }} }}"#
    ))
    .unwrap();
    assert!(matches!(
        corridor.overlay(1.1),
        Err(WaterfallError::AdapterValidation {
            adapter: "corridor",
            ..
        })
    ));
}

// ═════════════════════════════════════════════════════════════════════════
// P&L, cost per order, tariff
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn pnl_from_json() {
    let statement: PnlStatement = serde_json::from_str(
        r#"{
            "revenue": 847000,
            "sections": [
                { "lines": [{ "label": "COGS", "amount": -338800 }], "subtotal": "Gross Profit" },
                { "lines": [{ "label": "Opex", "amount": 300000 }] }
            ],
            "resultLabel": "Operating Income"
        }"#,
    )
    .unwrap();
    assert_eq!(
        kinds(&statement),
        vec![
            ItemKind::Start,
            ItemKind::Outflow,
            ItemKind::Subtotal,
            ItemKind::Outflow,
            ItemKind::End,
        ]
    );
    let w = statement.reduce().unwrap();
    assert_eq!(w.final_total, 208_200.0);
    assert_eq!(w.segments[4].label, "Operating Income");
}

#[test]
fn cost_per_order_from_json() {
    let cpo: CostPerOrder = serde_json::from_str(
        r#"{
            "revenuePerOrder": 80,
            "previousRevenuePerOrder": 80,
            "costs": [
                { "label": "Product", "perOrder": 30, "previousPerOrder": 28 },
                { "label": "Shipping", "perOrder": -10 }
            ]
        }"#,
    )
    .unwrap();
    let items = cpo.to_items().unwrap();
    assert_eq!(items[1].percent_of_revenue, Some(37.5));
    assert!((items[1].previous_percent_of_revenue.unwrap() - 35.0).abs() < 1e-9);
    assert_eq!(items[2].value, 10.0);
    assert_eq!(cpo.reduce().unwrap().final_total, 40.0);
}

#[test]
fn tariff_row_rejects_negative_units() {
    let row: TariffMarginRow = serde_json::from_str(
        r#"{ "product": "Widget", "units": -1, "unitPrice": 40, "unitCost": 16, "tariffRate": 0.25 }"#,
    )
    .unwrap();
    let err = row.to_items().unwrap_err();
    assert_eq!(err.code(), "adapter_validation");
    assert!(err.to_string().contains("Widget"));
}
