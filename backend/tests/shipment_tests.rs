//! Shipment pipeline tests
//!
//! Tests for outbound movements including:
//! - 100 kg base-stock floor, read from live stock at decision time
//! - One shipment per partner per day
//! - Sufficiency against current weight and volume
//! - Retraction as the exact inverse of creation

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::types::StockResource;
use shared::validation::{
    evaluate_receipt, evaluate_retraction, evaluate_shipment, MaterialSnapshot, ReceiptContext,
    ReceiptRequest, RuleViolation, ShipmentContext, ShipmentRequest, ShipmentSnapshot,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn snapshot(weight: &str, volume: &str) -> MaterialSnapshot {
    MaterialSnapshot {
        id: Uuid::new_v4(),
        weight_kg: dec(weight),
        volume_m3: dec(volume),
    }
}

fn request(weight: &str, volume: &str) -> ShipmentRequest {
    ShipmentRequest {
        weight_kg: dec(weight),
        volume_m3: dec(volume),
    }
}

fn context(material: MaterialSnapshot) -> ShipmentContext {
    ShipmentContext {
        material: Some(material),
        partner_exists: true,
        partner_has_shipment_today: false,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_accepted_shipment_decrements_both_counters() {
        let accepted = evaluate_shipment(&request("100", "15"), &context(snapshot("180", "25")))
            .expect("stock is sufficient");
        assert_eq!(accepted.new_weight_kg, dec("80"));
        assert_eq!(accepted.new_volume_m3, dec("10"));
    }

    #[test]
    fn test_floor_blocks_below_100() {
        assert_eq!(
            evaluate_shipment(&request("1", "1"), &context(snapshot("99.9", "50"))),
            Err(RuleViolation::InsufficientBaseStock {
                available: dec("99.9")
            })
        );
    }

    #[test]
    fn test_floor_admits_exactly_100() {
        assert!(evaluate_shipment(&request("10", "1"), &context(snapshot("100", "10"))).is_ok());
    }

    #[test]
    fn test_duplicate_checked_before_floor() {
        let mut ctx = context(snapshot("50", "10"));
        ctx.partner_has_shipment_today = true;

        assert_eq!(
            evaluate_shipment(&request("1", "1"), &ctx),
            Err(RuleViolation::DuplicateDailyShipment)
        );
    }

    #[test]
    fn test_missing_partner_rejected() {
        let mut ctx = context(snapshot("200", "20"));
        ctx.partner_exists = false;
        assert_eq!(
            evaluate_shipment(&request("10", "1"), &ctx),
            Err(RuleViolation::PartnerNotFound)
        );
    }

    #[test]
    fn test_second_daily_shipment_rejected() {
        let mut ctx = context(snapshot("200", "20"));
        ctx.partner_has_shipment_today = true;
        assert_eq!(
            evaluate_shipment(&request("10", "1"), &ctx),
            Err(RuleViolation::DuplicateDailyShipment)
        );
    }

    #[test]
    fn test_insufficient_weight_reports_available() {
        assert_eq!(
            evaluate_shipment(&request("151", "5"), &context(snapshot("150", "10"))),
            Err(RuleViolation::InsufficientStock {
                resource: StockResource::Weight,
                available: dec("150")
            })
        );
    }

    #[test]
    fn test_insufficient_volume_reports_available() {
        assert_eq!(
            evaluate_shipment(&request("50", "10.5"), &context(snapshot("150", "10"))),
            Err(RuleViolation::InsufficientStock {
                resource: StockResource::Volume,
                available: dec("10")
            })
        );
    }

    #[test]
    fn test_shipping_the_entire_stock_is_allowed() {
        let accepted = evaluate_shipment(&request("150", "10"), &context(snapshot("150", "10")))
            .expect("draining the stock entirely is valid");
        assert_eq!(accepted.new_weight_kg, Decimal::ZERO);
        assert_eq!(accepted.new_volume_m3, Decimal::ZERO);
    }

    #[test]
    fn test_retraction_restores_original_quantities() {
        let shipped = ShipmentSnapshot {
            weight_kg: dec("100"),
            volume_m3: dec("15"),
        };
        let accepted = evaluate_retraction(Some(&shipped), &snapshot("80", "10"))
            .expect("active shipment retracts");
        assert_eq!(accepted.new_weight_kg, dec("180"));
        assert_eq!(accepted.new_volume_m3, dec("25"));
    }

    #[test]
    fn test_retracting_missing_or_retracted_shipment_rejected() {
        assert_eq!(
            evaluate_retraction(None, &snapshot("80", "10")),
            Err(RuleViolation::MovementNotFound)
        );
    }

    /// The full "Paper" walkthrough: receipt, shipment, duplicate rejection,
    /// depletion below the floor.
    #[test]
    fn test_paper_scenario() {
        // Paper starts at weight 150, volume 20.
        let mut paper = snapshot("150", "20");

        // Receipt of (30, 5) from staff A.
        let receipt_ctx = ReceiptContext {
            material: Some(paper.clone()),
            staff_exists: true,
            staff_month_total_kg: Decimal::ZERO,
            day_total_kg: Decimal::ZERO,
        };
        let accepted = evaluate_receipt(
            &ReceiptRequest {
                weight_kg: dec("30"),
                volume_m3: dec("5"),
            },
            &receipt_ctx,
        )
        .expect("receipt accepted");
        paper.weight_kg = accepted.new_weight_kg;
        paper.volume_m3 = accepted.new_volume_m3;
        assert_eq!((paper.weight_kg, paper.volume_m3), (dec("180"), dec("25")));

        // Shipment of (100, 15) to partner X; the floor was met beforehand.
        let accepted = evaluate_shipment(&request("100", "15"), &context(paper.clone()))
            .expect("first shipment accepted");
        paper.weight_kg = accepted.new_weight_kg;
        paper.volume_m3 = accepted.new_volume_m3;
        assert_eq!((paper.weight_kg, paper.volume_m3), (dec("80"), dec("10")));

        // Second shipment to partner X the same day is rejected as a
        // duplicate and changes nothing.
        let mut dup_ctx = context(paper.clone());
        dup_ctx.partner_has_shipment_today = true;
        assert_eq!(
            evaluate_shipment(&request("10", "1"), &dup_ctx),
            Err(RuleViolation::DuplicateDailyShipment)
        );
        assert_eq!((paper.weight_kg, paper.volume_m3), (dec("80"), dec("10")));

        // Shipment of (100, ...) to partner Y: current weight 80 is both
        // below the requested amount and below the floor; the floor rule
        // fires first.
        assert_eq!(
            evaluate_shipment(&request("100", "5"), &context(paper.clone())),
            Err(RuleViolation::InsufficientBaseStock {
                available: dec("80")
            })
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn weight_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=2000i64).prop_map(|n| Decimal::new(n, 1)) // 0.1 to 200.0
    }

    fn volume_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=300i64).prop_map(|n| Decimal::new(n, 1)) // 0.1 to 30.0
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// An accepted shipment never drives either counter negative.
        #[test]
        fn prop_accepted_shipment_never_goes_negative(
            stock_weight in (1000i64..=5000i64).prop_map(|n| Decimal::new(n, 1)),
            stock_volume in (1i64..=500i64).prop_map(|n| Decimal::new(n, 1)),
            weight in weight_strategy(),
            volume in volume_strategy(),
        ) {
            let material = MaterialSnapshot {
                id: Uuid::new_v4(),
                weight_kg: stock_weight,
                volume_m3: stock_volume,
            };
            let req = ShipmentRequest { weight_kg: weight, volume_m3: volume };

            if let Ok(accepted) = evaluate_shipment(&req, &context(material)) {
                prop_assert!(accepted.new_weight_kg >= Decimal::ZERO);
                prop_assert!(accepted.new_volume_m3 >= Decimal::ZERO);
            }
        }

        /// Creating then retracting a shipment returns the inventory to its
        /// exact pre-creation value.
        #[test]
        fn prop_retraction_is_exact_inverse(
            stock_weight in (1000i64..=5000i64).prop_map(|n| Decimal::new(n, 1)),
            stock_volume in (100i64..=500i64).prop_map(|n| Decimal::new(n, 1)),
            weight in weight_strategy(),
            volume in volume_strategy(),
        ) {
            let original = MaterialSnapshot {
                id: Uuid::new_v4(),
                weight_kg: stock_weight,
                volume_m3: stock_volume,
            };
            let req = ShipmentRequest { weight_kg: weight, volume_m3: volume };

            let Ok(shipped) = evaluate_shipment(&req, &context(original.clone())) else {
                return Ok(());
            };

            let after_shipment = MaterialSnapshot {
                id: original.id,
                weight_kg: shipped.new_weight_kg,
                volume_m3: shipped.new_volume_m3,
            };
            let record = ShipmentSnapshot { weight_kg: weight, volume_m3: volume };
            let restored = evaluate_retraction(Some(&record), &after_shipment).unwrap();

            prop_assert_eq!(restored.new_weight_kg, original.weight_kg);
            prop_assert_eq!(restored.new_volume_m3, original.volume_m3);
        }

        /// The floor always reads live stock: whenever weight is below
        /// 100 kg, every shipment is rejected regardless of size.
        #[test]
        fn prop_floor_uses_live_stock(
            stock_weight in (0i64..=999i64).prop_map(|n| Decimal::new(n, 1)), // below 100
            weight in weight_strategy(),
            volume in volume_strategy(),
        ) {
            let material = MaterialSnapshot {
                id: Uuid::new_v4(),
                weight_kg: stock_weight,
                volume_m3: dec("1000"),
            };
            let req = ShipmentRequest { weight_kg: weight, volume_m3: volume };

            let is_insufficient_base_stock = matches!(
                evaluate_shipment(&req, &context(material)),
                Err(RuleViolation::InsufficientBaseStock { .. })
            );
            prop_assert!(is_insufficient_base_stock);
        }
    }
}
