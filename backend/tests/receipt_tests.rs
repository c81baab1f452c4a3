//! Receipt pipeline tests
//!
//! Tests for inbound movements including:
//! - Monthly per-staff receipt cap (100 kg)
//! - Daily organization-wide receipt cap (2000 kg)
//! - Rejections leave inventory unchanged

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::validation::{
    evaluate_receipt, MaterialSnapshot, ReceiptContext, ReceiptRequest, RuleViolation,
    DAILY_RECEIPT_CAP_KG, STAFF_MONTHLY_RECEIPT_CAP_KG,
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

fn request(weight: &str, volume: &str) -> ReceiptRequest {
    ReceiptRequest {
        weight_kg: dec(weight),
        volume_m3: dec(volume),
    }
}

fn context(material: MaterialSnapshot) -> ReceiptContext {
    ReceiptContext {
        material: Some(material),
        staff_exists: true,
        staff_month_total_kg: Decimal::ZERO,
        day_total_kg: Decimal::ZERO,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_accepted_receipt_increments_both_counters() {
        let accepted = evaluate_receipt(&request("30", "5"), &context(snapshot("150", "20")))
            .expect("receipt within all caps");
        assert_eq!(accepted.new_weight_kg, dec("180"));
        assert_eq!(accepted.new_volume_m3, dec("25"));
    }

    #[test]
    fn test_missing_material_rejected_first() {
        let ctx = ReceiptContext {
            material: None,
            staff_exists: false,
            staff_month_total_kg: Decimal::ZERO,
            day_total_kg: Decimal::ZERO,
        };
        assert_eq!(
            evaluate_receipt(&request("10", "1"), &ctx),
            Err(RuleViolation::MaterialNotFound)
        );
    }

    #[test]
    fn test_missing_staff_rejected() {
        let mut ctx = context(snapshot("100", "10"));
        ctx.staff_exists = false;
        assert_eq!(
            evaluate_receipt(&request("10", "1"), &ctx),
            Err(RuleViolation::StaffNotFound)
        );
    }

    #[test]
    fn test_fractional_quantities_accepted() {
        let accepted = evaluate_receipt(
            &request("0.5", "0.125"),
            &context(snapshot("10.25", "1.5")),
        )
        .expect("fractional quantities are valid");
        assert_eq!(accepted.new_weight_kg, dec("10.75"));
        assert_eq!(accepted.new_volume_m3, dec("1.625"));
    }

    #[test]
    fn test_monthly_cap_boundary() {
        let mut ctx = context(snapshot("100", "10"));
        ctx.staff_month_total_kg = dec("70");

        // 70 + 30 lands exactly on the cap.
        assert!(evaluate_receipt(&request("30", "1"), &ctx).is_ok());

        // 70 + 30.001 crosses it, and the error reports the pre-existing
        // total so the caller can size a retry.
        assert_eq!(
            evaluate_receipt(&request("30.001", "1"), &ctx),
            Err(RuleViolation::MonthlyCapExceeded {
                current_total: dec("70")
            })
        );
    }

    #[test]
    fn test_daily_cap_boundary() {
        let mut ctx = context(snapshot("100", "10"));
        ctx.day_total_kg = dec("1980");

        assert!(evaluate_receipt(&request("20", "1"), &ctx).is_ok());
        assert_eq!(
            evaluate_receipt(&request("20.5", "1"), &ctx),
            Err(RuleViolation::DailyCapExceeded {
                current_total: dec("1980")
            })
        );
    }

    #[test]
    fn test_monthly_cap_reported_before_daily_cap() {
        let mut ctx = context(snapshot("100", "10"));
        ctx.staff_month_total_kg = dec("95");
        ctx.day_total_kg = dec("1995");

        assert!(matches!(
            evaluate_receipt(&request("10", "1"), &ctx),
            Err(RuleViolation::MonthlyCapExceeded { .. })
        ));
    }

    #[test]
    fn test_quantity_checked_before_caps() {
        let mut ctx = context(snapshot("100", "10"));
        ctx.staff_month_total_kg = dec("100");

        assert_eq!(
            evaluate_receipt(&request("0", "1"), &ctx),
            Err(RuleViolation::InvalidQuantity)
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for receipt weights (0.1 to 50.0 kg)
    fn weight_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=500i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for receipt volumes (0.1 to 10.0 m3)
    fn volume_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Accepted receipts add exactly the requested quantities.
        #[test]
        fn prop_accept_adds_exactly(
            weight in weight_strategy(),
            volume in volume_strategy(),
        ) {
            let material = snapshot("500", "80");
            let req = ReceiptRequest { weight_kg: weight, volume_m3: volume };
            let accepted = evaluate_receipt(&req, &context(material.clone())).unwrap();

            prop_assert_eq!(accepted.new_weight_kg, material.weight_kg + weight);
            prop_assert_eq!(accepted.new_volume_m3, material.volume_m3 + volume);
        }

        /// Feeding an arbitrary sequence of receipts through the engine
        /// never lets a staff member's monthly total or the daily total
        /// cross its cap, and stock tracks exactly the accepted weights.
        #[test]
        fn prop_caps_hold_over_sequences(
            receipts in prop::collection::vec(
                (0usize..4, weight_strategy(), volume_strategy()),
                1..60
            )
        ) {
            let mut material = snapshot("0", "0");
            let mut month_totals = [Decimal::ZERO; 4];
            let mut day_total = Decimal::ZERO;
            let mut accepted_weight = Decimal::ZERO;

            for (staff, weight, volume) in receipts {
                let req = ReceiptRequest { weight_kg: weight, volume_m3: volume };
                let ctx = ReceiptContext {
                    material: Some(material.clone()),
                    staff_exists: true,
                    staff_month_total_kg: month_totals[staff],
                    day_total_kg: day_total,
                };

                if let Ok(accepted) = evaluate_receipt(&req, &ctx) {
                    material.weight_kg = accepted.new_weight_kg;
                    material.volume_m3 = accepted.new_volume_m3;
                    month_totals[staff] += weight;
                    day_total += weight;
                    accepted_weight += weight;
                }

                for total in &month_totals {
                    prop_assert!(*total <= Decimal::from(STAFF_MONTHLY_RECEIPT_CAP_KG));
                }
                prop_assert!(day_total <= Decimal::from(DAILY_RECEIPT_CAP_KG));
            }

            prop_assert_eq!(material.weight_kg, accepted_weight);
        }

        /// A rejected receipt computes no new inventory values at all.
        #[test]
        fn prop_rejection_leaves_inventory_unchanged(
            weight in weight_strategy(),
            month_total in (951i64..=2000i64).prop_map(|n| Decimal::new(n, 1)),
        ) {
            // month_total in (95.1, 200.0]: any weight above 4.9 kg must be
            // rejected; pick weights of at least 5 kg.
            let weight = weight + Decimal::from(5);
            let material = snapshot("120", "30");
            let req = ReceiptRequest { weight_kg: weight, volume_m3: dec("1") };
            let ctx = ReceiptContext {
                material: Some(material.clone()),
                staff_exists: true,
                staff_month_total_kg: month_total,
                day_total_kg: Decimal::ZERO,
            };

            let result = evaluate_receipt(&req, &ctx);
            prop_assert!(result.is_err());
            // The snapshot is untouched by a rejection.
            prop_assert_eq!(material.weight_kg, dec("120"));
            prop_assert_eq!(material.volume_m3, dec("30"));
        }
    }
}
