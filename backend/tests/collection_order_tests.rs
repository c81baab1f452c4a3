//! Collection order tests
//!
//! Tests for client service requests including:
//! - Existence checks in client, staff, material order
//! - One order per (client, staff) pair per day
//! - Orders never touch inventory

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

use shared::validation::{evaluate_collection_order, OrderContext, OrderRequest, RuleViolation};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn request(weight: &str, volume: &str) -> OrderRequest {
    OrderRequest {
        weight_kg: dec(weight),
        volume_m3: dec(volume),
    }
}

fn context() -> OrderContext {
    OrderContext {
        client_exists: true,
        staff_exists: true,
        material_exists: true,
        order_exists_today: false,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_order_accepted() {
        assert!(evaluate_collection_order(&request("10", "2"), &context()).is_ok());
    }

    #[test]
    fn test_missing_client_rejected_first() {
        let ctx = OrderContext {
            client_exists: false,
            staff_exists: false,
            material_exists: false,
            order_exists_today: true,
        };
        assert_eq!(
            evaluate_collection_order(&request("10", "2"), &ctx),
            Err(RuleViolation::ClientNotFound)
        );
    }

    #[test]
    fn test_missing_staff_rejected_second() {
        let ctx = OrderContext {
            client_exists: true,
            staff_exists: false,
            material_exists: false,
            order_exists_today: true,
        };
        assert_eq!(
            evaluate_collection_order(&request("10", "2"), &ctx),
            Err(RuleViolation::StaffNotFound)
        );
    }

    #[test]
    fn test_missing_material_rejected_third() {
        let ctx = OrderContext {
            client_exists: true,
            staff_exists: true,
            material_exists: false,
            order_exists_today: true,
        };
        assert_eq!(
            evaluate_collection_order(&request("10", "2"), &ctx),
            Err(RuleViolation::MaterialNotFound)
        );
    }

    #[test]
    fn test_duplicate_daily_order_rejected() {
        let mut ctx = context();
        ctx.order_exists_today = true;
        assert_eq!(
            evaluate_collection_order(&request("10", "2"), &ctx),
            Err(RuleViolation::DuplicateDailyOrder)
        );
    }

    #[test]
    fn test_duplicate_checked_before_quantity() {
        let mut ctx = context();
        ctx.order_exists_today = true;
        assert_eq!(
            evaluate_collection_order(&request("0", "0"), &ctx),
            Err(RuleViolation::DuplicateDailyOrder)
        );
    }

    #[test]
    fn test_non_positive_quantities_rejected() {
        for (w, v) in [("0", "1"), ("1", "0"), ("-2", "1"), ("1", "-2")] {
            assert_eq!(
                evaluate_collection_order(&request(w, v), &context()),
                Err(RuleViolation::InvalidQuantity)
            );
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=500i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Replaying a day of order attempts accepts at most one order per
        /// (client, staff) pair.
        #[test]
        fn prop_at_most_one_order_per_pair_per_day(
            attempts in prop::collection::vec(
                (0usize..3, 0usize..3, quantity_strategy(), quantity_strategy()),
                1..40
            )
        ) {
            let mut logged: HashSet<(usize, usize)> = HashSet::new();

            for (client, staff, weight, volume) in attempts {
                let req = OrderRequest { weight_kg: weight, volume_m3: volume };
                let ctx = OrderContext {
                    client_exists: true,
                    staff_exists: true,
                    material_exists: true,
                    order_exists_today: logged.contains(&(client, staff)),
                };

                match evaluate_collection_order(&req, &ctx) {
                    Ok(()) => {
                        // First accepted order for the pair today.
                        prop_assert!(logged.insert((client, staff)));
                    }
                    Err(RuleViolation::DuplicateDailyOrder) => {
                        prop_assert!(logged.contains(&(client, staff)));
                    }
                    Err(other) => {
                        prop_assert!(false, "unexpected violation: {:?}", other);
                    }
                }
            }
        }
    }
}
