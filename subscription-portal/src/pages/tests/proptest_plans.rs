use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::{
    models::{BillingCycle, Plan, PlanId},
    pages::PlanGroups,
};

fn cycle_strategy() -> impl Strategy<Value = BillingCycle> {
    prop_oneof![
        4 => Just(BillingCycle::Monthly),
        4 => Just(BillingCycle::Yearly),
        1 => "[a-z]{1,8}".prop_map(BillingCycle::from),
    ]
}

fn plan_strategy() -> impl Strategy<Value = Plan> {
    (any::<u64>(), "[A-Za-z ]{1,16}", 0i64..1_000_000, cycle_strategy()).prop_map(
        |(id, name, cents, billing_cycle)| Plan {
            id: PlanId(id),
            name,
            price: Decimal::new(cents, 2),
            billing_cycle,
            features: vec![],
        },
    )
}

fn plans_in(plans: &[Plan], cycle: &BillingCycle) -> Vec<Plan> {
    plans
        .iter()
        .filter(|p| &p.billing_cycle == cycle)
        .cloned()
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_known_cycles_land_in_exactly_one_group(
        plans in prop::collection::vec(plan_strategy(), 0..40)
    ) {
        let groups = PlanGroups::partition(plans.clone());

        let listed = plans
            .iter()
            .filter(|p| matches!(p.billing_cycle, BillingCycle::Monthly | BillingCycle::Yearly))
            .count();
        prop_assert_eq!(groups.len(), listed);
        prop_assert!(groups.monthly.iter().all(|p| p.billing_cycle == BillingCycle::Monthly));
        prop_assert!(groups.yearly.iter().all(|p| p.billing_cycle == BillingCycle::Yearly));
    }

    #[test]
    fn test_partition_preserves_server_order(
        plans in prop::collection::vec(plan_strategy(), 0..40)
    ) {
        let groups = PlanGroups::partition(plans.clone());

        prop_assert_eq!(groups.monthly, plans_in(&plans, &BillingCycle::Monthly));
        prop_assert_eq!(groups.yearly, plans_in(&plans, &BillingCycle::Yearly));
    }
}
