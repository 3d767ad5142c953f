use crate::filter::FilterSpec;
use crate::types::{
    CanonicalRecord, CostRow, DashboardSummary, OrderCountRow, OrderType, OrgGroup, ProcessArea,
    SeriesPoint,
};
use crate::util::format_int;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

/// What a grouped aggregation measures inside each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Number of distinct order ids.
    DistinctOrders,
    /// Row-level sum of `real_total_cost`.
    CostSum,
}

/// Distinct order ids, not rows: a multi-line order counts once.
pub fn order_count(records: &[&CanonicalRecord]) -> usize {
    records
        .iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn typed_order_count(records: &[&CanonicalRecord], order_type: OrderType) -> usize {
    records
        .iter()
        .filter(|r| r.order_type == order_type)
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Costs are recorded per line item, so every row contributes. The total
/// saturates at `i64::MAX` instead of overflowing.
pub fn cost_sum(records: &[&CanonicalRecord]) -> i64 {
    records
        .iter()
        .map(|r| r.real_total_cost)
        .fold(0i64, i64::saturating_add)
}

/// Partition `records` by `key` and compute `metric` per partition.
///
/// Groups come back in ascending key order. For [`PeriodKey`] that is
/// chronological order.
///
/// [`PeriodKey`]: crate::period::PeriodKey
pub fn group_by<'a, K, F>(records: &[&'a CanonicalRecord], key: F, metric: Metric) -> Vec<(K, i64)>
where
    K: Ord,
    F: Fn(&CanonicalRecord) -> K,
{
    #[derive(Default)]
    struct Acc<'a> {
        orders: HashSet<&'a str>,
        cost: i64,
    }

    let mut map: BTreeMap<K, Acc<'a>> = BTreeMap::new();
    for &r in records {
        let e = map.entry(key(r)).or_default();
        e.orders.insert(r.order_id.as_str());
        e.cost = e.cost.saturating_add(r.real_total_cost);
    }
    map.into_iter()
        .map(|(k, acc)| {
            let value = match metric {
                Metric::DistinctOrders => acc.orders.len() as i64,
                Metric::CostSum => acc.cost,
            };
            (k, value)
        })
        .collect()
}

/// Reorder groups to follow `order` (e.g. a chart's color order). Keys not
/// listed keep their relative order after the listed ones.
pub fn arrange<K: PartialEq>(groups: Vec<(K, i64)>, order: &[K]) -> Vec<(K, i64)> {
    let rank = |k: &K| order.iter().position(|o| o == k).unwrap_or(order.len());
    let mut groups = groups;
    groups.sort_by_key(|(k, _)| rank(k));
    groups
}

pub fn to_series<K: Display>(groups: Vec<(K, i64)>) -> Vec<SeriesPoint> {
    groups
        .into_iter()
        .map(|(k, value)| SeriesPoint {
            key: k.to_string(),
            value,
        })
        .collect()
}

/// Counters and chart series for one filtered subset.
pub fn build_dashboard(records: &[&CanonicalRecord], spec: &FilterSpec) -> DashboardSummary {
    let by_org = group_by(records, |r| r.org_group, Metric::DistinctOrders);
    let orders_by_area = group_by(records, |r| r.process_area, Metric::DistinctOrders);
    let cost_by_area = group_by(records, |r| r.process_area, Metric::CostSum);

    DashboardSummary {
        org_selection: spec.org_group.to_string(),
        process_selection: spec.process_area.to_string(),
        total_orders: order_count(records),
        corrective_orders: typed_order_count(records, OrderType::Corrective),
        preventive_orders: typed_order_count(records, OrderType::Preventive),
        total_real_cost: cost_sum(records),
        orders_by_org_group: to_series(arrange(by_org, &OrgGroup::ALL)),
        orders_by_process_area: to_series(arrange(orders_by_area, &ProcessArea::ALL)),
        cost_by_process_area: to_series(arrange(cost_by_area, &ProcessArea::ALL)),
        orders_by_period: to_series(group_by(records, |r| r.period_key, Metric::DistinctOrders)),
        cost_by_period: to_series(group_by(records, |r| r.period_key, Metric::CostSum)),
    }
}

pub fn order_count_rows(series: &[SeriesPoint]) -> Vec<OrderCountRow> {
    series
        .iter()
        .map(|p| OrderCountRow {
            group: p.key.clone(),
            orders: format_int(p.value),
        })
        .collect()
}

pub fn cost_rows(series: &[SeriesPoint]) -> Vec<CostRow> {
    series
        .iter()
        .map(|p| CostRow {
            group: p.key.clone(),
            cost: format_int(p.value),
        })
        .collect()
}
