use crate::period::PeriodKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

pub const COL_ORDER: &str = "Orden";
pub const COL_ORG_UNIT: &str = "Sociedad CO";
pub const COL_ORDER_CLASS: &str = "Clase de orden";
pub const COL_LOCATION: &str = "Ubicación técnica";
pub const COL_PLANNED_START: &str = "Fe.inic.extrema";
pub const COL_TOTAL_COST: &str = "Costes tot.reales";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_ORDER,
    COL_ORG_UNIT,
    COL_ORDER_CLASS,
    COL_LOCATION,
    COL_PLANNED_START,
    COL_TOTAL_COST,
];

/// One line of the work-order export, exactly as delivered.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Orden")]
    pub order: Option<String>,
    #[serde(rename = "Sociedad CO")]
    pub org_unit: Option<String>,
    #[serde(rename = "Clase de orden")]
    pub order_class: Option<String>,
    #[serde(rename = "Ubicación técnica")]
    pub location: Option<String>,
    #[serde(rename = "Fe.inic.extrema")]
    pub planned_start: Option<String>,
    #[serde(rename = "Costes tot.reales")]
    pub total_cost: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrgGroup {
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AC")]
    Ac,
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "unmapped")]
    Unmapped,
}

impl OrgGroup {
    pub const ALL: [OrgGroup; 4] = [OrgGroup::Aa, OrgGroup::Ac, OrgGroup::Am, OrgGroup::Unmapped];

    pub fn label(self) -> &'static str {
        match self {
            OrgGroup::Aa => "AA",
            OrgGroup::Ac => "AC",
            OrgGroup::Am => "AM",
            OrgGroup::Unmapped => UNMAPPED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderType {
    Corrective,
    Preventive,
    #[serde(rename = "unmapped")]
    Unmapped,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [OrderType::Corrective, OrderType::Preventive, OrderType::Unmapped];

    pub fn label(self) -> &'static str {
        match self {
            OrderType::Corrective => "Corrective",
            OrderType::Preventive => "Preventive",
            OrderType::Unmapped => UNMAPPED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProcessArea {
    Production,
    Purification,
    Distribution,
}

impl ProcessArea {
    pub const ALL: [ProcessArea; 3] = [
        ProcessArea::Production,
        ProcessArea::Purification,
        ProcessArea::Distribution,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProcessArea::Production => "Production",
            ProcessArea::Purification => "Purification",
            ProcessArea::Distribution => "Distribution",
        }
    }
}

/// Label shared by every category that has no lookup entry.
pub const UNMAPPED: &str = "unmapped";

macro_rules! label_impls {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .into_iter()
                    .find(|v| v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("unknown {} `{}`", $what, s))
            }
        }
    };
}

label_impls!(OrgGroup, "org group");
label_impls!(OrderType, "order type");
label_impls!(ProcessArea, "process area");

/// A work order after normalization and category derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    pub order_id: String,
    pub org_unit_raw: Option<i64>,
    pub org_group: OrgGroup,
    pub order_class_raw: String,
    pub order_type: OrderType,
    pub location_raw: String,
    pub process_area: ProcessArea,
    pub planned_start_raw: i64,
    pub planned_start_date: NaiveDate,
    pub period_key: PeriodKey,
    pub real_total_cost: i64,
}

/// One point of a grouped series, ready for a chart axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub key: String,
    pub value: i64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct OrderCountRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CostRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "RealTotalCost")]
    #[tabled(rename = "RealTotalCost")]
    pub cost: String,
}

/// Everything the presentation layer needs for one filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub org_selection: String,
    pub process_selection: String,
    pub total_orders: usize,
    pub corrective_orders: usize,
    pub preventive_orders: usize,
    pub total_real_cost: i64,
    pub orders_by_org_group: Vec<SeriesPoint>,
    pub orders_by_process_area: Vec<SeriesPoint>,
    pub cost_by_process_area: Vec<SeriesPoint>,
    pub orders_by_period: Vec<SeriesPoint>,
    pub cost_by_period: Vec<SeriesPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back_case_insensitively() {
        assert_eq!("aa".parse::<OrgGroup>(), Ok(OrgGroup::Aa));
        assert_eq!(" Unmapped ".parse::<OrgGroup>(), Ok(OrgGroup::Unmapped));
        assert_eq!("production".parse::<ProcessArea>(), Ok(ProcessArea::Production));
        assert_eq!("Preventive".parse::<OrderType>(), Ok(OrderType::Preventive));
        assert!("XX".parse::<OrgGroup>().is_err());
    }

    #[test]
    fn unmapped_sorts_after_known_groups() {
        let mut groups = vec![OrgGroup::Unmapped, OrgGroup::Am, OrgGroup::Aa];
        groups.sort();
        assert_eq!(groups, vec![OrgGroup::Aa, OrgGroup::Am, OrgGroup::Unmapped]);
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&[OrgGroup::Ac, OrgGroup::Unmapped]).unwrap();
        assert_eq!(json, r#"["AC","unmapped"]"#);
    }
}
