use crate::error::{MonitorError, Result};
use crate::types::{CanonicalRecord, OrgGroup, ProcessArea};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Label of the "no restriction" choice in option lists.
pub const ALL_LABEL: &str = "All";

/// Spellings accepted for "no restriction" when parsing a selection.
const ALL_ALIASES: [&str; 3] = ["all", "todas", "todos"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr<Err = String>,
{
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || ALL_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(s)) {
            return Ok(Selection::All);
        }
        s.parse().map(Selection::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Only(v) => write!(f, "{}", v),
        }
    }
}

/// What to do with rows whose org code has no table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UnmappedPolicy {
    /// Keep them and offer `unmapped` as an org filter option.
    #[default]
    Surface,
    /// Leave them out of every view and option list.
    Exclude,
}

impl UnmappedPolicy {
    pub fn admits(self, record: &CanonicalRecord) -> bool {
        self == UnmappedPolicy::Surface || record.org_group != OrgGroup::Unmapped
    }
}

/// One selection per filterable dimension, combined with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub org_group: Selection<OrgGroup>,
    pub process_area: Selection<ProcessArea>,
}

impl FilterSpec {
    pub fn all() -> Self {
        FilterSpec::default()
    }

    /// Set one dimension by name, e.g. `set("org_group", "AA")`.
    pub fn set(&mut self, dimension: &str, value: &str) -> Result<()> {
        match dimension.trim() {
            "org_group" | "org" => {
                self.org_group = value.parse().map_err(MonitorError::InvalidFilter)?;
            }
            "process_area" | "process" => {
                self.process_area = value.parse().map_err(MonitorError::InvalidFilter)?;
            }
            other => {
                return Err(MonitorError::InvalidFilter(format!(
                    "unknown dimension `{}`",
                    other
                )))
            }
        }
        Ok(())
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut spec = FilterSpec::all();
        for (dimension, value) in pairs {
            spec.set(dimension, value)?;
        }
        Ok(spec)
    }

    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        self.org_group.matches(&record.org_group) && self.process_area.matches(&record.process_area)
    }
}

/// Records matching every dimension of `spec`, in input order.
pub fn apply_filters<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a CanonicalRecord>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    records.into_iter().filter(|r| spec.matches(r)).collect()
}

/// `All` followed by the distinct values of `key`, in order of first
/// appearance.
pub fn filter_options<'a, K, F, I>(records: I, key: F) -> Vec<String>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
    F: Fn(&CanonicalRecord) -> K,
    K: Eq + Hash + fmt::Display,
{
    let mut seen = HashSet::new();
    let mut options = vec![ALL_LABEL.to_string()];
    for record in records {
        let value = key(record);
        let label = value.to_string();
        if seen.insert(value) {
            options.push(label);
        }
    }
    options
}

pub fn org_group_options(records: &[CanonicalRecord], policy: UnmappedPolicy) -> Vec<String> {
    filter_options(records.iter().filter(|r| policy.admits(r)), |r| r.org_group)
}

pub fn process_area_options(records: &[CanonicalRecord], policy: UnmappedPolicy) -> Vec<String> {
    filter_options(records.iter().filter(|r| policy.admits(r)), |r| r.process_area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKey;
    use crate::types::OrderType;
    use chrono::NaiveDate;

    fn record(id: &str, org: OrgGroup, area: ProcessArea) -> CanonicalRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CanonicalRecord {
            order_id: id.to_string(),
            org_unit_raw: None,
            org_group: org,
            order_class_raw: "PM01".to_string(),
            order_type: OrderType::Corrective,
            location_raw: "nan".to_string(),
            process_area: area,
            planned_start_raw: 45292,
            planned_start_date: date,
            period_key: PeriodKey::from_date(date),
            real_total_cost: 0,
        }
    }

    fn sample() -> Vec<CanonicalRecord> {
        vec![
            record("1", OrgGroup::Aa, ProcessArea::Production),
            record("2", OrgGroup::Aa, ProcessArea::Distribution),
            record("3", OrgGroup::Ac, ProcessArea::Production),
        ]
    }

    #[test]
    fn selections_parse_all_aliases() {
        assert_eq!("All".parse::<Selection<OrgGroup>>(), Ok(Selection::All));
        assert_eq!("Todas".parse::<Selection<OrgGroup>>(), Ok(Selection::All));
        assert_eq!("".parse::<Selection<OrgGroup>>(), Ok(Selection::All));
        assert_eq!("AC".parse::<Selection<OrgGroup>>(), Ok(Selection::Only(OrgGroup::Ac)));
        assert!("ZZ".parse::<Selection<OrgGroup>>().is_err());
    }

    #[test]
    fn filters_are_conjunctive() {
        let data = sample();
        let spec = FilterSpec::from_pairs([("org_group", "AA"), ("process_area", "Production")]).unwrap();
        let hits = apply_filters(&data, &spec);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].order_id, "1");
    }

    #[test]
    fn all_imposes_no_constraint() {
        let data = sample();
        assert_eq!(apply_filters(&data, &FilterSpec::all()).len(), 3);
        let spec = FilterSpec::from_pairs([("process_area", "Production")]).unwrap();
        assert_eq!(apply_filters(&data, &spec).len(), 2);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let data = sample();
        let spec = FilterSpec::from_pairs([("org", "AM")]).unwrap();
        assert!(apply_filters(&data, &spec).is_empty());
    }

    #[test]
    fn unknown_dimension_is_rejected() {
        let err = FilterSpec::from_pairs([("region", "AA")]).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidFilter(_)));
    }

    #[test]
    fn options_keep_first_appearance_order() {
        let mut data = sample();
        data.insert(0, record("0", OrgGroup::Unmapped, ProcessArea::Purification));
        assert_eq!(
            org_group_options(&data, UnmappedPolicy::Surface),
            vec!["All", "unmapped", "AA", "AC"]
        );
        assert_eq!(
            org_group_options(&data, UnmappedPolicy::Exclude),
            vec!["All", "AA", "AC"]
        );
        assert_eq!(
            process_area_options(&data, UnmappedPolicy::Exclude),
            vec!["All", "Production", "Distribution"]
        );
    }
}
