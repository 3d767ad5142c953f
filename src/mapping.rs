// Fixed lookup tables that turn raw codes into reporting categories.
//
// Missing entries never fail: they resolve to the `unmapped` variant so the
// rows stay visible to the filters.
use crate::types::{OrderType, OrgGroup, ProcessArea};
use std::collections::BTreeMap;

/// Built-in controlling-area codes. Later exports added `6100`; entries are
/// only ever appended.
const ORG_CODES: [(i64, OrgGroup); 6] = [
    (1000, OrgGroup::Aa),
    (1600, OrgGroup::Aa),
    (2000, OrgGroup::Ac),
    (3000, OrgGroup::Am),
    (3100, OrgGroup::Am),
    (6100, OrgGroup::Aa),
];

const ORDER_CLASSES: [(&str, OrderType); 3] = [
    ("PM01", OrderType::Corrective),
    ("PM02", OrderType::Corrective),
    ("PM03", OrderType::Preventive),
];

/// Checked in order, first match wins.
const PROCESS_RULES: [(&str, ProcessArea); 2] = [
    ("A-TRAT", ProcessArea::Production),
    ("A-DEPU", ProcessArea::Purification),
];

const DEFAULT_PROCESS_AREA: ProcessArea = ProcessArea::Distribution;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgTable {
    codes: BTreeMap<i64, OrgGroup>,
}

impl Default for OrgTable {
    fn default() -> Self {
        OrgTable {
            codes: ORG_CODES.into_iter().collect(),
        }
    }
}

impl OrgTable {
    /// Built-in table plus `extra`. An extra entry for an existing code
    /// replaces it.
    pub fn with_extra<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (i64, OrgGroup)>,
    {
        let mut table = OrgTable::default();
        table.codes.extend(extra);
        table
    }

    pub fn lookup(&self, code: Option<i64>) -> OrgGroup {
        code.and_then(|c| self.codes.get(&c).copied())
            .unwrap_or(OrgGroup::Unmapped)
    }
}

/// Parse a `CODE=GROUP` pair, e.g. `6200=AC`.
pub fn parse_org_entry(s: &str) -> Result<(i64, OrgGroup), String> {
    let (code, group) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=GROUP, got `{}`", s))?;
    let code: i64 = code
        .trim()
        .parse()
        .map_err(|_| format!("org code `{}` is not an integer", code.trim()))?;
    let group: OrgGroup = group.parse()?;
    if group == OrgGroup::Unmapped {
        return Err("cannot map a code to `unmapped`".to_string());
    }
    Ok((code, group))
}

pub fn map_order_class(code: &str) -> OrderType {
    let code = code.trim();
    ORDER_CLASSES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, t)| *t)
        .unwrap_or(OrderType::Unmapped)
}

pub fn map_process_area(location: &str) -> ProcessArea {
    PROCESS_RULES
        .iter()
        .find(|(prefix, _)| location.starts_with(prefix))
        .map(|(_, area)| *area)
        .unwrap_or(DEFAULT_PROCESS_AREA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_org_codes_map_to_their_group() {
        let table = OrgTable::default();
        for (code, group) in ORG_CODES {
            assert_eq!(table.lookup(Some(code)), group);
        }
        assert_eq!(table.lookup(Some(6100)), OrgGroup::Aa);
    }

    #[test]
    fn unknown_org_codes_are_unmapped() {
        let table = OrgTable::default();
        assert_eq!(table.lookup(Some(9999)), OrgGroup::Unmapped);
        assert_eq!(table.lookup(None), OrgGroup::Unmapped);
    }

    #[test]
    fn extra_entries_extend_the_table() {
        let table = OrgTable::with_extra([(6200, OrgGroup::Ac)]);
        assert_eq!(table.lookup(Some(6200)), OrgGroup::Ac);
        assert_eq!(table.lookup(Some(1000)), OrgGroup::Aa);
    }

    #[test]
    fn org_entry_parsing() {
        assert_eq!(parse_org_entry("6200=AC"), Ok((6200, OrgGroup::Ac)));
        assert_eq!(parse_org_entry(" 7000 = am"), Ok((7000, OrgGroup::Am)));
        assert!(parse_org_entry("6200").is_err());
        assert!(parse_org_entry("x=AA").is_err());
        assert!(parse_org_entry("6200=unmapped").is_err());
    }

    #[test]
    fn order_classes() {
        assert_eq!(map_order_class("PM01"), OrderType::Corrective);
        assert_eq!(map_order_class("PM02"), OrderType::Corrective);
        assert_eq!(map_order_class("PM03"), OrderType::Preventive);
        assert_eq!(map_order_class("PM04"), OrderType::Unmapped);
        assert_eq!(map_order_class(""), OrderType::Unmapped);
    }

    #[test]
    fn process_area_by_location_prefix() {
        assert_eq!(map_process_area("A-TRAT-PLANTA-1"), ProcessArea::Production);
        assert_eq!(map_process_area("A-DEPU-02"), ProcessArea::Purification);
        assert_eq!(map_process_area("A-RED-15"), ProcessArea::Distribution);
        assert_eq!(map_process_area("nan"), ProcessArea::Distribution);
        assert_eq!(map_process_area("a-trat"), ProcessArea::Distribution);
    }
}
