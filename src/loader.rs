use crate::error::{MonitorError, Result};
use crate::mapping::{map_order_class, map_process_area, OrgTable};
use crate::period::PeriodKey;
use crate::types::{CanonicalRecord, OrderType, OrgGroup, RawRow, REQUIRED_COLUMNS};
use crate::util::{normalize_location, parse_cost, parse_org_code, parse_serial, serial_to_date};
use csv::{ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, info, warn};

pub const DELIMITER: u8 = b';';

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub malformed_rows: usize,
    pub unmapped_org_rows: usize,
    pub unmapped_class_rows: usize,
    pub coerced_costs: usize,
}

/// The export is Latin-1. WHATWG treats that label as windows-1252, which
/// agrees with ISO-8859-1 on every printable byte and maps every byte to a
/// character, so decoding cannot fail.
pub fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    WINDOWS_1252.decode_without_bom_handling(bytes).0
}

/// Turn one raw row into a canonical record.
///
/// Returns `None` when the row has no order id or no usable planned-start
/// serial. The flag is `true` when the cost had to be coerced to zero.
pub fn build_record(row: &RawRow, table: &OrgTable) -> Option<(CanonicalRecord, bool)> {
    let order_id = row.order.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    let planned_start_raw = parse_serial(row.planned_start.as_deref())?;
    let planned_start_date = serial_to_date(planned_start_raw)?;

    let org_unit_raw = parse_org_code(row.org_unit.as_deref());
    let order_class_raw = row.order_class.as_deref().unwrap_or("").trim().to_string();
    let location_raw = normalize_location(row.location.as_deref());
    let (real_total_cost, coerced) = parse_cost(row.total_cost.as_deref());

    let record = CanonicalRecord {
        order_id: order_id.to_string(),
        org_unit_raw,
        org_group: table.lookup(org_unit_raw),
        order_type: map_order_class(&order_class_raw),
        order_class_raw,
        process_area: map_process_area(&location_raw),
        location_raw,
        planned_start_raw,
        planned_start_date,
        period_key: PeriodKey::from_date(planned_start_date),
        real_total_cost,
    };
    Some((record, coerced))
}

/// Decode, validate the header and normalize every row in one pass.
///
/// A missing required column fails the whole load. Rows with the wrong
/// field count, or that [`build_record`] rejects, are dropped and counted.
pub fn load_and_clean(bytes: &[u8], table: &OrgTable) -> Result<(Vec<CanonicalRecord>, LoadReport)> {
    let text = decode_latin1(bytes);
    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(false)
        .trim(Trim::Fields)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(MonitorError::MissingColumn(required.to_string()));
        }
    }

    let mut report = LoadReport::default();
    let mut records: Vec<CanonicalRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(line = e.position().map(|p| p.line()), error = %e, "dropping malformed row");
                report.malformed_rows += 1;
                continue;
            }
        };
        let Some((record, coerced)) = build_record(&row, table) else {
            debug!(order = ?row.order, planned_start = ?row.planned_start, "dropping row without order id or start serial");
            report.malformed_rows += 1;
            continue;
        };

        if coerced {
            report.coerced_costs += 1;
        }
        if record.org_group == OrgGroup::Unmapped {
            report.unmapped_org_rows += 1;
        }
        if record.order_type == OrderType::Unmapped {
            report.unmapped_class_rows += 1;
        }
        records.push(record);
    }

    report.kept_rows = records.len();
    if report.malformed_rows > 0 {
        warn!(dropped = report.malformed_rows, "malformed rows skipped during load");
    }
    info!(
        total = report.total_rows,
        kept = report.kept_rows,
        unmapped_org = report.unmapped_org_rows,
        "work orders normalized"
    );
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessArea;
    use chrono::NaiveDate;

    const HEADER: &str =
        "Orden;Sociedad CO;Clase de orden;Ubicación técnica;Fe.inic.extrema;Costes tot.reales\n";

    fn latin1(text: &str) -> Vec<u8> {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(text);
        assert!(!unmappable);
        bytes.into_owned()
    }

    fn load(body: &str) -> (Vec<CanonicalRecord>, LoadReport) {
        let csv = format!("{}{}", HEADER, body);
        load_and_clean(&latin1(&csv), &OrgTable::default()).unwrap()
    }

    #[test]
    fn every_byte_decodes() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(decode_latin1(&bytes).chars().count(), 256);
        assert_eq!(decode_latin1(b"Ubicaci\xf3n"), "Ubicación");
    }

    #[test]
    fn normalizes_a_full_row() {
        let (records, report) = load("4000123;1000;PM01;A-TRAT-01;45292;1234,9\n");
        assert_eq!(report.kept_rows, 1);
        let r = &records[0];
        assert_eq!(r.order_id, "4000123");
        assert_eq!(r.org_unit_raw, Some(1000));
        assert_eq!(r.org_group, OrgGroup::Aa);
        assert_eq!(r.order_type, OrderType::Corrective);
        assert_eq!(r.process_area, ProcessArea::Production);
        assert_eq!(r.planned_start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(r.period_key.to_string(), "2024-01");
        assert_eq!(r.real_total_cost, 1234);
    }

    #[test]
    fn header_with_latin1_accent_is_matched() {
        let bytes = latin1(HEADER);
        assert!(bytes.contains(&0xF3), "ó must be encoded as a single Latin-1 byte");
        let (records, _) = load_and_clean(&bytes, &OrgTable::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_column_fails_loudly() {
        let csv = "Orden;Sociedad CO;Clase de orden;Fe.inic.extrema;Costes tot.reales\n1;1000;PM01;1;1\n";
        let err = load_and_clean(&latin1(csv), &OrgTable::default()).unwrap_err();
        match err {
            MonitorError::MissingColumn(col) => assert_eq!(col, "Ubicación técnica"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn column_match_is_exact() {
        let csv = HEADER.replace("Orden;", "orden;");
        let err = load_and_clean(&latin1(&csv), &OrgTable::default()).unwrap_err();
        assert!(matches!(err, MonitorError::MissingColumn(c) if c == "Orden"));
    }

    #[test]
    fn malformed_rows_are_dropped_and_counted() {
        let (records, report) = load(
            "1;1000;PM01;A-TRAT;45292;10\n\
             2;1000;PM01\n\
             3;2000;PM03;A-DEPU;45293;20\n\
             ;2000;PM03;A-DEPU;45293;20\n\
             5;2000;PM03;A-DEPU;;20\n",
        );
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.malformed_rows, 3);
        assert_eq!(report.kept_rows, 2);
        let ids: Vec<&str> = records.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn defaults_instead_of_dropping() {
        let (records, report) = load("7;9999;ZZ99;;45292;abc\n");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.org_group, OrgGroup::Unmapped);
        assert_eq!(r.order_type, OrderType::Unmapped);
        assert_eq!(r.location_raw, "nan");
        assert_eq!(r.process_area, ProcessArea::Distribution);
        assert_eq!(r.real_total_cost, 0);
        assert_eq!(report.unmapped_org_rows, 1);
        assert_eq!(report.unmapped_class_rows, 1);
        assert_eq!(report.coerced_costs, 1);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = format!(
            "Texto breve;{}Motor;88;2000;PM02;A-RED;45292;5\n",
            HEADER
        );
        let (records, _) = load_and_clean(&latin1(&csv), &OrgTable::default()).unwrap();
        assert_eq!(records[0].order_id, "88");
        assert_eq!(records[0].org_group, OrgGroup::Ac);
    }

    #[test]
    fn loading_twice_is_identical() {
        let body = "1;1000;PM01;A-TRAT;45292;10\n2;3100;PM03;A-DEPU;45320;20\n";
        assert_eq!(load(body), load(body));
    }
}
