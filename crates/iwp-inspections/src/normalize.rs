//! Cleaning of raw feed rows into [`Inspection`]s.

use chrono::NaiveDate;
use iwp_core::Inspection;
use thiserror::Error;

use crate::types::RawInspection;

/// Why a raw row was not kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("invalid {field}: {value:?}")]
    Invalid { field: &'static str, value: String },
}

/// Cleans every row, dropping the ones that are incomplete or unparseable.
#[must_use]
pub fn clean_inspections(rows: Vec<RawInspection>) -> Vec<Inspection> {
    rows.into_iter()
        .filter_map(|row| match clean_inspection(row) {
            Ok(inspection) => Some(inspection),
            Err(reason) => {
                tracing::debug!(%reason, "dropping inspection row");
                None
            }
        })
        .collect()
}

/// Converts one raw row into an [`Inspection`].
///
/// Every field must be present and non-blank. `license` and `zip` lose any
/// decimal part, and only the calendar date of `inspection_date` is kept.
///
/// # Errors
///
/// Returns the first [`RejectReason`] encountered.
pub fn clean_inspection(row: RawInspection) -> Result<Inspection, RejectReason> {
    let business_name = required(row.dba_name, "dba_name")?;
    let license = required(row.license_, "license_")?;
    let facility_type = required(row.facility_type, "facility_type")?;
    let risk = required(row.risk, "risk")?;
    let address = required(row.address, "address")?;
    let zip = required(row.zip, "zip")?;
    let inspection_date = required(row.inspection_date, "inspection_date")?;
    let inspection_type = required(row.inspection_type, "inspection_type")?;
    let results = required(row.results, "results")?;
    let latitude = required(row.latitude, "latitude")?;
    let longitude = required(row.longitude, "longitude")?;

    Ok(Inspection {
        business_name,
        license: whole_number(&license).ok_or_else(|| RejectReason::Invalid {
            field: "license_",
            value: license.clone(),
        })?,
        facility_type,
        risk,
        address,
        zip: whole_number(&zip).ok_or_else(|| RejectReason::Invalid {
            field: "zip",
            value: zip.clone(),
        })?,
        inspection_date: calendar_date(&inspection_date).ok_or_else(|| RejectReason::Invalid {
            field: "inspection_date",
            value: inspection_date.clone(),
        })?,
        inspection_type,
        results,
        latitude: coordinate(&latitude, "latitude")?,
        longitude: coordinate(&longitude, "longitude")?,
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RejectReason> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
        _ => Err(RejectReason::Missing(field)),
    }
}

/// `"2214.0"` → `"2214"`. Leading zeros are dropped, as for any integer.
fn whole_number(value: &str) -> Option<String> {
    let (int_part, frac_part) = value.split_once('.').unwrap_or((value, ""));
    if !frac_part.chars().all(|c| c == '0') {
        return None;
    }
    int_part.parse::<u64>().ok().map(|n| n.to_string())
}

/// `"2019-02-12T00:00:00.000"` → 2019-02-12.
fn calendar_date(value: &str) -> Option<NaiveDate> {
    let day = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn coordinate(value: &str, field: &'static str) -> Result<f64, RejectReason> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RejectReason::Invalid {
            field,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_row() -> RawInspection {
        RawInspection {
            dba_name: Some("PORTILLO'S HOT DOGS".to_owned()),
            license_: Some("2214.0".to_owned()),
            facility_type: Some("Restaurant".to_owned()),
            risk: Some("Risk 1 (High)".to_owned()),
            address: Some("520 W TAYLOR ST ".to_owned()),
            zip: Some("60607".to_owned()),
            inspection_date: Some("2019-02-12T00:00:00.000".to_owned()),
            inspection_type: Some("Canvass".to_owned()),
            results: Some("Pass w/ Conditions".to_owned()),
            latitude: Some("41.86965".to_owned()),
            longitude: Some("-87.64135".to_owned()),
        }
    }

    #[test]
    fn complete_row_is_cleaned_and_renamed() {
        let inspection = clean_inspection(complete_row()).unwrap();
        assert_eq!(inspection.business_name, "PORTILLO'S HOT DOGS");
        assert_eq!(inspection.license, "2214");
        assert_eq!(inspection.address, "520 W TAYLOR ST");
        assert_eq!(inspection.zip, "60607");
        assert_eq!(
            inspection.inspection_date,
            NaiveDate::from_ymd_opt(2019, 2, 12).unwrap()
        );
        assert!((inspection.latitude - 41.869_65).abs() < 1e-9);
        assert!((inspection.longitude + 87.641_35).abs() < 1e-9);
    }

    #[test]
    fn any_missing_field_rejects_the_row() {
        let mut row = complete_row();
        row.longitude = None;
        assert_eq!(
            clean_inspection(row),
            Err(RejectReason::Missing("longitude"))
        );

        let mut row = complete_row();
        row.facility_type = Some("   ".to_owned());
        assert_eq!(
            clean_inspection(row),
            Err(RejectReason::Missing("facility_type"))
        );
    }

    #[test]
    fn unparseable_values_reject_the_row() {
        let mut row = complete_row();
        row.latitude = Some("north".to_owned());
        assert!(matches!(
            clean_inspection(row),
            Err(RejectReason::Invalid { field: "latitude", .. })
        ));

        let mut row = complete_row();
        row.zip = Some("60607-1234".to_owned());
        assert!(matches!(
            clean_inspection(row),
            Err(RejectReason::Invalid { field: "zip", .. })
        ));

        let mut row = complete_row();
        row.inspection_date = Some("02/12/2019".to_owned());
        assert!(matches!(
            clean_inspection(row),
            Err(RejectReason::Invalid { field: "inspection_date", .. })
        ));
    }

    #[test]
    fn whole_number_drops_zero_decimal_only() {
        assert_eq!(whole_number("2214.0").as_deref(), Some("2214"));
        assert_eq!(whole_number("2214").as_deref(), Some("2214"));
        assert_eq!(whole_number("02214").as_deref(), Some("2214"));
        assert_eq!(whole_number("2214.5"), None);
        assert_eq!(whole_number(""), None);
    }

    #[test]
    fn date_without_time_part_is_accepted() {
        assert_eq!(
            calendar_date("2018-12-30"),
            NaiveDate::from_ymd_opt(2018, 12, 30)
        );
    }

    #[test]
    fn clean_inspections_keeps_only_valid_rows_in_order() {
        let mut broken = complete_row();
        broken.results = None;
        let mut second = complete_row();
        second.dba_name = Some("SECOND".to_owned());

        let cleaned = clean_inspections(vec![complete_row(), broken, second]);
        let names: Vec<&str> = cleaned.iter().map(|i| i.business_name.as_str()).collect();
        assert_eq!(names, vec!["PORTILLO'S HOT DOGS", "SECOND"]);
    }
}
