//! Flattening of incident documents and their join with inspections.

use std::collections::HashMap;

use iwp_core::{IncidentRecord, Inspection};
use serde::Serialize;

/// An incident with its address lifted to top-level columns.
///
/// Unstructured addresses leave every component column empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentRow {
    /// Title up to its first comma, e.g. `"Portillo's"`.
    pub business_name: String,
    pub incident_title: String,
    pub incident_date: String,
    pub incident_url: String,
    pub incident_report_type: String,
    /// Symptoms joined with `", "`.
    pub incident_symptoms: String,
    pub incident_misc: String,
    pub incident_address: String,
    pub incident_address_standard: String,
    pub incident_address_street: String,
    pub incident_address_street2: String,
    pub incident_address_street3: String,
    pub incident_address_city: String,
    pub incident_address_state: String,
    pub incident_address_zipcode: String,
    pub incident_address_country: String,
    pub incident_description: String,
}

impl IncidentRow {
    #[must_use]
    pub fn from_record(record: &IncidentRecord) -> Self {
        let business_name = record
            .title
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_owned();

        let mut row = Self {
            business_name,
            incident_title: record.title.clone(),
            incident_date: record.date.clone(),
            incident_url: record.url.clone(),
            incident_report_type: record.report_type.clone(),
            incident_symptoms: record.symptoms.join(", "),
            incident_misc: record.misc_tag.clone(),
            incident_address: record.address.raw().to_owned(),
            incident_description: record.description.clone(),
            ..Self::default()
        };

        if let Some(address) = record.address.as_structured() {
            row.incident_address_standard.clone_from(&address.standardized);
            row.incident_address_street.clone_from(&address.street);
            row.incident_address_street2.clone_from(&address.street2);
            row.incident_address_street3.clone_from(&address.street3);
            row.incident_address_city.clone_from(&address.city);
            row.incident_address_state.clone_from(&address.state);
            row.incident_address_zipcode.clone_from(&address.zipcode);
            row.incident_address_country.clone_from(&address.country);
        }

        row
    }
}

/// One incident matched to one inspection of the same business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    pub business_name: String,
    pub incident_title: String,
    pub incident_date: String,
    pub incident_url: String,
    pub incident_report_type: String,
    pub incident_symptoms: String,
    pub incident_description: String,
    pub incident_address_standard: String,
    pub zip: String,
    pub license: String,
    pub facility_type: String,
    pub risk: String,
    pub inspection_address: String,
    pub inspection_date: String,
    pub inspection_type: String,
    pub results: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl MergedRow {
    fn new(incident: &IncidentRow, inspection: &Inspection) -> Self {
        Self {
            business_name: incident.business_name.clone(),
            incident_title: incident.incident_title.clone(),
            incident_date: incident.incident_date.clone(),
            incident_url: incident.incident_url.clone(),
            incident_report_type: incident.incident_report_type.clone(),
            incident_symptoms: incident.incident_symptoms.clone(),
            incident_description: incident.incident_description.clone(),
            incident_address_standard: incident.incident_address_standard.clone(),
            zip: inspection.zip.clone(),
            license: inspection.license.clone(),
            facility_type: inspection.facility_type.clone(),
            risk: inspection.risk.clone(),
            inspection_address: inspection.address.clone(),
            inspection_date: inspection.inspection_date.format("%Y-%m-%d").to_string(),
            inspection_type: inspection.inspection_type.clone(),
            results: inspection.results.clone(),
            latitude: inspection.latitude,
            longitude: inspection.longitude,
        }
    }
}

/// Uppercased business name with everything but letters and digits removed,
/// so `"Portillo's"` and `"PORTILLOS"` compare equal.
#[must_use]
pub fn normalize_business_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// First five characters of a zipcode when they are all digits.
fn zip5(zip: &str) -> Option<&str> {
    let head = zip.trim().get(..5)?;
    head.chars().all(|c| c.is_ascii_digit()).then_some(head)
}

fn join_key(name: &str, zip: &str) -> Option<(String, String)> {
    let name = normalize_business_name(name);
    if name.is_empty() {
        return None;
    }
    Some((name, zip5(zip)?.to_owned()))
}

/// Inner join of incidents and inspections on normalized business name and
/// five-digit zipcode.
///
/// Rows come out in incident order, and for each incident in inspection
/// order. Incidents without a usable name or zipcode never match.
#[must_use]
pub fn merge(incidents: &[IncidentRow], inspections: &[Inspection]) -> Vec<MergedRow> {
    let mut by_key: HashMap<(String, String), Vec<&Inspection>> = HashMap::new();
    for inspection in inspections {
        if let Some(key) = join_key(&inspection.business_name, &inspection.zip) {
            by_key.entry(key).or_default().push(inspection);
        }
    }

    let mut merged = Vec::new();
    for incident in incidents {
        let Some(key) = join_key(&incident.business_name, &incident.incident_address_zipcode)
        else {
            continue;
        };
        if let Some(matches) = by_key.get(&key) {
            merged.extend(matches.iter().map(|inspection| MergedRow::new(incident, inspection)));
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use iwp_core::{AddressInfo, StructuredAddress};

    use super::*;

    fn record(title: &str, address: AddressInfo) -> IncidentRecord {
        IncidentRecord {
            title: title.to_owned(),
            date: "Feb 12 2019 8:05pm".to_owned(),
            url: "https://iwaspoisoned.com/incident/1".to_owned(),
            report_type: "Food Poisoning".to_owned(),
            symptoms: vec!["Diarrhea".to_owned(), "Nausea".to_owned()],
            misc_tag: String::new(),
            description: "Bad night.".to_owned(),
            address,
        }
    }

    fn chicago(zip: &str) -> AddressInfo {
        AddressInfo::Structured(StructuredAddress {
            raw: format!("520 West Taylor Street, Chicago, {zip} Illinois, United States"),
            standardized: format!("520 West Taylor Street, Chicago, Illinois {zip}, United States"),
            street: "520 West Taylor Street".to_owned(),
            city: "Chicago".to_owned(),
            state: "Illinois".to_owned(),
            zipcode: zip.to_owned(),
            country: "United States".to_owned(),
            ..StructuredAddress::default()
        })
    }

    fn inspection(name: &str, zip: &str, results: &str) -> Inspection {
        Inspection {
            business_name: name.to_owned(),
            license: "2214".to_owned(),
            facility_type: "Restaurant".to_owned(),
            risk: "Risk 1 (High)".to_owned(),
            address: "520 W TAYLOR ST".to_owned(),
            zip: zip.to_owned(),
            inspection_date: NaiveDate::from_ymd_opt(2019, 2, 1).unwrap(),
            inspection_type: "Canvass".to_owned(),
            results: results.to_owned(),
            latitude: 41.87,
            longitude: -87.64,
        }
    }

    #[test]
    fn from_record_flattens_structured_address() {
        let row = IncidentRow::from_record(&record(
            "Portillo's, West Taylor Street, Chicago, IL, USA",
            chicago("60607"),
        ));
        assert_eq!(row.business_name, "Portillo's");
        assert_eq!(row.incident_symptoms, "Diarrhea, Nausea");
        assert_eq!(row.incident_address_city, "Chicago");
        assert_eq!(row.incident_address_zipcode, "60607");
        assert_eq!(row.incident_address_street2, "");
    }

    #[test]
    fn from_record_leaves_components_empty_for_unstructured() {
        let row = IncidentRow::from_record(&record(
            "Tim Hortons, Toronto",
            AddressInfo::Unstructured {
                raw: "1 Front St W, Toronto, M5J 2X5 Ontario, Canada".to_owned(),
            },
        ));
        assert_eq!(row.business_name, "Tim Hortons");
        assert_eq!(
            row.incident_address,
            "1 Front St W, Toronto, M5J 2X5 Ontario, Canada"
        );
        assert_eq!(row.incident_address_standard, "");
        assert_eq!(row.incident_address_zipcode, "");
    }

    #[test]
    fn title_without_comma_is_whole_business_name() {
        let row = IncidentRow::from_record(&record("  Portillo's  ", chicago("60607")));
        assert_eq!(row.business_name, "Portillo's");
    }

    #[test]
    fn normalize_business_name_ignores_case_and_punctuation() {
        assert_eq!(normalize_business_name("Portillo's"), "PORTILLOS");
        assert_eq!(normalize_business_name("PORTILLO'S"), "PORTILLOS");
        assert_eq!(normalize_business_name("Chick-fil-A #12"), "CHICKFILA12");
    }

    #[test]
    fn merge_joins_on_name_and_zip() {
        let incidents = vec![IncidentRow::from_record(&record(
            "Portillo's, Chicago",
            chicago("60607"),
        ))];
        let inspections = vec![
            inspection("PORTILLO'S", "60607", "Pass"),
            inspection("PORTILLO'S", "60610", "Fail"),
            inspection("SUBWAY", "60607", "Pass"),
            inspection("PORTILLOS", "60607", "Pass w/ Conditions"),
        ];

        let merged = merge(&incidents, &inspections);
        let results: Vec<&str> = merged.iter().map(|m| m.results.as_str()).collect();
        assert_eq!(results, vec!["Pass", "Pass w/ Conditions"]);
        assert_eq!(merged[0].inspection_date, "2019-02-01");
        assert_eq!(merged[0].incident_title, "Portillo's, Chicago");
    }

    #[test]
    fn zip_plus_four_matches_five_digit_zip() {
        let incidents = vec![IncidentRow::from_record(&record(
            "Portillo's, Chicago",
            chicago("60607-1234"),
        ))];
        let merged = merge(&incidents, &[inspection("PORTILLO'S", "60607", "Pass")]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn incidents_without_zip_never_match() {
        let incidents = vec![IncidentRow::from_record(&record(
            "Portillo's, Chicago",
            AddressInfo::Unstructured {
                raw: "Chicago".to_owned(),
            },
        ))];
        assert!(merge(&incidents, &[inspection("PORTILLO'S", "60607", "Pass")]).is_empty());
    }
}
