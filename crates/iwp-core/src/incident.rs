use serde::{Deserialize, Serialize};

/// One food-poisoning report scraped from a listing page.
///
/// Serializes to the persisted document shape, with the address nested under
/// `incident_address_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Business name and location, with the site's marketing suffix removed.
    #[serde(rename = "incident_title")]
    pub title: String,
    /// Date exactly as the site displays it, e.g. `"Dec 30 2018 10:51pm"`.
    #[serde(rename = "incident_date")]
    pub date: String,
    /// Absolute URL of the detail page.
    #[serde(rename = "incident_url")]
    pub url: String,
    #[serde(rename = "incident_report_type")]
    pub report_type: String,
    #[serde(rename = "incident_symptoms")]
    pub symptoms: Vec<String>,
    /// Text of the last report tag that was neither symptoms nor report type.
    #[serde(rename = "incident_misc")]
    pub misc_tag: String,
    #[serde(rename = "incident_description")]
    pub description: String,
    #[serde(rename = "incident_address_info")]
    pub address: AddressInfo,
}

/// Address of an incident.
///
/// US addresses are decomposed; everything else keeps only the raw text. The
/// two shapes serialize differently: an unstructured address has no
/// component keys at all rather than empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressInfo {
    Structured(StructuredAddress),
    Unstructured {
        #[serde(rename = "incident_address")]
        raw: String,
    },
}

impl AddressInfo {
    /// The address text as it appeared on the detail page, whitespace-collapsed.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            AddressInfo::Structured(s) => &s.raw,
            AddressInfo::Unstructured { raw } => raw,
        }
    }

    #[must_use]
    pub fn as_structured(&self) -> Option<&StructuredAddress> {
        match self {
            AddressInfo::Structured(s) => Some(s),
            AddressInfo::Unstructured { .. } => None,
        }
    }
}

/// A United States address split into its components.
///
/// Any component may be empty when the source text had too few segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAddress {
    #[serde(rename = "incident_address")]
    pub raw: String,
    /// Components re-joined with the zipcode after the state.
    #[serde(rename = "incident_address_standard")]
    pub standardized: String,
    #[serde(rename = "incident_address_street")]
    pub street: String,
    #[serde(rename = "incident_address_street2")]
    pub street2: String,
    #[serde(rename = "incident_address_street3")]
    pub street3: String,
    #[serde(rename = "incident_address_city")]
    pub city: String,
    #[serde(rename = "incident_address_state")]
    pub state: String,
    #[serde(rename = "incident_address_zipcode")]
    pub zipcode: String,
    #[serde(rename = "incident_address_country")]
    pub country: String,
}
