use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A cleaned city food-inspection result.
///
/// Produced from the raw open-data feed only when every field is present and
/// converts cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub business_name: String,
    /// License number without a decimal part, e.g. `"2214"`.
    pub license: String,
    pub facility_type: String,
    pub risk: String,
    pub address: String,
    pub zip: String,
    pub inspection_date: NaiveDate,
    pub inspection_type: String,
    pub results: String,
    pub latitude: f64,
    pub longitude: f64,
}
