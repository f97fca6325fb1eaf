//! Database operations for cleaned food inspections.

use chrono::NaiveDate;
use iwp_core::Inspection;
use sqlx::PgPool;

use crate::DbError;

#[derive(sqlx::FromRow)]
struct InspectionRow {
    business_name: String,
    license: String,
    facility_type: String,
    risk: String,
    address: String,
    zip: String,
    inspection_date: NaiveDate,
    inspection_type: String,
    results: String,
    latitude: f64,
    longitude: f64,
}

impl From<InspectionRow> for Inspection {
    fn from(row: InspectionRow) -> Self {
        Self {
            business_name: row.business_name,
            license: row.license,
            facility_type: row.facility_type,
            risk: row.risk,
            address: row.address,
            zip: row.zip,
            inspection_date: row.inspection_date,
            inspection_type: row.inspection_type,
            results: row.results,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

/// Replaces the whole inspections table with `inspections`.
///
/// The delete and every insert share one transaction, so readers see either
/// the old snapshot or the new one.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the previous snapshot is
/// then left in place.
pub async fn replace_inspections(
    pool: &PgPool,
    inspections: &[Inspection],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM inspections")
        .execute(&mut *tx)
        .await?;

    for inspection in inspections {
        sqlx::query(
            "INSERT INTO inspections \
             (business_name, license, facility_type, risk, address, zip, \
              inspection_date, inspection_type, results, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&inspection.business_name)
        .bind(&inspection.license)
        .bind(&inspection.facility_type)
        .bind(&inspection.risk)
        .bind(&inspection.address)
        .bind(&inspection.zip)
        .bind(inspection.inspection_date)
        .bind(&inspection.inspection_type)
        .bind(&inspection.results)
        .bind(inspection.latitude)
        .bind(inspection.longitude)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(inspections.len())
}

/// Returns every stored inspection, newest inspection date first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_inspections(pool: &PgPool) -> Result<Vec<Inspection>, DbError> {
    let rows = sqlx::query_as::<_, InspectionRow>(
        "SELECT business_name, license, facility_type, risk, address, zip, \
                inspection_date, inspection_type, results, latitude, longitude \
         FROM inspections \
         ORDER BY inspection_date DESC, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Inspection::from).collect())
}
