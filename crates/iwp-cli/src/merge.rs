//! `merge` command handler.

use std::io::Write;
use std::path::Path;

use iwp_inspections::{merge, IncidentRow, MergedRow};

/// Join every stored incident with the stored inspections and write the
/// matches to `out` as CSV.
///
/// # Errors
///
/// Returns an error if either table cannot be read or the file cannot be
/// written.
pub(crate) async fn run_merge(pool: &sqlx::PgPool, out: &Path) -> anyhow::Result<()> {
    let incidents: Vec<IncidentRow> = iwp_db::list_incidents(pool, None)
        .await?
        .iter()
        .map(|stored| IncidentRow::from_record(&stored.record))
        .collect();
    let inspections = iwp_db::list_inspections(pool).await?;

    let merged = merge(&incidents, &inspections);
    let file = std::fs::File::create(out)?;
    write_merged_csv(file, &merged)?;

    println!(
        "wrote {} merged rows from {} incidents and {} inspections to {}",
        merged.len(),
        incidents.len(),
        inspections.len(),
        out.display()
    );
    Ok(())
}

/// Writes `rows` with a header line, one record per row.
pub(crate) fn write_merged_csv<W: Write>(writer: W, rows: &[MergedRow]) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
