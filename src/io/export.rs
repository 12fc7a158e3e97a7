//! CSV export of per-conductor network membership.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::report::MembershipRow;

/// Column header for the membership CSV.
const HEADER: &str = "entity,kind,tier,x,y,network,network_dirty";

/// Exports membership rows to a CSV file at the given path.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[MembershipRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes membership rows as CSV to any writer.
///
/// Unattached conductors get an empty `network` column.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[MembershipRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in rows {
        wtr.write_record([
            r.entity.clone(),
            r.kind.to_string(),
            r.tier.to_string(),
            r.x.to_string(),
            r.y.to_string(),
            r.network.clone().unwrap_or_default(),
            r.network_dirty.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::{ConductorKind, Tier};

    fn make_row(x: i32, network: Option<&str>) -> MembershipRow {
        MembershipRow {
            entity: format!("{}v1", x + 1),
            kind: ConductorKind::Wire,
            tier: Tier::Medium,
            x,
            y: 0,
            network: network.map(str::to_string),
            network_dirty: false,
        }
    }

    #[test]
    fn header_matches_schema() {
        let mut buf = Vec::new();
        write_csv(&[make_row(0, Some("1v1"))], &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert_eq!(first_line, "entity,kind,tier,x,y,network,network_dirty");
    }

    #[test]
    fn row_count_matches_conductor_count() {
        let rows: Vec<MembershipRow> = (0..7).map(|x| make_row(x, Some("1v1"))).collect();
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        assert_eq!(output.as_deref().unwrap_or("").lines().count(), 8);
    }

    #[test]
    fn unattached_rows_parse_back() {
        let rows = vec![make_row(0, None), make_row(1, Some("2v1"))];
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let records: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(5), Some(""));
        assert_eq!(records[1].get(5), Some("2v1"));
        assert_eq!(records[1].get(2), Some("medium"));
        assert_eq!(records[1].get(6).and_then(|v| v.parse::<bool>().ok()), Some(false));
    }
}
