use crate::data::{DataSource, Dataset};
use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, WriterBuilder};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Cells a spreadsheet would evaluate as a formula get a leading `'`. Numbers pass through.
fn sanitize_cell(cell: &str) -> String {
    let starts_formula = cell.starts_with(['=', '+', '-', '@']);
    if starts_formula && cell.parse::<f64>().is_err() {
        format!("'{cell}")
    } else {
        cell.to_string()
    }
}

/// Save records as CSV with a header row taken from their field names.
///
/// An empty slice writes an empty file.
pub fn save_csv<T: Serialize, P: AsRef<Path>>(rows: &[&T], path: P) -> Result<()> {
    let mut staging = WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        staging.serialize(row)?;
    }
    let bytes = staging.into_inner().map_err(|e| anyhow!("{}", e.error()))?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes.as_slice());
    let mut wtr = WriterBuilder::new().from_path(path.as_ref())?;
    for record in rdr.records() {
        let record = record?;
        wtr.write_record(record.iter().map(sanitize_cell))?;
    }
    wtr.flush()?;
    info!("wrote {} rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}

/// Save records as a pretty JSON array.
pub fn save_json<T: Serialize, P: AsRef<Path>>(rows: &[&T], path: P) -> Result<()> {
    let mut f = File::create(path.as_ref())?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    info!("wrote {} rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}

/// Write a whole [`Dataset`] bundle as pretty JSON (readable by [`load_json`]).
pub fn save_dataset_json<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let mut f = File::create(path.as_ref())?;
    let s = serde_json::to_string_pretty(dataset)?;
    f.write_all(s.as_bytes())?;
    info!("wrote dataset bundle to {}", path.as_ref().display());
    Ok(())
}

/// Read a [`Dataset`] bundle from JSON.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let dataset: Dataset = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing dataset bundle {}", path.display()))?;
    dataset
        .validate()
        .with_context(|| format!("checking dataset bundle {}", path.display()))?;
    Ok(dataset)
}

/// A dataset bundle on disk.
#[derive(Debug, Clone)]
pub struct JsonFile(pub PathBuf);

impl DataSource for JsonFile {
    fn dataset(&self) -> Result<Dataset> {
        load_json(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteMetric;
    use tempfile::tempdir;

    #[test]
    fn formula_cells_are_prefixed() {
        assert_eq!(sanitize_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(sanitize_cell("@foo"), "'@foo");
        assert_eq!(sanitize_cell("-12.5"), "-12.5");
        assert_eq!(sanitize_cell("Kathmandu"), "Kathmandu");
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let site = SiteMetric::new("=Bhaktapur", 178.4, 338.1, 37.0);
        save_csv(&[&site], &csvp).unwrap();
        save_json(&[&site], &jsonp).unwrap();
        let text = std::fs::read_to_string(&csvp).unwrap();
        assert!(text.starts_with("name,fineParticles,coarseParticles,humidity"));
        assert!(text.contains("'=Bhaktapur"));
        assert!(jsonp.exists());
    }
}
