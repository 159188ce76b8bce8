// file: src/exporter/json.rs
// description: json export of enriched contact records plus a run manifest

use crate::error::{EnrichError, Result};
use crate::models::ContactRecord;
use crate::pipeline::PipelineStats;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONTACTS_FILE: &str = "contacts.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_records: usize,
    pub websites_found: usize,
    pub phones_found: usize,
    pub rows_skipped: usize,
    pub empty_searches: usize,
    pub revalidated: usize,
    pub fallbacks: usize,
    pub duration_secs: u64,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| EnrichError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn export(
        &self,
        records: &[ContactRecord],
        stats: &PipelineStats,
        pretty: bool,
    ) -> Result<ExportManifest> {
        info!(
            "Exporting {} records to {}",
            records.len(),
            self.output_dir.display()
        );

        self.write_json(CONTACTS_FILE, &records, pretty)?;

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_records: records.len(),
            websites_found: stats.websites_found,
            phones_found: stats.phones_found,
            rows_skipped: stats.rows_skipped,
            empty_searches: stats.empty_searches,
            revalidated: stats.revalidated,
            fallbacks: stats.fallbacks,
            duration_secs: stats.duration_secs,
            files: vec![CONTACTS_FILE.to_string()],
        };
        self.write_json(MANIFEST_FILE, &manifest, true)?;

        info!("Export complete: {} records exported", manifest.total_records);
        Ok(manifest)
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T, pretty: bool) -> Result<()> {
        let path = self.output_dir.join(name);
        let json = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        fs::write(&path, json).map_err(|source| EnrichError::FileOperation { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationStatus;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_records_and_manifest() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path().join("out")).unwrap();

        let mut record = ContactRecord::not_found("ABC Pte Ltd")
            .with_status(ValidationStatus::PostalMatch);
        record.website_link = "https://abc.sg".to_string();
        let records = vec![record.clone(), ContactRecord::not_found("Ghost Co")];

        let stats = PipelineStats {
            rows_processed: 2,
            websites_found: 1,
            empty_searches: 1,
            ..PipelineStats::default()
        };

        let manifest = exporter.export(&records, &stats, true).unwrap();
        assert_eq!(manifest.total_records, 2);
        assert_eq!(manifest.websites_found, 1);
        assert_eq!(manifest.files, vec![CONTACTS_FILE.to_string()]);

        let contacts = fs::read_to_string(exporter.output_dir().join(CONTACTS_FILE)).unwrap();
        let back: Vec<ContactRecord> = serde_json::from_str(&contacts).unwrap();
        assert_eq!(back, records);
        assert!(contacts.contains("\"validation_status\": \"Postal match\""));

        let manifest_json = fs::read_to_string(exporter.output_dir().join(MANIFEST_FILE)).unwrap();
        let manifest_back: ExportManifest = serde_json::from_str(&manifest_json).unwrap();
        assert_eq!(manifest_back.empty_searches, 1);
        assert!(chrono::DateTime::parse_from_rfc3339(&manifest_back.exported_at).is_ok());
    }
}
