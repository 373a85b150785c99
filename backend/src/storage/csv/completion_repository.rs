use anyhow::Result;
use csv::{Reader, Writer};
use log::warn;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use super::connection::{write_atomic, CsvConnection};
use crate::domain::dates;
use crate::domain::models::task::CompletionRecord;
use crate::storage::traits::CompletionStorage;

/// CSV-backed completion overlay: one row per completed instance.
#[derive(Clone)]
pub struct CompletionRepository {
    connection: CsvConnection,
}

impl CompletionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl CompletionStorage for CompletionRepository {
    fn load_completions(&self) -> Result<HashMap<String, CompletionRecord>> {
        let path = self.connection.completions_file();
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut completions = HashMap::new();

        for result in csv_reader.records() {
            let record = result?;
            let instance_id = record.get(0).unwrap_or("").to_string();
            let child_id = match record.get(1).unwrap_or("") {
                "" => None,
                id => Some(id.to_string()),
            };
            let done_at = match record.get(2).and_then(dates::parse_iso) {
                Some(done_at) => done_at,
                None => {
                    warn!("Skipping completion row with bad timestamp: {:?}", record);
                    continue;
                }
            };
            completions.insert(instance_id, CompletionRecord { child_id, done_at });
        }

        Ok(completions)
    }

    fn save_completions(&self, completions: &HashMap<String, CompletionRecord>) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(["instance_id", "child_id", "done_at"])?;

        // Sorted for a stable file; the map itself is unordered
        let mut rows: Vec<_> = completions.iter().collect();
        rows.sort_by_key(|(id, _)| id.as_str());
        for (instance_id, record) in rows {
            let done_at = dates::format_iso(record.done_at);
            csv_writer.write_record([
                instance_id.as_str(),
                record.child_id.as_deref().unwrap_or(""),
                done_at.as_str(),
            ])?;
        }

        let contents = csv_writer.into_inner()?;
        write_atomic(&self.connection.completions_file(), &contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let repo = CompletionRepository::new(CsvConnection::new(dir.path()).unwrap());

        let mut completions = HashMap::new();
        completions.insert(
            "template::1@2025-09-15".to_string(),
            CompletionRecord {
                child_id: Some("kid1".to_string()),
                done_at: dates::parse_iso("2025-09-15T08:35").unwrap(),
            },
        );
        completions.insert(
            "template::2".to_string(),
            CompletionRecord {
                child_id: None,
                done_at: dates::parse_iso("2025-09-15T09:00").unwrap(),
            },
        );

        repo.save_completions(&completions).unwrap();
        let loaded = repo.load_completions().unwrap();

        assert_eq!(loaded, completions);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let repo = CompletionRepository::new(CsvConnection::new(dir.path()).unwrap());
        assert!(repo.load_completions().unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let repo = CompletionRepository::new(CsvConnection::new(dir.path()).unwrap());

        let mut completions = HashMap::new();
        completions.insert(
            "template::1@2025-09-15".to_string(),
            CompletionRecord {
                child_id: Some("kid1".to_string()),
                done_at: dates::parse_iso("2025-09-15T08:35").unwrap(),
            },
        );
        repo.save_completions(&completions).unwrap();

        // Un-completing removes the row entirely
        completions.clear();
        repo.save_completions(&completions).unwrap();
        assert!(repo.load_completions().unwrap().is_empty());
    }
}
