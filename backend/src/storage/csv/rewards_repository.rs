use anyhow::Result;
use csv::{Reader, Writer};
use std::fs::File;
use std::io::BufReader;

use super::connection::{write_atomic, CsvConnection};
use crate::domain::models::rewards::RewardPoints;
use crate::storage::traits::RewardsStorage;

/// CSV-backed reward balances: one row per child.
#[derive(Clone)]
pub struct RewardsRepository {
    connection: CsvConnection,
}

impl RewardsRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl RewardsStorage for RewardsRepository {
    fn load_points(&self) -> Result<Vec<RewardPoints>> {
        let path = self.connection.rewards_file();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut points = Vec::new();

        for result in csv_reader.records() {
            let record = result?;
            points.push(RewardPoints {
                child_id: record.get(0).unwrap_or("").to_string(),
                child_name: record.get(1).unwrap_or("").to_string(),
                total_points: record.get(2).unwrap_or("0").parse().unwrap_or(0),
                daily_points: record.get(3).unwrap_or("0").parse().unwrap_or(0),
                tasks_completed: record.get(4).unwrap_or("0").parse().unwrap_or(0),
            });
        }

        Ok(points)
    }

    fn save_points(&self, points: &[RewardPoints]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record([
            "child_id",
            "child_name",
            "total_points",
            "daily_points",
            "tasks_completed",
        ])?;

        for entry in points {
            let total = entry.total_points.to_string();
            let daily = entry.daily_points.to_string();
            let completed = entry.tasks_completed.to_string();
            csv_writer.write_record([
                entry.child_id.as_str(),
                entry.child_name.as_str(),
                total.as_str(),
                daily.as_str(),
                completed.as_str(),
            ])?;
        }

        let contents = csv_writer.into_inner()?;
        write_atomic(&self.connection.rewards_file(), &contents)?;
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
        let repo = RewardsRepository::new(CsvConnection::new(dir.path()).unwrap());

        let points = vec![
            RewardPoints {
                child_id: "kid1".to_string(),
                child_name: "Alice".to_string(),
                total_points: 120,
                daily_points: 30,
                tasks_completed: 3,
            },
            RewardPoints::new("kid2", "Bob"),
        ];

        repo.save_points(&points).unwrap();
        let loaded = repo.load_points().unwrap();

        assert_eq!(loaded, points);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let repo = RewardsRepository::new(CsvConnection::new(dir.path()).unwrap());
        assert!(repo.load_points().unwrap().is_empty());
    }
}
