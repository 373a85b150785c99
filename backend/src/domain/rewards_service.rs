//! Reward accounting: fixed points per completed task, with simple
//! star tiering on top.
//!
//! Balances live in memory and are written through to storage on every
//! change; a failed write is logged and the session continues on the
//! in-memory copy.

use std::sync::{Arc, Mutex};

use log::{error, info, warn};

use crate::domain::models::rewards::RewardPoints;
use crate::storage::csv::{CsvConnection, RewardsRepository};
use crate::storage::traits::RewardsStorage;

/// Points awarded for each completed task.
pub const POINTS_PER_TASK: u32 = 10;

/// Points per star tier.
const POINTS_PER_STAR: u32 = 50;

/// Service managing per-child reward balances.
#[derive(Clone)]
pub struct RewardsService {
    rewards_repository: RewardsRepository,
    balances: Arc<Mutex<Vec<RewardPoints>>>,
}

impl RewardsService {
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        let rewards_repository = RewardsRepository::new((*csv_conn).clone());
        let balances = match rewards_repository.load_points() {
            Ok(points) => points,
            Err(e) => {
                warn!("⭐ Could not load reward balances, starting empty: {}", e);
                Vec::new()
            }
        };
        Self {
            rewards_repository,
            balances: Arc::new(Mutex::new(balances)),
        }
    }

    /// Award the fixed per-task amount to a child, creating the balance on
    /// first completion. Returns the updated balance.
    pub fn add_points_for_task(&self, child_id: &str, child_name: &str) -> RewardPoints {
        let updated = {
            let mut balances = self.balances.lock().unwrap();
            let entry = match balances.iter_mut().find(|p| p.child_id == child_id) {
                Some(entry) => entry,
                None => {
                    balances.push(RewardPoints::new(child_id, child_name));
                    balances.last_mut().unwrap()
                }
            };
            entry.total_points += POINTS_PER_TASK;
            entry.daily_points += POINTS_PER_TASK;
            entry.tasks_completed += 1;
            entry.clone()
        };

        info!(
            "⭐ Awarded {} points to {} (total now {})",
            POINTS_PER_TASK, child_id, updated.total_points
        );
        self.persist();
        updated
    }

    /// Reverse one task's worth of points. The total is only decremented
    /// when it holds at least the per-task amount; daily points and the
    /// task count floor at zero.
    pub fn remove_points_for_task(&self, child_id: &str) -> Option<RewardPoints> {
        let updated = {
            let mut balances = self.balances.lock().unwrap();
            let entry = balances.iter_mut().find(|p| p.child_id == child_id)?;
            if entry.total_points >= POINTS_PER_TASK {
                entry.total_points -= POINTS_PER_TASK;
                entry.daily_points = entry.daily_points.saturating_sub(POINTS_PER_TASK);
                entry.tasks_completed = entry.tasks_completed.saturating_sub(1);
            }
            entry.clone()
        };

        self.persist();
        Some(updated)
    }

    /// Current balance for a child, if one exists.
    pub fn points_for_child(&self, child_id: &str) -> Option<RewardPoints> {
        self.balances
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.child_id == child_id)
            .cloned()
    }

    /// All balances, in insertion order.
    pub fn all_points(&self) -> Vec<RewardPoints> {
        self.balances.lock().unwrap().clone()
    }

    /// Zero every child's daily points and task count. Invoked by the
    /// caller at day rollover; totals are untouched.
    pub fn reset_daily_points(&self) {
        {
            let mut balances = self.balances.lock().unwrap();
            for entry in balances.iter_mut() {
                entry.daily_points = 0;
                entry.tasks_completed = 0;
            }
        }
        info!("⭐ Daily points reset");
        self.persist();
    }

    /// Stars earned: one per full 50 points.
    pub fn stars_for_points(points: u32) -> u32 {
        points / POINTS_PER_STAR
    }

    /// Points still needed to reach the next star tier.
    pub fn points_to_next_star(points: u32) -> u32 {
        (points / POINTS_PER_STAR + 1) * POINTS_PER_STAR - points
    }

    fn persist(&self) {
        let balances = self.balances.lock().unwrap().clone();
        if let Err(e) = self.rewards_repository.save_points(&balances) {
            error!("⭐ Failed to persist reward balances: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service() -> (RewardsService, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let conn = CsvConnection::new(dir.path()).unwrap();
        (RewardsService::new(Arc::new(conn)), dir)
    }

    #[test]
    fn test_add_points_creates_balance() {
        let (service, _dir) = service();

        let points = service.add_points_for_task("kid1", "Alice");
        assert_eq!(points.total_points, 10);
        assert_eq!(points.daily_points, 10);
        assert_eq!(points.tasks_completed, 1);
        assert_eq!(points.child_name, "Alice");
    }

    #[test]
    fn test_add_then_remove_round_trips_exactly() {
        let (service, _dir) = service();

        service.add_points_for_task("kid1", "Alice");
        service.add_points_for_task("kid1", "Alice");
        let before = service.points_for_child("kid1").unwrap();

        service.add_points_for_task("kid1", "Alice");
        let after = service.remove_points_for_task("kid1").unwrap();

        assert_eq!(after, before);
    }

    #[test]
    fn test_remove_never_goes_negative() {
        let (service, _dir) = service();

        service.add_points_for_task("kid1", "Alice");
        let drained = service.remove_points_for_task("kid1").unwrap();
        assert_eq!(drained.total_points, 0);

        // A second removal has nothing left to take
        let still_zero = service.remove_points_for_task("kid1").unwrap();
        assert_eq!(still_zero.total_points, 0);
        assert_eq!(still_zero.tasks_completed, 0);

        // Unknown child yields no balance at all
        assert!(service.remove_points_for_task("kid9").is_none());
    }

    #[test]
    fn test_reset_daily_points_keeps_totals() {
        let (service, _dir) = service();

        service.add_points_for_task("kid1", "Alice");
        service.add_points_for_task("kid2", "Bob");
        service.reset_daily_points();

        let alice = service.points_for_child("kid1").unwrap();
        assert_eq!(alice.total_points, 10);
        assert_eq!(alice.daily_points, 0);
        assert_eq!(alice.tasks_completed, 0);
    }

    #[test]
    fn test_balances_survive_reload() {
        let dir = tempdir().unwrap();
        let conn = Arc::new(CsvConnection::new(dir.path()).unwrap());

        let service = RewardsService::new(conn.clone());
        service.add_points_for_task("kid1", "Alice");
        drop(service);

        let reloaded = RewardsService::new(conn);
        let alice = reloaded.points_for_child("kid1").unwrap();
        assert_eq!(alice.total_points, 10);
    }

    #[test]
    fn test_star_tiering() {
        assert_eq!(RewardsService::stars_for_points(0), 0);
        assert_eq!(RewardsService::stars_for_points(49), 0);
        assert_eq!(RewardsService::stars_for_points(50), 1);
        assert_eq!(RewardsService::stars_for_points(149), 2);
        assert_eq!(RewardsService::stars_for_points(150), 3);
    }

    #[test]
    fn test_points_to_next_star() {
        assert_eq!(RewardsService::points_to_next_star(0), 50);
        assert_eq!(RewardsService::points_to_next_star(120), 30);
        assert_eq!(RewardsService::points_to_next_star(50), 50);
        assert_eq!(RewardsService::points_to_next_star(49), 1);
    }
}
