//! Trip persistence boundary.
//!
//! Persistence itself is an external collaborator; the planner only hands
//! an assembled record across this trait when the caller supplied an
//! identity. The in-memory implementation backs tests and demo mode.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::TripRecord;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn save(&self, record: TripRecord) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryTripStore {
    records: RwLock<Vec<TripRecord>>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records_for(&self, user_id: &str) -> Vec<TripRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn save(&self, record: TripRecord) -> Result<()> {
        self.records.write().push(record);
        Ok(())
    }
}
