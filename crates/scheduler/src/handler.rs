use async_trait::async_trait;

use crate::record::TaskRecord;

/// Receives drained records.
///
/// An `Err` marks that one record as failed; the drain carries on with the
/// next record either way.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, record: TaskRecord) -> anyhow::Result<()>;
}
