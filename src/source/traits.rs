use crate::model::SourceError;

/// Where a report's raw table text comes from.
#[async_trait::async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch(&self) -> Result<String, SourceError>;
    fn describe(&self) -> String;
}
