// Table sources: local files and HTTP downloads.

pub mod traits;
pub mod fetcher;
pub mod file;

pub use traits::TableSource;
pub use fetcher::HttpSource;
pub use file::FileSource;

use crate::model::SourceError;

/// HTTP(S) locations are downloaded, anything else is read from disk.
pub fn source_for(location: &str) -> Result<Box<dyn TableSource>, SourceError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
