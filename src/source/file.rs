use crate::model::SourceError;
use crate::source::traits::TableSource;
use std::path::PathBuf;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl TableSource for FileSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "SKU,price\nA,1\n").unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap(), "SKU,price\nA,1\n");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = FileSource::new("/definitely/not/here.csv");
        assert!(matches!(source.fetch().await, Err(SourceError::Io(_))));
    }
}
