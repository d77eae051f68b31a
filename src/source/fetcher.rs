use crate::model::SourceError;
use crate::source::traits::TableSource;

use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("price-radar/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl TableSource for HttpSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        info!("🌐 Downloading {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
