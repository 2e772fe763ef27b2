use async_trait::async_trait;
use chipp_http::{HttpClient, NoInterceptor};
use log::trace;

use crate::{Error, Result};

#[async_trait]
pub trait Source: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpSource {
    client: HttpClient<NoInterceptor>,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = HttpClient::new(base_url)
            .map_err(|err| Error::InvalidUrl(format!("{base_url}: {err}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Source for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let request = self.client.new_request_with_url(url.to_string())?;

        let body = self
            .client
            .perform_request(request, |req, res| {
                if res.status_code == 200 {
                    Ok(res.body)
                } else {
                    Err((req, res).into())
                }
            })
            .await?;

        trace!("fetched {} bytes from {url}", body.len());

        Ok(body)
    }
}
