use std::{sync::Arc, time::Duration};

use reqwest_cookie_store::CookieStoreMutex;

// Some stream pages refuse to render a player for unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpClient {
    pub client: reqwest::Client,
    pub cookies: Arc<CookieStoreMutex>,
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl HttpClient {
    pub fn new() -> reqwest::Result<HttpClient> {
        let cookies = Arc::new(CookieStoreMutex::default());

        let client = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(HttpClient { client, cookies })
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
            .map_err(|e| e.into())
    }
}
