use async_trait::async_trait;
use reqwest::{Method, Request, Response};

/// Transport used to download remote datasets.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;

    /// Plain `GET` of `url`.
    async fn get(&self, url: reqwest::Url) -> reqwest::Result<Response> {
        self.execute(Request::new(Method::GET, url)).await
    }
}
