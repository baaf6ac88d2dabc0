//! Calls from the review domain into the book service.
//!
//! Reviews point at books by id only. Nothing keeps that id valid, so every
//! lookup is a fresh synchronous request and an unknown id is a normal result.

use crate::models::BookRef;
use reqwest::{header::ACCEPT, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("book service unreachable: {0}")]
    Unavailable(String),

    #[error("book service timed out after {0:?}")]
    Timeout(Duration),

    #[error("book service returned status {0}")]
    UpstreamStatus(u16),
}

#[derive(Clone)]
pub struct BookServiceClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl BookServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ProxyError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Calling book service");

        self.http
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProxyError::Timeout(self.timeout)
                } else {
                    ProxyError::Unavailable(e.to_string())
                }
            })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<String, ProxyError> {
        response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProxyError::Timeout(self.timeout)
            } else {
                ProxyError::Unavailable(e.to_string())
            }
        })
    }

    /// Raw body of `GET /books`, unmodified
    pub async fn fetch_books_json(&self) -> Result<String, ProxyError> {
        let response = self.get("/books").await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Book listing failed");
            return Err(ProxyError::UpstreamStatus(status.as_u16()));
        }

        self.read_body(response).await
    }

    /// Raw body of the referenced book, `None` when the book service does not
    /// know the id
    pub async fn resolve_book(&self, book: BookRef) -> Result<Option<String>, ProxyError> {
        let response = self.get(&format!("/books/{}", book.id())).await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(book_id = book.id(), "Referenced book does not exist");
                Ok(None)
            }
            status if status.is_success() => self.read_body(response).await.map(Some),
            status => {
                warn!(book_id = book.id(), status = status.as_u16(), "Book lookup failed");
                Err(ProxyError::UpstreamStatus(status.as_u16()))
            }
        }
    }
}
