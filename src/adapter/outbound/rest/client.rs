//! HTTP client for the remote record store.
//!
//! Each collection maps to a table exposing `id` and `body` columns plus a
//! server-side `seq` used for ordering:
//!
//! - load: `GET /{table}?select=id,body&order=seq.asc`
//! - put: `POST /{table}` with `Prefer: resolution=merge-duplicates`
//! - remove: `DELETE /{table}?id=eq.{id}` with `Prefer: return=representation`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::settings::RemoteConfig;
use crate::domain::Collection;
use crate::error::PersistenceError;
use crate::port::{PersistenceAdapter, Record};

/// Remote record store client.
pub struct RestAdapter {
    http: HttpClient,
    base_url: Url,
    api_key: Option<String>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl RestAdapter {
    /// Build a client from settings.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Connection`] if the base URL is not a
    /// usable http(s) URL or the HTTP client cannot be built.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, PersistenceError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| PersistenceError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    fn collection_url(&self, collection: Collection) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects URLs that cannot carry a path.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(collection.as_str());
        }
        url
    }

    fn load_url(&self, collection: Collection) -> Url {
        let mut url = self.collection_url(collection);
        url.query_pairs_mut()
            .append_pair("select", "id,body")
            .append_pair("order", "seq.asc");
        url
    }

    fn remove_url(&self, collection: Collection, id: &str) -> Url {
        let mut url = self.collection_url(collection);
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    /// Send a request, retrying transport failures and server errors.
    async fn send<F>(&self, build: F) -> Result<Response, PersistenceError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let max_attempts = self.retry_max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = match self.authorize(build()).send().await {
                Ok(response) => check_status(response).await,
                Err(err) => Err(PersistenceError::from(err)),
            };

            match result {
                Err(err) if err.is_unavailable() && attempt < max_attempts => {
                    warn!(
                        attempt,
                        max_attempts,
                        error = %err,
                        "Remote request failed, retrying"
                    );
                    if self.retry_backoff_ms > 0 {
                        sleep(Duration::from_millis(self.retry_backoff_ms)).await;
                    }
                }
                other => return other,
            }
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, PersistenceError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| PersistenceError::Connection(format!("invalid base url '{raw}': {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(PersistenceError::Connection(format!(
            "base url must be http(s): '{raw}'"
        )));
    }
    Ok(url)
}

async fn check_status(response: Response) -> Result<Response, PersistenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        Err(PersistenceError::Unavailable(format!("{status}: {body}")))
    } else {
        Err(PersistenceError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PersistenceAdapter for RestAdapter {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn load(&self, collection: Collection) -> Result<Vec<Record>, PersistenceError> {
        let url = self.load_url(collection);
        let response = self.send(|| self.http.get(url.clone())).await?;
        let records: Vec<Record> = response.json().await.map_err(PersistenceError::from)?;
        debug!(%collection, count = records.len(), "Loaded remote records");
        Ok(records)
    }

    async fn put(&self, collection: Collection, record: &Record) -> Result<(), PersistenceError> {
        let url = self.collection_url(collection);
        let payload = [record];
        self.send(|| {
            self.http
                .post(url.clone())
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&payload)
        })
        .await?;
        debug!(%collection, id = %record.id, "Stored remote record");
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<bool, PersistenceError> {
        let url = self.remove_url(collection, id);
        let response = self
            .send(|| {
                self.http
                    .delete(url.clone())
                    .header("Prefer", "return=representation")
            })
            .await?;
        let deleted: Vec<Record> = response.json().await.map_err(PersistenceError::from)?;
        debug!(%collection, id, deleted = deleted.len(), "Removed remote record");
        Ok(!deleted.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn config(base_url: &str) -> RemoteConfig {
        RemoteConfig {
            base_url: base_url.into(),
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
            ..RemoteConfig::default()
        }
    }

    /// Serve one canned HTTP response and hand back the request head.
    async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                if n == 0 {
                    break buf.len();
                }
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(head);
        });

        (format!("http://{addr}/rest/v1"), rx)
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(RestAdapter::from_config(&config("")).is_err());
        assert!(RestAdapter::from_config(&config("mailto:ops@example.com")).is_err());
        assert!(RestAdapter::from_config(&config("ftp://example.com")).is_err());
    }

    #[test]
    fn builds_collection_urls() {
        let adapter = RestAdapter::from_config(&config("https://db.example.com/rest/v1/")).unwrap();
        assert_eq!(
            adapter.load_url(Collection::Suppliers).as_str(),
            "https://db.example.com/rest/v1/suppliers?select=id%2Cbody&order=seq.asc"
        );
        assert_eq!(
            adapter.remove_url(Collection::Accounts, "a-1").as_str(),
            "https://db.example.com/rest/v1/accounts?id=eq.a-1"
        );
    }

    #[tokio::test]
    async fn load_parses_rows_and_sends_api_key() {
        let (base, head) = serve_once("200 OK", r#"[{"id":"s1","body":{"id":"s1","name":"ACME"}}]"#).await;
        let mut settings = config(&base);
        settings.api_key = Some("secret".into());
        let adapter = RestAdapter::from_config(&settings).unwrap();

        let records = adapter.load(Collection::Suppliers).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body["name"], "ACME");

        let head = head.await.unwrap().to_lowercase();
        assert!(head.starts_with("get /rest/v1/suppliers?"));
        assert!(head.contains("apikey: secret"));
        assert!(head.contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn put_posts_upsert() {
        let (base, head) = serve_once("201 Created", "").await;
        let adapter = RestAdapter::from_config(&config(&base)).unwrap();
        let record = Record {
            id: "s1".into(),
            body: serde_json::json!({"id": "s1"}),
        };

        adapter.put(Collection::Suppliers, &record).await.unwrap();

        let head = head.await.unwrap().to_lowercase();
        assert!(head.starts_with("post /rest/v1/suppliers "));
        assert!(head.contains("resolution=merge-duplicates"));
    }

    #[tokio::test]
    async fn remove_reports_whether_rows_were_deleted() {
        let (base, _head) = serve_once("200 OK", "[]").await;
        let adapter = RestAdapter::from_config(&config(&base)).unwrap();
        assert!(!adapter.remove(Collection::Suppliers, "gone").await.unwrap());
    }

    #[tokio::test]
    async fn server_errors_are_unavailable() {
        let (base, _head) = serve_once("503 Service Unavailable", "{}").await;
        let adapter = RestAdapter::from_config(&config(&base)).unwrap();
        let err = adapter.load(Collection::Suppliers).await.unwrap_err();
        assert!(err.is_unavailable(), "{err:?}");
    }

    #[tokio::test]
    async fn client_errors_are_rejections() {
        let (base, _head) = serve_once("409 Conflict", r#"{"message":"duplicate"}"#).await;
        let adapter = RestAdapter::from_config(&config(&base)).unwrap();
        let err = adapter.load(Collection::Suppliers).await.unwrap_err();
        assert!(
            matches!(err, PersistenceError::Rejected { status: 409, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let adapter = RestAdapter::from_config(&config(&format!("http://{addr}/rest/v1"))).unwrap();
        let err = adapter.load(Collection::Customers).await.unwrap_err();
        assert!(err.is_unavailable(), "{err:?}");
    }
}
