//! Dropbox API v1 connector
//!
//! Every operation follows the same template: sign, add endpoint-fixed
//! fields, build the URL or form body, execute, map the response.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, HttpStream};
use bridge_traits::time::Clock;
use bytes::Bytes;
use core_auth::{Params, Signer};
use core_runtime::logging::redact_pairs;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::DropboxConfig;
use crate::error::Result;
use crate::types::{CopySource, Download, Reply, StreamDownload};
use crate::url::EndpointUrl;

/// Response header carrying file metadata on download responses
pub const METADATA_HEADER: &str = "x-dropbox-metadata";

/// Dropbox API client bound to one credential set.
///
/// Operations never fail on HTTP status: any answer is returned as a
/// [`Reply`] or [`Download`] with its status. `Err` means the request did not
/// produce a response at all.
///
/// # Example
///
/// ```ignore
/// use provider_dropbox::{DropboxClient, DropboxConfig};
///
/// let client = DropboxClient::new(config, http_client)?;
/// let reply = client.metadata("/Photos", None).await?;
/// println!("{} {}", reply.status, reply.body);
/// ```
pub struct DropboxClient {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    signer: Signer,

    config: DropboxConfig,
}

impl DropboxClient {
    /// Create a client from a validated configuration.
    pub fn new(config: DropboxConfig, http_client: Arc<dyn HttpClient>) -> Result<Self> {
        config.validate()?;
        let signer = Signer::new(config.credentials());
        Ok(Self {
            http_client,
            signer,
            config,
        })
    }

    /// Like [`new`](Self::new) with an injected time source for signing.
    pub fn with_clock(
        config: DropboxConfig,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let signer = Signer::with_clock(config.credentials(), clock);
        Ok(Self {
            http_client,
            signer,
            config,
        })
    }

    pub fn config(&self) -> &DropboxConfig {
        &self.config
    }

    /// Account information for the authorized user.
    #[instrument(skip(self))]
    pub async fn account(&self) -> Result<Reply> {
        let params = self.signer.sign(None);
        self.post_form(&self.config.api_host, "account/info", None, params)
            .await
    }

    /// Changes since the cursor in `args` (or from the beginning).
    #[instrument(skip(self, args))]
    pub async fn delta(&self, args: Option<&Params>) -> Result<Reply> {
        let params = self.signer.sign(args);
        self.post_form(&self.config.api_host, "delta", None, params)
            .await
    }

    /// Download a file.
    #[instrument(skip(self, args))]
    pub async fn get(&self, path: &str, args: Option<&Params>) -> Result<Download> {
        self.download(&self.config.content_host, "files", path, args)
            .await
    }

    /// Download a file without buffering it.
    ///
    /// Same request as [`get`](Self::get); the body is handed back as a
    /// reader once the status and headers have arrived.
    #[instrument(skip(self, args))]
    pub async fn stream(&self, path: &str, args: Option<&Params>) -> Result<StreamDownload> {
        let url = self.signed_url(&self.config.content_host, "files", path, args);
        let stream = self.open_stream(HttpRequest::new(HttpMethod::Get, url)).await?;

        Ok(StreamDownload {
            status: stream.status,
            metadata: header_metadata(stream.header(METADATA_HEADER)),
            reader: stream.body,
        })
    }

    /// Upload a file.
    ///
    /// `Content-Length` always reflects `body`; an empty body is not sent at
    /// all.
    #[instrument(skip(self, body, args), fields(bytes = body.len()))]
    pub async fn put(&self, path: &str, body: Bytes, args: Option<&Params>) -> Result<Reply> {
        let query = self.signer.sign(args).to_form();
        let url = EndpointUrl::new(&self.config.content_host, "files_put")
            .path(&self.config.root, path)
            .query(&query)
            .build();

        let mut request = HttpRequest::new(HttpMethod::Put, url)
            .header("Content-Length", body.len().to_string());

        if !body.is_empty() {
            request = request.body(body);
        }

        let response = self.send(request).await?;
        Ok(Self::json_reply(response))
    }

    /// File or folder metadata.
    ///
    /// A `304 Not Modified` (the folder still matches the `hash` in `args`)
    /// yields an empty object.
    #[instrument(skip(self, args))]
    pub async fn metadata(&self, path: &str, args: Option<&Params>) -> Result<Reply> {
        let response = self
            .get_request(&self.config.api_host, "metadata", path, args)
            .await?;

        if response.status == 304 {
            debug!("Metadata not modified");
            return Ok(Reply::new(304, Value::Object(Map::new())));
        }

        Ok(Self::json_reply(response))
    }

    /// Previous revisions of a file.
    #[instrument(skip(self, args))]
    pub async fn revisions(&self, path: &str, args: Option<&Params>) -> Result<Reply> {
        self.get_json(&self.config.api_host, "revisions", path, args)
            .await
    }

    /// Restore a file to revision `rev`.
    #[instrument(skip(self, args))]
    pub async fn restore(&self, path: &str, rev: &str, args: Option<&Params>) -> Result<Reply> {
        let mut params = self.signer.sign(args);
        params.insert("rev", rev);
        self.post_form(&self.config.api_host, "restore", Some(path), params)
            .await
    }

    /// Search below `path` for names containing `query`.
    #[instrument(skip(self, args))]
    pub async fn search(&self, path: &str, query: &str, args: Option<&Params>) -> Result<Reply> {
        let mut params = self.signer.sign(args);
        params.insert("query", query);
        self.post_form(&self.config.api_host, "search", Some(path), params)
            .await
    }

    /// Shareable link to a file or folder.
    #[instrument(skip(self, args))]
    pub async fn shares(&self, path: &str, args: Option<&Params>) -> Result<Reply> {
        let params = self.signer.sign(args);
        self.post_form(&self.config.api_host, "shares", Some(path), params)
            .await
    }

    /// Direct streaming link to a file.
    #[instrument(skip(self, args))]
    pub async fn media(&self, path: &str, args: Option<&Params>) -> Result<Reply> {
        let params = self.signer.sign(args);
        self.post_form(&self.config.api_host, "media", Some(path), params)
            .await
    }

    /// Copy reference usable as a [`CopySource::CopyRef`].
    #[instrument(skip(self, args))]
    pub async fn cpref(&self, path: &str, args: Option<&Params>) -> Result<Reply> {
        self.get_json(&self.config.api_host, "copy_ref", path, args)
            .await
    }

    /// Thumbnail image for a file.
    #[instrument(skip(self, args))]
    pub async fn thumbnails(&self, path: &str, args: Option<&Params>) -> Result<Download> {
        self.download(&self.config.content_host, "thumbnails", path, args)
            .await
    }

    /// Copy a file or folder.
    #[instrument(skip(self, args))]
    pub async fn cp(
        &self,
        from: impl Into<CopySource> + std::fmt::Debug,
        to_path: &str,
        args: Option<&Params>,
    ) -> Result<Reply> {
        let mut params = self.signer.sign(args);
        match from.into() {
            CopySource::Path(path) => params.insert("from_path", path),
            CopySource::CopyRef(copy_ref) => params.insert("from_copy_ref", copy_ref),
        };
        params.insert("root", &self.config.root);
        params.insert("to_path", to_path);

        self.post_form(&self.config.api_host, "fileops/copy", None, params)
            .await
    }

    /// Move or rename a file or folder.
    #[instrument(skip(self, args))]
    pub async fn mv(&self, from_path: &str, to_path: &str, args: Option<&Params>) -> Result<Reply> {
        let mut params = self.signer.sign(args);
        params.insert("root", &self.config.root);
        params.insert("from_path", from_path);
        params.insert("to_path", to_path);

        self.post_form(&self.config.api_host, "fileops/move", None, params)
            .await
    }

    /// Delete a file or folder.
    #[instrument(skip(self, args))]
    pub async fn rm(&self, path: &str, args: Option<&Params>) -> Result<Reply> {
        let mut params = self.signer.sign(args);
        params.insert("root", &self.config.root);
        params.insert("path", path);

        self.post_form(&self.config.api_host, "fileops/delete", None, params)
            .await
    }

    /// Create a folder.
    #[instrument(skip(self, args))]
    pub async fn mkdir(&self, path: &str, args: Option<&Params>) -> Result<Reply> {
        let mut params = self.signer.sign(args);
        params.insert("root", &self.config.root);
        params.insert("path", path);

        self.post_form(&self.config.api_host, "fileops/create_folder", None, params)
            .await
    }

    fn signed_url(&self, host: &str, action: &str, path: &str, args: Option<&Params>) -> String {
        let query = self.signer.sign(args).to_form();
        EndpointUrl::new(host, action)
            .path(&self.config.root, path)
            .query(&query)
            .build()
    }

    async fn get_request(
        &self,
        host: &str,
        action: &str,
        path: &str,
        args: Option<&Params>,
    ) -> Result<HttpResponse> {
        let url = self.signed_url(host, action, path, args);
        self.send(HttpRequest::new(HttpMethod::Get, url)).await
    }

    async fn get_json(
        &self,
        host: &str,
        action: &str,
        path: &str,
        args: Option<&Params>,
    ) -> Result<Reply> {
        let response = self.get_request(host, action, path, args).await?;
        Ok(Self::json_reply(response))
    }

    async fn download(
        &self,
        host: &str,
        action: &str,
        path: &str,
        args: Option<&Params>,
    ) -> Result<Download> {
        let response = self.get_request(host, action, path, args).await?;
        let metadata = header_metadata(response.header(METADATA_HEADER));

        debug!(status = response.status, bytes = response.body.len(), "Downloaded");

        Ok(Download {
            status: response.status,
            bytes: response.body,
            metadata,
        })
    }

    async fn post_form(
        &self,
        host: &str,
        action: &str,
        path: Option<&str>,
        params: Params,
    ) -> Result<Reply> {
        let mut url = EndpointUrl::new(host, action);
        if let Some(path) = path {
            url = url.path(&self.config.root, path);
        }

        debug!(params = %redact_pairs(&params), "Form parameters");

        let request = HttpRequest::new(HttpMethod::Post, url.build()).form(params.to_form());
        let response = self.send(request).await?;
        Ok(Self::json_reply(response))
    }

    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        if let Some(timeout) = self.config.timeout() {
            request = request.timeout(timeout);
        }

        let method = request.method;
        let url = request.redacted_url().to_string();

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(method = method.as_str(), url = %url, error = %e, "Request failed in transport");
            e
        })?;

        if response.is_success() || response.status == 304 {
            debug!(method = method.as_str(), url = %url, status = response.status, "API request completed");
        } else {
            warn!(method = method.as_str(), url = %url, status = response.status, "API returned error status");
        }

        Ok(response)
    }

    async fn open_stream(&self, mut request: HttpRequest) -> Result<HttpStream> {
        if let Some(timeout) = self.config.timeout() {
            request = request.timeout(timeout);
        }

        let url = request.redacted_url().to_string();

        let stream = self.http_client.download_stream(request).await.map_err(|e| {
            warn!(url = %url, error = %e, "Stream failed in transport");
            e
        })?;

        if (200..300).contains(&stream.status) {
            debug!(url = %url, status = stream.status, "Stream opened");
        } else {
            warn!(url = %url, status = stream.status, "Stream opened with error status");
        }

        Ok(stream)
    }

    fn json_reply(response: HttpResponse) -> Reply {
        Reply::new(response.status, parse_body(&response.body))
    }
}

/// Parse the metadata header; absent or malformed yields an empty object.
fn header_metadata(raw: Option<&str>) -> Value {
    raw.and_then(|raw| match serde_json::from_str::<Value>(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed {} header", METADATA_HEADER);
            None
        }
    })
    .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Parse a response body as JSON.
///
/// Empty bodies become `Null`; anything that is not JSON is kept as a string
/// so error pages still reach the caller.
pub(crate) fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn download_stream(&self, request: HttpRequest) -> BridgeResult<HttpStream>;
        }
    }

    fn config() -> DropboxConfig {
        DropboxConfig::builder()
            .app_key("key")
            .app_secret("secret")
            .token("tok", "toksecret")
            .build()
            .unwrap()
    }

    fn client(mock_http: MockHttpClient) -> DropboxClient {
        DropboxClient::new(config(), Arc::new(mock_http)).unwrap()
    }

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn form_fields(request: &HttpRequest) -> HashMap<String, String> {
        let body = request.body.as_ref().expect("form body");
        serde_urlencoded::from_bytes(body).unwrap()
    }

    fn query_fields(request: &HttpRequest) -> HashMap<String, String> {
        let query = request.url.split_once('?').map(|(_, q)| q).unwrap_or("");
        serde_urlencoded::from_str(query).unwrap()
    }

    fn byte_stream(status: u16, headers: HashMap<String, String>, body: &'static [u8]) -> HttpStream {
        HttpStream {
            status,
            headers,
            body: Box::new(body),
        }
    }

    #[tokio::test]
    async fn test_account_posts_signed_form() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Post);
            assert_eq!(req.url, "https://api.dropbox.com/1/account/info");
            let body_len = req.body.as_ref().unwrap().len().to_string();
            assert_eq!(req.headers.get("Content-Length"), Some(&body_len));

            let fields = form_fields(&req);
            assert_eq!(fields.get("oauth_consumer_key").map(String::as_str), Some("key"));
            assert_eq!(fields.get("oauth_token").map(String::as_str), Some("tok"));
            assert_eq!(
                fields.get("oauth_signature").map(String::as_str),
                Some("secret&toksecret")
            );

            Ok(json_response(200, r#"{"uid": 12345, "display_name": "Jane"}"#))
        });

        let reply = client(mock_http).account().await.unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["uid"], 12345);
    }

    #[tokio::test]
    async fn test_delta_keeps_cursor_argument() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.url, "https://api.dropbox.com/1/delta");
            assert_eq!(
                form_fields(&req).get("cursor").map(String::as_str),
                Some("abc")
            );
            Ok(json_response(200, r#"{"entries": [], "reset": false, "has_more": false}"#))
        });

        let args = Params::new().with("cursor", "abc");
        let reply = client(mock_http).delta(Some(&args)).await.unwrap();

        assert_eq!(reply.body["has_more"], false);
    }

    #[tokio::test]
    async fn test_metadata_query_carries_caller_args() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Get);
            assert!(req
                .url
                .starts_with("https://api.dropbox.com/1/metadata/sandbox/My%20Docs/a.txt?"));
            let fields = query_fields(&req);
            assert_eq!(fields.get("file_limit").map(String::as_str), Some("10"));
            assert_eq!(fields.get("list").map(String::as_str), Some("true"));
            assert!(req.body.is_none());
            Ok(json_response(200, r#"{"path": "/My Docs/a.txt", "is_dir": false}"#))
        });

        let args = Params::new().with("file_limit", 10).with("list", true);
        let reply = client(mock_http)
            .metadata("/My Docs/a.txt", Some(&args))
            .await
            .unwrap();

        assert_eq!(reply.body["path"], "/My Docs/a.txt");
    }

    #[tokio::test]
    async fn test_metadata_not_modified_is_empty_object() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(json_response(304, "")));

        let args = Params::new().with("hash", "528dda36e3150ba28040052bbf1bfbd1");
        let reply = client(mock_http).metadata("/", Some(&args)).await.unwrap();

        assert_eq!(reply.status, 304);
        assert_eq!(reply.body, Value::Object(Map::new()));
        assert!(!reply.body.is_null());
    }

    #[tokio::test]
    async fn test_api_error_status_is_a_reply() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(json_response(404, r#"{"error": "Path '/x' not found"}"#)));

        let reply = client(mock_http).revisions("/x", None).await.unwrap();

        assert_eq!(reply.status, 404);
        assert!(!reply.is_success());
        assert_eq!(reply.body["error"], "Path '/x' not found");
    }

    #[tokio::test]
    async fn test_non_json_body_kept_as_text() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(json_response(503, "<html>Service Unavailable</html>")));

        let reply = client(mock_http).shares("/a", None).await.unwrap();

        assert_eq!(reply.status, 503);
        assert_eq!(
            reply.body,
            Value::String("<html>Service Unavailable</html>".to_string())
        );
    }

    #[tokio::test]
    async fn test_put_empty_body_is_omitted() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Put);
            assert!(req
                .url
                .starts_with("https://api-content.dropbox.com/1/files_put/sandbox/empty.txt?"));
            assert!(req.body.is_none());
            assert_eq!(req.headers.get("Content-Length"), Some(&"0".to_string()));
            Ok(json_response(200, r#"{"path": "/empty.txt", "bytes": 0}"#))
        });

        let reply = client(mock_http)
            .put("/empty.txt", Bytes::new(), None)
            .await
            .unwrap();

        assert_eq!(reply.body["bytes"], 0);
    }

    #[tokio::test]
    async fn test_put_body_matches_content_length() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            let body = req.body.clone().unwrap();
            assert_eq!(&body[..], b"hello world");
            assert_eq!(
                req.headers.get("Content-Length"),
                Some(&body.len().to_string())
            );
            assert_eq!(
                query_fields(&req).get("overwrite").map(String::as_str),
                Some("false")
            );
            Ok(json_response(200, r#"{"path": "/hello.txt"}"#))
        });

        let args = Params::new().with("overwrite", false);
        client(mock_http)
            .put("/hello.txt", Bytes::from_static(b"hello world"), Some(&args))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_returns_bytes_and_header_metadata() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req
                .url
                .starts_with("https://api-content.dropbox.com/1/files/sandbox/song.mp3?"));
            let mut headers = HashMap::new();
            headers.insert(
                "x-dropbox-metadata".to_string(),
                r#"{"path": "/song.mp3", "bytes": 3, "rev": "1f"}"#.to_string(),
            );
            Ok(HttpResponse {
                status: 200,
                headers,
                body: Bytes::from(vec![1, 2, 3]),
            })
        });

        let download = client(mock_http).get("/song.mp3", None).await.unwrap();

        assert_eq!(download.status, 200);
        assert_eq!(&download.bytes[..], &[1, 2, 3]);
        assert_eq!(download.metadata["rev"], "1f");
    }

    #[tokio::test]
    async fn test_stream_reads_file_body_incrementally() {
        use tokio::io::AsyncReadExt;

        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().never();
        mock_http.expect_download_stream().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Get);
            assert!(req
                .url
                .starts_with("https://api-content.dropbox.com/1/files/sandbox/Music/song%201.mp3?"));
            assert!(req.body.is_none());

            let fields = query_fields(&req);
            assert_eq!(fields.get("rev").map(String::as_str), Some("1f"));
            assert_eq!(fields.get("oauth_token").map(String::as_str), Some("tok"));
            assert_eq!(
                fields.get("oauth_signature").map(String::as_str),
                Some("secret&toksecret")
            );

            let mut headers = HashMap::new();
            headers.insert(
                "X-Dropbox-Metadata".to_string(),
                r#"{"path": "/Music/song 1.mp3", "bytes": 6}"#.to_string(),
            );
            Ok(byte_stream(200, headers, b"ID3abc"))
        });

        let args = Params::new().with("rev", "1f");
        let mut download = client(mock_http)
            .stream("/Music/song 1.mp3", Some(&args))
            .await
            .unwrap();

        assert_eq!(download.status, 200);
        assert_eq!(download.metadata["bytes"], 6);

        let mut first = [0u8; 3];
        download.reader.read_exact(&mut first).await.unwrap();
        assert_eq!(&first, b"ID3");
        let mut rest = Vec::new();
        download.reader.read_to_end(&mut rest).await.unwrap();
        assert_eq!(rest, b"abc");
    }

    #[tokio::test]
    async fn test_stream_error_status_and_transport_failure() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_download_stream()
            .times(2)
            .returning(|req| {
                if req.url.contains("/missing.mp3") {
                    Ok(byte_stream(404, HashMap::new(), br#"{"error": "File not found"}"#))
                } else {
                    Err(BridgeError::Timeout("30s elapsed".to_string()))
                }
            });

        let client = client(mock_http);

        let missing = client.stream("/missing.mp3", None).await.unwrap();
        assert_eq!(missing.status, 404);
        assert_eq!(missing.metadata, Value::Object(Map::new()));

        let result = client.stream("/slow.mp3", None).await;
        assert!(matches!(
            result,
            Err(crate::error::DropboxError::NetworkError(ref msg)) if msg.contains("30s")
        ));
    }

    #[tokio::test]
    async fn test_thumbnail_without_header_has_empty_metadata() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|req| {
            assert!(req.url.contains("/1/thumbnails/sandbox/pic.jpg?"));
            assert!(query_fields(&req).contains_key("size"));
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from_static(b"\x89PNG"),
            })
        });

        let args = Params::new().with("size", "small");
        let download = client(mock_http)
            .thumbnails("/pic.jpg", Some(&args))
            .await
            .unwrap();

        assert_eq!(download.metadata, Value::Object(Map::new()));
        assert_eq!(download.bytes.len(), 4);
    }

    #[tokio::test]
    async fn test_restore_and_search_add_fixed_fields() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(2).returning(|req| {
            let fields = form_fields(&req);
            if req.url.contains("/1/restore/") {
                assert_eq!(req.url, "https://api.dropbox.com/1/restore/sandbox/doc.txt");
                assert_eq!(fields.get("rev").map(String::as_str), Some("a1c10ce0dd78"));
            } else {
                assert_eq!(req.url, "https://api.dropbox.com/1/search/sandbox/Photos");
                assert_eq!(fields.get("query").map(String::as_str), Some("beach trip"));
                assert_eq!(fields.get("file_limit").map(String::as_str), Some("50"));
            }
            Ok(json_response(200, "{}"))
        });

        let client = client(mock_http);
        client.restore("/doc.txt", "a1c10ce0dd78", None).await.unwrap();
        let args = Params::new().with("file_limit", 50);
        client
            .search("/Photos", "beach trip", Some(&args))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_media_and_cpref() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(2).returning(|req| {
            if req.method == HttpMethod::Post {
                assert_eq!(req.url, "https://api.dropbox.com/1/media/sandbox/v.mp4");
                Ok(json_response(200, r#"{"url": "https://dl.example/v.mp4"}"#))
            } else {
                assert!(req.url.starts_with("https://api.dropbox.com/1/copy_ref/sandbox/v.mp4?"));
                Ok(json_response(200, r#"{"copy_ref": "z1X6ATl6aWtzOGq0c3g5Ng"}"#))
            }
        });

        let client = client(mock_http);
        let media = client.media("/v.mp4", None).await.unwrap();
        let copy_ref = client.cpref("/v.mp4", None).await.unwrap();

        assert_eq!(media.body["url"], "https://dl.example/v.mp4");
        assert_eq!(copy_ref.body["copy_ref"], "z1X6ATl6aWtzOGq0c3g5Ng");
    }

    #[tokio::test]
    async fn test_root_is_endpoint_fixed() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.url, "https://api.dropbox.com/1/fileops/create_folder");
            let fields = form_fields(&req);
            assert_eq!(fields.get("root").map(String::as_str), Some("sandbox"));
            assert_eq!(fields.get("path").map(String::as_str), Some("/new"));
            assert_eq!(fields.get("locale").map(String::as_str), Some("en"));
            Ok(json_response(200, r#"{"path": "/new", "is_dir": true}"#))
        });

        let args = Params::new().with("root", "dropbox").with("locale", "en");
        client(mock_http).mkdir("/new", Some(&args)).await.unwrap();
    }

    #[tokio::test]
    async fn test_cp_from_path_and_copy_ref() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(2).returning(|req| {
            assert_eq!(req.url, "https://api.dropbox.com/1/fileops/copy");
            let fields = form_fields(&req);
            assert_eq!(fields.get("to_path").map(String::as_str), Some("/b"));
            assert_eq!(fields.get("root").map(String::as_str), Some("sandbox"));
            match fields.get("from_path") {
                Some(from) => {
                    assert_eq!(from, "/a");
                    assert!(!fields.contains_key("from_copy_ref"));
                }
                None => assert_eq!(
                    fields.get("from_copy_ref").map(String::as_str),
                    Some("ref123")
                ),
            }
            Ok(json_response(200, "{}"))
        });

        let client = client(mock_http);
        client.cp("/a", "/b", None).await.unwrap();
        client
            .cp(CopySource::CopyRef("ref123".to_string()), "/b", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mv_and_rm() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(2).returning(|req| {
            let fields = form_fields(&req);
            assert_eq!(fields.get("root").map(String::as_str), Some("sandbox"));
            if req.url.ends_with("fileops/move") {
                assert_eq!(fields.get("from_path").map(String::as_str), Some("/a"));
                assert_eq!(fields.get("to_path").map(String::as_str), Some("/b"));
            } else {
                assert_eq!(req.url, "https://api.dropbox.com/1/fileops/delete");
                assert_eq!(fields.get("path").map(String::as_str), Some("/b"));
            }
            Ok(json_response(200, r#"{"is_deleted": true}"#))
        });

        let client = client(mock_http);
        client.mv("/a", "/b", None).await.unwrap();
        let reply = client.rm("/b", None).await.unwrap();
        assert_eq!(reply.body["is_deleted"], true);
    }

    #[tokio::test]
    async fn test_transport_failure_collapses_to_none() {
        use crate::types::IntoParts;

        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Err(BridgeError::Connection("connection refused".to_string())));

        let client = client(mock_http);

        let result = client.account().await;
        assert!(matches!(
            result,
            Err(crate::error::DropboxError::NetworkError(ref msg)) if msg.contains("refused")
        ));
        assert_eq!(result.into_parts(), (None, None));
        assert_eq!(client.get("/a", None).await.into_parts(), (None, None, None));
        assert_eq!(client.metadata("/a", None).await.into_parts(), (None, None));
    }

    #[tokio::test]
    async fn test_timeout_forwarded_to_transport() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|req| {
            assert_eq!(req.timeout, Some(std::time::Duration::from_secs(15)));
            Ok(json_response(200, "{}"))
        });

        let config = DropboxConfig::builder()
            .app_key("key")
            .app_secret("secret")
            .timeout_secs(15)
            .build()
            .unwrap();
        let client = DropboxClient::new(config, Arc::new(mock_http)).unwrap();
        client.account().await.unwrap();
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
        assert_eq!(parse_body(br#"{"a": 1}"#)["a"], 1);
        assert_eq!(parse_body(b"oops"), Value::String("oops".to_string()));
    }
}
