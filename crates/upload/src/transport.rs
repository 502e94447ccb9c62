//! Upload transport trait and its HTTP implementation.
//!
//! `UploadTransport` is the seam between the state machine and the network.
//! The orchestrator only ever sees a parsed JSON payload or a
//! [`TransportFailure`], which keeps it testable with mocks.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::UPLOAD_PATH;
use crate::error::TransportFailure;
use crate::files::FileSource;
use crate::session::UploadSession;

/// Everything needed to submit one file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub file_name: String,
    pub mime_type: String,
    /// Size validated when the file was attached.
    pub size_bytes: u64,
    pub source: FileSource,
}

impl UploadRequest {
    /// Reads the file contents, refusing them if the size no longer matches
    /// what was validated at attach time.
    pub async fn read_contents(&self) -> Result<Vec<u8>, TransportFailure> {
        let bytes = self
            .source
            .read()
            .await
            .map_err(|e| TransportFailure::InvalidFile {
                file_name: self.file_name.clone(),
                reason: e.to_string(),
            })?;

        if bytes.len() as u64 != self.size_bytes {
            warn!(
                file = %self.file_name,
                attached = self.size_bytes,
                read = bytes.len(),
                "file changed after validation"
            );
            return Err(TransportFailure::InvalidFile {
                file_name: self.file_name.clone(),
                reason: "file changed since it was selected".into(),
            });
        }
        Ok(bytes)
    }
}

/// Delivers a file to the upload endpoint.
pub trait UploadTransport: Send + Sync {
    /// Submits the file and returns the parsed response body.
    fn submit(
        &self,
        request: UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Value, TransportFailure>> + Send + '_>>;
}

/// Builds `{base}/api/v1/resumes/upload?model=..&locale=..[&token=..]`.
pub fn build_upload_url(base: &str, session: &UploadSession) -> Result<Url, TransportFailure> {
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(TransportFailure::MissingEndpoint);
    }

    let mut url = Url::parse(&format!("{base}{UPLOAD_PATH}"))
        .map_err(|e| TransportFailure::InvalidEndpoint(e.to_string()))?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("model", session.selected_model())
            .append_pair("locale", session.locale().as_str());
        if let Some(token) = session.access_token() {
            query.append_pair("token", token);
        }
    }

    Ok(url)
}

/// Headers sent with every upload.
pub fn upload_headers(session: &UploadSession) -> Vec<(String, String)> {
    vec![("Accept-Language".into(), session.locale().as_str().into())]
}

/// `reqwest`-backed transport sending one multipart POST per upload.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    async fn send(&self, request: UploadRequest) -> Result<Value, TransportFailure> {
        let bytes = request.read_contents().await?;
        let UploadRequest {
            url,
            headers,
            file_name,
            mime_type,
            ..
        } = request;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(&mime_type)
            .map_err(|e| TransportFailure::InvalidFile {
                file_name: file_name.clone(),
                reason: e.to_string(),
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut builder = self.http.post(url).multipart(form);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportFailure::Network(e.to_string()))?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(file = %file_name, status = status.as_u16(), body = %body, "upload rejected");
            return Err(TransportFailure::Status {
                file_name,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportFailure::Network(e.to_string()))?;
        debug!(file = %file_name, bytes = body.len(), "upload response received");

        serde_json::from_slice(&body).map_err(|e| TransportFailure::InvalidResponse(e.to_string()))
    }
}

impl UploadTransport for HttpTransport {
    fn submit(
        &self,
        request: UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Value, TransportFailure>> + Send + '_>> {
        Box::pin(self.send(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PDF_MIME, UploadConfig};
    use resumedrop_i18n::Locale;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Starts a one-shot HTTP server answering with `status` and `body`.
    /// The raw request is sent back through the returned receiver.
    async fn mock_server(
        status: u16,
        body: &str,
    ) -> (String, oneshot::Receiver<String>, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();
        let (seen_tx, seen_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let request = read_request(&mut stream).await;
                let _ = seen_tx.send(request);

                let resp = format!(
                    "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, seen_rx, handle)
    }

    /// Reads the request head and its complete body.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let head = text[..head_end].to_lowercase();
                if head.contains("transfer-encoding: chunked") {
                    if text.ends_with("0\r\n\r\n") {
                        break;
                    }
                    continue;
                }
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn session() -> UploadSession {
        UploadSession::new(&UploadConfig::default(), Locale::EnUs)
    }

    fn request(base: &str) -> UploadRequest {
        let session = session();
        UploadRequest {
            url: build_upload_url(base, &session).unwrap(),
            headers: upload_headers(&session),
            file_name: "cv.pdf".into(),
            mime_type: PDF_MIME.into(),
            size_bytes: 8,
            source: FileSource::Memory(Arc::from(b"%PDF-1.7".to_vec())),
        }
    }

    #[test]
    fn url_carries_model_and_locale() {
        let url = build_upload_url("http://localhost:8000/", &session()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/resumes/upload?model=gpt-4.1-mini&locale=en-US"
        );
    }

    #[test]
    fn url_carries_token_when_present() {
        let cfg = UploadConfig::default();
        let mut session = UploadSession::new(&cfg, Locale::ZhCn);
        session.select_model(&cfg, "gpt-4o").unwrap();
        session.set_access_token("t k");

        let url = build_upload_url("https://api.example.com", &session).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v1/resumes/upload?model=gpt-4o&locale=zh-CN&token=t+k"
        );
    }

    #[test]
    fn blank_base_is_missing_endpoint() {
        assert_eq!(
            build_upload_url("  ", &session()).unwrap_err(),
            TransportFailure::MissingEndpoint
        );
    }

    #[test]
    fn relative_base_is_invalid_endpoint() {
        assert!(matches!(
            build_upload_url("localhost-no-scheme", &session()).unwrap_err(),
            TransportFailure::InvalidEndpoint(_)
        ));
    }

    #[test]
    fn accept_language_header() {
        let session = UploadSession::new(&UploadConfig::default(), Locale::ZhCn);
        assert_eq!(
            upload_headers(&session),
            vec![("Accept-Language".to_string(), "zh-CN".to_string())]
        );
    }

    #[tokio::test]
    async fn submit_success_returns_json() {
        let (url, seen, handle) =
            mock_server(200, r#"{"message":"ok","request_id":"r1","resume_id":"abc123"}"#).await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let payload = transport.submit(request(&url)).await.unwrap();
        assert_eq!(payload["resume_id"], "abc123");

        let raw = seen.await.unwrap();
        assert!(raw.starts_with("POST /api/v1/resumes/upload?model=gpt-4.1-mini&locale=en-US"));
        assert!(raw.to_lowercase().contains("accept-language: en-us"));
        assert!(raw.contains("multipart/form-data"));
        assert!(raw.contains("filename=\"cv.pdf\""));
        assert!(raw.contains("%PDF-1.7"));

        handle.abort();
    }

    #[tokio::test]
    async fn submit_non_2xx_is_status_failure() {
        let (url, _seen, handle) = mock_server(500, r#"{"detail":"boom"}"#).await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport.submit(request(&url)).await.unwrap_err();
        assert_eq!(
            err,
            TransportFailure::Status {
                file_name: "cv.pdf".into(),
                status: 500,
            }
        );
        assert_eq!(err.to_string(), "Upload failed for cv.pdf. Status: 500");

        handle.abort();
    }

    #[tokio::test]
    async fn submit_non_json_body_is_invalid_response() {
        let (url, _seen, handle) = mock_server(200, "<html>ok</html>").await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport.submit(request(&url)).await.unwrap_err();
        assert!(matches!(err, TransportFailure::InvalidResponse(_)));

        handle.abort();
    }

    #[tokio::test]
    async fn submit_without_server_is_network_failure() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport
            .submit(request(&format!("http://127.0.0.1:{port}")))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportFailure::Network(_)));
    }

    #[tokio::test]
    async fn unreadable_file_is_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request("http://127.0.0.1:9");
        req.source = FileSource::Disk(dir.path().join("gone.pdf"));

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport.submit(req).await.unwrap_err();
        assert!(matches!(err, TransportFailure::InvalidFile { .. }));
        assert!(err.to_string().starts_with("Cannot upload \"cv.pdf\";"));
    }

    #[tokio::test]
    async fn file_grown_after_attach_is_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        std::fs::write(&path, vec![b'a'; 1024]).unwrap();
        let picked = crate::files::SelectedFile::from_path(&path).unwrap();

        std::fs::write(&path, vec![b'a'; 3 * 1024 * 1024]).unwrap();

        let mut req = request("http://127.0.0.1:9");
        req.size_bytes = picked.size_bytes;
        req.source = picked.source;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport.submit(req).await.unwrap_err();
        assert_eq!(
            err,
            TransportFailure::InvalidFile {
                file_name: "cv.pdf".into(),
                reason: "file changed since it was selected".into(),
            }
        );
    }
}
