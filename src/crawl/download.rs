// src/crawl/download.rs
// =============================================================================
// Saving PDFs to disk.
//
// The response body is streamed chunk by chunk straight into the file, so a
// 500 MB report costs no more memory than a 5 KB one. There is no limit on
// the total download time, only on the gap between two chunks.
//
// The file name is the last segment of the URL path, used as-is. Two PDFs
// with the same name from different folders end up in the same file and the
// later one wins.
// =============================================================================

use crate::error::CrawlError;
use crate::fetch::{Body, FetchOptions, FetchResult, Fetched, Fetcher};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};
use url::Url;

/// Used when the URL path ends in '/' or cannot be parsed
pub const FALLBACK_FILENAME: &str = "downloaded_file.pdf";

// Downloads one PDF into a directory
//
// Parameters:
//   fetcher: shared client with the retry policy
//   url: absolute URL of the PDF
//   dir: target directory, which must already exist
//
// Returns: true only if the whole file was written.
// Never fails loudly: fetch failures were already logged by the fetcher and
// write or stall failures are logged here.
pub async fn download_pdf(fetcher: &Fetcher, url: &str, dir: &Path) -> bool {
    let options = FetchOptions::document();
    let body = match fetcher.fetch(url, options).await {
        FetchResult::Success(Fetched { body, .. }) => body,
        FetchResult::Failure(_) => return false,
    };

    let path = dir.join(filename_for(url));
    info!("      -> Downloading as: {}", path.display());

    match save_body(body, &path, url, options.timeout).await {
        Ok(bytes) => {
            info!("      -> Successfully downloaded ({} bytes).", bytes);
            true
        }
        Err(e) => {
            error!("      -> UNEXPECTED ERROR during download of {}. Reason: {}", url, e);
            false
        }
    }
}

/// File name for a PDF URL: the text after the last '/' of the path
pub fn filename_for(url: &str) -> String {
    let name = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.path().rsplit('/').next().map(str::to_string))
        .unwrap_or_default();

    if name.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        name
    }
}

// Writes the body to `path` and returns the number of bytes written.
// Fails with Stalled if no chunk arrives within `idle_timeout`.
async fn save_body(
    body: Body,
    path: &Path,
    url: &str,
    idle_timeout: Duration,
) -> Result<u64, CrawlError> {
    let fs_error = |source: std::io::Error| CrawlError::FileSystem {
        path: PathBuf::from(path),
        source,
    };

    let mut file = File::create(path).await.map_err(fs_error)?;
    let mut written = 0u64;

    match body {
        Body::Stream(response) => {
            let mut chunks = response.bytes_stream();
            loop {
                let next = tokio::time::timeout(idle_timeout, chunks.next())
                    .await
                    .map_err(|_| CrawlError::Stalled {
                        url: url.to_string(),
                        after: idle_timeout,
                    })?;
                let Some(chunk) = next else { break };
                let chunk = chunk?;
                file.write_all(&chunk).await.map_err(fs_error)?;
                written += chunk.len() as u64;
            }
        }
        Body::Text(text) => {
            file.write_all(text.as_bytes()).await.map_err(fs_error)?;
            written = text.len() as u64;
        }
    }

    file.flush().await.map_err(fs_error)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::USER_AGENT;
    use crate::fetch::RetryPolicy;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quick_fetcher() -> Fetcher {
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff_base: Duration::from_millis(5),
        };
        Fetcher::new(USER_AGENT, policy).unwrap()
    }

    // Serves a single response whose 10 byte body is sent one byte per `gap`
    async fn trickle_server(gap: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else { return };
            let _ = socket.set_nodelay(true);
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;

            let head = "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\n\
                        Content-Length: 10\r\nConnection: close\r\n\r\n";
            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            for _ in 0..10 {
                tokio::time::sleep(gap).await;
                if socket.write_all(b"x").await.is_err() {
                    return;
                }
            }
        });
        format!("http://{}/slow/report.pdf", addr)
    }

    async fn stream_from(url: &str) -> Body {
        let options = FetchOptions {
            timeout: Duration::from_secs(5),
            stream_body: true,
        };
        match quick_fetcher().fetch(url, options).await {
            FetchResult::Success(Fetched { body, .. }) => body,
            FetchResult::Failure(e) => panic!("fetch failed: {}", e),
        }
    }

    #[test]
    fn test_filename_from_last_segment() {
        assert_eq!(filename_for("https://x/docs/2024/report.pdf"), "report.pdf");
        assert_eq!(filename_for("https://x/report.PDF#page=2"), "report.PDF");
        assert_eq!(filename_for("https://x/a.pdf?version=2"), "a.pdf");
    }

    #[test]
    fn test_filename_fallback() {
        assert_eq!(filename_for("https://x/docs/"), FALLBACK_FILENAME);
        assert_eq!(filename_for("https://x"), FALLBACK_FILENAME);
        assert_eq!(filename_for("not a url"), FALLBACK_FILENAME);
    }

    #[test]
    fn test_filename_is_not_decoded() {
        assert_eq!(filename_for("https://x/beslut%201.pdf"), "beslut%201.pdf");
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        let content = vec![b'%'; 64 * 1024];
        Mock::given(method("GET"))
            .and(path("/files/report.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let url = format!("{}/files/report.pdf", server.uri());

        assert!(download_pdf(&quick_fetcher(), &url, dir.path()).await);

        let saved = std::fs::read(dir.path().join("report.pdf")).unwrap();
        assert_eq!(saved, content);
    }

    #[tokio::test]
    async fn test_download_failure_returns_false_and_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .expect(3)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let url = format!("{}/missing.pdf", server.uri());

        assert!(!download_pdf(&quick_fetcher(), &url, dir.path()).await);
        assert!(!dir.path().join("missing.pdf").exists());
    }

    #[tokio::test]
    async fn test_unwritable_directory_returns_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let url = format!("{}/a.pdf", server.uri());

        assert!(!download_pdf(&quick_fetcher(), &url, &missing).await);
    }

    #[tokio::test]
    async fn test_same_filename_overwrites() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2023/beslut.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_string("old"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2024/beslut.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_string("new"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let fetcher = quick_fetcher();
        assert!(download_pdf(&fetcher, &format!("{}/2023/beslut.pdf", server.uri()), dir.path()).await);
        assert!(download_pdf(&fetcher, &format!("{}/2024/beslut.pdf", server.uri()), dir.path()).await);

        let saved = std::fs::read_to_string(dir.path().join("beslut.pdf")).unwrap();
        assert_eq!(saved, "new");
    }

    #[tokio::test]
    async fn test_slow_steady_body_outlives_idle_timeout() {
        // 10 bytes, 100ms apart: about a second in total, but never more
        // than 300ms without data
        let url = trickle_server(Duration::from_millis(100)).await;
        let body = stream_from(&url).await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        let written = save_body(body, &path, &url, Duration::from_millis(300))
            .await
            .unwrap();

        assert_eq!(written, 10);
        assert_eq!(std::fs::read(&path).unwrap(), b"xxxxxxxxxx");
    }

    #[tokio::test]
    async fn test_stalled_body_is_an_error() {
        let url = trickle_server(Duration::from_secs(2)).await;
        let body = stream_from(&url).await;

        let dir = TempDir::new().unwrap();
        let result = save_body(body, &dir.path().join("report.pdf"), &url, Duration::from_millis(200)).await;

        assert!(matches!(result, Err(CrawlError::Stalled { .. })));
    }
}
