//! Download channels backed by the local machine.

use super::{DownloadChannel, MediaKind};
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

/// Programs tried, in order, to open a URL in the user's browser.
const OPENERS: &[&str] = &["xdg-open", "open", "wslview"];

/// Clipboard writers tried in order, with the arguments they need.
const CLIPBOARDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
];

/// Saves into a directory, opens with the desktop opener, copies with the
/// first clipboard tool found on `PATH`.
pub struct SystemDownloader {
    http: reqwest::Client,
    directory: PathBuf,
}

impl SystemDownloader {
    pub fn new(directory: PathBuf, timeout_secs: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { http, directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Reject names that would escape the download directory.
fn safe_file_name(file_name: &str) -> anyhow::Result<&str> {
    let name = file_name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        anyhow::bail!("Invalid file name: {file_name:?}");
    }
    Ok(name)
}

#[async_trait]
impl DownloadChannel for SystemDownloader {
    async fn fetch_and_save(
        &self,
        url: &str,
        file_name: &str,
        kind: MediaKind,
    ) -> anyhow::Result<PathBuf> {
        let name = safe_file_name(file_name)?;

        let resp = self
            .http
            .get(url)
            .header("Accept", kind.accept_header())
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("HTTP {}", resp.status());
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            anyhow::bail!("Downloaded file is empty");
        }

        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("Failed to create {}", self.directory.display()))?;
        let path = self.directory.join(name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Saved download");
        Ok(path)
    }

    async fn open_external(&self, url: &str) -> anyhow::Result<()> {
        let opener = OPENERS
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| anyhow::anyhow!("No browser opener found"))?;

        let status = tokio::process::Command::new(&opener)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("Failed to run {}", opener.display()))?;

        if !status.success() {
            anyhow::bail!("{} exited with {status}", opener.display());
        }
        Ok(())
    }

    async fn copy_to_clipboard(&self, text: &str) -> anyhow::Result<()> {
        let (program, args) = CLIPBOARDS
            .iter()
            .find_map(|(name, args)| which::which(name).ok().map(|path| (path, *args)))
            .ok_or_else(|| anyhow::anyhow!("No clipboard tool found"))?;

        let mut child = tokio::process::Command::new(&program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to run {}", program.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            anyhow::bail!("{} exited with {status}", program.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn rejects_path_traversal() {
        assert!(safe_file_name("../etc/passwd").is_err());
        assert!(safe_file_name("..").is_err());
        assert!(safe_file_name("").is_err());
        assert_eq!(safe_file_name(" a.mp3 ").unwrap(), "a.mp3");
    }

    #[tokio::test]
    async fn saves_audio_to_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.mp3"))
            .and(header("Accept", "audio/mpeg, audio/*"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let tmp = tempfile::TempDir::new().unwrap();
        let dl = SystemDownloader::new(tmp.path().join("out"), 5).unwrap();
        let saved = dl
            .fetch_and_save(&format!("{}/a.mp3", server.uri()), "voice.mp3", MediaKind::Audio)
            .await
            .unwrap();

        assert_eq!(saved, tmp.path().join("out/voice.mp3"));
        assert_eq!(std::fs::read(saved).unwrap(), vec![1u8, 2, 3]);
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tmp = tempfile::TempDir::new().unwrap();
        let dl = SystemDownloader::new(tmp.path().to_path_buf(), 5).unwrap();
        let err = dl
            .fetch_and_save(&format!("{}/gone.mp3", server.uri()), "x.mp3", MediaKind::Audio)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("HTTP 404"));
    }

    #[tokio::test]
    async fn empty_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let tmp = tempfile::TempDir::new().unwrap();
        let dl = SystemDownloader::new(tmp.path().to_path_buf(), 5).unwrap();
        let err = dl
            .fetch_and_save(&format!("{}/empty.mp3", server.uri()), "x.mp3", MediaKind::Audio)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Downloaded file is empty");
        assert!(!tmp.path().join("x.mp3").exists());
    }
}
