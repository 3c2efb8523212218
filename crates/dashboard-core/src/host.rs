// File: crates/dashboard-core/src/host.rs
// Summary: Host environment contract (object URLs, save-as, windows, timers) and the download helper.

use std::time::Duration;

/// In-memory file content with its MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub content: Vec<u8>,
    pub mime: String,
}

/// Handle to a blob registered with the host. Must be revoked once used.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectUrl(pub String);

/// Work the host runs later on its event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostTask {
    RevokeObjectUrl(ObjectUrl),
    ResizeChart(String),
}

/// A new display surface (window/tab) and its document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowRequest {
    pub features: String,
    pub html: String,
}

/// A file to hand to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub content: Vec<u8>,
    pub mime: String,
    pub filename: String,
}

impl Download {
    pub fn new(content: impl Into<Vec<u8>>, mime: impl Into<String>, filename: impl Into<String>) -> Self {
        Self { content: content.into(), mime: mime.into(), filename: filename.into() }
    }
}

/// Browser-like environment the exporter drives.
pub trait ExportHost {
    fn create_object_url(&mut self, blob: Blob) -> ObjectUrl;
    /// Programmatic "save as" of `url` under `filename`.
    fn click_download(&mut self, url: &ObjectUrl, filename: &str);
    /// Run `task` after `delay`.
    fn schedule(&mut self, delay: Duration, task: HostTask);
    /// Open a new display surface; `false` when it was blocked.
    fn open_window(&mut self, request: WindowRequest) -> bool;
    /// `false` when the host denied the request.
    fn request_fullscreen(&mut self, target_id: &str) -> bool;
}

/// Save `download` through an ephemeral object URL, released after `revoke_delay`
/// so the host can start the transfer first.
pub fn trigger_download(host: &mut dyn ExportHost, download: Download, revoke_delay: Duration) {
    let Download { content, mime, filename } = download;
    let url = host.create_object_url(Blob { content, mime });
    host.click_download(&url, &filename);
    tracing::debug!(%filename, url = %url.0, "download triggered");
    host.schedule(revoke_delay, HostTask::RevokeObjectUrl(url));
}
