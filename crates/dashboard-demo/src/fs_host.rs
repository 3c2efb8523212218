// File: crates/dashboard-demo/src/fs_host.rs
// Summary: Export host backed by a directory: downloads and opened windows become files; timers are queued.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dashboard_core::{Blob, ExportHost, HostTask, ObjectUrl, WindowRequest};

pub struct FsHost {
    out_dir: PathBuf,
    urls: HashMap<ObjectUrl, Blob>,
    next_url: usize,
    pending: Vec<(Duration, HostTask)>,
    taken: HashSet<String>,
    pub written: Vec<PathBuf>,
    pub fullscreen: Option<String>,
}

impl FsHost {
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
        Ok(Self {
            out_dir,
            urls: HashMap::new(),
            next_url: 0,
            pending: Vec::new(),
            taken: HashSet::new(),
            written: Vec::new(),
            fullscreen: None,
        })
    }

    /// Object URLs not yet revoked.
    pub fn live_urls(&self) -> usize {
        self.urls.len()
    }

    /// Run every queued task in delay order. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut tasks = std::mem::take(&mut self.pending);
        tasks.sort_by_key(|(delay, _)| *delay);
        let count = tasks.len();
        for (delay, task) in tasks {
            match task {
                HostTask::RevokeObjectUrl(url) => {
                    self.urls.remove(&url);
                    tracing::debug!(url = %url.0, ?delay, "object url revoked");
                }
                HostTask::ResizeChart(target_id) => {
                    tracing::debug!(%target_id, ?delay, "chart resized to fullscreen");
                }
            }
        }
        count
    }

    /// `name`, or `name-2`, `name-3`... when an earlier export used it.
    fn unique_path(&mut self, name: &str) -> PathBuf {
        let (stem, ext) = match name.rsplit_once('.') {
            Some((s, e)) => (s, Some(e)),
            None => (name, None),
        };
        let mut candidate = name.to_string();
        let mut n = 1;
        while self.taken.contains(&candidate) {
            n += 1;
            candidate = match ext {
                Some(e) => format!("{stem}-{n}.{e}"),
                None => format!("{stem}-{n}"),
            };
        }
        self.taken.insert(candidate.clone());
        self.out_dir.join(candidate)
    }

    fn write(&mut self, path: &Path, content: &[u8]) -> bool {
        match std::fs::write(path, content) {
            Ok(()) => {
                self.written.push(path.to_path_buf());
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "write failed");
                false
            }
        }
    }
}

impl ExportHost for FsHost {
    fn create_object_url(&mut self, blob: Blob) -> ObjectUrl {
        self.next_url += 1;
        let url = ObjectUrl(format!("blob:fs/{}", self.next_url));
        self.urls.insert(url.clone(), blob);
        url
    }

    fn click_download(&mut self, url: &ObjectUrl, filename: &str) {
        let Some(content) = self.urls.get(url).map(|b| b.content.clone()) else {
            tracing::warn!(url = %url.0, "download of revoked url");
            return;
        };
        let path = self.unique_path(filename);
        self.write(&path, &content);
    }

    fn schedule(&mut self, delay: Duration, task: HostTask) {
        self.pending.push((delay, task));
    }

    fn open_window(&mut self, request: WindowRequest) -> bool {
        let path = self.unique_path("window.html");
        tracing::debug!(features = %request.features, path = %path.display(), "window opened");
        self.write(&path, request.html.as_bytes())
    }

    fn request_fullscreen(&mut self, target_id: &str) -> bool {
        self.fullscreen = Some(target_id.to_string());
        true
    }
}
