//! # PDF Export
//!
//! Renders a web page to an A4 PDF with a headless Chrome instance.
//!
//! Targets are either URLs (`http://`, `https://`, `file://`) or filesystem
//! paths; paths are made absolute and turned into `file://` URLs. Each
//! render launches its own browser, which is shut down when the renderer
//! returns, whether the render succeeded or not.
//!
//! Printing starts once the page has loaded and its network has settled:
//! at most two requests in flight for half a second.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::Network;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Default wait for the page to finish loading.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// A4 paper size in inches.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Requests allowed in flight while the network counts as idle.
const IDLE_MAX_IN_FLIGHT: usize = 2;

/// How long the network must stay idle before printing.
const IDLE_QUIET_PERIOD: Duration = Duration::from_millis(500);

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Tracks in-flight requests of a page to detect when its network settles.
#[derive(Debug)]
struct NetworkIdle {
    in_flight: HashSet<String>,
    quiet_since: Option<Instant>,
}

impl NetworkIdle {
    fn new(now: Instant) -> Self {
        Self {
            in_flight: HashSet::new(),
            quiet_since: Some(now),
        }
    }

    fn request_started(&mut self, id: &str, now: Instant) {
        self.in_flight.insert(id.to_string());
        self.update(now);
    }

    fn request_finished(&mut self, id: &str, now: Instant) {
        self.in_flight.remove(id);
        self.update(now);
    }

    fn update(&mut self, now: Instant) {
        if self.in_flight.len() > IDLE_MAX_IN_FLIGHT {
            self.quiet_since = None;
        } else if self.quiet_since.is_none() {
            self.quiet_since = Some(now);
        }
    }

    fn is_idle(&self, now: Instant) -> bool {
        self.quiet_since
            .is_some_and(|since| now.saturating_duration_since(since) >= IDLE_QUIET_PERIOD)
    }
}

/// Something that can turn a URL into a PDF file.
pub trait PdfRenderer {
    /// Render `url` and write the PDF to `output`.
    fn render(&self, url: &str, output: &Path) -> Result<()>;
}

/// Renders through a freshly launched headless Chrome.
#[derive(Debug, Clone)]
pub struct ChromePdfRenderer {
    timeout: Duration,
}

impl ChromePdfRenderer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn print_options() -> PrintToPdfOptions {
        PrintToPdfOptions {
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            margin_top: Some(0.0),
            margin_bottom: Some(0.0),
            margin_left: Some(0.0),
            margin_right: Some(0.0),
            print_background: Some(true),
            ..Default::default()
        }
    }

    fn render_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .idle_browser_timeout(self.timeout + Duration::from_secs(30))
            .build()?;
        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;
        tab.set_default_timeout(self.timeout);

        let started = Instant::now();
        let idle = Arc::new(Mutex::new(NetworkIdle::new(started)));
        // Network.enable only takes optional buffer limits.
        let enable: Network::Enable = serde_json::from_value(serde_json::json!({}))?;
        tab.call_method(enable)?;
        let listener = tab.add_event_listener(Arc::new(network_listener(Arc::clone(&idle))))?;
        tab.navigate_to(url)?.wait_until_navigated()?;
        debug!("Loaded {}", url);

        let settled = wait_for_network_idle(&idle, started + self.timeout);
        tab.remove_event_listener(&listener)?;
        if !settled {
            anyhow::bail!("network did not become idle within {:?}", self.timeout);
        }
        debug!("Network idle for {}", url);

        let bytes = tab.print_to_pdf(Some(Self::print_options()))?;
        Ok(bytes)
    }
}

/// Route a tab's request lifecycle events into `idle`.
fn network_listener(idle: Arc<Mutex<NetworkIdle>>) -> impl Fn(&Event) + Send + Sync {
    move |event: &Event| {
        let Ok(mut idle) = idle.lock() else { return };
        let now = Instant::now();
        match event {
            Event::NetworkRequestWillBeSent(e) => idle.request_started(&e.params.request_id, now),
            Event::NetworkLoadingFinished(e) => idle.request_finished(&e.params.request_id, now),
            Event::NetworkLoadingFailed(e) => idle.request_finished(&e.params.request_id, now),
            _ => {}
        }
    }
}

/// Poll `idle` until it reports a settled network or `deadline` passes.
fn wait_for_network_idle(idle: &Mutex<NetworkIdle>, deadline: Instant) -> bool {
    loop {
        let now = Instant::now();
        if idle.lock().is_ok_and(|idle| idle.is_idle(now)) {
            return true;
        }
        if now >= deadline {
            return false;
        }
        thread::sleep(IDLE_POLL_INTERVAL);
    }
}

impl Default for ChromePdfRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_TIMEOUT)
    }
}

impl PdfRenderer for ChromePdfRenderer {
    fn render(&self, url: &str, output: &Path) -> Result<()> {
        let bytes = self.render_bytes(url).map_err(|e| Error::Pdf {
            url: url.to_string(),
            message: format!("{:#}", e),
        })?;
        fs::write(output, bytes).map_err(|e| Error::Pdf {
            url: url.to_string(),
            message: format!("cannot write {}: {}", output.display(), e),
        })?;
        info!("PDF written to {}", output.display());
        Ok(())
    }
}

/// Turn a render target into a URL.
///
/// `http://`, `https://` and `file://` targets are returned unchanged; any
/// other string is taken as a path relative to the current directory.
pub fn normalize_target(target: &str) -> Result<String> {
    let lower = target.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("file://") {
        return Ok(target.to_string());
    }

    let absolute = std::path::absolute(target).map_err(|e| Error::Target {
        target: target.to_string(),
        message: e.to_string(),
    })?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| Error::Target {
            target: target.to_string(),
            message: "cannot be expressed as a file URL".to_string(),
        })
}

/// Render `target` to `output` with `renderer`.
pub fn export(renderer: &dyn PdfRenderer, target: &str, output: &Path) -> Result<()> {
    let url = normalize_target(target)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    renderer.render(&url, output)
}
