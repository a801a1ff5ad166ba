//! Preview server readiness.
//!
//! The preview server is started in the background and probed over HTTP
//! until it answers with a success status. Each candidate URL gets its own
//! deadline; probes are spaced by a fixed interval.

use std::thread;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use ureq::Agent;

use crate::config::BuildSettings;
use crate::error::{Error, Result};

/// URL of a template's entry page on a local server.
pub fn template_url(host: &str, port: u16, template: &str) -> String {
    format!(
        "http://{}:{}/src/template/{}/index.html",
        host, port, template
    )
}

/// Append a `mode=` query parameter to `url`.
pub fn with_mode(url: &str, mode: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}mode={}", url, separator, mode)
}

/// Probes URLs until they respond successfully.
pub struct ReadinessProbe {
    agent: Agent,
    interval: Duration,
    timeout: Duration,
}

impl ReadinessProbe {
    pub fn new(timeout: Duration, interval: Duration, probe_timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(probe_timeout))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            interval,
            timeout,
        }
    }

    pub fn from_settings(settings: &BuildSettings) -> Self {
        Self::new(
            settings.preview_timeout,
            settings.poll_interval,
            settings.probe_timeout,
        )
    }

    /// Whether a single GET of `url` succeeds with a 2xx status.
    pub fn probe(&self, url: &str) -> bool {
        match self.agent.get(url).call() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }

    /// Poll `url` until it responds or the deadline passes.
    pub fn wait_for(&self, url: &str) -> Result<()> {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Waiting for {}", url));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let deadline = Instant::now() + self.timeout;
        let result = loop {
            if self.probe(url) {
                break Ok(());
            }
            if Instant::now() + self.interval >= deadline {
                break Err(Error::PreviewUnavailable {
                    urls: url.to_string(),
                });
            }
            thread::sleep(self.interval);
        };

        spinner.finish_and_clear();
        result
    }

    /// Wait for `primary`, then for `fallback`, returning the URL that
    /// answered.
    pub fn wait_for_any(&self, primary: &str, fallback: &str) -> Result<String> {
        if self.wait_for(primary).is_ok() {
            return Ok(primary.to_string());
        }
        warn!(
            "Built template not available at {}, falling back to DEV at {}",
            primary,
            fallback
        );
        self.wait_for(fallback)
            .map(|()| fallback.to_string())
            .map_err(|_| Error::PreviewUnavailable {
                urls: format!("{}, {}", primary, fallback),
            })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve `200 OK` to every request on an ephemeral port.
    pub fn serve_ok() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                );
            }
        });
        port
    }

    /// A port with nothing listening on it.
    pub fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }
}
