//! Per-handle curl settings shared by the probe and the range workers.

use crate::config::MtdlConfig;

/// Options applied to every curl Easy handle of a run.
#[derive(Debug, Clone, Default)]
pub struct CurlOptions {
    pub follow_redirects: bool,
    pub user_agent: Option<String>,
    /// Receive buffer size (CURLOPT_BUFFERSIZE).
    pub buffer_size: Option<usize>,
    /// Receive cap for this handle (CURLOPT_MAX_RECV_SPEED_LARGE).
    pub max_recv_speed: Option<u64>,
}

impl CurlOptions {
    /// Builds options for one handle out of `handles` concurrent ones; the configured
    /// bandwidth cap is split evenly so the total stays under it.
    pub fn per_handle(cfg: &MtdlConfig, handles: usize) -> Self {
        let handles = handles.max(1) as u64;
        Self {
            follow_redirects: cfg.follow_redirects,
            user_agent: cfg.user_agent.clone(),
            buffer_size: cfg.buffer_size,
            max_recv_speed: cfg.max_bytes_per_sec.map(|total| (total / handles).max(1)),
        }
    }

    pub(crate) fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.follow_location(self.follow_redirects)?;
        if self.follow_redirects {
            easy.max_redirections(10)?;
        }
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }
        if let Some(sz) = self.buffer_size {
            easy.buffer_size(sz)?;
        }
        if let Some(speed) = self.max_recv_speed {
            easy.max_recv_speed(speed)?;
        }
        Ok(())
    }
}
