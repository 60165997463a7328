//! Headless browser launch and instance lifecycle.

use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{info, warn};

use crate::config::CHROME_USER_AGENT;
use crate::error::{ProcessError, ProcessResult};

/// CDP message timeout. Page-level navigation deadlines are enforced
/// separately by the caller.
const CDP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A launched browser together with its event handler task.
///
/// The handler MUST be aborted when the instance is discarded, otherwise
/// it keeps polling a dead connection. Drop takes care of that.
pub(crate) struct RendererInstance {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl RendererInstance {
    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub(crate) fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Remove the temp profile directory.
    ///
    /// Must run after `browser.wait()` so Chrome has released its file
    /// handles. Blocking on purpose: this is also called from Drop.
    pub(crate) fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!("failed to remove temp profile {}: {e}", path.display());
            }
        }
    }
}

impl Drop for RendererInstance {
    fn drop(&mut self) {
        self.handler.abort();
        if self.user_data_dir.is_some() {
            self.cleanup_temp_dir();
        }
    }
}

/// Launch a fresh headless browser with an isolated temp profile.
pub(crate) async fn launch_renderer() -> ProcessResult<RendererInstance> {
    let user_data_dir =
        std::env::temp_dir().join(format!("readpress_chrome_{}", std::process::id()));
    std::fs::create_dir_all(&user_data_dir)
        .map_err(|e| ProcessError::RenderFailed(format!("user data directory: {e}")))?;

    let browser_config = BrowserConfigBuilder::default()
        .request_timeout(CDP_REQUEST_TIMEOUT)
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir.clone())
        .headless_mode(HeadlessMode::default())
        .arg(format!("--user-agent={CHROME_USER_AGENT}"))
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-web-security")
        .arg("--ignore-certificate-errors")
        .arg("--lang=en")
        .build()
        .map_err(|e| ProcessError::RenderFailed(format!("browser config: {e}")))?;

    info!("launching headless renderer");
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|e| ProcessError::RenderFailed(format!("browser launch: {e}")))?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::error!("browser handler error: {e:?}");
            }
        }
    });

    Ok(RendererInstance {
        browser,
        handler: handler_task,
        user_data_dir: Some(user_data_dir),
    })
}
