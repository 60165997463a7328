//! Shared headless renderer handle.
//!
//! One browser instance serves the whole process. It is launched lazily on
//! first use, health-checked before reuse, and replaced transparently when
//! the underlying process dies. Callers only ever see [`Renderer::render`].

mod launch;

use chromiumoxide::page::Page;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ProcessError, ProcessResult};
use launch::{RendererInstance, launch_renderer};

/// Handle to the process-wide headless browser.
///
/// Cheap to clone. All clones share the same instance slot, so concurrent
/// callers reuse one browser rather than racing to launch several.
#[derive(Clone)]
pub struct Renderer {
    instance: Arc<Mutex<Option<RendererInstance>>>,
    render_timeout: Duration,
    settle_delay: Duration,
}

impl Renderer {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            instance: Arc::new(Mutex::new(None)),
            render_timeout: config.render_timeout,
            settle_delay: config.settle_delay,
        }
    }

    /// Load `url` in the headless browser and return the DOM serialized as
    /// HTML after scripts have run.
    ///
    /// The page session runs on its own task, so the tab is closed even
    /// when the caller is cancelled mid-load by an outer deadline. A close
    /// failure never masks the load outcome.
    pub async fn render(&self, url: &str) -> ProcessResult<String> {
        let page = self.open_page().await?;

        let render_timeout = self.render_timeout;
        let settle_delay = self.settle_delay;
        let target = url.to_string();
        let session = tokio::spawn(async move {
            let outcome = match tokio::time::timeout(
                render_timeout,
                load_page(&page, &target, settle_delay),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ProcessError::RenderTimeout(render_timeout.as_secs())),
            };

            if let Err(e) = page.close().await {
                warn!("page close failed: {e}");
            }

            outcome
        });

        // Dropping `session` on caller cancellation detaches the task; the
        // close above still runs.
        let outcome = match session.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ProcessError::RenderFailed(format!("render task: {e}"))),
        };

        if outcome.is_err() {
            self.discard_if_dead().await;
        }

        outcome
    }

    /// Open a blank page on a healthy browser, launching or relaunching the
    /// shared instance as needed.
    ///
    /// Navigation happens outside the lock so a slow page never blocks other
    /// callers from reaching the browser.
    async fn open_page(&self) -> ProcessResult<Page> {
        let mut guard = self.instance.lock().await;

        if let Some(instance) = guard.as_ref() {
            match instance.browser().version().await {
                Ok(_) => debug!("renderer health check passed"),
                Err(e) => {
                    warn!("renderer health check failed: {e}, relaunching");
                    discard_instance(guard.take()).await;
                }
            }
        }

        if guard.is_none() {
            *guard = Some(launch_renderer().await?);
        }

        let instance = guard
            .as_ref()
            .ok_or_else(|| ProcessError::RenderFailed("renderer unavailable".to_string()))?;
        match instance.browser().new_page("about:blank").await {
            Ok(page) => Ok(page),
            Err(e) => {
                // A page that cannot even open means the instance is suspect.
                warn!("page creation failed: {e}, discarding renderer");
                discard_instance(guard.take()).await;
                Err(ProcessError::RenderFailed(format!("new page: {e}")))
            }
        }
    }

    /// Drop the shared instance if the browser no longer answers, so the
    /// next call launches a fresh one.
    async fn discard_if_dead(&self) {
        let mut guard = self.instance.lock().await;
        if let Some(instance) = guard.as_ref()
            && instance.browser().version().await.is_err()
        {
            warn!("renderer lost after page failure, discarding instance");
            discard_instance(guard.take()).await;
        }
    }

    /// Close the browser if one is running. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        let mut guard = self.instance.lock().await;
        if let Some(mut instance) = guard.take() {
            info!("shutting down renderer");
            if let Err(e) = instance.browser_mut().close().await {
                warn!("failed to close renderer cleanly: {e}");
            }
            if let Err(e) = instance.browser_mut().wait().await {
                warn!("failed to wait for renderer exit: {e}");
            }
            instance.cleanup_temp_dir();
        }
    }
}

/// Navigate a fresh page and serialize its DOM.
async fn load_page(page: &Page, url: &str, settle_delay: Duration) -> ProcessResult<String> {
    page.goto(url)
        .await
        .map_err(|e| ProcessError::RenderFailed(format!("navigation: {e}")))?;
    page.wait_for_navigation()
        .await
        .map_err(|e| ProcessError::RenderFailed(format!("page load: {e}")))?;

    // Nudge lazy-loaded media into view, then give scripts a moment.
    if let Err(e) = page.evaluate("window.scrollBy(0, 500)").await {
        debug!("scroll nudge failed: {e}");
    }
    tokio::time::sleep(settle_delay).await;

    page.content()
        .await
        .map_err(|e| ProcessError::RenderFailed(format!("content: {e}")))
}

/// Best-effort teardown of a (possibly crashed) instance.
async fn discard_instance(instance: Option<RendererInstance>) {
    if let Some(mut dead) = instance {
        let _ = dead.browser_mut().close().await;
        let _ = dead.browser_mut().wait().await;
        dead.cleanup_temp_dir();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    // `render` runs its page session on a spawned task so that an outer
    // deadline cancelling the caller cannot skip the tab cleanup. Pin the
    // detachment behavior this depends on: dropping the handle must leave
    // the task running to completion.
    #[tokio::test]
    async fn dropped_session_handle_still_runs_cleanup() {
        let cleaned = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cleaned);

        let session = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(true, Ordering::SeqCst);
        });

        // What a pipeline deadline does to an in-flight render: the future
        // awaiting the session is dropped.
        drop(session);

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cleaned.load(Ordering::SeqCst));
    }
}
