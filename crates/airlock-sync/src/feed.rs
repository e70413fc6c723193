//! Status feed connection manager.
//!
//! [`StatusFeed`] owns the single live WebSocket connection to the
//! appliance, re-establishes it automatically after unintended closure, and
//! suppresses reconnection after explicit shutdown. Lifecycle is expressed
//! as owned tokio tasks rather than registered callbacks: one driver task
//! per connection attempt, and at most one pending retry-timer task, both
//! held as abortable handles so cancellation is structural.
//!
//! Failure semantics: nothing here surfaces an error to callers. Transport
//! failures, malformed frames and unreachable backends all degrade to
//! "not currently connected, will retry", observable via
//! [`StatusFeed::is_connected`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use airlock_core::{BackoffPolicy, FeedEnvelope};
use airlock_settings::ConsoleSettings;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, trace, warn};

use crate::collaborators::{Collaborators, CredentialSource};
use crate::dispatch::Dispatcher;
use crate::table::TunnelTable;

/// Where and how to reach the status feed.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Appliance host (and optional port), e.g. `10.0.0.1:8443`.
    pub host: String,
    /// Selects `wss` when true, `ws` otherwise — matching the scheme the
    /// console itself is served over.
    pub secure: bool,
    /// Fixed endpoint path.
    pub path: String,
    /// Reconnect delay policy.
    pub backoff: BackoffPolicy,
}

impl FeedConfig {
    /// Build a feed config from loaded console settings.
    #[must_use]
    pub fn from_settings(settings: &ConsoleSettings) -> Self {
        Self {
            host: settings.console.host.clone(),
            secure: settings.console.secure,
            path: settings.feed.path.clone(),
            backoff: BackoffPolicy::new(settings.feed.base_delay_ms, settings.feed.max_delay_ms),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::from_settings(&ConsoleSettings::default())
    }
}

/// The status feed: at most one live connection, automatic reconnect.
///
/// Construct with [`StatusFeed::new`], start with [`connect`], and tear
/// down with [`disconnect`]. The handle is cheap to clone (all state is
/// behind one `Arc`), so the UI layer can hold one copy for the
/// connectivity indicator while the shell owns another.
///
/// [`connect`]: StatusFeed::connect
/// [`disconnect`]: StatusFeed::disconnect
#[derive(Clone)]
pub struct StatusFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    config: FeedConfig,
    auth: Arc<dyn CredentialSource>,
    dispatcher: Dispatcher,
    tunnels: Arc<TunnelTable>,
    connected: AtomicBool,
    attempts: AtomicU32,
    should_reconnect: AtomicBool,
    /// Driver task for the live connection. Exclusively owned here.
    conn_task: Mutex<Option<JoinHandle<()>>>,
    /// Pending retry timer. At most one outstanding at any time.
    retry_task: Mutex<Option<JoinHandle<()>>>,
}

impl StatusFeed {
    /// Create a feed for `config`, wired to the given collaborators.
    ///
    /// No connection is attempted until [`connect`](Self::connect).
    #[must_use]
    pub fn new(config: FeedConfig, collaborators: &Collaborators) -> Self {
        let tunnels = Arc::new(TunnelTable::new());
        let dispatcher = Dispatcher::new(Arc::clone(&tunnels), collaborators);
        Self {
            inner: Arc::new(FeedInner {
                config,
                auth: Arc::clone(&collaborators.auth),
                dispatcher,
                tunnels,
                connected: AtomicBool::new(false),
                attempts: AtomicU32::new(0),
                should_reconnect: AtomicBool::new(false),
                conn_task: Mutex::new(None),
                retry_task: Mutex::new(None),
            }),
        }
    }

    /// Open the feed connection.
    ///
    /// A no-op when no access credential is available — an unauthenticated
    /// caller cannot open the feed, and the silence is deliberate. Otherwise
    /// sets intent-to-reconnect, cancels any pending retry, discards any
    /// existing connection and spawns a fresh driver.
    pub fn connect(&self) {
        if self.inner.auth.access_token().is_none() {
            debug!("no access credential, skipping status feed connection");
            return;
        }
        self.inner.should_reconnect.store(true, Ordering::SeqCst);
        self.inner.spawn_connection();
    }

    /// Close the feed and suppress further reconnection.
    ///
    /// Idempotent. Cancels the pending retry timer (if any), aborts the
    /// live connection driver, and resets connection state.
    pub fn disconnect(&self) {
        let inner = &self.inner;
        inner.should_reconnect.store(false, Ordering::SeqCst);
        inner.cancel_retry();
        if let Some(task) = inner.conn_task.lock().take() {
            task.abort();
        }
        inner.connected.store(false, Ordering::SeqCst);
        inner.attempts.store(0, Ordering::SeqCst);
        info!("status feed disconnected");
    }

    /// Whether a connection is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Consecutive failed attempts since the last successful open.
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    /// The tunnel-status table this feed maintains.
    #[must_use]
    pub fn tunnels(&self) -> Arc<TunnelTable> {
        Arc::clone(&self.inner.tunnels)
    }
}

impl FeedInner {
    /// `{ws|wss}://{host}{path}?token={token}`
    fn feed_url(&self, token: &str) -> String {
        let scheme = if self.config.secure { "wss" } else { "ws" };
        format!(
            "{scheme}://{}{}?token={token}",
            self.config.host, self.config.path
        )
    }

    /// Discard any prior connection and spawn a fresh driver task.
    ///
    /// Tight-flap behavior is discard-and-replace: a prior driver still
    /// mid-handshake is aborted, not waited for.
    fn spawn_connection(self: &Arc<Self>) {
        let Some(token) = self.auth.access_token() else {
            debug!("no access credential, skipping status feed connection");
            return;
        };
        let url = self.feed_url(&token);
        self.cancel_retry();

        let mut guard = self.conn_task.lock();
        if let Some(previous) = guard.take() {
            previous.abort();
        }
        let inner = Arc::clone(self);
        *guard = Some(tokio::spawn(run_connection(inner, url)));
    }

    /// Abort and clear the pending retry timer, if one is outstanding.
    fn cancel_retry(&self) {
        if let Some(task) = self.retry_task.lock().take() {
            task.abort();
        }
    }

    /// Close path: mark disconnected and, when reconnect is intended,
    /// schedule exactly one retry.
    fn on_close(self: &Arc<Self>) {
        self.connected.store(false, Ordering::SeqCst);
        if !self.should_reconnect.load(Ordering::SeqCst) {
            return;
        }

        let attempt = self.attempts.load(Ordering::SeqCst);
        let delay = self.config.backoff.delay(attempt);
        debug!(
            attempt,
            delay_ms = self.config.backoff.delay_ms(attempt),
            "scheduling status feed reconnect"
        );

        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Remove our own handle before respawning so the spawn path's
            // cancel_retry does not abort the task that is running it.
            let _ = inner.retry_task.lock().take();
            if !inner.should_reconnect.load(Ordering::SeqCst) {
                return;
            }
            let _ = inner.attempts.fetch_add(1, Ordering::SeqCst);
            inner.spawn_connection();
        });

        let mut guard = self.retry_task.lock();
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }
}

/// One connection attempt: open, read frames until the stream ends, then
/// hand control to the close path.
///
/// Transport errors take no direct action beyond a log line — they
/// terminate the read loop and recovery happens in `on_close`, the same as
/// any other closure.
async fn run_connection(inner: Arc<FeedInner>, url: String) {
    match connect_async(&url).await {
        Ok((mut ws, _response)) => {
            info!(host = %inner.config.host, "status feed connected");
            inner.connected.store(true, Ordering::SeqCst);
            inner.attempts.store(0, Ordering::SeqCst);

            while let Some(frame) = ws.next().await {
                match frame {
                    Ok(Message::Text(text)) => match FeedEnvelope::parse_frame(&text) {
                        Some(envelope) => inner.dispatcher.dispatch(&envelope),
                        None => trace!("dropping malformed feed frame"),
                    },
                    Ok(Message::Close(_)) => {
                        debug!("status feed closed by appliance");
                        break;
                    }
                    // The protocol carries no binary frames; ping/pong is
                    // handled by the transport.
                    Ok(_) => {}
                    Err(err) => {
                        warn!(%err, "status feed transport error");
                        break;
                    }
                }
            }
        }
        Err(err) => warn!(%err, "status feed connection failed"),
    }
    inner.on_close();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
