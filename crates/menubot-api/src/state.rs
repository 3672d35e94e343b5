//! Application state wiring the engine, session store and reply sender.
//!
//! AppState holds the concrete instances used by both the CLI and the
//! webhook server. The session store is owned by the engine; the server
//! reaches it through `engine.sessions()` for stats and shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use menubot_core::conversation::ConversationEngine;
use menubot_core::delivery::BoxReplySender;
use menubot_core::flow::FlowRegistry;
use menubot_core::session::SessionStore;
use menubot_infra::flows::resolve_flows;
use menubot_infra::whatsapp::WhatsAppClient;
use menubot_types::config::AppConfig;

/// Counters reported by `/stats`.
#[derive(Debug)]
pub struct ServiceMetrics {
    started_at: Instant,
    messages_processed: AtomicU64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            messages_processed: AtomicU64::new(0),
        }
    }

    /// Record one inbound message the engine produced a reply for.
    pub fn record_processed(&self) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages_processed(&self) -> u64 {
        self.messages_processed.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConversationEngine>,
    pub sender: Arc<BoxReplySender>,
    pub config: Arc<AppConfig>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Wire state from explicit parts.
    pub fn new(engine: ConversationEngine, sender: BoxReplySender, config: AppConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            sender: Arc::new(sender),
            config: Arc::new(config),
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }

    /// Build the production state: flow table, session store, WhatsApp client.
    ///
    /// Does not start eviction; the caller owns the store lifecycle.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let flows = resolve_flows(&config).await?;
        if let Err(e) = flows.validate() {
            tracing::warn!("{e}; affected messages will fail with flow not found");
        }

        let sessions = SessionStore::new(config.session.ttl())
            .with_span(tracing::info_span!("session_store"));
        let engine = ConversationEngine::new(Arc::new(flows), Arc::new(sessions))
            .with_span(tracing::info_span!("conversation"));

        let client = WhatsAppClient::new(&config.whatsapp)?;
        if !client.is_configured() {
            tracing::warn!("WhatsApp access token or phone number id missing; replies will not be delivered");
        }

        Ok(Self::new(engine, BoxReplySender::new(client), config))
    }

    pub fn flows(&self) -> &FlowRegistry {
        self.engine.flows()
    }

    pub fn sessions(&self) -> &SessionStore {
        self.engine.sessions()
    }
}
