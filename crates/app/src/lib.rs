//! Chatrelay application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use chatrelay_attachments::{
    AttachmentRepository, AttachmentService, AttachmentStore, AttachmentsState, FileStorage,
};
use chatrelay_common::config::Config;
use chatrelay_conversations::{
    ChatService, ConversationsRepositories, ConversationsState, ListingService, ThreadService,
};
use chatrelay_llm::LlmService;
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

/// Stores and gateways the application is built from
#[derive(Clone)]
pub struct AppDeps {
    pub conversations: ConversationsRepositories,
    pub attachments: Arc<dyn AttachmentStore>,
    pub llm: Arc<dyn LlmService>,
}

impl AppDeps {
    /// PostgreSQL-backed stores sharing one pool
    pub fn postgres(pool: PgPool, llm: Arc<dyn LlmService>) -> Self {
        Self {
            conversations: ConversationsRepositories::new(pool.clone()),
            attachments: Arc::new(AttachmentRepository::new(pool)),
            llm,
        }
    }

    /// In-memory stores, for tests and database-less runs
    #[cfg(feature = "test-support")]
    pub fn in_memory(llm: Arc<dyn LlmService>) -> Self {
        Self {
            conversations: ConversationsRepositories::in_memory(),
            attachments: Arc::new(chatrelay_attachments::InMemoryAttachmentStore::new()),
            llm,
        }
    }
}

/// Create the main application router with all routes
pub async fn create_app(config: &Config, deps: AppDeps) -> Result<Router, anyhow::Error> {
    let storage = FileStorage::new(&config.upload_dir);
    storage.ensure_root().await?;

    let attachments = AttachmentService::new(
        deps.attachments,
        storage.clone(),
        config.public_base_url.clone(),
    );

    let conversations_state = ConversationsState {
        chat: ChatService::new(deps.conversations.clone(), deps.llm),
        listing: ListingService::new(deps.conversations.clone()),
        thread: ThreadService::new(deps.conversations, attachments.clone()),
    };
    let attachments_state = AttachmentsState {
        service: attachments,
    };

    // Compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(chatrelay_conversations::routes().with_state(conversations_state))
        .merge(chatrelay_attachments::routes().with_state(attachments_state))
        .nest_service("/uploads", ServeDir::new(storage.root()));

    Ok(app)
}

/// Build the CORS layer from a comma-separated origin list; `*` allows any
pub fn build_cors_layer(allowed_origins: &str) -> CorsLayer {
    let origins: Vec<&str> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() || origins.contains(&"*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
