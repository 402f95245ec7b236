//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{PostRepository, UserRepository};
use scribe_core::services::{AuthService, PostService};
use scribe_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

#[cfg(feature = "postgres")]
use sea_orm::DbConn;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    /// `None` when running on the in-memory store.
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DbConn>>,
}

impl AppState {
    /// Build the application state, falling back to in-memory storage
    /// when the database is not configured or unreachable.
    pub async fn new(config: &AppConfig) -> Self {
        if let Some(state) = Self::connect_postgres(config).await {
            tracing::info!("Application state initialized (postgres)");
            return state;
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(config.jwt.clone())
    }

    /// State backed by process-local repositories. Data is lost on restart.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::assemble(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            jwt,
        )
    }

    fn assemble(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        jwt: JwtConfig,
    ) -> Self {
        let auth = AuthService::new(
            users.clone(),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(jwt)),
        );

        Self {
            auth: Arc::new(auth),
            posts: Arc::new(PostService::new(posts, users)),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(config: &AppConfig) -> Option<Self> {
        use scribe_infra::{PostgresPostRepository, PostgresUserRepository};

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match db_config.connect().await {
            Ok(conn) => {
                let conn = Arc::new(conn);
                let mut state = Self::assemble(
                    Arc::new(PostgresUserRepository::new(conn.clone())),
                    Arc::new(PostgresPostRepository::new(conn.clone())),
                    config.jwt.clone(),
                );
                state.db = Some(conn);
                Some(state)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_postgres(_config: &AppConfig) -> Option<Self> {
        tracing::info!("Running without postgres feature - using in-memory repository");
        None
    }
}
