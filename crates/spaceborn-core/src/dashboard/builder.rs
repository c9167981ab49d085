//! Builder for creating and configuring Dashboard instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use log::debug;
use tokio_util::sync::CancellationToken;

use super::Dashboard;
use crate::{
    config::{DashboardConfig, EmptyFanoutPolicy},
    error::{DashboardError, Result},
    identity::{AccessControl, IdentityProvider, RolePolicy, StaticIdentity},
    models::{Actor, Role},
    store::{DocumentStore, GuardedStore, SqliteStore},
};

/// Builder for creating and configuring Dashboard instances.
#[derive(Default)]
pub struct DashboardBuilder {
    database_path: Option<PathBuf>,
    store: Option<Arc<dyn DocumentStore>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    access: Option<Arc<dyn AccessControl>>,
    config: DashboardConfig,
    cancel: Option<CancellationToken>,
}

impl DashboardBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/spaceborn/spaceborn.db` or
    /// `~/.local/share/spaceborn/spaceborn.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an already constructed backend instead of a SQLite file. The
    /// database path is ignored when a store is given.
    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Shorthand for a [`StaticIdentity`] acting as `actor`.
    pub fn with_actor(self, actor: Actor) -> Self {
        self.with_identity(Arc::new(StaticIdentity::new(actor)))
    }

    pub fn with_access_control(mut self, access: Arc<dyn AccessControl>) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.config.call_timeout = timeout;
        self
    }

    pub fn with_empty_fanout(mut self, policy: EmptyFanoutPolicy) -> Self {
        self.config.empty_fanout = policy;
        self
    }

    /// Ties every store call to an external cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Builds the configured dashboard.
    ///
    /// Without an identity provider the dashboard acts as an anonymous guest;
    /// without an access policy [`RolePolicy`] is used.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Configuration` for a zero call timeout,
    /// `DashboardError::FileSystem` if the database directory cannot be
    /// created and `DashboardError::Store` if database initialization fails.
    pub async fn build(self) -> Result<Dashboard> {
        if self.config.call_timeout.is_zero() {
            return Err(DashboardError::Configuration {
                message: "call timeout must be greater than zero".to_string(),
            });
        }

        let backend = match self.store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };

                if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| DashboardError::FileSystem {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }

                let store = SqliteStore::new(&db_path);
                store.initialize().await?;
                debug!("Using database {}", db_path.display());
                Arc::new(store) as Arc<dyn DocumentStore>
            }
        };

        let store = GuardedStore::new(
            backend,
            self.config.call_timeout,
            self.cancel.unwrap_or_default(),
        );
        let identity: Arc<dyn IdentityProvider> = match self.identity {
            Some(identity) => identity,
            None => Arc::new(StaticIdentity::new(Actor::new(
                "guest",
                "Guest",
                Role::Guest,
            ))),
        };
        let access: Arc<dyn AccessControl> = match self.access {
            Some(access) => access,
            None => Arc::new(RolePolicy),
        };

        Ok(Dashboard::new(store, self.config, identity, access))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("spaceborn")
            .place_data_file("spaceborn.db")
            .map_err(|e| DashboardError::XdgDirectory(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::params::CreateTopic;

    #[tokio::test]
    async fn test_build_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("dir").join("dash.db");

        let dashboard = DashboardBuilder::new()
            .with_database_path(Some(&db_path))
            .build()
            .await
            .unwrap();
        assert!(db_path.exists());

        let actor = dashboard.current_actor().await.unwrap();
        assert_eq!(actor.role, Role::Guest);
    }

    #[tokio::test]
    async fn test_zero_timeout_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = DashboardBuilder::new()
            .with_database_path(Some(temp_dir.path().join("dash.db")))
            .with_call_timeout(Duration::ZERO)
            .build()
            .await;
        assert!(matches!(result, Err(DashboardError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_cancel_stops_later_calls() {
        let temp_dir = TempDir::new().unwrap();
        let token = CancellationToken::new();
        let dashboard = DashboardBuilder::new()
            .with_database_path(Some(temp_dir.path().join("dash.db")))
            .with_cancellation(token.clone())
            .build()
            .await
            .unwrap();

        dashboard.cancel();
        assert!(token.is_cancelled());

        let err = dashboard
            .create_topic(&CreateTopic {
                title: "Too late".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Cancelled { operation: "insert" }));
    }
}
