//! Connection providers.

use tokio_postgres::NoTls;

use crate::session::{BoxFuture, PgSession, Session};
use crate::{Error, Result};

/// Hands out a fresh session for each reconciler operation.
pub trait ConnectionProvider: Send + Sync {
    type Session: Session + 'static;

    /// Open a new session.
    fn connect(&self) -> BoxFuture<'_, Result<Self::Session>>;
}

/// Opens a dedicated tokio-postgres connection per operation.
///
/// Connection settings are passed in explicitly; nothing is read from the
/// environment here.
#[derive(Clone, Debug)]
pub struct PgProvider {
    config: tokio_postgres::Config,
}

impl PgProvider {
    pub fn new(config: tokio_postgres::Config) -> Self {
        Self { config }
    }

    /// Build a provider from a connection string, either URL
    /// (`postgres://user@host/db`) or key/value (`host=... user=...`) form.
    pub fn from_url(url: &str) -> Result<Self> {
        let config = url
            .parse::<tokio_postgres::Config>()
            .map_err(|e| Error::Connection(e.into()))?;
        Ok(Self::new(config))
    }
}

impl ConnectionProvider for PgProvider {
    type Session = PgSession;

    fn connect(&self) -> BoxFuture<'_, Result<PgSession>> {
        Box::pin(async move {
            let (client, connection) = self
                .config
                .connect(NoTls)
                .await
                .map_err(|e| Error::Connection(e.into()))?;

            let driver = tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::error!(error = %e, "postgres connection error");
                }
            });

            tracing::debug!("opened postgres session");
            Ok(PgSession::new(client, driver))
        })
    }
}
