//! Per-operation database sessions.

use std::future::Future;
use std::pin::Pin;

use pgschema_sql::SchemaStmt;
use tokio::task::JoinHandle;

use crate::traced::ClientExt;
use crate::{BoxError, SchemaRecord};

/// A boxed, sendable future, the shape every session method returns.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One open connection, used for the statements of a single operation.
///
/// The reconciler only ever talks to the database through this trait: it
/// runs schema DDL and reads the namespace catalog.
pub trait Session: Send + Sync {
    /// Run a single DDL statement.
    fn execute<'a>(&'a self, stmt: &'a SchemaStmt) -> BoxFuture<'a, Result<(), BoxError>>;

    /// Look a schema up in the catalog. `Ok(None)` means it does not exist.
    fn lookup_schema<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<SchemaRecord>, BoxError>>;

    /// Release the connection.
    fn close(self) -> BoxFuture<'static, ()>
    where
        Self: Sized;
}

/// A session over a dedicated tokio-postgres connection.
pub struct PgSession {
    client: tokio_postgres::Client,
    driver: JoinHandle<()>,
}

impl PgSession {
    pub(crate) fn new(client: tokio_postgres::Client, driver: JoinHandle<()>) -> Self {
        Self { client, driver }
    }

    /// The underlying client, for anything the session does not cover.
    pub fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }
}

impl Session for PgSession {
    fn execute<'a>(&'a self, stmt: &'a SchemaStmt) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            self.client.traced().execute(stmt).await?;
            Ok(())
        })
    }

    fn lookup_schema<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<SchemaRecord>, BoxError>> {
        Box::pin(async move {
            let Some(row) = self.client.traced().lookup_schema(name).await? else {
                return Ok(None);
            };
            Ok(Some(SchemaRecord {
                name: row.try_get(0)?,
                owner: row.try_get(1)?,
            }))
        })
    }

    fn close(self) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            // Dropping the client ends the connection; wait for the driver
            // task to observe it.
            drop(self.client);
            if let Err(e) = self.driver.await {
                tracing::warn!(error = %e, "postgres connection task did not finish cleanly");
            }
        })
    }
}
