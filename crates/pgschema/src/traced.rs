//! Traced client wrapper.
//!
//! Every statement and catalog query goes through [`TracedConn`], which runs
//! it inside a `tracing::debug_span!` carrying the SQL and records the
//! outcome on the span.

use pgschema_sql::{LOOKUP_SCHEMA, SchemaStmt};
use tokio_postgres::{Client, Error, Row};
use tracing::Instrument;

/// A borrowed client that logs what it runs.
///
/// # Example
///
/// ```ignore
/// use pgschema::{ClientExt, SchemaStmt};
///
/// let stmt = SchemaStmt::create("audit", None);
/// client.traced().execute(&stmt).await?;
/// ```
pub struct TracedConn<'a> {
    client: &'a Client,
}

impl<'a> TracedConn<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Run a DDL statement, returning the number of rows affected.
    pub async fn execute(&self, stmt: &SchemaStmt) -> Result<u64, Error> {
        let sql = stmt.to_string();
        let span = tracing::debug_span!(
            "db.execute",
            action = stmt.action(),
            sql = %sql,
            affected = tracing::field::Empty,
        );
        let affected = self
            .client
            .execute(sql.as_str(), &[])
            .instrument(span.clone())
            .await?;
        span.record("affected", affected);
        Ok(affected)
    }

    /// Fetch the catalog row for a schema, if there is one.
    pub async fn lookup_schema(&self, name: &str) -> Result<Option<Row>, Error> {
        let span = tracing::debug_span!(
            "db.query",
            sql = LOOKUP_SCHEMA,
            schema = %name,
            rows = tracing::field::Empty,
        );
        let row = self
            .client
            .query_opt(LOOKUP_SCHEMA, &[&name])
            .instrument(span.clone())
            .await?;
        span.record("rows", if row.is_some() { 1u64 } else { 0u64 });
        Ok(row)
    }
}

/// Extension trait to get a traced wrapper from a client.
pub trait ClientExt {
    fn traced(&self) -> TracedConn<'_>;
}

impl ClientExt for Client {
    fn traced(&self) -> TracedConn<'_> {
        TracedConn::new(self)
    }
}
