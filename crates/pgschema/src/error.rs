use crate::Attr;
use pgschema_sql::Ident;
use thiserror::Error;

/// A boxed driver error.
///
/// Sessions report statement failures with this so that any backend, not
/// only tokio-postgres, can plug into the reconciler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// No connection could be obtained.
    #[error("error connecting to postgres: {0}")]
    Connection(#[source] BoxError),

    /// An attribute was set to a value the database cannot accept. Raised
    /// before any statement is sent.
    #[error("error setting schema {attr} to an empty string")]
    Validation { attr: Attr },

    /// An update needs the schema's current name, and there is none.
    #[error("schema has not been created or imported, nothing to rename")]
    NoIdentity,

    /// A statement or catalog query failed.
    #[error("error trying to {action} {}: {source}", Ident(schema))]
    Execution {
        action: &'static str,
        schema: String,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub fn is_execution(&self) -> bool {
        matches!(self, Error::Execution { .. })
    }
}
