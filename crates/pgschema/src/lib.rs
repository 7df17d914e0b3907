//! Declarative PostgreSQL schemas.
//!
//! A schema resource has two attributes, `name` and `owner`. This crate
//! turns the difference between what a host wants and what it last recorded
//! into `CREATE SCHEMA`, `ALTER SCHEMA ... RENAME TO`,
//! `ALTER SCHEMA ... OWNER TO` and `DROP SCHEMA` statements, runs them, and
//! reads `pg_catalog.pg_namespace` afterwards so the recorded state is what
//! the database says it is.
//!
//! ```ignore
//! use pgschema::{PgProvider, ResourceState, SchemaResource};
//!
//! let resource = SchemaResource::new(PgProvider::from_url("postgres://postgres@localhost")?);
//!
//! let mut state = ResourceState::planned("analytics", Some("reporting".into()));
//! resource.create(&mut state).await?;
//! assert_eq!(state.record().unwrap().owner, "reporting");
//! ```
//!
//! The host's state store is abstracted as [`ResourceData`]; the connection
//! as [`ConnectionProvider`] and [`Session`]. Both seams exist so the
//! reconciler can be driven by something other than a live database.

mod diff;
mod error;
mod provider;
mod reconcile;
mod resource;
mod session;
mod traced;

pub use diff::{SchemaChange, SchemaDiff, diff_schema};
pub use error::{BoxError, Error};
pub use provider::{ConnectionProvider, PgProvider};
pub use reconcile::SchemaResource;
pub use resource::{Attr, ResourceData, ResourceState, SchemaRecord};
pub use session::{BoxFuture, PgSession, Session};
pub use traced::{ClientExt, TracedConn};

pub use pgschema_sql::{DropBehavior, SchemaStmt};

/// Result type for pgschema operations.
pub type Result<T> = std::result::Result<T, Error>;
