//! The schema reconciler.
//!
//! Each operation opens one session, runs its statements in order, and
//! closes the session before returning, whether it succeeded or not. Every
//! mutating operation other than delete ends with a catalog read so the
//! recorded state is what the database reports.

use pgschema_sql::{DropBehavior, SchemaStmt};
use tracing::{info, warn};

use crate::diff::{SchemaChange, diff_schema};
use crate::{Attr, ConnectionProvider, Error, ResourceData, Result, Session};

/// Create, read, update and delete schemas through a connection provider.
pub struct SchemaResource<P> {
    provider: P,
    drop_behavior: DropBehavior,
}

impl<P: ConnectionProvider> SchemaResource<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            drop_behavior: DropBehavior::default(),
        }
    }

    /// Drop schemas with `CASCADE` instead of refusing when they still
    /// contain objects.
    pub fn with_drop_behavior(mut self, behavior: DropBehavior) -> Self {
        self.drop_behavior = behavior;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Create the schema described by `data`, then read it back.
    ///
    /// The owner is only passed to the server when one was given; otherwise
    /// the read picks up whichever role the server assigned.
    pub async fn create<D: ResourceData>(&self, data: &mut D) -> Result<()> {
        let name = match data.get(Attr::Name) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => return Err(Error::Validation { attr: Attr::Name }),
        };
        let stmt = SchemaStmt::create(name.as_str(), data.get(Attr::Owner));

        let session = self.provider.connect().await?;
        let result = async {
            execute(&session, &stmt).await?;
            info!(schema = %name, "created schema");
            data.set_id(Some(name.clone()));
            read_into(&session, data).await
        }
        .await;
        session.close().await;
        result
    }

    /// Refresh `data` from the catalog.
    ///
    /// A schema that no longer exists is not an error: the identity is
    /// cleared so the host can tell it was dropped behind our back.
    pub async fn read<D: ResourceData>(&self, data: &mut D) -> Result<()> {
        if data.id().is_none() {
            return Ok(());
        }

        let session = self.provider.connect().await?;
        let result = read_into(&session, data).await;
        session.close().await;
        result
    }

    /// Apply name and owner changes, in that order, then read back.
    ///
    /// Both changes are validated before anything is sent, so an empty name
    /// or owner never leaves a half-applied update behind.
    pub async fn update<D: ResourceData>(&self, data: &mut D) -> Result<()> {
        let diff = diff_schema(data)?;

        let session = self.provider.connect().await?;
        let result = async {
            for change in &diff.changes {
                execute(&session, &change.to_stmt()).await?;
                match change {
                    SchemaChange::Rename { from, to } => {
                        info!(from = %from, to = %to, "renamed schema");
                        data.set(Attr::Name, to.clone());
                        data.set_id(Some(to.clone()));
                    }
                    SchemaChange::Owner { schema, to } => {
                        info!(schema = %schema, owner = %to, "changed schema owner");
                    }
                }
            }
            read_into(&session, data).await
        }
        .await;
        session.close().await;
        result
    }

    /// Drop the schema and clear the identity.
    ///
    /// If the drop fails (the schema is missing, or still holds objects) the
    /// identity is left as it was so the host can try again.
    pub async fn delete<D: ResourceData>(&self, data: &mut D) -> Result<()> {
        let name = match data.id().or_else(|| data.get(Attr::Name)) {
            Some(name) => name.to_owned(),
            None => return Ok(()),
        };
        let stmt = SchemaStmt::drop(name.as_str(), self.drop_behavior);

        let session = self.provider.connect().await?;
        let result = execute(&session, &stmt).await;
        session.close().await;
        result?;

        info!(schema = %name, "dropped schema");
        data.set_id(None);
        Ok(())
    }

    /// Adopt an existing schema by name.
    ///
    /// Leaves the identity cleared when no such schema exists.
    pub async fn import<D: ResourceData>(&self, data: &mut D, name: &str) -> Result<()> {
        data.set_id(Some(name.to_owned()));
        self.read(data).await
    }
}

async fn execute<S: Session>(session: &S, stmt: &SchemaStmt) -> Result<()> {
    session
        .execute(stmt)
        .await
        .map_err(|source| Error::Execution {
            action: stmt.action(),
            schema: stmt.schema().as_str().to_owned(),
            source,
        })
}

async fn read_into<S: Session, D: ResourceData>(session: &S, data: &mut D) -> Result<()> {
    let Some(id) = data.id().map(str::to_owned) else {
        return Ok(());
    };

    match session.lookup_schema(&id).await {
        Ok(Some(record)) => {
            data.set(Attr::Name, record.name.clone());
            data.set(Attr::Owner, record.owner);
            data.set_id(Some(record.name));
            Ok(())
        }
        Ok(None) => {
            warn!(schema = %id, "schema not found, clearing state");
            data.set_id(None);
            Ok(())
        }
        Err(source) => Err(Error::Execution {
            action: "read schema",
            schema: id,
            source,
        }),
    }
}
