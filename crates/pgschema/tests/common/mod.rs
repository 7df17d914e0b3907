//! In-memory stand-in for a PostgreSQL server.
//!
//! Models just enough of the namespace catalog to run the reconciler:
//! schemas with owners, known roles, and schemas that still hold objects.
//! Every DDL statement the reconciler sends is recorded as rendered SQL.

// Each test binary compiles this module separately.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use pgschema::{
    BoxError, BoxFuture, ConnectionProvider, DropBehavior, Error, Result, SchemaRecord,
    SchemaResource, SchemaStmt, Session,
};

pub const CONNECTING_ROLE: &str = "postgres";

#[derive(Debug, Default)]
pub struct Catalog {
    /// Schema name to owning role.
    pub schemas: BTreeMap<String, String>,
    pub roles: BTreeSet<String>,
    /// Schemas that still contain objects.
    pub non_empty: BTreeSet<String>,
    /// Rendered DDL, in the order it was received.
    pub statements: Vec<String>,
    pub lookups: Vec<String>,
    pub opened: usize,
    pub closed: usize,
    pub refuse_connections: bool,
    pub fail_lookups: bool,
}

impl Catalog {
    fn require_role(&self, role: &str) -> std::result::Result<(), BoxError> {
        if self.roles.contains(role) {
            Ok(())
        } else {
            Err(format!("role \"{}\" does not exist", role).into())
        }
    }

    fn require_schema(&self, name: &str) -> std::result::Result<(), BoxError> {
        if self.schemas.contains_key(name) {
            Ok(())
        } else {
            Err(format!("schema \"{}\" does not exist", name).into())
        }
    }

    fn apply(&mut self, stmt: &SchemaStmt) -> std::result::Result<(), BoxError> {
        self.statements.push(stmt.to_string());

        match stmt {
            SchemaStmt::Create { name, owner } => {
                if self.schemas.contains_key(name.as_str()) {
                    return Err(format!("schema \"{}\" already exists", name.as_str()).into());
                }
                let owner = match owner {
                    Some(owner) => {
                        self.require_role(owner.as_str())?;
                        owner.as_str().to_owned()
                    }
                    None => CONNECTING_ROLE.to_owned(),
                };
                self.schemas.insert(name.as_str().to_owned(), owner);
            }
            SchemaStmt::Rename { from, to } => {
                self.require_schema(from.as_str())?;
                if self.schemas.contains_key(to.as_str()) {
                    return Err(format!("schema \"{}\" already exists", to.as_str()).into());
                }
                if let Some(owner) = self.schemas.remove(from.as_str()) {
                    self.schemas.insert(to.as_str().to_owned(), owner);
                }
                if self.non_empty.remove(from.as_str()) {
                    self.non_empty.insert(to.as_str().to_owned());
                }
            }
            SchemaStmt::OwnerTo { name, owner } => {
                self.require_schema(name.as_str())?;
                self.require_role(owner.as_str())?;
                self.schemas
                    .insert(name.as_str().to_owned(), owner.as_str().to_owned());
            }
            SchemaStmt::Drop { name, behavior } => {
                self.require_schema(name.as_str())?;
                if *behavior == DropBehavior::Restrict && self.non_empty.contains(name.as_str()) {
                    return Err(format!(
                        "cannot drop schema {} because other objects depend on it",
                        name.as_str()
                    )
                    .into());
                }
                self.schemas.remove(name.as_str());
                self.non_empty.remove(name.as_str());
            }
        }
        Ok(())
    }

    fn lookup(&mut self, name: &str) -> std::result::Result<Option<SchemaRecord>, BoxError> {
        self.lookups.push(name.to_owned());
        if self.fail_lookups {
            return Err("permission denied for table pg_namespace".into());
        }
        Ok(self.schemas.get(name).map(|owner| SchemaRecord {
            name: name.to_owned(),
            owner: owner.clone(),
        }))
    }
}

/// A fake server. Clones share the same catalog.
#[derive(Clone, Debug)]
pub struct FakeDb {
    catalog: Arc<Mutex<Catalog>>,
}

impl FakeDb {
    pub fn new() -> Self {
        let catalog = Catalog {
            roles: [CONNECTING_ROLE, "alice", "bob"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            ..Catalog::default()
        };
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        let mut catalog = self.catalog.lock().unwrap();
        f(&mut catalog)
    }

    pub fn resource(&self) -> SchemaResource<FakeDb> {
        SchemaResource::new(self.clone())
    }

    pub fn add_schema(&self, name: &str, owner: &str) {
        self.with(|c| c.schemas.insert(name.to_owned(), owner.to_owned()));
    }

    pub fn statements(&self) -> Vec<String> {
        self.with(|c| c.statements.clone())
    }

    pub fn owner_of(&self, name: &str) -> Option<String> {
        self.with(|c| c.schemas.get(name).cloned())
    }

    /// Every session that was opened has been closed again.
    pub fn assert_sessions_released(&self) {
        let (opened, closed) = self.with(|c| (c.opened, c.closed));
        assert_eq!(opened, closed, "{opened} sessions opened, {closed} closed");
    }
}

impl ConnectionProvider for FakeDb {
    type Session = FakeSession;

    fn connect(&self) -> BoxFuture<'_, Result<FakeSession>> {
        Box::pin(async move {
            self.with(|c| {
                if c.refuse_connections {
                    return Err(Error::Connection("connection refused".into()));
                }
                c.opened += 1;
                Ok(FakeSession { db: self.clone() })
            })
        })
    }
}

pub struct FakeSession {
    db: FakeDb,
}

impl Session for FakeSession {
    fn execute<'a>(
        &'a self,
        stmt: &'a SchemaStmt,
    ) -> BoxFuture<'a, std::result::Result<(), BoxError>> {
        Box::pin(async move { self.db.with(|c| c.apply(stmt)) })
    }

    fn lookup_schema<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, std::result::Result<Option<SchemaRecord>, BoxError>> {
        Box::pin(async move { self.db.with(|c| c.lookup(name)) })
    }

    fn close(self) -> BoxFuture<'static, ()> {
        Box::pin(async move { self.db.with(|c| c.closed += 1) })
    }
}
