//! Schema DDL statements.

use std::fmt;

use crate::{Ident, RoleName, SchemaName};

/// What `DROP SCHEMA` does about objects still living in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropBehavior {
    /// No modifier: the server refuses to drop a schema that still
    /// contains objects.
    #[default]
    Restrict,

    /// `CASCADE`: drop contained objects along with the schema.
    Cascade,
}

/// A statement that creates, alters or drops a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStmt {
    /// `CREATE SCHEMA name [AUTHORIZATION owner]`
    Create {
        name: SchemaName,
        owner: Option<RoleName>,
    },

    /// `ALTER SCHEMA from RENAME TO to`
    Rename { from: SchemaName, to: SchemaName },

    /// `ALTER SCHEMA name OWNER TO owner`
    OwnerTo { name: SchemaName, owner: RoleName },

    /// `DROP SCHEMA name [CASCADE]`
    Drop {
        name: SchemaName,
        behavior: DropBehavior,
    },
}

impl SchemaStmt {
    /// Create a schema. An empty owner is treated as no owner, leaving the
    /// server to assign the connecting role.
    pub fn create(name: impl Into<SchemaName>, owner: Option<&str>) -> Self {
        SchemaStmt::Create {
            name: name.into(),
            owner: owner.filter(|o| !o.is_empty()).map(RoleName::from),
        }
    }

    pub fn rename(from: impl Into<SchemaName>, to: impl Into<SchemaName>) -> Self {
        SchemaStmt::Rename {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn owner_to(name: impl Into<SchemaName>, owner: impl Into<RoleName>) -> Self {
        SchemaStmt::OwnerTo {
            name: name.into(),
            owner: owner.into(),
        }
    }

    pub fn drop(name: impl Into<SchemaName>, behavior: DropBehavior) -> Self {
        SchemaStmt::Drop {
            name: name.into(),
            behavior,
        }
    }

    /// The schema this statement addresses, before it runs.
    pub fn schema(&self) -> &SchemaName {
        match self {
            SchemaStmt::Create { name, .. }
            | SchemaStmt::OwnerTo { name, .. }
            | SchemaStmt::Drop { name, .. } => name,
            SchemaStmt::Rename { from, .. } => from,
        }
    }

    /// Short human-readable name of the action, used in logs and errors.
    pub fn action(&self) -> &'static str {
        match self {
            SchemaStmt::Create { .. } => "create schema",
            SchemaStmt::Rename { .. } => "rename schema",
            SchemaStmt::OwnerTo { .. } => "change schema owner",
            SchemaStmt::Drop { .. } => "drop schema",
        }
    }
}

impl fmt::Display for SchemaStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaStmt::Create { name, owner } => {
                write!(f, "CREATE SCHEMA {}", Ident(name.as_str()))?;
                if let Some(owner) = owner {
                    write!(f, " AUTHORIZATION {}", Ident(owner.as_str()))?;
                }
                Ok(())
            }
            SchemaStmt::Rename { from, to } => write!(
                f,
                "ALTER SCHEMA {} RENAME TO {}",
                Ident(from.as_str()),
                Ident(to.as_str())
            ),
            SchemaStmt::OwnerTo { name, owner } => write!(
                f,
                "ALTER SCHEMA {} OWNER TO {}",
                Ident(name.as_str()),
                Ident(owner.as_str())
            ),
            SchemaStmt::Drop { name, behavior } => {
                write!(f, "DROP SCHEMA {}", Ident(name.as_str()))?;
                match behavior {
                    DropBehavior::Restrict => Ok(()),
                    DropBehavior::Cascade => f.write_str(" CASCADE"),
                }
            }
        }
    }
}
