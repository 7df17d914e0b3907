//! Schema diffing: compare desired attributes against recorded ones.
//!
//! Changes are always produced in the same order: rename first, then owner.
//! An owner change addresses the schema by the name it will have once the
//! rename has run.

use pgschema_sql::SchemaStmt;

use crate::{Attr, Error, ResourceData, Result};

/// The changes needed to bring one schema in line with its desired state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    pub changes: Vec<SchemaChange>,
}

impl SchemaDiff {
    /// Returns true if there are no differences.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Generate SQL statements for all changes in this diff.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        for change in &self.changes {
            sql.push_str(&change.to_stmt().to_string());
            sql.push_str(";\n");
        }
        sql
    }
}

/// A single schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    /// Rename the schema.
    Rename { from: String, to: String },

    /// Hand the schema over to another role.
    Owner { schema: String, to: String },
}

impl SchemaChange {
    pub fn to_stmt(&self) -> SchemaStmt {
        match self {
            SchemaChange::Rename { from, to } => SchemaStmt::rename(from.as_str(), to.as_str()),
            SchemaChange::Owner { schema, to } => {
                SchemaStmt::owner_to(schema.as_str(), to.as_str())
            }
        }
    }
}

/// Work out which statements an update needs.
///
/// Fails with [`Error::Validation`] if the name or the owner is being set to
/// an empty string, and with [`Error::NoIdentity`] if a rename is asked of a
/// schema that was never created or imported. Nothing has been executed at
/// that point.
pub fn diff_schema(data: &impl ResourceData) -> Result<SchemaDiff> {
    let mut changes = Vec::new();

    let mut schema = data
        .id()
        .or_else(|| data.get(Attr::Name))
        .unwrap_or_default()
        .to_owned();

    if let Some((recorded, to)) = data.get_change(Attr::Name) {
        if to.is_empty() {
            return Err(Error::Validation { attr: Attr::Name });
        }
        // The identity is the schema's current name; the recorded name may
        // not have been read yet.
        let from = data.id().map(str::to_owned).unwrap_or(recorded);
        if from.is_empty() {
            return Err(Error::NoIdentity);
        }
        if from != to {
            changes.push(SchemaChange::Rename { from, to: to.clone() });
        }
        schema = to;
    }

    if let Some((_, to)) = data.get_change(Attr::Owner) {
        if to.is_empty() {
            return Err(Error::Validation { attr: Attr::Owner });
        }
        changes.push(SchemaChange::Owner { schema, to });
    }

    Ok(SchemaDiff { changes })
}
