//! Catalog queries.

/// Look up a schema and its owning role by name.
///
/// Takes the schema name as `$1` and yields at most one row of
/// `(nspname, owner)`. No row means the schema does not exist.
pub const LOOKUP_SCHEMA: &str = "SELECT nspname, pg_catalog.pg_get_userbyid(nspowner) \
     FROM pg_catalog.pg_namespace WHERE nspname = $1";
