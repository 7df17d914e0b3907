//! DDL for PostgreSQL schemas.
//!
//! Build schema statements as typed values, then render them with
//! `Display`. Every identifier is quoted, so mixed-case names, reserved
//! words and names containing `"` survive the trip to the server intact.

use strid::braid;

mod catalog;
pub use catalog::*;

mod stmt;
pub use stmt::*;


/// The name of a schema (namespace).
#[braid]
pub struct SchemaName;

/// The name of a database role.
#[braid]
pub struct RoleName;

/// A PostgreSQL identifier wrapper.
///
/// Display writes the value escaped and quoted with double quotes.
///
/// # Example
/// ```
/// use pgschema_sql::Ident;
/// assert_eq!(format!("{}", Ident("public")), "\"public\"");
/// assert_eq!(format!("{}", Ident("My\"Schema")), "\"My\"\"Schema\"");
/// ```
pub struct Ident<T: AsRef<str>>(pub T);

impl<T: AsRef<str>> std::fmt::Display for Ident<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("\"")?;
        for c in self.0.as_ref().chars() {
            if c == '"' {
                f.write_str("\"\"")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        f.write_str("\"")
    }
}

/// Quote a PostgreSQL identifier.
///
/// Always quotes, even when the name would be a valid bare identifier, so
/// that case is preserved and keywords like `user` or `order` are accepted.
pub fn quote_ident(name: &str) -> String {
    format!("{}", Ident(name))
}
