//! Resource data: the host's view of one schema resource.
//!
//! The host (whatever persists state and drives the lifecycle) owns the
//! attribute values. The reconciler reads desired values, asks which ones
//! changed, and writes observed values and the identity back through
//! [`ResourceData`]. [`ResourceState`] is a plain in-memory implementation.

use std::fmt;

/// The attributes tracked for a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    /// The schema name. Also the resource identity.
    Name,

    /// The owning role. Optional on input, always set after a read.
    Owner,
}

impl Attr {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attr::Name => "name",
            Attr::Owner => "owner",
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRecord {
    pub name: String,
    pub owner: String,
}

/// Host-side access to a resource's attributes and identity.
pub trait ResourceData {
    /// The identity of the resource, `None` when it does not exist (yet).
    fn id(&self) -> Option<&str>;

    /// Set or clear the identity. Clearing it marks the resource as gone.
    fn set_id(&mut self, id: Option<String>);

    /// The value of an attribute: the desired one if given, else the last
    /// recorded one.
    fn get(&self, attr: Attr) -> Option<&str>;

    /// `(old, new)` when the desired value differs from the recorded one.
    fn get_change(&self, attr: Attr) -> Option<(String, String)>;

    /// Record an observed value.
    fn set(&mut self, attr: Attr, value: String);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Values {
    name: Option<String>,
    owner: Option<String>,
}

impl Values {
    fn get(&self, attr: Attr) -> Option<&str> {
        match attr {
            Attr::Name => self.name.as_deref(),
            Attr::Owner => self.owner.as_deref(),
        }
    }

    fn slot(&mut self, attr: Attr) -> &mut Option<String> {
        match attr {
            Attr::Name => &mut self.name,
            Attr::Owner => &mut self.owner,
        }
    }
}

/// In-memory resource data: an identity, the recorded attribute values and
/// the desired ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceState {
    id: Option<String>,
    recorded: Values,
    planned: Values,
}

impl ResourceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resource that does not exist yet, with the desired name and owner.
    pub fn planned(name: impl Into<String>, owner: Option<String>) -> Self {
        Self {
            planned: Values {
                name: Some(name.into()),
                owner,
            },
            ..Self::default()
        }
    }

    /// A resource previously recorded with these values.
    pub fn from_record(record: SchemaRecord) -> Self {
        Self {
            id: Some(record.name.clone()),
            recorded: Values {
                name: Some(record.name),
                owner: Some(record.owner),
            },
            planned: Values::default(),
        }
    }

    /// A resource known only by its identity, to be filled in by a read.
    pub fn imported(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the desired value of an attribute.
    pub fn plan(&mut self, attr: Attr, value: impl Into<String>) -> &mut Self {
        *self.planned.slot(attr) = Some(value.into());
        self
    }

    /// The recorded schema, if the resource exists and has been read.
    pub fn record(&self) -> Option<SchemaRecord> {
        self.id.as_ref()?;
        Some(SchemaRecord {
            name: self.recorded.name.clone()?,
            owner: self.recorded.owner.clone()?,
        })
    }
}

impl ResourceData for ResourceState {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        if id.is_none() {
            self.recorded = Values::default();
        }
        self.id = id;
    }

    fn get(&self, attr: Attr) -> Option<&str> {
        self.planned.get(attr).or_else(|| self.recorded.get(attr))
    }

    fn get_change(&self, attr: Attr) -> Option<(String, String)> {
        let new = self.planned.get(attr)?;
        let old = self.recorded.get(attr).unwrap_or_default();
        (old != new).then(|| (old.to_owned(), new.to_owned()))
    }

    fn set(&mut self, attr: Attr, value: String) {
        *self.recorded.slot(attr) = Some(value);
    }
}
