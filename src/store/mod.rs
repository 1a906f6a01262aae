//! Typed model object storage.
//!
//! Model objects live in a store keyed by document URI plus object
//! identifier, with typed property values instead of a stringly-typed
//! protocol. Anything that can hold such keyed property maps can back the
//! model layer; the in-memory implementation lives in [`InMemoryStore`].

mod memory;

pub use memory::InMemoryStore;

use crate::error::Result;
use crate::model::VerificationCode;
use std::fmt;

/// SPDX class name of stored verification codes.
pub const CLASS_VERIFICATION_CODE: &str = "PackageVerificationCode";
/// Property holding the hex digest value.
pub const PROP_VERIFICATION_CODE_VALUE: &str = "packageVerificationCodeValue";
/// Multi-valued property holding the excluded file names.
pub const PROP_VERIFICATION_CODE_EXCLUDED_FILE: &str = "packageVerificationCodeExcludedFile";

/// Key of a stored object: the owning document plus an identifier unique
/// within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub document_uri: String,
    pub id: String,
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document_uri, self.id)
    }
}

/// Value a stored property may hold.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Reference(ObjectId),
    List(Vec<StoredValue>),
}

/// Capability surface of a model object store.
pub trait ModelStore {
    /// Creates a fresh anonymous object of `type_name` under `document_uri`
    /// and returns its generated identifier.
    fn create_anonymous(&mut self, document_uri: &str, type_name: &str) -> Result<ObjectId>;

    /// Type name the object was created with.
    fn type_of(&self, id: &ObjectId) -> Result<String>;

    /// Current value of `property`, `None` when it was never set.
    fn get_value(&self, id: &ObjectId, property: &str) -> Result<Option<StoredValue>>;

    fn set_value(&mut self, id: &ObjectId, property: &str, value: StoredValue) -> Result<()>;

    /// Appends to a list-valued property. An absent property becomes a
    /// one-element list; a present single value is an error.
    fn append_value(&mut self, id: &ObjectId, property: &str, value: StoredValue) -> Result<()>;
}

/// Writes `code` into `store` as a new anonymous `PackageVerificationCode`
/// object under `document_uri` and returns its identifier.
pub fn store_verification_code(
    store: &mut dyn ModelStore,
    document_uri: &str,
    code: &VerificationCode,
) -> Result<ObjectId> {
    let id = store.create_anonymous(document_uri, CLASS_VERIFICATION_CODE)?;
    store.set_value(
        &id,
        PROP_VERIFICATION_CODE_VALUE,
        StoredValue::String(code.value.clone()),
    )?;
    for name in &code.excluded_file_names {
        store.append_value(
            &id,
            PROP_VERIFICATION_CODE_EXCLUDED_FILE,
            StoredValue::String(name.clone()),
        )?;
    }
    Ok(id)
}
