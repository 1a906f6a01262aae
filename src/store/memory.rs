//! Hash-map backed model store, for tests and small in-process documents.

use super::{ModelStore, ObjectId, StoredValue};
use crate::error::{Result, SpdxLibraryError};
use std::collections::HashMap;

const ANONYMOUS_PREFIX: &str = "__anon";

#[derive(Debug)]
struct StoredObject {
    type_name: String,
    properties: HashMap<String, StoredValue>,
}

/// In-memory [`ModelStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: HashMap<ObjectId, StoredObject>,
    next_anonymous: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn object(&self, id: &ObjectId) -> Result<&StoredObject> {
        self.objects
            .get(id)
            .ok_or_else(|| SpdxLibraryError::ObjectNotFound { id: id.to_string() })
    }

    fn object_mut(&mut self, id: &ObjectId) -> Result<&mut StoredObject> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| SpdxLibraryError::ObjectNotFound { id: id.to_string() })
    }
}

impl ModelStore for InMemoryStore {
    fn create_anonymous(&mut self, document_uri: &str, type_name: &str) -> Result<ObjectId> {
        let id = ObjectId {
            document_uri: document_uri.to_string(),
            id: format!("{}{}", ANONYMOUS_PREFIX, self.next_anonymous),
        };
        self.next_anonymous += 1;
        self.objects.insert(
            id.clone(),
            StoredObject {
                type_name: type_name.to_string(),
                properties: HashMap::new(),
            },
        );
        Ok(id)
    }

    fn type_of(&self, id: &ObjectId) -> Result<String> {
        Ok(self.object(id)?.type_name.clone())
    }

    fn get_value(&self, id: &ObjectId, property: &str) -> Result<Option<StoredValue>> {
        Ok(self.object(id)?.properties.get(property).cloned())
    }

    fn set_value(&mut self, id: &ObjectId, property: &str, value: StoredValue) -> Result<()> {
        self.object_mut(id)?
            .properties
            .insert(property.to_string(), value);
        Ok(())
    }

    fn append_value(&mut self, id: &ObjectId, property: &str, value: StoredValue) -> Result<()> {
        let object = self.object_mut(id)?;
        match object.properties.get_mut(property) {
            Some(StoredValue::List(items)) => {
                items.push(value);
            }
            Some(_) => {
                return Err(SpdxLibraryError::PropertyNotList {
                    id: id.to_string(),
                    property: property.to_string(),
                });
            }
            None => {
                object
                    .properties
                    .insert(property.to_string(), StoredValue::List(vec![value]));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "https://example.com/spdxdocs/demo-1.0";

    #[test]
    fn anonymous_ids_are_unique_per_store() {
        let mut store = InMemoryStore::new();
        let first = store.create_anonymous(DOC, "SpdxFile").unwrap();
        let second = store.create_anonymous(DOC, "SpdxFile").unwrap();
        assert_ne!(first, second);
        assert!(first.id.starts_with(ANONYMOUS_PREFIX));
    }

    #[test]
    fn set_then_get_round_trips_typed_values() {
        let mut store = InMemoryStore::new();
        let id = store.create_anonymous(DOC, "SpdxPackage").unwrap();
        store
            .set_value(&id, "name", StoredValue::String("demo".to_string()))
            .unwrap();
        store
            .set_value(&id, "fileCount", StoredValue::Integer(12))
            .unwrap();
        store
            .set_value(&id, "filesAnalyzed", StoredValue::Boolean(true))
            .unwrap();
        assert_eq!(
            store.get_value(&id, "name").unwrap(),
            Some(StoredValue::String("demo".to_string()))
        );
        assert_eq!(
            store.get_value(&id, "fileCount").unwrap(),
            Some(StoredValue::Integer(12))
        );
        assert_eq!(
            store.get_value(&id, "filesAnalyzed").unwrap(),
            Some(StoredValue::Boolean(true))
        );
        assert_eq!(store.get_value(&id, "unset").unwrap(), None);
    }

    #[test]
    fn append_builds_and_extends_lists() {
        let mut store = InMemoryStore::new();
        let id = store.create_anonymous(DOC, "SpdxPackage").unwrap();
        store
            .append_value(&id, "seenLicenses", StoredValue::String("MIT".to_string()))
            .unwrap();
        store
            .append_value(
                &id,
                "seenLicenses",
                StoredValue::String("Apache-2.0".to_string()),
            )
            .unwrap();
        assert_eq!(
            store.get_value(&id, "seenLicenses").unwrap(),
            Some(StoredValue::List(vec![
                StoredValue::String("MIT".to_string()),
                StoredValue::String("Apache-2.0".to_string()),
            ]))
        );
    }

    #[test]
    fn append_to_single_value_is_an_error() {
        let mut store = InMemoryStore::new();
        let id = store.create_anonymous(DOC, "SpdxPackage").unwrap();
        store
            .set_value(&id, "name", StoredValue::String("demo".to_string()))
            .unwrap();
        let err = store
            .append_value(&id, "name", StoredValue::String("other".to_string()))
            .unwrap_err();
        assert!(matches!(err, SpdxLibraryError::PropertyNotList { .. }));
    }

    #[test]
    fn unknown_object_is_an_error() {
        let store = InMemoryStore::new();
        let ghost = ObjectId {
            document_uri: DOC.to_string(),
            id: "SPDXRef-ghost".to_string(),
        };
        assert!(matches!(
            store.type_of(&ghost),
            Err(SpdxLibraryError::ObjectNotFound { .. })
        ));
    }

    #[test]
    fn references_between_objects_are_stored() {
        let mut store = InMemoryStore::new();
        let package = store.create_anonymous(DOC, "SpdxPackage").unwrap();
        let code = store.create_anonymous(DOC, "PackageVerificationCode").unwrap();
        store
            .set_value(
                &package,
                "packageVerificationCode",
                StoredValue::Reference(code.clone()),
            )
            .unwrap();
        assert_eq!(
            store.get_value(&package, "packageVerificationCode").unwrap(),
            Some(StoredValue::Reference(code))
        );
    }
}
