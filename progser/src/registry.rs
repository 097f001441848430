//! Registration of extensible value types.
//!
//! Types implementing [`SerializableType`] announce their decode factory at startup
//! with [`register_serializable_type!`](crate::register_serializable_type). The
//! announcements are global and static; a [`TypeLibrary`] is the per-codec table
//! actually consulted while decoding, usually filled from them with
//! [`TypeLibrary::from_inventory`].
use std::{collections::BTreeMap, sync::Arc};

use log::debug;
use progtree::{BoxError, DocumentNode, DynamicValue, OpaqueValue, SerializableType};

use crate::{
    utils::{
        error::{CodecError, CodecResult},
        path::NodePath,
    },
    value::is_reserved_type_id,
};

/// Decode factory of an extensible type: receives the single child of the value
/// fragment, as produced by [`progtree::Serializable::serialize`].
pub type DecodeFactory = fn(&DocumentNode) -> Result<Arc<dyn OpaqueValue>, BoxError>;

/// Inventory entry submitted by [`register_serializable_type!`](crate::register_serializable_type).
pub struct TypeRegistration {
    pub type_id: &'static str,
    pub factory: DecodeFactory,
}
inventory::collect!(TypeRegistration);

#[macro_export]
macro_rules! register_serializable_type {
    (
        $ty:ty
    ) => {
        $crate::inventory::submit! {
            $crate::registry::TypeRegistration {
                type_id: <$ty as $crate::progtree::SerializableType>::TYPE_ID,
                factory: $crate::registry::factory_of::<$ty>,
            }
        }
    };
    () => {};
}

/// Decode factory of `T`, built from [`SerializableType::from_document`].
pub fn factory_of<T: SerializableType>(
    node: &DocumentNode,
) -> Result<Arc<dyn OpaqueValue>, BoxError> {
    let value = T::from_document(node)?;
    Ok(Arc::new(value))
}

/// Table of extensible type identifiers and their decode factories.
///
/// An identifier may be known without a factory (see [`TypeLibrary::declare`]); values
/// of such a type fail to decode with [`CodecError::Construction`] rather than
/// [`CodecError::UnknownType`].
#[derive(Debug, Clone, Default)]
pub struct TypeLibrary {
    entries: BTreeMap<String, Option<DecodeFactory>>,
}

impl TypeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding every type registered with
    /// [`register_serializable_type!`](crate::register_serializable_type).
    pub fn from_inventory() -> CodecResult<Self> {
        let mut library = Self::new();
        for registration in inventory::iter::<TypeRegistration> {
            library.register(registration.type_id, registration.factory)?;
        }
        debug!(
            "Collected {} extensible type(s) from the global registry",
            library.len()
        );
        Ok(library)
    }

    /// Register `factory` under `type_id`.
    ///
    /// A previously [declared](TypeLibrary::declare) identifier receives the factory;
    /// any other known or reserved identifier fails with [`CodecError::DuplicateType`].
    pub fn register(&mut self, type_id: &str, factory: DecodeFactory) -> CodecResult<()> {
        if is_reserved_type_id(type_id) {
            return Err(CodecError::DuplicateType {
                type_id: type_id.to_string(),
            });
        }

        match self.entries.get_mut(type_id) {
            Some(slot) if slot.is_some() => Err(CodecError::DuplicateType {
                type_id: type_id.to_string(),
            }),
            Some(slot) => {
                *slot = Some(factory);
                Ok(())
            }
            None => {
                debug!("Registering extensible type '{}'", type_id);
                self.entries.insert(type_id.to_string(), Some(factory));
                Ok(())
            }
        }
    }

    pub fn register_type<T: SerializableType>(&mut self) -> CodecResult<()> {
        self.register(T::TYPE_ID, factory_of::<T>)
    }

    /// Make `type_id` known without a factory. Returns `false` if it already was.
    pub fn declare(&mut self, type_id: &str) -> CodecResult<bool> {
        if is_reserved_type_id(type_id) {
            return Err(CodecError::DuplicateType {
                type_id: type_id.to_string(),
            });
        }
        if self.entries.contains_key(type_id) {
            return Ok(false);
        }
        self.entries.insert(type_id.to_string(), None);
        Ok(true)
    }

    /// Drop the factory of `type_id` but keep the identifier known.
    pub fn remove_factory(&mut self, type_id: &str) -> Option<DecodeFactory> {
        self.entries.get_mut(type_id).and_then(Option::take)
    }

    /// Forget `type_id` entirely. Returns whether it was known.
    pub fn unregister(&mut self, type_id: &str) -> bool {
        self.entries.remove(type_id).is_some()
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.entries.contains_key(type_id)
    }

    pub fn has_factory(&self, type_id: &str) -> bool {
        matches!(self.entries.get(type_id), Some(Some(_)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the extensible value of `fragment`, a value fragment whose `type`
    /// attribute is `type_id`.
    pub fn construct(
        &self,
        type_id: &str,
        fragment: &DocumentNode,
        path: &NodePath,
    ) -> CodecResult<DynamicValue> {
        let factory = match self.entries.get(type_id) {
            None => {
                return Err(CodecError::UnknownType {
                    type_id: type_id.to_string(),
                    path: path.clone(),
                });
            }
            Some(None) => {
                return Err(CodecError::Construction {
                    type_id: type_id.to_string(),
                    reason: "no decode factory registered".to_string(),
                    path: path.clone(),
                });
            }
            Some(Some(factory)) => *factory,
        };

        let node = fragment
            .single_child()
            .ok_or_else(|| CodecError::MalformedFragment {
                type_id: type_id.to_string(),
                reason: format!(
                    "expected exactly one child, found {}",
                    fragment.child_count()
                ),
                path: path.clone(),
            })?;

        let value = factory(node).map_err(|e| CodecError::Construction {
            type_id: type_id.to_string(),
            reason: e.to_string(),
            path: path.clone(),
        })?;

        // The factory must hand back a value that encodes under the same identifier.
        let produced = value.as_serializable().map(|s| s.serialized_type().to_string());
        match produced {
            Some(produced) if produced == type_id => Ok(DynamicValue::Opaque(value)),
            Some(produced) => Err(CodecError::Construction {
                type_id: type_id.to_string(),
                reason: format!("factory produced a value of type '{}'", produced),
                path: path.clone(),
            }),
            None => Err(CodecError::Construction {
                type_id: type_id.to_string(),
                reason: format!(
                    "factory produced a non-serializable {}",
                    value.rust_type_name()
                ),
                path: path.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Celsius(i32);

    impl SerializableType for Celsius {
        const TYPE_ID: &'static str = "Celsius";

        fn to_document(&self) -> DocumentNode {
            DocumentNode::new("Celsius").with_text(self.0.to_string())
        }

        fn from_document(node: &DocumentNode) -> Result<Self, BoxError> {
            Ok(Celsius(node.text().parse()?))
        }
    }

    #[derive(Debug, PartialEq)]
    struct Fahrenheit(i32);

    impl SerializableType for Fahrenheit {
        const TYPE_ID: &'static str = "Fahrenheit";

        fn to_document(&self) -> DocumentNode {
            DocumentNode::new("Fahrenheit").with_text(self.0.to_string())
        }

        fn from_document(node: &DocumentNode) -> Result<Self, BoxError> {
            Ok(Fahrenheit(node.text().parse()?))
        }
    }

    fn fragment(type_id: &str, text: &str) -> DocumentNode {
        DocumentNode::new("LiteralNode")
            .with_attribute("type", type_id)
            .with_child(DocumentNode::new(type_id).with_text(text))
    }

    #[test]
    fn constructs_registered_type() {
        let mut library = TypeLibrary::new();
        library.register_type::<Celsius>().unwrap();

        let value = library
            .construct("Celsius", &fragment("Celsius", "21"), &NodePath::root())
            .unwrap();
        assert_eq!(value.downcast_opaque::<Celsius>(), Some(&Celsius(21)));
    }

    #[test]
    fn duplicate_and_reserved_ids_are_rejected() {
        let mut library = TypeLibrary::new();
        library.register_type::<Celsius>().unwrap();
        assert!(library.register_type::<Celsius>().unwrap_err().is_duplicate_type());

        for reserved in ["int32", "list", "list<bool>", "program"] {
            assert!(library.register(reserved, factory_of::<Celsius>).is_err());
            assert!(library.declare(reserved).is_err());
        }
        assert_eq!(library.ids().collect::<Vec<_>>(), ["Celsius"]);
    }

    #[test]
    fn declared_then_registered() {
        let mut library = TypeLibrary::new();
        assert!(library.declare("Celsius").unwrap());
        assert!(!library.declare("Celsius").unwrap());
        assert!(library.contains("Celsius"));
        assert!(!library.has_factory("Celsius"));

        let err = library
            .construct("Celsius", &fragment("Celsius", "1"), &NodePath::root())
            .unwrap_err();
        assert!(err.is_construction());

        library.register_type::<Celsius>().unwrap();
        assert!(library.has_factory("Celsius"));
    }

    #[test]
    fn removal_changes_the_failure_mode() {
        let mut library = TypeLibrary::new();
        library.register_type::<Celsius>().unwrap();
        let doc = fragment("Celsius", "1");

        assert!(library.remove_factory("Celsius").is_some());
        let err = library.construct("Celsius", &doc, &NodePath::root()).unwrap_err();
        assert!(err.is_construction());

        assert!(library.unregister("Celsius"));
        let err = library.construct("Celsius", &doc, &NodePath::root()).unwrap_err();
        assert!(err.is_unknown_type());
        assert!(library.is_empty());
    }

    #[test]
    fn factory_failures_are_construction_errors() {
        let mut library = TypeLibrary::new();
        library.register_type::<Celsius>().unwrap();

        let err = library
            .construct("Celsius", &fragment("Celsius", "warm"), &NodePath::root())
            .unwrap_err();
        assert!(err.is_construction());

        let bare = DocumentNode::new("LiteralNode").with_attribute("type", "Celsius");
        let err = library.construct("Celsius", &bare, &NodePath::root()).unwrap_err();
        assert!(err.is_malformed_fragment());
    }

    #[test]
    fn mismatched_factory_is_detected() {
        let mut library = TypeLibrary::new();
        library.register("Celsius", factory_of::<Fahrenheit>).unwrap();

        match library
            .construct("Celsius", &fragment("Celsius", "70"), &NodePath::root())
            .unwrap_err()
        {
            CodecError::Construction { reason, .. } => assert!(reason.contains("Fahrenheit")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
