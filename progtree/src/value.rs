//! Runtime values carried by literal nodes.
//!
//! [`DynamicValue`] is a closed union over the built-in kinds plus one open case,
//! [`DynamicValue::Opaque`], for values defined outside this crate. Opaque values
//! take part in serialization only when they have the [`Serializable`] capability,
//! which is most easily obtained by implementing [`SerializableType`].
use std::sync::Arc;

use bigdecimal::BigDecimal;
use downcast_rs::{DowncastSync, impl_downcast};
use strum::{EnumIs, IntoStaticStr};

use crate::{document::DocumentNode, error::BoxError, tree::ProgramTree};

/// Any value that is not one of the built-in kinds.
pub trait OpaqueValue: DowncastSync + std::fmt::Debug {
    /// Rust type name of the value, used in diagnostics.
    fn rust_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The serialization capability of this value, if it has one.
    fn as_serializable(&self) -> Option<&dyn Serializable> {
        None
    }

    /// Value equality against another opaque value of possibly different type.
    fn opaque_eq(&self, other: &dyn OpaqueValue) -> bool;
}
impl_downcast!(sync OpaqueValue);

/// Capability of a value to describe itself as a document fragment.
///
/// The decode side is registered separately, by identifier, with the codec.
pub trait Serializable {
    /// Stable, globally resolvable identifier of the serialized type.
    fn serialized_type(&self) -> &str;

    /// Document representation of `self`.
    fn serialize(&self) -> DocumentNode;
}

/// Static counterpart of [`Serializable`], pairing the encoder with its factory.
///
/// Implementing this trait provides [`Serializable`] and [`OpaqueValue`] for free.
pub trait SerializableType: Sized + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Identifier written to documents; must be unique across registered types.
    const TYPE_ID: &'static str;

    fn to_document(&self) -> DocumentNode;

    /// Rebuild a value from the node produced by [`SerializableType::to_document`].
    fn from_document(node: &DocumentNode) -> Result<Self, BoxError>;
}

impl<T: SerializableType> Serializable for T {
    fn serialized_type(&self) -> &str {
        T::TYPE_ID
    }

    fn serialize(&self) -> DocumentNode {
        self.to_document()
    }
}

impl<T: SerializableType> OpaqueValue for T {
    fn as_serializable(&self) -> Option<&dyn Serializable> {
        Some(self)
    }

    fn opaque_eq(&self, other: &dyn OpaqueValue) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| other == self)
    }
}

/// A literal payload.
#[derive(Debug, Clone, EnumIs, IntoStaticStr)]
pub enum DynamicValue {
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Decimal(BigDecimal),
    Bool(bool),
    Char(char),
    Byte(u8),
    SByte(i8),
    String(String),
    /// Ordered list; elements are not required to share a kind.
    List(Vec<DynamicValue>),
    /// A nested program used as a value.
    Program(Box<ProgramTree>),
    Opaque(Arc<dyn OpaqueValue>),
}

impl DynamicValue {
    pub fn opaque(value: impl OpaqueValue) -> Self {
        DynamicValue::Opaque(Arc::new(value))
    }

    /// Name of the variant, e.g. `"Int32"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DynamicValue]> {
        match self {
            DynamicValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_program(&self) -> Option<&ProgramTree> {
        match self {
            DynamicValue::Program(tree) => Some(tree),
            _ => None,
        }
    }

    /// Widen any built-in integer kind to `i64`, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            DynamicValue::Int16(v) => Some(v.into()),
            DynamicValue::Int32(v) => Some(v.into()),
            DynamicValue::Int64(v) => Some(v),
            DynamicValue::UInt16(v) => Some(v.into()),
            DynamicValue::UInt32(v) => Some(v.into()),
            DynamicValue::UInt64(v) => i64::try_from(v).ok(),
            DynamicValue::Byte(v) => Some(v.into()),
            DynamicValue::SByte(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Borrow the payload as `T` if this is an opaque value of that type.
    pub fn downcast_opaque<T: OpaqueValue>(&self) -> Option<&T> {
        match self {
            DynamicValue::Opaque(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for DynamicValue {
    fn eq(&self, other: &Self) -> bool {
        use DynamicValue::*;
        match (self, other) {
            (Int16(a), Int16(b)) => a == b,
            (Int32(a), Int32(b)) => a == b,
            (Int64(a), Int64(b)) => a == b,
            (UInt16(a), UInt16(b)) => a == b,
            (UInt32(a), UInt32(b)) => a == b,
            (UInt64(a), UInt64(b)) => a == b,
            (Float32(a), Float32(b)) => a == b,
            (Float64(a), Float64(b)) => a == b,
            (Decimal(a), Decimal(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Byte(a), Byte(b)) => a == b,
            (SByte(a), SByte(b)) => a == b,
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Program(a), Program(b)) => a == b,
            (Opaque(a), Opaque(b)) => a.opaque_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl std::fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DynamicValue::Int16(v) => write!(f, "{}", v),
            DynamicValue::Int32(v) => write!(f, "{}", v),
            DynamicValue::Int64(v) => write!(f, "{}", v),
            DynamicValue::UInt16(v) => write!(f, "{}", v),
            DynamicValue::UInt32(v) => write!(f, "{}", v),
            DynamicValue::UInt64(v) => write!(f, "{}", v),
            DynamicValue::Float32(v) => write!(f, "{}", v),
            DynamicValue::Float64(v) => write!(f, "{}", v),
            DynamicValue::Decimal(v) => write!(f, "{}", v),
            DynamicValue::Bool(v) => write!(f, "{}", v),
            DynamicValue::Char(v) => write!(f, "{:?}", v),
            DynamicValue::Byte(v) => write!(f, "{}", v),
            DynamicValue::SByte(v) => write!(f, "{}", v),
            DynamicValue::String(v) => write!(f, "{:?}", v),
            DynamicValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            DynamicValue::Program(tree) => write!(f, "{{{}}}", tree),
            DynamicValue::Opaque(value) => write!(f, "<{}>", value.rust_type_name()),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for DynamicValue {
                fn from(value: $ty) -> Self {
                    DynamicValue::$variant(value)
                }
            }
        )+
    };
}

impl_from_primitive! {
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    BigDecimal => Decimal,
    bool => Bool,
    char => Char,
    u8 => Byte,
    i8 => SByte,
    String => String,
}

impl From<&str> for DynamicValue {
    fn from(value: &str) -> Self {
        DynamicValue::String(value.to_string())
    }
}

impl From<ProgramTree> for DynamicValue {
    fn from(value: ProgramTree) -> Self {
        DynamicValue::Program(Box::new(value))
    }
}

impl<T: Into<DynamicValue>> From<Vec<T>> for DynamicValue {
    fn from(values: Vec<T>) -> Self {
        DynamicValue::List(values.into_iter().map(Into::into).collect())
    }
}
