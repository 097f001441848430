//! Canonical text forms of the primitive value kinds.
use std::str::FromStr;

use bigdecimal::BigDecimal;
use progtree::DynamicValue;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Primitive kinds and their type tokens (`int32`, `bool`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveType {
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal,
    Bool,
    Char,
    Byte,
    SByte,
    String,
}

impl PrimitiveType {
    /// Type token written to the `type` attribute.
    pub fn token(self) -> &'static str {
        self.into()
    }

    /// Primitive kind of `value`, or `None` for lists, programs and opaque values.
    pub fn of(value: &DynamicValue) -> Option<Self> {
        let ty = match value {
            DynamicValue::Int16(_) => PrimitiveType::Int16,
            DynamicValue::Int32(_) => PrimitiveType::Int32,
            DynamicValue::Int64(_) => PrimitiveType::Int64,
            DynamicValue::UInt16(_) => PrimitiveType::UInt16,
            DynamicValue::UInt32(_) => PrimitiveType::UInt32,
            DynamicValue::UInt64(_) => PrimitiveType::UInt64,
            DynamicValue::Float32(_) => PrimitiveType::Float32,
            DynamicValue::Float64(_) => PrimitiveType::Float64,
            DynamicValue::Decimal(_) => PrimitiveType::Decimal,
            DynamicValue::Bool(_) => PrimitiveType::Bool,
            DynamicValue::Char(_) => PrimitiveType::Char,
            DynamicValue::Byte(_) => PrimitiveType::Byte,
            DynamicValue::SByte(_) => PrimitiveType::SByte,
            DynamicValue::String(_) => PrimitiveType::String,
            DynamicValue::List(_) | DynamicValue::Program(_) | DynamicValue::Opaque(_) => {
                return None;
            }
        };
        Some(ty)
    }

    /// Render a primitive value as `(kind, text)`.
    ///
    /// Integers are base 10, floats use the shortest text that parses back to the same
    /// value, booleans are `true`/`false`. Nothing depends on the process locale.
    pub fn render(value: &DynamicValue) -> Option<(Self, String)> {
        let text = match value {
            DynamicValue::Int16(v) => v.to_string(),
            DynamicValue::Int32(v) => v.to_string(),
            DynamicValue::Int64(v) => v.to_string(),
            DynamicValue::UInt16(v) => v.to_string(),
            DynamicValue::UInt32(v) => v.to_string(),
            DynamicValue::UInt64(v) => v.to_string(),
            DynamicValue::Float32(v) => v.to_string(),
            DynamicValue::Float64(v) => v.to_string(),
            DynamicValue::Decimal(v) => v.to_string(),
            DynamicValue::Bool(v) => v.to_string(),
            DynamicValue::Char(v) => v.to_string(),
            DynamicValue::Byte(v) => v.to_string(),
            DynamicValue::SByte(v) => v.to_string(),
            DynamicValue::String(v) => v.clone(),
            DynamicValue::List(_) | DynamicValue::Program(_) | DynamicValue::Opaque(_) => {
                return None;
            }
        };
        Self::of(value).map(|ty| (ty, text))
    }

    /// Parse `text` with this kind's canonical parser. Surrounding whitespace is not
    /// accepted, except for strings and chars where it is the value itself.
    pub fn parse(self, text: &str) -> Option<DynamicValue> {
        let value = match self {
            PrimitiveType::Int16 => text.parse::<i16>().ok()?.into(),
            PrimitiveType::Int32 => text.parse::<i32>().ok()?.into(),
            PrimitiveType::Int64 => text.parse::<i64>().ok()?.into(),
            PrimitiveType::UInt16 => text.parse::<u16>().ok()?.into(),
            PrimitiveType::UInt32 => text.parse::<u32>().ok()?.into(),
            PrimitiveType::UInt64 => text.parse::<u64>().ok()?.into(),
            PrimitiveType::Float32 => text.parse::<f32>().ok()?.into(),
            PrimitiveType::Float64 => text.parse::<f64>().ok()?.into(),
            PrimitiveType::Decimal => BigDecimal::from_str(text).ok()?.into(),
            PrimitiveType::Bool => match text {
                "true" => true.into(),
                "false" => false.into(),
                _ => return None,
            },
            PrimitiveType::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.into(),
                    _ => return None,
                }
            }
            PrimitiveType::Byte => text.parse::<u8>().ok()?.into(),
            PrimitiveType::SByte => text.parse::<i8>().ok()?.into(),
            PrimitiveType::String => text.into(),
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn tokens_are_lowercase_names() {
        let tokens: Vec<_> = PrimitiveType::iter().map(PrimitiveType::token).collect();
        assert_eq!(
            tokens,
            [
                "int16", "int32", "int64", "uint16", "uint32", "uint64", "float32", "float64",
                "decimal", "bool", "char", "byte", "sbyte", "string"
            ]
        );
        assert_eq!("uint64".parse::<PrimitiveType>().ok(), Some(PrimitiveType::UInt64));
        assert!("Int32".parse::<PrimitiveType>().is_err());
    }

    #[test]
    fn floats_render_round_trip_text() {
        let (ty, text) = PrimitiveType::render(&0.1f64.into()).unwrap();
        assert_eq!((ty, text.as_str()), (PrimitiveType::Float64, "0.1"));
        assert_eq!(ty.parse(&text), Some(DynamicValue::Float64(0.1)));

        let third = 1.0f32 / 3.0;
        let (ty, text) = PrimitiveType::render(&third.into()).unwrap();
        assert_eq!(ty.parse(&text), Some(DynamicValue::Float32(third)));

        let (_, text) = PrimitiveType::render(&f64::NEG_INFINITY.into()).unwrap();
        assert_eq!(text, "-inf");
        let nan = PrimitiveType::Float64.parse("NaN");
        assert!(matches!(nan, Some(DynamicValue::Float64(f)) if f.is_nan()));
    }

    #[test]
    fn strict_parsers_reject_loose_text() {
        assert_eq!(PrimitiveType::Int32.parse(" 42"), None);
        assert_eq!(PrimitiveType::Int16.parse("40000"), None);
        assert_eq!(PrimitiveType::Bool.parse("True"), None);
        assert_eq!(PrimitiveType::Char.parse("ab"), None);
        assert_eq!(PrimitiveType::Char.parse(""), None);
        assert_eq!(PrimitiveType::Byte.parse("-1"), None);
        assert_eq!(PrimitiveType::Decimal.parse("3,14"), None);
    }

    #[test]
    fn whitespace_is_preserved_for_text_kinds() {
        assert_eq!(PrimitiveType::Char.parse(" "), Some(DynamicValue::Char(' ')));
        assert_eq!(
            PrimitiveType::String.parse("  Miller "),
            Some(DynamicValue::from("  Miller "))
        );
    }

    #[test]
    fn decimal_keeps_its_digits() {
        let value = PrimitiveType::Decimal.parse("3.14").unwrap();
        let (ty, text) = PrimitiveType::render(&value).unwrap();
        assert_eq!(ty, PrimitiveType::Decimal);
        assert_eq!(text, "3.14");
        assert!(PrimitiveType::render(&DynamicValue::List(vec![])).is_none());
    }
}
