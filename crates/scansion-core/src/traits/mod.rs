#[macro_use]
mod macros;
mod relation;

pub use relation::*;

use crate::{error::ScanError, model::EntityModel, value::Value};
use std::any::Any;

// ============================================================================
// ENTITIES
// ============================================================================
//
// `Record` is the object-safe surface the scan pipeline drives through
// `dyn Record`; `Entity` binds a concrete type to its static model.
//

///
/// Record
///
/// Type-erased access to one entity instance, addressed by declare index.
/// Implemented by `#[derive(Entity)]`.
///

pub trait Record: Any {
    /// Static model of the concrete type.
    fn model(&self) -> &'static EntityModel;

    /// Current value of the scalar field at `index`, if it is one.
    fn scalar(&self, index: usize) -> Option<Value>;

    /// Decode `value` into the scalar field at `index`.
    fn set_scalar(&mut self, index: usize, value: &Value) -> Result<(), ScanError>;

    /// Mutable access to the relation field at `index`, if it is one.
    fn relation_mut(&mut self, index: usize) -> Option<RelationMut<'_>>;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

///
/// Entity
///
/// A concrete entity type with a static schema descriptor.
///

pub trait Entity: Record + Default {
    const MODEL: &'static EntityModel;
}

/// Reclaim the concrete type of a boxed record.
pub fn downcast_record<E: Entity>(record: Box<dyn Record>) -> Result<E, ScanError> {
    let found = record.model().path;

    record
        .into_any()
        .downcast::<E>()
        .map(|boxed| *boxed)
        .map_err(|_| {
            ScanError::structural(format!(
                "expected entity '{}', found '{found}'",
                E::MODEL.path
            ))
        })
}

// ============================================================================
// FIELD VALUES
// ============================================================================

///
/// FieldValue
///
/// Decode contract between row values and scalar fields.
///
/// Built-in impls perform direct compatible assignment; a custom type
/// declares its own contract by implementing this trait.
///

pub trait FieldValue {
    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>
    where
        Self: Sized;
}

/// Decode a scalar field, naming the field on failure.
/// Used by generated `Record::set_scalar` impls.
pub fn decode_field<T: FieldValue>(
    model: &'static EntityModel,
    index: usize,
    value: &Value,
) -> Result<T, ScanError> {
    T::from_value(value).ok_or_else(|| {
        let field = &model.fields[index];

        ScanError::Conversion {
            entity: model.entity_name,
            field: field.ident,
            ty: field.ty,
            value: value.clone(),
        }
    })
}

/// Error for a declare index that does not name a field of the requested kind.
/// Used by generated `Record::set_scalar` impls.
#[must_use]
pub fn not_a_scalar(model: &'static EntityModel, index: usize) -> ScanError {
    ScanError::structural(format!(
        "entity '{}' has no scalar field at index {index}",
        model.entity_name
    ))
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }

        T::from_value(value).map(Some)
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: &Value) -> Option<Self> {
        T::from_value(value).map(Self::new)
    }
}

impl_field_value_int!(
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
);

impl_field_value_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_accept_either_signedness_when_in_range() {
        assert_eq!(i64::from_value(&Value::Uint(5)), Some(5));
        assert_eq!(u8::from_value(&Value::Int(255)), Some(255));
        assert_eq!(u8::from_value(&Value::Int(256)), None);
        assert_eq!(u32::from_value(&Value::Int(-1)), None);
        assert_eq!(i64::from_value(&Value::text("5")), None);
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::from_value(&Value::Int(2)), Some(2.0));
        assert_eq!(f64::from_value(&Value::Float64(0.5)), Some(0.5));
        assert_eq!(f64::from_value(&Value::Null), None);
    }

    #[test]
    fn option_maps_null_to_none() {
        assert_eq!(Option::<String>::from_value(&Value::Null), Some(None));
        assert_eq!(
            Option::<String>::from_value(&Value::text("HarperCollins")),
            Some(Some("HarperCollins".to_string()))
        );
        assert_eq!(Option::<String>::from_value(&Value::Int(1)), None);
    }

    #[test]
    fn non_option_rejects_null() {
        assert_eq!(String::from_value(&Value::Null), None);
        assert_eq!(i64::from_value(&Value::Null), None);
    }
}
