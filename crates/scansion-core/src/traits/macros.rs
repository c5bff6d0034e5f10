// impl_field_value_int
//
// Integers decode from either `Int` or `Uint` as long as the number fits the
// target width; anything else is a conversion failure.
macro_rules! impl_field_value_int {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl FieldValue for $type {
                fn to_value(&self) -> Value {
                    Value::$variant((*self).into())
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => Self::try_from(*v).ok(),
                        Value::Uint(v) => Self::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

// impl_field_value_float
macro_rules! impl_field_value_float {
    ( $( $type:ty ),* $(,)? ) => {
        $(
            impl FieldValue for $type {
                fn to_value(&self) -> Value {
                    Value::Float64((*self).into())
                }

                #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Float64(v) => Some(*v as Self),
                        Value::Int(v) => Some(*v as Self),
                        Value::Uint(v) => Some(*v as Self),
                        _ => None,
                    }
                }
            }
        )*
    };
}
