use crate::{error::ScanError, model::EntityModel};

///
/// EntityFieldModel
/// Declared field metadata, one per struct field in declaration order.
///

#[derive(Debug)]
pub struct EntityFieldModel {
    /// Rust field identifier.
    pub ident: &'static str,
    /// Raw `name[,pk]` annotation; `None` leaves the field unmapped.
    pub tag: Option<&'static str>,
    /// Declared type as written, for diagnostics.
    pub ty: &'static str,
    /// Scalar column or nested relation.
    pub kind: EntityFieldKind,
}

impl EntityFieldModel {
    /// Parse this field's annotation, if it carries one.
    pub fn annotation(&self) -> Result<Option<Annotation<'static>>, ScanError> {
        self.tag.map(Annotation::parse).transpose()
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self.kind, EntityFieldKind::Scalar)
    }

    /// Model of the nested entity for relation fields.
    #[must_use]
    pub fn nested(&self) -> Option<&'static EntityModel> {
        match self.kind {
            EntityFieldKind::Scalar => None,
            EntityFieldKind::One(model) | EntityFieldKind::Many(model) => Some(model()),
        }
    }
}

///
/// EntityFieldKind
///
/// Nested models are reached through function pointers so that self- and
/// mutually-referential entities can still be described by statics.
///

#[derive(Clone, Copy, Debug)]
pub enum EntityFieldKind {
    /// Column-backed value.
    Scalar,
    /// Single optional nested entity (`Option<Box<T>>`).
    One(fn() -> &'static EntityModel),
    /// Ordered sequence of nested entities (`Vec<T>`).
    Many(fn() -> &'static EntityModel),
}

///
/// Annotation
/// Parsed form of a `name[,pk]` field annotation.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Annotation<'a> {
    pub name: &'a str,
    pub pk: bool,
}

impl<'a> Annotation<'a> {
    pub const OPTION_PK: &'static str = "pk";

    /// Split on `,`, trim every part, and read the options after the name.
    /// Empty option parts are ignored; unknown options are rejected.
    pub fn parse(tag: &'a str) -> Result<Self, ScanError> {
        let mut parts = tag.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(ScanError::structural(format!(
                "annotation '{tag}' has an empty field name"
            )));
        }

        let mut pk = false;
        for option in parts.filter(|part| !part.is_empty()) {
            match option {
                Self::OPTION_PK => pk = true,
                other => {
                    return Err(ScanError::structural(format!(
                        "annotation '{tag}' has unknown option '{other}'"
                    )));
                }
            }
        }

        Ok(Self { name, pk })
    }
}
