use crate::{
    error::ScanError,
    model::field::EntityFieldModel,
    traits::{Entity, Record},
};
use std::fmt;

///
/// EntityModel
/// Static schema descriptor for one entity type.
///

pub struct EntityModel {
    /// Fully-qualified Rust type path; identifies the type in visited sets.
    pub path: &'static str,
    /// Short name used in diagnostics.
    pub entity_name: &'static str,
    /// Every declared field in declaration order, mapped or not.
    pub fields: &'static [EntityFieldModel],
    /// Allocate a fresh default instance.
    pub new_record: fn() -> Box<dyn Record>,
}

impl EntityModel {
    #[must_use]
    pub fn field(&self, ident: &str) -> Option<&EntityFieldModel> {
        self.fields.iter().find(|f| f.ident == ident)
    }

    /// Same Rust type, compared by path.
    #[must_use]
    pub fn is_same_type(&self, other: &Self) -> bool {
        self.path == other.path
    }

    /// Declare indices of annotated scalar fields, in declaration order.
    /// These are the fields a scan run fills, one column each.
    pub fn scalar_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.tag.is_some() && field.is_scalar())
            .map(|(index, _)| index)
    }

    /// Declare index of the single `pk` field.
    ///
    /// Only this type's own fields are inspected; nested entities carry
    /// their own keys.
    pub fn primary_key_index(&self) -> Result<usize, ScanError> {
        let mut found = Vec::new();
        for (index, field) in self.fields.iter().enumerate() {
            if field.annotation()?.is_some_and(|a| a.pk) {
                found.push(index);
            }
        }

        match found.as_slice() {
            [index] => Ok(*index),
            _ => Err(ScanError::PrimaryKey {
                entity: self.entity_name,
                found: found.len(),
            }),
        }
    }
}

impl fmt::Debug for EntityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityModel")
            .field("path", &self.path)
            .field("entity_name", &self.entity_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Allocator used as `EntityModel::new_record` by generated models.
#[must_use]
pub fn new_record<E: Entity>() -> Box<dyn Record> {
    Box::new(E::default())
}

/// Model accessor used by generated `EntityFieldKind` entries.
#[must_use]
pub fn model_of<E: Entity>() -> &'static EntityModel {
    E::MODEL
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ScanErrorKind,
        test_fixtures::{Author, Book, NoKey, TwoKeys},
        traits::Entity,
    };

    #[test]
    fn scalar_indices_skip_relations_and_unmapped_fields() {
        let indices: Vec<_> = Author::MODEL.scalar_indices().collect();

        // id, name, publisher, hometown_id; not hometown, books, or notes
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn primary_key_index_finds_single_pk() {
        assert_eq!(Book::MODEL.primary_key_index().unwrap(), 0);
    }

    #[test]
    fn primary_key_index_rejects_zero_and_many() {
        let err = NoKey::MODEL.primary_key_index().unwrap_err();
        assert_eq!(err.kind(), ScanErrorKind::PrimaryKey);

        let err = TwoKeys::MODEL.primary_key_index().unwrap_err();
        assert!(matches!(
            err,
            crate::error::ScanError::PrimaryKey { found: 2, .. }
        ));
    }
}
