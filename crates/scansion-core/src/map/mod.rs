//! Field map: path-indexed metadata for everything a scan can address.
//!
//! Built by walking an entity's static model depth first. Nested entities are
//! expanded once per branch; a field that would revisit a path segment or an
//! entity type already on the current branch is left out of the map. The
//! root is not on the branch, so a self-referential root expands one level.


use crate::{
    PATH_SEPARATOR,
    error::ScanError,
    model::{EntityFieldKind, EntityModel},
    traits::{Entity, Record},
    value::Value,
};
use derive_more::Deref;
use std::collections::{BTreeMap, btree_map::Entry};

///
/// FieldMapEntry
///

#[derive(Clone, Copy, Debug)]
pub struct FieldMapEntry {
    /// Declared type as written (root: the entity path).
    pub ty: &'static str,
    /// Entity that declares the field (root: the root entity itself).
    pub owner: &'static EntityModel,
    /// Declare index within `owner`.
    pub index: usize,
    /// Set for everything below a single optional relation.
    pub optional: bool,
    /// Annotation base name (root: empty).
    pub column: &'static str,
    pub pk: bool,
    pub kind: EntryKind,
}

impl FieldMapEntry {
    /// Entity stored at this path, for the root and relation entries.
    #[must_use]
    pub const fn target(&self) -> Option<&'static EntityModel> {
        match self.kind {
            EntryKind::Root(model) | EntryKind::One(model) | EntryKind::Many(model) => Some(model),
            EntryKind::Scalar => None,
        }
    }

    /// Whether an all-null run at this path means "absent".
    /// True for every relation and everything nested below a single one.
    #[must_use]
    pub const fn path_optional(&self) -> bool {
        self.optional || matches!(self.kind, EntryKind::One(_) | EntryKind::Many(_))
    }
}

///
/// EntryKind
///

#[derive(Clone, Copy, Debug)]
pub enum EntryKind {
    Root(&'static EntityModel),
    Scalar,
    One(&'static EntityModel),
    Many(&'static EntityModel),
}

///
/// FieldMap
///
/// Immutable once built; safe to reuse for every scan of the same root type.
///

#[derive(Clone, Debug, Deref)]
pub struct FieldMap {
    root: &'static EntityModel,
    #[deref]
    entries: BTreeMap<String, FieldMapEntry>,
}

impl FieldMap {
    /// Build the field map for entity type `E`.
    pub fn of<E: Entity>() -> Result<Self, ScanError> {
        Self::build(E::MODEL)
    }

    /// Build the field map for the type of a live instance.
    pub fn for_record(record: &dyn Record) -> Result<Self, ScanError> {
        Self::build(record.model())
    }

    pub fn build(root: &'static EntityModel) -> Result<Self, ScanError> {
        let mut map = Self {
            root,
            entries: BTreeMap::new(),
        };

        let mut path = Vec::new();
        let mut visited = Vec::new();
        map.walk(root, &mut path, &mut visited, false)?;

        map.insert(
            String::new(),
            FieldMapEntry {
                ty: root.path,
                owner: root,
                index: 0,
                optional: false,
                column: "",
                pk: false,
                kind: EntryKind::Root(root),
            },
        )?;

        log::debug!(
            "built field map for '{}' with {} entries",
            root.path,
            map.entries.len()
        );

        Ok(map)
    }

    #[must_use]
    pub const fn root(&self) -> &'static EntityModel {
        self.root
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Declare indices of the scalar fields filled by a run at `path`.
    pub fn scalar_fields(&self, path: &str) -> Result<Vec<usize>, ScanError> {
        let target = self
            .entries
            .get(path)
            .and_then(FieldMapEntry::target)
            .ok_or_else(|| ScanError::unknown_path(path))?;

        Ok(target.scalar_indices().collect())
    }

    fn walk(
        &mut self,
        model: &'static EntityModel,
        path: &mut Vec<&'static str>,
        visited: &mut Vec<&'static EntityModel>,
        optional: bool,
    ) -> Result<(), ScanError> {
        for (index, field) in model.fields.iter().enumerate() {
            let Some(annotation) = field.annotation()? else {
                continue;
            };
            let name = annotation.name;

            let kind = match field.kind {
                EntityFieldKind::Scalar => EntryKind::Scalar,
                EntityFieldKind::One(nested) => EntryKind::One(nested()),
                EntityFieldKind::Many(nested) => EntryKind::Many(nested()),
            };

            if let Some(nested) = field.nested() {
                if path.contains(&name) || visited.iter().any(|v| v.is_same_type(nested)) {
                    log::trace!(
                        "not expanding '{}' under '{}': already on this branch",
                        name,
                        join_path(path, "")
                    );
                    continue;
                }

                let nested_optional = optional || matches!(kind, EntryKind::One(_));

                path.push(name);
                visited.push(nested);
                let walked = self.walk(nested, path, visited, nested_optional);
                visited.pop();
                path.pop();
                walked?;
            }

            self.insert(
                join_path(path, name),
                FieldMapEntry {
                    ty: field.ty,
                    owner: model,
                    index,
                    optional,
                    column: name,
                    pk: annotation.pk,
                    kind,
                },
            )?;
        }

        Ok(())
    }

    fn insert(&mut self, path: String, entry: FieldMapEntry) -> Result<(), ScanError> {
        match self.entries.entry(path) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
            Entry::Occupied(slot) => Err(ScanError::structural(format!(
                "scoped path '{}' is declared more than once",
                slot.key()
            ))),
        }
    }
}

///
/// PATHS
///

fn join_path(path: &[&str], name: &str) -> String {
    let mut joined = path.join(".");
    if !name.is_empty() {
        if !joined.is_empty() {
            joined.push(PATH_SEPARATOR);
        }
        joined.push_str(name);
    }

    joined
}

/// Split a non-root scoped path into `(parent path, field name)`.
#[must_use]
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    if path.is_empty() {
        return None;
    }

    Some(path.rsplit_once(PATH_SEPARATOR).unwrap_or(("", path)))
}

/// Number of segments in a scoped path; the root has depth 0.
#[must_use]
pub fn path_depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split(PATH_SEPARATOR).count()
    }
}

///
/// PRIMARY KEYS
///

/// Value of the record's single `pk` field.
pub fn primary_key(record: &dyn Record) -> Result<Value, ScanError> {
    let index = record.model().primary_key_index()?;

    primary_key_at(record, index)
}

/// Key value at an already resolved `pk` declare index.
pub fn primary_key_at(record: &dyn Record, index: usize) -> Result<Value, ScanError> {
    let model = record.model();

    record.scalar(index).ok_or_else(|| {
        ScanError::structural(format!(
            "primary key '{}.{}' is not a scalar field",
            model.entity_name, model.fields[index].ident
        ))
    })
}

/// Primary key read through one level of optional reference.
pub fn primary_key_of<E: Entity>(entity: Option<&E>) -> Result<Value, ScanError> {
    let record = entity.ok_or_else(|| {
        ScanError::structural(format!(
            "cannot read the primary key of an absent '{}'",
            E::MODEL.entity_name
        ))
    })?;

    primary_key(record)
}
