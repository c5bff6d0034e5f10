use crate::{
    error::ScanError,
    map::primary_key_at,
    traits::{Entity, Record, downcast_record},
    value::Value,
};

///
/// RelationMut
/// Mutable handle to one relation field of a record.
///

pub enum RelationMut<'a> {
    One(&'a mut dyn OneSlot),
    Many(&'a mut dyn ManySlot),
}

///
/// ManySlot
///
/// One-to-many storage. Only ever grows; children keep first-seen order.
///

pub trait ManySlot {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, position: usize) -> Option<&dyn Record>;

    fn get_mut(&mut self, position: usize) -> Option<&mut dyn Record>;

    /// Append a child and return its position.
    fn push(&mut self, record: Box<dyn Record>) -> Result<usize, ScanError>;

    /// Position of the first child whose key field `key_index` equals `key`.
    fn position_of(&self, key_index: usize, key: &Value) -> Result<Option<usize>, ScanError> {
        for position in 0..self.len() {
            if let Some(child) = self.get(position)
                && primary_key_at(child, key_index)?.key_eq(key)
            {
                return Ok(Some(position));
            }
        }

        Ok(None)
    }
}

impl<T: Entity> ManySlot for Vec<T> {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, position: usize) -> Option<&dyn Record> {
        <[T]>::get(self, position).map(|child| child as &dyn Record)
    }

    fn get_mut(&mut self, position: usize) -> Option<&mut dyn Record> {
        <[T]>::get_mut(self, position).map(|child| child as &mut dyn Record)
    }

    fn push(&mut self, record: Box<dyn Record>) -> Result<usize, ScanError> {
        let child = downcast_record::<T>(record)?;
        Vec::push(self, child);

        Ok(self.len() - 1)
    }
}

///
/// OneSlot
///
/// Single optional nested entity. `is_present` is the presence predicate;
/// the merger sets the slot at most once.
///

pub trait OneSlot {
    fn is_present(&self) -> bool {
        self.get().is_some()
    }

    fn get(&self) -> Option<&dyn Record>;

    fn get_mut(&mut self) -> Option<&mut dyn Record>;

    /// Fill an empty slot. Replacing a present value is a structural error.
    fn set(&mut self, record: Box<dyn Record>) -> Result<(), ScanError>;
}

impl<T: Entity> OneSlot for Option<Box<T>> {
    fn get(&self) -> Option<&dyn Record> {
        self.as_deref().map(|child| child as &dyn Record)
    }

    fn get_mut(&mut self) -> Option<&mut dyn Record> {
        self.as_deref_mut().map(|child| child as &mut dyn Record)
    }

    fn set(&mut self, record: Box<dyn Record>) -> Result<(), ScanError> {
        if self.is_some() {
            return Err(ScanError::structural(format!(
                "single relation of type '{}' is already set",
                T::MODEL.entity_name
            )));
        }

        *self = Some(Box::new(downcast_record::<T>(record)?));

        Ok(())
    }
}
