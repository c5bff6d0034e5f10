use proc_macro::TokenStream;

mod entity;
mod util;

/// Derive the static `EntityModel` and the `Record` accessors for a struct.
///
/// Field attributes:
/// - `#[db = "name[,pk]"]` maps the field; unannotated fields are skipped by scans.
/// - `#[relation]` marks a nested entity: `Vec<T>` or `Option<Box<T>>`.
#[proc_macro_derive(Entity, attributes(db, relation))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input.into()).into()
}
