use crate::util::single_type_arg;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Error, Expr, ExprLit, Field, Fields, Ident, Lit, Type};

// derive_entity
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

///
/// FieldKind
///

enum FieldKind<'a> {
    Scalar,
    One(&'a Type),
    Many(&'a Type),
}

///
/// FieldDef
/// One struct field as seen by the derive.
///

struct FieldDef<'a> {
    index: usize,
    ident: &'a Ident,
    ty: &'a Type,
    tag: Option<String>,
    kind: FieldKind<'a>,
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic types",
        ));
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Entity can only be derived for structs with named fields",
            ));
        }
    };

    let fields = named
        .iter()
        .enumerate()
        .map(|(index, field)| parse_field(index, field))
        .collect::<Result<Vec<_>, _>>()?;

    let entity_name = ident.to_string();
    let field_models = fields.iter().map(field_model);

    let scalar_fields: Vec<_> = fields
        .iter()
        .filter(|f| f.tag.is_some() && matches!(f.kind, FieldKind::Scalar))
        .collect();

    let scalar_arms = scalar_fields.iter().map(|f| {
        let index = f.index;
        let field_ident = f.ident;

        quote! {
            #index => ::core::option::Option::Some(
                ::scansion::traits::FieldValue::to_value(&self.#field_ident)
            ),
        }
    });

    let set_scalar_arms = scalar_fields.iter().map(|f| {
        let index = f.index;
        let field_ident = f.ident;

        quote! {
            #index => {
                self.#field_ident = ::scansion::traits::decode_field(model, #index, value)?;
                ::core::result::Result::Ok(())
            }
        }
    });

    let relation_arms = fields.iter().filter_map(|f| {
        let index = f.index;
        let field_ident = f.ident;

        match f.kind {
            FieldKind::Scalar => None,
            FieldKind::One(_) => Some(quote! {
                #index => ::core::option::Option::Some(
                    ::scansion::traits::RelationMut::One(&mut self.#field_ident)
                ),
            }),
            FieldKind::Many(_) => Some(quote! {
                #index => ::core::option::Option::Some(
                    ::scansion::traits::RelationMut::Many(&mut self.#field_ident)
                ),
            }),
        }
    });

    Ok(quote! {
        #[automatically_derived]
        impl ::scansion::traits::Entity for #ident {
            const MODEL: &'static ::scansion::model::EntityModel = &::scansion::model::EntityModel {
                path: ::core::concat!(::core::module_path!(), "::", #entity_name),
                entity_name: #entity_name,
                fields: &[#(#field_models),*],
                new_record: ::scansion::model::new_record::<#ident>,
            };
        }

        #[automatically_derived]
        impl ::scansion::traits::Record for #ident {
            fn model(&self) -> &'static ::scansion::model::EntityModel {
                <Self as ::scansion::traits::Entity>::MODEL
            }

            fn scalar(&self, index: usize) -> ::core::option::Option<::scansion::value::Value> {
                match index {
                    #(#scalar_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_scalar(
                &mut self,
                index: usize,
                value: &::scansion::value::Value,
            ) -> ::core::result::Result<(), ::scansion::error::ScanError> {
                let model = <Self as ::scansion::traits::Entity>::MODEL;

                match index {
                    #(#set_scalar_arms)*
                    _ => ::core::result::Result::Err(::scansion::traits::not_a_scalar(model, index)),
                }
            }

            fn relation_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<::scansion::traits::RelationMut<'_>> {
                match index {
                    #(#relation_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn into_any(
                self: ::std::boxed::Box<Self>,
            ) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }
        }
    })
}

fn parse_field(index: usize, field: &Field) -> Result<FieldDef<'_>, Error> {
    let Some(ident) = field.ident.as_ref() else {
        return Err(Error::new_spanned(field, "expected a named field"));
    };

    let mut tag = None;
    let mut relation = false;

    for attr in &field.attrs {
        if attr.path().is_ident("db") {
            if tag.is_some() {
                return Err(Error::new_spanned(attr, "duplicate #[db] attribute"));
            }
            tag = Some(parse_tag(attr)?);
        } else if attr.path().is_ident("relation") {
            attr.meta.require_path_only()?;
            relation = true;
        }
    }

    let kind = if relation {
        classify_relation(&field.ty)?
    } else {
        FieldKind::Scalar
    };

    Ok(FieldDef {
        index,
        ident,
        ty: &field.ty,
        tag,
        kind,
    })
}

// #[db = "name[,pk]"]
fn parse_tag(attr: &syn::Attribute) -> Result<String, Error> {
    let name_value = attr.meta.require_name_value()?;

    match &name_value.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => Ok(lit.value()),
        other => Err(Error::new_spanned(
            other,
            "expected a string literal, e.g. #[db = \"id,pk\"]",
        )),
    }
}

fn classify_relation(ty: &Type) -> Result<FieldKind<'_>, Error> {
    if let Some(inner) = single_type_arg(ty, "Vec") {
        return Ok(FieldKind::Many(inner));
    }

    if let Some(inner) = single_type_arg(ty, "Option").and_then(|opt| single_type_arg(opt, "Box"))
    {
        return Ok(FieldKind::One(inner));
    }

    Err(Error::new_spanned(
        ty,
        "#[relation] fields must be `Vec<T>` or `Option<Box<T>>`",
    ))
}

fn field_model(field: &FieldDef<'_>) -> TokenStream {
    let ident = field.ident.to_string();
    let ty = field.ty.to_token_stream().to_string().replace(' ', "");
    let tag = match &field.tag {
        Some(tag) => quote!(::core::option::Option::Some(#tag)),
        None => quote!(::core::option::Option::None),
    };
    let kind = match field.kind {
        FieldKind::Scalar => quote!(::scansion::model::EntityFieldKind::Scalar),
        FieldKind::One(inner) => quote! {
            ::scansion::model::EntityFieldKind::One(::scansion::model::model_of::<#inner>)
        },
        FieldKind::Many(inner) => quote! {
            ::scansion::model::EntityFieldKind::Many(::scansion::model::model_of::<#inner>)
        },
    };

    quote! {
        ::scansion::model::EntityFieldModel {
            ident: #ident,
            tag: #tag,
            ty: #ty,
            kind: #kind,
        }
    }
}
