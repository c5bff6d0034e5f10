use syn::{GenericArgument, PathArguments, Type};

/// True when the last path segment of `ty` is `ident`.
pub fn is_path_ident(ty: &Type, ident: &str) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == ident)
}

/// The single generic type argument of `Wrapper<T>`, if `ty` is one.
pub fn single_type_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    if !is_path_ident(ty, wrapper) {
        return None;
    }

    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };

    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });

    match (types.next(), types.next()) {
        (Some(inner), None) => Some(inner),
        _ => None,
    }
}
