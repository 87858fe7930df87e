//! Parsing of JVM type and method descriptors.
//!
//! Descriptors are the compact textual type encoding used by compiled
//! class files: `I` for int, `[Ljava/lang/String;` for `String[]`,
//! `(ILjava/lang/String;)Z` for `boolean f(int, String)`. Parsing is a
//! pure function over the session's symbol table; structurally identical
//! descriptors resolve to equal types with identical class symbols.
//! Malformed text is a hard parse failure, never silently recovered.

use crate::context::DependencyContext;
use crate::error::ModelError;
use crate::types::{PrimitiveKind, TypeRepr};

/// Parses a single type descriptor, requiring the whole input to be consumed.
pub fn parse_type_descriptor(
    ctx: &DependencyContext,
    text: &str,
) -> Result<TypeRepr, ModelError> {
    let mut rest = text;
    let ty = parse_prefix(ctx, text, &mut rest)?;
    if !rest.is_empty() {
        return Err(ModelError::malformed(
            text,
            format!("trailing characters '{rest}'"),
        ));
    }
    Ok(ty)
}

/// Parses a method descriptor of the form `(<arg types>)<return type>`.
///
/// Returns the ordered argument-type sequence and the return type.
pub fn parse_method_descriptor(
    ctx: &DependencyContext,
    text: &str,
) -> Result<(Vec<TypeRepr>, TypeRepr), ModelError> {
    let mut rest = text
        .strip_prefix('(')
        .ok_or_else(|| ModelError::malformed(text, "expected '('"))?;

    let mut args = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(ModelError::malformed(text, "unterminated argument list"));
        }
        let arg = parse_prefix(ctx, text, &mut rest)?;
        if arg == TypeRepr::Primitive(PrimitiveKind::Void) {
            return Err(ModelError::malformed(text, "void argument type"));
        }
        args.push(arg);
    }

    let ret = parse_prefix(ctx, text, &mut rest)?;
    if !rest.is_empty() {
        return Err(ModelError::malformed(
            text,
            format!("trailing characters '{rest}'"),
        ));
    }
    Ok((args, ret))
}

/// Parses one type from the front of `*rest`, advancing it past the type.
///
/// `whole` is the full descriptor being parsed, used only for error text.
fn parse_prefix<'a>(
    ctx: &DependencyContext,
    whole: &str,
    rest: &mut &'a str,
) -> Result<TypeRepr, ModelError> {
    let mut chars = rest.char_indices();
    let (_, first) = chars
        .next()
        .ok_or_else(|| ModelError::malformed(whole, "unexpected end of descriptor"))?;

    match first {
        '[' => {
            *rest = &rest[1..];
            let element = parse_prefix(ctx, whole, rest)?;
            if element == TypeRepr::Primitive(PrimitiveKind::Void) {
                return Err(ModelError::malformed(whole, "array of void"));
            }
            Ok(TypeRepr::Array(Box::new(element)))
        }
        'L' => {
            let semi = rest
                .find(';')
                .ok_or_else(|| ModelError::malformed(whole, "missing ';' after class name"))?;
            let name = &rest[1..semi];
            if name.is_empty() {
                return Err(ModelError::malformed(whole, "empty class name"));
            }
            *rest = &rest[semi + 1..];
            Ok(TypeRepr::class(ctx, name))
        }
        c => match PrimitiveKind::from_descriptor_char(c) {
            Some(kind) => {
                *rest = &rest[c.len_utf8()..];
                Ok(TypeRepr::Primitive(kind))
            }
            None => Err(ModelError::malformed(
                whole,
                format!("unexpected character '{c}'"),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_primitives() {
        let ctx = DependencyContext::new();
        for (text, kind) in [
            ("I", PrimitiveKind::Int),
            ("J", PrimitiveKind::Long),
            ("Z", PrimitiveKind::Boolean),
            ("V", PrimitiveKind::Void),
        ] {
            assert_eq!(
                parse_type_descriptor(&ctx, text).unwrap(),
                TypeRepr::Primitive(kind)
            );
        }
    }

    #[test]
    fn parse_class() {
        let ctx = DependencyContext::new();
        let ty = parse_type_descriptor(&ctx, "Ljava/util/List;").unwrap();
        assert_eq!(ty, TypeRepr::class(&ctx, "java/util/List"));
    }

    #[test]
    fn parse_nested_array() {
        let ctx = DependencyContext::new();
        let ty = parse_type_descriptor(&ctx, "[[Ljava/lang/String;").unwrap();
        assert_eq!(
            ty,
            TypeRepr::Array(Box::new(TypeRepr::Array(Box::new(TypeRepr::class(
                &ctx,
                "java/lang/String"
            )))))
        );
    }

    #[test]
    fn resolve_is_idempotent() {
        let ctx = DependencyContext::new();
        let a = parse_type_descriptor(&ctx, "[Lcom/example/Foo;").unwrap();
        let b = parse_type_descriptor(&ctx, "[Lcom/example/Foo;").unwrap();
        assert_eq!(a, b);
        // Class symbols are interned, so the round-trip text matches too.
        assert_eq!(a.descriptor(&ctx), b.descriptor(&ctx));
    }

    #[test]
    fn descriptor_roundtrip() {
        let ctx = DependencyContext::new();
        for text in ["I", "[[J", "Ljava/lang/Object;", "[Ljava/util/Map;"] {
            let ty = parse_type_descriptor(&ctx, text).unwrap();
            assert_eq!(ty.descriptor(&ctx), text);
        }
    }

    #[test]
    fn parse_method() {
        let ctx = DependencyContext::new();
        let (args, ret) =
            parse_method_descriptor(&ctx, "(ILjava/lang/String;[J)Z").unwrap();
        assert_eq!(
            args,
            vec![
                TypeRepr::Primitive(PrimitiveKind::Int),
                TypeRepr::class(&ctx, "java/lang/String"),
                TypeRepr::Array(Box::new(TypeRepr::Primitive(PrimitiveKind::Long))),
            ]
        );
        assert_eq!(ret, TypeRepr::Primitive(PrimitiveKind::Boolean));
    }

    #[test]
    fn parse_no_arg_void_method() {
        let ctx = DependencyContext::new();
        let (args, ret) = parse_method_descriptor(&ctx, "()V").unwrap();
        assert!(args.is_empty());
        assert_eq!(ret, TypeRepr::Primitive(PrimitiveKind::Void));
    }

    #[test]
    fn malformed_inputs_rejected() {
        let ctx = DependencyContext::new();
        for text in ["", "Q", "Ljava/lang/String", "L;", "IJ", "[", "[V"] {
            assert!(
                parse_type_descriptor(&ctx, text).is_err(),
                "expected failure for {text:?}"
            );
        }
        for text in ["I)V", "(IV", "(V)I", "()VX"] {
            assert!(
                parse_method_descriptor(&ctx, text).is_err(),
                "expected failure for {text:?}"
            );
        }
    }
}
