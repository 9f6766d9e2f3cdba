use typeval_types::{TypeFlags, TypeHost, TypeId};

use crate::{CompileError, CompileOptions};

/// The handler a type is compiled by.
///
/// Category flags overlap, so a type is resolved once by checking the
/// predicates of [`Category::resolve`] in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category<'a> {
    /// `never`, `null` and `undefined`.
    Never,
    Literal,
    /// A well-known named type mapped to a validator keyword.
    Predefined(&'a str),
    Buffer,
    Enum,
    /// `"string"`, `"number"` or `"boolean"`.
    Primitive(&'static str),
    Any,
    Array,
    Record,
    Union,
    Intersection,
}

impl<'a> Category<'a> {
    pub fn resolve<H: TypeHost + ?Sized>(
        host: &H,
        options: &'a CompileOptions,
        ty: TypeId,
    ) -> Result<Self, CompileError> {
        let flags = host.flags(ty);
        let name = host.display_name(ty);

        if flags.intersects(TypeFlags::NEVER | TypeFlags::UNDEFINED | TypeFlags::NULL) {
            return Ok(Category::Never);
        }
        if flags.intersects(TypeFlags::LITERAL) {
            return Ok(Category::Literal);
        }
        if let Some(keyword) = name.and_then(|name| options.predefined_keyword(name)) {
            return Ok(Category::Predefined(keyword));
        }
        if name == Some(options.buffer_type.as_str()) {
            return Ok(Category::Buffer);
        }
        if flags.intersects(TypeFlags::ENUM_LIKE) {
            return Ok(Category::Enum);
        }
        if flags.intersects(TypeFlags::STRING_LIKE) {
            return Ok(Category::Primitive("string"));
        }
        if flags.intersects(TypeFlags::NUMBER_LIKE) {
            return Ok(Category::Primitive("number"));
        }
        if flags.intersects(TypeFlags::BOOLEAN_LIKE) {
            return Ok(Category::Primitive("boolean"));
        }
        if flags.intersects(TypeFlags::ANY | TypeFlags::UNKNOWN | TypeFlags::VOID_LIKE) {
            return Ok(Category::Any);
        }
        if flags.intersects(TypeFlags::OBJECT) {
            return Ok(if host.is_array(ty) {
                Category::Array
            } else {
                Category::Record
            });
        }
        if flags.intersects(TypeFlags::UNION) {
            return Ok(Category::Union);
        }
        if flags.intersects(TypeFlags::INTERSECTION) {
            return Ok(Category::Intersection);
        }
        Err(CompileError::UnsupportedCategory {
            type_name: host.type_to_string(ty),
        })
    }

    /// Categories compiled to a single keyword rule, which carries the root
    /// marker when outermost.
    pub fn is_keyword(self) -> bool {
        !matches!(
            self,
            Category::Record | Category::Union | Category::Intersection
        )
    }
}
