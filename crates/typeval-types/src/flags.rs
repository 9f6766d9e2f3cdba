use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

/// Category flags of a type descriptor.
///
/// Flags overlap: an enum member is both [`TypeFlags::ENUM_LITERAL`] and a
/// string or number literal, a boolean literal is also boolean-like, and an
/// enum type is also a union. Consumers must test them in a fixed order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeFlags(u32);

impl TypeFlags {
    pub const NONE: Self = Self(0);
    pub const ANY: Self = Self(1 << 0);
    pub const UNKNOWN: Self = Self(1 << 1);
    pub const STRING: Self = Self(1 << 2);
    pub const NUMBER: Self = Self(1 << 3);
    pub const BOOLEAN: Self = Self(1 << 4);
    pub const BIGINT: Self = Self(1 << 5);
    pub const ENUM: Self = Self(1 << 6);
    pub const ENUM_LITERAL: Self = Self(1 << 7);
    pub const STRING_LITERAL: Self = Self(1 << 8);
    pub const NUMBER_LITERAL: Self = Self(1 << 9);
    pub const BOOLEAN_LITERAL: Self = Self(1 << 10);
    pub const BIGINT_LITERAL: Self = Self(1 << 11);
    pub const VOID: Self = Self(1 << 12);
    pub const UNDEFINED: Self = Self(1 << 13);
    pub const NULL: Self = Self(1 << 14);
    pub const NEVER: Self = Self(1 << 15);
    pub const OBJECT: Self = Self(1 << 16);
    pub const UNION: Self = Self(1 << 17);
    pub const INTERSECTION: Self = Self(1 << 18);

    pub const LITERAL: Self = Self(
        Self::STRING_LITERAL.0 | Self::NUMBER_LITERAL.0 | Self::BOOLEAN_LITERAL.0 | Self::BIGINT_LITERAL.0,
    );
    pub const STRING_LIKE: Self = Self(Self::STRING.0 | Self::STRING_LITERAL.0);
    pub const NUMBER_LIKE: Self = Self(Self::NUMBER.0 | Self::NUMBER_LITERAL.0 | Self::ENUM.0);
    pub const BOOLEAN_LIKE: Self = Self(Self::BOOLEAN.0 | Self::BOOLEAN_LITERAL.0);
    pub const ENUM_LIKE: Self = Self(Self::ENUM.0 | Self::ENUM_LITERAL.0);
    pub const VOID_LIKE: Self = Self(Self::VOID.0 | Self::UNDEFINED.0);

    const NAMES: &[(Self, &'static str)] = &[
        (Self::ANY, "Any"),
        (Self::UNKNOWN, "Unknown"),
        (Self::STRING, "String"),
        (Self::NUMBER, "Number"),
        (Self::BOOLEAN, "Boolean"),
        (Self::BIGINT, "BigInt"),
        (Self::ENUM, "Enum"),
        (Self::ENUM_LITERAL, "EnumLiteral"),
        (Self::STRING_LITERAL, "StringLiteral"),
        (Self::NUMBER_LITERAL, "NumberLiteral"),
        (Self::BOOLEAN_LITERAL, "BooleanLiteral"),
        (Self::BIGINT_LITERAL, "BigIntLiteral"),
        (Self::VOID, "Void"),
        (Self::UNDEFINED, "Undefined"),
        (Self::NULL, "Null"),
        (Self::NEVER, "Never"),
        (Self::OBJECT, "Object"),
        (Self::UNION, "Union"),
        (Self::INTERSECTION, "Intersection"),
    ];

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// At least one bit of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for TypeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TypeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for TypeFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for TypeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("TypeFlags(None)");
        }
        f.write_str("TypeFlags(")?;
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(*flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_overlap() {
        let enum_member = TypeFlags::ENUM_LITERAL | TypeFlags::STRING_LITERAL;
        assert!(enum_member.intersects(TypeFlags::LITERAL));
        assert!(enum_member.intersects(TypeFlags::ENUM_LIKE));
        assert!(enum_member.intersects(TypeFlags::STRING_LIKE));
        assert!(!enum_member.intersects(TypeFlags::NUMBER_LIKE));
    }

    #[test]
    fn test_contains_requires_all_bits() {
        let flags = TypeFlags::ENUM | TypeFlags::UNION;
        assert!(flags.contains(TypeFlags::UNION));
        assert!(!flags.contains(TypeFlags::UNION | TypeFlags::OBJECT));
    }

    #[test]
    fn test_debug_lists_names() {
        let flags = TypeFlags::NULL | TypeFlags::OBJECT;
        assert_eq!(format!("{flags:?}"), "TypeFlags(Null | Object)");
        assert_eq!(format!("{:?}", TypeFlags::NONE), "TypeFlags(None)");
    }
}
