//! The non-generic Java type system the solver reasons over.
//!
//! Mirrors the three type shapes a loaded bytecode image can hand back for a
//! field, parameter, or return type: primitives, class types, and arrays of
//! either. Generics, wildcards, and type variables are not represented —
//! per the design's non-goals, the miner simply cannot produce a dependency
//! for a parameter that needs one.

use derive_more::Display;

/// One of the eight JVM primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum PrimitiveType {
    /// The `boolean` type.
    #[display("boolean")]
    Boolean,
    /// The `byte` type.
    #[display("byte")]
    Byte,
    /// The `short` type.
    #[display("short")]
    Short,
    /// The `char` type.
    #[display("char")]
    Char,
    /// The `int` type.
    #[display("int")]
    Int,
    /// The `long` type.
    #[display("long")]
    Long,
    /// The `float` type.
    #[display("float")]
    Float,
    /// The `double` type.
    #[display("double")]
    Double,
}

impl PrimitiveType {
    /// The lower-case Java spelling of the type, e.g. `"int"`.
    #[must_use]
    pub fn java_name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// A reference to a loaded class or interface, identified by its fully
/// qualified name.
///
/// Equality and hashing are structural on the name, matching the data
/// model's requirement that `Node`s compare by content rather than by
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{fully_qualified_name}")]
pub struct ClassType {
    /// The fully qualified name, e.g. `java.util.ArrayList` or
    /// `com.example.Widget`.
    pub fully_qualified_name: String,
}

impl ClassType {
    /// Creates a class type from a fully qualified name.
    #[must_use]
    pub fn new(fully_qualified_name: impl Into<String>) -> Self {
        Self {
            fully_qualified_name: fully_qualified_name.into(),
        }
    }

    /// The package name, i.e. everything before the last `.`, or the empty
    /// string for a type in the unnamed package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        self.fully_qualified_name
            .rfind('.')
            .map_or("", |idx| &self.fully_qualified_name[..idx])
    }

    /// The simple (unqualified) name: everything after the last `.` or `$`,
    /// whichever comes later (so `Outer$Inner` yields `Inner`, matching the
    /// JVM's inner-class naming).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let split_at = self
            .fully_qualified_name
            .rfind(['.', '$'])
            .map_or(0, |idx| idx + 1);
        &self.fully_qualified_name[split_at..]
    }

    /// Whether this type lives in a `java.*` package, i.e. is part of the
    /// JDK and should be treated as a black box by the miner.
    #[must_use]
    pub fn is_jdk(&self) -> bool {
        self.package_name() == "java" || self.package_name().starts_with("java.")
    }

    /// Inner-class `$` separators rewritten to `.`, the form the emitter
    /// uses for fully qualified names in generated source and the form
    /// dependency comments use for readability.
    #[must_use]
    pub fn dotted_name(&self) -> String {
        self.fully_qualified_name.replace('$', ".")
    }
}

/// An array type: an element type plus a dimension of at least one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    /// The element type, itself never an array (nesting is expressed via
    /// `dimension`).
    pub element_type: Box<Type>,
    /// The number of `[]` pairs, always `>= 1`.
    pub dimension: u8,
}

impl std::fmt::Display for ArrayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element_type)?;
        for _ in 0..self.dimension {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Any of the three type shapes the miner and emitter deal with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum Type {
    /// A primitive type.
    Primitive(PrimitiveType),
    /// A class or interface type.
    Class(ClassType),
    /// An array type.
    Array(ArrayType),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_name_splits_on_last_dot() {
        let t = ClassType::new("java.util.ArrayList");
        assert_eq!(t.package_name(), "java.util");
        assert_eq!(t.simple_name(), "ArrayList");
    }

    #[test]
    fn unnamed_package_has_empty_package_name() {
        let t = ClassType::new("Widget");
        assert_eq!(t.package_name(), "");
        assert_eq!(t.simple_name(), "Widget");
    }

    #[test]
    fn java_star_is_jdk() {
        assert!(ClassType::new("java.lang.Object").is_jdk());
        assert!(!ClassType::new("com.example.Widget").is_jdk());
    }

    #[test]
    fn dotted_name_replaces_dollar() {
        let t = ClassType::new("com.example.Outer$Inner");
        assert_eq!(t.dotted_name(), "com.example.Outer.Inner");
    }

    #[test]
    fn array_display_appends_brackets_per_dimension() {
        let t = Type::Array(ArrayType {
            element_type: Box::new(Type::Primitive(PrimitiveType::Int)),
            dimension: 2,
        });
        assert_eq!(t.to_string(), "int[][]");
    }
}
