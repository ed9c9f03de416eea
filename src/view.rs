//! The read-only facade over a loaded bytecode image.
//!
//! A [`View`] is the only thing the miner (see [`crate::miner`]) ever looks
//! at: it never parses `.class` bytes or `.jar` archives itself — producing
//! a `View` from a real bytecode image is treated as an external
//! collaborator's job (spec.md §1's "bytecode loading and class/method
//! reflection" is explicitly out of scope here). What lives in this module
//! is the shape of the data such a collaborator would hand back, plus one
//! concrete, in-memory implementation ([`fixture::FixtureView`]) used by
//! tests and by the `construct` binary.

use crate::types::{ClassType, Type};

pub mod fixture;

bitflags::bitflags! {
    /// Member and class access flags, as declared on a `Class` or `Method`.
    ///
    /// Only the subset the solver cares about is modeled; a real bytecode
    /// reflection layer would expose the full JVM access-flag set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessFlags: u16 {
        /// Declared `public`; may be constructed or called from outside its
        /// package.
        const PUBLIC = 0x0001;
        /// Declared `abstract`; must not be instantiated directly.
        const ABSTRACT = 0x0400;
        /// Declared `static`.
        const STATIC = 0x0008;
    }
}

/// A method or constructor belonging to a [`Class`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// The method's name. A constructor is named [`Method::CONSTRUCTOR_NAME`].
    pub name: String,
    /// Access flags; the miner and emitter only ever act on public methods.
    pub access_flags: AccessFlags,
    /// The class this method is declared on.
    pub declaring_class: ClassType,
    /// The declared parameter types, in order.
    pub parameter_types: Vec<Type>,
    /// The declared return type, or `None` for `void`.
    pub return_type: Option<Type>,
}

impl Method {
    /// The name the JVM gives to instance constructors.
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";
    /// The name the JVM gives to static initializers.
    pub const CLASS_INITIALIZER_NAME: &'static str = "<clinit>";

    /// Whether this method is declared `public`.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access_flags.contains(AccessFlags::PUBLIC)
    }

    /// Whether this method is declared `static`.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(AccessFlags::STATIC)
    }

    /// Whether this method is a constructor (`<init>`).
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR_NAME
    }

    /// The class type a method returns, if its return type is a class
    /// (as opposed to `void`, a primitive, or an array).
    #[must_use]
    pub fn returns_class(&self) -> Option<&ClassType> {
        match &self.return_type {
            Some(Type::Class(c)) => Some(c),
            _ => None,
        }
    }
}

/// A loaded class or interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    /// The fully qualified name and identity of this class.
    pub name: ClassType,
    /// Access flags; the miner only considers public classes constructible.
    pub access_flags: AccessFlags,
    /// The direct superclass, or `None` for `java.lang.Object` and
    /// interfaces.
    pub superclass: Option<ClassType>,
    /// Directly implemented interfaces.
    pub interfaces: Vec<ClassType>,
    /// All declared methods, including constructors.
    pub methods: Vec<Method>,
}

impl Class {
    /// Whether this class is declared `public`.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access_flags.contains(AccessFlags::PUBLIC)
    }

    /// Whether this class is declared `abstract` (covers interfaces too,
    /// since neither can be instantiated directly).
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.access_flags.contains(AccessFlags::ABSTRACT)
    }

    /// All named supertypes: the superclass (if any) followed by the
    /// implemented interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &ClassType> {
        self.superclass.iter().chain(self.interfaces.iter())
    }

    /// Public constructors (`<init>` methods) declared directly on this
    /// class.
    pub fn public_constructors(&self) -> impl Iterator<Item = &Method> {
        self.methods
            .iter()
            .filter(|m| m.is_constructor() && m.is_public())
    }
}

/// A read-only view over a loaded bytecode image.
///
/// Every operation is pure and may return "absent" for anything the
/// underlying image does not contain — there is no notion of a lookup
/// failing with an error, only with nothing found (spec.md §6).
pub trait View {
    /// Enumerates every loaded class, in a stable, implementation-defined
    /// order. The miner's indices (see [`crate::miner::DependencyMiner`])
    /// depend on this order being stable across calls for determinism.
    fn classes(&self) -> Box<dyn Iterator<Item = &Class> + '_>;

    /// Looks up a class by its type, if loaded.
    fn get_class(&self, class_type: &ClassType) -> Option<&Class>;
}
