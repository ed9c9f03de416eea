//! The AND/OR construction graph: [`Node`]s that need constructing and
//! [`Dependency`] edges that construct them.
//!
//! A `Node` is satisfied by picking *any one* of its dependencies (an OR
//! choice); a `Dependency` is satisfied only once *all* of its
//! `requirements` are themselves satisfied (an AND over sub-nodes). Both
//! are plain, immutable data — structural equality stands in for identity,
//! so the same logical node mined twice compares equal and can be memoized.

use itertools::Itertools as _;

use crate::types::{ArrayType, ClassType, PrimitiveType, Type};

/// A reference to a specific method or constructor, identifying it the way
/// a classfile constant pool would: by owner, name, and signature shape
/// rather than by holding the whole declaring [`Class`](crate::view::Class).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// The class the method is declared on.
    pub declaring_class: ClassType,
    /// The method's name (`"<init>"` for constructors).
    pub name: String,
    /// Declared parameter types, in order.
    pub parameter_types: Vec<Type>,
    /// Declared return type, or `None` for `void`.
    pub return_type: Option<Type>,
    /// Whether the method is declared `static`. Carried so the miner can
    /// (optionally, see `unstable-static-factory`) distinguish static
    /// factory methods from instance methods when both return the same
    /// type.
    pub is_static: bool,
}

impl From<&crate::view::Method> for MethodRef {
    fn from(m: &crate::view::Method) -> Self {
        Self {
            declaring_class: m.declaring_class.clone(),
            name: m.name.clone(),
            parameter_types: m.parameter_types.clone(),
            return_type: m.return_type.clone(),
            is_static: m.is_static(),
        }
    }
}

/// A unit of construction: something the emitted program must produce a
/// value of before it can be used as a receiver or argument.
///
/// Invariants (spec.md §3): a `*Call` node's `MethodRef::declaring_class`
/// must be resolvable via the [`View`](crate::view::View); a
/// `ConstructorCall` always names `"<init>"`; an `Array`'s dimension is at
/// least 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A class or interface type.
    Class(ClassType),
    /// One of the eight primitive kinds.
    Primitive(PrimitiveType),
    /// An array of `dimension` (>= 1) over `element`.
    Array {
        /// The element type.
        element: Type,
        /// The array dimension, always >= 1.
        dimension: u8,
    },
    /// A reference to a public `<init>` method.
    ConstructorCall(MethodRef),
    /// A reference to a public static method returning a class type.
    StaticMethodCall(MethodRef),
    /// A reference to a public instance method returning a class type.
    MethodCall(MethodRef),
}

impl Node {
    /// Builds the array node for `Type::Array`, keeping the invariant that
    /// an `Array` node's `element` is never itself an array type (nesting
    /// lives in `dimension`).
    #[must_use]
    pub fn array(element_type: &ArrayType) -> Self {
        Self::Array {
            element: (*element_type.element_type).clone(),
            dimension: element_type.dimension,
        }
    }
}

/// The concrete way a [`Dependency`] goes about satisfying its `of` node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Invoke a method or constructor. `receiver` is `Some(Class(..))` for
    /// an instance [`Node::MethodCall`], `None` for constructors and static
    /// methods.
    CallMethod {
        /// The node supplying the receiver object, absent for constructors
        /// and static calls.
        receiver: Option<Box<Node>>,
        /// The nodes supplying each argument, in declaration order.
        params: Vec<Node>,
    },
    /// Realize a `Class` node by way of one of its methods' results.
    UseMethod {
        /// The constructor- or method-call node whose result this class
        /// node is bound to.
        method: Box<Node>,
    },
    /// Treat a `java.*` class as constructible via its no-arg constructor,
    /// without mining its actual constructors.
    JdkInitialization,
    /// Satisfy a superclass/interface `Class` node by constructing one of
    /// its direct subtypes and declaring the variable at the supertype.
    Upcast {
        /// The concrete subtype node to construct and cast from.
        subclass: Box<Node>,
    },
    /// A primitive literal stand-in value.
    Primitive,
    /// A fresh zero-length array.
    EmptyArray,
}

/// An OR-alternative by which a node can be satisfied: `of` names the node,
/// `kind` names how, and [`Dependency::requirements`] names what must be
/// satisfied first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// The node this dependency satisfies.
    pub of: Node,
    /// How it satisfies it.
    pub kind: DependencyKind,
}

impl Dependency {
    /// Convenience constructor.
    #[must_use]
    pub fn new(of: Node, kind: DependencyKind) -> Self {
        Self { of, kind }
    }

    /// The non-negative cost of choosing this dependency (spec.md §3's cost
    /// table).
    #[must_use]
    pub fn cost(&self) -> u32 {
        match &self.kind {
            DependencyKind::CallMethod { .. } => 1,
            DependencyKind::UseMethod { .. } | DependencyKind::Upcast { .. } => 0,
            DependencyKind::JdkInitialization => 2,
            DependencyKind::Primitive => 0,
            DependencyKind::EmptyArray => 3,
        }
    }

    /// The sub-nodes that must all be satisfied before this dependency can
    /// be chosen.
    pub fn requirements(&self) -> Vec<Node> {
        match &self.kind {
            DependencyKind::CallMethod { receiver, params } => receiver
                .iter()
                .map(|n| (**n).clone())
                .chain(params.iter().cloned())
                .collect(),
            DependencyKind::UseMethod { method } => vec![(**method).clone()],
            DependencyKind::Upcast { subclass } => vec![(**subclass).clone()],
            DependencyKind::JdkInitialization | DependencyKind::Primitive | DependencyKind::EmptyArray => {
                Vec::new()
            }
        }
    }
}

/// A linearized, budget-respecting plan for realizing `result`.
///
/// Invariants (spec.md §3): `creation_order.len() == dependency_order.len()`;
/// for every index `i`, every node in `dependency_order[i].requirements()`
/// appears in `creation_order[0..i)`; `creation_order` has no duplicates;
/// `creation_order` ends with a node equal to `result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// The node this plan constructs a value for.
    pub result: Node,
    /// Nodes in the order they are created, topologically valid.
    pub creation_order: Vec<Node>,
    /// The dependency chosen for the node at the same index in
    /// `creation_order`.
    pub dependency_order: Vec<Dependency>,
    /// Total cost: the sum of `dependency_order[i].cost()`.
    pub cost: u32,
}

impl Plan {
    /// Checks the topological-validity and no-duplicates invariants
    /// (spec.md §8, properties 1 and 3). Intended for tests and
    /// `debug_assert!`-style sanity checks, not for production control
    /// flow.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        if self.creation_order.len() != self.dependency_order.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        for (i, (node, dep)) in self
            .creation_order
            .iter()
            .zip(self.dependency_order.iter())
            .enumerate()
        {
            if dep.of != *node {
                return false;
            }
            if !seen.insert(node) {
                return false;
            }
            for requirement in dep.requirements() {
                let satisfied_before = self.creation_order[..i].contains(&requirement);
                let is_self = requirement == *node;
                if !satisfied_before && !is_self {
                    return false;
                }
            }
        }
        self.creation_order.last() == Some(&self.result)
    }
}

fn fmt_params(params: &[Type]) -> String {
    params.iter().join(", ")
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(c) => write!(f, "{c}"),
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Array { element, dimension } => {
                write!(f, "{element}")?;
                for _ in 0..*dimension {
                    write!(f, "[]")?;
                }
                Ok(())
            }
            Self::ConstructorCall(m) => {
                write!(f, "{}.<init>({})", m.declaring_class, fmt_params(&m.parameter_types))
            }
            Self::StaticMethodCall(m) => write!(
                f,
                "{}.{}({})",
                m.declaring_class,
                m.name,
                fmt_params(&m.parameter_types)
            ),
            Self::MethodCall(m) => write!(
                f,
                "{}::{}({})",
                m.declaring_class,
                m.name,
                fmt_params(&m.parameter_types)
            ),
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CallMethod { receiver, params } => write!(
                f,
                "CallMethod{{receiver: {}, params: [{}]}}",
                receiver.as_deref().map_or("none".to_string(), ToString::to_string),
                params.iter().join(", ")
            ),
            Self::UseMethod { method } => write!(f, "UseMethod({method})"),
            Self::JdkInitialization => write!(f, "JdkInitialization"),
            Self::Upcast { subclass } => write!(f, "Upcast(from: {subclass})"),
            Self::Primitive => write!(f, "Primitive"),
            Self::EmptyArray => write!(f, "EmptyArray"),
        }
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <- {}", self.of, self.kind)
    }
}
