//! Mines a [`View`] for the dependencies that can satisfy a given [`Node`].
//!
//! The miner precomputes two indices over the whole view in a single pass
//! (spec.md §4.1) and then answers `dependencies_of(node)` — the solver's
//! lazy oracle — without touching the view again.

use std::collections::HashMap;

use crate::model::{Dependency, DependencyKind, MethodRef, Node};
use crate::types::{ClassType, Type};
use crate::view::View;

/// Precomputed indices over a [`View`], and the entry point for turning a
/// [`Node`] into its candidate [`Dependency`] choices.
pub struct DependencyMiner<'v> {
    view: &'v dyn View,
    /// Fully qualified superclass/interface name -> its direct public
    /// subtypes.
    subclass_index: HashMap<String, Vec<ClassType>>,
    /// A class -> public, non-constructor, non-initializer methods whose
    /// declared return type resolves to exactly that class.
    method_by_return_type_index: HashMap<ClassType, Vec<MethodRef>>,
}

impl std::fmt::Debug for DependencyMiner<'_> {
    /// `view` is a `&dyn View` with no `Debug` bound, so this reports the
    /// sizes of the precomputed indices rather than their contents.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyMiner")
            .field("subclass_index_len", &self.subclass_index.len())
            .field("method_by_return_type_index_len", &self.method_by_return_type_index.len())
            .finish_non_exhaustive()
    }
}

impl<'v> DependencyMiner<'v> {
    /// Builds the indices for `view` in a single pass over all its classes.
    /// Non-public classes and methods, and unresolvable type references, are
    /// skipped silently (spec.md §4.1, §7's `ViewLookupMissing` policy).
    #[must_use]
    pub fn new(view: &'v dyn View) -> Self {
        let mut subclass_index: HashMap<String, Vec<ClassType>> = HashMap::new();
        let mut method_by_return_type_index: HashMap<ClassType, Vec<MethodRef>> = HashMap::new();

        for class in view.classes() {
            if !class.is_public() {
                continue;
            }
            for supertype in class.supertypes() {
                subclass_index
                    .entry(supertype.fully_qualified_name.clone())
                    .or_default()
                    .push(class.name.clone());
            }
            for method in &class.methods {
                if method.is_constructor() || method.name == crate::view::Method::CLASS_INITIALIZER_NAME {
                    continue;
                }
                if !method.is_public() {
                    continue;
                }
                let Some(return_class) = method.returns_class() else {
                    continue;
                };
                if view.get_class(return_class).is_none() {
                    continue;
                }
                method_by_return_type_index
                    .entry(return_class.clone())
                    .or_default()
                    .push(MethodRef::from(method));
            }
        }

        Self {
            view,
            subclass_index,
            method_by_return_type_index,
        }
    }

    /// The candidate dependencies for `node`, in the fixed order spec.md
    /// §4.1 defines per node kind. Returns an empty list when `node` cannot
    /// be satisfied at all (e.g. a class with no public constructor, no
    /// subtype, and no returning factory method).
    #[must_use]
    pub fn dependencies_of(&self, node: &Node) -> Vec<Dependency> {
        match node {
            Node::Class(c) => self.dependencies_of_class(node, c),
            Node::ConstructorCall(m) | Node::StaticMethodCall(m) => {
                self.dependencies_of_call(node, m, None)
            }
            Node::MethodCall(m) => match self.view.get_class(&m.declaring_class) {
                Some(_) => {
                    self.dependencies_of_call(node, m, Some(Node::Class(m.declaring_class.clone())))
                }
                None => Vec::new(),
            },
            Node::Primitive(_) => vec![Dependency::new(node.clone(), DependencyKind::Primitive)],
            Node::Array { .. } => vec![Dependency::new(node.clone(), DependencyKind::EmptyArray)],
        }
    }

    fn dependencies_of_class(&self, node: &Node, c: &ClassType) -> Vec<Dependency> {
        if c.is_jdk() {
            // The JDK is a black box: skip mining its constructors and
            // subtypes entirely and treat it as constructible at a fixed
            // cost (spec.md §4.1).
            return vec![Dependency::new(node.clone(), DependencyKind::JdkInitialization)];
        }

        let mut deps = Vec::new();

        if let Some(class) = self.view.get_class(c) {
            // An abstract class cannot be instantiated directly even if it
            // declares public constructors (they exist only for subclasses'
            // `super(...)` calls); such a class is only realized by
            // upcasting a concrete subtype below.
            if !class.is_abstract() {
                for ctor in class.public_constructors() {
                    let ctor_node = Node::ConstructorCall(MethodRef::from(ctor));
                    deps.push(Dependency::new(
                        node.clone(),
                        DependencyKind::UseMethod { method: Box::new(ctor_node) },
                    ));
                }
            }
        }

        if let Some(subtypes) = self.subclass_index.get(&c.fully_qualified_name) {
            for subtype in subtypes {
                deps.push(Dependency::new(
                    node.clone(),
                    DependencyKind::Upcast { subclass: Box::new(Node::Class(subtype.clone())) },
                ));
            }
        }

        if let Some(methods) = self.method_by_return_type_index.get(c) {
            for method in methods {
                let method_node = Self::method_node(method);
                deps.push(Dependency::new(
                    node.clone(),
                    DependencyKind::UseMethod { method: Box::new(method_node) },
                ));
            }
        }

        deps
    }

    /// Whether a returning method becomes a `MethodCall` or a
    /// `StaticMethodCall` node. Per spec.md's Open Questions, the reference
    /// behavior always mines `MethodCall` regardless of staticness — static
    /// methods end up invoked through an (otherwise pointless but
    /// syntactically legal) instance receiver. Enabling
    /// `unstable-static-factory` switches static methods to
    /// `StaticMethodCall` instead, which the emitter then prints as a
    /// qualified `Type.method(args)` call with no receiver construction.
    fn method_node(method: &MethodRef) -> Node {
        #[cfg(feature = "unstable-static-factory")]
        {
            if method.is_static {
                return Node::StaticMethodCall(method.clone());
            }
        }
        Node::MethodCall(method.clone())
    }

    fn dependencies_of_call(
        &self,
        node: &Node,
        m: &MethodRef,
        receiver: Option<Node>,
    ) -> Vec<Dependency> {
        match self.params_of(m) {
            Some(params) => vec![Dependency::new(
                node.clone(),
                DependencyKind::CallMethod {
                    receiver: receiver.map(Box::new),
                    params,
                },
            )],
            // An unresolvable parameter type drops the whole candidate
            // (spec.md §7's `UnresolvableType` policy): the trial that
            // would have needed it fails naturally.
            None => Vec::new(),
        }
    }

    /// Maps each declared parameter type to the node that would have to be
    /// constructed to supply it, or `None` if any parameter cannot be
    /// represented (spec.md §4.1's `paramsOf`).
    fn params_of(&self, m: &MethodRef) -> Option<Vec<Node>> {
        m.parameter_types.iter().map(|t| self.node_of_type(t)).collect()
    }

    fn node_of_type(&self, t: &Type) -> Option<Node> {
        match t {
            Type::Primitive(p) => Some(Node::Primitive(*p)),
            Type::Class(c) => self.view.get_class(c).map(|_| Node::Class(c.clone())),
            Type::Array(a) => Some(Node::array(a)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{fixture::FixtureView, AccessFlags, Class, Method};

    fn object_class() -> Class {
        Class {
            name: ClassType::new("java.lang.Object"),
            access_flags: AccessFlags::PUBLIC,
            superclass: None,
            interfaces: Vec::new(),
            methods: vec![Method {
                name: Method::CONSTRUCTOR_NAME.into(),
                access_flags: AccessFlags::PUBLIC,
                declaring_class: ClassType::new("java.lang.Object"),
                parameter_types: Vec::new(),
                return_type: None,
            }],
        }
    }

    #[test]
    fn jdk_class_short_circuits_to_jdk_initialization() {
        let view = FixtureView::new().with(object_class());
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::Class(ClassType::new("java.lang.Object")));
        assert_eq!(deps.len(), 1);
        assert!(matches!(deps[0].kind, DependencyKind::JdkInitialization));
    }

    #[test]
    fn primitive_node_has_exactly_one_dependency() {
        let view = FixtureView::new();
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::Primitive(crate::types::PrimitiveType::Int));
        assert_eq!(deps.len(), 1);
        assert!(matches!(deps[0].kind, DependencyKind::Primitive));
    }

    #[test]
    fn class_with_no_constructor_subtype_or_factory_has_no_dependencies() {
        let view = FixtureView::new().with(Class {
            name: ClassType::new("com.example.Unreachable"),
            access_flags: AccessFlags::PUBLIC,
            superclass: Some(ClassType::new("java.lang.Object")),
            interfaces: Vec::new(),
            methods: Vec::new(),
        });
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::Class(ClassType::new("com.example.Unreachable")));
        assert!(deps.is_empty());
    }

    #[test]
    fn single_public_constructor_yields_one_use_method() {
        let class_name = ClassType::new("com.example.Widget");
        let view = FixtureView::new().with(Class {
            name: class_name.clone(),
            access_flags: AccessFlags::PUBLIC,
            superclass: Some(ClassType::new("java.lang.Object")),
            interfaces: Vec::new(),
            methods: vec![Method {
                name: Method::CONSTRUCTOR_NAME.into(),
                access_flags: AccessFlags::PUBLIC,
                declaring_class: class_name.clone(),
                parameter_types: Vec::new(),
                return_type: None,
            }],
        });
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::Class(class_name));
        assert_eq!(deps.len(), 1);
        assert!(matches!(deps[0].kind, DependencyKind::UseMethod { .. }));
    }

    #[test]
    fn direct_subtype_yields_upcast_dependency() {
        let superclass = ClassType::new("com.example.Shape");
        let subclass = ClassType::new("com.example.Circle");
        let view = FixtureView::new()
            .with(Class {
                name: superclass.clone(),
                access_flags: AccessFlags::PUBLIC | AccessFlags::ABSTRACT,
                superclass: Some(ClassType::new("java.lang.Object")),
                interfaces: Vec::new(),
                methods: Vec::new(),
            })
            .with(Class {
                name: subclass.clone(),
                access_flags: AccessFlags::PUBLIC,
                superclass: Some(superclass.clone()),
                interfaces: Vec::new(),
                methods: vec![Method {
                    name: Method::CONSTRUCTOR_NAME.into(),
                    access_flags: AccessFlags::PUBLIC,
                    declaring_class: subclass.clone(),
                    parameter_types: Vec::new(),
                    return_type: None,
                }],
            });
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::Class(superclass));
        assert_eq!(deps.len(), 1);
        assert!(matches!(deps[0].kind, DependencyKind::Upcast { .. }));
    }

    #[test]
    fn factory_method_yields_use_method_as_method_call() {
        let target = ClassType::new("com.example.Widget");
        let factory_owner = ClassType::new("com.example.Widgets");
        let view = FixtureView::new()
            .with(Class {
                name: target.clone(),
                access_flags: AccessFlags::PUBLIC,
                superclass: Some(ClassType::new("java.lang.Object")),
                interfaces: Vec::new(),
                methods: Vec::new(),
            })
            .with(Class {
                name: factory_owner.clone(),
                access_flags: AccessFlags::PUBLIC,
                superclass: Some(ClassType::new("java.lang.Object")),
                interfaces: Vec::new(),
                methods: vec![Method {
                    name: "create".into(),
                    access_flags: AccessFlags::PUBLIC | AccessFlags::STATIC,
                    declaring_class: factory_owner.clone(),
                    parameter_types: Vec::new(),
                    return_type: Some(Type::Class(target.clone())),
                }],
            });
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::Class(target));
        assert_eq!(deps.len(), 1);
        let DependencyKind::UseMethod { method } = &deps[0].kind else {
            panic!("expected UseMethod");
        };
        assert!(matches!(**method, Node::MethodCall(_)));
    }

    #[test]
    fn method_call_resolves_through_declaring_class_as_receiver() {
        let target = ClassType::new("com.example.Widget");
        let factory_owner = ClassType::new("com.example.Widgets");
        let factory_ref = MethodRef {
            declaring_class: factory_owner.clone(),
            name: "create".into(),
            parameter_types: Vec::new(),
            return_type: Some(Type::Class(target.clone())),
            is_static: true,
        };
        let view = FixtureView::new().with(Class {
            name: factory_owner.clone(),
            access_flags: AccessFlags::PUBLIC,
            superclass: Some(ClassType::new("java.lang.Object")),
            interfaces: Vec::new(),
            methods: vec![Method {
                name: "create".into(),
                access_flags: AccessFlags::PUBLIC | AccessFlags::STATIC,
                declaring_class: factory_owner.clone(),
                parameter_types: Vec::new(),
                return_type: Some(Type::Class(target.clone())),
            }],
        });
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::MethodCall(factory_ref));
        assert_eq!(deps.len(), 1);
        let DependencyKind::CallMethod { receiver, params } = &deps[0].kind else {
            panic!("expected CallMethod");
        };
        assert_eq!(**receiver.as_ref().unwrap(), Node::Class(factory_owner));
        assert!(params.is_empty());
    }

    #[test]
    fn method_call_with_unresolvable_declaring_class_has_no_dependencies() {
        let view = FixtureView::new();
        let dangling = MethodRef {
            declaring_class: ClassType::new("com.example.Missing"),
            name: "create".into(),
            parameter_types: Vec::new(),
            return_type: Some(Type::Class(ClassType::new("com.example.Widget"))),
            is_static: true,
        };
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::MethodCall(dangling));
        assert!(deps.is_empty());
    }

    #[test]
    fn constructor_with_unresolvable_parameter_is_dropped() {
        let ctor = MethodRef {
            declaring_class: ClassType::new("com.example.Widget"),
            name: "<init>".into(),
            parameter_types: vec![Type::Class(ClassType::new("com.example.Unknown"))],
            return_type: None,
            is_static: false,
        };
        let view = FixtureView::new();
        let miner = DependencyMiner::new(&view);
        let deps = miner.dependencies_of(&Node::ConstructorCall(ctor));
        assert!(deps.is_empty());
    }
}
