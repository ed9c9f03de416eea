//! Translates a [`Plan`] into a compilable `org.example.Main` source file.
//!
//! Walks `creation_order`/`dependency_order` in lockstep (they are already
//! topologically valid — spec.md §3's plan invariant), maintaining a
//! fresh-name table and a node-to-variable binding, and emits one Java
//! statement per dependency (spec.md §4.3).

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::model::{Dependency, DependencyKind, Node, Plan};
use crate::types::{ArrayType, ClassType, PrimitiveType, Type};

/// Emission failed because a parameter slot needed a value and none was
/// available: the corresponding requirement was never bound to a variable,
/// and [`any_value`] has no literal stand-in for its type either.
#[derive(Debug, thiserror::Error)]
#[error("no bound value or literal stand-in available for a parameter of type {0}")]
pub struct Error(String);

/// Per-emission scratch state: the fresh-name set and the node-to-variable
/// bindings. Lives only for the duration of one [`emit`] call.
struct Emitter {
    names: std::collections::HashMap<Node, String>,
    used: HashSet<String>,
}

impl Emitter {
    fn new() -> Self {
        Self {
            names: std::collections::HashMap::new(),
            used: HashSet::new(),
        }
    }

    /// Sanitizes `hint`, appends `_var`, and disambiguates with an
    /// increasing numeric suffix on collision (spec.md §4.3's
    /// `freshName`).
    fn fresh_name(&mut self, hint: &str) -> String {
        let sanitized = hint.replace('$', "_");
        let base = format!("{sanitized}_var");
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{base}{suffix}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn bind(&mut self, node: Node, var: String) {
        self.names.insert(node, var);
    }

    fn bound(&self, node: &Node) -> Option<&str> {
        self.names.get(node).map(String::as_str)
    }

    /// Resolves one argument slot: the bound variable for `node` if one
    /// exists, else a literal stand-in for its type.
    fn argument_for(&self, node: &Node) -> Result<String, Error> {
        if let Some(bound) = self.bound(node) {
            return Ok(bound.to_string());
        }
        let ty = node_type(node);
        any_value(&ty).ok_or_else(|| Error(ty.to_string()))
    }

    fn args_for(&self, params: &[Node]) -> Result<String, Error> {
        let mut args = Vec::with_capacity(params.len());
        for param in params {
            args.push(self.argument_for(param)?);
        }
        Ok(args.join(", "))
    }
}

/// The Java type this node would be declared at, used only to look up an
/// `anyValue` literal when no bound variable exists for it.
fn node_type(node: &Node) -> Type {
    match node {
        Node::Class(c) => Type::Class(c.clone()),
        Node::Primitive(p) => Type::Primitive(*p),
        Node::Array { element, dimension } => Type::Array(ArrayType {
            element_type: Box::new(element.clone()),
            dimension: *dimension,
        }),
        // Call nodes never appear as a CallMethod parameter or receiver in
        // a well-formed plan (the miner only ever feeds Class, Primitive,
        // and Array nodes into `params`/`receiver`); the exact type here is
        // unreachable but must still type-check.
        Node::ConstructorCall(m) | Node::StaticMethodCall(m) | Node::MethodCall(m) => {
            Type::Class(m.declaring_class.clone())
        }
    }
}

/// A literal stand-in for a parameter slot when no bound value exists
/// (spec.md §4.3's `anyValue`).
fn any_value(ty: &Type) -> Option<String> {
    match ty {
        Type::Primitive(p) => Some(
            match p {
                PrimitiveType::Char => "'?'",
                PrimitiveType::Boolean => "true",
                PrimitiveType::Byte
                | PrimitiveType::Short
                | PrimitiveType::Int
                | PrimitiveType::Long => "0",
                PrimitiveType::Float => "0f",
                PrimitiveType::Double => "0.0",
            }
            .to_string(),
        ),
        Type::Class(c) if c.fully_qualified_name == "java.lang.String" => Some("\"string\"".to_string()),
        Type::Class(_) | Type::Array(_) => None,
    }
}

/// The fully qualified Java type name used in declarations: class names
/// dotted (inner-class `$` rewritten to `.`), arrays suffixed with `[]` per
/// dimension, primitives in their lower-case spelling.
fn java_type_name(ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => p.java_name().to_string(),
        Type::Class(c) => c.dotted_name(),
        Type::Array(a) => {
            let mut name = java_type_name(&a.element_type);
            for _ in 0..a.dimension {
                name.push_str("[]");
            }
            name
        }
    }
}

fn var_hint(ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => p.java_name().to_string(),
        Type::Class(c) => c.simple_name().to_string(),
        Type::Array(a) => var_hint(&a.element_type),
    }
}

/// Emits one Java statement for `dep` (whose `of` equals `node`) into
/// `body`, binding `node` to the variable it produces.
fn emit_dependency(emitter: &mut Emitter, node: &Node, dep: &Dependency, body: &mut String) -> Result<(), Error> {
    let comment = format!("{dep}").replace('$', ".");
    let _ = writeln!(body, "        // {comment}");

    match &dep.kind {
        DependencyKind::CallMethod { receiver, params } => {
            let args = emitter.args_for(params)?;
            match node {
                Node::ConstructorCall(m) => {
                    let type_name = m.declaring_class.dotted_name();
                    let var = emitter.fresh_name(&var_hint(&Type::Class(m.declaring_class.clone())));
                    let _ = writeln!(body, "        {type_name} {var} = new {type_name}({args});");
                    emitter.bind(node.clone(), var);
                }
                Node::StaticMethodCall(m) => {
                    let return_ty = m
                        .return_type
                        .clone()
                        .unwrap_or_else(|| Type::Class(m.declaring_class.clone()));
                    let return_type_name = java_type_name(&return_ty);
                    let owner = m.declaring_class.dotted_name();
                    let var = emitter.fresh_name(&var_hint(&return_ty));
                    let _ = writeln!(
                        body,
                        "        {return_type_name} {var} = {owner}.{}({args});",
                        m.name
                    );
                    emitter.bind(node.clone(), var);
                }
                Node::MethodCall(m) => {
                    let receiver_node = receiver
                        .as_deref()
                        .ok_or_else(|| Error("missing receiver for instance method call".to_string()))?;
                    let recv = emitter
                        .bound(receiver_node)
                        .ok_or_else(|| Error(format!("unbound receiver {receiver_node}")))?
                        .to_string();
                    let return_ty = m
                        .return_type
                        .clone()
                        .unwrap_or_else(|| Type::Class(m.declaring_class.clone()));
                    let return_type_name = java_type_name(&return_ty);
                    let var = emitter.fresh_name(&var_hint(&return_ty));
                    let _ = writeln!(
                        body,
                        "        {return_type_name} {var} = {recv}.{}({args});",
                        m.name
                    );
                    emitter.bind(node.clone(), var);
                }
                Node::Class(_) | Node::Primitive(_) | Node::Array { .. } => unreachable!(
                    "CallMethod is only ever the dependency of a *Call node (miner invariant)"
                ),
            }
        }
        DependencyKind::UseMethod { method } => {
            let var = emitter
                .bound(method)
                .ok_or_else(|| Error(format!("unbound method result {method}")))?
                .to_string();
            emitter.bind(node.clone(), var);
            // No statement: the class is realized by the method's result.
        }
        DependencyKind::JdkInitialization => {
            let Node::Class(c) = node else {
                unreachable!("JdkInitialization only ever targets a Class node")
            };
            let type_name = c.dotted_name();
            let var = emitter.fresh_name(&var_hint(&Type::Class(c.clone())));
            let _ = writeln!(body, "        {type_name} {var} = new {type_name}();");
            emitter.bind(node.clone(), var);
        }
        DependencyKind::Upcast { subclass } => {
            let Node::Class(superclass) = node else {
                unreachable!("Upcast only ever targets a Class node")
            };
            let super_name = superclass.dotted_name();
            let sub_var = emitter
                .bound(subclass)
                .ok_or_else(|| Error(format!("unbound subclass {subclass}")))?
                .to_string();
            let var = emitter.fresh_name(&var_hint(&Type::Class(superclass.clone())));
            let _ = writeln!(body, "        {super_name} {var} = ({super_name}) {sub_var};");
            emitter.bind(node.clone(), var);
        }
        DependencyKind::Primitive => {
            let Node::Primitive(p) = node else {
                unreachable!("Primitive dependency only ever targets a Primitive node")
            };
            let name = p.java_name();
            let var = emitter.fresh_name(name);
            let literal = any_value(&Type::Primitive(*p)).expect("primitives always have a literal stand-in");
            let _ = writeln!(body, "        {name} {var} = {literal};");
            emitter.bind(node.clone(), var);
        }
        DependencyKind::EmptyArray => {
            let Node::Array { element, dimension } = node else {
                unreachable!("EmptyArray dependency only ever targets an Array node")
            };
            let element_name = java_type_name(element);
            let suffix = "[]".repeat(*dimension as usize);
            let var = emitter.fresh_name(&var_hint(element));
            let _ = writeln!(
                body,
                "        {element_name}{suffix} {var} = new {element_name}[0];"
            );
            emitter.bind(node.clone(), var);
        }
    }
    Ok(())
}

/// Translates `plan` into a complete `org.example.Main` compilation unit.
///
/// # Errors
/// Returns [`Error`] if some dependency's parameter needs a bound value that
/// is unavailable and has no `anyValue` stand-in (spec.md §7's
/// `EmissionIncomplete`). Never produces a syntactically malformed partial
/// file: on error nothing is returned.
pub fn emit(plan: &Plan) -> Result<String, Error> {
    let mut emitter = Emitter::new();
    let mut body = String::new();
    for (node, dep) in plan.creation_order.iter().zip(plan.dependency_order.iter()) {
        emit_dependency(&mut emitter, node, dep, &mut body)?;
    }
    Ok(format!(
        "package org.example;\n\npublic final class Main {{\n    public static void main(String[] args) {{\n{body}    }}\n}}\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MethodRef;

    #[test]
    fn jdk_initialization_emits_no_arg_constructor_call() {
        let node = Node::Class(ClassType::new("java.lang.Object"));
        let dep = Dependency::new(node.clone(), DependencyKind::JdkInitialization);
        let plan = Plan {
            result: node.clone(),
            creation_order: vec![node],
            dependency_order: vec![dep],
            cost: 2,
        };
        let source = emit(&plan).unwrap();
        assert!(source.contains("java.lang.Object Object_var = new java.lang.Object();"));
        assert!(source.contains("package org.example;"));
        assert!(source.contains("public final class Main"));
    }

    #[test]
    fn primitive_emits_zero_literal() {
        let node = Node::Primitive(PrimitiveType::Int);
        let dep = Dependency::new(node.clone(), DependencyKind::Primitive);
        let plan = Plan { result: node.clone(), creation_order: vec![node], dependency_order: vec![dep], cost: 0 };
        let source = emit(&plan).unwrap();
        assert!(source.contains("int int_var = 0;"));
    }

    #[test]
    fn array_emits_zero_length_allocation() {
        let node = Node::Array { element: Type::Primitive(PrimitiveType::Int), dimension: 1 };
        let dep = Dependency::new(node.clone(), DependencyKind::EmptyArray);
        let plan = Plan { result: node.clone(), creation_order: vec![node], dependency_order: vec![dep], cost: 3 };
        let source = emit(&plan).unwrap();
        assert!(source.contains("int[] int_var = new int[0];"));
    }

    #[test]
    fn constructor_call_falls_back_to_any_value_for_string() {
        let ctor = MethodRef {
            declaring_class: ClassType::new("com.example.Widget"),
            name: "<init>".into(),
            parameter_types: vec![Type::Class(ClassType::new("java.lang.String"))],
            return_type: None,
            is_static: false,
        };
        let ctor_node = Node::ConstructorCall(ctor);
        let class_node = Node::Class(ClassType::new("com.example.Widget"));
        let plan = Plan {
            result: class_node.clone(),
            creation_order: vec![ctor_node.clone(), class_node.clone()],
            dependency_order: vec![
                Dependency::new(
                    ctor_node.clone(),
                    DependencyKind::CallMethod {
                        receiver: None,
                        params: vec![Node::Class(ClassType::new("java.lang.String"))],
                    },
                ),
                Dependency::new(class_node, DependencyKind::UseMethod { method: Box::new(ctor_node) }),
            ],
            cost: 1,
        };
        let source = emit(&plan).unwrap();
        assert!(source.contains(r#"new com.example.Widget("string");"#));
    }

    #[test]
    fn upcast_emits_a_cast_from_the_bound_subclass() {
        let sub_ctor = MethodRef {
            declaring_class: ClassType::new("com.example.Circle"),
            name: "<init>".into(),
            parameter_types: Vec::new(),
            return_type: None,
            is_static: false,
        };
        let sub_ctor_node = Node::ConstructorCall(sub_ctor);
        let sub_class_node = Node::Class(ClassType::new("com.example.Circle"));
        let super_class_node = Node::Class(ClassType::new("com.example.Shape"));
        let plan = Plan {
            result: super_class_node.clone(),
            creation_order: vec![sub_ctor_node.clone(), sub_class_node.clone(), super_class_node.clone()],
            dependency_order: vec![
                Dependency::new(
                    sub_ctor_node.clone(),
                    DependencyKind::CallMethod { receiver: None, params: Vec::new() },
                ),
                Dependency::new(
                    sub_class_node.clone(),
                    DependencyKind::UseMethod { method: Box::new(sub_ctor_node) },
                ),
                Dependency::new(
                    super_class_node,
                    DependencyKind::Upcast { subclass: Box::new(sub_class_node) },
                ),
            ],
            cost: 1,
        };
        let source = emit(&plan).unwrap();
        assert!(source.contains("com.example.Shape Shape_var = (com.example.Shape) Circle_var;"));
    }

    #[test]
    fn emission_fails_when_no_value_is_available_for_a_non_string_class_param() {
        let ctor = MethodRef {
            declaring_class: ClassType::new("com.example.Widget"),
            name: "<init>".into(),
            parameter_types: vec![Type::Class(ClassType::new("com.example.Gadget"))],
            return_type: None,
            is_static: false,
        };
        let ctor_node = Node::ConstructorCall(ctor);
        let plan = Plan {
            result: ctor_node.clone(),
            creation_order: vec![ctor_node.clone()],
            dependency_order: vec![Dependency::new(
                ctor_node,
                DependencyKind::CallMethod {
                    receiver: None,
                    params: vec![Node::Class(ClassType::new("com.example.Gadget"))],
                },
            )],
            cost: 1,
        };
        assert!(emit(&plan).is_err());
    }

    #[test]
    fn fresh_names_disambiguate_repeated_hints() {
        let mut emitter = Emitter::new();
        assert_eq!(emitter.fresh_name("Widget"), "Widget_var");
        assert_eq!(emitter.fresh_name("Widget"), "Widget_var1");
        assert_eq!(emitter.fresh_name("Widget"), "Widget_var2");
    }

    #[test]
    fn fresh_names_sanitize_dollar_signs() {
        let mut emitter = Emitter::new();
        assert_eq!(emitter.fresh_name("Outer$Inner"), "Outer_Inner_var");
    }

    proptest::proptest! {
        /// No matter how many hints collide, `fresh_name` never hands out the
        /// same identifier twice (spec.md §4.3's `freshName`).
        #[test]
        fn fresh_names_are_always_unique(hints in proptest::collection::vec("[A-Za-z0-9_$]{1,12}", 0..50)) {
            let mut emitter = Emitter::new();
            let mut seen = HashSet::new();
            for hint in &hints {
                let name = emitter.fresh_name(hint);
                proptest::prop_assert!(seen.insert(name), "fresh_name produced a duplicate identifier");
            }
        }
    }
}
