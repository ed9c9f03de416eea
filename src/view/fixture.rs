//! An in-memory [`View`] populated by hand.
//!
//! Stands in for a real bytecode-loading collaborator in tests and in the
//! `construct` binary's demonstration mode. Nothing here reads `.class`
//! bytes; classes are registered directly as [`Class`] values.

use std::collections::HashMap;

use crate::types::ClassType;

use super::{Class, View};

/// A hand-populated, read-only collection of loaded classes.
#[derive(Debug, Clone, Default)]
pub struct FixtureView {
    classes: HashMap<ClassType, Class>,
    /// Insertion order, preserved so enumeration is stable and deterministic
    /// as spec.md §4.1 requires of the miner's indices.
    order: Vec<ClassType>,
}

impl FixtureView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, overwriting any previous registration under the
    /// same name while preserving its original position in enumeration
    /// order.
    pub fn register(&mut self, class: Class) -> &mut Self {
        let name = class.name.clone();
        if !self.classes.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.classes.insert(name, class);
        self
    }

    /// Builder-style chain of [`FixtureView::register`].
    #[must_use]
    pub fn with(mut self, class: Class) -> Self {
        self.register(class);
        self
    }
}

/// A small illustrative bytecode image covering every scenario from
/// spec.md §8: a JDK class, a library class with a `String`-only
/// constructor, a static factory, and an abstract supertype with a single
/// public subclass. Used by the `construct` binary's demonstration mode
/// and by integration tests.
#[must_use]
pub fn demo_view() -> FixtureView {
    use super::{AccessFlags, Method};
    use crate::types::Type;

    let object = ClassType::new("java.lang.Object");
    let string = ClassType::new("java.lang.String");
    let widget = ClassType::new("org.example.catalog.Widget");
    let widgets = ClassType::new("org.example.catalog.Widgets");
    let shape = ClassType::new("org.example.catalog.Shape");
    let circle = ClassType::new("org.example.catalog.Circle");

    FixtureView::new()
        .with(Class {
            name: widget.clone(),
            access_flags: AccessFlags::PUBLIC,
            superclass: Some(object.clone()),
            interfaces: Vec::new(),
            methods: vec![Method {
                name: Method::CONSTRUCTOR_NAME.into(),
                access_flags: AccessFlags::PUBLIC,
                declaring_class: widget.clone(),
                parameter_types: vec![Type::Class(string.clone())],
                return_type: None,
            }],
        })
        .with(Class {
            name: string,
            access_flags: AccessFlags::PUBLIC,
            superclass: Some(object.clone()),
            interfaces: Vec::new(),
            methods: Vec::new(),
        })
        .with(Class {
            name: widgets.clone(),
            access_flags: AccessFlags::PUBLIC,
            superclass: Some(object.clone()),
            interfaces: Vec::new(),
            methods: vec![Method {
                name: "createDefault".into(),
                access_flags: AccessFlags::PUBLIC | AccessFlags::STATIC,
                declaring_class: widgets,
                parameter_types: Vec::new(),
                return_type: Some(Type::Class(widget)),
            }],
        })
        .with(Class {
            name: shape.clone(),
            access_flags: AccessFlags::PUBLIC | AccessFlags::ABSTRACT,
            superclass: Some(object.clone()),
            interfaces: Vec::new(),
            methods: Vec::new(),
        })
        .with(Class {
            name: circle.clone(),
            access_flags: AccessFlags::PUBLIC,
            superclass: Some(shape),
            interfaces: Vec::new(),
            methods: vec![Method {
                name: Method::CONSTRUCTOR_NAME.into(),
                access_flags: AccessFlags::PUBLIC,
                declaring_class: circle,
                parameter_types: vec![Type::Primitive(crate::types::PrimitiveType::Int)],
                return_type: None,
            }],
        })
}

impl View for FixtureView {
    fn classes(&self) -> Box<dyn Iterator<Item = &Class> + '_> {
        Box::new(
            self.order
                .iter()
                .filter_map(move |name| self.classes.get(name)),
        )
    }

    fn get_class(&self, class_type: &ClassType) -> Option<&Class> {
        self.classes.get(class_type)
    }
}
