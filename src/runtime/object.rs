use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Statement;
use crate::runtime::Closure;

pub(crate) const STR_METHOD: &str = "__str__";
pub(crate) const EQ_METHOD: &str = "__eq__";
pub(crate) const LT_METHOD: &str = "__lt__";

/// The closed value universe of the language.
#[derive(Debug)]
pub enum Object {
    Number(i32),
    String(String),
    Bool(bool),
    Class(Rc<Class>),
    Instance(ClassInstance),
}

/// A method as stored on its class: name, formal parameter names in call
/// order, and the body shared with the syntax tree. `self` is not a formal
/// parameter; every call binds it implicitly.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub formal_params: Vec<String>,
    pub body: Rc<Statement>,
}

/// A user-defined class: named methods plus an optional parent back-edge
/// for single inheritance. Fields are not declared here; they live in each
/// instance's closure.
pub struct Class {
    name: String,
    methods: Vec<Method>,
    method_index: HashMap<String, usize>,
    parent: Option<Rc<Class>>,
}

impl Class {
    pub fn new(name: impl Into<String>, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Self {
        let method_index = methods
            .iter()
            .enumerate()
            .map(|(index, method)| (method.name.clone(), index))
            .collect();
        Self {
            name: name.into(),
            methods,
            method_index,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves `name` against this class, then the parent chain; own
    /// methods shadow parent methods.
    pub fn method(&self, name: &str) -> Option<&Method> {
        if let Some(&index) = self.method_index.get(name) {
            return self.methods.get(index);
        }
        self.parent.as_ref().and_then(|parent| parent.method(name))
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field(
                "methods",
                &self
                    .methods
                    .iter()
                    .map(|method| method.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .finish()
    }
}

/// An object created by `NewInstance`: a shared reference to its class and
/// an owned field closure, populated on first assignment.
pub struct ClassInstance {
    class: Rc<Class>,
    fields: RefCell<Closure>,
}

impl ClassInstance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(Closure::new()),
        }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    /// True iff the method resolves anywhere on the parent chain with
    /// exactly `argument_count` formal parameters.
    pub fn has_method(&self, method: &str, argument_count: usize) -> bool {
        self.resolve_method(method, argument_count).is_some()
    }

    pub fn fields(&self) -> Ref<'_, Closure> {
        self.fields.borrow()
    }

    pub fn fields_mut(&self) -> RefMut<'_, Closure> {
        self.fields.borrow_mut()
    }

    pub(crate) fn resolve_method(&self, method: &str, argument_count: usize) -> Option<&Method> {
        self.class
            .method(method)
            .filter(|method| method.formal_params.len() == argument_count)
    }
}

impl fmt::Debug for ClassInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field values may refer back to this instance; print names only.
        f.debug_struct("ClassInstance")
            .field("class", &self.class.name())
            .field("fields", &self.fields.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}
