use std::rc::Rc;

use crate::runtime::error::{ExecResult, RuntimeError, Unwind};
use crate::runtime::object::{Class, ClassInstance, Object, STR_METHOD};
use crate::runtime::{Closure, Context};

/// A shared, possibly-null handle to a heap object. The null state is the
/// language-level `None` value.
///
/// Allocation happens through [`ObjectHolder::own`]; cloning a holder shares
/// the same heap object, which is how `self` aliases its instance across
/// method calls. Cycles through instance fields are never collected; the
/// interpreter is short-lived enough not to care.
#[derive(Debug, Clone, Default)]
pub struct ObjectHolder(Option<Rc<Object>>);

impl ObjectHolder {
    /// Allocates a fresh heap object owned by the returned holder.
    pub fn own(object: Object) -> Self {
        Self(Some(Rc::new(object)))
    }

    /// The null holder.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn number(value: i32) -> Self {
        Self::own(Object::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::own(Object::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::own(Object::Bool(value))
    }

    pub fn class(class: Rc<Class>) -> Self {
        Self::own(Object::Class(class))
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_number(&self) -> Option<i32> {
        match self.0.as_deref() {
            Some(Object::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self.0.as_deref() {
            Some(Object::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.0.as_deref() {
            Some(Object::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Rc<Class>> {
        match self.0.as_deref() {
            Some(Object::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&ClassInstance> {
        match self.0.as_deref() {
            Some(Object::Instance(instance)) => Some(instance),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.0.as_deref() {
            Some(Object::Number(_)) => "number",
            Some(Object::String(_)) => "string",
            Some(Object::Bool(_)) => "bool",
            Some(Object::Class(_)) => "class",
            Some(Object::Instance(_)) => "instance",
            None => "None",
        }
    }

    /// The boolean projection of the held value. Null holders, classes and
    /// instances are falsy; primitives follow their payload.
    pub fn is_truthy(&self) -> bool {
        match self.0.as_deref() {
            Some(Object::Bool(value)) => *value,
            Some(Object::Number(value)) => *value != 0,
            Some(Object::String(value)) => !value.is_empty(),
            Some(Object::Class(_)) | Some(Object::Instance(_)) | None => false,
        }
    }

    /// Renders the held value the way `print` emits it. Instances with a
    /// zero-argument `__str__` render through it; other instances render as
    /// an opaque identity marker.
    pub fn to_output(&self, context: &mut dyn Context) -> Result<String, Unwind> {
        let Some(object) = self.0.as_ref() else {
            return Ok("None".to_string());
        };
        match object.as_ref() {
            Object::Number(value) => Ok(value.to_string()),
            Object::String(value) => Ok(value.clone()),
            Object::Bool(true) => Ok("True".to_string()),
            Object::Bool(false) => Ok("False".to_string()),
            Object::Class(class) => Ok(format!("Class {}", class.name())),
            Object::Instance(instance) => {
                if instance.has_method(STR_METHOD, 0) {
                    let rendered = self.call_method(STR_METHOD, &[], context)?;
                    rendered.to_output(context)
                } else {
                    Ok(format!(
                        "<{} object at {:p}>",
                        instance.class().name(),
                        Rc::as_ptr(object)
                    ))
                }
            }
        }
    }

    /// Invokes `method` on the held instance: binds `self` to a share of
    /// this holder and each formal parameter positionally, then executes the
    /// method body against the fresh closure.
    ///
    /// The body is expected to be a `MethodBody` node, which is where a
    /// `return` from inside it lands.
    pub fn call_method(
        &self,
        method: &str,
        args: &[ObjectHolder],
        context: &mut dyn Context,
    ) -> ExecResult {
        let instance = self
            .as_instance()
            .ok_or_else(|| RuntimeError::ExpectedInstance {
                type_name: self.type_name(),
            })?;
        let resolved =
            instance
                .resolve_method(method, args.len())
                .ok_or_else(|| RuntimeError::UnknownMethod {
                    method: method.to_string(),
                    class: instance.class().name().to_string(),
                })?;
        let mut locals = Closure::new();
        locals.insert("self".to_string(), self.clone());
        for (param, arg) in resolved.formal_params.iter().zip(args) {
            locals.insert(param.clone(), arg.clone());
        }
        resolved.body.execute(&mut locals, context)
    }
}
