//! Syntax tree nodes and their tree-walking evaluation.
//!
//! The parser builds these nodes once; after that they are immutable for
//! the duration of interpretation. Every node evaluates through a single
//! `execute` operation over a mutable name closure and the embedder's
//! `Context`, yielding a (possibly null) object holder. Children evaluate
//! strictly left to right.

use std::rc::Rc;

use crate::runtime::compare;
use crate::runtime::{
    Class, ClassInstance, Closure, Context, ExecResult, Object, ObjectHolder, RuntimeError, Unwind,
};

const ADD_METHOD: &str = "__add__";
const INIT_METHOD: &str = "__init__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mult,
    Div,
    /// Eager conjunction: both operands evaluate, no short-circuit.
    And,
    /// Eager disjunction: both operands evaluate, no short-circuit.
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

/// A syntax tree node. Composite nodes own their children; method bodies
/// are shared with the classes that hold them.
#[derive(Debug, Clone)]
pub enum Statement {
    /// A literal value; the `None` literal carries a null holder.
    Const(ObjectHolder),
    /// `name` or `name.field.field` lookup. Every step past the head must
    /// resolve to a class instance whose field closure holds the next name.
    VariableValue { name: String, fields: Vec<String> },
    /// Binds the evaluated right-hand side to `name` in the current
    /// closure and yields the bound holder.
    Assignment { name: String, value: Box<Statement> },
    /// `obj.field = value` against the instance's field closure.
    FieldAssignment {
        object: Box<Statement>,
        field: String,
        value: Box<Statement>,
    },
    /// Renders each argument, space-separated, and terminates the line.
    Print { args: Vec<Statement> },
    /// `obj.method(args)`. A receiver that is not an instance, or has no
    /// method of this name and arity, yields a null holder with the
    /// arguments left unevaluated.
    MethodCall {
        object: Box<Statement>,
        method: String,
        args: Vec<Statement>,
    },
    /// Allocates a fresh instance and runs `__init__` when the class has
    /// one at the call arity; its return value is discarded.
    NewInstance {
        class: Rc<Class>,
        args: Vec<Statement>,
    },
    /// `str(arg)`: the printed form as a string value.
    Stringify { arg: Box<Statement> },
    BinaryOp {
        op: BinaryOperator,
        lhs: Box<Statement>,
        rhs: Box<Statement>,
    },
    Not { arg: Box<Statement> },
    Comparison {
        cmp: Comparator,
        lhs: Box<Statement>,
        rhs: Box<Statement>,
    },
    IfElse {
        condition: Box<Statement>,
        then_body: Box<Statement>,
        else_body: Option<Box<Statement>>,
    },
    /// Statements in textual order; intermediate results are discarded.
    Compound { statements: Vec<Statement> },
    /// Evaluates its operand, then unwinds to the enclosing `MethodBody`.
    Return { value: Box<Statement> },
    /// The root of every method: catches the return unwind and yields its
    /// holder, or a null holder when the body ran to completion.
    MethodBody { body: Box<Statement> },
    /// Binds the class under its own name in the current closure.
    ClassDefinition { class: Rc<Class> },
}

impl Statement {
    pub fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        match self {
            Statement::Const(value) => Ok(value.clone()),
            Statement::VariableValue { name, fields } => {
                let mut holder = closure
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })?;
                for field in fields {
                    holder = lookup_field(&holder, field)?;
                }
                Ok(holder)
            }
            Statement::Assignment { name, value } => {
                let holder = value.execute(closure, context)?;
                closure.insert(name.clone(), holder.clone());
                Ok(holder)
            }
            Statement::FieldAssignment {
                object,
                field,
                value,
            } => {
                let target = object.execute(closure, context)?;
                let holder = value.execute(closure, context)?;
                let instance =
                    target
                        .as_instance()
                        .ok_or_else(|| RuntimeError::ExpectedInstance {
                            type_name: target.type_name(),
                        })?;
                instance
                    .fields_mut()
                    .insert(field.clone(), holder.clone());
                Ok(holder)
            }
            Statement::Print { args } => {
                let mut rendered = Vec::with_capacity(args.len());
                for arg in args {
                    let holder = arg.execute(closure, context)?;
                    rendered.push(holder.to_output(context)?);
                }
                writeln!(context.output_stream(), "{}", rendered.join(" "))?;
                Ok(ObjectHolder::none())
            }
            Statement::MethodCall {
                object,
                method,
                args,
            } => {
                let receiver = object.execute(closure, context)?;
                let dispatchable = receiver
                    .as_instance()
                    .is_some_and(|instance| instance.has_method(method, args.len()));
                if !dispatchable {
                    return Ok(ObjectHolder::none());
                }
                let evaluated = execute_args(args, closure, context)?;
                receiver.call_method(method, &evaluated, context)
            }
            Statement::NewInstance { class, args } => {
                let instance =
                    ObjectHolder::own(Object::Instance(ClassInstance::new(Rc::clone(class))));
                let has_init = class
                    .method(INIT_METHOD)
                    .is_some_and(|method| method.formal_params.len() == args.len());
                if has_init {
                    let evaluated = execute_args(args, closure, context)?;
                    instance.call_method(INIT_METHOD, &evaluated, context)?;
                }
                Ok(instance)
            }
            Statement::Stringify { arg } => {
                let holder = arg.execute(closure, context)?;
                Ok(ObjectHolder::string(holder.to_output(context)?))
            }
            Statement::BinaryOp { op, lhs, rhs } => {
                let left = lhs.execute(closure, context)?;
                let right = rhs.execute(closure, context)?;
                match op {
                    BinaryOperator::Add => add(&left, &right, context),
                    BinaryOperator::Sub => {
                        arithmetic(&left, &right, "Subtraction", i32::wrapping_sub)
                    }
                    BinaryOperator::Mult => {
                        arithmetic(&left, &right, "Multiplication", i32::wrapping_mul)
                    }
                    BinaryOperator::Div => divide(&left, &right),
                    BinaryOperator::And => logical(&left, &right, "'and'", |l, r| l && r),
                    BinaryOperator::Or => logical(&left, &right, "'or'", |l, r| l || r),
                }
            }
            Statement::Not { arg } => {
                let holder = arg.execute(closure, context)?;
                if holder.is_none() {
                    return Err(RuntimeError::UnsupportedOperands { operation: "'not'" }.into());
                }
                Ok(ObjectHolder::boolean(!holder.is_truthy()))
            }
            Statement::Comparison { cmp, lhs, rhs } => {
                let left = lhs.execute(closure, context)?;
                let right = rhs.execute(closure, context)?;
                let verdict = match cmp {
                    Comparator::Equal => compare::equal(&left, &right, context)?,
                    Comparator::NotEqual => compare::not_equal(&left, &right, context)?,
                    Comparator::Less => compare::less(&left, &right, context)?,
                    Comparator::LessOrEqual => compare::less_or_equal(&left, &right, context)?,
                    Comparator::Greater => compare::greater(&left, &right, context)?,
                    Comparator::GreaterOrEqual => {
                        compare::greater_or_equal(&left, &right, context)?
                    }
                };
                Ok(ObjectHolder::boolean(verdict))
            }
            Statement::IfElse {
                condition,
                then_body,
                else_body,
            } => {
                let condition = condition.execute(closure, context)?;
                if condition.is_truthy() {
                    then_body.execute(closure, context)
                } else if let Some(else_body) = else_body {
                    else_body.execute(closure, context)
                } else {
                    Ok(ObjectHolder::none())
                }
            }
            Statement::Compound { statements } => {
                for statement in statements {
                    statement.execute(closure, context)?;
                }
                Ok(ObjectHolder::none())
            }
            Statement::Return { value } => {
                let holder = value.execute(closure, context)?;
                Err(Unwind::Return(holder))
            }
            Statement::MethodBody { body } => match body.execute(closure, context) {
                Ok(_) => Ok(ObjectHolder::none()),
                Err(Unwind::Return(holder)) => Ok(holder),
                Err(unwind) => Err(unwind),
            },
            Statement::ClassDefinition { class } => {
                let holder = ObjectHolder::class(Rc::clone(class));
                closure.insert(class.name().to_string(), holder.clone());
                Ok(holder)
            }
        }
    }
}

fn execute_args(
    args: &[Statement],
    closure: &mut Closure,
    context: &mut dyn Context,
) -> Result<Vec<ObjectHolder>, Unwind> {
    let mut evaluated = Vec::with_capacity(args.len());
    for arg in args {
        evaluated.push(arg.execute(closure, context)?);
    }
    Ok(evaluated)
}

fn lookup_field(holder: &ObjectHolder, field: &str) -> Result<ObjectHolder, Unwind> {
    let instance = holder
        .as_instance()
        .ok_or_else(|| RuntimeError::ExpectedInstance {
            type_name: holder.type_name(),
        })?;
    instance.fields().get(field).cloned().ok_or_else(|| {
        RuntimeError::UndefinedVariable {
            name: field.to_string(),
        }
        .into()
    })
}

fn add(lhs: &ObjectHolder, rhs: &ObjectHolder, context: &mut dyn Context) -> ExecResult {
    if let (Some(left), Some(right)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(ObjectHolder::number(left.wrapping_add(right)));
    }
    if let (Some(left), Some(right)) = (lhs.as_string(), rhs.as_string()) {
        return Ok(ObjectHolder::string(format!("{left}{right}")));
    }
    if lhs
        .as_instance()
        .is_some_and(|instance| instance.has_method(ADD_METHOD, 1))
    {
        return lhs.call_method(ADD_METHOD, &[rhs.clone()], context);
    }
    Err(RuntimeError::UnsupportedOperands {
        operation: "Addition",
    }
    .into())
}

fn arithmetic(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    operation: &'static str,
    apply: fn(i32, i32) -> i32,
) -> ExecResult {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(left), Some(right)) => Ok(ObjectHolder::number(apply(left, right))),
        _ => Err(RuntimeError::UnsupportedOperands { operation }.into()),
    }
}

fn divide(lhs: &ObjectHolder, rhs: &ObjectHolder) -> ExecResult {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(_), Some(0)) => Err(RuntimeError::DivisionByZero.into()),
        (Some(left), Some(right)) => Ok(ObjectHolder::number(left.wrapping_div(right))),
        _ => Err(RuntimeError::UnsupportedOperands {
            operation: "Division",
        }
        .into()),
    }
}

fn logical(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    operation: &'static str,
    combine: fn(bool, bool) -> bool,
) -> ExecResult {
    if lhs.is_none() || rhs.is_none() {
        return Err(RuntimeError::UnsupportedOperands { operation }.into());
    }
    Ok(ObjectHolder::boolean(combine(
        lhs.is_truthy(),
        rhs.is_truthy(),
    )))
}
