//! Object comparison: primitive fast paths with `__eq__`/`__lt__` dispatch
//! for class instances, plus the four comparisons derived from `equal` and
//! `less`.

use crate::runtime::error::{RuntimeError, Unwind};
use crate::runtime::object::{EQ_METHOD, LT_METHOD};
use crate::runtime::value::ObjectHolder;
use crate::runtime::Context;

/// Payload equality for matching primitive kinds, `__eq__` dispatch for a
/// left-hand instance, and null == null. Anything else cannot be compared.
pub fn equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    if let (Some(left), Some(right)) = (lhs.as_bool(), rhs.as_bool()) {
        return Ok(left == right);
    }
    if let (Some(left), Some(right)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(left == right);
    }
    if let (Some(left), Some(right)) = (lhs.as_string(), rhs.as_string()) {
        return Ok(left == right);
    }
    if lhs
        .as_instance()
        .is_some_and(|instance| instance.has_method(EQ_METHOD, 1))
    {
        let verdict = lhs.call_method(EQ_METHOD, &[rhs.clone()], context)?;
        return Ok(verdict.is_truthy());
    }
    if lhs.is_none() && rhs.is_none() {
        return Ok(true);
    }
    Err(RuntimeError::CannotCompare {
        comparison: "equality",
    }
    .into())
}

/// Payload ordering for matching primitive kinds (`False < True`, numeric,
/// lexicographic) and `__lt__` dispatch for a left-hand instance.
pub fn less(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    if let (Some(left), Some(right)) = (lhs.as_bool(), rhs.as_bool()) {
        return Ok(!left && right);
    }
    if let (Some(left), Some(right)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(left < right);
    }
    if let (Some(left), Some(right)) = (lhs.as_string(), rhs.as_string()) {
        return Ok(left < right);
    }
    if lhs
        .as_instance()
        .is_some_and(|instance| instance.has_method(LT_METHOD, 1))
    {
        let verdict = lhs.call_method(LT_METHOD, &[rhs.clone()], context)?;
        return Ok(verdict.is_truthy());
    }
    Err(RuntimeError::CannotCompare { comparison: "less" }.into())
}

pub fn not_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    Ok(!equal(lhs, rhs, context)?)
}

pub fn greater(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    Ok(!less(lhs, rhs, context)? && not_equal(lhs, rhs, context)?)
}

pub fn less_or_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    Ok(!greater(lhs, rhs, context)?)
}

pub fn greater_or_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    Ok(!less(lhs, rhs, context)?)
}
