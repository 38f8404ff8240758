use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use log::trace;

use super::{ObjectError, ObjectResult, Value};
use crate::object::WeakObject;
use crate::DynObject;

/// Signature shared by every native method: the receiver comes first and
/// plays the role of `this`.
pub type NativeFn = dyn Fn(&DynObject, &[Value]) -> ObjectResult<Value>;

/*************\
|* Closures  *|
\*************/
/// A callable that is not attached to any object yet
#[derive(Clone)]
pub struct Closure(Rc<NativeFn>);

impl Closure {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&DynObject, &[Value]) -> ObjectResult<Value> + 'static,
    {
        Closure(Rc::new(f))
    }

    pub fn call(&self, receiver: &DynObject, args: &[Value]) -> ObjectResult<Value> {
        (self.0)(receiver, args)
    }

    /// Attach to `owner`; the owner is held weakly so that an object
    /// storing its own methods can still be released.
    pub(crate) fn bind(self, name: &str, owner: &DynObject) -> BoundFunction {
        BoundFunction {
            name: name.to_string(),
            callable: self,
            receiver: owner.downgrade(),
        }
    }
}

impl Debug for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Closure({:p})", Rc::as_ptr(&self.0) as *const u8)
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/*******************\
|* Bound functions *|
\*******************/
/// A closure together with the object it was assigned onto.
///
/// `invoke` runs against that object; `call_with` / `apply_with` run
/// against any other receiver for a single call without rebinding.
#[derive(Clone, PartialEq)]
pub struct BoundFunction {
    name: String,
    callable: Closure,
    receiver: WeakObject,
}

impl BoundFunction {
    /// Member name this function was assigned under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pre-bound receiver, if it is still alive
    pub fn bound_receiver(&self) -> Option<DynObject> {
        self.receiver.upgrade()
    }

    /// Run with the pre-bound receiver
    pub fn invoke(&self, args: &[Value]) -> ObjectResult<Value> {
        let receiver = self
            .bound_receiver()
            .ok_or_else(|| {
                ObjectError::DetachedReceiver {
                    name: self.name.clone(),
                }
            })?;
        self.apply_with(&receiver, args)
    }

    /// Run against `receiver` with individually supplied arguments
    pub fn call_with<I>(&self, receiver: &DynObject, args: I) -> ObjectResult<Value>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        self.apply_with(receiver, &args)
    }

    /// Run against `receiver` with an argument list
    pub fn apply_with(&self, receiver: &DynObject, args: &[Value]) -> ObjectResult<Value> {
        trace!("applying '{}' with {} argument(s)", self.name, args.len());
        self.callable.call(receiver, args)
    }
}

impl Display for BoundFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#Function[{}]", self.name)
    }
}

impl Debug for BoundFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundFunction")
            .field("name", &self.name)
            .field("callable", &self.callable)
            .field("attached", &self.receiver.is_alive())
            .finish()
    }
}
