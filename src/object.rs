use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Display, Formatter};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, trace, warn};

use crate::{BoundFunction, ObjectError, ObjectResult, Value};

mod forbid_serde;
mod members;
mod seed;

pub use members::*;
pub use seed::*;

/// Reserved member holding the delegation target
pub const PROTOTYPE: &str = "prototype";

/// Hook names looked up at lifecycle points
pub const DESTRUCT_HOOK: &str = "destruct";
pub const CLONE_HOOK: &str = "clone";
pub const TO_STRING_HOOK: &str = "toString";

/// Text used when an object has no `toString` hook
pub const TYPE_NAME: &str = "DynObject";

/// A handle to a prototype-based object.
///
/// Cloning the handle shares the object; use [`DynObject::clone_object`]
/// to copy its own members. Lookups that miss locally are forwarded to
/// whatever object sits in the `prototype` member, so mutating a shared
/// prototype is immediately visible to every object delegating to it.
#[derive(Clone)]
pub struct DynObject(Rc<InnerObject>);

/// The actual object data
struct InnerObject {
    members: RefCell<IndexMap<String, Value>>,

    /// Set on the transient receiver handed to the `destruct` hook, so
    /// that releasing it doesn't fire the hook a second time.
    finalized: Cell<bool>,
}

impl InnerObject {
    fn with_members(members: IndexMap<String, Value>) -> Self {
        InnerObject {
            members: RefCell::new(members),
            finalized: Cell::new(false),
        }
    }
}

impl DynObject {
    /// An object without a prototype slot; lookups end here.
    pub fn root() -> Self {
        DynObject(Rc::new(InnerObject::with_members(IndexMap::new())))
    }

    /// An empty object delegating to a fresh, empty root prototype
    pub fn new() -> Self {
        DynObject::with_prototype(&DynObject::root())
    }

    /// An empty object delegating directly to `prototype`
    pub fn with_prototype(prototype: &DynObject) -> Self {
        let mut members = IndexMap::new();
        members.insert(PROTOTYPE.to_string(), Value::Object(prototype.clone()));
        DynObject(Rc::new(InnerObject::with_members(members)))
    }

    /// An object whose own members are populated from `descriptor`.
    /// Entries go through [`DynObject::set`], so closures become methods.
    pub fn from_descriptor(descriptor: Descriptor) -> Self {
        let obj = DynObject::new();
        for (name, value) in descriptor {
            obj.set(&name, value);
        }
        obj
    }

    pub fn construct(seed: impl Into<Seed>) -> Self {
        match seed.into() {
            Seed::Empty => DynObject::new(),
            Seed::Prototype(prototype) => DynObject::with_prototype(&prototype),
            Seed::Descriptor(descriptor) => DynObject::from_descriptor(descriptor),
        }
    }

    /// Construct from a dynamically typed argument. Objects become the
    /// prototype, falsy values give a default object, anything else is an
    /// [`ObjectError::InvalidConstructorArgument`].
    pub fn from_value(value: impl Into<Value>) -> ObjectResult<Self> {
        let seed = Seed::try_from(value.into())?;
        Ok(DynObject::construct(seed))
    }

    /*******************\
    |* Member access   *|
    \*******************/
    /// Look up `name`, walking the prototype chain on a miss.
    ///
    /// Nil members count as unset. A chain that loops back onto an object
    /// already visited during this lookup ends the walk as a miss.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut visited: Vec<*const InnerObject> = Vec::new();
        let mut current = self.clone();
        loop {
            let next = {
                let members = current.0.members.borrow();
                match members.get(name) {
                    Some(value) if !value.is_nil() => return Some(value.clone()),
                    _ => {},
                }
                match members.get(PROTOTYPE) {
                    Some(Value::Object(prototype)) => prototype.clone(),
                    _ => return None,
                }
            };

            visited.push(Rc::as_ptr(&current.0));
            if visited.contains(&Rc::as_ptr(&next.0)) {
                warn!("prototype chain loops while resolving '{name}'");
                return None;
            }
            trace!("'{name}' not found locally, delegating to prototype");
            current = next;
        }
    }

    /// Same as [`DynObject::get`] with a miss surfaced as `Nil`
    pub fn get_or_nil(&self, name: &str) -> Value {
        self.get(name).unwrap_or_default()
    }

    /// Store `value` as an own member. Bare closures are bound to this
    /// object first, turning them into methods.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let value = match value.into() {
            Value::Closure(closure) => Value::Function(closure.bind(name, self)),
            other => other,
        };
        if name == PROTOTYPE {
            debug!("replacing prototype with {}", value.type_str());
        }
        let previous = self
            .0
            .members
            .borrow_mut()
            .insert(name.to_string(), value);
        drop(previous);
    }

    /// Whether a non-nil own member exists; the chain is not consulted.
    pub fn has(&self, name: &str) -> bool {
        self.0
            .members
            .borrow()
            .get(name)
            .is_some_and(|value| !value.is_nil())
    }

    /// Remove an own member. Prototypes are never touched.
    pub fn delete(&self, name: &str) {
        let previous = self
            .0
            .members
            .borrow_mut()
            .shift_remove(name);
        drop(previous);
    }

    pub fn prototype(&self) -> Option<DynObject> {
        match self.0.members.borrow().get(PROTOTYPE) {
            Some(Value::Object(prototype)) => Some(prototype.clone()),
            _ => None,
        }
    }

    pub fn set_prototype(&self, prototype: &DynObject) {
        self.set(PROTOTYPE, prototype);
    }

    /*******************\
    |* Method dispatch *|
    \*******************/
    /// Resolve `name` and run it with this object as receiver
    pub fn invoke_method(&self, name: &str, args: &[Value]) -> ObjectResult<Value> {
        trace!("dispatching '{name}'");
        let method = self
            .resolve_optional(name)
            .ok_or_else(|| ObjectError::method_not_found(name))?;
        method.apply_with(self, args)
    }

    /// Resolve `name` to a method if it names one anywhere on the chain
    pub fn resolve_optional(&self, name: &str) -> Option<BoundFunction> {
        match self.get(name) {
            Some(Value::Function(method)) => Some(method),
            _ => None,
        }
    }

    /// Run the hook `name` if installed, returning its result.
    ///
    /// A `MethodNotFound` raised from inside the hook counts as the hook
    /// not being installed.
    fn run_hook(&self, name: &str) -> ObjectResult<Option<Value>> {
        let Some(hook) = self.resolve_optional(name) else {
            debug!("no '{name}' hook installed");
            return Ok(None);
        };
        debug!("running '{name}' hook");
        match hook.apply_with(self, &[]) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_method_not_found() => {
                debug!("'{name}' hook discarded: {err}");
                Ok(None)
            },
            Err(err) => Err(err),
        }
    }

    /*******************\
    |* Lifecycle       *|
    \*******************/
    /// Shallow copy of the own members. The prototype reference is
    /// shared, not copied. The `clone` hook then runs on the copy.
    pub fn clone_object(&self) -> ObjectResult<DynObject> {
        let members = self.0.members.borrow().clone();
        let copy = DynObject(Rc::new(InnerObject::with_members(members)));
        copy.run_hook(CLONE_HOOK)?;
        Ok(copy)
    }

    /// Text produced by the `toString` hook, or the type name without one.
    /// The hook must return a string.
    pub fn to_display_string(&self) -> ObjectResult<String> {
        match self.run_hook(TO_STRING_HOOK)? {
            Some(text) => String::try_from(text),
            None => Ok(TYPE_NAME.to_string()),
        }
    }

    /***********************\
    |* Indexed-style access *|
    \***********************/
    /// Unlike [`DynObject::has`], this does consult the prototype chain.
    pub fn offset_exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn offset_get(&self, name: &str) -> Value {
        self.get_or_nil(name)
    }

    pub fn offset_set(&self, name: &str, value: impl Into<Value>) {
        self.set(name, value)
    }

    pub fn offset_unset(&self, name: &str) {
        self.delete(name)
    }

    /*******************\
    |* Own members     *|
    \*******************/
    /// Restartable cursor over own members in insertion order
    pub fn members(&self) -> Members {
        Members::new(self.clone())
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.members.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.members.borrow().is_empty()
    }

    pub(crate) fn entry_at(&self, index: usize) -> Option<(String, Value)> {
        self.0
            .members
            .borrow()
            .get_index(index)
            .map(|(name, value)| (name.clone(), value.clone()))
    }

    /*******************\
    |* Identity        *|
    \*******************/
    pub fn ptr_eq(&self, other: &DynObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> WeakObject {
        WeakObject(Rc::downgrade(&self.0))
    }
}

impl Default for DynObject {
    fn default() -> Self {
        DynObject::new()
    }
}

impl PartialEq for DynObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Display for DynObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_display_string() {
            Ok(text) => write!(f, "{text}"),
            Err(err) => {
                warn!("'{TO_STRING_HOOK}' hook failed: {err}");
                write!(f, "{TYPE_NAME}")
            },
        }
    }
}

impl Debug for DynObject {
    // Prototypes are shown by address only, the chain may be long
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let members = self.0.members.borrow();
        let keys = members
            .iter()
            .map(|(name, value)| format!("{name}: {}", value.type_str()))
            .join(", ");
        write!(f, "{TYPE_NAME}@{:p} {{ {keys} }}", Rc::as_ptr(&self.0))
    }
}

impl<'a> IntoIterator for &'a DynObject {
    type Item = (String, Value);
    type IntoIter = Members;

    fn into_iter(self) -> Self::IntoIter {
        self.members()
    }
}

impl Drop for InnerObject {
    fn drop(&mut self) {
        if self.finalized.get() {
            return;
        }
        let members = std::mem::take(self.members.get_mut());
        if members.is_empty() {
            return;
        }

        // The storage is going away, so the hook runs against a stand-in
        // carrying the same own members.
        let receiver = DynObject(Rc::new(InnerObject {
            members: RefCell::new(members),
            finalized: Cell::new(true),
        }));
        if let Err(err) = receiver.run_hook(DESTRUCT_HOOK) {
            warn!("'{DESTRUCT_HOOK}' hook failed: {err}");
        }
    }
}

/// Non-owning handle, used by bound functions to remember their owner
#[derive(Clone)]
pub(crate) struct WeakObject(Weak<InnerObject>);

impl WeakObject {
    pub fn upgrade(&self) -> Option<DynObject> {
        self.0.upgrade().map(DynObject)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl PartialEq for WeakObject {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}
