use std::cell::RefCell;
use std::rc::Rc;

use prototypal::{DynObject, ObjectError, Value, CLONE_HOOK, DESTRUCT_HOOK, TO_STRING_HOOK};

type Log = Rc<RefCell<Vec<String>>>;

/// A hook that records `label` plus the receiver's `name` member
fn recorder(log: &Log, label: &'static str) -> Value {
    let log = log.clone();
    Value::closure(move |this, _| {
        log.borrow_mut()
            .push(format!("{label}:{}", this.get_or_nil("name")));
        Ok(Value::Nil)
    })
}

#[test]
fn test_hooks_are_optional() {
    let obj = DynObject::new();
    let copy = obj.clone_object().unwrap();
    assert_eq!(obj.to_display_string().unwrap(), "DynObject");
    assert_eq!(copy.to_string(), "DynObject");
    drop(copy);
    drop(obj);
}

#[test]
fn test_to_string_hook() {
    let obj = DynObject::new();
    obj.set("name", "widget");
    obj.set(
        TO_STRING_HOOK,
        Value::closure(|this, _| Ok(format!("<{}>", this.get_or_nil("name")).into())),
    );
    assert_eq!(obj.to_string(), "<widget>");
    assert_eq!(Value::Object(obj).to_string(), "<widget>");
}

#[test]
fn test_inherited_to_string_hook() {
    let base = DynObject::new();
    base.set(TO_STRING_HOOK, Value::closure(|_, _| Ok("base".into())));
    let derived = DynObject::construct(&base);
    assert_eq!(derived.to_string(), "base");
}

#[test]
fn test_failing_to_string_falls_back() {
    let obj = DynObject::new();
    obj.set(
        TO_STRING_HOOK,
        Value::closure(|_, _| Err(anyhow::anyhow!("no text").into())),
    );
    assert!(obj.to_display_string().is_err());
    assert_eq!(obj.to_string(), "DynObject");
}

#[test]
fn test_to_string_must_return_text() {
    let obj = DynObject::new();
    obj.set(TO_STRING_HOOK, Value::closure(|this, _| Ok(this.into())));
    let err = obj.to_display_string().unwrap_err();
    assert!(matches!(err, ObjectError::Conversion { .. }));
    assert_eq!(obj.to_string(), "DynObject");
    assert_eq!(Value::Object(obj).to_string(), "DynObject");
}

#[test]
fn test_to_string_missing_method_inside_hook() {
    let obj = DynObject::new();
    obj.set(
        TO_STRING_HOOK,
        Value::closure(|this, _| this.invoke_method("missing", &[])),
    );
    assert_eq!(obj.to_display_string().unwrap(), "DynObject");
}

#[test]
fn test_clone_missing_method_inside_hook() {
    let obj = DynObject::new();
    obj.set("a", 1);
    obj.set(
        CLONE_HOOK,
        Value::closure(|this, _| this.invoke_method("missing", &[])),
    );
    let copy = obj.clone_object().unwrap();
    assert_eq!(copy.get_or_nil("a"), Value::Int(1));
    assert!(!copy.ptr_eq(&obj));
}

#[test]
fn test_clone_hook_runs_on_copy() {
    let log = Log::default();
    let obj = DynObject::new();
    obj.set("name", "source");
    obj.set(CLONE_HOOK, recorder(&log, "clone"));
    obj.set(
        "mark",
        Value::closure(|this, _| {
            this.set("name", "copy");
            Ok(Value::Nil)
        }),
    );

    let copy = obj.clone_object().unwrap();
    assert_eq!(*log.borrow(), vec!["clone:source"]);
    copy.invoke_method("mark", &[]).unwrap();
    assert_eq!(obj.get_or_nil("name"), Value::from("source"));
    assert_eq!(copy.get_or_nil("name"), Value::from("copy"));
}

#[test]
fn test_clone_hook_errors_propagate() {
    let obj = DynObject::new();
    obj.set(
        CLONE_HOOK,
        Value::closure(|_, _| Err(anyhow::anyhow!("refused").into())),
    );
    let err = obj.clone_object().unwrap_err();
    assert!(matches!(err, ObjectError::Native(_)));
}

#[test]
fn test_clone_shares_prototype_until_replaced() {
    let source = DynObject::new();
    source.set("foo", 1);
    let copy = source.clone_object().unwrap();
    assert!(copy.prototype().unwrap().ptr_eq(&source.prototype().unwrap()));

    source.set("foo", 2);
    assert_eq!(copy.get_or_nil("foo"), Value::Int(1));

    copy.set_prototype(&DynObject::root());
    assert!(!copy.prototype().unwrap().ptr_eq(&source.prototype().unwrap()));
}

#[test]
fn test_destruct_hook_on_release() {
    let log = Log::default();
    let obj = DynObject::new();
    obj.set("name", "temp");
    obj.set(DESTRUCT_HOOK, recorder(&log, "destruct"));

    let alias = obj.clone();
    drop(obj);
    assert!(log.borrow().is_empty());
    drop(alias);
    assert_eq!(*log.borrow(), vec!["destruct:temp"]);
}

#[test]
fn test_inherited_destruct_hook() {
    let log = Log::default();
    let base = DynObject::new();
    base.set(DESTRUCT_HOOK, recorder(&log, "destruct"));
    {
        let child = DynObject::construct(&base);
        child.set("name", "child");
    }
    assert_eq!(*log.borrow(), vec!["destruct:child"]);
}

#[test]
fn test_failing_destruct_is_swallowed() {
    let obj = DynObject::new();
    obj.set(
        DESTRUCT_HOOK,
        Value::closure(|this, _| this.invoke_method("missing", &[])),
    );
    drop(obj);
}

#[test]
fn test_storing_methods_does_not_leak() {
    let log = Log::default();
    let obj = DynObject::new();
    obj.set("name", "owner");
    obj.set("self_ref", Value::closure(|this, _| Ok(this.into())));
    obj.set(DESTRUCT_HOOK, recorder(&log, "destruct"));

    let method = obj.resolve_optional("self_ref").unwrap();
    drop(obj);
    assert_eq!(*log.borrow(), vec!["destruct:owner"]);
    assert!(matches!(
        method.invoke(&[]),
        Err(ObjectError::DetachedReceiver { .. })
    ));
}
