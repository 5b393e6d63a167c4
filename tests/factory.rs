mod common;

use common::{sym, vals};
use record_factory::{Condition, Config, Factory, Rebind, Value};
use rstest::rstest;

#[test]
fn named_types_are_bound() {
    let factory = Factory::new();
    let customer = factory
        .define(Some("Customer"), ["name", "address"])
        .unwrap();

    let bound = factory.get("Customer").expect("Customer should be bound");
    assert!(std::sync::Arc::ptr_eq(&customer, &bound));
    assert_eq!(customer.name(), Some(sym("Customer")));
    assert_eq!(factory.namespace().names(), vec![sym("Customer")]);

    let a = customer.new_record(vals(["Ann", "Main St"])).unwrap();
    let b = bound.new_record(vals(["Ann", "Main St"])).unwrap();
    assert_eq!(a, b);
}

#[test]
fn anonymous_types_are_not_bound() {
    let factory = Factory::new();
    let anonymous = factory.define(None, ["a"]).unwrap();
    assert_eq!(anonymous.name(), None);
    assert!(factory.namespace().is_empty());
}

#[rstest]
#[case("point")]
#[case("")]
#[case("Point Type")]
#[case("1Point")]
fn invalid_type_names_are_rejected(#[case] name: &str) {
    let factory = Factory::new();
    assert_eq!(
        factory.define(Some(name), ["x"]).map(|_| ()),
        Err(Condition::InvalidTypeName(name.to_string()))
    );
    assert!(factory.namespace().is_empty());
}

#[test]
fn duplicate_fields_are_rejected() {
    let factory = Factory::new();
    assert_eq!(
        factory.define(None, ["x", "y", "x"]).map(|_| ()),
        Err(Condition::DuplicateField(sym("x")))
    );
}

#[rstest]
#[case("")]
#[case("a b")]
#[case("x=")]
#[case("ok?")]
#[case("bang!")]
#[case("Upper")]
#[case("1st")]
#[case("with-dash")]
fn invalid_field_names_are_rejected(#[case] field: &str) {
    let factory = Factory::new();
    assert_eq!(
        factory.define(Some("Shape"), ["x", field]).map(|_| ()),
        Err(Condition::InvalidFieldName(field.to_string()))
    );
    assert!(!factory.namespace().contains("Shape"));
}

#[rstest]
#[case("x")]
#[case("_private")]
#[case("snake_case2")]
#[case("camelCase")]
fn identifier_field_names_are_accepted(#[case] field: &str) {
    let rt = Factory::new().define(None, [field]).unwrap();
    let mut r = rt.new_record(vals([1])).unwrap();
    let setter = format!("{field}=");
    assert_eq!(r.send(&setter, &[Value::from(9)]), Ok(Value::from(9)));
    assert_eq!(r.send(field, &[]), Ok(Value::from(9)));
}

#[test]
fn rebinding_replaces_by_default() {
    let factory = Factory::new();
    let first = factory.define(Some("Thing"), ["a"]).unwrap();
    let second = factory.define(Some("Thing"), ["a", "b"]).unwrap();

    let bound = factory.get("Thing").unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &bound));
    assert!(std::sync::Arc::ptr_eq(&second, &bound));
    assert_eq!(factory.namespace().len(), 1);
}

#[test]
fn rebinding_can_be_rejected() {
    let factory = Factory::with_config(Config::default().with_rebind(Rebind::Reject));
    let first = factory.define(Some("Thing"), ["a"]).unwrap();
    assert_eq!(
        factory.define(Some("Thing"), ["b"]).map(|_| ()),
        Err(Condition::NameBoundMultipleTimes(sym("Thing")))
    );
    assert!(std::sync::Arc::ptr_eq(&first, &factory.get("Thing").unwrap()));
}

#[test]
fn create_takes_a_leading_name() {
    let factory = Factory::new();
    let point = factory
        .create(&[
            Value::from("Point3"),
            Value::Symbol(sym("x")),
            Value::Symbol(sym("y")),
            Value::from("z"),
        ])
        .unwrap();
    assert_eq!(point.members(), vec![sym("x"), sym("y"), sym("z")]);
    assert!(factory.namespace().contains("Point3"));

    let anonymous = factory.create(&[Value::Symbol(sym("only"))]).unwrap();
    assert_eq!(anonymous.name(), None);
    assert_eq!(anonymous.members(), vec![sym("only")]);

    assert_eq!(
        factory.create(&[Value::from(1)]).map(|_| ()),
        Err(Condition::type_error("symbol or string", "integer"))
    );
}

#[test]
fn extension_block_adds_behavior() {
    let factory = Factory::new();
    let point = factory
        .define_with(Some("Vec2"), ["x", "y"], |ext| {
            assert_eq!(ext.name(), Some(sym("Vec2")));
            assert_eq!(ext.members(), vec![sym("x"), sym("y")]);
            ext.define_method("greeting", |record, _| {
                Ok(Value::from(format!("Hello {}!", record.get("x")?)))
            });
            ext.define_method("scale", |record, args| {
                let [Value::Integer(by)] = args else {
                    return Err(Condition::wrong_num_of_args(1, args.len()));
                };
                for field in ["x", "y"] {
                    if let Value::Integer(v) = record.get_mut(field)? {
                        *v *= by;
                    }
                }
                Ok(Value::from(record.clone()))
            });
            ext.alias_method("hi", "greeting")?;
            Ok(())
        })
        .unwrap();

    let mut v = point.new_record(vals([2, 3])).unwrap();
    assert!(v.responds_to("greeting"));
    assert_eq!(v.send("greeting", &[]), Ok(Value::from("Hello 2!")));
    assert_eq!(v.send("hi", &[]), Ok(Value::from("Hello 2!")));
    v.send("scale", &[Value::from(10)]).unwrap();
    assert_eq!(v.to_a(), vals([20, 30]));
    assert_eq!(
        v.send("scale", &[]),
        Err(Condition::wrong_num_of_args(1, 0))
    );
}

#[test]
fn extension_can_override_equality() {
    let factory = Factory::new();
    let loose = factory
        .define_with(None, ["id", "note"], |ext| {
            ext.define_method("==", |record, args| {
                let id = record.get("id")?;
                Ok(Value::Boolean(matches!(
                    args,
                    [Value::Record(other)] if other.get("id").ok() == Some(id)
                )))
            });
            Ok(())
        })
        .unwrap();

    let mut a = loose.new_record(vals([1, 2])).unwrap();
    let b = loose.new_record(vals([1, 3])).unwrap();
    assert_eq!(a.send("==", &[Value::from(b.clone())]), Ok(Value::Boolean(true)));
    // `eql?` still compares structurally.
    assert_eq!(a.send("eql?", &[Value::from(b)]), Ok(Value::Boolean(false)));
}

#[test]
fn failing_extension_aborts_creation() {
    let factory = Factory::new();
    let result = factory.define_with(Some("Broken"), ["a"], |ext| {
        ext.alias_method("b", "no_such_method")?;
        Ok(())
    });
    assert_eq!(
        result.map(|_| ()),
        Err(Condition::undefined_method(sym("no_such_method"), "Broken"))
    );
    assert!(!factory.namespace().contains("Broken"));
}

#[test]
fn dig_goes_through_overridden_index() {
    let factory = Factory::new();
    let shadowed = factory
        .define_with(None, ["a", "b"], |ext| {
            ext.define_method("[]", |_, _| Ok(Value::from(99)));
            Ok(())
        })
        .unwrap();
    let plain = factory.define(None, ["inner"]).unwrap();

    let mut s = shadowed.new_record(vals([1, 2])).unwrap();
    assert_eq!(s.send("[]", &[Value::from(0)]), Ok(Value::from(99)));
    assert_eq!(s.send("dig", &[Value::from(0)]), Ok(Value::from(99)));

    // Nested records dispatch through their own `[]` too.
    let mut outer = plain.new_record(vec![Value::from(s.clone())]).unwrap();
    assert_eq!(
        outer.send("dig", &[Value::from("inner"), Value::from("b")]),
        Ok(Value::from(99))
    );
    // The typed accessor reads the stored value.
    assert_eq!(s.get("b"), Ok(&Value::from(2)));
}
