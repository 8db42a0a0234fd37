//! Exercises the generated bindings as ordinary Rust types.

use jsonbind::Bindings;
use jsonbind::chrono::NaiveDate;
use jsonbind_conformance::holder::{A, B, Color, Holder, Size, Thing, When};
use jsonbind_conformance::person::Person;

fn born() -> NaiveDate {
    NaiveDate::from_ymd_opt(1943, 5, 31).unwrap()
}

#[test]
fn test_person_builder_and_accessors() {
    let person = Person::builder("Joe Namath".to_string())
        .with_born(born())
        .build();

    assert_eq!(person.name().unwrap(), "Joe Namath");
    assert_eq!(person.born().unwrap(), Some(born()));
    assert_eq!(
        person.to_canonical_text(),
        r#"{"Name":"Joe Namath","born":"1943-05-31"}"#
    );
    assert_eq!(Person::REQUIRED, &["Name"]);
}

#[test]
fn test_person_aliases_and_copies() {
    let person = Person::create("Joe Namath".to_string());
    let mut alias = Person::from_bindings(person.bindings().clone());
    let mut copy = person.copy();

    alias.set_born(Some(born()));
    assert_eq!(person.born().unwrap(), Some(born()));

    copy.set_name("Broadway Joe".to_string());
    assert_eq!(person.name().unwrap(), "Joe Namath");
    assert_eq!(copy.born().unwrap(), None);

    alias.set_born(None);
    assert!(!person.bindings().contains_key("born"));
}

#[test]
fn test_union_properties_follow_last_setter() {
    let mut holder = Holder::create(Size::Integer(3));
    assert_eq!(holder.size().unwrap(), Size::Integer(3));

    holder.set_size_as_number(3.0);
    assert_eq!(holder.size_as_integer().unwrap(), None);
    assert_eq!(holder.size_as_number().unwrap(), Some(3.0));
    assert_eq!(holder.size().unwrap(), Size::Number(3.0));

    holder.set_thing_as_b(B::new());
    assert!(holder.thing_as_a().unwrap().is_none());
    assert!(holder.thing_as_b().unwrap().is_some());
    assert_eq!(holder.thing().unwrap().map(|thing| thing.alternative()), Some(1));

    holder.set_thing(Some(Thing::A(A::new())));
    assert!(holder.thing_as_a().unwrap().is_some());
    assert!(holder.thing_as_b().unwrap().is_none());

    holder.set_when_as_string("1999-05-22".to_string());
    assert_eq!(holder.when_as_string().unwrap().as_deref(), Some("1999-05-22"));
    assert_eq!(holder.when_as_day().unwrap(), None);
}

#[test]
fn test_untagged_values_are_discriminated() {
    let mut holder = Holder::create(Size::Integer(1));
    holder.set_when_as_string("1999-05-22".to_string());

    let reloaded = Holder::from_bindings(Bindings::from_json(&holder.to_canonical_text()).unwrap());
    assert_eq!(
        reloaded.when_as_day().unwrap(),
        NaiveDate::from_ymd_opt(1999, 5, 22)
    );
    assert!(reloaded.when_as_string().unwrap().is_none());
}

#[test]
fn test_holder_builder_and_enum() {
    let day = NaiveDate::from_ymd_opt(1969, 1, 12).unwrap();
    let mut holder = Holder::builder(Size::Integer(1))
        .with_when(When::Day(day))
        .with_color(Color::ALL[1])
        .build();

    assert_eq!(holder.when().unwrap(), Some(When::Day(day)));
    assert_eq!(holder.when_as_day().unwrap(), Some(day));
    assert_eq!(holder.color().unwrap(), Some(Color::ALL[1]));
    assert_eq!(Color::ALL[1].literal(), "\"green\"");

    holder.set_color(None);
    assert_eq!(holder.color().unwrap(), None);
}
