//! Front-end rejection and resolution checks driven through the public
//! `protonic-build` API.

use protonic_build::linker::{self, LinkErrorKind};
use protonic_build::parser;

fn link(sources: &[(&str, &str)]) -> Result<protonic_build::ir::Schema, linker::LinkError> {
    let files: Vec<_> = sources
        .iter()
        .map(|(name, src)| parser::parse(name, src).expect("parse failed"))
        .collect();
    linker::link(&files)
}

#[test]
fn duplicate_tags_are_rejected() {
    let error = link(&[(
        "dup.proto",
        r#"
        syntax = "proto3";
        message M {
            int32 a = 1;
            int32 b = 1;
        }
        "#,
    )])
    .unwrap_err();
    assert!(matches!(
        error.kind,
        LinkErrorKind::DuplicateTag { tag: 1, .. }
    ));
}

#[test]
fn proto3_enum_zero_rule_is_enforced() {
    let error = link(&[(
        "enum.proto",
        r#"
        syntax = "proto3";
        enum Bad { FIRST = 5; }
        "#,
    )])
    .unwrap_err();
    assert!(matches!(
        error.kind,
        LinkErrorKind::Proto3EnumFirstValueNotZero { .. }
    ));
}

#[test]
fn shadowed_names_resolve_to_the_innermost_scope() {
    let schema = link(&[(
        "shadow.proto",
        r#"
        syntax = "proto3";
        package a.b;

        message Thing { int32 outer = 1; }

        message Holder {
            message Thing { int32 inner = 1; }
            Thing near = 1;
            a.b.Thing far = 2;
        }
        "#,
    )])
    .unwrap();

    let holder = &schema.files[0].messages[1];
    assert_eq!(
        holder.fields[0].typ,
        protonic_build::ir::FieldType::Message(".a.b.Holder.Thing".into()),
    );
    assert_eq!(
        holder.fields[1].typ,
        protonic_build::ir::FieldType::Message(".a.b.Thing".into()),
    );
}

#[test]
fn parse_errors_abort_the_file() {
    let error = parser::parse("broken.proto", "message {").unwrap_err();
    assert!(matches!(
        error.kind,
        parser::ParseErrorKind::Unexpected { .. }
    ));
}
