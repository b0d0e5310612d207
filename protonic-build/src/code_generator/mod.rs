//! Translation of a linked schema into Rust source text.
//!
//! One `CodeGenerator` instance runs per input file, appending to the
//! buffer of the file's package module. Message structs are emitted with
//! explicit `Message` impls wired to the runtime encoding modules; enums,
//! oneofs, and services each get their own emission pass.

use std::iter;

use itertools::Itertools;
use log::debug;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::collections::MapType;
use crate::ident::{to_snake, to_upper_camel};
use crate::ir::{self, FieldType, Label, Scalar, Syntax};
use crate::message_graph::MessageGraph;
use crate::Config;

mod enums;
mod messages;
mod services;

pub struct CodeGenerator<'a> {
    config: &'a Config,
    package: String,
    type_path: Vec<String>,
    syntax: Syntax,
    message_graph: &'a MessageGraph,
    buf: &'a mut String,
}

impl<'a> CodeGenerator<'a> {
    pub fn generate(
        config: &'a Config,
        message_graph: &'a MessageGraph,
        file: &ir::File,
        buf: &'a mut String,
    ) {
        let mut code_gen = CodeGenerator {
            config,
            package: file.package.clone(),
            type_path: Vec::new(),
            syntax: file.syntax,
            message_graph,
            buf,
        };

        debug!("file: {:?}, package: {:?}", file.name, code_gen.package);

        code_gen.push_messages(&file.messages);
        code_gen.push_enums(&file.enums);
        code_gen.push_services(&file.services);
    }

    /// Whether the field is represented as an `Option` in the generated
    /// struct.
    fn optional(&self, field: &ir::Field) -> bool {
        if field.proto3_optional {
            return true;
        }
        if field.label != Label::Optional {
            return false;
        }
        match field.typ {
            FieldType::Message(_) | FieldType::Group(_) => true,
            _ => self.syntax == Syntax::Proto2,
        }
    }

    /// Whether a singular message field must be boxed to keep the
    /// containing type finitely sized.
    fn should_box_field(&self, field: &ir::Field, fq_message_name: &str) -> bool {
        if field.label == Label::Repeated {
            return false;
        }
        match &field.typ {
            FieldType::Message(fqn) | FieldType::Group(fqn) => {
                self.message_graph.is_nested(fqn, fq_message_name)
            }
            _ => false,
        }
    }

    /// The Rust type backing a field value (without `Option`, `Vec`, or
    /// map wrappers).
    fn resolve_type(&self, typ: &FieldType, fq_message_name: &str, field_name: &str) -> String {
        match typ {
            FieldType::Scalar(scalar) => self
                .scalar_rust_type(*scalar, fq_message_name, field_name)
                .to_owned(),
            FieldType::Enum(fqn) => {
                format!("::protonic::OpenEnum<{}>", self.resolve_ident(fqn))
            }
            FieldType::Message(fqn) | FieldType::Group(fqn) => self.resolve_ident(fqn),
            FieldType::Map(..) => panic!("map fields are typed at their use sites"),
        }
    }

    fn scalar_rust_type(
        &self,
        scalar: Scalar,
        fq_message_name: &str,
        field_name: &str,
    ) -> &'static str {
        match scalar {
            Scalar::Double => "f64",
            Scalar::Float => "f32",
            Scalar::Int32 | Scalar::Sint32 | Scalar::Sfixed32 => "i32",
            Scalar::Int64 | Scalar::Sint64 | Scalar::Sfixed64 => "i64",
            Scalar::Uint32 | Scalar::Fixed32 => "u32",
            Scalar::Uint64 | Scalar::Fixed64 => "u64",
            Scalar::Bool => "bool",
            Scalar::String => "::std::string::String",
            Scalar::Bytes => self.config.bytes_type(fq_message_name, field_name).rust_type(),
        }
    }

    /// The path of the runtime encoding module driving a field type.
    fn encoding_mod(&self, typ: &FieldType) -> TokenStream {
        let module = match typ {
            FieldType::Scalar(scalar) => scalar.encoding_module(),
            FieldType::Enum(_) => "open_enum",
            FieldType::Message(_) => "message",
            FieldType::Group(_) => "group",
            FieldType::Map(..) => panic!("map fields dispatch through their map module"),
        };
        let module = format_ident!("{}", module);
        quote!(::protonic::encoding::#module)
    }

    fn map_type(&self, fq_message_name: &str, field_name: &str) -> MapType {
        self.config.map_type(fq_message_name, field_name)
    }

    /// Resolves a fully qualified proto name into a Rust path relative to
    /// the module currently being generated. Shared package components
    /// collapse; each unshared local component becomes a `super`.
    fn resolve_ident(&self, fqn: &str) -> String {
        debug_assert_eq!(b'.', fqn.as_bytes()[0]);

        let mut local_path = self
            .package
            .split('.')
            .chain(self.type_path.iter().map(String::as_str))
            .peekable();

        // An empty package splits into one empty component; drop it so it
        // does not break the comparison below.
        if local_path.peek().map_or(false, |s| s.is_empty()) {
            local_path.next();
        }

        let mut ident_path = fqn[1..].split('.');
        let ident_type = ident_path.next_back().unwrap();
        let mut ident_path = ident_path.peekable();

        // Skip path elements in common.
        while local_path.peek().is_some() && local_path.peek() == ident_path.peek() {
            local_path.next();
            ident_path.next();
        }

        local_path
            .map(|_| "super".to_string())
            .chain(ident_path.map(to_snake))
            .chain(iter::once(to_upper_camel(ident_type)))
            .join("::")
    }

    fn syn_type(type_string: &str) -> syn::Type {
        syn::parse_str(type_string).expect("unable to parse generated type path")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linker;
    use crate::parser;

    fn generate_source(sources: &[(&str, &str)]) -> String {
        let files: Vec<_> = sources
            .iter()
            .map(|(name, src)| parser::parse(name, src).unwrap())
            .collect();
        let schema = linker::link(&files).unwrap();
        let message_graph = MessageGraph::new(&schema);
        let config = Config::new();

        let mut buf = String::new();
        for file in &schema.files {
            CodeGenerator::generate(&config, &message_graph, file, &mut buf);
        }
        buf
    }

    fn generate_one(src: &str) -> String {
        generate_source(&[("test.proto", src)])
    }

    #[test]
    fn scalar_message_shape() {
        let code = generate_one(
            r#"
            syntax = "proto3";
            package demo;
            message Shirt {
                string color = 1;
                int32 size = 2;
            }
            "#,
        );
        assert!(code.contains("pub struct Shirt"));
        assert!(code.contains("pub color : :: std :: string :: String"));
        assert!(code.contains("pub size : i32"));
        assert!(code.contains("unknown_fields : :: protonic :: UnknownFieldSet"));
        assert!(code.contains("impl :: protonic :: Message for Shirt"));
    }

    #[test]
    fn proto2_optionals_are_options() {
        let code = generate_one(
            r#"
            message M { optional int32 a = 1; required int32 b = 2; }
            "#,
        );
        assert!(code.contains("pub a : :: core :: option :: Option < i32 >"));
        assert!(code.contains("pub b : i32"));
        // Required fields make the message track wire presence.
        assert!(code.contains("fn merge_raw"));
    }

    #[test]
    fn recursive_messages_are_boxed() {
        let code = generate_one(
            r#"
            syntax = "proto3";
            message Node { Node next = 1; }
            "#,
        );
        assert!(code.contains("Option < :: std :: boxed :: Box < Node > >"));
    }

    #[test]
    fn enums_generate_open_enum_fields() {
        let code = generate_one(
            r#"
            syntax = "proto3";
            message M {
                Kind kind = 1;
            }
            enum Kind { KIND_UNSPECIFIED = 0; KIND_A = 1; }
            "#,
        );
        assert!(code.contains("pub kind : :: protonic :: OpenEnum < Kind >"));
        assert!(code.contains("pub enum Kind"));
        assert!(code.contains("Unspecified = 0"));
        assert!(code.contains("impl :: core :: convert :: TryFrom < i32 > for Kind"));
    }

    #[test]
    fn oneofs_generate_nested_enums() {
        let code = generate_one(
            r#"
            syntax = "proto3";
            message O {
                oneof which {
                    int32 i = 1;
                    string s = 2;
                }
            }
            "#,
        );
        assert!(code.contains("pub which : :: core :: option :: Option < o :: Which >"));
        assert!(code.contains("pub mod o"));
        assert!(code.contains("pub enum Which"));
    }

    #[test]
    fn services_generate_descriptor_trait_and_client() {
        let code = generate_one(
            r#"
            syntax = "proto3";
            package demo;
            message HelloRequest { string name = 1; }
            message HelloReply { string message = 1; }
            service Greeter {
                rpc SayHello (HelloRequest) returns (HelloReply);
                rpc BidiHello (stream HelloRequest) returns (stream HelloReply);
            }
            "#,
        );
        assert!(code.contains("pub mod greeter"));
        assert!(code.contains("\"/demo.Greeter/SayHello\""));
        assert!(code.contains("pub trait Greeter"));
        assert!(code.contains("pub struct GreeterClient"));
        assert!(code.contains("bidi_streaming"));
    }

    #[test]
    fn cross_package_references_use_super_paths() {
        let code = generate_source(&[
            (
                "other.proto",
                "syntax = \"proto3\"; package other; message Payload { }",
            ),
            (
                "main.proto",
                "syntax = \"proto3\"; package demo; import \"other.proto\"; \
                 message Holder { other.Payload payload = 1; }",
            ),
        ]);
        assert!(code.contains("super :: other :: Payload"));
    }
}
