//! The linked schema: the canonical, fully resolved model the code
//! generator consumes.
//!
//! Every type reference is a fully qualified name with a leading dot
//! (`.package.Outer.Inner`), map fields are desugared into synthetic entry
//! messages, and effective packedness has been computed per field. The
//! linker produces this model; the AST is discarded once it exists.

pub use crate::ast::{Constant, Label, Syntax};

/// A builtin scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl Scalar {
    /// Whether a repeated field of this kind may use the packed encoding.
    pub fn can_pack(&self) -> bool {
        !matches!(self, Scalar::String | Scalar::Bytes)
    }

    /// Whether the kind is a legal map key.
    pub fn valid_map_key(&self) -> bool {
        !matches!(
            self,
            Scalar::Double | Scalar::Float | Scalar::Bytes
        )
    }

    /// The name of the runtime encoding module for this kind.
    pub fn encoding_module(&self) -> &'static str {
        match self {
            Scalar::Double => "double",
            Scalar::Float => "float",
            Scalar::Int32 => "int32",
            Scalar::Int64 => "int64",
            Scalar::Uint32 => "uint32",
            Scalar::Uint64 => "uint64",
            Scalar::Sint32 => "sint32",
            Scalar::Sint64 => "sint64",
            Scalar::Fixed32 => "fixed32",
            Scalar::Fixed64 => "fixed64",
            Scalar::Sfixed32 => "sfixed32",
            Scalar::Sfixed64 => "sfixed64",
            Scalar::Bool => "bool",
            Scalar::String => "string",
            Scalar::Bytes => "bytes",
        }
    }
}

/// The resolved type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Scalar(Scalar),
    /// An enum, by fully qualified name.
    Enum(String),
    /// A message, by fully qualified name.
    Message(String),
    /// A map; the value is a scalar, enum, or message type.
    Map(Scalar, Box<FieldType>),
    /// A proto2 group, by the fully qualified name of its synthesized body
    /// message. Parse-only; the code generator refuses it.
    Group(String),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub tag: u32,
    /// `Optional` covers proto3 implicit fields as well; see
    /// `proto3_optional` for explicit proto3 presence.
    pub label: Label,
    /// Whether the field was declared with the proto3 `optional` keyword.
    pub proto3_optional: bool,
    pub typ: FieldType,
    /// Effective packedness: declared option, or the syntax default.
    pub packed: bool,
    /// The `default = ...` option, when declared (proto2).
    pub default: Option<Constant>,
    pub deprecated: bool,
    /// Index into the parent message's `oneofs`, for oneof members.
    pub oneof_index: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Oneof {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    /// Fully qualified name, `.package.Outer.Inner`.
    pub fqn: String,
    pub syntax: Syntax,
    /// All fields in declaration order, oneof members included.
    pub fields: Vec<Field>,
    pub oneofs: Vec<Oneof>,
    pub nested_messages: Vec<Message>,
    pub nested_enums: Vec<Enum>,
    /// Synthetic entry message desugared from a `map` field.
    pub is_map_entry: bool,
}

impl Message {
    /// Tags of proto2 `required` fields, in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|field| field.label == Label::Required)
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    pub fqn: String,
    pub values: Vec<EnumValue>,
    pub allow_alias: bool,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    /// Fully qualified input message name.
    pub input_type: String,
    /// Fully qualified output message name.
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub fqn: String,
    pub methods: Vec<Method>,
}

/// One linked source file.
#[derive(Debug, Clone)]
pub struct File {
    /// The import-path name of the source file.
    pub name: String,
    /// The dotted package, possibly empty.
    pub package: String,
    pub syntax: Syntax,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
    pub services: Vec<Service>,
}

/// The whole linked schema for one generation run.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub files: Vec<File>,
}

impl Schema {
    /// Walks every message in the schema, nested ones included.
    pub fn for_each_message(&self, mut visit: impl FnMut(&Message)) {
        fn walk(message: &Message, visit: &mut impl FnMut(&Message)) {
            visit(message);
            for nested in &message.nested_messages {
                walk(nested, visit);
            }
        }
        for file in &self.files {
            for message in &file.messages {
                walk(message, &mut visit);
            }
        }
    }
}
