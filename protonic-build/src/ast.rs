//! The parser's output model for a single `.proto` file.
//!
//! Nodes carry the source span of their declaration so later stages can
//! report diagnostics with line and column context. The model is consumed
//! by the linker and discarded once the linked schema is built.

use crate::lexer::Span;

/// The syntax level declared by a file. Files without a `syntax` statement
/// default to proto2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Syntax {
    #[default]
    Proto2,
    Proto3,
}

/// Visibility of an import statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportKind {
    #[default]
    Default,
    /// `import public`: re-exported to files importing this one.
    Public,
    /// `import weak`: accepted and treated as a normal import.
    Weak,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub path: String,
    pub kind: ImportKind,
    pub span: Span,
}

/// A field label. Fields without a label (proto3) carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

/// A constant as used in option values and field defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Ident(String),
    Str(String),
    /// A braced aggregate (`{...}`), carried as raw text. Only custom
    /// options use these; the linker passes them through untouched.
    Aggregate(String),
}

impl Constant {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Constant::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Constant::Str(value) => Some(value),
            _ => None,
        }
    }
}

/// One `name = value` option, either from an `option` statement or from a
/// `[...]` field option list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoOption {
    pub name: String,
    pub value: Constant,
}

/// Finds an option by name in a parsed option list.
pub fn find_option<'a>(options: &'a [ProtoOption], name: &str) -> Option<&'a Constant> {
    options
        .iter()
        .find(|option| option.name == name)
        .map(|option| &option.value)
}

/// The declared type of a field, before name resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
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
    /// A message or enum name, possibly dotted; a leading `.` forces
    /// absolute resolution.
    Named(String),
    /// `map<K, V>`; the key is restricted by the linker.
    Map(Box<(FieldType, FieldType)>),
    /// A proto2 `group` with its inline body. Parse-only.
    Group { name: String, fields: Vec<Field> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub label: Option<Label>,
    pub typ: FieldType,
    pub tag: u32,
    pub options: Vec<ProtoOption>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    pub name: String,
    pub fields: Vec<Field>,
    pub span: Span,
}

/// A message body item, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOrOneOf {
    Field(Field),
    OneOf(OneOf),
}

/// An inclusive range of reserved tags. `max` parses to the highest legal
/// tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Message {
    pub name: String,
    pub fields: Vec<FieldOrOneOf>,
    pub reserved_ranges: Vec<TagRange>,
    pub reserved_names: Vec<String>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enumeration>,
    pub options: Vec<ProtoOption>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub options: Vec<ProtoOption>,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub reserved_ranges: Vec<TagRange>,
    pub reserved_names: Vec<String>,
    pub options: Vec<ProtoOption>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub options: Vec<ProtoOption>,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,
    pub options: Vec<ProtoOption>,
    pub span: Span,
}

/// A proto2 `extend` block. Parsed for grammar coverage and dropped by the
/// linker; extensions are out of scope.
#[derive(Debug, Clone)]
pub struct Extend {
    pub extendee: String,
    pub fields: Vec<Field>,
    pub span: Span,
}

/// A whole parsed `.proto` file.
#[derive(Debug, Clone, Default)]
pub struct File {
    /// The import-path name of the file, e.g. `google/rpc/status.proto`.
    pub name: String,
    pub syntax: Syntax,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enumeration>,
    pub services: Vec<Service>,
    pub extends: Vec<Extend>,
    pub options: Vec<ProtoOption>,
}

impl Message {
    /// All plain fields and oneof member fields, in declaration order.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().flat_map(|item| match item {
            FieldOrOneOf::Field(field) => std::slice::from_ref(field).iter(),
            FieldOrOneOf::OneOf(oneof) => oneof.fields.iter(),
        })
    }
}
