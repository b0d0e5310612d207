//! Name resolution and validation over the parsed file set.
//!
//! Linking runs in two passes. The declare pass walks every file and
//! builds a symbol table of fully qualified names rooted at the empty
//! package. The resolve pass then resolves every field type and RPC
//! signature with the C++-style scoping rule (innermost scope outward, a
//! leading dot forcing absolute lookup), validates tag, name, enum, and
//! map rules, desugars `map` fields into synthetic entry messages, and
//! computes effective packedness. The output is the [`ir::Schema`] handed
//! to the code generator.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use log::debug;

use crate::ast::{self, FieldOrOneOf, ImportKind, Label, Syntax};
use crate::ident::to_upper_camel;
use crate::ir;
use crate::lexer::Span;
use crate::{MAX_TAG, MIN_TAG, RESERVED_TAG_END, RESERVED_TAG_START};

#[derive(Debug, Clone, PartialEq)]
pub enum LinkErrorKind {
    UnresolvedType { name: String, referrer: String },
    DuplicateName { name: String },
    DuplicateTag { message: String, tag: u32 },
    TagOutOfRange { message: String, tag: u32 },
    TagReserved { message: String, tag: u32 },
    ReservedName { message: String, name: String },
    BadMapKey { message: String, field: String },
    Proto3EnumFirstValueNotZero { name: String },
    DuplicateEnumNumber { name: String, number: i32 },
    EmptyEnum { name: String },
    RequiredInProto3 { message: String, field: String },
    GroupInProto3 { message: String, field: String },
    ImportNotFound { path: String },
    NotAMessage { name: String },
}

impl fmt::Display for LinkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinkErrorKind::UnresolvedType { name, referrer } => write!(
                f,
                "\"{}\" is not defined (referenced from \"{}\")",
                name, referrer
            ),
            LinkErrorKind::DuplicateName { name } => {
                write!(f, "\"{}\" is already defined", name)
            }
            LinkErrorKind::DuplicateTag { message, tag } => write!(
                f,
                "field number {} has already been used in \"{}\"",
                tag, message
            ),
            LinkErrorKind::TagOutOfRange { message, tag } => {
                write!(f, "field number {} is out of range in \"{}\"", tag, message)
            }
            LinkErrorKind::TagReserved { message, tag } => {
                write!(f, "field number {} is reserved in \"{}\"", tag, message)
            }
            LinkErrorKind::ReservedName { message, name } => {
                write!(f, "field name \"{}\" is reserved in \"{}\"", name, message)
            }
            LinkErrorKind::BadMapKey { message, field } => write!(
                f,
                "invalid map key type for field \"{}\" in \"{}\"",
                field, message
            ),
            LinkErrorKind::Proto3EnumFirstValueNotZero { name } => {
                write!(f, "the first value of proto3 enum \"{}\" must be zero", name)
            }
            LinkErrorKind::DuplicateEnumNumber { name, number } => write!(
                f,
                "enum value number {} has already been used in \"{}\"",
                number, name
            ),
            LinkErrorKind::EmptyEnum { name } => {
                write!(f, "enum \"{}\" must define at least one value", name)
            }
            LinkErrorKind::RequiredInProto3 { message, field } => write!(
                f,
                "required fields are not allowed in proto3 (\"{}.{}\")",
                message, field
            ),
            LinkErrorKind::GroupInProto3 { message, field } => write!(
                f,
                "groups are not allowed in proto3 (\"{}.{}\")",
                message, field
            ),
            LinkErrorKind::ImportNotFound { path } => {
                write!(f, "import \"{}\" was not found", path)
            }
            LinkErrorKind::NotAMessage { name } => {
                write!(f, "\"{}\" is not a message type", name)
            }
        }
    }
}

/// A linking error, with the file (and span, when one is available) it was
/// detected at.
#[derive(Debug, Clone)]
pub struct LinkError {
    pub kind: LinkErrorKind,
    pub file: String,
    pub span: Option<Span>,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.kind)
    }
}

impl std::error::Error for LinkError {}

/// Links a set of parsed files into a schema.
///
/// The file set must be closed under imports: the driver parses imported
/// files before linking.
pub fn link(files: &[ast::File]) -> Result<ir::Schema, LinkError> {
    let mut linker = Linker {
        files,
        by_name: files
            .iter()
            .enumerate()
            .map(|(idx, file)| (file.name.as_str(), idx))
            .collect(),
        symbols: BTreeMap::new(),
        visible: Vec::new(),
    };
    linker.declare()?;
    linker.resolve()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DefKind {
    Package,
    Message,
    Enum,
    Service,
}

#[derive(Clone, Copy, Debug)]
struct Definition {
    kind: DefKind,
    file: usize,
}

/// Mutable per-message validation state threaded through field linking.
#[derive(Default)]
struct FieldChecks {
    seen_tags: HashSet<u32>,
    seen_names: HashSet<String>,
    nested_type_names: HashSet<String>,
}

struct Linker<'a> {
    files: &'a [ast::File],
    by_name: HashMap<&'a str, usize>,
    /// Fully qualified name (leading dot) to definition.
    symbols: BTreeMap<String, Definition>,
    /// Per file: the set of files whose names it may reference.
    visible: Vec<HashSet<usize>>,
}

impl<'a> Linker<'a> {
    // Pass A: declare every name and compute import visibility.

    fn declare(&mut self) -> Result<(), LinkError> {
        for (idx, file) in self.files.iter().enumerate() {
            debug!("declaring file: {:?} package: {:?}", file.name, file.package);
            let scope = self.declare_package(idx)?;
            for message in &file.messages {
                self.declare_message(idx, &scope, message)?;
            }
            for enumeration in &file.enums {
                let fqn = format!("{}.{}", scope, enumeration.name);
                self.declare_name(idx, fqn, DefKind::Enum, Some(enumeration.span))?;
            }
            for service in &file.services {
                let fqn = format!("{}.{}", scope, service.name);
                self.declare_name(idx, fqn, DefKind::Service, Some(service.span))?;
            }
        }

        for idx in 0..self.files.len() {
            let visible = self.visible_files(idx)?;
            self.visible.push(visible);
        }
        Ok(())
    }

    fn declare_package(&mut self, idx: usize) -> Result<String, LinkError> {
        let mut scope = String::new();
        if let Some(package) = &self.files[idx].package.clone() {
            for component in package.split('.') {
                scope.push('.');
                scope.push_str(component);
                self.declare_name(idx, scope.clone(), DefKind::Package, None)?;
            }
        }
        Ok(scope)
    }

    fn declare_message(
        &mut self,
        idx: usize,
        scope: &str,
        message: &ast::Message,
    ) -> Result<(), LinkError> {
        let fqn = format!("{}.{}", scope, message.name);
        self.declare_name(idx, fqn.clone(), DefKind::Message, Some(message.span))?;

        for nested in &message.messages {
            self.declare_message(idx, &fqn, nested)?;
        }
        for enumeration in &message.enums {
            let enum_fqn = format!("{}.{}", fqn, enumeration.name);
            self.declare_name(idx, enum_fqn, DefKind::Enum, Some(enumeration.span))?;
        }
        // A group declares a message named after itself in the enclosing
        // scope.
        for field in message.all_fields() {
            if let ast::FieldType::Group { name, fields } = &field.typ {
                let body = ast::Message {
                    name: name.clone(),
                    fields: fields.iter().cloned().map(FieldOrOneOf::Field).collect(),
                    span: field.span,
                    ..ast::Message::default()
                };
                self.declare_message(idx, &fqn, &body)?;
            }
        }
        Ok(())
    }

    fn declare_name(
        &mut self,
        idx: usize,
        fqn: String,
        kind: DefKind,
        span: Option<Span>,
    ) -> Result<(), LinkError> {
        match self.symbols.entry(fqn) {
            Entry::Vacant(entry) => {
                entry.insert(Definition { kind, file: idx });
                Ok(())
            }
            Entry::Occupied(entry) => {
                // Multiple files may contribute to one package.
                if kind == DefKind::Package && entry.get().kind == DefKind::Package {
                    return Ok(());
                }
                let name = display_name(entry.key());
                Err(self.error_in(idx, LinkErrorKind::DuplicateName { name }, span))
            }
        }
    }

    fn visible_files(&self, idx: usize) -> Result<HashSet<usize>, LinkError> {
        let mut visible = HashSet::from([idx]);
        for import in &self.files[idx].imports {
            let imported = *self.by_name.get(import.path.as_str()).ok_or_else(|| {
                self.error_in(
                    idx,
                    LinkErrorKind::ImportNotFound {
                        path: import.path.clone(),
                    },
                    Some(import.span),
                )
            })?;

            // The import itself, plus the transitive closure of its public
            // imports. The visited check keeps import cycles finite.
            let mut queue = vec![imported];
            while let Some(current) = queue.pop() {
                if !visible.insert(current) && current != imported {
                    continue;
                }
                for public in &self.files[current].imports {
                    if public.kind != ImportKind::Public {
                        continue;
                    }
                    if let Some(&target) = self.by_name.get(public.path.as_str()) {
                        if !visible.contains(&target) {
                            queue.push(target);
                        }
                    }
                }
            }
        }
        Ok(visible)
    }

    // Pass B: resolve references and validate.

    fn resolve(&self) -> Result<ir::Schema, LinkError> {
        let mut schema = ir::Schema::default();
        for (idx, file) in self.files.iter().enumerate() {
            let package = file.package.clone().unwrap_or_default();
            let scope = if package.is_empty() {
                String::new()
            } else {
                format!(".{}", package)
            };

            let mut linked = ir::File {
                name: file.name.clone(),
                package,
                syntax: file.syntax,
                messages: Vec::new(),
                enums: Vec::new(),
                services: Vec::new(),
            };
            for message in &file.messages {
                linked
                    .messages
                    .push(self.link_message(idx, &scope, message, file.syntax)?);
            }
            for enumeration in &file.enums {
                linked
                    .enums
                    .push(self.link_enum(idx, &scope, enumeration, file.syntax)?);
            }
            for service in &file.services {
                linked.services.push(self.link_service(idx, &scope, service)?);
            }
            schema.files.push(linked);
        }
        Ok(schema)
    }

    fn link_message(
        &self,
        idx: usize,
        scope: &str,
        message: &ast::Message,
        syntax: Syntax,
    ) -> Result<ir::Message, LinkError> {
        let fqn = format!("{}.{}", scope, message.name);
        debug!("  linking message: {}", fqn);

        let mut linked = ir::Message {
            name: message.name.clone(),
            fqn: fqn.clone(),
            syntax,
            fields: Vec::new(),
            oneofs: Vec::new(),
            nested_messages: Vec::new(),
            nested_enums: Vec::new(),
            is_map_entry: false,
        };

        let mut checks = FieldChecks {
            nested_type_names: message
                .messages
                .iter()
                .map(|nested| nested.name.clone())
                .chain(message.enums.iter().map(|nested| nested.name.clone()))
                .collect(),
            ..FieldChecks::default()
        };

        for item in &message.fields {
            match item {
                FieldOrOneOf::Field(field) => {
                    self.link_field(idx, message, syntax, field, None, &mut linked, &mut checks)?;
                }
                FieldOrOneOf::OneOf(oneof) => {
                    let oneof_index = linked.oneofs.len();
                    linked.oneofs.push(ir::Oneof {
                        name: oneof.name.clone(),
                    });
                    for field in &oneof.fields {
                        self.link_field(
                            idx,
                            message,
                            syntax,
                            field,
                            Some(oneof_index),
                            &mut linked,
                            &mut checks,
                        )?;
                    }
                }
            }
        }

        for nested in &message.messages {
            linked
                .nested_messages
                .push(self.link_message(idx, &fqn, nested, syntax)?);
        }
        for enumeration in &message.enums {
            linked
                .nested_enums
                .push(self.link_enum(idx, &fqn, enumeration, syntax)?);
        }

        Ok(linked)
    }

    #[allow(clippy::too_many_arguments)]
    fn link_field(
        &self,
        idx: usize,
        message: &ast::Message,
        syntax: Syntax,
        field: &ast::Field,
        oneof_index: Option<usize>,
        linked: &mut ir::Message,
        checks: &mut FieldChecks,
    ) -> Result<(), LinkError> {
        let fqn = linked.fqn.clone();
        self.check_tag(idx, message, &fqn, field, &mut checks.seen_tags)?;

        if !checks.seen_names.insert(field.name.clone())
            || checks.nested_type_names.contains(&field.name)
        {
            return Err(self.error_in(
                idx,
                LinkErrorKind::DuplicateName {
                    name: format!("{}.{}", display_name(&fqn), field.name),
                },
                Some(field.span),
            ));
        }
        if message
            .reserved_names
            .iter()
            .any(|reserved| reserved == &field.name)
        {
            return Err(self.error_in(
                idx,
                LinkErrorKind::ReservedName {
                    message: display_name(&fqn),
                    name: field.name.clone(),
                },
                Some(field.span),
            ));
        }

        if syntax == Syntax::Proto3 && field.label == Some(Label::Required) {
            return Err(self.error_in(
                idx,
                LinkErrorKind::RequiredInProto3 {
                    message: display_name(&fqn),
                    field: field.name.clone(),
                },
                Some(field.span),
            ));
        }

        let typ = self.link_field_type(idx, &fqn, field, syntax, linked)?;

        let label = match field.label {
            Some(Label::Required) => Label::Required,
            Some(Label::Repeated) => Label::Repeated,
            Some(Label::Optional) | None => match typ {
                // Map fields are repeated entry lists on the wire.
                ir::FieldType::Map(..) => Label::Repeated,
                _ => Label::Optional,
            },
        };
        let proto3_optional = syntax == Syntax::Proto3 && field.label == Some(Label::Optional);

        let packable = match &typ {
            ir::FieldType::Scalar(scalar) => scalar.can_pack(),
            ir::FieldType::Enum(_) => true,
            _ => false,
        };
        let packed = label == Label::Repeated
            && packable
            && ast::find_option(&field.options, "packed")
                .and_then(ast::Constant::as_bool)
                .unwrap_or(syntax == Syntax::Proto3);

        let deprecated = ast::find_option(&field.options, "deprecated")
            .and_then(ast::Constant::as_bool)
            .unwrap_or(false);
        let default = ast::find_option(&field.options, "default").cloned();

        linked.fields.push(ir::Field {
            name: field.name.clone(),
            tag: field.tag,
            label,
            proto3_optional,
            typ,
            packed,
            default,
            deprecated,
            oneof_index,
        });
        Ok(())
    }

    fn check_tag(
        &self,
        idx: usize,
        message: &ast::Message,
        fqn: &str,
        field: &ast::Field,
        seen_tags: &mut HashSet<u32>,
    ) -> Result<(), LinkError> {
        let tag = field.tag;
        if !(MIN_TAG..=MAX_TAG).contains(&tag) {
            return Err(self.error_in(
                idx,
                LinkErrorKind::TagOutOfRange {
                    message: display_name(fqn),
                    tag,
                },
                Some(field.span),
            ));
        }
        let in_wire_reserved = (RESERVED_TAG_START..=RESERVED_TAG_END).contains(&tag);
        let in_declared_reserved = message
            .reserved_ranges
            .iter()
            .any(|range| (range.start..=range.end).contains(&tag));
        if in_wire_reserved || in_declared_reserved {
            return Err(self.error_in(
                idx,
                LinkErrorKind::TagReserved {
                    message: display_name(fqn),
                    tag,
                },
                Some(field.span),
            ));
        }
        if !seen_tags.insert(tag) {
            return Err(self.error_in(
                idx,
                LinkErrorKind::DuplicateTag {
                    message: display_name(fqn),
                    tag,
                },
                Some(field.span),
            ));
        }
        Ok(())
    }

    fn link_field_type(
        &self,
        idx: usize,
        fqn: &str,
        field: &ast::Field,
        syntax: Syntax,
        linked: &mut ir::Message,
    ) -> Result<ir::FieldType, LinkError> {
        match &field.typ {
            ast::FieldType::Named(name) => {
                let (resolved, kind) = self.resolve_type(idx, fqn, name, field.span)?;
                match kind {
                    DefKind::Message => Ok(ir::FieldType::Message(resolved)),
                    DefKind::Enum => Ok(ir::FieldType::Enum(resolved)),
                    _ => Err(self.error_in(
                        idx,
                        LinkErrorKind::UnresolvedType {
                            name: name.clone(),
                            referrer: display_name(fqn),
                        },
                        Some(field.span),
                    )),
                }
            }
            ast::FieldType::Map(entry) => {
                let key = match scalar_of(&entry.0) {
                    Some(scalar) if scalar.valid_map_key() => scalar,
                    _ => {
                        return Err(self.error_in(
                            idx,
                            LinkErrorKind::BadMapKey {
                                message: display_name(fqn),
                                field: field.name.clone(),
                            },
                            Some(field.span),
                        ))
                    }
                };
                let value = match scalar_of(&entry.1) {
                    Some(scalar) => ir::FieldType::Scalar(scalar),
                    None => match &entry.1 {
                        ast::FieldType::Named(name) => {
                            let (resolved, kind) = self.resolve_type(idx, fqn, name, field.span)?;
                            match kind {
                                DefKind::Message => ir::FieldType::Message(resolved),
                                DefKind::Enum => ir::FieldType::Enum(resolved),
                                _ => {
                                    return Err(self.error_in(
                                        idx,
                                        LinkErrorKind::UnresolvedType {
                                            name: name.clone(),
                                            referrer: display_name(fqn),
                                        },
                                        Some(field.span),
                                    ))
                                }
                            }
                        }
                        _ => unreachable!("the parser rejects nested map and group values"),
                    },
                };

                // Desugar into the synthetic entry message the wire format
                // actually carries.
                let entry_name = format!("{}Entry", to_upper_camel(&field.name));
                let entry_fqn = format!("{}.{}", fqn, entry_name);
                linked.nested_messages.push(ir::Message {
                    name: entry_name,
                    fqn: entry_fqn,
                    syntax,
                    fields: vec![
                        synthetic_field("key", 1, ir::FieldType::Scalar(key)),
                        synthetic_field("value", 2, value.clone()),
                    ],
                    oneofs: Vec::new(),
                    nested_messages: Vec::new(),
                    nested_enums: Vec::new(),
                    is_map_entry: true,
                });

                Ok(ir::FieldType::Map(key, Box::new(value)))
            }
            ast::FieldType::Group { name, fields } => {
                if syntax == Syntax::Proto3 {
                    return Err(self.error_in(
                        idx,
                        LinkErrorKind::GroupInProto3 {
                            message: display_name(fqn),
                            field: field.name.clone(),
                        },
                        Some(field.span),
                    ));
                }
                let body = ast::Message {
                    name: name.clone(),
                    fields: fields.iter().cloned().map(FieldOrOneOf::Field).collect(),
                    span: field.span,
                    ..ast::Message::default()
                };
                let linked_body = self.link_message(idx, fqn, &body, syntax)?;
                let group_fqn = linked_body.fqn.clone();
                linked.nested_messages.push(linked_body);
                Ok(ir::FieldType::Group(group_fqn))
            }
            scalar => Ok(ir::FieldType::Scalar(
                scalar_of(scalar).expect("non-scalar AST field type was not handled"),
            )),
        }
    }

    fn link_enum(
        &self,
        idx: usize,
        scope: &str,
        enumeration: &ast::Enumeration,
        syntax: Syntax,
    ) -> Result<ir::Enum, LinkError> {
        let fqn = format!("{}.{}", scope, enumeration.name);
        debug!("  linking enum: {}", fqn);

        if enumeration.values.is_empty() {
            return Err(self.error_in(
                idx,
                LinkErrorKind::EmptyEnum {
                    name: display_name(&fqn),
                },
                Some(enumeration.span),
            ));
        }
        if syntax == Syntax::Proto3 && enumeration.values[0].number != 0 {
            return Err(self.error_in(
                idx,
                LinkErrorKind::Proto3EnumFirstValueNotZero {
                    name: display_name(&fqn),
                },
                Some(enumeration.values[0].span),
            ));
        }

        let allow_alias = ast::find_option(&enumeration.options, "allow_alias")
            .and_then(ast::Constant::as_bool)
            .unwrap_or(false);

        let mut seen_numbers = HashSet::new();
        let mut seen_names = HashSet::new();
        for value in &enumeration.values {
            if !seen_names.insert(value.name.as_str()) {
                return Err(self.error_in(
                    idx,
                    LinkErrorKind::DuplicateName {
                        name: format!("{}.{}", display_name(&fqn), value.name),
                    },
                    Some(value.span),
                ));
            }
            if enumeration
                .reserved_names
                .iter()
                .any(|reserved| reserved == &value.name)
            {
                return Err(self.error_in(
                    idx,
                    LinkErrorKind::ReservedName {
                        message: display_name(&fqn),
                        name: value.name.clone(),
                    },
                    Some(value.span),
                ));
            }
            if !seen_numbers.insert(value.number) && !allow_alias {
                return Err(self.error_in(
                    idx,
                    LinkErrorKind::DuplicateEnumNumber {
                        name: display_name(&fqn),
                        number: value.number,
                    },
                    Some(value.span),
                ));
            }
        }

        Ok(ir::Enum {
            name: enumeration.name.clone(),
            fqn,
            values: enumeration
                .values
                .iter()
                .map(|value| ir::EnumValue {
                    name: value.name.clone(),
                    number: value.number,
                })
                .collect(),
            allow_alias,
        })
    }

    fn link_service(
        &self,
        idx: usize,
        scope: &str,
        service: &ast::Service,
    ) -> Result<ir::Service, LinkError> {
        let fqn = format!("{}.{}", scope, service.name);
        debug!("  linking service: {}", fqn);

        let mut methods = Vec::with_capacity(service.methods.len());
        for method in &service.methods {
            let input_type =
                self.resolve_message_type(idx, &fqn, &method.input_type, method.span)?;
            let output_type =
                self.resolve_message_type(idx, &fqn, &method.output_type, method.span)?;
            methods.push(ir::Method {
                name: method.name.clone(),
                input_type,
                output_type,
                client_streaming: method.client_streaming,
                server_streaming: method.server_streaming,
            });
        }

        Ok(ir::Service {
            name: service.name.clone(),
            fqn,
            methods,
        })
    }

    fn resolve_message_type(
        &self,
        idx: usize,
        referrer: &str,
        name: &str,
        span: Span,
    ) -> Result<String, LinkError> {
        let (resolved, kind) = self.resolve_type(idx, referrer, name, span)?;
        if kind != DefKind::Message {
            return Err(self.error_in(
                idx,
                LinkErrorKind::NotAMessage {
                    name: name.to_owned(),
                },
                Some(span),
            ));
        }
        Ok(resolved)
    }

    /// Resolves a (possibly dotted) name against a scope, C++ style: the
    /// full name is tried against the innermost scope first and then each
    /// enclosing scope out to the root. A leading dot skips the walk.
    fn resolve_type(
        &self,
        idx: usize,
        scope: &str,
        name: &str,
        span: Span,
    ) -> Result<(String, DefKind), LinkError> {
        if let Some(absolute) = name.strip_prefix('.') {
            let fqn = format!(".{}", absolute);
            if let Some(definition) = self.lookup_visible(idx, &fqn) {
                return Ok((fqn, definition.kind));
            }
        } else {
            let mut prefix = scope.to_owned();
            loop {
                let candidate = format!("{}.{}", prefix, name);
                if let Some(definition) = self.lookup_visible(idx, &candidate) {
                    return Ok((candidate, definition.kind));
                }
                if prefix.is_empty() {
                    break;
                }
                match prefix.rfind('.') {
                    Some(at) => prefix.truncate(at),
                    None => prefix.clear(),
                }
            }
        }

        Err(self.error_in(
            idx,
            LinkErrorKind::UnresolvedType {
                name: name.to_owned(),
                referrer: display_name(scope),
            },
            Some(span),
        ))
    }

    fn lookup_visible(&self, idx: usize, fqn: &str) -> Option<Definition> {
        let definition = *self.symbols.get(fqn)?;
        // Packages are namespaces, not types; the outward walk keeps going
        // past them.
        if definition.kind == DefKind::Package {
            return None;
        }
        if !self.visible[idx].contains(&definition.file) {
            return None;
        }
        Some(definition)
    }

    fn error_in(&self, idx: usize, kind: LinkErrorKind, span: Option<Span>) -> LinkError {
        LinkError {
            kind,
            file: self.files[idx].name.clone(),
            span,
        }
    }
}

fn synthetic_field(name: &str, tag: u32, typ: ir::FieldType) -> ir::Field {
    ir::Field {
        name: name.to_owned(),
        tag,
        label: Label::Optional,
        proto3_optional: false,
        typ,
        packed: false,
        default: None,
        deprecated: false,
        oneof_index: None,
    }
}

fn scalar_of(typ: &ast::FieldType) -> Option<ir::Scalar> {
    Some(match typ {
        ast::FieldType::Double => ir::Scalar::Double,
        ast::FieldType::Float => ir::Scalar::Float,
        ast::FieldType::Int32 => ir::Scalar::Int32,
        ast::FieldType::Int64 => ir::Scalar::Int64,
        ast::FieldType::Uint32 => ir::Scalar::Uint32,
        ast::FieldType::Uint64 => ir::Scalar::Uint64,
        ast::FieldType::Sint32 => ir::Scalar::Sint32,
        ast::FieldType::Sint64 => ir::Scalar::Sint64,
        ast::FieldType::Fixed32 => ir::Scalar::Fixed32,
        ast::FieldType::Fixed64 => ir::Scalar::Fixed64,
        ast::FieldType::Sfixed32 => ir::Scalar::Sfixed32,
        ast::FieldType::Sfixed64 => ir::Scalar::Sfixed64,
        ast::FieldType::Bool => ir::Scalar::Bool,
        ast::FieldType::String => ir::Scalar::String,
        ast::FieldType::Bytes => ir::Scalar::Bytes,
        _ => return None,
    })
}

/// Strips the internal leading dot for display in diagnostics.
fn display_name(fqn: &str) -> String {
    fqn.trim_start_matches('.').to_owned()
}
