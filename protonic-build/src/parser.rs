//! Recursive-descent parser for `.proto` source files.
//!
//! The parser accepts the proto2 and proto3 grammars, including constructs
//! later stages reject or discard (`group` fields, `extend` blocks, custom
//! options). It produces an [`ast::File`] per input file and aborts the
//! file on the first error; no partial ASTs escape.

use std::fmt;

use crate::ast::{
    self, Constant, Enumeration, EnumValue, Extend, Field, FieldOrOneOf, FieldType, File, Import,
    ImportKind, Label, Message, Method, OneOf, ProtoOption, Service, Syntax, TagRange,
};
use crate::lexer::{LexError, LexErrorKind, Lexer, Span, Token};

#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    Unexpected { expected: String, got: String },
    BadTag,
    BadLiteral,
    Lex(LexErrorKind),
}

/// A syntax error, with the byte span it was detected at.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::Unexpected { expected, got } => {
                write!(f, "expected {}, found {}", expected, got)
            }
            ParseErrorKind::BadTag => f.write_str("field number out of range"),
            ParseErrorKind::BadLiteral => f.write_str("invalid literal"),
            ParseErrorKind::Lex(kind) => kind.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> ParseError {
        ParseError {
            kind: ParseErrorKind::Lex(error.kind),
            span: error.span,
        }
    }
}

/// Parses one `.proto` file. `name` is the file's import-path name, kept
/// on the AST for diagnostics and import resolution.
pub fn parse(name: &str, src: &str) -> Result<File, ParseError> {
    Parser::new(src).file(name)
}

struct Parser<'a> {
    src: &'a str,
    lexer: Lexer<'a>,
    peeked: Option<(Token, Span)>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Parser<'a> {
        Parser {
            src,
            lexer: Lexer::new(src),
            peeked: None,
        }
    }

    fn file(mut self, name: &str) -> Result<File, ParseError> {
        let mut file = File {
            name: name.to_owned(),
            ..File::default()
        };

        // A syntax statement must come before any definition.
        if self.eat_keyword("syntax")? {
            self.expect_punct('=')?;
            let (value, span) = self.expect_string()?;
            file.syntax = match value.as_str() {
                "proto2" => Syntax::Proto2,
                "proto3" => Syntax::Proto3,
                _ => {
                    return Err(ParseError {
                        kind: ParseErrorKind::BadLiteral,
                        span,
                    })
                }
            };
            self.expect_punct(';')?;
        }

        while self.peek()?.is_some() {
            if self.eat_punct(';')? {
                continue;
            }
            if self.eat_keyword("package")? {
                if file.package.is_some() {
                    return Err(self.unexpected("a single package statement")?);
                }
                file.package = Some(self.dotted_name(false)?);
                self.expect_punct(';')?;
            } else if self.eat_keyword("import")? {
                let kind = if self.eat_keyword("public")? {
                    ImportKind::Public
                } else if self.eat_keyword("weak")? {
                    ImportKind::Weak
                } else {
                    ImportKind::Default
                };
                let (path, span) = self.expect_string()?;
                self.expect_punct(';')?;
                file.imports.push(Import { path, kind, span });
            } else if self.eat_keyword("option")? {
                file.options.push(self.option_body()?);
            } else if self.eat_keyword("message")? {
                file.messages.push(self.message()?);
            } else if self.eat_keyword("enum")? {
                file.enums.push(self.enumeration()?);
            } else if self.eat_keyword("service")? {
                file.services.push(self.service()?);
            } else if self.eat_keyword("extend")? {
                file.extends.push(self.extend()?);
            } else {
                return Err(self.unexpected("a top-level definition")?);
            }
        }

        Ok(file)
    }

    fn message(&mut self) -> Result<Message, ParseError> {
        let (name, span) = self.expect_ident()?;
        let mut message = Message {
            name,
            span,
            ..Message::default()
        };
        self.expect_punct('{')?;

        loop {
            if self.eat_punct('}')? {
                break;
            }
            if self.eat_punct(';')? {
                continue;
            }
            if self.eat_keyword("reserved")? {
                self.reserved(&mut message.reserved_ranges, &mut message.reserved_names)?;
            } else if self.eat_keyword("extensions")? {
                // Extension ranges are accepted and dropped; proto2
                // extensions are out of scope beyond parsing.
                let mut ranges = Vec::new();
                self.tag_ranges(&mut ranges)?;
                // `extensions 1 to max [declaration = ...];` option lists
                // are consumed along with the statement.
                if self.eat_punct('[')? {
                    self.option_list_tail()?;
                }
                self.expect_punct(';')?;
            } else if self.eat_keyword("message")? {
                message.messages.push(self.message()?);
            } else if self.eat_keyword("enum")? {
                message.enums.push(self.enumeration()?);
            } else if self.eat_keyword("oneof")? {
                message.fields.push(FieldOrOneOf::OneOf(self.oneof()?));
            } else if self.eat_keyword("option")? {
                message.options.push(self.option_body()?);
            } else if self.eat_keyword("extend")? {
                // Message-scoped extend blocks parse like top-level ones
                // and are likewise dropped.
                self.extend()?;
            } else {
                message.fields.push(FieldOrOneOf::Field(self.field(false)?));
            }
        }

        Ok(message)
    }

    fn field(&mut self, in_oneof: bool) -> Result<Field, ParseError> {
        let label = if in_oneof {
            None
        } else if self.eat_keyword("optional")? {
            Some(Label::Optional)
        } else if self.eat_keyword("required")? {
            Some(Label::Required)
        } else if self.eat_keyword("repeated")? {
            Some(Label::Repeated)
        } else {
            None
        };

        if self.at_keyword("group")? {
            return self.group(label);
        }

        let typ = self.field_type()?;
        let (name, span) = self.expect_ident()?;
        self.expect_punct('=')?;
        let tag = self.tag()?;
        let options = if self.eat_punct('[')? {
            self.option_list_tail()?
        } else {
            Vec::new()
        };
        self.expect_punct(';')?;

        Ok(Field {
            name,
            label,
            typ,
            tag,
            options,
            span,
        })
    }

    fn group(&mut self, label: Option<Label>) -> Result<Field, ParseError> {
        self.expect_keyword("group")?;
        let (name, span) = self.expect_ident()?;
        self.expect_punct('=')?;
        let tag = self.tag()?;
        self.expect_punct('{')?;

        let mut fields = Vec::new();
        loop {
            if self.eat_punct('}')? {
                break;
            }
            if self.eat_punct(';')? {
                continue;
            }
            fields.push(self.field(false)?);
        }

        // The implicit field is named after the group, lowercased.
        Ok(Field {
            name: name.to_lowercase(),
            label,
            typ: FieldType::Group { name, fields },
            tag,
            options: Vec::new(),
            span,
        })
    }

    fn field_type(&mut self) -> Result<FieldType, ParseError> {
        if self.at_punct('.')? {
            return Ok(FieldType::Named(self.dotted_name(true)?));
        }

        let (first, _span) = self.expect_ident()?;
        let builtin = match first.as_str() {
            "double" => Some(FieldType::Double),
            "float" => Some(FieldType::Float),
            "int32" => Some(FieldType::Int32),
            "int64" => Some(FieldType::Int64),
            "uint32" => Some(FieldType::Uint32),
            "uint64" => Some(FieldType::Uint64),
            "sint32" => Some(FieldType::Sint32),
            "sint64" => Some(FieldType::Sint64),
            "fixed32" => Some(FieldType::Fixed32),
            "fixed64" => Some(FieldType::Fixed64),
            "sfixed32" => Some(FieldType::Sfixed32),
            "sfixed64" => Some(FieldType::Sfixed64),
            "bool" => Some(FieldType::Bool),
            "string" => Some(FieldType::String),
            "bytes" => Some(FieldType::Bytes),
            _ => None,
        };

        if let Some(builtin) = builtin {
            return Ok(builtin);
        }

        if first == "map" && self.at_punct('<')? {
            self.expect_punct('<')?;
            let key = self.field_type()?;
            self.expect_punct(',')?;
            let value = self.field_type()?;
            if matches!(value, FieldType::Map(_)) {
                return Err(self.unexpected("a non-map value type")?);
            }
            self.expect_punct('>')?;
            return Ok(FieldType::Map(Box::new((key, value))));
        }

        Ok(FieldType::Named(self.dotted_tail(first)?))
    }

    fn oneof(&mut self) -> Result<OneOf, ParseError> {
        let (name, span) = self.expect_ident()?;
        let mut oneof = OneOf {
            name,
            fields: Vec::new(),
            span,
        };
        self.expect_punct('{')?;
        loop {
            if self.eat_punct('}')? {
                break;
            }
            if self.eat_punct(';')? {
                continue;
            }
            if self.eat_keyword("option")? {
                self.option_body()?;
                continue;
            }
            oneof.fields.push(self.field(true)?);
        }
        Ok(oneof)
    }

    fn enumeration(&mut self) -> Result<Enumeration, ParseError> {
        let (name, span) = self.expect_ident()?;
        let mut enumeration = Enumeration {
            name,
            span,
            ..Enumeration::default()
        };
        self.expect_punct('{')?;

        loop {
            if self.eat_punct('}')? {
                break;
            }
            if self.eat_punct(';')? {
                continue;
            }
            if self.eat_keyword("reserved")? {
                self.reserved(
                    &mut enumeration.reserved_ranges,
                    &mut enumeration.reserved_names,
                )?;
                continue;
            }
            if self.eat_keyword("option")? {
                enumeration.options.push(self.option_body()?);
                continue;
            }

            let (value_name, value_span) = self.expect_ident()?;
            self.expect_punct('=')?;
            let number = self.enum_number()?;
            let options = if self.eat_punct('[')? {
                self.option_list_tail()?
            } else {
                Vec::new()
            };
            self.expect_punct(';')?;
            enumeration.values.push(EnumValue {
                name: value_name,
                number,
                options,
                span: value_span,
            });
        }

        Ok(enumeration)
    }

    fn service(&mut self) -> Result<Service, ParseError> {
        let (name, span) = self.expect_ident()?;
        let mut service = Service {
            name,
            span,
            ..Service::default()
        };
        self.expect_punct('{')?;

        loop {
            if self.eat_punct('}')? {
                break;
            }
            if self.eat_punct(';')? {
                continue;
            }
            if self.eat_keyword("option")? {
                service.options.push(self.option_body()?);
                continue;
            }
            self.expect_keyword("rpc")?;
            service.methods.push(self.method()?);
        }

        Ok(service)
    }

    fn method(&mut self) -> Result<Method, ParseError> {
        let (name, span) = self.expect_ident()?;
        self.expect_punct('(')?;
        let (client_streaming, input_type) = self.method_type()?;
        self.expect_punct(')')?;
        self.expect_keyword("returns")?;
        self.expect_punct('(')?;
        let (server_streaming, output_type) = self.method_type()?;
        self.expect_punct(')')?;

        let mut options = Vec::new();
        if self.eat_punct('{')? {
            loop {
                if self.eat_punct('}')? {
                    break;
                }
                if self.eat_punct(';')? {
                    continue;
                }
                self.expect_keyword("option")?;
                options.push(self.option_body()?);
            }
        } else {
            self.expect_punct(';')?;
        }

        Ok(Method {
            name,
            input_type,
            output_type,
            client_streaming,
            server_streaming,
            options,
            span,
        })
    }

    /// Parses `[stream] Type` inside a method's parentheses. `stream` is a
    /// contextual keyword: it only acts as one when a type name follows.
    fn method_type(&mut self) -> Result<(bool, String), ParseError> {
        if self.at_punct('.')? {
            return Ok((false, self.dotted_name(true)?));
        }
        let (first, _) = self.expect_ident()?;
        if first == "stream" {
            let streaming = matches!(self.peek()?, Some((Token::Ident(_), _)))
                || self.at_punct('.')?;
            if streaming {
                let typ = if self.at_punct('.')? {
                    self.dotted_name(true)?
                } else {
                    let (ident, _) = self.expect_ident()?;
                    self.dotted_tail(ident)?
                };
                return Ok((true, typ));
            }
        }
        Ok((false, self.dotted_tail(first)?))
    }

    fn extend(&mut self) -> Result<Extend, ParseError> {
        let span = self.peek_span()?;
        let extendee = self.dotted_name(true)?;
        self.expect_punct('{')?;
        let mut fields = Vec::new();
        loop {
            if self.eat_punct('}')? {
                break;
            }
            if self.eat_punct(';')? {
                continue;
            }
            fields.push(self.field(false)?);
        }
        Ok(Extend {
            extendee,
            fields,
            span,
        })
    }

    fn reserved(
        &mut self,
        ranges: &mut Vec<TagRange>,
        names: &mut Vec<String>,
    ) -> Result<(), ParseError> {
        if matches!(self.peek()?, Some((Token::Str(_), _))) {
            loop {
                let (name, _) = self.expect_string()?;
                names.push(name);
                if !self.eat_punct(',')? {
                    break;
                }
            }
        } else {
            self.tag_ranges(ranges)?;
        }
        self.expect_punct(';')
    }

    fn tag_ranges(&mut self, ranges: &mut Vec<TagRange>) -> Result<(), ParseError> {
        loop {
            let start = self.tag()?;
            let end = if self.eat_keyword("to")? {
                if self.eat_keyword("max")? {
                    crate::MAX_TAG
                } else {
                    self.tag()?
                }
            } else {
                start
            };
            ranges.push(TagRange { start, end });
            if !self.eat_punct(',')? {
                break;
            }
        }
        Ok(())
    }

    fn option_body(&mut self) -> Result<ProtoOption, ParseError> {
        let option = self.option_name_and_value()?;
        self.expect_punct(';')?;
        Ok(option)
    }

    /// Parses the remainder of a `[...]` option list, the `[` already
    /// consumed.
    fn option_list_tail(&mut self) -> Result<Vec<ProtoOption>, ParseError> {
        let mut options = Vec::new();
        loop {
            options.push(self.option_name_and_value()?);
            if self.eat_punct(']')? {
                break;
            }
            self.expect_punct(',')?;
        }
        Ok(options)
    }

    fn option_name_and_value(&mut self) -> Result<ProtoOption, ParseError> {
        let mut name = String::new();
        if self.eat_punct('(')? {
            name.push('(');
            name.push_str(&self.dotted_name(true)?);
            self.expect_punct(')')?;
            name.push(')');
        } else {
            name.push_str(&self.expect_ident()?.0);
        }
        while self.eat_punct('.')? {
            name.push('.');
            name.push_str(&self.expect_ident()?.0);
        }
        self.expect_punct('=')?;
        let value = self.constant()?;
        Ok(ProtoOption { name, value })
    }

    fn constant(&mut self) -> Result<Constant, ParseError> {
        let peeked = self.peek()?.cloned();
        match peeked {
            Some((Token::Int(_), _)) => {
                let (value, _) = self.expect_int()?;
                Ok(Constant::U64(value))
            }
            Some((Token::Float(value), _)) => {
                self.next()?;
                Ok(Constant::F64(value))
            }
            Some((Token::Str(_), _)) => {
                let (value, _) = self.expect_string()?;
                Ok(Constant::Str(value))
            }
            Some((Token::Punct('-'), _)) | Some((Token::Punct('+'), _)) => {
                let negative = self.at_punct('-')?;
                self.next()?;
                match self.next()? {
                    Some((Token::Int(value), span)) => {
                        if negative {
                            if value > i64::MIN.unsigned_abs() {
                                return Err(ParseError {
                                    kind: ParseErrorKind::BadLiteral,
                                    span,
                                });
                            }
                            Ok(Constant::I64((value as i64).wrapping_neg()))
                        } else {
                            Ok(Constant::U64(value))
                        }
                    }
                    Some((Token::Float(value), _)) => {
                        Ok(Constant::F64(if negative { -value } else { value }))
                    }
                    Some((Token::Ident(ident), _)) if ident == "inf" => {
                        Ok(Constant::F64(if negative {
                            f64::NEG_INFINITY
                        } else {
                            f64::INFINITY
                        }))
                    }
                    got => Err(self.unexpected_token("a numeric literal", got)?),
                }
            }
            Some((Token::Ident(ident), _)) => match ident.as_str() {
                "true" => {
                    self.next()?;
                    Ok(Constant::Bool(true))
                }
                "false" => {
                    self.next()?;
                    Ok(Constant::Bool(false))
                }
                _ => {
                    let (first, _) = self.expect_ident()?;
                    Ok(Constant::Ident(self.dotted_tail(first)?))
                }
            },
            Some((Token::Punct('{'), span)) => {
                let start = span.start;
                self.next()?;
                let mut depth = 1usize;
                let mut end = start + 1;
                while depth > 0 {
                    match self.next()? {
                        Some((Token::Punct('{'), _)) => depth += 1,
                        Some((Token::Punct('}'), span)) => {
                            depth -= 1;
                            end = span.end;
                        }
                        Some(_) => {}
                        None => return Err(self.unexpected("a closing `}`")?),
                    }
                }
                Ok(Constant::Aggregate(self.src[start..end].to_owned()))
            }
            got => Err(self.unexpected_token("a constant", got)?),
        }
    }

    fn dotted_name(&mut self, allow_leading_dot: bool) -> Result<String, ParseError> {
        let mut name = String::new();
        if allow_leading_dot && self.eat_punct('.')? {
            name.push('.');
        }
        let (first, _) = self.expect_ident()?;
        name.push_str(&first);
        while self.eat_punct('.')? {
            name.push('.');
            name.push_str(&self.expect_ident()?.0);
        }
        Ok(name)
    }

    /// Continues a dotted name whose first segment was already consumed.
    fn dotted_tail(&mut self, first: String) -> Result<String, ParseError> {
        let mut name = first;
        while self.eat_punct('.')? {
            name.push('.');
            name.push_str(&self.expect_ident()?.0);
        }
        Ok(name)
    }

    fn tag(&mut self) -> Result<u32, ParseError> {
        let (value, span) = self.expect_int()?;
        u32::try_from(value).map_err(|_| ParseError {
            kind: ParseErrorKind::BadTag,
            span,
        })
    }

    fn enum_number(&mut self) -> Result<i32, ParseError> {
        let negative = self.eat_punct('-')?;
        let (value, span) = self.expect_int()?;
        let bad_literal = ParseError {
            kind: ParseErrorKind::BadLiteral,
            span,
        };
        let number = i64::try_from(value).map_err(|_| bad_literal.clone())?;
        let number = if negative { -number } else { number };
        i32::try_from(number).map_err(|_| bad_literal)
    }

    // Token-level helpers.

    fn next(&mut self) -> Result<Option<(Token, Span)>, ParseError> {
        if let Some(spanned) = self.peeked.take() {
            return Ok(Some(spanned));
        }
        Ok(self.lexer.next_token()?)
    }

    fn peek(&mut self) -> Result<Option<&(Token, Span)>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn peek_span(&mut self) -> Result<Span, ParseError> {
        let end = self.src.len();
        Ok(self
            .peek()?
            .map(|(_, span)| *span)
            .unwrap_or_else(|| Span::new(end, end)))
    }

    fn at_punct(&mut self, ch: char) -> Result<bool, ParseError> {
        Ok(matches!(self.peek()?, Some((Token::Punct(p), _)) if *p == ch))
    }

    fn eat_punct(&mut self, ch: char) -> Result<bool, ParseError> {
        if self.at_punct(ch)? {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punct(&mut self, ch: char) -> Result<(), ParseError> {
        if !self.eat_punct(ch)? {
            return Err(self.unexpected(&format!("`{}`", ch))?);
        }
        Ok(())
    }

    fn at_keyword(&mut self, keyword: &str) -> Result<bool, ParseError> {
        Ok(matches!(self.peek()?, Some((Token::Ident(name), _)) if name == keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> Result<bool, ParseError> {
        if self.at_keyword(keyword)? {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if !self.eat_keyword(keyword)? {
            return Err(self.unexpected(&format!("`{}`", keyword))?);
        }
        Ok(())
    }

    fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        match self.next()? {
            Some((Token::Ident(name), span)) => Ok((name, span)),
            got => Err(self.unexpected_token("an identifier", got)?),
        }
    }

    fn expect_int(&mut self) -> Result<(u64, Span), ParseError> {
        match self.next()? {
            Some((Token::Int(value), span)) => Ok((value, span)),
            got => Err(self.unexpected_token("an integer literal", got)?),
        }
    }

    /// Expects a string literal; adjacent literals concatenate, as in C.
    fn expect_string(&mut self) -> Result<(String, Span), ParseError> {
        match self.next()? {
            Some((Token::Str(mut value), span)) => {
                while matches!(self.peek()?, Some((Token::Str(_), _))) {
                    match self.next()? {
                        Some((Token::Str(next), _)) => value.push_str(&next),
                        _ => unreachable!(),
                    }
                }
                Ok((value, span))
            }
            got => Err(self.unexpected_token("a string literal", got)?),
        }
    }

    fn unexpected(&mut self, expected: &str) -> Result<ParseError, ParseError> {
        let got = self.peek()?.cloned();
        self.unexpected_token(expected, got)
    }

    fn unexpected_token(
        &mut self,
        expected: &str,
        got: Option<(Token, Span)>,
    ) -> Result<ParseError, ParseError> {
        let end = self.src.len();
        let (got, span) = match got {
            Some((token, span)) => (token.to_string(), span),
            None => ("end of file".to_owned(), Span::new(end, end)),
        };
        Ok(ParseError {
            kind: ParseErrorKind::Unexpected {
                expected: expected.to_owned(),
                got,
            },
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> File {
        parse("test.proto", src).expect("parse failed")
    }

    fn first_message(file: &File) -> &Message {
        file.messages.first().expect("no message parsed")
    }

    #[test]
    fn minimal_proto3_file() {
        let file = parse_ok(
            r#"
            syntax = "proto3";
            package demo.items;

            message Shirt {
                string color = 1;
                int32 size = 2;
            }
            "#,
        );

        assert_eq!(file.syntax, Syntax::Proto3);
        assert_eq!(file.package.as_deref(), Some("demo.items"));

        let message = first_message(&file);
        assert_eq!(message.name, "Shirt");
        let fields: Vec<_> = message.all_fields().collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "color");
        assert_eq!(fields[0].typ, FieldType::String);
        assert_eq!(fields[0].tag, 1);
        assert_eq!(fields[1].typ, FieldType::Int32);
    }

    #[test]
    fn files_without_syntax_default_to_proto2() {
        let file = parse_ok("message M { optional int32 a = 1; }");
        assert_eq!(file.syntax, Syntax::Proto2);
        assert_eq!(
            first_message(&file).all_fields().next().unwrap().label,
            Some(Label::Optional),
        );
    }

    #[test]
    fn imports_with_visibility() {
        let file = parse_ok(
            r#"
            syntax = "proto3";
            import "a.proto";
            import public "b.proto";
            import weak "c.proto";
            "#,
        );
        let kinds: Vec<_> = file.imports.iter().map(|import| import.kind).collect();
        assert_eq!(
            kinds,
            vec![ImportKind::Default, ImportKind::Public, ImportKind::Weak],
        );
        assert_eq!(file.imports[1].path, "b.proto");
    }

    #[test]
    fn map_fields_and_nested_types() {
        let file = parse_ok(
            r#"
            syntax = "proto3";
            message Outer {
                map<string, Inner> items = 1;
                message Inner { int32 n = 1; }
                enum Kind { KIND_UNSPECIFIED = 0; }
            }
            "#,
        );
        let message = first_message(&file);
        let field = message.all_fields().next().unwrap();
        match &field.typ {
            FieldType::Map(entry) => {
                assert_eq!(entry.0, FieldType::String);
                assert_eq!(entry.1, FieldType::Named("Inner".into()));
            }
            other => panic!("expected a map type, got {:?}", other),
        }
        assert_eq!(message.messages[0].name, "Inner");
        assert_eq!(message.enums[0].name, "Kind");
    }

    #[test]
    fn oneofs_preserve_member_order() {
        let file = parse_ok(
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
        match &first_message(&file).fields[0] {
            FieldOrOneOf::OneOf(oneof) => {
                assert_eq!(oneof.name, "which");
                assert_eq!(oneof.fields[0].name, "i");
                assert_eq!(oneof.fields[1].name, "s");
                assert_eq!(oneof.fields[1].label, None);
            }
            other => panic!("expected a oneof, got {:?}", other),
        }
    }

    #[test]
    fn proto2_groups_parse_into_fields() {
        let file = parse_ok(
            r#"
            message SearchResponse {
                repeated group Result = 1 {
                    required string url = 2;
                }
            }
            "#,
        );
        let field = first_message(&file).all_fields().next().unwrap();
        assert_eq!(field.name, "result");
        assert_eq!(field.label, Some(Label::Repeated));
        match &field.typ {
            FieldType::Group { name, fields } => {
                assert_eq!(name, "Result");
                assert_eq!(fields[0].name, "url");
            }
            other => panic!("expected a group, got {:?}", other),
        }
    }

    #[test]
    fn reserved_statements() {
        let file = parse_ok(
            r#"
            message M {
                reserved 2, 15, 9 to 11, 40 to max;
                reserved "foo", "bar";
            }
            "#,
        );
        let message = first_message(&file);
        assert_eq!(
            message.reserved_ranges,
            vec![
                TagRange { start: 2, end: 2 },
                TagRange { start: 15, end: 15 },
                TagRange { start: 9, end: 11 },
                TagRange {
                    start: 40,
                    end: crate::MAX_TAG
                },
            ],
        );
        assert_eq!(message.reserved_names, vec!["foo", "bar"]);
    }

    #[test]
    fn field_options_and_defaults() {
        let file = parse_ok(
            r#"
            message M {
                optional int32 a = 1 [default = -3, deprecated = true];
                repeated int32 b = 2 [packed = true];
            }
            "#,
        );
        let fields: Vec<_> = first_message(&file).all_fields().cloned().collect();
        assert_eq!(
            ast::find_option(&fields[0].options, "default"),
            Some(&Constant::I64(-3)),
        );
        assert_eq!(
            ast::find_option(&fields[0].options, "deprecated"),
            Some(&Constant::Bool(true)),
        );
        assert_eq!(
            ast::find_option(&fields[1].options, "packed"),
            Some(&Constant::Bool(true)),
        );
    }

    #[test]
    fn custom_options_and_aggregates() {
        let file = parse_ok(
            r#"
            syntax = "proto3";
            option java_package = "com.example";
            option (my.custom).thing = { a: 1 b: "x" };
            "#,
        );
        assert_eq!(file.options[0].name, "java_package");
        assert_eq!(file.options[1].name, "(my.custom).thing");
        match &file.options[1].value {
            Constant::Aggregate(raw) => assert!(raw.starts_with('{') && raw.ends_with('}')),
            other => panic!("expected an aggregate, got {:?}", other),
        }
    }

    #[test]
    fn services_and_streaming_shapes() {
        let file = parse_ok(
            r#"
            syntax = "proto3";
            package demo;
            service Greeter {
                rpc SayHello (HelloRequest) returns (HelloReply);
                rpc LotsOfReplies (HelloRequest) returns (stream HelloReply);
                rpc LotsOfGreetings (stream HelloRequest) returns (HelloReply) {
                    option deadline = 1.5;
                }
                rpc BidiHello (stream .demo.HelloRequest) returns (stream HelloReply);
            }
            "#,
        );
        let service = &file.services[0];
        assert_eq!(service.name, "Greeter");
        let shapes: Vec<_> = service
            .methods
            .iter()
            .map(|method| (method.client_streaming, method.server_streaming))
            .collect();
        assert_eq!(
            shapes,
            vec![(false, false), (false, true), (true, false), (true, true)],
        );
        assert_eq!(service.methods[3].input_type, ".demo.HelloRequest");
        assert_eq!(service.methods[2].options[0].name, "deadline");
    }

    #[test]
    fn extend_blocks_parse_and_carry_fields() {
        let file = parse_ok(
            r#"
            extend google.protobuf.FieldOptions {
                optional string tagname = 50000;
            }
            "#,
        );
        assert_eq!(file.extends[0].extendee, "google.protobuf.FieldOptions");
        assert_eq!(file.extends[0].fields[0].tag, 50000);
    }

    #[test]
    fn enum_values_may_be_negative() {
        let file = parse_ok(
            r#"
            enum Direction {
                UNKNOWN = 0;
                BACKWARD = -1;
            }
            "#,
        );
        assert_eq!(file.enums[0].values[1].number, -1);
    }

    #[test]
    fn adjacent_string_literals_concatenate() {
        let file = parse_ok(
            r#"
            syntax = "proto3";
            option doc = "one " "two";
            "#,
        );
        assert_eq!(
            file.options[0].value,
            Constant::Str("one two".into()),
        );
    }

    #[test]
    fn errors_carry_the_expected_set() {
        let error = parse("bad.proto", "message M { int32 a 1; }").unwrap_err();
        match error.kind {
            ParseErrorKind::Unexpected { expected, .. } => assert_eq!(expected, "`=`"),
            other => panic!("expected an Unexpected error, got {:?}", other),
        }

        let error = parse("bad.proto", "syntax = \"proto4\";").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::BadLiteral);

        let error = parse("bad.proto", "message M { int32 a = 4294967296; }").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::BadTag);
    }

    #[test]
    fn lex_errors_surface_as_parse_errors() {
        let error = parse("bad.proto", "message M { string s = 1 [default = \"oops]; }")
            .unwrap_err();
        assert!(matches!(error.kind, ParseErrorKind::Lex(_)));
    }
}
