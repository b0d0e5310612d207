use multimap::MultiMap;
use proc_macro2::Literal;

use super::*;
use crate::ir::Constant;

mod oneof;

type OneofFields<'a> = MultiMap<usize, &'a ir::Field>;

/// The encoding paths involved in one map field.
struct MapParts {
    map_mod: TokenStream,
    key_mod: TokenStream,
    value_encode: TokenStream,
    value_merge: TokenStream,
    value_len: TokenStream,
}

impl CodeGenerator<'_> {
    pub(super) fn push_messages(&mut self, messages: &[ir::Message]) {
        for message in messages {
            if let Some(resolved_message) = self.resolve_message(message) {
                self.buf.push_str(&resolved_message.to_string());
            }
        }
    }

    fn resolve_message(&mut self, message: &ir::Message) -> Option<TokenStream> {
        if message.is_map_entry {
            return None;
        }
        debug!("  message: {:?}", message.name);

        // Split plain fields from oneof members; the members are emitted
        // as variants of the oneof's enum instead of struct fields.
        let mut fields: Vec<&ir::Field> = Vec::new();
        let mut oneof_fields: OneofFields = MultiMap::new();
        for field in &message.fields {
            match field.oneof_index {
                Some(index) => oneof_fields.insert(index, field),
                None => fields.push(field),
            }
        }

        let ident = format_ident!("{}", to_upper_camel(&message.name));
        let struct_fields: Vec<TokenStream> = fields
            .iter()
            .map(|field| self.resolve_field(message, field))
            .collect();
        let oneof_struct_fields: Vec<TokenStream> = message
            .oneofs
            .iter()
            .enumerate()
            .filter(|(index, _)| oneof_fields.contains_key(index))
            .map(|(_, oneof)| self.resolve_oneof_field(message, oneof))
            .collect();

        let encode_raw = self.resolve_encode_raw(message, &fields, &oneof_fields);
        let merge_field = self.resolve_merge_field(message, &fields, &oneof_fields);
        let merge_raw = self.resolve_merge_raw(message);
        let encoded_len = self.resolve_encoded_len(message, &fields, &oneof_fields);
        let clear = self.resolve_clear(message, &fields, &oneof_fields);
        let default_fields = self.resolve_default_fields(message, &fields, &oneof_fields);
        let accessors = self.resolve_accessors(message, &fields, &ident);
        let nested = self.resolve_nested(message, &oneof_fields);

        Some(quote! {
            #[allow(clippy::derive_partial_eq_without_eq)]
            #[derive(Clone, PartialEq, Debug)]
            pub struct #ident {
                #(#struct_fields,)*
                #(#oneof_struct_fields,)*
                pub unknown_fields: ::protonic::UnknownFieldSet,
            }

            #[allow(deprecated)]
            impl ::protonic::Message for #ident {
                fn encode_raw(&self, buf: &mut impl ::protonic::bytes::BufMut) {
                    #encode_raw
                }

                fn merge_field(
                    &mut self,
                    tag: u32,
                    wire_type: ::protonic::encoding::WireType,
                    buf: &mut impl ::protonic::bytes::Buf,
                    ctx: ::protonic::encoding::DecodeContext,
                ) -> ::core::result::Result<(), ::protonic::DecodeError> {
                    #merge_field
                }

                #merge_raw

                fn encoded_len(&self) -> usize {
                    #encoded_len
                }

                fn clear(&mut self) {
                    #clear
                }
            }

            #[allow(deprecated)]
            impl ::core::default::Default for #ident {
                fn default() -> Self {
                    #ident {
                        #(#default_fields,)*
                        unknown_fields: ::protonic::UnknownFieldSet::new(),
                    }
                }
            }

            #accessors

            #nested
        })
    }

    fn resolve_field(&self, message: &ir::Message, field: &ir::Field) -> TokenStream {
        let repeated = field.label == Label::Repeated;
        let optional = self.optional(field);
        let boxed = self.should_box_field(field, &message.fqn);

        let type_string = match &field.typ {
            FieldType::Map(key, value) => {
                let map_type = self.map_type(&message.fqn, &field.name);
                let key_rust = self.scalar_rust_type(*key, &message.fqn, &field.name);
                let value_rust = self.resolve_type(value, &message.fqn, &field.name);
                format!("{}<{}, {}>", map_type.rust_type(), key_rust, value_rust)
            }
            typ => {
                let inner = self.resolve_type(typ, &message.fqn, &field.name);
                match (repeated, optional, boxed) {
                    (true, _, _) => format!("::std::vec::Vec<{}>", inner),
                    (false, true, true) => {
                        format!("::core::option::Option<::std::boxed::Box<{}>>", inner)
                    }
                    (false, true, false) => format!("::core::option::Option<{}>", inner),
                    (false, false, _) => inner,
                }
            }
        };

        debug!("    field: {:?}, type: {:?}, boxed: {}", field.name, type_string, boxed);

        let maybe_deprecated = field.deprecated.then_some(quote!(#[deprecated]));
        let field_ident = format_ident!("{}", to_snake(&field.name));
        let field_type = Self::syn_type(&type_string);

        quote! {
            #maybe_deprecated
            pub #field_ident: #field_type
        }
    }

    fn resolve_oneof_field(&self, message: &ir::Message, oneof: &ir::Oneof) -> TokenStream {
        let field_ident = format_ident!("{}", to_snake(&oneof.name));
        let oneof_type = Self::syn_type(&format!(
            "::core::option::Option<{}::{}>",
            to_snake(&message.name),
            to_upper_camel(&oneof.name),
        ));
        quote!(pub #field_ident: #oneof_type)
    }

    fn map_parts(
        &self,
        key: Scalar,
        value: &FieldType,
        fq_message_name: &str,
        field_name: &str,
    ) -> MapParts {
        let map_type = self.map_type(fq_message_name, field_name);
        let map_module = format_ident!("{}", map_type.encoding_module());
        let key_mod = self.encoding_mod(&FieldType::Scalar(key));
        let value_mod = self.encoding_mod(value);

        MapParts {
            map_mod: quote!(::protonic::encoding::#map_module),
            key_mod,
            value_encode: quote!(#value_mod::encode),
            value_merge: quote!(#value_mod::merge),
            value_len: quote!(#value_mod::encoded_len),
        }
    }

    /// A `self.field != default` guard for proto3 implicit fields.
    fn non_default_check(&self, field: &ir::Field) -> TokenStream {
        let field_ident = format_ident!("{}", to_snake(&field.name));
        match &field.typ {
            FieldType::Scalar(Scalar::String) | FieldType::Scalar(Scalar::Bytes) => {
                quote!(!self.#field_ident.is_empty())
            }
            FieldType::Scalar(Scalar::Bool) => quote!(self.#field_ident),
            FieldType::Scalar(Scalar::Float) => quote!(self.#field_ident != 0f32),
            FieldType::Scalar(Scalar::Double) => quote!(self.#field_ident != 0f64),
            FieldType::Scalar(_) => quote!(self.#field_ident != 0),
            FieldType::Enum(_) => {
                quote!(self.#field_ident != ::protonic::OpenEnum::default())
            }
            _ => panic!("implicit presence applies only to scalar and enum fields"),
        }
    }

    fn resolve_encode_raw(
        &self,
        message: &ir::Message,
        fields: &[&ir::Field],
        oneof_fields: &OneofFields,
    ) -> TokenStream {
        // Known fields are written in ascending tag order; a oneof sorts
        // at its smallest member tag. Unknown fields always come last.
        let mut entries: Vec<(u32, TokenStream)> = fields
            .iter()
            .map(|field| (field.tag, self.encode_field(message, field)))
            .collect();
        for (index, oneof) in message.oneofs.iter().enumerate() {
            let members = match oneof_fields.get_vec(&index) {
                Some(members) => members,
                None => continue,
            };
            let min_tag = members.iter().map(|member| member.tag).min().unwrap();
            let field_ident = format_ident!("{}", to_snake(&oneof.name));
            entries.push((
                min_tag,
                quote! {
                    if let ::core::option::Option::Some(value) = &self.#field_ident {
                        value.encode(buf);
                    }
                },
            ));
        }
        entries.sort_by_key(|(tag, _)| *tag);
        let statements = entries.into_iter().map(|(_, statement)| statement);

        quote! {
            #(#statements)*
            ::protonic::Message::encode_raw(&self.unknown_fields, buf);
        }
    }

    fn encode_field(&self, message: &ir::Message, field: &ir::Field) -> TokenStream {
        let tag = field.tag;
        let field_ident = format_ident!("{}", to_snake(&field.name));

        if let FieldType::Map(key, value) = &field.typ {
            let MapParts {
                map_mod,
                key_mod,
                value_encode,
                value_len,
                ..
            } = self.map_parts(*key, value, &message.fqn, &field.name);
            return quote! {
                #map_mod::encode(
                    #key_mod::encode,
                    #key_mod::encoded_len,
                    #value_encode,
                    #value_len,
                    #tag,
                    &self.#field_ident,
                    buf,
                );
            };
        }

        let module = self.encoding_mod(&field.typ);
        if field.label == Label::Repeated {
            return if field.packed {
                quote!(#module::encode_packed(#tag, &self.#field_ident, buf);)
            } else {
                quote!(#module::encode_repeated(#tag, &self.#field_ident, buf);)
            };
        }

        if self.optional(field) {
            return quote! {
                if let ::core::option::Option::Some(value) = &self.#field_ident {
                    #module::encode(#tag, value, buf);
                }
            };
        }

        if field.label == Label::Required {
            return quote!(#module::encode(#tag, &self.#field_ident, buf););
        }

        // Proto3 implicit presence: skip the zero default.
        let check = self.non_default_check(field);
        quote! {
            if #check {
                #module::encode(#tag, &self.#field_ident, buf);
            }
        }
    }

    fn resolve_merge_field(
        &self,
        message: &ir::Message,
        fields: &[&ir::Field],
        oneof_fields: &OneofFields,
    ) -> TokenStream {
        let message_name = message.name.clone();
        let mut arms: Vec<TokenStream> = fields
            .iter()
            .map(|field| self.merge_arm(message, field, &message_name))
            .collect();

        for (index, oneof) in message.oneofs.iter().enumerate() {
            let members = match oneof_fields.get_vec(&index) {
                Some(members) => members,
                None => continue,
            };
            let field_ident = format_ident!("{}", to_snake(&oneof.name));
            let oneof_name = Literal::string(&oneof.name);
            let message_name = Literal::string(&message_name);
            let oneof_type = Self::syn_type(&format!(
                "{}::{}",
                to_snake(&message.name),
                to_upper_camel(&oneof.name),
            ));
            // One arm per member so a mismatched wire type can fall back
            // to the unknown-field set.
            for member in members {
                let tag = member.tag;
                let accepts = self.wire_type_check(member);
                arms.push(quote! {
                    #tag => {
                        if #accepts {
                            #oneof_type::merge(&mut self.#field_ident, tag, wire_type, buf, ctx)
                                .map_err(|mut error| {
                                    error.push(#message_name, #oneof_name);
                                    error
                                })
                        } else {
                            ::protonic::Message::merge_field(
                                &mut self.unknown_fields,
                                tag,
                                wire_type,
                                buf,
                                ctx,
                            )
                        }
                    }
                });
            }
        }

        quote! {
            match tag {
                #(#arms)*
                _ => ::protonic::Message::merge_field(
                    &mut self.unknown_fields,
                    tag,
                    wire_type,
                    buf,
                    ctx,
                ),
            }
        }
    }

    /// The `WireType` variant a singular record of this field carries.
    fn expected_wire_type(&self, typ: &FieldType) -> TokenStream {
        let variant = match typ {
            FieldType::Scalar(scalar) => match scalar {
                Scalar::Double | Scalar::Fixed64 | Scalar::Sfixed64 => "SixtyFourBit",
                Scalar::Float | Scalar::Fixed32 | Scalar::Sfixed32 => "ThirtyTwoBit",
                Scalar::String | Scalar::Bytes => "LengthDelimited",
                _ => "Varint",
            },
            FieldType::Enum(_) => "Varint",
            FieldType::Message(_) | FieldType::Map(..) => "LengthDelimited",
            FieldType::Group(_) => "StartGroup",
        };
        let variant = format_ident!("{}", variant);
        quote!(::protonic::encoding::WireType::#variant)
    }

    /// The condition under which a record belongs to the field rather
    /// than the unknown-field set. Repeated numeric fields accept both
    /// their base wire type and the packed representation.
    fn wire_type_check(&self, field: &ir::Field) -> TokenStream {
        let expected = self.expected_wire_type(&field.typ);
        let packable = match &field.typ {
            FieldType::Scalar(scalar) => scalar.can_pack(),
            FieldType::Enum(_) => true,
            _ => false,
        };
        if field.label == Label::Repeated && packable {
            quote! {
                (wire_type == #expected
                    || wire_type == ::protonic::encoding::WireType::LengthDelimited)
            }
        } else {
            quote!(wire_type == #expected)
        }
    }

    fn merge_arm(&self, message: &ir::Message, field: &ir::Field, message_name: &str) -> TokenStream {
        let tag = field.tag;
        let field_ident = format_ident!("{}", to_snake(&field.name));
        let field_name = Literal::string(&field.name);
        let message_name = Literal::string(message_name);
        let accepts = self.wire_type_check(field);
        let wrap_error = quote! {
            .map_err(|mut error| {
                error.push(#message_name, #field_name);
                error
            })
        };

        let merge = if let FieldType::Map(key, value) = &field.typ {
            let MapParts {
                map_mod,
                key_mod,
                value_merge,
                ..
            } = self.map_parts(*key, value, &message.fqn, &field.name);
            quote! {
                #map_mod::merge(
                    #key_mod::merge,
                    #value_merge,
                    &mut self.#field_ident,
                    buf,
                    ctx,
                ) #wrap_error
            }
        } else {
            let module = self.encoding_mod(&field.typ);
            if field.label == Label::Repeated {
                quote! {
                    #module::merge_repeated(wire_type, &mut self.#field_ident, buf, ctx)
                        #wrap_error
                }
            } else if self.optional(field) {
                quote! {
                    {
                        let value = self
                            .#field_ident
                            .get_or_insert_with(::core::default::Default::default);
                        #module::merge(wire_type, value, buf, ctx) #wrap_error
                    }
                }
            } else {
                quote! {
                    #module::merge(wire_type, &mut self.#field_ident, buf, ctx) #wrap_error
                }
            }
        };

        quote! {
            #tag => {
                if #accepts {
                    #merge
                } else {
                    ::protonic::Message::merge_field(
                        &mut self.unknown_fields,
                        tag,
                        wire_type,
                        buf,
                        ctx,
                    )
                }
            }
        }
    }

    /// For messages with proto2 `required` fields, the merge loop tracks
    /// which of them appeared so a strict decode can reject the input.
    fn resolve_merge_raw(&self, message: &ir::Message) -> Option<TokenStream> {
        let required: Vec<&ir::Field> = message.required_fields().collect();
        if required.is_empty() {
            return None;
        }

        let count = required.len();
        let seen_arms = required.iter().enumerate().map(|(index, field)| {
            let tag = field.tag;
            quote!(#tag => seen[#index] = true,)
        });
        let strict_checks = required.iter().enumerate().map(|(index, field)| {
            let missing = Literal::string(&format!(
                "missing required field: {}.{}",
                message.fqn.trim_start_matches('.'),
                field.name,
            ));
            quote! {
                if !seen[#index] {
                    return ::core::result::Result::Err(::protonic::DecodeError::new(#missing));
                }
            }
        });

        Some(quote! {
            fn merge_raw(
                &mut self,
                buf: &mut impl ::protonic::bytes::Buf,
                ctx: ::protonic::encoding::DecodeContext,
            ) -> ::core::result::Result<(), ::protonic::DecodeError> {
                let mut seen = [false; #count];
                while ::protonic::bytes::Buf::has_remaining(buf) {
                    let (tag, wire_type) = ::protonic::encoding::decode_key(buf)?;
                    match tag {
                        #(#seen_arms)*
                        _ => {}
                    }
                    ::protonic::Message::merge_field(self, tag, wire_type, buf, ctx.clone())?;
                }
                if ctx.is_strict() {
                    #(#strict_checks)*
                }
                ::core::result::Result::Ok(())
            }
        })
    }

    fn resolve_encoded_len(
        &self,
        message: &ir::Message,
        fields: &[&ir::Field],
        oneof_fields: &OneofFields,
    ) -> TokenStream {
        let mut terms: Vec<TokenStream> = fields
            .iter()
            .map(|field| self.encoded_len_term(message, field))
            .collect();
        for (index, oneof) in message.oneofs.iter().enumerate() {
            if oneof_fields.get_vec(&index).is_none() {
                continue;
            }
            let field_ident = format_ident!("{}", to_snake(&oneof.name));
            terms.push(quote! {
                self.#field_ident
                    .as_ref()
                    .map_or(0, |value| value.encoded_len())
            });
        }

        quote! {
            0 #(+ #terms)* + ::protonic::Message::encoded_len(&self.unknown_fields)
        }
    }

    fn encoded_len_term(&self, message: &ir::Message, field: &ir::Field) -> TokenStream {
        let tag = field.tag;
        let field_ident = format_ident!("{}", to_snake(&field.name));

        if let FieldType::Map(key, value) = &field.typ {
            let MapParts {
                map_mod,
                key_mod,
                value_len,
                ..
            } = self.map_parts(*key, value, &message.fqn, &field.name);
            return quote! {
                #map_mod::encoded_len(#key_mod::encoded_len, #value_len, #tag, &self.#field_ident)
            };
        }

        let module = self.encoding_mod(&field.typ);
        if field.label == Label::Repeated {
            return if field.packed {
                quote!(#module::encoded_len_packed(#tag, &self.#field_ident))
            } else {
                quote!(#module::encoded_len_repeated(#tag, &self.#field_ident))
            };
        }

        if self.optional(field) {
            return quote! {
                self.#field_ident
                    .as_ref()
                    .map_or(0, |value| #module::encoded_len(#tag, value))
            };
        }

        if field.label == Label::Required {
            return quote!(#module::encoded_len(#tag, &self.#field_ident));
        }

        let check = self.non_default_check(field);
        quote! {
            if #check {
                #module::encoded_len(#tag, &self.#field_ident)
            } else {
                0
            }
        }
    }

    fn resolve_clear(
        &self,
        message: &ir::Message,
        fields: &[&ir::Field],
        oneof_fields: &OneofFields,
    ) -> TokenStream {
        let mut statements: Vec<TokenStream> = Vec::with_capacity(fields.len() + 1);
        for field in fields {
            let field_ident = format_ident!("{}", to_snake(&field.name));
            let statement = match (&field.typ, field.label) {
                (FieldType::Map(..), _) | (_, Label::Repeated) => {
                    quote!(self.#field_ident.clear();)
                }
                _ if self.optional(field) => {
                    quote!(self.#field_ident = ::core::option::Option::None;)
                }
                _ => match self.default_value_expr(field) {
                    Some(default) => quote!(self.#field_ident = #default;),
                    None => {
                        quote!(self.#field_ident = ::core::default::Default::default();)
                    }
                },
            };
            statements.push(statement);
        }
        for (index, oneof) in message.oneofs.iter().enumerate() {
            if oneof_fields.get_vec(&index).is_none() {
                continue;
            }
            let field_ident = format_ident!("{}", to_snake(&oneof.name));
            statements.push(quote!(self.#field_ident = ::core::option::Option::None;));
        }
        statements.push(quote!(::protonic::Message::clear(&mut self.unknown_fields);));

        quote!(#(#statements)*)
    }

    fn resolve_default_fields(
        &self,
        message: &ir::Message,
        fields: &[&ir::Field],
        oneof_fields: &OneofFields,
    ) -> Vec<TokenStream> {
        let mut entries = Vec::new();
        for field in fields {
            let field_ident = format_ident!("{}", to_snake(&field.name));
            let value = match field.label {
                // Custom defaults apply to the plain representation only;
                // optional fields start out unset.
                Label::Required => self
                    .default_value_expr(field)
                    .unwrap_or_else(|| quote!(::core::default::Default::default())),
                _ => quote!(::core::default::Default::default()),
            };
            entries.push(quote!(#field_ident: #value));
        }
        for (index, oneof) in message.oneofs.iter().enumerate() {
            if oneof_fields.get_vec(&index).is_none() {
                continue;
            }
            let field_ident = format_ident!("{}", to_snake(&oneof.name));
            entries.push(quote!(#field_ident: ::core::option::Option::None));
        }
        entries
    }

    /// Accessors returning the declared default for unset proto2
    /// optionals.
    fn resolve_accessors(
        &self,
        message: &ir::Message,
        fields: &[&ir::Field],
        ident: &proc_macro2::Ident,
    ) -> Option<TokenStream> {
        let accessors: Vec<TokenStream> = fields
            .iter()
            .filter(|field| {
                field.default.is_some()
                    && self.optional(field)
                    && !matches!(field.typ, FieldType::Message(_) | FieldType::Group(_))
            })
            .filter_map(|field| self.resolve_accessor(message, field))
            .collect();

        if accessors.is_empty() {
            return None;
        }
        Some(quote! {
            #[allow(deprecated)]
            impl #ident {
                #(#accessors)*
            }
        })
    }

    fn resolve_accessor(&self, message: &ir::Message, field: &ir::Field) -> Option<TokenStream> {
        let field_ident = format_ident!("{}", to_snake(&field.name));
        let default = self.default_value_expr(field)?;
        let doc = format!(
            "Returns the value of `{}`, or its declared default when unset.",
            field.name,
        );

        let accessor = match &field.typ {
            FieldType::Scalar(Scalar::String) => quote! {
                #[doc = #doc]
                pub fn #field_ident(&self) -> &str {
                    self.#field_ident.as_deref().unwrap_or(#default)
                }
            },
            FieldType::Scalar(Scalar::Bytes) => quote! {
                #[doc = #doc]
                pub fn #field_ident(&self) -> &[u8] {
                    self.#field_ident.as_deref().unwrap_or(#default)
                }
            },
            FieldType::Scalar(scalar) => {
                let return_type =
                    Self::syn_type(self.scalar_rust_type(*scalar, &message.fqn, &field.name));
                quote! {
                    #[doc = #doc]
                    pub fn #field_ident(&self) -> #return_type {
                        self.#field_ident.unwrap_or(#default)
                    }
                }
            }
            FieldType::Enum(fqn) => {
                let return_type = Self::syn_type(&format!(
                    "::protonic::OpenEnum<{}>",
                    self.resolve_ident(fqn),
                ));
                quote! {
                    #[doc = #doc]
                    pub fn #field_ident(&self) -> #return_type {
                        self.#field_ident.unwrap_or(#default)
                    }
                }
            }
            _ => return None,
        };
        Some(accessor)
    }

    fn resolve_nested(
        &mut self,
        message: &ir::Message,
        oneof_fields: &OneofFields,
    ) -> Option<TokenStream> {
        let has_nested_messages = message
            .nested_messages
            .iter()
            .any(|nested| !nested.is_map_entry);
        let has_oneofs = message
            .oneofs
            .iter()
            .enumerate()
            .any(|(index, _)| oneof_fields.contains_key(&index));
        if !has_nested_messages && message.nested_enums.is_empty() && !has_oneofs {
            return None;
        }

        let module_ident = format_ident!("{}", to_snake(&message.name));
        self.type_path.push(message.name.clone());

        let nested_messages: Vec<TokenStream> = message
            .nested_messages
            .iter()
            .filter_map(|nested| self.resolve_message(nested))
            .collect();
        let nested_enums: Vec<TokenStream> = message
            .nested_enums
            .iter()
            .map(|nested| self.resolve_enum(nested))
            .collect();
        let oneof_enums: Vec<TokenStream> = message
            .oneofs
            .iter()
            .enumerate()
            .filter_map(|(index, oneof)| {
                oneof_fields
                    .get_vec(&index)
                    .map(|members| self.resolve_oneof_enum(message, oneof, members))
            })
            .collect();

        self.type_path.pop();

        let comment = format!("Nested message and enum types in `{}`.", message.name);
        Some(quote! {
            #[doc = #comment]
            pub mod #module_ident {
                #(#nested_messages)*
                #(#nested_enums)*
                #(#oneof_enums)*
            }
        })
    }

    /// The Rust expression for a field's declared `default = ...`, in the
    /// plain (unwrapped) representation. String and bytes accessors embed
    /// the borrowed literal instead.
    fn default_value_expr(&self, field: &ir::Field) -> Option<TokenStream> {
        let constant = field.default.as_ref()?;
        let expr = match &field.typ {
            FieldType::Scalar(scalar) => scalar_default_expr(*scalar, constant, self.optional(field))?,
            FieldType::Enum(fqn) => {
                let variant = match constant {
                    Constant::Ident(name) => name,
                    _ => return None,
                };
                let enum_path = self.resolve_ident(fqn);
                let enum_name = enum_path.rsplit("::").next().unwrap_or(&enum_path);
                let variant = self.enum_variant_name(enum_name, variant);
                let path = Self::syn_type(&format!("{}::{}", enum_path, variant));
                quote!(::protonic::OpenEnum::Known(#path))
            }
            _ => return None,
        };
        Some(expr)
    }
}

fn scalar_default_expr(
    scalar: Scalar,
    constant: &Constant,
    borrowed: bool,
) -> Option<TokenStream> {
    let int_value = |constant: &Constant| -> Option<i128> {
        match constant {
            Constant::U64(value) => Some(*value as i128),
            Constant::I64(value) => Some(*value as i128),
            _ => None,
        }
    };
    let float_value = |constant: &Constant| -> Option<f64> {
        match constant {
            Constant::F64(value) => Some(*value),
            Constant::U64(value) => Some(*value as f64),
            Constant::I64(value) => Some(*value as f64),
            Constant::Ident(name) if name == "inf" => Some(f64::INFINITY),
            Constant::Ident(name) if name == "nan" => Some(f64::NAN),
            _ => None,
        }
    };

    Some(match scalar {
        Scalar::Int32 | Scalar::Sint32 | Scalar::Sfixed32 => {
            let value = i32::try_from(int_value(constant)?).ok()?;
            quote!(#value)
        }
        Scalar::Int64 | Scalar::Sint64 | Scalar::Sfixed64 => {
            let value = i64::try_from(int_value(constant)?).ok()?;
            quote!(#value)
        }
        Scalar::Uint32 | Scalar::Fixed32 => {
            let value = u32::try_from(int_value(constant)?).ok()?;
            quote!(#value)
        }
        Scalar::Uint64 | Scalar::Fixed64 => {
            let value = u64::try_from(int_value(constant)?).ok()?;
            quote!(#value)
        }
        Scalar::Float => {
            let value = float_value(constant)? as f32;
            if value.is_nan() {
                quote!(f32::NAN)
            } else if value == f32::INFINITY {
                quote!(f32::INFINITY)
            } else if value == f32::NEG_INFINITY {
                quote!(f32::NEG_INFINITY)
            } else {
                quote!(#value)
            }
        }
        Scalar::Double => {
            let value = float_value(constant)?;
            if value.is_nan() {
                quote!(f64::NAN)
            } else if value == f64::INFINITY {
                quote!(f64::INFINITY)
            } else if value == f64::NEG_INFINITY {
                quote!(f64::NEG_INFINITY)
            } else {
                quote!(#value)
            }
        }
        Scalar::Bool => match constant {
            Constant::Bool(value) => quote!(#value),
            _ => return None,
        },
        Scalar::String => match constant {
            Constant::Str(value) => {
                if borrowed {
                    quote!(#value)
                } else {
                    quote!(::std::string::String::from(#value))
                }
            }
            _ => return None,
        },
        Scalar::Bytes => match constant {
            Constant::Str(value) => {
                // Escapes were decoded as chars in the 0..=255 range; map
                // them back to raw bytes.
                let bytes: Vec<u8> = value.chars().map(|ch| ch as u8).collect();
                let literal = Literal::byte_string(&bytes);
                if borrowed {
                    quote!(&#literal[..])
                } else {
                    quote!(#literal.to_vec())
                }
            }
            _ => return None,
        },
    })
}
