use super::*;

impl CodeGenerator<'_> {
    /// Emits the enum for one oneof, with inherent codec methods the
    /// parent message's `Message` impl dispatches into.
    ///
    /// Called with `type_path` already inside the message's nested module.
    pub(super) fn resolve_oneof_enum(
        &self,
        message: &ir::Message,
        oneof: &ir::Oneof,
        members: &[&ir::Field],
    ) -> TokenStream {
        debug!("    oneof: {:?}", oneof.name);
        let enum_ident = format_ident!("{}", to_upper_camel(&oneof.name));

        let variants = members.iter().map(|field| {
            let variant_ident = format_ident!("{}", to_upper_camel(&field.name));
            let boxed = self.should_box_field(field, &message.fqn);
            let mut inner = self.resolve_type(&field.typ, &message.fqn, &field.name);
            if boxed {
                inner = format!("::std::boxed::Box<{}>", inner);
            }
            let inner_type = Self::syn_type(&inner);
            let maybe_deprecated = field.deprecated.then_some(quote!(#[deprecated]));
            quote! {
                #maybe_deprecated
                #variant_ident(#inner_type)
            }
        });

        let encode_arms = members.iter().map(|field| {
            let variant_ident = format_ident!("{}", to_upper_camel(&field.name));
            let tag = field.tag;
            let module = self.encoding_mod(&field.typ);
            quote!(#enum_ident::#variant_ident(value) => #module::encode(#tag, value, buf))
        });

        let merge_arms = members.iter().map(|field| {
            let variant_ident = format_ident!("{}", to_upper_camel(&field.name));
            let tag = field.tag;
            let module = self.encoding_mod(&field.typ);
            quote! {
                #tag => match field {
                    ::core::option::Option::Some(#enum_ident::#variant_ident(value)) => {
                        #module::merge(wire_type, value, buf, ctx)
                    }
                    _ => {
                        let mut owned = ::core::default::Default::default();
                        #module::merge(wire_type, &mut owned, buf, ctx).map(|_| {
                            *field = ::core::option::Option::Some(
                                #enum_ident::#variant_ident(owned),
                            );
                        })
                    }
                },
            }
        });

        let len_arms = members.iter().map(|field| {
            let variant_ident = format_ident!("{}", to_upper_camel(&field.name));
            let tag = field.tag;
            let module = self.encoding_mod(&field.typ);
            quote!(#enum_ident::#variant_ident(value) => #module::encoded_len(#tag, value))
        });

        quote! {
            #[allow(clippy::derive_partial_eq_without_eq)]
            #[derive(Clone, PartialEq, Debug)]
            pub enum #enum_ident {
                #(#variants,)*
            }

            impl #enum_ident {
                /// Encodes the selected variant to the buffer.
                pub fn encode(&self, buf: &mut impl ::protonic::bytes::BufMut) {
                    match self {
                        #(#encode_arms,)*
                    }
                }

                /// Merges one record into `field`, replacing whichever
                /// variant was previously selected.
                pub fn merge(
                    field: &mut ::core::option::Option<#enum_ident>,
                    tag: u32,
                    wire_type: ::protonic::encoding::WireType,
                    buf: &mut impl ::protonic::bytes::Buf,
                    ctx: ::protonic::encoding::DecodeContext,
                ) -> ::core::result::Result<(), ::protonic::DecodeError> {
                    match tag {
                        #(#merge_arms)*
                        _ => unreachable!("invalid oneof tag: {}", tag),
                    }
                }

                /// The encoded length of the selected variant.
                pub fn encoded_len(&self) -> usize {
                    match self {
                        #(#len_arms,)*
                    }
                }
            }
        }
    }
}
