use std::collections::{HashMap, HashSet};

use proc_macro2::Literal;

use super::*;
use crate::ident::strip_enum_prefix;

impl CodeGenerator<'_> {
    pub(super) fn push_enums(&mut self, enums: &[ir::Enum]) {
        for enumeration in enums {
            let resolved_enum = self.resolve_enum(enumeration);
            self.buf.push_str(&resolved_enum.to_string());
        }
    }

    pub(super) fn resolve_enum(&self, enumeration: &ir::Enum) -> TokenStream {
        debug!("  enum: {:?}", enumeration.name);

        let enum_name = to_upper_camel(&enumeration.name);
        let enum_ident = format_ident!("{}", enum_name);
        let mappings = build_enum_value_mappings(
            &enum_name,
            self.config.strip_enum_prefix,
            &enumeration.values,
        );

        let variants = mappings.iter().map(|mapping| {
            let ident = format_ident!("{}", mapping.variant_name);
            let number = Literal::i32_unsuffixed(mapping.number);
            quote!(#ident = #number)
        });
        let str_arms = mappings.iter().map(|mapping| {
            let ident = format_ident!("{}", mapping.variant_name);
            let proto_name = Literal::string(mapping.proto_name);
            quote!(#enum_ident::#ident => #proto_name)
        });
        let from_str_arms = mappings.iter().map(|mapping| {
            let ident = format_ident!("{}", mapping.variant_name);
            let proto_name = Literal::string(mapping.proto_name);
            quote!(#proto_name => ::core::option::Option::Some(Self::#ident))
        });
        let try_from_arms = mappings.iter().map(|mapping| {
            let ident = format_ident!("{}", mapping.variant_name);
            let number = Literal::i32_unsuffixed(mapping.number);
            quote!(#number => ::core::result::Result::Ok(#enum_ident::#ident))
        });
        let first_ident = format_ident!("{}", mappings[0].variant_name);

        quote! {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
            #[repr(i32)]
            pub enum #enum_ident {
                #(#variants,)*
            }

            impl #enum_ident {
                /// String value of the enum field names used in the ProtoBuf
                /// definition.
                ///
                /// The values are not transformed in any way and thus are
                /// considered stable (if the ProtoBuf definition does not
                /// change) and safe for programmatic use.
                pub fn as_str_name(&self) -> &'static str {
                    match self {
                        #(#str_arms,)*
                    }
                }

                /// Creates an enum from field names used in the ProtoBuf
                /// definition.
                pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
                    match value {
                        #(#from_str_arms,)*
                        _ => ::core::option::Option::None,
                    }
                }
            }

            impl ::core::default::Default for #enum_ident {
                fn default() -> Self {
                    #enum_ident::#first_ident
                }
            }

            impl ::core::convert::From<#enum_ident> for i32 {
                fn from(value: #enum_ident) -> i32 {
                    value as i32
                }
            }

            impl ::core::convert::TryFrom<i32> for #enum_ident {
                type Error = ::protonic::UnknownEnumValue;

                fn try_from(
                    value: i32,
                ) -> ::core::result::Result<#enum_ident, ::protonic::UnknownEnumValue> {
                    match value {
                        #(#try_from_arms,)*
                        _ => ::core::result::Result::Err(::protonic::UnknownEnumValue(value)),
                    }
                }
            }
        }
    }

    /// The generated variant name for one enum value.
    pub(super) fn enum_variant_name(&self, enum_name: &str, value_name: &str) -> String {
        let variant = to_upper_camel(value_name);
        if self.config.strip_enum_prefix {
            strip_enum_prefix(enum_name, &variant)
        } else {
            variant
        }
    }
}

struct EnumVariantMapping<'a> {
    proto_name: &'a str,
    number: i32,
    variant_name: String,
}

fn build_enum_value_mappings<'a>(
    generated_enum_name: &str,
    do_strip_enum_prefix: bool,
    enum_values: &'a [ir::EnumValue],
) -> Vec<EnumVariantMapping<'a>> {
    let mut numbers = HashSet::new();
    let mut generated_names = HashMap::new();
    let mut mappings = Vec::new();

    for value in enum_values {
        // Skip duplicate enum values. Protobuf allows this when the
        // 'allow_alias' option is set.
        if !numbers.insert(value.number) {
            continue;
        }

        let mut variant_name = to_upper_camel(&value.name);
        if do_strip_enum_prefix {
            variant_name = strip_enum_prefix(generated_enum_name, &variant_name);
        }

        if let Some(other) = generated_names.insert(variant_name.clone(), value.name.as_str()) {
            panic!(
                "Generated enum variant names overlap: `{}` variant name to be used both by `{}` and `{}` ProtoBuf enum values",
                variant_name, other, value.name
            );
        }

        mappings.push(EnumVariantMapping {
            proto_name: &value.name,
            number: value.number,
            variant_name,
        });
    }
    mappings
}
