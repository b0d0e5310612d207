use proc_macro2::Literal;

use super::*;

impl CodeGenerator<'_> {
    pub(super) fn push_services(&mut self, services: &[ir::Service]) {
        if !self.config.build_clients && !self.config.build_servers {
            return;
        }
        for service in services {
            let resolved_service = self.resolve_service(service);
            self.buf.push_str(&resolved_service.to_string());
        }
    }

    fn resolve_service(&self, service: &ir::Service) -> TokenStream {
        debug!("  service: {:?}", service.name);

        let module_ident = format_ident!("{}", to_snake(&service.name));
        let service_fqn = service.fqn.trim_start_matches('.').to_owned();

        let descriptors = service.methods.iter().map(|method| {
            let name = Literal::string(&method.name);
            let path = Literal::string(&format!("/{}/{}", service_fqn, method.name));
            let client_streaming = method.client_streaming;
            let server_streaming = method.server_streaming;
            quote! {
                ::protonic_rpc::MethodDescriptor {
                    name: #name,
                    path: #path,
                    client_streaming: #client_streaming,
                    server_streaming: #server_streaming,
                }
            }
        });
        let service_name = Literal::string(&service_fqn);

        let server = self
            .config
            .build_servers
            .then(|| self.resolve_server(service));
        let client = self
            .config
            .build_clients
            .then(|| self.resolve_client(service, &service_fqn));

        let comment = format!(
            "Generated descriptor, server trait, and client for `{}`.",
            service_fqn,
        );
        quote! {
            #[doc = #comment]
            pub mod #module_ident {
                pub const SERVICE: ::protonic_rpc::ServiceDescriptor =
                    ::protonic_rpc::ServiceDescriptor {
                        name: #service_name,
                        methods: &[
                            #(#descriptors,)*
                        ],
                    };

                #server

                #client
            }
        }
    }

    /// The request/response Rust path for a method type, as seen from
    /// inside the service module (one level below the package module).
    fn method_type_path(&self, fqn: &str) -> syn::Type {
        Self::syn_type(&format!("super::{}", self.resolve_ident(fqn)))
    }

    fn resolve_server(&self, service: &ir::Service) -> TokenStream {
        let trait_ident = format_ident!("{}", to_upper_camel(&service.name));
        let methods = service.methods.iter().map(|method| {
            let method_ident = format_ident!("{}", to_snake(&method.name));
            let input = self.method_type_path(&method.input_type);
            let output = self.method_type_path(&method.output_type);
            match (method.client_streaming, method.server_streaming) {
                (false, false) => quote! {
                    async fn #method_ident(
                        &self,
                        request: #input,
                    ) -> ::core::result::Result<#output, ::protonic_rpc::Status>;
                },
                (false, true) => quote! {
                    async fn #method_ident(
                        &self,
                        request: #input,
                        responses: ::protonic_rpc::SendStream<#output>,
                    ) -> ::core::result::Result<(), ::protonic_rpc::Status>;
                },
                (true, false) => quote! {
                    async fn #method_ident(
                        &self,
                        requests: ::protonic_rpc::RecvStream<#input>,
                    ) -> ::core::result::Result<#output, ::protonic_rpc::Status>;
                },
                (true, true) => quote! {
                    async fn #method_ident(
                        &self,
                        requests: ::protonic_rpc::RecvStream<#input>,
                        responses: ::protonic_rpc::SendStream<#output>,
                    ) -> ::core::result::Result<(), ::protonic_rpc::Status>;
                },
            }
        });

        let comment = format!("Server-side handler trait for `{}`.", service.name);
        quote! {
            #[doc = #comment]
            #[::protonic_rpc::async_trait]
            pub trait #trait_ident: ::core::marker::Send + ::core::marker::Sync + 'static {
                #(#methods)*
            }
        }
    }

    fn resolve_client(&self, service: &ir::Service, service_fqn: &str) -> TokenStream {
        let client_ident = format_ident!("{}Client", to_upper_camel(&service.name));
        let methods = service.methods.iter().map(|method| {
            let method_ident = format_ident!("{}", to_snake(&method.name));
            let input = self.method_type_path(&method.input_type);
            let output = self.method_type_path(&method.output_type);
            let path = Literal::string(&format!("/{}/{}", service_fqn, method.name));
            match (method.client_streaming, method.server_streaming) {
                (false, false) => quote! {
                    pub async fn #method_ident(
                        &self,
                        request: &#input,
                    ) -> ::core::result::Result<#output, ::protonic_rpc::Status> {
                        let payload = ::protonic::bytes::Bytes::from(
                            ::protonic::Message::encode_to_vec(request),
                        );
                        let response = self.channel.unary(#path, payload).await?;
                        <#output as ::protonic::Message>::decode(response)
                            .map_err(|error| ::protonic_rpc::Status::internal(error.to_string()))
                    }
                },
                (false, true) => quote! {
                    pub async fn #method_ident(
                        &self,
                        request: &#input,
                    ) -> ::core::result::Result<
                        ::protonic_rpc::DecodeStream<#output>,
                        ::protonic_rpc::Status,
                    > {
                        let payload = ::protonic::bytes::Bytes::from(
                            ::protonic::Message::encode_to_vec(request),
                        );
                        let responses = self.channel.server_streaming(#path, payload).await?;
                        ::core::result::Result::Ok(::protonic_rpc::DecodeStream::new(responses))
                    }
                },
                (true, false) => quote! {
                    pub fn #method_ident(
                        &self,
                    ) -> (
                        ::protonic_rpc::EncodeSink<#input>,
                        ::protonic_rpc::BoxFuture<
                            'static,
                            ::core::result::Result<#output, ::protonic_rpc::Status>,
                        >,
                    ) {
                        let (requests, response) = self.channel.client_streaming(#path);
                        let response: ::protonic_rpc::BoxFuture<
                            'static,
                            ::core::result::Result<#output, ::protonic_rpc::Status>,
                        > = ::std::boxed::Box::pin(async move {
                            let payload = response.await?;
                            <#output as ::protonic::Message>::decode(payload).map_err(|error| {
                                ::protonic_rpc::Status::internal(error.to_string())
                            })
                        });
                        (::protonic_rpc::EncodeSink::new(requests), response)
                    }
                },
                (true, true) => quote! {
                    pub fn #method_ident(
                        &self,
                    ) -> (
                        ::protonic_rpc::EncodeSink<#input>,
                        ::protonic_rpc::DecodeStream<#output>,
                    ) {
                        let (requests, responses) = self.channel.bidi_streaming(#path);
                        (
                            ::protonic_rpc::EncodeSink::new(requests),
                            ::protonic_rpc::DecodeStream::new(responses),
                        )
                    }
                },
            }
        });

        let comment = format!(
            "Client for `{}`, generic over the transport channel.",
            service_fqn,
        );
        quote! {
            #[doc = #comment]
            #[derive(Debug, Clone)]
            pub struct #client_ident<C> {
                channel: C,
            }

            impl<C> #client_ident<C>
            where
                C: ::protonic_rpc::Channel,
            {
                /// Creates a client over a caller-owned channel.
                pub fn new(channel: C) -> Self {
                    Self { channel }
                }

                #(#methods)*
            }
        }
    }
}
