/// Static description of one RPC method, emitted by the code generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// The method name as declared in the `.proto` file.
    pub name: &'static str,
    /// The full dispatch path, `/package.Service/Method`.
    pub path: &'static str,
    /// Whether the client sends a stream of requests.
    pub client_streaming: bool,
    /// Whether the server sends a stream of responses.
    pub server_streaming: bool,
}

/// Static description of a service, emitted by the code generator.
///
/// Transports use the descriptor to route incoming paths to server trait
/// methods and to validate streaming shapes.
#[derive(Clone, Copy, Debug)]
pub struct ServiceDescriptor {
    /// The fully qualified service name, `package.Service`.
    pub name: &'static str,
    pub methods: &'static [MethodDescriptor],
}

impl ServiceDescriptor {
    /// Looks up a method by its `.proto` name.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Looks up a method by its full dispatch path.
    pub fn method_by_path(&self, path: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETER: ServiceDescriptor = ServiceDescriptor {
        name: "demo.Greeter",
        methods: &[MethodDescriptor {
            name: "SayHello",
            path: "/demo.Greeter/SayHello",
            client_streaming: false,
            server_streaming: false,
        }],
    };

    #[test]
    fn lookup_by_name_and_path() {
        assert_eq!(GREETER.method("SayHello").unwrap().path, "/demo.Greeter/SayHello");
        assert!(GREETER.method("Missing").is_none());
        assert_eq!(
            GREETER.method_by_path("/demo.Greeter/SayHello").unwrap().name,
            "SayHello"
        );
    }
}
