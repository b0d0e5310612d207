#![doc(html_root_url = "https://docs.rs/protonic-build/0.1.0")]

//! `protonic-build` compiles `.proto` schema files into Rust, without
//! `protoc` or any other external tool: the lexer, parser, linker, and
//! code generator are all in-process.
//!
//! `protonic-build` is designed to be used for build-time code generation
//! as part of a Cargo build-script.
//!
//! ## Example
//!
//! Add `protonic` (and `protonic-rpc`, when services are generated) to
//! `Cargo.toml`, and `protonic-build` to the build-dependencies. Then, in
//! the crate's `build.rs`:
//!
//! ```rust,no_run
//! fn main() -> std::io::Result<()> {
//!     protonic_build::compile_protos(&["src/items.proto"], &["src/"])
//! }
//! ```
//!
//! And finally include the generated module, named after the protobuf
//! package:
//!
//! ```rust,ignore
//! pub mod items {
//!     include!(concat!(env!("OUT_DIR"), "/snazzy.items.rs"));
//! }
//! ```
//!
//! Each protobuf package maps to one generated `.rs` file; the empty
//! package maps to `_.rs` unless overridden with
//! [`Config::default_package_filename`].

pub mod ast;
pub mod ir;
pub mod lexer;
pub mod linker;
pub mod parser;

mod code_generator;
mod collections;
mod ident;
mod message_graph;
mod module;

use std::collections::{HashMap, HashSet, VecDeque};
use std::env;
use std::fs;
use std::io::{Error, ErrorKind, Result, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::code_generator::CodeGenerator;
use crate::collections::{BytesType, MapType};
use crate::ident::match_ident;
use crate::linker::LinkError;
use crate::message_graph::MessageGraph;
use crate::module::Module;
use crate::parser::ParseError;

/// The smallest legal field number.
pub const MIN_TAG: u32 = 1;
/// The largest legal field number, `2^29 - 1`.
pub const MAX_TAG: u32 = (1 << 29) - 1;
/// First field number of the range reserved for the wire format itself.
pub const RESERVED_TAG_START: u32 = 19000;
/// Last field number of the range reserved for the wire format itself.
pub const RESERVED_TAG_END: u32 = 19999;

/// Configuration options for Protobuf code generation.
///
/// This configuration builder can be used to set non-default code
/// generation options.
pub struct Config {
    btree_map: Vec<String>,
    bytes: Vec<String>,
    build_clients: bool,
    build_servers: bool,
    strip_enum_prefix: bool,
    import_paths: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    default_package_filename: String,
}

impl Config {
    /// Creates a new code generator configuration with default options.
    pub fn new() -> Config {
        Config::default()
    }

    /// Configure the code generator to generate Rust [`BTreeMap`][1]
    /// fields for Protobuf [`map`][2] type fields.
    ///
    /// **`paths`** - paths to specific fields, messages, or packages which
    /// should use a Rust `BTreeMap` for Protobuf `map` fields. Paths are
    /// specified in terms of the Protobuf type name (not the generated
    /// Rust type name). Paths with a leading `.` are treated as fully
    /// qualified names; paths without one are suffix-matched on the fully
    /// qualified field name.
    ///
    /// [1]: https://doc.rust-lang.org/std/collections/struct.BTreeMap.html
    /// [2]: https://protobuf.dev/programming-guides/proto3/#maps
    pub fn btree_map<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.btree_map = paths.into_iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Configure the code generator to generate Rust [`bytes::Bytes`][1]
    /// fields for Protobuf `bytes` type fields. Paths match as in
    /// [`Config::btree_map`].
    ///
    /// [1]: https://docs.rs/bytes/latest/bytes/struct.Bytes.html
    pub fn bytes<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.bytes = paths.into_iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Enable or disable generated RPC clients. Enabled by default;
    /// generated clients depend on the `protonic-rpc` crate.
    pub fn build_clients(&mut self, enable: bool) -> &mut Self {
        self.build_clients = enable;
        self
    }

    /// Enable or disable generated RPC server traits. Enabled by default;
    /// generated servers depend on the `protonic-rpc` crate.
    pub fn build_servers(&mut self, enable: bool) -> &mut Self {
        self.build_servers = enable;
        self
    }

    /// Enable or disable stripping an enum's name from the prefix of its
    /// variant names. Enabled by default.
    pub fn strip_enum_prefix(&mut self, enable: bool) -> &mut Self {
        self.strip_enum_prefix = enable;
        self
    }

    /// Adds a directory to resolve imports against, in addition to the
    /// include paths given per compile call.
    pub fn import_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.import_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory. Defaults to the `OUT_DIR` build-script
    /// environment variable.
    pub fn out_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the filename (without the `.rs` extension) used for types in
    /// the empty package.
    pub fn default_package_filename(&mut self, filename: impl Into<String>) -> &mut Self {
        self.default_package_filename = filename.into();
        self
    }

    /// Compile `.proto` files into Rust files during a Cargo build with
    /// additional code generator configuration options.
    ///
    /// Any transitively imported `.proto` file is compiled as well, as
    /// long as it is found under one of the `includes` roots.
    pub fn compile_protos(
        &self,
        protos: &[impl AsRef<Path>],
        includes: &[impl AsRef<Path>],
    ) -> Result<()> {
        let mut include_paths: Vec<PathBuf> = includes
            .iter()
            .map(|include| include.as_ref().to_path_buf())
            .collect();
        include_paths.extend(self.import_paths.iter().cloned());

        let roots: Vec<PathBuf> = protos
            .iter()
            .map(|proto| proto.as_ref().to_path_buf())
            .collect();
        self.compile(&roots, &include_paths)
    }

    /// Discovers every `*.proto` file under `proto_sources` (recursively)
    /// and compiles the whole set. `proto_sources` doubles as an import
    /// resolution root, together with any [`Config::import_path`] roots.
    pub fn compile_proto_sources(&self, proto_sources: impl AsRef<Path>) -> Result<()> {
        let proto_sources = proto_sources.as_ref();
        let mut roots = Vec::new();
        discover_protos(proto_sources, &mut roots)?;
        roots.sort();
        if roots.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("no .proto files found under {}", proto_sources.display()),
            ));
        }

        let mut include_paths = vec![proto_sources.to_path_buf()];
        include_paths.extend(self.import_paths.iter().cloned());
        self.compile(&roots, &include_paths)
    }

    fn compile(&self, roots: &[PathBuf], includes: &[PathBuf]) -> Result<()> {
        let target = match &self.out_dir {
            Some(out_dir) => out_dir.clone(),
            None => match env::var_os("OUT_DIR") {
                Some(out_dir) => PathBuf::from(out_dir),
                None => {
                    return Err(Error::new(
                        ErrorKind::Other,
                        "OUT_DIR environment variable is not set",
                    ))
                }
            },
        };

        let (files, sources) = load_files(roots, includes)?;
        let schema = linker::link(&files).map_err(|error| link_error_to_io(&sources, error))?;
        reject_groups(&schema)?;

        let modules = self.generate(&schema)?;
        for (module, content) in modules {
            let file_name = module.to_file_name_or(&self.default_package_filename);
            let path = target.join(file_name);
            debug!("writing: {:?}", path);
            let mut file = fs::File::create(path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
        }

        Ok(())
    }

    fn generate(&self, schema: &ir::Schema) -> Result<Vec<(Module, String)>> {
        let message_graph = MessageGraph::new(schema);

        let mut modules: Vec<(Module, String)> = Vec::new();
        for file in &schema.files {
            let module = Module::from_protobuf_package_name(&file.package);
            let index = match modules.iter().position(|(existing, _)| *existing == module) {
                Some(index) => index,
                None => {
                    modules.push((module, String::new()));
                    modules.len() - 1
                }
            };
            CodeGenerator::generate(self, &message_graph, file, &mut modules[index].1);
        }
        modules.retain(|(_, content)| !content.is_empty());

        #[cfg(feature = "format")]
        for (module, content) in &mut modules {
            let file = syn::parse_file(content).map_err(|error| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("generated module {} does not parse: {}", module, error),
                )
            })?;
            *content = prettyplease::unparse(&file);
        }

        Ok(modules)
    }

    pub(crate) fn map_type(&self, fq_message_name: &str, field_name: &str) -> MapType {
        if self
            .btree_map
            .iter()
            .any(|matcher| match_ident(matcher, fq_message_name, Some(field_name)))
        {
            MapType::BTreeMap
        } else {
            MapType::HashMap
        }
    }

    pub(crate) fn bytes_type(&self, fq_message_name: &str, field_name: &str) -> BytesType {
        if self
            .bytes
            .iter()
            .any(|matcher| match_ident(matcher, fq_message_name, Some(field_name)))
        {
            BytesType::Bytes
        } else {
            BytesType::Vec
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            btree_map: Vec::new(),
            bytes: Vec::new(),
            build_clients: true,
            build_servers: true,
            strip_enum_prefix: true,
            import_paths: Vec::new(),
            out_dir: None,
            default_package_filename: "_".to_string(),
        }
    }
}

/// Compile `.proto` files into Rust files during a Cargo build.
///
/// The generated `.rs` files are written to the Cargo `OUT_DIR` directory,
/// suitable for use with the [include!][1] macro.
///
/// **`protos`** - paths to `.proto` files to compile. Any transitively
/// imported `.proto` file is compiled as well.
///
/// **`includes`** - directories to search for imports. Directories are
/// searched in order; the `.proto` files passed in `protos` should live
/// under one of them so their import names can be derived.
///
/// [1]: https://doc.rust-lang.org/std/macro.include.html
pub fn compile_protos(protos: &[impl AsRef<Path>], includes: &[impl AsRef<Path>]) -> Result<()> {
    Config::new().compile_protos(protos, includes)
}

fn discover_protos(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            discover_protos(&path, out)?;
        } else if path.extension().map_or(false, |ext| ext == "proto") {
            out.push(path);
        }
    }
    Ok(())
}

/// Parses the root files and every transitive import, exactly once each.
/// Returns the parsed files along with their sources for diagnostics.
fn load_files(
    roots: &[PathBuf],
    includes: &[PathBuf],
) -> Result<(Vec<ast::File>, HashMap<String, String>)> {
    let mut queue: VecDeque<(String, PathBuf)> = roots
        .iter()
        .map(|path| (import_name_of(path, includes), path.clone()))
        .collect();
    let mut loaded: HashSet<String> = HashSet::new();
    let mut files = Vec::new();
    let mut sources = HashMap::new();

    while let Some((name, path)) = queue.pop_front() {
        if !loaded.insert(name.clone()) {
            continue;
        }
        let src = fs::read_to_string(&path).map_err(|error| {
            Error::new(
                error.kind(),
                format!("failed to read {}: {}", path.display(), error),
            )
        })?;
        let file =
            parser::parse(&name, &src).map_err(|error| parse_error_to_io(&name, &src, error))?;

        for import in &file.imports {
            if loaded.contains(&import.path) {
                continue;
            }
            let resolved = resolve_import(&import.path, includes).ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    format!(
                        "{}: import \"{}\" was not found in any include path",
                        name, import.path
                    ),
                )
            })?;
            queue.push_back((import.path.clone(), resolved));
        }

        sources.insert(name, src);
        files.push(file);
    }

    Ok((files, sources))
}

/// Derives a file's import-path name by stripping the include root it
/// lives under.
fn import_name_of(path: &Path, includes: &[PathBuf]) -> String {
    for include in includes {
        if let Ok(stripped) = path.strip_prefix(include) {
            return path_to_import_name(stripped);
        }
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn path_to_import_name(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn resolve_import(import: &str, includes: &[PathBuf]) -> Option<PathBuf> {
    includes
        .iter()
        .map(|include| include.join(import))
        .find(|candidate| candidate.is_file())
}

/// Groups survive parsing and linking for wire compatibility, but no Rust
/// code is generated for them.
fn reject_groups(schema: &ir::Schema) -> Result<()> {
    let mut found: Option<(String, String)> = None;
    schema.for_each_message(|message| {
        if found.is_some() {
            return;
        }
        for field in &message.fields {
            if matches!(field.typ, ir::FieldType::Group(_)) {
                found = Some((message.fqn.clone(), field.name.clone()));
                return;
            }
        }
    });

    match found {
        Some((fqn, field)) => Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "group fields are not supported by the code generator: {}.{}",
                fqn.trim_start_matches('.'),
                field
            ),
        )),
        None => Ok(()),
    }
}

fn parse_error_to_io(name: &str, src: &str, error: ParseError) -> Error {
    let (line, column) = error.span.location(src);
    Error::new(
        ErrorKind::InvalidData,
        format!("{}:{}:{}: {}", name, line, column, error),
    )
}

fn link_error_to_io(sources: &HashMap<String, String>, error: LinkError) -> Error {
    let location = error
        .span
        .and_then(|span| sources.get(&error.file).map(|src| span.location(src)));
    let message = match location {
        Some((line, column)) => format!("{}:{}:{}: {}", error.file, line, column, error.kind),
        None => error.to_string(),
    };
    Error::new(ErrorKind::InvalidData, message)
}
