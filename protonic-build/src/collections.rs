/// The map collection type to generate for map fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapType {
    /// The [`std::collections::HashMap`] type.
    #[default]
    HashMap,
    /// The [`std::collections::BTreeMap`] type.
    BTreeMap,
}

impl MapType {
    /// The fully qualified Rust type to generate.
    pub fn rust_type(&self) -> &'static str {
        match self {
            MapType::HashMap => "::std::collections::HashMap",
            MapType::BTreeMap => "::std::collections::BTreeMap",
        }
    }

    /// The runtime encoding module backing the map type.
    pub fn encoding_module(&self) -> &'static str {
        match self {
            MapType::HashMap => "hash_map",
            MapType::BTreeMap => "btree_map",
        }
    }
}

/// The bytes collection type to generate for `bytes` fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BytesType {
    /// The [`Vec<u8>`] type.
    #[default]
    Vec,
    /// The [`bytes::Bytes`] type.
    Bytes,
}

impl BytesType {
    /// The fully qualified Rust type to generate.
    pub fn rust_type(&self) -> &'static str {
        match self {
            BytesType::Vec => "::std::vec::Vec<u8>",
            BytesType::Bytes => "::protonic::bytes::Bytes",
        }
    }
}
