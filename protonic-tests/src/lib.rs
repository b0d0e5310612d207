//! Message and service types written in the exact shape `protonic-build`
//! emits, used to exercise the runtime end to end without a build script.

/// proto3: `message ScalarMessage { int32 a = 1; string b = 2; }`
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, Debug)]
pub struct ScalarMessage {
    pub a: i32,
    pub b: ::std::string::String,
    pub unknown_fields: ::protonic::UnknownFieldSet,
}

impl ::protonic::Message for ScalarMessage {
    fn encode_raw(&self, buf: &mut impl ::protonic::bytes::BufMut) {
        if self.a != 0 {
            ::protonic::encoding::int32::encode(1u32, &self.a, buf);
        }
        if !self.b.is_empty() {
            ::protonic::encoding::string::encode(2u32, &self.b, buf);
        }
        ::protonic::Message::encode_raw(&self.unknown_fields, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: ::protonic::encoding::WireType,
        buf: &mut impl ::protonic::bytes::Buf,
        ctx: ::protonic::encoding::DecodeContext,
    ) -> ::core::result::Result<(), ::protonic::DecodeError> {
        match tag {
            1u32 => {
                if wire_type == ::protonic::encoding::WireType::Varint {
                    ::protonic::encoding::int32::merge(wire_type, &mut self.a, buf, ctx).map_err(
                        |mut error| {
                            error.push("ScalarMessage", "a");
                            error
                        },
                    )
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
            2u32 => {
                if wire_type == ::protonic::encoding::WireType::LengthDelimited {
                    ::protonic::encoding::string::merge(wire_type, &mut self.b, buf, ctx).map_err(
                        |mut error| {
                            error.push("ScalarMessage", "b");
                            error
                        },
                    )
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
            _ => ::protonic::Message::merge_field(&mut self.unknown_fields, tag, wire_type, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        0 + (if self.a != 0 {
            ::protonic::encoding::int32::encoded_len(1u32, &self.a)
        } else {
            0
        }) + (if !self.b.is_empty() {
            ::protonic::encoding::string::encoded_len(2u32, &self.b)
        } else {
            0
        }) + ::protonic::Message::encoded_len(&self.unknown_fields)
    }

    fn clear(&mut self) {
        self.a = ::core::default::Default::default();
        self.b = ::core::default::Default::default();
        ::protonic::Message::clear(&mut self.unknown_fields);
    }
}

impl ::core::default::Default for ScalarMessage {
    fn default() -> Self {
        ScalarMessage {
            a: ::core::default::Default::default(),
            b: ::core::default::Default::default(),
            unknown_fields: ::protonic::UnknownFieldSet::new(),
        }
    }
}

/// proto3: `message PackedMessage { repeated int32 xs = 3; }`
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, Debug)]
pub struct PackedMessage {
    pub xs: ::std::vec::Vec<i32>,
    pub unknown_fields: ::protonic::UnknownFieldSet,
}

impl ::protonic::Message for PackedMessage {
    fn encode_raw(&self, buf: &mut impl ::protonic::bytes::BufMut) {
        ::protonic::encoding::int32::encode_packed(3u32, &self.xs, buf);
        ::protonic::Message::encode_raw(&self.unknown_fields, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: ::protonic::encoding::WireType,
        buf: &mut impl ::protonic::bytes::Buf,
        ctx: ::protonic::encoding::DecodeContext,
    ) -> ::core::result::Result<(), ::protonic::DecodeError> {
        match tag {
            3u32 => {
                if wire_type == ::protonic::encoding::WireType::Varint
                    || wire_type == ::protonic::encoding::WireType::LengthDelimited
                {
                    ::protonic::encoding::int32::merge_repeated(wire_type, &mut self.xs, buf, ctx)
                        .map_err(|mut error| {
                            error.push("PackedMessage", "xs");
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
            _ => ::protonic::Message::merge_field(&mut self.unknown_fields, tag, wire_type, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        0 + ::protonic::encoding::int32::encoded_len_packed(3u32, &self.xs)
            + ::protonic::Message::encoded_len(&self.unknown_fields)
    }

    fn clear(&mut self) {
        self.xs.clear();
        ::protonic::Message::clear(&mut self.unknown_fields);
    }
}

impl ::core::default::Default for PackedMessage {
    fn default() -> Self {
        PackedMessage {
            xs: ::core::default::Default::default(),
            unknown_fields: ::protonic::UnknownFieldSet::new(),
        }
    }
}

/// proto3: `message MapMessage { map<string, int32> m = 1; }`
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, Debug)]
pub struct MapMessage {
    pub m: ::std::collections::HashMap<::std::string::String, i32>,
    pub unknown_fields: ::protonic::UnknownFieldSet,
}

impl ::protonic::Message for MapMessage {
    fn encode_raw(&self, buf: &mut impl ::protonic::bytes::BufMut) {
        ::protonic::encoding::hash_map::encode(
            ::protonic::encoding::string::encode,
            ::protonic::encoding::string::encoded_len,
            ::protonic::encoding::int32::encode,
            ::protonic::encoding::int32::encoded_len,
            1u32,
            &self.m,
            buf,
        );
        ::protonic::Message::encode_raw(&self.unknown_fields, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: ::protonic::encoding::WireType,
        buf: &mut impl ::protonic::bytes::Buf,
        ctx: ::protonic::encoding::DecodeContext,
    ) -> ::core::result::Result<(), ::protonic::DecodeError> {
        match tag {
            1u32 => {
                if wire_type == ::protonic::encoding::WireType::LengthDelimited {
                    ::protonic::encoding::hash_map::merge(
                        ::protonic::encoding::string::merge,
                        ::protonic::encoding::int32::merge,
                        &mut self.m,
                        buf,
                        ctx,
                    )
                    .map_err(|mut error| {
                        error.push("MapMessage", "m");
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
            _ => ::protonic::Message::merge_field(&mut self.unknown_fields, tag, wire_type, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        0 + ::protonic::encoding::hash_map::encoded_len(
            ::protonic::encoding::string::encoded_len,
            ::protonic::encoding::int32::encoded_len,
            1u32,
            &self.m,
        ) + ::protonic::Message::encoded_len(&self.unknown_fields)
    }

    fn clear(&mut self) {
        self.m.clear();
        ::protonic::Message::clear(&mut self.unknown_fields);
    }
}

impl ::core::default::Default for MapMessage {
    fn default() -> Self {
        MapMessage {
            m: ::core::default::Default::default(),
            unknown_fields: ::protonic::UnknownFieldSet::new(),
        }
    }
}

/// proto3: `message OneofMessage { oneof which { int32 i = 1; string s = 2; } }`
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, Debug)]
pub struct OneofMessage {
    pub which: ::core::option::Option<oneof_message::Which>,
    pub unknown_fields: ::protonic::UnknownFieldSet,
}

impl ::protonic::Message for OneofMessage {
    fn encode_raw(&self, buf: &mut impl ::protonic::bytes::BufMut) {
        if let ::core::option::Option::Some(value) = &self.which {
            value.encode(buf);
        }
        ::protonic::Message::encode_raw(&self.unknown_fields, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: ::protonic::encoding::WireType,
        buf: &mut impl ::protonic::bytes::Buf,
        ctx: ::protonic::encoding::DecodeContext,
    ) -> ::core::result::Result<(), ::protonic::DecodeError> {
        match tag {
            1u32 => {
                if wire_type == ::protonic::encoding::WireType::Varint {
                    oneof_message::Which::merge(&mut self.which, tag, wire_type, buf, ctx)
                        .map_err(|mut error| {
                            error.push("OneofMessage", "which");
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
            2u32 => {
                if wire_type == ::protonic::encoding::WireType::LengthDelimited {
                    oneof_message::Which::merge(&mut self.which, tag, wire_type, buf, ctx)
                        .map_err(|mut error| {
                            error.push("OneofMessage", "which");
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
            _ => ::protonic::Message::merge_field(&mut self.unknown_fields, tag, wire_type, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        0 + self.which.as_ref().map_or(0, |value| value.encoded_len())
            + ::protonic::Message::encoded_len(&self.unknown_fields)
    }

    fn clear(&mut self) {
        self.which = ::core::option::Option::None;
        ::protonic::Message::clear(&mut self.unknown_fields);
    }
}

impl ::core::default::Default for OneofMessage {
    fn default() -> Self {
        OneofMessage {
            which: ::core::option::Option::None,
            unknown_fields: ::protonic::UnknownFieldSet::new(),
        }
    }
}

/// Nested message and enum types in `OneofMessage`.
pub mod oneof_message {
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, Debug)]
    pub enum Which {
        I(i32),
        S(::std::string::String),
    }

    impl Which {
        /// Encodes the selected variant to the buffer.
        pub fn encode(&self, buf: &mut impl ::protonic::bytes::BufMut) {
            match self {
                Which::I(value) => ::protonic::encoding::int32::encode(1u32, value, buf),
                Which::S(value) => ::protonic::encoding::string::encode(2u32, value, buf),
            }
        }

        /// Merges one record into `field`, replacing whichever variant was
        /// previously selected.
        pub fn merge(
            field: &mut ::core::option::Option<Which>,
            tag: u32,
            wire_type: ::protonic::encoding::WireType,
            buf: &mut impl ::protonic::bytes::Buf,
            ctx: ::protonic::encoding::DecodeContext,
        ) -> ::core::result::Result<(), ::protonic::DecodeError> {
            match tag {
                1u32 => match field {
                    ::core::option::Option::Some(Which::I(value)) => {
                        ::protonic::encoding::int32::merge(wire_type, value, buf, ctx)
                    }
                    _ => {
                        let mut owned = ::core::default::Default::default();
                        ::protonic::encoding::int32::merge(wire_type, &mut owned, buf, ctx).map(
                            |_| {
                                *field = ::core::option::Option::Some(Which::I(owned));
                            },
                        )
                    }
                },
                2u32 => match field {
                    ::core::option::Option::Some(Which::S(value)) => {
                        ::protonic::encoding::string::merge(wire_type, value, buf, ctx)
                    }
                    _ => {
                        let mut owned = ::core::default::Default::default();
                        ::protonic::encoding::string::merge(wire_type, &mut owned, buf, ctx).map(
                            |_| {
                                *field = ::core::option::Option::Some(Which::S(owned));
                            },
                        )
                    }
                },
                _ => unreachable!("invalid oneof tag: {}", tag),
            }
        }

        /// The encoded length of the selected variant.
        pub fn encoded_len(&self) -> usize {
            match self {
                Which::I(value) => ::protonic::encoding::int32::encoded_len(1u32, value),
                Which::S(value) => ::protonic::encoding::string::encoded_len(2u32, value),
            }
        }
    }
}

/// proto2: `message Envelope { required uint32 id = 1; optional string note = 2; }`
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, Debug)]
pub struct Envelope {
    pub id: u32,
    pub note: ::core::option::Option<::std::string::String>,
    pub unknown_fields: ::protonic::UnknownFieldSet,
}

impl ::protonic::Message for Envelope {
    fn encode_raw(&self, buf: &mut impl ::protonic::bytes::BufMut) {
        ::protonic::encoding::uint32::encode(1u32, &self.id, buf);
        if let ::core::option::Option::Some(value) = &self.note {
            ::protonic::encoding::string::encode(2u32, value, buf);
        }
        ::protonic::Message::encode_raw(&self.unknown_fields, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: ::protonic::encoding::WireType,
        buf: &mut impl ::protonic::bytes::Buf,
        ctx: ::protonic::encoding::DecodeContext,
    ) -> ::core::result::Result<(), ::protonic::DecodeError> {
        match tag {
            1u32 => {
                if wire_type == ::protonic::encoding::WireType::Varint {
                    ::protonic::encoding::uint32::merge(wire_type, &mut self.id, buf, ctx)
                        .map_err(|mut error| {
                            error.push("Envelope", "id");
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
            2u32 => {
                if wire_type == ::protonic::encoding::WireType::LengthDelimited {
                    let value = self
                        .note
                        .get_or_insert_with(::core::default::Default::default);
                    ::protonic::encoding::string::merge(wire_type, value, buf, ctx).map_err(
                        |mut error| {
                            error.push("Envelope", "note");
                            error
                        },
                    )
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
            _ => ::protonic::Message::merge_field(&mut self.unknown_fields, tag, wire_type, buf, ctx),
        }
    }

    fn merge_raw(
        &mut self,
        buf: &mut impl ::protonic::bytes::Buf,
        ctx: ::protonic::encoding::DecodeContext,
    ) -> ::core::result::Result<(), ::protonic::DecodeError> {
        let mut seen = [false; 1usize];
        while ::protonic::bytes::Buf::has_remaining(buf) {
            let (tag, wire_type) = ::protonic::encoding::decode_key(buf)?;
            match tag {
                1u32 => seen[0usize] = true,
                _ => {}
            }
            ::protonic::Message::merge_field(self, tag, wire_type, buf, ctx.clone())?;
        }
        if ctx.is_strict() {
            if !seen[0usize] {
                return ::core::result::Result::Err(::protonic::DecodeError::new(
                    "missing required field: Envelope.id",
                ));
            }
        }
        ::core::result::Result::Ok(())
    }

    fn encoded_len(&self) -> usize {
        0 + ::protonic::encoding::uint32::encoded_len(1u32, &self.id)
            + self
                .note
                .as_ref()
                .map_or(0, |value| ::protonic::encoding::string::encoded_len(2u32, value))
            + ::protonic::Message::encoded_len(&self.unknown_fields)
    }

    fn clear(&mut self) {
        self.id = ::core::default::Default::default();
        self.note = ::core::option::Option::None;
        ::protonic::Message::clear(&mut self.unknown_fields);
    }
}

impl ::core::default::Default for Envelope {
    fn default() -> Self {
        Envelope {
            id: ::core::default::Default::default(),
            note: ::core::option::Option::None,
            unknown_fields: ::protonic::UnknownFieldSet::new(),
        }
    }
}

/// proto3: `message TreeNode { int32 value = 1; TreeNode child = 2; }`
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, Debug)]
pub struct TreeNode {
    pub value: i32,
    pub child: ::core::option::Option<::std::boxed::Box<TreeNode>>,
    pub unknown_fields: ::protonic::UnknownFieldSet,
}

impl ::protonic::Message for TreeNode {
    fn encode_raw(&self, buf: &mut impl ::protonic::bytes::BufMut) {
        if self.value != 0 {
            ::protonic::encoding::int32::encode(1u32, &self.value, buf);
        }
        if let ::core::option::Option::Some(value) = &self.child {
            ::protonic::encoding::message::encode(2u32, value, buf);
        }
        ::protonic::Message::encode_raw(&self.unknown_fields, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: ::protonic::encoding::WireType,
        buf: &mut impl ::protonic::bytes::Buf,
        ctx: ::protonic::encoding::DecodeContext,
    ) -> ::core::result::Result<(), ::protonic::DecodeError> {
        match tag {
            1u32 => {
                if wire_type == ::protonic::encoding::WireType::Varint {
                    ::protonic::encoding::int32::merge(wire_type, &mut self.value, buf, ctx)
                        .map_err(|mut error| {
                            error.push("TreeNode", "value");
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
            2u32 => {
                if wire_type == ::protonic::encoding::WireType::LengthDelimited {
                    let value = self
                        .child
                        .get_or_insert_with(::core::default::Default::default);
                    ::protonic::encoding::message::merge(wire_type, value, buf, ctx).map_err(
                        |mut error| {
                            error.push("TreeNode", "child");
                            error
                        },
                    )
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
            _ => ::protonic::Message::merge_field(&mut self.unknown_fields, tag, wire_type, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        0 + (if self.value != 0 {
            ::protonic::encoding::int32::encoded_len(1u32, &self.value)
        } else {
            0
        }) + self
            .child
            .as_ref()
            .map_or(0, |value| ::protonic::encoding::message::encoded_len(2u32, value))
            + ::protonic::Message::encoded_len(&self.unknown_fields)
    }

    fn clear(&mut self) {
        self.value = ::core::default::Default::default();
        self.child = ::core::option::Option::None;
        ::protonic::Message::clear(&mut self.unknown_fields);
    }
}

impl ::core::default::Default for TreeNode {
    fn default() -> Self {
        TreeNode {
            value: ::core::default::Default::default(),
            child: ::core::option::Option::None,
            unknown_fields: ::protonic::UnknownFieldSet::new(),
        }
    }
}

/// proto3: `enum Mood { MOOD_UNSPECIFIED = 0; MOOD_HAPPY = 1; MOOD_SAD = 2; }`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum Mood {
    Unspecified = 0,
    Happy = 1,
    Sad = 2,
}

impl Mood {
    /// String value of the enum field names used in the ProtoBuf
    /// definition.
    ///
    /// The values are not transformed in any way and thus are considered
    /// stable (if the ProtoBuf definition does not change) and safe for
    /// programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Mood::Unspecified => "MOOD_UNSPECIFIED",
            Mood::Happy => "MOOD_HAPPY",
            Mood::Sad => "MOOD_SAD",
        }
    }

    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "MOOD_UNSPECIFIED" => ::core::option::Option::Some(Self::Unspecified),
            "MOOD_HAPPY" => ::core::option::Option::Some(Self::Happy),
            "MOOD_SAD" => ::core::option::Option::Some(Self::Sad),
            _ => ::core::option::Option::None,
        }
    }
}

impl ::core::default::Default for Mood {
    fn default() -> Self {
        Mood::Unspecified
    }
}

impl ::core::convert::From<Mood> for i32 {
    fn from(value: Mood) -> i32 {
        value as i32
    }
}

impl ::core::convert::TryFrom<i32> for Mood {
    type Error = ::protonic::UnknownEnumValue;

    fn try_from(value: i32) -> ::core::result::Result<Mood, ::protonic::UnknownEnumValue> {
        match value {
            0 => ::core::result::Result::Ok(Mood::Unspecified),
            1 => ::core::result::Result::Ok(Mood::Happy),
            2 => ::core::result::Result::Ok(Mood::Sad),
            _ => ::core::result::Result::Err(::protonic::UnknownEnumValue(value)),
        }
    }
}

/// proto3: `message Profile { Mood mood = 1; repeated Mood history = 2; }`
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, Debug)]
pub struct Profile {
    pub mood: ::protonic::OpenEnum<Mood>,
    pub history: ::std::vec::Vec<::protonic::OpenEnum<Mood>>,
    pub unknown_fields: ::protonic::UnknownFieldSet,
}

impl ::protonic::Message for Profile {
    fn encode_raw(&self, buf: &mut impl ::protonic::bytes::BufMut) {
        if self.mood != ::protonic::OpenEnum::default() {
            ::protonic::encoding::open_enum::encode(1u32, &self.mood, buf);
        }
        ::protonic::encoding::open_enum::encode_packed(2u32, &self.history, buf);
        ::protonic::Message::encode_raw(&self.unknown_fields, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: ::protonic::encoding::WireType,
        buf: &mut impl ::protonic::bytes::Buf,
        ctx: ::protonic::encoding::DecodeContext,
    ) -> ::core::result::Result<(), ::protonic::DecodeError> {
        match tag {
            1u32 => {
                if wire_type == ::protonic::encoding::WireType::Varint {
                    ::protonic::encoding::open_enum::merge(wire_type, &mut self.mood, buf, ctx)
                        .map_err(|mut error| {
                            error.push("Profile", "mood");
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
            2u32 => {
                if wire_type == ::protonic::encoding::WireType::Varint
                    || wire_type == ::protonic::encoding::WireType::LengthDelimited
                {
                    ::protonic::encoding::open_enum::merge_repeated(
                        wire_type,
                        &mut self.history,
                        buf,
                        ctx,
                    )
                    .map_err(|mut error| {
                        error.push("Profile", "history");
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
            _ => ::protonic::Message::merge_field(&mut self.unknown_fields, tag, wire_type, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        0 + (if self.mood != ::protonic::OpenEnum::default() {
            ::protonic::encoding::open_enum::encoded_len(1u32, &self.mood)
        } else {
            0
        }) + ::protonic::encoding::open_enum::encoded_len_packed(2u32, &self.history)
            + ::protonic::Message::encoded_len(&self.unknown_fields)
    }

    fn clear(&mut self) {
        self.mood = ::core::default::Default::default();
        self.history.clear();
        ::protonic::Message::clear(&mut self.unknown_fields);
    }
}

impl ::core::default::Default for Profile {
    fn default() -> Self {
        Profile {
            mood: ::core::default::Default::default(),
            history: ::core::default::Default::default(),
            unknown_fields: ::protonic::UnknownFieldSet::new(),
        }
    }
}
