use crate::UnknownEnumValue;

/// The value of an enum-typed field, open to values outside the generated
/// definition.
///
/// Protobuf mandates that enumeration value sets are open: an integer the
/// current schema does not know about must survive a decode/encode round
/// trip. Generated code stores enum fields as `OpenEnum` so unrecognized
/// values are carried in the `Unknown` arm instead of being dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpenEnum<T> {
    /// A known value of the generated enum type.
    Known(T),
    /// An unrecognized value as decoded from the message.
    Unknown(i32),
}

impl<T> Default for OpenEnum<T>
where
    T: Default,
{
    fn default() -> Self {
        Self::Known(T::default())
    }
}

impl<T> From<T> for OpenEnum<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T> OpenEnum<T> {
    /// Converts a raw integer value into an open enum value.
    ///
    /// This is how field values come off the wire.
    pub fn from_raw(value: i32) -> Self
    where
        i32: TryInto<T>,
    {
        match value.try_into() {
            Ok(v) => Self::Known(v),
            Err(_) => Self::Unknown(value),
        }
    }

    /// Converts an open enum value into its raw integer representation.
    pub fn into_raw(self) -> i32
    where
        T: Into<i32>,
    {
        match self {
            Self::Known(v) => v.into(),
            Self::Unknown(v) => v,
        }
    }

    /// Returns the raw integer representation without consuming the value.
    pub fn to_raw(&self) -> i32
    where
        T: Clone + Into<i32>,
    {
        match self {
            Self::Known(v) => v.clone().into(),
            Self::Unknown(v) => *v,
        }
    }

    /// Returns the known value of the open enum.
    ///
    /// # Panics
    ///
    /// Panics if the value is in fact unknown.
    pub fn unwrap(self) -> T {
        match self {
            Self::Known(v) => v,
            Self::Unknown(v) => panic!("unknown enum value {}", v),
        }
    }

    /// Returns the known value, or the provided default if the value is
    /// unknown.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Known(v) => v,
            Self::Unknown(_) => default,
        }
    }

    /// Returns the known value, or the default value of the enum type if
    /// the value is unknown.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Self::Known(v) => v,
            Self::Unknown(_) => T::default(),
        }
    }

    /// If the value is known, returns it in `Ok`, otherwise returns an
    /// `Err` carrying the unrecognized integer.
    pub fn get(&self) -> Result<T, UnknownEnumValue>
    where
        T: Clone,
    {
        match self {
            Self::Known(v) => Ok(v.clone()),
            Self::Unknown(raw) => Err(UnknownEnumValue(*raw)),
        }
    }

    /// Sets the receiver to the provided known value.
    pub fn set(&mut self, value: T) {
        *self = Self::Known(value);
    }

    /// If the value is known, returns it in `Some`, otherwise `None`.
    pub fn known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[repr(i32)]
    enum Mode {
        #[default]
        Off = 0,
        On = 1,
    }

    impl From<Mode> for i32 {
        fn from(mode: Mode) -> i32 {
            mode as i32
        }
    }

    impl TryFrom<i32> for Mode {
        type Error = UnknownEnumValue;

        fn try_from(value: i32) -> Result<Mode, UnknownEnumValue> {
            match value {
                0 => Ok(Mode::Off),
                1 => Ok(Mode::On),
                other => Err(UnknownEnumValue(other)),
            }
        }
    }

    #[test]
    fn known_and_unknown_raw_roundtrip() {
        assert_eq!(OpenEnum::<Mode>::from_raw(1), OpenEnum::Known(Mode::On));
        assert_eq!(OpenEnum::<Mode>::from_raw(7), OpenEnum::Unknown(7));
        assert_eq!(OpenEnum::<Mode>::from_raw(7).into_raw(), 7);
        assert_eq!(OpenEnum::Known(Mode::On).to_raw(), 1);
    }

    #[test]
    fn unknown_does_not_leak_into_known_accessors() {
        let value = OpenEnum::<Mode>::from_raw(7);
        assert_eq!(value.known(), None);
        assert_eq!(value.unwrap_or(Mode::On), Mode::On);
        assert_eq!(value.get(), Err(UnknownEnumValue(7)));
    }
}
