//! Declarative builders for protocol enumerations
//!
//! LSP enumerations are open on the wire: a peer may send a value this crate
//! has no name for, and it must come back out unchanged. Both macros therefore
//! generate newtypes with associated constants rather than Rust enums.

/// Integer-valued enumeration backed by a transparent newtype.
///
/// Unknown values decode without error, encode back to the same number and
/// render through `Display` as the bare number.
macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($repr:ty) {
            $(
                $(#[$cmeta:meta])*
                $konst:ident = $value:expr => $label:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub $repr);

        impl $name {
            $(
                $(#[$cmeta])*
                pub const $konst: $name = $name($value);
            )*

            /// Every named value, in declaration order.
            pub const KNOWN: &'static [$name] = &[$($name::$konst),*];

            pub const fn value(self) -> $repr {
                self.0
            }

            pub fn is_known(self) -> bool {
                Self::KNOWN.contains(&self)
            }

            /// Human-readable name, `None` for values outside the named set.
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$konst => Some($label),)*
                    _ => None,
                }
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{}", self.0),
                }
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{}({})", stringify!($name), name),
                    None => write!(f, "{}({})", stringify!($name), self.0),
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                $(
                    if lower == $label {
                        return Ok(Self::$konst);
                    }
                )*
                lower.parse::<$repr>().map(Self).map_err(|_| {
                    let valid: Vec<&str> = vec![$($label),*];
                    format!(
                        "Unknown {}: '{}'. Valid: {}",
                        stringify!($name),
                        s,
                        valid.join(", ")
                    )
                })
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                $crate::models::serde_util::lenient::<D, $repr>(deserializer).map(Self)
            }
        }
    };
}

/// String-valued open enumeration.
///
/// Known values are `Cow::Borrowed` constants; anything else is carried
/// verbatim in an owned string.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$cmeta:meta])*
                $konst:ident = $value:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(std::borrow::Cow<'static, str>);

        impl $name {
            $(
                $(#[$cmeta])*
                pub const $konst: $name = $name(std::borrow::Cow::Borrowed($value));
            )*

            /// Wire values of every named constant, in declaration order.
            pub const KNOWN_VALUES: &'static [&'static str] = &[$($value),*];

            /// Return the named constant for `value`, or wrap it unchanged.
            pub fn lookup(value: &str) -> Self {
                match value {
                    $($value => Self::$konst,)*
                    other => Self(std::borrow::Cow::Owned(other.to_string())),
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_known(&self) -> bool {
                Self::KNOWN_VALUES.contains(&self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::lookup(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                if Self::KNOWN_VALUES.contains(&value.as_str()) {
                    Self::lookup(&value)
                } else {
                    Self(std::borrow::Cow::Owned(value))
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                <String as serde::Deserialize>::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

pub(crate) use int_enum;
pub(crate) use string_enum;
