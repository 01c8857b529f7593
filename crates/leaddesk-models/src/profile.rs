//! Business profile used to steer generated replies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::null_as_empty;

macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A value this client does not know about; kept verbatim.
            Other(String),
        }

        impl $name {
            /// Known values, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return $name::default();
                }
                match trimmed.to_lowercase().as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Other(trimmed.to_string()),
                }
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::from(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum!(
    /// Voice of generated replies.
    Tone, default = Confident, {
        Confident => "confident",
        Friendly => "friendly",
        Professional => "professional",
        Casual => "casual",
    }
);

open_enum!(
    /// Channel leads are nudged towards.
    ContactMethod, default = Dm, {
        Dm => "dm",
        Sms => "sms",
        Email => "email",
        Call => "call",
    }
);

/// The operator's business profile (singleton).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub biz_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub biz_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub offer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "tone_or_default")]
    pub tone: Tone,
    #[serde(default, deserialize_with = "contact_method_or_default")]
    pub contact_method: ContactMethod,
}

fn tone_or_default<'de, D>(deserializer: D) -> Result<Tone, D::Error>
where
    D: serde::Deserializer<'de>,
{
    null_as_empty(deserializer).map(Tone::from)
}

fn contact_method_or_default<'de, D>(deserializer: D) -> Result<ContactMethod, D::Error>
where
    D: serde::Deserializer<'de>,
{
    null_as_empty(deserializer).map(ContactMethod::from)
}

impl Profile {
    /// Collapses whitespace runs in the free-text fields, the way the
    /// backend stores them.
    pub fn normalized(&self) -> Self {
        Self {
            biz_name: one_line(&self.biz_name),
            biz_type: one_line(&self.biz_type),
            offer: one_line(&self.offer),
            location: one_line(&self.location),
            tone: Tone::from(self.tone.as_str().to_string()),
            contact_method: ContactMethod::from(self.contact_method.as_str().to_string()),
        }
    }

    /// Sets a field by its wire name. Returns `false` for unknown keys.
    pub fn set_field(&mut self, key: &str, value: &str) -> bool {
        match key {
            "biz_name" | "name" => self.biz_name = value.to_string(),
            "biz_type" | "type" => self.biz_type = value.to_string(),
            "offer" => self.offer = value.to_string(),
            "location" => self.location = value.to_string(),
            "tone" => self.tone = Tone::from(value.to_string()),
            "contact_method" | "contact" => {
                self.contact_method = ContactMethod::from(value.to_string())
            }
            _ => return false,
        }
        true
    }
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
