//! The enumerated customization options: leather color and hardware finish.
//!
//! Wire values (form fields, database columns, JSON) are the kebab-case
//! names returned by `as_str`. Image filenames use a separate token set
//! (`file_token`) that never contains `-`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the enumerated options.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionParseError {
    #[error("unknown color: {0}")]
    Color(String),
    #[error("unknown hardware: {0}")]
    Hardware(String),
}

/// Leather color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    Black,
    Brown,
    LightBrown,
}

impl Color {
    /// Every color, in the order shown to shoppers.
    pub const ALL: [Self; 3] = [Self::Black, Self::Brown, Self::LightBrown];

    /// Color used for image tokens when the input is not a known color.
    pub const FALLBACK: Self = Self::Black;

    /// Wire value (`black`, `brown`, `light-brown`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Brown => "brown",
            Self::LightBrown => "light-brown",
        }
    }

    /// Token used in preview image filenames.
    #[must_use]
    pub const fn file_token(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Brown => "brown",
            Self::LightBrown => "light_brown",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Black => "Black",
            Self::Brown => "Brown",
            Self::LightBrown => "Light brown",
        }
    }

    /// Small swatch image shown next to the color selector.
    #[must_use]
    pub const fn swatch_path(self) -> &'static str {
        match self {
            Self::Black => "/static/colors1.png",
            Self::Brown => "/static/colors2.png",
            Self::LightBrown => "/static/colors3.png",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Color {
    type Err = OptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black" => Ok(Self::Black),
            "brown" => Ok(Self::Brown),
            "light-brown" => Ok(Self::LightBrown),
            _ => Err(OptionParseError::Color(s.to_owned())),
        }
    }
}

/// Hardware (buckles, zips, rivets) finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hardware {
    Silver,
    Gold,
}

impl Hardware {
    /// Every finish, in the order shown to shoppers.
    pub const ALL: [Self; 2] = [Self::Silver, Self::Gold];

    /// Finish used for image tokens when the input is not a known finish.
    pub const FALLBACK: Self = Self::Silver;

    /// Wire value (`silver`, `gold`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }

    /// Token used in preview image filenames.
    #[must_use]
    pub const fn file_token(self) -> &'static str {
        match self {
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }

    /// Small swatch image shown next to the hardware selector.
    #[must_use]
    pub const fn swatch_path(self) -> &'static str {
        match self {
            Self::Silver => "/static/h1.png",
            Self::Gold => "/static/h2.png",
        }
    }
}

impl fmt::Display for Hardware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Hardware {
    type Err = OptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            _ => Err(OptionParseError::Hardware(s.to_owned())),
        }
    }
}

/// Store an option as `TEXT` using its wire value.
#[cfg(feature = "postgres")]
macro_rules! text_column {
    ($name:ident) => {
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(s.parse::<Self>()?)
            }
        }

        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

#[cfg(feature = "postgres")]
text_column!(Color);
#[cfg(feature = "postgres")]
text_column!(Hardware);
