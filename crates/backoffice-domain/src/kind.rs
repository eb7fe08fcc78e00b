//! Closed string-valued enums stored as `varchar` columns and sent on the wire.

use thiserror::Error;

/// Error returned when a string does not name a variant of a wire enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Declare a fieldless enum whose variants map 1:1 to lowercase wire strings.
///
/// Generates `as_str`, `Display`, `FromStr` (error: [`UnknownValue`]) and an
/// `ALL` slice. Serde uses the same strings.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $label:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::kind::UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err($crate::kind::UnknownValue {
                        kind: $label,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Account status. Disabled accounts are refused at login, which happens upstream.
    pub enum UserStatus as "user status" {
        Active => "active",
        Disabled => "disabled",
    }
}

wire_enum! {
    /// Role status. Only active, non-deleted roles contribute grants.
    pub enum RoleStatus as "role status" {
        Active => "active",
        Inactive => "inactive",
    }
}

wire_enum! {
    /// Enabled/disabled switch shared by menus and dictionary entries.
    pub enum Toggle as "status" {
        Enabled => "enabled",
        Disabled => "disabled",
    }
}

wire_enum! {
    pub enum MenuType as "menu type" {
        Directory => "directory",
        Menu => "menu",
        /// In-page action point; carries a permission code, never a route.
        Button => "button",
    }
}

wire_enum! {
    pub enum NotificationType as "notification type" {
        Info => "info",
        System => "system",
        Warning => "warning",
        Error => "error",
        Success => "success",
    }
}

wire_enum! {
    pub enum MetricType as "metric type" {
        System => "system",
        Application => "application",
        Database => "database",
        Cache => "cache",
    }
}
