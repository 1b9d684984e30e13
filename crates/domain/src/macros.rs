//! Macro for implementing Display and FromStr for wire-level enums
//!
//! The backend exchanges several small enums as lowercase strings (user
//! types, session phases in logs). This macro keeps their `Display` output
//! and case-insensitive parsing in one place.
//!
//! # Example
//!
//! ```rust
//! use ihome_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Role {
//!     Student,
//!     Admin,
//! }
//!
//! impl_domain_status_conversions!(Role {
//!     Student => "student",
//!     Admin => "admin",
//! });
//!
//! assert_eq!(Role::Admin.to_string(), "admin");
//! assert_eq!("STUDENT".parse::<Role>(), Ok(Role::Student));
//! ```

/// Implements `Display` and `FromStr` for a fieldless enum.
///
/// * `Display` writes the mapped string.
/// * `FromStr` matches case-insensitively and reports the enum name on
///   failure.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ticket {
        Open,
        InProgress,
        Closed,
    }

    impl_domain_status_conversions!(Ticket {
        Open => "open",
        InProgress => "in_progress",
        Closed => "closed",
    });

    #[test]
    fn test_display_uses_mapping() {
        assert_eq!(Ticket::InProgress.to_string(), "in_progress");
        assert_eq!(Ticket::Closed.to_string(), "closed");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Ticket::from_str("OPEN").unwrap(), Ticket::Open);
        assert_eq!(Ticket::from_str("In_Progress").unwrap(), Ticket::InProgress);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = Ticket::from_str("archived").unwrap_err();
        assert_eq!(err, "Invalid Ticket: archived");
        assert!(Ticket::from_str("").is_err());
    }
}
