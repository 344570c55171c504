// src/models/keys.rs

//! Surrogate keys handed out by the warehouse dimension tables.

use std::fmt;

macro_rules! surrogate_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub i32);

        impl $name {
            pub fn get(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

surrogate_key!(
    /// `date_dim.date_sk`
    DateKey
);
surrogate_key!(
    /// `status_dim.status_sk`
    StatusKey
);
surrogate_key!(
    /// `department_dim.department_sk`
    DepartmentKey
);
