//! Credentials
//!
//! Validated inputs for sign-in and registration. Built by the use cases
//! from raw form values; gateways only ever see validated data.

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_password::UserPassword,
};

/// Sign-in credentials
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: UserPassword,
}

/// New account
#[derive(Debug)]
pub struct Registration {
    pub email: Email,
    pub name: DisplayName,
    pub password: UserPassword,
}

impl Registration {
    /// Credentials for the automatic sign-in after the account is created
    pub fn into_credentials(self) -> Credentials {
        Credentials {
            email: self.email,
            password: self.password,
        }
    }
}
