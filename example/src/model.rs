// RestKit
// Copyright 2024 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! High-level data types.

use derive_getters::Getters;
use derive_more::{AsRef, Constructor, Display};
use restkit_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Maximum length of a username.
const MAX_USERNAME_LENGTH: usize = 64;

/// Maximum length of an email address.
const MAX_EMAIL_LENGTH: usize = 128;

/// Primary key of a user.
#[derive(
    Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Returns the raw value of the identifier.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

/// Newtype pattern for usernames.
///
/// Usernames are made of ASCII letters, digits, dots, dashes and underscores.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(try_from = "String")]
pub struct Username(String);

impl Username {
    /// Creates a new username after validating its contents.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.is_empty() {
            return Err(ModelError("Username cannot be empty".to_owned()));
        }
        if s.len() > MAX_USERNAME_LENGTH {
            return Err(ModelError("Username is too long".to_owned()));
        }
        for ch in s.chars() {
            if !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_') {
                return Err(ModelError(format!("Unsupported character '{}' in username", ch)));
            }
        }

        Ok(Self(s))
    }

    /// Returns a string view of the username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        Username::new(value)
    }
}

/// Newtype pattern for email addresses.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(try_from = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a new email address after validating its contents.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.len() > MAX_EMAIL_LENGTH {
            return Err(ModelError("Email address is too long".to_owned()));
        }
        match s.split_once('@') {
            Some((user, domain))
                if !user.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(s))
            }
            _ => Err(ModelError(format!("Email '{}' is not a valid address", s))),
        }
    }

    /// Returns a string view of the email address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        EmailAddress::new(value)
    }
}

/// Representation of a user as exchanged with clients.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct User {
    /// Identifier of the user.  Assigned by the service on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,

    /// Login name of the user.  Unique.
    pub username: Username,

    /// Contact address of the user.  Unique if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,

    /// Names of the roles granted to the user.  Not returned when listing users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

/// Representation of a user as stored in the database.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub struct UserEntity {
    /// Primary key, or `None` if the user has not been stored yet.
    id: Option<UserId>,

    /// Login name of the user.
    username: Username,

    /// Contact address of the user.
    email: Option<EmailAddress>,

    /// Roles granted to the user, or `None` if they were not loaded or must be left untouched.
    roles: Option<Vec<String>>,
}

impl UserEntity {
    /// Replaces the contents of this entity with those in `user` except for the primary key.
    ///
    /// Roles are only replaced if `user` specifies them.
    pub(crate) fn merge(&mut self, user: User) {
        self.username = user.username;
        self.email = user.email;
        if user.roles.is_some() {
            self.roles = user.roles;
        }
    }

    /// Converts this entity into a user with the given `roles`.
    pub(crate) fn into_user(self, roles: Option<Vec<String>>) -> User {
        User { id: self.id, username: self.username, email: self.email, roles }
    }
}

impl From<&User> for UserEntity {
    fn from(user: &User) -> Self {
        UserEntity::new(user.id, user.username.clone(), user.email.clone(), user.roles.clone())
    }
}
