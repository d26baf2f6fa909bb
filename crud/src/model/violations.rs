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

//! The `UniqueViolations` data type.

use std::fmt;

/// Collection of values that a client tried to store in fields declared unique but that are
/// already in use by other entities.
///
/// Violations are kept in the order in which they were added so that error messages are stable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniqueViolations(Vec<(String, String)>);

impl UniqueViolations {
    /// Records that `value` is not available for `field`.
    pub fn add<F: Into<String>, V: ToString>(&mut self, field: F, value: V) {
        self.0.push((field.into(), value.to_string()));
    }

    /// Returns true if no violations have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

impl fmt::Display for UniqueViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field, value)?;
        }
        Ok(())
    }
}
