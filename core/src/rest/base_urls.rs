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

//! Public address of the service.

use crate::env::get_required_var;
use url::Url;

/// Panic message for joins that cannot fail once the base has been validated.
const URL_MUST_BE_VALID: &str = "URLs built in-process must be valid";

/// Checks that relative paths can be joined to `base` without dropping any of its components.
fn ensure_valid_base(base: &Url) -> Result<(), String> {
    let probe = base.join("x").map_err(|e| format!("URL '{}' cannot be a base: {}", base, e))?;
    if !probe.as_str().starts_with(base.as_str()) {
        return Err(format!("URL '{}' cannot be a base: missing trailing slash", base));
    }
    Ok(())
}

/// Contains the public base URL of the service and allows building absolute URLs under it.
///
/// Resources use this to compute the `Location` of the entities they create, so the base must
/// be the address clients use to reach us, which is not necessarily the address we bind to.
#[derive(Debug)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct BaseUrls {
    /// The base URL to the backend service (ourselves).
    backend: Url,
}

impl BaseUrls {
    /// Creates a set of base URLs from an already-parsed URL.
    pub fn new(backend: Url) -> Result<Self, String> {
        ensure_valid_base(&backend)?;
        Ok(Self { backend })
    }

    /// Creates a set of base URLs from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use the `<prefix>_BACKEND_BASE_URL` variable.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let backend = get_required_var::<Url>(prefix, "BACKEND_BASE_URL")?;
        Self::new(backend)
    }

    /// Creates a set of base URLs from a fixed string, which must represent a valid URL.
    #[cfg(any(test, feature = "testutils"))]
    pub fn from_static(backend: &'static str) -> Self {
        Self::new(Url::parse(backend).unwrap()).unwrap()
    }

    /// Generates a URL to the backend given a `path`, which must be relative.  The `path` can be
    /// empty to obtain a reference to the root.
    pub fn make_backend_url(&self, path: &str) -> Url {
        assert!(!path.starts_with('/'));
        self.backend.join(path).expect(URL_MUST_BE_VALID)
    }
}
