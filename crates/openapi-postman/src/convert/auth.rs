//! Per-request auth policy.
//!
//! Every generated collection carries a bearer default at the collection
//! level. The policy decides what each request adds on top of it.

use postman_core::Auth;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which requests get an explicit auth block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthPolicy {
    /// Bearer auth on every request except public paths, which get an
    /// explicit no-auth override. Tokens are forwarded even when the spec
    /// under-declares `security`.
    #[default]
    Allowlist,
    /// Bearer auth only where the operation declares a non-empty `security`;
    /// other requests carry no auth block and inherit the collection default.
    Declarative,
}

impl AuthPolicy {
    /// The auth block for a request, or `None` to inherit.
    #[must_use]
    pub fn auth_for(
        self,
        path: &str,
        security: Option<&Value>,
        public_paths: &[String],
    ) -> Option<Auth> {
        match self {
            Self::Allowlist if is_public_path(path, public_paths) => Some(Auth::noauth()),
            Self::Allowlist => Some(Auth::bearer()),
            Self::Declarative => security
                .and_then(Value::as_array)
                .is_some_and(|reqs| !reqs.is_empty())
                .then(Auth::bearer),
        }
    }
}

/// Whether `path` is on the public allowlist.
///
/// The root entry `/` matches only the root path itself; every other entry
/// matches by prefix.
#[must_use]
pub fn is_public_path(path: &str, public_paths: &[String]) -> bool {
    public_paths.iter().any(|public| {
        if public == "/" {
            path == "/"
        } else {
            path.starts_with(public.as_str())
        }
    })
}
