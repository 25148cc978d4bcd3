use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter};

/// 8-character stable device identifier derived from host attributes.
///
/// Best-effort partition key, not a security credential: hash truncation and
/// shared hostnames can collide. Computed once per process and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Validate device ID format (8 lowercase hex chars)
    pub fn is_valid(&self) -> bool {
        self.0.len() == 8
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the device id from host attributes.
///
/// Pure function: callers gather `os`, `arch` and `hostname` themselves so
/// tests can inject them. An attribute that cannot be read is passed as an
/// empty string; the resulting id is then still stable for the session.
pub fn compute_device_id(os: &str, arch: &str, hostname: &str) -> DeviceId {
    let seed = format!("{}_{}_{}", os, arch, hostname);
    let digest = Sha256::digest(seed.as_bytes());
    DeviceId(hex::encode(&digest[..4]))
}
