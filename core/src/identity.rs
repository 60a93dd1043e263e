use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::*;

/// Salt used when none is configured, only suitable for local development.
pub const DEV_SALT: &str = "super-secret-salt";

/// Prefix mixed into fingerprint material so it never hashes like a token.
const FINGERPRINT_PREFIX: &str = "fp:";

/// Salted one-way key a visitor's record is stored under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wraps an already derived identifier, e.g. a key read back from a store.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What a request presents to identify its visitor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityMaterial {
    pub token: Option<String>,
    pub address: Option<String>,
    pub user_agent: Option<String>,
}

impl IdentityMaterial {
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }
}

/// What to fall back to when the client sent no token.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityFallback {
    /// Reject requests without a token.
    #[default]
    None,
    /// Use the network address alone.
    Address,
    /// Use the network address together with the user agent.
    AddressAndUserAgent,
}

impl core::str::FromStr for IdentityFallback {
    type Err = String;

    fn from_str(value: &str) -> core::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "address" | "ip" => Ok(Self::Address),
            "address-and-user-agent" | "ip-ua" => Ok(Self::AddressAndUserAgent),
            other => Err(format!("unknown identity fallback {other:?}")),
        }
    }
}

/// Derives identifiers from identity material with a server-held salt.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityResolver {
    salt: String,
    fallback: IdentityFallback,
}

impl fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("salt", &"<redacted>")
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl IdentityResolver {
    pub fn new(salt: impl Into<String>, fallback: IdentityFallback) -> Self {
        let salt = salt.into();
        if salt == DEV_SALT {
            log::warn!("Using the development identity salt, set a real one for deployments");
        }
        Self { salt, fallback }
    }

    pub fn fallback(&self) -> IdentityFallback {
        self.fallback
    }

    pub fn resolve(&self, material: &IdentityMaterial) -> Result<Identifier> {
        if let Some(token) = non_empty(material.token.as_deref()) {
            return Ok(self.digest(token));
        }

        let address = non_empty(material.address.as_deref());
        let user_agent = non_empty(material.user_agent.as_deref());
        match (self.fallback, address, user_agent) {
            (IdentityFallback::Address, Some(address), _) => {
                Ok(self.digest(&format!("{FINGERPRINT_PREFIX}{address}")))
            }
            (IdentityFallback::AddressAndUserAgent, Some(address), user_agent) => Ok(self.digest(
                &format!("{FINGERPRINT_PREFIX}{address}|{}", user_agent.unwrap_or_default()),
            )),
            _ => Err(BingoError::IdentityUnavailable),
        }
    }

    fn digest(&self, material: &str) -> Identifier {
        let mut hasher = Sha256::new();
        hasher.update(material.as_bytes());
        hasher.update(self.salt.as_bytes());
        Identifier(hex::encode(hasher.finalize()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
