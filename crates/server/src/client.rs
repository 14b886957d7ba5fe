//! Read-only view of the client subsystem.
//!
//! The API resource service only needs the secret vocabulary the client
//! subsystem publishes (which secret types exist, which hash algorithms can
//! be applied to shared secrets). It never reads or writes client records.

use crate::dto::HashType;

/// Secret type whose value is hashed before it is stored.
pub const SHARED_SECRET: &str = "SharedSecret";

pub trait ClientCatalog: Send + Sync {
    fn secret_types(&self) -> Vec<String>;
    fn hash_types(&self) -> Vec<HashType>;

    fn is_known_secret_type(&self, secret_type: &str) -> bool {
        self.secret_types().iter().any(|t| t == secret_type)
    }

    fn is_supported_hash_type(&self, hash_type: HashType) -> bool {
        self.hash_types().contains(&hash_type)
    }
}

/// The secret vocabulary understood by IdentityServer-compatible providers.
#[derive(Debug, Clone, Default)]
pub struct StandardClientCatalog;

impl ClientCatalog for StandardClientCatalog {
    fn secret_types(&self) -> Vec<String> {
        [
            SHARED_SECRET,
            "X509Thumbprint",
            "X509Name",
            "X509CertificateBase64",
            "JWK",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn hash_types(&self) -> Vec<HashType> {
        vec![HashType::Sha256, HashType::Sha512]
    }
}
