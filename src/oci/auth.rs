//! OCI Authentication
//!
//! Reads API-key profiles from the OCI config file (`~/.oci/config`) and
//! signs requests with the OCI HTTP signature scheme (version 1,
//! `rsa-sha256` over `date (request-target) host`).

use anyhow::{bail, Context, Result};
use base64::prelude::*;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Profile used when none is configured
pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// Headers covered by the signature, in signing order
const SIGNED_HEADERS: &str = "date (request-target) host";

/// API-key credentials of one config-file profile
#[derive(Debug, Clone, PartialEq)]
pub struct OciProfile {
    pub user: String,
    pub fingerprint: String,
    pub key_file: PathBuf,
    pub tenancy: String,
    pub region: String,
}

impl OciProfile {
    /// Load a profile from a config file on disk
    pub fn load(path: &Path, profile: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read OCI config file {}", path.display()))?;
        parse_profile(&content, profile)
    }

    /// `keyId` presented in the Authorization header
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }
}

/// Default location of the OCI config file
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("OCI_CLI_CONFIG_FILE") {
        return expand_home(&path);
    }
    dirs::home_dir()
        .map(|home| home.join(".oci").join("config"))
        .unwrap_or_else(|| PathBuf::from(".oci/config"))
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Split INI content into sections of key/value pairs
fn parse_sections(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        let (Some(section), Some((key, value))) = (current.as_ref(), line.split_once('=')) else {
            continue;
        };
        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    sections
}

/// Resolve one profile; keys missing from it are inherited from `[DEFAULT]`
pub fn parse_profile(content: &str, profile: &str) -> Result<OciProfile> {
    let sections = parse_sections(content);

    let mut values = sections.get(DEFAULT_PROFILE).cloned().unwrap_or_default();
    match sections.get(profile) {
        Some(own) => values.extend(own.clone()),
        None => bail!("Profile '{}' not found in OCI config file", profile),
    }

    if values.contains_key("pass_phrase") {
        bail!(
            "Profile '{}' uses an encrypted key (pass_phrase); only unencrypted API keys are supported",
            profile
        );
    }

    let required = |key: &str| -> Result<String> {
        values
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
            .with_context(|| format!("Profile '{}' is missing required key '{}'", profile, key))
    };

    Ok(OciProfile {
        user: required("user")?,
        fingerprint: required("fingerprint")?,
        key_file: expand_home(&required("key_file")?),
        tenancy: required("tenancy")?,
        region: required("region")?,
    })
}

/// Signs outgoing requests with an API signing key
#[derive(Clone)]
pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl RequestSigner {
    pub fn new(key_id: impl Into<String>, key: RsaPrivateKey) -> Self {
        Self {
            key_id: key_id.into(),
            signing_key: SigningKey::<Sha256>::new(key),
        }
    }

    /// Build a signer from the profile's key file
    pub fn from_profile(profile: &OciProfile) -> Result<Self> {
        let pem = std::fs::read_to_string(&profile.key_file).with_context(|| {
            format!("Failed to read API signing key {}", profile.key_file.display())
        })?;
        Self::from_pem(profile.key_id(), &pem)
    }

    /// Accepts PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1 (`BEGIN RSA PRIVATE KEY`)
    pub fn from_pem(key_id: impl Into<String>, pem: &str) -> Result<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .ok()
            .or_else(|| RsaPrivateKey::from_pkcs1_pem(pem).ok())
            .context("Failed to parse API signing key (expected an unencrypted RSA PEM key)")?;
        Ok(Self::new(key_id, key))
    }

    /// Value of the Authorization header for one request
    pub fn authorization(&self, method: &str, path_and_query: &str, host: &str, date: &str) -> String {
        let signing_string = signing_string(method, path_and_query, host, date);
        let signature = self.signing_key.sign(signing_string.as_bytes());
        format!(
            "Signature version=\"1\",headers=\"{}\",keyId=\"{}\",algorithm=\"rsa-sha256\",signature=\"{}\"",
            SIGNED_HEADERS,
            self.key_id,
            BASE64_STANDARD.encode(signature.to_bytes())
        )
    }
}

/// The exact byte sequence covered by the signature
pub fn signing_string(method: &str, path_and_query: &str, host: &str, date: &str) -> String {
    format!(
        "date: {}\n(request-target): {} {}\nhost: {}",
        date,
        method.to_lowercase(),
        path_and_query,
        host
    )
}

/// RFC 7231 date for the `date` header
pub fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
