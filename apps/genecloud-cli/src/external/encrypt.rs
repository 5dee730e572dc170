//! Encrypt short secrets (presigned URLs) with openssl or keybase

use super::ExternalTool;
use crate::error::CliResult;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::ffi::OsString;
use std::path::PathBuf;

/// How a secret is encrypted for its recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionMethod {
    /// RSA public key in PEM format, via `openssl pkeyutl`
    OpensslPublicKey(PathBuf),
    /// Keybase user or team, via `keybase encrypt`
    Keybase { recipient: String, team: bool },
}

/// Runs the encryption tools
#[derive(Debug, Clone)]
pub struct Encryptor {
    openssl: ExternalTool,
    keybase: ExternalTool,
}

impl Default for Encryptor {
    fn default() -> Self {
        Self {
            openssl: ExternalTool::new("openssl"),
            keybase: ExternalTool::new("keybase"),
        }
    }
}

impl Encryptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openssl(mut self, program: impl Into<PathBuf>) -> Self {
        self.openssl = ExternalTool::new(program);
        self
    }

    pub fn with_keybase(mut self, program: impl Into<PathBuf>) -> Self {
        self.keybase = ExternalTool::new(program);
        self
    }

    /// Encrypt `plaintext` and return the ciphertext as standard base64
    pub fn encrypt(&self, plaintext: &str, method: &EncryptionMethod) -> CliResult<String> {
        let output = match method {
            EncryptionMethod::OpensslPublicKey(pem) => {
                let args: [OsString; 7] = [
                    "pkeyutl".into(),
                    "-encrypt".into(),
                    "-inkey".into(),
                    pem.clone().into_os_string(),
                    "-keyform".into(),
                    "PEM".into(),
                    "-pubin".into(),
                ];
                self.openssl.run_with_stdin(args, plaintext.as_bytes())?
            }
            EncryptionMethod::Keybase { recipient, team } => {
                let mut args = vec!["encrypt", "--binary"];
                if *team {
                    args.push("--team");
                }
                args.push(recipient.as_str());
                self.keybase.run_with_stdin(args, plaintext.as_bytes())?
            }
        };

        tracing::debug!(bytes = output.stdout.len(), "Encrypted secret");
        Ok(STANDARD.encode(output.stdout))
    }
}
