//! Subcommand implementations.
//!
//! Each command returns its output instead of printing, so the binary owns
//! stdout and tests can drive the commands directly.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use telemetry_crypto::DeviceKeyPair;
use telemetry_token::{
    Claims, RegistryEntry, RejectionReason, TokenSigner, TokenVerificationApi, VerificationResult,
};

use crate::registry_file::RegistryFile;

/// Freshly generated device credentials.
#[derive(Debug, Serialize)]
pub struct KeygenOutput {
    /// Device the key was generated for
    pub device_id: String,
    /// Hex SEC1 compressed public key, safe to share
    pub public_key: String,
    /// Hex private scalar, device-only
    pub secret_key: String,
}

/// Generate a key pair for `device_id`, optionally recording the public half
/// in a registry file.
pub fn keygen(device_id: &str, registry: Option<&Path>) -> Result<KeygenOutput> {
    let key_pair = DeviceKeyPair::generate();
    let public_key = key_pair.public_key();

    if let Some(path) = registry {
        let mut file = RegistryFile::load_or_default(path)?;
        file.upsert(RegistryEntry {
            device_id: device_id.to_string(),
            public_key,
        });
        file.save(path)?;
        info!(
            device_id = %device_id,
            fingerprint = %public_key.fingerprint(),
            registry = %path.display(),
            "Device provisioned"
        );
    }

    Ok(KeygenOutput {
        device_id: device_id.to_string(),
        public_key: public_key.to_hex(),
        secret_key: key_pair.secret_hex().to_string(),
    })
}

/// Sign `claims` with the hex-encoded device key and return the wire token.
pub fn issue(secret_key_hex: &str, claims: &Claims) -> Result<String> {
    let key_pair = DeviceKeyPair::from_hex(secret_key_hex.trim()).context("loading device key")?;
    let wire = TokenSigner::new(key_pair)
        .issue_wire(claims)
        .context("issuing token")?;
    Ok(wire)
}

/// Counts from one verification stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    /// Tokens that verified
    pub verified: usize,
    /// Tokens that were rejected
    pub rejected: usize,
}

/// Verify one token per input line, writing one JSON result per line.
///
/// Blank lines are skipped. With `now` set every token is checked at that
/// time instead of the wall clock. Lines longer than `max_token_len` plus a
/// line terminator, or not valid UTF-8, are rejected as `MalformedToken`
/// without being buffered whole, and the stream carries on.
pub async fn verify_stream<A, R, W>(
    api: &A,
    now: Option<u64>,
    max_token_len: usize,
    mut input: R,
    output: &mut W,
) -> Result<StreamSummary>
where
    A: TokenVerificationApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = StreamSummary::default();
    let mut line = Vec::new();
    let limit = max_token_len.saturating_add(1);

    while let Some(line_read) = read_bounded_line(&mut input, limit, &mut line)
        .await
        .context("reading tokens")?
    {
        let result = match (line_read, std::str::from_utf8(&line)) {
            (LineRead::Complete, Ok(text)) => {
                let wire = text.trim();
                if wire.is_empty() {
                    continue;
                }
                match now {
                    Some(now) => api.verify_token_at(wire, now),
                    None => api.verify_token(wire),
                }
            }
            (LineRead::Oversized, _) => {
                debug!(limit, "Token line over length cap");
                VerificationResult::rejected(RejectionReason::MalformedToken)
            }
            (LineRead::Complete, Err(err)) => {
                debug!(error = %err, "Token line is not UTF-8");
                VerificationResult::rejected(RejectionReason::MalformedToken)
            }
        };

        if result.is_verified() {
            summary.verified += 1;
        } else {
            summary.rejected += 1;
        }

        let mut json = serde_json::to_vec(&result)?;
        json.push(b'\n');
        output.write_all(&json).await?;
    }

    output.flush().await?;
    info!(
        verified = summary.verified,
        rejected = summary.rejected,
        "Token stream finished"
    );
    Ok(summary)
}

/// How a line ended up in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineRead {
    /// The whole line, without its terminator
    Complete,
    /// Line exceeded the limit; the rest was discarded
    Oversized,
}

/// Read up to the next `\n`, keeping at most `limit` bytes in `buf`.
///
/// Returns `None` at end of input.
async fn read_bounded_line<R>(
    input: &mut R,
    limit: usize,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<LineRead>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let mut oversized = false;
    let mut read_any = false;

    loop {
        let available = input.fill_buf().await?;
        if available.is_empty() {
            return Ok(read_any.then_some(if oversized {
                LineRead::Oversized
            } else {
                LineRead::Complete
            }));
        }
        read_any = true;

        let newline = available.iter().position(|&b| b == b'\n');
        let chunk = &available[..newline.unwrap_or(available.len())];
        if !oversized {
            if buf.len() + chunk.len() > limit {
                oversized = true;
                buf.clear();
            } else {
                buf.extend_from_slice(chunk);
            }
        }

        let used = newline.map_or(available.len(), |i| i + 1);
        input.consume(used);

        if newline.is_some() {
            return Ok(Some(if oversized {
                LineRead::Oversized
            } else {
                LineRead::Complete
            }));
        }
    }
}
