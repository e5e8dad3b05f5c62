//! Logging utilities
//!
//! The KAS core only emits `tracing` spans and events and never installs a
//! subscriber itself. Hosts and test harnesses that want output call
//! [`init_tracing`]; byte buffers that reach a log line go through
//! [`sanitize_data`] or [`sanitize_bytes`] so key material is never printed.
//!
//! ```rust,no_run
//! use kas_core::logging::{init_tracing, sanitize_data};
//!
//! init_tracing().ok();
//! let z = [0u8; 32];
//! tracing::info!("shared secret computed: {}", sanitize_data(&z));
//! ```

use kas_primitives::HashFunction;
use std::fmt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "kas_core=info";

/// Buffers up to this size are shown by length only.
const FINGERPRINT_THRESHOLD: usize = 32;

/// Install a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init()?;

    info!("KAS logging initialized");
    Ok(())
}

/// First 16 hex characters of SHA2-256, for correlating buffers across log
/// lines without revealing them.
fn fingerprint(data: &[u8]) -> String {
    let digest = HashFunction::Sha2_256.digest(data);
    digest.get(..8).map_or_else(|| hex::encode(&digest), hex::encode)
}

/// Length, plus a fingerprint for buffers over 32 bytes.
///
/// ```rust
/// use kas_core::logging::sanitize_bytes;
///
/// assert_eq!(sanitize_bytes(&[1, 2, 3]), "[3 bytes]");
/// assert!(sanitize_bytes(&[0u8; 100]).starts_with("[100 bytes, fingerprint: "));
/// ```
#[must_use]
pub fn sanitize_bytes(data: &[u8]) -> String {
    if data.len() <= FINGERPRINT_THRESHOLD {
        format!("[{} bytes]", data.len())
    } else {
        format!("[{} bytes, fingerprint: {}]", data.len(), fingerprint(data))
    }
}

/// Display wrapper that renders only the length of a buffer.
#[must_use]
pub fn sanitize_data(data: &[u8]) -> SanitizedData<'_> {
    SanitizedData(data)
}

/// See [`sanitize_data`].
pub struct SanitizedData<'a>(&'a [u8]);

impl fmt::Display for SanitizedData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} bytes]", self.0.len())
    }
}
