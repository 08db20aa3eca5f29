//! Token generators.
//!
//! [`XidGenerator`] mints production tokens from the clock, a machine
//! discriminator, the process id and a per-generator counter. The counter is
//! the only mutable state and is an atomic, so one generator can be shared by
//! any number of threads.
//!
//! [`SequenceGenerator`] produces a predictable series for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use sha2::{Digest, Sha256};
use tracing::{trace, warn};

use super::clock::{Clock, SystemClock};
use crate::domain::Token;

/// Mints fresh tokens.
pub trait TokenGenerator: Send + Sync {
    /// Mint a new token. Never returns [`Token::NIL`].
    fn next_token(&self) -> Token;
}

/// Generator for xid-layout tokens.
pub struct XidGenerator {
    /// Machine discriminator.
    machine: [u8; 3],
    /// Process discriminator.
    pid: u16,
    /// Next counter value; only the low 24 bits are used.
    counter: AtomicU32,
    /// Time source for the leading timestamp.
    clock: Arc<dyn Clock>,
}

impl XidGenerator {
    /// Create a generator for this host and process using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a generator for this host and process using `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_identity(machine_id(), process_id(), rand::random(), clock)
    }

    /// Create a generator with explicit discriminators and counter seed.
    #[must_use]
    pub fn with_identity(
        machine: [u8; 3],
        pid: u16,
        counter_seed: u32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            machine,
            pid,
            counter: AtomicU32::new(counter_seed),
            clock,
        }
    }

    /// Machine discriminator embedded in every token.
    #[must_use]
    pub const fn machine(&self) -> [u8; 3] {
        self.machine
    }

    /// Process discriminator embedded in every token.
    #[must_use]
    pub const fn pid(&self) -> u16 {
        self.pid
    }
}

impl Default for XidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator for XidGenerator {
    fn next_token(&self) -> Token {
        let seconds = self.clock.now().timestamp();
        // Clamp to the 32-bit field; before 1970 reads as 0.
        let seconds = u32::try_from(seconds.max(0)).unwrap_or(u32::MAX);
        let counter = self.counter.fetch_add(1, Ordering::Relaxed);

        let token = Token::from_parts(seconds, self.machine, self.pid, counter);
        trace!(%token, "Minted token");
        token
    }
}

/// Deterministic generator: fixed timestamp and identity, counter from 1.
#[derive(Debug)]
pub struct SequenceGenerator {
    seconds: u32,
    machine: [u8; 3],
    pid: u16,
    next: AtomicU32,
}

impl SequenceGenerator {
    /// Create a generator whose tokens all carry `seconds` as their timestamp.
    #[must_use]
    pub const fn new(seconds: u32) -> Self {
        Self {
            seconds,
            machine: [0; 3],
            pid: 0,
            next: AtomicU32::new(1),
        }
    }
}

impl TokenGenerator for SequenceGenerator {
    fn next_token(&self) -> Token {
        let counter = self.next.fetch_add(1, Ordering::Relaxed);
        Token::from_parts(self.seconds, self.machine, self.pid, counter)
    }
}

/// First three bytes of the SHA-256 of the host name, or random bytes.
fn machine_id() -> [u8; 3] {
    match hostname::get() {
        Ok(name) if !name.is_empty() => {
            let digest = Sha256::digest(name.as_encoded_bytes());
            [digest[0], digest[1], digest[2]]
        }
        Ok(_) => rand::random(),
        Err(e) => {
            warn!(error = %e, "Host name unavailable, using random machine id");
            rand::random()
        }
    }
}

/// Low 16 bits of the OS process id.
fn process_id() -> u16 {
    u16::try_from(std::process::id() & 0xFFFF).unwrap_or_default()
}
