//! Readable, low-collision ids
//!
//! Ids look like `clip_1718000000000_k3j9x0a2b`: a prefix, the wall-clock
//! time in epoch milliseconds, and nine random base-36 characters. They are
//! tags for debugging and client-side bookkeeping, not secure or guaranteed
//! unique keys.

use chrono::Utc;
use rand::rngs::ThreadRng;
use rand::Rng;

/// Prefix used when the caller does not pick one.
pub const DEFAULT_ID_PREFIX: &str = "item";

/// Length of the random suffix.
pub const TOKEN_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of the current time in epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

/// Id generator with an injected clock and random source.
pub struct IdGenerator<C = SystemClock, R = ThreadRng> {
    clock: C,
    rng: R,
}

impl IdGenerator {
    /// Generator backed by the wall clock and the thread-local RNG.
    pub fn new() -> Self {
        Self {
            clock: SystemClock,
            rng: rand::thread_rng(),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, R: Rng> IdGenerator<C, R> {
    pub fn with_sources(clock: C, rng: R) -> Self {
        Self { clock, rng }
    }

    /// Produce `<prefix>_<millis>_<token>`.
    pub fn generate(&mut self, prefix: &str) -> String {
        let token: String = (0..TOKEN_LEN)
            .map(|_| BASE36[self.rng.gen_range(0..BASE36.len())] as char)
            .collect();
        format!("{}_{}_{}", prefix, self.clock.now_millis(), token)
    }
}

/// Generate an id from the wall clock and thread RNG.
pub fn generate_id(prefix: &str) -> String {
    IdGenerator::new().generate(prefix)
}

/// The pieces of a generated id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParts<'a> {
    pub prefix: &'a str,
    pub millis: u64,
    pub token: &'a str,
}

/// Split a generated id. The prefix may itself contain underscores.
pub fn parse_id(id: &str) -> Option<IdParts<'_>> {
    let mut parts = id.rsplitn(3, '_');
    let token = parts.next()?;
    let millis = parts.next()?;
    let prefix = parts.next()?;

    let token_ok =
        token.len() == TOKEN_LEN && token.bytes().all(|b| BASE36.contains(&b));
    let millis_ok = !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit());
    if !token_ok || !millis_ok {
        return None;
    }

    Some(IdParts {
        prefix,
        millis: millis.parse().ok()?,
        token,
    })
}
