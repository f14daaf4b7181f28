// Payload Source Port (pluggable item generation)

use rand::rngs::StdRng;
use rand::Rng;
use std::fmt::Write;

/// Default token width in bytes (10 hex characters)
pub const DEFAULT_TOKEN_BYTES: usize = 5;

/// Produces the payloads a producer puts on the queue
pub trait PayloadSource: Send {
    type Payload: Send + 'static;

    fn next_payload(&mut self) -> Self::Payload;
}

/// Any `FnMut() -> P` closure is a payload source
impl<F, P> PayloadSource for F
where
    F: FnMut() -> P + Send,
    P: Send + 'static,
{
    type Payload = P;

    fn next_payload(&mut self) -> P {
        self()
    }
}

/// Random lowercase hex tokens (production default)
pub struct HexTokenSource {
    rng: StdRng,
    bytes: usize,
}

impl HexTokenSource {
    pub fn new(rng: StdRng) -> Self {
        Self::with_bytes(rng, DEFAULT_TOKEN_BYTES)
    }

    pub fn with_bytes(rng: StdRng, bytes: usize) -> Self {
        Self { rng, bytes }
    }
}

impl PayloadSource for HexTokenSource {
    type Payload = String;

    fn next_payload(&mut self) -> String {
        let mut token = String::with_capacity(self.bytes * 2);
        for _ in 0..self.bytes {
            let byte: u8 = self.rng.gen();
            // Writing to a String cannot fail
            let _ = write!(token, "{:02x}", byte);
        }
        token
    }
}
