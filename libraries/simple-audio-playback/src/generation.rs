//! Request superseding
//!
//! Every load bumps the generation. An asynchronous call captures the token
//! current when it started and applies its result only if no newer request
//! has been issued in the meantime.

/// Token captured when an asynchronous request starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw generation value (for logging)
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic request generation
#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    /// Create a counter at generation 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all outstanding ones
    pub fn advance(&mut self) -> RequestToken {
        self.current = self.current.wrapping_add(1);
        RequestToken(self.current)
    }

    /// Token for a request that should be discarded by the next `advance`
    /// but does not itself supersede anything
    pub fn current(&self) -> RequestToken {
        RequestToken(self.current)
    }

    /// Whether `token` is still the newest request
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == token.0
    }
}
