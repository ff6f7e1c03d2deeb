//! Canned chat replies.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const RESPONSES: [&str; 4] = [
    "Hello! How can I assist you today?",
    "I'm here to help you with your queries.",
    "What would you like to know?",
    "Feel free to ask me anything!",
];

/// Picks a reply uniformly at random. The generator is seeded once when the
/// responder is built.
pub struct Responder {
    rng: Mutex<StdRng>,
}

impl Responder {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The conversation context is accepted but does not influence the reply.
    pub fn respond(&self, _context: &str) -> &'static str {
        let idx = self.rng.lock().gen_range(0..RESPONSES.len());
        RESPONSES[idx]
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}
