//! Id generation
//!
//! Session ids, request ids and client GUIDs only need to be echoed back by
//! the server, not to be unpredictable. Clients take any `RngCore` so tests
//! can inject deterministic sequences (e.g. `rand::rngs::mock::StepRng`).

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Boxed id generator owned by a client
pub type IdSource = Box<dyn RngCore + Send>;

/// Entropy-seeded generator used when none is injected
pub fn default_id_source() -> IdSource {
    Box::new(StdRng::from_entropy())
}

/// Query session ids must keep only the low nibble of each byte
pub fn query_session_id(ids: &mut dyn RngCore) -> u32 {
    ids.next_u32() & 0x0F0F_0F0F
}

/// RCON request ids are positive so they never collide with the `-1` failure marker
pub fn rcon_request_id(ids: &mut dyn RngCore) -> i32 {
    (ids.next_u32() & 0x7FFF_FFFF) as i32
}
