//! Witness acknowledgements handed to the application by the total-ordering
//! layer this core consumes but does not define. Opaque pass-through: the
//! agreement core never inspects `ack` beyond routing it to
//! [`crate::delivery::Application::witness_ack_delivered`].

use super::Hash;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessAck {
    pub hash: Hash,
    pub period: u64,
}

impl WitnessAck {
    pub fn new(hash: Hash, period: u64) -> Self {
        Self { hash, period }
    }
}
