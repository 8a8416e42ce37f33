use crate::graph::Lens;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub lens: Lens,
}

/// Hands out tickets and decides whether a finished load still matches what the user
/// is looking at. Issuing a new ticket invalidates every older one.
#[derive(Debug, Default)]
pub struct LoadTracker {
    generation: u64,
}

impl LoadTracker {
    pub fn issue(&mut self, lens: Lens) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        LoadTicket {
            generation: self.generation,
            lens,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket, lens: Lens) -> bool {
        let current = ticket.generation == self.generation && ticket.lens == lens;
        if !current {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "discarding stale graph load"
            );
        }
        current
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
