use std::collections::HashMap;

/// The deferred steps that drive the game forward without player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    MatchStart,
    RoundStart,
    RoundExpiry,
    EarlyRoundEnd,
    MatchEnd,
    CountdownTick,
}

/// Handle to one scheduled firing. Only the most recently armed token of a
/// kind is live; everything else is stale and ignored when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct TimerSlots {
    next_generation: u64,
    armed: HashMap<TimerKind, u64>,
}

impl TimerSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer, replacing any live timer of the same kind.
    pub fn arm(&mut self, kind: TimerKind) -> TimerToken {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.armed.insert(kind, generation);
        TimerToken { kind, generation }
    }

    /// Returns true if a live timer was cancelled.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.armed.remove(&kind).is_some()
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }

    /// Consume a firing. Succeeds at most once, and only for the live token.
    pub fn claim(&mut self, token: TimerToken) -> bool {
        match self.armed.get(&token.kind) {
            Some(&generation) if generation == token.generation => {
                self.armed.remove(&token.kind);
                true
            }
            _ => false,
        }
    }
}
