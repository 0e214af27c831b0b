use playground_core::ToggleOutcome;

/// What the real system should produce for a given operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// A selection with this ticket value.
    Selected { ticket: u64 },
    /// Added to this compare slot.
    Added { slot: usize },
    /// Removed from this compare slot.
    Removed { slot: usize },
    /// Compare is full.
    Rejected,
}

impl Expected {
    /// Does `outcome` match this expectation? Compare tickets are not modeled.
    pub fn matches_toggle(&self, outcome: &ToggleOutcome) -> bool {
        match (self, outcome) {
            (Expected::Added { slot: a }, ToggleOutcome::Added { slot: b, .. }) => a == b,
            (Expected::Removed { slot: a }, ToggleOutcome::Removed { slot: b }) => a == b,
            (Expected::Rejected, ToggleOutcome::Rejected) => true,
            _ => false,
        }
    }
}

/// Ground truth model of selection and compare state.
#[derive(Debug, Clone)]
pub struct Oracle {
    /// Selections issued so far in the main panel.
    selections: u64,
    /// Agent id most recently selected.
    last_selected: Option<String>,
    /// Agent id held by each compare slot.
    slots: Vec<Option<String>>,
}

impl Oracle {
    pub fn new(max_slots: usize) -> Self {
        Oracle {
            selections: 0,
            last_selected: None,
            slots: vec![None; max_slots.max(1)],
        }
    }

    pub fn last_selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    /// Compare slots in order.
    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    /// Read-only prediction for the next selection.
    pub fn predict_select(&self) -> Expected {
        Expected::Selected {
            ticket: self.selections + 1,
        }
    }

    /// Read-only prediction for toggling `agent_id`.
    pub fn predict_toggle(&self, agent_id: &str) -> Expected {
        if let Some(slot) = self.slot_of(agent_id) {
            return Expected::Removed { slot };
        }
        match self.slots.iter().position(Option::is_none) {
            Some(slot) => Expected::Added { slot },
            None => Expected::Rejected,
        }
    }

    pub fn commit_select(&mut self, agent_id: &str) {
        self.selections += 1;
        self.last_selected = Some(agent_id.to_string());
    }

    pub fn commit_toggle(&mut self, agent_id: &str) {
        match self.predict_toggle(agent_id) {
            Expected::Removed { slot } => self.slots[slot] = None,
            Expected::Added { slot } => self.slots[slot] = Some(agent_id.to_string()),
            _ => {}
        }
    }

    fn slot_of(&self, agent_id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_deref() == Some(agent_id))
    }
}
