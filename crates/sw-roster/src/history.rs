use sw_core::RoundResult;

/// Append-only record of finished rounds.
pub trait HistoryLog {
    fn append(&mut self, result: RoundResult);

    fn entries(&self) -> &[RoundResult];

    fn last(&self) -> Option<&RoundResult> {
        self.entries().last()
    }

    /// Latest round, for after-the-fact overrides.
    fn last_mut(&mut self) -> Option<&mut RoundResult>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryHistory {
    entries: Vec<RoundResult>,
}

impl InMemoryHistory {
    pub fn new(entries: Vec<RoundResult>) -> Self {
        Self { entries }
    }

    pub fn into_entries(self) -> Vec<RoundResult> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistoryLog for InMemoryHistory {
    fn append(&mut self, result: RoundResult) {
        self.entries.push(result);
    }

    fn entries(&self) -> &[RoundResult] {
        &self.entries
    }

    fn last_mut(&mut self) -> Option<&mut RoundResult> {
        self.entries.last_mut()
    }
}
