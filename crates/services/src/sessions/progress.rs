/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Rounded share of the session already passed, in percent.
    #[must_use]
    pub fn percent_done(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let done = self.total.saturating_sub(self.remaining);
        u32::try_from((done * 100 + self.total / 2) / self.total).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_done_rounds() {
        let progress = SessionProgress {
            total: 3,
            answered: 1,
            remaining: 2,
            is_complete: false,
        };
        assert_eq!(progress.percent_done(), 33);

        let empty = SessionProgress {
            total: 0,
            answered: 0,
            remaining: 0,
            is_complete: true,
        };
        assert_eq!(empty.percent_done(), 0);
    }
}
