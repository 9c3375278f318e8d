use serde::Serialize;

/// The seven wizard steps, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Step {
    #[default]
    Personal,
    Skills,
    Projects,
    Experience,
    Socials,
    Theme,
    Finish,
}

impl Step {
    const ORDER: [Step; 7] = [
        Step::Personal,
        Step::Skills,
        Step::Projects,
        Step::Experience,
        Step::Socials,
        Step::Theme,
        Step::Finish,
    ];

    /// 1-based position.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn next(self) -> Step {
        Self::ORDER
            .get(self as usize + 1)
            .copied()
            .unwrap_or(Step::Finish)
    }

    pub fn prev(self) -> Step {
        (self as usize)
            .checked_sub(1)
            .map(|i| Self::ORDER[i])
            .unwrap_or(Step::Personal)
    }
}
