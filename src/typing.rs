pub const TYPING_START_DELAY_MS: u32 = 1_500;
pub const TYPING_CHAR_MS: u32 = 80;
pub const GLOW_DELAY_MS: u32 = 500;
pub const GLOW_HOLD_MS: u32 = 1_500;

pub const TYPING_ANIMATION: &str = "pulse 1s ease-in-out infinite";
pub const GLOW_SHADOW: &str = "0 0 20px rgba(37, 99, 235, 0.3)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingPhase {
    Waiting,
    Typing,
    Settling,
    Glowing,
    Done,
}

impl TypingPhase {
    /// Delay before the timer-driven move to the next phase. `Typing` is
    /// driven by [`Typewriter`] instead.
    pub fn hold_ms(self) -> Option<u32> {
        match self {
            Self::Waiting => Some(TYPING_START_DELAY_MS),
            Self::Settling => Some(GLOW_DELAY_MS),
            Self::Glowing => Some(GLOW_HOLD_MS),
            Self::Typing | Self::Done => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Waiting => Self::Typing,
            Self::Typing => Self::Settling,
            Self::Settling => Self::Glowing,
            Self::Glowing | Self::Done => Self::Done,
        }
    }

    pub fn style(self) -> String {
        match self {
            Self::Waiting | Self::Typing => format!("animation: {TYPING_ANIMATION};"),
            Self::Settling => "animation: none;".to_string(),
            Self::Glowing => format!("animation: none; text-shadow: {GLOW_SHADOW};"),
            Self::Done => "animation: none; text-shadow: none;".to_string(),
        }
    }
}

/// Yields growing prefixes of the text, one character per step.
#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown: 0,
        }
    }
}

impl Iterator for Typewriter {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.shown..)?;
        let next_char = rest.chars().next()?;
        self.shown += next_char.len_utf8();
        Some(self.text[..self.shown].to_string())
    }
}
