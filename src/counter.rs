//! Count-up animation for stat numbers such as `150+`.
//!
//! The animation always runs [`COUNTER_TICKS`] steps, so a large target moves
//! faster than a small one and every counter takes about 1.5s.

use thiserror::Error;

pub const COUNTER_TICKS: u32 = 50;
pub const COUNTER_TICK_MS: u32 = 30;

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_TARGET: u64 = (1 << 53) - 1;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CounterParseError {
    #[error("counter text {0:?} contains no digits")]
    NoDigits(String),
    #[error("counter text {0:?} is too large to animate")]
    OutOfRange(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterTarget {
    pub target: u64,
    pub suffix: String,
}

impl CounterTarget {
    /// Every ASCII digit forms the target and every other character the
    /// suffix, in the order they were written.
    pub fn parse(text: &str) -> Result<Self, CounterParseError> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        let suffix: String = text.chars().filter(|c| !c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return Err(CounterParseError::NoDigits(text.to_string()));
        }

        let target = digits
            .parse::<u64>()
            .ok()
            .filter(|value| *value <= MAX_EXACT_TARGET)
            .ok_or_else(|| CounterParseError::OutOfRange(text.to_string()))?;

        Ok(Self { target, suffix })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: u64,
    pub text: String,
}

/// Yields one frame per tick and ends after the frame showing the target.
#[derive(Clone, Debug)]
pub struct CounterAnimation {
    target: f64,
    suffix: String,
    increment: f64,
    current: f64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(target: &CounterTarget) -> Self {
        Self::with_ticks(target, COUNTER_TICKS)
    }

    pub fn with_ticks(target: &CounterTarget, ticks: u32) -> Self {
        let goal = target.target as f64;
        Self {
            target: goal,
            suffix: target.suffix.clone(),
            increment: goal / f64::from(ticks.max(1)),
            current: 0.0,
            finished: false,
        }
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for CounterAnimation {
    type Item = CounterFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.current += self.increment;
        if self.current >= self.target {
            self.current = self.target;
            self.finished = true;
        }

        let value = self.current.floor() as u64;
        Some(CounterFrame {
            value,
            text: format!("{value}{}", self.suffix),
        })
    }
}
