/// Collapses bursts of events into one delivery per animation frame.
///
/// `offer` stores the newest value and reports whether a frame must be
/// requested; `take` is called from the frame callback.
#[derive(Debug)]
pub struct FrameCoalescer<T> {
    latest: Option<T>,
    scheduled: bool,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            latest: None,
            scheduled: false,
        }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn offer(&mut self, value: T) -> bool {
        self.latest = Some(value);
        !std::mem::replace(&mut self.scheduled, true)
    }

    pub fn take(&mut self) -> Option<T> {
        self.scheduled = false;
        self.latest.take()
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Drops any pending value, e.g. when the frame request is cancelled.
    pub fn reset(&mut self) {
        self.scheduled = false;
        self.latest = None;
    }
}
