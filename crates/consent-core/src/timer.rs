/// Identifies one arming of the banner timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// One-shot, cancellable timer for the delayed banner.
///
/// The controller only arms and cancels tokens; the host owns the actual
/// clock and reports back with the token it was given. A token that was
/// cancelled or superseded never fires.
#[derive(Debug, Default)]
pub struct BannerTimer {
    next_id: u64,
    armed: Option<TimerToken>,
}

impl BannerTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a new token, superseding any armed one.
    pub fn arm(&mut self) -> TimerToken {
        self.next_id += 1;
        let token = TimerToken(self.next_id);
        self.armed = Some(token);
        token
    }

    /// Cancel the armed token. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    /// Consume `token` if it is the armed one.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.armed == Some(token) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
