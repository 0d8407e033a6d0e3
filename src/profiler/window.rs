// PC Trace — Collection Window
//
// Collecting ──[now > stop_tick]──▶ DoneCollecting ──[flush done]──▶ Collecting
//
// Only the trace task evaluates expiry.  The comparison is done as
// `now - start > duration` in wrapping arithmetic, which matches
// `now > stop_tick` and keeps working across the 32-bit tick wrap.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Collecting,
    DoneCollecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionWindow {
    start_tick: u32,
    duration: u32,
    state: WindowState,
    index: u32,
}

impl CollectionWindow {
    /// Open the first window at `now`.
    pub fn open(now: u32, duration: u32) -> Self {
        Self {
            start_tick: now,
            duration,
            state: WindowState::Collecting,
            index: 0,
        }
    }

    /// Advance the state machine.  Once `DoneCollecting` the window stays
    /// there until [`restart`](Self::restart).
    pub fn poll(&mut self, now: u32) -> WindowState {
        if self.state == WindowState::Collecting
            && now.wrapping_sub(self.start_tick) > self.duration
        {
            self.state = WindowState::DoneCollecting;
        }
        self.state
    }

    /// Begin the next window after a flush.
    pub fn restart(&mut self, now: u32) {
        self.start_tick = now;
        self.state = WindowState::Collecting;
        self.index = self.index.wrapping_add(1);
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn start_tick(&self) -> u32 {
        self.start_tick
    }

    pub fn stop_tick(&self) -> u32 {
        self.start_tick.wrapping_add(self.duration)
    }

    /// Number of windows flushed so far.
    pub fn index(&self) -> u32 {
        self.index
    }
}
