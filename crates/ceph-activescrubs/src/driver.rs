use anyhow::{Context, Result};
use ceph_ops_core::{CategoryCounts, ItemRecord, Monitor, SnapshotSource};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Starting,
    Running,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    Refresh,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    RefreshNow,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub interval: Duration,
    pub poll_step: Duration,
}

/// Keyboard input that can be checked without blocking past `timeout`.
pub trait KeySource {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

pub trait View {
    fn draw(&mut self, active: &[ItemRecord], counts: &CategoryCounts) -> io::Result<()>;
}

pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                Ok(Some(map_key(key)))
            }
            _ => Ok(Some(Key::Other)),
        }
    }
}

/// Raw mode swallows SIGINT, so Ctrl-C arrives here and quits like `q`.
pub fn map_key(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Key::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char(' ') => Key::Refresh,
        _ => Key::Other,
    }
}

/// Waits out one cadence tick in `step` slices, returning early on quit or refresh.
pub fn wait_for_next_cycle<K: KeySource>(
    keys: &mut K,
    interval: Duration,
    step: Duration,
) -> io::Result<WaitOutcome> {
    let started = Instant::now();
    loop {
        let elapsed = started.elapsed();
        if elapsed >= interval {
            return Ok(WaitOutcome::Elapsed);
        }
        let slice = step.min(interval - elapsed);
        match keys.poll_key(slice)? {
            Some(Key::Quit) => return Ok(WaitOutcome::Quit),
            Some(Key::Refresh) => return Ok(WaitOutcome::RefreshNow),
            Some(Key::Other) | None => {}
        }
    }
}

pub struct Driver<S, V, K> {
    source: S,
    view: V,
    keys: K,
    monitor: Monitor,
    timing: Timing,
    state: LoopState,
    cycles: u64,
}

impl<S, V, K> Driver<S, V, K>
where
    S: SnapshotSource,
    V: View,
    K: KeySource,
{
    pub fn new(source: S, view: V, keys: K, monitor: Monitor, timing: Timing) -> Self {
        Self {
            source,
            view,
            keys,
            monitor,
            timing,
            state: LoopState::Starting,
            cycles: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    #[cfg(test)]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Runs cycles until the operator quits or the source fails.
    ///
    /// Always ends in `Stopping`; fetch errors are returned, never retried.
    pub fn run(&mut self) -> Result<()> {
        self.transition(LoopState::Running);
        let result = self.run_cycles();
        self.transition(LoopState::Stopping);
        result
    }

    fn run_cycles(&mut self) -> Result<()> {
        loop {
            let snapshot = self
                .source
                .fetch()
                .context("failed to list scrubbing placement groups")?;
            let active = self.monitor.observe(snapshot);
            let counts = CategoryCounts::tally(&active);
            self.view.draw(&active, &counts).context("failed to draw frame")?;
            self.cycles += 1;

            let Timing { interval, poll_step } = self.timing;
            let outcome = wait_for_next_cycle(&mut self.keys, interval, poll_step)
                .context("failed to read keyboard input")?;
            match outcome {
                WaitOutcome::Quit => {
                    info!(cycles = self.cycles, "quit requested");
                    return Ok(());
                }
                WaitOutcome::RefreshNow => debug!("refresh requested"),
                WaitOutcome::Elapsed => {}
            }
        }
    }

    fn transition(&mut self, next: LoopState) {
        debug!(from = ?self.state, to = ?next, "loop state change");
        self.state = next;
    }
}
