//! Tick source and frame presentation
//!
//! Wall-clock time is turned into whole simulation ticks by [`FixedStep`];
//! a [`Session`] applies queued input events, runs the due ticks and hands
//! one [`Frame`] per presented frame to a [`FrameSink`]. Simulation speed
//! never depends on how fast frames are presented.

use std::sync::mpsc::Receiver;
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{MAX_CATCHUP_TICKS, SIM_DT};
use crate::sim::frame::Frame;
use crate::sim::state::{GameEvent, GameState};
use crate::sim::tick::{TickInput, tick};

/// Player commands from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Held state changed
    MoveLeft(bool),
    MoveRight(bool),
    Jump,
    Fire,
    FireSpecial,
    Pause,
    /// Stop after the current frame is presented
    Quit,
}

/// Receives each presented frame (renderer, recorder, ...)
pub trait FrameSink {
    type Error;

    fn present(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    dt: f32,
    max_catchup: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_CATCHUP_TICKS)
    }
}

impl FixedStep {
    pub fn new(dt: f32, max_catchup: u32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_catchup,
        }
    }

    /// Add elapsed seconds; returns how many ticks are due
    ///
    /// At most `max_catchup` ticks per call. Any backlog beyond that is
    /// dropped so a long stall never snowballs.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_catchup {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        if self.accumulator >= self.dt {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator %= self.dt;
        }
        ticks
    }

    /// Unconsumed time (seconds)
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// A running game: state, held controls and the tick clock
#[derive(Debug)]
pub struct Session {
    pub state: GameState,
    input: TickInput,
    step: FixedStep,
    quit: bool,
}

impl Session {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            input: TickInput::default(),
            step: FixedStep::default(),
            quit: false,
        }
    }

    /// Let the built-in pilot play
    pub fn with_autopilot(mut self) -> Self {
        self.input.autopilot = true;
        self
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Fold one event into the pending input
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeft(held) => self.input.left = held,
            InputEvent::MoveRight(held) => self.input.right = held,
            InputEvent::Jump => self.input.jump = true,
            InputEvent::Fire => self.input.fire = true,
            InputEvent::FireSpecial => self.input.fire_special = true,
            InputEvent::Pause => self.input.pause = true,
            InputEvent::Quit => self.quit = true,
        }
    }

    /// Apply everything queued without blocking
    pub fn drain(&mut self, events: &Receiver<InputEvent>) {
        for event in events.try_iter() {
            self.handle(event);
        }
    }

    /// Run exactly one tick and clear the one-shot commands it consumed
    pub fn step_once(&mut self) {
        tick(&mut self.state, &self.input);
        self.input.jump = false;
        self.input.fire = false;
        self.input.fire_special = false;
        self.input.pause = false;
    }

    /// Run the ticks due after `elapsed` seconds, then present one frame
    ///
    /// Returns the number of ticks run.
    pub fn frame<S: FrameSink>(&mut self, elapsed: f32, sink: &mut S) -> Result<u32, S::Error> {
        let ticks = self.step.advance(elapsed);
        for _ in 0..ticks {
            self.step_once();
        }
        sink.present(&Frame::capture(&self.state))?;
        Ok(ticks)
    }

    /// Events for the audio collaborator since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

/// Drive a session against the wall clock until quit, game over or `max_ticks`
pub fn run_realtime<S: FrameSink>(
    session: &mut Session,
    events: &Receiver<InputEvent>,
    sink: &mut S,
    max_ticks: Option<u64>,
) -> Result<(), S::Error> {
    let frame_time = Duration::from_secs_f32(SIM_DT);
    let mut last = Instant::now();

    loop {
        session.drain(events);

        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f32();
        last = now;
        session.frame(elapsed, sink)?;

        if session.quit_requested() {
            log::info!("Quit requested at tick {}", session.state.t);
            break;
        }
        if session.state.is_over() || max_ticks.is_some_and(|max| session.state.t >= max) {
            break;
        }

        let spent = now.elapsed();
        if spent < frame_time {
            thread::sleep(frame_time - spent);
        }
    }
    Ok(())
}
