//! Level director
//!
//! A level is a table of phases. Each phase gives every enemy kind an
//! `(offset, interval)` schedule and a sea state; the director walks the
//! table one tick at a time and reports which kinds are due.

use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::water::WaterField;

/// Game mode: scripted story or the endless loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Story,
    Endless,
}

/// Spawnable kinds, in phase-table column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Shark,
    Pirate,
    Mine,
    Seagull,
    Boss,
    Powerup,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Shark,
        EnemyKind::Pirate,
        EnemyKind::Mine,
        EnemyKind::Seagull,
        EnemyKind::Boss,
        EnemyKind::Powerup,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Kinds due to spawn on one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnSet(u8);

impl SpawnSet {
    pub fn contains(self, kind: EnemyKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: EnemyKind) {
        self.0 |= kind.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = EnemyKind> {
        EnemyKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

/// When one kind spawns within a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub offset: i32,
    /// `> 0` repeats, `-1` fires once at `offset`, anything else is off
    pub interval: i32,
}

impl Schedule {
    pub const fn new(offset: i32, interval: i32) -> Self {
        Self { offset, interval }
    }

    /// Is this schedule due at `t` ticks into the phase
    pub fn due(self, t: i32) -> bool {
        match self.interval {
            -1 => t == self.offset,
            i if i > 0 => t % i == self.offset,
            _ => false,
        }
    }

    /// Endless-mode tightening after `steps` rounds of four phases
    fn tightened(self, steps: i32) -> Self {
        if self.interval <= 0 {
            return self;
        }
        let cut = steps.saturating_mul(5);
        Self {
            offset: self.offset.saturating_sub(cut).max(0),
            interval: self.interval.saturating_sub(cut).max(ENDLESS_INTERVAL_FLOOR),
        }
    }
}

/// One phase row: a schedule per [`EnemyKind`]
pub type PhaseRow = [Schedule; 6];

const ENDLESS_INTERVAL_FLOOR: i32 = 30;
const ENDLESS_LENGTH_FLOOR: i32 = 30;
/// Banner timing (ticks into a phase)
const BANNER_TICKS: i32 = 120;
const BANNER_FADE_START: i32 = 60;
const COLOR_TOKEN: &str = "{color}";

/// A complete level table
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMap {
    /// Ticks per phase; `-1` never times out
    pub lengths: Vec<i32>,
    pub messages: Vec<String>,
    /// Substituted for `{color}` in messages
    pub colors: Vec<String>,
    /// Wave amplitude per phase
    pub weather: Vec<f32>,
    pub phases: Vec<PhaseRow>,
}

const fn row(r: [(i32, i32); 6]) -> PhaseRow {
    [
        Schedule::new(r[0].0, r[0].1),
        Schedule::new(r[1].0, r[1].1),
        Schedule::new(r[2].0, r[2].1),
        Schedule::new(r[3].0, r[3].1),
        Schedule::new(r[4].0, r[4].1),
        Schedule::new(r[5].0, r[5].1),
    ]
}

const STORY_PHASES: [PhaseRow; 6] = [
    row([(10, 80), (230, 0), (120, 0), (0, 3000), (1, 0), (450, 1000)]),
    row([(100, 300), (257, 0), (70, 137), (0, 3000), (1, 0), (0, 1000)]),
    row([(257, 500), (30, 300), (470, 500), (0, 1500), (1, 0), (0, 1000)]),
    row([(0, 183), (230, 319), (40, 217), (0, 700), (1, 0), (0, 1000)]),
    row([(0, 233), (230, 519), (40, 317), (0, 700), (1, 0), (0, 1000)]),
    row([(70, 200), (300, 0), (0, 200), (0, 0), (10, -1), (0, 0)]),
];

const ENDLESS_PHASES: [PhaseRow; 4] = [
    row([(0, 255), (150, 257), (50, 253), (0, 507), (0, 0), (100, 0)]),
    row([(0, 150), (400, 700), (50, 700), (0, 507), (0, 0), (500, 0)]),
    row([(150, 400), (0, 150), (350, 500), (0, 507), (0, 0), (500, 0)]),
    row([(350, 500), (150, 400), (20, 150), (0, 507), (0, 0), (100, -1)]),
];

const COLORS: [&str; 18] = [
    "Brown", "Red", "Yellow", "Magenta", "Pink", "Cyan", "Blue", "Black", "Green", "Violet",
    "Beige", "White", "Gray", "Blonde", "Orange", "Brunette", "Ginger", "Turquoise",
];

impl LevelMap {
    pub fn story() -> Self {
        Self {
            lengths: vec![900, 900, 900, 1800, 1300, -1],
            messages: [
                "Watch out for those angry sharks, captain!",
                "Minefield ahead, captain!",
                "Oh no! It's the infamous fleet of pirate Captain {color}beard!",
                "",
                "Uh, oh. Looks like some busy waters ahead, captain!",
                "Holy cow! It's the legendary Titanic!",
            ]
            .map(String::from)
            .to_vec(),
            colors: COLORS.map(String::from).to_vec(),
            weather: vec![30.0, 40.0, 20.0, 30.0, 60.0, 5.0],
            phases: STORY_PHASES.to_vec(),
        }
    }

    pub fn endless() -> Self {
        Self {
            lengths: vec![450],
            messages: vec!["This is the endless mode.\nGood luck!".to_string()],
            colors: Vec::new(),
            weather: vec![30.0, 10.0, 50.0],
            phases: ENDLESS_PHASES.to_vec(),
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Story => Self::story(),
            Mode::Endless => Self::endless(),
        }
    }

    /// Every table the phase index walks has at least one entry
    pub fn is_playable(&self) -> bool {
        !self.lengths.is_empty() && !self.weather.is_empty() && !self.phases.is_empty()
    }

    /// Distinct phase slots before the index wraps
    fn slots(&self) -> usize {
        (self.lengths.len() * self.weather.len() * self.phases.len()).max(1)
    }
}

/// Narrative text shown at the start of a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub alpha: u8,
}

/// Walks the phase table and decides what spawns
#[derive(Debug, Clone)]
pub struct Level {
    map: LevelMap,
    mode: Mode,
    /// Slot index, always below `map.slots()`
    phase: usize,
    /// Phases completed since the session began (never wraps)
    phases_elapsed: u32,
    /// Ticks into the current phase
    t: i32,
    /// Color name picked when the phase began
    color: String,
}

impl Level {
    pub fn new(mode: Mode, rng: &mut Pcg32) -> Self {
        Self::with_map(LevelMap::for_mode(mode), mode, rng)
    }

    /// Play a custom table; one with an empty table falls back to the built-in map
    pub fn with_map(map: LevelMap, mode: Mode, rng: &mut Pcg32) -> Self {
        let map = if map.is_playable() {
            map
        } else {
            log::warn!("Level map has an empty table, using the built-in {:?} map", mode);
            LevelMap::for_mode(mode)
        };
        let mut level = Self {
            map,
            mode,
            phase: 0,
            phases_elapsed: 0,
            t: 0,
            color: String::new(),
        };
        level.pick_color(rng);
        level
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn phases_elapsed(&self) -> u32 {
        self.phases_elapsed
    }

    /// Ticks already spent in the current phase
    pub fn ticks_in_phase(&self) -> i32 {
        self.t
    }

    /// True right after the first tick of a phase has been scheduled
    pub fn phase_started(&self) -> bool {
        self.t == 1
    }

    fn pick_color(&mut self, rng: &mut Pcg32) {
        self.color = self
            .map
            .colors
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "Color".to_string());
    }

    fn phase_length(&self) -> i32 {
        let len = self.map.lengths[self.phase % self.map.lengths.len()];
        match self.mode {
            Mode::Endless if len != -1 => len.max(ENDLESS_LENGTH_FLOOR),
            _ => len,
        }
    }

    /// Move to the next phase slot regardless of the timer
    pub fn advance(&mut self, rng: &mut Pcg32) {
        self.t = 0;
        self.phase = (self.phase + 1) % self.map.slots();
        self.phases_elapsed = self.phases_elapsed.saturating_add(1);
        self.pick_color(rng);
        log::info!(
            "Entering phase {} ({} completed, {:?})",
            self.phase,
            self.phases_elapsed,
            self.mode
        );
    }

    /// Schedules of the current phase after endless-mode tightening
    pub fn schedules(&self) -> PhaseRow {
        let row = self.map.phases[self.phase % self.map.phases.len()];
        match self.mode {
            Mode::Story => row,
            Mode::Endless => {
                let steps = (self.phases_elapsed / 4).min(i32::MAX as u32) as i32;
                row.map(|s| s.tightened(steps))
            }
        }
    }

    /// Target wave amplitude for the current phase
    pub fn weather(&self) -> f32 {
        let index = match self.mode {
            Mode::Story => self.phase,
            Mode::Endless => self.phase / 4,
        };
        self.map.weather[index % self.map.weather.len()]
    }

    /// Advance one tick: roll the phase over if its time is up, report due
    /// spawns and push the phase's weather into the water
    pub fn spawn(&mut self, water: &mut WaterField, rng: &mut Pcg32) -> SpawnSet {
        let length = self.phase_length();
        if length != -1 && self.t >= length {
            self.advance(rng);
        }

        let mut set = SpawnSet::default();
        for (kind, schedule) in EnemyKind::ALL.into_iter().zip(self.schedules()) {
            if schedule.due(self.t) {
                set.insert(kind);
            }
        }
        if !set.is_empty() {
            log::debug!("t={} phase={} spawning {:?}", self.t, self.phase, set);
        }

        water.set_target_amplitude(self.weather());
        self.t += 1;
        set
    }

    /// Phase message and its opacity, while it is on screen
    pub fn banner(&self) -> Option<Banner> {
        if self.t >= BANNER_TICKS {
            return None;
        }
        let message = self.map.messages.get(self.phase)?;
        if message.is_empty() {
            return None;
        }
        let alpha = if self.t > BANNER_FADE_START {
            let faded = (self.t - BANNER_FADE_START) * 255 / (BANNER_TICKS - BANNER_FADE_START);
            (255 - faded).clamp(0, 255)
        } else {
            255
        };
        Some(Banner {
            text: message.replace(COLOR_TOKEN, &self.color),
            alpha: alpha as u8,
        })
    }
}
