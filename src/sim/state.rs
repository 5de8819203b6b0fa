//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context: every actor collection, the
//! shared sea, the level director, health, score and the seeded RNG. The tick
//! pipeline borrows it mutably; nothing lives in globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::ActorKind;
use super::boat::{Boss, Pirate, Steamboat};
use super::cannon::{Cannon, Heading};
use super::enemy::{Mine, Powerup, Seagull, Shark};
use super::level::{Level, Mode};
use super::particles::Ensemble;
use super::sky::Sky;
use super::sprite::SpriteBank;
use super::water::WaterField;
use crate::consts::*;

/// Ticks a broken heart stays on screen
pub const BROKEN_HEART_TICKS: u32 = 25;
/// Blink ticks added per hit
pub const HIT_BLINKS: u32 = 12;
/// The boiler keeps steaming this long after the last shot
pub const BOILER_HOT_TICKS: u64 = 3 * TICK_RATE as u64;
/// Mixed into the session seed for the cosmetic particle stream
const PARTICLE_STREAM: u64 = 0x5EA5_1DE5_B0A7_F00D;

/// Settings the core reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreFlags {
    /// Hits never cost a heart
    pub invincible: bool,
    /// Cosmetic particles on
    pub particles: bool,
}

impl Default for CoreFlags {
    fn default() -> Self {
        Self {
            invincible: false,
            particles: true,
        }
    }
}

/// Player hearts, with the decaying "just lost" markers for the HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    life: i32,
    /// Hearts lost recently, still drawn broken
    lost: i32,
    /// Ticks each broken heart has been shown, by slot
    counters: [u32; MAX_HEARTS as usize],
}

impl Default for Health {
    fn default() -> Self {
        Self::new()
    }
}

impl Health {
    pub fn new() -> Self {
        Self {
            life: MAX_HEARTS,
            lost: 0,
            counters: [0; MAX_HEARTS as usize],
        }
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn lost(&self) -> i32 {
        self.lost
    }

    /// Slots currently drawn as broken hearts, with their age
    pub fn broken(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        let start = self.life.max(0) as usize;
        let end = (self.life + self.lost).clamp(0, MAX_HEARTS) as usize;
        (start..end).map(|i| (i, self.counters[i]))
    }

    pub fn update(&mut self) {
        let start = self.life.max(0) as usize;
        let end = (self.life + self.lost).clamp(0, MAX_HEARTS) as usize;
        for i in start..end {
            self.counters[i] += 1;
            if self.counters[i] == BROKEN_HEART_TICKS {
                self.lost -= 1;
            }
        }
    }

    /// Lose one heart; false if already empty
    pub fn damage(&mut self) -> bool {
        if self.life <= 0 {
            return false;
        }
        self.life -= 1;
        self.lost += 1;
        self.counters[self.life as usize] = 0;
        self.update();
        true
    }

    /// Regain one heart, up to the maximum
    pub fn add(&mut self) -> bool {
        if self.life >= MAX_HEARTS {
            return false;
        }
        self.life += 1;
        self.lost = self.lost.min(MAX_HEARTS - self.life);
        true
    }
}

/// Score that counts up toward its target one point per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    target: i64,
    value: i64,
}

impl Score {
    pub fn add(&mut self, points: i64) {
        self.target += points;
    }

    pub fn update(&mut self) {
        if self.target > self.value {
            self.value += 1;
        }
    }

    /// Displayed value
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Points actually earned
    pub fn target(&self) -> i64 {
        self.target
    }
}

/// Something that happened this tick, for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CannonFired { special: bool },
    EnemyFired,
    Hit { kind: ActorKind },
    Explosion,
    Splash,
    PowerupCollected,
    PlayerDamaged,
    PhaseStarted { phase: usize },
    BossArrived,
    PlayerSunk,
    BossSunk,
}

/// How the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOver {
    Sunk,
    Victory,
}

impl GameOver {
    pub fn message(self) -> &'static str {
        match self {
            GameOver::Sunk => "Game Over",
            GameOver::Victory => "Congratulations!\nYou sunk Titanic!",
        }
    }
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub flags: CoreFlags,
    pub sprites: SpriteBank,
    pub water: WaterField,
    pub level: Level,
    pub sky: Sky,
    pub health: Health,
    pub score: Score,

    pub player: Steamboat,
    pub player_cannons: Vec<Cannon>,
    pub enemy_cannons: Vec<Cannon>,
    pub mines: Vec<Mine>,
    pub sharks: Vec<Shark>,
    pub pirates: Vec<Pirate>,
    pub seagulls: Vec<Seagull>,
    pub powerups: Vec<Powerup>,
    pub boss: Option<Boss>,
    pub particles: Ensemble,

    pub events: Vec<GameEvent>,
    pub game_over: Option<GameOver>,
    pub paused: bool,
    /// Ticks since the last normal shot
    pub last_shot: u32,
    /// Ticks since the last heavy shot
    pub last_special_shot: u32,
    /// Tick of the most recent shot, if any
    pub fired_at: Option<u64>,
    /// Simulation ticks elapsed
    pub t: u64,
}

impl GameState {
    pub fn new(mode: Mode, seed: u64, flags: CoreFlags, sprites: SpriteBank) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let level = Level::new(mode, &mut rng);
        let player = Steamboat::new(&sprites);
        log::info!(
            "New {:?} session (seed {}, invincible {}, particles {})",
            mode,
            seed,
            flags.invincible,
            flags.particles
        );
        Self {
            seed,
            rng,
            flags,
            sprites,
            water: WaterField::new(),
            level,
            sky: Sky::new(),
            health: Health::new(),
            score: Score::default(),
            player,
            player_cannons: Vec::new(),
            enemy_cannons: Vec::new(),
            mines: Vec::new(),
            sharks: Vec::new(),
            pirates: Vec::new(),
            seagulls: Vec::new(),
            powerups: Vec::new(),
            boss: None,
            particles: Ensemble::new(flags.particles, seed ^ PARTICLE_STREAM),
            events: Vec::new(),
            game_over: None,
            paused: false,
            last_shot: MIN_FIRE_DELAY + 1,
            last_special_shot: SPECIAL_FIRE_DELAY + 1,
            fired_at: None,
            t: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.level.mode()
    }

    pub fn is_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("Paused: {}", self.paused);
    }

    /// Points handed to the high-score list
    pub fn final_score(&self) -> i64 {
        self.score.target()
    }

    /// Take the events collected since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Could a normal (or heavy) shot leave the barrel right now
    pub fn can_fire(&self, special: bool) -> bool {
        let reloaded = if special {
            self.last_special_shot > SPECIAL_FIRE_DELAY
        } else {
            self.last_shot > MIN_FIRE_DELAY
        };
        reloaded && !self.paused && !self.player.actor.is_dying()
    }

    /// Fire from the bow; false while reloading, paused or sinking
    pub fn player_fire(&mut self, special: bool) -> bool {
        if !self.can_fire(special) {
            return false;
        }
        let boat = &self.player.actor;
        let muzzle = Vec2::new(boat.right(), boat.center().y);
        let ball = Cannon::launch(&self.sprites, muzzle, boat.angle(), Heading::Right, special);
        self.player_cannons.push(ball);

        if special {
            self.last_special_shot = 0;
        } else {
            self.last_shot = 0;
        }
        self.fired_at = Some(self.t);
        self.events.push(GameEvent::CannonFired { special });
        true
    }

    /// The funnel smokes until the boat has been idle for a while after firing
    pub fn boiler_hot(&self) -> bool {
        match self.fired_at {
            None => true,
            Some(at) => self.t <= at + BOILER_HOT_TICKS,
        }
    }

    /// Total live actors, for logging and tests
    pub fn actor_count(&self) -> usize {
        1 + self.player_cannons.len()
            + self.enemy_cannons.len()
            + self.mines.len()
            + self.sharks.len()
            + self.pirates.len()
            + self.seagulls.len()
            + self.powerups.len()
            + usize::from(self.boss.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Mode::Story, 42, CoreFlags::default(), SpriteBank::placeholder())
    }

    #[test]
    fn test_score_counts_up_one_per_tick() {
        let mut score = Score::default();
        score.add(15);
        let mut seen = Vec::new();
        for _ in 0..20 {
            score.update();
            seen.push(score.value());
        }
        assert_eq!(seen[..15], (1..=15).collect::<Vec<i64>>()[..]);
        assert!(seen[15..].iter().all(|&v| v == 15));
        assert_eq!(score.target(), 15);
    }

    #[test]
    fn test_health_broken_hearts_fade() {
        let mut health = Health::new();
        assert!(health.damage());
        assert_eq!(health.life(), MAX_HEARTS - 1);
        assert_eq!(health.lost(), 1);
        for _ in 0..BROKEN_HEART_TICKS {
            health.update();
        }
        assert_eq!(health.lost(), 0);
        assert_eq!(health.broken().count(), 0);
    }

    #[test]
    fn test_health_floor_and_cap() {
        let mut health = Health::new();
        assert!(!health.add());
        for _ in 0..MAX_HEARTS {
            assert!(health.damage());
        }
        assert_eq!(health.life(), 0);
        assert!(!health.damage());
        assert!(health.add());
        assert!(health.life() + health.lost() <= MAX_HEARTS);
    }

    #[test]
    fn test_first_shot_is_ready_immediately() {
        let mut s = state();
        assert!(s.player_fire(false));
        assert!(!s.player_fire(false));
        assert_eq!(s.player_cannons.len(), 1);
        assert_eq!(s.drain_events(), vec![GameEvent::CannonFired { special: false }]);
        assert!(s.events.is_empty());
    }

    #[test]
    fn test_heavy_shot_has_its_own_reload() {
        let mut s = state();
        assert!(s.player_fire(true));
        assert!(s.player_fire(false));
        assert!(!s.player_fire(true));
        assert!(s.player_cannons[0].special);
    }

    #[test]
    fn test_no_fire_while_paused() {
        let mut s = state();
        s.toggle_pause();
        assert!(!s.player_fire(false));
        s.toggle_pause();
        assert!(s.player_fire(false));
    }

    #[test]
    fn test_boiler_cools_after_firing() {
        let mut s = state();
        assert!(s.boiler_hot());
        s.player_fire(false);
        s.t += BOILER_HOT_TICKS;
        assert!(s.boiler_hot());
        s.t += 1;
        assert!(!s.boiler_hot());
    }
}
