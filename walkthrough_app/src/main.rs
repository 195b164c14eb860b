//! Headless walkthrough demo
//!
//! Walks a capsule through a chain of generated rooms: toward the exit
//! doorway of each room, through the transition, and on into the next one.
//!
//! Usage: `walkthrough [config.toml|config.ron] [seed] [rooms]`

mod rooms;

use std::time::Instant;

use thiserror::Error;

use roomwalk_engine::config::{Config, ConfigError};
use roomwalk_engine::core::ApplicationConfig;
use roomwalk_engine::debug::CollisionDebugVisualizer;
use roomwalk_engine::foundation::logging;
use roomwalk_engine::foundation::math::{horizontal, Vec3};
use roomwalk_engine::navigation::{
    MovementInput, MovementOrchestrator, TransitionError, TransitionStateMachine,
};
use roomwalk_engine::physics::geometry::WallSide;
use roomwalk_engine::physics::CollisionSystem;

use rooms::{GeneratedRoom, RoomGenerator};

const DEFAULT_CONFIG: &str = "walkthrough.toml";
const TICK: f32 = 1.0 / 60.0;
const SECONDS_PER_ROOM: f32 = 30.0;
const BREATH_AMPLITUDE: f32 = 0.15;

#[derive(Error, Debug)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("invalid argument '{0}'")]
    Argument(String),

    #[error("walker stuck in room {room} after {seconds:.1}s")]
    Stuck { room: usize, seconds: f32 },
}

struct Walkthrough {
    system: CollisionSystem,
    walker: MovementOrchestrator,
    transitions: TransitionStateMachine,
    generator: RoomGenerator,
    room: GeneratedRoom,
    visualizer: CollisionDebugVisualizer,
    visited: usize,
    clock: f32,
}

impl Walkthrough {
    fn new(config: &ApplicationConfig, seed: u64) -> Self {
        let mut system = CollisionSystem::new(config.collision);
        system.debug_enabled = log::log_enabled!(log::Level::Trace);

        let mut generator = RoomGenerator::new(seed);
        let room = generator.next_room(None);
        system.set_room(&room.description);
        generator.dress(&room, system.registry_mut());

        let walker = MovementOrchestrator::new(Vec3::zeros(), config.navigation);
        let mut visualizer = CollisionDebugVisualizer::new();
        visualizer.sync(&system);

        Self {
            system,
            walker,
            transitions: TransitionStateMachine::from_config(&config.navigation),
            generator,
            room,
            visualizer,
            visited: 1,
            clock: 0.0,
        }
    }

    fn run(&mut self, rooms: usize) -> Result<(), AppError> {
        log::info!(
            "Room 1: {:.0}x{:.0}, exit {:?}",
            self.room.description.width,
            self.room.description.depth,
            self.room.exit
        );

        let mut room_time = 0.0;
        while self.visited <= rooms {
            self.clock += TICK;
            room_time += TICK;
            if room_time > SECONDS_PER_ROOM {
                return Err(AppError::Stuck {
                    room: self.visited,
                    seconds: room_time,
                });
            }

            self.breathe();

            let input = if self.transitions.is_active() {
                MovementInput::default()
            } else {
                MovementInput::walk(self.heading())
            };
            let outcome = self.walker.tick(&self.system, input, TICK);

            if self.system.debug_enabled {
                self.visualizer.draw_capsule(outcome.pose, self.system.capsule(), outcome.blocked);
                self.visualizer.update(TICK);
            }

            if let Some(event) = outcome.transition {
                self.transitions.begin(event)?;
            }
            if let Some(commit) = self.transitions.update(TICK) {
                self.enter_next_room(commit.event.entry_side);
                room_time = 0.0;
            }
        }
        Ok(())
    }

    /// Horizontal direction toward a point just past the exit doorway
    fn heading(&self) -> Vec3 {
        let portal = self
            .system
            .registry()
            .portals()
            .iter()
            .find(|p| p.side == self.room.exit);
        portal.map_or_else(Vec3::zeros, |p| {
            let target = p.center + p.outward_normal;
            let delta = horizontal(target - self.walker.pose());
            if delta.norm() > 1.0e-3 { delta.normalize() } else { Vec3::zeros() }
        })
    }

    fn breathe(&mut self) {
        if self.room.breathing.is_some() {
            let offset = BREATH_AMPLITUDE * (self.clock.sin() + 1.0);
            self.system.update_breathing_wall("panel", offset);
        }
    }

    fn enter_next_room(&mut self, entry: WallSide) {
        self.visited += 1;
        self.room = self.generator.next_room(Some(entry));
        self.system.set_room(&self.room.description);
        self.generator.dress(&self.room, self.system.registry_mut());
        let pose = self.walker.arrive(&self.system, entry);
        self.visualizer.sync(&self.system);

        log::info!(
            "Room {}: {:.0}x{:.0}{}, entered {:?} at ({:.2}, {:.2}), exit {:?}",
            self.visited,
            self.room.description.width,
            self.room.description.depth,
            if self.room.description.polygon.is_some() { " chamfered" } else { "" },
            entry,
            pose.x,
            pose.z,
            self.room.exit
        );
    }
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&String>, default: T) -> Result<T, AppError> {
    arg.map_or(Ok(default), |s| s.parse().map_err(|_| AppError::Argument(s.clone())))
}

fn main() -> Result<(), AppError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = args.first().map_or(DEFAULT_CONFIG, String::as_str);

    let config = ApplicationConfig::load_or_default(config_path)?;
    config.validate()?;
    logging::init_with_level(&config.logging.level);

    let seed = parse_arg(args.get(1), 42_u64)?;
    let rooms = parse_arg(args.get(2), 5_usize)?;
    log::info!("Starting walkthrough: seed {seed}, {rooms} rooms, {:?} commits", config.navigation.commit_policy);

    let started = Instant::now();
    let mut walkthrough = Walkthrough::new(&config, seed);
    match walkthrough.run(rooms) {
        Ok(()) => {
            log::info!(
                "Walked {} rooms in {:.1}s simulated ({:?} wall time)",
                rooms,
                walkthrough.clock,
                started.elapsed()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Walkthrough failed: {e}");
            Err(e)
        }
    }
}
