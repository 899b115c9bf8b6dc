use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::CellOffset;
use crate::config::Config;
use crate::field::Field;

/// Fill factor used when randomizing, unless configured otherwise
pub const DEFAULT_DENSITY: f64 = 0.25;

/// The state of a game of life.
pub struct World {
    /// Both buffers of the simulation.
    ///
    /// `fields[current]` is what gets displayed, the other one is scratch space for `step`.
    fields: [Field; 2],

    /// Index of the current [`Field`] in `fields`
    current: usize,

    /// Number of generations since the world was last randomized, starting at 1
    generation: u64,

    paused: bool,

    /// Fill factor handed to [`Field::randomize`]
    density: f64,

    rng: StdRng,
}

impl World {
    /// Create a randomized world, seeded from the OS
    pub fn new(w: usize, h: usize) -> Self {
        Self::build(w, h, DEFAULT_DENSITY, StdRng::from_entropy())
    }

    /// Create a randomized world with a fixed seed
    pub fn seeded(w: usize, h: usize, seed: u64) -> Self {
        Self::build(w, h, DEFAULT_DENSITY, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::build(
            config.width,
            config.height,
            config.density,
            StdRng::from_entropy(),
        )
    }

    fn build(w: usize, h: usize, density: f64, rng: StdRng) -> Self {
        let mut world = Self {
            fields: [Field::new(w, h), Field::new(w, h)],
            current: 0,
            generation: 1,
            paused: false,
            density,
            rng,
        };

        world.randomize();
        world
    }

    pub fn width(&self) -> usize {
        self.current().width()
    }

    pub fn height(&self) -> usize {
        self.current().height()
    }

    /// The field being displayed
    pub fn current(&self) -> &Field {
        &self.fields[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Field {
        &mut self.fields[self.current]
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advance the world by one generation.
    ///
    /// Pausing is left to the caller, this always steps.
    pub fn step(&mut self) {
        let [a, b] = &mut self.fields;
        let (cur, next) = if self.current == 0 {
            (&*a, b)
        } else {
            (&*b, a)
        };

        for y in 0..cur.height() {
            for x in 0..cur.width() {
                next.set(x, y, cur.next(x as CellOffset, y as CellOffset));
            }
        }

        self.current ^= 1;
        self.generation += 1;
    }

    /// Re-randomize the current field and start counting generations over
    pub fn randomize(&mut self) {
        self.fields[self.current].randomize(&mut self.rng, self.density);
        self.generation = 1;

        debug!(
            population = self.current().population(),
            "randomized {}x{} world",
            self.width(),
            self.height()
        );
    }
}
