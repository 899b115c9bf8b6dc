use std::io;
use std::thread;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::trace;

use crate::config::Config;
use crate::events::Control;
use crate::input::KeySource;
use crate::render::Renderer;
use crate::render::Surface;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Paused,
    Terminated,
}

/// Whether the loop goes on after an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Ties a [`World`] to a surface it is drawn on and a source of key presses.
pub struct Game<S, K> {
    world: World,
    renderer: Renderer,
    surface: S,
    keys: K,
    frame_interval: Duration,
    terminated: bool,
}

impl<S: Surface, K: KeySource> Game<S, K> {
    pub fn new(config: &Config, world: World, surface: S, keys: K) -> Self {
        Self {
            world,
            renderer: Renderer::new(config),
            surface,
            keys,
            frame_interval: config.frame_interval,
            terminated: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn state(&self) -> State {
        if self.terminated {
            State::Terminated
        } else if self.world.is_paused() {
            State::Paused
        } else {
            State::Running
        }
    }

    /// Carry out a single control. A terminated game ignores everything.
    pub fn apply(&mut self, control: Control) -> Flow {
        if self.terminated {
            return Flow::Quit;
        }

        match control {
            Control::Pause => self.world.toggle_pause(),
            Control::Step => {
                if !self.world.is_paused() {
                    self.world.toggle_pause();
                }

                self.world.step();
            }
            Control::Randomize => self.world.randomize(),
            Control::Quit => {
                self.terminated = true;

                debug!(generation = self.world.generation(), "quit requested");
                return Flow::Quit;
            }
        }

        debug!(
            ?control,
            generation = self.world.generation(),
            paused = self.world.is_paused(),
            "applied control"
        );

        Flow::Continue
    }

    /// One iteration of the game loop, without the sleep.
    ///
    /// A pending key press takes the place of the automatic step, so an iteration never both
    /// handles a key and steps on its own. Every iteration that doesn't quit draws a frame.
    pub fn tick(&mut self) -> io::Result<Flow> {
        if self.terminated {
            return Ok(Flow::Quit);
        }

        match self.keys.try_next() {
            Some(key) => match Control::from_key(&key) {
                Some(control) => {
                    if self.apply(control) == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                None => trace!(?key, "ignored key"),
            },
            None => {
                if !self.world.is_paused() {
                    self.world.step();
                }
            }
        }

        self.renderer.draw(&mut self.surface, &self.world)?;

        Ok(Flow::Continue)
    }

    /// Run until a quit key is pressed
    pub fn run(&mut self) -> io::Result<()> {
        info!(
            width = self.world.width(),
            height = self.world.height(),
            "starting game"
        );

        while self.tick()? == Flow::Continue {
            thread::sleep(self.frame_interval);
        }

        info!(generation = self.world.generation(), "game over");

        Ok(())
    }

    pub fn into_parts(self) -> (World, S, K) {
        (self.world, self.surface, self.keys)
    }
}
