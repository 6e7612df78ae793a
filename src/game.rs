use std::{thread::sleep, time::Duration};

use crate::config::Settings;
use crate::egg::Egg;
use crate::grid::Bounds;
use crate::snake::{Heading, Snake, Turn, MoveResult::{Crashed, Moved}};
use crate::term::{Palette, Screen};

use anyhow::Result;
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use log::{debug, info, trace};
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Turn),
    Quit,
}

/// Maps a key press to what it does, if anything.
pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    match ev {
        ev if is_ctrl_c(ev) => Some(Command::Quit),
        KeyEvent { code, modifiers: _ } => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
            KeyCode::Right => Some(Command::Turn(Turn::Clockwise)),
            KeyCode::Left => Some(Command::Turn(Turn::Anticlockwise)),
            _ => None,
        },
    }
}

/// The self-driving snake and the eggs it feeds on. Every frame draws
/// and ticks the eggs, then the snake, then lets the snake eat, then
/// reads one key.
pub struct SnakeGame<R: Rng> {
    settings: Settings,
    rng: R,
    bounds: Option<Bounds>,
    eggs: Vec<Egg>,
    snake: Snake,
    quit: bool,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(settings: Settings, rng: R) -> Self {
        let snake = Snake::new(settings.snake_start, Heading::East, settings.snake_period_ms);
        SnakeGame { settings, rng, bounds: None, eggs: vec![], snake, quit: false }
    }

    pub fn is_over(&self) -> bool {
        self.quit || self.snake.is_dead()
    }

    /// Runs frames until the player quits or the snake dies. A dead snake
    /// is left on screen until a key is pressed.
    pub fn play<S: Screen>(&mut self, screen: &mut S) -> Result<()> {
        let heartbeat = Duration::from_millis(self.settings.heartbeat_ms);

        while !self.is_over() {
            self.frame(screen)?;
            sleep(heartbeat);
        }

        if self.snake.is_dead() {
            self.game_over(screen)?;
        } else {
            info!("Quit with score {}", self.snake.score());
        }
        Ok(())
    }

    pub fn frame<S: Screen>(&mut self, screen: &mut S) -> Result<()> {
        let (w, h) = screen.size()?;
        let bounds = Bounds::new(w, h);
        if self.bounds != Some(bounds) {
            self.reseed(bounds);
        }

        screen.clear()?;

        let heartbeat = self.settings.heartbeat_ms;
        for egg in self.eggs.iter_mut() {
            egg.render(screen)?;
            egg.tick(heartbeat);
        }

        self.snake.render(screen)?;
        // A fast snake can move several times a frame, each move eats.
        for _ in 0..self.snake.tick(heartbeat) {
            match self.snake.move_step(bounds) {
                Moved { new_head, old_tail } => {
                    trace!("Head to {:?}, tail left {:?}", new_head, old_tail);
                    self.eat_egg(screen, bounds);
                }
                Crashed => {
                    info!(
                        "Snake died at {:?} heading {:?} with score {}",
                        self.snake.head(),
                        self.snake.heading(),
                        self.snake.score()
                    );
                    break;
                }
            }
        }

        let score = format!("Score: {}", self.snake.score());
        screen.draw_text((0, 0), &score, Palette::Text)?;
        screen.flush()?;

        if let Some(key) = screen.poll_key()? {
            match command_for(&key) {
                Some(Command::Turn(turn)) => self.snake.turn(turn),
                Some(Command::Quit) => self.quit = true,
                None => {}
            }
        }

        Ok(())
    }

    /// Throws away every egg and lays a fresh pool across `bounds`.
    fn reseed(&mut self, bounds: Bounds) {
        let period = self.settings.egg_period_ms;
        let rng = &mut self.rng;

        self.eggs = (0..self.settings.egg_count)
            .filter_map(|_| Egg::spawn(bounds, period, rng))
            .collect();
        self.bounds = Some(bounds);

        info!("Grid is {}x{}, laid {} eggs", bounds.width, bounds.height, self.eggs.len());
    }

    /// Eats at most one egg under the snake's head, beeps once and lays a
    /// new one. Other eggs stacked on the same cell are left in place.
    fn eat_egg<S: Screen>(&mut self, screen: &mut S, bounds: Bounds) {
        let head = self.snake.head();
        let eaten = match self.eggs.iter().position(|e| e.pos() == head) {
            Some(i) => i,
            None => return,
        };

        self.snake.grow();
        screen.beep();
        self.eggs.remove(eaten);
        if let Some(egg) = Egg::spawn(bounds, self.settings.egg_period_ms, &mut self.rng) {
            self.eggs.push(egg);
        }

        debug!("Ate egg at {:?}, score {}", head, self.snake.score() + 1);
    }

    fn game_over<S: Screen>(&mut self, screen: &mut S) -> Result<()> {
        let score = format!("Score: {}", self.snake.score());
        screen.show_message(&["Game over!", score.as_str(), "", "Press any key to exit"])?;
        screen.read_key_blocking()?;
        Ok(())
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
