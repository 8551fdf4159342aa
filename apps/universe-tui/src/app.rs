//! Input handling and the fixed-tick game loop.

use std::time::{Duration, Instant};

use crossbeam::channel::Receiver;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tracing::{debug, error};
use universe_core::coords::WorldPos;
use universe_core::Result;
use universe_game::{
    drain_tile_changes, move_player, select_item, Direction, GameState, GameWorld,
};
use universe_world::{EditStore, TileChanged};

use crate::ui::GameView;

/// Interval at which queued input is applied.
const TICK_RATE: Duration = Duration::from_millis(100);

const MIN_ZOOM: i32 = -5;
const MAX_ZOOM: i32 = 4;

/// One player intent, applied on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(Direction),
    Dig,
    Place,
    Select(usize),
    Zoom(i32),
}

pub struct App {
    world: GameWorld<Box<dyn EditStore>>,
    state: GameState,
    edits: Receiver<TileChanged>,
    zoom: i32,
    facing: Direction,
    pending: Option<Command>,
    status: String,
}

impl App {
    /// Subscribe to edits and load the starting chunk window.
    pub fn new(world: GameWorld<Box<dyn EditStore>>, state: GameState) -> Result<Self> {
        let edits = world.subscribe();
        let state = world.manage_chunk_memory(&state)?;
        Ok(Self {
            world,
            state,
            edits,
            zoom: 0,
            facing: Direction::Right,
            pending: None,
            status: String::new(),
        })
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut last_tick = Instant::now();
        let mut redraw = true;

        loop {
            if redraw {
                terminal.draw(|frame| {
                    GameView::new(&self.state, self.zoom, self.facing, &self.status).render(frame);
                })?;
                redraw = false;
            }

            let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key.code) {
                            return Ok(());
                        }
                    }
                    Event::Resize(..) => redraw = true,
                    _ => {}
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                redraw |= self.tick();
                last_tick = Instant::now();
            }
        }
    }

    /// Queue the command for a key; the last key before a tick wins.
    ///
    /// Returns true when the player asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let command = match code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('w') => Command::Move(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') => Command::Move(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') => Command::Move(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') => Command::Move(Direction::Right),
            KeyCode::Char('e') => Command::Dig,
            KeyCode::Char('p') => Command::Place,
            KeyCode::Char('+' | '=') => Command::Zoom(1),
            KeyCode::Char('-') => Command::Zoom(-1),
            KeyCode::Char(c @ '1'..='9') => Command::Select(c as usize - '1' as usize),
            _ => return false,
        };
        self.pending = Some(command);
        false
    }

    /// Apply pending edits and input. Returns true if anything visible changed.
    fn tick(&mut self) -> bool {
        let previous = self.state.clone();
        let (zoom, facing) = (self.zoom, self.facing);
        let mut changed = false;
        self.state = drain_tile_changes(&previous, &self.edits);

        if let Some(command) = self.pending.take() {
            let current = self.state.clone();
            match self.apply(&current, command) {
                Ok(next) => {
                    self.state = next;
                    if !self.status.is_empty() {
                        self.status.clear();
                        changed = true;
                    }
                }
                Err(err) => {
                    error!(?command, %err, "command failed, keeping previous state");
                    self.status = format!("error: {err}");
                    return true;
                }
            }
        }

        changed || !self.state.is_same(&previous) || self.zoom != zoom || self.facing != facing
    }

    fn apply(&mut self, state: &GameState, command: Command) -> Result<GameState> {
        debug!(?command, "applying command");
        match command {
            Command::Move(direction) => {
                self.facing = direction;
                move_player(state, direction, &self.world)
            }
            Command::Dig => self.world.dig(state, self.target()),
            Command::Place => self.world.place(state, self.target()),
            Command::Select(index) => Ok(state
                .inventory
                .nth_kind(index)
                .map_or_else(|| state.clone(), |kind| select_item(state, kind))),
            Command::Zoom(delta) => {
                self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
                Ok(state.clone())
            }
        }
    }

    /// Cell the player is facing.
    fn target(&self) -> WorldPos {
        let (dx, dy) = self.facing.delta();
        self.state.player.offset(dx, dy)
    }
}
