use rand::Rng;
use tracing::debug;

use super::{
    action::Direction,
    config::GameConfig,
    grid::{Cell, Grid, Item, Position},
};
use crate::agent::Snake;
use crate::error::{Result, SnakeError};

/// Index of a snake registered in a [`Game`]
pub type SnakeId = usize;

/// The grid together with the apples placed on it
///
/// Every apple listed here is tagged `Apple` in the grid and no other cell
/// is.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    grid: Grid,
    apples: Vec<Position>,
}

impl Board {
    /// A walled board of the given shape
    pub fn new(height: usize, width: usize) -> Self {
        Self::from_grid(Grid::with_wall_borders(height, width))
    }

    /// A board over an existing grid, with no apples
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            apples: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn apples(&self) -> &[Position] {
        &self.apples
    }

    /// Tag a new body on the grid
    ///
    /// Every position is checked before anything is written: one outside
    /// the grid is `OutOfBounds`, one that is not empty is `Occupied`.
    pub fn place_body(&mut self, body: &[Position]) -> Result<()> {
        for &position in body {
            let item = self.grid.get(position)?;
            if item != Item::Empty {
                return Err(SnakeError::Occupied { position, item });
            }
        }
        let cells: Vec<Cell> = body.iter().map(|&pos| Cell::new(pos, Item::Body)).collect();
        self.grid.set_cell(&cells)
    }

    /// Move a body forward one cell: free the old tail if the body did not
    /// grow, then tag the new head
    pub fn advance_body(&mut self, head: Position, vacated: Option<Position>) -> Result<()> {
        if let Some(tail) = vacated {
            self.grid.set_empty(tail)?;
        }
        self.grid.set_cell(&[Cell::new(head, Item::Body)])
    }

    /// Place an apple on a cell chosen uniformly among the empty ones
    ///
    /// # Returns
    ///
    /// The apple position, or `Err(SnakeError::NoSpace)` on a full grid.
    pub fn add_apple<R: Rng>(&mut self, rng: &mut R) -> Result<Position> {
        let available = self.grid.empty_positions();
        if available.is_empty() {
            return Err(SnakeError::NoSpace);
        }
        let pos = available[rng.gen_range(0..available.len())];
        self.place_apple(pos)?;
        Ok(pos)
    }

    /// Place an apple on a specific empty cell
    pub fn place_apple(&mut self, pos: Position) -> Result<()> {
        if !self.grid.is_empty(pos)? {
            return Err(SnakeError::NoSpace);
        }
        self.grid.set_cell(&[Cell::new(pos, Item::Apple)])?;
        self.apples.push(pos);
        Ok(())
    }

    /// Forget an apple that was just eaten at `eaten` and place a new one
    pub fn replace_apple<R: Rng>(&mut self, eaten: Position, rng: &mut R) -> Result<Position> {
        self.apples.retain(|&apple| apple != eaten);
        self.add_apple(rng)
    }

    /// Remove every apple from the grid
    pub fn clear_apples(&mut self) -> Result<()> {
        for apple in self.apples.drain(..) {
            if self.grid.get(apple)? == Item::Apple {
                self.grid.set_empty(apple)?;
            }
        }
        Ok(())
    }

    /// Remove apples and bodies, keeping the walls
    pub fn clear(&mut self) {
        self.apples.clear();
        self.grid.clear_interior();
    }
}

/// One environment: a board plus the snakes playing on it
///
/// The game owns its grid outright; snakes get mutable access to the board
/// only for the duration of a move.
#[derive(Debug)]
pub struct Game {
    board: Board,
    snakes: Vec<Snake>,
}

impl Game {
    /// Create a game with a walled grid
    pub fn new(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config.grid_height, config.grid_width),
            snakes: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn grid(&self) -> &Grid {
        self.board.grid()
    }

    pub fn apples(&self) -> &[Position] {
        self.board.apples()
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, id: SnakeId) -> Result<&Snake> {
        self.snakes.get(id).ok_or(SnakeError::UnknownSnake(id))
    }

    /// Register a snake and mark its body on the grid
    ///
    /// Fails without touching the grid if the body leaves the grid or
    /// overlaps a wall, another body or an apple.
    pub fn add_snake(&mut self, snake: Snake) -> Result<SnakeId> {
        let body: Vec<Position> = snake.body().copied().collect();
        self.board.place_body(&body)?;
        self.snakes.push(snake);
        Ok(self.snakes.len() - 1)
    }

    /// Place the game's single apple, moving it if one already exists
    pub fn add_apple<R: Rng>(&mut self, rng: &mut R) -> Result<Position> {
        self.board.clear_apples()?;
        self.board.add_apple(rng)
    }

    /// Remove all snakes and apples, keeping the walls
    ///
    /// Snakes still alive are killed. The removed snakes are handed back in
    /// registration order.
    pub fn clean(&mut self) -> Vec<Snake> {
        self.board.clear();
        let mut removed: Vec<Snake> = self.snakes.drain(..).collect();
        for snake in &mut removed {
            snake.kill();
        }
        removed
    }

    /// Clean the game, register `snake`, place an apple and refresh the
    /// snake's vision
    pub fn start<R: Rng>(&mut self, snake: Snake, rng: &mut R) -> Result<SnakeId> {
        self.clean();
        let id = self.add_snake(snake)?;
        self.add_apple(rng)?;
        let Self { board, snakes } = self;
        snakes[id].update(board.grid())?;
        Ok(id)
    }

    /// Let a snake's controller choose its next heading
    pub fn next_direction(&mut self, id: SnakeId) -> Result<Direction> {
        let Self { board, snakes } = self;
        let snake = snakes.get_mut(id).ok_or(SnakeError::UnknownSnake(id))?;
        snake.next_direction(board.grid())
    }

    /// Move a snake one cell; returns whether it is still alive
    pub fn move_snake<R: Rng>(&mut self, id: SnakeId, rng: &mut R) -> Result<bool> {
        let Self { board, snakes } = self;
        let snake = snakes.get_mut(id).ok_or(SnakeError::UnknownSnake(id))?;
        snake.step(board, rng)
    }

    /// Play one full episode and return the dead snake
    ///
    /// Runs `next_direction` and `move_snake` until the snake dies, then
    /// cleans the game for the next episode.
    pub fn play_episode<R: Rng>(&mut self, snake: Snake, rng: &mut R) -> Result<Snake> {
        let id = self.start(snake, rng)?;
        loop {
            self.next_direction(id)?;
            if !self.move_snake(id, rng)? {
                break;
            }
        }

        let snake = self
            .clean()
            .into_iter()
            .nth(id)
            .ok_or(SnakeError::UnknownSnake(id))?;
        debug!(
            score = snake.score(),
            steps = snake.steps(),
            cause = ?snake.death_cause(),
            "episode finished"
        );
        Ok(snake)
    }
}
