//! Multi-occupancy lattice for agent placement
//!
//! Cells hold any number of agents unless a capacity is configured. A reverse
//! index from agent to cell keeps removal and position lookup O(1) amortized.

use ahash::AHashMap;
use rand::Rng;

use crate::core::error::{ColonyError, Result};
use crate::core::types::{AgentId, GridPos, Topology};

/// Bounded or toroidal 2D grid of agent ids
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    width: u32,
    height: u32,
    topology: Topology,
    capacity: Option<usize>,
    cells: Vec<Vec<AgentId>>,
    positions: AHashMap<AgentId, GridPos>,
}

impl SpatialGrid {
    pub fn new(width: u32, height: u32, topology: Topology, capacity: Option<usize>) -> Self {
        Self {
            width,
            height,
            topology,
            capacity,
            cells: vec![Vec::new(); width as usize * height as usize],
            positions: AHashMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of agents currently on the grid
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: GridPos) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    fn check_target(&self, pos: GridPos) -> Result<()> {
        if !self.in_bounds(pos) {
            return Err(ColonyError::OutOfBounds(pos));
        }
        if let Some(cap) = self.capacity {
            if self.cells[self.index(pos)].len() >= cap {
                return Err(ColonyError::Occupancy(pos));
            }
        }
        Ok(())
    }

    /// Put an agent on a cell. An agent already on the grid is relocated.
    pub fn place(&mut self, agent: AgentId, pos: GridPos) -> Result<()> {
        if self.positions.contains_key(&agent) {
            return self.move_agent(agent, pos);
        }
        self.check_target(pos)?;
        let idx = self.index(pos);
        self.cells[idx].push(agent);
        self.positions.insert(agent, pos);
        Ok(())
    }

    /// Detach an agent from the grid, returning the cell it left.
    ///
    /// Removing an agent that is not placed is a no-op.
    pub fn remove(&mut self, agent: AgentId) -> Option<GridPos> {
        let pos = self.positions.remove(&agent)?;
        let idx = self.index(pos);
        self.cells[idx].retain(|&a| a != agent);
        Some(pos)
    }

    /// Relocate a placed agent without changing its identity
    pub fn move_agent(&mut self, agent: AgentId, to: GridPos) -> Result<()> {
        let from = self
            .positions
            .get(&agent)
            .copied()
            .ok_or(ColonyError::AgentNotFound(agent))?;
        if from == to {
            return Ok(());
        }
        self.check_target(to)?;

        let from_idx = self.index(from);
        self.cells[from_idx].retain(|&a| a != agent);
        let to_idx = self.index(to);
        self.cells[to_idx].push(agent);
        self.positions.insert(agent, to);
        Ok(())
    }

    pub fn position_of(&self, agent: AgentId) -> Option<GridPos> {
        self.positions.get(&agent).copied()
    }

    /// Agents on a single cell, in placement order
    pub fn agents_at(&self, pos: GridPos) -> &[AgentId] {
        if !self.in_bounds(pos) {
            return &[];
        }
        &self.cells[self.index(pos)]
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        !self.agents_at(pos).is_empty()
    }

    /// Cells of the Moore neighborhood around `center`
    ///
    /// Bounded grids clip at the edges. Toroidal grids wrap, and a cell reached
    /// twice through wrapping on a small grid is listed once.
    pub fn neighborhood(&self, center: GridPos, radius: u32, include_center: bool) -> Vec<GridPos> {
        let r = radius as i64;
        let mut cells = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);

        for dx in -r..=r {
            for dy in -r..=r {
                if dx == 0 && dy == 0 && !include_center {
                    continue;
                }
                let Some(pos) = self.offset(center, dx, dy) else {
                    continue;
                };
                if pos == center && !include_center {
                    continue;
                }
                if !cells.contains(&pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    fn offset(&self, center: GridPos, dx: i64, dy: i64) -> Option<GridPos> {
        let x = center.x as i64 + dx;
        let y = center.y as i64 + dy;
        match self.topology {
            Topology::Toroidal => Some(GridPos::new(
                x.rem_euclid(self.width as i64) as u32,
                y.rem_euclid(self.height as i64) as u32,
            )),
            Topology::Bounded => {
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    None
                } else {
                    Some(GridPos::new(x as u32, y as u32))
                }
            }
        }
    }

    /// Agents in the Moore neighborhood around `center`
    pub fn neighbors(&self, center: GridPos, radius: u32, include_center: bool) -> Vec<AgentId> {
        self.neighborhood(center, radius, include_center)
            .into_iter()
            .flat_map(|pos| self.agents_at(pos).iter().copied())
            .collect()
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> GridPos {
        GridPos::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }

    /// Sample uniformly until an unoccupied cell turns up
    ///
    /// Gives up after `max_attempts` draws so a saturated grid degrades into a
    /// skipped spawn instead of an endless loop.
    pub fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R, max_attempts: u32) -> Result<GridPos> {
        for _ in 0..max_attempts {
            let pos = self.random_cell(rng);
            if !self.is_occupied(pos) {
                return Ok(pos);
            }
        }
        Err(ColonyError::PlacementExhausted { attempts: max_attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid(topology: Topology) -> SpatialGrid {
        SpatialGrid::new(5, 5, topology, None)
    }

    #[test]
    fn test_place_and_lookup() {
        let mut g = grid(Topology::Bounded);
        g.place(AgentId(1), GridPos::new(2, 3)).unwrap();
        assert_eq!(g.position_of(AgentId(1)), Some(GridPos::new(2, 3)));
        assert!(g.is_occupied(GridPos::new(2, 3)));
        assert!(!g.is_occupied(GridPos::new(3, 2)));
    }

    #[test]
    fn test_cells_allow_multiple_occupants() {
        let mut g = grid(Topology::Bounded);
        let pos = GridPos::new(1, 1);
        g.place(AgentId(1), pos).unwrap();
        g.place(AgentId(2), pos).unwrap();
        assert_eq!(g.agents_at(pos), &[AgentId(1), AgentId(2)]);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut g = SpatialGrid::new(3, 3, Topology::Bounded, Some(1));
        let pos = GridPos::new(0, 0);
        g.place(AgentId(1), pos).unwrap();
        assert_eq!(g.place(AgentId(2), pos), Err(ColonyError::Occupancy(pos)));
    }

    #[test]
    fn test_out_of_bounds_placement_fails() {
        let mut g = grid(Topology::Toroidal);
        let pos = GridPos::new(5, 0);
        assert_eq!(g.place(AgentId(1), pos), Err(ColonyError::OutOfBounds(pos)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut g = grid(Topology::Bounded);
        g.place(AgentId(1), GridPos::new(0, 0)).unwrap();
        g.place(AgentId(2), GridPos::new(0, 0)).unwrap();

        assert_eq!(g.remove(AgentId(1)), Some(GridPos::new(0, 0)));
        assert_eq!(g.remove(AgentId(1)), None);

        assert_eq!(g.position_of(AgentId(1)), None);
        assert_eq!(g.agents_at(GridPos::new(0, 0)), &[AgentId(2)]);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_move_keeps_identity() {
        let mut g = grid(Topology::Bounded);
        g.place(AgentId(7), GridPos::new(0, 0)).unwrap();
        g.move_agent(AgentId(7), GridPos::new(4, 4)).unwrap();
        assert!(!g.is_occupied(GridPos::new(0, 0)));
        assert_eq!(g.agents_at(GridPos::new(4, 4)), &[AgentId(7)]);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_move_unplaced_agent_fails() {
        let mut g = grid(Topology::Bounded);
        assert_eq!(
            g.move_agent(AgentId(3), GridPos::new(1, 1)),
            Err(ColonyError::AgentNotFound(AgentId(3)))
        );
    }

    #[test]
    fn test_bounded_neighborhood_clips_at_corner() {
        let g = grid(Topology::Bounded);
        let cells = g.neighborhood(GridPos::new(0, 0), 1, false);
        assert_eq!(cells.len(), 3);
        let with_center = g.neighborhood(GridPos::new(0, 0), 1, true);
        assert_eq!(with_center.len(), 4);
    }

    #[test]
    fn test_toroidal_neighborhood_wraps() {
        let g = grid(Topology::Toroidal);
        assert_eq!(g.topology(), Topology::Toroidal);
        assert!(g.is_empty());
        let cells = g.neighborhood(GridPos::new(0, 0), 1, false);
        assert_eq!(cells.len(), 8);
        assert!(cells.contains(&GridPos::new(4, 4)));
        assert!(cells.contains(&GridPos::new(1, 4)));
    }

    #[test]
    fn test_toroidal_neighborhood_dedups_on_small_grid() {
        let g = SpatialGrid::new(2, 2, Topology::Toroidal, None);
        let cells = g.neighborhood(GridPos::new(0, 0), 1, false);
        // Only the three other cells exist
        assert_eq!(cells.len(), 3);
        assert!(!cells.contains(&GridPos::new(0, 0)));
    }

    #[test]
    fn test_neighbors_excludes_center_occupants() {
        let mut g = grid(Topology::Bounded);
        g.place(AgentId(1), GridPos::new(2, 2)).unwrap();
        g.place(AgentId(2), GridPos::new(2, 3)).unwrap();
        g.place(AgentId(3), GridPos::new(4, 4)).unwrap();

        let near = g.neighbors(GridPos::new(2, 2), 1, false);
        assert_eq!(near, vec![AgentId(2)]);

        let near = g.neighbors(GridPos::new(2, 2), 1, true);
        assert!(near.contains(&AgentId(1)));
        assert!(near.contains(&AgentId(2)));

        let wide = g.neighbors(GridPos::new(2, 2), 2, false);
        assert!(wide.contains(&AgentId(3)));
    }

    #[test]
    fn test_random_empty_cell_finds_the_only_gap() {
        let mut g = SpatialGrid::new(2, 2, Topology::Bounded, None);
        g.place(AgentId(1), GridPos::new(0, 0)).unwrap();
        g.place(AgentId(2), GridPos::new(1, 0)).unwrap();
        g.place(AgentId(3), GridPos::new(0, 1)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(g.random_empty_cell(&mut rng, 1000), Ok(GridPos::new(1, 1)));
    }

    #[test]
    fn test_random_empty_cell_exhausts_on_full_grid() {
        let mut g = SpatialGrid::new(1, 2, Topology::Bounded, None);
        g.place(AgentId(1), GridPos::new(0, 0)).unwrap();
        g.place(AgentId(2), GridPos::new(0, 1)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(
            g.random_empty_cell(&mut rng, 50),
            Err(ColonyError::PlacementExhausted { attempts: 50 })
        );
    }
}
