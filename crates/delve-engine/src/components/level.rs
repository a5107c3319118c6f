//! Ordered set of named regions with a "current region" pointer.

use log::{info, warn};

use crate::api::config::RegionConfig;
use crate::assets::level::{LevelDescription, LoadError};
use crate::components::tilemap::TileGrid;
use crate::core::geom::Rect;
use crate::core::physics::SolidQuery;

#[derive(Debug, Clone, Default)]
pub struct Level {
    grids: Vec<TileGrid>,
    current: Option<String>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a grid, replacing any grid with the same name in place.
    /// The first active grid added becomes current.
    pub fn insert(&mut self, grid: TileGrid) {
        if self.current.is_none() && grid.active {
            self.current = Some(grid.name.clone());
        }
        match self.grids.iter_mut().find(|g| g.name == grid.name) {
            Some(existing) => *existing = grid,
            None => self.grids.push(grid),
        }
    }

    /// Build and insert a region from its configuration and description.
    pub fn load_region(&mut self, region: &RegionConfig, desc: &LevelDescription) -> Result<(), LoadError> {
        let mut grid = TileGrid::from_description(region.name.clone(), region.origin_vec(), desc)?;
        grid.active = region.active;
        info!("level: region '{}' loaded (active: {})", region.name, region.active);
        self.insert(grid);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TileGrid> {
        self.grids.iter().find(|g| g.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TileGrid> {
        self.grids.iter_mut().find(|g| g.name == name)
    }

    pub fn grids(&self) -> &[TileGrid] {
        &self.grids
    }

    pub fn grids_mut(&mut self) -> &mut [TileGrid] {
        &mut self.grids
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.grids.iter().map(|g| g.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Set a grid's activation flag. Returns `false` if no such grid exists.
    pub fn set_active(&mut self, name: &str, active: bool) -> bool {
        match self.get_mut(name) {
            Some(grid) => {
                grid.active = active;
                true
            }
            None => {
                warn!("level: no region named '{}'", name);
                false
            }
        }
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.get(name).is_some_and(|g| g.active)
    }

    pub fn active_grids(&self) -> impl Iterator<Item = &TileGrid> {
        self.grids.iter().filter(|g| g.active)
    }

    pub fn first_active(&self) -> Option<&str> {
        self.active_grids().next().map(|g| g.name.as_str())
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_grid(&self) -> Option<&TileGrid> {
        self.current.as_deref().and_then(|name| self.get(name))
    }

    pub fn set_current(&mut self, name: Option<String>) {
        self.current = name;
    }

    /// First grid (in insertion order) whose footprint fully contains `rect`.
    pub fn grid_containing(&self, rect: &Rect) -> Option<&TileGrid> {
        self.grids.iter().find(|g| g.contains_rect(rect))
    }
}

impl SolidQuery for Level {
    fn solids_overlapping(&self, rect: Rect) -> Vec<Rect> {
        let mut out = Vec::new();
        for grid in self.active_grids() {
            grid.collect_solids(rect, &mut out);
        }
        out
    }

    fn is_solid_at(&self, px: i32, py: i32) -> bool {
        self.active_grids().any(|g| g.is_solid_at(px, py))
    }
}
