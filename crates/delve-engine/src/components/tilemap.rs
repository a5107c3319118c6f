//! Sparse tile grid for one named region of a level.
//!
//! Cells live in a `HashMap` keyed by grid coordinate, so regions can sit at
//! arbitrary (including negative) offsets without allocating the empty space
//! around them. Loading expands compact block records into individual cells;
//! queries afterwards are plain lookups.

use std::collections::{BTreeSet, HashMap};

use glam::{IVec2, Vec2};
use log::{debug, info};

use crate::assets::level::{
    GridDims, LayerKind, LevelDescription, LoadError, RawVariant, SensorRecord, SpawnRecord,
    TileRecord,
};
use crate::components::sensor::Sensor;
use crate::core::geom::Rect;
use crate::core::physics::SolidQuery;
use crate::renderer::instance::TileInstance;

pub const SOLID: &str = "solid";
pub const DARK: &str = "dark";
pub const REPEAT: &str = "repeat";
pub const ALTERNATE: &str = "alternate";

/// Integer cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: IVec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// Visual of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileVariant {
    /// Atlas index.
    Index(u32),
    /// Solid dark fill.
    Dark,
    /// Present for collision only; nothing is drawn.
    Hidden,
}

impl TileVariant {
    fn from_raw(raw: Option<&RawVariant>) -> Self {
        match raw {
            Some(RawVariant::Index(i)) => u32::try_from(*i).map_or(TileVariant::Hidden, TileVariant::Index),
            Some(RawVariant::Name(name)) if name == DARK => TileVariant::Dark,
            Some(RawVariant::Name(name)) => name
                .trim()
                .parse::<u32>()
                .map_or(TileVariant::Hidden, TileVariant::Index),
            None => TileVariant::Hidden,
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, TileVariant::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub environment: String,
    pub kind: String,
    pub variant: TileVariant,
    pub properties: Vec<String>,
    pub z: i32,
}

impl Tile {
    pub fn has_property(&self, tag: &str) -> bool {
        self.properties.iter().any(|p| p == tag)
    }

    pub fn is_solid(&self) -> bool {
        self.has_property(SOLID)
    }
}

/// Which population a spawn record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnCategory {
    Enemy,
    Npc,
}

/// Actor spawn point in grid units (origin already applied).
#[derive(Debug, Clone, PartialEq)]
pub struct Spawn {
    pub category: SpawnCategory,
    pub kind: String,
    pub position: Vec2,
    pub properties: Vec<String>,
}

impl Spawn {
    fn from_record(category: SpawnCategory, record: SpawnRecord) -> Self {
        Self {
            category,
            kind: record.kind,
            position: Vec2::new(record.x, record.y),
            properties: record.properties,
        }
    }

    /// Top-left corner in world pixels.
    pub fn world_position(&self, tile_size: i32) -> Vec2 {
        self.position * tile_size as f32
    }
}

/// One region of the level.
#[derive(Debug, Clone)]
pub struct TileGrid {
    pub name: String,
    width: i32,
    height: i32,
    tile_size: i32,
    /// Offset in grid units, applied once during `load`.
    origin: IVec2,
    pub environment: String,
    pub bg_colour: Option<[u8; 3]>,
    pub tint_colour: Option<[u8; 3]>,
    /// Inactive grids answer no solid queries.
    pub active: bool,
    tiles: HashMap<GridPos, Tile>,
    sensors: Vec<Sensor>,
    spawns: Vec<Spawn>,
}

impl TileGrid {
    /// Empty, active grid. Nothing is solid until `load` succeeds.
    pub fn new(name: impl Into<String>, origin: IVec2) -> Self {
        Self {
            name: name.into(),
            width: 0,
            height: 0,
            tile_size: 0,
            origin,
            environment: String::new(),
            bg_colour: None,
            tint_colour: None,
            active: true,
            tiles: HashMap::new(),
            sensors: Vec::new(),
            spawns: Vec::new(),
        }
    }

    pub fn from_description(
        name: impl Into<String>,
        origin: IVec2,
        desc: &LevelDescription,
    ) -> Result<Self, LoadError> {
        let mut grid = Self::new(name, origin);
        grid.load(desc)?;
        Ok(grid)
    }

    /// Replace all content with the description's. On error the grid is left
    /// untouched.
    pub fn load(&mut self, desc: &LevelDescription) -> Result<(), LoadError> {
        let dims = desc.dims()?;

        let mut tiles = HashMap::new();
        let mut sensors: Vec<Sensor> = Vec::new();
        let mut spawns = Vec::new();

        for layer in &desc.layers {
            match layer.layer_kind() {
                Some(LayerKind::Tiles) => {
                    for record in layer.records::<TileRecord>()? {
                        expand_record(&mut tiles, &record, &desc.environment, &dims)?;
                    }
                }
                Some(LayerKind::Sensors) => {
                    for record in layer.records::<SensorRecord>()? {
                        let Some(id) = record.id_string() else {
                            debug!("grid '{}': sensor without id skipped", self.name);
                            continue;
                        };
                        let sensor = Sensor::from_record(id, &record);
                        // Later records with the same id replace earlier ones.
                        match sensors.iter_mut().find(|s| s.id == sensor.id) {
                            Some(existing) => *existing = sensor,
                            None => sensors.push(sensor),
                        }
                    }
                }
                Some(LayerKind::Enemies) => spawns.extend(
                    layer
                        .records::<SpawnRecord>()?
                        .into_iter()
                        .map(|r| Spawn::from_record(SpawnCategory::Enemy, r)),
                ),
                Some(LayerKind::Npcs) => spawns.extend(
                    layer
                        .records::<SpawnRecord>()?
                        .into_iter()
                        .map(|r| Spawn::from_record(SpawnCategory::Npc, r)),
                ),
                None => debug!("grid '{}': skipping unknown layer type '{}'", self.name, layer.kind),
            }
        }

        let origin = self.origin;
        if origin != IVec2::ZERO {
            tiles = tiles.into_iter().map(|(pos, tile)| (pos.offset(origin), tile)).collect();
            for sensor in &mut sensors {
                sensor.shift(origin);
            }
            for spawn in &mut spawns {
                spawn.position += origin.as_vec2();
            }
        }

        self.width = dims.width;
        self.height = dims.height;
        self.tile_size = dims.tile_size;
        self.environment = desc.environment.clone();
        self.bg_colour = desc.bg_colour;
        self.tint_colour = desc.tint_colour;
        self.tiles = tiles;
        self.sensors = sensors;
        self.spawns = spawns;

        info!(
            "grid '{}': loaded {} tiles, {} sensors, {} spawns ({}x{} @ {}px)",
            self.name,
            self.tiles.len(),
            self.sensors.len(),
            self.spawns.len(),
            self.width,
            self.height,
            self.tile_size
        );
        Ok(())
    }

    // -- Accessors --

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn sensors_mut(&mut self) -> &mut [Sensor] {
        &mut self.sensors
    }

    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }

    // -- Queries --

    pub fn get_tile(&self, gx: i32, gy: i32) -> Option<&Tile> {
        self.tiles.get(&GridPos::new(gx, gy))
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Tile)> {
        self.tiles.iter().map(|(pos, tile)| (*pos, tile))
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// World rectangle of a cell.
    pub fn cell_rect(&self, pos: GridPos) -> Rect {
        Rect::from_cell(pos.x, pos.y, self.tile_size)
    }

    /// World footprint of the declared grid size.
    pub fn world_bounds(&self) -> Rect {
        let ts = self.tile_size;
        Rect::new(self.origin.x * ts, self.origin.y * ts, self.width * ts, self.height * ts)
    }

    pub fn contains_rect(&self, rect: &Rect) -> bool {
        self.world_bounds().contains(rect)
    }

    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        self.world_bounds().contains_point(px, py)
    }

    /// World rectangles of solid cells overlapping `rect`.
    ///
    /// Only the cells in the padded grid range around `rect` are visited.
    pub fn solid_tiles_overlapping(&self, rect: Rect) -> Vec<Rect> {
        let mut out = Vec::new();
        self.collect_solids(rect, &mut out);
        out
    }

    pub(crate) fn collect_solids(&self, rect: Rect, out: &mut Vec<Rect>) {
        if !self.active || self.tile_size <= 0 {
            return;
        }
        let ts = self.tile_size;
        let left = rect.left().div_euclid(ts) - 1;
        let right = rect.right().div_euclid(ts) + 1;
        let top = rect.top().div_euclid(ts) - 1;
        let bottom = rect.bottom().div_euclid(ts) + 1;

        for gx in left..=right {
            for gy in top..=bottom {
                let Some(tile) = self.tiles.get(&GridPos::new(gx, gy)) else {
                    continue;
                };
                if !tile.is_solid() {
                    continue;
                }
                let cell = Rect::from_cell(gx, gy, ts);
                if cell.overlaps(&rect) {
                    out.push(cell);
                }
            }
        }
    }

    /// Whether the pixel falls in a solid cell of this (active) grid.
    pub fn is_solid_at(&self, px: i32, py: i32) -> bool {
        if !self.active || self.tile_size <= 0 {
            return false;
        }
        let pos = GridPos::new(px.div_euclid(self.tile_size), py.div_euclid(self.tile_size));
        self.tiles.get(&pos).is_some_and(Tile::is_solid)
    }

    /// Distinct z layers, ascending.
    pub fn layers(&self) -> Vec<i32> {
        self.tiles
            .values()
            .map(|t| t.z)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn tiles_on_layer(&self, z: i32) -> impl Iterator<Item = (GridPos, &Tile)> {
        self.iter().filter(move |(_, tile)| tile.z == z)
    }

    /// Draw instances for every visible tile in `view`, ordered by z, then
    /// row, then column.
    pub fn build_visible_instances(&self, view: &Rect) -> Vec<TileInstance> {
        if self.tile_size <= 0 || view.w <= 0 || view.h <= 0 {
            return Vec::new();
        }
        let ts = self.tile_size;
        let min_gx = view.left().div_euclid(ts);
        let min_gy = view.top().div_euclid(ts);
        let max_gx = (view.right() - 1).div_euclid(ts);
        let max_gy = (view.bottom() - 1).div_euclid(ts);

        let mut visible: Vec<(GridPos, &Tile)> = Vec::new();
        for gy in min_gy..=max_gy {
            for gx in min_gx..=max_gx {
                let pos = GridPos::new(gx, gy);
                if let Some(tile) = self.tiles.get(&pos) {
                    if tile.variant.is_visible() {
                        visible.push((pos, tile));
                    }
                }
            }
        }
        visible.sort_by_key(|(pos, tile)| (tile.z, pos.y, pos.x));

        let tinted = if self.tint_colour.is_some() { 1.0 } else { 0.0 };
        visible
            .into_iter()
            .map(|(pos, tile)| TileInstance {
                x: (pos.x * ts) as f32,
                y: (pos.y * ts) as f32,
                size: ts as f32,
                variant: match tile.variant {
                    TileVariant::Index(i) => i as f32,
                    _ => TileInstance::DARK_VARIANT,
                },
                z: tile.z as f32,
                tinted,
            })
            .collect()
    }
}

impl SolidQuery for TileGrid {
    fn solids_overlapping(&self, rect: Rect) -> Vec<Rect> {
        self.solid_tiles_overlapping(rect)
    }

    fn is_solid_at(&self, px: i32, py: i32) -> bool {
        TileGrid::is_solid_at(self, px, py)
    }
}

// ---------------------------------------------------------------------------
// Record expansion
// ---------------------------------------------------------------------------

fn expand_record(
    tiles: &mut HashMap<GridPos, Tile>,
    record: &TileRecord,
    environment: &str,
    dims: &GridDims,
) -> Result<(), LoadError> {
    let x0 = record.x as i32;
    let y0 = record.y as i32;
    let z = record.z.unwrap_or(0) as i32;
    let variant = TileVariant::from_raw(record.variant.as_ref());

    let make = |variant: TileVariant, properties: Vec<String>| Tile {
        environment: environment.to_string(),
        kind: record.kind.clone(),
        variant,
        properties,
        z,
    };

    if !record.has_property(REPEAT) {
        tiles.insert(GridPos::new(x0, y0), make(variant, record.properties.clone()));
        return Ok(());
    }

    // Fills never reach past the grid's bottom edge.
    let dark_depth = fill_depth(record.dark_depth, "dark_depth", dims)?;
    let solid_depth = fill_depth(record.solid_depth, "solid_depth", dims)?;
    let w = record.w.max(0);
    let h = record.h.max(0);
    let deepest = h.max(dark_depth.unwrap_or(0)).max(solid_depth.unwrap_or(0));
    if x0.checked_add(w).is_none() || y0.checked_add(deepest).is_none() {
        return Err(LoadError::Invalid(format!(
            "tile block at ({}, {}) overflows the grid coordinates",
            x0, y0
        )));
    }

    let dark = record.has_property(DARK);
    let alternate = record.alternate.filter(|_| record.has_property(ALTERNATE));

    for x in 0..w {
        let visible = alternate.map_or(true, |mask| (i64::from(x) & mask) == 0);
        let cut_column = record.render_cut[0] != 0 && x == w - 1;

        for y in 0..h {
            let cut_row = record.render_cut[1] != 0 && y == h - 1;
            let cell_variant = if visible && !cut_column && !cut_row {
                variant
            } else {
                TileVariant::Hidden
            };
            tiles.insert(
                GridPos::new(x0 + x, y0 + y),
                make(cell_variant, record.properties.clone()),
            );
        }

        // Depth fills hang from the block's top row, not its bottom.
        let column = x0 + x;
        if dark && visible {
            let depth = dark_depth.unwrap_or(0);
            let solid = solid_depth.unwrap_or(depth);
            if solid <= depth {
                for y1 in 0..depth {
                    let properties = if y1 <= solid { vec![SOLID.to_string()] } else { Vec::new() };
                    backfill(tiles, GridPos::new(column, y0 + y1), || {
                        make(TileVariant::Dark, properties)
                    });
                }
            } else {
                for y1 in 0..solid {
                    backfill(tiles, GridPos::new(column, y0 + y1), || {
                        make(TileVariant::Hidden, vec![SOLID.to_string()])
                    });
                }
            }
        }

        for y1 in 0..solid_depth.unwrap_or(0) {
            backfill(tiles, GridPos::new(column, y0 + y1), || {
                make(TileVariant::Hidden, vec![SOLID.to_string()])
            });
        }
    }
    Ok(())
}

/// Narrow a depth field to `i32` and clamp it to the grid height.
fn fill_depth(
    raw: Option<i64>,
    field: &str,
    dims: &GridDims,
) -> Result<Option<i32>, LoadError> {
    raw.map(|depth| {
        i32::try_from(depth)
            .map(|depth| depth.min(dims.height))
            .map_err(|_| LoadError::Invalid(format!("{} out of range: {}", field, depth)))
    })
    .transpose()
}

/// Insert only if the cell is empty.
fn backfill(tiles: &mut HashMap<GridPos, Tile>, pos: GridPos, tile: impl FnOnce() -> Tile) {
    tiles.entry(pos).or_insert_with(tile);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(json: &str) -> TileGrid {
        let desc = LevelDescription::from_json(json).unwrap();
        TileGrid::from_description("test", IVec2::ZERO, &desc).unwrap()
    }

    fn level_with_tiles(tiles: &str) -> String {
        format!(
            r#"{{ "width": 20, "height": 20, "tile_size": 32, "environment": "cave",
                 "layers": [ {{ "type": "tilelayer", "data": [ {} ] }} ] }}"#,
            tiles
        )
    }

    #[test]
    fn single_tile_is_stored_with_its_attributes() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 2, "y": 3, "z": 1, "type": "floor", "variant": 5, "properties": ["solid"] }"#,
        ));
        let tile = g.get_tile(2, 3).unwrap();
        assert_eq!(tile.environment, "cave");
        assert_eq!(tile.kind, "floor");
        assert_eq!(tile.variant, TileVariant::Index(5));
        assert_eq!(tile.z, 1);
        assert!(tile.is_solid());
        assert!(g.get_tile(3, 3).is_none());
        assert_eq!(g.tile_count(), 1);
    }

    #[test]
    fn repeat_block_fills_every_cell() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 1, "y": 1, "type": "floor", "variant": 0, "properties": ["repeat", "solid"], "w": 3, "h": 2 }"#,
        ));
        assert_eq!(g.tile_count(), 6);
        for x in 1..=3 {
            for y in 1..=2 {
                let tile = g.get_tile(x, y).unwrap();
                assert_eq!(tile.kind, "floor", "({}, {})", x, y);
                assert_eq!(tile.variant, TileVariant::Index(0), "({}, {})", x, y);
                assert_eq!(tile.z, 0, "({}, {})", x, y);
                assert_eq!(tile.properties, vec!["repeat", "solid"], "({}, {})", x, y);
                assert!(tile.is_solid());
            }
        }
    }

    #[test]
    fn alternate_hides_masked_columns() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "variant": 2, "properties": ["repeat", "alternate"], "w": 4, "h": 1, "alternate": 1 }"#,
        ));
        assert_eq!(g.tile_count(), 4);
        assert_eq!(g.get_tile(0, 0).unwrap().variant, TileVariant::Index(2));
        assert_eq!(g.get_tile(1, 0).unwrap().variant, TileVariant::Hidden);
        assert_eq!(g.get_tile(2, 0).unwrap().variant, TileVariant::Index(2));
        assert_eq!(g.get_tile(3, 0).unwrap().variant, TileVariant::Hidden);
    }

    #[test]
    fn alternate_mask_needs_its_property() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "variant": 2, "properties": ["repeat", "dark"], "w": 4, "h": 1,
                 "alternate": 1, "dark_depth": 2 }"#,
        ));
        for x in 0..4 {
            assert_eq!(g.get_tile(x, 0).unwrap().variant, TileVariant::Index(2), "column {}", x);
            assert_eq!(g.get_tile(x, 1).unwrap().variant, TileVariant::Dark, "column {}", x);
        }
    }

    #[test]
    fn render_cut_hides_last_column_and_row() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "variant": 1, "properties": ["repeat"], "w": 3, "h": 2, "render_cut": [1, 0] }"#,
        ));
        assert_eq!(g.get_tile(2, 0).unwrap().variant, TileVariant::Hidden);
        assert_eq!(g.get_tile(2, 1).unwrap().variant, TileVariant::Hidden);
        assert_eq!(g.get_tile(1, 1).unwrap().variant, TileVariant::Index(1));

        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "variant": 1, "properties": ["repeat"], "w": 3, "h": 2, "render_cut": [0, 1] }"#,
        ));
        assert_eq!(g.get_tile(0, 1).unwrap().variant, TileVariant::Hidden);
        assert_eq!(g.get_tile(0, 0).unwrap().variant, TileVariant::Index(1));
    }

    #[test]
    fn dark_backfill_marks_shallow_rows_solid() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "variant": 1, "properties": ["repeat", "dark", "solid"],
                 "w": 1, "h": 1, "dark_depth": 4, "solid_depth": 1 }"#,
        ));
        // Row 0 is the block itself; rows 1..4 are dark fill.
        assert_eq!(g.get_tile(0, 0).unwrap().variant, TileVariant::Index(1));
        let row1 = g.get_tile(0, 1).unwrap();
        assert_eq!(row1.variant, TileVariant::Dark);
        assert!(row1.is_solid());
        let row2 = g.get_tile(0, 2).unwrap();
        assert_eq!(row2.variant, TileVariant::Dark);
        assert!(!row2.is_solid());
        assert!(g.get_tile(0, 3).is_some());
        assert!(g.get_tile(0, 4).is_none());
    }

    #[test]
    fn deep_solid_overrides_dark_fill() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "variant": 1, "properties": ["repeat", "dark"],
                 "w": 1, "h": 1, "dark_depth": 1, "solid_depth": 3 }"#,
        ));
        for y in 1..3 {
            let tile = g.get_tile(0, y).unwrap();
            assert_eq!(tile.variant, TileVariant::Hidden);
            assert!(tile.is_solid());
        }
        assert!(g.get_tile(0, 3).is_none());
    }

    #[test]
    fn fill_depth_stops_at_grid_bottom() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "variant": 1, "properties": ["repeat"], "w": 1, "h": 1,
                 "solid_depth": 5000000 }"#,
        ));
        assert_eq!(g.tile_count(), 20);
        assert!(g.get_tile(0, 19).is_some_and(Tile::is_solid));
        assert!(g.get_tile(0, 20).is_none());
    }

    #[test]
    fn out_of_range_depth_is_rejected() {
        let mut g = grid(&level_with_tiles(r#"{ "x": 0, "y": 0, "variant": 0 }"#));
        let bad = LevelDescription::from_json(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "variant": 1, "properties": ["repeat", "dark"], "w": 1, "h": 1,
                 "dark_depth": 99999999999 }"#,
        ))
        .unwrap();
        assert!(matches!(g.load(&bad), Err(LoadError::Invalid(_))));
        assert_eq!(g.tile_count(), 1);
    }

    #[test]
    fn block_past_coordinate_range_is_rejected() {
        let desc = LevelDescription::from_json(&level_with_tiles(
            r#"{ "x": 2147483640, "y": 0, "variant": 1, "properties": ["repeat"], "w": 10, "h": 1 }"#,
        ))
        .unwrap();
        assert!(matches!(
            TileGrid::from_description("test", IVec2::ZERO, &desc),
            Err(LoadError::Invalid(_))
        ));
    }

    #[test]
    fn backfill_never_overwrites_existing_cells() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 2, "type": "gem", "variant": 9 },
               { "x": 0, "y": 0, "variant": 1, "properties": ["repeat"], "w": 1, "h": 1, "solid_depth": 4 }"#,
        ));
        let gem = g.get_tile(0, 2).unwrap();
        assert_eq!(gem.kind, "gem");
        assert!(!gem.is_solid());
        assert!(g.get_tile(0, 3).unwrap().is_solid());
    }

    #[test]
    fn block_cells_overwrite_earlier_tiles() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 1, "y": 0, "type": "gem", "variant": 9 },
               { "x": 0, "y": 0, "type": "wall", "variant": 1, "properties": ["repeat"], "w": 2, "h": 1 }"#,
        ));
        assert_eq!(g.get_tile(1, 0).unwrap().kind, "wall");
    }

    #[test]
    fn origin_shifts_tiles_sensors_and_spawns() {
        let json = r#"{
            "width": 4, "height": 4, "tile_size": 16,
            "layers": [
                { "type": "tilelayer", "data": [ { "x": 0, "y": 0, "variant": 0, "properties": ["solid"] } ] },
                { "type": "sensor_layer", "data": [ { "id": "a", "type": "render", "x": 1, "y": 1, "w": 1, "h": 1 } ] },
                { "type": "enemies", "data": [ { "type": "flyer", "x": 2, "y": 0 } ] },
                { "type": "npcs", "data": [ { "type": "shop", "x": 3, "y": 3, "properties": ["potion"] } ] }
            ]
        }"#;
        let desc = LevelDescription::from_json(json).unwrap();
        let g = TileGrid::from_description("cave", IVec2::new(10, -2), &desc).unwrap();

        assert!(g.get_tile(0, 0).is_none());
        assert!(g.get_tile(10, -2).is_some());
        assert_eq!(g.sensors()[0].world_rect(16), Rect::new(176, -16, 16, 16));
        assert_eq!(g.spawns()[0].position, Vec2::new(12.0, -2.0));
        assert_eq!(g.spawns()[0].category, SpawnCategory::Enemy);
        assert_eq!(g.spawns()[1].category, SpawnCategory::Npc);
        assert_eq!(g.world_bounds(), Rect::new(160, -32, 64, 64));
        assert!(g.is_solid_at(160, -32));
    }

    #[test]
    fn failed_load_keeps_previous_content() {
        let mut g = grid(&level_with_tiles(r#"{ "x": 0, "y": 0, "variant": 0 }"#));
        let bad = LevelDescription::from_json(r#"{ "width": 1, "height": 1 }"#).unwrap();
        assert!(matches!(g.load(&bad), Err(LoadError::MissingField("tile_size"))));
        assert_eq!(g.tile_count(), 1);
    }

    #[test]
    fn unknown_layers_are_skipped() {
        let g = grid(
            r#"{ "width": 2, "height": 2, "tile_size": 8,
                 "layers": [ { "type": "parallax", "data": [1, 2, 3] } ] }"#,
        );
        assert_eq!(g.tile_count(), 0);
    }

    #[test]
    fn solid_query_returns_only_overlapping_cells() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 2, "variant": 0, "properties": ["repeat", "solid"], "w": 5, "h": 1 },
               { "x": 1, "y": 1, "variant": 0 }"#,
        ));
        // Resting exactly on the floor row: edge contact only.
        assert!(g.solid_tiles_overlapping(Rect::new(40, 48, 16, 16)).is_empty());

        let hits = g.solid_tiles_overlapping(Rect::new(40, 50, 16, 16));
        assert_eq!(hits, vec![Rect::new(32, 64, 32, 32)]);

        let hits = g.solid_tiles_overlapping(Rect::new(20, 60, 30, 10));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn inactive_grid_is_not_solid() {
        let mut g = grid(&level_with_tiles(r#"{ "x": 0, "y": 0, "variant": 0, "properties": ["solid"] }"#));
        assert!(g.is_solid_at(5, 5));
        g.active = false;
        assert!(!g.is_solid_at(5, 5));
        assert!(g.solid_tiles_overlapping(Rect::new(0, 0, 32, 32)).is_empty());
        assert!(g.get_tile(0, 0).is_some());
    }

    #[test]
    fn containment_uses_world_footprint() {
        let g = grid(&level_with_tiles(""));
        assert!(g.contains_rect(&Rect::new(0, 0, 640, 640)));
        assert!(!g.contains_rect(&Rect::new(630, 0, 20, 20)));
        assert!(g.contains_point(639, 639));
        assert!(!g.contains_point(-1, 0));
    }

    #[test]
    fn layers_and_visible_instances() {
        let g = grid(&level_with_tiles(
            r#"{ "x": 0, "y": 0, "z": 2, "variant": 3 },
               { "x": 1, "y": 0, "z": 0, "variant": "dark" },
               { "x": 2, "y": 0, "z": 0, "properties": ["solid"] },
               { "x": 30, "y": 30, "z": 1, "variant": 1 }"#,
        ));
        assert_eq!(g.layers(), vec![0, 1, 2]);
        assert_eq!(g.tiles_on_layer(0).count(), 2);

        let instances = g.build_visible_instances(&Rect::new(0, 0, 128, 64));
        assert_eq!(instances.len(), 2);
        assert!(instances[0].is_dark());
        assert_eq!(instances[0].x, 32.0);
        assert_eq!(instances[1].variant, 3.0);
        assert_eq!(instances[1].z, 2.0);
    }
}
