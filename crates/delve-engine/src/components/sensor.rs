//! Trigger rectangles that switch regions on and off as the player walks in.

use glam::IVec2;

use crate::assets::level::SensorRecord;
use crate::core::geom::Rect;

/// What a sensor reacts to. Only render triggers carry behavior; every other
/// kind is kept so the level can round-trip it, but is never evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorKind {
    Render,
    Inert(String),
}

impl SensorKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "render" | "render_trigger" | "render-trigger" => SensorKind::Render,
            other => SensorKind::Inert(other.to_string()),
        }
    }
}

/// Region change requested by a sensor property tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorEffect {
    /// `render:<grid>`
    Render(String),
    /// `derender:<grid>`
    Derender(String),
    /// `toggle_render:<grid>`
    ToggleRender(String),
}

impl SensorEffect {
    /// Parse a `verb:grid` tag. Unknown verbs and empty targets yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        let (verb, target) = tag.split_once(':')?;
        let target = target.trim();
        if target.is_empty() {
            return None;
        }
        let target = target.to_string();
        match verb.trim() {
            "render" => Some(SensorEffect::Render(target)),
            "derender" => Some(SensorEffect::Derender(target)),
            "toggle_render" => Some(SensorEffect::ToggleRender(target)),
            _ => None,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            SensorEffect::Render(name)
            | SensorEffect::Derender(name)
            | SensorEffect::ToggleRender(name) => name,
        }
    }
}

/// A sensor placed in grid units. `triggered` latches on entry and clears
/// once the player's box has fully left.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub id: String,
    pub kind: SensorKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub effects: Vec<SensorEffect>,
    pub triggered: bool,
}

impl Sensor {
    pub fn from_record(id: String, record: &SensorRecord) -> Self {
        Self {
            id,
            kind: SensorKind::parse(&record.kind),
            x: record.x,
            y: record.y,
            w: record.w,
            h: record.h,
            effects: record
                .properties
                .iter()
                .filter_map(|tag| SensorEffect::parse(tag))
                .collect(),
            triggered: false,
        }
    }

    pub fn is_render_trigger(&self) -> bool {
        self.kind == SensorKind::Render
    }

    /// Shift by a whole-cell origin offset.
    pub fn shift(&mut self, origin: IVec2) {
        self.x += origin.x as f32;
        self.y += origin.y as f32;
    }

    /// World-space rectangle; fractional pixels are truncated.
    pub fn world_rect(&self, tile_size: i32) -> Rect {
        let ts = tile_size as f32;
        Rect::new(
            (self.x * ts) as i32,
            (self.y * ts) as i32,
            (self.w * ts) as i32,
            (self.h * ts) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_tags() {
        assert_eq!(SensorEffect::parse("render:cave"), Some(SensorEffect::Render("cave".into())));
        assert_eq!(
            SensorEffect::parse("derender:surface"),
            Some(SensorEffect::Derender("surface".into()))
        );
        assert_eq!(
            SensorEffect::parse("toggle_render:b").map(|e| e.target().to_string()),
            Some("b".to_string())
        );
        assert_eq!(SensorEffect::parse("render:"), None);
        assert_eq!(SensorEffect::parse("explode:cave"), None);
        assert_eq!(SensorEffect::parse("solid"), None);
    }

    #[test]
    fn kind_aliases() {
        assert_eq!(SensorKind::parse("render"), SensorKind::Render);
        assert_eq!(SensorKind::parse("render_trigger"), SensorKind::Render);
        assert_eq!(SensorKind::parse("checkpoint"), SensorKind::Inert("checkpoint".into()));
    }

    #[test]
    fn world_rect_scales_and_truncates() {
        let record: SensorRecord = serde_json::from_str(
            r#"{ "id": "s", "type": "render", "x": 1.5, "y": 2, "w": 0.5, "h": 1,
                 "properties": ["render:a", "bogus"] }"#,
        )
        .unwrap();
        let mut sensor = Sensor::from_record("s".into(), &record);
        assert_eq!(sensor.effects.len(), 1);
        assert_eq!(sensor.world_rect(32), Rect::new(48, 64, 16, 32));

        sensor.shift(IVec2::new(-1, 2));
        assert_eq!(sensor.world_rect(10), Rect::new(5, 40, 5, 10));
    }
}
