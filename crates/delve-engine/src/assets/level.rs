use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Error type for level loading
#[derive(Debug)]
pub enum LoadError {
    /// The document is not valid JSON or a record has the wrong shape.
    Json(serde_json::Error),
    /// A required top-level field is absent.
    MissingField(&'static str),
    /// A field is present but its value cannot describe a grid.
    Invalid(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(e)
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Json(e) => write!(f, "Parse error: {}", e),
            LoadError::MissingField(name) => write!(f, "Missing field: {}", name),
            LoadError::Invalid(msg) => write!(f, "Invalid level: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Level description document consumed by `TileGrid::load`.
///
/// Grid dimensions are optional at the serde level so that a missing field
/// surfaces as `LoadError::MissingField` instead of a generic parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDescription {
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub tile_size: Option<i64>,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub bg_colour: Option<[u8; 3]>,
    #[serde(default)]
    pub tint_colour: Option<[u8; 3]>,
    #[serde(default)]
    pub layers: Vec<LayerRecord>,
}

/// Validated grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
}

impl LevelDescription {
    /// Parse a level description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the required dimension fields.
    pub fn dims(&self) -> Result<GridDims, LoadError> {
        let width = self.width.ok_or(LoadError::MissingField("width"))?;
        let height = self.height.ok_or(LoadError::MissingField("height"))?;
        let tile_size = self.tile_size.ok_or(LoadError::MissingField("tile_size"))?;

        if tile_size <= 0 {
            return Err(LoadError::Invalid(format!("tile_size must be positive, got {}", tile_size)));
        }
        if width < 0 || height < 0 {
            return Err(LoadError::Invalid(format!("negative grid size {}x{}", width, height)));
        }
        let narrow = |v: i64, name: &str| {
            i32::try_from(v).map_err(|_| LoadError::Invalid(format!("{} out of range: {}", name, v)))
        };
        Ok(GridDims {
            width: narrow(width, "width")?,
            height: narrow(height, "height")?,
            tile_size: narrow(tile_size, "tile_size")?,
        })
    }
}

/// One entry of the `layers` list. `data` is decoded according to `kind`.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Layer kinds understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Tiles,
    Sensors,
    Enemies,
    Npcs,
}

impl LayerRecord {
    pub fn layer_kind(&self) -> Option<LayerKind> {
        match self.kind.as_str() {
            "tilelayer" => Some(LayerKind::Tiles),
            "sensor_layer" => Some(LayerKind::Sensors),
            "enemies" => Some(LayerKind::Enemies),
            "npcs" => Some(LayerKind::Npcs),
            _ => None,
        }
    }

    /// Decode `data` as a list of records. A missing/null `data` is an empty list.
    pub fn records<T: DeserializeOwned>(&self) -> Result<Vec<T>, LoadError> {
        if self.data.is_null() {
            return Ok(Vec::new());
        }
        Ok(Vec::<T>::deserialize(&self.data)?)
    }
}

/// Raw tile variant: an atlas index, or a named variant such as `"dark"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawVariant {
    Index(i64),
    Name(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub z: Option<i64>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub variant: Option<RawVariant>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default = "one")]
    pub w: i32,
    #[serde(default = "one")]
    pub h: i32,
    #[serde(default)]
    pub render_cut: [i32; 2],
    #[serde(default, deserialize_with = "lenient_int")]
    pub alternate: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub dark_depth: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub solid_depth: Option<i64>,
}

impl TileRecord {
    pub fn has_property(&self, tag: &str) -> bool {
        self.properties.iter().any(|p| p == tag)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default)]
    pub properties: Vec<String>,
}

impl SensorRecord {
    /// Sensor id as a string. Records with a null/absent id are skipped by the loader.
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Enemy or NPC spawn record, handed to the actor factory.
#[derive(Debug, Clone, Deserialize)]
pub struct SpawnRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub properties: Vec<String>,
}

fn one() -> i32 {
    1
}

/// Accept integers, floats, numeric strings, empty strings and null.
/// Anything that does not parse as a number becomes `None`.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(v)) => Some(v),
        Some(Raw::Float(v)) => Some(v as i64),
        Some(Raw::Text(s)) => s.trim().parse::<i64>().ok(),
        None => None,
    })
}
