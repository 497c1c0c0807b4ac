//! Tile code catalogue
//!
//! Tile codes are plain integers stored in every grid cell. Code 0 means the cell
//! is empty/unclassified. Ground tiles occupy 1-1000, object tiles start above 1000.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identifier for the terrain/object category of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "TileRef", into = "TileRef")]
pub struct TileCode(pub u16);

impl TileCode {
    pub const EMPTY: TileCode = TileCode(0);

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Human readable name if the code belongs to one of the built-in catalogues.
    pub fn name(&self) -> Option<&'static str> {
        if let Some(ground) = GroundTile::from_code(*self) {
            return Some(ground.name());
        }
        ObjectTile::from_code(*self).map(|object| object.name())
    }

    /// Resolve a catalogue name (case-insensitive, `snake_case` or `PascalCase`).
    pub fn from_name(name: &str) -> Option<TileCode> {
        let wanted: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        if wanted == "empty" {
            return Some(TileCode::EMPTY);
        }
        GroundTile::all()
            .iter()
            .map(|t| t.code())
            .chain(ObjectTile::all().iter().map(|t| t.code()))
            .find(|code| {
                code.name()
                    .map(|n| n.chars().filter(|c| *c != ' ').flat_map(char::to_lowercase).collect::<String>() == wanted)
                    .unwrap_or(false)
            })
    }
}

impl fmt::Display for TileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None if self.is_empty() => write!(f, "Empty (0)"),
            None => write!(f, "#{}", self.0),
        }
    }
}

impl From<GroundTile> for TileCode {
    fn from(tile: GroundTile) -> Self {
        tile.code()
    }
}

impl From<ObjectTile> for TileCode {
    fn from(tile: ObjectTile) -> Self {
        tile.code()
    }
}

/// Serialized form of a tile code: either a catalogue name or a raw number.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TileRef {
    Code(u16),
    Name(String),
}

impl TryFrom<TileRef> for TileCode {
    type Error = String;

    fn try_from(value: TileRef) -> Result<Self, Self::Error> {
        match value {
            TileRef::Code(code) => Ok(TileCode(code)),
            TileRef::Name(name) => {
                TileCode::from_name(&name).ok_or_else(|| format!("unknown tile name '{}'", name))
            }
        }
    }
}

impl From<TileCode> for TileRef {
    fn from(code: TileCode) -> Self {
        match GroundTile::from_code(code) {
            Some(ground) => TileRef::Name(ground.key().to_string()),
            None => match ObjectTile::from_code(code) {
                Some(object) => TileRef::Name(object.key().to_string()),
                None => TileRef::Code(code.0),
            },
        }
    }
}

/// Terrain tiles placed on the ground layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroundTile {
    DeepWater,
    ShallowWater,
    Beach,
    Grass,
    Dirt,
    Mountain,
    Snow,
    River,
}

impl GroundTile {
    pub fn all() -> &'static [GroundTile] {
        &[
            GroundTile::DeepWater,
            GroundTile::ShallowWater,
            GroundTile::Beach,
            GroundTile::Grass,
            GroundTile::Dirt,
            GroundTile::Mountain,
            GroundTile::Snow,
            GroundTile::River,
        ]
    }

    pub fn code(&self) -> TileCode {
        match self {
            GroundTile::DeepWater => TileCode(1),
            GroundTile::ShallowWater => TileCode(2),
            GroundTile::Beach => TileCode(3),
            GroundTile::Grass => TileCode(4),
            GroundTile::Dirt => TileCode(5),
            GroundTile::Mountain => TileCode(6),
            GroundTile::Snow => TileCode(7),
            GroundTile::River => TileCode(8),
        }
    }

    pub fn from_code(code: TileCode) -> Option<GroundTile> {
        GroundTile::all().iter().copied().find(|t| t.code() == code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GroundTile::DeepWater => "Deep Water",
            GroundTile::ShallowWater => "Shallow Water",
            GroundTile::Beach => "Beach",
            GroundTile::Grass => "Grass",
            GroundTile::Dirt => "Dirt",
            GroundTile::Mountain => "Mountain",
            GroundTile::Snow => "Snow",
            GroundTile::River => "River",
        }
    }

    /// Key used in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            GroundTile::DeepWater => "deep_water",
            GroundTile::ShallowWater => "shallow_water",
            GroundTile::Beach => "beach",
            GroundTile::Grass => "grass",
            GroundTile::Dirt => "dirt",
            GroundTile::Mountain => "mountain",
            GroundTile::Snow => "snow",
            GroundTile::River => "river",
        }
    }
}

/// Vegetation and props placed on the object layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectTile {
    Tree,
    PineTree,
    Bush,
    Rock,
}

impl ObjectTile {
    pub fn all() -> &'static [ObjectTile] {
        &[ObjectTile::Tree, ObjectTile::PineTree, ObjectTile::Bush, ObjectTile::Rock]
    }

    pub fn code(&self) -> TileCode {
        match self {
            ObjectTile::Tree => TileCode(1001),
            ObjectTile::PineTree => TileCode(1002),
            ObjectTile::Bush => TileCode(1003),
            ObjectTile::Rock => TileCode(1004),
        }
    }

    pub fn from_code(code: TileCode) -> Option<ObjectTile> {
        ObjectTile::all().iter().copied().find(|t| t.code() == code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObjectTile::Tree => "Tree",
            ObjectTile::PineTree => "Pine Tree",
            ObjectTile::Bush => "Bush",
            ObjectTile::Rock => "Rock",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ObjectTile::Tree => "tree",
            ObjectTile::PineTree => "pine_tree",
            ObjectTile::Bush => "bush",
            ObjectTile::Rock => "rock",
        }
    }
}
