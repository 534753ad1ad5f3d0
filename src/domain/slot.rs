//! Parking slot identifiers and the fixed grid layout

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{DomainError, DomainResult};

/// Number of columns in the grid (A, B, C, D)
pub const GRID_COLUMNS: u8 = 4;
/// Number of rows per column (1..=5)
pub const GRID_ROWS: u8 = 5;

/// Total number of slots in the lot
pub const TOTAL_SLOTS: usize = (GRID_COLUMNS as usize) * (GRID_ROWS as usize);

/// Identifier of one fixed parking slot: column letter + row number, e.g. `A3`.
///
/// Slots are never created or destroyed; only the 20 identifiers of the
/// 4x5 grid are valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotId {
    column: char,
    row: u8,
}

impl SlotId {
    /// Parse a slot identifier, rejecting anything outside the grid.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        let column = chars
            .next()
            .ok_or_else(|| DomainError::Validation("Empty slot id".to_string()))?
            .to_ascii_uppercase();
        let row: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| DomainError::Validation(format!("Invalid slot id: {}", s)))?;

        let max_column = (b'A' + GRID_COLUMNS - 1) as char;
        if !('A'..=max_column).contains(&column) || !(1..=GRID_ROWS).contains(&row) {
            return Err(DomainError::Validation(format!(
                "Slot {} is outside the {}x{} grid",
                s, GRID_COLUMNS, GRID_ROWS
            )));
        }

        Ok(Self { column, row })
    }

    /// Iterate over every slot in the grid, column-major (A1..A5, B1..B5, ...).
    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..GRID_COLUMNS).flat_map(|c| {
            (1..=GRID_ROWS).map(move |row| SlotId {
                column: (b'A' + c) as char,
                row,
            })
        })
    }

    pub fn column(&self) -> char {
        self.column
    }

    pub fn row(&self) -> u8 {
        self.row
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl TryFrom<String> for SlotId {
    type Error = DomainError;

    fn try_from(s: String) -> DomainResult<Self> {
        Self::parse(&s)
    }
}

impl From<SlotId> for String {
    fn from(id: SlotId) -> Self {
        id.to_string()
    }
}

/// Vehicle category determining the fee rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleCategory {
    LightVehicle,
    Motorcycle,
    /// Anything the rate table does not recognize. Parks for free by design
    /// of the original fee schedule; kept as-is, not an error.
    Other(String),
}

impl VehicleCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LightVehicle => "Light Vehicle",
            Self::Motorcycle => "Motorcycle",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for VehicleCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Light Vehicle" => Self::LightVehicle,
            "Motorcycle" => Self::Motorcycle,
            _ => Self::Other(s),
        }
    }
}

impl From<VehicleCategory> for String {
    fn from(c: VehicleCategory) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sticker status: discount eligibility flag affecting the fee rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StickerStatus {
    Valid,
    None,
}

impl StickerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "With Valid Sticker",
            Self::None => "No Sticker",
        }
    }
}

impl From<String> for StickerStatus {
    fn from(s: String) -> Self {
        // Only the exact literal grants the discounted rate
        if s == "With Valid Sticker" {
            Self::Valid
        } else {
            Self::None
        }
    }
}

impl From<StickerStatus> for String {
    fn from(s: StickerStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for StickerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
