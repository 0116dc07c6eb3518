// ==========================================
// Terra em Dia - domain type definitions
// ==========================================
// Enumerations shared by machines, supplies and their events.
// Labels match what the farm-facing screens display and what is
// persisted in the database.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a persisted or user-supplied label does not map to
/// a known enumeration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub label: String,
}

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} label: {:?}", self.kind, self.label)
    }
}

impl std::error::Error for UnknownLabel {}

// ==========================================
// Machine category
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineType {
    #[serde(rename = "Trator")]
    Tractor,
    #[serde(rename = "Colheitadeira")]
    Harvester,
    #[serde(rename = "Pulverizador")]
    Sprayer,
    #[serde(rename = "Plantadeira")]
    Planter,
    #[serde(rename = "Caminhão")]
    Truck,
    #[serde(rename = "Escavadeira")]
    Excavator,
    #[serde(rename = "Outro")]
    Other,
}

impl MachineType {
    pub const ALL: [MachineType; 7] = [
        MachineType::Tractor,
        MachineType::Harvester,
        MachineType::Sprayer,
        MachineType::Planter,
        MachineType::Truck,
        MachineType::Excavator,
        MachineType::Other,
    ];

    /// Label stored in the `machine.machine_type` column.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MachineType::Tractor => "Trator",
            MachineType::Harvester => "Colheitadeira",
            MachineType::Sprayer => "Pulverizador",
            MachineType::Planter => "Plantadeira",
            MachineType::Truck => "Caminhão",
            MachineType::Excavator => "Escavadeira",
            MachineType::Other => "Outro",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for MachineType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MachineType::ALL
            .iter()
            .copied()
            .find(|t| t.to_db_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| match trimmed.to_ascii_lowercase().as_str() {
                "caminhao" => Some(MachineType::Truck),
                "plantadora" | "semeadora" => Some(MachineType::Planter),
                _ => None,
            })
            .ok_or_else(|| UnknownLabel {
                kind: "machine type",
                label: s.to_string(),
            })
    }
}

// ==========================================
// Supply unit of measure
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplyUnit {
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "L")]
    Liter,
    #[serde(rename = "saco")]
    Bag,
    #[serde(rename = "unidade")]
    Unit,
    #[serde(rename = "tonelada")]
    Tonne,
}

impl SupplyUnit {
    pub const ALL: [SupplyUnit; 5] = [
        SupplyUnit::Kilogram,
        SupplyUnit::Liter,
        SupplyUnit::Bag,
        SupplyUnit::Unit,
        SupplyUnit::Tonne,
    ];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SupplyUnit::Kilogram => "kg",
            SupplyUnit::Liter => "L",
            SupplyUnit::Bag => "saco",
            SupplyUnit::Unit => "unidade",
            SupplyUnit::Tonne => "tonelada",
        }
    }
}

impl fmt::Display for SupplyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for SupplyUnit {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "quilograma" => Ok(SupplyUnit::Kilogram),
            "l" | "litro" => Ok(SupplyUnit::Liter),
            "saco" => Ok(SupplyUnit::Bag),
            "unidade" | "unid" | "un" => Ok(SupplyUnit::Unit),
            "tonelada" | "t" => Ok(SupplyUnit::Tonne),
            _ => Err(UnknownLabel {
                kind: "supply unit",
                label: s.to_string(),
            }),
        }
    }
}

// ==========================================
// Stock movement direction
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "entrada")]
    Inbound,
    #[serde(rename = "saida")]
    Outbound,
}

impl MovementKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MovementKind::Inbound => "entrada",
            MovementKind::Outbound => "saida",
        }
    }

    /// Signed effect of `amount` on a supply balance.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            MovementKind::Inbound => amount,
            MovementKind::Outbound => -amount,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for MovementKind {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entrada" | "inbound" => Ok(MovementKind::Inbound),
            "saida" | "saída" | "outbound" => Ok(MovementKind::Outbound),
            _ => Err(UnknownLabel {
                kind: "movement kind",
                label: s.to_string(),
            }),
        }
    }
}

// ==========================================
// Machine status (three levels)
// ==========================================
// Ordering: Ok < Upcoming < Attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MachineStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Próximo")]
    Upcoming,
    #[serde(rename = "Atenção")]
    Attention,
}

impl MachineStatus {
    pub fn as_label(&self) -> &'static str {
        match self {
            MachineStatus::Ok => "OK",
            MachineStatus::Upcoming => "Próximo",
            MachineStatus::Attention => "Atenção",
        }
    }

    pub fn needs_attention(&self) -> bool {
        !matches!(self, MachineStatus::Ok)
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

// ==========================================
// Supply status (two levels)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SupplyStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Baixo")]
    Low,
}

impl SupplyStatus {
    pub fn as_label(&self) -> &'static str {
        match self {
            SupplyStatus::Ok => "OK",
            SupplyStatus::Low => "Baixo",
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, SupplyStatus::Low)
    }
}

impl fmt::Display for SupplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
