//! Raw Telemetry Record

use serde::{Deserialize, Serialize};

/// One row of machine telemetry as it appears in the training CSV
/// and in prediction request bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Row identifier, dropped before feature construction
    #[serde(rename = "UDI", default)]
    pub udi: Option<u64>,
    /// Composite product code: quality letter followed by serial number
    #[serde(rename = "Product ID", default)]
    pub product_id: Option<String>,
    /// Machine type code (L, M, H)
    #[serde(rename = "Type")]
    pub machine_type: String,
    #[serde(rename = "Air temperature [K]")]
    pub air_temperature: f64,
    #[serde(rename = "Process temperature [K]")]
    pub process_temperature: f64,
    #[serde(rename = "Rotational speed [rpm]")]
    pub rotational_speed: f64,
    #[serde(rename = "Torque [Nm]")]
    pub torque: f64,
    #[serde(rename = "Tool wear [min]")]
    pub tool_wear: f64,
    /// Outcome label, absent on prediction requests
    #[serde(rename = "Machine failure", default)]
    pub machine_failure: Option<u8>,
    /// Tool wear failure
    #[serde(rename = "TWF")]
    pub twf: u8,
    /// Heat dissipation failure
    #[serde(rename = "HDF")]
    pub hdf: u8,
    /// Power failure
    #[serde(rename = "PWF")]
    pub pwf: u8,
    /// Overstrain failure
    #[serde(rename = "OSF")]
    pub osf: u8,
    /// Random failure
    #[serde(rename = "RNF")]
    pub rnf: u8,
}

/// The five failure-mode flags of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureModes {
    pub twf: u8,
    pub hdf: u8,
    pub pwf: u8,
    pub osf: u8,
    pub rnf: u8,
}

impl FailureModes {
    /// Flag names in column order
    pub const NAMES: [&'static str; 5] = ["TWF", "HDF", "PWF", "OSF", "RNF"];

    /// Flags as an array in column order
    pub fn as_array(&self) -> [u8; 5] {
        [self.twf, self.hdf, self.pwf, self.osf, self.rnf]
    }

    /// Whether any failure mode is raised
    pub fn any(&self) -> bool {
        self.as_array().iter().any(|&f| f != 0)
    }
}

impl MachineRecord {
    /// Failure-mode flags of this record
    pub fn failure_modes(&self) -> FailureModes {
        FailureModes {
            twf: self.twf,
            hdf: self.hdf,
            pwf: self.pwf,
            osf: self.osf,
            rnf: self.rnf,
        }
    }

    /// Whether the record is labelled as a machine failure
    pub fn is_failure(&self) -> Option<bool> {
        self.machine_failure.map(|label| label != 0)
    }
}
