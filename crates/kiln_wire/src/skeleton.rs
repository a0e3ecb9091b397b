//! Host-interface wrapper around a finished network.
//!
//! The skeleton exposes the network to the board middleware: it buffers
//! inputs and outputs, drives the network's enable and address signals, and
//! answers reads of its identifier bytes. Two template variants exist, `v1`
//! with a one-byte id and `v2` with a sixteen-byte id.

use std::fmt;
use std::str::FromStr;

use kiln_common::to_vhdl_binary_literal;
use kiln_emit::{Destination, Parameters, Template};
use kiln_hdl::{HdlError, Port};
use serde::{Deserialize, Serialize};

const SKELETON_V1_TEMPLATE: &str = include_str!("../templates/skeleton_v1.tpl.vhd");
const SKELETON_V2_TEMPLATE: &str = include_str!("../templates/skeleton_v2.tpl.vhd");

/// Entity and file name of every skeleton.
pub const SKELETON_NAME: &str = "skeleton";

/// Skeleton template variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SkeletonVersion {
    /// One-byte id.
    V1,
    /// Sixteen-byte id.
    V2,
}

impl SkeletonVersion {
    /// Required id length in bytes.
    pub fn id_len(self) -> usize {
        match self {
            SkeletonVersion::V1 => 1,
            SkeletonVersion::V2 => 16,
        }
    }

    fn template(self) -> Template {
        match self {
            SkeletonVersion::V1 => Template::new("skeleton_v1", SKELETON_V1_TEMPLATE),
            SkeletonVersion::V2 => Template::new("skeleton_v2", SKELETON_V2_TEMPLATE),
        }
    }
}

impl fmt::Display for SkeletonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkeletonVersion::V1 => write!(f, "v1"),
            SkeletonVersion::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for SkeletonVersion {
    type Err = HdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(SkeletonVersion::V1),
            "v2" => Ok(SkeletonVersion::V2),
            other => Err(HdlError::UnknownSkeletonVersion(other.to_string())),
        }
    }
}

impl TryFrom<String> for SkeletonVersion {
    type Error = HdlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SkeletonVersion> for String {
    fn from(version: SkeletonVersion) -> Self {
        version.to_string()
    }
}

/// The wrapper design for one network.
#[derive(Debug, Clone)]
pub struct Skeleton {
    network_name: String,
    port: Port,
    x_num_values: usize,
    y_num_values: usize,
    id: Vec<u8>,
    version: SkeletonVersion,
}

impl Skeleton {
    /// Creates a skeleton, checking the id length against the version.
    ///
    /// `port` is the wrapped network's port; data and address widths are
    /// read from its `x`, `y`, `x_address` and `y_address` signals.
    pub fn new(
        network_name: &str,
        port: &Port,
        x_num_values: usize,
        y_num_values: usize,
        id: Vec<u8>,
        version: SkeletonVersion,
    ) -> Result<Self, HdlError> {
        if id.len() != version.id_len() {
            return Err(HdlError::InvalidSkeletonId {
                version: version.to_string(),
                expected: version.id_len(),
                actual: id.len(),
            });
        }
        Ok(Self {
            network_name: network_name.to_string(),
            port: port.clone(),
            x_num_values,
            y_num_values,
            id,
            version,
        })
    }

    /// The template variant.
    pub fn version(&self) -> SkeletonVersion {
        self.version
    }

    /// Template parameters.
    pub fn parameters(&self) -> Parameters {
        let id = self
            .id
            .iter()
            .map(|byte| to_vhdl_binary_literal(i64::from(*byte), 8))
            .collect::<Vec<_>>()
            .join(", ");
        Parameters::new()
            .with("name", SKELETON_NAME)
            .with("network_name", self.network_name.as_str())
            .with("data_width_in", self.port.width_of("x").to_string())
            .with("x_addr_width", self.port.width_of("x_address").to_string())
            .with("x_num_values", self.x_num_values.to_string())
            .with("y_num_values", self.y_num_values.to_string())
            .with("data_width_out", self.port.width_of("y").to_string())
            .with("y_addr_width", self.port.width_of("y_address").to_string())
            .with("id", id)
    }

    /// Writes `skeleton.vhd` below `destination`.
    pub fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        let lines = self.version.template().render(&self.parameters())?;
        destination
            .create_subpath(SKELETON_NAME)?
            .write_file(".vhd", &lines)?;
        tracing::info!(version = %self.version, network = %self.network_name, "persisted skeleton");
        Ok(())
    }
}
