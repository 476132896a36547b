// src/config/model.rs

//! Typed configuration objects for substructures and solver programs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Model dimensionality of a substructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionType {
    TwoD,
    ThreeD,
}

impl fmt::Display for DimensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionType::TwoD => write!(f, "TwoD"),
            DimensionType::ThreeD => write!(f, "ThreeD"),
        }
    }
}

impl FromStr for DimensionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TwoD" => Ok(DimensionType::TwoD),
            "ThreeD" => Ok(DimensionType::ThreeD),
            other => Err(format!("unrecognized dimension '{other}'")),
        }
    }
}

/// One displacement/rotation degree of freedom at a control node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispDof {
    Dx,
    Dy,
    Dz,
    Rx,
    Ry,
    Rz,
}

impl fmt::Display for DispDof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispDof::Dx => "DX",
            DispDof::Dy => "DY",
            DispDof::Dz => "DZ",
            DispDof::Rx => "RX",
            DispDof::Ry => "RY",
            DispDof::Rz => "RZ",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DispDof {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "DX" => Ok(DispDof::Dx),
            "DY" => Ok(DispDof::Dy),
            "DZ" => Ok(DispDof::Dz),
            "RX" => Ok(DispDof::Rx),
            "RY" => Ok(DispDof::Ry),
            "RZ" => Ok(DispDof::Rz),
            other => Err(format!("unrecognized DOF '{other}'")),
        }
    }
}

/// Supported FEM solver programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FemProgram {
    OpenSees,
    Abaqus,
    Ansys,
}

impl FemProgram {
    /// All known programs, in registry order.
    pub const ALL: [FemProgram; 3] = [FemProgram::OpenSees, FemProgram::Abaqus, FemProgram::Ansys];
}

impl fmt::Display for FemProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FemProgram::OpenSees => "OPENSEES",
            FemProgram::Abaqus => "ABAQUS",
            FemProgram::Ansys => "ANSYS",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FemProgram {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "OPENSEES" => Ok(FemProgram::OpenSees),
            "ABAQUS" => Ok(FemProgram::Abaqus),
            "ANSYS" => Ok(FemProgram::Ansys),
            other => Err(format!("unrecognized FEM program '{other}'")),
        }
    }
}

/// Launch parameters for one solver program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramConfig {
    pub program: FemProgram,
    pub executable_path: String,
    /// Analysis script used for static (one-shot) runs.
    pub static_script_path: String,
}

impl ProgramConfig {
    pub fn new(
        program: FemProgram,
        executable_path: impl Into<String>,
        static_script_path: impl Into<String>,
    ) -> Self {
        Self {
            program,
            executable_path: executable_path.into(),
            static_script_path: static_script_path.into(),
        }
    }
}

/// Configuration for one substructure.
///
/// Fields are optional where a load can leave gaps (see the loader's
/// per-field error policy); callers validate before use.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstructureConfig {
    pub name: String,
    pub dimension: Option<DimensionType>,
    pub program: Option<FemProgram>,
    pub model_filename: Option<String>,
    /// Control nodes in sequence order.
    pub control_nodes: Vec<u32>,
    /// Effective DOFs per control node.
    pub effective_dofs: BTreeMap<u32, Vec<DispDof>>,
}

impl SubstructureConfig {
    pub fn new(
        name: impl Into<String>,
        dimension: Option<DimensionType>,
        program: Option<FemProgram>,
        model_filename: Option<String>,
        control_nodes: Vec<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            program,
            model_filename,
            control_nodes,
            effective_dofs: BTreeMap::new(),
        }
    }

    pub fn add_effective_dofs(&mut self, node: u32, dofs: Vec<DispDof>) {
        self.effective_dofs.insert(node, dofs);
    }

    pub fn effective_dofs(&self, node: u32) -> Option<&[DispDof]> {
        self.effective_dofs.get(&node).map(Vec::as_slice)
    }
}

/// The full executor configuration: working directory, program registry,
/// and all substructures.
///
/// Both maps are `BTreeMap`s so that saving writes entries in a stable,
/// lexically sorted order regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FemExecutorConfig {
    pub work_dir: String,
    pub program_params: BTreeMap<FemProgram, ProgramConfig>,
    pub substructures: BTreeMap<String, SubstructureConfig>,
}

impl FemExecutorConfig {
    pub fn new(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            program_params: BTreeMap::new(),
            substructures: BTreeMap::new(),
        }
    }
}
