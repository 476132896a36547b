// src/config/loader.rs

//! Load/save of executor configurations.
//!
//! Loading is deliberately lenient: every malformed or missing field is
//! logged and skipped, and the remaining fields of the record are still
//! loaded. A loaded configuration can therefore contain gaps; validating it
//! before use is the caller's job.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use tracing::error;

use crate::config::codec::{decode_list, encode_list};
use crate::config::model::{
    DimensionType, DispDof, FemExecutorConfig, FemProgram, ProgramConfig, SubstructureConfig,
};
use crate::config::properties;
use crate::errors::Result;

/// Key schema of the persisted format.
const WORK_DIR_KEY: &str = "work.dir";
const SUBSTRUCTURES_KEY: &str = "substructures";

/// Load a configuration from a flat key-value record file.
///
/// Only an unreadable file is an error; field-level problems are logged per
/// field and loading continues.
pub fn load_config(path: impl AsRef<Path>) -> Result<FemExecutorConfig> {
    let path = path.as_ref();
    let records = properties::read(path)?;

    let work_dir = match records.get(WORK_DIR_KEY) {
        Some(dir) => dir.clone(),
        None => {
            error!(path = %path.display(), "work.dir not found in configuration");
            String::new()
        }
    };
    let mut config = FemExecutorConfig::new(work_dir);

    for program in FemProgram::ALL {
        if let Some(program_cfg) = load_program(&records, program) {
            config.program_params.insert(program, program_cfg);
        }
    }

    match records.get(SUBSTRUCTURES_KEY) {
        Some(names) => {
            for name in names.split(", ") {
                let substructure = load_substructure(&records, name);
                config.substructures.insert(name.to_string(), substructure);
            }
        }
        None => {
            error!(path = %path.display(), "substructure name list not found in configuration");
        }
    }

    Ok(config)
}

/// Save a configuration. Substructure names are written lexically sorted.
pub fn save_config(path: impl AsRef<Path>, config: &FemExecutorConfig) -> Result<()> {
    let mut records: BTreeMap<String, String> = BTreeMap::new();

    records.insert(WORK_DIR_KEY.to_string(), config.work_dir.clone());
    // BTreeMap iteration already yields names in lexical order.
    let names: Vec<&str> = config.substructures.keys().map(String::as_str).collect();
    records.insert(SUBSTRUCTURES_KEY.to_string(), names.join(", "));

    for program_cfg in config.program_params.values() {
        save_program(&mut records, program_cfg);
    }
    for (name, substructure) in &config.substructures {
        save_substructure(&mut records, name, substructure);
    }

    properties::write(path, &records)
}

fn load_program(records: &BTreeMap<String, String>, program: FemProgram) -> Option<ProgramConfig> {
    let executable = records.get(&format!("{program}.executable"))?;
    let static_script = match records.get(&format!("{program}.static.script")) {
        Some(s) => s.clone(),
        None => {
            error!(%program, "static analysis script not found");
            String::new()
        }
    };
    Some(ProgramConfig::new(program, executable.clone(), static_script))
}

fn save_program(records: &mut BTreeMap<String, String>, program_cfg: &ProgramConfig) {
    let program = program_cfg.program;
    records.insert(
        format!("{program}.executable"),
        program_cfg.executable_path.clone(),
    );
    records.insert(
        format!("{program}.static.script"),
        program_cfg.static_script_path.clone(),
    );
}

fn load_substructure(records: &BTreeMap<String, String>, name: &str) -> SubstructureConfig {
    let dimension = load_field::<DimensionType>(records, name, "dimension");
    let program = load_field::<FemProgram>(records, name, "fem.program");
    let model_filename = records.get(&format!("{name}.model.filename")).cloned();

    let nodes = match records.get(&format!("{name}.control.nodes")) {
        Some(text) => match decode_list::<u32>(text) {
            Ok(nodes) => nodes,
            Err(e) => {
                error!(substructure = name, error = %e, "control node list not recognized");
                Vec::new()
            }
        },
        None => {
            error!(substructure = name, "control nodes not found");
            Vec::new()
        }
    };

    let mut config = SubstructureConfig::new(name, dimension, program, model_filename, nodes);
    for node in config.control_nodes.clone() {
        match records.get(&format!("{name}.effective.dofs.{node}")) {
            Some(text) => match decode_list::<DispDof>(text) {
                Ok(dofs) => config.add_effective_dofs(node, dofs),
                Err(e) => {
                    error!(substructure = name, node, error = %e, "effective DOF list not recognized");
                }
            },
            None => {
                error!(substructure = name, node, "missing effective DOFs");
            }
        }
    }
    config
}

fn save_substructure(
    records: &mut BTreeMap<String, String>,
    name: &str,
    substructure: &SubstructureConfig,
) {
    if let Some(dimension) = substructure.dimension {
        records.insert(format!("{name}.dimension"), dimension.to_string());
    } else {
        error!(substructure = name, "no dimension to save");
    }
    if let Some(program) = substructure.program {
        records.insert(format!("{name}.fem.program"), program.to_string());
    } else {
        error!(substructure = name, "no FEM program to save");
    }
    if let Some(ref model) = substructure.model_filename {
        records.insert(format!("{name}.model.filename"), model.clone());
    }
    records.insert(
        format!("{name}.control.nodes"),
        encode_list(&substructure.control_nodes),
    );
    for &node in &substructure.control_nodes {
        match substructure.effective_dofs(node) {
            Some(dofs) => {
                records.insert(format!("{name}.effective.dofs.{node}"), encode_list(dofs));
            }
            None => {
                error!(substructure = name, node, "node has no effective DOFs");
            }
        }
    }
}

fn load_field<T>(records: &BTreeMap<String, String>, name: &str, field: &str) -> Option<T>
where
    T: FromStr<Err = String>,
{
    match records.get(&format!("{name}.{field}")) {
        Some(text) => match text.parse::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                error!(substructure = name, field, error = %e, "field not recognized");
                None
            }
        },
        None => {
            error!(substructure = name, field, "field not found");
            None
        }
    }
}
