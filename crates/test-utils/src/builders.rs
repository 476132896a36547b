//! Builders for reference configurations used across tests.

use femexec::config::{
    DimensionType, DispDof, FemExecutorConfig, FemProgram, ProgramConfig, SubstructureConfig,
};

/// The three-substructure reference configuration: MDL-01 with one control
/// node, MDL-02 with three, MDL-03 with one, each node carrying effective
/// DOF lists, plus an OpenSees program registration.
pub fn reference_config() -> FemExecutorConfig {
    let node1 = 2;
    let node2 = 3;
    let node3 = 4;

    let mut cfg = FemExecutorConfig::new("/home/femtest/Tmp");
    cfg.program_params.insert(
        FemProgram::OpenSees,
        ProgramConfig::new(
            FemProgram::OpenSees,
            "/usr/bin/OpenSees",
            "/Example/MOST/01_Left_OpenSees/StaticAnalysisEnv.tcl",
        ),
    );

    let specs: [(&str, Vec<u32>, &str); 3] = [
        ("MDL-01", vec![node1], "Examples/MOST/01_Left_OpenSees"),
        (
            "MDL-02",
            vec![node1, node2, node3],
            "Examples/MOST/02_Middle_OpenSees",
        ),
        ("MDL-03", vec![node2], "Examples/MOST/03_Right_OpenSees"),
    ];

    for (name, nodes, model) in specs {
        let mut sub = SubstructureConfig::new(
            name,
            Some(DimensionType::TwoD),
            Some(FemProgram::OpenSees),
            Some(model.to_string()),
            nodes.clone(),
        );
        for node in nodes {
            let dofs = if node == node1 {
                vec![DispDof::Dx, DispDof::Rz]
            } else {
                vec![DispDof::Dx]
            };
            sub.add_effective_dofs(node, dofs);
        }
        cfg.substructures.insert(name.to_string(), sub);
    }
    cfg
}
