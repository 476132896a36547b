// tests/config_roundtrip.rs

//! Persisted configuration: key schema, save/load round-trips, and the
//! lenient per-field error policy on load.

mod common;
use crate::common::init_tracing;

use femexec::config::{load_config, save_config, DimensionType, DispDof, FemProgram};
use femexec_test_utils::builders::reference_config;

/// The reference configuration written out by hand in the persisted key
/// schema. Loading this must reproduce `reference_config()` exactly.
const REFERENCE_RECORDS: &str = "\
work.dir=/home/femtest/Tmp
substructures=MDL-01, MDL-02, MDL-03
OPENSEES.executable=/usr/bin/OpenSees
OPENSEES.static.script=/Example/MOST/01_Left_OpenSees/StaticAnalysisEnv.tcl
MDL-01.dimension=TwoD
MDL-01.fem.program=OPENSEES
MDL-01.model.filename=Examples/MOST/01_Left_OpenSees
MDL-01.control.nodes=2
MDL-01.effective.dofs.2=DX,RZ
MDL-02.dimension=TwoD
MDL-02.fem.program=OPENSEES
MDL-02.model.filename=Examples/MOST/02_Middle_OpenSees
MDL-02.control.nodes=2,3,4
MDL-02.effective.dofs.2=DX,RZ
MDL-02.effective.dofs.3=DX
MDL-02.effective.dofs.4=DX
MDL-03.dimension=TwoD
MDL-03.fem.program=OPENSEES
MDL-03.model.filename=Examples/MOST/03_Right_OpenSees
MDL-03.control.nodes=3
MDL-03.effective.dofs.3=DX
";

#[test]
fn saved_configuration_reloads_equal() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("TestConfig.properties");

    let cfg = reference_config();
    save_config(&path, &cfg).unwrap();
    let reloaded = load_config(&path).unwrap();
    assert_eq!(reloaded, cfg);
}

#[test]
fn reference_records_load_to_the_reference_configuration() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ReferenceConfig.properties");
    std::fs::write(&path, REFERENCE_RECORDS).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, reference_config());
}

#[test]
fn save_writes_substructures_lexically_sorted() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Sorted.properties");

    save_config(&path, &reference_config()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    let line = text
        .lines()
        .find(|l| l.starts_with("substructures="))
        .expect("substructures record present");
    assert_eq!(line, "substructures=MDL-01, MDL-02, MDL-03");
}

#[test]
fn malformed_fields_leave_gaps_but_loading_continues() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Broken.properties");
    std::fs::write(
        &path,
        "\
work.dir=/tmp/fem
substructures=MDL-01
MDL-01.dimension=FourD
MDL-01.fem.program=OPENSEES
MDL-01.control.nodes=2,oops
MDL-01.model.filename=left.tcl
",
    )
    .unwrap();

    let loaded = load_config(&path).unwrap();
    let sub = loaded.substructures.get("MDL-01").expect("record kept");

    // Bad fields became gaps; good fields survived.
    assert_eq!(sub.dimension, None);
    assert!(sub.control_nodes.is_empty());
    assert_eq!(sub.program, Some(FemProgram::OpenSees));
    assert_eq!(sub.model_filename.as_deref(), Some("left.tcl"));
}

#[test]
fn dof_and_dimension_text_forms_match_the_schema() {
    assert_eq!(DispDof::Dx.to_string(), "DX");
    assert_eq!(DispDof::Rz.to_string(), "RZ");
    assert_eq!(DimensionType::TwoD.to_string(), "TwoD");
    assert_eq!(FemProgram::OpenSees.to_string(), "OPENSEES");
}
