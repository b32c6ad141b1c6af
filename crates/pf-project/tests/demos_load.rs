use std::path::Path;

#[test]
fn demos_load_and_build() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/plants");
    let demos = ["reference_plant.yaml", "green_batch.yaml"];

    for name in demos {
        let path = root.join(name);
        let def = pf_project::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        pf_project::build_plant(&def)
            .unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
    }
}

#[test]
fn reference_demo_matches_builtin() {
    let path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/plants/reference_plant.yaml");
    let def = pf_project::load_yaml(&path).unwrap();
    assert_eq!(def, pf_project::reference_plant());
}
