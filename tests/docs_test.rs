//! Deployment documentation stays in sync with the variables the service reads

use std::path::PathBuf;
use truckshift::utils::constants::{ALL_ENV_VARS, ENV_PORT, RENDER_ENV_VARS};

fn read(relative: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}

#[test]
fn test_guide_documents_every_variable() {
    let guide = read("docs/DEPLOYMENT.md");
    for var in ALL_ENV_VARS {
        assert!(
            guide.contains(&format!("`{}`", var)),
            "{} is read by the service but missing from docs/DEPLOYMENT.md",
            var
        );
    }
}

#[test]
fn test_checklist_variables_are_explained() {
    let guide = read("docs/DEPLOYMENT.md");
    let (checklist, rest) = guide
        .split_once("## Environment variables")
        .expect("guide has an environment variables section");
    let checklist = checklist
        .split_once("## Checklist")
        .map(|(_, c)| c)
        .expect("guide has a checklist section");

    for var in ALL_ENV_VARS {
        if checklist.contains(&format!("`{}`", var)) {
            assert!(rest.contains(&format!("| `{}`", var)), "{} not explained", var);
        }
    }
}

#[test]
fn test_render_blueprint_declares_variables() {
    let blueprint = read("render.yaml");
    for var in RENDER_ENV_VARS {
        assert!(
            blueprint.contains(&format!("key: {}", var)),
            "{} missing from render.yaml",
            var
        );
    }
    // The platform assigns PORT itself
    assert!(!blueprint.contains(&format!("key: {}", ENV_PORT)));
}

#[test]
fn test_render_blueprint_commands() {
    let blueprint = read("render.yaml");
    assert!(blueprint.contains("buildCommand: cargo build --release"));
    assert!(blueprint.contains("startCommand: ./target/release/truckshift"));
    assert!(blueprint.contains("healthCheckPath: /health"));
}
