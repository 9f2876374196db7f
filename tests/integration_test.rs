use std::fs;
use std::rc::Rc;

use skel_remap::config::RemapConfig;
use skel_remap::editor::CommandManager;
use skel_remap::scene::skel::{BINDING_JOINTS_ATTR, JOINT_INDICES_ATTR};
use skel_remap::scene::{Layer, PrimPath, Stage, Value};
use skel_remap::skeleton::apply::remapped_indices_command;
use skel_remap::skeleton::{
    apply, generate_joint_map, remap_reference, CachedReplacementSkeletons,
    JointAutoRemappingError, SkeletonReplacementBinding, REMIX_JOINT_ATTR,
};

/// 捕获图层 + 编辑图层 + 替换资源
const SCENE_JSON: &str = r#"{
  "layer_stack": ["mod.usda", "capture.usda"],
  "layers": [
    {
      "identifier": "capture.usda",
      "prims": {
        "/RootNode": { "specifier": "def", "type_name": "Xform" },
        "/RootNode/meshes": { "specifier": "def", "type_name": "Scope" },
        "/RootNode/meshes/mesh_0": { "specifier": "def", "type_name": "SkelRoot" },
        "/RootNode/meshes/mesh_0/skel": {
          "specifier": "def",
          "type_name": "Skeleton",
          "attributes": {
            "joints": {
              "value_type": "token_array",
              "variability": "uniform",
              "default": { "type": "token_array", "value": ["Hips", "Hips/Spine", "Hips/Spine/Head"] }
            }
          }
        },
        "/RootNode/meshes/mesh_0/mesh": {
          "specifier": "def",
          "type_name": "Mesh",
          "api_schemas": ["SkelBindingAPI"],
          "relationships": { "skel:skeleton": ["/RootNode/meshes/mesh_0/skel"] }
        }
      }
    },
    {
      "identifier": "mod.usda",
      "prims": {
        "/RootNode/meshes/mesh_0/ref": {
          "specifier": "def",
          "references": [{ "asset_path": "asset.usda" }]
        }
      }
    },
    {
      "identifier": "asset.usda",
      "default_prim": "Asset",
      "prims": {
        "/Asset": { "specifier": "def", "type_name": "SkelRoot" },
        "/Asset/Skeleton": {
          "specifier": "def",
          "type_name": "Skeleton",
          "attributes": {
            "joints": {
              "value_type": "token_array",
              "default": { "type": "token_array", "value": ["Root/Head", "Root/Hips", "Root/Hips/Spine"] }
            }
          }
        },
        "/Asset/Body": {
          "specifier": "def",
          "type_name": "Mesh",
          "api_schemas": ["SkelBindingAPI"],
          "relationships": { "skel:skeleton": ["/Asset/Skeleton"] },
          "attributes": {
            "skel:joints": {
              "value_type": "token_array",
              "variability": "uniform",
              "default": { "type": "token_array", "value": ["Root/Head", "Root/Hips", "Root/Hips/Spine"] }
            },
            "primvars:skel:jointIndices": {
              "value_type": "int_array",
              "default": { "type": "int_array", "value": [0, 1, 2, 2, 1] }
            }
          }
        },
        "/Asset/Prop": {
          "specifier": "def",
          "type_name": "Mesh",
          "api_schemas": ["SkelBindingAPI"],
          "relationships": { "skel:skeleton": ["/Asset/PropSkeleton"] }
        },
        "/Asset/PropSkeleton": {
          "specifier": "def",
          "type_name": "Skeleton",
          "attributes": {
            "joints": {
              "value_type": "token_array",
              "default": { "type": "token_array", "value": ["Root/Handle"] }
            }
          }
        }
      }
    }
  ]
}"#;

fn p(s: &str) -> PrimPath {
    PrimPath::parse(s).unwrap()
}

fn stage() -> Stage {
    Stage::from_json_str(SCENE_JSON).unwrap()
}

const SKEL_ROOT: &str = "/RootNode/meshes/mesh_0";
const REFERENCE: &str = "/RootNode/meshes/mesh_0/ref";
const BODY: &str = "/RootNode/meshes/mesh_0/ref/Body";
const PROP: &str = "/RootNode/meshes/mesh_0/ref/Prop";

#[test]
fn test_joint_map_examples() {
    assert_eq!(
        generate_joint_map(&["Root/Hips", "Root/Hips/Spine"], &["Hips", "Spine", "Head"], false)
            .unwrap(),
        vec![0, 1]
    );
    assert!(matches!(
        generate_joint_map(&["Root/UnknownBone"], &["Hips"], false),
        Err(JointAutoRemappingError::NoNameMatch { .. })
    ));
    assert_eq!(
        generate_joint_map(
            &["Root/UnknownA", "Root/UnknownB", "Root/UnknownC"],
            &["Hips", "Spine"],
            true
        )
        .unwrap(),
        vec![0, 1, 1]
    );
    assert_eq!(
        generate_joint_map(&["Root/Hips", "Root/UnknownBone"], &["Hips", "Spine"], true).unwrap(),
        vec![0, 1]
    );
}

#[test]
fn test_binding_resolved_through_reference() {
    let stage = stage();
    let binding = SkeletonReplacementBinding::new(&stage, &p(SKEL_ROOT), &p(BODY)).unwrap();
    assert!(binding.has_replacement_skeleton());
    assert_eq!(binding.original_skeleton(), &p("/Asset/Skeleton"));
    assert_eq!(binding.auto_joint_map(&stage, false).unwrap(), vec![2, 0, 1]);
}

#[test]
fn test_apply_and_undo_redo() {
    let mut stage = stage();
    let mut history = CommandManager::new(16);
    let binding = SkeletonReplacementBinding::new(&stage, &p(SKEL_ROOT), &p(BODY)).unwrap();
    let joint_map = binding.auto_joint_map(&stage, false).unwrap();

    apply(&binding, &mut stage, &mut history, &joint_map).unwrap();
    assert_eq!(stage.joint_indices(&p(BODY)), Some(vec![2, 0, 1, 1, 0]));
    assert_eq!(stage.attribute_value(&p(BODY), BINDING_JOINTS_ATTR), None);

    assert!(history.undo(&mut stage).unwrap());
    assert_eq!(stage.joint_indices(&p(BODY)), Some(vec![0, 1, 2, 2, 1]));
    assert!(stage.edit_prim_spec(&p(BODY)).is_none());

    assert!(history.redo(&mut stage).unwrap());
    assert_eq!(stage.joint_indices(&p(BODY)), Some(vec![2, 0, 1, 1, 0]));
    assert_eq!(binding.joint_map(&stage), joint_map);
}

#[test]
fn test_index_step_noop_without_indices() {
    let stage = stage();
    let before = stage.edit_layer().clone();
    let binding = SkeletonReplacementBinding::new(&stage, &p(SKEL_ROOT), &p(PROP)).unwrap();
    assert!(binding.original_joint_indices(&stage).is_none());
    assert!(remapped_indices_command(&binding, &stage, &[0]).is_none());
    assert_eq!(stage.edit_layer(), &before);
}

#[test]
fn test_cache_idempotence_and_retry() {
    let stage = stage();
    let mut cache = CachedReplacementSkeletons::new();

    let first = cache.add(&stage, &p(SKEL_ROOT), &p(BODY)).unwrap();
    let second = cache.add(&stage, &p(SKEL_ROOT), &p(BODY)).unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    // 引用根下没有捕获骨骼，解析失败且不被缓存
    assert!(cache.add(&stage, &p(REFERENCE), &p(BODY)).is_none());
    assert!(cache.get(&p(REFERENCE), &p(BODY)).is_none());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_reference_workflow_reports_failures() {
    let mut stage = stage();
    let mut history = CommandManager::new(16);
    let mut cache = CachedReplacementSkeletons::new();
    let config = RemapConfig::default();

    let report = remap_reference(
        &mut stage,
        &mut history,
        &mut cache,
        &config.remap,
        &p(SKEL_ROOT),
        &p(REFERENCE),
    )
    .unwrap();

    assert_eq!(report.remapped, vec![p(BODY)]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].prim, p(PROP));
    assert_eq!(report.cleared_skel_roots, vec![p(REFERENCE)]);
    assert_eq!(
        stage.token_array(&p(BODY), REMIX_JOINT_ATTR),
        Some(vec![
            "Hips/Spine/Head".to_string(),
            "Hips".to_string(),
            "Hips/Spine".to_string()
        ])
    );
    assert_eq!(history.undo_count(), 1);
}

#[test]
fn test_workflow_with_fallback_from_toml_config() {
    let mut stage = stage();
    let config = RemapConfig::from_toml_str("[remap]\nfallback = true\n").unwrap();
    let mut history = CommandManager::new(config.history.max_history);
    let mut cache = CachedReplacementSkeletons::new();

    let report = remap_reference(
        &mut stage,
        &mut history,
        &mut cache,
        &config.remap,
        &p(SKEL_ROOT),
        &p(REFERENCE),
    )
    .unwrap();
    assert!(report.is_success());
    assert_eq!(
        stage.token_array(&p(PROP), REMIX_JOINT_ATTR),
        Some(vec!["Hips".to_string()])
    );
    assert_eq!(stage.joint_indices(&p(PROP)), None);
}

#[test]
fn test_edit_layer_json_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let scene_path = dir.path().join("scene.json");
    fs::write(&scene_path, SCENE_JSON)?;

    let mut stage = Stage::from_json_file(&scene_path)?;
    let mut history = CommandManager::default();
    let mut cache = CachedReplacementSkeletons::new();
    remap_reference(
        &mut stage,
        &mut history,
        &mut cache,
        &RemapConfig::default().remap,
        &p(SKEL_ROOT),
        &p(REFERENCE),
    )?;

    let out_path = dir.path().join("mod.json");
    fs::write(&out_path, stage.edit_layer().to_json_string()?)?;
    let written: Layer = serde_json::from_str(&fs::read_to_string(&out_path)?)?;
    assert_eq!(&written, stage.edit_layer());
    let body = written.prim(&p(BODY)).expect("body override");
    assert_eq!(
        body.attribute_value(JOINT_INDICES_ATTR),
        Some(&Value::IntArray(vec![2, 0, 1, 1, 0]))
    );
    assert_eq!(body.attribute_value(BINDING_JOINTS_ATTR), Some(&Value::Blocked));
    Ok(())
}
