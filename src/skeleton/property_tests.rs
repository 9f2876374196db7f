//! 关节映射属性测试
//!
//! 使用proptest验证映射表生成的不变量

#[cfg(test)]
mod tests {
    use crate::skeleton::joints::{
        generate_joint_map, leaf_name, path_names_only, remap_joints, UNMAPPED,
    };
    use proptest::prelude::*;

    // 关节名片段：不含 `/`
    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9_]{0,7}"
    }

    fn joint_path() -> impl Strategy<Value = String> {
        prop::collection::vec(segment(), 1..5).prop_map(|segments| segments.join("/"))
    }

    fn joint_list(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(joint_path(), 0..max)
    }

    proptest! {
        #[test]
        fn leaf_name_is_last_segment(segments in prop::collection::vec(segment(), 1..6)) {
            let path = segments.join("/");
            prop_assert_eq!(leaf_name(&path), segments[segments.len() - 1].as_str());
        }

        #[test]
        fn path_names_only_preserves_length(paths in joint_list(16)) {
            let names = path_names_only(&paths);
            prop_assert_eq!(names.len(), paths.len());
            prop_assert!(names.iter().all(|name| !name.contains('/')));
        }

        #[test]
        fn fallback_map_has_mesh_length_and_valid_entries(
            mesh in joint_list(24),
            captured in prop::collection::vec(joint_path(), 1..24)
        ) {
            let map = generate_joint_map(&mesh, &captured, true).unwrap();
            prop_assert_eq!(map.len(), mesh.len());
            prop_assert!(map.iter().all(|&i| i != UNMAPPED && (i as usize) < captured.len()));
            // 有效的映射表一定能生成驱动关节列表
            prop_assert_eq!(remap_joints(&map, &captured).unwrap().len(), mesh.len());
        }

        #[test]
        fn successful_strict_map_matches_leaf_names(
            mesh in joint_list(16),
            captured in joint_list(16)
        ) {
            if let Ok(map) = generate_joint_map(&mesh, &captured, false) {
                prop_assert_eq!(map.len(), mesh.len());
                for (i, &target) in map.iter().enumerate() {
                    prop_assert!(target >= 0);
                    prop_assert_eq!(
                        leaf_name(&captured[target as usize]),
                        leaf_name(&mesh[i])
                    );
                }
            }
        }

        #[test]
        fn name_matches_survive_fallback(
            mesh in joint_list(16),
            captured in prop::collection::vec(joint_path(), 1..16)
        ) {
            let map = generate_joint_map(&mesh, &captured, true).unwrap();
            let captured_names = path_names_only(&captured);
            for (i, name) in path_names_only(&mesh).into_iter().enumerate() {
                if let Some(first) = captured_names.iter().position(|c| *c == name) {
                    prop_assert_eq!(map[i], first as i32);
                } else {
                    prop_assert_eq!(map[i], i.min(captured.len() - 1) as i32);
                }
            }
        }

        #[test]
        fn identical_lists_map_to_first_occurrence(joints in joint_list(16)) {
            let map = generate_joint_map(&joints, &joints, false).unwrap();
            let names = path_names_only(&joints);
            for (i, &target) in map.iter().enumerate() {
                prop_assert!(target as usize <= i);
                prop_assert_eq!(names[target as usize], names[i]);
            }
        }
    }
}
