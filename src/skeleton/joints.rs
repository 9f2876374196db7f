//! 关节映射
//!
//! 关节名是以 `/` 分隔的层级路径，例如 `Hips/Spine/Spine1`。替换网格的关节
//! 路径与捕获骨骼位于不同的命名空间，因此匹配只比较最后一段（叶子名）。
//!
//! 映射表（`JointMap`）的第 `i` 项是网格关节 `i` 应该重定向到的捕获关节索引，
//! `UNMAPPED` 表示没有找到对应关节。

use std::collections::HashMap;

use super::error::{JointAutoRemappingError, JointMapResult};

/// 未映射的哨兵值，永远不会写入索引缓冲区
pub const UNMAPPED: i32 = -1;

/// 网格关节索引 -> 捕获关节索引
pub type JointMap = Vec<i32>;

/// 关节路径的叶子名（最后一个 `/` 之后的部分）
pub fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// 将关节路径列表化简为叶子名列表
pub fn path_names_only<S: AsRef<str>>(paths: &[S]) -> Vec<&str> {
    paths.iter().map(|path| leaf_name(path.as_ref())).collect()
}

/// 按叶子名生成映射表
///
/// 每个网格关节取第一个同名的捕获关节。名称匹配失败时：
/// - `fallback == false`: 整体失败，并记录完整的关节路径列表
/// - `fallback == true`: 所有未匹配的项取 `min(i, captured.len() - 1)`，
///   已按名称匹配的项保持不变
pub fn generate_joint_map<M, C>(
    mesh_joints: &[M],
    captured_joints: &[C],
    fallback: bool,
) -> JointMapResult<JointMap>
where
    M: AsRef<str> + std::fmt::Debug,
    C: AsRef<str> + std::fmt::Debug,
{
    let mut captured_index: HashMap<&str, usize> = HashMap::with_capacity(captured_joints.len());
    for (index, name) in path_names_only(captured_joints).into_iter().enumerate() {
        captured_index.entry(name).or_insert(index);
    }

    let mut joint_map: JointMap = path_names_only(mesh_joints)
        .into_iter()
        .map(|name| {
            captured_index
                .get(name)
                .map(|&index| index as i32)
                .unwrap_or(UNMAPPED)
        })
        .collect();

    let unmatched: Vec<usize> = joint_map
        .iter()
        .enumerate()
        .filter(|(_, &target)| target == UNMAPPED)
        .map(|(index, _)| index)
        .collect();
    if unmatched.is_empty() {
        return Ok(joint_map);
    }

    if !fallback {
        tracing::error!(
            target: "skeleton",
            "Replacement mesh contains joint names that are not in the captured skeleton and could not be remapped.\n - Skeleton: {:?}\n - Mesh: {:?}",
            captured_joints,
            mesh_joints
        );
        return Err(JointAutoRemappingError::NoNameMatch {
            unmatched: unmatched
                .iter()
                .map(|&index| mesh_joints[index].as_ref().to_string())
                .collect(),
        });
    }

    if captured_joints.is_empty() {
        return Err(JointAutoRemappingError::EmptyCapturedSkeleton);
    }

    // 名称匹配失败的项退化为按位置映射
    let max_index = captured_joints.len() - 1;
    for index in unmatched {
        joint_map[index] = index.min(max_index) as i32;
    }
    tracing::debug!(
        target: "skeleton",
        "Joint map generated with positional fallback: {:?}",
        joint_map
    );
    Ok(joint_map)
}

/// 校验映射表的每一项都指向捕获骨骼
pub fn validate_joint_map(joint_map: &[i32], captured_len: usize) -> JointMapResult<()> {
    match joint_map
        .iter()
        .enumerate()
        .find(|(_, &value)| value < 0 || value as usize >= captured_len)
    {
        Some((index, &value)) => Err(JointAutoRemappingError::InvalidMapEntry {
            index,
            value,
            captured_len,
        }),
        None => Ok(()),
    }
}

/// 由映射表得到驱动每个网格关节的捕获关节名
pub fn remap_joints<S: AsRef<str>>(
    joint_map: &[i32],
    captured_joints: &[S],
) -> JointMapResult<Vec<String>> {
    validate_joint_map(joint_map, captured_joints.len())?;
    Ok(joint_map
        .iter()
        .map(|&index| captured_joints[index as usize].as_ref().to_string())
        .collect())
}

/// 由已写入的重映射关节名还原映射表（按完整路径查找，找不到为 `UNMAPPED`）
pub fn joint_map_from_remapped<R, C>(remapped_joints: &[R], captured_joints: &[C]) -> JointMap
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    remapped_joints
        .iter()
        .map(|joint| {
            captured_joints
                .iter()
                .position(|captured| captured.as_ref() == joint.as_ref())
                .map(|index| index as i32)
                .unwrap_or(UNMAPPED)
        })
        .collect()
}

/// 所有影响都指向根关节的映射表
pub fn cleared_joint_map(mesh_joint_count: usize) -> JointMap {
    vec![0; mesh_joint_count]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_name() {
        assert_eq!(leaf_name("A/B/C"), "C");
        assert_eq!(leaf_name("Root"), "Root");
        assert_eq!(leaf_name(""), "");
    }

    #[test]
    fn test_path_names_only() {
        let paths = ["Hips", "Hips/Spine", "Hips/Spine/Head"];
        assert_eq!(path_names_only(&paths), vec!["Hips", "Spine", "Head"]);
    }

    #[test]
    fn test_exact_match() {
        let mesh = ["Root/Hips", "Root/Hips/Spine"];
        let captured = ["Hips", "Spine", "Head"];
        assert_eq!(generate_joint_map(&mesh, &captured, false).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_first_matching_captured_index_wins() {
        let mesh = ["Spine"];
        let captured = ["Hips/Spine", "Other/Spine"];
        assert_eq!(generate_joint_map(&mesh, &captured, false).unwrap(), vec![0]);
    }

    #[test]
    fn test_no_fallback_failure() {
        let mesh = ["Root/UnknownBone"];
        let captured = ["Hips"];
        let err = generate_joint_map(&mesh, &captured, false).unwrap_err();
        assert_eq!(
            err,
            JointAutoRemappingError::NoNameMatch {
                unmatched: vec!["Root/UnknownBone".to_string()]
            }
        );
    }

    #[test]
    fn test_single_unmatched_name_aborts_whole_map() {
        let mesh = ["Hips", "Tail", "Spine"];
        let captured = ["Hips", "Spine"];
        assert!(generate_joint_map(&mesh, &captured, false).is_err());
    }

    #[test]
    fn test_fallback_clamping() {
        let mesh = ["Root/UnknownA", "Root/UnknownB", "Root/UnknownC"];
        let captured = ["Hips", "Spine"];
        assert_eq!(
            generate_joint_map(&mesh, &captured, true).unwrap(),
            vec![0, 1, 1]
        );
    }

    #[test]
    fn test_mixed_match_and_fallback() {
        let mesh = ["Root/Hips", "Root/UnknownBone"];
        let captured = ["Hips", "Spine"];
        assert_eq!(generate_joint_map(&mesh, &captured, true).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_fallback_never_overwrites_name_matches() {
        let mesh = ["Unknown", "Hips", "Spine"];
        let captured = ["Spine", "Hips"];
        assert_eq!(
            generate_joint_map(&mesh, &captured, true).unwrap(),
            vec![0, 1, 0]
        );
    }

    #[test]
    fn test_fallback_with_empty_captured_fails() {
        let captured: [&str; 0] = [];
        assert_eq!(
            generate_joint_map(&["Hips"], &captured, true),
            Err(JointAutoRemappingError::EmptyCapturedSkeleton)
        );
    }

    #[test]
    fn test_empty_mesh_joints() {
        let mesh: [&str; 0] = [];
        assert_eq!(generate_joint_map(&mesh, &["Hips"], false).unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_remap_joints() {
        let captured = ["Hips", "Hips/Spine", "Hips/Spine/Head"];
        assert_eq!(
            remap_joints(&[2, 0, 0], &captured).unwrap(),
            vec!["Hips/Spine/Head", "Hips", "Hips"]
        );
    }

    #[test]
    fn test_remap_joints_rejects_sentinel() {
        let captured = ["Hips", "Spine"];
        assert_eq!(
            remap_joints(&[0, UNMAPPED], &captured),
            Err(JointAutoRemappingError::InvalidMapEntry {
                index: 1,
                value: -1,
                captured_len: 2
            })
        );
        assert!(remap_joints(&[2], &captured).is_err());
    }

    #[test]
    fn test_joint_map_from_remapped_uses_full_paths() {
        let captured = ["Hips", "Hips/Spine"];
        let remapped = ["Hips/Spine", "Spine", "Hips"];
        assert_eq!(
            joint_map_from_remapped(&remapped, &captured),
            vec![1, UNMAPPED, 0]
        );
    }

    #[test]
    fn test_cleared_joint_map() {
        assert_eq!(cleared_joint_map(3), vec![0, 0, 0]);
        assert!(cleared_joint_map(0).is_empty());
    }
}
