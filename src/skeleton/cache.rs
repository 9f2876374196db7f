//! 替换骨骼缓存
//!
//! 按 (SkelRoot, 替换 prim) 缓存绑定解析结果。缓存不会自动失效，
//! 由持有者在场景变化后调用 `remove`/`clear` 或重新创建。

use std::collections::HashMap;
use std::rc::Rc;

use super::binding::SkeletonReplacementBinding;
use super::error::BindingResult;
use crate::scene::{PrimPath, Stage};

type CacheKey = (PrimPath, PrimPath);

/// 替换骨骼绑定缓存
#[derive(Debug, Default)]
pub struct CachedReplacementSkeletons {
    bindings: HashMap<CacheKey, Rc<SkeletonReplacementBinding>>,
}

impl CachedReplacementSkeletons {
    pub fn new() -> Self {
        Self::default()
    }

    /// 精确匹配 (skel_root, replacement_root)
    pub fn get(
        &self,
        skel_root: &PrimPath,
        replacement_root: &PrimPath,
    ) -> Option<Rc<SkeletonReplacementBinding>> {
        self.bindings
            .get(&(skel_root.clone(), replacement_root.clone()))
            .cloned()
    }

    /// 获取或解析绑定，并返回解析错误
    ///
    /// 只缓存成功的结果，失败的组合下次会重新解析。
    pub fn try_add(
        &mut self,
        stage: &Stage,
        skel_root: &PrimPath,
        replacement_root: &PrimPath,
    ) -> BindingResult<Rc<SkeletonReplacementBinding>> {
        if let Some(binding) = self.get(skel_root, replacement_root) {
            return Ok(binding);
        }
        let binding = Rc::new(SkeletonReplacementBinding::new(
            stage,
            skel_root,
            replacement_root,
        )?);
        self.bindings.insert(
            (skel_root.clone(), replacement_root.clone()),
            Rc::clone(&binding),
        );
        Ok(binding)
    }

    /// 获取或解析绑定；解析失败时返回 None
    pub fn add(
        &mut self,
        stage: &Stage,
        skel_root: &PrimPath,
        replacement_root: &PrimPath,
    ) -> Option<Rc<SkeletonReplacementBinding>> {
        match self.try_add(stage, skel_root, replacement_root) {
            Ok(binding) => Some(binding),
            Err(err) => {
                tracing::debug!(target: "skeleton", "Skeleton replacement not cached: {}", err);
                None
            }
        }
    }

    pub fn remove(
        &mut self,
        skel_root: &PrimPath,
        replacement_root: &PrimPath,
    ) -> Option<Rc<SkeletonReplacementBinding>> {
        self.bindings
            .remove(&(skel_root.clone(), replacement_root.clone()))
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::skel::{SKELETON_TYPE, SKEL_BINDING_API, SKEL_ROOT_TYPE};
    use crate::scene::{Layer, PrimSpec};
    use crate::skeleton::binding::test_scene::*;

    #[test]
    fn test_add_returns_identical_entry() {
        let stage = replacement_stage();
        let mut cache = CachedReplacementSkeletons::new();
        let (root, body) = (p(SKEL_ROOT), p(BODY));

        assert!(cache.get(&root, &body).is_none());
        let first = cache.add(&stage, &root, &body).unwrap();
        let second = cache.add(&stage, &root, &body).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert!(Rc::ptr_eq(&first, &cache.get(&root, &body).unwrap()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cached_entry_survives_scene_changes() {
        let mut stage = replacement_stage();
        let mut cache = CachedReplacementSkeletons::new();
        let (root, body) = (p(SKEL_ROOT), p(BODY));
        let first = cache.add(&stage, &root, &body).unwrap();

        // SkelRoot 失效后缓存仍返回旧结果，直到持有者显式移除
        stage.set_type_name(&root, "Xform").unwrap();
        let again = cache.add(&stage, &root, &body).unwrap();
        assert!(Rc::ptr_eq(&first, &again));

        assert!(cache.remove(&root, &body).is_some());
        assert!(cache.add(&stage, &root, &body).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failures_are_not_cached() {
        let root = p("/Root");
        let mesh = p("/Root/Mesh");
        let layer = Layer::new("capture.usda")
            .with_prim(root.clone(), PrimSpec::def(Some(SKEL_ROOT_TYPE)))
            .with_prim(
                mesh.clone(),
                PrimSpec::def(Some("Mesh")).with_api_schema(SKEL_BINDING_API),
            );
        let mut stage = Stage::new(vec![Layer::new("mod.usda"), layer], vec![]).unwrap();
        let mut cache = CachedReplacementSkeletons::new();

        assert!(cache.add(&stage, &root, &mesh).is_none());
        assert!(cache.is_empty());

        // 补上捕获骨骼后重新解析成功
        let edited = stage
            .edit_layer()
            .clone()
            .with_prim(p("/Root/skel"), PrimSpec::def(Some(SKELETON_TYPE)));
        stage = Stage::new(vec![edited, stage.layers()[1].as_ref().clone()], vec![]).unwrap();
        assert!(cache.add(&stage, &root, &mesh).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_try_add_surfaces_error() {
        let stage = replacement_stage();
        let mut cache = CachedReplacementSkeletons::new();
        let err = cache
            .try_add(&stage, &p("/RootNode"), &p(BODY))
            .unwrap_err();
        assert_eq!(err.to_string(), "Skeleton root is not valid: /RootNode");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let stage = replacement_stage();
        let mut cache = CachedReplacementSkeletons::new();
        cache.add(&stage, &p(SKEL_ROOT), &p(BODY)).unwrap();
        cache.add(&stage, &p(SKEL_ROOT), &p(CAPTURED_MESH)).unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
