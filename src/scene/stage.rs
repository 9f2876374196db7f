//! 组合场景（Stage）
//!
//! Stage 由一个图层栈（强到弱，索引 0 为编辑目标）和共享的图层注册表组成。
//! 读取时按意见栈组合；写入总是落在编辑目标图层上。
//!
//! ## 意见栈顺序
//!
//! 1. 图层栈中各图层在同一路径上的本地意见（强到弱）
//! 2. prim 自身及其祖先上的引用，按引用映射后的路径递归展开
//!
//! 引用图层中写入的关系目标会沿引用映射回 Stage 的命名空间。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::layer::{Layer, LayerRegistry, PrimSpec};
use super::path::PrimPath;
use super::value::{AttributeDefinition, AttributeSpec, Value};
use super::{SceneError, SceneResult};

/// 引用展开的最大深度
const MAX_REFERENCE_DEPTH: usize = 32;

/// 意见栈中的一个位置：(图层, 路径)
#[derive(Clone, Debug)]
pub struct PrimSite {
    pub layer: Arc<Layer>,
    pub path: PrimPath,
    /// 由内到外的命名空间映射 (site 根路径, 外层根路径)
    mappings: Vec<(PrimPath, PrimPath)>,
}

impl PrimSite {
    pub fn spec(&self) -> Option<&PrimSpec> {
        self.layer.prim(&self.path)
    }

    pub fn layer_identifier(&self) -> &str {
        &self.layer.identifier
    }

    /// 将该位置命名空间中的路径映射回 Stage 命名空间
    pub fn map_to_stage(&self, path: &PrimPath) -> PrimPath {
        self.mappings
            .iter()
            .fold(path.clone(), |current, (site_root, outer_root)| {
                current
                    .replace_prefix(site_root, outer_root)
                    .unwrap_or(current)
            })
    }

    fn is_same_site(&self, layer: &Layer, path: &PrimPath) -> bool {
        self.layer.identifier == layer.identifier && &self.path == path
    }
}

/// JSON 场景描述
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    /// 图层栈（强到弱）的图层标识符
    pub layer_stack: Vec<String>,
    /// 所有图层，包括只被引用的图层
    pub layers: Vec<Layer>,
}

/// 组合场景
#[derive(Clone, Debug)]
pub struct Stage {
    layers: Vec<Arc<Layer>>,
    registry: Arc<LayerRegistry>,
}

impl Stage {
    /// 从图层栈（强到弱）和额外的可引用图层创建 Stage
    pub fn new(layer_stack: Vec<Layer>, referenced: Vec<Layer>) -> SceneResult<Self> {
        if layer_stack.is_empty() {
            return Err(SceneError::EmptyLayerStack);
        }
        let mut registry = LayerRegistry::new();
        let layers: Vec<Arc<Layer>> = layer_stack.into_iter().map(Arc::new).collect();
        for layer in &layers {
            registry.insert(Arc::clone(layer));
        }
        for layer in referenced {
            registry.insert(Arc::new(layer));
        }
        Ok(Self {
            layers,
            registry: Arc::new(registry),
        })
    }

    /// 从场景描述创建
    pub fn from_description(description: SceneDescription) -> SceneResult<Self> {
        if description.layer_stack.is_empty() {
            return Err(SceneError::EmptyLayerStack);
        }
        let mut registry = LayerRegistry::new();
        for layer in description.layers {
            registry.insert(Arc::new(layer));
        }
        let layers = description
            .layer_stack
            .iter()
            .map(|id| {
                registry
                    .find(id)
                    .ok_or_else(|| SceneError::UnknownLayer(id.clone()))
            })
            .collect::<SceneResult<Vec<_>>>()?;
        Ok(Self {
            layers,
            registry: Arc::new(registry),
        })
    }

    pub fn from_json_str(content: &str) -> SceneResult<Self> {
        let description: SceneDescription =
            serde_json::from_str(content).map_err(|e| SceneError::Parse(e.to_string()))?;
        Self::from_description(description)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 以单个图层打开一个临时的只读视图，共享引用解析上下文
    pub fn open_layer(&self, layer: &Arc<Layer>) -> Stage {
        Stage {
            layers: vec![Arc::clone(layer)],
            registry: Arc::clone(&self.registry),
        }
    }

    /// 按标识符打开已注册的图层
    pub fn open_layer_by_id(&self, identifier: &str) -> SceneResult<Stage> {
        let layer = self
            .registry
            .find(identifier)
            .ok_or_else(|| SceneError::UnknownLayer(identifier.to_string()))?;
        Ok(self.open_layer(&layer))
    }

    pub fn layers(&self) -> &[Arc<Layer>] {
        &self.layers
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// 编辑目标图层
    pub fn edit_layer(&self) -> &Layer {
        &self.layers[0]
    }

    // ------------------------------------------------------------------------
    // 组合读取
    // ------------------------------------------------------------------------

    /// prim 的意见栈（强到弱）
    pub fn prim_stack(&self, path: &PrimPath) -> Vec<PrimSite> {
        let mut sites = Vec::new();
        self.collect_sites(&self.layers, path, &[], &mut sites, 0);
        sites
    }

    fn collect_sites(
        &self,
        layers: &[Arc<Layer>],
        path: &PrimPath,
        mappings: &[(PrimPath, PrimPath)],
        sites: &mut Vec<PrimSite>,
        depth: usize,
    ) {
        if depth > MAX_REFERENCE_DEPTH {
            tracing::warn!(target: "scene", "Reference depth limit reached while composing {}", path);
            return;
        }

        for layer in layers {
            if layer.prim(path).is_some() && !sites.iter().any(|s| s.is_same_site(layer, path)) {
                sites.push(PrimSite {
                    layer: Arc::clone(layer),
                    path: path.clone(),
                    mappings: mappings.to_vec(),
                });
            }
        }

        for ancestor in path.ancestors() {
            for layer in layers {
                let Some(spec) = layer.prim(&ancestor) else {
                    continue;
                };
                for reference in &spec.references {
                    let Some(ref_layer) = self.registry.find(&reference.asset_path) else {
                        tracing::warn!(
                            target: "scene",
                            "Unresolved reference {} on {}",
                            reference.asset_path,
                            ancestor
                        );
                        continue;
                    };
                    let Some(ref_root) = reference
                        .prim_path
                        .clone()
                        .or_else(|| ref_layer.default_prim_path())
                    else {
                        tracing::warn!(
                            target: "scene",
                            "Reference to {} on {} has no target prim",
                            reference.asset_path,
                            ancestor
                        );
                        continue;
                    };
                    let Some(target) = path.replace_prefix(&ancestor, &ref_root) else {
                        continue;
                    };
                    let mut chain = Vec::with_capacity(mappings.len() + 1);
                    chain.push((ref_root, ancestor.clone()));
                    chain.extend_from_slice(mappings);
                    self.collect_sites(&[ref_layer], &target, &chain, sites, depth + 1);
                }
            }
        }
    }

    pub fn prim_exists(&self, path: &PrimPath) -> bool {
        !self.prim_stack(path).is_empty()
    }

    /// 最强的非空类型名
    pub fn type_name(&self, path: &PrimPath) -> Option<String> {
        self.prim_stack(path)
            .iter()
            .find_map(|site| site.spec().and_then(|spec| spec.type_name.clone()))
            .filter(|name| !name.is_empty())
    }

    /// 是否应用了指定的 API schema（所有意见取并集）
    pub fn has_api_schema(&self, path: &PrimPath, schema: &str) -> bool {
        self.prim_stack(path).iter().any(|site| {
            site.spec()
                .map(|spec| spec.api_schemas.iter().any(|s| s == schema))
                .unwrap_or(false)
        })
    }

    /// 属性是否在任一意见中声明
    pub fn has_attribute(&self, path: &PrimPath, name: &str) -> bool {
        self.attribute_definition(path, name).is_some()
    }

    /// 最强的属性声明
    pub fn attribute_definition(&self, path: &PrimPath, name: &str) -> Option<AttributeSpec> {
        self.prim_stack(path)
            .iter()
            .find_map(|site| site.spec().and_then(|spec| spec.attributes.get(name).cloned()))
    }

    /// 组合后的属性值；被屏蔽或未写入时返回 None
    pub fn attribute_value(&self, path: &PrimPath, name: &str) -> Option<Value> {
        let value = self
            .prim_stack(path)
            .iter()
            .find_map(|site| site.spec().and_then(|spec| spec.attribute_value(name).cloned()))?;
        if value.is_blocked() {
            None
        } else {
            Some(value)
        }
    }

    /// 组合后的关系目标（已映射回 Stage 命名空间）
    pub fn relationship_targets(&self, path: &PrimPath, name: &str) -> Option<Vec<PrimPath>> {
        self.prim_stack(path).iter().find_map(|site| {
            let targets = site.spec()?.relationships.get(name)?;
            Some(targets.iter().map(|t| site.map_to_stage(t)).collect())
        })
    }

    /// 直接子节点（按名称排序）
    pub fn children(&self, path: &PrimPath) -> Vec<PrimPath> {
        // 图层中只写了子路径、没有父规格时也要能找到子节点
        let mut names: BTreeSet<String> = self
            .layers
            .iter()
            .flat_map(|layer| layer.child_names(path))
            .collect();
        names.extend(
            self.prim_stack(path)
                .iter()
                .flat_map(|site| site.layer.child_names(&site.path)),
        );
        names
            .iter()
            .filter_map(|name| path.append_child(name).ok())
            .collect()
    }

    /// 深度优先遍历（先序，包含 `root` 自身）
    pub fn traverse(&self, root: &PrimPath) -> Vec<PrimPath> {
        let mut result = Vec::new();
        if !root.is_absolute_root() && !self.prim_exists(root) {
            return result;
        }
        let mut stack = vec![root.clone()];
        while let Some(path) = stack.pop() {
            let mut children = self.children(&path);
            children.reverse();
            if !path.is_absolute_root() {
                result.push(path);
            }
            stack.extend(children);
        }
        result
    }

    // ------------------------------------------------------------------------
    // 编辑目标写入
    // ------------------------------------------------------------------------

    fn edit_layer_mut(&mut self) -> &mut Layer {
        Arc::make_mut(&mut self.layers[0])
    }

    /// 编辑目标图层中的 prim 规格副本
    pub fn edit_prim_spec(&self, path: &PrimPath) -> Option<PrimSpec> {
        self.edit_layer().prim(path).cloned()
    }

    /// 恢复编辑目标图层中的 prim 规格（None 表示删除）
    pub fn restore_edit_prim_spec(&mut self, path: &PrimPath, spec: Option<PrimSpec>) {
        let layer = self.edit_layer_mut();
        match spec {
            Some(spec) => {
                layer.prims.insert(path.clone(), spec);
            }
            None => {
                layer.remove_prim(path);
            }
        }
    }

    /// 在编辑目标图层写入属性值
    ///
    /// 属性不存在时，优先使用较弱意见中的声明，其次使用 `create`，
    /// 最后从值推断类型。
    pub fn set_attribute(
        &mut self,
        path: &PrimPath,
        name: &str,
        value: Value,
        create: Option<AttributeDefinition>,
    ) -> SceneResult<()> {
        if !self.prim_exists(path) {
            return Err(SceneError::PrimNotFound(path.clone()));
        }
        let authored = self
            .edit_layer()
            .prim(path)
            .is_some_and(|spec| spec.attributes.contains_key(name));
        if authored {
            if let Some(attr) = self
                .edit_layer_mut()
                .prim_mut(path)
                .and_then(|spec| spec.attributes.get_mut(name))
            {
                attr.default = Some(value);
            }
            return Ok(());
        }

        let declared = self.attribute_definition(path, name);
        let mut attr = match (declared, create, value.value_type()) {
            (Some(declared), _, _) => AttributeSpec {
                default: None,
                ..declared
            },
            (None, Some(definition), _) => definition.to_spec(),
            (None, None, Some(value_type)) => AttributeSpec::new(value_type),
            (None, None, None) => {
                return Err(SceneError::AttributeNotFound {
                    prim: path.clone(),
                    attribute: name.to_string(),
                })
            }
        };
        attr.default = Some(value);
        self.edit_layer_mut()
            .prim_or_over(path)
            .attributes
            .insert(name.to_string(), attr);
        Ok(())
    }

    /// 在编辑目标图层写入类型名
    pub fn set_type_name(&mut self, path: &PrimPath, type_name: &str) -> SceneResult<()> {
        if !self.prim_exists(path) {
            return Err(SceneError::PrimNotFound(path.clone()));
        }
        self.edit_layer_mut().prim_or_over(path).type_name = Some(type_name.to_string());
        Ok(())
    }

    /// 在编辑目标图层写入关系目标
    pub fn set_relationship_targets(
        &mut self,
        path: &PrimPath,
        name: &str,
        targets: Vec<PrimPath>,
    ) -> SceneResult<()> {
        if !self.prim_exists(path) {
            return Err(SceneError::PrimNotFound(path.clone()));
        }
        self.edit_layer_mut()
            .prim_or_over(path)
            .relationships
            .insert(name.to_string(), targets);
        Ok(())
    }
}
