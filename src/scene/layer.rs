//! 图层与 prim 规格
//!
//! 图层是一组按路径组织的 prim 意见（opinion），多个图层按强弱顺序叠加后
//! 形成最终的场景。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::path::PrimPath;
use super::value::{AttributeSpec, Value};
use super::{SceneError, SceneResult};

/// prim 说明符
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specifier {
    /// 定义 prim
    Def,
    /// 仅覆盖较弱图层中的 prim
    #[default]
    Over,
}

/// 引用另一个图层中的 prim
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// 被引用图层的标识符
    pub asset_path: String,
    /// 被引用的 prim，缺省时使用图层的默认 prim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prim_path: Option<PrimPath>,
}

impl Reference {
    pub fn new(asset_path: impl Into<String>, prim_path: Option<PrimPath>) -> Self {
        Self {
            asset_path: asset_path.into(),
            prim_path,
        }
    }
}

/// 单个图层中某个 prim 的意见
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimSpec {
    #[serde(default)]
    pub specifier: Specifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Vec<PrimPath>>,
}

impl PrimSpec {
    /// 创建 `def` prim 规格
    pub fn def(type_name: Option<&str>) -> Self {
        Self {
            specifier: Specifier::Def,
            type_name: type_name.map(str::to_string),
            ..Default::default()
        }
    }

    /// 创建 `over` prim 规格
    pub fn over() -> Self {
        Self::default()
    }

    pub fn with_api_schema(mut self, schema: &str) -> Self {
        if !self.api_schemas.iter().any(|s| s == schema) {
            self.api_schemas.push(schema.to_string());
        }
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_attribute(mut self, name: &str, spec: AttributeSpec) -> Self {
        self.attributes.insert(name.to_string(), spec);
        self
    }

    pub fn with_relationship(mut self, name: &str, targets: Vec<PrimPath>) -> Self {
        self.relationships.insert(name.to_string(), targets);
        self
    }

    /// 该意见中显式写入的属性值
    pub fn attribute_value(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).and_then(|attr| attr.default.as_ref())
    }
}

/// 图层
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prim: Option<String>,
    #[serde(default)]
    pub prims: BTreeMap<PrimPath, PrimSpec>,
}

impl Layer {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            default_prim: None,
            prims: BTreeMap::new(),
        }
    }

    pub fn with_default_prim(mut self, name: &str) -> Self {
        self.default_prim = Some(name.to_string());
        self
    }

    /// 添加或替换 prim 规格
    pub fn with_prim(mut self, path: PrimPath, spec: PrimSpec) -> Self {
        self.prims.insert(path, spec);
        self
    }

    pub fn prim(&self, path: &PrimPath) -> Option<&PrimSpec> {
        self.prims.get(path)
    }

    pub fn prim_mut(&mut self, path: &PrimPath) -> Option<&mut PrimSpec> {
        self.prims.get_mut(path)
    }

    /// 获取或创建 `over` 规格
    pub fn prim_or_over(&mut self, path: &PrimPath) -> &mut PrimSpec {
        self.prims.entry(path.clone()).or_insert_with(PrimSpec::over)
    }

    pub fn remove_prim(&mut self, path: &PrimPath) -> Option<PrimSpec> {
        self.prims.remove(path)
    }

    /// 该图层中 `parent` 的直接子节点名
    pub fn child_names(&self, parent: &PrimPath) -> Vec<String> {
        self.prims
            .keys()
            .filter(|path| path.parent().as_ref() == Some(parent))
            .map(|path| path.name().to_string())
            .collect()
    }

    /// 默认 prim 的路径
    pub fn default_prim_path(&self) -> Option<PrimPath> {
        let name = self.default_prim.as_deref()?;
        PrimPath::absolute_root().append_child(name).ok()
    }

    pub fn to_json_string(&self) -> SceneResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SceneError::Parse(e.to_string()))
    }
}

/// 图层注册表，用于解析引用
#[derive(Clone, Debug, Default)]
pub struct LayerRegistry {
    layers: HashMap<String, Arc<Layer>>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, layer: Arc<Layer>) {
        self.layers.insert(layer.identifier.clone(), layer);
    }

    pub fn find(&self, identifier: &str) -> Option<Arc<Layer>> {
        self.layers.get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.layers.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
