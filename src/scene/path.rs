//! 场景路径
//!
//! 以 `/` 分隔的绝对 prim 路径，例如 `/RootNode/meshes/mesh_0/skel`。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{SceneError, SceneResult};

/// 绝对 prim 路径
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrimPath(String);

impl PrimPath {
    /// 解析路径字符串
    ///
    /// 只接受绝对路径，且不允许空的路径段。
    pub fn parse(path: &str) -> SceneResult<Self> {
        if path == "/" {
            return Ok(Self::absolute_root());
        }
        if !path.starts_with('/') || path.ends_with('/') {
            return Err(SceneError::InvalidPath(path.to_string()));
        }
        if path[1..].split('/').any(|segment| segment.is_empty()) {
            return Err(SceneError::InvalidPath(path.to_string()));
        }
        Ok(Self(path.to_string()))
    }

    /// 伪根路径 `/`
    pub fn absolute_root() -> Self {
        Self("/".to_string())
    }

    pub fn is_absolute_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 最后一段路径名（伪根返回空字符串）
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// 父路径（伪根没有父路径）
    pub fn parent(&self) -> Option<PrimPath> {
        if self.is_absolute_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::absolute_root()),
            Some(index) => Some(Self(self.0[..index].to_string())),
            None => None,
        }
    }

    /// 追加子节点名
    pub fn append_child(&self, name: &str) -> SceneResult<PrimPath> {
        if name.is_empty() || name.contains('/') {
            return Err(SceneError::InvalidPath(format!("{}/{}", self.0, name)));
        }
        if self.is_absolute_root() {
            Ok(Self(format!("/{}", name)))
        } else {
            Ok(Self(format!("{}/{}", self.0, name)))
        }
    }

    /// 检查 `prefix` 是否为当前路径或其祖先
    pub fn has_prefix(&self, prefix: &PrimPath) -> bool {
        if prefix.is_absolute_root() || self == prefix {
            return true;
        }
        self.0.starts_with(prefix.as_str()) && self.0[prefix.0.len()..].starts_with('/')
    }

    /// 将路径前缀 `from` 替换为 `to`，前缀不匹配时返回 None
    pub fn replace_prefix(&self, from: &PrimPath, to: &PrimPath) -> Option<PrimPath> {
        if !self.has_prefix(from) {
            return None;
        }
        let suffix = if from.is_absolute_root() {
            &self.0[1..]
        } else {
            self.0[from.0.len()..].trim_start_matches('/')
        };
        if suffix.is_empty() {
            return Some(to.clone());
        }
        if to.is_absolute_root() {
            Some(Self(format!("/{}", suffix)))
        } else {
            Some(Self(format!("{}/{}", to.0, suffix)))
        }
    }

    /// 自身及所有祖先（由近到远，不含伪根）
    pub fn ancestors(&self) -> impl Iterator<Item = PrimPath> {
        let mut current = if self.is_absolute_root() {
            None
        } else {
            Some(self.clone())
        };
        std::iter::from_fn(move || {
            let path = current.take()?;
            current = path.parent().filter(|parent| !parent.is_absolute_root());
            Some(path)
        })
    }
}

impl fmt::Display for PrimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PrimPath {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PrimPath> for String {
    fn from(path: PrimPath) -> Self {
        path.0
    }
}

impl std::str::FromStr for PrimPath {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
