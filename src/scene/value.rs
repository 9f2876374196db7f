//! 属性值与属性定义

use serde::{Deserialize, Serialize};

/// 属性值
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// 单个 token
    Token(String),
    /// token 数组（关节名列表）
    TokenArray(Vec<String>),
    /// 整数数组（关节索引缓冲区）
    IntArray(Vec<i32>),
    /// 显式的“无值”，屏蔽所有较弱的意见
    Blocked,
}

impl Value {
    pub fn as_token_array(&self) -> Option<&[String]> {
        match self {
            Value::TokenArray(tokens) => Some(tokens),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Value::IntArray(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Value::Blocked)
    }

    /// 推断值类型（Blocked 没有类型）
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Token(_) => Some(ValueType::Token),
            Value::TokenArray(_) => Some(ValueType::TokenArray),
            Value::IntArray(_) => Some(ValueType::IntArray),
            Value::Blocked => None,
        }
    }
}

/// 属性值类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Token,
    TokenArray,
    IntArray,
}

/// 属性可变性
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variability {
    /// 可随时间采样
    #[default]
    Varying,
    /// 不随时间变化
    Uniform,
}

/// 属性规格：类型、可变性和可选的默认值
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub value_type: ValueType,
    #[serde(default)]
    pub variability: Variability,
    #[serde(default)]
    pub custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl AttributeSpec {
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            variability: Variability::Varying,
            custom: false,
            default: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn uniform(mut self) -> Self {
        self.variability = Variability::Uniform;
        self
    }

    pub fn custom(mut self) -> Self {
        self.custom = true;
        self
    }
}

/// 属性不存在时用于创建的定义
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub value_type: ValueType,
    pub variability: Variability,
    pub custom: bool,
}

impl AttributeDefinition {
    pub fn to_spec(self) -> AttributeSpec {
        AttributeSpec {
            value_type: self.value_type,
            variability: self.variability,
            custom: self.custom,
            default: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        let joints = Value::TokenArray(vec!["Hips".to_string()]);
        assert_eq!(joints.as_token_array(), Some(&["Hips".to_string()][..]));
        assert_eq!(joints.as_int_array(), None);
        assert_eq!(joints.value_type(), Some(ValueType::TokenArray));
        assert_eq!(Value::Blocked.value_type(), None);
        assert!(Value::Blocked.is_blocked());
    }

    #[test]
    fn test_value_json_shape() {
        let value = Value::IntArray(vec![0, 1, 1]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"type":"int_array","value":[0,1,1]}"#);
        let blocked: Value = serde_json::from_str(r#"{"type":"blocked"}"#).unwrap();
        assert_eq!(blocked, Value::Blocked);
    }
}
