//! # 模块协议数据类型

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 被测试的目标服务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetService {
    pub id: u64,
    pub url: String,
}

impl TargetService {
    #[must_use]
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self { id, url: url.into() }
    }
}

/// 单个模块对目标服务的测试报告
///
/// 字段由模块自行定义，序列化时原样输出。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestReport(Map<String, Value>);

impl TestReport {
    /// 在线标记，依次读取 `online` 与 `isOnline`
    ///
    /// 两者都不是布尔值时返回 `None`，表示该模块没有给出判断。
    #[must_use]
    pub fn is_online(&self) -> Option<bool> {
        ["online", "isOnline"]
            .iter()
            .find_map(|field| self.0.get(*field).and_then(Value::as_bool))
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for TestReport {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
