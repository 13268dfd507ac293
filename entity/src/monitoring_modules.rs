//! # 监控模块实体
//!
//! 已注册的外部监控模块，仅保存基础地址；模块位置在运行时解析，不落库

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monitoring_modules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 绝对地址，不带结尾斜杠
    pub url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
