//! # 在线状态汇总
//!
//! 把多个模块的测试报告归并为一个在线/离线信号

use serde::{Deserialize, Serialize};

use crate::probe::TestReport;

/// 汇总策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// 任一模块判定离线即离线
    #[default]
    AnyOffline,
    /// 在线票数严格多于离线票数才在线，平票视为离线
    Majority,
}

impl StatusPolicy {
    /// 汇总报告；没有任何报告给出判断时返回 `None`
    #[must_use]
    pub fn aggregate(self, reports: &[TestReport]) -> Option<bool> {
        let (online, offline) = reports
            .iter()
            .filter_map(TestReport::is_online)
            .fold((0_usize, 0_usize), |(on, off), is_online| {
                if is_online { (on + 1, off) } else { (on, off + 1) }
            });

        if online + offline == 0 {
            return None;
        }

        Some(match self {
            Self::AnyOffline => offline == 0,
            Self::Majority => online > offline,
        })
    }
}
