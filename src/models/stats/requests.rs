use serde::Deserialize;
use ts_rs::TS;

/// 高风险名单排序方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub enum RiskSort {
    /// 风险等级降序，再按缺勤次数降序
    #[default]
    RiskLevel,
    /// 最近缺勤在前，无缺勤日期的排最后
    RecentAbsence,
    /// 姓、名字母序
    Alphabetical,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct HighRiskQuery {
    #[serde(default)]
    pub sort: RiskSort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_names() {
        let q: HighRiskQuery = serde_json::from_str(r#"{"sort":"recent-absence"}"#).unwrap();
        assert_eq!(q.sort, RiskSort::RecentAbsence);
        let q: HighRiskQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.sort, RiskSort::RiskLevel);
        assert!(serde_json::from_str::<HighRiskQuery>(r#"{"sort":"random"}"#).is_err());
    }
}
