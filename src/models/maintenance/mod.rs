use serde::Serialize;
use ts_rs::TS;

// 手动触发的一次性维护任务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/maintenance.ts")]
pub enum MaintenanceTask {
    DedupeAttendances,
    DedupeBehaviors,
    RecomputeStats,
}

impl std::str::FromStr for MaintenanceTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dedupe-attendances" => Ok(MaintenanceTask::DedupeAttendances),
            "dedupe-behaviors" => Ok(MaintenanceTask::DedupeBehaviors),
            "recompute-stats" => Ok(MaintenanceTask::RecomputeStats),
            _ => Err(format!("Unknown maintenance task: {s}")),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/maintenance.ts")]
pub struct MaintenanceReport {
    pub task: MaintenanceTask,
    pub scanned: i32,
    pub affected: i32,
    pub details: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_names() {
        assert_eq!(
            "dedupe-attendances".parse::<MaintenanceTask>().unwrap(),
            MaintenanceTask::DedupeAttendances
        );
        assert_eq!(
            serde_json::to_string(&MaintenanceTask::RecomputeStats).unwrap(),
            r#""recompute-stats""#
        );
        assert!("drop-everything".parse::<MaintenanceTask>().is_err());
    }
}
