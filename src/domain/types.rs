// ==========================================
// 留置质量报表系统 - 领域类型定义
// ==========================================
// 职责: 报表中通用的标签常量、月份桶、达标状态
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 固定标签
// ==========================================

/// 分组内的合成“总体”班组名（排序时强制排在最后）
pub const OVERALL_TEAM: &str = "Média Geral";

/// 炉号/产线代码未出现在产线映射中时的兜底产线名
pub const OTHER_LINE: &str = "Outros";

/// 无日期或日期无法解析时的月份桶
pub const NO_DATE_BUCKET: &str = "Sem Data";

// ==========================================
// 月份桶 (Month Bucket)
// ==========================================
// 序列化格式: "YYYY-MM" 或 "Sem Data"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum MonthBucket {
    Month { year: i32, month: u32 },
    NoDate,
}

impl MonthBucket {
    pub fn from_date(date: NaiveDate) -> Self {
        MonthBucket::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthBucket::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            MonthBucket::NoDate => write!(f, "{}", NO_DATE_BUCKET),
        }
    }
}

impl From<MonthBucket> for String {
    fn from(bucket: MonthBucket) -> Self {
        bucket.to_string()
    }
}

impl From<String> for MonthBucket {
    fn from(value: String) -> Self {
        let parsed = value.split_once('-').and_then(|(y, m)| {
            let year = y.parse::<i32>().ok()?;
            let month = m.parse::<u32>().ok()?;
            (1..=12).contains(&month).then_some(MonthBucket::Month { year, month })
        });
        parsed.unwrap_or(MonthBucket::NoDate)
    }
}

// ==========================================
// 达标状态 (Target Status)
// ==========================================
// 规则: 实际留置率 <= 目标百分比 即达标（边界算达标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetStatus {
    Within,  // 达标（绿）
    Outside, // 超标（红）
}

impl TargetStatus {
    /// 按截断后的百分比判定
    pub fn evaluate(realized_pct: f64, target_pct: f64) -> Self {
        if realized_pct <= target_pct {
            TargetStatus::Within
        } else {
            TargetStatus::Outside
        }
    }

    pub fn is_within(&self) -> bool {
        matches!(self, TargetStatus::Within)
    }

    /// 当前语言下的显示标签
    pub fn label(&self) -> String {
        match self {
            TargetStatus::Within => crate::i18n::t("status.within"),
            TargetStatus::Outside => crate::i18n::t("status.outside"),
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetStatus::Within => write!(f, "WITHIN"),
            TargetStatus::Outside => write!(f, "OUTSIDE"),
        }
    }
}

/// 班组排序键：真实班组按名称升序，总体行强制最后
pub fn team_sort_key(team: &str) -> (u8, &str) {
    if team == OVERALL_TEAM {
        (1, team)
    } else {
        (0, team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bucket_display() {
        let bucket = MonthBucket::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(bucket.to_string(), "2024-03");
        assert_eq!(MonthBucket::NoDate.to_string(), "Sem Data");
    }

    #[test]
    fn test_month_bucket_ordering_puts_no_date_last() {
        let mut buckets = vec![
            MonthBucket::NoDate,
            MonthBucket::Month { year: 2024, month: 2 },
            MonthBucket::Month { year: 2023, month: 12 },
        ];
        buckets.sort();
        assert_eq!(buckets[0].to_string(), "2023-12");
        assert_eq!(buckets[2], MonthBucket::NoDate);
    }

    #[test]
    fn test_month_bucket_from_string() {
        assert_eq!(
            MonthBucket::from("2024-07".to_string()),
            MonthBucket::Month { year: 2024, month: 7 }
        );
        assert_eq!(MonthBucket::from("Sem Data".to_string()), MonthBucket::NoDate);
        assert_eq!(MonthBucket::from("2024-13".to_string()), MonthBucket::NoDate);
    }

    #[test]
    fn test_target_status_boundary_is_within() {
        assert_eq!(TargetStatus::evaluate(0.5, 0.5), TargetStatus::Within);
        assert_eq!(TargetStatus::evaluate(0.51, 0.5), TargetStatus::Outside);
    }

    #[test]
    fn test_team_sort_key_overall_last() {
        let mut teams = vec![OVERALL_TEAM, "Z", "A"];
        teams.sort_by_key(|t| team_sort_key(*t));
        assert_eq!(teams, vec!["A", "Z", OVERALL_TEAM]);
    }
}
