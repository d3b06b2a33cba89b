// ==========================================
// 留置质量报表系统 - 报表配置对象
// ==========================================
// 职责: 会话内的全部可调参数（目标、产线映射、分组、原因过滤/分组、下钻阈值）
// 红线: 配置仅在显式的重配置点修改，修改前先校验，失败时保持原状
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 目标百分比取值范围
pub const TARGET_PCT_MIN: f64 = 0.0;
pub const TARGET_PCT_MAX: f64 = 5.0;
pub const DEFAULT_TARGET_PCT: f64 = 0.5;

/// 原因下钻默认阈值
pub const DEFAULT_QUANTITY_LIMIT: f64 = 100.0;
pub const DEFAULT_COUNT_LIMIT: usize = 10;

// ==========================================
// 命名分组 (Named Group)
// ==========================================
// 用于产线分组（产线 → 报表分组）与缺陷分组（原因 → 原因标签）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedGroup {
    pub name: String,
    pub members: Vec<String>,
}

impl NamedGroup {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn contains(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }
}

// ==========================================
// 原因下钻阈值 (Reason Targets)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonTargets {
    /// 选中的原始原因（None 表示未选择，不生成下钻）
    pub selected_reason: Option<String>,
    pub quantity_limit: f64,
    pub quantity_limit_enabled: bool,
    pub count_limit: usize,
    pub count_limit_enabled: bool,
}

impl Default for ReasonTargets {
    fn default() -> Self {
        Self {
            selected_reason: None,
            quantity_limit: DEFAULT_QUANTITY_LIMIT,
            quantity_limit_enabled: true,
            count_limit: DEFAULT_COUNT_LIMIT,
            count_limit_enabled: false,
        }
    }
}

impl ReasonTargets {
    /// 生效的面积阈值（未启用时为 None）
    pub fn active_quantity_limit(&self) -> Option<f64> {
        self.quantity_limit_enabled.then_some(self.quantity_limit)
    }

    /// 生效的次数阈值（未启用时为 None）
    pub fn active_count_limit(&self) -> Option<usize> {
        self.count_limit_enabled.then_some(self.count_limit)
    }
}

// ==========================================
// ReportConfig - 报表配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 全局目标百分比（0–5，默认 0.5）
    pub target_pct: f64,
    /// 炉号/产线代码 → 产线名
    pub line_mapping: BTreeMap<String, String>,
    /// 产线分组（按创建顺序匹配）
    pub line_groups: Vec<NamedGroup>,
    /// 缺陷原因分组（仅影响原因排行的标签）
    pub defect_groups: Vec<NamedGroup>,
    /// 从 KPI 汇总中排除的原始原因
    pub excluded_reasons: Vec<String>,
    pub reason_targets: ReasonTargets,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_pct: DEFAULT_TARGET_PCT,
            line_mapping: BTreeMap::new(),
            line_groups: Vec::new(),
            defect_groups: Vec::new(),
            excluded_reasons: Vec::new(),
            reason_targets: ReasonTargets::default(),
        }
    }
}

impl ReportConfig {
    /// 校验整份配置（从文件加载后调用）
    pub fn validate(&self) -> ConfigResult<()> {
        validate_target_pct(self.target_pct)?;
        for group in self.line_groups.iter().chain(self.defect_groups.iter()) {
            validate_group(&group.name, &group.members)?;
        }
        validate_limit(self.reason_targets.quantity_limit)?;
        Ok(())
    }

    // ==========================================
    // 重配置点
    // ==========================================

    pub fn set_target_pct(&mut self, target_pct: f64) -> ConfigResult<()> {
        validate_target_pct(target_pct)?;
        self.target_pct = target_pct;
        Ok(())
    }

    /// 为新出现的代码补充恒等映射（已有映射不变）
    ///
    /// # 返回
    /// 新增的代码数量
    pub fn seed_line_codes<I, S>(&mut self, codes: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for code in codes {
            let code = code.into();
            if !self.line_mapping.contains_key(&code) {
                self.line_mapping.insert(code.clone(), code);
                added += 1;
            }
        }
        added
    }

    /// 修改某个代码对应的产线名
    pub fn rename_line(&mut self, code: &str, line_name: &str) -> ConfigResult<()> {
        let line_name = line_name.trim();
        if code.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "line_mapping".to_string(),
                message: "代码不能为空".to_string(),
            });
        }
        if line_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "line_mapping".to_string(),
                message: format!("代码 {} 的产线名不能为空", code),
            });
        }
        self.line_mapping
            .insert(code.trim().to_string(), line_name.to_string());
        Ok(())
    }

    /// 当前所有产线名（去重、排序）
    pub fn line_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.line_mapping.values().cloned().collect();
        names.sort();
        names.dedup();
        names
    }

    /// 创建（或替换同名）产线分组
    ///
    /// 一条产线同一时刻只属于一个分组：被纳入新分组的产线会从其他分组移除，
    /// 移除后为空的分组一并删除。
    pub fn create_line_group(&mut self, name: &str, lines: Vec<String>) -> ConfigResult<()> {
        let name = name.trim();
        let lines = dedup_members(lines);
        validate_group(name, &lines)?;

        for group in self.line_groups.iter_mut().filter(|g| g.name != name) {
            group.members.retain(|m| !lines.contains(m));
        }
        self.line_groups.retain(|g| !g.members.is_empty());

        upsert_group(&mut self.line_groups, NamedGroup::new(name, lines));
        Ok(())
    }

    pub fn remove_line_group(&mut self, name: &str) -> ConfigResult<()> {
        remove_group(&mut self.line_groups, name, "line_groups")
    }

    /// 创建（或替换同名）缺陷分组
    pub fn create_defect_group(&mut self, name: &str, reasons: Vec<String>) -> ConfigResult<()> {
        let name = name.trim();
        let reasons = dedup_members(reasons);
        validate_group(name, &reasons)?;
        upsert_group(&mut self.defect_groups, NamedGroup::new(name, reasons));
        Ok(())
    }

    pub fn remove_defect_group(&mut self, name: &str) -> ConfigResult<()> {
        remove_group(&mut self.defect_groups, name, "defect_groups")
    }

    pub fn set_excluded_reasons(&mut self, reasons: Vec<String>) {
        self.excluded_reasons = dedup_members(reasons);
    }

    pub fn select_reason(&mut self, reason: Option<String>) {
        self.reason_targets.selected_reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
    }

    pub fn set_reason_targets(
        &mut self,
        quantity_limit: f64,
        quantity_limit_enabled: bool,
        count_limit: usize,
        count_limit_enabled: bool,
    ) -> ConfigResult<()> {
        validate_limit(quantity_limit)?;
        self.reason_targets.quantity_limit = quantity_limit;
        self.reason_targets.quantity_limit_enabled = quantity_limit_enabled;
        self.reason_targets.count_limit = count_limit;
        self.reason_targets.count_limit_enabled = count_limit_enabled;
        Ok(())
    }
}

// ==========================================
// 校验与辅助函数
// ==========================================

fn validate_target_pct(value: f64) -> ConfigResult<()> {
    if !value.is_finite() || !(TARGET_PCT_MIN..=TARGET_PCT_MAX).contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: "target_pct".to_string(),
            message: format!(
                "目标百分比 {} 超出范围 [{}, {}]",
                value, TARGET_PCT_MIN, TARGET_PCT_MAX
            ),
        });
    }
    Ok(())
}

fn validate_limit(value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "quantity_limit".to_string(),
            message: format!("阈值不能为负数: {}", value),
        });
    }
    Ok(())
}

fn validate_group(name: &str, members: &[String]) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "group.name".to_string(),
            message: "分组名不能为空".to_string(),
        });
    }
    if members.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "group.members".to_string(),
            message: format!("分组 {} 至少需要一个成员", name),
        });
    }
    Ok(())
}

fn dedup_members(members: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(members.len());
    for member in members {
        let member = member.trim().to_string();
        if !member.is_empty() && !seen.contains(&member) {
            seen.push(member);
        }
    }
    seen
}

fn upsert_group(groups: &mut Vec<NamedGroup>, group: NamedGroup) {
    match groups.iter_mut().find(|g| g.name == group.name) {
        Some(existing) => existing.members = group.members,
        None => groups.push(group),
    }
}

fn remove_group(groups: &mut Vec<NamedGroup>, name: &str, field: &str) -> ConfigResult<()> {
    let before = groups.len();
    groups.retain(|g| g.name != name);
    if groups.len() == before {
        return Err(ConfigError::NotFound {
            field: field.to_string(),
            key: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.target_pct, 0.5);
        assert!(config.reason_targets.quantity_limit_enabled);
        assert!(!config.reason_targets.count_limit_enabled);
        assert_eq!(config.reason_targets.active_quantity_limit(), Some(100.0));
        assert_eq!(config.reason_targets.active_count_limit(), None);
    }

    #[test]
    fn test_set_target_pct_out_of_range_keeps_state() {
        let mut config = ReportConfig::default();
        assert!(config.set_target_pct(5.1).is_err());
        assert!(config.set_target_pct(f64::NAN).is_err());
        assert_eq!(config.target_pct, 0.5);
        config.set_target_pct(1.2).unwrap();
        assert_eq!(config.target_pct, 1.2);
    }

    #[test]
    fn test_seed_line_codes_is_identity_and_keeps_edits() {
        let mut config = ReportConfig::default();
        config.rename_line("F1", "Linha 1").unwrap();
        let added = config.seed_line_codes(vec!["F1", "F2"]);
        assert_eq!(added, 1);
        assert_eq!(config.line_mapping["F1"], "Linha 1");
        assert_eq!(config.line_mapping["F2"], "F2");
    }

    #[test]
    fn test_line_belongs_to_one_group_at_a_time() {
        let mut config = ReportConfig::default();
        config
            .create_line_group("Fábrica 1", strings(&["L1", "L2"]))
            .unwrap();
        config.create_line_group("Fábrica 2", strings(&["L2"])).unwrap();

        assert_eq!(config.line_groups.len(), 2);
        assert_eq!(config.line_groups[0].members, strings(&["L1"]));
        assert_eq!(config.line_groups[1].members, strings(&["L2"]));

        // 成员被全部移走的分组自动删除
        config.create_line_group("Fábrica 3", strings(&["L1"])).unwrap();
        assert_eq!(config.line_groups.len(), 2);
        assert!(config.line_groups.iter().all(|g| g.name != "Fábrica 1"));
    }

    #[test]
    fn test_create_group_validation() {
        let mut config = ReportConfig::default();
        assert!(config.create_line_group("  ", strings(&["L1"])).is_err());
        assert!(config.create_defect_group("G", strings(&["", " "])).is_err());
        assert!(config.line_groups.is_empty());
        assert!(config.defect_groups.is_empty());
    }

    #[test]
    fn test_remove_unknown_group_is_not_found() {
        let mut config = ReportConfig::default();
        let err = config.remove_defect_group("nada").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_select_reason_blank_is_none() {
        let mut config = ReportConfig::default();
        config.select_reason(Some("  ".to_string()));
        assert_eq!(config.reason_targets.selected_reason, None);
        config.select_reason(Some("Trinca".to_string()));
        assert_eq!(
            config.reason_targets.selected_reason,
            Some("Trinca".to_string())
        );
    }

    #[test]
    fn test_line_names_sorted_unique() {
        let mut config = ReportConfig::default();
        config.rename_line("F1", "Linha B").unwrap();
        config.rename_line("F2", "Linha A").unwrap();
        config.rename_line("F3", "Linha B").unwrap();
        assert_eq!(config.line_names(), strings(&["Linha A", "Linha B"]));
    }
}
