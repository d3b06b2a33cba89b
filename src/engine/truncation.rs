// ==========================================
// 留置质量报表系统 - 百分比截断
// ==========================================
// 规则: floor(v × 100) / 100，不做四舍五入
// 边界: 非有限值 → 0；负值 → 0；产量为 0 → 0
// 红线: 所有展示或比较用的百分比必须经过此处，避免边界班组被“进位”误判
// ==========================================

/// 截断到两位小数
pub fn truncate_two_decimals(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        return 0.0;
    }
    (value * 100.0).floor() / 100.0
}

/// 实际留置率（%）= truncate(留置 / 产量 × 100)
pub fn realized_pct(retained: f64, produced: f64) -> f64 {
    if produced > 0.0 {
        truncate_two_decimals(retained / produced * 100.0)
    } else {
        0.0
    }
}

/// 目标留置量 = 产量 × 目标% / 100
pub fn target_quantity(produced: f64, target_pct: f64) -> f64 {
    produced * (target_pct / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_floors_instead_of_rounding() {
        assert_eq!(truncate_two_decimals(0.569), 0.56);
        assert_eq!(truncate_two_decimals(1.999), 1.99);
        assert_eq!(truncate_two_decimals(0.5), 0.5);
    }

    #[test]
    fn test_truncate_guards() {
        assert_eq!(truncate_two_decimals(-1.0), 0.0);
        assert_eq!(truncate_two_decimals(f64::NAN), 0.0);
        assert_eq!(truncate_two_decimals(f64::INFINITY), 0.0);
        assert_eq!(truncate_two_decimals(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_realized_pct_zero_production() {
        assert_eq!(realized_pct(25.0, 0.0), 0.0);
        assert_eq!(realized_pct(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_realized_pct_boundary_values() {
        assert_eq!(realized_pct(10.0, 1000.0), 1.0);
        assert_eq!(realized_pct(5.0, 2000.0), 0.25);
        assert_eq!(realized_pct(15.0, 3000.0), 0.5);
    }

    #[test]
    fn test_target_quantity() {
        assert_eq!(target_quantity(1000.0, 0.5), 5.0);
        assert_eq!(target_quantity(0.0, 0.5), 0.0);
    }
}
