//! 単位の繰り上げ変換と丸め
//!
//! 同一次元内の変換のみ扱う（oz→lb, tsp→tbsp, g→kg, ml→l）。
//! 質量と体積の相互変換は行わない。

use crate::units::Unit;

/// 繰り上げ変換表: (変換元, 閾値, 変換先)
///
/// 閾値以上のときだけ変換先へ割り算で繰り上げる。逆方向の変換はない。
const UPGRADE_TABLE: &[(Unit, f64, Unit)] = &[
    (Unit::Oz, 16.0, Unit::Lb),
    (Unit::Tsp, 3.0, Unit::Tbsp),
    (Unit::G, 1000.0, Unit::Kg),
    (Unit::Ml, 1000.0, Unit::L),
];

/// 閾値に達した分量を上位単位へ1段だけ繰り上げる
///
/// ```
/// use meal_cart_common::convert::upgrade;
/// use meal_cart_common::Unit;
///
/// assert_eq!(upgrade(16.0, Some(Unit::Oz)), (1.0, Some(Unit::Lb)));
/// assert_eq!(upgrade(15.9, Some(Unit::Oz)), (15.9, Some(Unit::Oz)));
/// ```
pub fn upgrade(amount: f64, unit: Option<Unit>) -> (f64, Option<Unit>) {
    let Some(from) = unit else {
        return (amount, None);
    };

    for (source, threshold, target) in UPGRADE_TABLE {
        if *source == from && amount >= *threshold {
            return (amount / threshold, Some(target.clone()));
        }
    }
    (amount, Some(from))
}

/// 単位ごとの丸め刻み
fn friendly_step(unit: Option<&Unit>) -> f64 {
    match unit {
        Some(Unit::Cup) => 0.25,
        Some(Unit::Tbsp | Unit::Tsp | Unit::Oz) => 1.0,
        Some(Unit::Lb) => 0.5,
        Some(Unit::G | Unit::Ml) => 10.0,
        Some(Unit::Kg | Unit::L) => 0.1,
        _ => 1.0,
    }
}

/// 買い物で扱いやすい刻みに丸める
///
/// 単位は変えない。小さな値が 0 に丸められることもある。
pub fn round_friendly(amount: f64, unit: Option<&Unit>) -> f64 {
    // 0.1 で割ると 0.35 が 3.4999.. になるので逆数を掛ける
    let inv = 1.0 / friendly_step(unit);
    let snapped = (amount * inv).round() / inv;
    // 0.1 刻みの浮動小数点誤差を除去
    (snapped * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_oz_to_lb() {
        assert_eq!(upgrade(16.0, Some(Unit::Oz)), (1.0, Some(Unit::Lb)));
        assert_eq!(upgrade(24.0, Some(Unit::Oz)), (1.5, Some(Unit::Lb)));
        assert_eq!(upgrade(15.9, Some(Unit::Oz)), (15.9, Some(Unit::Oz)));
    }

    #[test]
    fn test_upgrade_tsp_g_ml() {
        assert_eq!(upgrade(3.0, Some(Unit::Tsp)), (1.0, Some(Unit::Tbsp)));
        assert_eq!(upgrade(2.0, Some(Unit::Tsp)), (2.0, Some(Unit::Tsp)));
        assert_eq!(upgrade(1500.0, Some(Unit::G)), (1.5, Some(Unit::Kg)));
        assert_eq!(upgrade(1250.0, Some(Unit::Ml)), (1.25, Some(Unit::L)));
    }

    #[test]
    fn test_upgrade_single_step_only() {
        // 48 tsp → 16 tbsp（tbsp からの繰り上げはない）
        assert_eq!(upgrade(48.0, Some(Unit::Tsp)), (16.0, Some(Unit::Tbsp)));
    }

    #[test]
    fn test_upgrade_untouched_units() {
        assert_eq!(upgrade(5.0, None), (5.0, None));
        assert_eq!(upgrade(40.0, Some(Unit::Cup)), (40.0, Some(Unit::Cup)));
        let pinch = Some(Unit::Other("pinch".into()));
        assert_eq!(upgrade(3.0, pinch.clone()), (3.0, pinch));
    }

    #[test]
    fn test_round_friendly_snap_points() {
        assert_eq!(round_friendly(0.33, Some(&Unit::Cup)), 0.25);
        assert_eq!(round_friendly(0.4, Some(&Unit::Cup)), 0.5);
        assert_eq!(round_friendly(7.0, Some(&Unit::Tsp)), 7.0);
        assert_eq!(round_friendly(1.3, Some(&Unit::Lb)), 1.5);
        assert_eq!(round_friendly(5.4, Some(&Unit::Oz)), 5.0);
        assert_eq!(round_friendly(1250.0, Some(&Unit::Ml)), 1250.0);
        assert_eq!(round_friendly(454.0, Some(&Unit::G)), 450.0);
        assert_eq!(round_friendly(1.26, Some(&Unit::L)), 1.3);
        assert_eq!(round_friendly(2.04, Some(&Unit::Kg)), 2.0);
        assert_eq!(round_friendly(2.6, None), 3.0);
        assert_eq!(round_friendly(2.4, Some(&Unit::Other("pinch".into()))), 2.0);
    }

    #[test]
    fn test_round_friendly_tenths_round_half_up() {
        assert_eq!(round_friendly(0.35, Some(&Unit::Kg)), 0.4);
        assert_eq!(round_friendly(0.45, Some(&Unit::L)), 0.5);
        assert_eq!(round_friendly(0.125, Some(&Unit::Cup)), 0.25);
        assert_eq!(round_friendly(455.0, Some(&Unit::G)), 460.0);
    }

    #[test]
    fn test_round_friendly_can_reach_zero() {
        assert_eq!(round_friendly(0.1, Some(&Unit::Cup)), 0.0);
        assert_eq!(round_friendly(0.4, Some(&Unit::Tsp)), 0.0);
    }
}
