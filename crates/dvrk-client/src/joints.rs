//! 关节向量校验与叠加
//!
//! `move_joint_some` / `dmove_joint_some` 以期望关节向量为基础，
//! 只修改指定索引处的值，未指定的关节保留期望值。

use crate::error::{ArmError, Result};

/// 叠加方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// 替换为绝对值
    Absolute,
    /// 加上增量
    Delta,
}

/// 校验完整关节向量
pub fn check_joint_vector(values: &[f64], joint_count: usize) -> Result<()> {
    if values.len() != joint_count {
        return Err(ArmError::invalid_argument(
            "position",
            format!("expected {} joints, got {}", joint_count, values.len()),
        ));
    }
    check_finite("position", values)
}

/// 在 `base` 的指定索引处叠加 `values`
///
/// 校验规则：
/// - `values` 与 `indices` 长度一致
/// - 每个索引 `< base.len()`
/// - 索引不重复
pub fn overlay(
    base: &[f64],
    values: &[f64],
    indices: &[usize],
    mode: Overlay,
) -> Result<Vec<f64>> {
    if values.len() != indices.len() {
        return Err(ArmError::invalid_argument(
            "indices",
            format!("{} values but {} indices", values.len(), indices.len()),
        ));
    }
    check_finite("values", values)?;

    for (i, &index) in indices.iter().enumerate() {
        if index >= base.len() {
            return Err(ArmError::invalid_argument(
                "indices",
                format!("index {} out of range for {} joints", index, base.len()),
            ));
        }
        if indices[..i].contains(&index) {
            return Err(ArmError::invalid_argument(
                "indices",
                format!("duplicate index {}", index),
            ));
        }
    }

    let mut result = base.to_vec();
    for (&index, &value) in indices.iter().zip(values) {
        match mode {
            Overlay::Absolute => result[index] = value,
            Overlay::Delta => result[index] += value,
        }
    }
    Ok(result)
}

fn check_finite(param: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ArmError::invalid_argument(
            param,
            format!("non-finite value at index {}", i),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_delta_overlay_single_joint() {
        let base = [0.0; 6];
        let result = overlay(&base, &[0.1], &[2], Overlay::Delta).unwrap();
        assert_eq!(result, vec![0.0, 0.0, 0.1, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_absolute_overlay_keeps_unspecified() {
        let base = [0.5, -0.5, 0.2, 0.0, 0.1, 0.3];
        let result = overlay(&base, &[1.0, 2.0], &[0, 5], Overlay::Absolute).unwrap();
        assert_eq!(result, vec![1.0, -0.5, 0.2, 0.0, 0.1, 2.0]);
    }

    #[test]
    fn test_overlay_validation() {
        let base = [0.0; 6];
        // 数量不一致
        assert!(overlay(&base, &[0.1, 0.2], &[1], Overlay::Delta).is_err());
        // 越界（索引等于关节数也越界）
        assert!(overlay(&base, &[0.1], &[6], Overlay::Delta).is_err());
        // 重复
        assert!(overlay(&base, &[0.1, 0.2], &[3, 3], Overlay::Absolute).is_err());
        // 非有限值
        assert!(overlay(&base, &[f64::INFINITY], &[0], Overlay::Absolute).is_err());
    }

    #[test]
    fn test_check_joint_vector() {
        assert!(check_joint_vector(&[0.0; 7], 7).is_ok());
        let err = check_joint_vector(&[0.0; 6], 7).unwrap_err();
        assert!(err.is_validation());
        assert!(check_joint_vector(&[0.0, f64::NAN], 2).is_err());
    }

    proptest! {
        #[test]
        fn prop_overlay_touches_only_given_indices(
            base in prop::collection::vec(-3.0f64..3.0, 1..10),
            seed in prop::collection::vec((any::<prop::sample::Index>(), -1.0f64..1.0), 0..10),
        ) {
            // 生成不重复的合法索引
            let mut indices = Vec::new();
            let mut values = Vec::new();
            for (index, value) in seed {
                let index = index.index(base.len());
                if !indices.contains(&index) {
                    indices.push(index);
                    values.push(value);
                }
            }

            let result = overlay(&base, &values, &indices, Overlay::Delta).unwrap();
            prop_assert_eq!(result.len(), base.len());
            for (j, (&before, &after)) in base.iter().zip(&result).enumerate() {
                match indices.iter().position(|&i| i == j) {
                    Some(k) => prop_assert!((after - (before + values[k])).abs() < 1e-12),
                    None => prop_assert_eq!(after, before),
                }
            }
        }
    }
}
