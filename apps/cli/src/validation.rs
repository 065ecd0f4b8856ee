//! 输入验证模块

use anyhow::{Context, Result};

/// 解析逗号分隔的数值列表
///
/// 拒绝空列表和 NaN / 无穷大。
pub fn parse_values(input: &str, what: &str) -> Result<Vec<f64>> {
    let values: Vec<f64> = input
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("解析{}失败: '{}'", what, input))?;

    if values.is_empty() {
        anyhow::bail!("{}不能为空", what);
    }
    if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        anyhow::bail!("{}第 {} 个值无效: {}", what, i + 1, v);
    }
    Ok(values)
}

/// 解析逗号分隔的关节索引（从 0 开始）
pub fn parse_indices(input: &str) -> Result<Vec<usize>> {
    input
        .split(',')
        .map(|s| s.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("解析关节索引失败: '{}'", input))
}

/// 解析三维平移
pub fn parse_translation(input: &str) -> Result<[f64; 3]> {
    let values = parse_values(input, "平移")?;
    <[f64; 3]>::try_from(values.as_slice())
        .map_err(|_| anyhow::anyhow!("平移需要 3 个值，得到 {} 个", values.len()))
}
