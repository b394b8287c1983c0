// ==========================================
// Ready 文件转换管道 - 原材料编码规范化
// ==========================================
// 两套互斥语法:
// - 项目切割: 1234567A01-0XXXX[尾] → 1234567A01-9XXXX[尾]
// - 库存切割: [P-]等级-WWSS[尾] → [P-]等级-T{WW + SS/16}[尾]
// 均不匹配: 配置了测试编号时替换第 4 个字符,否则原样返回
// ==========================================

use crate::domain::types::StockDialect;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PROJECT_CUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{7}[A-Z]\d{2})-0(\d{4})(\w*)").unwrap());

static STOCK_CUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(P-)?(50/50W|(?:HPS)?(?:36|50|70|100)W?(?:[TF][123])?)-(\d{2})(\d{2})(\w*)")
        .unwrap()
});

/// 项目切割标记位 (插入在项目号之后)
pub const PROJECT_CUT_MARKER: char = '9';

/// 库存切割尺寸前缀
pub const STOCK_VALUE_MARKER: &str = "T";

/// 需整体改写的库存等级
const COMBINED_GRADE: &str = "50/50W";

/// `50/50W` 改写后的全限定冲击测试等级
const COMBINED_GRADE_REWRITE: &str = "50WT2";

/// 回退替换时被改写的字符位置
const FALLBACK_INDEX: usize = 3;

/// 原材料编码规范化
///
/// # 参数
/// - raw: 原始编码
/// - test_id: 本轮测试编号 (仅在两种语法均不匹配时使用)
/// - dialect: 库存编码方言
pub fn canonicalize(raw: &str, test_id: Option<u32>, dialect: StockDialect) -> String {
    if let Some(caps) = PROJECT_CUT.captures(raw) {
        return rewrite_project_cut(raw, &caps);
    }

    if let Some(caps) = STOCK_CUT.captures(raw) {
        return rewrite_stock_cut(raw, &caps, dialect);
    }

    match test_id {
        Some(id) => substitute_at(raw, FALLBACK_INDEX, &id.to_string()),
        None => raw.to_string(),
    }
}

fn rewrite_project_cut(raw: &str, caps: &Captures<'_>) -> String {
    let whole = caps.get(0).map_or(0, |m| m.end());
    format!(
        "{}-{}{}{}{}",
        &caps[1],
        PROJECT_CUT_MARKER,
        &caps[2],
        &caps[3],
        &raw[whole..]
    )
}

fn rewrite_stock_cut(raw: &str, caps: &Captures<'_>, dialect: StockDialect) -> String {
    let whole = caps.get(0).map_or(0, |m| m.end());
    let prefix = caps.get(1).map_or("", |m| m.as_str());
    let grade = match &caps[2] {
        COMBINED_GRADE => COMBINED_GRADE_REWRITE,
        other => other,
    };

    // 两组均为两位数字,解析不会失败
    let inches: u32 = caps[3].parse().unwrap_or(0);
    let sixteenths: u32 = caps[4].parse().unwrap_or(0);
    let value = f64::from(inches) + f64::from(sixteenths) / 16.0;

    let suffix = format!("{}{}", &caps[5], &raw[whole..]);
    match dialect {
        StockDialect::FixedDecimal => {
            format!("{}{}-{}{:.4}{}", prefix, grade, STOCK_VALUE_MARKER, value, suffix)
        }
        StockDialect::FractionTrim => {
            let formatted = format!("{:.3}", value);
            let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
            format!("{}{}-{}{}", prefix, grade, trimmed, suffix)
        }
    }
}

/// 替换指定字符位置,长度不足时原样返回
fn substitute_at(raw: &str, index: usize, replacement: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= index {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len() + replacement.len());
    out.extend(&chars[..index]);
    out.push_str(replacement);
    out.extend(&chars[index + 1..]);
    out
}
