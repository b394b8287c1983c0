// ==========================================
// Ready 文件转换管道 - 采购短文本解析
// ==========================================
// 格式: PL {厚} x {宽} x {长} [A709-|M270-]{等级}
// 厚度可为带分数: "1 1/2" / "3/4" / "2"
// ==========================================

use regex::Regex;
use std::sync::LazyLock;

/// 钢板短文本前缀
pub const PLATE_TEXT_PREFIX: &str = "PL ";

/// 未写规范时补的默认规范
const DEFAULT_SPEC_PREFIX: &str = "A709-";

static PLATE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PL ([\d/\s]+) x (\d+) x (\d+) ((?:A709|M270)-)?(50W?(?:[TF][123])?)").unwrap()
});

/// 钢板尺寸与材质
#[derive(Debug, Clone, PartialEq)]
pub struct PlateDims {
    pub thickness: f64,
    pub width: f64,
    pub length: f64,
    /// 完整材质编码,如 `A709-50WT2`
    pub grade_code: String,
}

/// 解析采购短文本,缺少尺寸或材质时返回 None
pub fn parse_plate_text(text: &str) -> Option<PlateDims> {
    let caps = PLATE_TEXT.captures(text.trim())?;

    let thickness = parse_mixed_fraction(&caps[1])?;
    let width = caps[2].parse().ok()?;
    let length = caps[3].parse().ok()?;
    let spec = caps.get(4).map_or(DEFAULT_SPEC_PREFIX, |m| m.as_str());

    Some(PlateDims {
        thickness,
        width,
        length,
        grade_code: format!("{}{}", spec, &caps[5]),
    })
}

/// 带分数求值: "1 1/2" → 1.5
fn parse_mixed_fraction(raw: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut parts = 0;

    for token in raw.split_whitespace() {
        let value = match token.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.parse().ok()?;
                let den: f64 = den.parse().ok()?;
                if den == 0.0 {
                    return None;
                }
                num / den
            }
            None => token.parse().ok()?,
        };
        total += value;
        parts += 1;
    }

    (parts > 0).then_some(total)
}
