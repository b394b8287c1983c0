// ==========================================
// Ready 文件转换管道 - 英寸分数格式化
// ==========================================
// 规则:
// - 整数部分 + 分母不超过 32 的最近分数
// - 整数为 0 时省略整数,分数为 0 时省略分数
// - 恰为 0 时输出 "0"
// ==========================================

/// 分数分母上限
pub const MAX_DENOMINATOR: u32 = 32;

/// 默认描述前缀 (钢板)
pub const PLATE_PREFIX: &str = "PL";

/// 英寸值格式化为 `整数 分子/分母`
///
/// # 示例
/// - 1.5 → "1 1/2"
/// - 0.25 → "1/4"
/// - 2.0 → "2"
/// - 0.0 → "0"
pub fn format_inches(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let negative = value < 0.0;
    let magnitude = value.abs();

    let mut whole = magnitude.trunc() as u64;
    let (mut numerator, denominator) = nearest_fraction(magnitude - whole as f64, MAX_DENOMINATOR);

    // 余数逼近 1 时进位
    if numerator == denominator {
        whole += 1;
        numerator = 0;
    }

    let mut parts = Vec::with_capacity(2);
    if whole > 0 {
        parts.push(whole.to_string());
    }
    if numerator > 0 {
        parts.push(format!("{}/{}", numerator, denominator));
    }

    if parts.is_empty() {
        return "0".to_string();
    }

    let rendered = parts.join(" ");
    if negative {
        format!("-{}", rendered)
    } else {
        rendered
    }
}

/// 求 [0, 1] 区间内分母不超过 max_denominator 的最近分数 (已约分)
///
/// 距离相同时取分母较小者
pub fn nearest_fraction(fraction: f64, max_denominator: u32) -> (u32, u32) {
    let mut best = (0u32, 1u32);
    let mut best_error = fraction.abs();

    for denominator in 1..=max_denominator.max(1) {
        let numerator = (fraction * f64::from(denominator)).round().max(0.0);
        let error = (fraction - numerator / f64::from(denominator)).abs();
        if error < best_error {
            best = (numerator as u32, denominator);
            best_error = error;
        }
    }

    let divisor = gcd(best.0, best.1);
    (best.0 / divisor, best.1 / divisor)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a.max(1)
    } else {
        gcd(b, a % b)
    }
}

/// 按小数位舍入,以数值的精确十进制展开为准
///
/// 不先乘以 10^n: 乘法本身可能把略低于进位点的值推到进位点上
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// 数值输出为最短可回读形式,整数值保留 `.0` (如 `1.0`)
pub fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

/// 生成钢板描述 `{前缀} {厚} x {宽} x {长} {等级}{冲击}`
pub fn describe_plate(
    prefix: &str,
    thickness: f64,
    width: f64,
    length: f64,
    grade: Option<&str>,
    test: Option<&str>,
) -> String {
    let prefix = if prefix.trim().is_empty() {
        PLATE_PREFIX
    } else {
        prefix.trim()
    };

    format!(
        "{} {} x {} x {} {}{}",
        prefix,
        format_inches(thickness),
        format_inches(width),
        format_inches(length),
        grade.unwrap_or(""),
        test.unwrap_or("")
    )
    .trim_end()
    .to_string()
}
