// ==========================================
// Ready 文件转换管道 - 材质编码拆分
// ==========================================
// 语法: SPEC-GRADE[TEST]
// - SPEC:  [AM] + 3 位数字
// - GRADE: 3xx / TYPE4 / [HPS]50W 等
// - TEST:  [TF][123] (可选)
// 全函数: 不匹配时返回全空三元组,从不报错
// ==========================================

use crate::domain::types::GradeTriple;
use regex::Regex;
use std::sync::LazyLock;

static GRADE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([AM]\d{3})-(3\d{2}|TYPE4|(?:HPS)?[5710]{1,2}0W?)((?:[TF][123])?)").unwrap()
});

/// 拆分复合材质编码
pub fn parse_grade(code: &str) -> GradeTriple {
    match GRADE_CODE.captures(code.trim()) {
        Some(caps) => GradeTriple::new(
            caps.get(1).map(|m| m.as_str()),
            caps.get(2).map(|m| m.as_str()),
            caps.get(3).map(|m| m.as_str()),
        ),
        None => GradeTriple::empty(),
    }
}
