// ==========================================
// Ready 文件转换管道 - 文件名路由
// ==========================================
// 职责: 由文件名形态选择转换变体
// 规则: 三个模式互斥,无匹配即整轮终止
// ==========================================

use crate::domain::types::VariantKind;
use crate::engine::error::{ConvertError, ConvertResult};
use regex::Regex;
use std::sync::LazyLock;

static CONE_BOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ConeBOM_\d{7}[A-Z]\d{2}\.ready").unwrap());

static CONE_MAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ConeMAT_\d{7}[A-Z]\d{2}\.ready").unwrap());

static PROJECT_MM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{7}[A-Z]-MM\.ready").unwrap());

/// 输入文件扩展名
pub const READY_EXTENSION: &str = ".ready";

/// 输出文件后缀 (替换 `.ready`)
pub const CONVERTED_SUFFIX: &str = "_Conv.ready";

/// 按文件名选择变体
///
/// # 返回
/// - Ok(VariantKind): 第一个匹配的变体
/// - Err(UnroutableFilename): 无任何模式匹配
pub fn classify(file_name: &str) -> ConvertResult<VariantKind> {
    let routes: [(&Regex, VariantKind); 3] = [
        (&CONE_BOM, VariantKind::ConeBom),
        (&CONE_MAT, VariantKind::ConeMat),
        (&PROJECT_MM, VariantKind::ProjectMm),
    ];

    routes
        .into_iter()
        .find(|(pattern, _)| pattern.is_match(file_name))
        .map(|(_, kind)| kind)
        .ok_or_else(|| ConvertError::UnroutableFilename(file_name.to_string()))
}

/// 由输入文件名得到输出文件名
///
/// `ConeBOM_1234567A01.ready` → `ConeBOM_1234567A01_Conv.ready`
pub fn output_file_name(file_name: &str) -> String {
    match file_name.strip_suffix(READY_EXTENSION) {
        Some(stem) => format!("{}{}", stem, CONVERTED_SUFFIX),
        None => format!("{}{}", file_name, CONVERTED_SUFFIX),
    }
}
