// ==========================================
// Ready 文件转换管道 - 变体转换器
// ==========================================
// 流程: 过滤 → 重排 → 富化,每行输出 0 或 1 行
// 分派: 封闭枚举 + 显式 match
// ==========================================

pub mod cone_bom;
pub mod cone_mat;
pub mod project_mm;

pub use cone_bom::ConeBomConverter;
pub use cone_mat::ConeMatConverter;
pub use project_mm::{
    PartKey, ProjectMmConverter, MM_HEADER_LEN, MM_ORIGINAL_HEADER_LEN, MM_POSSIBLE_ADDITIONS,
};

use crate::domain::record::ReadyRecord;
use crate::domain::types::{StockDialect, VariantKind};
use crate::engine::error::{ConvertError, ConvertResult};
use crate::engine::part_grades::PartGradeCache;

/// 转换上下文 (单轮运行内不变)
#[derive(Debug, Clone, Copy)]
pub struct ConversionContext<'a> {
    pub test_id: Option<u32>,
    pub regenerate_description: bool,
    pub dialect: StockDialect,
    pub part_grades: &'a PartGradeCache,
}

/// 变体转换器
pub enum Variant<'a> {
    ConeBom(ConeBomConverter),
    ConeMat(ConeMatConverter),
    ProjectMm(ProjectMmConverter<'a>),
}

impl<'a> Variant<'a> {
    /// 按变体类型构造转换器
    pub fn for_kind(kind: VariantKind, ctx: ConversionContext<'a>) -> Self {
        match kind {
            VariantKind::ConeBom => Variant::ConeBom(ConeBomConverter::new(ctx.test_id, ctx.dialect)),
            VariantKind::ConeMat => Variant::ConeMat(ConeMatConverter::new(
                ctx.test_id,
                ctx.dialect,
                ctx.regenerate_description,
            )),
            VariantKind::ProjectMm => {
                Variant::ProjectMm(ProjectMmConverter::new(ctx.test_id, ctx.part_grades))
            }
        }
    }

    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::ConeBom(_) => VariantKind::ConeBom,
            Variant::ConeMat(_) => VariantKind::ConeMat,
            Variant::ProjectMm(_) => VariantKind::ProjectMm,
        }
    }

    pub fn has_header(&self) -> bool {
        self.kind().has_header()
    }

    /// 改写表头 (无表头的变体原样返回)
    pub fn convert_header(&self, header: ReadyRecord) -> ReadyRecord {
        match self {
            Variant::ProjectMm(converter) => converter.convert_header(header),
            Variant::ConeBom(_) | Variant::ConeMat(_) => header,
        }
    }

    /// 转换一行数据
    ///
    /// # 返回
    /// - Ok(Some(row)): 保留并已改写
    /// - Ok(None): 被过滤
    /// - Err: 数值字段非法,整文件转换失败
    pub fn convert_row(
        &self,
        record: ReadyRecord,
        row_number: usize,
    ) -> ConvertResult<Option<ReadyRecord>> {
        match self {
            Variant::ConeBom(converter) => converter.convert_row(record, row_number),
            Variant::ConeMat(converter) => converter.convert_row(record, row_number),
            Variant::ProjectMm(converter) => Ok(converter.convert_row(record)),
        }
    }
}

/// 解析数值字段,失败时带行列信息上抛
pub(crate) fn parse_number(
    record: &ReadyRecord,
    column: usize,
    row_number: usize,
) -> ConvertResult<f64> {
    let raw = record.get(column);
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConvertError::InvalidNumber {
            row: row_number,
            column,
            value: raw.to_string(),
        })
}
