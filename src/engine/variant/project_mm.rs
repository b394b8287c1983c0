// ==========================================
// Ready 文件转换管道 - Project MM 变体
// ==========================================
// 表头: 原始 17 列,补足 SPEC/GRADE/TEST/ASSYMETHOD/DOCNO (最多 22 列)
// 规则:
// - 仅保留 WEB / FLANGE / PART 行
// - 图号移至末列,文档列写入 job_mark
// - 以 job-mark 查询零件材质缓存,写入 17-19 列
// ==========================================

use crate::domain::record::ReadyRecord;
use crate::engine::part_grades::PartGradeCache;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// 原始表头宽度
pub const MM_ORIGINAL_HEADER_LEN: usize = 17;

/// 可追加的表头列
pub const MM_POSSIBLE_ADDITIONS: [&str; 5] = ["SPEC", "GRADE", "TEST", "ASSYMETHOD", "DOCNO"];

/// 扩展后的完整宽度
pub const MM_HEADER_LEN: usize = MM_ORIGINAL_HEADER_LEN + MM_POSSIBLE_ADDITIONS.len();

pub const COL_KIND: usize = 0;
pub const COL_PART_NAME: usize = 1;
pub const COL_DOCUMENT: usize = 12;
pub const COL_SPEC: usize = 17;
pub const COL_GRADE: usize = 18;
pub const COL_TEST: usize = 19;
pub const COL_DOCNO: usize = MM_HEADER_LEN - 1;

const ADMITTED_KINDS: &[&str] = &["WEB", "FLANGE", "PART"];

/// 零件名: 项目号(7 位数字 + 字母) + 分隔符 + 件号
static PART_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{7}[A-Z])[-_](.+)$").unwrap());

pub struct ProjectMmConverter<'a> {
    test_id: Option<u32>,
    part_grades: &'a PartGradeCache,
}

impl<'a> ProjectMmConverter<'a> {
    pub fn new(test_id: Option<u32>, part_grades: &'a PartGradeCache) -> Self {
        Self {
            test_id,
            part_grades,
        }
    }

    /// 补足缺失的追加列,已存在的不重复追加
    pub fn convert_header(&self, mut header: ReadyRecord) -> ReadyRecord {
        let present = header
            .len()
            .saturating_sub(MM_ORIGINAL_HEADER_LEN)
            .min(MM_POSSIBLE_ADDITIONS.len());

        for name in &MM_POSSIBLE_ADDITIONS[present..] {
            header.push(*name);
        }
        header
    }

    pub fn convert_row(&self, mut record: ReadyRecord) -> Option<ReadyRecord> {
        if !ADMITTED_KINDS.contains(&record.get(COL_KIND)) {
            debug!(kind = %record.get(COL_KIND), "非 WEB/FLANGE/PART 行,丢弃");
            return None;
        }

        record.pad_to(MM_HEADER_LEN);

        let drawing_no = record.get(COL_DOCUMENT).to_string();
        record.set(COL_DOCNO, drawing_no);

        let part = PartKey::parse(record.get(COL_PART_NAME));
        record.set(COL_DOCUMENT, part.document.clone());

        if let Some(id) = self.test_id {
            record.substitute_first_zero(COL_PART_NAME, id);
        }

        let [spec, grade, test] = self.part_grades.get_or_default(&part.lookup_key).to_fields();
        record.set(COL_SPEC, spec);
        record.set(COL_GRADE, grade);
        record.set(COL_TEST, test);

        Some(record)
    }
}

/// 零件名解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartKey {
    /// 写入文档列的 `job_mark`
    pub document: String,
    /// 缓存键 `JOB-MARK` (大写)
    pub lookup_key: String,
}

impl PartKey {
    pub fn parse(part_name: &str) -> Self {
        match PART_NAME.captures(part_name) {
            Some(caps) => {
                let (job, mark) = (&caps[1], &caps[2]);
                Self {
                    document: format!("{}_{}", job, mark),
                    lookup_key: format!("{}-{}", job, mark).to_uppercase(),
                }
            }
            None => Self {
                document: part_name.replacen('-', "_", 1),
                lookup_key: part_name.to_uppercase(),
            },
        }
    }
}
