// ==========================================
// Ready 文件转换管道 - 重复导出过滤
// ==========================================
// 职责: 检测已导出标识 (跨工作簿) 与同批次重复
// 约束: 批次内新标识仅在输出落盘后并入已导出集合
// ==========================================

use std::collections::HashSet;

/// 准入判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    New,
    AlreadyExported,
    DuplicateInBatch,
}

/// 重复过滤器
pub struct ConflictHandler<'a> {
    exported: &'a mut HashSet<String>,
    batch: Vec<String>,
    seen: HashSet<String>,
}

impl<'a> ConflictHandler<'a> {
    pub fn new(exported: &'a mut HashSet<String>) -> Self {
        Self {
            exported,
            batch: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// 是否已在之前的导出中出现
    pub fn is_exported(&self, id: &str) -> bool {
        self.exported.contains(id)
    }

    /// 判定并登记 (同批次内重复拒绝)
    pub fn admit(&mut self, id: &str) -> Admission {
        if self.exported.contains(id) {
            return Admission::AlreadyExported;
        }
        if !self.seen.insert(id.to_string()) {
            return Admission::DuplicateInBatch;
        }
        self.batch.push(id.to_string());
        Admission::New
    }

    /// 登记但允许同批次重复 (同一物料多行采购)
    pub fn admit_repeatable(&mut self, id: &str) -> Admission {
        if self.exported.contains(id) {
            return Admission::AlreadyExported;
        }
        if self.seen.insert(id.to_string()) {
            self.batch.push(id.to_string());
        }
        Admission::New
    }

    /// 输出落盘后并入已导出集合,返回新增数量
    pub fn commit(self) -> usize {
        let count = self.batch.len();
        self.exported.extend(self.batch);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_detects_both_kinds() {
        let mut exported: HashSet<String> = ["A".to_string()].into_iter().collect();
        let mut handler = ConflictHandler::new(&mut exported);

        assert_eq!(handler.admit("A"), Admission::AlreadyExported);
        assert_eq!(handler.admit("B"), Admission::New);
        assert_eq!(handler.admit("B"), Admission::DuplicateInBatch);
        assert_eq!(handler.admit_repeatable("C"), Admission::New);
        assert_eq!(handler.admit_repeatable("C"), Admission::New);

        assert_eq!(handler.commit(), 2);
        assert!(exported.contains("B"));
        assert!(exported.contains("C"));
    }

    #[test]
    fn test_uncommitted_batch_not_recorded() {
        let mut exported = HashSet::new();
        {
            let mut handler = ConflictHandler::new(&mut exported);
            handler.admit("X");
        }
        assert!(exported.is_empty());
    }
}
