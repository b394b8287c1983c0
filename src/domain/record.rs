// ==========================================
// Ready 文件转换管道 - Ready 记录
// ==========================================
// 格式: 制表符分隔,换行分行,无引号/转义
// 约束: 写入字段前必须先补齐宽度
// ==========================================

use std::fmt;

/// 一行 Ready 记录 (空串即空值)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadyRecord {
    fields: Vec<String>,
}

impl ReadyRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// 解析一行文本,去掉行尾换行符后按制表符切分
    pub fn parse_line(line: &str) -> Self {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        Self {
            fields: trimmed.split('\t').map(str::to_string).collect(),
        }
    }

    /// 序列化为一行文本 (含换行符)
    pub fn to_line(&self) -> String {
        let mut line = self.fields.join("\t");
        line.push('\n');
        line
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 读取字段,越界视为空
    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// 写入字段
    ///
    /// # Panics
    /// - index 超出当前宽度 (调用方必须先 `pad_to`)
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        assert!(
            index < self.fields.len(),
            "字段写入越界: index={} width={}",
            index,
            self.fields.len()
        );
        self.fields[index] = value.into();
    }

    /// 补齐到最小宽度,不足部分填空值
    pub fn pad_to(&mut self, width: usize) {
        if self.fields.len() < width {
            self.fields.resize(width, String::new());
        }
    }

    /// 截断到指定宽度
    pub fn truncate(&mut self, width: usize) {
        self.fields.truncate(width);
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.fields.push(value.into());
    }

    /// 字段内首个字符 `'0'` 替换为测试编号 (仅替换一次)
    pub fn substitute_first_zero(&mut self, index: usize, test_id: u32) {
        if index >= self.fields.len() {
            return;
        }
        let replaced = self.fields[index].replacen('0', &test_id.to_string(), 1);
        self.fields[index] = replaced;
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl From<Vec<String>> for ReadyRecord {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl From<Vec<&str>> for ReadyRecord {
    fn from(fields: Vec<&str>) -> Self {
        Self::new(fields.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for ReadyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join("\t"))
    }
}
