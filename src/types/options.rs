//! 读取选项与读取结果

use crate::types::data_value::DataValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 结果行格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowFormat {
    /// 每行一个 字段名->值 的映射
    #[default]
    Records,
    /// 首元素为字段名序列，其后每行为按位置排列的值数组
    Array,
}

/// 读取选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadOptions {
    /// 升序排序列（始终先于降序列输出，带 ASC 后缀）
    pub order_by: Vec<String>,
    /// 降序排序列
    pub order_by_desc: Vec<String>,
    /// 分组列
    pub group_by: Vec<String>,
    /// 结果行格式
    pub format: RowFormat,
    /// 是否使用 SELECT DISTINCT
    pub distinct: bool,
}

impl ReadOptions {
    /// 创建默认读取选项
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置升序排序列
    pub fn with_order_by(mut self, columns: Vec<String>) -> Self {
        self.order_by = columns;
        self
    }

    /// 设置降序排序列
    pub fn with_order_by_desc(mut self, columns: Vec<String>) -> Self {
        self.order_by_desc = columns;
        self
    }

    /// 设置分组列
    pub fn with_group_by(mut self, columns: Vec<String>) -> Self {
        self.group_by = columns;
        self
    }

    /// 设置结果行格式
    pub fn with_format(mut self, format: RowFormat) -> Self {
        self.format = format;
        self
    }

    /// 设置是否去重
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }
}

/// 读取结果 - 两种输出格式的带标签表示
#[derive(Debug, Clone, PartialEq)]
pub enum ReadResult {
    /// 记录格式：每行一个 字段名->值 的映射
    Records(Vec<HashMap<String, DataValue>>),
    /// 数组格式：字段名表头 + 按位置排列的值行
    Array {
        /// 字段名序列
        header: Vec<String>,
        /// 值行，与表头位置对齐
        rows: Vec<Vec<DataValue>>,
    },
}

impl ReadResult {
    /// 结果行数（不含数组格式的表头）
    pub fn row_count(&self) -> usize {
        match self {
            ReadResult::Records(records) => records.len(),
            ReadResult::Array { rows, .. } => rows.len(),
        }
    }

    /// 取出记录格式的结果，数组格式返回 None
    pub fn into_records(self) -> Option<Vec<HashMap<String, DataValue>>> {
        match self {
            ReadResult::Records(records) => Some(records),
            ReadResult::Array { .. } => None,
        }
    }
}
