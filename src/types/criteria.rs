//! 查询条件与字段值集合
//!
//! `Criterion` 以带标签的枚举表达三种条件形态（等值、集合成员、显式操作符比较），
//! `Criteria` 与 `FieldValues` 均保持插入顺序，保证占位符编号与绑定值的位置对齐

use crate::types::data_value::DataValue;
use serde::{Deserialize, Serialize};

/// 单列查询条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criterion {
    /// 等值比较：`col=$n`
    Eq(DataValue),
    /// 集合成员：`col IN ($n,$n+1,...)`，每个元素一个占位符；
    /// 空集合在 read 的WHERE子句中整列被静默省略
    In(Vec<DataValue>),
    /// 显式操作符比较：`col<op>$n`
    ///
    /// 操作符原样插入SQL文本，由调用方保证合法性，不做白名单校验
    Cmp {
        /// 比较操作符（如 `<`、`>=`、`<>`）
        op: String,
        /// 比较值
        value: DataValue,
    },
}

impl Criterion {
    /// 创建显式操作符比较条件
    pub fn cmp<S: Into<String>>(op: S, value: DataValue) -> Self {
        Criterion::Cmp {
            op: op.into(),
            value,
        }
    }

    /// 展平为单个绑定值
    ///
    /// update/delete 的WHERE子句仅支持等值比较，非等值条件按原始值直接绑定：
    /// `In` 的整个序列作为一个数组值、`Cmp` 取其比较值。
    /// 这一与 read 的不对称行为是刻意保留的
    pub fn raw_value(&self) -> DataValue {
        match self {
            Criterion::Eq(value) => value.clone(),
            Criterion::In(values) => DataValue::Array(values.clone()),
            Criterion::Cmp { value, .. } => value.clone(),
        }
    }
}

/// 查询条件集合 - 保持插入顺序的 (列名, 条件) 序列
///
/// 条件之间只有AND连接，不支持OR和嵌套
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    entries: Vec<(String, Criterion)>,
}

impl Criteria {
    /// 创建空的条件集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加条件（链式调用）
    pub fn with<S: Into<String>>(mut self, column: S, criterion: Criterion) -> Self {
        self.add(column, criterion);
        self
    }

    /// 添加条件
    ///
    /// 同名列重复添加时原位覆盖，保持首次插入的位置
    pub fn add<S: Into<String>>(&mut self, column: S, criterion: Criterion) {
        let column = column.into();
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == column) {
            entry.1 = criterion;
        } else {
            self.entries.push((column, criterion));
        }
    }

    /// 判断是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 条件数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 按插入顺序迭代条件
    pub fn entries(&self) -> impl Iterator<Item = &(String, Criterion)> {
        self.entries.iter()
    }
}

/// 字段值集合 - 保持插入顺序的 (列名, 值) 序列
///
/// create/update 的占位符顺序即插入顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValues {
    entries: Vec<(String, DataValue)>,
}

impl FieldValues {
    /// 创建空的字段值集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置字段值（链式调用）
    pub fn set<S: Into<String>, V: Into<DataValue>>(mut self, column: S, value: V) -> Self {
        self.insert(column, value);
        self
    }

    /// 设置字段值
    ///
    /// 同名列重复设置时原位覆盖，保持首次插入的位置
    pub fn insert<S: Into<String>, V: Into<DataValue>>(&mut self, column: S, value: V) {
        let column = column.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
    }

    /// 判断是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 字段数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 按插入顺序迭代字段
    pub fn entries(&self) -> impl Iterator<Item = &(String, DataValue)> {
        self.entries.iter()
    }

    /// 按插入顺序返回列名
    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.as_str()).collect()
    }

    /// 按插入顺序迭代值
    pub fn values(&self) -> impl Iterator<Item = &DataValue> {
        self.entries.iter().map(|(_, v)| v)
    }
}
