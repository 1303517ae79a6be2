//! SQL构建器模块
//!
//! 生成 (SQL文本, 绑定值序列) 对，这是注入安全的核心机制：
//! 表名/列名作为文本插值（由调用方保证可信），所有值一律走
//! 1起始的位置占位符绑定，两条路径严格分离。
//!
//! WHERE子句只有AND连接。read 支持等值/集合成员/显式操作符三种条件，
//! update/delete 仅支持等值（非等值条件按原始值展平绑定，刻意保留的不对称）

use crate::types::{Criteria, Criterion, DataValue, FieldValues, ReadOptions};

/// 查询类型
#[derive(Debug, Clone)]
enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
}

/// SQL构建器
///
/// 不校验标识符合法性：表名、列名和比较操作符均由调用方保证可信
#[derive(Debug)]
pub struct SqlBuilder {
    query_type: QueryType,
    table: String,
    fields: Vec<String>,
    values: FieldValues,
    criteria: Criteria,
    options: ReadOptions,
    returning: Option<String>,
}

impl SqlBuilder {
    fn new(query_type: QueryType, table: &str) -> Self {
        Self {
            query_type,
            table: table.to_string(),
            fields: Vec::new(),
            values: FieldValues::new(),
            criteria: Criteria::new(),
            options: ReadOptions::default(),
            returning: None,
        }
    }

    /// 创建SELECT构建器，fields为空时选择所有列
    pub fn select(table: &str, fields: &[&str]) -> Self {
        let mut builder = Self::new(QueryType::Select, table);
        builder.fields = fields.iter().map(|s| s.to_string()).collect();
        builder
    }

    /// 创建INSERT构建器，占位符顺序与字段插入顺序一致
    pub fn insert(table: &str, values: &FieldValues) -> Self {
        let mut builder = Self::new(QueryType::Insert, table);
        builder.values = values.clone();
        builder
    }

    /// 创建UPDATE构建器
    pub fn update(table: &str, values: &FieldValues) -> Self {
        let mut builder = Self::new(QueryType::Update, table);
        builder.values = values.clone();
        builder
    }

    /// 创建DELETE构建器
    pub fn delete(table: &str) -> Self {
        Self::new(QueryType::Delete, table)
    }

    /// 设置WHERE条件
    pub fn criteria(mut self, criteria: &Criteria) -> Self {
        self.criteria = criteria.clone();
        self
    }

    /// 设置读取选项（仅对SELECT生效）
    pub fn options(mut self, options: &ReadOptions) -> Self {
        self.options = options.clone();
        self
    }

    /// 设置RETURNING列（仅对INSERT生效）
    pub fn returning(mut self, column: &str) -> Self {
        self.returning = Some(column.to_string());
        self
    }

    /// 构建SQL语句与绑定值序列
    pub fn build(&self) -> (String, Vec<DataValue>) {
        match self.query_type {
            QueryType::Select => self.build_select(),
            QueryType::Insert => self.build_insert(),
            QueryType::Update => self.build_update(),
            QueryType::Delete => self.build_delete(),
        }
    }

    /// 构建SELECT语句
    fn build_select(&self) -> (String, Vec<DataValue>) {
        let field_list = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(",")
        };

        let mut sql = if self.options.distinct {
            format!("SELECT DISTINCT {} FROM {}", field_list, self.table)
        } else {
            format!("SELECT {} FROM {}", field_list, self.table)
        };

        let (where_clause, params) = self.build_where_clause(1);
        if !where_clause.is_empty() {
            sql.push_str(&format!(" WHERE {}", where_clause));
        }

        if !self.options.group_by.is_empty() {
            sql.push_str(&format!(" GROUP BY {}", self.options.group_by.join(",")));
        }
        if !self.options.order_by.is_empty() {
            sql.push_str(&format!(" ORDER BY {} ASC", self.options.order_by.join(",")));
        }
        if !self.options.order_by_desc.is_empty() {
            if self.options.order_by.is_empty() {
                sql.push_str(&format!(
                    " ORDER BY {} DESC",
                    self.options.order_by_desc.join(",")
                ));
            } else {
                sql.push_str(&format!(", {} DESC", self.options.order_by_desc.join(",")));
            }
        }

        (sql, params)
    }

    /// 构建INSERT语句
    fn build_insert(&self) -> (String, Vec<DataValue>) {
        let columns = self.values.columns();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(","),
            placeholders.join(",")
        );

        if let Some(column) = &self.returning {
            sql.push_str(&format!(" RETURNING {}", column));
        }

        (sql, self.values.values().cloned().collect())
    }

    /// 构建UPDATE语句
    fn build_update(&self) -> (String, Vec<DataValue>) {
        let mut index = 1;
        let set_clauses: Vec<String> = self
            .values
            .entries()
            .map(|(column, _)| {
                let clause = format!("{}=${}", column, index);
                index += 1;
                clause
            })
            .collect();
        let mut params: Vec<DataValue> = self.values.values().cloned().collect();

        let mut sql = format!("UPDATE {} SET {}", self.table, set_clauses.join(","));

        let (where_clause, where_params) = self.build_equality_where(index);
        if !where_clause.is_empty() {
            sql.push_str(&format!(" WHERE {}", where_clause));
            params.extend(where_params);
        }

        (sql, params)
    }

    /// 构建DELETE语句
    fn build_delete(&self) -> (String, Vec<DataValue>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();

        let (where_clause, where_params) = self.build_equality_where(1);
        if !where_clause.is_empty() {
            sql.push_str(&format!(" WHERE {}", where_clause));
            params.extend(where_params);
        }

        (sql, params)
    }

    /// 构建WHERE子句（read语义），从指定的参数索引开始
    ///
    /// 空的 In 集合整列静默省略：等同于"该列不做过滤"，而不是"不匹配任何行"
    fn build_where_clause(&self, start_index: usize) -> (String, Vec<DataValue>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut index = start_index;

        for (column, criterion) in self.criteria.entries() {
            match criterion {
                Criterion::Eq(value) => {
                    clauses.push(format!("{}=${}", column, index));
                    params.push(value.clone());
                    index += 1;
                }
                Criterion::In(values) if values.is_empty() => {
                    // 空集合不产生占位符
                }
                Criterion::In(values) => {
                    let placeholders: Vec<String> = values
                        .iter()
                        .map(|_| {
                            let placeholder = format!("${}", index);
                            index += 1;
                            placeholder
                        })
                        .collect();
                    clauses.push(format!("{} IN ({})", column, placeholders.join(",")));
                    params.extend(values.iter().cloned());
                }
                Criterion::Cmp { op, value } => {
                    clauses.push(format!("{}{}${}", column, op, index));
                    params.push(value.clone());
                    index += 1;
                }
            }
        }

        (clauses.join(" AND "), params)
    }

    /// 构建仅等值的WHERE子句（update/delete语义），从指定的参数索引开始
    ///
    /// 所有条件一律渲染为 `col=$n`，非等值条件的原始值原样绑定
    fn build_equality_where(&self, start_index: usize) -> (String, Vec<DataValue>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut index = start_index;

        for (column, criterion) in self.criteria.entries() {
            clauses.push(format!("{}=${}", column, index));
            params.push(criterion.raw_value());
            index += 1;
        }

        (clauses.join(" AND "), params)
    }
}
