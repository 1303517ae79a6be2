//! 会话模块
//!
//! 会话是单个逻辑调用方的执行上下文：未持有专用连接时，每次操作
//! 隐式地从共享连接池获取并随即归还一个物理连接（自动提交语义，
//! 调用之间不保留事务状态）；通过 `connect()` 检出专用连接后，
//! 所有操作固定在该连接上执行，事务状态跨调用保留，直到 `release()`。
//!
//! 所有操作的驱动错误都会连同SQL文本与绑定值完整写入错误日志，
//! 再以不含任何内部细节的 `QueryError` 重新抛给调用方

use rat_logger::{debug, error};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Column, PgPool, Postgres, Row, TypeInfo};
use std::collections::HashMap;

use crate::error::{PgAccessError, PgAccessResult};
use crate::lifecycle::Lifecycle;
use crate::sql_builder::SqlBuilder;
use crate::types::data_value::json_value_to_data_value;
use crate::types::{Criteria, DataValue, FieldValues, ReadOptions, ReadResult, RowFormat};
use async_trait::async_trait;

/// 数据库会话
///
/// 所有操作都通过 `&mut self` 进行，同一会话不可能被多个调用方
/// 并发使用；一个会话同一时刻至多持有一个专用连接
pub struct Session {
    /// 逻辑名（用于日志）
    name: String,
    /// 共享连接池句柄
    pool: PgPool,
    /// 专用连接（检出后所有操作固定在此连接上）
    client: Option<PoolConnection<Postgres>>,
}

impl Session {
    /// 创建绑定到共享连接池的会话（由 `PoolManager::session` 调用）
    pub(crate) fn new<S: Into<String>>(name: S, pool: PgPool) -> Self {
        Self {
            name: name.into(),
            pool,
            client: None,
        }
    }

    /// 会话逻辑名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否持有专用连接
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// 插入记录
    ///
    /// 占位符顺序与 `fields` 的插入顺序一致；指定 `returning` 列时
    /// 返回插入的记录，否则返回空序列
    pub async fn create(
        &mut self,
        table: &str,
        fields: &FieldValues,
        returning: Option<&str>,
    ) -> PgAccessResult<Vec<HashMap<String, DataValue>>> {
        let mut builder = SqlBuilder::insert(table, fields);
        if let Some(column) = returning {
            builder = builder.returning(column);
        }
        let (sql, params) = builder.build();

        debug!("create() 查询: 会话={} SQL={} 绑定值={:?}", self.name, sql, params);

        let rows = self.fetch_rows(&sql, &params).await?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    /// 读取记录
    ///
    /// `fields` 为空时选择所有列；条件之间只有AND连接。
    /// 数组格式下若结果为空，表头回退为请求的字段列表
    pub async fn read(
        &mut self,
        table: &str,
        fields: &[&str],
        criteria: &Criteria,
        options: &ReadOptions,
    ) -> PgAccessResult<ReadResult> {
        let (sql, params) = SqlBuilder::select(table, fields)
            .criteria(criteria)
            .options(options)
            .build();

        debug!("read() 查询: 会话={} SQL={} 绑定值={:?}", self.name, sql, params);

        let rows = self.fetch_rows(&sql, &params).await?;

        match options.format {
            RowFormat::Records => Ok(ReadResult::Records(
                rows.iter().map(row_to_record).collect(),
            )),
            RowFormat::Array => {
                let header = match rows.first() {
                    Some(row) => row_header(row),
                    None => fields
                        .iter()
                        .filter(|f| **f != "*")
                        .map(|f| f.to_string())
                        .collect(),
                };
                let value_rows = rows.iter().map(row_to_values).collect();
                Ok(ReadResult::Array {
                    header,
                    rows: value_rows,
                })
            }
        }
    }

    /// 更新记录，返回受影响的行数
    ///
    /// WHERE子句仅支持等值比较（与 `read` 的不对称刻意保留）
    pub async fn update(
        &mut self,
        table: &str,
        fields: &FieldValues,
        criteria: &Criteria,
    ) -> PgAccessResult<u64> {
        let (sql, params) = SqlBuilder::update(table, fields).criteria(criteria).build();

        debug!("update() 查询: 会话={} SQL={} 绑定值={:?}", self.name, sql, params);

        self.execute(&sql, &params).await
    }

    /// 删除记录，返回受影响的行数
    ///
    /// WHERE子句仅支持等值比较（与 `read` 的不对称刻意保留）
    pub async fn delete(&mut self, table: &str, criteria: &Criteria) -> PgAccessResult<u64> {
        let (sql, params) = SqlBuilder::delete(table).criteria(criteria).build();

        debug!("delete() 查询: 会话={} SQL={} 绑定值={:?}", self.name, sql, params);

        self.execute(&sql, &params).await
    }

    /// 执行任意SQL并返回结果记录
    ///
    /// 逃生通道，不支持参数绑定：字面量必须由调用方预先嵌入，
    /// 注入风险由调用方自行承担
    pub async fn query(&mut self, sql: &str) -> PgAccessResult<Vec<HashMap<String, DataValue>>> {
        debug!("query() 查询: 会话={} SQL={}", self.name, sql);

        let rows = self.fetch_rows(sql, &[]).await?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    /// 执行任意SQL并返回受影响的行数
    ///
    /// 逃生通道，不支持参数绑定
    pub async fn exec(&mut self, sql: &str) -> PgAccessResult<u64> {
        debug!("exec() 查询: 会话={} SQL={}", self.name, sql);

        self.execute(sql, &[]).await
    }

    /// 从连接池检出专用连接
    ///
    /// 已持有专用连接时报会话状态错误
    pub async fn connect(&mut self) -> PgAccessResult<()> {
        if self.client.is_some() {
            return Err(PgAccessError::StateError {
                message: "已持有专用连接".to_string(),
            });
        }

        debug!("正在检出专用连接: 会话={}", self.name);
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| PgAccessError::ConnectionError {
                message: format!("检出专用连接失败: {}", e),
            })?;
        self.client = Some(conn);
        Ok(())
    }

    /// 归还专用连接
    ///
    /// 未持有专用连接时报会话状态错误；每次成功的 `connect()`
    /// 恰好对应一次 `release()`
    pub fn release(&mut self) -> PgAccessResult<()> {
        if self.client.is_none() {
            return Err(PgAccessError::StateError {
                message: "未持有专用连接".to_string(),
            });
        }

        debug!("正在归还专用连接: 会话={}", self.name);
        // 丢弃即归还连接池
        self.client = None;
        Ok(())
    }

    /// 开启事务
    ///
    /// 事务只在专用连接上有意义，未持有专用连接时报会话状态错误
    pub async fn begin(&mut self) -> PgAccessResult<()> {
        debug!("正在开启事务: 会话={}", self.name);
        self.run_on_client("BEGIN;").await
    }

    /// 提交事务
    pub async fn commit(&mut self) -> PgAccessResult<()> {
        debug!("正在提交事务: 会话={}", self.name);
        self.run_on_client("COMMIT;").await
    }

    /// 回滚事务
    pub async fn rollback(&mut self) -> PgAccessResult<()> {
        debug!("正在回滚事务: 会话={}", self.name);
        self.run_on_client("ROLLBACK;").await
    }

    /// 执行查询并返回原始结果行
    async fn fetch_rows(&mut self, sql: &str, params: &[DataValue]) -> PgAccessResult<Vec<PgRow>> {
        let query = bind_parameters(sqlx::query(sql), params);

        let result = match self.client.as_deref_mut() {
            Some(conn) => query.fetch_all(&mut *conn).await,
            None => query.fetch_all(&self.pool).await,
        };

        result.map_err(|e| {
            error!(
                "'{}' 发生于查询 (SQL: {} | 绑定值: {:?}): 会话={}",
                e, sql, params, self.name
            );
            PgAccessError::QueryError
        })
    }

    /// 执行语句并返回受影响的行数
    async fn execute(&mut self, sql: &str, params: &[DataValue]) -> PgAccessResult<u64> {
        let query = bind_parameters(sqlx::query(sql), params);

        let result = match self.client.as_deref_mut() {
            Some(conn) => query.execute(&mut *conn).await,
            None => query.execute(&self.pool).await,
        };

        match result {
            Ok(done) => Ok(done.rows_affected()),
            Err(e) => {
                error!(
                    "'{}' 发生于查询 (SQL: {} | 绑定值: {:?}): 会话={}",
                    e, sql, params, self.name
                );
                Err(PgAccessError::QueryError)
            }
        }
    }

    /// 在专用连接上执行事务控制语句
    async fn run_on_client(&mut self, sql: &str) -> PgAccessResult<()> {
        let Some(conn) = self.client.as_deref_mut() else {
            return Err(PgAccessError::StateError {
                message: "未持有专用连接".to_string(),
            });
        };

        match sqlx::query(sql).execute(&mut *conn).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(
                    "'{}' 发生于事务操作 (SQL: {}): 会话={}",
                    e, sql, self.name
                );
                Err(PgAccessError::QueryError)
            }
        }
    }
}

#[async_trait]
impl Lifecycle for Session {
    async fn start(&self) -> PgAccessResult<bool> {
        Ok(true)
    }

    async fn stop(&self) {}

    async fn health_check(&self) -> bool {
        true
    }
}

/// 按位置绑定参数
///
/// 值永远走占位符绑定，绝不插值进SQL文本
fn bind_parameters<'q>(
    mut query: sqlx::query::Query<'q, Postgres, PgArguments>,
    params: &'q [DataValue],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            DataValue::Null => query.bind(Option::<String>::None),
            DataValue::Bool(b) => query.bind(*b),
            DataValue::Int(i) => query.bind(*i),
            DataValue::Float(f) => query.bind(*f),
            DataValue::String(s) => query.bind(s),
            DataValue::Bytes(bytes) => query.bind(bytes.as_slice()),
            DataValue::DateTime(dt) => query.bind(*dt),
            DataValue::Uuid(uuid) => query.bind(*uuid),
            DataValue::Json(json) => query.bind(json),
            DataValue::Array(arr) => query.bind(serde_json::to_value(arr).unwrap_or_default()),
        };
    }
    query
}

/// 将结果行转换为 字段名->值 的映射
fn row_to_record(row: &PgRow) -> HashMap<String, DataValue> {
    let mut map = HashMap::new();
    for column in row.columns() {
        map.insert(column.name().to_string(), column_value(row, column));
    }
    map
}

/// 将结果行转换为按列顺序排列的值数组
fn row_to_values(row: &PgRow) -> Vec<DataValue> {
    row.columns()
        .iter()
        .map(|column| column_value(row, column))
        .collect()
}

/// 提取结果行的字段名序列
fn row_header(row: &PgRow) -> Vec<String> {
    row.columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

/// 根据PostgreSQL列类型将单列值解码为DataValue
fn column_value(row: &PgRow, column: &sqlx::postgres::PgColumn) -> DataValue {
    let column_name = column.name();
    let type_name = column.type_info().name();

    match type_name {
        "INT2" | "INT4" | "INT8" => {
            if let Ok(Some(val)) = row.try_get::<Option<i16>, _>(column_name) {
                DataValue::Int(val as i64)
            } else if let Ok(Some(val)) = row.try_get::<Option<i32>, _>(column_name) {
                DataValue::Int(val as i64)
            } else if let Ok(Some(val)) = row.try_get::<Option<i64>, _>(column_name) {
                DataValue::Int(val)
            } else {
                DataValue::Null
            }
        }
        "FLOAT4" | "FLOAT8" => {
            if let Ok(Some(val)) = row.try_get::<Option<f32>, _>(column_name) {
                DataValue::Float(val as f64)
            } else if let Ok(Some(val)) = row.try_get::<Option<f64>, _>(column_name) {
                DataValue::Float(val)
            } else {
                DataValue::Null
            }
        }
        "BOOL" => match row.try_get::<Option<bool>, _>(column_name) {
            Ok(Some(b)) => DataValue::Bool(b),
            _ => DataValue::Null,
        },
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" => {
            match row.try_get::<Option<String>, _>(column_name) {
                Ok(Some(s)) => DataValue::String(s),
                _ => DataValue::Null,
            }
        }
        "UUID" => match row.try_get::<Option<uuid::Uuid>, _>(column_name) {
            Ok(Some(u)) => DataValue::Uuid(u),
            _ => DataValue::Null,
        },
        "JSON" | "JSONB" => {
            // PostgreSQL原生支持JSONB，直接获取serde_json::Value
            match row.try_get::<Option<serde_json::Value>, _>(column_name) {
                Ok(Some(json_val)) => json_value_to_data_value(json_val),
                _ => DataValue::Null,
            }
        }
        "BYTEA" => match row.try_get::<Option<Vec<u8>>, _>(column_name) {
            Ok(Some(bytes)) => DataValue::Bytes(bytes),
            _ => DataValue::Null,
        },
        "TIMESTAMPTZ" | "TIMESTAMP" => {
            // 不带时区的时间戳统一转换为UTC
            if let Ok(Some(dt)) =
                row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(column_name)
            {
                DataValue::DateTime(dt)
            } else if let Ok(Some(ndt)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(column_name)
            {
                DataValue::DateTime(ndt.and_utc())
            } else {
                DataValue::Null
            }
        }
        type_name if type_name.ends_with("[]") => {
            // PostgreSQL数组类型（如 text[], integer[] 等）
            if let Ok(Some(arr)) = row.try_get::<Option<Vec<String>>, _>(column_name) {
                DataValue::Array(arr.into_iter().map(DataValue::String).collect())
            } else if let Ok(Some(json_val)) =
                row.try_get::<Option<serde_json::Value>, _>(column_name)
            {
                json_value_to_data_value(json_val)
            } else {
                DataValue::Null
            }
        }
        _ => {
            // 未知类型尝试作为字符串获取
            match row.try_get::<Option<String>, _>(column_name) {
                Ok(Some(s)) => DataValue::String(s),
                _ => DataValue::Null,
            }
        }
    }
}
