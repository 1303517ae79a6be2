//! 错误类型定义模块
//!
//! 对调用方可见的错误分为四类：配置错误、连接错误、查询错误和会话状态错误。
//! 查询错误刻意不携带任何内部细节（SQL文本、绑定参数、驱动错误等仅记录到日志），
//! 防止查询内部信息泄漏给调用方。

use thiserror::Error;

/// rat_pgaccess 统一错误类型
#[derive(Error, Debug)]
pub enum PgAccessError {
    /// 配置错误（缺少必需配置项、连接URI非法等）
    #[error("配置错误: {message}")]
    ConfigError {
        /// 错误消息
        message: String,
    },

    /// 连接错误（连接池创建失败、就绪探测致命失败、专用连接获取失败）
    #[error("连接错误: {message}")]
    ConnectionError {
        /// 错误消息
        message: String,
    },

    /// 查询执行失败
    ///
    /// 不携带任何负载：原始驱动错误、SQL文本和绑定参数只写入错误日志
    #[error("数据库请求处理失败")]
    QueryError,

    /// 会话状态错误（在错误的会话状态下调用 connect/release/事务操作）
    #[error("会话状态错误: {message}")]
    StateError {
        /// 错误消息
        message: String,
    },
}

/// rat_pgaccess 统一结果类型
pub type PgAccessResult<T> = Result<T, PgAccessError>;
