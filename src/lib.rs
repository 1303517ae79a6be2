//! # rat_pgaccess
//!
//! 轻量的PostgreSQL连接池访问层
//!
//! ## 特性
//!
//! - 🏊 **连接池生命周期管理**: start/stop/health_check 契约，适配编排式启动
//! - ⏳ **就绪等待**: 数据库未就绪时固定间隔无限重试，其他错误立即失败
//! - 🦀 **会话抽象**: 隐式池化执行与专用连接事务两种模式
//! - 🔧 **CRUD构建器**: 位置占位符绑定，标识符与值两条路径严格分离
//! - 🔒 **注入安全**: 所有值一律走占位符，绝不插值进SQL文本
//! - 📦 **不透明查询错误**: 驱动细节只进日志，不泄露给调用方
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use rat_pgaccess::{FieldValues, Lifecycle, PgConfig, PoolManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PgConfig::builder()
//!         .user("app")
//!         .database("appdb")
//!         .password("secret")
//!         .build()?;
//!
//!     let manager = PoolManager::new("main-db", config)?;
//!     manager.start().await?;
//!
//!     let mut session = manager.session("worker-1");
//!     let fields = FieldValues::new().set("name", "张三").set("age", 30i64);
//!     session.create("users", &fields, Some("id")).await?;
//!
//!     manager.stop().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pool;
pub mod session;
pub mod sql_builder;
pub mod types;

// 重新导出常用类型
pub use config::{PgConfig, PgConfigBuilder, PoolConfig, PoolConfigBuilder, SslMode};
pub use error::{PgAccessError, PgAccessResult};
pub use lifecycle::Lifecycle;
pub use pool::PoolManager;
pub use session::Session;
pub use sql_builder::SqlBuilder;
pub use types::{Criteria, Criterion, DataValue, FieldValues, ReadOptions, ReadResult, RowFormat};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
