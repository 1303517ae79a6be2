//! 连接池管理器模块
//!
//! 持有唯一的共享连接池，对外暴露 start/stop/health_check 生命周期，
//! 并按逻辑名派发会话。
//!
//! 就绪等待是这里的核心状态机：启动后以固定间隔轮询存活探测语句，
//! 连接被拒绝视为"数据库尚未就绪"无限重试（编排式启动的预期情况，
//! 不做退避、不设次数上限），其余错误立即致命失败

use rat_logger::{debug, error, info};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::Future;
use std::time::Duration;

use crate::config::PgConfig;
use crate::error::{PgAccessError, PgAccessResult};
use crate::lifecycle::Lifecycle;
use crate::session::Session;
use async_trait::async_trait;

/// 存活探测语句
const LIVENESS_SQL: &str = "SELECT now();";

/// 连接池管理器
///
/// 一个管理器至多持有一个存活的连接池：构造时惰性创建，`stop()` 时关闭
pub struct PoolManager {
    /// 逻辑名（用于日志）
    name: String,
    /// 连接配置
    config: PgConfig,
    /// 共享连接池句柄
    pool: PgPool,
}

impl PoolManager {
    /// 创建连接池管理器
    ///
    /// 连接池惰性建立，此处不发生任何I/O；数据库可达性由 `start()` 负责探测
    pub fn new<S: Into<String>>(name: S, config: PgConfig) -> PgAccessResult<Self> {
        let url = config.connection_url();
        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(Duration::from_millis(config.pool.acquire_timeout_ms))
            .idle_timeout(Duration::from_secs(config.pool.idle_timeout))
            .max_lifetime(Duration::from_secs(config.pool.max_lifetime))
            .connect_lazy(&url)
            .map_err(|e| PgAccessError::ConfigError {
                message: format!("PostgreSQL连接池创建失败: {}", e),
            })?;

        Ok(Self {
            name: name.into(),
            config,
            pool,
        })
    }

    /// 创建绑定到共享连接池的会话
    ///
    /// 除对象创建外无任何副作用；连接池以引用计数句柄传递，
    /// 会话不会超过连接池的生存期
    pub fn session<S: Into<String>>(&self, name: S) -> Session {
        Session::new(name, self.pool.clone())
    }
}

#[async_trait]
impl Lifecycle for PoolManager {
    async fn start(&self) -> PgAccessResult<bool> {
        info!("正在启动PostgreSQL连接池管理器: 名称={}", self.name);

        let pool = self.pool.clone();
        let probe = move || {
            let pool = pool.clone();
            async move {
                sqlx::query(LIVENESS_SQL)
                    .execute(&pool)
                    .await
                    .map(|_| ())
            }
        };

        let interval = Duration::from_millis(self.config.pool.retry_interval_ms);
        poll_until_ready(&self.name, probe, interval).await?;

        info!("启动完成: 名称={}", self.name);
        Ok(true)
    }

    async fn stop(&self) {
        info!("正在停止: 名称={}", self.name);
        info!("正在关闭连接池...");
        self.pool.close().await;
        info!("连接池已关闭");
        info!("已停止: 名称={}", self.name);
    }

    async fn health_check(&self) -> bool {
        match sqlx::query(LIVENESS_SQL).execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                error!("健康检查失败: 名称={} 错误={}", self.name, e);
                false
            }
        }
    }
}

/// 判断是否为"数据库尚未就绪"类错误
///
/// 仅连接被拒绝的I/O错误视为瞬态不可用；其余错误（认证失败、
/// 数据库不存在等）在启动探测中均为致命
fn is_transient_unavailable(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused
    )
}

/// 就绪轮询循环
///
/// 状态机：轮询中 -> 就绪（探测成功，终态）；
/// 轮询中 -> 轮询中（连接被拒绝，固定间隔后重试）；
/// 轮询中 -> 失败（其他错误，终态，不重试）
async fn poll_until_ready<F, Fut>(
    name: &str,
    mut probe: F,
    retry_interval: Duration,
) -> PgAccessResult<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    loop {
        match probe().await {
            Ok(()) => {
                info!("PostgreSQL数据库就绪: 名称={}", name);
                return Ok(true);
            }
            Err(e) if is_transient_unavailable(&e) => {
                debug!(
                    "数据库尚未就绪，{}毫秒后重试: 名称={}",
                    retry_interval.as_millis(),
                    name
                );
                tokio::time::sleep(retry_interval).await;
            }
            Err(e) => {
                error!("数据库返回错误: 名称={} 错误={}", name, e);
                return Err(PgAccessError::ConnectionError {
                    message: format!("数据库就绪探测失败: {}", e),
                });
            }
        }
    }
}
