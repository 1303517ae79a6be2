//! 进程生命周期能力定义
//!
//! 外部进程监督者按 start/stop/health_check 契约驱动组件：
//! `start` 在组件就绪后解析为 true（就绪等待期间可能长时间运行），
//! `stop` 尽力而为地完成清理且总是返回，
//! `health_check` 为可重复调用的快速存活检查，从不报错

use crate::error::PgAccessResult;
use async_trait::async_trait;

/// 生命周期能力 - 由组合实现，不使用继承
#[async_trait]
pub trait Lifecycle {
    /// 启动组件，就绪后返回 true；致命错误时返回错误且不再重试
    async fn start(&self) -> PgAccessResult<bool>;

    /// 停止组件，尽力而为，不传播清理错误
    async fn stop(&self);

    /// 存活检查，探测成功返回 true，失败记录日志并返回 false，从不报错
    async fn health_check(&self) -> bool;
}
