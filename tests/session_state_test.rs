//! 会话状态机集成测试
//!
//! 连接池惰性建立，构造管理器与会话不需要真实数据库；
//! 状态检查先于任何I/O发生，因此状态错误可以离线验证

use rat_pgaccess::{Lifecycle, PgAccessError, PgConfig, PoolConfig, PoolManager};

/// 指向无监听端口的测试配置，任何I/O都会失败
fn unreachable_config() -> PgConfig {
    PgConfig::builder()
        .user("app")
        .database("appdb")
        .password("secret")
        .host("127.0.0.1")
        .port(59999)
        .pool(
            PoolConfig::builder()
                .max_connections(2)
                .acquire_timeout_ms(1000)
                .build(),
        )
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_manager_construction_is_lazy() {
    // 构造不发生I/O，指向不可达地址也能成功
    let manager = PoolManager::new("test-db", unreachable_config()).unwrap();
    let session = manager.session("worker-1");
    assert_eq!(session.name(), "worker-1");
    assert!(!session.is_connected());
}

#[tokio::test]
async fn test_release_without_connect_is_state_error() {
    let manager = PoolManager::new("test-db", unreachable_config()).unwrap();
    let mut session = manager.session("worker-1");

    let result = session.release();
    assert!(matches!(result, Err(PgAccessError::StateError { .. })));
}

#[tokio::test]
async fn test_transaction_without_connect_is_state_error() {
    let manager = PoolManager::new("test-db", unreachable_config()).unwrap();
    let mut session = manager.session("worker-1");

    assert!(matches!(
        session.begin().await,
        Err(PgAccessError::StateError { .. })
    ));
    assert!(matches!(
        session.commit().await,
        Err(PgAccessError::StateError { .. })
    ));
    assert!(matches!(
        session.rollback().await,
        Err(PgAccessError::StateError { .. })
    ));
}

#[tokio::test]
async fn test_connect_to_unreachable_database_is_connection_error() {
    let manager = PoolManager::new("test-db", unreachable_config()).unwrap();
    let mut session = manager.session("worker-1");

    let result = session.connect().await;
    assert!(matches!(
        result,
        Err(PgAccessError::ConnectionError { .. })
    ));
    assert!(!session.is_connected());
}

#[tokio::test]
async fn test_health_check_reports_false_when_unreachable() {
    let manager = PoolManager::new("test-db", unreachable_config()).unwrap();
    // 健康检查从不报错，失败表现为 false
    assert!(!manager.health_check().await);
}

#[tokio::test]
async fn test_stop_is_idempotent_without_start() {
    let manager = PoolManager::new("test-db", unreachable_config()).unwrap();
    // stop 尽力而为，未启动时也总是正常返回
    manager.stop().await;
    manager.stop().await;
}

#[tokio::test]
async fn test_state_error_message_is_descriptive() {
    let manager = PoolManager::new("test-db", unreachable_config()).unwrap();
    let mut session = manager.session("worker-1");

    match session.release() {
        Err(PgAccessError::StateError { message }) => {
            assert!(message.contains("专用连接"));
        }
        other => panic!("预期会话状态错误，实际: {:?}", other),
    }
}
