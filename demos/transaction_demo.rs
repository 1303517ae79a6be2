//! rat_pgaccess 专用连接与事务示例
//!
//! 展示从连接池检出专用连接、跨多次调用保留事务状态、
//! 以及提交/回滚后的归还流程。
//! 运行方式同 basic_usage：通过 PG_HOST/PG_USER/PG_PASSWORD/PG_DATABASE 指定数据库

use rat_logger::{handler::term::TermConfig, LoggerBuilder};
use rat_pgaccess::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    LoggerBuilder::new()
        .add_terminal_with_config(TermConfig::default())
        .init()
        .expect("日志初始化失败");

    println!("=== rat_pgaccess 事务示例 ===");

    let config = PgConfig::builder()
        .user(std::env::var("PG_USER").unwrap_or_else(|_| "postgres".to_string()))
        .database(std::env::var("PG_DATABASE").unwrap_or_else(|_| "postgres".to_string()))
        .password(std::env::var("PG_PASSWORD").unwrap_or_else(|_| "postgres".to_string()))
        .host(std::env::var("PG_HOST").unwrap_or_else(|_| "localhost".to_string()))
        .build()?;

    let manager = PoolManager::new("tx-demo", config)?;
    manager.start().await?;

    let mut session = manager.session("tx-worker");
    session
        .exec("CREATE TABLE IF NOT EXISTS demo_accounts (id SERIAL PRIMARY KEY, owner TEXT, balance BIGINT)")
        .await?;
    session.exec("DELETE FROM demo_accounts").await?;

    let fields = FieldValues::new().set("owner", "张三").set("balance", 100i64);
    session.create("demo_accounts", &fields, None).await?;
    let fields = FieldValues::new().set("owner", "李四").set("balance", 0i64);
    session.create("demo_accounts", &fields, None).await?;

    // 1. 检出专用连接，后续操作固定在该连接上
    println!("\n1. 检出专用连接...");
    session.connect().await?;
    println!("✅ 已持有专用连接: {}", session.is_connected());

    // 2. 回滚示例：转账中途放弃
    println!("\n2. 回滚示例...");
    session.begin().await?;
    let debit = FieldValues::new().set("balance", 40i64);
    let criteria = Criteria::new().with("owner", Criterion::Eq("张三".into()));
    session.update("demo_accounts", &debit, &criteria).await?;
    session.rollback().await?;
    println!("✅ 已回滚，余额不变");

    // 3. 提交示例：完整转账
    println!("\n3. 提交示例...");
    session.begin().await?;
    let debit = FieldValues::new().set("balance", 40i64);
    let criteria = Criteria::new().with("owner", Criterion::Eq("张三".into()));
    session.update("demo_accounts", &debit, &criteria).await?;
    let credit = FieldValues::new().set("balance", 60i64);
    let criteria = Criteria::new().with("owner", Criterion::Eq("李四".into()));
    session.update("demo_accounts", &credit, &criteria).await?;
    session.commit().await?;
    println!("✅ 已提交");

    // 4. 归还专用连接，回到隐式池化模式
    println!("\n4. 归还专用连接...");
    session.release()?;
    println!("✅ 已归还: 持有专用连接={}", session.is_connected());

    let result = session
        .read(
            "demo_accounts",
            &["owner", "balance"],
            &Criteria::new(),
            &ReadOptions::new().with_order_by(vec!["owner".to_string()]),
        )
        .await?;
    if let Some(records) = result.into_records() {
        for record in &records {
            println!("  - {:?}", record);
        }
    }

    session.exec("DROP TABLE demo_accounts").await?;
    manager.stop().await;
    println!("\n✅ 事务示例执行完成");

    Ok(())
}
