//! rat_pgaccess 基本使用示例
//!
//! 展示连接池生命周期管理与会话CRUD操作。
//! 运行前需要一个可访问的PostgreSQL实例：
//! ```bash
//! PG_HOST=localhost PG_USER=postgres PG_PASSWORD=postgres PG_DATABASE=postgres \
//!   cargo run --example basic_usage
//! ```

use rat_logger::{handler::term::TermConfig, LoggerBuilder};
use rat_pgaccess::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    LoggerBuilder::new()
        .add_terminal_with_config(TermConfig::default())
        .init()
        .expect("日志初始化失败");

    println!("=== rat_pgaccess 基本使用示例 ===");
    println!("库版本: {}", rat_pgaccess::get_info());

    // 1. 构建连接配置
    println!("\n1. 构建连接配置...");
    let config = PgConfig::builder()
        .user(std::env::var("PG_USER").unwrap_or_else(|_| "postgres".to_string()))
        .database(std::env::var("PG_DATABASE").unwrap_or_else(|_| "postgres".to_string()))
        .password(std::env::var("PG_PASSWORD").unwrap_or_else(|_| "postgres".to_string()))
        .host(std::env::var("PG_HOST").unwrap_or_else(|_| "localhost".to_string()))
        .port(5432)
        .ssl_flag("N")
        .pool(
            PoolConfig::builder()
                .min_connections(1)
                .max_connections(10)
                .retry_interval_ms(5000)
                .build(),
        )
        .build()?;

    // 2. 创建并启动连接池管理器（数据库未就绪时会固定间隔重试）
    println!("\n2. 启动连接池管理器...");
    let manager = PoolManager::new("demo-db", config)?;
    manager.start().await?;
    println!("✅ 连接池已就绪");

    // 3. 健康检查
    println!("\n3. 健康检查: {}", manager.health_check().await);

    // 4. 准备测试表
    let mut session = manager.session("demo-worker");
    session
        .exec("CREATE TABLE IF NOT EXISTS demo_users (id SERIAL PRIMARY KEY, name TEXT, age BIGINT, active BOOLEAN)")
        .await?;
    session.exec("DELETE FROM demo_users").await?;

    // 5. 插入记录并取回生成的主键
    println!("\n5. 插入记录...");
    let fields = FieldValues::new()
        .set("name", "张三")
        .set("age", 30i64)
        .set("active", true);
    let returned = session.create("demo_users", &fields, Some("id")).await?;
    println!("✅ 插入成功，返回: {:?}", returned);

    let fields = FieldValues::new()
        .set("name", "李四")
        .set("age", 25i64)
        .set("active", false);
    session.create("demo_users", &fields, None).await?;

    // 6. 条件读取（记录格式）
    println!("\n6. 条件读取...");
    let criteria = Criteria::new().with("age", Criterion::cmp(">=", 18i64.into()));
    let options = ReadOptions::new().with_order_by(vec!["age".to_string()]);
    let result = session.read("demo_users", &[], &criteria, &options).await?;
    println!("✅ 查询到 {} 条记录", result.row_count());
    if let Some(records) = result.into_records() {
        for record in &records {
            println!("  - {:?}", record);
        }
    }

    // 7. 数组格式读取
    println!("\n7. 数组格式读取...");
    let options = ReadOptions::new()
        .with_format(RowFormat::Array)
        .with_order_by_desc(vec!["age".to_string()]);
    if let ReadResult::Array { header, rows } = session
        .read("demo_users", &["name", "age"], &Criteria::new(), &options)
        .await?
    {
        println!("  表头: {:?}", header);
        for row in &rows {
            println!("  行: {:?}", row);
        }
    }

    // 8. 更新与删除
    println!("\n8. 更新与删除...");
    let changes = FieldValues::new().set("active", true);
    let criteria = Criteria::new().with("name", Criterion::Eq("李四".into()));
    let affected = session.update("demo_users", &changes, &criteria).await?;
    println!("✅ 更新了 {} 条记录", affected);

    let affected = session.delete("demo_users", &criteria).await?;
    println!("✅ 删除了 {} 条记录", affected);

    // 9. 清理并停止
    session.exec("DROP TABLE demo_users").await?;
    println!("\n9. 停止连接池管理器...");
    manager.stop().await;
    println!("✅ 示例执行完成");

    Ok(())
}
