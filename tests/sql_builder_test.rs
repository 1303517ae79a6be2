//! SQL构建器集成测试
//!
//! 验证生成的SQL文本形态与绑定值的位置对齐

use rat_pgaccess::{Criteria, Criterion, DataValue, FieldValues, ReadOptions, RowFormat, SqlBuilder};

#[test]
fn test_select_all_columns() {
    let (sql, params) = SqlBuilder::select("users", &[]).build();
    assert_eq!(sql, "SELECT * FROM users");
    assert!(params.is_empty());
}

#[test]
fn test_select_field_list() {
    let (sql, _) = SqlBuilder::select("users", &["id", "name", "age"]).build();
    assert_eq!(sql, "SELECT id,name,age FROM users");
}

#[test]
fn test_select_distinct() {
    let options = ReadOptions::new().with_distinct(true);
    let (sql, _) = SqlBuilder::select("users", &["city"]).options(&options).build();
    assert_eq!(sql, "SELECT DISTINCT city FROM users");
}

#[test]
fn test_select_equality_criterion() {
    let criteria = Criteria::new().with("status", Criterion::Eq("active".into()));
    let (sql, params) = SqlBuilder::select("users", &[]).criteria(&criteria).build();
    assert_eq!(sql, "SELECT * FROM users WHERE status=$1");
    assert_eq!(params, vec![DataValue::String("active".to_string())]);
}

#[test]
fn test_select_in_criterion() {
    let criteria = Criteria::new().with(
        "id",
        Criterion::In(vec![1i64.into(), 2i64.into(), 3i64.into()]),
    );
    let (sql, params) = SqlBuilder::select("users", &[]).criteria(&criteria).build();
    assert_eq!(sql, "SELECT * FROM users WHERE id IN ($1,$2,$3)");
    assert_eq!(params.len(), 3);
    assert_eq!(params[2], DataValue::Int(3));
}

#[test]
fn test_select_operator_criterion() {
    let criteria = Criteria::new().with("age", Criterion::cmp("<", 30i64.into()));
    let (sql, params) = SqlBuilder::select("users", &[]).criteria(&criteria).build();
    // 操作符原样插入，无空格
    assert_eq!(sql, "SELECT * FROM users WHERE age<$1");
    assert_eq!(params, vec![DataValue::Int(30)]);
}

#[test]
fn test_select_mixed_criteria_placeholder_order() {
    let criteria = Criteria::new()
        .with("status", Criterion::Eq("active".into()))
        .with("id", Criterion::In(vec![10i64.into(), 20i64.into()]))
        .with("age", Criterion::cmp(">=", 18i64.into()));
    let (sql, params) = SqlBuilder::select("users", &[]).criteria(&criteria).build();
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE status=$1 AND id IN ($2,$3) AND age>=$4"
    );
    assert_eq!(
        params,
        vec![
            DataValue::String("active".to_string()),
            DataValue::Int(10),
            DataValue::Int(20),
            DataValue::Int(18),
        ]
    );
}

#[test]
fn test_select_empty_in_criterion_is_omitted() {
    let criteria = Criteria::new()
        .with("id", Criterion::In(vec![]))
        .with("status", Criterion::Eq("active".into()));
    let (sql, params) = SqlBuilder::select("users", &[]).criteria(&criteria).build();
    // 空集合整列省略，占位符编号不受影响
    assert_eq!(sql, "SELECT * FROM users WHERE status=$1");
    assert_eq!(params.len(), 1);
}

#[test]
fn test_select_only_empty_in_criterion_has_no_where() {
    let criteria = Criteria::new().with("id", Criterion::In(vec![]));
    let (sql, params) = SqlBuilder::select("users", &[]).criteria(&criteria).build();
    assert_eq!(sql, "SELECT * FROM users");
    assert!(params.is_empty());
}

#[test]
fn test_select_order_by_ascending() {
    let options = ReadOptions::new().with_order_by(vec!["name".to_string(), "age".to_string()]);
    let (sql, _) = SqlBuilder::select("users", &[]).options(&options).build();
    assert_eq!(sql, "SELECT * FROM users ORDER BY name,age ASC");
}

#[test]
fn test_select_order_by_descending_only() {
    let options = ReadOptions::new().with_order_by_desc(vec!["created_at".to_string()]);
    let (sql, _) = SqlBuilder::select("users", &[]).options(&options).build();
    assert_eq!(sql, "SELECT * FROM users ORDER BY created_at DESC");
}

#[test]
fn test_select_order_by_both_directions() {
    let options = ReadOptions::new()
        .with_order_by(vec!["name".to_string()])
        .with_order_by_desc(vec!["age".to_string()]);
    let (sql, _) = SqlBuilder::select("users", &[]).options(&options).build();
    assert_eq!(sql, "SELECT * FROM users ORDER BY name ASC, age DESC");
}

#[test]
fn test_select_group_by() {
    let options = ReadOptions::new().with_group_by(vec!["city".to_string()]);
    let (sql, _) = SqlBuilder::select("users", &["city"]).options(&options).build();
    assert_eq!(sql, "SELECT city FROM users GROUP BY city");
}

#[test]
fn test_select_clause_order() {
    let criteria = Criteria::new().with("age", Criterion::cmp(">", 18i64.into()));
    let options = ReadOptions::new()
        .with_group_by(vec!["city".to_string()])
        .with_order_by(vec!["city".to_string()])
        .with_format(RowFormat::Array);
    let (sql, params) = SqlBuilder::select("users", &["city"])
        .criteria(&criteria)
        .options(&options)
        .build();
    // 结果格式不影响SQL文本
    assert_eq!(
        sql,
        "SELECT city FROM users WHERE age>$1 GROUP BY city ORDER BY city ASC"
    );
    assert_eq!(params.len(), 1);
}

#[test]
fn test_insert_placeholder_order_follows_insertion() {
    let fields = FieldValues::new()
        .set("name", "张三")
        .set("age", 30i64)
        .set("active", true);
    let (sql, params) = SqlBuilder::insert("users", &fields).build();
    assert_eq!(sql, "INSERT INTO users (name,age,active) VALUES ($1,$2,$3)");
    assert_eq!(
        params,
        vec![
            DataValue::String("张三".to_string()),
            DataValue::Int(30),
            DataValue::Bool(true),
        ]
    );
}

#[test]
fn test_insert_with_returning() {
    let fields = FieldValues::new().set("name", "张三");
    let (sql, _) = SqlBuilder::insert("users", &fields).returning("id").build();
    assert_eq!(sql, "INSERT INTO users (name) VALUES ($1) RETURNING id");
}

#[test]
fn test_insert_overwrite_keeps_position() {
    let fields = FieldValues::new()
        .set("name", "张三")
        .set("age", 30i64)
        .set("name", "李四");
    let (sql, params) = SqlBuilder::insert("users", &fields).build();
    assert_eq!(sql, "INSERT INTO users (name,age) VALUES ($1,$2)");
    assert_eq!(params[0], DataValue::String("李四".to_string()));
}

#[test]
fn test_update_placeholder_numbering_continues_into_where() {
    let fields = FieldValues::new().set("name", "李四").set("age", 31i64);
    let criteria = Criteria::new().with("id", Criterion::Eq(7i64.into()));
    let (sql, params) = SqlBuilder::update("users", &fields).criteria(&criteria).build();
    assert_eq!(sql, "UPDATE users SET name=$1,age=$2 WHERE id=$3");
    assert_eq!(params.len(), 3);
    assert_eq!(params[2], DataValue::Int(7));
}

#[test]
fn test_update_without_criteria_has_no_where() {
    let fields = FieldValues::new().set("active", false);
    let (sql, params) = SqlBuilder::update("users", &fields).build();
    assert_eq!(sql, "UPDATE users SET active=$1");
    assert_eq!(params.len(), 1);
}

#[test]
fn test_update_flattens_non_equality_criteria() {
    // update 的WHERE仅支持等值：操作符条件取其比较值、集合条件取整个数组
    let fields = FieldValues::new().set("active", false);
    let criteria = Criteria::new()
        .with("age", Criterion::cmp("<", 18i64.into()))
        .with("id", Criterion::In(vec![1i64.into(), 2i64.into()]));
    let (sql, params) = SqlBuilder::update("users", &fields).criteria(&criteria).build();
    assert_eq!(sql, "UPDATE users SET active=$1 WHERE age=$2 AND id=$3");
    assert_eq!(params[1], DataValue::Int(18));
    assert_eq!(
        params[2],
        DataValue::Array(vec![DataValue::Int(1), DataValue::Int(2)])
    );
}

#[test]
fn test_delete_with_criteria() {
    let criteria = Criteria::new().with("id", Criterion::Eq(7i64.into()));
    let (sql, params) = SqlBuilder::delete("users").criteria(&criteria).build();
    assert_eq!(sql, "DELETE FROM users WHERE id=$1");
    assert_eq!(params, vec![DataValue::Int(7)]);
}

#[test]
fn test_delete_without_criteria_deletes_all() {
    let (sql, params) = SqlBuilder::delete("users").build();
    assert_eq!(sql, "DELETE FROM users");
    assert!(params.is_empty());
}

#[test]
fn test_null_value_binding() {
    let fields = FieldValues::new().set("name", "张三");
    let criteria = Criteria::new().with("deleted_at", Criterion::Eq(DataValue::Null));
    let (sql, params) = SqlBuilder::update("users", &fields).criteria(&criteria).build();
    assert_eq!(sql, "UPDATE users SET name=$1 WHERE deleted_at=$2");
    assert!(params[1].is_null());
}
