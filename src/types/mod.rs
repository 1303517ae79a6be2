//! 公共类型定义
//!
//! 定义通用数据值、查询条件和读取选项

pub mod criteria;
pub mod data_value;
pub mod options;

// 重新导出所有公共类型
pub use criteria::{Criteria, Criterion, FieldValues};
pub use data_value::DataValue;
pub use options::{ReadOptions, ReadResult, RowFormat};
