use serde_json::Value;

/// 递归删除值为 `null` 的对象字段
///
/// 数组保持原长度：元素中的对象/数组会被继续清理，`null` 元素本身保留。
pub fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, field| !field.is_null());
            for field in map.values_mut() {
                strip_nulls(field);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                strip_nulls(item);
            }
        }
        _ => {}
    }
}

/// 返回清理后的副本
pub fn stripped(mut value: Value) -> Value {
    strip_nulls(&mut value);
    value
}
