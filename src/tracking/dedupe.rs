use std::collections::HashSet;

/// 页面会话内已发送事件的 key 集合
///
/// 只在内存中，随会话销毁。
#[derive(Debug, Default)]
pub struct SeenEvents {
    keys: HashSet<String>,
}

impl SeenEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// 返回 `false` 表示该 key 已存在
    pub fn mark_seen(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// `{event}-{identifier}`，未提供 identifier 时使用毫秒时间戳
pub fn dedupe_key(event_name: &str, identifier: &str, now_millis: i64) -> String {
    if identifier.is_empty() {
        format!("{}-{}", event_name, now_millis)
    } else {
        format!("{}-{}", event_name, identifier)
    }
}
