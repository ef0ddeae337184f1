use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 事件参数：参数名 -> 任意 JSON 值
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// 广告平台标准转化事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    AddToCart,
    InitiateCheckout,
    Purchase,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::AddToCart => "AddToCart",
            EventName::InitiateCheckout => "InitiateCheckout",
            EventName::Purchase => "Purchase",
        }
    }

    /// 结账阶段事件必须携带逐项 `contents`
    pub fn requires_contents(&self) -> bool {
        matches!(self, EventName::InitiateCheckout | EventName::Purchase)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventNameError {
    #[error("event name must not be empty")]
    Empty,
    #[error("unknown event name: {0}")]
    Unknown(String),
}

impl FromStr for EventName {
    type Err = EventNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(EventNameError::Empty),
            "AddToCart" => Ok(EventName::AddToCart),
            "InitiateCheckout" => Ok(EventName::InitiateCheckout),
            "Purchase" => Ok(EventName::Purchase),
            other => Err(EventNameError::Unknown(other.to_string())),
        }
    }
}

/// `contents` 中的单个条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub quantity: u32,
    pub item_price: u64,
}

/// 一次用户操作产生的转化事件
///
/// 构造后不可变，由转发调用消费一次。
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionEvent {
    name: EventName,
    parameters: Parameters,
    dedupe_key: String,
}

impl ConversionEvent {
    pub fn new(name: EventName, parameters: Parameters, dedupe_key: String) -> Self {
        Self {
            name,
            parameters,
            dedupe_key,
        }
    }

    pub fn name(&self) -> EventName {
        self.name
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn dedupe_key(&self) -> &str {
        &self.dedupe_key
    }

    pub fn into_parts(self) -> (EventName, Parameters, String) {
        (self.name, self.parameters, self.dedupe_key)
    }
}
