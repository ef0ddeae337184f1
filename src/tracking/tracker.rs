use serde_json::{Number, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};

use super::client::{AnalyticsClient, Delivery};
use super::dedupe::{dedupe_key, SeenEvents};
use crate::common::events::{ContentItem, ConversionEvent, EventName, Parameters};

/// 当前已选商品，用于给结账事件补齐 `contents`
pub trait SelectedItems {
    fn selected_contents(&self) -> Vec<ContentItem>;
}

impl SelectedItems for Vec<ContentItem> {
    fn selected_contents(&self) -> Vec<ContentItem> {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    Sent,
    Duplicate,
    Unavailable,
    Rejected,
    Failed,
}

/// 事件归一化与去重
///
/// 每个页面会话构造一次；`track` 永远不会向调用方抛错。
pub struct Tracker {
    client: Box<dyn AnalyticsClient>,
    seen: SeenEvents,
    currency: String,
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Tracker {
    pub fn new(client: Box<dyn AnalyticsClient>, currency: impl Into<String>) -> Self {
        Self {
            client,
            seen: SeenEvents::new(),
            currency: currency.into(),
            clock: now_millis,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn seen(&self) -> &SeenEvents {
        &self.seen
    }

    pub fn track(
        &mut self,
        name: EventName,
        params: Parameters,
        identifier: &str,
        selection: &dyn SelectedItems,
    ) -> TrackOutcome {
        let key = dedupe_key(name.as_str(), identifier, (self.clock)());
        if self.seen.has_seen(&key) {
            tracing::debug!("[Tracker] Skipping duplicate {}", key);
            return TrackOutcome::Duplicate;
        }

        let client = &self.client;
        let currency = self.currency.as_str();
        let event_key = key.clone();
        let result = catch_unwind(AssertUnwindSafe(move || {
            let parameters = normalize_parameters(name, params, currency, selection);
            client.emit(ConversionEvent::new(name, parameters, event_key))
        }));
        match result {
            Ok(Ok(Delivery::Dispatched)) => {
                self.seen.mark_seen(key);
                TrackOutcome::Sent
            }
            Ok(Ok(Delivery::Unavailable)) => {
                tracing::warn!("[Tracker] Analytics client not loaded, dropping {}", name);
                TrackOutcome::Unavailable
            }
            Ok(Err(e)) => {
                tracing::error!("[Tracker] Error tracking {}: {}", name, e);
                TrackOutcome::Failed
            }
            Err(_) => {
                tracing::error!("[Tracker] Panicked while tracking {}", name);
                TrackOutcome::Failed
            }
        }
    }

    /// 以字符串事件名调用；空名或未知事件名只记录警告
    pub fn track_by_name(
        &mut self,
        name: &str,
        params: Parameters,
        identifier: &str,
        selection: &dyn SelectedItems,
    ) -> TrackOutcome {
        match name.parse::<EventName>() {
            Ok(name) => self.track(name, params, identifier, selection),
            Err(e) => {
                tracing::warn!("[Tracker] Rejected event: {}", e);
                TrackOutcome::Rejected
            }
        }
    }
}

/// 补齐默认币种、数值化 `value`，并为结账事件推导 `contents`
pub fn normalize_parameters(
    name: EventName,
    params: Parameters,
    currency: &str,
    selection: &dyn SelectedItems,
) -> Parameters {
    let mut merged = Parameters::new();
    merged.insert("currency".into(), Value::String(currency.to_string()));
    merged.extend(params);

    let value = coerce_number(merged.get("value"));
    merged.insert("value".into(), number_value(value));

    let has_contents = merged.get("contents").is_some_and(|v| !v.is_null());
    if name.requires_contents() && !has_contents {
        let items = selection.selected_contents();
        let num_items: u64 = items.iter().map(|item| u64::from(item.quantity)).sum();
        merged.insert(
            "contents".into(),
            serde_json::to_value(&items).unwrap_or(Value::Array(Vec::new())),
        );
        merged.insert("content_type".into(), Value::String("product".into()));
        merged.insert("num_items".into(), Value::from(num_items));
    }

    merged
}

/// 数字原样保留，字符串取开头的最长合法浮点数（如 `"750 BDT"` -> 750），其余情况视为 0
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_leading_float(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// 整数值输出为 JSON 整数，避免 `750` 变成 `750.0`
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0))
    }
}
