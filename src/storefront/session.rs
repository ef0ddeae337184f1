use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::cart::{Cart, CartError};
use super::catalog::{Catalog, HijabOption, Product, Shipping};
use super::form::{validate, CustomerForm, FormValidation};
use super::order_log::{dhaka_timestamp, OrderRecord, OrderSink, SheetOrderLog};
use crate::common::events::{EventName, Parameters};
use crate::config::{OrderLogSettings, Settings};
use crate::tracking::{client, SelectedItems, Tracker};

pub const CHECKOUT_ID: &str = "form-validation";
pub const ORDER_SUBMIT_ID: &str = "order-submit";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("অনুগ্রহ করে কমপক্ষে একটি পণ্য সিলেক্ট করুন এবং সাইজ ও হিজাব অপশন নির্বাচন করুন")]
    ProductIncomplete,
    #[error("অনুগ্রহ করে সকল তথ্য পূরণ করুন")]
    FormIncomplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub record: OrderRecord,
    pub total: u64,
}

/// 单个页面会话：购物车、表单、埋点与订单记录
pub struct Storefront {
    cart: Cart,
    form: CustomerForm,
    tracker: Tracker,
    order_log: Box<dyn OrderSink>,
    order_settings: OrderLogSettings,
}

impl Storefront {
    pub fn new(
        cart: Cart,
        tracker: Tracker,
        order_log: Box<dyn OrderSink>,
        order_settings: OrderLogSettings,
    ) -> Self {
        Self {
            cart,
            form: CustomerForm::default(),
            tracker,
            order_log,
            order_settings,
        }
    }

    /// 按配置组装会话：价格、埋点客户端（缺凭据时为空实现）与订单表格
    ///
    /// 需要在 Tokio 运行时内调用。
    pub fn from_settings(settings: &Settings, products: Vec<Product>) -> anyhow::Result<Self> {
        let catalog = Catalog::new(products, settings.catalog.clone());
        let tracker = Tracker::new(
            client::from_settings(&settings.tracking)?,
            settings.tracking.currency.clone(),
        );
        let order_log = SheetOrderLog::new(&settings.order_log.endpoint)?;
        Ok(Self::new(
            Cart::new(catalog),
            tracker,
            Box::new(order_log),
            settings.order_log.clone(),
        ))
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// 点击商品卡片；新选中时上报 AddToCart（以商品名去重）
    pub fn toggle_product(&mut self, index: usize) -> Result<bool, CartError> {
        let selected = self.cart.toggle(index)?;
        if selected {
            let line = self.cart.line(index)?;
            let price = self.cart.line_price(line);
            let name = line.name.clone();
            let params = object(json!({
                "content_name": name,
                "content_type": "product",
                "content_ids": [name],
                "contents": [{
                    "id": name,
                    "quantity": line.quantity,
                    "item_price": price.unit,
                }],
                "value": price.total,
            }));
            self.tracker
                .track(EventName::AddToCart, params, &name, &self.cart);
        }
        Ok(selected)
    }

    pub fn select_size(&mut self, index: usize, size: &str) -> Result<FormValidation, CartError> {
        self.cart.select_size(index, size)?;
        Ok(self.validate_form())
    }

    pub fn set_hijab(
        &mut self,
        index: usize,
        option: HijabOption,
    ) -> Result<FormValidation, CartError> {
        self.cart.set_hijab(index, option)?;
        Ok(self.validate_form())
    }

    pub fn increment(&mut self, index: usize) -> Result<u32, CartError> {
        self.cart.increment(index)
    }

    pub fn decrement(&mut self, index: usize) -> Result<u32, CartError> {
        self.cart.decrement(index)
    }

    pub fn set_shipping(&mut self, shipping: Shipping) {
        self.cart.set_shipping(shipping);
    }

    pub fn update_form(&mut self, form: CustomerForm) -> FormValidation {
        self.form = form;
        self.validate_form()
    }

    /// 校验通过时上报 InitiateCheckout（会话内只上报一次）
    pub fn validate_form(&mut self) -> FormValidation {
        let result = validate(&self.cart, &self.form);
        if result.can_submit() {
            let params = self.checkout_params(self.cart.items_total());
            self.tracker
                .track(EventName::InitiateCheckout, params, CHECKOUT_ID, &self.cart);
        }
        result
    }

    /// 提交订单：记录到订单表格，再上报 Purchase
    pub fn submit_order(&mut self, now: DateTime<Utc>) -> Result<OrderReceipt, CheckoutError> {
        let validation = self.validate_form();
        if !validation.has_valid_product {
            return Err(CheckoutError::ProductIncomplete);
        }
        if !validation.is_form_filled {
            return Err(CheckoutError::FormIncomplete);
        }

        let total = self.cart.items_total() + self.cart.shipping_cost();
        let record = self.order_record(now, total);
        self.order_log.submit(record.clone());
        tracing::info!("[OrderLog] Order submitted, total {}", total);

        let params = self.checkout_params(total);
        self.tracker
            .track(EventName::Purchase, params, ORDER_SUBMIT_ID, &self.cart);

        Ok(OrderReceipt { record, total })
    }

    fn checkout_params(&self, value: u64) -> Parameters {
        let contents = self.cart.selected_contents();
        let num_items: u64 = contents.iter().map(|c| u64::from(c.quantity)).sum();
        object(json!({
            "value": value,
            "contents": contents,
            "content_type": "product",
            "num_items": num_items,
        }))
    }

    fn order_record(&self, now: DateTime<Utc>, total: u64) -> OrderRecord {
        let products = self
            .cart
            .selected_lines()
            .map(|line| {
                let hijab = line.hijab.unwrap_or(HijabOption::Without).label();
                format!(
                    "{} ({}) {} - {}টি",
                    line.name,
                    line.size.as_deref().unwrap_or(""),
                    hijab,
                    line.quantity
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        OrderRecord {
            website: self.order_settings.website.clone(),
            ad_id: self.order_settings.ad_id.clone(),
            timestamp: dhaka_timestamp(now),
            name: self.form.name.clone(),
            phone: self.form.phone.clone(),
            address: self.form.address.clone(),
            products,
            delivery: self.cart.shipping().label().to_string(),
            total,
        }
    }
}

fn object(value: Value) -> Parameters {
    match value {
        Value::Object(map) => map,
        _ => Parameters::new(),
    }
}
