pub mod cart;
pub mod catalog;
pub mod form;
pub mod order_log;
pub mod session;

pub use cart::{Cart, CartError, LineItem, OrderSummary};
pub use catalog::{Catalog, HijabOption, Pricing, Product, Shipping};
pub use form::{CustomerForm, FormValidation};
pub use order_log::{OrderRecord, OrderSink, SheetOrderLog};
pub use session::{CheckoutError, OrderReceipt, Storefront};
