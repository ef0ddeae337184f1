use super::catalog::{Catalog, HijabOption, Pricing, Shipping};
use crate::common::events::ContentItem;
use crate::tracking::SelectedItems;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("unknown product index {0}")]
    UnknownProduct(usize),
    #[error("product '{0}' is not selected")]
    NotSelected(String),
    #[error("size '{size}' is not offered for '{product}'")]
    UnknownSize { product: String, size: String },
}

/// 商品卡片状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub selected: bool,
    pub size: Option<String>,
    pub hijab: Option<HijabOption>,
    pub quantity: u32,
}

impl LineItem {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            selected: false,
            size: None,
            hijab: None,
            quantity: 1,
        }
    }

    fn reset(&mut self) {
        self.selected = false;
        self.size = None;
        self.hijab = None;
        self.quantity = 1;
    }

    /// 已选且尺寸、头巾选项都已确定
    pub fn is_complete(&self) -> bool {
        self.selected && self.size.is_some() && self.hijab.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePrice {
    pub unit: u64,
    pub total: u64,
    pub original_total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub name: String,
    pub size: Option<String>,
    pub hijab: Option<HijabOption>,
    pub quantity: u32,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    pub subtotal: u64,
    pub shipping_cost: u64,
    pub total: u64,
}

#[derive(Debug, Clone)]
pub struct Cart {
    catalog: Catalog,
    lines: Vec<LineItem>,
    shipping: Shipping,
}

impl Cart {
    pub fn new(catalog: Catalog) -> Self {
        let lines = catalog
            .products
            .iter()
            .map(|p| LineItem::new(&p.name))
            .collect();
        Self {
            catalog,
            lines,
            shipping: Shipping::default(),
        }
    }

    pub fn pricing(&self) -> &Pricing {
        &self.catalog.pricing
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Result<&LineItem, CartError> {
        self.lines.get(index).ok_or(CartError::UnknownProduct(index))
    }

    pub fn shipping(&self) -> Shipping {
        self.shipping
    }

    pub fn set_shipping(&mut self, shipping: Shipping) {
        self.shipping = shipping;
    }

    /// 切换选中状态；取消选中时恢复默认值。返回切换后的状态。
    pub fn toggle(&mut self, index: usize) -> Result<bool, CartError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::UnknownProduct(index))?;
        if line.selected {
            line.reset();
        } else {
            line.selected = true;
        }
        Ok(line.selected)
    }

    pub fn select_size(&mut self, index: usize, size: &str) -> Result<(), CartError> {
        let offered = self
            .catalog
            .products
            .get(index)
            .map(|p| p.sizes.iter().any(|s| s == size))
            .ok_or(CartError::UnknownProduct(index))?;
        let line = self.editable(index)?;
        if !offered {
            return Err(CartError::UnknownSize {
                product: line.name.clone(),
                size: size.to_string(),
            });
        }
        line.size = Some(size.to_string());
        Ok(())
    }

    pub fn set_hijab(&mut self, index: usize, option: HijabOption) -> Result<(), CartError> {
        self.editable(index)?.hijab = Some(option);
        Ok(())
    }

    pub fn increment(&mut self, index: usize) -> Result<u32, CartError> {
        let max = self.catalog.pricing.max_quantity();
        let line = self.editable(index)?;
        if line.quantity < max {
            line.quantity += 1;
        }
        Ok(line.quantity)
    }

    pub fn decrement(&mut self, index: usize) -> Result<u32, CartError> {
        let line = self.editable(index)?;
        if line.quantity > 1 {
            line.quantity -= 1;
        }
        Ok(line.quantity)
    }

    /// 控件只在商品被选中时可用
    fn editable(&mut self, index: usize) -> Result<&mut LineItem, CartError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::UnknownProduct(index))?;
        if !line.selected {
            return Err(CartError::NotSelected(line.name.clone()));
        }
        Ok(line)
    }

    pub fn line_price(&self, line: &LineItem) -> LinePrice {
        let pricing = self.pricing();
        let unit = pricing.unit_price(line.hijab);
        let quantity = u64::from(line.quantity);
        LinePrice {
            unit,
            total: unit * quantity,
            original_total: pricing.original_unit_price(unit) * quantity,
        }
    }

    pub fn selected_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().filter(|line| line.selected)
    }

    /// 已选商品金额合计（不含运费）
    pub fn items_total(&self) -> u64 {
        self.selected_lines()
            .map(|line| self.line_price(line).total)
            .sum()
    }

    pub fn shipping_cost(&self) -> u64 {
        self.pricing().shipping_cost(self.shipping)
    }

    pub fn summary(&self) -> OrderSummary {
        let lines: Vec<SummaryLine> = self
            .lines
            .iter()
            .filter(|line| line.size.is_some() || line.hijab.is_some())
            .map(|line| SummaryLine {
                name: line.name.clone(),
                size: line.size.clone(),
                hijab: line.hijab,
                quantity: line.quantity,
                total: self.line_price(line).total,
            })
            .collect();
        let subtotal = lines.iter().map(|line| line.total).sum();
        let shipping_cost = self.shipping_cost();
        OrderSummary {
            lines,
            subtotal,
            shipping_cost,
            total: subtotal + shipping_cost,
        }
    }
}

impl SelectedItems for Cart {
    fn selected_contents(&self) -> Vec<ContentItem> {
        self.selected_lines()
            .map(|line| ContentItem {
                id: line.name.clone(),
                quantity: line.quantity,
                item_price: self.pricing().unit_price(line.hijab),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogSettings;
    use crate::storefront::catalog::Product;

    fn cart() -> Cart {
        Cart::new(Catalog::new(
            vec![
                Product::new("Abaya Black", &["52", "54", "56"]),
                Product::new("Abaya Maroon", &["52", "54"]),
            ],
            CatalogSettings::default(),
        ))
    }

    #[test]
    fn controls_require_selection() {
        let mut cart = cart();
        assert_eq!(
            cart.select_size(0, "52"),
            Err(CartError::NotSelected("Abaya Black".into()))
        );
        assert!(cart.toggle(0).unwrap());
        cart.select_size(0, "52").unwrap();
        assert_eq!(cart.line(0).unwrap().size.as_deref(), Some("52"));
    }

    #[test]
    fn rejects_unknown_size_and_product() {
        let mut cart = cart();
        cart.toggle(1).unwrap();
        assert!(matches!(
            cart.select_size(1, "56"),
            Err(CartError::UnknownSize { .. })
        ));
        assert_eq!(cart.toggle(7), Err(CartError::UnknownProduct(7)));
    }

    #[test]
    fn quantity_is_clamped() {
        let mut cart = cart();
        cart.toggle(0).unwrap();
        assert_eq!(cart.decrement(0).unwrap(), 1);
        for _ in 0..20 {
            cart.increment(0).unwrap();
        }
        assert_eq!(cart.line(0).unwrap().quantity, 10);
    }

    #[test]
    fn deselect_resets_line() {
        let mut cart = cart();
        cart.toggle(0).unwrap();
        cart.select_size(0, "54").unwrap();
        cart.set_hijab(0, HijabOption::With).unwrap();
        cart.increment(0).unwrap();
        assert!(!cart.toggle(0).unwrap());
        assert_eq!(cart.line(0).unwrap(), &LineItem::new("Abaya Black"));
    }

    #[test]
    fn summary_totals_include_shipping() {
        let mut cart = cart();
        cart.toggle(0).unwrap();
        cart.select_size(0, "54").unwrap();
        cart.set_hijab(0, HijabOption::With).unwrap();
        cart.increment(0).unwrap();
        cart.toggle(1).unwrap();
        cart.set_hijab(1, HijabOption::Without).unwrap();
        cart.set_shipping(Shipping::Outside);

        let summary = cart.summary();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.subtotal, 2 * 1050 + 750);
        assert_eq!(summary.shipping_cost, 150);
        assert_eq!(summary.total, 2 * 1050 + 750 + 150);

        let price = cart.line_price(cart.line(0).unwrap());
        assert_eq!(price.original_total, 2 * 1260);
    }

    #[test]
    fn selected_contents_use_unit_prices() {
        let mut cart = cart();
        cart.toggle(1).unwrap();
        cart.set_hijab(1, HijabOption::With).unwrap();
        cart.increment(1).unwrap();
        assert_eq!(
            cart.selected_contents(),
            vec![ContentItem {
                id: "Abaya Maroon".into(),
                quantity: 2,
                item_price: 1050,
            }]
        );
    }
}
