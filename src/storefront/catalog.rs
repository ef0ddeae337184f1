use crate::config::CatalogSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub sizes: Vec<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, sizes: &[&str]) -> Self {
        Self {
            name: name.into(),
            sizes: sizes.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HijabOption {
    With,
    Without,
}

impl HijabOption {
    pub fn label(&self) -> &'static str {
        match self {
            HijabOption::With => "হিজাবসহ",
            HijabOption::Without => "হিজাব ছাড়া",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shipping {
    #[default]
    Dhaka,
    Outside,
}

impl Shipping {
    pub fn label(&self) -> &'static str {
        match self {
            Shipping::Dhaka => "ঢাকা সিটি",
            Shipping::Outside => "ঢাকার বাইরে",
        }
    }
}

/// 价格规则（单位：BDT 整数）
#[derive(Debug, Clone)]
pub struct Pricing {
    settings: CatalogSettings,
}

impl Pricing {
    pub fn new(settings: CatalogSettings) -> Self {
        Self { settings }
    }

    /// 仅当明确选择"含头巾"时使用头巾价
    pub fn unit_price(&self, hijab: Option<HijabOption>) -> u64 {
        match hijab {
            Some(HijabOption::With) => self.settings.hijab_price,
            _ => self.settings.base_price,
        }
    }

    /// 划线原价，向上取整
    pub fn original_unit_price(&self, unit_price: u64) -> u64 {
        (unit_price * (100 + self.settings.markup_percent)).div_ceil(100)
    }

    pub fn shipping_cost(&self, shipping: Shipping) -> u64 {
        match shipping {
            Shipping::Dhaka => self.settings.shipping_dhaka,
            Shipping::Outside => self.settings.shipping_outside,
        }
    }

    pub fn max_quantity(&self) -> u32 {
        self.settings.max_quantity
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub pricing: Pricing,
}

impl Catalog {
    pub fn new(products: Vec<Product>, settings: CatalogSettings) -> Self {
        Self {
            products,
            pricing: Pricing::new(settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_follow_hijab_choice() {
        let pricing = Pricing::new(CatalogSettings::default());
        assert_eq!(pricing.unit_price(None), 750);
        assert_eq!(pricing.unit_price(Some(HijabOption::Without)), 750);
        assert_eq!(pricing.unit_price(Some(HijabOption::With)), 1050);
    }

    #[test]
    fn original_price_rounds_up() {
        let pricing = Pricing::new(CatalogSettings::default());
        assert_eq!(pricing.original_unit_price(750), 900);
        assert_eq!(pricing.original_unit_price(1050), 1260);
        assert_eq!(pricing.original_unit_price(101), 122);
    }

    #[test]
    fn shipping_costs() {
        let pricing = Pricing::new(CatalogSettings::default());
        assert_eq!(pricing.shipping_cost(Shipping::Dhaka), 80);
        assert_eq!(pricing.shipping_cost(Shipping::Outside), 150);
    }
}
