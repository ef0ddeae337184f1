use super::cart::Cart;

pub const SELECT_PRODUCT: &str = "অনুগ্রহ করে একটি পণ্য সিলেক্ট করুন";
pub const SELECT_SIZE: &str = "অনুগ্রহ করে সাইজ নির্বাচন করুন";
pub const SELECT_HIJAB: &str = "অনুগ্রহ করে হিজাব অপশন নির্বাচন করুন";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl CustomerForm {
    /// 未填写（去掉首尾空白后为空）的字段标签
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            (&self.name, "নাম"),
            (&self.address, "ঠিকানা"),
            (&self.phone, "ফোন নম্বর"),
        ]
        .into_iter()
        .filter(|(value, _)| value.trim().is_empty())
        .map(|(_, label)| label)
        .collect()
    }

    pub fn is_filled(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidation {
    pub has_valid_product: bool,
    pub is_form_filled: bool,
    pub warning: Option<String>,
}

impl FormValidation {
    pub fn can_submit(&self) -> bool {
        self.has_valid_product && self.is_form_filled
    }
}

/// 校验顺序：未选商品 -> 未选尺寸 -> 未选头巾 -> 表单缺项
pub fn validate(cart: &Cart, form: &CustomerForm) -> FormValidation {
    let mut has_selected = false;
    let mut has_size = false;
    let mut has_hijab = false;
    let mut has_valid_product = false;

    for line in cart.selected_lines() {
        has_selected = true;
        has_size |= line.size.is_some();
        has_hijab |= line.hijab.is_some();
        has_valid_product |= line.is_complete();
    }

    let missing = form.missing_fields();
    let is_form_filled = missing.is_empty();

    let warning = if !has_selected {
        Some(SELECT_PRODUCT.to_string())
    } else if !has_size {
        Some(SELECT_SIZE.to_string())
    } else if !has_hijab {
        Some(SELECT_HIJAB.to_string())
    } else if !is_form_filled {
        Some(format!("অনুগ্রহ করে {} পূরণ করুন", missing.join(", ")))
    } else {
        None
    };

    FormValidation {
        has_valid_product,
        is_form_filled,
        warning,
    }
}
