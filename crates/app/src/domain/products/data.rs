//! Products Data

use rust_decimal::Decimal;

use crate::{
    domain::{categories::records::CategoryId, slugs::explicit_slug},
    validation::{ValidationErrors, clean_required_text},
};

/// Longest product name accepted.
pub const NAME_MAX_CHARS: usize = 255;

/// Digits allowed before the decimal point of a price.
pub const PRICE_MAX_WHOLE_DIGITS: usize = 8;

/// Digits allowed after the decimal point of a price.
pub const PRICE_MAX_DECIMAL_PLACES: u32 = 2;

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub category: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub is_active: bool,
}

/// A [`NewProduct`] that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidNewProduct {
    pub category: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
}

impl NewProduct {
    /// Trim and check every field.
    ///
    /// # Errors
    ///
    /// Returns every field problem found.
    pub(crate) fn validated(self) -> Result<ValidNewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = clean_required_text(&mut errors, "name", &self.name, NAME_MAX_CHARS);

        check_price(&mut errors, self.price);

        let stock = check_stock(&mut errors, self.stock);

        errors.into_result()?;

        Ok(ValidNewProduct {
            category: self.category,
            name,
            slug: explicit_slug(self.slug),
            description: self.description.trim().to_owned(),
            price: self.price.round_dp(PRICE_MAX_DECIMAL_PLACES),
            stock: stock.unwrap_or_default(),
            is_active: self.is_active,
        })
    }
}

/// Product Update Data
///
/// `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub category: Option<CategoryId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub is_active: Option<bool>,
}

/// A [`ProductUpdate`] that passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ValidProductUpdate {
    pub category: Option<CategoryId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    /// Trim and check the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns every field problem found.
    pub(crate) fn validated(self) -> Result<ValidProductUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self
            .name
            .map(|name| clean_required_text(&mut errors, "name", &name, NAME_MAX_CHARS));

        if let Some(price) = self.price {
            check_price(&mut errors, price);
        }

        let stock = self.stock.and_then(|stock| check_stock(&mut errors, stock));

        errors.into_result()?;

        Ok(ValidProductUpdate {
            category: self.category,
            name,
            slug: explicit_slug(self.slug),
            description: self.description.map(|d| d.trim().to_owned()),
            price: self
                .price
                .map(|price| price.round_dp(PRICE_MAX_DECIMAL_PLACES)),
            stock,
            is_active: self.is_active,
        })
    }
}

/// Record price problems: negative, too many whole digits or decimal places.
pub fn check_price(errors: &mut ValidationErrors, price: Decimal) {
    if price.is_sign_negative() && !price.is_zero() {
        errors.add("price", "Ensure this value is greater than or equal to 0.");
    }

    if price.normalize().scale() > PRICE_MAX_DECIMAL_PLACES {
        errors.add(
            "price",
            format!("Ensure that there are no more than {PRICE_MAX_DECIMAL_PLACES} decimal places."),
        );
    }

    let whole = price.trunc().abs();
    let whole_digits = if whole.is_zero() {
        0
    } else {
        whole.to_string().len()
    };

    if whole_digits > PRICE_MAX_WHOLE_DIGITS {
        errors.add(
            "price",
            format!(
                "Ensure that there are no more than {PRICE_MAX_WHOLE_DIGITS} digits before the decimal point."
            ),
        );
    }
}

fn check_stock(errors: &mut ValidationErrors, stock: i64) -> Option<i32> {
    if stock < 0 {
        errors.add("stock", "Ensure this value is greater than or equal to 0.");
        return None;
    }

    match i32::try_from(stock) {
        Ok(stock) => Some(stock),
        Err(_) => {
            errors.add(
                "stock",
                format!("Ensure this value is less than or equal to {}.", i32::MAX),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn price_errors(raw: &str) -> Vec<String> {
        let mut errors = ValidationErrors::new();

        check_price(&mut errors, Decimal::from_str(raw).expect("decimal literal"));

        errors
            .messages_for("price")
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    fn new_product(price: &str, stock: i64) -> NewProduct {
        NewProduct {
            category: CategoryId::from_i64(1),
            name: " Lamp ".to_owned(),
            slug: None,
            description: String::new(),
            price: Decimal::from_str(price).expect("decimal literal"),
            stock,
            is_active: true,
        }
    }

    #[test]
    fn valid_prices_pass() {
        assert!(price_errors("0").is_empty());
        assert!(price_errors("0.00").is_empty());
        assert!(price_errors("19.99").is_empty());
        assert!(price_errors("99999999.99").is_empty());
        assert!(price_errors("12.50000").is_empty());
    }

    #[test]
    fn negative_prices_fail() {
        assert_eq!(
            price_errors("-0.01"),
            vec!["Ensure this value is greater than or equal to 0."]
        );
    }

    #[test]
    fn overly_precise_prices_fail() {
        assert_eq!(price_errors("1.999").len(), 1);
        assert_eq!(price_errors("100000000").len(), 1);
    }

    #[test]
    fn stock_must_fit_in_an_integer_column() {
        assert!(new_product("1", i64::from(i32::MAX)).validated().is_ok());

        let negative = new_product("1", -1).validated();
        let huge = new_product("1", i64::from(i32::MAX) + 1).validated();

        assert!(negative.is_err_and(|e| e.messages_for("stock").len() == 1));
        assert!(huge.is_err_and(|e| e.messages_for("stock").len() == 1));
    }

    #[test]
    fn every_problem_is_reported_together() {
        let mut product = new_product("-5", -1);
        product.name = String::new();

        let errors = product.validated().expect_err("invalid product");

        assert_eq!(errors.messages_for("name").len(), 1);
        assert_eq!(errors.messages_for("price").len(), 1);
        assert_eq!(errors.messages_for("stock").len(), 1);
    }

    #[test]
    fn update_only_checks_supplied_fields() -> Result<(), ValidationErrors> {
        let update = ProductUpdate {
            stock: Some(3),
            ..ProductUpdate::default()
        }
        .validated()?;

        assert_eq!(update.stock, Some(3));
        assert_eq!(update.name, None);
        assert_eq!(update.price, None);

        Ok(())
    }
}
