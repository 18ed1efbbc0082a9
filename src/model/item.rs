use crate::model::catalog::Product;
use crate::model::ids::{CategoryId, ItemId, ProductId, StockId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Extra product attached to a line item (e.g. a topping). Its `quantity` is
/// absolute for the line; it is not multiplied by the item's quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub stock_id: Option<StockId>,
}

impl AdditionalItem {
    pub fn from_product(product: &Product, quantity: Decimal) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
            stock_id: product.stock_id,
        }
    }

    pub fn total(&self) -> Decimal {
        self.price * self.quantity
    }
}

/// One product line inside a group item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub total_price: Decimal,
    pub observation: Option<String>,
    pub additional_items: Vec<AdditionalItem>,
    pub removed_ingredients: Vec<String>,
    pub stock_id: Option<StockId>,
    pub category_id: CategoryId,
    pub size: Option<String>,
}

impl Item {
    pub fn from_product(
        id: ItemId,
        product: &Product,
        quantity: Decimal,
        observation: Option<String>,
    ) -> Self {
        let mut item = Self {
            id,
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
            total_price: Decimal::ZERO,
            observation,
            additional_items: Vec::new(),
            removed_ingredients: Vec::new(),
            stock_id: product.stock_id,
            category_id: product.category_id,
            size: product.size.clone(),
        };
        item.calculate_total();
        item
    }

    /// `price × quantity` plus every additional item's total. Writes back `total_price`.
    pub fn calculate_total(&mut self) -> Decimal {
        let additional: Decimal = self.additional_items.iter().map(AdditionalItem::total).sum();
        self.total_price = self.price * self.quantity + additional;
        self.total_price
    }

    /// Same product added twice accumulates into one entry.
    pub fn add_additional(&mut self, additional: AdditionalItem) {
        match self
            .additional_items
            .iter_mut()
            .find(|a| a.product_id == additional.product_id)
        {
            Some(existing) => existing.quantity += additional.quantity,
            None => self.additional_items.push(additional),
        }
        self.calculate_total();
    }

    pub fn remove_additional(&mut self, product_id: ProductId) -> Option<AdditionalItem> {
        let position = self
            .additional_items
            .iter()
            .position(|a| a.product_id == product_id)?;
        let removed = self.additional_items.remove(position);
        self.calculate_total();
        Some(removed)
    }

    /// Returns `false` if the ingredient was already listed.
    pub fn add_removed_ingredient(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.removed_ingredients.iter().any(|n| n == name) {
            return false;
        }
        self.removed_ingredients.push(name.to_string());
        true
    }

    pub fn remove_removed_ingredient(&mut self, name: &str) -> bool {
        let before = self.removed_ingredients.len();
        self.removed_ingredients.retain(|n| n != name.trim());
        before != self.removed_ingredients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: u32, price: Decimal) -> Product {
        Product {
            id: ProductId(id),
            name: format!("product {id}"),
            price,
            category_id: CategoryId(1),
            size: None,
            stock_id: None,
        }
    }

    #[test]
    fn additional_items_add_to_total() {
        let mut item = Item::from_product(ItemId(1), &product(1, dec!(10)), dec!(2), None);
        assert_eq!(item.total_price, dec!(20));

        item.add_additional(AdditionalItem::from_product(&product(2, dec!(1.5)), dec!(2)));
        item.add_additional(AdditionalItem::from_product(&product(2, dec!(1.5)), dec!(1)));
        assert_eq!(item.additional_items.len(), 1);
        assert_eq!(item.total_price, dec!(24.5));

        let removed = item.remove_additional(ProductId(2)).unwrap();
        assert_eq!(removed.quantity, dec!(3));
        assert_eq!(item.total_price, dec!(20));
        assert!(item.remove_additional(ProductId(2)).is_none());
    }

    #[test]
    fn removed_ingredients_ignore_duplicates() {
        let mut item = Item::from_product(ItemId(1), &product(1, dec!(10)), dec!(1), None);
        assert!(item.add_removed_ingredient("onion"));
        assert!(!item.add_removed_ingredient(" onion "));
        assert!(!item.add_removed_ingredient(""));
        assert_eq!(item.removed_ingredients, vec!["onion"]);

        assert!(item.remove_removed_ingredient("onion"));
        assert!(!item.remove_removed_ingredient("onion"));
    }
}
