//! Read-mostly kitchen configuration: categories, products and the ordered
//! process rules each category's group items must pass through.

use crate::model::ids::{CategoryId, ProductId, RuleId, StockId};
use crate::model::serde_helpers::duration_ms;
use chrono::Duration;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Process rule not found: {0}")]
    RuleNotFound(RuleId),

    #[error("Category {category} already has a rule with order {order}")]
    DuplicateRuleOrder { category: CategoryId, order: u32 },

    #[error("Rule order must be at least 1, got {0}")]
    InvalidRuleOrder(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub allow_fractional_quantity: bool,
    pub needs_production: bool,
    /// Where finished tickets are printed when no further stage exists.
    pub printer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub allow_fractional_quantity: bool,
    pub needs_production: bool,
    pub printer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub size: Option<String>,
    pub stock_id: Option<StockId>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub size: Option<String>,
}

/// Stage `order` of a category's production line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRule {
    pub id: RuleId,
    pub name: String,
    pub order: u32,
    pub category_id: CategoryId,
    #[serde(with = "duration_ms")]
    pub ideal_time: Duration,
}

#[derive(Debug, Clone)]
pub struct NewRule {
    pub name: String,
    pub order: u32,
    pub category_id: CategoryId,
    pub ideal_time: Duration,
}

#[derive(Default)]
struct Inner {
    categories: DashMap<CategoryId, Category>,
    products: DashMap<ProductId, Product>,
    // Kept sorted by `order`; the entry lock makes the duplicate check atomic.
    rules: DashMap<CategoryId, Vec<ProcessRule>>,
    rule_category: DashMap<RuleId, CategoryId>,
    next_category: AtomicU32,
    next_product: AtomicU32,
    next_rule: AtomicU32,
}

/// Shared handle to the kitchen configuration. Cloning is cheap.
#[derive(Clone, Default)]
pub struct Catalog {
    inner: Arc<Inner>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&self, new: NewCategory) -> CategoryId {
        let id = CategoryId(self.inner.next_category.fetch_add(1, Ordering::SeqCst) + 1);
        self.inner.categories.insert(
            id,
            Category {
                id,
                name: new.name,
                allow_fractional_quantity: new.allow_fractional_quantity,
                needs_production: new.needs_production,
                printer: new.printer,
            },
        );
        id
    }

    pub fn add_product(&self, new: NewProduct) -> Result<ProductId, CatalogError> {
        self.category(new.category_id)?;
        let id = ProductId(self.inner.next_product.fetch_add(1, Ordering::SeqCst) + 1);
        self.inner.products.insert(
            id,
            Product {
                id,
                name: new.name,
                price: new.price,
                category_id: new.category_id,
                size: new.size,
                stock_id: None,
            },
        );
        Ok(id)
    }

    /// Makes item adds of `product` reserve from `stock`.
    pub fn link_stock(&self, product: ProductId, stock: StockId) -> Result<(), CatalogError> {
        let mut entry = self
            .inner
            .products
            .get_mut(&product)
            .ok_or(CatalogError::ProductNotFound(product))?;
        entry.stock_id = Some(stock);
        Ok(())
    }

    pub fn add_rule(&self, new: NewRule) -> Result<RuleId, CatalogError> {
        if new.order == 0 {
            return Err(CatalogError::InvalidRuleOrder(new.order));
        }
        self.category(new.category_id)?;

        let mut rules = self.inner.rules.entry(new.category_id).or_default();
        if rules.iter().any(|r| r.order == new.order) {
            return Err(CatalogError::DuplicateRuleOrder {
                category: new.category_id,
                order: new.order,
            });
        }

        let id = RuleId(self.inner.next_rule.fetch_add(1, Ordering::SeqCst) + 1);
        let position = rules.partition_point(|r| r.order < new.order);
        rules.insert(
            position,
            ProcessRule {
                id,
                name: new.name,
                order: new.order,
                category_id: new.category_id,
                ideal_time: new.ideal_time,
            },
        );
        self.inner.rule_category.insert(id, new.category_id);
        Ok(id)
    }

    pub fn category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.inner
            .categories
            .get(&id)
            .map(|c| c.clone())
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.inner
            .products
            .get(&id)
            .map(|p| p.clone())
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub fn rule(&self, id: RuleId) -> Result<ProcessRule, CatalogError> {
        let category = self
            .inner
            .rule_category
            .get(&id)
            .map(|c| *c)
            .ok_or(CatalogError::RuleNotFound(id))?;
        self.rules_for(category)
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(CatalogError::RuleNotFound(id))
    }

    /// Rules of `category`, ascending by order.
    pub fn rules_for(&self, category: CategoryId) -> Vec<ProcessRule> {
        self.inner
            .rules
            .get(&category)
            .map(|rules| rules.clone())
            .unwrap_or_default()
    }

    pub fn first_rule(&self, category: CategoryId) -> Option<ProcessRule> {
        self.rules_for(category).into_iter().next()
    }

    /// The stage that follows the one with order `after`. `after == 0` yields the first stage.
    pub fn next_rule(&self, category: CategoryId, after: u32) -> Option<ProcessRule> {
        self.rules_for(category)
            .into_iter()
            .find(|r| r.order > after)
    }

    /// Where a group item of `category` goes after finishing the stage with order `after`:
    /// the next stage's name, else the category printer, else `fallback`.
    pub fn destination_after(&self, category: CategoryId, after: u32, fallback: &str) -> String {
        if let Some(next) = self.next_rule(category, after) {
            return next.name;
        }
        self.category(category)
            .ok()
            .and_then(|c| c.printer)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pizza(catalog: &Catalog) -> CategoryId {
        catalog.add_category(NewCategory {
            name: "Pizza".into(),
            allow_fractional_quantity: true,
            needs_production: true,
            printer: Some("pass".into()),
        })
    }

    fn rule(category: CategoryId, name: &str, order: u32) -> NewRule {
        NewRule {
            name: name.into(),
            order,
            category_id: category,
            ideal_time: Duration::minutes(5),
        }
    }

    #[test]
    fn rules_are_kept_in_stage_order() {
        let catalog = Catalog::new();
        let cat = pizza(&catalog);
        catalog.add_rule(rule(cat, "oven", 2)).unwrap();
        catalog.add_rule(rule(cat, "prep", 1)).unwrap();
        catalog.add_rule(rule(cat, "boxing", 5)).unwrap();

        let names: Vec<_> = catalog.rules_for(cat).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["prep", "oven", "boxing"]);

        assert_eq!(catalog.first_rule(cat).unwrap().name, "prep");
        assert_eq!(catalog.next_rule(cat, 2).unwrap().name, "boxing");
        assert!(catalog.next_rule(cat, 5).is_none());

        let boxing = catalog.next_rule(cat, 2).unwrap();
        assert_eq!(catalog.rule(boxing.id).unwrap(), boxing);
    }

    #[test]
    fn duplicate_and_zero_orders_are_rejected() {
        let catalog = Catalog::new();
        let cat = pizza(&catalog);
        catalog.add_rule(rule(cat, "prep", 1)).unwrap();

        assert_eq!(
            catalog.add_rule(rule(cat, "again", 1)),
            Err(CatalogError::DuplicateRuleOrder {
                category: cat,
                order: 1
            })
        );
        assert_eq!(
            catalog.add_rule(rule(cat, "zero", 0)),
            Err(CatalogError::InvalidRuleOrder(0))
        );
        assert_eq!(
            catalog.add_rule(rule(CategoryId(99), "ghost", 1)),
            Err(CatalogError::CategoryNotFound(CategoryId(99)))
        );
    }

    #[test]
    fn destination_falls_back_to_printer() {
        let catalog = Catalog::new();
        let cat = pizza(&catalog);
        catalog.add_rule(rule(cat, "prep", 1)).unwrap();

        assert_eq!(catalog.destination_after(cat, 0, "kitchen"), "prep");
        assert_eq!(catalog.destination_after(cat, 1, "kitchen"), "pass");

        let drinks = catalog.add_category(NewCategory {
            name: "Drinks".into(),
            allow_fractional_quantity: false,
            needs_production: false,
            printer: None,
        });
        assert_eq!(catalog.destination_after(drinks, 0, "kitchen"), "kitchen");
    }

    #[test]
    fn products_link_to_stock() {
        let catalog = Catalog::new();
        let cat = pizza(&catalog);
        let id = catalog
            .add_product(NewProduct {
                name: "Margherita".into(),
                price: dec!(42.50),
                category_id: cat,
                size: Some("large".into()),
            })
            .unwrap();
        assert!(catalog.product(id).unwrap().stock_id.is_none());

        catalog.link_stock(id, StockId(3)).unwrap();
        assert_eq!(catalog.product(id).unwrap().stock_id, Some(StockId(3)));
        assert!(catalog.link_stock(ProductId(77), StockId(3)).is_err());
    }
}
