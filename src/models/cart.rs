use crate::models::FoodItem;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Quantities keyed by food item id, stored on the user document as `cartData`
#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct Cart(BTreeMap<String, i64>);

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, item_id: &str) -> i64 {
        self.0.get(item_id).copied().unwrap_or(0)
    }

    /// Absent items start at 1, existing ones go up by one
    pub fn add_item(&mut self, item_id: &str) {
        let quantity = self.0.entry(item_id.to_string()).or_insert(0);
        *quantity = quantity.saturating_add(1);
    }

    /// Decrements only a positive quantity. Returns whether the cart changed.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        match self.0.get_mut(item_id) {
            Some(quantity) if *quantity > 0 => {
                *quantity = quantity.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Optimistic client-side decrement: no floor, the entry can go negative.
    pub fn decrement_unguarded(&mut self, item_id: &str) {
        let quantity = self.0.entry(item_id.to_string()).or_insert(0);
        *quantity = quantity.saturating_sub(1);
    }

    /// Sum of `price * quantity` for positive quantities found in `food_list`.
    pub fn total_amount(&self, food_list: &[FoodItem]) -> f64 {
        self.0
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .filter_map(|(item_id, quantity)| {
                food_list
                    .iter()
                    .find(|food| food.id == *item_id)
                    .map(|food| food.price * *quantity as f64)
            })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, i64)> for Cart {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Cart(iter.into_iter().collect())
    }
}

/// Quantity written by another service: integers of any width, or a whole-number double
struct Quantity(i64);

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct QuantityVisitor;

        impl<'de> Visitor<'de> for QuantityVisitor {
            type Value = Quantity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a whole-number quantity")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
                Ok(Quantity(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
                i64::try_from(v)
                    .map(Quantity)
                    .map_err(|_| E::custom(format!("quantity {} out of range", v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
                if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                    Ok(Quantity(v as i64))
                } else {
                    Err(E::custom(format!("quantity {} is not a whole number", v)))
                }
            }
        }

        deserializer.deserialize_any(QuantityVisitor)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CartVisitor;

        impl<'de> Visitor<'de> for CartVisitor {
            type Value = Cart;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of item id to quantity")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Cart, A::Error> {
                let mut items = BTreeMap::new();
                while let Some((item_id, Quantity(quantity))) = access.next_entry::<String, Quantity>()? {
                    items.insert(item_id, quantity);
                }
                Ok(Cart(items))
            }
        }

        deserializer.deserialize_map(CartVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(id: &str, price: f64) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: format!("Food {}", id),
            description: String::new(),
            price,
            image: String::new(),
            category: "Salad".to_string(),
        }
    }

    #[test]
    fn test_add_new_item_starts_at_one() {
        let mut cart = Cart::new();
        cart.add_item("pasta");
        assert_eq!(cart.quantity("pasta"), 1);
    }

    #[test]
    fn test_add_existing_item_increments() {
        let mut cart = Cart::new();
        cart.add_item("pasta");
        cart.add_item("pasta");
        cart.add_item("pasta");
        assert_eq!(cart.quantity("pasta"), 3);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_after_zero_goes_to_one() {
        let mut cart: Cart = [("soup".to_string(), 0)].into_iter().collect();
        cart.add_item("soup");
        assert_eq!(cart.quantity("soup"), 1);
    }

    #[test]
    fn test_remove_stops_at_zero() {
        let mut cart = Cart::new();
        cart.add_item("rolls");

        assert!(cart.remove_item("rolls"));
        assert_eq!(cart.quantity("rolls"), 0);

        assert!(!cart.remove_item("rolls"));
        assert_eq!(cart.quantity("rolls"), 0);
    }

    #[test]
    fn test_remove_absent_item_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.remove_item("cake"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unguarded_decrement_can_go_negative() {
        let mut cart = Cart::new();
        cart.decrement_unguarded("cake");
        assert_eq!(cart.quantity("cake"), -1);
    }

    #[test]
    fn test_total_amount_skips_unknown_and_non_positive() {
        let food_list = vec![food("a", 12.0), food("b", 5.5), food("c", 100.0)];
        let cart: Cart = [
            ("a".to_string(), 2),
            ("b".to_string(), 1),
            ("c".to_string(), 0),
            ("gone".to_string(), 4),
            ("d".to_string(), -2),
        ]
        .into_iter()
        .collect();

        assert_eq!(cart.total_amount(&food_list), 29.5);
    }

    #[test]
    fn test_quantities_saturate_at_bounds() {
        let mut cart: Cart = [("max".to_string(), i64::MAX), ("min".to_string(), i64::MIN)]
            .into_iter()
            .collect();

        cart.add_item("max");
        cart.decrement_unguarded("min");

        assert_eq!(cart.quantity("max"), i64::MAX);
        assert_eq!(cart.quantity("min"), i64::MIN);
    }

    #[test]
    fn test_whole_number_doubles_are_accepted() {
        let cart: Cart = serde_json::from_value(serde_json::json!({ "a": 2.0, "b": 3 })).unwrap();
        assert_eq!(cart.quantity("a"), 2);
        assert_eq!(cart.quantity("b"), 3);

        assert!(serde_json::from_value::<Cart>(serde_json::json!({ "a": 1.5 })).is_err());
        assert!(serde_json::from_value::<Cart>(serde_json::json!({ "a": "2" })).is_err());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut cart = Cart::new();
        cart.add_item("x1");
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json, serde_json::json!({ "x1": 1 }));

        let back: Cart = serde_json::from_value(serde_json::json!({ "y": 4 })).unwrap();
        assert_eq!(back.quantity("y"), 4);
    }
}
