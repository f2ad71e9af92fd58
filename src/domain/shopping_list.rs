//! Consolidated ingredient list built from the recipes in a shopping cart.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use thiserror::Error;

/// Grouping key for cart lines.
///
/// Two ingredients are merged only when both the name and the measurement
/// unit match, so `salt, g` and `salt, pinch` stay on separate rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IngredientKey {
    pub name: String,
    pub measurement_unit: String,
}

impl IngredientKey {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
        }
    }
}

/// One quantity row of a recipe that sits in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub key: IngredientKey,
    pub amount: f64,
}

impl CartLine {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: f64) -> Self {
        Self {
            key: IngredientKey::new(name, measurement_unit),
            amount,
        }
    }
}

/// One consolidated row of the exported list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListRow {
    pub name: String,
    pub total: Decimal,
    pub measurement_unit: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ShoppingListError {
    #[error("amount {amount} of `{name}` is not a finite number")]
    InvalidAmount { name: String, amount: f64 },
}

/// Totals per [`IngredientKey`].
///
/// Amounts are added as decimals, which keeps every total exact and
/// independent of the order the cart lines arrive in. Rows come out ordered
/// by name, then unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingList {
    totals: BTreeMap<IngredientKey, Decimal>,
}

impl ShoppingList {
    pub fn aggregate<I>(lines: I) -> Result<Self, ShoppingListError>
    where
        I: IntoIterator<Item = CartLine>,
    {
        let mut totals: BTreeMap<IngredientKey, Decimal> = BTreeMap::new();

        for line in lines {
            let amount = Decimal::from_f64(line.amount).ok_or_else(|| {
                ShoppingListError::InvalidAmount {
                    name: line.key.name.clone(),
                    amount: line.amount,
                }
            })?;
            *totals.entry(line.key).or_default() += amount;
        }

        Ok(Self { totals })
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Total for `name` measured in `measurement_unit`, if the cart needs any.
    pub fn total(&self, name: &str, measurement_unit: &str) -> Option<Decimal> {
        self.totals
            .get(&IngredientKey::new(name, measurement_unit))
            .copied()
    }

    pub fn into_rows(self) -> impl Iterator<Item = ShoppingListRow> {
        self.totals.into_iter().map(|(key, total)| ShoppingListRow {
            name: key.name,
            total: total.normalize(),
            measurement_unit: key.measurement_unit,
        })
    }
}
