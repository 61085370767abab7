use crate::{
    asset_id::AssetId,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Domain representation of a multi-asset value held by an account
#[serde_with::serde_as]
#[derive(Clone, PartialEq, Debug, Eq, Deserialize, Serialize, Default)]
pub struct Values {
    #[serde_as(as = "HashMap<serde_with::json::JsonString, _>")]
    values: HashMap<AssetId, u64>,
}

impl Values {
    /// Try to remove the `other` `Values` from `self`
    pub fn try_subtract(&self, other: &Values) -> Result<Values> {
        let mut remainder = self.values.clone();
        for (asset, amount) in other.as_iter() {
            let available = remainder
                .remove(asset)
                .ok_or_else(|| Error::InsufficientAmountOf(asset.clone()))?;
            let left = available
                .checked_sub(*amount)
                .ok_or_else(|| Error::InsufficientAmountOf(asset.clone()))?;
            // exhausted entries are dropped rather than kept at zero
            if left > 0 {
                remainder.insert(asset.clone(), left);
            }
        }
        Ok(Values { values: remainder })
    }

    /// Add one value to the `self`
    pub fn add_one_value(&mut self, asset: &AssetId, amount: u64) {
        add_to_map(&mut self.values, asset.clone(), amount)
    }

    /// Add a `Values` to the `self`
    pub fn add_values(&mut self, values: &Values) {
        for (asset, amt) in values.as_iter() {
            self.add_one_value(asset, *amt)
        }
    }

    /// Convert the `Values` to an iterator of [`AssetId`]s and amounts
    pub fn as_iter(&self) -> std::collections::hash_map::Iter<'_, AssetId, u64> {
        self.values.iter()
    }

    /// Get the amount for a given [`AssetId`]
    pub fn get(&self, asset: &AssetId) -> Option<u64> {
        self.values.get(asset).copied()
    }

    /// Get the number of [`AssetId`]s in the `Values`
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the `Values` is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn add_to_map(h_map: &mut HashMap<AssetId, u64>, asset: AssetId, amount: u64) {
    let mut new_total = amount;
    if let Some(total) = h_map.get(&asset) {
        new_total += total;
    }
    h_map.insert(asset, new_total);
}
