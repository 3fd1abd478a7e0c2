use crate::catalog::RecipeDef;
use crate::effects::EffectiveStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// A machine's per-second consumption and production at full utilization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaxRates {
    pub inputs: BTreeMap<String, f64>,
    pub outputs: BTreeMap<String, f64>,
}

impl MaxRates {
    /// Rates for `recipe` crafted at `stats`. Repeated item names accumulate.
    pub fn compute(recipe: &RecipeDef, stats: EffectiveStats) -> Self {
        let cycles = stats.speed / recipe.crafting_time;
        let mut rates = MaxRates::default();
        for ingredient in &recipe.ingredients {
            *rates.inputs.entry(ingredient.name.clone()).or_default() += ingredient.amount * cycles;
        }
        for product in &recipe.products {
            let rate = product.amount * cycles * stats.productivity * product.probability.unwrap_or(1.0);
            *rates.outputs.entry(product.name.clone()).or_default() += rate;
        }
        rates
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}
