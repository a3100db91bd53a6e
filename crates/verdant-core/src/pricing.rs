//! # Pricing Heuristics
//!
//! Merchandising helpers used when setting catalog prices: demand-driven
//! price adjustment, competitor price analysis and price elasticity.
//!
//! ## Dynamic Price Factors
//! ```text
//! ┌──────────────────────┬──────────────────┬─────────┬──────────────────┐
//! │ Factor               │ Raises (×)       │ Neutral │ Lowers (×)       │
//! ├──────────────────────┼──────────────────┼─────────┼──────────────────┤
//! │ demand               │ high       1.15  │ medium  │ low        0.90  │
//! │ inventory            │ low        1.10  │ medium  │ high       0.95  │
//! │ seasonality          │ peak       1.20  │ normal  │ off-season 0.85  │
//! │ competitor activity  │ premium    1.10  │ stable  │ aggressive 0.90  │
//! │ customer segment     │ premium    1.15  │ balanced│ price-sens 0.90  │
//! └──────────────────────┴──────────────────┴─────────┴──────────────────┘
//!
//!   multipliers compound; price = round2(base × Π factors)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{round2, Money};

// =============================================================================
// Dynamic Pricing
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum DemandLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum InventoryLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Seasonality {
    OffSeason,
    #[default]
    Normal,
    Peak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum CompetitorActivity {
    #[default]
    Stable,
    Aggressive,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum CustomerSegment {
    PriceSensitive,
    #[default]
    Balanced,
    Premium,
}

/// Market conditions for one product. Defaults are all neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct DynamicPricingFactors {
    pub demand: DemandLevel,
    pub inventory: InventoryLevel,
    pub seasonality: Seasonality,
    pub competitor_activity: CompetitorActivity,
    pub customer_segment: CustomerSegment,
}

impl DynamicPricingFactors {
    /// (multiplier, reasoning) for each factor, in a fixed order.
    fn adjustments(&self) -> [(Decimal, &'static str); 5] {
        [
            match self.demand {
                DemandLevel::High => (Decimal::new(115, 2), "High demand (+15%)"),
                DemandLevel::Low => (Decimal::new(90, 2), "Low demand (-10%)"),
                DemandLevel::Medium => (Decimal::ONE, "Normal demand (0%)"),
            },
            match self.inventory {
                InventoryLevel::Low => (Decimal::new(110, 2), "Low inventory (+10%)"),
                InventoryLevel::High => (Decimal::new(95, 2), "High inventory (-5%)"),
                InventoryLevel::Medium => (Decimal::ONE, "Normal inventory (0%)"),
            },
            match self.seasonality {
                Seasonality::Peak => (Decimal::new(120, 2), "Peak season (+20%)"),
                Seasonality::OffSeason => (Decimal::new(85, 2), "Off-season (-15%)"),
                Seasonality::Normal => (Decimal::ONE, "Normal season (0%)"),
            },
            match self.competitor_activity {
                CompetitorActivity::Aggressive => (Decimal::new(90, 2), "Aggressive competition (-10%)"),
                CompetitorActivity::Premium => (Decimal::new(110, 2), "Premium competition (+10%)"),
                CompetitorActivity::Stable => (Decimal::ONE, "Stable competition (0%)"),
            },
            match self.customer_segment {
                CustomerSegment::Premium => (Decimal::new(115, 2), "Premium customers (+15%)"),
                CustomerSegment::PriceSensitive => (Decimal::new(90, 2), "Price-sensitive customers (-10%)"),
                CustomerSegment::Balanced => (Decimal::ONE, "Balanced customers (0%)"),
            },
        ]
    }
}

/// Result of [`dynamic_price`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DynamicPrice {
    #[serde(rename = "adjusted_price_cents")]
    pub adjusted_price: Money,

    /// `(multiplier - 1) × 100`, 2 places. `8.00` means +8%.
    #[ts(type = "string")]
    pub adjustment_percentage: Decimal,

    /// One line per factor, e.g. `"High demand (+15%)"`.
    pub reasoning: Vec<String>,
}

/// Adjusts a base price for current market conditions.
///
/// ```rust
/// use verdant_core::pricing::{dynamic_price, DemandLevel, DynamicPricingFactors};
/// use verdant_core::Money;
///
/// let factors = DynamicPricingFactors { demand: DemandLevel::High, ..Default::default() };
/// let price = dynamic_price(Money::from_cents(2499), &factors);
/// assert_eq!(price.adjusted_price.cents(), 2874);
/// assert_eq!(price.reasoning[0], "High demand (+15%)");
/// ```
pub fn dynamic_price(base_price: Money, factors: &DynamicPricingFactors) -> DynamicPrice {
    let adjustments = factors.adjustments();
    let multiplier: Decimal = adjustments.iter().map(|(m, _)| *m).product();

    DynamicPrice {
        adjusted_price: base_price.scale(multiplier),
        adjustment_percentage: round2((multiplier - Decimal::ONE) * Decimal::ONE_HUNDRED),
        reasoning: adjustments.iter().map(|(_, why)| why.to_string()).collect(),
    }
}

// =============================================================================
// Competitor Analysis
// =============================================================================

/// A competitor's listing for a comparable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompetitorPrice {
    pub competitor: String,
    pub product_name: String,

    #[serde(rename = "price_cents")]
    pub price: Money,

    #[serde(rename = "shipping_cents")]
    pub shipping: Money,
}

impl CompetitorPrice {
    pub fn new(competitor: impl Into<String>, product_name: impl Into<String>, price: Money, shipping: Money) -> Self {
        CompetitorPrice {
            competitor: competitor.into(),
            product_name: product_name.into(),
            price,
            shipping,
        }
    }

    /// What the customer actually pays: price + shipping.
    pub fn total_cost(&self) -> Money {
        self.price + self.shipping
    }
}

/// A positioning relative to the average competitor price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingStrategy {
    pub id: String,
    pub name: String,
    pub description: String,

    /// 1.0 = market average.
    #[ts(type = "string")]
    pub multiplier: Decimal,
}

impl PricingStrategy {
    fn new(id: &str, name: &str, description: &str, multiplier: Decimal) -> Self {
        PricingStrategy {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            multiplier,
        }
    }
}

/// The storefront's pricing strategies.
pub fn strategies() -> Vec<PricingStrategy> {
    vec![
        PricingStrategy::new(
            "penetration",
            "Market Penetration",
            "Price below competitors to gain market share quickly",
            Decimal::new(85, 2),
        ),
        PricingStrategy::new(
            "competitive",
            "Competitive Parity",
            "Match average competitor pricing",
            Decimal::ONE,
        ),
        PricingStrategy::new(
            "value",
            "Value Premium",
            "Slight premium justified by superior value",
            Decimal::new(115, 2),
        ),
        PricingStrategy::new(
            "premium",
            "Premium Positioning",
            "Highest price tier for luxury/professional market",
            Decimal::new(135, 2),
        ),
        PricingStrategy::new(
            "dynamic",
            "Dynamic Pricing",
            "Adjust prices based on demand, inventory, and competition",
            Decimal::new(110, 2),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StrategyPrice {
    pub strategy: PricingStrategy,

    #[serde(rename = "suggested_price_cents")]
    pub suggested_price: Money,
}

/// Summary of a competitor set. All zero when there are no competitors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompetitiveAnalysis {
    #[serde(rename = "average_price_cents")]
    pub average_price: Money,

    #[serde(rename = "average_shipping_cents")]
    pub average_shipping: Money,

    #[serde(rename = "average_total_cost_cents")]
    pub average_total_cost: Money,

    #[serde(rename = "min_price_cents")]
    pub min_price: Money,

    #[serde(rename = "max_price_cents")]
    pub max_price: Money,

    pub recommendations: Vec<StrategyPrice>,
}

/// Unrounded mean of a set of amounts. `None` for an empty set.
fn exact_average<I>(amounts: I) -> Option<Decimal>
where
    I: ExactSizeIterator<Item = Money>,
{
    let count = amounts.len();
    if count == 0 {
        return None;
    }
    let total: Decimal = amounts.map(|m| m.to_decimal()).sum();
    Some(total / Decimal::from(count))
}

/// Averages, price range and one suggested price per strategy.
///
/// Suggested prices scale the unrounded average, so they can differ by a
/// cent from scaling `average_price`.
pub fn analyze_competitors(competitors: &[CompetitorPrice], strategies: &[PricingStrategy]) -> CompetitiveAnalysis {
    let Some(average_price) = exact_average(competitors.iter().map(|c| c.price)) else {
        return CompetitiveAnalysis::default();
    };
    let average_shipping = exact_average(competitors.iter().map(|c| c.shipping)).unwrap_or_default();
    let average_total = exact_average(competitors.iter().map(CompetitorPrice::total_cost)).unwrap_or_default();

    let recommendations = strategies
        .iter()
        .map(|strategy| StrategyPrice {
            strategy: strategy.clone(),
            suggested_price: Money::from_decimal(average_price * strategy.multiplier),
        })
        .collect();

    CompetitiveAnalysis {
        average_price: Money::from_decimal(average_price),
        average_shipping: Money::from_decimal(average_shipping),
        average_total_cost: Money::from_decimal(average_total),
        min_price: competitors.iter().map(|c| c.price).min().unwrap_or_default(),
        max_price: competitors.iter().map(|c| c.price).max().unwrap_or_default(),
        recommendations,
    }
}

/// What the business is optimizing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum BusinessGoal {
    Growth,
    MarketShare,
    Profit,
    Premium,
}

impl BusinessGoal {
    /// Strategy ID this goal maps to.
    pub fn strategy_id(&self) -> &'static str {
        match self {
            BusinessGoal::Growth => "penetration",
            BusinessGoal::MarketShare => "competitive",
            BusinessGoal::Profit => "value",
            BusinessGoal::Premium => "premium",
        }
    }

    fn reasoning(&self) -> &'static str {
        match self {
            BusinessGoal::Growth => "Penetration pricing accelerates customer acquisition and market share growth",
            BusinessGoal::MarketShare => {
                "Competitive parity pricing maximizes market appeal while maintaining healthy margins"
            }
            BusinessGoal::Profit => "Value premium pricing optimizes profit margins while remaining competitive",
            BusinessGoal::Premium => "Premium positioning targets quality-conscious customers willing to pay more",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingRecommendation {
    pub strategy: PricingStrategy,

    #[serde(rename = "suggested_price_cents")]
    pub suggested_price: Money,

    pub reasoning: String,
}

/// Picks the strategy for a business goal and prices it against the
/// competitors. `None` without competitors or when the goal's strategy is
/// not in `strategies`.
pub fn recommend(
    competitors: &[CompetitorPrice],
    strategies: &[PricingStrategy],
    goal: BusinessGoal,
) -> Option<PricingRecommendation> {
    let analysis = analyze_competitors(competitors, strategies);
    analysis
        .recommendations
        .into_iter()
        .find(|r| r.strategy.id == goal.strategy_id())
        .map(|r| PricingRecommendation {
            strategy: r.strategy,
            suggested_price: r.suggested_price,
            reasoning: goal.reasoning().to_string(),
        })
}

// =============================================================================
// Price Elasticity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ElasticityClass {
    /// |e| > 1: demand reacts more than price.
    Elastic,
    /// |e| < 1.
    Inelastic,
    /// |e| = 1.
    Unit,
}

impl ElasticityClass {
    fn classify(elasticity: Decimal) -> Self {
        match elasticity.abs().cmp(&Decimal::ONE) {
            std::cmp::Ordering::Greater => ElasticityClass::Elastic,
            std::cmp::Ordering::Less => ElasticityClass::Inelastic,
            std::cmp::Ordering::Equal => ElasticityClass::Unit,
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            ElasticityClass::Elastic => "Elastic demand - customers are price sensitive",
            ElasticityClass::Inelastic => "Inelastic demand - customers are less price sensitive",
            ElasticityClass::Unit => "Unit elastic demand - balanced price sensitivity",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            ElasticityClass::Elastic => "Consider lower prices to increase total revenue",
            ElasticityClass::Inelastic => "Opportunity to increase prices without losing many customers",
            ElasticityClass::Unit => "Current pricing is optimal for revenue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceElasticity {
    /// %Δ demand / %Δ price, 2 places.
    #[ts(type = "string")]
    pub elasticity: Decimal,
    pub class: ElasticityClass,
}

/// Price elasticity of demand between two observations.
///
/// Classification uses the unrounded ratio.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use verdant_core::pricing::{price_elasticity, ElasticityClass};
///
/// // Price +10%, demand -20% → -2.0, elastic
/// let e = price_elasticity(Decimal::new(20, 0), Decimal::new(100, 0), Decimal::new(22, 0), Decimal::new(80, 0)).unwrap();
/// assert_eq!(e.elasticity, Decimal::new(-200, 2));
/// assert_eq!(e.class, ElasticityClass::Elastic);
/// ```
pub fn price_elasticity(
    base_price: Decimal,
    base_demand: Decimal,
    new_price: Decimal,
    new_demand: Decimal,
) -> Result<PriceElasticity, ValidationError> {
    let price_change = percent_change(base_price, new_price, "base_price")?;
    let demand_change = percent_change(base_demand, new_demand, "base_demand")?;

    let elasticity = demand_change
        .checked_div(price_change)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "new_price".to_string(),
            reason: "price must change to measure elasticity".to_string(),
        })?;

    Ok(PriceElasticity {
        elasticity: round2(elasticity),
        class: ElasticityClass::classify(elasticity),
    })
}

fn percent_change(from: Decimal, to: Decimal, field: &str) -> Result<Decimal, ValidationError> {
    (to - from)
        .checked_div(from)
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
        .ok_or_else(|| ValidationError::MustBePositive {
            field: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn competitors() -> Vec<CompetitorPrice> {
        vec![
            CompetitorPrice::new("Amazon", "Plant Food", Money::from_cents(1599), Money::from_cents(699)),
            CompetitorPrice::new("Home Depot", "Liquid Turf", Money::from_cents(1899), Money::from_cents(899)),
            CompetitorPrice::new("Lowes", "All-Purpose", Money::from_cents(1299), Money::from_cents(799)),
            CompetitorPrice::new("Neptune's Harvest", "Fish & Seaweed", Money::from_cents(2499), Money::from_cents(999)),
            CompetitorPrice::new("Fox Farm", "Big Bloom", Money::from_cents(2299), Money::from_cents(899)),
        ]
    }

    #[test]
    fn test_neutral_factors_leave_price_alone() {
        let price = dynamic_price(Money::from_cents(1999), &DynamicPricingFactors::default());
        assert_eq!(price.adjusted_price.cents(), 1999);
        assert_eq!(price.adjustment_percentage, Decimal::ZERO);
        assert_eq!(
            price.reasoning,
            vec![
                "Normal demand (0%)",
                "Normal inventory (0%)",
                "Normal season (0%)",
                "Stable competition (0%)",
                "Balanced customers (0%)",
            ]
        );
    }

    #[test]
    fn test_factors_compound() {
        let factors = DynamicPricingFactors {
            seasonality: Seasonality::Peak,
            competitor_activity: CompetitorActivity::Aggressive,
            ..Default::default()
        };
        // 1.20 × 0.90 = 1.08
        let price = dynamic_price(Money::from_cents(2000), &factors);
        assert_eq!(price.adjusted_price.cents(), 2160);
        assert_eq!(price.adjustment_percentage, d("8.00"));
        assert_eq!(price.reasoning[2], "Peak season (+20%)");
        assert_eq!(price.reasoning[3], "Aggressive competition (-10%)");
    }

    #[test]
    fn test_factors_deserialize_kebab_case() {
        let factors: DynamicPricingFactors =
            serde_json::from_str(r#"{"seasonality":"off-season","customer_segment":"price-sensitive"}"#).unwrap();
        assert_eq!(factors.seasonality, Seasonality::OffSeason);
        assert_eq!(factors.customer_segment, CustomerSegment::PriceSensitive);
        assert_eq!(factors.demand, DemandLevel::Medium);
    }

    #[test]
    fn test_competitor_analysis() {
        let analysis = analyze_competitors(&competitors(), &strategies());
        // (15.99 + 18.99 + 12.99 + 24.99 + 22.99) / 5 = 19.19
        assert_eq!(analysis.average_price.cents(), 1919);
        // (6.99 + 8.99 + 7.99 + 9.99 + 8.99) / 5 = 8.59
        assert_eq!(analysis.average_shipping.cents(), 859);
        assert_eq!(analysis.average_total_cost.cents(), 2778);
        assert_eq!(analysis.min_price.cents(), 1299);
        assert_eq!(analysis.max_price.cents(), 2499);

        let suggested: Vec<(&str, i64)> = analysis
            .recommendations
            .iter()
            .map(|r| (r.strategy.id.as_str(), r.suggested_price.cents()))
            .collect();
        assert_eq!(
            suggested,
            vec![
                ("penetration", 1631),
                ("competitive", 1919),
                ("value", 2207),
                ("premium", 2591),
                ("dynamic", 2111),
            ]
        );
    }

    #[test]
    fn test_empty_competitor_set() {
        let analysis = analyze_competitors(&[], &strategies());
        assert_eq!(analysis, CompetitiveAnalysis::default());
        assert!(recommend(&[], &strategies(), BusinessGoal::Growth).is_none());
    }

    #[test]
    fn test_recommendation_by_goal() {
        let growth = recommend(&competitors(), &strategies(), BusinessGoal::Growth).unwrap();
        assert_eq!(growth.strategy.id, "penetration");
        assert_eq!(growth.suggested_price.cents(), 1631);

        let share = recommend(&competitors(), &strategies(), BusinessGoal::MarketShare).unwrap();
        assert_eq!(share.strategy.id, "competitive");

        let profit = recommend(&competitors(), &strategies(), BusinessGoal::Profit).unwrap();
        assert_eq!(profit.strategy.id, "value");
        assert!(profit.reasoning.starts_with("Value premium"));
    }

    #[test]
    fn test_elasticity_classes() {
        let inelastic = price_elasticity(d("10"), d("100"), d("12"), d("95")).unwrap();
        // demand -5% / price +20% = -0.25
        assert_eq!(inelastic.elasticity, d("-0.25"));
        assert_eq!(inelastic.class, ElasticityClass::Inelastic);

        let unit = price_elasticity(d("10"), d("100"), d("11"), d("90")).unwrap();
        assert_eq!(unit.class, ElasticityClass::Unit);
        assert_eq!(unit.class.recommendation(), "Current pricing is optimal for revenue");
    }

    #[test]
    fn test_elasticity_rejects_degenerate_inputs() {
        assert!(price_elasticity(Decimal::ZERO, d("100"), d("10"), d("90")).is_err());
        assert!(price_elasticity(d("10"), Decimal::ZERO, d("12"), d("90")).is_err());
        assert!(price_elasticity(d("10"), d("100"), d("10"), d("90")).is_err());
    }
}
