use super::WeightedConfig;

/// Order configs by ascending weight.
///
/// The sort is stable, so configs of equal weight keep their fetch order.
pub fn sort_by_weight(mut configs: Vec<WeightedConfig>) -> Vec<WeightedConfig> {
    configs.sort_by_key(|c| c.weight);
    configs
}
