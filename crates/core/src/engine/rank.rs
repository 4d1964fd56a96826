use crate::domain::scores::Symbol;
use crate::engine::tier::Tier;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub symbol: Symbol,
    pub tier: Tier,
    pub total_score: f64,
}

/// Orders symbols by (tier ascending, total score descending). Ties keep
/// their input order.
pub fn rank(entries: &[RankEntry]) -> Vec<Symbol> {
    let mut ordered: Vec<&RankEntry> = entries.iter().collect();
    sort_ranked(&mut ordered, |e| (e.tier, e.total_score));
    ordered.into_iter().map(|e| e.symbol.clone()).collect()
}

/// Stable in-place sort of anything carrying a tier and a total score.
pub fn sort_ranked<T>(items: &mut [T], key: impl Fn(&T) -> (Tier, f64)) {
    // slice::sort_by is stable, which the tie rule depends on.
    items.sort_by(|a, b| {
        let (a_tier, a_total) = key(a);
        let (b_tier, b_total) = key(b);
        a_tier.cmp(&b_tier).then_with(|| {
            b_total
                .partial_cmp(&a_total)
                .unwrap_or(Ordering::Equal)
        })
    });
}
