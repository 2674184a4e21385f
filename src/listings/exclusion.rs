use crate::config::SearchSettings;
use crate::listings::models::Listing;

/// Decides which upstream listings the site never shows: anything outside the
/// residential/condo classes, lease or rental offerings, and sale prices low
/// enough to really be monthly rents.
///
/// Every code path that produces listings goes through the same `ExclusionRules`
/// value, so per-page results and reconciled totals cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionRules {
    allowed_classes: Vec<String>,
    excluded_type_terms: Vec<String>,
    min_sale_price: f64,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::from_settings(&SearchSettings::default())
    }
}

impl ExclusionRules {
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self {
            allowed_classes: settings
                .allowed_classes
                .iter()
                .map(|c| c.to_lowercase())
                .collect(),
            excluded_type_terms: settings
                .excluded_type_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            min_sale_price: settings.min_sale_price,
        }
    }

    /// `true` when the listing must be dropped.
    pub fn excludes(&self, listing: &Listing) -> bool {
        let class = listing.class.as_deref().unwrap_or("").to_lowercase();
        if !self.allowed_classes.contains(&class) {
            return true;
        }

        let kind = listing.type_or_class().to_lowercase();
        if self.excluded_type_terms.iter().any(|t| kind.contains(t.as_str())) {
            return true;
        }

        matches!(listing.list_price, Some(p) if p > 0.0 && p < self.min_sale_price)
    }

    pub fn keeps(&self, listing: &Listing) -> bool {
        !self.excludes(listing)
    }

    /// Splits off the eligible listings, returning them with the number removed.
    pub fn retain(&self, listings: Vec<Listing>) -> (Vec<Listing>, usize) {
        let before = listings.len();
        let kept: Vec<Listing> = listings.into_iter().filter(|l| self.keeps(l)).collect();
        let removed = before - kept.len();
        (kept, removed)
    }
}
