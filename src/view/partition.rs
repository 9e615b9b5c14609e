use crate::models::Recommendation;
use crate::view::render::Tab;

/// Fetched recommendations split by approval flag.
///
/// Every item lands in exactly one side; order within each side follows the
/// fetched order.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<'a> {
    pub pending: Vec<&'a Recommendation>,
    pub approved: Vec<&'a Recommendation>,
}

impl<'a> Partition<'a> {
    pub fn new(items: &'a [Recommendation]) -> Self {
        let (approved, pending) = items.iter().partition(|rec| rec.is_approved());
        Self { pending, approved }
    }

    pub fn tab(&self, tab: Tab) -> &[&'a Recommendation] {
        match tab {
            Tab::Pending => &self.pending,
            Tab::Approved => &self.approved,
        }
    }

    pub fn count(&self, tab: Tab) -> usize {
        self.tab(tab).len()
    }
}
