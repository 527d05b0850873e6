use crate::builder::{GroupRecommendation, RecommendationEntry};
use crate::candidates::{self, Candidate, MechanismGroup};
use crate::pipeline::{self, Rejection};
use crate::query::RecommendQuery;
use pestmix_catalog::Dataset;
use std::collections::HashMap;

/// Computes recommendations against a shared, read-only dataset
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    dataset: &'a Dataset,
}

impl<'a> Recommender<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Singles first (signature order), then pairs (`(i, j)` order).
    ///
    /// An empty result means nothing satisfies the constraints, including
    /// the case of an unknown crop.
    pub fn recommend(&self, query: &RecommendQuery) -> Vec<RecommendationEntry> {
        let pool = pipeline::narrow(&self.dataset.products, query);
        let groups = candidates::group_by_signature(pool);

        let mut rejected: HashMap<Rejection, usize> = HashMap::new();
        let mut entries = Vec::new();

        for candidate in candidates::enumerate(groups.len()) {
            let verdict = match candidate {
                Candidate::Single(i) => pipeline::check_single(&groups[i], query),
                Candidate::Pair(i, j) => pipeline::check_pair(
                    &groups[i],
                    &groups[j],
                    query,
                    &self.dataset.mechanisms,
                ),
            };
            match verdict {
                Some(reason) => *rejected.entry(reason).or_default() += 1,
                None => entries.push(self.build(candidate, &groups, query)),
            }
        }

        log::debug!(
            "crop '{}': {} groups, {} recommendations, rejected {:?}",
            query.crop,
            groups.len(),
            entries.len(),
            rejected
        );
        entries
    }

    fn build(
        &self,
        candidate: Candidate,
        groups: &[MechanismGroup<'_>],
        query: &RecommendQuery,
    ) -> RecommendationEntry {
        let index = &self.dataset.mechanisms;
        let pests = &query.target_pests;
        match candidate {
            Candidate::Single(i) => {
                RecommendationEntry::single(GroupRecommendation::build(&groups[i], pests, index))
            }
            Candidate::Pair(i, j) => RecommendationEntry::pair(
                GroupRecommendation::build(&groups[i], pests, index),
                GroupRecommendation::build(&groups[j], pests, index),
            ),
        }
    }
}

/// Convenience wrapper around [`Recommender::recommend`]
pub fn recommend(dataset: &Dataset, query: &RecommendQuery) -> Vec<RecommendationEntry> {
    Recommender::new(dataset).recommend(query)
}
