pub mod candidate;
pub mod master;
pub mod matcher;
pub mod resolver;

pub use candidate::MigrantCandidate;
pub use master::{MasterRow, OriginFields, join_master};
pub use matcher::{MatchResult, MatchTrace, MatcherConfig, MigrantMatcher};
pub use resolver::{GeoResolver, ResolveResult, ResolveTrace, ResolverConfig, haversine};

use anyhow::Result;
use extract::EnrichedRecord;
use index::GazetteerIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Matches before false-positive suppression.
    pub raw: Vec<MigrantCandidate>,
    /// One best-supported origin per migrating inscription.
    pub migrants: Vec<MigrantCandidate>,
    pub trace: SearchTrace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTrace {
    pub matching: MatchTrace,
    pub resolving: ResolveTrace,
}

/// Matcher and resolver run back to back over one gazetteer index.
#[derive(Debug, Clone, Default)]
pub struct MigrantSearch {
    matcher: MigrantMatcher,
    resolver: GeoResolver,
}

impl MigrantSearch {
    pub fn new(matcher: MigrantMatcher, resolver: GeoResolver) -> Self {
        Self { matcher, resolver }
    }

    pub fn search(&self, records: &[EnrichedRecord], index: &GazetteerIndex) -> Result<SearchResult> {
        // Step 1: Cross-match funerary texts against all stems
        let matched = self.matcher.find_candidates(records, index)?;

        // Step 2: Measure and keep the closest credible origin
        let resolved = self.resolver.resolve(matched.candidates);

        Ok(SearchResult {
            raw: matched.raw,
            migrants: resolved.migrants,
            trace: SearchTrace {
                matching: matched.trace,
                resolving: resolved.trace,
            },
        })
    }
}
