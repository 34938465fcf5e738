use crate::db::Database;
use crate::ranking::PostRanker;
use crate::similarity::{MatchConfig, SimilarityMatcher};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ranker: PostRanker,
}

impl AppState {
    pub fn new(db: Database, match_config: MatchConfig) -> Self {
        Self {
            db,
            ranker: PostRanker::new(SimilarityMatcher::new(match_config)),
        }
    }
}
