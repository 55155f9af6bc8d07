pub mod constraints;
pub mod mode;
pub mod relevance;

pub use constraints::{ConstraintExtractor, ExtractedConstraints, Vocabulary};
pub use mode::{ParseModeError, RetrievalMode, SearchFilters, SearchPlan, SearchToggle};
pub use relevance::{DEFAULT_RELEVANCE_THRESHOLD, Product, RankedRecord, Relevance, ResultSet};
