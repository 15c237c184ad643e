// Classification — the two evaluators, their shared trait, split and metrics.

pub mod evaluate;
pub mod knn;
pub mod logreg;
pub mod metrics;
pub mod split;
pub mod traits;
