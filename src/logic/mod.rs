//! Boolean clue logic and the candidate-elimination engine

pub mod assignment;
pub mod engine;
pub mod expression;
pub mod layout;
pub mod permutations;

pub use assignment::{Assignment, VarIter};
pub use engine::{EngineOptions, LogicEngine, VariableStatus};
pub use expression::{Clause, Expression, Literal, Operator};
pub use layout::{variables_needed, ItemRef, LayoutStatistics, VariableLayout};
pub use permutations::{factorial, PermutationCache};
