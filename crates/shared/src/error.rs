use thiserror::Error;

/// A listing response that parsed as JSON but breaks the page contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("page reports {count} matches but carries {results} results")]
    CountBelowResults { count: u64, results: usize },
    #[error("page strip has {active} active entries, expected at most one")]
    MultipleActiveLinks { active: usize },
}
