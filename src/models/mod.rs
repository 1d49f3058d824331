mod analysis;
mod holding;
mod portfolio;
mod user;
pub mod recommendation;
pub mod risk;
pub mod sector;

pub use analysis::{Analysis, AnalysisStatus};
pub use holding::{CreateHolding, Holding, Market};
pub use portfolio::{CreatePortfolio, Portfolio};
pub use recommendation::{RecommendationPayload, RecommendedAction};
pub use risk::{RiskLevel, RiskMetrics};
pub use sector::{IssueDirection, SectorAnalysis, SectorIssue};
pub use user::{LoginRequest, RegisterRequest, TokenResponse, User, UserProfile};
