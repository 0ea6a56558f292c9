pub mod batch;
pub mod cli;
pub mod config;
pub mod detectors;
pub mod diagnostics;
pub mod domain_utils;
pub mod export;
pub mod fetch;
pub mod logger;
pub mod net_utils;
pub mod precheck;
pub mod resolver;
pub mod url_utils;

pub use detectors::{LogoMatch, MatchKind};
pub use resolver::{DomainResolver, ResolutionResult};
