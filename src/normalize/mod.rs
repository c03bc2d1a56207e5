//! Schedule normalizer: raw fetched records to canonical company schedules,
//! including id composition and color resolution.

pub mod color;
pub mod normalizer;

pub use color::{lookup_alias, normalize_company_name, resolve_color, CompanyAlias};
pub use normalizer::*;
