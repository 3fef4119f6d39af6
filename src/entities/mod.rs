//! Directory entities and their query-string filters

pub mod macros;
pub mod opportunity;
pub mod organization;
pub mod speaker;

pub use opportunity::{EventFormat, Opportunity, OpportunityFilter, OpportunityQuery};
pub use organization::{Organization, OrganizationFilter, OrganizationQuery};
pub use speaker::{Speaker, SpeakerFilter, SpeakerQuery};
