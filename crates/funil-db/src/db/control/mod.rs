pub mod admin;
pub mod api_key;
pub mod plan;
pub mod profile;
pub mod tenant;

pub use admin::AdminRepository;
pub use api_key::ApiKeyRepository;
pub use plan::PlanRepository;
pub use profile::ProfileRepository;
pub use tenant::TenantRepository;
