pub mod neighbors;
pub mod parents;
pub mod records;
pub mod reverse;
pub mod services;
pub mod spf;
pub mod subdomains;

pub use neighbors::NeighborStrategy;
pub use parents::ParentStrategy;
pub use records::RecordStrategy;
pub use reverse::ReverseStrategy;
pub use services::ServiceStrategy;
pub use spf::SpfStrategy;
pub use subdomains::SubdomainStrategy;
