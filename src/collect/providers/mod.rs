pub mod code_host;
pub mod microblog;
pub mod professional_network;

pub use code_host::CodeHostCollector;
pub use microblog::MicroblogCollector;
pub use professional_network::ProfessionalNetworkCollector;
