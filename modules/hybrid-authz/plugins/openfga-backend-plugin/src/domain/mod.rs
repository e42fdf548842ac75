mod client;
pub mod service;
pub mod wire;

pub use service::OpenFgaClient;
pub use wire::reference_model;
