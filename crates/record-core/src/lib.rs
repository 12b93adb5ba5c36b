// # record-core
//
// Core library for the declarative DNS record resource.
//
// ## Architecture Overview
//
// - **RecordResource**: Create/Read/Update/Delete lifecycle for one record,
//   plus schema-version migration of persisted state
// - **DnsClient**: Trait for the remote DNS service the resource drives
// - **ResourceState / InstanceState**: Typed and flat views of record state
// - **ClientRegistry**: Plugin-based registry for DNS clients
//
// ## Design Principles
//
// 1. **Thin Adapter**: Every operation is a field mapping plus one remote call
// 2. **Injected Client**: The client handle is passed in, never global
// 3. **Typed Boundary**: Flat state is parsed once into typed structs
// 4. **No Caching**: Zone IDs are resolved from the domain on every call

pub mod config;
pub mod error;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod state;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::ClientConfig;
pub use error::{ClientError, Error, Result};
pub use registry::ClientRegistry;
pub use resource::{RecordDescriptor, RecordResource};
pub use schema::{ResourceSchema, SCHEMA_VERSION};
pub use state::{InstanceState, ResourceState, StateFile};
pub use traits::{DnsClient, DnsClientFactory, DnsRecord, RecordFilter};
pub use validation::RecordType;
