// aoscx-api: Async Rust client for the ArubaOS-CX switch REST API
//
// A `Session` logs into a switch and carries its cookie and CSRF token.
// Resources (ports, LAGs, VLANs) implement the `Resource` CRUD contract on
// top of it, resolving the VLANs they reference before every write.

pub mod auth;
pub mod error;
pub mod resolver;
pub mod resource;
pub mod resources;
pub mod session;
pub mod transport;
pub mod vlan_config;

pub use auth::{fetch_latest_api_version, normalize_version};
pub use error::Error;
pub use resolver::{ResolverOptions, TrunkPolicy, VlanResolver};
pub use resource::{AdminState, Choice, LacpMode, Resource, UpdateMethod};
pub use resources::{Interface, L2Interface, LagInterface, Vlan};
pub use session::{ApiResponse, DEFAULT_API_VERSION, Session, SessionConfig, switch_url};
pub use transport::{TlsMode, TransportConfig};
pub use vlan_config::{TrunkMembers, VlanConfig, VlanMode, VlanRef, VlanSettings};
