// Concrete switch resources implementing the CRUD contract.

pub mod interface;
pub mod l2_interface;
pub mod lag;
pub mod vlan;

pub use interface::Interface;
pub use l2_interface::L2Interface;
pub use lag::LagInterface;
pub use vlan::Vlan;
