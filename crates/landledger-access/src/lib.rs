//! # landledger-access
//!
//! **Security envelope** of the ledger: who may act, and which pairs may
//! still trade.
//!
//! 1. **RoleProvisioner**: one-shot, self-service buyer/seller grants; the
//!    admin is fixed at construction and never trades
//! 2. **AccessGate**: read-side authorization (details, history) and
//!    regulator overrides
//! 3. **FraudMonitor**: per ordered (buyer, seller) volume counter that warns
//!    at threshold − 1 and blocks at the threshold
//!
//! ```text
//! entry point → RoleProvisioner.check_eligible() → AccessGate → FraudMonitor.check()
//!             → (commit) → RoleProvisioner.ensure_roles() → FraudMonitor.record()
//! ```

pub mod access_gate;
pub mod fraud_monitor;
pub mod role_provisioner;

pub use access_gate::AccessGate;
pub use fraud_monitor::FraudMonitor;
pub use role_provisioner::RoleProvisioner;
