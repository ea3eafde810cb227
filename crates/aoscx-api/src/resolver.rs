// VLAN dependency resolution
//
// Read-or-create for VLANs referenced by LAG and port configuration.
// Resolution of one VLAN id is serialized within a session so concurrent
// callers never both observe "absent" and both issue the create. Separate
// sessions (or other management clients) can still race on the switch.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

use crate::error::Error;
use crate::resource::{Choice, Resource};
use crate::resources::vlan::Vlan;
use crate::session::Session;
use crate::vlan_config::VlanRef;

/// What to do when a trunk VLAN can be neither read nor created.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TrunkPolicy {
    /// Skip it and configure the trunk with the VLANs that did resolve.
    #[default]
    BestEffort,
    /// Fail the whole operation.
    Strict,
}

impl Choice for TrunkPolicy {
    const FIELD: &'static str = "trunk_policy";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    #[serde(default)]
    pub trunk_policy: TrunkPolicy,
    /// Remember resolved VLAN URIs for the lifetime of the session instead
    /// of re-reading the switch on every reference.
    #[serde(default)]
    pub cache: bool,
}

/// Per-session read-or-create resolver for VLAN references.
#[derive(Debug, Default)]
pub struct VlanResolver {
    options: ResolverOptions,
    locks: DashMap<u16, Arc<Mutex<()>>>,
    resolved: DashMap<u16, String>,
}

impl VlanResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Make sure VLAN `vlan_id` exists and return its reference.
    ///
    /// Reads the VLAN; if the switch answers that it cannot, creates it.
    /// Fails with [`Error::Dependency`] when the switch rejects both, and
    /// with [`Error::Transport`] as soon as a request gets no answer.
    pub async fn ensure(&self, session: &Session, vlan_id: u16) -> Result<VlanRef, Error> {
        let lock = Arc::clone(&self.locks.entry(vlan_id).or_default());
        let _guard = lock.lock().await;

        if self.options.cache {
            if let Some(uri) = self.resolved.get(&vlan_id).map(|r| r.value().clone()) {
                trace!(vlan_id, "VLAN reference served from cache");
                return Ok(VlanRef { id: vlan_id, uri });
            }
        }

        let mut vlan = Vlan::new(vlan_id);
        match vlan.get(session).await {
            Ok(()) => {}
            // No answer: the VLAN's state on the switch is unknown.
            Err(e) if e.is_transport() => return Err(e),
            Err(read_err) => {
                debug!(vlan_id, error = %read_err, "VLAN not readable, creating it");
                match vlan.create(session).await {
                    Ok(()) => info!(vlan_id, "created referenced VLAN"),
                    Err(e) if e.is_transport() => return Err(e),
                    Err(e) => {
                        return Err(Error::Dependency {
                            vlan_id,
                            source: Box::new(e),
                        });
                    }
                }
            }
        }

        let uri = Vlan::uri_for(session, vlan_id);
        if self.options.cache {
            self.resolved.insert(vlan_id, uri.clone());
        }
        Ok(VlanRef { id: vlan_id, uri })
    }

    /// Resolve a trunk list, applying the configured [`TrunkPolicy`] to
    /// VLANs the switch refused. Transport failures always propagate.
    ///
    /// Duplicate ids are resolved once; the result is in id order.
    pub async fn ensure_trunks(
        &self,
        session: &Session,
        vlan_ids: &[u16],
    ) -> Result<Vec<VlanRef>, Error> {
        let ids: BTreeSet<u16> = vlan_ids.iter().copied().collect();
        let mut refs = Vec::with_capacity(ids.len());

        for vlan_id in ids {
            match self.ensure(session, vlan_id).await {
                Ok(r) => refs.push(r),
                Err(e @ Error::Dependency { .. })
                    if self.options.trunk_policy == TrunkPolicy::BestEffort =>
                {
                    warn!(vlan_id, error = %e, "skipping unresolvable trunk VLAN");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(refs)
    }

    /// Drop a cached reference (the VLAN was deleted).
    pub fn forget(&self, vlan_id: u16) {
        self.resolved.remove(&vlan_id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trunk_policy_parses() {
        assert_eq!(
            TrunkPolicy::from_field("best-effort").unwrap(),
            TrunkPolicy::BestEffort
        );
        assert_eq!(TrunkPolicy::from_field("strict").unwrap(), TrunkPolicy::Strict);
        assert!(TrunkPolicy::from_field("lenient").is_err());
    }

    #[test]
    fn forget_evicts_cached_reference() {
        let resolver = VlanResolver::new(ResolverOptions {
            trunk_policy: TrunkPolicy::Strict,
            cache: true,
        });
        resolver.resolved.insert(10, "/rest/v10.09/system/vlans/10".into());
        resolver.forget(10);
        assert!(resolver.resolved.get(&10).is_none());
    }
}
