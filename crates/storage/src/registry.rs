// SPDX-License-Identifier: MIT

//! Agent Registry (C3): control-plane view of every agent, keyed by the
//! immutable `agent_key` and indexed by the control-plane-assigned
//! `AgentId`. Ordering for `list_all()` is a structural property of the
//! `order` index, not a sort-on-read.

use hf_core::{Agent, AgentId, AgentKey, AgentStatus, Capability, Clock, Event, RegistryError};
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

struct Record {
    agent: Agent,
    created_at_epoch_ms: u64,
    updated_at_epoch_ms: u64,
}

pub struct AgentRegistry {
    clock: Arc<dyn Clock>,
    by_id: RwLock<HashMap<AgentId, Record>>,
    by_key: RwLock<HashMap<AgentKey, AgentId>>,
    /// `(created_at DESC, id ASC)` secondary index backing `list_all()`'s
    /// stable ordering contract.
    order: RwLock<BTreeMap<(Reverse<u64>, AgentId), ()>>,
}

impl AgentRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            by_id: RwLock::new(HashMap::new()),
            by_key: RwLock::new(HashMap::new()),
            order: RwLock::new(BTreeMap::new()),
        }
    }

    /// Pre-provision an agent key for an operator, ahead of the worker's
    /// first registration attempt. Idempotent: re-provisioning an existing
    /// key returns the existing record unchanged.
    pub fn provision(&self, key: AgentKey) -> Agent {
        if let Some(agent) = self.lookup_by_key(&key) {
            return agent;
        }
        let now = self.clock.epoch_ms();
        let agent = Agent::provisional(key.clone());
        let id = agent.id;
        self.by_key.write().insert(key, id);
        self.by_id
            .write()
            .insert(id, Record { agent: agent.clone(), created_at_epoch_ms: now, updated_at_epoch_ms: now });
        self.order.write().insert((Reverse(now), id), ());
        agent
    }

    /// Register or update an agent under a pre-provisioned key. Idempotent
    /// at the identity level: the same key always resolves to the same id.
    pub fn register(
        &self,
        key: &AgentKey,
        name: String,
        address: Option<String>,
        port: Option<u16>,
        capability: Option<Capability>,
    ) -> Result<(Agent, Vec<Event>), RegistryError> {
        let id = {
            let by_key = self.by_key.read();
            *by_key.get(key).ok_or_else(|| RegistryError::UnregisteredKey(key.as_str().to_string()))?
        };
        if let Some(addr) = &address {
            let by_id = self.by_id.read();
            let conflict = by_id
                .iter()
                .any(|(other_id, record)| *other_id != id && record.agent.address.as_deref() == Some(addr.as_str()));
            if conflict {
                return Err(RegistryError::IpConflict { address: addr.clone() });
            }
        }

        let now = self.clock.epoch_ms();
        let mut events = Vec::new();
        let mut by_id = self.by_id.write();
        // `id` was just looked up from `by_key` above under the same lock
        // ordering; the two maps are only ever mutated together.
        #[allow(clippy::expect_used)]
        let record = by_id.get_mut(&id).expect("by_key and by_id must stay consistent");

        if !record.agent.name.is_empty() && record.agent.name != name {
            return Err(RegistryError::NameMismatch {
                key: key.as_str().to_string(),
                existing: record.agent.name.clone(),
                got: name,
            });
        }
        record.agent.name = name;
        if let Some(addr) = address {
            record.agent.address = Some(addr);
        }
        if let Some(p) = port {
            record.agent.port = Some(p);
        }
        if let Some(cap) = capability {
            if record.agent.capability.as_ref() != Some(&cap) {
                events.push(Event::AgentCapability { agent_id: id, capability: cap.clone() });
            }
            record.agent.capability = Some(cap);
        }
        record.updated_at_epoch_ms = now;
        Ok((record.agent.clone(), events))
    }

    /// Heartbeat: touches `last_heartbeat_epoch_ms` and, if the agent had
    /// gone offline, brings it back online and emits the transition event.
    pub fn touch(&self, key: &AgentKey) -> Result<Vec<Event>, RegistryError> {
        let id = {
            let by_key = self.by_key.read();
            *by_key.get(key).ok_or_else(|| RegistryError::UnregisteredKey(key.as_str().to_string()))?
        };
        let now = self.clock.epoch_ms();
        let mut events = Vec::new();
        let mut by_id = self.by_id.write();
        // Same invariant as in `register`: `id` came from `by_key` above.
        #[allow(clippy::expect_used)]
        let record = by_id.get_mut(&id).expect("by_key and by_id must stay consistent");
        record.agent.last_heartbeat_epoch_ms = Some(now);
        if record.agent.status == AgentStatus::Offline {
            record.agent.status = AgentStatus::Online;
            events.push(Event::AgentStatus { agent_id: id, status: AgentStatus::Online });
        }
        record.updated_at_epoch_ms = now;
        Ok(events)
    }

    pub fn update_status(&self, id: AgentId, status: AgentStatus) -> Result<Vec<Event>, RegistryError> {
        let now = self.clock.epoch_ms();
        let mut by_id = self.by_id.write();
        let record = by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        let mut events = Vec::new();
        if record.agent.status != status {
            record.agent.status = status;
            events.push(Event::AgentStatus { agent_id: id, status });
        }
        record.updated_at_epoch_ms = now;
        Ok(events)
    }

    pub fn update_speed(&self, id: AgentId, speed_hps: u64) -> Result<Vec<Event>, RegistryError> {
        let now = self.clock.epoch_ms();
        let mut by_id = self.by_id.write();
        let record = by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        let mut events = Vec::new();
        if record.agent.speed_hps != speed_hps {
            record.agent.speed_hps = speed_hps;
            events.push(Event::AgentSpeed { agent_id: id, speed_hps });
        }
        record.updated_at_epoch_ms = now;
        Ok(events)
    }

    /// Atomically set status and restore `port` in one write-lock
    /// acquisition, leaving capability and speed untouched. This is the
    /// storage-level primitive behind the agent's single combined shutdown
    /// update (spec §4.2 "draining"): issuing status and port as two
    /// separate calls risks the second overwriting fields the first just
    /// set with stale/empty values, so both land in one mutation instead.
    pub fn update_status_and_port(
        &self,
        id: AgentId,
        status: AgentStatus,
        port: Option<u16>,
    ) -> Result<Vec<Event>, RegistryError> {
        let now = self.clock.epoch_ms();
        let mut by_id = self.by_id.write();
        let record = by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        let mut events = Vec::new();
        if record.agent.status != status {
            record.agent.status = status;
            events.push(Event::AgentStatus { agent_id: id, status });
        }
        if port.is_some() {
            record.agent.port = port;
        }
        record.updated_at_epoch_ms = now;
        Ok(events)
    }

    pub fn update_capability(&self, id: AgentId, capability: Capability) -> Result<Vec<Event>, RegistryError> {
        let now = self.clock.epoch_ms();
        let mut by_id = self.by_id.write();
        let record = by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        let mut events = Vec::new();
        if record.agent.capability.as_ref() != Some(&capability) {
            record.agent.capability = Some(capability.clone());
            events.push(Event::AgentCapability { agent_id: id, capability });
        }
        record.updated_at_epoch_ms = now;
        Ok(events)
    }

    pub fn lookup_by_key(&self, key: &AgentKey) -> Option<Agent> {
        let id = *self.by_key.read().get(key)?;
        self.by_id.read().get(&id).map(|r| r.agent.clone())
    }

    pub fn get(&self, id: AgentId) -> Result<Agent, RegistryError> {
        self.by_id.read().get(&id).map(|r| r.agent.clone()).ok_or(RegistryError::NotFound(id))
    }

    /// Stable `(created_at DESC, id ASC)` ordering — a UX contract, not an
    /// incidental sort.
    pub fn list_all(&self) -> Vec<Agent> {
        let order = self.order.read();
        let by_id = self.by_id.read();
        order.keys().filter_map(|(_, id)| by_id.get(id).map(|r| r.agent.clone())).collect()
    }

    /// Explicit operator removal — the only way an agent is destroyed.
    pub fn remove(&self, id: AgentId) -> Result<(), RegistryError> {
        let (key, created_at) = {
            let mut by_id = self.by_id.write();
            let record = by_id.remove(&id).ok_or(RegistryError::NotFound(id))?;
            (record.agent.key, record.created_at_epoch_ms)
        };
        self.by_key.write().remove(&key);
        self.order.write().remove(&(Reverse(created_at), id));
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
