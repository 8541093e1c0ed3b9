//! `AgentStore` — the agent registry.
//!
//! Agents are kept in a `Vec` sorted by ascending id.  Ids are handed out
//! monotonically from 1 and never reused, so appending a new agent keeps the
//! order and lookups are a binary search.  Sorted order also fixes the
//! evaluation order of every per-agent phase, which keeps runs reproducible.

use ped_core::{AgentId, CoreError, CoreResult};

use crate::Agent;

pub struct AgentStore {
    agents:  Vec<Agent>,
    next_id: AgentId,
}

impl Default for AgentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentStore {
    pub fn new() -> Self {
        Self { agents: Vec::new(), next_id: AgentId(1) }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// The id the next [`add`](Self::add) will assign.
    pub fn peek_next_id(&self) -> AgentId {
        self.next_id
    }

    /// Register `agent` under a freshly allocated id and return it.
    /// Whatever `agent.id` held before is overwritten.
    pub fn add(&mut self, mut agent: Agent) -> AgentId {
        let id = self.next_id;
        self.next_id = id.next();
        agent.id = id;
        self.agents.push(agent);
        id
    }

    fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.binary_search_by_key(&id, |a| a.id).ok()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.index_of(id).map(|i| &self.agents[i])
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.index_of(id).map(move |i| &mut self.agents[i])
    }

    /// Like [`get`](Self::get) but with a typed error for absent ids.
    pub fn try_get(&self, id: AgentId) -> CoreResult<&Agent> {
        self.get(id).ok_or(CoreError::AgentNotFound(id))
    }

    pub fn try_get_mut(&mut self, id: AgentId) -> CoreResult<&mut Agent> {
        self.get_mut(id).ok_or(CoreError::AgentNotFound(id))
    }

    /// Remove one agent.  Removing an absent id is an error.
    pub fn remove(&mut self, id: AgentId) -> CoreResult<Agent> {
        let i = self.index_of(id).ok_or(CoreError::AgentNotFound(id))?;
        Ok(self.agents.remove(i))
    }

    /// Remove every agent in `ids` in one pass.  Absent ids are ignored.
    /// Returns the removed agents in ascending id order.
    pub fn remove_many(&mut self, ids: &[AgentId]) -> Vec<Agent> {
        if ids.is_empty() {
            return Vec::new();
        }
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        let (removed, kept): (Vec<Agent>, Vec<Agent>) = std::mem::take(&mut self.agents)
            .into_iter()
            .partition(|a| sorted.binary_search(&a.id).is_ok());
        self.agents = kept;
        removed
    }

    /// Agents in ascending id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Agent> {
        self.agents.iter_mut()
    }

    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.iter().map(|a| a.id)
    }
}
