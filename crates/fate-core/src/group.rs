//! Group rosters and the single-flight poll record. The manager owns an
//! explicit pool: emptied groups go on a free list and are recycled before
//! new ids are minted.

use std::collections::BTreeMap;

use contracts::DeferredAction;

/// Tri-state tally entry: 0 unset, +1 yes, -1 no.
pub const VOTE_UNSET: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub initiator: String,
    pub query: String,
    pub action: DeferredAction,
    /// Snapshot of eligible voters at poll creation; late joiners never
    /// gain an entry.
    pub tally: BTreeMap<String, i64>,
}

impl Poll {
    pub fn new(
        initiator: impl Into<String>,
        query: impl Into<String>,
        action: DeferredAction,
        eligible: impl IntoIterator<Item = String>,
    ) -> Self {
        let tally = eligible
            .into_iter()
            .map(|voter| (voter, VOTE_UNSET))
            .collect();
        Self {
            initiator: initiator.into(),
            query: query.into(),
            action,
            tally,
        }
    }

    /// Records a vote; false when the voter is outside the snapshot.
    pub fn record(&mut self, voter: &str, approve: bool) -> bool {
        match self.tally.get_mut(voter) {
            Some(entry) => {
                *entry = if approve { 1 } else { -1 };
                true
            }
            None => false,
        }
    }

    pub fn is_eligible(&self, voter: &str) -> bool {
        self.tally.contains_key(voter)
    }

    pub fn votes_outstanding(&self) -> usize {
        self.tally.values().filter(|vote| **vote == VOTE_UNSET).count()
    }

    pub fn is_complete(&self) -> bool {
        self.votes_outstanding() == 0
    }

    pub fn sum(&self) -> i64 {
        self.tally.values().sum()
    }

    pub fn voter_count(&self) -> usize {
        self.tally.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub group_id: u64,
    pub members: Vec<String>,
    pub poll: Option<Poll>,
}

impl Group {
    fn new(group_id: u64) -> Self {
        Self {
            group_id,
            members: Vec::new(),
            poll: None,
        }
    }

    pub fn has_member(&self, actor_id: &str) -> bool {
        self.members.iter().any(|member| member == actor_id)
    }
}

/// What `acquire` handed back: a brand new id or one off the free list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    Created(u64),
    Recycled(u64),
}

impl Acquired {
    pub fn id(self) -> u64 {
        match self {
            Self::Created(id) | Self::Recycled(id) => id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupManager {
    groups: BTreeMap<u64, Group>,
    membership: BTreeMap<String, u64>,
    free: Vec<u64>,
    next_group_id: u64,
}

impl GroupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, group_id: u64) -> Option<&Group> {
        self.groups.get(&group_id)
    }

    pub fn group_mut(&mut self, group_id: u64) -> Option<&mut Group> {
        self.groups.get_mut(&group_id)
    }

    pub fn group_of(&self, actor_id: &str) -> Option<u64> {
        self.membership.get(actor_id).copied()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Pops the free list before minting a new id.
    pub fn acquire(&mut self) -> Acquired {
        if let Some(group_id) = self.free.pop() {
            Acquired::Recycled(group_id)
        } else {
            let group_id = self.next_group_id;
            self.next_group_id += 1;
            self.groups.insert(group_id, Group::new(group_id));
            Acquired::Created(group_id)
        }
    }

    /// Moves an actor into a group, leaving any previous group first so the
    /// partition invariant holds. Returns the id of a group that emptied
    /// and was recycled as a side effect, if any.
    pub fn add(&mut self, actor_id: &str, group_id: u64) -> Option<u64> {
        if self.membership.get(actor_id) == Some(&group_id) {
            return None;
        }
        let recycled = self.remove(actor_id);
        if let Some(group) = self.groups.get_mut(&group_id) {
            group.members.push(actor_id.to_string());
            self.membership.insert(actor_id.to_string(), group_id);
        }
        recycled
    }

    /// Removes an actor from its group. Returns the group id when that
    /// group emptied and went back on the free list.
    pub fn remove(&mut self, actor_id: &str) -> Option<u64> {
        let group_id = self.membership.remove(actor_id)?;
        let group = self.groups.get_mut(&group_id)?;
        group.members.retain(|member| member != actor_id);
        if group.members.is_empty() {
            group.poll = None;
            self.free.push(group_id);
            return Some(group_id);
        }
        None
    }

    /// Splits `member_ids` out of `group_id` into a recycled-or-new group.
    /// No-op (Ok(None)) when the list is empty or covers the whole roster;
    /// Err when any listed actor is not a member.
    pub fn split(&mut self, group_id: u64, member_ids: &[String]) -> Result<Option<Acquired>, ()> {
        let Some(group) = self.groups.get(&group_id) else {
            return Err(());
        };
        if member_ids
            .iter()
            .any(|member| !group.has_member(member))
        {
            return Err(());
        }
        if member_ids.is_empty() || member_ids.len() == group.members.len() {
            return Ok(None);
        }
        let acquired = self.acquire();
        for member in member_ids {
            self.add(member, acquired.id());
        }
        Ok(Some(acquired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action() -> DeferredAction {
        DeferredAction::AspectBonus {
            aspect: "Lucky".to_string(),
            amount: 2,
        }
    }

    #[test]
    fn partition_invariant_holds_across_moves() {
        let mut manager = GroupManager::new();
        let first = manager.acquire().id();
        let second = manager.acquire().id();
        manager.add("ann", first);
        manager.add("ann", second);
        assert_eq!(manager.group_of("ann"), Some(second));
        assert!(!manager.group(first).expect("first").has_member("ann"));
        assert!(manager.group(second).expect("second").has_member("ann"));
    }

    #[test]
    fn emptied_groups_are_recycled_before_minting() {
        let mut manager = GroupManager::new();
        let first = manager.acquire().id();
        manager.add("ann", first);
        assert_eq!(manager.remove("ann"), Some(first));
        assert_eq!(manager.acquire(), Acquired::Recycled(first));
        assert!(matches!(manager.acquire(), Acquired::Created(_)));
    }

    #[test]
    fn recycling_clears_any_lingering_poll() {
        let mut manager = GroupManager::new();
        let group_id = manager.acquire().id();
        manager.add("ann", group_id);
        manager
            .group_mut(group_id)
            .expect("group")
            .poll = Some(Poll::new("ann", "do it", action(), ["ann".to_string()]));
        manager.remove("ann");
        assert!(manager.group(group_id).expect("group").poll.is_none());
    }

    #[test]
    fn split_moves_a_strict_subset() {
        let mut manager = GroupManager::new();
        let group_id = manager.acquire().id();
        for name in ["ann", "bo", "cy"] {
            manager.add(name, group_id);
        }
        let acquired = manager
            .split(group_id, &["bo".to_string(), "cy".to_string()])
            .expect("valid split")
            .expect("subset moved");
        assert_eq!(manager.group_of("ann"), Some(group_id));
        assert_eq!(manager.group_of("bo"), Some(acquired.id()));
        assert_eq!(manager.group_of("cy"), Some(acquired.id()));
    }

    #[test]
    fn split_rejects_outsiders_and_ignores_degenerate_lists() {
        let mut manager = GroupManager::new();
        let group_id = manager.acquire().id();
        manager.add("ann", group_id);
        assert!(manager.split(group_id, &["zed".to_string()]).is_err());
        assert_eq!(manager.split(group_id, &[]), Ok(None));
        assert_eq!(manager.split(group_id, &["ann".to_string()]), Ok(None));
    }

    #[test]
    fn poll_tally_tracks_tristate_votes() {
        let mut poll = Poll::new(
            "ann",
            "invoke Lucky",
            action(),
            ["ann".to_string(), "bo".to_string(), "cy".to_string()],
        );
        assert_eq!(poll.votes_outstanding(), 3);
        assert!(poll.record("ann", true));
        assert!(poll.record("bo", false));
        assert!(!poll.record("zed", true));
        assert!(!poll.is_complete());
        assert!(poll.record("cy", true));
        assert!(poll.is_complete());
        assert_eq!(poll.sum(), 1);
    }
}
