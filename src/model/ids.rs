//! Typed identifiers for every aggregate and configuration record.
//!
//! Actor-managed aggregates get their IDs from the owning actor's counter;
//! catalog records and items get theirs from shared atomic counters.

use actor_framework::entity_id;

entity_id!(Order);
entity_id!(GroupItem);
entity_id!(Item);
entity_id!(Stock);
entity_id!(
    /// One execution of a process rule against a group item (`OrderProcess`).
    Process
);
entity_id!(
    /// Wait interval between two consecutive stages (`OrderQueue`).
    Queue
);
entity_id!(Category);
entity_id!(Product);
entity_id!(
    /// A configured production stage (`ProcessRule`).
    Rule
);
entity_id!(Employee);
