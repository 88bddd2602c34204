//! Authoring helpers
//!
//! Level play-order validation and reordering, and the actor library that
//! keeps placed copies of reference actors in sync with them.

use crate::cloner::{copy_actor, ActorCopier};
use crate::{Actor, ActorId, Error, Level, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Check a proposed play order without touching any level
///
/// `positions[i]` is the play position proposed for level `i`. A valid
/// order has at least one level and uses every position from `0` to
/// `len - 1` exactly once.
pub fn validate_play_order(positions: &[usize]) -> Result<()> {
    let (Some(&lowest), Some(&highest)) = (positions.iter().min(), positions.iter().max()) else {
        return Err(Error::InvalidPlayOrder(
            "at least one level is required".to_string(),
        ));
    };
    if lowest != 0 {
        return Err(Error::InvalidPlayOrder(format!(
            "lowest play position is {}, expected 0",
            lowest
        )));
    }
    if highest != positions.len() - 1 {
        return Err(Error::InvalidPlayOrder(format!(
            "highest play position is {}, expected {}",
            highest,
            positions.len() - 1
        )));
    }
    let mut seen = HashSet::new();
    for position in positions {
        if !seen.insert(position) {
            return Err(Error::InvalidPlayOrder(format!(
                "play position {} is used twice",
                position
            )));
        }
    }
    Ok(())
}

/// Assign play positions and sort the levels by them
///
/// Validates first; on error the levels are left exactly as they were.
/// Every level's trigger index is rebuilt afterwards.
pub fn reorder_levels(levels: &mut Vec<Level>, positions: &[usize]) -> Result<()> {
    if positions.len() != levels.len() {
        return Err(Error::InvalidPlayOrder(format!(
            "{} positions given for {} levels",
            positions.len(),
            levels.len()
        )));
    }
    validate_play_order(positions)?;

    for (level, position) in levels.iter_mut().zip(positions) {
        level.play_position = *position;
    }
    levels.sort_by_key(|level| level.play_position);
    for level in levels.iter_mut() {
        level.rebuild_trigger_index();
    }
    debug!(levels = levels.len(), "levels reordered");
    Ok(())
}

/// A placed copy of a reference actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedCopy {
    /// Index of the level holding the copy
    pub level: usize,
    pub actor: ActorId,
}

/// Reference actors and the copies placed from them
///
/// Placed copies carry their reference in [`Actor::origin`], so they are
/// found by scanning the levels rather than by remembered positions; this
/// keeps working after levels are reordered. Editing a reference and
/// calling [`ActorLibrary::sync_copies`] re-clones the reference onto every
/// copy. Copies keep their own id and position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorLibrary {
    references: IndexMap<ActorId, Actor>,
    next_id: u64,
}

impl ActorLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reference actor under a fresh library id
    pub fn add_reference(&mut self, mut actor: Actor) -> ActorId {
        self.next_id = self.next_id.saturating_add(1);
        let id = ActorId::new(self.next_id);
        actor.set_id(id);
        self.references.insert(id, actor);
        id
    }

    pub fn reference(&self, id: ActorId) -> Option<&Actor> {
        self.references.get(&id)
    }

    pub fn references(&self) -> impl Iterator<Item = &Actor> {
        self.references.values()
    }

    /// Edit a reference actor; call `sync_copies` to propagate the change
    pub fn edit_reference<F>(&mut self, id: ActorId, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Actor),
    {
        let actor = self.references.get_mut(&id).ok_or(Error::ActorNotFound(id))?;
        edit(actor);
        actor.set_id(id);
        Ok(())
    }

    /// Place a new copy of a reference into a level
    pub fn place_copy(
        &self,
        reference: ActorId,
        level: &mut Level,
        x: f64,
        y: f64,
    ) -> Result<ActorId> {
        let copier = ActorCopier::new(
            self.references
                .get(&reference)
                .ok_or(Error::ActorNotFound(reference))?,
        );
        let mut copy = copier.make_copy()?;
        copy.set_id(ActorId::UNASSIGNED);
        copy.set_origin(Some(reference));
        copy.position.x = x;
        copy.position.y = y;

        Ok(level.add_actor(copy))
    }

    /// Every copy of a reference across `levels`, in level order
    pub fn copies_of(&self, reference: ActorId, levels: &[Level]) -> Vec<PlacedCopy> {
        levels
            .iter()
            .enumerate()
            .flat_map(|(index, level)| {
                level
                    .actors()
                    .filter(move |actor| actor.origin() == Some(reference))
                    .map(move |actor| PlacedCopy {
                        level: index,
                        actor: actor.id(),
                    })
            })
            .collect()
    }

    /// Re-clone a reference onto every copy placed from it
    ///
    /// Returns the number of copies updated.
    pub fn sync_copies(&self, reference: ActorId, levels: &mut [Level]) -> Result<usize> {
        let source = self
            .references
            .get(&reference)
            .ok_or(Error::ActorNotFound(reference))?;
        let copies = self.copies_of(reference, levels);

        for copy in &copies {
            let Some(level) = levels.get_mut(copy.level) else {
                continue;
            };
            let mut skipped = 0;
            level.edit_actor(copy.actor, |actor| {
                skipped = copy_actor(actor, source).skipped.len();
            })?;
            if skipped > 0 {
                warn!(%reference, copy = %copy.actor, skipped, "copy synced with skipped rules");
            }
        }
        debug!(%reference, synced = copies.len(), "synced copies");
        Ok(copies.len())
    }
}
