use crate::domain::group::Group;
use crate::domain::step::{InputField, Step};
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

/// Value object: Workflow ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowId(pub String);

/// Value object: Group ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

/// Value object: Step ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(pub String);

impl WorkflowId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl GroupId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl StepId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Aggregate: the normalized builder state for one workflow.
///
/// Groups and steps live in id-keyed maps; order is carried separately by
/// `group_order` and each group's `step_ids`. Every operation takes the
/// current state by reference and returns the next state whole, so readers
/// never observe a partially applied mutation.
///
/// The following invariants hold after every operation:
///
/// * `group_order` is a permutation of exactly the keys of `groups_by_id`.
/// * Every id in a group's `step_ids` resolves in `steps_by_id`, appears in
///   exactly one group, and that step's `group_id` points back at the group.
/// * `steps_by_id` holds no step absent from every group (no orphans).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Steps keyed by id
    pub steps_by_id: HashMap<StepId, Step>,

    /// Groups keyed by id
    pub groups_by_id: HashMap<GroupId, Group>,

    /// Canonical top-level ordering of groups
    pub group_order: Vec<GroupId>,
}

impl WorkflowState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of a group in the canonical order
    pub fn group_position(&self, group_id: &GroupId) -> Option<usize> {
        self.group_order.iter().position(|id| id == group_id)
    }

    /// Owning group and position within it for a step
    pub fn step_position(&self, step_id: &StepId) -> Option<(GroupId, usize)> {
        let step = self.steps_by_id.get(step_id)?;
        let group = self.groups_by_id.get(&step.group_id)?;
        let index = group.step_ids.iter().position(|id| id == step_id)?;
        Some((step.group_id.clone(), index))
    }

    /// Insert a new group at the end of the group order.
    ///
    /// An empty label defaults to `"Section {n}"` where `n` is the group
    /// count after insertion. Id uniqueness is the caller's responsibility
    /// and is not re-checked here.
    pub fn add_group(&self, mut group: Group) -> Self {
        let mut next = self.clone();
        if group.label.is_empty() {
            group.label = format!("Section {}", next.groups_by_id.len() + 1);
        }
        next.group_order.push(group.id.clone());
        next.groups_by_id.insert(group.id.clone(), group);
        next
    }

    /// Insert a new step at the end of its owning group.
    ///
    /// Errors if `step.group_id` does not resolve: inserting anyway would
    /// orphan the step, and dropping it silently would lose data.
    pub fn add_step(&self, step: Step) -> Result<Self, CoreError> {
        if !self.groups_by_id.contains_key(&step.group_id) {
            return Err(CoreError::UnknownGroup(step.group_id.0.clone()));
        }
        let mut next = self.clone();
        if let Some(group) = next.groups_by_id.get_mut(&step.group_id) {
            group.step_ids.push(step.id.clone());
        }
        next.steps_by_id.insert(step.id.clone(), step);
        Ok(next)
    }

    /// Move a step within or across groups.
    ///
    /// The step is removed from its current owner first, so for in-group
    /// moves `index` is interpreted against the list after removal. `None`
    /// or an out-of-range index appends at the end. Unknown step or group
    /// ids leave the state unchanged.
    pub fn move_step(&self, step_id: &StepId, to_group: &GroupId, index: Option<usize>) -> Self {
        let Some(step) = self.steps_by_id.get(step_id) else {
            debug!(step_id = %step_id.0, "move_step: unknown step, no-op");
            return self.clone();
        };
        if !self.groups_by_id.contains_key(to_group) {
            debug!(group_id = %to_group.0, "move_step: unknown target group, no-op");
            return self.clone();
        }

        let from_group = step.group_id.clone();
        let mut next = self.clone();
        if let Some(group) = next.groups_by_id.get_mut(&from_group) {
            group.step_ids.retain(|id| id != step_id);
        }
        if let Some(group) = next.groups_by_id.get_mut(to_group) {
            let at = index.unwrap_or(usize::MAX).min(group.step_ids.len());
            group.step_ids.insert(at, step_id.clone());
        }
        if let Some(step) = next.steps_by_id.get_mut(step_id) {
            step.group_id = to_group.clone();
        }
        next
    }

    /// Move the group at `old_index` to `new_index` in the group order.
    ///
    /// Standard array-move semantics: the id is removed, then reinserted,
    /// shifting everything strictly between the two positions by one slot.
    /// Indices out of range are clamped.
    pub fn reorder_groups(&self, old_index: usize, new_index: usize) -> Self {
        if self.group_order.is_empty() {
            return self.clone();
        }
        let mut next = self.clone();
        let old_index = old_index.min(next.group_order.len() - 1);
        let id = next.group_order.remove(old_index);
        let new_index = new_index.min(next.group_order.len());
        next.group_order.insert(new_index, id);
        next
    }

    /// Remove a group and every step it owns. No-op if the id is unknown.
    pub fn delete_group(&self, group_id: &GroupId) -> Self {
        let Some(group) = self.groups_by_id.get(group_id) else {
            debug!(group_id = %group_id.0, "delete_group: unknown group, no-op");
            return self.clone();
        };
        let mut next = self.clone();
        for step_id in &group.step_ids {
            next.steps_by_id.remove(step_id);
        }
        next.group_order.retain(|id| id != group_id);
        next.groups_by_id.remove(group_id);
        next
    }

    /// Append an id-disjoint deep copy of a group to the end of the order.
    ///
    /// The copy's label is the original's plus `" (Copy)"`; its steps are
    /// field-for-field copies under fresh ids, rebound to the new group, in
    /// the original relative order. The source group is unmodified.
    pub fn duplicate_group(&self, group_id: &GroupId) -> Self {
        let Some(source) = self.groups_by_id.get(group_id) else {
            debug!(group_id = %group_id.0, "duplicate_group: unknown group, no-op");
            return self.clone();
        };
        let mut next = self.clone();
        let copy_id = GroupId::generate();
        let mut step_ids = Vec::with_capacity(source.step_ids.len());
        for step_id in &source.step_ids {
            if let Some(step) = self.steps_by_id.get(step_id) {
                let copy = Step {
                    id: StepId::generate(),
                    group_id: copy_id.clone(),
                    ..step.clone()
                };
                step_ids.push(copy.id.clone());
                next.steps_by_id.insert(copy.id.clone(), copy);
            }
        }
        let copy = Group {
            id: copy_id.clone(),
            label: format!("{} (Copy)", source.label),
            step_ids,
        };
        next.group_order.push(copy_id.clone());
        next.groups_by_id.insert(copy_id, copy);
        next
    }

    /// Replace a group's label. No-op if the id is unknown.
    pub fn rename_group(&self, group_id: &GroupId, label: &str) -> Self {
        let mut next = self.clone();
        match next.groups_by_id.get_mut(group_id) {
            Some(group) => group.label = label.to_string(),
            None => debug!(group_id = %group_id.0, "rename_group: unknown group, no-op"),
        }
        next
    }

    /// Replace a step's label. No-op if the id is unknown.
    pub fn rename_step(&self, step_id: &StepId, label: &str) -> Self {
        let mut next = self.clone();
        match next.steps_by_id.get_mut(step_id) {
            Some(step) => step.label = label.to_string(),
            None => debug!(step_id = %step_id.0, "rename_step: unknown step, no-op"),
        }
        next
    }

    /// Replace a step's instruction body. No-op if the id is unknown.
    pub fn update_step_instructions(&self, step_id: &StepId, instructions: &str) -> Self {
        let mut next = self.clone();
        match next.steps_by_id.get_mut(step_id) {
            Some(step) => step.instructions = instructions.to_string(),
            None => debug!(step_id = %step_id.0, "update_step_instructions: unknown step, no-op"),
        }
        next
    }

    /// Replace a step's input fields wholesale. No-op if the id is unknown.
    pub fn update_step_input_fields(&self, step_id: &StepId, input_fields: Vec<InputField>) -> Self {
        let mut next = self.clone();
        match next.steps_by_id.get_mut(step_id) {
            Some(step) => step.input_fields = input_fields,
            None => debug!(step_id = %step_id.0, "update_step_input_fields: unknown step, no-op"),
        }
        next
    }

    /// Remove a step from the store and its owning group. No-op if unknown.
    pub fn delete_step(&self, step_id: &StepId) -> Self {
        let Some(step) = self.steps_by_id.get(step_id) else {
            debug!(step_id = %step_id.0, "delete_step: unknown step, no-op");
            return self.clone();
        };
        let mut next = self.clone();
        if let Some(group) = next.groups_by_id.get_mut(&step.group_id) {
            group.step_ids.retain(|id| id != step_id);
        }
        next.steps_by_id.remove(step_id);
        next
    }

    /// Append a copy of a step to the end of its own group.
    ///
    /// The copy gets a fresh id and the original's label plus `" (Copy)"`.
    pub fn duplicate_step(&self, step_id: &StepId) -> Self {
        let Some(source) = self.steps_by_id.get(step_id) else {
            debug!(step_id = %step_id.0, "duplicate_step: unknown step, no-op");
            return self.clone();
        };
        let mut next = self.clone();
        let copy = Step {
            id: StepId::generate(),
            label: format!("{} (Copy)", source.label),
            ..source.clone()
        };
        if let Some(group) = next.groups_by_id.get_mut(&source.group_id) {
            group.step_ids.push(copy.id.clone());
        }
        next.steps_by_id.insert(copy.id.clone(), copy);
        next
    }

    /// Re-check the referential invariants.
    ///
    /// Mutations keep these by construction; this is the explicit check for
    /// tests and for states that arrive from outside the store.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.group_order.len() != self.groups_by_id.len() {
            return Err(CoreError::ValidationError(format!(
                "group_order has {} entries for {} groups",
                self.group_order.len(),
                self.groups_by_id.len()
            )));
        }

        let mut seen_groups = HashSet::new();
        for group_id in &self.group_order {
            if !seen_groups.insert(group_id) {
                return Err(CoreError::ValidationError(format!(
                    "Duplicate group in order: {}",
                    group_id.0
                )));
            }
            if !self.groups_by_id.contains_key(group_id) {
                return Err(CoreError::ValidationError(format!(
                    "Dangling group in order: {}",
                    group_id.0
                )));
            }
        }

        let mut owners: HashMap<&StepId, &GroupId> = HashMap::new();
        for group in self.groups_by_id.values() {
            for step_id in &group.step_ids {
                match self.steps_by_id.get(step_id) {
                    None => {
                        return Err(CoreError::ValidationError(format!(
                            "Group {} references missing step {}",
                            group.id.0, step_id.0
                        )))
                    }
                    Some(step) if step.group_id != group.id => {
                        return Err(CoreError::ValidationError(format!(
                            "Step {} is listed by group {} but owned by {}",
                            step_id.0, group.id.0, step.group_id.0
                        )))
                    }
                    Some(_) => {}
                }
                if owners.insert(step_id, &group.id).is_some() {
                    return Err(CoreError::ValidationError(format!(
                        "Step {} appears in more than one group",
                        step_id.0
                    )));
                }
            }
        }

        if owners.len() != self.steps_by_id.len() {
            return Err(CoreError::ValidationError(format!(
                "{} steps stored but {} referenced by groups",
                self.steps_by_id.len(),
                owners.len()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::InputKind;

    fn group(id: &str, label: &str) -> Group {
        Group::new(GroupId(id.to_string()), label)
    }

    fn step(id: &str, group_id: &str, label: &str) -> Step {
        Step::new(StepId(id.to_string()), GroupId(group_id.to_string())).with_label(label)
    }

    fn two_group_state() -> WorkflowState {
        // G1 = [s1, s2], G2 = [s3]
        let state = WorkflowState::new()
            .add_group(group("g1", "First"))
            .add_group(group("g2", "Second"));
        let state = state.add_step(step("s1", "g1", "one")).unwrap();
        let state = state.add_step(step("s2", "g1", "two")).unwrap();
        let state = state.add_step(step("s3", "g2", "three")).unwrap();
        state.validate().unwrap();
        state
    }

    fn order_of(state: &WorkflowState, group_id: &str) -> Vec<String> {
        state.groups_by_id[&GroupId(group_id.to_string())]
            .step_ids
            .iter()
            .map(|id| id.0.clone())
            .collect()
    }

    #[test]
    fn test_add_group_defaults_empty_label() {
        let state = WorkflowState::new()
            .add_group(group("g1", ""))
            .add_group(group("g2", "Named"))
            .add_group(group("g3", ""));

        assert_eq!(state.groups_by_id[&GroupId("g1".to_string())].label, "Section 1");
        assert_eq!(state.groups_by_id[&GroupId("g2".to_string())].label, "Named");
        assert_eq!(state.groups_by_id[&GroupId("g3".to_string())].label, "Section 3");
        state.validate().unwrap();
    }

    #[test]
    fn test_add_step_unknown_group_is_error() {
        let state = WorkflowState::new();
        let result = state.add_step(step("s1", "missing", "orphan"));
        assert_eq!(result, Err(CoreError::UnknownGroup("missing".to_string())));
    }

    #[test]
    fn test_move_step_across_groups_at_index() {
        // Scenario A: moveStep(s1, G2, 0) => G1=[s2], G2=[s1, s3]
        let state = two_group_state();
        let next = state.move_step(
            &StepId("s1".to_string()),
            &GroupId("g2".to_string()),
            Some(0),
        );

        assert_eq!(order_of(&next, "g1"), vec!["s2"]);
        assert_eq!(order_of(&next, "g2"), vec!["s1", "s3"]);
        assert_eq!(
            next.steps_by_id[&StepId("s1".to_string())].group_id,
            GroupId("g2".to_string())
        );
        next.validate().unwrap();

        // the source state is untouched
        assert_eq!(order_of(&state, "g1"), vec!["s1", "s2"]);
    }

    #[test]
    fn test_move_step_in_group_uses_post_removal_index() {
        let state = WorkflowState::new().add_group(group("g1", "Only"));
        let state = state.add_step(step("a", "g1", "a")).unwrap();
        let state = state.add_step(step("b", "g1", "b")).unwrap();
        let state = state.add_step(step("c", "g1", "c")).unwrap();

        // dragging a onto c: target index 2, interpreted after a is removed
        let next = state.move_step(&StepId("a".to_string()), &GroupId("g1".to_string()), Some(2));
        assert_eq!(order_of(&next, "g1"), vec!["b", "c", "a"]);

        // dragging c onto a: target index 0
        let next = state.move_step(&StepId("c".to_string()), &GroupId("g1".to_string()), Some(0));
        assert_eq!(order_of(&next, "g1"), vec!["c", "a", "b"]);
        next.validate().unwrap();
    }

    #[test]
    fn test_move_step_clamps_and_appends() {
        let state = two_group_state();

        // index past the end appends
        let next = state.move_step(
            &StepId("s1".to_string()),
            &GroupId("g2".to_string()),
            Some(99),
        );
        assert_eq!(order_of(&next, "g2"), vec!["s3", "s1"]);

        // no index appends
        let next = state.move_step(&StepId("s1".to_string()), &GroupId("g2".to_string()), None);
        assert_eq!(order_of(&next, "g2"), vec!["s3", "s1"]);
        next.validate().unwrap();
    }

    #[test]
    fn test_move_step_unknown_ids_are_no_ops() {
        let state = two_group_state();

        let next = state.move_step(
            &StepId("ghost".to_string()),
            &GroupId("g2".to_string()),
            None,
        );
        assert_eq!(next, state);

        let next = state.move_step(
            &StepId("s1".to_string()),
            &GroupId("ghost".to_string()),
            None,
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_move_step_preserves_cardinality() {
        let state = two_group_state();
        let next = state.move_step(&StepId("s2".to_string()), &GroupId("g2".to_string()), Some(1));

        assert_eq!(next.steps_by_id.len(), state.steps_by_id.len());
        let total: usize = next.groups_by_id.values().map(|g| g.step_ids.len()).sum();
        assert_eq!(total, 3);
        next.validate().unwrap();
    }

    #[test]
    fn test_reorder_groups_basic() {
        // Scenario B: [G1, G2, G3], reorder(0, 1) => [G2, G1, G3]
        let state = WorkflowState::new()
            .add_group(group("g1", "A"))
            .add_group(group("g2", "B"))
            .add_group(group("g3", "C"));

        let next = state.reorder_groups(0, 1);
        let order: Vec<&str> = next.group_order.iter().map(|id| id.0.as_str()).collect();
        assert_eq!(order, vec!["g2", "g1", "g3"]);
        next.validate().unwrap();
    }

    #[test]
    fn test_reorder_groups_clamps_out_of_range() {
        let state = WorkflowState::new()
            .add_group(group("g1", "A"))
            .add_group(group("g2", "B"));

        let next = state.reorder_groups(10, 0);
        let order: Vec<&str> = next.group_order.iter().map(|id| id.0.as_str()).collect();
        assert_eq!(order, vec!["g2", "g1"]);

        let empty = WorkflowState::new().reorder_groups(0, 3);
        assert!(empty.group_order.is_empty());
    }

    #[test]
    fn test_reorder_groups_is_a_permutation() {
        let state = WorkflowState::new()
            .add_group(group("g1", "A"))
            .add_group(group("g2", "B"))
            .add_group(group("g3", "C"));

        let next = state.reorder_groups(2, 0);
        let mut before: Vec<String> = state.group_order.iter().map(|id| id.0.clone()).collect();
        let mut after: Vec<String> = next.group_order.iter().map(|id| id.0.clone()).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_group_cascades() {
        // Scenario C: deleteGroup(G1) removes G1 and its steps
        let state = two_group_state();
        let next = state.delete_group(&GroupId("g1".to_string()));

        assert!(!next.group_order.contains(&GroupId("g1".to_string())));
        assert!(!next.steps_by_id.contains_key(&StepId("s1".to_string())));
        assert!(!next.steps_by_id.contains_key(&StepId("s2".to_string())));
        assert!(next.steps_by_id.contains_key(&StepId("s3".to_string())));
        assert_eq!(next.steps_by_id.len(), state.steps_by_id.len() - 2);
        next.validate().unwrap();
    }

    #[test]
    fn test_delete_group_unknown_is_no_op() {
        let state = two_group_state();
        let next = state.delete_group(&GroupId("ghost".to_string()));
        assert_eq!(next, state);
    }

    #[test]
    fn test_duplicate_group_fidelity() {
        let state = two_group_state();
        let state = state.update_step_instructions(&StepId("s1".to_string()), "do the thing");
        let state = state.update_step_input_fields(
            &StepId("s1".to_string()),
            vec![InputField::new("f1", "Amount", InputKind::Number)],
        );

        let next = state.duplicate_group(&GroupId("g1".to_string()));
        next.validate().unwrap();

        assert_eq!(next.group_order.len(), 3);
        let copy_id = next.group_order.last().unwrap().clone();
        let copy = &next.groups_by_id[&copy_id];
        assert_eq!(copy.label, "First (Copy)");
        assert_eq!(copy.step_ids.len(), 2);

        // no id overlap with the source subtree
        assert_ne!(copy_id, GroupId("g1".to_string()));
        for step_id in &copy.step_ids {
            assert!(!state.steps_by_id.contains_key(step_id));
        }

        // field-for-field content, original order, rebound ownership
        let first_copy = &next.steps_by_id[&copy.step_ids[0]];
        assert_eq!(first_copy.label, "one");
        assert_eq!(first_copy.instructions, "do the thing");
        assert_eq!(first_copy.input_fields.len(), 1);
        assert_eq!(first_copy.group_id, copy_id);
        let second_copy = &next.steps_by_id[&copy.step_ids[1]];
        assert_eq!(second_copy.label, "two");

        // the source group is unmodified
        assert_eq!(order_of(&next, "g1"), vec!["s1", "s2"]);
    }

    #[test]
    fn test_rename_group_unknown_is_no_op() {
        // Scenario E
        let state = two_group_state();
        let next = state.rename_group(&GroupId("nonexistent".to_string()), "X");
        assert_eq!(next, state);
    }

    #[test]
    fn test_rename_and_update_known_ids() {
        let state = two_group_state();
        let next = state
            .rename_group(&GroupId("g1".to_string()), "Renamed")
            .rename_step(&StepId("s1".to_string()), "relabelled")
            .update_step_instructions(&StepId("s1".to_string()), "body");

        assert_eq!(next.groups_by_id[&GroupId("g1".to_string())].label, "Renamed");
        let s1 = &next.steps_by_id[&StepId("s1".to_string())];
        assert_eq!(s1.label, "relabelled");
        assert_eq!(s1.instructions, "body");
        next.validate().unwrap();
    }

    #[test]
    fn test_delete_step() {
        let state = two_group_state();
        let next = state.delete_step(&StepId("s1".to_string()));

        assert!(!next.steps_by_id.contains_key(&StepId("s1".to_string())));
        assert_eq!(order_of(&next, "g1"), vec!["s2"]);
        next.validate().unwrap();

        let unchanged = next.delete_step(&StepId("s1".to_string()));
        assert_eq!(unchanged, next);
    }

    #[test]
    fn test_duplicate_step_appends_to_same_group() {
        let state = two_group_state();
        let next = state.duplicate_step(&StepId("s1".to_string()));
        next.validate().unwrap();

        let ids = order_of(&next, "g1");
        assert_eq!(ids.len(), 3);
        assert_eq!(&ids[..2], ["s1", "s2"]);

        let copy = &next.steps_by_id[&StepId(ids[2].clone())];
        assert_eq!(copy.label, "one (Copy)");
        assert_eq!(copy.group_id, GroupId("g1".to_string()));
    }

    #[test]
    fn test_validate_rejects_broken_states() {
        let mut state = two_group_state();
        state.group_order.push(GroupId("ghost".to_string()));
        assert!(state.validate().is_err());

        let mut state = two_group_state();
        state.steps_by_id.insert(
            StepId("orphan".to_string()),
            step("orphan", "g1", "lost"),
        );
        assert!(state.validate().is_err());

        let mut state = two_group_state();
        if let Some(s1) = state.steps_by_id.get_mut(&StepId("s1".to_string())) {
            s1.group_id = GroupId("g2".to_string());
        }
        assert!(state.validate().is_err());
    }
}
