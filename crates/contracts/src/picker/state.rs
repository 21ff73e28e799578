use super::error::PickerError;
use super::line_item::LineItem;

/// Default currency when no selected item carries one
pub const FALLBACK_CURRENCY: &str = "GBP";

/// How picker mutations are applied.
///
/// A new, unpersisted invoice mutates [`SelectionState`] locally; once the
/// invoice is persisted every add/remove goes to the provider and the
/// server's snapshot replaces local state (no optimistic mutation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Local,
    Remote { invoice_id: i64 },
}

impl PickerMode {
    pub fn is_remote(&self) -> bool {
        matches!(self, PickerMode::Remote { .. })
    }
}

/// Authoritative in-memory state of the line-item picker.
///
/// Invariant: `available` and `selected` are disjoint by id; every item
/// fetched for the current owner lives in exactly one of the two lists.
/// The subtotal is always derived from `selected`, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    owner: Option<i64>,
    available: Vec<LineItem>,
    selected: Vec<LineItem>,
    /// Bumped on every owner change and fetch start; responses carrying a
    /// stale epoch are discarded instead of repopulating the wrong owner's
    /// items.
    fetch_epoch: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<i64> {
        self.owner
    }

    pub fn available(&self) -> &[LineItem] {
        &self.available
    }

    pub fn selected(&self) -> &[LineItem] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.selected.is_empty()
    }

    /// Replace the state wholesale for a new owner (or none). Clears both
    /// lists and invalidates any in-flight fetch.
    pub fn reset(&mut self, owner: Option<i64>) {
        self.owner = owner;
        self.available.clear();
        self.selected.clear();
        self.fetch_epoch += 1;
    }

    /// Mark the start of an available-items fetch for the current owner.
    /// The returned epoch must be handed back to [`complete_fetch`];
    /// a later owner change or fetch start makes it stale.
    ///
    /// [`complete_fetch`]: SelectionState::complete_fetch
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_epoch += 1;
        self.fetch_epoch
    }

    /// Install fetched items as the available list. Returns `false` (and
    /// changes nothing) when the epoch is stale. Items already selected are
    /// filtered out so the lists stay disjoint; duplicate ids in the payload
    /// keep their first occurrence.
    pub fn complete_fetch(&mut self, epoch: u64, items: Vec<LineItem>) -> bool {
        if epoch != self.fetch_epoch {
            return false;
        }
        self.available.clear();
        for item in items {
            if !self.contains(item.id) {
                self.available.push(item);
            }
        }
        true
    }

    /// Seed the selected list from server data when editing a persisted
    /// invoice, before the first render.
    pub fn hydrate_selected(&mut self, items: Vec<LineItem>) {
        self.selected.clear();
        for item in items {
            if self.selected.iter().all(|s| s.id != item.id) {
                self.available.retain(|a| a.id != item.id);
                self.selected.push(item);
            }
        }
    }

    /// Move an item from available to selected.
    pub fn add(&mut self, id: i64) -> Result<(), PickerError> {
        if self.selected.iter().any(|s| s.id == id) {
            return Err(PickerError::DuplicateSelection);
        }
        let pos = self
            .available
            .iter()
            .position(|a| a.id == id)
            .ok_or(PickerError::NotFound)?;
        let item = self.available.remove(pos);
        self.selected.push(item);
        Ok(())
    }

    /// Move an item from selected back to available. Unknown ids are a
    /// silent no-op.
    pub fn remove(&mut self, id: i64) {
        if let Some(pos) = self.selected.iter().position(|s| s.id == id) {
            let item = self.selected.remove(pos);
            self.available.push(item);
        }
    }

    /// Fold an authoritative server snapshot of the selected list into the
    /// state (Remote mode). Items that left the selection return to
    /// available; items that entered it leave available.
    pub fn replace_selected(&mut self, snapshot: Vec<LineItem>) {
        let old_selected = std::mem::take(&mut self.selected);
        for prev in old_selected {
            if snapshot.iter().all(|s| s.id != prev.id) {
                self.available.push(prev);
            }
        }
        for item in snapshot {
            if self.selected.iter().all(|s| s.id != item.id) {
                self.available.retain(|a| a.id != item.id);
                self.selected.push(item);
            }
        }
    }

    /// Derived sum of selected prices. Zero-price items contribute zero.
    pub fn subtotal(&self) -> f64 {
        self.selected.iter().map(|s| s.price).sum()
    }

    /// Subtotal formatted to two decimal places
    pub fn subtotal_display(&self) -> String {
        format!("{:.2}", self.subtotal())
    }

    /// Currency of the first selected item, or the configured fallback
    pub fn currency(&self) -> &str {
        self.selected
            .iter()
            .find_map(|s| s.currency.as_deref())
            .unwrap_or(FALLBACK_CURRENCY)
    }

    /// The exact payload that accompanies form submission: the selected
    /// items as a JSON array. Recomputed on every call so it can never be
    /// stale.
    pub fn serialize(&self) -> String {
        serde_json::to_string(&self.selected).unwrap_or_else(|_| "[]".to_string())
    }

    fn contains(&self, id: i64) -> bool {
        self.available.iter().any(|a| a.id == id) || self.selected.iter().any(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, price: f64) -> LineItem {
        LineItem::new(id, format!("UK - Initial #{}", id), price, None)
    }

    fn fetched(state: &mut SelectionState, owner: i64, items: Vec<LineItem>) {
        state.reset(Some(owner));
        let epoch = state.begin_fetch();
        assert!(state.complete_fetch(epoch, items));
    }

    fn ids(items: &[LineItem]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn add_remove_preserves_disjoint_union() {
        let mut state = SelectionState::new();
        fetched(&mut state, 1, vec![item(1, 100.0), item(2, 50.0), item(3, 0.0)]);

        state.add(2).unwrap();
        state.add(3).unwrap();
        state.remove(2);
        state.add(1).unwrap();
        state.remove(99); // no-op

        let mut all: Vec<i64> = ids(state.available())
            .into_iter()
            .chain(ids(state.selected()))
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3]);
        for id in ids(state.selected()) {
            assert!(!ids(state.available()).contains(&id));
        }
    }

    #[test]
    fn subtotal_is_exact_sum_including_zero_prices() {
        let mut state = SelectionState::new();
        fetched(&mut state, 1, vec![item(1, 125.0), item(2, 0.0), item(3, 150.0)]);

        state.add(1).unwrap();
        state.add(2).unwrap();
        assert_eq!(state.subtotal(), 125.0);
        state.add(3).unwrap();
        assert_eq!(state.subtotal(), 275.0);
        state.remove(1);
        assert_eq!(state.subtotal(), 150.0);
        assert_eq!(state.subtotal_display(), "150.00");
    }

    #[test]
    fn duplicate_add_is_rejected_and_state_unchanged() {
        let mut state = SelectionState::new();
        fetched(&mut state, 1, vec![item(1, 100.0), item(2, 50.0)]);
        state.add(1).unwrap();

        let before = state.clone();
        assert_eq!(state.add(1), Err(PickerError::DuplicateSelection));
        assert_eq!(state, before);
    }

    #[test]
    fn add_of_absent_id_is_not_found() {
        let mut state = SelectionState::new();
        fetched(&mut state, 1, vec![item(1, 100.0)]);

        let before = state.clone();
        assert_eq!(state.add(99), Err(PickerError::NotFound));
        assert_eq!(state, before);
    }

    #[test]
    fn remove_of_unselected_id_is_noop() {
        let mut state = SelectionState::new();
        fetched(&mut state, 1, vec![item(1, 100.0)]);

        let before = state.clone();
        state.remove(1);
        assert_eq!(state, before);
    }

    #[test]
    fn owner_change_resets_and_discards_stale_fetch() {
        let mut state = SelectionState::new();
        state.reset(Some(1));
        let stale_epoch = state.begin_fetch();

        // Owner changes before the first response arrives
        state.reset(Some(2));
        let fresh_epoch = state.begin_fetch();

        // Late response for owner 1 must be ignored
        assert!(!state.complete_fetch(stale_epoch, vec![item(10, 100.0)]));
        assert!(state.available().is_empty());

        assert!(state.complete_fetch(fresh_epoch, vec![item(20, 150.0)]));
        assert_eq!(ids(state.available()), vec![20]);
        assert!(state.selected().is_empty());
    }

    #[test]
    fn superseded_fetch_for_same_owner_is_discarded() {
        let mut state = SelectionState::new();
        state.reset(Some(1));
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(!state.complete_fetch(first, vec![item(1, 1.0)]));
        assert!(state.complete_fetch(second, vec![item(2, 2.0)]));
        assert_eq!(ids(state.available()), vec![2]);
    }

    // Scenario from the picker contract: string prices, add/add/remove
    #[test]
    fn add_remove_scenario_with_wire_prices() {
        let payload = r#"[
            {"id": 1, "name": "Schengen - Initial", "price": "100.00", "currency": "GBP"},
            {"id": 2, "name": "UK - Initial", "price": "50.00"}
        ]"#;
        let items: Vec<LineItem> = serde_json::from_str(payload).unwrap();

        let mut state = SelectionState::new();
        fetched(&mut state, 1, items);

        state.add(1).unwrap();
        assert_eq!(ids(state.selected()), vec![1]);
        assert_eq!(state.subtotal_display(), "100.00");
        assert_eq!(state.currency(), "GBP");

        state.add(2).unwrap();
        assert_eq!(state.subtotal_display(), "150.00");

        state.remove(1);
        assert_eq!(state.subtotal_display(), "50.00");
        assert!(ids(state.available()).contains(&1));
    }

    #[test]
    fn currency_falls_back_when_nothing_selected() {
        let state = SelectionState::new();
        assert_eq!(state.currency(), FALLBACK_CURRENCY);
    }

    #[test]
    fn hydrated_selection_is_excluded_from_fetch() {
        let mut state = SelectionState::new();
        state.reset(Some(1));
        state.hydrate_selected(vec![item(1, 100.0)]);

        let epoch = state.begin_fetch();
        // Provider did not exclude item 1; the state must
        assert!(state.complete_fetch(epoch, vec![item(1, 100.0), item(2, 50.0)]));
        assert_eq!(ids(state.available()), vec![2]);
        assert_eq!(ids(state.selected()), vec![1]);
    }

    #[test]
    fn replace_selected_reconciles_both_lists() {
        let mut state = SelectionState::new();
        fetched(&mut state, 1, vec![item(1, 100.0), item(2, 50.0), item(3, 25.0)]);
        state.add(1).unwrap();

        // Server says: 2 and 3 are selected now, 1 is not
        state.replace_selected(vec![item(2, 50.0), item(3, 25.0)]);

        assert_eq!(ids(state.selected()), vec![2, 3]);
        assert!(ids(state.available()).contains(&1));
        assert!(!ids(state.available()).contains(&2));
        assert_eq!(state.subtotal(), 75.0);
    }

    #[test]
    fn serialize_reflects_current_selection() {
        let mut state = SelectionState::new();
        fetched(&mut state, 1, vec![item(1, 100.0)]);
        assert_eq!(state.serialize(), "[]");

        state.add(1).unwrap();
        let parsed: Vec<LineItem> = serde_json::from_str(&state.serialize()).unwrap();
        assert_eq!(ids(&parsed), vec![1]);
        assert_eq!(parsed[0].price, 100.0);
    }
}
