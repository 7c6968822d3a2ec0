use std::collections::HashMap;

use crate::Position;
use crate::error::{NodeError, NodeField};

/// Search bookkeeping for one position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeRecord {
    pub cost: Option<f64>,
    pub cost_to_come: Option<f64>,
    pub cost_to_go: Option<f64>,
    /// Row-major index of the predecessor; `None` for the start or an undiscovered node.
    pub parent: Option<usize>,
    pub visited: bool,
}

/// Per-position records for a single search run. Records appear on first update.
#[derive(Debug, Default)]
pub struct NodesManager {
    records: HashMap<Position, NodeRecord>,
}

impl NodesManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_mut(&mut self, position: Position) -> &mut NodeRecord {
        self.records.entry(position).or_default()
    }

    fn scalar(&self, position: Position, field: NodeField) -> Result<f64, NodeError> {
        let record = self.records.get(&position);
        let value = match field {
            NodeField::Cost => record.and_then(|r| r.cost),
            NodeField::CostToCome => record.and_then(|r| r.cost_to_come),
            NodeField::CostToGo => record.and_then(|r| r.cost_to_go),
            NodeField::Parent => None,
        };
        value.ok_or(NodeError::Unset { position, field })
    }

    pub fn update_cost(&mut self, position: Position, cost: f64) {
        self.record_mut(position).cost = Some(cost);
    }

    pub fn update_cost_to_come(&mut self, position: Position, cost_to_come: f64) {
        self.record_mut(position).cost_to_come = Some(cost_to_come);
    }

    pub fn update_cost_to_go(&mut self, position: Position, cost_to_go: f64) {
        self.record_mut(position).cost_to_go = Some(cost_to_go);
    }

    pub fn get_cost(&self, position: Position) -> Result<f64, NodeError> {
        self.scalar(position, NodeField::Cost)
    }

    pub fn get_cost_to_come(&self, position: Position) -> Result<f64, NodeError> {
        self.scalar(position, NodeField::CostToCome)
    }

    pub fn get_cost_to_go(&self, position: Position) -> Result<f64, NodeError> {
        self.scalar(position, NodeField::CostToGo)
    }

    /// Overwrites the predecessor, used whenever a cheaper route is found.
    pub fn update_parent(&mut self, position: Position, parent: usize) {
        self.record_mut(position).parent = Some(parent);
    }

    /// `Ok(None)` for a known node without a predecessor, such as the start.
    pub fn get_parent(&self, position: Position) -> Result<Option<usize>, NodeError> {
        self.records
            .get(&position)
            .map(|r| r.parent)
            .ok_or(NodeError::Unset { position, field: NodeField::Parent })
    }

    /// Closes the node. There is no way back.
    pub fn update_visited(&mut self, position: Position) {
        self.record_mut(position).visited = true;
    }

    pub fn get_visited_status(&self, position: Position) -> bool {
        self.records.get(&position).is_some_and(|r| r.visited)
    }

    pub fn record(&self, position: Position) -> Option<&NodeRecord> {
        self.records.get(&position)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.records.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.records.values().filter(|r| r.visited).count()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
