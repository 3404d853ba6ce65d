//! Per-state cause table produced by `solve_all_states`.

use serde::{Deserialize, Serialize};

use counterfact_core::{Assignment, Value};

/// One reachable state and the actual causes of its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseRow {
    /// Noise that produced the state.
    pub noise: Assignment,
    /// Values in `CauseTable::state_columns` order.
    pub state: Vec<Value>,
    /// Values in `CauseTable::outcome_columns` order.
    pub outcome: Vec<Value>,
    pub causes: Vec<Assignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CauseTable {
    pub state_columns: Vec<String>,
    pub outcome_columns: Vec<String>,
    pub rows: Vec<CauseRow>,
}

impl CauseTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row whose state and outcome columns match `state`.
    pub fn find(&self, state: &Assignment) -> Option<&CauseRow> {
        self.rows.iter().find(|row| {
            self.state_columns
                .iter()
                .zip(&row.state)
                .chain(self.outcome_columns.iter().zip(&row.outcome))
                .all(|(column, value)| state.get(column) == Some(value))
        })
    }

    /// Rebuild the full state of a row.
    pub fn row_state(&self, row: &CauseRow) -> Assignment {
        self.state_columns
            .iter()
            .zip(&row.state)
            .chain(self.outcome_columns.iter().zip(&row.outcome))
            .map(|(c, v)| (c.clone(), v.clone()))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterfact_core::assignment;

    fn table() -> CauseTable {
        CauseTable {
            state_columns: vec!["a".into(), "b".into()],
            outcome_columns: vec!["y".into()],
            rows: vec![
                CauseRow {
                    noise: assignment([("a", 0), ("b", 1)]),
                    state: vec![Value::Int(0), Value::Int(1)],
                    outcome: vec![Value::Int(1)],
                    causes: vec![assignment([("b", 1)])],
                },
                CauseRow {
                    noise: assignment([("a", 1), ("b", 1)]),
                    state: vec![Value::Int(1), Value::Int(1)],
                    outcome: vec![Value::Int(1)],
                    causes: vec![],
                },
            ],
        }
    }

    #[test]
    fn find_matches_every_column() {
        let t = table();
        let row = t.find(&assignment([("a", 0), ("b", 1), ("y", 1)])).unwrap();
        assert_eq!(row.causes, vec![assignment([("b", 1)])]);
        assert!(t.find(&assignment([("a", 0), ("b", 0), ("y", 1)])).is_none());
        assert_eq!(t.row_state(row), assignment([("a", 0), ("b", 1), ("y", 1)]));
    }

    #[test]
    fn json_round_trip() {
        let t = table();
        let back = CauseTable::from_json(&t.to_json().unwrap()).unwrap();
        assert_eq!(back, t);
    }
}
