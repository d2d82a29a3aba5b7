// ============================================================
// Layer 5 — Label Encoder
// ============================================================
// A fitted bijection between the string labels seen at training
// time and the codes 0..n. Codes follow sorted label order:
//
//   fit(["Retail", "Banking", "Retail"])
//     classes = ["Banking", "Retail"]
//     encode("Retail")  → Some(1)
//     decode(0)         → Some("Banking")
//
// A fitted encoder is never extended. A label absent at fit time
// has no code and `encode` returns None; the caller decides what
// that means (see ml::inferencer).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Sorted, distinct; a label's code is its index here
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit over every label in `labels`, duplicates allowed.
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = labels.into_iter().collect();
        Self {
            classes: distinct.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
