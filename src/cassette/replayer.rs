//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Serves a cassette's interactions back in recorded order, with an
/// independent cursor per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for the given port and method, or an
    /// error naming what was requested when the cassette has none left.
    ///
    /// # Errors
    ///
    /// Returns an error if no (more) interactions exist for the pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, String> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            ));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        if *cursor >= queue.len() {
            return Err(format!(
                "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
                 have been consumed. Last interaction was seq={last_seq}.",
                count = queue.len(),
                last_seq = queue.last().map_or(0, |i| i.seq),
            ));
        }

        let interaction = &queue[*cursor];
        *cursor += 1;
        Ok(interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "tickets".into(), method: method.into(), input: json!({}), output }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            tracker: "jira".into(),
            interactions,
        }
    }

    #[test]
    fn replays_each_method_in_order() {
        let cassette = make_cassette(vec![
            interaction(0, "exists", json!({"Ok": false})),
            interaction(1, "create", json!({"Ok": {"id": "OPS-1"}})),
            interaction(2, "exists", json!({"Ok": true})),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("tickets", "exists").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("tickets", "create").unwrap().seq, 1);
        let third = replayer.next_interaction("tickets", "exists").unwrap();
        assert_eq!(third.output, json!({"Ok": true}));
    }

    #[test]
    fn exhausted_pair_reports_error() {
        let cassette = make_cassette(vec![interaction(0, "exists", json!({"Ok": false}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("tickets", "exists").unwrap();
        let err = replayer.next_interaction("tickets", "exists").unwrap_err();
        assert!(err.contains("have been consumed"));
    }

    #[test]
    fn unknown_pair_lists_available() {
        let cassette = make_cassette(vec![interaction(0, "exists", json!({"Ok": false}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("credentials", "fetch_credential").unwrap_err();
        assert!(err.contains("no interactions recorded"));
        assert!(err.contains("tickets::exists"));
    }
}
