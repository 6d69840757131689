use crate::model::RelationshipEdge;

const MISSING_MARKER: &str = "missing";

/// Known data and control flows, drawn in this order.
pub fn default_relationships() -> Vec<RelationshipEdge> {
    [
        ("chatops-open-webui", "chatops-localai", "calls LLM"),
        ("chatops-open-webui", "NetBox (remote)", "NetBox function"),
        ("st2-docker-st2api-1", "st2-docker-mongo-1", "db"),
        ("st2-docker-st2api-1", "st2-docker-rabbitmq-1", "messaging"),
        ("st2-docker-st2api-1", "st2-docker-redis-1", "coordination"),
        ("st2-docker-st2api-1", "NetBox (remote)", "inventory API"),
        ("st2-docker-st2api-1", "Gluware (remote)", "config push"),
        ("st2-docker-st2api-1", "Batfish (missing)", "validation"),
    ]
    .into_iter()
    .map(|(src, dst, label)| RelationshipEdge::new(src, dst, label))
    .collect()
}

/// Whether an edge points at something marked absent, judged by its destination name.
pub fn targets_missing(dest_name: &str) -> bool {
    dest_name.to_lowercase().contains(MISSING_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_order_and_size() {
        let edges = default_relationships();
        assert_eq!(edges.len(), 8);
        assert_eq!(edges[0].source_name, "chatops-open-webui");
        assert_eq!(edges[0].label, "calls LLM");
        assert_eq!(edges[7].dest_name, "Batfish (missing)");
    }

    #[test]
    fn missing_marker_is_case_insensitive() {
        assert!(targets_missing("Batfish (missing)"));
        assert!(targets_missing("Batfish (MISSING)"));
        assert!(targets_missing("MissingService"));
        assert!(!targets_missing("NetBox (remote)"));
    }

    #[test]
    fn only_last_default_edge_targets_missing() {
        let flagged: Vec<_> = default_relationships()
            .into_iter()
            .filter(|e| targets_missing(&e.dest_name))
            .map(|e| e.label)
            .collect();
        assert_eq!(flagged, vec!["validation".to_string()]);
    }
}
