//! Concept-cluster dictionary: the lightweight semantic layer.
//!
//! Maps vocabulary to conceptual roots (`prabhat` and `sunrise` both belong
//! to the `morning` cluster) so that paraphrased titles register conceptual
//! overlap without any embedding model. Deliberately coarse: the similarity
//! signal is boolean cluster co-membership, not a dense distance.

use std::collections::HashMap;

/// Curated cluster table. Each token appears in at most one cluster.
pub struct ConceptClusters {
    clusters: Vec<(String, Vec<String>)>,
    token_to_root: HashMap<String, String>,
}

impl Default for ConceptClusters {
    fn default() -> Self {
        Self::from_table(&[
            ("morning", &["morning", "dawn", "sunrise", "prabhat", "bhor", "ark"][..]),
            ("evening", &["evening", "sandhya", "dusk", "sunset", "nightfall"]),
            ("news", &["news", "samachar", "khabar", "shabdan", "varta"]),
            ("daily", &["daily", "dainik", "pratidin", "rozana"]),
            ("weekly", &["weekly", "saptahik", "hafta"]),
            ("government", &["governance", "rajya", "shashan", "sarkari", "public"]),
            ("crime", &["crime", "police", "scandal", "corruption", "apradh"]),
            ("health", &["health", "swasthya", "medical", "ayurved", "vital"]),
            ("business", &["business", "vyapar", "trade", "commerce", "economy"]),
            ("sports", &["sports", "khel", "kridan", "stadium"]),
            ("educational", &["education", "shiksha", "vidya", "study", "learning"]),
            ("mirror", &["mirror", "darpan", "reflection", "aaina"]),
            ("herald", &["herald", "messenger", "doot", "varta", "post"]),
            ("chronicle", &["chronicle", "history", "itihas", "patrika", "journal"]),
        ])
    }
}

impl ConceptClusters {
    /// Build from `(root, variants)` pairs. When a token is listed under
    /// several clusters, the first listing wins.
    pub fn from_table(table: &[(&str, &[&str])]) -> Self {
        let mut clusters = Vec::with_capacity(table.len());
        let mut token_to_root = HashMap::new();
        for (root, variants) in table {
            let root = root.to_lowercase();
            token_to_root
                .entry(root.clone())
                .or_insert_with(|| root.clone());
            let variants: Vec<String> = variants.iter().map(|v| v.to_lowercase()).collect();
            for v in &variants {
                token_to_root
                    .entry(v.clone())
                    .or_insert_with(|| root.clone());
            }
            clusters.push((root, variants));
        }
        Self {
            clusters,
            token_to_root,
        }
    }

    /// Build from an owned mapping, e.g. deserialized configuration.
    pub fn from_map(map: &HashMap<String, Vec<String>>) -> Self {
        let mut entries: Vec<(&str, Vec<&str>)> = map
            .iter()
            .map(|(k, v)| (k.as_str(), v.iter().map(String::as_str).collect()))
            .collect();
        // Deterministic first-wins resolution regardless of map order
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let table: Vec<(&str, &[&str])> =
            entries.iter().map(|(k, v)| (*k, v.as_slice())).collect();
        Self::from_table(&table)
    }

    /// The cluster root for `word`, or `word` itself when unclustered.
    pub fn concept_root<'a>(&'a self, word: &'a str) -> &'a str {
        self.token_to_root
            .get(word)
            .map(String::as_str)
            .unwrap_or(word)
    }

    /// Whether `word` belongs to any cluster under a different root.
    pub fn has_foreign_root(&self, word: &str) -> bool {
        self.concept_root(word) != word
    }

    /// Cluster variants that could replace `word`, excluding `word` itself.
    pub fn alternatives(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        let Some(root) = self.token_to_root.get(&word) else {
            return vec![];
        };
        let Some((_, variants)) = self.clusters.iter().find(|(r, _)| r == root) else {
            return vec![];
        };
        variants.iter().filter(|v| **v != word).cloned().collect()
    }

    /// Boolean conceptual overlap between two titles.
    ///
    /// Tokens longer than three characters map to their roots; only roots
    /// that are cluster keys count. Returns 1.0 when the two key-sets share
    /// any member, else 0.0.
    pub fn similarity(&self, title_a: &str, title_b: &str) -> f64 {
        let roots_a = self.cluster_keys(title_a);
        let roots_b = self.cluster_keys(title_b);
        if roots_a.iter().any(|r| roots_b.contains(r)) {
            1.0
        } else {
            0.0
        }
    }

    fn cluster_keys(&self, title: &str) -> Vec<&str> {
        let lowered = title.to_lowercase();
        let mut keys: Vec<&str> = Vec::new();
        for token in lowered.split_whitespace() {
            if token.chars().count() <= 3 {
                continue;
            }
            if let Some(root) = self.token_to_root.get(token)
                && !keys.contains(&root.as_str())
            {
                keys.push(root.as_str());
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_lookup() {
        let c = ConceptClusters::default();
        assert_eq!(c.concept_root("prabhat"), "morning");
        assert_eq!(c.concept_root("dainik"), "daily");
        assert_eq!(c.concept_root("jagran"), "jagran");
    }

    #[test]
    fn cluster_key_maps_to_itself() {
        let c = ConceptClusters::default();
        assert_eq!(c.concept_root("morning"), "morning");
        assert!(!c.has_foreign_root("morning"));
        assert!(c.has_foreign_root("prabhat"));
    }

    #[test]
    fn alternatives_exclude_the_word() {
        let c = ConceptClusters::default();
        let alts = c.alternatives("dainik");
        assert!(alts.contains(&"pratidin".to_string()));
        assert!(alts.contains(&"rozana".to_string()));
        assert!(!alts.contains(&"dainik".to_string()));
    }

    #[test]
    fn alternatives_empty_for_unclustered() {
        let c = ConceptClusters::default();
        assert!(c.alternatives("jagran").is_empty());
    }

    #[test]
    fn similarity_shared_cluster() {
        let c = ConceptClusters::default();
        assert_eq!(c.similarity("prabhat patra", "sunrise herald"), 1.0);
        assert_eq!(c.similarity("khel samachar", "sports news"), 1.0);
    }

    #[test]
    fn similarity_disjoint() {
        let c = ConceptClusters::default();
        assert_eq!(c.similarity("sunrise herald", "vyapar patrika"), 0.0);
    }

    #[test]
    fn short_tokens_ignored() {
        let c = ConceptClusters::default();
        // "ark" is a morning-cluster variant but only three characters long
        assert_eq!(c.similarity("ark times", "sunrise herald"), 0.0);
    }

    #[test]
    fn token_in_one_cluster_only() {
        // "varta" is listed under both news and herald; first listing wins
        let c = ConceptClusters::default();
        assert_eq!(c.concept_root("varta"), "news");
    }

    #[test]
    fn from_map_is_deterministic() {
        let mut map = HashMap::new();
        map.insert("alpha".to_string(), vec!["shared".to_string()]);
        map.insert("beta".to_string(), vec!["shared".to_string()]);
        let c = ConceptClusters::from_map(&map);
        assert_eq!(c.concept_root("shared"), "alpha");
    }
}
