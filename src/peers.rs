//! Peer comparison: how a user's permission count sits against colleagues
//! with the same role and department.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, UserRecord};
use crate::error::{Result, ToolOutput};

/// Permissions above the peer average before a user counts as an outlier.
const HIGH_MARGIN: f64 = 3.0;
/// Permissions below the peer average before a user counts as an outlier.
const LOW_MARGIN: f64 = 2.0;
/// Peers listed in the result for human review.
const EXAMPLE_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutlierStatus {
    HighPermissions,
    LowPermissions,
    Normal,
    /// No exact peers exist, so no comparison is possible.
    UniqueRole,
}

impl OutlierStatus {
    /// Classify against the unrounded peer average.
    pub fn classify(permission_count: usize, peer_average: f64) -> Self {
        let count = permission_count as f64;
        if count > peer_average + HIGH_MARGIN {
            Self::HighPermissions
        } else if count < peer_average - LOW_MARGIN {
            Self::LowPermissions
        } else {
            Self::Normal
        }
    }
}

impl std::fmt::Display for OutlierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighPermissions => write!(f, "HIGH_PERMISSIONS"),
            Self::LowPermissions => write!(f, "LOW_PERMISSIONS"),
            Self::Normal => write!(f, "NORMAL"),
            Self::UniqueRole => write!(f, "UNIQUE_ROLE"),
        }
    }
}

/// Aggregates over exact peers. Only present when at least one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerStatistics {
    /// Mean peer permission count, rounded to one decimal.
    pub peer_avg_permissions: f64,
    /// User count minus peer mean, rounded to one decimal.
    pub user_vs_peer_difference: f64,
    pub permissions_only_user_has: Vec<String>,
    pub common_permissions_user_missing: Vec<String>,
    /// `"{min}-{max}"` over peer permission counts.
    pub peer_permission_range: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerExample {
    pub username: String,
    pub permission_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub username: String,
    pub department: String,
    pub role: String,
    pub user_permission_count: usize,
    pub exact_peers_found: usize,
    pub role_peers_found: usize,
    pub outlier_status: OutlierStatus,
    /// `None` means not applicable (no exact peers), not zero.
    pub peer_statistics: Option<PeerStatistics>,
    pub peer_examples: Vec<PeerExample>,
    pub status: String,
}

/// Compare a user with their exact and role peers.
pub fn compare(username: &str, dataset: &Dataset) -> ToolOutput<ComparisonResult> {
    ToolOutput::from_result(try_compare(username, dataset), "Peer comparison failed")
}

fn try_compare(username: &str, dataset: &Dataset) -> Result<ComparisonResult> {
    let target = dataset.resolve(username)?;

    let role_peers: Vec<&UserRecord> = dataset
        .iter()
        .filter(|r| r.role == target.role && !r.is_user(&target.username))
        .collect();
    let exact_peers: Vec<&UserRecord> = role_peers
        .iter()
        .copied()
        .filter(|r| r.department == target.department)
        .collect();

    let (outlier_status, peer_statistics) = if exact_peers.is_empty() {
        (OutlierStatus::UniqueRole, None)
    } else {
        let (status, stats) = summarize_peers(target, &exact_peers);
        (status, Some(stats))
    };

    let peer_examples = exact_peers
        .iter()
        .take(EXAMPLE_LIMIT)
        .map(|p| PeerExample {
            username: p.username.clone(),
            permission_count: p.permission_count(),
        })
        .collect();

    tracing::debug!(
        username = %target.username,
        exact_peers = exact_peers.len(),
        role_peers = role_peers.len(),
        outlier = %outlier_status,
        "peer comparison complete"
    );

    Ok(ComparisonResult {
        username: target.username.clone(),
        department: target.department.clone(),
        role: target.role.clone(),
        user_permission_count: target.permission_count(),
        exact_peers_found: exact_peers.len(),
        role_peers_found: role_peers.len(),
        outlier_status,
        peer_statistics,
        peer_examples,
        status: format!(
            "Compared {} with {} exact peers",
            target.username,
            exact_peers.len()
        ),
    })
}

/// `peers` must be non-empty.
fn summarize_peers(target: &UserRecord, peers: &[&UserRecord]) -> (OutlierStatus, PeerStatistics) {
    let counts: Vec<usize> = peers.iter().map(|p| p.permission_count()).collect();
    let average = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    let min = counts.iter().min().copied().unwrap_or_default();
    let max = counts.iter().max().copied().unwrap_or_default();

    // Union of peer tokens, in first-seen order.
    let mut seen = HashSet::new();
    let peer_permissions: Vec<&String> = peers
        .iter()
        .flat_map(|p| p.permissions.iter())
        .filter(|perm| seen.insert(perm.as_str()))
        .collect();

    let own: HashSet<&str> = target.permissions.iter().map(String::as_str).collect();

    let mut listed = HashSet::new();
    let permissions_only_user_has = target
        .permissions
        .iter()
        .filter(|perm| !seen.contains(perm.as_str()) && listed.insert(perm.as_str()))
        .cloned()
        .collect();
    let common_permissions_user_missing = peer_permissions
        .into_iter()
        .filter(|perm| !own.contains(perm.as_str()))
        .cloned()
        .collect();

    let count = target.permission_count();
    let stats = PeerStatistics {
        peer_avg_permissions: round_tenths(average),
        user_vs_peer_difference: round_tenths(count as f64 - average),
        permissions_only_user_has,
        common_permissions_user_missing,
        peer_permission_range: format!("{}-{}", min, max),
    };

    (OutlierStatus::classify(count, average), stats)
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::user;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn compared(dataset: &Dataset, username: &str) -> ComparisonResult {
        match compare(username, dataset) {
            ToolOutput::Ok(result) => result,
            ToolOutput::Err(e) => panic!("comparison failed: {e:?}"),
        }
    }

    fn perms(n: usize, prefix: &str) -> String {
        (0..n)
            .map(|i| format!("{prefix}_{i}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn high_permission_outlier() {
        let dataset = Dataset::new(vec![
            user("target", "Finance", "Analyst", &perms(10, "perm")),
            user("p1", "Finance", "Analyst", &perms(2, "perm")),
            user("p2", "Finance", "Analyst", &perms(3, "perm")),
            user("p3", "Finance", "Analyst", &perms(4, "perm")),
        ]);
        let result = compared(&dataset, "target");
        let stats = result.peer_statistics.unwrap();
        assert_eq!(stats.peer_avg_permissions, 3.0);
        assert_eq!(stats.user_vs_peer_difference, 7.0);
        assert_eq!(stats.peer_permission_range, "2-4");
        assert_eq!(result.outlier_status, OutlierStatus::HighPermissions);
        assert_eq!(
            stats.permissions_only_user_has,
            (4..10).map(|i| format!("perm_{i}")).collect::<Vec<_>>()
        );
        assert!(stats.common_permissions_user_missing.is_empty());
    }

    #[test]
    fn low_permission_outlier_and_missing_permissions() {
        let dataset = Dataset::new(vec![
            user("p1", "IT", "SRE", "a,b,c,d,e"),
            user("target", "IT", "SRE", "a"),
            user("p2", "IT", "SRE", "a,b,c,d,f"),
        ]);
        let result = compared(&dataset, "target");
        let stats = result.peer_statistics.unwrap();
        assert_eq!(result.outlier_status, OutlierStatus::LowPermissions);
        assert_eq!(stats.common_permissions_user_missing, vec!["b", "c", "d", "e", "f"]);
        assert!(stats.permissions_only_user_has.is_empty());
    }

    #[test]
    fn thresholds_are_asymmetric() {
        assert_eq!(OutlierStatus::classify(6, 3.0), OutlierStatus::Normal);
        assert_eq!(OutlierStatus::classify(7, 3.0), OutlierStatus::HighPermissions);
        assert_eq!(OutlierStatus::classify(1, 3.0), OutlierStatus::Normal);
        assert_eq!(OutlierStatus::classify(0, 3.0), OutlierStatus::LowPermissions);
    }

    #[test]
    fn classification_uses_unrounded_average() {
        // Average 3.04 rounds to 3.0 but 6 is not above 6.04.
        assert_eq!(OutlierStatus::classify(6, 3.04), OutlierStatus::Normal);
    }

    #[test]
    fn no_exact_peers_is_unique_role() {
        let dataset = Dataset::new(vec![
            user("target", "Finance", "Analyst", "a,b"),
            user("other", "Sales", "Analyst", "a"),
            user("boss", "Finance", "Controller", "a,b,c"),
        ]);
        let result = compared(&dataset, "target");
        assert_eq!(result.outlier_status, OutlierStatus::UniqueRole);
        assert_eq!(result.exact_peers_found, 0);
        assert_eq!(result.role_peers_found, 1);
        assert!(result.peer_statistics.is_none());
        assert!(result.peer_examples.is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["peer_statistics"].is_null());
    }

    #[test]
    fn field_comparison_is_case_sensitive() {
        let dataset = Dataset::new(vec![
            user("target", "Finance", "Analyst", "a"),
            user("p1", "finance", "Analyst", "a"),
            user("p2", "Finance", "analyst", "a"),
        ]);
        let result = compared(&dataset, "target");
        assert_eq!(result.exact_peers_found, 0);
        assert_eq!(result.role_peers_found, 1);
    }

    #[test]
    fn target_is_excluded_even_when_case_differs() {
        let dataset = Dataset::new(vec![
            user("Alice", "IT", "SRE", "a,b"),
            user("bob", "IT", "SRE", "a"),
        ]);
        let result = compared(&dataset, "ALICE");
        assert_eq!(result.username, "Alice");
        assert_eq!(result.exact_peers_found, 1);
        assert_eq!(result.peer_examples[0].username, "bob");
    }

    #[test]
    fn examples_capped_in_dataset_order() {
        let mut records = vec![user("target", "IT", "SRE", "a")];
        records.extend((0..5).map(|i| user(&format!("peer{i}"), "IT", "SRE", &perms(i, "p"))));
        let result = compared(&Dataset::new(records), "target");
        assert_eq!(result.exact_peers_found, 5);
        assert_eq!(
            result.peer_examples,
            vec![
                PeerExample { username: "peer0".into(), permission_count: 0 },
                PeerExample { username: "peer1".into(), permission_count: 1 },
                PeerExample { username: "peer2".into(), permission_count: 2 },
            ]
        );
    }

    #[test]
    fn compare_is_idempotent() {
        let dataset = Dataset::new(vec![
            user("a", "IT", "SRE", "x,y,z"),
            user("b", "IT", "SRE", "x"),
            user("c", "IT", "SRE", "y,w"),
        ]);
        assert_eq!(compare("a", &dataset), compare("a", &dataset));
    }

    #[test]
    fn unknown_user_is_not_found() {
        let dataset = Dataset::new(vec![user("a", "IT", "SRE", "x")]);
        let out = compare("zed", &dataset);
        assert_eq!(out.err().unwrap().kind, ErrorKind::NotFound);
    }
}
