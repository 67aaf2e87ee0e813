// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fmt::{self, Display};

/// Relative position of a subscriber within one dispatch.
///
/// Variants are declared in run order: a `Highest` subscriber runs before a
/// `High` one, and so on. Subscribers with equal priority run in registration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Highest,
    High,
    #[default]
    Normal,
    Low,
    Lowest,
}

impl Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Highest => "highest",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
            Priority::Lowest => "lowest",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_before_ordering() {
        let mut priorities = vec![
            Priority::Low,
            Priority::Highest,
            Priority::Normal,
            Priority::Lowest,
            Priority::High,
        ];
        priorities.sort();
        assert_eq!(
            priorities,
            vec![
                Priority::Highest,
                Priority::High,
                Priority::Normal,
                Priority::Low,
                Priority::Lowest,
            ]
        );
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn test_deserialize_snake_case() {
        let priority: Priority = serde_yaml::from_str("highest").unwrap();
        assert_eq!(priority, Priority::Highest);
    }
}
