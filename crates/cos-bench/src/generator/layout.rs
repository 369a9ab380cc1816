//! Conference, division, and team records.

use serde_json::{Value, json};

use super::GeneratorConfig;

pub fn conference_name(conference: usize) -> String {
    format!("Conference {}", conference + 1)
}

pub fn division_name(conference: usize, division: usize) -> String {
    format!("Conference {} Division {}", conference + 1, division + 1)
}

/// Team ids grouped by conference, then division.
#[derive(Debug, Clone)]
pub struct Layout {
    pub conferences: Vec<Vec<Vec<String>>>,
}

impl Layout {
    pub fn new(config: &GeneratorConfig) -> Self {
        let per_conference = config.divisions_per_conference * config.teams_per_division;
        let conferences = (0..config.conferences)
            .map(|c| {
                (0..config.divisions_per_conference)
                    .map(|d| {
                        let first = c * per_conference + d * config.teams_per_division + 1;
                        (first..first + config.teams_per_division)
                            .map(|n| format!("T{n:03}"))
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self { conferences }
    }

    pub fn groups_json(&self) -> Vec<Value> {
        let mut groups = Vec::new();
        for (c, divisions) in self.conferences.iter().enumerate() {
            groups.push(json!({
                "name": conference_name(c),
                "abbreviation": format!("C{}", c + 1),
            }));
            for d in 0..divisions.len() {
                groups.push(json!({
                    "name": division_name(c, d),
                    "abbreviation": format!("C{}D{}", c + 1, d + 1),
                    "parent": conference_name(c),
                }));
            }
        }
        groups
    }

    pub fn teams_json(&self) -> Vec<Value> {
        let mut teams = Vec::new();
        for (c, divisions) in self.conferences.iter().enumerate() {
            for (d, ids) in divisions.iter().enumerate() {
                for id in ids {
                    teams.push(json!({
                        "id": id,
                        "name": format!("Team {id}"),
                        "abbreviation": id,
                        "group": division_name(c, d),
                    }));
                }
            }
        }
        teams
    }
}
