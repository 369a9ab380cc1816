//! Game generation: matchups, outcomes, and dates.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use cos_core::serde_helpers::PROVIDER_DATE_FORMAT;
use rand::Rng;
use rand::rngs::StdRng;
use serde_json::{Value, json};

use super::GeneratorConfig;
use super::layout::Layout;

/// Weeks of played games; unplayed games fall in the weeks after.
const PLAYED_WEEKS: usize = 12;
const REMAINING_WEEKS: usize = 5;

/// A pairing before home/away and outcome are drawn.
#[derive(Debug, Clone)]
struct Matchup<'a> {
    a: &'a str,
    b: &'a str,
    /// Winner dictated by a planted circle.
    forced: Option<&'a str>,
}

/// Returns `(decided games, upcoming games)` as snapshot records.
pub fn build_schedule(
    layout: &Layout,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> (Vec<Value>, Vec<Value>) {
    let mut matchups = Vec::new();
    for divisions in &layout.conferences {
        for teams in divisions {
            round_robin(teams, config.plant_circles, &mut matchups);
        }
    }
    for (c, divisions) in layout.conferences.iter().enumerate() {
        for (d, teams) in divisions.iter().enumerate() {
            for team in teams {
                for _ in 0..config.cross_division_games {
                    if let Some(opponent) = pick_opponent(layout, rng, |oc, od| oc == c && od != d) {
                        matchups.push(Matchup {
                            a: team,
                            b: opponent,
                            forced: None,
                        });
                    }
                }
                for _ in 0..config.interconference_games {
                    if let Some(opponent) = pick_opponent(layout, rng, |oc, _| oc != c) {
                        matchups.push(Matchup {
                            a: team,
                            b: opponent,
                            forced: None,
                        });
                    }
                }
            }
        }
    }

    let undecided = if (0.0..=1.0).contains(&config.undecided_fraction) {
        config.undecided_fraction
    } else {
        0.0
    };
    let mut games = Vec::new();
    let mut upcoming = Vec::new();
    for (k, m) in matchups.iter().enumerate() {
        let (home, away) = if rng.gen_bool(0.5) { (m.a, m.b) } else { (m.b, m.a) };
        let id = format!("G{k:05}");
        if m.forced.is_none() && rng.gen_bool(undecided) {
            let week = PLAYED_WEEKS + 1 + k % REMAINING_WEEKS;
            upcoming.push(json!({
                "id": id,
                "date": kickoff(week, k),
                "week": format!("Week {week}"),
                "home": home,
                "away": away,
            }));
            continue;
        }
        let winner = m.forced.unwrap_or(if rng.gen_bool(0.5) { m.a } else { m.b });
        let winning_score: u32 = rng.gen_range(10..=45);
        let losing_score: u32 = rng.gen_range(0..winning_score);
        let (home_score, away_score) = if winner == home {
            (winning_score, losing_score)
        } else {
            (losing_score, winning_score)
        };
        let week = 1 + k % PLAYED_WEEKS;
        games.push(json!({
            "id": id,
            "date": kickoff(week, k),
            "week": format!("Week {week}"),
            "home": home,
            "away": away,
            "home_score": home_score,
            "away_score": away_score,
        }));
    }
    (games, upcoming)
}

/// Every pair of `teams` once. With `plant`, pairs on the circle
/// `t0 -> t1 -> ... -> t(n-1) -> t0` get a forced winner.
fn round_robin<'a>(teams: &'a [String], plant: bool, out: &mut Vec<Matchup<'a>>) {
    let n = teams.len();
    let plant = plant && n >= 3;
    for i in 0..n {
        for j in (i + 1)..n {
            let forced = if !plant {
                None
            } else if j == i + 1 {
                Some(teams[i].as_str())
            } else if i == 0 && j == n - 1 {
                Some(teams[j].as_str())
            } else {
                None
            };
            out.push(Matchup {
                a: &teams[i],
                b: &teams[j],
                forced,
            });
        }
    }
}

/// A uniformly random team among the divisions accepted by `accept(conference, division)`.
fn pick_opponent<'a>(
    layout: &'a Layout,
    rng: &mut StdRng,
    accept: impl Fn(usize, usize) -> bool,
) -> Option<&'a str> {
    let accept = &accept;
    let pool: Vec<&str> = layout
        .conferences
        .iter()
        .enumerate()
        .flat_map(|(c, divisions)| {
            divisions
                .iter()
                .enumerate()
                .filter(move |&(d, _)| accept(c, d))
                .flat_map(|(_, teams)| teams.iter().map(String::as_str))
        })
        .collect();
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

/// Sunday kickoffs from September 3rd, 2023, staggered by three hours.
fn kickoff(week: usize, k: usize) -> String {
    let start = NaiveDate::from_ymd_opt(2023, 9, 3).unwrap_or_default();
    let days = i64::try_from((week - 1) * 7).unwrap_or_default();
    let hours = i64::try_from(13 + (k % 3) * 3).unwrap_or_default();
    let at: NaiveDateTime =
        start.and_time(NaiveTime::MIN) + Duration::days(days) + Duration::hours(hours);
    at.format(PROVIDER_DATE_FORMAT).to_string()
}
