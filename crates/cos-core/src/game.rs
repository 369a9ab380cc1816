/// Decided and undecided game records.
///
/// A [`Game`] is immutable once constructed: the winner and loser are derived
/// from the scores, and the `home_won` flag is kept only as a convenience that
/// must agree with them. Ties are rejected because a drawn game contributes no
/// directed edge to a results graph.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::newtypes::{GameId, TeamId};

/// Errors raised when a game record violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Both sides of the game name the same team.
    #[error("game {game_id}: home and away are the same team {team_id}")]
    SameTeam {
        /// The offending game.
        game_id: GameId,
        /// The team named on both sides.
        team_id: TeamId,
    },
    /// The final score is level, so no winner can be derived.
    #[error("game {game_id}: tied score {score}-{score} has no winner")]
    TiedScore {
        /// The offending game.
        game_id: GameId,
        /// The shared score.
        score: u32,
    },
    /// A supplied `home_won` flag disagrees with the scores.
    #[error("game {game_id}: home_won={home_won} contradicts score {home_score}-{away_score}")]
    InconsistentFlag {
        /// The offending game.
        game_id: GameId,
        /// The flag as supplied.
        home_won: bool,
        /// Home score.
        home_score: u32,
        /// Away score.
        away_score: u32,
    },
}

/// Which side of a fixture a team played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The home team.
    Home,
    /// The away team.
    Away,
}

impl Side {
    /// Returns the opposite side.
    pub fn other(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A completed game with a final score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameRecord")]
pub struct Game {
    id: GameId,
    #[serde(with = "crate::serde_helpers::kickoff")]
    date: DateTime<Utc>,
    week: String,
    home: TeamId,
    away: TeamId,
    home_score: u32,
    away_score: u32,
    home_won: bool,
}

/// Unvalidated wire form of a [`Game`]; `home_won` may be omitted.
#[derive(Deserialize)]
struct GameRecord {
    id: GameId,
    #[serde(with = "crate::serde_helpers::kickoff")]
    date: DateTime<Utc>,
    #[serde(default)]
    week: String,
    home: TeamId,
    away: TeamId,
    home_score: u32,
    away_score: u32,
    #[serde(default)]
    home_won: Option<bool>,
}

impl TryFrom<GameRecord> for Game {
    type Error = GameError;

    fn try_from(r: GameRecord) -> Result<Self, Self::Error> {
        let game = Game::new(
            r.id,
            r.date,
            r.week,
            r.home,
            r.away,
            r.home_score,
            r.away_score,
        )?;
        match r.home_won {
            Some(flag) if flag != game.home_won => Err(GameError::InconsistentFlag {
                game_id: game.id,
                home_won: flag,
                home_score: game.home_score,
                away_score: game.away_score,
            }),
            Some(_) | None => Ok(game),
        }
    }
}

impl Game {
    /// Records a completed game.
    ///
    /// # Errors
    ///
    /// - [`GameError::SameTeam`] if `home == away`.
    /// - [`GameError::TiedScore`] if the scores are equal.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: GameId,
        date: DateTime<Utc>,
        week: impl Into<String>,
        home: TeamId,
        away: TeamId,
        home_score: u32,
        away_score: u32,
    ) -> Result<Self, GameError> {
        if home == away {
            return Err(GameError::SameTeam {
                game_id: id,
                team_id: home,
            });
        }
        if home_score == away_score {
            return Err(GameError::TiedScore {
                game_id: id,
                score: home_score,
            });
        }
        Ok(Self {
            id,
            date,
            week: week.into(),
            home,
            away,
            home_score,
            away_score,
            home_won: home_score > away_score,
        })
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn week(&self) -> &str {
        &self.week
    }

    pub fn home(&self) -> &TeamId {
        &self.home
    }

    pub fn away(&self) -> &TeamId {
        &self.away
    }

    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    pub fn home_won(&self) -> bool {
        self.home_won
    }

    /// The side that won, resolved by comparing scores.
    pub fn winning_side(&self) -> Side {
        if self.home_score > self.away_score {
            Side::Home
        } else {
            Side::Away
        }
    }

    /// The team on `side`.
    pub fn team(&self, side: Side) -> &TeamId {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// The score of `side`.
    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn winner(&self) -> &TeamId {
        self.team(self.winning_side())
    }

    pub fn loser(&self) -> &TeamId {
        self.team(self.winning_side().other())
    }

    /// Returns `(winner_score, loser_score)`.
    pub fn winning_score_line(&self) -> (u32, u32) {
        let side = self.winning_side();
        (self.score(side), self.score(side.other()))
    }
}

// ---------------------------------------------------------------------------
// UndecidedGame
// ---------------------------------------------------------------------------

/// A scheduled fixture that has not been played yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UndecidedGameRecord")]
pub struct UndecidedGame {
    id: GameId,
    #[serde(with = "crate::serde_helpers::kickoff")]
    date: DateTime<Utc>,
    week: String,
    home: TeamId,
    away: TeamId,
}

#[derive(Deserialize)]
struct UndecidedGameRecord {
    id: GameId,
    #[serde(with = "crate::serde_helpers::kickoff")]
    date: DateTime<Utc>,
    #[serde(default)]
    week: String,
    home: TeamId,
    away: TeamId,
}

impl TryFrom<UndecidedGameRecord> for UndecidedGame {
    type Error = GameError;

    fn try_from(r: UndecidedGameRecord) -> Result<Self, Self::Error> {
        UndecidedGame::new(r.id, r.date, r.week, r.home, r.away)
    }
}

impl UndecidedGame {
    /// Records a scheduled fixture.
    ///
    /// # Errors
    ///
    /// [`GameError::SameTeam`] if `home == away`.
    pub fn new(
        id: GameId,
        date: DateTime<Utc>,
        week: impl Into<String>,
        home: TeamId,
        away: TeamId,
    ) -> Result<Self, GameError> {
        if home == away {
            return Err(GameError::SameTeam {
                game_id: id,
                team_id: home,
            });
        }
        Ok(Self {
            id,
            date,
            week: week.into(),
            home,
            away,
        })
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn week(&self) -> &str {
        &self.week
    }

    pub fn home(&self) -> &TeamId {
        &self.home
    }

    pub fn away(&self) -> &TeamId {
        &self.away
    }

    /// The team on `side`.
    pub fn team(&self, side: Side) -> &TeamId {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}
