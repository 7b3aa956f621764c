use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{wyr_data, wyr_data_mut, Category, Choice, Prompt};
use crate::types::{GameState, Player, PlayerId, PlayerRef, RoundResults, RoundSummary};

const MAJORITY_POINTS: u32 = 10;
const MINORITY_POINTS: u32 = 5;
const TIE_POINTS: u32 = 7;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Majority {
    A,
    B,
    #[default]
    #[serde(rename = "tie")]
    Tie,
}

impl Majority {
    fn of(votes_a: usize, votes_b: usize) -> Self {
        match votes_a.cmp(&votes_b) {
            std::cmp::Ordering::Greater => Majority::A,
            std::cmp::Ordering::Less => Majority::B,
            std::cmp::Ordering::Equal => Majority::Tie,
        }
    }

    fn points_for(self, choice: Choice) -> u32 {
        match (self, choice) {
            (Majority::Tie, _) => TIE_POINTS,
            (Majority::A, Choice::A) | (Majority::B, Choice::B) => MAJORITY_POINTS,
            _ => MINORITY_POINTS,
        }
    }
}

/// Owned copy of the prompt a round was played on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptCard {
    pub option_a: String,
    pub option_b: String,
    pub category: Category,
}

impl From<&Prompt> for PromptCard {
    fn from(prompt: &Prompt) -> Self {
        Self {
            option_a: prompt.option_a.to_string(),
            option_b: prompt.option_b.to_string(),
            category: prompt.category,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WyrSummary {
    pub prompt: Option<PromptCard>,
    pub votes_a: Vec<PlayerRef>,
    pub votes_b: Vec<PlayerRef>,
    pub percent_a: u32,
    pub percent_b: u32,
    pub majority: Majority,
    pub scores: HashMap<PlayerId, u32>,
}

/// Share of `part` in `total` as a whole percentage, rounding halves up
fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (total * 2)) as u32
}

/// Tally the votes, score every player, store the summary and move to results.
pub(super) fn close_round(state: &mut GameState) -> RoundResults {
    // Lookup for resolving voter ids, in seat order
    let seats: HashMap<&str, (usize, &Player)> = state
        .players
        .iter()
        .enumerate()
        .map(|(seat, p)| (p.id.as_str(), (seat, p)))
        .collect();

    let Some(data) = wyr_data(state) else {
        tracing::warn!("Round results requested without would-you-rather data");
        return RoundResults {
            scores: HashMap::new(),
            summary: RoundSummary::WouldYouRather(WyrSummary::default()),
        };
    };

    let mut ballots: Vec<(&PlayerId, Choice)> = data.votes.iter().map(|(id, c)| (id, *c)).collect();
    ballots.sort_by_key(|(id, _)| {
        let seat = seats.get(id.as_str()).map_or(usize::MAX, |(seat, _)| *seat);
        (seat, (*id).clone())
    });

    let resolve = |id: &PlayerId| match seats.get(id.as_str()) {
        Some((_, p)) => PlayerRef {
            id: p.id.clone(),
            name: p.name.clone(),
            avatar_url: p.avatar_url.clone(),
        },
        None => PlayerRef {
            id: id.clone(),
            name: id.clone(),
            avatar_url: None,
        },
    };

    let votes_a: Vec<PlayerRef> = ballots
        .iter()
        .filter(|(_, c)| *c == Choice::A)
        .map(|(id, _)| resolve(*id))
        .collect();
    let votes_b: Vec<PlayerRef> = ballots
        .iter()
        .filter(|(_, c)| *c == Choice::B)
        .map(|(id, _)| resolve(*id))
        .collect();

    let total = votes_a.len() + votes_b.len();
    let percent_a = percent(votes_a.len(), total);
    let percent_b = if total == 0 { 0 } else { 100 - percent_a };
    let majority = Majority::of(votes_a.len(), votes_b.len());

    let mut scores: HashMap<PlayerId, u32> = state
        .players
        .iter()
        .map(|p| (p.id.clone(), 0))
        .collect();
    for (id, choice) in &ballots {
        scores.insert((*id).clone(), majority.points_for(*choice));
    }

    let summary = WyrSummary {
        prompt: data.current_prompt().map(PromptCard::from),
        votes_a,
        votes_b,
        percent_a,
        percent_b,
        majority,
        scores: scores.clone(),
    };

    tracing::info!(
        round = state.round,
        ?majority,
        percent_a,
        percent_b,
        voters = total,
        "Round scored"
    );

    if let Some(data) = wyr_data_mut(state) {
        data.round_results = Some(summary.clone());
        data.phase.close();
    }

    RoundResults {
        scores,
        summary: RoundSummary::WouldYouRather(summary),
    }
}
