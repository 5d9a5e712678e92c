//! Fuzzy subsequence matching over feature names.
//!
//! A candidate matches when every query character appears in it, in order and
//! case-insensitively. Among the possible alignments the best-scoring one is
//! kept; scores reward contiguous runs, word starts, the start of the name and
//! runs that finish a word, and lightly penalize leading offset and gaps.

/// Base score for each matched character.
const MATCH: i64 = 1;
/// Bonus per preceding character of the same contiguous run. Grows with the
/// run, so a consecutive character always outscores any run start.
const CONSECUTIVE: i64 = 12;
/// Bonus when a run begins at the start of a word.
const WORD_START: i64 = 3;
/// Extra bonus when the first character of the name is matched.
const NAME_START: i64 = 2;
/// Bonus when a contiguous run ends exactly at a word end.
const WORD_END: i64 = 8;
/// Per skipped character between two matched characters.
const GAP_PENALTY: i64 = 1;
const GAP_PENALTY_CAP: i64 = 3;
/// Per character before the first match.
const LEADING_PENALTY: i64 = 1;
const LEADING_PENALTY_CAP: i64 = 3;

/// Score assigned to an exact case-insensitive match.
pub const EXACT_SCORE: i64 = i64::MAX;

/// A candidate that survived filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a, T> {
    /// Position of the candidate in the input sequence.
    pub index: usize,
    pub score: i64,
    pub item: &'a T,
}

fn fold(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

fn is_word_start(name: &[char], j: usize) -> bool {
    j == 0 || !name[j - 1].is_alphanumeric()
}

fn is_word_end(name: &[char], j: usize) -> bool {
    j + 1 == name.len() || !name[j + 1].is_alphanumeric()
}

/// Score of matching `name[j]` after `run` directly preceding matches.
fn char_score(name: &[char], j: usize, run: usize) -> i64 {
    let mut score = MATCH;
    if run > 0 {
        score += CONSECUTIVE * run as i64;
        if is_word_end(name, j) {
            score += WORD_END;
        }
    } else if is_word_start(name, j) {
        score += WORD_START;
    }
    if j == 0 {
        score += NAME_START;
    }
    score
}

/// Score `query` against `candidate`. `None` when the query is not an ordered
/// subsequence of the candidate. An empty query scores 0 against anything.
pub fn score(query: &str, candidate: &str) -> Option<i64> {
    let q = fold(query);
    let name = fold(candidate);
    if q.is_empty() {
        return Some(0);
    }
    if q == name {
        return Some(EXACT_SCORE);
    }
    if q.len() > name.len() {
        return None;
    }

    // best[j][r]: best score with the current query char matched at name[j]
    // as the (r + 1)th character of a contiguous run
    let width = q.len();
    let mut best: Vec<Vec<Option<i64>>> = name
        .iter()
        .enumerate()
        .map(|(j, &c)| {
            let mut runs = vec![None; width];
            if c == q[0] {
                let leading = (j as i64 * LEADING_PENALTY).min(LEADING_PENALTY_CAP);
                runs[0] = Some(char_score(&name, j, 0) - leading);
            }
            runs
        })
        .collect();

    for &qc in &q[1..] {
        let mut next = vec![vec![None; width]; name.len()];
        for (j, &c) in name.iter().enumerate() {
            if c != qc {
                continue;
            }

            if j > 0 {
                for run in 0..width - 1 {
                    if let Some(prev) = best[j - 1][run] {
                        next[j][run + 1] = Some(prev + char_score(&name, j, run + 1));
                    }
                }
            }

            let mut restart: Option<i64> = None;
            for k in 0..j.saturating_sub(1) {
                let gap = (j - k - 1) as i64;
                let penalty = (gap * GAP_PENALTY).min(GAP_PENALTY_CAP);
                for prev in best[k].iter().flatten() {
                    restart = restart.max(Some(prev - penalty));
                }
            }
            next[j][0] = restart.map(|prev| prev + char_score(&name, j, 0));
        }
        best = next;
    }

    best.into_iter().flatten().flatten().max()
}

/// Keep the candidates whose extracted name matches `query`, best first.
///
/// The sort is stable, so equal scores keep their input order.
pub fn filter<'a, T, F>(query: &str, candidates: &'a [T], extract: F) -> Vec<Match<'a, T>>
where
    F: Fn(&T) -> &str,
{
    let mut matches: Vec<Match<'a, T>> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            score(query, extract(item)).map(|score| Match { index, score, item })
        })
        .collect();
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}
