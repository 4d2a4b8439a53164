// stage/ranking.rs
//
// Standard competition ranking over character scores: descending, ties
// share a rank, and a tie consumes the following slots.

/// Compute 1-based ranks for a score list, preserving input order.
pub fn competition_ranks(scores: &[i32]) -> Vec<u32> {
    let mut sorted: Vec<i32> = scores.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    // First index at which each distinct score appears gives its rank.
    let mut rank_of = std::collections::HashMap::new();
    for (i, &score) in sorted.iter().enumerate() {
        rank_of.entry(score).or_insert(i as u32 + 1);
    }

    scores
        .iter()
        .map(|score| rank_of.get(score).copied().unwrap_or(1))
        .collect()
}

/// Rank a single score against a field of scores.
pub fn rank_for_score(score: i32, scores: &[i32]) -> u32 {
    let better = scores.iter().filter(|&&s| s > score).count();
    better as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_descending_by_score() {
        assert_eq!(competition_ranks(&[85, 23, 97, 41, 60]), vec![2, 5, 1, 4, 3]);
    }

    #[test]
    fn ties_share_a_rank_and_consume_slots() {
        assert_eq!(competition_ranks(&[50, 50, 30]), vec![1, 1, 3]);
        assert_eq!(competition_ranks(&[10, 20, 20, 30]), vec![4, 2, 2, 1]);
    }

    #[test]
    fn empty_and_single() {
        assert!(competition_ranks(&[]).is_empty());
        assert_eq!(competition_ranks(&[77]), vec![1]);
    }

    #[test]
    fn rank_for_score_counts_better_scores() {
        let field = [85, 23, 97, 41, 60];
        assert_eq!(rank_for_score(97, &field), 1);
        assert_eq!(rank_for_score(60, &field), 3);
        assert_eq!(rank_for_score(5, &field), 6);
    }
}
