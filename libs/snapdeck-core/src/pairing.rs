//! Grouping of an ordered sequence into question/answer pairs.

use crate::error::{ConvertError, Result};
use crate::types::Pair;

/// Partition `items` into consecutive, non-overlapping pairs.
///
/// Element `2i` becomes the question and `2i + 1` the answer of pair `i`.
/// An odd count fails without producing any pairs.
pub fn pair_up<T>(items: Vec<T>) -> Result<Vec<Pair<T>>> {
    let count = items.len();
    if count % 2 != 0 {
        return Err(ConvertError::CountViolation { count });
    }

    let mut pairs = Vec::with_capacity(count / 2);
    let mut iter = items.into_iter();
    while let (Some(question), Some(answer)) = (iter.next(), iter.next()) {
        pairs.push(Pair::new(question, answer));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pairs_consecutive_elements() {
        let pairs = pair_up(vec!["q1", "a1", "q2", "a2", "q3", "a3"]).unwrap();
        assert_eq!(
            pairs,
            vec![
                Pair::new("q1", "a1"),
                Pair::new("q2", "a2"),
                Pair::new("q3", "a3"),
            ]
        );
    }

    #[test]
    fn pair_count_is_half_for_even_lengths() {
        for n in (0..20).step_by(2) {
            let items: Vec<usize> = (0..n).collect();
            let pairs = pair_up(items).unwrap();
            assert_eq!(pairs.len(), n / 2);
            for (i, pair) in pairs.iter().enumerate() {
                assert_eq!(pair.question, 2 * i);
                assert_eq!(pair.answer, 2 * i + 1);
            }
        }
    }

    #[test]
    fn odd_count_rejected() {
        let result = pair_up(vec![1, 2, 3]);
        assert!(matches!(result, Err(ConvertError::CountViolation { count: 3 })));
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        let pairs: Vec<Pair<u8>> = pair_up(Vec::new()).unwrap();
        assert!(pairs.is_empty());
    }
}
