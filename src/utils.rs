#[cfg(test)]
use std::collections::{HashMap, HashSet};

/// Boolean membership mask over `0..len` for the given indices
pub fn membership_mask(indices: &[usize], len: usize) -> Vec<bool> {
    let mut mask = vec![false; len];
    for &i in indices {
        mask[i] = true;
    }
    mask
}

pub fn count_members(mask: &[bool]) -> usize {
    mask.iter().filter(|&&m| m).count()
}

#[cfg(test)]
pub fn score_map(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs
        .iter()
        .map(|(gene, score)| (gene.to_string(), *score))
        .collect()
}

#[cfg(test)]
pub fn gene_set(genes: &[&str]) -> HashSet<String> {
    genes.iter().map(|gene| gene.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_mask() {
        let mask = membership_mask(&[0, 3, 3], 5);
        assert_eq!(mask, vec![true, false, false, true, false]);
        assert_eq!(count_members(&mask), 2);
    }
}
