//! Typo suggestions for unknown delegate identifiers

use crate::types::DelegateId;

/// Levenshtein distance over chars
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Largest distance still considered a plausible typo of `target`
fn threshold(target: &str) -> usize {
    (target.chars().count() / 3).max(1)
}

/// Candidates close to `target`, nearest first
pub fn did_you_mean<'a, I>(candidates: I, target: &str) -> Vec<DelegateId>
where
    I: IntoIterator<Item = &'a DelegateId>,
{
    let target = target.to_lowercase();
    let limit = threshold(&target);

    let mut scored: Vec<(usize, &DelegateId)> = candidates
        .into_iter()
        .map(|candidate| {
            (
                edit_distance(&candidate.as_str().to_lowercase(), &target),
                candidate,
            )
        })
        .filter(|(distance, _)| *distance <= limit)
        .collect();

    scored.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.cmp(b)));
    scored.into_iter().map(|(_, id)| id.clone()).collect()
}
