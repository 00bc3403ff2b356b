use std::collections::{HashMap, HashSet};

// Sequences at least this long get their most frequent elements excluded from match seeding.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Longest-matching-block similarity between two character sequences.
///
/// `b` is indexed once; `a` is scanned for the longest common block, and the regions on
/// either side are searched recursively. The ratio is `2 * matched / (len(a) + len(b))`.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let b2j = index_b(&b);
        Self { a, b, b2j }
    }

    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }

    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (&self.a, &self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.b2j.get(ch) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements were left out of the index; grow the block across them.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        Block {
            a: besti,
            b: bestj,
            size: bestsize,
        }
    }

    /// Non-overlapping matching blocks in increasing order, adjacent blocks merged.
    pub fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut found = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            found.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        found.sort_by_key(|m| (m.a, m.b, m.size));

        let mut merged: Vec<Block> = Vec::with_capacity(found.len());
        for m in found {
            if let Some(last) = merged.last_mut() {
                if last.a + last.size == m.a && last.b + last.size == m.b {
                    last.size += m.size;
                    continue;
                }
            }
            merged.push(m);
        }
        merged
    }
}

fn index_b(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    let n = b.len();
    if n >= AUTOJUNK_MIN_LEN {
        let threshold = n / 100 + 1;
        let popular: HashSet<char> = b2j
            .iter()
            .filter(|(_, js)| js.len() > threshold)
            .map(|(ch, _)| *ch)
            .collect();
        for ch in popular {
            b2j.remove(&ch);
        }
    }
    b2j
}

/// Best candidates scoring at least `cutoff` against `word`, highest first.
///
/// Equal scores order by the candidate text, greatest first.
pub fn close_matches<'a, I>(word: &str, candidates: I, n: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &'a str)> = candidates
        .into_iter()
        .filter_map(|c| {
            let score = SequenceMatcher::new(c, word).ratio();
            (score >= cutoff).then_some((score, c))
        })
        .collect();

    scored.sort_by(|x, y| {
        y.0.partial_cmp(&x.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| y.1.cmp(x.1))
    });
    scored.into_iter().take(n).map(|(_, c)| c).collect()
}
